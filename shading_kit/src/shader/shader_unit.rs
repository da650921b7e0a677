/// ShaderUnit - one shader stage built from source text
///
/// The GPU shader object is created once and kept for the lifetime of the
/// unit; source text can be replaced and recompiled any number of times.
/// Compile failures are reported through the log with the driver's
/// diagnostic and a line-numbered dump of the offending source.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, Shader, ShaderStage};
use crate::{engine_debug, engine_error};

const LOG_SOURCE: &str = "kit::ShaderUnit";
const RULE: &str = "----------------------------------------";

/// One compiled (or compilable) shader stage
pub struct ShaderUnit {
    handle: Arc<dyn Shader>,
    stage: ShaderStage,
    source: String,
    /// Driver log of the last compile
    log: String,
}

impl ShaderUnit {
    /// Create an empty shader object for `stage`
    pub fn create(device: &mut dyn GraphicsDevice, stage: ShaderStage) -> Result<Self> {
        let handle = device.create_shader(stage)?;
        Ok(Self {
            handle,
            stage,
            source: String::new(),
            log: String::new(),
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// GPU shader object, stable across recompiles
    pub fn handle(&self) -> &Arc<dyn Shader> {
        &self.handle
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Driver log of the last `compile()` call
    pub fn log(&self) -> &str {
        &self.log
    }

    /// Replace the source with the contents of `path`
    ///
    /// Every line is stored newline-terminated, whatever the file's line
    /// endings. On failure the previous source is kept.
    pub fn source_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                engine_error!(LOG_SOURCE, "Cannot open shader file '{}': {}", path.display(), err);
                return Err(err.into());
            }
        };

        let mut source = String::with_capacity(text.len() + 1);
        for line in text.lines() {
            source.push_str(line);
            source.push('\n');
        }
        self.source = source;
        Ok(())
    }

    /// Replace the source with `source`
    pub fn source_from_string(&mut self, source: &str) {
        self.source = source.to_string();
    }

    /// Reset the source to empty
    pub fn clear_source(&mut self) {
        self.source.clear();
    }

    /// Hand the current source to the driver and compile it
    ///
    /// Returns false on failure, after logging the stage name, the driver log
    /// and the numbered source.
    pub fn compile(&mut self) -> bool {
        self.handle.set_source(&self.source);
        let status = self.handle.compile();
        self.log = status.log;

        if status.success {
            engine_debug!(LOG_SOURCE, "{}-shader compiled ({} lines)", self.stage, self.source.lines().count());
            return true;
        }

        engine_error!(LOG_SOURCE, "{}-shader compilation failed: {}", self.stage, self.log);
        engine_error!(LOG_SOURCE, "Dumping source...\n{}\n{}{}", RULE, self.numbered_source(), RULE);
        false
    }

    /// Source with a `N:\t` prefix on every line, numbered from 1
    pub fn numbered_source(&self) -> String {
        let mut dump = String::new();
        for (index, line) in self.source.lines().enumerate() {
            dump.push_str(&format!("{}:\t{}\n", index + 1, line));
        }
        dump
    }

    /// Error describing the last failed compile
    pub fn compile_error(&self) -> Error {
        Error::ShaderCompilationFailed {
            stage: self.stage.name().to_string(),
            log: self.log.clone(),
        }
    }
}

impl std::fmt::Debug for ShaderUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderUnit")
            .field("stage", &self.stage)
            .field("source_len", &self.source.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "shader_unit_tests.rs"]
mod tests;
