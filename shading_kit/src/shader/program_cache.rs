/// ProgramCache - one linked program per distinct ProgramFlags
///
/// Programs are built on first request only; of the 8192 possible flag
/// combinations, only those a material actually asks for ever exist.
/// There is no eviction: a program lives as long as its cache.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::error::{self, Result};
use crate::graphics_device::{GraphicsDevice, Program, ShaderStage};
use crate::shader::{sources, ProgramFlags, ShaderUnit};
use crate::engine_info;

const LOG_SOURCE: &str = "kit::ProgramCache";

/// Context-wide map from flags to linked material programs
pub struct ProgramCache {
    glsl_version: u32,
    programs: Mutex<BTreeMap<ProgramFlags, Arc<dyn Program>>>,
    /// Reflective permutations, keyed like `programs`
    reflective: Mutex<BTreeMap<ProgramFlags, Arc<dyn Program>>>,
}

impl ProgramCache {
    /// Create an empty cache emitting sources for `glsl_version`
    pub fn new(glsl_version: u32) -> Self {
        Self {
            glsl_version,
            programs: Mutex::new(BTreeMap::new()),
            reflective: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn glsl_version(&self) -> u32 {
        self.glsl_version
    }

    /// Cached program for `flags`, building and inserting it on a miss
    ///
    /// The cache lock is held across the build, so two callers asking for the
    /// same flags never link two programs. A failed build caches nothing.
    pub fn get_program(
        &self,
        device: &mut dyn GraphicsDevice,
        flags: ProgramFlags,
    ) -> Result<Arc<dyn Program>> {
        let mut programs = error::lock(&self.programs, LOG_SOURCE, "program map")?;
        if let Some(program) = programs.get(&flags) {
            return Ok(program.clone());
        }

        let (vertex, fragment) = sources::material_sources(self.glsl_version, flags, false);
        let program = build_program(device, &vertex, &fragment)?;
        engine_info!(
            LOG_SOURCE,
            "Linked material program {} for flags {:#06x} [{}]",
            program.id(),
            flags.bits(),
            flags.defines().join(" ")
        );
        programs.insert(flags, program.clone());
        Ok(program)
    }

    /// Reflective permutation for `flags`
    ///
    /// The reflective path writes one shaded color, so `forward` is forced on
    /// before lookup.
    pub fn get_reflective_program(
        &self,
        device: &mut dyn GraphicsDevice,
        flags: ProgramFlags,
    ) -> Result<Arc<dyn Program>> {
        let flags = ProgramFlags { forward: true, ..flags };
        let mut programs = error::lock(&self.reflective, LOG_SOURCE, "reflective map")?;
        if let Some(program) = programs.get(&flags) {
            return Ok(program.clone());
        }

        let (vertex, fragment) = sources::material_sources(self.glsl_version, flags, true);
        let program = build_program(device, &vertex, &fragment)?;
        engine_info!(
            LOG_SOURCE,
            "Linked reflective program {} for flags {:#06x}",
            program.id(),
            flags.bits()
        );
        programs.insert(flags, program.clone());
        Ok(program)
    }

    /// Whether a material program for `flags` has been built
    pub fn contains(&self, flags: ProgramFlags) -> bool {
        self.programs
            .lock()
            .map(|programs| programs.contains_key(&flags))
            .unwrap_or(false)
    }

    /// Number of linked material programs
    pub fn program_count(&self) -> usize {
        self.programs.lock().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Number of linked reflective programs
    pub fn reflective_program_count(&self) -> usize {
        self.reflective.lock().map(|programs| programs.len()).unwrap_or(0)
    }
}

/// Compile a vertex and a fragment stage and link them
///
/// The returned error is the first stage failure or the link failure;
/// diagnostics have already been logged.
pub(crate) fn build_program(
    device: &mut dyn GraphicsDevice,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<Arc<dyn Program>> {
    let mut vertex = ShaderUnit::create(device, ShaderStage::Vertex)?;
    vertex.source_from_string(vertex_source);
    if !vertex.compile() {
        return Err(vertex.compile_error());
    }

    let mut fragment = ShaderUnit::create(device, ShaderStage::Fragment)?;
    fragment.source_from_string(fragment_source);
    if !fragment.compile() {
        return Err(fragment.compile_error());
    }

    device
        .link_program(&[vertex.handle().clone(), fragment.handle().clone()])
        .map_err(|err| {
            crate::engine_error!(LOG_SOURCE, "{}", err);
            err
        })
}

#[cfg(test)]
#[path = "program_cache_tests.rs"]
mod tests;
