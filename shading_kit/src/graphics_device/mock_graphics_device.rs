/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every state-changing call as a `MockCommand` and tracks the
/// resulting bound state, so tests can assert on what a material did to
/// the device without a real graphics context.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Error, Result};
use crate::engine_bail;
use crate::graphics_device::{
    GraphicsDevice, Shader, ShaderStage, ShaderCompileStatus, Program, UniformValue,
    Texture, TextureInfo, TextureFormat, PixelBuffer, PixelBufferDesc,
    RenderState, DeviceStats,
};

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub name: String,
}

impl MockTexture {
    pub fn new(width: u32, height: u32, name: &str) -> Self {
        Self {
            info: TextureInfo {
                width,
                height,
                format: TextureFormat::R8G8B8A8_UNORM,
            },
            name: name.to_string(),
        }
    }

    /// Shorthand for a shared 4x4 texture trait object
    pub fn shared(name: &str) -> Arc<dyn Texture> {
        Arc::new(Self::new(4, 4, name))
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn label(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Mock Shader
// ============================================================================

/// Shader whose compile fails on empty source or an `#error` directive
#[derive(Debug)]
pub struct MockShader {
    pub stage: ShaderStage,
    pub source: Mutex<String>,
    pub compile_count: AtomicU32,
}

impl MockShader {
    pub fn new(stage: ShaderStage) -> Self {
        Self {
            stage,
            source: Mutex::new(String::new()),
            compile_count: AtomicU32::new(0),
        }
    }

    pub fn current_source(&self) -> String {
        self.source.lock().unwrap().clone()
    }
}

impl Shader for MockShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn set_source(&self, source: &str) {
        *self.source.lock().unwrap() = source.to_string();
    }

    fn compile(&self) -> ShaderCompileStatus {
        self.compile_count.fetch_add(1, Ordering::SeqCst);
        let source = self.source.lock().unwrap();
        if source.trim().is_empty() {
            return ShaderCompileStatus {
                success: false,
                log: "0:0: error: empty shader source".to_string(),
            };
        }
        if let Some((index, _)) = source.lines().enumerate().find(|(_, l)| l.trim_start().starts_with("#error")) {
            return ShaderCompileStatus {
                success: false,
                log: format!("0:{}: error: #error directive", index + 1),
            };
        }
        ShaderCompileStatus { success: true, log: String::new() }
    }
}

// ============================================================================
// Mock Program
// ============================================================================

#[derive(Debug)]
pub struct MockProgram {
    pub id: u32,
    pub stages: Vec<ShaderStage>,
}

impl Program for MockProgram {
    fn id(&self) -> u32 {
        self.id
    }
}

// ============================================================================
// Mock PixelBuffer
// ============================================================================

pub struct MockPixelBuffer {
    pub width: u32,
    pub height: u32,
    pub color: Arc<dyn Texture>,
}

impl PixelBuffer for MockPixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_texture(&self) -> &Arc<dyn Texture> {
        &self.color
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum MockCommand {
    UseProgram(u32),
    SetUniform { name: String, bytes: Vec<u8> },
    BindTexture { unit: u32, label: Option<String> },
    BindPixelBuffer(Option<String>),
    SetRenderState(RenderState),
    DrawFullscreen { target: Option<String> },
}

/// Mock GraphicsDevice that tracks objects and bound state without a GPU
#[derive(Default)]
pub struct MockGraphicsDevice {
    /// Every state-changing call, in order
    pub commands: Vec<MockCommand>,
    /// Shaders created so far (kept alive for inspection)
    pub shaders: Vec<Arc<MockShader>>,
    /// Make every following `link_program` fail
    pub fail_links: bool,
    next_program_id: u32,
    current_program: Option<u32>,
    current_target: Option<String>,
    current_buffer: Option<Arc<dyn PixelBuffer>>,
    texture_units: BTreeMap<u32, Option<String>>,
    uniforms: BTreeMap<(u32, String), Vec<u8>>,
    render_state: Option<RenderState>,
    stats: DeviceStats,
}

impl MockGraphicsDevice {
    /// Create a new mock device
    pub fn new() -> Self {
        Self {
            next_program_id: 1,
            ..Default::default()
        }
    }

    /// Forget recorded commands (bound state is kept)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Full-screen passes recorded since the last clear, by target label
    pub fn fullscreen_passes(&self) -> Vec<Option<String>> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                MockCommand::DrawFullscreen { target } => Some(target.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded passes whose target label contains `needle`
    pub fn passes_into(&self, needle: &str) -> usize {
        self.fullscreen_passes()
            .iter()
            .filter(|t| t.as_deref().is_some_and(|l| l.contains(needle)))
            .count()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.current_program
    }

    /// Label bound on `unit`, if any
    pub fn bound_texture(&self, unit: u32) -> Option<String> {
        self.texture_units.get(&unit).cloned().flatten()
    }

    /// Every unit with a texture currently bound
    pub fn bound_units(&self) -> BTreeMap<u32, String> {
        self.texture_units
            .iter()
            .filter_map(|(unit, label)| label.clone().map(|l| (*unit, l)))
            .collect()
    }

    /// Last value uploaded to `name` on `program`
    pub fn uniform(&self, program: u32, name: &str) -> Option<&Vec<u8>> {
        self.uniforms.get(&(program, name.to_string()))
    }

    pub fn render_state(&self) -> Option<RenderState> {
        self.render_state
    }

    /// Snapshot of everything a draw would observe
    pub fn bound_state(&self) -> (Option<u32>, BTreeMap<u32, String>, Option<RenderState>, BTreeMap<(u32, String), Vec<u8>>) {
        (self.current_program, self.bound_units(), self.render_state, self.uniforms.clone())
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_shader(&mut self, stage: ShaderStage) -> Result<Arc<dyn Shader>> {
        let shader = Arc::new(MockShader::new(stage));
        self.shaders.push(shader.clone());
        self.stats.shaders_created += 1;
        Ok(shader)
    }

    fn link_program(&mut self, shaders: &[Arc<dyn Shader>]) -> Result<Arc<dyn Program>> {
        if shaders.is_empty() {
            return Err(Error::ProgramLinkFailed("no shader attached".to_string()));
        }
        if self.fail_links {
            return Err(Error::ProgramLinkFailed("mock link failure".to_string()));
        }
        let id = self.next_program_id;
        self.next_program_id += 1;
        self.stats.programs_linked += 1;
        Ok(Arc::new(MockProgram {
            id,
            stages: shaders.iter().map(|s| s.stage()).collect(),
        }))
    }

    fn create_pixel_buffer(&mut self, desc: PixelBufferDesc) -> Result<Arc<dyn PixelBuffer>> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("kit::mock", "create_pixel_buffer: zero-sized target '{}'", desc.label);
        }
        self.stats.pixel_buffers_created += 1;
        let color: Arc<dyn Texture> = Arc::new(MockTexture {
            info: TextureInfo { width: desc.width, height: desc.height, format: desc.format },
            name: desc.label,
        });
        Ok(Arc::new(MockPixelBuffer { width: desc.width, height: desc.height, color }))
    }

    fn use_program(&mut self, program: &Arc<dyn Program>) -> Result<()> {
        self.current_program = Some(program.id());
        self.commands.push(MockCommand::UseProgram(program.id()));
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue<'_>) -> Result<()> {
        let program = match self.current_program {
            Some(id) => id,
            None => engine_bail!("kit::mock", "set_uniform '{}' without a current program", name),
        };
        let bytes = value.to_bytes();
        self.uniforms.insert((program, name.to_string()), bytes.clone());
        self.commands.push(MockCommand::SetUniform { name: name.to_string(), bytes });
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<&Arc<dyn Texture>>) -> Result<()> {
        let label = texture.map(|t| t.label().to_string());
        self.texture_units.insert(unit, label.clone());
        self.commands.push(MockCommand::BindTexture { unit, label });
        Ok(())
    }

    fn bind_pixel_buffer(&mut self, target: Option<&Arc<dyn PixelBuffer>>) -> Result<()> {
        let label = target.map(|t| t.color_texture().label().to_string());
        self.current_target = label.clone();
        self.current_buffer = target.cloned();
        self.commands.push(MockCommand::BindPixelBuffer(label));
        Ok(())
    }

    fn current_pixel_buffer(&self) -> Option<Arc<dyn PixelBuffer>> {
        self.current_buffer.clone()
    }

    fn set_render_state(&mut self, state: RenderState) -> Result<()> {
        self.render_state = Some(state);
        self.commands.push(MockCommand::SetRenderState(state));
        Ok(())
    }

    fn draw_fullscreen_quad(&mut self) -> Result<()> {
        if self.current_program.is_none() {
            engine_bail!("kit::mock", "draw_fullscreen_quad without a current program");
        }
        self.stats.draw_calls += 1;
        self.commands.push(MockCommand::DrawFullscreen { target: self.current_target.clone() });
        Ok(())
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
