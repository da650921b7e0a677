/// GraphicsDevice trait - native graphics API interface

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graphics_device::{
    Shader, ShaderStage, Program, UniformValue, Texture, PixelBuffer, PixelBufferDesc,
};

// ============================================================================
// Render state
// ============================================================================

/// Framebuffer blending applied to a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Opaque, no blending
    #[default]
    None,
    /// Classic `src_alpha, one_minus_src_alpha`
    Alpha,
    /// Additive `one, one`
    Add,
}

/// Fixed-function state a material sets before a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub blend: BlendMode,
    pub depth_read: bool,
    pub depth_write: bool,
    /// false for double-sided materials
    pub cull_back_faces: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            blend: BlendMode::None,
            depth_read: true,
            depth_write: true,
            cull_back_faces: true,
        }
    }
}

/// Device statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceStats {
    /// Number of draw calls issued (full-screen passes included)
    pub draw_calls: u32,
    /// Number of programs linked successfully
    pub programs_linked: u32,
    /// Number of shader objects created
    pub shaders_created: u32,
    /// Number of pixel buffers created
    pub pixel_buffers_created: u32,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Native graphics API interface
///
/// Factory for shader objects, programs and pixel buffers, plus the small set
/// of immediate-mode state calls a material needs to prepare a draw.
/// Implementations are not required to be usable from more than one thread at
/// a time; the crate always reaches the device through `Arc<Mutex<..>>`.
pub trait GraphicsDevice: Send + Sync {
    /// Create an empty shader object for `stage`
    fn create_shader(&mut self, stage: ShaderStage) -> Result<Arc<dyn Shader>>;

    /// Link compiled shader objects into a program
    ///
    /// # Errors
    ///
    /// `Error::ProgramLinkFailed` carrying the driver's link log.
    fn link_program(&mut self, shaders: &[Arc<dyn Shader>]) -> Result<Arc<dyn Program>>;

    /// Create an off-screen render target
    fn create_pixel_buffer(&mut self, desc: PixelBufferDesc) -> Result<Arc<dyn PixelBuffer>>;

    /// Make `program` current; later `set_uniform` calls target it
    fn use_program(&mut self, program: &Arc<dyn Program>) -> Result<()>;

    /// Upload a uniform to the current program
    fn set_uniform(&mut self, name: &str, value: UniformValue<'_>) -> Result<()>;

    /// Bind `texture` to texture unit `unit`, or unbind the unit with `None`
    fn bind_texture(&mut self, unit: u32, texture: Option<&Arc<dyn Texture>>) -> Result<()>;

    /// Redirect rendering into `target`, or back to the default framebuffer with `None`
    fn bind_pixel_buffer(&mut self, target: Option<&Arc<dyn PixelBuffer>>) -> Result<()>;

    /// Pixel buffer currently bound, `None` for the default framebuffer
    fn current_pixel_buffer(&self) -> Option<Arc<dyn PixelBuffer>>;

    /// Apply blend, depth and culling state
    fn set_render_state(&mut self, state: RenderState) -> Result<()>;

    /// Draw a full-screen triangle pair with the current program
    fn draw_fullscreen_quad(&mut self) -> Result<()>;

    /// Get statistics about the device
    fn stats(&self) -> DeviceStats;
}
