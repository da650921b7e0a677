/// PixelBuffer trait - off-screen render target
///
/// A pixel buffer owns one color attachment that can be rendered into with
/// `GraphicsDevice::bind_pixel_buffer` and then sampled like any texture.

use std::sync::Arc;
use crate::graphics_device::{Texture, TextureFormat};

/// Descriptor for creating a pixel buffer
#[derive(Debug, Clone)]
pub struct PixelBufferDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color attachment format
    pub format: TextureFormat,
    /// Debug label
    pub label: String,
}

/// Off-screen render target
pub trait PixelBuffer: Send + Sync {
    /// Get the width in pixels
    fn width(&self) -> u32;

    /// Get the height in pixels
    fn height(&self) -> u32;

    /// Color attachment, sampleable once rendering completes
    fn color_texture(&self) -> &Arc<dyn Texture>;
}
