/// Graphics device module - the native graphics API seen through traits

// Module declarations
pub mod graphics_device;
pub mod texture;
pub mod shader;
pub mod program;
pub mod pixel_buffer;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;
pub use shader::*;
pub use program::*;
pub use pixel_buffer::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
