//! Resource module
//!
//! Asset-level types shared between materials. Textures are loaded outside
//! the crate and handed in through a `TextureSource`.

pub mod texture;

pub use texture::{Texture, TextureLibrary, TextureSource};
