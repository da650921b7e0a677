/// Resource-level texture type.
///
/// Wraps a GPU texture with the filename it was loaded from. Materials
/// reference textures through `Arc<Texture>`: many materials may share the
/// same texture and none of them owns its lifetime.
///
/// Loading is not a material concern. Material files name their textures and
/// a `TextureSource` resolves those names.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::error::{self, Result};
use crate::engine_bail;
use crate::graphics_device;

const LOG_SOURCE: &str = "kit::TextureLibrary";

// ===== TEXTURE =====

/// A GPU texture together with its asset filename
pub struct Texture {
    filename: String,
    gpu_texture: Arc<dyn graphics_device::Texture>,
}

impl Texture {
    /// Wrap an uploaded GPU texture
    pub fn new(filename: impl Into<String>, gpu_texture: Arc<dyn graphics_device::Texture>) -> Self {
        Self {
            filename: filename.into(),
            gpu_texture,
        }
    }

    /// Asset filename, as written into material files
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Underlying GPU texture
    pub fn gpu_texture(&self) -> &Arc<dyn graphics_device::Texture> {
        &self.gpu_texture
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("filename", &self.filename)
            .finish()
    }
}

// ===== TEXTURE SOURCE =====

/// Load-by-name policy for textures referenced from material files
pub trait TextureSource: Send + Sync {
    /// Resolve `filename` to a shared texture
    ///
    /// # Errors
    ///
    /// Implementation-defined; the material loader reports the failure and
    /// aborts the load.
    fn load_texture(&self, filename: &str) -> Result<Arc<Texture>>;
}

// ===== TEXTURE LIBRARY =====

/// In-memory `TextureSource` over textures registered up front
///
/// Suited to applications that upload their textures at startup, and to tests.
pub struct TextureLibrary {
    textures: Mutex<FxHashMap<String, Arc<Texture>>>,
}

impl TextureLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            textures: Mutex::new(FxHashMap::default()),
        }
    }

    /// Register a texture under its own filename, replacing any previous entry
    pub fn insert(&self, texture: Arc<Texture>) -> Result<()> {
        let mut textures = error::lock(&self.textures, LOG_SOURCE, "texture library")?;
        textures.insert(texture.filename().to_string(), texture);
        Ok(())
    }

    /// Number of registered textures
    pub fn len(&self) -> usize {
        self.textures.lock().map(|t| t.len()).unwrap_or(0)
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TextureLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureSource for TextureLibrary {
    fn load_texture(&self, filename: &str) -> Result<Arc<Texture>> {
        let textures = match self.textures.lock() {
            Ok(textures) => textures,
            Err(_) => engine_bail!(LOG_SOURCE, "Texture library lock poisoned"),
        };
        match textures.get(filename) {
            Some(texture) => Ok(texture.clone()),
            None => engine_bail!(LOG_SOURCE, "Texture '{}' is not registered", filename),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
