/// MaterialContext - everything materials share within one graphics context
///
/// Holds the device, the program cache, the load registry, the texture
/// source and the shared cache-baking resources. Create one per graphics
/// context; tests create as many isolated contexts as they need.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::error::{self, Result};
use crate::graphics_device::{GraphicsDevice, Program};
use crate::material::{Material, MaterialRegistry, SharedMaterial};
use crate::resource::TextureSource;
use crate::shader::{program_cache, sources, ProgramCache};
use crate::{engine_debug, engine_info};

const LOG_SOURCE: &str = "kit::MaterialContext";

// ===== CONFIG =====

/// Material context configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Width and height of every baked cache, in pixels
    pub cache_resolution: u32,
    /// Directory `load_material` resolves names against
    pub material_directory: PathBuf,
    /// `#version` emitted at the top of generated shaders
    pub glsl_version: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_resolution: 512,
            material_directory: PathBuf::from("data/materials"),
            glsl_version: 410,
        }
    }
}

// ===== SHARED RESOURCES =====

/// GPU objects used by every material of a context
///
/// Handed out as `Arc` from a weak slot: created by the first material,
/// destroyed with the last one.
pub struct SharedResources {
    cache_program: Arc<dyn Program>,
}

impl SharedResources {
    /// Full-screen program rendering the AR/NM/EO/ND caches
    pub fn cache_program(&self) -> &Arc<dyn Program> {
        &self.cache_program
    }
}

impl Drop for SharedResources {
    fn drop(&mut self) {
        engine_debug!(LOG_SOURCE, "Releasing cache program {}", self.cache_program.id());
    }
}

// ===== CONTEXT =====

pub struct MaterialContext {
    config: Config,
    device: Arc<Mutex<dyn GraphicsDevice>>,
    textures: Arc<dyn TextureSource>,
    programs: ProgramCache,
    registry: MaterialRegistry,
    shared: Mutex<Weak<SharedResources>>,
}

impl MaterialContext {
    /// Create a context on `device`
    ///
    /// Nothing touches the device until the first material is created.
    pub fn new(
        device: Arc<Mutex<dyn GraphicsDevice>>,
        textures: Arc<dyn TextureSource>,
        config: Config,
    ) -> Arc<Self> {
        engine_info!(
            LOG_SOURCE,
            "Material context created (GLSL {}, caches {}px, materials in '{}')",
            config.glsl_version,
            config.cache_resolution,
            config.material_directory.display()
        );
        Arc::new(Self {
            programs: ProgramCache::new(config.glsl_version),
            registry: MaterialRegistry::new(),
            shared: Mutex::new(Weak::new()),
            config,
            device,
            textures,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn device(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.device
    }

    pub fn program_cache(&self) -> &ProgramCache {
        &self.programs
    }

    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    pub fn texture_source(&self) -> &Arc<dyn TextureSource> {
        &self.textures
    }

    /// Path a material name resolves to
    pub fn material_path(&self, name: &str) -> PathBuf {
        self.config.material_directory.join(name)
    }

    /// Shared material named `name`, loading it on first use
    ///
    /// A name already held alive by some caller resolves to that same
    /// instance. Otherwise the material is read from
    /// `<material_directory>/<name>` and registered; on failure nothing is
    /// registered.
    pub fn load_material(self: &Arc<Self>, name: &str) -> Result<SharedMaterial> {
        self.registry.get_or_try_insert_with(name, || {
            let mut material = Material::new(self, name)?;
            material.load(self.material_path(name))?;
            engine_info!(LOG_SOURCE, "Loaded material '{}'", name);
            Ok(material)
        })
    }

    /// Whether the shared cache resources currently exist
    pub fn shared_resources_alive(&self) -> bool {
        self.shared
            .lock()
            .map(|slot| slot.strong_count() > 0)
            .unwrap_or(false)
    }

    /// Shared resources, created on first request after the previous set died
    pub(crate) fn acquire_shared(&self) -> Result<Arc<SharedResources>> {
        let mut slot = error::lock(&self.shared, LOG_SOURCE, "shared resources")?;
        if let Some(shared) = slot.upgrade() {
            return Ok(shared);
        }

        let (vertex, fragment) = sources::cache_sources(self.config.glsl_version);
        let cache_program = {
            let mut device = self.lock_device()?;
            program_cache::build_program(&mut *device, &vertex, &fragment)?
        };
        engine_info!(LOG_SOURCE, "Cache program {} created", cache_program.id());

        let shared = Arc::new(SharedResources { cache_program });
        *slot = Arc::downgrade(&shared);
        Ok(shared)
    }

    /// Lock the device
    ///
    /// Callers of material operations must not hold this lock themselves.
    pub(crate) fn lock_device(&self) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
        error::lock(&*self.device, LOG_SOURCE, "device")
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
