/// Shared fixtures for material tests: a context over a mock device

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec3;

use crate::graphics_device::mock_graphics_device::{MockGraphicsDevice, MockTexture};
use crate::graphics_device::{GraphicsDevice, Texture as GpuTexture};
use crate::material::{Config, MaterialContext, Renderer};
use crate::resource::{Texture, TextureLibrary, TextureSource};

pub struct Fixture {
    pub context: Arc<MaterialContext>,
    pub device: Arc<Mutex<MockGraphicsDevice>>,
    pub textures: Arc<TextureLibrary>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_directory(std::env::temp_dir())
    }

    pub fn with_directory(material_directory: PathBuf) -> Self {
        let device = Arc::new(Mutex::new(MockGraphicsDevice::new()));
        let textures = Arc::new(TextureLibrary::new());
        let config = Config {
            cache_resolution: 64,
            material_directory,
            ..Config::default()
        };
        let context = MaterialContext::new(
            device.clone() as Arc<Mutex<dyn GraphicsDevice>>,
            textures.clone() as Arc<dyn TextureSource>,
            config,
        );
        Self { context, device, textures }
    }

    pub fn device(&self) -> MutexGuard<'_, MockGraphicsDevice> {
        self.device.lock().unwrap()
    }

    /// Register a texture with the library and return it
    pub fn texture(&self, name: &str) -> Arc<Texture> {
        let texture = Arc::new(Texture::new(name, MockTexture::shared(name)));
        self.textures.insert(texture.clone()).unwrap();
        texture
    }
}

/// Unique path in the temp directory for this test process
pub fn temp_name(name: &str) -> String {
    format!("shading_kit_{}_{}", std::process::id(), name)
}

pub struct TestRenderer {
    pub reflection: Option<Arc<dyn GpuTexture>>,
    pub irradiance: Option<Arc<dyn GpuTexture>>,
}

impl TestRenderer {
    pub fn new() -> Self {
        Self {
            reflection: Some(MockTexture::shared("sky_reflection")),
            irradiance: Some(MockTexture::shared("sky_irradiance")),
        }
    }
}

impl Renderer for TestRenderer {
    fn reflection_map(&self) -> Option<&Arc<dyn GpuTexture>> {
        self.reflection.as_ref()
    }

    fn irradiance_map(&self) -> Option<&Arc<dyn GpuTexture>> {
        self.irradiance.as_ref()
    }

    fn camera_position(&self) -> Vec3 {
        Vec3::new(0.0, 2.0, 5.0)
    }
}
