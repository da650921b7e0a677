/// Renderer trait - environment inputs of the reflective material path

use std::sync::Arc;

use glam::Vec3;

use crate::graphics_device::Texture;

/// Supplies the environment a reflective draw samples
///
/// Only `Material::use_reflective` consults it. Missing maps leave their
/// texture unit unbound.
pub trait Renderer {
    /// Pre-filtered reflection cube map, mip level selected by roughness
    fn reflection_map(&self) -> Option<&Arc<dyn Texture>>;

    /// Diffuse irradiance cube map
    fn irradiance_map(&self) -> Option<&Arc<dyn Texture>>;

    /// World-space eye position
    fn camera_position(&self) -> Vec3;

    /// Scale applied to environment lighting
    fn environment_strength(&self) -> f32 {
        1.0
    }
}
