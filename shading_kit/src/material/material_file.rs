/// On-disk material description
///
/// Pretty-printed JSON with one field per attribute, in declaration order.
/// Textures are referenced by filename, or `null` when unset. Missing fields
/// take the material defaults, so hand-written files can stay short.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graphics_device::BlendMode;

/// Serialized form of a `Material`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialFile {
    pub albedo: Vec3,
    pub albedo_map: Option<String>,
    pub roughness: f32,
    pub roughness_map: Option<String>,
    pub metalness: f32,
    pub metalness_map: Option<String>,
    pub normal_map: Option<String>,
    pub occlusion_map: Option<String>,
    pub emissive_color: Vec3,
    pub emissive_strength: f32,
    pub emissive_map: Option<String>,
    pub opacity: f32,
    pub opacity_mask: Option<String>,
    pub depth_mask: Option<String>,
    pub uv_scale: f32,
    pub blend: BlendMode,
    pub double_sided: bool,
    pub depth_read: bool,
    pub depth_write: bool,
    pub cast_shadows: bool,
    pub dynamic_ar: bool,
    pub dynamic_nm: bool,
    pub dynamic_eo: bool,
}

impl Default for MaterialFile {
    fn default() -> Self {
        Self {
            albedo: Vec3::ONE,
            albedo_map: None,
            roughness: 0.0,
            roughness_map: None,
            metalness: 0.0,
            metalness_map: None,
            normal_map: None,
            occlusion_map: None,
            emissive_color: Vec3::ONE,
            emissive_strength: 0.0,
            emissive_map: None,
            opacity: 1.0,
            opacity_mask: None,
            depth_mask: None,
            uv_scale: 1.0,
            blend: BlendMode::None,
            double_sided: false,
            depth_read: true,
            depth_write: true,
            cast_shadows: true,
            dynamic_ar: false,
            dynamic_nm: false,
            dynamic_eo: false,
        }
    }
}

impl MaterialFile {
    /// Parse a material file
    ///
    /// # Errors
    ///
    /// `Error::MaterialLoad` if the file cannot be read or is malformed.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::MaterialLoad(format!("cannot open '{}': {}", path.display(), err))
        })?;
        serde_json::from_str(&text)
            .map_err(|err| Error::MaterialLoad(format!("'{}': {}", path.display(), err)))
    }

    /// Write the file, replacing any previous contents
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if a number is NaN or infinite (JSON would
    /// store it as `null`, which does not read back); nothing is written.
    /// `Error::Io` if the file cannot be opened for writing.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut text = self.to_json()?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        self.check_finite()?;
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_finite(&self) -> Result<()> {
        let numbers = [
            ("albedo", self.albedo.is_finite()),
            ("roughness", self.roughness.is_finite()),
            ("metalness", self.metalness.is_finite()),
            ("emissive_color", self.emissive_color.is_finite()),
            ("emissive_strength", self.emissive_strength.is_finite()),
            ("opacity", self.opacity.is_finite()),
            ("uv_scale", self.uv_scale.is_finite()),
        ];
        match numbers.iter().find(|(_, finite)| !finite) {
            Some((field, _)) => Err(Error::InvalidResource(format!("'{}' is not a finite number", field))),
            None => Ok(()),
        }
    }

    /// Every texture filename referenced by the file, in field order
    pub fn texture_names(&self) -> Vec<&str> {
        [
            &self.albedo_map,
            &self.roughness_map,
            &self.metalness_map,
            &self.normal_map,
            &self.occlusion_map,
            &self.emissive_map,
            &self.opacity_mask,
            &self.depth_mask,
        ]
        .into_iter()
        .filter_map(|name| name.as_deref())
        .collect()
    }
}

#[cfg(test)]
#[path = "material_file_tests.rs"]
mod tests;
