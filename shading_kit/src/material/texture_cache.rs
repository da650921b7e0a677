/// Baked packed-channel textures of a material
///
/// Four independent caches, each rendered by a full-screen pass of the
/// shared cache program into its own pixel buffer:
///
/// - AR: albedo (rgb) + roughness (a)
/// - NM: normal (rgb) + metalness (a)
/// - EO: emissive (rgb) + occlusion (a)
/// - ND: normal (rgb) + depth mask (a), tiled by the uv scale (terrain)
///
/// Every cache has its own dirty bit. Baking one never reads or clears
/// another's.

use std::sync::Arc;

use bitflags::bitflags;
use glam::Vec3;

use crate::error::Result;
use crate::graphics_device::{
    BlendMode, GraphicsDevice, PixelBuffer, PixelBufferDesc, Program, RenderState, Texture,
    TextureFormat, UniformValue,
};
use crate::resource;
use crate::shader::sources;
use crate::engine_debug;

bitflags! {
    /// A set of caches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CacheMask: u8 {
        const AR = 1 << 0;
        const NM = 1 << 1;
        const ND = 1 << 2;
        const EO = 1 << 3;
    }
}

/// One packed cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Ar,
    Nm,
    Eo,
    Nd,
}

impl CacheKind {
    pub const ALL: [CacheKind; 4] = [CacheKind::Ar, CacheKind::Nm, CacheKind::Eo, CacheKind::Nd];

    pub fn mask(self) -> CacheMask {
        match self {
            CacheKind::Ar => CacheMask::AR,
            CacheKind::Nm => CacheMask::NM,
            CacheKind::Eo => CacheMask::EO,
            CacheKind::Nd => CacheMask::ND,
        }
    }

    /// Short name, also the suffix of the cache's render-target label
    pub fn label(self) -> &'static str {
        match self {
            CacheKind::Ar => "AR",
            CacheKind::Nm => "NM",
            CacheKind::Eo => "EO",
            CacheKind::Nd => "ND",
        }
    }

    /// Value of `u_cacheKind` in the cache program
    fn shader_code(self) -> i32 {
        match self {
            CacheKind::Ar => 0,
            CacheKind::Nm => 1,
            CacheKind::Eo => 2,
            CacheKind::Nd => 3,
        }
    }

    fn index(self) -> usize {
        self.shader_code() as usize
    }

    fn format(self) -> TextureFormat {
        match self {
            CacheKind::Nd => TextureFormat::R16G16B16A16_SFLOAT,
            _ => TextureFormat::R8G8B8A8_UNORM,
        }
    }
}

/// Material inputs read by the cache program
#[derive(Debug, Clone, Default)]
pub struct BakeInputs {
    pub albedo: Vec3,
    pub albedo_map: Option<Arc<resource::Texture>>,
    pub roughness: f32,
    pub roughness_map: Option<Arc<resource::Texture>>,
    pub metalness: f32,
    pub metalness_map: Option<Arc<resource::Texture>>,
    pub normal_map: Option<Arc<resource::Texture>>,
    pub occlusion_map: Option<Arc<resource::Texture>>,
    pub emissive_color: Vec3,
    pub emissive_strength: f32,
    pub emissive_map: Option<Arc<resource::Texture>>,
    pub depth_mask: Option<Arc<resource::Texture>>,
    pub uv_scale: f32,
}

#[derive(Default)]
struct BakedCache {
    buffer: Option<Arc<dyn PixelBuffer>>,
    bake_count: u32,
}

/// The four caches of one material and their dirty bits
pub struct TextureCaches {
    caches: [BakedCache; 4],
    dirty: CacheMask,
}

impl Default for TextureCaches {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCaches {
    /// Every cache starts dirty and without a render target
    pub fn new() -> Self {
        Self {
            caches: Default::default(),
            dirty: CacheMask::all(),
        }
    }

    pub fn is_dirty(&self, kind: CacheKind) -> bool {
        self.dirty.contains(kind.mask())
    }

    pub fn dirty(&self) -> CacheMask {
        self.dirty
    }

    pub fn mark_dirty(&mut self, mask: CacheMask) {
        self.dirty.insert(mask);
    }

    /// Number of times `kind` has been rendered
    pub fn bake_count(&self, kind: CacheKind) -> u32 {
        self.caches[kind.index()].bake_count
    }

    /// Baked texture of `kind`, `None` before its first bake
    pub fn texture(&self, kind: CacheKind) -> Option<&Arc<dyn Texture>> {
        self.caches[kind.index()]
            .buffer
            .as_ref()
            .map(|buffer| buffer.color_texture())
    }

    /// Re-render `kind` if it is dirty
    ///
    /// The render target bound on entry is bound again on return, whether
    /// the pass succeeded or not. The dirty bit is only cleared on success.
    pub(crate) fn refresh(
        &mut self,
        kind: CacheKind,
        inputs: &BakeInputs,
        device: &mut dyn GraphicsDevice,
        program: &Arc<dyn Program>,
        resolution: u32,
        owner: &str,
    ) -> Result<()> {
        if !self.is_dirty(kind) {
            return Ok(());
        }

        let cache = &mut self.caches[kind.index()];
        let buffer = match &cache.buffer {
            Some(buffer) => buffer.clone(),
            None => {
                let buffer = device.create_pixel_buffer(PixelBufferDesc {
                    width: resolution,
                    height: resolution,
                    format: kind.format(),
                    label: format!("{}:{}", owner, kind.label()),
                })?;
                cache.buffer = Some(buffer.clone());
                buffer
            }
        };

        let previous = device.current_pixel_buffer();
        device.bind_pixel_buffer(Some(&buffer))?;
        let pass = render_pass(kind, inputs, device, program);
        device.bind_pixel_buffer(previous.as_ref())?;
        pass?;

        cache.bake_count += 1;
        self.dirty.remove(kind.mask());
        engine_debug!("kit::TextureCaches", "Baked {} cache of '{}'", kind.label(), owner);
        Ok(())
    }
}

fn bind_source(
    device: &mut dyn GraphicsDevice,
    unit: u32,
    texture: Option<&Arc<resource::Texture>>,
) -> Result<bool> {
    device.bind_texture(unit, texture.map(|t| t.gpu_texture()))?;
    Ok(texture.is_some())
}

fn pick(wanted: bool, texture: &Option<Arc<resource::Texture>>) -> Option<&Arc<resource::Texture>> {
    if wanted { texture.as_ref() } else { None }
}

fn render_pass(
    kind: CacheKind,
    inputs: &BakeInputs,
    device: &mut dyn GraphicsDevice,
    program: &Arc<dyn Program>,
) -> Result<()> {
    device.set_render_state(RenderState {
        blend: BlendMode::None,
        depth_read: false,
        depth_write: false,
        cull_back_faces: false,
    })?;
    device.use_program(program)?;

    // Only the sources of this cache are bound; the others are cleared
    let (ar, nm, eo, nd) = (
        kind == CacheKind::Ar,
        kind == CacheKind::Nm,
        kind == CacheKind::Eo,
        kind == CacheKind::Nd,
    );

    let has_albedo = bind_source(device, sources::BAKE_UNIT_ALBEDO, pick(ar, &inputs.albedo_map))?;
    let has_roughness = bind_source(device, sources::BAKE_UNIT_ROUGHNESS, pick(ar, &inputs.roughness_map))?;
    let has_normal = bind_source(device, sources::BAKE_UNIT_NORMAL, pick(nm || nd, &inputs.normal_map))?;
    let has_metalness = bind_source(device, sources::BAKE_UNIT_METALNESS, pick(nm, &inputs.metalness_map))?;
    let has_emissive = bind_source(device, sources::BAKE_UNIT_EMISSIVE, pick(eo, &inputs.emissive_map))?;
    let has_occlusion = bind_source(device, sources::BAKE_UNIT_OCCLUSION, pick(eo, &inputs.occlusion_map))?;
    let has_depth = bind_source(device, sources::BAKE_UNIT_DEPTH_MASK, pick(nd, &inputs.depth_mask))?;

    let uniforms = [
        ("u_cacheKind", UniformValue::Int(kind.shader_code())),
        ("u_uvScale", UniformValue::Float(inputs.uv_scale)),
        ("u_albedo", UniformValue::Vec3(inputs.albedo)),
        ("u_roughness", UniformValue::Float(inputs.roughness)),
        ("u_metalness", UniformValue::Float(inputs.metalness)),
        ("u_emissiveColor", UniformValue::Vec3(inputs.emissive_color)),
        ("u_emissiveStrength", UniformValue::Float(inputs.emissive_strength)),
        ("u_hasAlbedoMap", UniformValue::Bool(has_albedo)),
        ("u_hasRoughnessMap", UniformValue::Bool(has_roughness)),
        ("u_hasNormalMap", UniformValue::Bool(has_normal)),
        ("u_hasMetalnessMap", UniformValue::Bool(has_metalness)),
        ("u_hasEmissiveMap", UniformValue::Bool(has_emissive)),
        ("u_hasOcclusionMap", UniformValue::Bool(has_occlusion)),
        ("u_hasDepthMask", UniformValue::Bool(has_depth)),
        ("u_albedoMap", UniformValue::Int(sources::BAKE_UNIT_ALBEDO as i32)),
        ("u_roughnessMap", UniformValue::Int(sources::BAKE_UNIT_ROUGHNESS as i32)),
        ("u_normalMap", UniformValue::Int(sources::BAKE_UNIT_NORMAL as i32)),
        ("u_metalnessMap", UniformValue::Int(sources::BAKE_UNIT_METALNESS as i32)),
        ("u_emissiveMap", UniformValue::Int(sources::BAKE_UNIT_EMISSIVE as i32)),
        ("u_occlusionMap", UniformValue::Int(sources::BAKE_UNIT_OCCLUSION as i32)),
        ("u_depthMask", UniformValue::Int(sources::BAKE_UNIT_DEPTH_MASK as i32)),
    ];
    for (name, value) in uniforms {
        device.set_uniform(name, value)?;
    }

    device.draw_fullscreen_quad()
}

#[cfg(test)]
#[path = "texture_cache_tests.rs"]
mod tests;
