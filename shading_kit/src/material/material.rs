/// Material - surface parameters, program selection and baked caches
///
/// A material turns its attributes into a `ProgramFlags` key, resolves the
/// matching program through the context's `ProgramCache`, refreshes the
/// baked caches its variant samples, and binds everything a draw needs.
///
/// Mutators keep derived state honest: changing an attribute that feeds a
/// cache marks that cache dirty, and changing one that feeds the program key
/// forgets the resolved programs. Reads never invalidate anything.

use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::graphics_device::{self, BlendMode, GraphicsDevice, Program, RenderState, UniformValue};
use crate::material::{
    BakeInputs, CacheKind, CacheMask, MaterialContext, MaterialFile, Renderer, SharedResources,
    TextureCaches,
};
use crate::resource::Texture;
use crate::shader::{sources, ProgramFlags};
use crate::{engine_debug, engine_error, engine_info, engine_warn};

const LOG_SOURCE: &str = "kit::Material";

/// Caches sampled by material programs (ND is read by terrain passes only)
const PROGRAM_CACHES: CacheMask = CacheMask::AR.union(CacheMask::NM).union(CacheMask::EO);

type GpuTexture = Arc<dyn graphics_device::Texture>;

// ===== MATERIAL =====

pub struct Material {
    context: Arc<MaterialContext>,
    shared: Arc<SharedResources>,
    name: String,

    albedo: Vec3,
    albedo_map: Option<Arc<Texture>>,
    roughness: f32,
    roughness_map: Option<Arc<Texture>>,
    metalness: f32,
    metalness_map: Option<Arc<Texture>>,
    normal_map: Option<Arc<Texture>>,
    occlusion_map: Option<Arc<Texture>>,
    emissive_color: Vec3,
    emissive_strength: f32,
    emissive_map: Option<Arc<Texture>>,
    opacity: f32,
    opacity_mask: Option<Arc<Texture>>,
    depth_mask: Option<Arc<Texture>>,
    uv_scale: f32,

    blend: BlendMode,
    double_sided: bool,
    depth_read: bool,
    depth_write: bool,
    cast_shadows: bool,

    dynamic_ar: bool,
    dynamic_nm: bool,
    dynamic_eo: bool,

    caches: TextureCaches,
    /// Resolved programs: base, skinned, instanced, skinned + instanced
    programs: [Option<Arc<dyn Program>>; 4],
}

impl Material {
    /// Create a material with default attributes
    ///
    /// The first material of a context creates the shared cache program.
    pub fn new(context: &Arc<MaterialContext>, name: impl Into<String>) -> Result<Self> {
        let shared = context.acquire_shared()?;
        let defaults = MaterialFile::default();

        Ok(Self {
            context: Arc::clone(context),
            shared,
            name: name.into(),

            albedo: defaults.albedo,
            albedo_map: None,
            roughness: defaults.roughness,
            roughness_map: None,
            metalness: defaults.metalness,
            metalness_map: None,
            normal_map: None,
            occlusion_map: None,
            emissive_color: defaults.emissive_color,
            emissive_strength: defaults.emissive_strength,
            emissive_map: None,
            opacity: defaults.opacity,
            opacity_mask: None,
            depth_mask: None,
            uv_scale: defaults.uv_scale,

            blend: defaults.blend,
            double_sided: defaults.double_sided,
            depth_read: defaults.depth_read,
            depth_write: defaults.depth_write,
            cast_shadows: defaults.cast_shadows,

            dynamic_ar: defaults.dynamic_ar,
            dynamic_nm: defaults.dynamic_nm,
            dynamic_eo: defaults.dynamic_eo,

            caches: TextureCaches::new(),
            programs: Default::default(),
        })
    }

    /// Name the material was created or loaded with
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Arc<MaterialContext> {
        &self.context
    }

    // ===== FILES =====

    /// Replace every attribute with the contents of a material file
    ///
    /// Textures are resolved through the context's `TextureSource` before
    /// anything is applied, so a failed load leaves the material untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let file = MaterialFile::read(path.as_ref()).map_err(|err| {
            engine_error!(LOG_SOURCE, "{}", err);
            err
        })?;
        self.apply_file(&file)
    }

    /// Apply a parsed material file
    pub fn apply_file(&mut self, file: &MaterialFile) -> Result<()> {
        let source = Arc::clone(self.context.texture_source());
        let resolve = |name: &Option<String>| -> Result<Option<Arc<Texture>>> {
            name.as_deref().map(|name| source.load_texture(name)).transpose()
        };

        let albedo_map = resolve(&file.albedo_map)?;
        let roughness_map = resolve(&file.roughness_map)?;
        let metalness_map = resolve(&file.metalness_map)?;
        let normal_map = resolve(&file.normal_map)?;
        let occlusion_map = resolve(&file.occlusion_map)?;
        let emissive_map = resolve(&file.emissive_map)?;
        let opacity_mask = resolve(&file.opacity_mask)?;
        let depth_mask = resolve(&file.depth_mask)?;

        self.albedo = file.albedo;
        self.albedo_map = albedo_map;
        self.roughness = file.roughness;
        self.roughness_map = roughness_map;
        self.metalness = file.metalness;
        self.metalness_map = metalness_map;
        self.normal_map = normal_map;
        self.occlusion_map = occlusion_map;
        self.emissive_color = file.emissive_color;
        self.emissive_strength = file.emissive_strength;
        self.emissive_map = emissive_map;
        self.opacity = file.opacity;
        self.opacity_mask = opacity_mask;
        self.depth_mask = depth_mask;
        self.uv_scale = file.uv_scale;
        self.blend = file.blend;
        self.double_sided = file.double_sided;
        self.depth_read = file.depth_read;
        self.depth_write = file.depth_write;
        self.cast_shadows = file.cast_shadows;
        self.dynamic_ar = file.dynamic_ar;
        self.dynamic_nm = file.dynamic_nm;
        self.dynamic_eo = file.dynamic_eo;

        self.invalidate(CacheMask::all(), true);
        Ok(())
    }

    /// Write every attribute to `path`
    ///
    /// # Errors
    ///
    /// `Error::Io` if the file cannot be opened for writing,
    /// `Error::InvalidResource` if an attribute is NaN or infinite.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_file().write(path).map_err(|err| {
            engine_error!(LOG_SOURCE, "Cannot save '{}' to '{}': {}", self.name, path.display(), err);
            err
        })?;
        engine_info!(LOG_SOURCE, "Saved '{}' to '{}'", self.name, path.display());
        Ok(())
    }

    /// Serializable snapshot of the attributes
    pub fn to_file(&self) -> MaterialFile {
        let filename = |texture: &Option<Arc<Texture>>| texture.as_ref().map(|t| t.filename().to_string());
        MaterialFile {
            albedo: self.albedo,
            albedo_map: filename(&self.albedo_map),
            roughness: self.roughness,
            roughness_map: filename(&self.roughness_map),
            metalness: self.metalness,
            metalness_map: filename(&self.metalness_map),
            normal_map: filename(&self.normal_map),
            occlusion_map: filename(&self.occlusion_map),
            emissive_color: self.emissive_color,
            emissive_strength: self.emissive_strength,
            emissive_map: filename(&self.emissive_map),
            opacity: self.opacity,
            opacity_mask: filename(&self.opacity_mask),
            depth_mask: filename(&self.depth_mask),
            uv_scale: self.uv_scale,
            blend: self.blend,
            double_sided: self.double_sided,
            depth_read: self.depth_read,
            depth_write: self.depth_write,
            cast_shadows: self.cast_shadows,
            dynamic_ar: self.dynamic_ar,
            dynamic_nm: self.dynamic_nm,
            dynamic_eo: self.dynamic_eo,
        }
    }

    // ===== PROGRAM SELECTION =====

    /// Program key for this material drawn with or without skin/instances
    pub fn flags(&self, skinned: bool, instanced: bool) -> ProgramFlags {
        ProgramFlags {
            skinned,
            instanced,
            forward: self.blend != BlendMode::None,
            opacity_mask: self.opacity_mask.is_some(),
            dynamic_ar: self.dynamic_ar,
            albedo_map: self.albedo_map.is_some(),
            roughness_map: self.roughness_map.is_some(),
            dynamic_nm: self.dynamic_nm,
            normal_map: self.normal_map.is_some(),
            metalness_map: self.metalness_map.is_some(),
            dynamic_eo: self.dynamic_eo,
            emissive_map: self.emissive_map.is_some(),
            occlusion_map: self.occlusion_map.is_some(),
        }
    }

    /// Caches this material maintains
    pub fn enabled_caches(&self) -> CacheMask {
        let mut mask = CacheMask::empty();
        mask.set(CacheMask::AR, self.dynamic_ar);
        mask.set(CacheMask::NM, self.dynamic_nm);
        mask.set(CacheMask::EO, self.dynamic_eo);
        mask.set(CacheMask::ND, self.depth_mask.is_some());
        mask
    }

    /// Fixed-function state of a draw with this material
    pub fn render_state(&self) -> RenderState {
        RenderState {
            blend: self.blend,
            depth_read: self.depth_read,
            depth_write: self.depth_write,
            cull_back_faces: !self.double_sided,
        }
    }

    /// Whether the program for (skinned, instanced) has been resolved
    pub fn has_program(&self, skinned: bool, instanced: bool) -> bool {
        self.programs[program_slot(skinned, instanced)].is_some()
    }

    fn resolve_program(
        &mut self,
        device: &mut dyn GraphicsDevice,
        skinned: bool,
        instanced: bool,
    ) -> Result<Arc<dyn Program>> {
        let slot = program_slot(skinned, instanced);
        if let Some(program) = &self.programs[slot] {
            return Ok(program.clone());
        }

        let flags = self.flags(skinned, instanced);
        let program = self.context.program_cache().get_program(device, flags)?;
        self.programs[slot] = Some(program.clone());
        Ok(program)
    }

    // ===== DRAW =====

    /// Bind program, textures, uniforms and render state for a draw
    ///
    /// A non-empty `skin` selects the skinned variant and a non-empty
    /// `instances` the instanced one. Dirty caches the variant samples are
    /// baked first. Calling it twice in a row leaves the device in the same
    /// state as calling it once.
    ///
    /// # Errors
    ///
    /// Program build or bake failures. Nothing is bound for the draw and the
    /// next call retries.
    pub fn use_material(
        &mut self,
        view: &Mat4,
        projection: &Mat4,
        model: &Mat4,
        skin: &[Mat4],
        instances: &[Mat4],
    ) -> Result<()> {
        let context = Arc::clone(&self.context);
        let mut guard = context.lock_device()?;
        let device: &mut dyn GraphicsDevice = &mut *guard;

        let program = self.resolve_program(device, !skin.is_empty(), !instances.is_empty())?;
        self.bake(device, PROGRAM_CACHES)?;
        self.bind(device, &program, None, &Transforms { view, projection, model, skin, instances })
    }

    /// `use_material` with the reflective program and the renderer's
    /// environment maps
    pub fn use_reflective(
        &mut self,
        renderer: &dyn Renderer,
        view: &Mat4,
        projection: &Mat4,
        model: &Mat4,
        skin: &[Mat4],
        instances: &[Mat4],
    ) -> Result<()> {
        let context = Arc::clone(&self.context);
        let mut guard = context.lock_device()?;
        let device: &mut dyn GraphicsDevice = &mut *guard;

        let flags = self.flags(!skin.is_empty(), !instances.is_empty());
        let program = context.program_cache().get_reflective_program(device, flags)?;
        self.bake(device, PROGRAM_CACHES)?;
        self.bind(device, &program, Some(renderer), &Transforms { view, projection, model, skin, instances })
    }

    fn bind(
        &self,
        device: &mut dyn GraphicsDevice,
        program: &Arc<dyn Program>,
        renderer: Option<&dyn Renderer>,
        transforms: &Transforms<'_>,
    ) -> Result<()> {
        device.use_program(program)?;

        let units: [(u32, Option<&GpuTexture>); 9] = [
            (sources::UNIT_AR, self.cache_or(self.dynamic_ar, CacheKind::Ar, &self.albedo_map)),
            (sources::UNIT_ROUGHNESS, if self.dynamic_ar { None } else { gpu(&self.roughness_map) }),
            (sources::UNIT_NM, self.cache_or(self.dynamic_nm, CacheKind::Nm, &self.normal_map)),
            (sources::UNIT_METALNESS, if self.dynamic_nm { None } else { gpu(&self.metalness_map) }),
            (sources::UNIT_EO, self.cache_or(self.dynamic_eo, CacheKind::Eo, &self.emissive_map)),
            (sources::UNIT_OCCLUSION, if self.dynamic_eo { None } else { gpu(&self.occlusion_map) }),
            (sources::UNIT_OPACITY_MASK, gpu(&self.opacity_mask)),
            (sources::UNIT_REFLECTION, renderer.and_then(|r| r.reflection_map())),
            (sources::UNIT_IRRADIANCE, renderer.and_then(|r| r.irradiance_map())),
        ];
        for (unit, texture) in units {
            device.bind_texture(unit, texture)?;
        }

        let mut uniforms = vec![
            ("u_viewMatrix", UniformValue::Mat4(*transforms.view)),
            ("u_projectionMatrix", UniformValue::Mat4(*transforms.projection)),
            ("u_modelMatrix", UniformValue::Mat4(*transforms.model)),
            ("u_uvScale", UniformValue::Float(self.uv_scale)),
            ("u_albedo", UniformValue::Vec3(self.albedo)),
            ("u_roughness", UniformValue::Float(self.roughness)),
            ("u_metalness", UniformValue::Float(self.metalness)),
            ("u_emissiveColor", UniformValue::Vec3(self.emissive_color)),
            ("u_emissiveStrength", UniformValue::Float(self.emissive_strength)),
            ("u_opacity", UniformValue::Float(self.opacity)),
            ("u_arMap", UniformValue::Int(sources::UNIT_AR as i32)),
            ("u_roughnessMap", UniformValue::Int(sources::UNIT_ROUGHNESS as i32)),
            ("u_nmMap", UniformValue::Int(sources::UNIT_NM as i32)),
            ("u_metalnessMap", UniformValue::Int(sources::UNIT_METALNESS as i32)),
            ("u_eoMap", UniformValue::Int(sources::UNIT_EO as i32)),
            ("u_occlusionMap", UniformValue::Int(sources::UNIT_OCCLUSION as i32)),
            ("u_opacityMask", UniformValue::Int(sources::UNIT_OPACITY_MASK as i32)),
        ];
        if !transforms.skin.is_empty() {
            let bones = self.clamp_palette("bone", transforms.skin, sources::MAX_BONES);
            uniforms.push(("u_bones", UniformValue::Mat4Array(bones)));
        }
        if !transforms.instances.is_empty() {
            let instances = self.clamp_palette("instance", transforms.instances, sources::MAX_INSTANCES);
            uniforms.push(("u_instanceTransforms", UniformValue::Mat4Array(instances)));
        }
        if let Some(renderer) = renderer {
            uniforms.push(("u_reflectionMap", UniformValue::Int(sources::UNIT_REFLECTION as i32)));
            uniforms.push(("u_irradianceMap", UniformValue::Int(sources::UNIT_IRRADIANCE as i32)));
            uniforms.push(("u_cameraPosition", UniformValue::Vec3(renderer.camera_position())));
            uniforms.push(("u_environmentStrength", UniformValue::Float(renderer.environment_strength())));
        }
        for (name, value) in uniforms {
            device.set_uniform(name, value)?;
        }

        device.set_render_state(self.render_state())
    }

    /// Baked cache of `kind` when `dynamic`, else the individual map
    fn cache_or<'a>(
        &'a self,
        dynamic: bool,
        kind: CacheKind,
        map: &'a Option<Arc<Texture>>,
    ) -> Option<&'a GpuTexture> {
        if dynamic { self.caches.texture(kind) } else { gpu(map) }
    }

    fn clamp_palette<'a>(&self, what: &str, palette: &'a [Mat4], max: usize) -> &'a [Mat4] {
        if palette.len() > max {
            engine_warn!(
                LOG_SOURCE,
                "'{}': {} {} transforms, only the first {} are uploaded",
                self.name,
                palette.len(),
                what,
                max
            );
            &palette[..max]
        } else {
            palette
        }
    }

    // ===== CACHES =====

    /// Bake every enabled dirty cache now
    pub fn assert_cache(&mut self) -> Result<()> {
        let context = Arc::clone(&self.context);
        let mut guard = context.lock_device()?;
        self.bake(&mut *guard, CacheMask::all())
    }

    /// Baked AR cache, `None` before its first bake
    pub fn ar_cache(&self) -> Option<&GpuTexture> {
        self.caches.texture(CacheKind::Ar)
    }

    /// Baked NM cache, `None` before its first bake
    pub fn nm_cache(&self) -> Option<&GpuTexture> {
        self.caches.texture(CacheKind::Nm)
    }

    /// Baked EO cache, `None` before its first bake
    pub fn eo_cache(&self) -> Option<&GpuTexture> {
        self.caches.texture(CacheKind::Eo)
    }

    /// ND cache, baked first if dirty; `None` without a depth mask
    pub fn nd_cache(&mut self) -> Result<Option<GpuTexture>> {
        if self.depth_mask.is_none() {
            return Ok(None);
        }
        let context = Arc::clone(&self.context);
        let mut guard = context.lock_device()?;
        self.bake(&mut *guard, CacheMask::ND)?;
        Ok(self.caches.texture(CacheKind::Nd).cloned())
    }

    /// Dirty bits and bake counters
    pub fn caches(&self) -> &TextureCaches {
        &self.caches
    }

    fn bake(&mut self, device: &mut dyn GraphicsDevice, wanted: CacheMask) -> Result<()> {
        let pending = wanted & self.enabled_caches() & self.caches.dirty();
        if pending.is_empty() {
            return Ok(());
        }

        let inputs = self.bake_inputs();
        let resolution = self.context.config().cache_resolution;
        for kind in CacheKind::ALL {
            if pending.contains(kind.mask()) {
                self.caches.refresh(
                    kind,
                    &inputs,
                    device,
                    self.shared.cache_program(),
                    resolution,
                    &self.name,
                )?;
            }
        }
        Ok(())
    }

    fn bake_inputs(&self) -> BakeInputs {
        BakeInputs {
            albedo: self.albedo,
            albedo_map: self.albedo_map.clone(),
            roughness: self.roughness,
            roughness_map: self.roughness_map.clone(),
            metalness: self.metalness,
            metalness_map: self.metalness_map.clone(),
            normal_map: self.normal_map.clone(),
            occlusion_map: self.occlusion_map.clone(),
            emissive_color: self.emissive_color,
            emissive_strength: self.emissive_strength,
            emissive_map: self.emissive_map.clone(),
            depth_mask: self.depth_mask.clone(),
            uv_scale: self.uv_scale,
        }
    }

    fn invalidate(&mut self, caches: CacheMask, programs: bool) {
        self.caches.mark_dirty(caches);
        if programs {
            self.programs = Default::default();
        }
    }

    // ===== ATTRIBUTES =====

    pub fn albedo(&self) -> Vec3 {
        self.albedo
    }

    pub fn set_albedo(&mut self, albedo: Vec3) {
        self.albedo = albedo;
        self.invalidate(CacheMask::AR, false);
    }

    pub fn albedo_map(&self) -> Option<&Arc<Texture>> {
        self.albedo_map.as_ref()
    }

    pub fn set_albedo_map(&mut self, map: Option<Arc<Texture>>) {
        self.albedo_map = map;
        self.invalidate(CacheMask::AR, true);
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.roughness = roughness;
        self.invalidate(CacheMask::AR, false);
    }

    pub fn roughness_map(&self) -> Option<&Arc<Texture>> {
        self.roughness_map.as_ref()
    }

    pub fn set_roughness_map(&mut self, map: Option<Arc<Texture>>) {
        self.roughness_map = map;
        self.invalidate(CacheMask::AR, true);
    }

    pub fn metalness(&self) -> f32 {
        self.metalness
    }

    pub fn set_metalness(&mut self, metalness: f32) {
        self.metalness = metalness;
        self.invalidate(CacheMask::NM, false);
    }

    pub fn metalness_map(&self) -> Option<&Arc<Texture>> {
        self.metalness_map.as_ref()
    }

    pub fn set_metalness_map(&mut self, map: Option<Arc<Texture>>) {
        self.metalness_map = map;
        self.invalidate(CacheMask::NM, true);
    }

    pub fn normal_map(&self) -> Option<&Arc<Texture>> {
        self.normal_map.as_ref()
    }

    /// Feeds both NM and ND
    pub fn set_normal_map(&mut self, map: Option<Arc<Texture>>) {
        self.normal_map = map;
        self.invalidate(CacheMask::NM | CacheMask::ND, true);
    }

    pub fn occlusion_map(&self) -> Option<&Arc<Texture>> {
        self.occlusion_map.as_ref()
    }

    pub fn set_occlusion_map(&mut self, map: Option<Arc<Texture>>) {
        self.occlusion_map = map;
        self.invalidate(CacheMask::EO, true);
    }

    pub fn emissive_color(&self) -> Vec3 {
        self.emissive_color
    }

    pub fn set_emissive_color(&mut self, color: Vec3) {
        self.emissive_color = color;
        self.invalidate(CacheMask::EO, false);
    }

    pub fn emissive_strength(&self) -> f32 {
        self.emissive_strength
    }

    pub fn set_emissive_strength(&mut self, strength: f32) {
        self.emissive_strength = strength;
        self.invalidate(CacheMask::EO, false);
    }

    pub fn emissive_map(&self) -> Option<&Arc<Texture>> {
        self.emissive_map.as_ref()
    }

    pub fn set_emissive_map(&mut self, map: Option<Arc<Texture>>) {
        self.emissive_map = map;
        self.invalidate(CacheMask::EO, true);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    pub fn opacity_mask(&self) -> Option<&Arc<Texture>> {
        self.opacity_mask.as_ref()
    }

    pub fn set_opacity_mask(&mut self, mask: Option<Arc<Texture>>) {
        self.opacity_mask = mask;
        self.invalidate(CacheMask::empty(), true);
    }

    pub fn depth_mask(&self) -> Option<&Arc<Texture>> {
        self.depth_mask.as_ref()
    }

    /// Setting a depth mask enables the ND cache
    pub fn set_depth_mask(&mut self, mask: Option<Arc<Texture>>) {
        self.depth_mask = mask;
        self.invalidate(CacheMask::ND, false);
    }

    pub fn uv_scale(&self) -> f32 {
        self.uv_scale
    }

    pub fn set_uv_scale(&mut self, scale: f32) {
        self.uv_scale = scale;
        self.invalidate(CacheMask::ND, false);
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    /// Any blend other than `None` moves the material to the forward pass
    pub fn set_blend(&mut self, blend: BlendMode) {
        self.blend = blend;
        self.invalidate(CacheMask::empty(), true);
    }

    pub fn double_sided(&self) -> bool {
        self.double_sided
    }

    pub fn set_double_sided(&mut self, double_sided: bool) {
        self.double_sided = double_sided;
    }

    pub fn depth_read(&self) -> bool {
        self.depth_read
    }

    pub fn set_depth_read(&mut self, depth_read: bool) {
        self.depth_read = depth_read;
    }

    pub fn depth_write(&self) -> bool {
        self.depth_write
    }

    pub fn set_depth_write(&mut self, depth_write: bool) {
        self.depth_write = depth_write;
    }

    pub fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    pub fn set_cast_shadows(&mut self, cast_shadows: bool) {
        self.cast_shadows = cast_shadows;
    }

    pub fn dynamic_ar(&self) -> bool {
        self.dynamic_ar
    }

    pub fn set_dynamic_ar(&mut self, dynamic: bool) {
        if self.dynamic_ar != dynamic {
            self.dynamic_ar = dynamic;
            self.invalidate(CacheMask::AR, true);
        }
    }

    pub fn dynamic_nm(&self) -> bool {
        self.dynamic_nm
    }

    pub fn set_dynamic_nm(&mut self, dynamic: bool) {
        if self.dynamic_nm != dynamic {
            self.dynamic_nm = dynamic;
            self.invalidate(CacheMask::NM, true);
        }
    }

    pub fn dynamic_eo(&self) -> bool {
        self.dynamic_eo
    }

    pub fn set_dynamic_eo(&mut self, dynamic: bool) {
        if self.dynamic_eo != dynamic {
            self.dynamic_eo = dynamic;
            self.invalidate(CacheMask::EO, true);
        }
    }
}

impl Drop for Material {
    fn drop(&mut self) {
        engine_debug!(LOG_SOURCE, "Material '{}' released", self.name);
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("name", &self.name)
            .field("flags", &self.flags(false, false))
            .field("dirty", &self.caches.dirty())
            .finish()
    }
}

// ===== HELPERS =====

struct Transforms<'a> {
    view: &'a Mat4,
    projection: &'a Mat4,
    model: &'a Mat4,
    skin: &'a [Mat4],
    instances: &'a [Mat4],
}

fn program_slot(skinned: bool, instanced: bool) -> usize {
    (skinned as usize) | ((instanced as usize) << 1)
}

fn gpu(texture: &Option<Arc<Texture>>) -> Option<&GpuTexture> {
    texture.as_ref().map(|t| t.gpu_texture())
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
