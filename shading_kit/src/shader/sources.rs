//! GLSL sources for material programs and the cache-baking program
//!
//! Variant selection is done with the preprocessor: `compose` prepends the
//! version directive and one `#define` per enabled switch to a shared body.
//! The same flags always produce byte-identical source.

use crate::shader::ProgramFlags;

// ===== TEXTURE UNITS =====

/// AR cache, or the albedo map when AR is not dynamic
pub const UNIT_AR: u32 = 0;
pub const UNIT_ROUGHNESS: u32 = 1;
/// NM cache, or the normal map when NM is not dynamic
pub const UNIT_NM: u32 = 2;
pub const UNIT_METALNESS: u32 = 3;
/// EO cache, or the emissive map when EO is not dynamic
pub const UNIT_EO: u32 = 4;
pub const UNIT_OCCLUSION: u32 = 5;
pub const UNIT_OPACITY_MASK: u32 = 6;
pub const UNIT_REFLECTION: u32 = 7;
pub const UNIT_IRRADIANCE: u32 = 8;

/// Source units while baking caches
pub const BAKE_UNIT_ALBEDO: u32 = 0;
pub const BAKE_UNIT_ROUGHNESS: u32 = 1;
pub const BAKE_UNIT_NORMAL: u32 = 2;
pub const BAKE_UNIT_METALNESS: u32 = 3;
pub const BAKE_UNIT_EMISSIVE: u32 = 4;
pub const BAKE_UNIT_OCCLUSION: u32 = 5;
pub const BAKE_UNIT_DEPTH_MASK: u32 = 6;

/// Size of the bone palette uniform array
pub const MAX_BONES: usize = 128;
/// Size of the instance transform uniform array
pub const MAX_INSTANCES: usize = 256;

/// Prefix `body` with a version directive and the given defines
pub fn compose(glsl_version: u32, defines: &[&str], body: &str) -> String {
    let mut source = format!("#version {} core\n", glsl_version);
    for define in defines {
        source.push_str("#define ");
        source.push_str(define);
        source.push('\n');
    }
    source.push_str(body);
    source
}

/// Vertex and fragment source for a material variant
pub fn material_sources(glsl_version: u32, flags: ProgramFlags, reflective: bool) -> (String, String) {
    let mut defines = flags.defines();
    if reflective {
        defines.push("IS_REFLECTIVE");
    }
    let limits = format!(
        "#define MAX_BONES {}\n#define MAX_INSTANCES {}\n",
        MAX_BONES, MAX_INSTANCES
    );
    let vertex = compose(glsl_version, &defines, &(limits + MATERIAL_VERTEX));
    let fragment = compose(glsl_version, &defines, MATERIAL_FRAGMENT);
    (vertex, fragment)
}

/// Vertex and fragment source for the shared cache-baking program
pub fn cache_sources(glsl_version: u32) -> (String, String) {
    (
        compose(glsl_version, &[], FULLSCREEN_VERTEX),
        compose(glsl_version, &[], CACHE_FRAGMENT),
    )
}

const MATERIAL_VERTEX: &str = r#"
layout (location = 0) in vec3 in_position;
layout (location = 1) in vec2 in_texCoords;
layout (location = 2) in vec3 in_normal;
layout (location = 3) in vec3 in_tangent;
#ifdef IS_SKINNED
layout (location = 4) in ivec4 in_boneIds;
layout (location = 5) in vec4 in_boneWeights;
uniform mat4 u_bones[MAX_BONES];
#endif
#ifdef IS_INSTANCED
uniform mat4 u_instanceTransforms[MAX_INSTANCES];
#endif

uniform mat4 u_viewMatrix;
uniform mat4 u_projectionMatrix;
uniform mat4 u_modelMatrix;
uniform float u_uvScale;

out vec2 v_texCoords;
out vec3 v_worldPosition;
out mat3 v_tbn;

void main()
{
    mat4 model = u_modelMatrix;
#ifdef IS_INSTANCED
    model = model * u_instanceTransforms[gl_InstanceID];
#endif
    vec4 position = vec4(in_position, 1.0);
    vec3 normal = in_normal;
    vec3 tangent = in_tangent;
#ifdef IS_SKINNED
    mat4 skin = u_bones[in_boneIds.x] * in_boneWeights.x
              + u_bones[in_boneIds.y] * in_boneWeights.y
              + u_bones[in_boneIds.z] * in_boneWeights.z
              + u_bones[in_boneIds.w] * in_boneWeights.w;
    position = skin * position;
    normal = mat3(skin) * normal;
    tangent = mat3(skin) * tangent;
#endif
    vec4 world = model * position;
    vec3 n = normalize(mat3(model) * normal);
    vec3 t = normalize(mat3(model) * tangent);
    v_tbn = mat3(t, cross(n, t), n);
    v_worldPosition = world.xyz;
    v_texCoords = in_texCoords * u_uvScale;
    gl_Position = u_projectionMatrix * u_viewMatrix * world;
}
"#;

const MATERIAL_FRAGMENT: &str = r#"
in vec2 v_texCoords;
in vec3 v_worldPosition;
in mat3 v_tbn;

uniform vec3 u_albedo;
uniform float u_roughness;
uniform float u_metalness;
uniform vec3 u_emissiveColor;
uniform float u_emissiveStrength;
uniform float u_opacity;

uniform sampler2D u_arMap;
uniform sampler2D u_roughnessMap;
uniform sampler2D u_nmMap;
uniform sampler2D u_metalnessMap;
uniform sampler2D u_eoMap;
uniform sampler2D u_occlusionMap;
uniform sampler2D u_opacityMask;

#ifdef IS_REFLECTIVE
uniform samplerCube u_reflectionMap;
uniform samplerCube u_irradianceMap;
uniform vec3 u_cameraPosition;
uniform float u_environmentStrength;
#endif

#if defined(IS_FORWARD) || defined(IS_REFLECTIVE)
layout (location = 0) out vec4 out_color;
#else
layout (location = 0) out vec4 out_AR;
layout (location = 1) out vec4 out_NM;
layout (location = 2) out vec4 out_EO;
#endif

void main()
{
#ifdef HAS_OPACITY_MASK
    if (texture(u_opacityMask, v_texCoords).r < 0.5) discard;
#endif

#ifdef DYNAMIC_AR
    vec4 ar = texture(u_arMap, v_texCoords);
    vec3 albedo = ar.rgb;
    float roughness = ar.a;
#else
    vec3 albedo = u_albedo;
    float roughness = u_roughness;
  #ifdef HAS_ALBEDO_MAP
    albedo *= texture(u_arMap, v_texCoords).rgb;
  #endif
  #ifdef HAS_ROUGHNESS_MAP
    roughness *= texture(u_roughnessMap, v_texCoords).r;
  #endif
#endif

#ifdef DYNAMIC_NM
    vec4 nm = texture(u_nmMap, v_texCoords);
    vec3 normal = normalize(v_tbn * (nm.xyz * 2.0 - 1.0));
    float metalness = nm.a;
#else
    vec3 normal = v_tbn[2];
    float metalness = u_metalness;
  #ifdef HAS_NORMAL_MAP
    normal = normalize(v_tbn * (texture(u_nmMap, v_texCoords).xyz * 2.0 - 1.0));
  #endif
  #ifdef HAS_METALNESS_MAP
    metalness *= texture(u_metalnessMap, v_texCoords).r;
  #endif
#endif

#ifdef DYNAMIC_EO
    vec4 eo = texture(u_eoMap, v_texCoords);
    vec3 emissive = eo.rgb;
    float occlusion = eo.a;
#else
    vec3 emissive = u_emissiveColor * u_emissiveStrength;
    float occlusion = 1.0;
  #ifdef HAS_EMISSIVE_MAP
    emissive *= texture(u_eoMap, v_texCoords).rgb;
  #endif
  #ifdef HAS_OCCLUSION_MAP
    occlusion = texture(u_occlusionMap, v_texCoords).r;
  #endif
#endif

#ifdef IS_REFLECTIVE
    vec3 view = normalize(v_worldPosition - u_cameraPosition);
    vec3 reflected = textureLod(u_reflectionMap, reflect(view, normal), roughness * 8.0).rgb;
    vec3 irradiance = texture(u_irradianceMap, normal).rgb;
    vec3 diffuse = albedo * irradiance * (1.0 - metalness);
    vec3 specular = reflected * mix(vec3(0.04), albedo, metalness);
    vec3 lit = (diffuse + specular) * occlusion * u_environmentStrength + emissive;
    out_color = vec4(lit, u_opacity);
#elif defined(IS_FORWARD)
    out_color = vec4(albedo * occlusion + emissive, u_opacity);
#else
    out_AR = vec4(albedo, roughness);
    out_NM = vec4(normal * 0.5 + 0.5, metalness);
    out_EO = vec4(emissive, occlusion);
#endif
}
"#;

const FULLSCREEN_VERTEX: &str = r#"
out vec2 v_texCoords;

void main()
{
    vec2 corner = vec2(float((gl_VertexID << 1) & 2), float(gl_VertexID & 2));
    v_texCoords = corner;
    gl_Position = vec4(corner * 2.0 - 1.0, 0.0, 1.0);
}
"#;

const CACHE_FRAGMENT: &str = r#"
in vec2 v_texCoords;

// 0 = AR, 1 = NM, 2 = EO, 3 = ND
uniform int u_cacheKind;
uniform float u_uvScale;

uniform vec3 u_albedo;
uniform float u_roughness;
uniform float u_metalness;
uniform vec3 u_emissiveColor;
uniform float u_emissiveStrength;

uniform bool u_hasAlbedoMap;
uniform bool u_hasRoughnessMap;
uniform bool u_hasNormalMap;
uniform bool u_hasMetalnessMap;
uniform bool u_hasEmissiveMap;
uniform bool u_hasOcclusionMap;
uniform bool u_hasDepthMask;

uniform sampler2D u_albedoMap;
uniform sampler2D u_roughnessMap;
uniform sampler2D u_normalMap;
uniform sampler2D u_metalnessMap;
uniform sampler2D u_emissiveMap;
uniform sampler2D u_occlusionMap;
uniform sampler2D u_depthMask;

layout (location = 0) out vec4 out_color;

vec3 sampleNormal(vec2 uv)
{
    return u_hasNormalMap ? texture(u_normalMap, uv).rgb : vec3(0.5, 0.5, 1.0);
}

void main()
{
    vec2 uv = v_texCoords;
    if (u_cacheKind == 0)
    {
        vec3 albedo = u_albedo * (u_hasAlbedoMap ? texture(u_albedoMap, uv).rgb : vec3(1.0));
        float roughness = u_roughness * (u_hasRoughnessMap ? texture(u_roughnessMap, uv).r : 1.0);
        out_color = vec4(albedo, roughness);
    }
    else if (u_cacheKind == 1)
    {
        float metalness = u_metalness * (u_hasMetalnessMap ? texture(u_metalnessMap, uv).r : 1.0);
        out_color = vec4(sampleNormal(uv), metalness);
    }
    else if (u_cacheKind == 2)
    {
        vec3 emissive = u_emissiveColor * u_emissiveStrength;
        if (u_hasEmissiveMap) emissive *= texture(u_emissiveMap, uv).rgb;
        float occlusion = u_hasOcclusionMap ? texture(u_occlusionMap, uv).r : 1.0;
        out_color = vec4(emissive, occlusion);
    }
    else
    {
        vec2 tiled = uv * u_uvScale;
        float depth = u_hasDepthMask ? texture(u_depthMask, tiled).r : 1.0;
        out_color = vec4(sampleNormal(tiled), depth);
    }
}
"#;

#[cfg(test)]
#[path = "sources_tests.rs"]
mod tests;
