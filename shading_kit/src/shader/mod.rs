/// Shader module - stages, program variants and their GLSL sources

pub mod program_flags;
pub mod shader_unit;
pub mod program_cache;
pub mod sources;

pub use program_flags::ProgramFlags;
pub use shader_unit::ShaderUnit;
pub use program_cache::ProgramCache;
