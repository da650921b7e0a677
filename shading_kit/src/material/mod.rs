/// Material module - materials, their caches, files and shared context

mod context;
mod material;
pub mod material_file;
pub mod registry;
pub mod renderer;
pub mod texture_cache;

pub use context::{Config, MaterialContext, SharedResources};
pub use material::Material;
pub use material_file::MaterialFile;
pub use registry::{MaterialRegistry, SharedMaterial};
pub use renderer::Renderer;
pub use texture_cache::{BakeInputs, CacheKind, CacheMask, TextureCaches};

#[cfg(test)]
pub(crate) mod test_support;
