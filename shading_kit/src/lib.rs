/*!
# Shading Kit

Material subsystem for a real-time renderer.

A material binds surface parameters (albedo, roughness, metalness, normal,
occlusion, emissive and opacity inputs) to a shader variant picked from a
set of runtime feature flags, and keeps packed-channel texture caches baked
on demand.

## Architecture

- **GraphicsDevice**: trait over the native graphics API (shaders, programs,
  texture units, pixel buffers, full-screen passes)
- **ShaderUnit**: one compiled shader stage with diagnostics
- **ProgramCache**: one linked program per distinct `ProgramFlags`
- **TextureCaches**: the AR / NM / EO / ND baked caches of a material
- **Material**: attributes, program selection, cache refresh, draw binding
- **MaterialContext**: device, program cache, load registry and shared
  cache-baking resources of one graphics context

Backends implement `GraphicsDevice`; nothing here talks to a GPU directly.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod resource;
pub mod shader;
pub mod material;

// Main kit namespace module
pub mod kit {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade
    pub use crate::engine::Engine;

    // Central types
    pub use crate::material::{Config, Material, MaterialContext, SharedMaterial};
    pub use crate::shader::{ProgramCache, ProgramFlags, ShaderUnit};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Graphics device sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }

    // Material sub-module
    pub mod material {
        pub use crate::material::*;
    }
}

// Re-export math library at crate root
pub use glam;
