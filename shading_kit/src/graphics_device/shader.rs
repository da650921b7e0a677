/// Shader trait and compile status

use std::fmt;

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment/Pixel shader
    Fragment,
    /// Geometry shader
    Geometry,
}

impl ShaderStage {
    /// Lowercase stage name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a compile request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderCompileStatus {
    /// Whether the driver accepted the source
    pub success: bool,
    /// Driver info log (may be non-empty on success: warnings)
    pub log: String,
}

/// Shader object trait
///
/// Implemented by backend-specific shader objects. The object is created
/// empty; source can be replaced any number of times before compiling.
/// The object is destroyed when dropped.
pub trait Shader: Send + Sync {
    /// Stage this object was created for
    fn stage(&self) -> ShaderStage;

    /// Replace the source text handed to the driver (does not compile)
    fn set_source(&self, source: &str);

    /// Compile the current source
    fn compile(&self) -> ShaderCompileStatus;
}
