//! Error types for the shading kit
//!
//! This module defines the error types used throughout the crate,
//! including GPU backend failures, shader diagnostics and material files.

use std::fmt;

/// Result type for shading kit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Shading kit errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL, Vulkan, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, pixel buffer, program, etc.)
    InvalidResource(String),

    /// Initialization failed (context, shared resources)
    InitializationFailed(String),

    /// A file could not be opened, read or written
    Io(String),

    /// A shader stage was rejected by the compiler
    ShaderCompilationFailed {
        /// Stage name ("vertex", "fragment", "geometry")
        stage: String,
        /// Compiler diagnostic log
        log: String,
    },

    /// Compiled stages could not be linked into a program
    ProgramLinkFailed(String),

    /// A material file is missing, unreadable or malformed
    MaterialLoad(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::ShaderCompilationFailed { stage, log } => {
                write!(f, "{}-shader compilation failed: {}", stage, log)
            }
            Error::ProgramLinkFailed(msg) => write!(f, "Program link failed: {}", msg),
            Error::MaterialLoad(msg) => write!(f, "Material load failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MaterialLoad(err.to_string())
    }
}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("kit::Material", "Cache '{}' has no target", kind);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::kit::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return early with an `Error::BackendError`
///
/// # Example
///
/// ```ignore
/// engine_bail!("kit::ProgramCache", "Variant {:?} has no stages", flags);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Lock `mutex`, turning poisoning into a logged `Error::BackendError`
pub(crate) fn lock<'a, T: ?Sized>(
    mutex: &'a std::sync::Mutex<T>,
    source: &str,
    what: &str,
) -> Result<std::sync::MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| crate::engine_err!(source, "{} lock poisoned", what))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
