//! Error types for the Galaxy3D shader system
//!
//! This module defines the error type shared by keyword management, variant
//! compilation/reflection, pass switching and the offline shader compiler.

use std::fmt;
use crate::renderer::ShaderStage;

/// Result type for Galaxy3D shader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D shader errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed `#pragma` directive (1-based line in the shader source)
    ParseError { line: usize, message: String },

    /// Cross-compilation or bytecode compilation of one variant failed
    CompileError { stage: ShaderStage, keywords: String, diagnostic: String },

    /// Backend reflection of one variant failed
    ReflectError { stage: ShaderStage, keywords: String, message: String },

    /// No variant registered for the requested keyword set
    LookupMiss { stage: ShaderStage, keywords: String },

    /// Operation is not valid in the current state
    StateError(String),

    /// Stage is not handled by this component (compute in passes)
    UnsupportedStage(ShaderStage),

    /// Shader parameter write rejected (size or type mismatch)
    InvalidParameter(String),

    /// Invalid compiler or engine configuration
    InvalidConfig(String),

    /// Backend-specific error (D3D11, Vulkan, cross compiler, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (shader, buffer, texture, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, renderer, subsystems)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ParseError { line, message } =>
                write!(f, "Parse error (line {}): {}", line, message),
            Error::CompileError { stage, keywords, diagnostic } =>
                write!(f, "Compile error [{} {}]: {}", stage, keywords, diagnostic),
            Error::ReflectError { stage, keywords, message } =>
                write!(f, "Reflect error [{} {}]: {}", stage, keywords, message),
            Error::LookupMiss { stage, keywords } =>
                write!(f, "No {} variant for keywords {}", stage, keywords),
            Error::StateError(msg) => write!(f, "Invalid state: {}", msg),
            Error::UnsupportedStage(stage) => write!(f, "Unsupported shader stage: {}", stage),
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Log this error at ERROR severity and hand it back
    ///
    /// Used where a typed error is raised so the failure shows up in the log
    /// with its source component even if the caller drops the `Result`.
    pub(crate) fn logged(self, source: &str) -> Self {
        crate::engine_error!(source, "{}", self);
        self
    }
}

// ===== ERROR MACROS =====

/// Log an ERROR and build an `Error::InvalidResource` from a format string
///
/// # Example
///
/// ```ignore
/// let idx = lut.get(name).ok_or_else(|| engine_err!("galaxy3d::Pass", "Unknown pass '{}'", name))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::InvalidResource(message)
    }};
}

/// Log an ERROR and return `Err(Error::InvalidResource(..))` from the current function
///
/// # Example
///
/// ```ignore
/// engine_bail!("galaxy3d::Pass", "Duplicate tag '{}'", tag);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
