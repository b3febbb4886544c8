/// Shader compiler configuration

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Highest optimization level the cross-compilation backend accepts
pub const MAX_OPTIMIZATION_LEVEL: u8 = 3;

/// Default `#pragma` marker scanned for in shader sources
pub const DEFAULT_PRAGMA_MARKER: &str = "#pragma ";

/// Target shading language of the cross-compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetLanguage {
    Glsl,
    #[default]
    Hlsl,
    Essl,
    Dxil,
    SpirV,
    MslMacOs,
    MslIos,
}

impl TargetLanguage {
    pub fn name(self) -> &'static str {
        match self {
            TargetLanguage::Glsl => "glsl",
            TargetLanguage::Hlsl => "hlsl",
            TargetLanguage::Essl => "essl",
            TargetLanguage::Dxil => "dxil",
            TargetLanguage::SpirV => "spirv",
            TargetLanguage::MslMacOs => "msl_macos",
            TargetLanguage::MslIos => "msl_ios",
        }
    }

    /// Whether the backend emits bytecode rather than source text
    pub fn is_binary(self) -> bool {
        matches!(self, TargetLanguage::Dxil | TargetLanguage::SpirV)
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "glsl" => Ok(TargetLanguage::Glsl),
            "hlsl" => Ok(TargetLanguage::Hlsl),
            "essl" => Ok(TargetLanguage::Essl),
            "dxil" => Ok(TargetLanguage::Dxil),
            "spirv" => Ok(TargetLanguage::SpirV),
            "msl_macos" => Ok(TargetLanguage::MslMacOs),
            "msl_ios" => Ok(TargetLanguage::MslIos),
            other => Err(Error::InvalidConfig(format!(
                "unknown target language '{}' (expected glsl, hlsl, essl, dxil, spirv, msl_macos or msl_ios)",
                other
            ))),
        }
    }
}

/// Shader compiler configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerConfig {
    pub target: TargetLanguage,
    /// 0 (none) to 3 (full)
    pub optimization_level: u8,
    /// Ask the backend to keep debug information
    pub debug_info: bool,
    /// Run backend invocations on the rayon thread pool
    pub parallel: bool,
    pub pragma_marker: String,
    /// Source file name reported to the backend (diagnostics, `#include` resolution)
    pub file_name: String,
    /// Include directories forwarded to the backend
    pub include_paths: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            target: TargetLanguage::default(),
            optimization_level: MAX_OPTIMIZATION_LEVEL,
            debug_info: false,
            parallel: false,
            pragma_marker: DEFAULT_PRAGMA_MARKER.to_string(),
            file_name: String::new(),
            include_paths: Vec::new(),
        }
    }
}

impl CompilerConfig {
    pub fn with_target(mut self, target: TargetLanguage) -> Self {
        self.target = target;
        self
    }

    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level;
        self
    }

    pub fn with_debug_info(mut self, enabled: bool) -> Self {
        self.debug_info = enabled;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self
    }

    pub fn with_include_path(mut self, path: &str) -> Self {
        self.include_paths.push(path.to_string());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.optimization_level > MAX_OPTIMIZATION_LEVEL {
            return Err(Error::InvalidConfig(format!(
                "optimization level {} out of range 0..={}",
                self.optimization_level, MAX_OPTIMIZATION_LEVEL
            )));
        }
        if self.pragma_marker.trim().is_empty() {
            return Err(Error::InvalidConfig("pragma marker is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
