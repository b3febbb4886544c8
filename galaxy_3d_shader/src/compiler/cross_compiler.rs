/// Cross-compilation backend trait
///
/// The compiler never links a concrete HLSL/SPIR-V toolchain: whoever drives
/// it plugs one in through `CrossCompiler` (ShaderConductor, DXC + SPIRV-Cross,
/// naga, ...).

use std::collections::BTreeMap;

use crate::compiler::config::TargetLanguage;
use crate::compiler::pragma::PragmaParam;
use crate::compiler::snippet::MacroDefine;
use crate::error::Result;
use crate::renderer::ShaderStage;

/// Output language and version (shader model, GLSL version, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDesc<'a> {
    pub language: TargetLanguage,
    pub version: &'a str,
}

/// One backend invocation
#[derive(Debug, Clone)]
pub struct CrossCompileRequest<'a> {
    pub source: &'a str,
    /// Name of the source file, for diagnostics and `#include` resolution
    pub file_name: &'a str,
    pub stage: ShaderStage,
    pub entry_point: &'a str,
    pub defines: &'a [MacroDefine],
    pub target: TargetDesc<'a>,
    pub optimization_level: u8,
    pub debug_info: bool,
    pub pack_matrices_row_major: bool,
    pub include_paths: &'a [String],
    /// Passthrough pragmas (`zwrite off`, ...), forwarded as-is
    pub options: &'a BTreeMap<String, PragmaParam>,
}

/// Compiled output: source text for text targets, bytecode for SPIR-V / DXIL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossCompileOutput {
    pub bytes: Vec<u8>,
}

/// Cross-compilation backend
///
/// Implementations report failures (including warnings the backend treats as
/// fatal) as `Error::BackendError` carrying the backend diagnostic.
pub trait CrossCompiler: Send + Sync {
    fn compile(&self, request: &CrossCompileRequest) -> Result<CrossCompileOutput>;
}
