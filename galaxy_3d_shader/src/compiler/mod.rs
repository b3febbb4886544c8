/// Compiler module - offline expansion of annotated shader sources into pass variants

pub mod config;
pub mod pragma;
pub mod permutation;
pub mod snippet;
pub mod hlsl_semantics;
pub mod cross_compiler;
pub mod shader_compiler;
#[cfg(test)]
pub mod mock_cross_compiler;

pub use config::{CompilerConfig, TargetLanguage};
pub use pragma::{parse_pragma_args, ParsedPragmas, PragmaParam, ProgramParameters};
pub use permutation::enumerate_keywords;
pub use snippet::{generate_shader_snippets, MacroDefine, ShaderSnippet};
pub use hlsl_semantics::fix_spirv_cross_hlsl_semantics;
pub use cross_compiler::{CrossCompileOutput, CrossCompileRequest, CrossCompiler, TargetDesc};
pub use shader_compiler::{CompileReport, ShaderCompiler, SnippetFailure};
