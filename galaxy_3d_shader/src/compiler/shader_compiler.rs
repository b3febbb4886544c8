/// Offline shader compiler
///
/// Turns one annotated shader source into registered pass variants:
/// pragmas -> program parameters -> keyword permutations -> snippets ->
/// one backend call per snippet -> `Pass::add_variant`.

use std::sync::Arc;

use rayon::prelude::*;

use crate::compiler::config::{CompilerConfig, TargetLanguage};
use crate::compiler::cross_compiler::{CrossCompileRequest, CrossCompiler, TargetDesc};
use crate::compiler::hlsl_semantics::fix_spirv_cross_hlsl_semantics;
use crate::compiler::pragma::{parse_pragma_args, ProgramParameters};
use crate::compiler::snippet::{generate_shader_snippets, ShaderSnippet};
use crate::error::{Error, Result};
use crate::renderer::ShaderStage;
use crate::shader::{Pass, ShaderCode, ShaderVariant};

// ===== REPORT =====

/// A snippet that did not produce a registered variant
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetFailure {
    pub stage: ShaderStage,
    pub entry_point: String,
    /// Canonical keyword name of the permutation
    pub keywords: String,
    pub error: Error,
}

/// Outcome of compiling one source into a pass
///
/// Every snippet is attempted; failures are kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileReport {
    pub snippet_count: usize,
    /// Variants newly registered in the pass
    pub registered: usize,
    /// Variants dropped because the pass already had that keyword set
    pub duplicates: usize,
    pub parse_errors: Vec<Error>,
    pub failures: Vec<SnippetFailure>,
}

impl CompileReport {
    pub fn is_success(&self) -> bool {
        self.parse_errors.is_empty() && self.failures.is_empty()
    }

    pub fn first_error(&self) -> Option<&Error> {
        self.parse_errors
            .first()
            .or_else(|| self.failures.first().map(|failure| &failure.error))
    }

    /// Number of registered variants, or the first error
    pub fn into_result(self) -> Result<usize> {
        match self.first_error() {
            Some(error) => Err(error.clone()),
            None => Ok(self.registered),
        }
    }
}

// ===== COMPILER =====

pub struct ShaderCompiler {
    backend: Arc<dyn CrossCompiler>,
    config: CompilerConfig,
}

impl ShaderCompiler {
    /// # Errors
    ///
    /// `Error::InvalidConfig` if the configuration does not validate
    pub fn new(backend: Arc<dyn CrossCompiler>, config: CompilerConfig) -> Result<Self> {
        config.validate().map_err(|err| err.logged("galaxy3d::ShaderCompiler"))?;
        Ok(Self { backend, config })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile every permutation and stage declared by `source` into `pass`
    pub fn compile(&self, source: &str, pass: &mut Pass) -> CompileReport {
        let parsed = parse_pragma_args(source, &self.config.pragma_marker);
        let (params, param_errors) = ProgramParameters::from_pragmas(&parsed.params);

        let mut report = CompileReport {
            parse_errors: parsed.errors,
            ..CompileReport::default()
        };
        report.parse_errors.extend(param_errors);
        for error in &report.parse_errors {
            crate::engine_warn!("galaxy3d::ShaderCompiler", "{}", error);
        }

        let snippets = generate_shader_snippets(source, &params);
        report.snippet_count = snippets.len();
        crate::engine_debug!("galaxy3d::ShaderCompiler",
            "Pass '{}': {} snippet(s) from {} keyword axis(es), target {} {}",
            pass.name(), snippets.len(), params.keywords.len(),
            self.config.target, params.shader_model);

        let variants: Vec<Result<ShaderVariant>> = if self.config.parallel {
            snippets.par_iter().map(|snippet| self.build_variant(snippet)).collect()
        } else {
            snippets.iter().map(|snippet| self.build_variant(snippet)).collect()
        };

        // Registration stays sequential so the pass sees declaration order
        for (snippet, variant) in snippets.iter().zip(variants) {
            match variant.and_then(|variant| pass.add_variant(Arc::new(variant))) {
                Ok(true) => report.registered += 1,
                Ok(false) => report.duplicates += 1,
                Err(error) => {
                    let keywords = snippet.keyword().to_string();
                    crate::engine_error!("galaxy3d::ShaderCompiler",
                        "Snippet {} '{}' [{}] failed: {}",
                        snippet.stage, snippet.entry_point, keywords, error);
                    report.failures.push(SnippetFailure {
                        stage: snippet.stage,
                        entry_point: snippet.entry_point.to_string(),
                        keywords,
                        error,
                    });
                }
            }
        }

        crate::engine_info!("galaxy3d::ShaderCompiler",
            "Pass '{}': {} variant(s) registered, {} failure(s)",
            pass.name(), report.registered, report.failures.len());
        report
    }

    /// Compile one snippet and register the result in `pass`
    ///
    /// A duplicate keyword set is not an error: the pass keeps its first variant.
    pub fn compile_shader_snippet(&self, snippet: &ShaderSnippet, pass: &mut Pass) -> Result<()> {
        let variant = self.build_variant(snippet)?;
        pass.add_variant(Arc::new(variant))?;
        Ok(())
    }

    fn build_variant(&self, snippet: &ShaderSnippet) -> Result<ShaderVariant> {
        let keyword = snippet.keyword();
        crate::engine_trace!("galaxy3d::ShaderCompiler",
            "Compiling {} '{}' for keywords {}", snippet.stage, snippet.entry_point, keyword);

        let compile_error = |diagnostic: String| Error::CompileError {
            stage: snippet.stage,
            keywords: keyword.to_string(),
            diagnostic,
        };

        let request = CrossCompileRequest {
            source: snippet.source,
            file_name: &self.config.file_name,
            stage: snippet.stage,
            entry_point: snippet.entry_point,
            defines: &snippet.defines,
            target: TargetDesc {
                language: self.config.target,
                version: snippet.shader_model,
            },
            optimization_level: self.config.optimization_level,
            debug_info: self.config.debug_info,
            pack_matrices_row_major: false,
            include_paths: &self.config.include_paths,
            options: snippet.options,
        };

        let output = self.backend.compile(&request).map_err(|err| match err {
            Error::BackendError(diagnostic) => compile_error(diagnostic),
            other => compile_error(other.to_string()),
        })?;

        if output.bytes.is_empty() {
            return Err(compile_error("backend produced no output".to_string()));
        }

        let code = if self.config.target.is_binary() {
            ShaderCode::Bytecode(output.bytes)
        } else {
            let mut text = String::from_utf8(output.bytes)
                .map_err(|_| compile_error("backend output is not valid UTF-8".to_string()))?;
            if self.config.target == TargetLanguage::Hlsl {
                fix_spirv_cross_hlsl_semantics(&mut text);
            }
            ShaderCode::Source(text)
        };

        Ok(ShaderVariant::from_code(keyword, snippet.stage, code))
    }
}

#[cfg(test)]
#[path = "shader_compiler_tests.rs"]
mod tests;
