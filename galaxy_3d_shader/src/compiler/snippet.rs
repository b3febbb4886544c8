/// Shader snippets: one backend invocation per (permutation, stage)

use std::collections::BTreeMap;

use crate::compiler::permutation::enumerate_keywords;
use crate::compiler::pragma::{PragmaParam, ProgramParameters};
use crate::renderer::ShaderStage;
use crate::shader::ShaderKeyword;

/// Order snippets are generated in for each permutation
pub const SNIPPET_STAGE_ORDER: [ShaderStage; 6] = [
    ShaderStage::Vertex,
    ShaderStage::Pixel,
    ShaderStage::Geometry,
    ShaderStage::Hull,
    ShaderStage::Domain,
    ShaderStage::Compute,
];

/// Preprocessor define passed to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDefine {
    pub name: String,
    pub value: Option<String>,
}

impl MacroDefine {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), value: None }
    }
}

/// Whether a `multi_compile` token stands for "no keyword" (`_`, `__`, ...)
pub fn is_placeholder_keyword(token: &str) -> bool {
    token.chars().all(|c| c == '_')
}

#[derive(Debug, Clone)]
pub struct ShaderSnippet<'a> {
    pub source: &'a str,
    pub stage: ShaderStage,
    pub entry_point: &'a str,
    pub defines: Vec<MacroDefine>,
    pub shader_model: &'a str,
    /// Pragmas the compiler does not interpret, forwarded as-is
    pub options: &'a BTreeMap<String, PragmaParam>,
}

impl ShaderSnippet<'_> {
    /// Keyword set the compiled variant is registered under
    pub fn keyword(&self) -> ShaderKeyword {
        ShaderKeyword::from_keywords(self.defines.iter().map(|define| define.name.as_str()))
    }
}

/// Expand program parameters into snippets
///
/// Permutation-major: every stage with an entry point is emitted for the first
/// permutation before moving on to the next one.
pub fn generate_shader_snippets<'a>(
    source: &'a str,
    params: &'a ProgramParameters,
) -> Vec<ShaderSnippet<'a>> {
    let permutations = enumerate_keywords(&params.keywords);
    let stages: Vec<(ShaderStage, &str)> = SNIPPET_STAGE_ORDER
        .iter()
        .filter_map(|&stage| params.entry_point(stage).map(|entry| (stage, entry)))
        .collect();

    let mut snippets = Vec::with_capacity(permutations.len() * stages.len());
    for permutation in &permutations {
        let defines: Vec<MacroDefine> = permutation
            .iter()
            .filter(|token| !is_placeholder_keyword(token))
            .map(|token| MacroDefine::new(token))
            .collect();

        for &(stage, entry_point) in &stages {
            snippets.push(ShaderSnippet {
                source,
                stage,
                entry_point,
                defines: defines.clone(),
                shader_model: &params.shader_model,
                options: &params.options,
            });
        }
    }
    snippets
}

#[cfg(test)]
#[path = "snippet_tests.rs"]
mod tests;
