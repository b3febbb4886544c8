//! `#pragma` scanning and program parameters
//!
//! Both steps are pure functions over the shader source: nothing here touches
//! the backend or a pass, and malformed directives are reported as values so
//! the caller decides whether they fail the asset.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::renderer::ShaderStage;

/// Shader model used when the source has no `#pragma target`
pub const DEFAULT_SHADER_MODEL: &str = "20";

/// One `#pragma <option> <values...>` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PragmaParam {
    pub option: String,
    pub values: Vec<String>,
    /// 1-based line of the directive
    pub line: usize,
}

/// Result of scanning a source for pragmas
///
/// Malformed directives land in `errors` and are otherwise skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPragmas {
    pub params: Vec<PragmaParam>,
    pub errors: Vec<Error>,
}

/// Collect every `marker` directive in `source`, in order
///
/// Tokens are whitespace separated and stop at the end of the line or at a
/// `//` comment. A directive that itself sits after `//` is ignored.
pub fn parse_pragma_args(source: &str, marker: &str) -> ParsedPragmas {
    let mut parsed = ParsedPragmas::default();

    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        let Some(position) = text.find(marker) else {
            continue;
        };
        if text[..position].contains("//") {
            continue;
        }

        let mut rest = &text[position + marker.len()..];
        if let Some(comment) = rest.find("//") {
            rest = &rest[..comment];
        }

        let mut tokens = rest.split_whitespace().map(str::to_string);
        match tokens.next() {
            Some(option) => parsed.params.push(PragmaParam {
                option,
                values: tokens.collect(),
                line,
            }),
            None => parsed.errors.push(Error::ParseError {
                line,
                message: format!("'{}' directive without an option", marker.trim_end()),
            }),
        }
    }

    parsed
}

/// Map a stage pragma option to its stage
pub fn stage_from_pragma(option: &str) -> Option<ShaderStage> {
    match option {
        "vertex" => Some(ShaderStage::Vertex),
        "fragment" => Some(ShaderStage::Pixel),
        "geometry" => Some(ShaderStage::Geometry),
        "hull" => Some(ShaderStage::Hull),
        "domain" => Some(ShaderStage::Domain),
        "compute" => Some(ShaderStage::Compute),
        _ => None,
    }
}

/// Program parameters gathered from a source's pragmas
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramParameters {
    /// Entry point per declared stage
    pub entries: BTreeMap<ShaderStage, String>,
    /// One axis per `multi_compile` directive, in declaration order
    pub keywords: Vec<Vec<String>>,
    /// `#pragma target` with the dots removed ("5.0" -> "50")
    pub shader_model: String,
    /// Any other directive, last occurrence wins
    pub options: BTreeMap<String, PragmaParam>,
}

impl Default for ProgramParameters {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            keywords: Vec::new(),
            shader_model: DEFAULT_SHADER_MODEL.to_string(),
            options: BTreeMap::new(),
        }
    }
}

impl ProgramParameters {
    /// Fold parsed pragmas into program parameters
    ///
    /// Stage, `target` and `multi_compile` directives without a value are
    /// reported and skipped.
    pub fn from_pragmas(pragmas: &[PragmaParam]) -> (Self, Vec<Error>) {
        let mut params = Self::default();
        let mut errors = Vec::new();

        for pragma in pragmas {
            let first = pragma.values.first();

            if pragma.option == "multi_compile" {
                if pragma.values.is_empty() {
                    errors.push(missing_value(pragma));
                } else {
                    params.keywords.push(pragma.values.clone());
                }
            } else if let Some(stage) = stage_from_pragma(&pragma.option) {
                match first {
                    Some(entry) => {
                        params.entries.insert(stage, entry.clone());
                    }
                    None => errors.push(missing_value(pragma)),
                }
            } else if pragma.option == "target" {
                match first {
                    Some(model) => params.shader_model = model.replace('.', ""),
                    None => errors.push(missing_value(pragma)),
                }
            } else {
                params.options.insert(pragma.option.clone(), pragma.clone());
            }
        }

        (params, errors)
    }

    pub fn has_stage(&self, stage: ShaderStage) -> bool {
        self.entries.contains_key(&stage)
    }

    pub fn entry_point(&self, stage: ShaderStage) -> Option<&str> {
        self.entries.get(&stage).map(String::as_str)
    }
}

fn missing_value(pragma: &PragmaParam) -> Error {
    Error::ParseError {
        line: pragma.line,
        message: format!("'#pragma {}' needs a value", pragma.option),
    }
}

#[cfg(test)]
#[path = "pragma_tests.rs"]
mod tests;
