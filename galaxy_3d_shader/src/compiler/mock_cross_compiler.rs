/// Mock cross compiler for unit tests
///
/// Emits deterministic text (or fake SPIR-V for binary targets) describing the
/// request, records every request it receives and can be told to reject
/// permutations that define a given keyword.

use std::sync::Mutex;

use crate::compiler::config::TargetLanguage;
use crate::compiler::cross_compiler::{CrossCompileOutput, CrossCompileRequest, CrossCompiler};
use crate::error::{Error, Result};
use crate::renderer::ShaderStage;

/// Prefix of the fake bytecode emitted for binary targets
pub const MOCK_SPIRV_HEADER: &[u8] = b"SPIRV:";

/// Owned copy of a request
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub stage: ShaderStage,
    pub entry_point: String,
    pub defines: Vec<String>,
    pub language: TargetLanguage,
    pub version: String,
    pub optimization_level: u8,
    pub debug_info: bool,
    pub pack_matrices_row_major: bool,
    pub file_name: String,
    pub include_paths: Vec<String>,
    /// Passthrough options as `option value...`
    pub options: Vec<String>,
}

#[derive(Default)]
pub struct MockCrossCompiler {
    pub requests: Mutex<Vec<RecordedRequest>>,
    /// Reject any request defining this keyword
    pub fail_on_define: Option<String>,
    /// Return this text instead of the generated description
    pub output_text: Option<String>,
    /// Return invalid UTF-8 for text targets
    pub invalid_utf8: bool,
}

impl MockCrossCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(keyword: &str) -> Self {
        Self { fail_on_define: Some(keyword.to_string()), ..Self::default() }
    }

    pub fn with_output_text(text: &str) -> Self {
        Self { output_text: Some(text.to_string()), ..Self::default() }
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Text emitted for a request when no fixed output is configured
    pub fn describe(stage: ShaderStage, entry_point: &str, defines: &[String]) -> String {
        format!("// {} {} [{}]\n", stage, entry_point, defines.join(" "))
    }
}

impl CrossCompiler for MockCrossCompiler {
    fn compile(&self, request: &CrossCompileRequest) -> Result<CrossCompileOutput> {
        let defines: Vec<String> = request.defines.iter().map(|d| d.name.clone()).collect();
        self.requests.lock().unwrap().push(RecordedRequest {
            stage: request.stage,
            entry_point: request.entry_point.to_string(),
            defines: defines.clone(),
            language: request.target.language,
            version: request.target.version.to_string(),
            optimization_level: request.optimization_level,
            debug_info: request.debug_info,
            pack_matrices_row_major: request.pack_matrices_row_major,
            file_name: request.file_name.to_string(),
            include_paths: request.include_paths.to_vec(),
            options: request
                .options
                .values()
                .map(|pragma| format!("{} {}", pragma.option, pragma.values.join(" ")))
                .collect(),
        });

        if let Some(keyword) = &self.fail_on_define {
            if defines.contains(keyword) {
                return Err(Error::BackendError(format!(
                    "{}({}): error X3004: undeclared identifier '{}'",
                    request.file_name, request.entry_point, keyword
                )));
            }
        }

        let text = self
            .output_text
            .clone()
            .unwrap_or_else(|| Self::describe(request.stage, request.entry_point, &defines));

        let bytes = if request.target.language.is_binary() {
            let mut bytes = MOCK_SPIRV_HEADER.to_vec();
            bytes.extend_from_slice(text.as_bytes());
            bytes
        } else if self.invalid_utf8 {
            vec![0xff, 0xfe, 0x00]
        } else {
            text.into_bytes()
        };

        Ok(CrossCompileOutput { bytes })
    }
}
