/// Shader variant - one compiled (or compilable) shader for one stage and one keyword set.
///
/// Variants are produced by the offline compiler, shared by passes through `Arc`,
/// and turned into GPU-side stage objects by `compile()`. The code buffer holds
/// either source text or backend bytecode; holding bytecode is what "compiled" means.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::renderer::{
    ConstantBinding, ConstantVariable, Renderer, Shader, ShaderDesc, ShaderReflection,
    ShaderStage, TextureSamplerBinding,
};
use crate::shader::ShaderKeyword;

// ===== SHADER CODE =====

/// Contents of a variant's code buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderCode {
    /// Target-language source text (HLSL, GLSL, MSL, ...)
    Source(String),
    /// Backend bytecode (DXBC, DXIL, SPIR-V)
    Bytecode(Vec<u8>),
}

impl ShaderCode {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ShaderCode::Source(source) => source.as_bytes(),
            ShaderCode::Bytecode(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_bytecode(&self) -> bool {
        matches!(self, ShaderCode::Bytecode(_))
    }

    pub fn capacity(&self) -> usize {
        match self {
            ShaderCode::Source(source) => source.capacity(),
            ShaderCode::Bytecode(bytes) => bytes.capacity(),
        }
    }

    /// Take the underlying allocation, emptied
    fn take_buffer(&mut self) -> Vec<u8> {
        let mut buffer = match self {
            ShaderCode::Source(source) => std::mem::take(source).into_bytes(),
            ShaderCode::Bytecode(bytes) => std::mem::take(bytes),
        };
        buffer.clear();
        buffer
    }
}

// ===== SHADER VARIANT =====

#[derive(Clone)]
pub struct ShaderVariant {
    keyword: ShaderKeyword,
    stage: ShaderStage,
    code: ShaderCode,
    reflection: ShaderReflection,
    shader: Option<Arc<dyn Shader>>,
}

impl ShaderVariant {
    /// Create an uncompiled variant from source text
    pub fn new(keyword: ShaderKeyword, stage: ShaderStage, source: &str) -> Self {
        Self::from_code(keyword, stage, ShaderCode::Source(source.to_string()))
    }

    /// Create a variant from source or already-compiled bytecode
    pub fn from_code(keyword: ShaderKeyword, stage: ShaderStage, code: ShaderCode) -> Self {
        Self {
            keyword,
            stage,
            code,
            reflection: ShaderReflection::default(),
            shader: None,
        }
    }

    // ===== CODE BUFFER =====

    /// Replace the code with source text; the variant becomes uncompiled
    ///
    /// The buffer allocation is reused, so its capacity only ever grows.
    pub fn set_source_code(&mut self, source: &str) {
        let mut buffer = self.code.take_buffer();
        buffer.extend_from_slice(source.as_bytes());
        let text = match String::from_utf8(buffer) {
            Ok(text) => text,
            Err(_) => source.to_string(),
        };
        self.code = ShaderCode::Source(text);
        self.shader = None;
    }

    /// Replace the code with bytecode; the variant becomes compiled
    pub fn set_bytes_code(&mut self, bytes: &[u8]) {
        let mut buffer = self.code.take_buffer();
        buffer.extend_from_slice(bytes);
        self.code = ShaderCode::Bytecode(buffer);
        self.shader = None;
    }

    // ===== COMPILATION =====

    fn compile_error(&self, error: Error) -> Error {
        match error {
            Error::CompileError { .. } => error,
            other => Error::CompileError {
                stage: self.stage,
                keywords: self.keyword.to_string(),
                diagnostic: other.to_string(),
            },
        }
    }

    fn reflect_error(&self, error: Error) -> Error {
        match error {
            Error::ReflectError { .. } | Error::CompileError { .. } => error,
            other => Error::ReflectError {
                stage: self.stage,
                keywords: self.keyword.to_string(),
                message: other.to_string(),
            },
        }
    }

    /// Compile to bytecode and create the stage shader object
    ///
    /// Already-compiled variants skip the bytecode step and only get their
    /// stage object created if it is missing. On failure the variant is left
    /// exactly as it was (source code, no stage object).
    pub fn compile(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        if self.is_compiled() {
            if self.shader.is_none() {
                let shader = renderer
                    .create_shader(ShaderDesc { code: self.code.as_bytes(), stage: self.stage })
                    .map_err(|e| self.compile_error(e).logged("galaxy3d::ShaderVariant"))?;
                self.shader = Some(shader);
            }
            return Ok(());
        }

        let bytes = renderer
            .compile_shader(self)
            .map_err(|e| self.compile_error(e).logged("galaxy3d::ShaderVariant"))?;

        let shader = renderer
            .create_shader(ShaderDesc { code: &bytes, stage: self.stage })
            .map_err(|e| self.compile_error(e).logged("galaxy3d::ShaderVariant"))?;

        self.set_bytes_code(&bytes);
        self.shader = Some(shader);

        crate::engine_trace!("galaxy3d::ShaderVariant",
            "Compiled {} variant {} ({} bytes)", self.stage, self.keyword, bytes.len());
        Ok(())
    }

    /// Reflect constant buffers and texture/sampler bindings
    ///
    /// Source variants are compiled transiently for the backend to inspect and
    /// their source bytes are restored afterwards, whether reflection succeeds or not.
    pub fn reflect(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let result = if self.is_compiled() {
            renderer.reflect_shader(self)
        } else {
            let bytes = renderer
                .compile_shader(self)
                .map_err(|e| self.compile_error(e).logged("galaxy3d::ShaderVariant"))?;

            let snapshot = std::mem::replace(&mut self.code, ShaderCode::Bytecode(bytes));
            let result = renderer.reflect_shader(self);
            self.code = snapshot;
            result
        };

        let reflection = result.map_err(|e| self.reflect_error(e).logged("galaxy3d::ShaderVariant"))?;

        crate::engine_trace!("galaxy3d::ShaderVariant",
            "Reflected {} variant {}: {} constant buffer(s), {} texture(s)",
            self.stage, self.keyword,
            reflection.constant_bindings.len(), reflection.sampler_bindings.len());

        self.reflection = reflection;
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn keyword(&self) -> &ShaderKeyword {
        &self.keyword
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn code(&self) -> &ShaderCode {
        &self.code
    }

    pub fn is_compiled(&self) -> bool {
        self.code.is_bytecode()
    }

    /// Stage shader object (set by a successful `compile()`)
    pub fn shader(&self) -> Option<&Arc<dyn Shader>> {
        self.shader.as_ref()
    }

    pub fn reflection(&self) -> &ShaderReflection {
        &self.reflection
    }

    pub fn constant_bindings(&self) -> &[ConstantBinding] {
        &self.reflection.constant_bindings
    }

    pub fn sampler_bindings(&self) -> &[TextureSamplerBinding] {
        &self.reflection.sampler_bindings
    }

    /// Find a constant variable and the buffer declaring it
    pub fn constant_variable(&self, name: &str) -> Option<(&ConstantBinding, &ConstantVariable)> {
        self.reflection.constant_bindings.iter().find_map(|binding| {
            binding.variable(name).map(|variable| (binding, variable))
        })
    }
}

impl fmt::Debug for ShaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderVariant")
            .field("keyword", &self.keyword)
            .field("stage", &self.stage)
            .field("compiled", &self.is_compiled())
            .field("code_len", &self.code.len())
            .field("has_shader", &self.shader.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "variant_tests.rs"]
mod tests;
