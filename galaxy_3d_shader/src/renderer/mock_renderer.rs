/// Mock Renderer for unit tests (no GPU required)
///
/// Compiles by prefixing the source with a fake bytecode header, reflects from
/// per-stage tables set by the test, and keeps every buffer it creates so
/// tests can inspect allocation descriptors and uploaded bytes.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::renderer::{
    Buffer, BufferDesc, BufferUsage, ConstantBinding, ConstantDataType, ConstantVariable,
    CpuAccess, MemoryUsage, Renderer, RendererStats, Shader, ShaderDesc, ShaderReflection,
    ShaderStage, Texture, TextureInfo, TextureSamplerBinding, TextureType,
};
use crate::shader::{ShaderCode, ShaderVariant};

/// Prefix mock "bytecode" starts with
pub const MOCK_BYTECODE_HEADER: &[u8] = b"MOCKBC:";

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
    pub usage: BufferUsage,
    pub memory: MemoryUsage,
    pub cpu_access: CpuAccess,
    pub contents: Mutex<Vec<u8>>,
    pub initialized: bool,
}

impl MockBuffer {
    pub fn snapshot(&self) -> Vec<u8> {
        self.contents.lock().unwrap().clone()
    }
}

impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let mut contents = self.contents.lock().unwrap();
        let start = offset as usize;
        let end = start + data.len();
        if end > contents.len() {
            return Err(Error::BackendError(format!(
                "update [{}..{}] out of bounds (size {})", start, end, contents.len()
            )));
        }
        contents[start..end].copy_from_slice(data);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }
}

// ============================================================================
// Mock Shader / Texture
// ============================================================================

#[derive(Debug)]
pub struct MockShader {
    pub stage: ShaderStage,
    pub code: Vec<u8>,
}

impl Shader for MockShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }
}

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
}

impl MockTexture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            info: TextureInfo { width, height, texture_type: TextureType::Texture2D },
        }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

pub struct MockRenderer {
    /// Reflection returned per stage (empty reflection when absent)
    pub reflections: FxHashMap<ShaderStage, ShaderReflection>,
    /// Compilation fails for sources containing this text
    pub fail_compile_marker: Option<String>,
    pub fail_shader_creation: bool,
    pub fail_reflect: bool,
    pub fail_buffer_creation: bool,
    /// Every buffer created, in creation order
    pub buffers: Arc<Mutex<Vec<Arc<MockBuffer>>>>,
    /// Number of `compile_shader` calls
    pub compile_calls: Arc<Mutex<u32>>,
    stats: RendererStats,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            reflections: FxHashMap::default(),
            fail_compile_marker: None,
            fail_shader_creation: false,
            fail_reflect: false,
            fail_buffer_creation: false,
            buffers: Arc::new(Mutex::new(Vec::new())),
            compile_calls: Arc::new(Mutex::new(0)),
            stats: RendererStats::default(),
        }
    }

    pub fn with_reflection(mut self, stage: ShaderStage, reflection: ShaderReflection) -> Self {
        self.reflections.insert(stage, reflection);
        self
    }
}

impl Renderer for MockRenderer {
    fn compile_shader(&mut self, variant: &ShaderVariant) -> Result<Vec<u8>> {
        *self.compile_calls.lock().unwrap() += 1;
        match variant.code() {
            ShaderCode::Bytecode(bytes) => Ok(bytes.clone()),
            ShaderCode::Source(source) => {
                if let Some(marker) = &self.fail_compile_marker {
                    if source.contains(marker.as_str()) {
                        return Err(Error::BackendError(format!(
                            "error X3000: syntax error near '{}'", marker
                        )));
                    }
                }
                let mut bytes = MOCK_BYTECODE_HEADER.to_vec();
                bytes.extend_from_slice(source.as_bytes());
                Ok(bytes)
            }
        }
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
        if self.fail_shader_creation {
            return Err(Error::BackendError("CreateShader failed".to_string()));
        }
        self.stats.shaders_created += 1;
        Ok(Arc::new(MockShader { stage: desc.stage, code: desc.code.to_vec() }))
    }

    fn reflect_shader(&mut self, variant: &ShaderVariant) -> Result<ShaderReflection> {
        if self.fail_reflect {
            return Err(Error::BackendError("D3DReflect failed".to_string()));
        }
        if !variant.is_compiled() {
            return Err(Error::BackendError("reflection requires bytecode".to_string()));
        }
        Ok(self.reflections.get(&variant.stage()).cloned().unwrap_or_default())
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        if self.fail_buffer_creation {
            return Err(Error::OutOfMemory);
        }
        let contents = match desc.initial_data {
            Some(data) => data.to_vec(),
            None => vec![0xCD; desc.size as usize],
        };
        let buffer = Arc::new(MockBuffer {
            size: desc.size,
            usage: desc.usage,
            memory: desc.memory,
            cpu_access: desc.cpu_access,
            contents: Mutex::new(contents),
            initialized: desc.initial_data.is_some(),
        });
        self.buffers.lock().unwrap().push(buffer.clone());
        self.stats.buffers_created += 1;
        self.stats.buffer_memory += desc.size;
        Ok(buffer)
    }

    fn stats(&self) -> RendererStats {
        self.stats
    }
}

// ============================================================================
// Reflection fixtures
// ============================================================================

/// `cbuffer PerMaterial : register(b1)` with a color, a roughness, a flag
/// and a 4-element float array (HLSL register packing)
pub fn material_constants() -> ConstantBinding {
    ConstantBinding {
        name: "PerMaterial".to_string(),
        binding: 1,
        size: 96,
        variables: vec![
            ConstantVariable {
                name: "baseColor".to_string(),
                offset: 0,
                size: 16,
                data_type: ConstantDataType::Float4,
                elements: 0,
            },
            ConstantVariable {
                name: "roughness".to_string(),
                offset: 16,
                size: 4,
                data_type: ConstantDataType::Float,
                elements: 0,
            },
            ConstantVariable {
                name: "useNormalMap".to_string(),
                offset: 20,
                size: 4,
                data_type: ConstantDataType::Bool,
                elements: 0,
            },
            ConstantVariable {
                name: "layerCount".to_string(),
                offset: 24,
                size: 4,
                data_type: ConstantDataType::Int,
                elements: 0,
            },
            ConstantVariable {
                name: "weights".to_string(),
                offset: 32,
                size: 52,
                data_type: ConstantDataType::Float,
                elements: 4,
            },
        ],
    }
}

/// `cbuffer PerObject : register(b0)` with the world matrix
pub fn object_constants() -> ConstantBinding {
    ConstantBinding {
        name: "PerObject".to_string(),
        binding: 0,
        size: 64,
        variables: vec![ConstantVariable {
            name: "world".to_string(),
            offset: 0,
            size: 64,
            data_type: ConstantDataType::Float4x4,
            elements: 0,
        }],
    }
}

/// `Texture2D albedoMap : register(t0); SamplerState albedoSampler : register(s0);`
pub fn albedo_binding() -> TextureSamplerBinding {
    TextureSamplerBinding {
        name: "albedoMap".to_string(),
        texture_slot: 0,
        sampler_slot: Some(0),
        texture_type: TextureType::Texture2D,
    }
}

/// Mock renderer reflecting `PerObject` on the vertex stage and
/// `PerMaterial` + `albedoMap` on the pixel stage
pub fn lit_renderer() -> MockRenderer {
    MockRenderer::new()
        .with_reflection(ShaderStage::Vertex, ShaderReflection {
            constant_bindings: vec![object_constants()],
            sampler_bindings: vec![],
        })
        .with_reflection(ShaderStage::Pixel, ShaderReflection {
            constant_bindings: vec![material_constants()],
            sampler_bindings: vec![albedo_binding()],
        })
}
