/// Shader reflection data: constant buffers and texture/sampler bindings

use crate::renderer::TextureType;

// ===== CONSTANT BUFFERS =====

/// Scalar/vector/matrix type of a constant buffer variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantDataType {
    Bool,
    Int,
    UInt,
    Float,
    Float2,
    Float3,
    Float4,
    Float4x4,
    Struct,
}

impl ConstantDataType {
    /// Size of one element in bytes (`None` for structs)
    pub fn element_size(self) -> Option<u32> {
        match self {
            ConstantDataType::Bool
            | ConstantDataType::Int
            | ConstantDataType::UInt
            | ConstantDataType::Float => Some(4),
            ConstantDataType::Float2 => Some(8),
            ConstantDataType::Float3 => Some(12),
            ConstantDataType::Float4 => Some(16),
            ConstantDataType::Float4x4 => Some(64),
            ConstantDataType::Struct => None,
        }
    }
}

/// One variable inside a constant buffer
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantVariable {
    pub name: String,
    /// Byte offset inside the owning constant buffer
    pub offset: u32,
    /// Total size in bytes (including array padding)
    pub size: u32,
    pub data_type: ConstantDataType,
    /// Array length (0 = not an array)
    pub elements: u32,
}

/// One constant buffer declared by a shader
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantBinding {
    /// Constant buffer name (e.g. "PerMaterial")
    pub name: String,
    /// Register slot (`b#`)
    pub binding: u32,
    /// Size in bytes
    pub size: u32,
    pub variables: Vec<ConstantVariable>,
}

impl ConstantBinding {
    pub fn variable(&self, name: &str) -> Option<&ConstantVariable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

// ===== TEXTURES / SAMPLERS =====

/// A texture with its (optional) paired sampler
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSamplerBinding {
    pub name: String,
    /// Texture register slot (`t#`)
    pub texture_slot: u32,
    /// Sampler register slot (`s#`), absent for `Load`-only textures
    pub sampler_slot: Option<u32>,
    pub texture_type: TextureType,
}

// ===== REFLECTION =====

/// Everything a backend reports about one compiled shader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderReflection {
    pub constant_bindings: Vec<ConstantBinding>,
    pub sampler_bindings: Vec<TextureSamplerBinding>,
}

impl ShaderReflection {
    pub fn is_empty(&self) -> bool {
        self.constant_bindings.is_empty() && self.sampler_bindings.is_empty()
    }
}
