/// Shader stage, shader descriptor and Shader trait

use std::fmt;

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    Vertex,
    Hull,
    Domain,
    Geometry,
    /// Fragment/Pixel shader
    Pixel,
    Compute,
}

impl ShaderStage {
    /// Graphics stages a pass holds, in switch/commit order
    pub const PASS_STAGES: [ShaderStage; 5] = [
        ShaderStage::Vertex,
        ShaderStage::Hull,
        ShaderStage::Domain,
        ShaderStage::Geometry,
        ShaderStage::Pixel,
    ];

    /// Slot of this stage in per-pass stage arrays (`None` for compute)
    pub fn pass_index(self) -> Option<usize> {
        match self {
            ShaderStage::Vertex => Some(0),
            ShaderStage::Hull => Some(1),
            ShaderStage::Domain => Some(2),
            ShaderStage::Geometry => Some(3),
            ShaderStage::Pixel => Some(4),
            ShaderStage::Compute => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Hull => "hull",
            ShaderStage::Domain => "domain",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Pixel => "pixel",
            ShaderStage::Compute => "compute",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptor for creating a stage shader object
#[derive(Debug, Clone)]
pub struct ShaderDesc<'a> {
    /// Compiled bytecode (DXBC, DXIL, SPIR-V)
    pub code: &'a [u8],
    pub stage: ShaderStage,
}

/// Stage shader object trait
///
/// Implemented by backend-specific shader types. Destroyed when dropped.
pub trait Shader: Send + Sync {
    fn stage(&self) -> ShaderStage;
}
