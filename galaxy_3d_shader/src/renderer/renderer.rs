/// Renderer trait - the backend factory shader variants go through

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{Buffer, BufferDesc, Shader, ShaderDesc, ShaderReflection};
use crate::shader::ShaderVariant;

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Stage shader objects created
    pub shaders_created: u32,
    /// Constant/other buffers created
    pub buffers_created: u32,
    /// Bytes allocated for buffers
    pub buffer_memory: u64,
}

// ============================================================================
// Renderer trait
// ============================================================================

/// Main renderer trait
///
/// Implemented by backend renderers (D3D11, Vulkan, ...). Shared as
/// `Arc<Mutex<dyn Renderer>>`, the lock is held only for the duration of one call.
pub trait Renderer: Send + Sync {
    /// Compile a variant's source to backend bytecode
    ///
    /// Variants already holding bytecode are returned as-is by well-behaved
    /// backends. Errors carry the compiler diagnostic as a `BackendError`.
    fn compile_shader(&mut self, variant: &ShaderVariant) -> Result<Vec<u8>>;

    /// Create the stage shader object from bytecode
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>>;

    /// Reflect constant buffers and texture/sampler bindings of a compiled variant
    fn reflect_shader(&mut self, variant: &ShaderVariant) -> Result<ShaderReflection>;

    /// Create a buffer
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    fn stats(&self) -> RendererStats;
}
