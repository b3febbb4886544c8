/// Buffer trait and buffer descriptor

use bitflags::bitflags;
use crate::error::Result;

/// Buffer usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    Vertex,
    Index,
    /// Constant/uniform buffer
    Constant,
    Storage,
}

/// How often the buffer contents change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUsage {
    /// GPU-resident, updated through explicit uploads
    Static,
    /// Rewritten every frame through a CPU mapping
    Dynamic,
}

bitflags! {
    /// CPU access rights on a buffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CpuAccess: u8 {
        const READ  = 1 << 0;
        const WRITE = 1 << 1;
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc<'a> {
    /// Size in bytes
    pub size: u64,
    pub usage: BufferUsage,
    pub memory: MemoryUsage,
    pub cpu_access: CpuAccess,
    /// Initial contents (`size` bytes) or `None` for undefined contents
    pub initial_data: Option<&'a [u8]>,
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types. Destroyed when dropped.
pub trait Buffer: Send + Sync {
    /// Upload `data` at `offset` bytes into the buffer
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;

    /// Size in bytes
    fn size(&self) -> u64;
}
