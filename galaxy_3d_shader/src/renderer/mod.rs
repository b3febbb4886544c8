/// Renderer module - the RHI seam shader variants compile, reflect and allocate through

pub mod renderer;
pub mod shader;
pub mod buffer;
pub mod texture;
pub mod reflection;
#[cfg(test)]
pub mod mock_renderer;

pub use renderer::*;
pub use shader::*;
pub use buffer::*;
pub use texture::*;
pub use reflection::*;
