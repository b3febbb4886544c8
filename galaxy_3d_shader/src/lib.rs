/*!
# Galaxy 3D Shader

Shader permutation system for the Galaxy 3D engine.

A shader source annotated with `#pragma` directives is expanded offline into one
variant per (keyword permutation, stage), each cross-compiled through a pluggable
backend and registered in a pass. At runtime, pass and technique instances
resolve the variants matching the enabled keywords, allocate their constant
buffers and forward shader parameters to them.

## Architecture

- **ShaderKeyword**: Immutable keyword set identified by a 32-bit hash
- **ShaderVariant**: Compiled (or compilable) shader for one stage and keyword set
- **ShaderVariantInstance**: Constant buffers and textures bound to a variant
- **Pass / PassInstance**: Variant tables per stage and the live selection
- **Technique / TechniqueInstance**: Ordered passes switched together
- **ShaderCompiler**: Offline pragma parsing, permutation expansion and cross compilation
- **Renderer**: Backend trait variants compile, reflect and allocate through
- **CrossCompiler**: Backend trait for HLSL cross compilation
*/

// Internal modules
mod error;
mod engine;
mod utils;
pub mod log;
pub mod renderer;
pub mod shader;
pub mod compiler;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Renderer backend trait
    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{format_entry, DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Render sub-module with the backend-facing types
    pub mod render {
        pub use crate::renderer::*;
    }

    // Shader sub-module: keywords, variants, passes, techniques
    pub mod shader {
        pub use crate::shader::*;
    }

    // Offline compiler sub-module
    pub mod compiler {
        pub use crate::compiler::*;
    }
}

// Re-export math library at crate root
pub use glam;
