/// Texture trait as seen by shader parameter binding

/// Texture dimensionality, as declared by the shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    Texture1D,
    Texture2D,
    Texture2DArray,
    Texture3D,
    TextureCube,
}

/// Texture information
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub texture_type: TextureType,
}

/// Texture resource trait
///
/// Implemented by backend-specific texture types (views + sampler state).
pub trait Texture: Send + Sync {
    fn info(&self) -> &TextureInfo;
}
