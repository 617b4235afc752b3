//! Texture Assets
//!
//! Decodes image files into RGBA8 and registers them as GPU textures.
//! A failed load is logged and degrades to `TextureId::EMPTY` - drawing
//! the empty handle is a no-op, so missing art never crashes the loop.

use macroquad::prelude::*;

/// Error type for texture loading.
#[derive(Debug)]
pub enum AssetError {
    /// File I/O error
    Io(String),
    /// Image decode error
    Decode(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Io(msg) => write!(f, "I/O error: {}", msg),
            AssetError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e.to_string())
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::Decode(e.to_string())
    }
}

/// Handle to a registered texture. Plain data so components stay
/// GPU-free; the id resolves through the `TextureBank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureId(u32);

impl TextureId {
    /// The reserved "draws nothing" handle, handed out when a load fails.
    pub const EMPTY: TextureId = TextureId(0);

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Registry mapping `TextureId` to GPU textures.
pub struct TextureBank {
    textures: Vec<Texture2D>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self {
            textures: Vec::new(),
        }
    }

    /// Decode an image file and upload it. On failure the error is logged
    /// and `TextureId::EMPTY` is returned.
    pub fn load(&mut self, path: &str) -> TextureId {
        match decode_rgba(path) {
            Ok((pixels, width, height)) => {
                let texture = Texture2D::from_rgba8(width as u16, height as u16, &pixels);
                texture.set_filter(FilterMode::Nearest);
                self.textures.push(texture);
                TextureId(self.textures.len() as u32)
            }
            Err(e) => {
                error!("failed to load texture {}: {}", path, e);
                TextureId::EMPTY
            }
        }
    }

    /// Resolve a handle. `EMPTY` and stale ids yield None.
    pub fn get(&self, id: TextureId) -> Option<&Texture2D> {
        if id.is_empty() {
            return None;
        }
        self.textures.get(id.0 as usize - 1)
    }
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and decode an image file to raw RGBA8 bytes.
fn decode_rgba(path: &str) -> Result<(Vec<u8>, u32, u32), AssetError> {
    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    Ok((image.into_raw(), width, height))
}
