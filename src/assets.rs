//! Texture loading
//!
//! The simulation never touches the GPU directly. It asks a [`TextureLoader`]
//! for a [`Sprite`] (an opaque texture handle plus its scaled pixel size) and
//! later hands that handle back to a [`crate::render::Canvas`]. The native
//! loader is [`TextureCache`], which decodes each file once and keeps it for
//! the whole run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use macroquad::prelude::{FilterMode, Texture2D};
use thiserror::Error;

/// Directory sprite paths are resolved against by default
pub const ASSETS_DIR: &str = "assets";

/// Errors raised while loading an image. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read texture '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture '{}' is {width}x{height}, larger than a GPU texture allows", path.display())]
    TooLarge { path: PathBuf, width: u32, height: u32 },
}

/// A loaded texture together with its on-screen (already scaled) size.
///
/// Cloning a sprite clones the handle, never the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite<T> {
    pub texture: T,
    pub width: f32,
    pub height: f32,
}

impl<T> Sprite<T> {
    /// Scale the natural image size, truncating to whole pixels
    pub fn scaled(texture: T, natural_width: f32, natural_height: f32, scale: f32) -> Self {
        Self {
            texture,
            width: (natural_width * scale).trunc(),
            height: (natural_height * scale).trunc(),
        }
    }
}

/// "Load image as textured rectangle with known pixel size"
pub trait TextureLoader {
    /// Handle type given back to the canvas when drawing
    type Texture: Clone;

    fn load(&mut self, path: &str, scale: f32) -> Result<Sprite<Self::Texture>, AssetError>;
}

/// Decode-once texture store backed by macroquad.
///
/// Entries are never evicted; the same image requested at two scales shares
/// one GPU texture.
#[derive(Debug)]
pub struct TextureCache {
    base_dir: PathBuf,
    textures: HashMap<PathBuf, Texture2D>,
}

impl TextureCache {
    /// Cache resolving paths against `base_dir` ([`ASSETS_DIR`] by default on the command line)
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            textures: HashMap::new(),
        }
    }

    /// Number of distinct images decoded so far
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    fn fetch(&mut self, path: &str) -> Result<Texture2D, AssetError> {
        let full = self.base_dir.join(path);
        if let Some(texture) = self.textures.get(&full) {
            return Ok(texture.clone());
        }
        let texture = decode(&full)?;
        log::debug!("decoded {} ({}x{})", full.display(), texture.width(), texture.height());
        self.textures.insert(full, texture.clone());
        Ok(texture)
    }
}

impl TextureLoader for TextureCache {
    type Texture = Texture2D;

    fn load(&mut self, path: &str, scale: f32) -> Result<Sprite<Texture2D>, AssetError> {
        let texture = self.fetch(path)?;
        let (w, h) = (texture.width(), texture.height());
        Ok(Sprite::scaled(texture, w, h, scale))
    }
}

/// Read and decode an image file, then upload it.
///
/// Decoding goes through `image` first so a corrupt file surfaces as an
/// error instead of a panic inside the upload.
fn decode(path: &Path) -> Result<Texture2D, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image::load_from_memory(&bytes)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    let (width, height) = rgba.dimensions();
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(AssetError::TooLarge {
            path: path.to_path_buf(),
            width,
            height,
        });
    };

    let texture = Texture2D::from_rgba8(w, h, rgba.as_raw());
    texture.set_filter(FilterMode::Linear);
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_truncates() {
        let s = Sprite::scaled((), 301.0, 99.0, 0.5);
        assert_eq!(s.width, 150.0);
        assert_eq!(s.height, 49.0);

        let s = Sprite::scaled((), 100.0, 40.0, 1.5);
        assert_eq!((s.width, s.height), (150.0, 60.0));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, AssetError::Read { .. }));
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = decode(&path).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains("broken.png"));
    }
}
