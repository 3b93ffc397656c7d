//! Headless stand-ins for the texture loader and canvas

use std::collections::HashMap;
use std::path::PathBuf;

use crate::assets::{AssetError, Sprite, TextureLoader};
use crate::geometry::Rect;
use crate::render::Canvas;

/// Loader whose handles are just the requested paths
#[derive(Debug, Default)]
pub struct FakeTextures {
    sizes: HashMap<String, (f32, f32)>,
    default_size: (f32, f32),
    pub loads: usize,
}

impl FakeTextures {
    /// Every image reports `w` x `h` unless overridden
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            sizes: HashMap::new(),
            default_size: (w, h),
            loads: 0,
        }
    }

    /// Natural size for one path
    pub fn with(mut self, path: &str, w: f32, h: f32) -> Self {
        self.sizes.insert(path.to_string(), (w, h));
        self
    }
}

impl TextureLoader for FakeTextures {
    type Texture = String;

    fn load(&mut self, path: &str, scale: f32) -> Result<Sprite<String>, AssetError> {
        if path.contains("missing") {
            return Err(AssetError::Read {
                path: PathBuf::from(path),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        self.loads += 1;
        let (w, h) = self.sizes.get(path).copied().unwrap_or(self.default_size);
        Ok(Sprite::scaled(path.to_string(), w, h, scale))
    }
}

/// Canvas that remembers what was drawn, in order
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub sprites: Vec<(String, Rect)>,
    pub outlines: Vec<Rect>,
}

impl RecordingCanvas {
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.outlines.clear();
    }
}

impl Canvas<String> for RecordingCanvas {
    fn draw_sprite(&mut self, texture: &String, rect: Rect) {
        self.sprites.push((texture.clone(), rect));
    }

    fn draw_outline(&mut self, rect: Rect) {
        self.outlines.push(rect);
    }
}
