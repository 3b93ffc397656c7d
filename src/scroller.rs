//! Parallax Layer Scroller
//!
//! Each layer is a strip of tiles kept in a queue ordered left to right.
//! Every frame the whole strip slides left; tiles that leave the screen are
//! dropped from the front and fresh tiles, picked at random from the layer's
//! frames, are appended at the back until the strip reaches a little past
//! the right edge. Neighbouring tiles overlap slightly to hide seams.
//!
//! A layer's queue is never empty once registered: the front tile is only
//! evicted while another tile remains behind it.

use std::collections::VecDeque;

use rand::Rng;

use crate::assets::{Sprite, TextureLoader};
use crate::config::{LayerSpec, TileConfig};
use crate::error::SceneError;
use crate::geometry::Rect;
use crate::render::Canvas;

/// One positioned instance of a layer frame
#[derive(Debug, Clone, PartialEq)]
pub struct Tile<T> {
    pub texture: T,
    pub rect: Rect,
}

struct Layer<T> {
    name: String,
    /// Candidate frames, loaded once at registration
    frames: Vec<Sprite<T>>,
    baseline: f32,
    parallax: f32,
    tiles: VecDeque<Tile<T>>,
}

impl<T: Clone> Layer<T> {
    fn random_tile<R: Rng + ?Sized>(&self, x: f32, rng: &mut R) -> Tile<T> {
        let frame = &self.frames[rng.gen_range(0..self.frames.len())];
        Tile {
            texture: frame.texture.clone(),
            rect: Rect::standing_on(x, self.baseline, frame.width, frame.height),
        }
    }

    fn scroll<R: Rng + ?Sized>(&mut self, dx: f32, fill_to: f32, overlap: f32, rng: &mut R) {
        debug_assert!(dx.is_finite(), "layer '{}' scrolled by {}", self.name, dx);

        for tile in &mut self.tiles {
            tile.rect.scroll(dx);
        }
        self.evict();

        while let Some(back) = self.tiles.back() {
            if back.rect.right() >= fill_to {
                break;
            }
            let tile = self.random_tile(back.rect.right() - overlap, rng);
            self.tiles.push_back(tile);
        }

        // A large dx can leave the kept front tile off screen; the refill
        // guarantees a successor, so it can go now.
        self.evict();
    }

    fn evict(&mut self) {
        while self.tiles.len() > 1 && self.tiles.front().is_some_and(|t| t.rect.is_off_left()) {
            self.tiles.pop_front();
        }
    }
}

/// Owns every background layer, in draw order
pub struct LayerScroller<T> {
    visible_width: f32,
    tile_config: TileConfig,
    layers: Vec<Layer<T>>,
}

impl<T: Clone> LayerScroller<T> {
    pub fn new(visible_width: f32, tile_config: TileConfig) -> Self {
        Self {
            visible_width,
            tile_config,
            layers: Vec::new(),
        }
    }

    /// Register a layer: load its frames and seed the queue with one random
    /// tile at x = 0, bottom on the layer baseline.
    ///
    /// Layers draw in registration order.
    pub fn add_layer<L, R>(&mut self, spec: &LayerSpec, loader: &mut L, rng: &mut R) -> Result<(), SceneError>
    where
        L: TextureLoader<Texture = T> + ?Sized,
        R: Rng + ?Sized,
    {
        if self.find(&spec.name).is_some() {
            return Err(SceneError::DuplicateLayer(spec.name.clone()));
        }
        if spec.frame_count == 0 {
            return Err(SceneError::EmptyLayer(spec.name.clone()));
        }

        let overlap = self.tile_config.overlap;
        let mut frames = Vec::with_capacity(spec.frame_count as usize);
        for i in 0..spec.frame_count {
            let path = spec.frame_path(i);
            let sprite = loader.load(&path, spec.scale)?;
            if sprite.width <= overlap {
                return Err(SceneError::TileTooNarrow {
                    layer: spec.name.clone(),
                    frame: path,
                    width: sprite.width,
                    overlap,
                });
            }
            frames.push(sprite);
        }

        let mut layer = Layer {
            name: spec.name.clone(),
            frames,
            baseline: spec.baseline,
            parallax: spec.parallax,
            tiles: VecDeque::new(),
        };
        let seed = layer.random_tile(0.0, rng);
        layer.tiles.push_back(seed);

        log::info!(
            "layer '{}': {} frame(s), baseline {}, parallax {}",
            spec.name,
            spec.frame_count,
            spec.baseline,
            spec.parallax
        );
        self.layers.push(layer);
        Ok(())
    }

    /// Slide one layer left by `dx`, recycling tiles. Call once per frame per layer.
    #[cfg(test)]
    pub fn scroll<R: Rng + ?Sized>(&mut self, name: &str, dx: f32, rng: &mut R) -> Result<(), SceneError> {
        let fill_to = self.fill_to();
        let overlap = self.tile_config.overlap;
        let layer = self
            .find_mut(name)
            .ok_or_else(|| SceneError::UnknownLayer(name.to_string()))?;
        layer.scroll(dx, fill_to, overlap, rng);
        Ok(())
    }

    /// Scroll every layer by the world delta times its parallax multiplier
    pub fn scroll_all<R: Rng + ?Sized>(&mut self, world_dx: f32, rng: &mut R) {
        let fill_to = self.fill_to();
        let overlap = self.tile_config.overlap;
        for layer in &mut self.layers {
            let dx = world_dx * layer.parallax;
            layer.scroll(dx, fill_to, overlap, rng);
        }
    }

    /// Draw one layer's tiles in queue order
    #[cfg(test)]
    pub fn draw<C: Canvas<T> + ?Sized>(&self, name: &str, canvas: &mut C) -> Result<(), SceneError> {
        let layer = self
            .find(name)
            .ok_or_else(|| SceneError::UnknownLayer(name.to_string()))?;
        draw_layer(layer, canvas);
        Ok(())
    }

    /// Draw every layer, back to front
    pub fn draw_all<C: Canvas<T> + ?Sized>(&self, canvas: &mut C) {
        for layer in &self.layers {
            draw_layer(layer, canvas);
        }
    }

    /// Live tiles of a layer, left to right
    #[cfg(test)]
    pub fn tiles(&self, name: &str) -> Option<impl Iterator<Item = &Tile<T>>> {
        self.find(name).map(|l| l.tiles.iter())
    }

    pub fn tile_count(&self, name: &str) -> Result<usize, SceneError> {
        self.find(name)
            .map(|l| l.tiles.len())
            .ok_or_else(|| SceneError::UnknownLayer(name.to_string()))
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.name.as_str())
    }

    fn fill_to(&self) -> f32 {
        self.visible_width + self.tile_config.preload_margin
    }

    fn find(&self, name: &str) -> Option<&Layer<T>> {
        self.layers.iter().find(|l| l.name == name)
    }

    #[cfg(test)]
    fn find_mut(&mut self, name: &str) -> Option<&mut Layer<T>> {
        self.layers.iter_mut().find(|l| l.name == name)
    }
}

fn draw_layer<T, C: Canvas<T> + ?Sized>(layer: &Layer<T>, canvas: &mut C) {
    for tile in &layer.tiles {
        canvas.draw_sprite(&tile.texture, tile.rect);
    }
}
