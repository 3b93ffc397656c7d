//! Drawing collaborator
//!
//! Scene components draw through [`Canvas`] so they can run without a
//! window. [`ScreenCanvas`] forwards to macroquad's immediate-mode calls.

use macroquad::prelude::*;

use crate::geometry::Rect;

/// "Draw textured rectangle at floating-point screen position"
pub trait Canvas<T> {
    /// Draw `texture` stretched over `rect`
    fn draw_sprite(&mut self, texture: &T, rect: Rect);

    /// Draw a rectangle outline (debug hitboxes)
    fn draw_outline(&mut self, rect: Rect);
}

/// Canvas drawing straight to the macroquad window
#[derive(Debug, Clone, Copy)]
pub struct ScreenCanvas {
    pub outline_color: Color,
    pub outline_thickness: f32,
}

impl Default for ScreenCanvas {
    fn default() -> Self {
        Self {
            outline_color: RED,
            outline_thickness: 2.0,
        }
    }
}

impl Canvas<Texture2D> for ScreenCanvas {
    fn draw_sprite(&mut self, texture: &Texture2D, rect: Rect) {
        draw_texture_ex(
            texture,
            rect.x,
            rect.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(rect.w, rect.h)),
                ..Default::default()
            },
        );
    }

    fn draw_outline(&mut self, rect: Rect) {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, self.outline_thickness, self.outline_color);
    }
}
