//! Screen-space geometry for the scrolling world
//!
//! Everything lives in floating-point screen units: x grows to the right,
//! y grows downward, and the visible area starts at x = 0.

use serde::{Deserialize, Serialize};

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size whose bottom edge sits on `baseline`
    pub fn standing_on(x: f32, baseline: f32, w: f32, h: f32) -> Self {
        Self::new(x, baseline - h, w, h)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Horizontal extent as an interval
    pub fn horizontal(&self) -> Span {
        Span::new(self.x, self.right())
    }

    /// Vertical extent as an interval
    pub fn vertical(&self) -> Span {
        Span::new(self.y, self.bottom())
    }

    /// Move the rectangle left by `dx` (world scroll)
    pub fn scroll(&mut self, dx: f32) {
        self.x -= dx;
    }

    /// True once the right edge has passed the left edge of the screen
    pub fn is_off_left(&self) -> bool {
        self.right() < 0.0
    }

    /// Closed-interval overlap on both axes.
    ///
    /// Touching edges count as overlapping.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.horizontal().overlaps(&other.horizontal()) && self.vertical().overlaps(&other.vertical())
    }
}

/// A closed interval `[start, end]` on one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f32,
    pub end: f32,
}

impl Span {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Separating-axis test: `[a0,a1]` and `[b0,b1]` overlap iff `a1 >= b0 && b1 >= a0`
    pub fn overlaps(&self, other: &Span) -> bool {
        self.end >= other.start && other.end >= self.start
    }
}

/// Collision box relative to a sprite's top-left corner.
///
/// A zero `w` or `h` stands for the sprite's full width or height, so a
/// default hitbox covers the whole sprite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub w: f32,
    #[serde(default)]
    pub h: f32,
}

impl Hitbox {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Replace zero extents with the sprite's own size
    pub fn resolve(self, sprite_w: f32, sprite_h: f32) -> Self {
        Self {
            w: if self.w == 0.0 { sprite_w } else { self.w },
            h: if self.h == 0.0 { sprite_h } else { self.h },
            ..self
        }
    }

    /// The hitbox placed on screen relative to `origin`
    pub fn place(&self, origin: &Rect) -> Rect {
        Rect::new(origin.x + self.x, origin.y + self.y, self.w, self.h)
    }
}
