//! Axis-aligned hitboxes and overlap tests

use glam::Vec2;

/// An axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a hitbox centered on `pos`
    pub fn centered(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            x: pos.x - width / 2.0,
            y: pos.y - height / 2.0,
            width,
            height,
        }
    }

    /// Axis-aligned rectangle overlap (strict, zero-area boxes never hit)
    pub fn intersects(&self, other: &Hitbox) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}
