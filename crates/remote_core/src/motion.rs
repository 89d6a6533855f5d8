//! Bouncing-word kinematics in display pixels.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Drawable area of the display surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Rendered size of a word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn of_text(text: &str, glyph_width: f32, line_height: f32) -> Self {
        Self {
            width: text.chars().count() as f32 * glyph_width,
            height: line_height,
        }
    }
}

/// Per-axis speed magnitude in pixels per frame, `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let spread = (self.max - self.min).max(0.0);
        let magnitude = self.min + rng.gen::<f32>() * spread;
        if rng.gen_bool(0.5) {
            magnitude
        } else {
            -magnitude
        }
    }

    /// Independent magnitude and sign for each axis.
    pub fn random_velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(self.sample(rng), self.sample(rng))
    }
}

/// Top-left corner such that the whole word starts on screen when it fits.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, extent: Extent, bounds: Bounds) -> Vec2 {
    let max_x = (bounds.width - extent.width).max(0.0);
    let max_y = (bounds.height - extent.height).max(0.0);
    Vec2::new(rng.gen::<f32>() * max_x, rng.gen::<f32>() * max_y)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Body {
    /// Advances one frame, then reflects the velocity on any axis whose
    /// leading or trailing edge reached the display edge.
    pub fn step(&mut self, extent: Extent, bounds: Bounds) {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        self.velocity.x = reflect(self.position.x, extent.width, bounds.width, self.velocity.x);
        self.velocity.y = reflect(self.position.y, extent.height, bounds.height, self.velocity.y);
    }
}

// After an edge contact the velocity always points back inside.
fn reflect(position: f32, size: f32, limit: f32, velocity: f32) -> f32 {
    if position <= 0.0 {
        velocity.abs()
    } else if position + size >= limit {
        -velocity.abs()
    } else {
        velocity
    }
}
