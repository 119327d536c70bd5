use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Factor applied to every channel of a fill color to derive its stroke.
pub const STROKE_DARKEN: f32 = 0.9;

pub const DEFAULT_ACTOR_RADIUS: f32 = 40.0;

/// Straight-alpha color, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Unpack a wire color in 0xRRGGBBAA layout.
    pub fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 24) & 0xff) as f32 / 255.0,
            g: ((packed >> 16) & 0xff) as f32 / 255.0,
            b: ((packed >> 8) & 0xff) as f32 / 255.0,
            a: (packed & 0xff) as f32 / 255.0,
        }
    }

    pub fn darkened(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a * factor,
        }
    }
}

/// A replicated player.
///
/// `position` is what gets drawn; `target` is the last authoritative
/// position from the server. The interpolation pass closes the gap a
/// fraction at a time, so `position` lags `target` by design.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub position: Vec2,
    pub target: Vec2,
    pub radius: f32,
    pub fill: Rgba,
    pub stroke: Rgba,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            target: Vec2::ZERO,
            radius: DEFAULT_ACTOR_RADIUS,
            fill: Rgba::WHITE,
            stroke: Rgba::WHITE.darkened(STROKE_DARKEN),
        }
    }
}

impl Actor {
    pub fn set_fill(&mut self, fill: Rgba) {
        self.fill = fill;
        self.stroke = fill.darkened(STROKE_DARKEN);
    }
}

/// A replicated fruit. Position is fixed at creation; the only thing that
/// changes afterwards is the consumed flag, until the remove event lands.
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub position: Vec2,
    pub fill: Rgba,
    pub consumed: bool,
}

impl Default for Collectible {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            fill: Rgba::WHITE,
            consumed: false,
        }
    }
}

/// Replicated world dimensions, read by the external camera/grid renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_color() {
        let color = Rgba::from_packed(0xff8000ff);
        assert!((color.r - 1.0).abs() < 1e-6);
        assert!((color.g - 128.0 / 255.0).abs() < 1e-6);
        assert!((color.b - 0.0).abs() < 1e-6);
        assert!((color.a - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stroke_derived_from_fill() {
        let mut actor = Actor::default();
        actor.set_fill(Rgba::from_packed(0x4cb050ff));
        assert!((actor.stroke.r - actor.fill.r * STROKE_DARKEN).abs() < 1e-6);
        assert!((actor.stroke.g - actor.fill.g * STROKE_DARKEN).abs() < 1e-6);
        assert!((actor.stroke.b - actor.fill.b * STROKE_DARKEN).abs() < 1e-6);
    }
}
