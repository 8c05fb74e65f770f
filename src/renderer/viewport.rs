//! World-to-pixel projection
//!
//! The world is a square, y up, `world_width` units on a side. It is drawn
//! into the largest square that fits the canvas, y down, with lengths rounded
//! up to whole pixels.

use glam::{IVec2, Vec2};

/// Square pixel viewport onto the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Side length in pixels
    pub size_px: u32,
    pub pixels_per_unit: f32,
}

impl Viewport {
    pub fn new(size_px: u32, world_width: f32) -> Self {
        let size_px = size_px.max(1);
        Self {
            size_px,
            pixels_per_unit: size_px as f32 / world_width,
        }
    }

    /// Largest square viewport inside a `width` x `height` canvas
    pub fn fit(width: u32, height: u32, world_width: f32) -> Self {
        Self::new(width.min(height), world_width)
    }

    /// World length to pixels (rounded up)
    #[inline]
    pub fn to_pixels(&self, length: f32) -> i32 {
        (length * self.pixels_per_unit).ceil() as i32
    }

    /// World y (up) to pixel row (down)
    #[inline]
    pub fn y_to_pixels(&self, y: f32) -> i32 {
        self.size_px as i32 - 1 - self.to_pixels(y)
    }

    /// World position to snapped pixel position
    #[inline]
    pub fn world_to_pixel(&self, pos: Vec2) -> IVec2 {
        IVec2::new(self.to_pixels(pos.x), self.y_to_pixels(pos.y))
    }

    /// Pixels to world length
    #[inline]
    pub fn to_units(&self, pixels: f32) -> f32 {
        pixels / self.pixels_per_unit
    }

    /// Pixel position (y down) to world position (y up)
    #[inline]
    pub fn pixel_to_world(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            self.to_units(x),
            self.to_units(self.size_px as f32 - 1.0 - y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WORLD_WIDTH;

    #[test]
    fn test_fit_uses_shorter_side() {
        let viewport = Viewport::fit(1600, 500, WORLD_WIDTH);
        assert_eq!(viewport.size_px, 500);
        assert_eq!(viewport.pixels_per_unit, 0.5);
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let viewport = Viewport::new(1000, WORLD_WIDTH);
        assert_eq!(viewport.world_to_pixel(Vec2::new(0.0, 0.0)), IVec2::new(0, 999));
        assert_eq!(viewport.world_to_pixel(Vec2::new(250.0, 999.0)), IVec2::new(250, 0));
    }

    #[test]
    fn test_lengths_round_up() {
        let viewport = Viewport::new(333, WORLD_WIDTH);
        assert_eq!(viewport.to_pixels(10.0), 4);
        assert_eq!(viewport.to_pixels(0.0), 0);
    }

    #[test]
    fn test_inverse_projection() {
        let viewport = Viewport::new(500, WORLD_WIDTH);
        let world = viewport.pixel_to_world(100.0, 399.0);
        assert!((world - Vec2::new(200.0, 200.0)).length() < 1e-4);

        // Forward then back lands within a pixel
        let pos = Vec2::new(612.0, 371.0);
        let px = viewport.world_to_pixel(pos);
        let back = viewport.pixel_to_world(px.x as f32, px.y as f32);
        assert!((back - pos).length() <= 2.0 / viewport.pixels_per_unit);
    }
}
