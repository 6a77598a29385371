//! Coordinate mapping between the three spaces the simulation lives in:
//!
//! - touch space: normalized [0,1]x[0,1] over the whole drawing surface
//! - boulder space: normalized [0,1]x[0,1] over the raster, after removing
//!   the fixed image scale and offsets
//! - screen space: pixels of the current viewport
//!
//! The raster occupies `IMAGE_SCALE` of the surface, offset by `X_OFFSET` /
//! `Y_OFFSET`. Pebbles are stored in touch space, so a viewport resize only
//! rescales their render placement, never their simulated position.

use glam::Vec2;

use crate::consts::{IMAGE_SCALE, X_OFFSET, Y_OFFSET};

/// Rendered surface dimensions in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Maps between touch, boulder, and screen space for the current viewport.
#[derive(Debug, Clone, Copy)]
pub struct Mapper {
    viewport: Viewport,
}

impl Mapper {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the viewport on resize. Screen placement is derived from the
    /// live viewport on every read, so nothing else needs recomputing.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Touch space -> boulder space.
    ///
    /// Returns `None` when the touch lands off the boulder rectangle; the
    /// caller treats that as a silent no-op.
    pub fn touch_to_boulder(&self, touch: Vec2) -> Option<Vec2> {
        let p = (touch - Vec2::new(X_OFFSET, Y_OFFSET)) / IMAGE_SCALE;
        if (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y) {
            Some(p)
        } else {
            None
        }
    }

    /// Boulder space -> integer pixel index, floored.
    ///
    /// The upper edge (norm == 1.0) clamps onto the last row/column so an
    /// in-bounds poke always maps to a valid pixel.
    pub fn boulder_to_pixel(&self, norm: Vec2, width: usize, height: usize) -> (usize, usize) {
        let x = ((norm.x * width as f32) as usize).min(width - 1);
        let y = ((norm.y * height as f32) as usize).min(height - 1);
        (x, y)
    }

    /// Pixel index -> touch space, used to place a freshly dislodged pebble
    /// where its source pixel renders.
    pub fn pixel_to_touch(&self, x: usize, y: usize, width: usize, height: usize) -> Vec2 {
        Vec2::new(
            x as f32 * IMAGE_SCALE / width as f32 + X_OFFSET,
            y as f32 * IMAGE_SCALE / height as f32 + Y_OFFSET,
        )
    }

    /// Touch space -> screen pixels for the current viewport.
    pub fn touch_to_screen(&self, norm: Vec2) -> Vec2 {
        Vec2::new(norm.x * self.viewport.width, norm.y * self.viewport.height)
    }

    /// On-screen size of one raster pixel (also the pebble glyph size).
    pub fn pebble_size(&self, width: usize, height: usize) -> Vec2 {
        Vec2::new(
            IMAGE_SCALE * self.viewport.width / width as f32,
            IMAGE_SCALE * self.viewport.height / height as f32,
        )
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_to_boulder_center() {
        let mapper = Mapper::default();
        let norm = mapper.touch_to_boulder(Vec2::new(0.5, 0.475)).unwrap();
        assert!((norm.x - 0.5).abs() < 1e-6);
        assert!((norm.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_touch_outside_boulder_rejected() {
        let mapper = Mapper::default();
        // Left margin: x offset is 0.125
        assert!(mapper.touch_to_boulder(Vec2::new(0.05, 0.5)).is_none());
        // Below the boulder: y offset is 0.1
        assert!(mapper.touch_to_boulder(Vec2::new(0.5, 0.05)).is_none());
        // Above the boulder: 0.1 + 0.75 = 0.85
        assert!(mapper.touch_to_boulder(Vec2::new(0.5, 0.9)).is_none());
        assert!(mapper.touch_to_boulder(Vec2::new(1.5, 0.5)).is_none());
    }

    #[test]
    fn test_boulder_to_pixel_floors_and_clamps() {
        let mapper = Mapper::default();
        assert_eq!(mapper.boulder_to_pixel(Vec2::new(0.0, 0.0), 100, 100), (0, 0));
        assert_eq!(
            mapper.boulder_to_pixel(Vec2::new(0.499, 0.501), 100, 100),
            (49, 50)
        );
        // The inclusive top edge clamps to the last index
        assert_eq!(
            mapper.boulder_to_pixel(Vec2::new(1.0, 1.0), 100, 100),
            (99, 99)
        );
    }

    #[test]
    fn test_pixel_round_trip() {
        let mapper = Mapper::default();
        for &(x, y) in &[(0, 0), (12, 87), (99, 99)] {
            let touch = mapper.pixel_to_touch(x, y, 100, 100);
            let norm = mapper.touch_to_boulder(touch).unwrap();
            assert_eq!(mapper.boulder_to_pixel(norm, 100, 100), (x, y));
        }
    }

    #[test]
    fn test_resize_rescales_screen_placement_only() {
        let mut mapper = Mapper::new(Viewport {
            width: 800.0,
            height: 600.0,
        });
        let norm = Vec2::new(0.25, 0.5);
        let before = mapper.touch_to_screen(norm);
        assert_eq!(before, Vec2::new(200.0, 300.0));

        mapper.set_viewport(Viewport {
            width: 1600.0,
            height: 1200.0,
        });
        let after = mapper.touch_to_screen(norm);
        assert_eq!(after, before * 2.0);
        // Pebble glyphs scale with the viewport as well
        assert_eq!(
            mapper.pebble_size(100, 100),
            Vec2::new(12.0, 9.0)
        );
    }
}
