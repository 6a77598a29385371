//! Raster state: the mutable boulder image.
//!
//! Row-major RGBA with the origin at the bottom-left (row index increases
//! upward, matching the simulation's y-up convention). The `texture` buffer
//! is the render-facing mirror of `pixels`; mutation happens on `pixels`
//! and [`Boulder::sync_texture`] republishes it once per poke.

use image::RgbaImage;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::ChiselError;
use crate::consts::{BOULDER_VARIANTS, IMAGE_DIM};

/// Background fill used when exporting without transparency (warm stone-shed gray).
pub const EXPORT_BACKGROUND: [u8; 4] = [211, 206, 199, 255];

/// The destructible boulder raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Boulder {
    width: usize,
    height: usize,
    /// RGBA, row-major, bottom-left origin. Mutated only by the erosion engine.
    pixels: Vec<u8>,
    /// Render mirror of `pixels`, republished via `sync_texture`.
    texture: Vec<u8>,
}

impl Boulder {
    /// Build a boulder from raw RGBA bytes (bottom-left origin).
    ///
    /// Fails with a format error when the byte count doesn't match the
    /// dimensions; used by snapshot decoding and tests.
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, ChiselError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| ChiselError::SnapshotFormat("dimensions overflow".into()))?;
        if width == 0 || height == 0 {
            return Err(ChiselError::SnapshotFormat(format!(
                "empty raster ({width}x{height})"
            )));
        }
        if pixels.len() != expected {
            return Err(ChiselError::SnapshotFormat(format!(
                "pixel payload is {} bytes, expected {expected} for {width}x{height} RGBA",
                pixels.len()
            )));
        }
        let texture = pixels.clone();
        Ok(Self {
            width,
            height,
            pixels,
            texture,
        })
    }

    /// One of the builtin starting boulders, deterministic per variant.
    ///
    /// A lumpy ellipse with a few angular harmonics for the silhouette and
    /// seeded grain for the stone surface. The same variant always produces
    /// the identical raster.
    pub fn builtin(variant: u32) -> Self {
        let variant = variant % BOULDER_VARIANTS;
        let mut rng = Pcg32::seed_from_u64(0xC4153E1u64 ^ (variant as u64).wrapping_mul(0x9E37_79B9));

        let base: f32 = rng.random_range(125.0..190.0);
        let mut amps = [0f32; 4];
        let mut phases = [0f32; 4];
        for k in 0..4 {
            amps[k] = rng.random_range(0.02..0.09);
            phases[k] = rng.random_range(0.0..std::f32::consts::TAU);
        }

        let dim = IMAGE_DIM;
        let mut pixels = vec![0u8; dim * dim * 4];
        for y in 0..dim {
            for x in 0..dim {
                let nx = (x as f32 + 0.5) / dim as f32 * 2.0 - 1.0;
                let ny = (y as f32 + 0.5) / dim as f32 * 2.0 - 1.0;
                let angle = ny.atan2(nx);
                let mut radius = 0.82;
                for k in 0..4 {
                    radius += amps[k] * ((k as f32 + 2.0) * angle + phases[k]).sin();
                }
                let d = (nx * nx + ny * ny).sqrt();
                if d > radius {
                    continue;
                }
                // Shade toward the rim, grain for texture
                let shade = base * (1.0 - 0.35 * (d / radius).powi(2));
                let grain: f32 = rng.random_range(-12.0..12.0);
                let v = (shade + grain).clamp(30.0, 235.0) as u8;
                let i = (y * dim + x) * 4;
                pixels[i] = v;
                pixels[i + 1] = v.saturating_sub(4);
                pixels[i + 2] = v.saturating_sub(9);
                pixels[i + 3] = 255;
            }
        }

        let mut boulder =
            Self::from_raw(dim, dim, pixels).expect("builtin boulder dimensions are valid");
        boulder.cleanup_alpha();
        boulder.sync_texture();
        boulder
    }

    /// Pick a random builtin boulder.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::builtin(rng.random_range(0..BOULDER_VARIANTS))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, bottom-left origin. Exact snapshot payload.
    pub fn raw_pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Render-facing RGBA buffer. Reflects the grid as of the last
    /// [`Boulder::sync_texture`] call.
    pub fn texture(&self) -> &[u8] {
        &self.texture
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "raster index out of bounds");
        (y * self.width + x) * 4
    }

    /// RGBA of one pixel.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.idx(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Overwrite a pixel's RGB, alpha untouched (partial erosion).
    pub fn set_rgb(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = self.idx(x, y);
        self.pixels[i..i + 3].copy_from_slice(&rgb);
    }

    /// Zero a pixel's alpha. Once cleared the pixel is permanently empty and
    /// skipped by all future erosion.
    pub fn clear_alpha(&mut self, x: usize, y: usize) {
        let i = self.idx(x, y);
        self.pixels[i + 3] = 0;
    }

    /// Force near-opaque alpha fully opaque, so the transparency test stays
    /// binary-clean against antialiased source edges.
    pub fn cleanup_alpha(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            if px[3] > 127 {
                px[3] = 255;
            }
        }
    }

    /// Republish the pixel grid to the render mirror. Called once per poke,
    /// after all pixel writes for that poke have been batched.
    pub fn sync_texture(&mut self) {
        self.texture.copy_from_slice(&self.pixels);
    }

    /// Visible composition for export: the raster over a solid background,
    /// or alone when `transparent_background` is set. Top-left origin, as
    /// image files expect.
    pub fn composite(&self, transparent_background: bool) -> RgbaImage {
        let mut img = RgbaImage::new(self.width as u32, self.height as u32);
        for (row, out_y) in (0..self.height).rev().zip(0..self.height) {
            for x in 0..self.width {
                let src = self.pixel(x, row);
                let out = if src[3] == 255 {
                    src
                } else if transparent_background {
                    src
                } else {
                    // Alpha-over onto the background fill
                    let a = src[3] as u32;
                    let mut blended = [0u8; 4];
                    for c in 0..3 {
                        blended[c] =
                            ((src[c] as u32 * a + EXPORT_BACKGROUND[c] as u32 * (255 - a)) / 255)
                                as u8;
                    }
                    blended[3] = 255;
                    blended
                };
                img.put_pixel(x as u32, out_y as u32, image::Rgba(out));
            }
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_deterministic() {
        let a = Boulder::builtin(2);
        let b = Boulder::builtin(2);
        assert_eq!(a, b);
        // Different variants differ
        assert_ne!(a, Boulder::builtin(3));
    }

    #[test]
    fn test_builtin_alpha_is_binary() {
        let boulder = Boulder::builtin(0);
        let mut opaque = 0usize;
        for px in boulder.raw_pixels().chunks_exact(4) {
            assert!(px[3] == 0 || px[3] == 255);
            opaque += (px[3] == 255) as usize;
        }
        // The blob covers a meaningful share of the raster
        assert!(opaque > IMAGE_DIM * IMAGE_DIM / 4);
    }

    #[test]
    fn test_from_raw_rejects_bad_length() {
        assert!(matches!(
            Boulder::from_raw(10, 10, vec![0u8; 10]),
            Err(ChiselError::SnapshotFormat(_))
        ));
        assert!(matches!(
            Boulder::from_raw(0, 10, Vec::new()),
            Err(ChiselError::SnapshotFormat(_))
        ));
    }

    #[test]
    fn test_texture_syncs_after_mutation() {
        let mut boulder = Boulder::from_raw(2, 2, vec![200u8; 16]).unwrap();
        boulder.set_rgb(0, 0, [1, 2, 3]);
        boulder.clear_alpha(1, 1);
        // Mirror is stale until syncd
        assert_eq!(boulder.texture()[0], 200);
        boulder.sync_texture();
        assert_eq!(&boulder.texture()[0..4], &[1, 2, 3, 200]);
        assert_eq!(boulder.texture()[15], 0);
    }

    #[test]
    fn test_cleanup_alpha_forces_opaque() {
        let mut pixels = vec![100u8; 16];
        pixels[3] = 130; // near-opaque -> 255
        pixels[7] = 90; // stays as-is
        pixels[11] = 0;
        let mut boulder = Boulder::from_raw(2, 2, pixels).unwrap();
        boulder.cleanup_alpha();
        assert_eq!(boulder.pixel(1, 0)[3], 255);
        assert_eq!(boulder.pixel(0, 1)[3], 90);
        assert_eq!(boulder.pixel(1, 1)[3], 0);
    }

    #[test]
    fn test_composite_flips_rows_and_fills_background() {
        let mut pixels = vec![0u8; 2 * 2 * 4];
        // Bottom-left pixel opaque red
        pixels[0] = 255;
        pixels[3] = 255;
        let boulder = Boulder::from_raw(2, 2, pixels).unwrap();

        let img = boulder.composite(false);
        // Bottom-left lands at image row 1 (top-left origin)
        assert_eq!(img.get_pixel(0, 1).0, [255, 0, 0, 255]);
        // Empty pixels take the background fill
        assert_eq!(img.get_pixel(1, 0).0, EXPORT_BACKGROUND);

        let transparent = boulder.composite(true);
        assert_eq!(transparent.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }
}
