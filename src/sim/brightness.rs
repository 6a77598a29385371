//! Perceptual brightness model
//!
//! CIE-derived lightness approximation used as the erosion threshold test:
//! sRGB decode -> luminance -> L* on a 0..100 scale. Total function, no
//! error conditions; identical results whether applied to one color or a
//! batch.

/// sRGB transfer function breakpoint
const SRGB_BREAK: f32 = 0.04045;
/// CIE lightness breakpoint (below this, L* is linear in luminance)
const CIE_BREAK: f32 = 0.008856;
/// Rec. 709 luminance weights for linear R, G, B
const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= SRGB_BREAK {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Perceived brightness of an 8-bit RGB color, roughly 0..100.
///
/// Black maps to ~0 and white to ~100 (within rounding).
pub fn perceived_brightness(rgb: [u8; 3]) -> f32 {
    let mut luminance = 0.0;
    for (channel, weight) in rgb.iter().zip(LUMA_WEIGHTS) {
        luminance += srgb_to_linear(*channel as f32 / 255.0) * weight;
    }
    if luminance <= CIE_BREAK {
        luminance * 903.3
    } else {
        luminance.powf(1.0 / 3.0) * 116.0 - 16.0
    }
}

/// Batch form of [`perceived_brightness`]; pixel-count invariant by
/// construction (one independent evaluation per color).
pub fn perceived_brightness_batch(colors: &[[u8; 3]]) -> Vec<f32> {
    colors.iter().copied().map(perceived_brightness).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_black_and_white_endpoints() {
        assert!(perceived_brightness([0, 0, 0]).abs() < 0.01);
        assert!((perceived_brightness([255, 255, 255]) - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_green_brighter_than_blue() {
        // Luminance weights make pure green far brighter than pure blue
        assert!(perceived_brightness([0, 255, 0]) > perceived_brightness([0, 0, 255]));
    }

    #[test]
    fn test_batch_matches_scalar() {
        let colors = [[0, 0, 0], [40, 40, 40], [128, 64, 200], [255, 255, 255]];
        let batch = perceived_brightness_batch(&colors);
        for (color, b) in colors.iter().zip(&batch) {
            assert_eq!(perceived_brightness(*color), *b);
        }
    }

    proptest! {
        #[test]
        fn prop_brightness_in_range(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let v = perceived_brightness([r, g, b]);
            prop_assert!((-0.01..=100.01).contains(&v));
        }

        #[test]
        fn prop_gray_monotonic(v in 0u8..255) {
            prop_assert!(perceived_brightness([v + 1; 3]) > perceived_brightness([v; 3]));
        }
    }
}
