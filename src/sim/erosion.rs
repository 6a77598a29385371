//! Erosion engine
//!
//! A poke darkens a 3x3 pixel neighborhood; pixels whose darkened color
//! falls under the clearing brightness go fully transparent and dislodge a
//! pebble carrying the pixel's pre-erosion color. All pixel writes for a
//! poke are batched before the single texture re-sync.
//!
//! Neighborhood bounds use half-open ranges, `max(0, c-R) .. min(dim, c+R+1)`
//! (exclusive upper bound), the one convention used everywhere in this crate.

use glam::Vec2;

use crate::consts::{MAX_PEBBLES, POKE_RADIUS};
use crate::sim::brightness::perceived_brightness;
use crate::sim::coords::Mapper;
use crate::sim::state::{Pebble, SessionState};
use crate::tuning::Tuning;

/// What a single poke did. All zeros with `rejected` set means the touch
/// landed off the boulder (silent no-op, not an error).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PokeOutcome {
    /// Pixels darkened but still solid
    pub darkened: usize,
    /// Pixels fully eroded (alpha -> 0)
    pub cleared: usize,
    /// Pebbles actually spawned (cleared minus dislodge-gated)
    pub spawned: usize,
    /// Touch was outside the boulder or the session rejected it
    pub rejected: bool,
}

impl PokeOutcome {
    pub fn rejected() -> Self {
        Self {
            rejected: true,
            ..Self::default()
        }
    }
}

/// Force vector imparted on a pixel by a poke, in touch-normalized units per
/// tick. Magnitude follows `max(K * |touch_delta|^2, min_power) /
/// max(min_distance_sq, dist^2)`, directed from the touch point toward the
/// pixel: a faster swing ejects faster pebbles, falloff is sharp with
/// distance, and pixels are always pushed away from the touch.
pub fn poke_power(touch: Vec2, touch_delta: Vec2, pixel_pos: Vec2, tuning: &Tuning) -> Vec2 {
    let d = pixel_pos - touch;
    let dist_sq = d.length_squared().max(tuning.min_distance_sq);
    let swing = touch_delta.length_squared();
    let power = (tuning.chisel_power * swing).max(tuning.min_power) / dist_sq;
    power * d
}

/// Perform one erosion pass at a touch position.
///
/// `touch` and `touch_delta` are in touch-normalized space; `touch_delta` is
/// the per-tick touch displacement (velocity proxy). Mutates the boulder and
/// may append pebbles; re-syncs the texture exactly once.
pub fn poke(
    state: &mut SessionState,
    mapper: &Mapper,
    touch: Vec2,
    touch_delta: Vec2,
    tuning: &Tuning,
) -> PokeOutcome {
    let Some(norm) = mapper.touch_to_boulder(touch) else {
        return PokeOutcome::rejected();
    };

    let (w, h) = (state.boulder.width(), state.boulder.height());
    let (cx, cy) = mapper.boulder_to_pixel(norm, w, h);

    let x0 = cx.saturating_sub(POKE_RADIUS);
    let x1 = (cx + POKE_RADIUS + 1).min(w);
    let y0 = cy.saturating_sub(POKE_RADIUS);
    let y1 = (cy + POKE_RADIUS + 1).min(h);

    let threshold = tuning.tool_threshold_step * state.tool.threshold_factor();

    let mut outcome = PokeOutcome::default();
    for y in y0..y1 {
        for x in x0..x1 {
            let [r, g, b, a] = state.boulder.pixel(x, y);
            // Empty pixels are permanently out of play
            if a == 0 {
                continue;
            }
            if perceived_brightness([r, g, b]) < threshold {
                continue;
            }

            let darker = [r, g, b].map(|c| (c as f32 * tuning.darken_factor) as u8);
            if perceived_brightness(darker) < tuning.clear_brightness {
                state.boulder.clear_alpha(x, y);
                outcome.cleared += 1;

                let pos = mapper.pixel_to_touch(x, y, w, h);
                let mut vel = poke_power(touch, touch_delta, pos, tuning);
                let speed = vel.length();
                // Dislodge gate: too-gentle pokes crumble the pixel to dust
                // with no falling pebble
                if speed >= tuning.min_dislodge_speed {
                    if speed > tuning.max_pebble_speed {
                        vel *= tuning.max_pebble_speed / speed;
                    }
                    if state.pebbles.len() >= MAX_PEBBLES {
                        state.pebbles.remove(0);
                    }
                    state.pebbles.push(Pebble {
                        pos,
                        vel,
                        color: [r, g, b, a],
                    });
                    outcome.spawned += 1;
                }
            } else {
                state.boulder.set_rgb(x, y, darker);
                outcome.darkened += 1;
            }
        }
    }

    // Single texture upload per poke, after all pixel writes
    state.boulder.sync_texture();
    outcome
}
