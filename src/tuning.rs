//! Data-driven balance for erosion and pebble physics
//!
//! Every feel-critical constant lives in one serde struct so the launcher
//! and tests can tighten or loosen the simulation without recompiling.
//! Defaults mirror the constants in [`crate::consts`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ChiselError;
use crate::consts::*;

/// Tunable simulation parameters. Unknown fields in a tuning file are
/// rejected; missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Downward acceleration per tick (touch-normalized units)
    pub gravity: f32,
    /// Per-axis velocity damping per tick
    pub friction: f32,
    /// Poke-power scale on squared touch velocity
    pub chisel_power: f32,
    /// Poke-power numerator floor
    pub min_power: f32,
    /// Poke-power squared-distance floor
    pub min_distance_sq: f32,
    /// Multiplicative RGB darkening per poke
    pub darken_factor: f32,
    /// Brightness threshold per tool step
    pub tool_threshold_step: f32,
    /// Brightness below which a darkened pixel fully erodes
    pub clear_brightness: f32,
    /// Spawn speeds below this produce no pebble
    pub min_dislodge_speed: f32,
    /// Spawn speed clamp
    pub max_pebble_speed: f32,
    /// Minimum seconds between pokes during a drag
    pub drag_cooldown: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            chisel_power: CHISEL_POWER,
            min_power: MIN_POWER,
            min_distance_sq: MIN_DISTANCE_SQ,
            darken_factor: DARKEN_FACTOR,
            tool_threshold_step: TOOL_THRESHOLD_STEP,
            clear_brightness: CLEAR_BRIGHTNESS,
            min_dislodge_speed: MIN_DISLODGE_SPEED,
            max_pebble_speed: MAX_PEBBLE_SPEED,
            drag_cooldown: DRAG_COOLDOWN,
        }
    }
}

impl Tuning {
    pub fn from_json_str(json: &str) -> Result<Self, ChiselError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ChiselError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
