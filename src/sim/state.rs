//! Session state and core simulation types
//!
//! One `SessionState` per active boulder; reset/load replace it wholesale
//! rather than patching it incrementally.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::raster::Boulder;

/// Erosion aggressiveness selector. Maps to a brightness threshold
/// multiplier: only pixels at least `TOOL_THRESHOLD_STEP * factor` bright
/// are eligible, so harder tools bite only into lighter stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Erodes everything (threshold 0)
    #[default]
    Soft,
    Medium,
    Hard,
}

impl Tool {
    pub fn from_index(i: u8) -> Option<Self> {
        match i {
            0 => Some(Tool::Soft),
            1 => Some(Tool::Medium),
            2 => Some(Tool::Hard),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Tool::Soft => 0,
            Tool::Medium => 1,
            Tool::Hard => 2,
        }
    }

    /// Brightness threshold multiplier.
    pub fn threshold_factor(self) -> f32 {
        self.index() as f32
    }
}

/// An ephemeral falling particle dislodged from a fully eroded pixel.
///
/// Position and velocity are in touch-normalized space. Invariants: `pos.y`
/// never goes negative (floor clamp), and `pos.x` reflects off the session
/// walls at 0 and 1 by velocity-sign inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pebble {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Pre-erosion RGBA of the source pixel, for rendering.
    pub color: [u8; 4],
}

/// Process-wide state for the active boulder.
#[derive(Debug)]
pub struct SessionState {
    pub boulder: Boulder,
    /// Live pebbles, stepped once per physics tick.
    pub pebbles: Vec<Pebble>,
    pub tool: Tool,
    /// When false, press/drag handling is suppressed; pebbles keep falling.
    pub enabled: bool,
}

impl SessionState {
    pub fn new(boulder: Boulder) -> Self {
        Self {
            boulder,
            pebbles: Vec::new(),
            tool: Tool::default(),
            enabled: true,
        }
    }

    /// Discard the raster and every live pebble, then load a fresh random
    /// builtin boulder. Tool selection and the enabled flag survive (they
    /// belong to the surrounding UI, not the boulder).
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        *self = Self {
            boulder: Boulder::random(rng),
            pebbles: Vec::new(),
            tool: self.tool,
            enabled: self.enabled,
        };
    }

    /// Swap in a boulder loaded from a snapshot, invalidating live pebbles.
    pub fn replace_boulder(&mut self, boulder: Boulder) {
        self.boulder = boulder;
        self.pebbles.clear();
    }
}
