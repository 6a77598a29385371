//! Chisel - an interactive rock-chiseling simulation
//!
//! Core modules:
//! - `sim`: Destructible raster, erosion model, pebble physics (deterministic, fixed timestep)
//! - `session`: The external contract (poke / tool select / enable / reset / save / load / export)
//! - `persistence`: Versioned binary snapshots and PNG export
//! - `audio`: Sound-cue selection signals (playback is external)
//! - `tuning`: Data-driven erosion/physics balance

pub mod audio;
pub mod persistence;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use sim::{Boulder, Mapper, Pebble, Tool, Viewport};
pub use tuning::Tuning;

use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// Out-of-bounds pokes are not errors (silent no-op), and erosion/physics are
/// total over valid state; only file operations produce recoverable errors.
#[derive(Debug, Error)]
pub enum ChiselError {
    /// Corrupt or incompatible snapshot blob. Recoverable: the previous
    /// session state is left untouched.
    #[error("snapshot format error: {0}")]
    SnapshotFormat(String),
    /// Filesystem failure on save/load/export. The destination never holds a
    /// partial file (writes go through a tmp sibling + rename).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// PNG encode failure during export.
    #[error("image encode error: {0}")]
    Image(#[from] image::ImageError),
    /// Malformed tuning file.
    #[error("tuning parse error: {0}")]
    TuningParse(#[from] serde_json::Error),
}

/// Simulation constants
pub mod consts {
    /// Fixed pebble-physics timestep (30 Hz, decoupled from render rate)
    pub const PHYSICS_DT: f32 = 1.0 / 30.0;
    /// Maximum physics substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Downward acceleration per tick, in touch-normalized units
    pub const GRAVITY: f32 = 0.01;
    /// Per-axis velocity damping per tick
    pub const FRICTION: f32 = 0.9;

    /// Fraction of the surface covered by the boulder raster
    pub const IMAGE_SCALE: f32 = 0.75;
    /// Horizontal margin centering the boulder
    pub const X_OFFSET: f32 = (1.0 - IMAGE_SCALE) / 2.0;
    /// Vertical margin below the boulder (room for pebbles to pile up)
    pub const Y_OFFSET: f32 = 0.1;

    /// Logical raster side length for the builtin boulders
    pub const IMAGE_DIM: usize = 100;
    /// Number of builtin starting boulders
    pub const BOULDER_VARIANTS: u32 = 5;

    /// Poke neighborhood radius (R=1 gives a 3x3 square)
    pub const POKE_RADIUS: usize = 1;

    /// Poke-power law: force scale on the squared touch velocity
    pub const CHISEL_POWER: f32 = 1e3;
    /// Poke-power law: floor on the numerator (a still touch still nudges)
    pub const MIN_POWER: f32 = 1e-5;
    /// Poke-power law: floor on the squared touch-to-pixel distance
    pub const MIN_DISTANCE_SQ: f32 = 1e-3;

    /// Brightness threshold per tool step (tool 0 => always eligible)
    pub const TOOL_THRESHOLD_STEP: f32 = 25.0;
    /// Brightness below which a darkened pixel fully erodes
    pub const CLEAR_BRIGHTNESS: f32 = 15.0;
    /// Multiplicative RGB darkening applied per poke
    pub const DARKEN_FACTOR: f32 = 0.8;

    /// Pebbles slower than this on spawn are dropped (the pixel just vanishes)
    pub const MIN_DISLODGE_SPEED: f32 = 2e-4;
    /// Spawn velocity clamp so pebbles can't fly off-screen
    pub const MAX_PEBBLE_SPEED: f32 = 0.08;
    /// Hard cap on live pebbles; oldest are recycled past this
    pub const MAX_PEBBLES: usize = 512;

    /// Minimum seconds between pokes during a drag
    pub const DRAG_COOLDOWN: f32 = 0.040;

    /// Number of chisel-strike sound cues
    pub const SOUND_CUE_COUNT: u8 = 4;
}
