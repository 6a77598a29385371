//! The session: one boulder, its pebbles, and the external contract.
//!
//! Everything the surrounding UI calls goes through here: press/drag entry
//! points, tool selection, enable/disable, reset, save/load/export, and the
//! fixed-timestep `advance` that steps pebble physics. All mutation happens
//! through `&mut self`, so a poke is atomic with respect to a physics tick.

use std::path::Path;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::ChiselError;
use crate::audio::SoundCue;
use crate::consts::{MAX_SUBSTEPS, PHYSICS_DT};
use crate::persistence;
use crate::sim::coords::{Mapper, Viewport};
use crate::sim::erosion::{self, PokeOutcome};
use crate::sim::raster::Boulder;
use crate::sim::state::{Pebble, SessionState, Tool};
use crate::sim::tick;
use crate::tuning::Tuning;

/// Result of a press: the erosion outcome plus the strike cue to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressOutcome {
    pub poke: PokeOutcome,
    /// `None` when the session is disabled (no strike happened).
    pub sound: Option<SoundCue>,
}

/// An active chiseling session.
pub struct Session {
    state: SessionState,
    mapper: Mapper,
    tuning: Tuning,
    rng: Pcg32,
    /// Seconds until the next drag poke is allowed
    drag_cooldown: f32,
    /// Fixed-timestep accumulator for pebble physics
    accumulator: f32,
}

impl Session {
    /// New session with a random starting boulder.
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let boulder = Boulder::random(&mut rng);
        log::info!(
            "session start: {}x{} boulder, seed {seed}",
            boulder.width(),
            boulder.height()
        );
        Self {
            state: SessionState::new(boulder),
            mapper: Mapper::default(),
            tuning,
            rng,
            drag_cooldown: 0.0,
            accumulator: 0.0,
        }
    }

    /// Press entry point: one poke plus one randomly chosen sound cue.
    /// No-op while the session is disabled.
    pub fn on_press(&mut self, touch: Vec2, touch_delta: Vec2) -> PressOutcome {
        if !self.state.enabled {
            return PressOutcome {
                poke: PokeOutcome::rejected(),
                sound: None,
            };
        }
        let poke = erosion::poke(&mut self.state, &self.mapper, touch, touch_delta, &self.tuning);
        PressOutcome {
            poke,
            sound: Some(SoundCue::random(&mut self.rng)),
        }
    }

    /// Drag entry point. Rate-limited: at most one poke per cooldown window
    /// no matter how many drag events arrive; the window is ticked down by
    /// [`Session::advance`].
    pub fn on_drag(&mut self, touch: Vec2, touch_delta: Vec2) -> PokeOutcome {
        if !self.state.enabled || self.drag_cooldown > 0.0 {
            return PokeOutcome::rejected();
        }
        self.drag_cooldown = self.tuning.drag_cooldown;
        erosion::poke(&mut self.state, &self.mapper, touch, touch_delta, &self.tuning)
    }

    /// Advance wall time: runs fixed physics ticks out of an accumulator and
    /// decays the drag cooldown. Returns the number of ticks run.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = dt.min(0.25);
        self.drag_cooldown = (self.drag_cooldown - dt).max(0.0);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= PHYSICS_DT && steps < MAX_SUBSTEPS {
            let settled = tick::step_pebbles(&mut self.state.pebbles, &self.tuning);
            if settled > 0 {
                log::debug!("{settled} pebbles settled, {} live", self.state.pebbles.len());
            }
            self.accumulator -= PHYSICS_DT;
            steps += 1;
        }
        steps
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.state.tool = tool;
    }

    pub fn tool(&self) -> Tool {
        self.state.tool
    }

    /// Pause/resume interaction handling. Pebbles keep falling while
    /// disabled; only press/drag are suppressed.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.mapper.set_viewport(viewport);
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// Discard the boulder and all pebbles; load a fresh random boulder.
    pub fn reset(&mut self) {
        self.state.reset(&mut self.rng);
        self.drag_cooldown = 0.0;
        self.accumulator = 0.0;
        log::info!("session reset");
    }

    pub fn boulder(&self) -> &Boulder {
        &self.state.boulder
    }

    pub fn pebbles(&self) -> &[Pebble] {
        &self.state.pebbles
    }

    /// Screen placement for one pebble under the current viewport.
    pub fn pebble_screen_pos(&self, pebble: &Pebble) -> Vec2 {
        self.mapper.touch_to_screen(pebble.pos)
    }

    /// Screen size of a pebble glyph under the current viewport.
    pub fn pebble_screen_size(&self) -> Vec2 {
        self.mapper
            .pebble_size(self.state.boulder.width(), self.state.boulder.height())
    }

    /// Serialize the raster to a snapshot file. Returns bytes written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<u64, ChiselError> {
        persistence::save_snapshot(path, &self.state.boulder)
    }

    /// Replace the raster from a snapshot file. On any failure the previous
    /// session state is left fully intact.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ChiselError> {
        let boulder = persistence::load_snapshot(path)?;
        log::info!("loaded {}x{} snapshot", boulder.width(), boulder.height());
        self.state.replace_boulder(boulder);
        Ok(())
    }

    /// Export the visible composition as a PNG.
    pub fn export_image<P: AsRef<Path>>(
        &self,
        path: P,
        transparent_background: bool,
    ) -> Result<(), ChiselError> {
        persistence::export_png(path, &self.state.boulder, transparent_background)
    }
}
