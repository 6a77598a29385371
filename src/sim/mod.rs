//! Deterministic simulation module
//!
//! All chiseling logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Single thread of control (pokes are atomic with respect to physics ticks)
//! - No rendering or platform dependencies

pub mod brightness;
pub mod coords;
pub mod erosion;
pub mod raster;
pub mod state;
pub mod tick;

pub use brightness::{perceived_brightness, perceived_brightness_batch};
pub use coords::{Mapper, Viewport};
pub use erosion::{PokeOutcome, poke, poke_power};
pub use raster::Boulder;
pub use state::{Pebble, SessionState, Tool};
pub use tick::step_pebbles;
