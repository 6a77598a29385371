//! Chisel entry point
//!
//! Thin headless launcher: builds a session, runs a short scripted chiseling
//! pass through the external contract, then saves a snapshot and exports a
//! PNG. The GUI that would normally drive the session lives outside this
//! crate.

use glam::Vec2;

use chisel::consts::PHYSICS_DT;
use chisel::{ChiselError, Session, Tuning};

fn main() -> Result<(), ChiselError> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let tuning = match std::env::var("CHISEL_TUNING") {
        Ok(path) => Tuning::from_json_file(path)?,
        Err(_) => Tuning::default(),
    };
    let mut session = Session::with_tuning(seed, tuning);

    // Sweep a few diagonal strokes across the boulder
    let mut pokes = 0;
    let mut spawned = 0;
    for stroke in 0..4 {
        let y = 0.35 + stroke as f32 * 0.12;
        for i in 0..30 {
            let t = i as f32 / 30.0;
            let touch = Vec2::new(0.15 + 0.7 * t, y + 0.05 * t);
            let outcome = session.on_drag(touch, Vec2::new(0.02, 0.008));
            if !outcome.rejected {
                pokes += 1;
                spawned += outcome.spawned;
            }
            session.advance(1.0 / 60.0);
        }
    }

    // Let the rubble finish falling
    let mut settle_ticks = 0;
    while !session.pebbles().is_empty() && settle_ticks < 10_000 {
        session.advance(PHYSICS_DT);
        settle_ticks += 1;
    }
    log::info!("{pokes} pokes, {spawned} pebbles dislodged, settled in {settle_ticks} ticks");

    let dir = std::env::temp_dir();
    let snapshot = dir.join("chisel-demo.chsl");
    let export = dir.join("chisel-demo.png");
    let written = session.save(&snapshot)?;
    session.export_image(&export, false)?;
    println!(
        "snapshot: {} ({written} bytes)\nexport:   {}",
        snapshot.display(),
        export.display()
    );
    Ok(())
}
