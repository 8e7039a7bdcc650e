use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use rusted_physics::demos::Scenario;
use rusted_physics::{DrawList, Stepper};

/// Simulated length of a run when none is given
const DEFAULT_SECONDS: f64 = 10.0;

/// Headless frames are spaced as if drawn at 60 Hz
const FRAME_TIME: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let scenario: Scenario = args.next().as_deref().unwrap_or("nbodies").parse()?;
    let seconds: f64 = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("Invalid duration '{arg}', expected seconds"))?,
        None => DEFAULT_SECONDS,
    };

    info!("Starting Rusted Physics: {scenario} for {seconds}s");

    let mut demo = scenario.build()?;
    let mut stepper = Stepper::new();
    let mut next_report = 1.0;

    'frames: while stepper.simulated_time() < seconds {
        let steps = stepper.advance(FRAME_TIME);
        for _ in 0..steps {
            if !demo.step(stepper.timestep())? {
                info!("{} finished early", demo.name());
                break 'frames;
            }
        }

        if stepper.simulated_time() >= next_report {
            let draw_list = DrawList::from_scene(demo.scene());
            info!(
                "t={:.1}s bodies={} forces={} triangles={} ({} bytes)",
                stepper.simulated_time(),
                demo.scene().body_count(),
                demo.scene().force_count(),
                draw_list.triangle_count(),
                draw_list.as_bytes().len()
            );
            next_report += 1.0;
        }
    }

    info!(
        "Done after {} frames, {} ticks",
        stepper.frame_count(),
        stepper.tick_count()
    );
    Ok(())
}
