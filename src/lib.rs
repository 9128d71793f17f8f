pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod presentation;
pub mod replay;
pub mod state;
pub mod surface;
pub use error::{AppError, AppResult};

use std::path::Path;

/// Entrypoint used by the CLI: replays a scenario file and prints one JSON frame per step.
pub fn run(scenario_path: &Path) -> AppResult<()> {
    logging::init();
    tracing::info!(path = %scenario_path.display(), "replaying scenario");

    let scenario = replay::load_scenario(scenario_path)?;
    let fallback = match scenario.config {
        Some(_) => config::ZoomConfig::default(),
        None => config::load_zoom_config(),
    };
    let frames = replay::replay(&scenario, fallback);
    replay::write_frames(std::io::stdout().lock(), &frames)?;

    match frames.last() {
        Some(last) => tracing::info!(
            steps = frames.len(),
            final_state = %last.state,
            "replay complete"
        ),
        None => tracing::info!("scenario has no steps"),
    }
    Ok(())
}
