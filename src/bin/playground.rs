//! Interactive gesture playground
//!
//! Drag the shapes around, pinch to zoom, and watch the log for taps,
//! swipes and long presses. `RUST_LOG` overrides the profile's log filter.

use config::ConfigError;
use gesture_canvas::app::{App, AppConfig, AppError};
use gesture_canvas::build_info;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

/// Loads the profile named by `APP_PROFILE`, which must exist if set.
/// Without it, a missing release profile falls back to built-in values and
/// the load error is handed back for logging.
fn load_config() -> Result<(AppConfig, Option<ConfigError>), AppError> {
    match std::env::var("APP_PROFILE") {
        Ok(profile) => Ok((AppConfig::load(&profile)?, None)),
        Err(_) => match AppConfig::load("release") {
            Ok(config) => Ok((config, None)),
            Err(e) => Ok((AppConfig::fallback(), Some(e))),
        },
    }
}

fn main() -> Result<(), AppError> {
    let (config, fallback) = load_config()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(e) = fallback {
        warn!(error = %e, "Failed to load config, using default configuration");
    }

    if config.canvas.width <= 0.0 || config.canvas.height <= 0.0 {
        warn!(?config.canvas, "degenerate canvas resolution, input will map 1:1");
    }
    info!(version = %build_info::version_string(), "gesture playground");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
