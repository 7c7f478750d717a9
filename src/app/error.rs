//! Application-boundary errors

use thiserror::Error;

/// Failures that can stop the playground from starting
///
/// The gesture pipeline itself is infallible; only configuration and the
/// windowing system can fail.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}
