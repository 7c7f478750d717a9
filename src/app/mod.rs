//! Application module
//!
//! Handles windowing, configuration and pointer input.

pub mod config;
pub mod error;
pub mod input;
mod runner;
mod window;

pub use config::{AppConfig, CanvasConfig, LoggingConfig, WindowConfig};
pub use error::AppError;
pub use runner::App;
pub use window::window_attributes_from_config;
