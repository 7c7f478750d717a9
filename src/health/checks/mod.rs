//! Built-in health checks for core systems

pub mod build_info;
pub mod config;
pub mod gestures;

pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use gestures::GestureCheck;
