//! Gesture Canvas
//!
//! Pointer and touch gesture recognition for a 2D canvas, built on winit and glam.

/// Application - windowing, configuration and pointer input
pub mod app;

/// Build-time information (version, target, compiler)
pub mod build_info;

/// Canvas engine tying the scene, camera and gesture pipeline together
pub mod engine;

/// Startup and CI health checks
pub mod health;

/// Scene model - entities, sprites and camera
pub mod sim;

pub use engine::Engine;
