//! Pointer input and gesture recognition
//!
//! Turns raw mouse and touch input into semantic gesture events delivered to
//! the entity under the pointer and to global listeners.
//!
//! # Architecture
//!
//! ```text
//! Raw Input (winit) → PointerAdapter → PointerInput (client coords)
//!                                            ↓
//!                                 Canvas + Camera mapping
//!                                     (world coords)
//!                                            ↓
//!                                   GestureRecognizer
//!                         (hit test, contact table, long-press timers)
//!                                            ↓
//!                                  dispatch(GestureEvent)
//!                               entity listeners → global listeners
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = Engine::new(canvas, camera).with_scene(world);
//! engine.events_mut().on(GestureKind::Tap, |event| info!(?event.target, "tap"));
//!
//! // In window_event()
//! engine.handle_window_event(&event, clock.elapsed());
//!
//! // Each frame
//! engine.update(clock.elapsed());
//! ```

mod adapter;
mod contact;
mod dispatch;
mod events;
mod hit;
mod mapper;
mod recognizer;
mod timer;

// Re-export public API
pub use adapter::PointerAdapter;
pub use contact::{ContactId, PointerContact, PointerInput, PointerPhase, PointerTable};
pub use dispatch::{EventEmitter, EventLog, Listener, ListenerId, dispatch};
pub use events::{Gesture, GestureEvent, GestureKind, SwipeDirection};
pub use hit::hit_test;
pub use mapper::{Canvas, Rect, client_to_world};
pub use recognizer::{
    DEFAULT_LONG_PRESS_DELAY_MS, DEFAULT_SWIPE_MIN_DISTANCE, DEFAULT_TAP_MAX_DURATION_MS,
    DEFAULT_TAP_MAX_MOVEMENT, DragTarget, GestureContext, GestureRecognizer, GestureThresholds,
    PinchContext, Release, classify_release,
};
pub use timer::{TimerHandle, TimerQueue};
