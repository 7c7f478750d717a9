//! Platform input normalization from winit events

use glam::Vec2;
use tracing::info;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

use super::contact::{ContactId, PointerInput, PointerPhase};

/// Converts winit mouse and touch events into [`PointerInput`]
///
/// Every event the adapter turns into a `PointerInput` is claimed: callers
/// should not forward it to other handlers, so the canvas stays the only
/// interpreter of pointer input.
pub struct PointerAdapter {
    attached: bool,
    scale_factor: f64,
    /// Last cursor position in logical client pixels
    cursor: Option<Vec2>,
    /// Whether the primary mouse button is held
    mouse_down: bool,
}

impl PointerAdapter {
    /// Creates an attached adapter
    pub fn new() -> Self {
        Self {
            attached: true,
            scale_factor: 1.0,
            cursor: None,
            mouse_down: false,
        }
    }

    /// Update scale factor (DPI scaling)
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    pub fn attach(&mut self) {
        if !self.attached {
            info!("pointer input attached");
            self.attached = true;
        }
    }

    /// Stops claiming events. Idempotent.
    pub fn detach(&mut self) {
        if self.attached {
            info!("pointer input detached");
            self.attached = false;
            self.cursor = None;
            self.mouse_down = false;
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Handle a winit window event
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<PointerInput> {
        if let WindowEvent::ScaleFactorChanged { scale_factor, .. } = event {
            self.set_scale_factor(*scale_factor);
            return None;
        }

        if !self.attached {
            return None;
        }

        match event {
            WindowEvent::CursorMoved { position, .. } => Some(self.cursor_moved(*position)),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button),
            WindowEvent::CursorLeft { .. } => Some(self.cursor_left()),
            WindowEvent::Focused(false) => Some(self.cursor_left()),
            WindowEvent::Touch(touch) => Some(self.touch(touch.id, touch.phase, touch.location)),
            _ => None,
        }
    }

    fn logical(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let logical = position.to_logical::<f64>(self.scale_factor);
        Vec2::new(logical.x as f32, logical.y as f32)
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> PointerInput {
        let client = self.logical(position);
        self.cursor = Some(client);
        PointerInput::new(ContactId::Mouse, client, PointerPhase::Move)
    }

    fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> Option<PointerInput> {
        if button != MouseButton::Left {
            return None;
        }
        // A press before any cursor position is known has nowhere to land
        let client = self.cursor?;

        let phase = match state {
            ElementState::Pressed => {
                self.mouse_down = true;
                PointerPhase::Down
            }
            ElementState::Released => {
                self.mouse_down = false;
                PointerPhase::Up
            }
        };
        Some(PointerInput::new(ContactId::Mouse, client, phase))
    }

    fn cursor_left(&mut self) -> PointerInput {
        self.mouse_down = false;
        let client = self.cursor.take().unwrap_or(Vec2::ZERO);
        PointerInput::new(ContactId::Mouse, client, PointerPhase::Cancel)
    }

    fn touch(&mut self, id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) -> PointerInput {
        let phase = match phase {
            TouchPhase::Started => PointerPhase::Down,
            TouchPhase::Moved => PointerPhase::Move,
            TouchPhase::Ended => PointerPhase::Up,
            TouchPhase::Cancelled => PointerPhase::Cancel,
        };
        PointerInput::new(ContactId::Touch(id), self.logical(location), phase)
    }

    /// Whether the primary mouse button is currently held
    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }
}

impl Default for PointerAdapter {
    fn default() -> Self {
        Self::new()
    }
}
