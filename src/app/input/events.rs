//! Semantic gesture events

use std::fmt;

use glam::Vec2;

use super::contact::ContactId;
use crate::sim::EntityId;

/// A classified interaction, delivered to the hit entity and to global listeners
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    /// World-space position the event refers to
    pub position: Vec2,
    /// Entity the event was resolved against, if any
    pub target: Option<EntityId>,
    pub gesture: Gesture,
}

/// Event-specific payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    PointerDown { contact: ContactId },
    PointerMove { contact: ContactId },
    PointerUp { contact: ContactId },
    Tap,
    Swipe {
        direction: SwipeDirection,
        /// World units per millisecond
        velocity: Vec2,
        distance: f32,
        delta: Vec2,
    },
    DragStart,
    Drag {
        /// Movement since the previous pointer update
        delta: Vec2,
    },
    DragEnd,
    LongPress,
    Pinch {
        distance: f32,
        scale: f32,
    },
    PointerOver,
    PointerOut,
}

/// Dominant axis and sign of a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    /// Picks the direction from a displacement. Horizontal wins only when
    /// `|dx| > |dy|`, so exact diagonals are vertical. Positive y points down.
    pub fn from_delta(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 { Self::Right } else { Self::Left }
        } else if delta.y > 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Event name used for listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Tap,
    Swipe,
    DragStart,
    Drag,
    DragEnd,
    LongPress,
    Pinch,
    PointerOver,
    PointerOut,
}

impl GestureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::Tap => "tap",
            Self::Swipe => "swipe",
            Self::DragStart => "dragstart",
            Self::Drag => "drag",
            Self::DragEnd => "dragend",
            Self::LongPress => "longpress",
            Self::Pinch => "pinch",
            Self::PointerOver => "pointerover",
            Self::PointerOut => "pointerout",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Gesture {
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::PointerDown { .. } => GestureKind::PointerDown,
            Self::PointerMove { .. } => GestureKind::PointerMove,
            Self::PointerUp { .. } => GestureKind::PointerUp,
            Self::Tap => GestureKind::Tap,
            Self::Swipe { .. } => GestureKind::Swipe,
            Self::DragStart => GestureKind::DragStart,
            Self::Drag { .. } => GestureKind::Drag,
            Self::DragEnd => GestureKind::DragEnd,
            Self::LongPress => GestureKind::LongPress,
            Self::Pinch { .. } => GestureKind::Pinch,
            Self::PointerOver => GestureKind::PointerOver,
            Self::PointerOut => GestureKind::PointerOut,
        }
    }
}

impl GestureEvent {
    pub fn new(gesture: Gesture, position: Vec2, target: Option<EntityId>) -> Self {
        Self {
            position,
            target,
            gesture,
        }
    }

    pub fn kind(&self) -> GestureKind {
        self.gesture.kind()
    }
}
