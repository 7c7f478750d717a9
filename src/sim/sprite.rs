//! Basic shape entity with its own listener registry

use std::any::Any;

use glam::Vec2;

use super::Entity;
use crate::app::input::{EventEmitter, GestureEvent};

/// Hit shape, relative to the sprite position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle centered on the position
    Rect { half_extents: Vec2 },
    Circle { radius: f32 },
}

impl Shape {
    fn contains(&self, local: Vec2) -> bool {
        match *self {
            Shape::Rect { half_extents } => {
                local.x.abs() <= half_extents.x && local.y.abs() <= half_extents.y
            }
            Shape::Circle { radius } => local.length_squared() <= radius * radius,
        }
    }
}

/// A positioned shape that can be hidden, made inert and listened to
#[derive(Debug)]
pub struct Sprite {
    position: Vec2,
    shape: Shape,
    interactive: bool,
    visible: bool,
    events: EventEmitter,
}

impl Sprite {
    pub fn new(position: Vec2, shape: Shape) -> Self {
        Self {
            position,
            shape,
            interactive: true,
            visible: true,
            events: EventEmitter::new(),
        }
    }

    /// Rectangle of `size` centered at `center`
    pub fn rect(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center,
            Shape::Rect {
                half_extents: size * 0.5,
            },
        )
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::new(center, Shape::Circle { radius })
    }

    /// Builder method to set whether the sprite takes part in hit testing
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Builder method to set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Local listener registry
    pub fn events_mut(&mut self) -> &mut EventEmitter {
        &mut self.events
    }
}

impl Entity for Sprite {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn contains_point(&self, point: Vec2) -> bool {
        self.shape.contains(point - self.position)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn emit(&mut self, event: &GestureEvent) {
        self.events.emit(event);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
