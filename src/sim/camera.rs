//! Camera system for mapping between screen and world space

use glam::{Mat2, Vec2};

/// Maps canvas-local screen coordinates into world coordinates
pub trait Projection {
    fn screen_to_world(&self, screen: Vec2) -> Vec2;
}

/// 2D camera looking at `center`, scaled by `zoom` and rotated by `rotation`
///
/// Screen coordinates are canvas-local pixels with the origin at the top left.
/// The viewport center maps to `center` in world space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World point shown at the middle of the viewport
    pub center: Vec2,
    /// Screen pixels per world unit (> 1.0 = zoomed in)
    pub zoom: f32,
    /// Radians, counter-clockwise in screen space
    pub rotation: f32,
    /// Viewport size in screen pixels
    pub viewport: Vec2,
}

impl Camera {
    /// Camera whose world coordinates coincide with screen coordinates
    pub fn new(viewport: Vec2) -> Self {
        Self {
            center: viewport * 0.5,
            zoom: 1.0,
            rotation: 0.0,
            viewport,
        }
    }

    /// Builder method to look at a specific world point
    pub fn looking_at(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    /// Builder method to set the zoom level
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Builder method to set the rotation
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Pan the camera by delta in world units
    pub fn pan(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Multiplies the zoom level, ignoring non-positive factors
    pub fn zoom_by(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = self.effective_zoom() * factor;
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Zoom used for mapping; degenerate values behave as 1.0
    fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let local = Mat2::from_angle(-self.rotation) * (world - self.center);
        local * self.effective_zoom() + self.viewport * 0.5
    }

    /// World-space axis-aligned bounds of the visible area, ignoring rotation
    pub fn view_bounds(&self) -> Bounds {
        let half = self.viewport * 0.5 / self.effective_zoom();
        Bounds::new(self.center - half, self.center + half)
    }
}

impl Projection for Camera {
    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let local = (screen - self.viewport * 0.5) / self.effective_zoom();
        self.center + Mat2::from_angle(self.rotation) * local
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}
