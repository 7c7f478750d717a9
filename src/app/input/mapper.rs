//! Device → canvas → world coordinate mapping

use glam::Vec2;

use crate::sim::camera::Projection;

/// Rectangular area in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.x
            && pos.x <= self.x + self.width
            && pos.y >= self.y
            && pos.y <= self.y + self.height
    }

    /// Get the center point of the rectangle
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// The drawing surface: where it sits on screen and its backing resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Bounding rectangle in client (logical) pixels
    pub bounds: Rect,
    /// Backing-store size in game pixels
    pub resolution: Vec2,
}

impl Canvas {
    pub fn new(bounds: Rect, resolution: Vec2) -> Self {
        Self { bounds, resolution }
    }

    /// Canvas filling a window of `size` with a matching resolution
    pub fn sized(size: Vec2) -> Self {
        Self::new(Rect::new(0.0, 0.0, size.x, size.y), size)
    }

    /// Scale from client pixels to game pixels. A collapsed axis maps 1:1.
    pub fn scale(&self) -> Vec2 {
        let axis = |resolution: f32, extent: f32| {
            if extent.abs() > f32::EPSILON && extent.is_finite() {
                resolution / extent
            } else {
                1.0
            }
        };
        Vec2::new(
            axis(self.resolution.x, self.bounds.width),
            axis(self.resolution.y, self.bounds.height),
        )
    }

    /// Client coordinates → canvas-local game pixels
    pub fn canvas_to_game(&self, client: Vec2) -> Vec2 {
        (client - self.bounds.origin()) * self.scale()
    }
}

/// Client coordinates → world coordinates through the canvas and a camera
pub fn client_to_world(canvas: &Canvas, camera: &dyn Projection, client: Vec2) -> Vec2 {
    camera.screen_to_world(canvas.canvas_to_game(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::camera::Camera;

    #[test]
    fn test_rect_contains_and_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(Vec2::new(10.0, 20.0)));
        assert!(rect.contains(Vec2::new(110.0, 70.0)));
        assert!(!rect.contains(Vec2::new(111.0, 30.0)));
        assert_eq!(rect.center(), Vec2::new(60.0, 45.0));
    }

    #[test]
    fn test_canvas_offset_and_scaling() {
        // Canvas drawn at (100, 50), displayed at 400x300 but backed by 800x600
        let canvas = Canvas::new(Rect::new(100.0, 50.0, 400.0, 300.0), Vec2::new(800.0, 600.0));
        assert_eq!(canvas.canvas_to_game(Vec2::new(100.0, 50.0)), Vec2::ZERO);
        assert_eq!(canvas.canvas_to_game(Vec2::new(300.0, 200.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_degenerate_canvas_is_defined() {
        let canvas = Canvas::new(Rect::new(5.0, 5.0, 0.0, 0.0), Vec2::new(800.0, 600.0));
        let mapped = canvas.canvas_to_game(Vec2::new(15.0, 25.0));
        assert!(mapped.is_finite());
        assert_eq!(mapped, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_client_to_world_through_camera() {
        let canvas = Canvas::new(Rect::new(0.0, 0.0, 400.0, 300.0), Vec2::new(800.0, 600.0));
        let camera = Camera::new(Vec2::new(800.0, 600.0))
            .looking_at(Vec2::ZERO)
            .with_zoom(2.0);
        // Client center → game center → camera center
        assert_eq!(client_to_world(&canvas, &camera, Vec2::new(200.0, 150.0)), Vec2::ZERO);
        // 50 client px = 100 game px = 50 world units at 2x
        assert_eq!(client_to_world(&canvas, &camera, Vec2::new(250.0, 150.0)), Vec2::new(50.0, 0.0));
    }
}
