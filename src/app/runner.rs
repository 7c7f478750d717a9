//! Main application handler for the playground

use std::time::{Duration, Instant};

use glam::Vec2;
use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use super::config::AppConfig;
use super::error::AppError;
use super::input::{Canvas, EventLog, Gesture, GestureEvent, Rect};
use super::window::window_attributes_from_config;
use crate::engine::Engine;
use crate::sim::World;
use crate::sim::camera::Camera;
use crate::sim::sprite::Sprite;

/// Interactive gesture playground
pub struct App {
    config: AppConfig,
    window: Option<Window>,
    engine: Engine<World>,
    /// Everything the global channel delivered since the last drain
    inbox: EventLog,
    /// Pinch scale already applied to the camera during the current pinch
    applied_pinch_scale: Option<f32>,
    start: Instant,
}

impl App {
    /// Creates a new playground with the provided configuration
    pub fn new(config: AppConfig) -> Self {
        info!(profile = %config.profile, "Starting playground");
        info!(?config.window, ?config.canvas, "Configuration");

        let resolution = Vec2::new(config.canvas.width, config.canvas.height);
        let window_size = Vec2::new(config.window.width as f32, config.window.height as f32);
        let canvas = Canvas::new(Rect::new(0.0, 0.0, window_size.x, window_size.y), resolution);

        let mut engine = Engine::new(canvas, Camera::new(resolution)).with_scene(demo_scene(resolution));
        let inbox = engine.events_mut().record();

        Self {
            config,
            window: None,
            engine,
            inbox,
            applied_pinch_scale: None,
            start: Instant::now(),
        }
    }

    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    /// Applies queued gesture events to the scene and camera
    fn drain_events(&mut self) {
        let events: Vec<GestureEvent> = self.inbox.borrow_mut().drain(..).collect();
        for event in events {
            self.apply(&event);
        }
    }

    fn apply(&mut self, event: &GestureEvent) {
        match event.gesture {
            Gesture::PointerMove { .. } => {}
            Gesture::Drag { delta } => {
                if let Some(id) = event.target
                    && let Some(sprite) = self
                        .engine
                        .scene_mut()
                        .and_then(|world| world.get_mut::<Sprite>(id))
                {
                    sprite.translate(delta);
                }
            }
            Gesture::DragStart => {
                if let (Some(id), Some(world)) = (event.target, self.engine.scene_mut()) {
                    world.bring_to_front(id);
                }
                info!(target = ?event.target, "drag start");
            }
            Gesture::Pinch { scale, .. } => {
                let previous = self.applied_pinch_scale.unwrap_or(1.0);
                if previous > 0.0 && scale > 0.0 {
                    self.engine.camera_mut().zoom_by(scale / previous);
                    self.applied_pinch_scale = Some(scale);
                }
                debug!(scale, zoom = self.engine.camera().zoom, "pinch");
            }
            Gesture::PointerUp { .. } => {
                self.applied_pinch_scale = None;
            }
            gesture => {
                info!(kind = %event.kind(), ?gesture, target = ?event.target, position = ?event.position, "gesture");
            }
        }
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Window, AppError> {
        let window_attributes = window_attributes_from_config(&self.config.window);
        Ok(event_loop.create_window(window_attributes)?)
    }

    fn resize_canvas(&mut self, width: u32, height: u32, scale_factor: f64) {
        let logical = winit::dpi::PhysicalSize::new(width, height).to_logical::<f32>(scale_factor);
        let resolution = self.engine.canvas().resolution;
        self.engine.set_canvas(Canvas::new(
            Rect::new(0.0, 0.0, logical.width, logical.height),
            resolution,
        ));
        debug!(width = logical.width, height = logical.height, "canvas resized");
    }
}

/// A few overlapping shapes to poke at
fn demo_scene(resolution: Vec2) -> World {
    let center = resolution * 0.5;
    World::new()
        .with_entity(Sprite::rect(center - Vec2::new(150.0, 0.0), Vec2::new(120.0, 80.0)))
        .with_entity(Sprite::circle(center, 60.0))
        .with_entity(Sprite::rect(center + Vec2::new(40.0, 30.0), Vec2::splat(70.0)))
        .with_entity(Sprite::circle(center + Vec2::new(170.0, -40.0), 35.0).with_interactive(false))
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match self.create_window(event_loop) {
                Ok(window) => {
                    let size = window.inner_size();
                    info!(
                        window.width = size.width,
                        window.height = size.height,
                        "Window created successfully"
                    );
                    self.resize_canvas(size.width, size.height, window.scale_factor());
                    self.window = Some(window);
                }
                Err(e) => {
                    error!(error = %e, "Failed to create window");
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.now();
        self.engine.update(now);
        self.drain_events();

        // Wake up exactly when a long press could fire
        match self.engine.next_deadline() {
            Some(deadline) => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(self.start + deadline));
            }
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let now = self.now();
        if self.engine.handle_window_event(&event, now) {
            self.drain_events();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                self.engine.destroy();
                self.drain_events();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.resize_canvas(new_size.width, new_size.height, scale_factor);
            }
            _ => {}
        }
    }
}
