//! Canvas engine: owns the scene, camera and gesture pipeline

use std::time::Duration;

use glam::Vec2;
use tracing::{debug, info, trace};
use winit::event::WindowEvent;

use crate::app::input::{
    Canvas, EventEmitter, GestureContext, GestureRecognizer, PointerAdapter, PointerInput,
    PointerPhase, client_to_world,
};
use crate::sim::camera::Camera;
use crate::sim::{Scene, World};

/// Routes pointer input through coordinate mapping and gesture recognition
///
/// Timestamps are caller-supplied monotonic durations (typically
/// `Instant::elapsed` from a start instant), which keeps the engine
/// deterministic under test.
pub struct Engine<S: Scene = World> {
    canvas: Canvas,
    camera: Camera,
    scene: Option<S>,
    /// Global listeners; see every event after the target entity
    events: EventEmitter,
    gestures: GestureRecognizer,
    adapter: PointerAdapter,
    destroyed: bool,
}

impl<S: Scene> Engine<S> {
    pub fn new(canvas: Canvas, camera: Camera) -> Self {
        info!(resolution = ?canvas.resolution, "engine attached");
        Self {
            canvas,
            camera,
            scene: None,
            events: EventEmitter::new(),
            gestures: GestureRecognizer::new(),
            adapter: PointerAdapter::new(),
            destroyed: false,
        }
    }

    /// Builder method to set the active scene
    pub fn with_scene(mut self, scene: S) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Replaces the active scene, returning the previous one
    ///
    /// In-flight gestures are cancelled against the outgoing scene first, so
    /// its entities get their `dragend`/`pointerout` and no entity id leaks
    /// into the new scene.
    pub fn set_scene(&mut self, scene: Option<S>) -> Option<S> {
        if !self.destroyed {
            let Self {
                scene: current,
                events,
                gestures,
                ..
            } = self;
            let mut ctx =
                GestureContext::new(current.as_mut().map(|s| s as &mut dyn Scene), events);
            gestures.cancel(&mut ctx);
            debug!("scene replaced, gestures reset");
        }
        std::mem::replace(&mut self.scene, scene)
    }

    pub fn scene(&self) -> Option<&S> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut S> {
        self.scene.as_mut()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventEmitter {
        &mut self.events
    }

    pub fn gestures(&self) -> &GestureRecognizer {
        &self.gestures
    }

    /// Client coordinates → canvas-local game pixels
    pub fn canvas_to_game(&self, client: Vec2) -> Vec2 {
        self.canvas.canvas_to_game(client)
    }

    /// Client coordinates → world coordinates through the canvas and camera
    pub fn client_to_world(&self, client: Vec2) -> Vec2 {
        client_to_world(&self.canvas, &self.camera, client)
    }

    /// Whether the engine still consumes input
    pub fn is_attached(&self) -> bool {
        !self.destroyed && self.adapter.is_attached()
    }

    /// Feeds a winit event through the adapter. Returns true if the event was
    /// pointer input the engine consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent, now: Duration) -> bool {
        if self.destroyed {
            return false;
        }
        match self.adapter.handle_window_event(event) {
            Some(input) => {
                self.handle_input(input, now);
                true
            }
            None => false,
        }
    }

    /// Processes one normalized pointer input
    ///
    /// Due timers fire first, so a long press that elapsed before this input
    /// is delivered ahead of it.
    pub fn handle_input(&mut self, input: PointerInput, now: Duration) {
        if self.destroyed {
            trace!(?input, "input after destroy ignored");
            return;
        }

        let position = self.client_to_world(input.client);
        let Self {
            scene,
            events,
            gestures,
            ..
        } = self;
        let mut ctx = GestureContext::new(scene.as_mut().map(|s| s as &mut dyn Scene), events);

        gestures.poll_timers(&mut ctx, now);

        match input.phase {
            PointerPhase::Down => gestures.pointer_down(&mut ctx, input.contact, position, now),
            PointerPhase::Move => gestures.pointer_move(&mut ctx, input.contact, position),
            PointerPhase::Up => gestures.pointer_up(&mut ctx, input.contact, position, now),
            PointerPhase::Cancel => gestures.cancel(&mut ctx),
        }
    }

    /// Fires any long-press timers due at `now`
    pub fn update(&mut self, now: Duration) {
        if self.destroyed {
            return;
        }
        let Self {
            scene,
            events,
            gestures,
            ..
        } = self;
        let mut ctx = GestureContext::new(scene.as_mut().map(|s| s as &mut dyn Scene), events);
        gestures.poll_timers(&mut ctx, now);
    }

    /// Deadline of the next long press, for scheduling a wake-up
    pub fn next_deadline(&mut self) -> Option<Duration> {
        if self.destroyed {
            return None;
        }
        self.gestures.next_deadline()
    }

    /// Cancels in-flight gestures (flushing `dragend` and `pointerout`),
    /// drops pending timers and detaches input. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        let Self {
            scene,
            events,
            gestures,
            adapter,
            ..
        } = self;
        let mut ctx = GestureContext::new(scene.as_mut().map(|s| s as &mut dyn Scene), events);
        gestures.cancel(&mut ctx);
        adapter.detach();

        self.destroyed = true;
        info!("engine destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::input::{ContactId, GestureKind, Rect};
    use crate::sim::sprite::Sprite;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn mouse(x: f32, y: f32, phase: PointerPhase) -> PointerInput {
        PointerInput::new(ContactId::Mouse, Vec2::new(x, y), phase)
    }

    fn engine() -> Engine {
        let size = Vec2::new(400.0, 300.0);
        let world = World::new().with_entity(Sprite::rect(Vec2::new(200.0, 150.0), Vec2::splat(20.0)));
        Engine::new(Canvas::sized(size), Camera::new(size)).with_scene(world)
    }

    #[test]
    fn test_maps_client_through_canvas_and_camera() {
        // Displayed at half size inside a window offset by (10, 10)
        let canvas = Canvas::new(Rect::new(10.0, 10.0, 200.0, 150.0), Vec2::new(400.0, 300.0));
        let engine: Engine = Engine::new(canvas, Camera::new(Vec2::new(400.0, 300.0)));

        assert_eq!(engine.canvas_to_game(Vec2::new(110.0, 85.0)), Vec2::new(200.0, 150.0));
        assert_eq!(engine.client_to_world(Vec2::new(110.0, 85.0)), Vec2::new(200.0, 150.0));
    }

    #[test]
    fn test_tap_reaches_global_listeners() {
        let mut engine = engine();
        let log = engine.events_mut().record();

        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Down), ms(0));
        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Up), ms(100));

        let taps: Vec<_> = log
            .borrow()
            .iter()
            .filter(|e| e.kind() == GestureKind::Tap)
            .cloned()
            .collect();
        assert_eq!(taps.len(), 1);
        assert!(taps[0].target.is_some());
    }

    #[test]
    fn test_timers_fire_before_next_input() {
        let mut engine = engine();
        let log = engine.events_mut().record();

        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Down), ms(0));
        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Up), ms(600));

        let kinds: Vec<_> = log.borrow().iter().map(|e| e.kind()).collect();
        let long_press = kinds.iter().position(|k| *k == GestureKind::LongPress);
        let up = kinds.iter().position(|k| *k == GestureKind::PointerUp);
        assert!(long_press.is_some());
        assert!(long_press < up);
    }

    #[test]
    fn test_update_fires_long_press() {
        let mut engine = engine();
        let log = engine.events_mut().record();

        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Down), ms(0));
        engine.update(ms(499));
        assert!(log.borrow().iter().all(|e| e.kind() != GestureKind::LongPress));

        assert_eq!(engine.next_deadline(), Some(ms(500)));
        engine.update(ms(500));
        assert_eq!(engine.next_deadline(), None);
        assert_eq!(
            log.borrow()
                .iter()
                .filter(|e| e.kind() == GestureKind::LongPress)
                .count(),
            1
        );
    }

    #[test]
    fn test_destroy_flushes_drag_and_is_idempotent() {
        let mut engine = engine();
        let log = engine.events_mut().record();

        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Down), ms(0));
        engine.destroy();
        engine.destroy();

        let drag_ends = log
            .borrow()
            .iter()
            .filter(|e| e.kind() == GestureKind::DragEnd)
            .count();
        assert_eq!(drag_ends, 1);
        assert!(!engine.is_attached());
        assert!(engine.gestures().drag_target().is_none());

        // Nothing fires after teardown
        let before = log.borrow().len();
        engine.update(ms(1000));
        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Down), ms(1001));
        assert!(!engine.handle_window_event(&WindowEvent::Focused(false), ms(1002)));
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn test_works_without_scene() {
        let size = Vec2::new(100.0, 100.0);
        let mut engine: Engine = Engine::new(Canvas::sized(size), Camera::new(size));
        let log = engine.events_mut().record();

        engine.handle_input(mouse(50.0, 50.0, PointerPhase::Down), ms(0));
        engine.handle_input(mouse(50.0, 50.0, PointerPhase::Up), ms(50));

        let log = log.borrow();
        assert!(log.iter().any(|e| e.kind() == GestureKind::Tap && e.target.is_none()));
        assert!(log.iter().all(|e| e.kind() != GestureKind::DragStart));
    }

    #[test]
    fn test_scene_swap_drops_stale_targets() {
        let mut engine = engine();
        engine.events_mut().on(GestureKind::Tap, |_| {});
        assert_eq!(engine.events().listener_count(), 1);

        let old = engine.set_scene(Some(World::new()));
        assert_eq!(old.map(|w| w.len()), Some(1));

        let log = engine.events_mut().record();
        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Down), ms(0));
        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Up), ms(50));
        assert!(log.borrow().iter().all(|e| e.target.is_none()));
        assert!(engine.scene().is_some_and(|w| w.is_empty()));
    }

    #[test]
    fn test_scene_swap_mid_drag_ends_drag_on_old_entity() {
        let size = Vec2::new(400.0, 300.0);
        let mut dragged = Sprite::rect(Vec2::new(200.0, 150.0), Vec2::splat(20.0));
        let old_log = dragged.events_mut().record();
        let mut engine: Engine =
            Engine::new(Canvas::sized(size), Camera::new(size)).with_scene(World::new().with_entity(dragged));

        engine.handle_input(mouse(200.0, 150.0, PointerPhase::Down), ms(0));
        assert!(engine.gestures().drag_target().is_some());

        // Ids restart at zero, so this sprite shares the dragged one's id
        let mut bystander = Sprite::rect(Vec2::new(20.0, 20.0), Vec2::splat(10.0));
        let new_log = bystander.events_mut().record();
        engine.set_scene(Some(World::new().with_entity(bystander)));

        assert!(engine.gestures().drag_target().is_none());
        assert!(engine.gestures().hover_target().is_none());
        assert!(!engine.gestures().is_long_press_armed());

        engine.handle_input(mouse(210.0, 150.0, PointerPhase::Move), ms(10));
        engine.handle_input(mouse(210.0, 150.0, PointerPhase::Up), ms(20));
        engine.update(ms(1000));

        let new_kinds: Vec<_> = new_log.borrow().iter().map(|e| e.kind()).collect();
        assert!(new_kinds.is_empty(), "untouched entity received {new_kinds:?}");

        let old_kinds: Vec<_> = old_log.borrow().iter().map(|e| e.kind()).collect();
        assert_eq!(old_kinds.iter().filter(|k| **k == GestureKind::DragStart).count(), 1);
        assert_eq!(old_kinds.iter().filter(|k| **k == GestureKind::DragEnd).count(), 1);
        assert_eq!(old_kinds.last(), Some(&GestureKind::DragEnd));
    }
}
