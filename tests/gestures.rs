//! End-to-end gesture scenarios driven through the engine

use std::time::Duration;

use gesture_canvas::Engine;
use gesture_canvas::app::input::{
    Canvas, ContactId, EventLog, Gesture, GestureEvent, GestureKind, PointerInput, PointerPhase,
    Rect, SwipeDirection,
};
use gesture_canvas::sim::camera::Camera;
use gesture_canvas::sim::sprite::Sprite;
use gesture_canvas::sim::{EntityId, World};
use glam::Vec2;
use winit::event::WindowEvent;

const EPSILON: f32 = 1e-4;

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Engine over a 400x300 canvas whose client, game and world coordinates coincide
fn engine() -> Engine {
    let size = Vec2::new(400.0, 300.0);
    Engine::new(Canvas::sized(size), Camera::new(size)).with_scene(World::new())
}

/// Spawns a sprite whose local listener records into the returned log
fn spawn(engine: &mut Engine, mut sprite: Sprite) -> (EntityId, EventLog) {
    let log = sprite.events_mut().record();
    let world = engine.scene_mut().expect("engine has a scene");
    (world.spawn(sprite), log)
}

fn send(engine: &mut Engine, contact: ContactId, x: f32, y: f32, phase: PointerPhase, t: u64) {
    engine.handle_input(PointerInput::new(contact, Vec2::new(x, y), phase), ms(t));
}

fn mouse(engine: &mut Engine, x: f32, y: f32, phase: PointerPhase, t: u64) {
    send(engine, ContactId::Mouse, x, y, phase, t);
}

fn of_kind(log: &EventLog, kind: GestureKind) -> Vec<GestureEvent> {
    log.borrow()
        .iter()
        .filter(|e| e.kind() == kind)
        .cloned()
        .collect()
}

#[test]
fn test_tap_on_entity_reaches_both_channels() {
    let mut engine = engine();
    // Covers (190,140)-(210,160)
    let (id, local) = spawn(&mut engine, Sprite::rect(Vec2::new(200.0, 150.0), Vec2::splat(20.0)));
    let global = engine.events_mut().record();

    mouse(&mut engine, 200.0, 150.0, PointerPhase::Down, 0);
    mouse(&mut engine, 200.0, 150.0, PointerPhase::Up, 100);

    let local_taps = of_kind(&local, GestureKind::Tap);
    let global_taps = of_kind(&global, GestureKind::Tap);
    assert_eq!(local_taps.len(), 1);
    assert_eq!(global_taps, local_taps);
    assert_eq!(global_taps[0].target, Some(id));
    assert_eq!(global_taps[0].position, Vec2::new(200.0, 150.0));
}

#[test]
fn test_tap_outside_entity_is_global_only() {
    let mut engine = engine();
    let (_, local) = spawn(&mut engine, Sprite::rect(Vec2::new(200.0, 150.0), Vec2::splat(20.0)));
    let global = engine.events_mut().record();

    mouse(&mut engine, 50.0, 50.0, PointerPhase::Down, 0);
    mouse(&mut engine, 52.0, 50.0, PointerPhase::Up, 80);

    assert!(local.borrow().is_empty());
    let taps = of_kind(&global, GestureKind::Tap);
    assert_eq!(taps.len(), 1);
    assert_eq!(taps[0].target, None);
}

#[test]
fn test_swipe_right() {
    let mut engine = engine();
    let global = engine.events_mut().record();

    mouse(&mut engine, 100.0, 100.0, PointerPhase::Down, 0);
    mouse(&mut engine, 200.0, 100.0, PointerPhase::Up, 100);

    let swipes = of_kind(&global, GestureKind::Swipe);
    assert_eq!(swipes.len(), 1);
    assert!(of_kind(&global, GestureKind::Tap).is_empty());

    let Gesture::Swipe {
        direction,
        velocity,
        distance,
        delta,
    } = swipes[0].gesture
    else {
        panic!("expected swipe payload, got {:?}", swipes[0].gesture);
    };
    assert_eq!(direction, SwipeDirection::Right);
    assert!((velocity.x - 1.0).abs() < EPSILON, "velocity {velocity:?}");
    assert!(velocity.y.abs() < EPSILON);
    assert!((distance - 100.0).abs() < EPSILON);
    assert_eq!(delta, Vec2::new(100.0, 0.0));
    assert_eq!(swipes[0].position, Vec2::new(200.0, 100.0));
}

#[test]
fn test_stationary_hold_long_presses() {
    let mut engine = engine();
    let global = engine.events_mut().record();

    mouse(&mut engine, 100.0, 100.0, PointerPhase::Down, 0);
    engine.update(ms(300));
    assert!(of_kind(&global, GestureKind::LongPress).is_empty());

    engine.update(ms(550));
    engine.update(ms(900));
    let presses = of_kind(&global, GestureKind::LongPress);
    assert_eq!(presses.len(), 1);
    assert_eq!(presses[0].position, Vec2::new(100.0, 100.0));

    // A hold that ends later is neither tap nor swipe
    mouse(&mut engine, 100.0, 100.0, PointerPhase::Up, 1000);
    assert!(of_kind(&global, GestureKind::Tap).is_empty());
    assert!(of_kind(&global, GestureKind::Swipe).is_empty());
}

#[test]
fn test_moved_hold_does_not_long_press() {
    let mut engine = engine();
    let global = engine.events_mut().record();

    mouse(&mut engine, 100.0, 100.0, PointerPhase::Down, 0);
    mouse(&mut engine, 150.0, 150.0, PointerPhase::Move, 100);
    engine.update(ms(550));

    assert!(of_kind(&global, GestureKind::LongPress).is_empty());
}

#[test]
fn test_drag_moves_with_pointer() {
    let mut engine = engine();
    let (id, local) = spawn(&mut engine, Sprite::rect(Vec2::new(200.0, 150.0), Vec2::splat(20.0)));

    mouse(&mut engine, 200.0, 150.0, PointerPhase::Down, 0);
    mouse(&mut engine, 210.0, 150.0, PointerPhase::Move, 16);
    mouse(&mut engine, 230.0, 160.0, PointerPhase::Move, 32);
    mouse(&mut engine, 230.0, 160.0, PointerPhase::Up, 48);

    let deltas: Vec<_> = of_kind(&local, GestureKind::Drag)
        .into_iter()
        .map(|e| match e.gesture {
            Gesture::Drag { delta } => delta,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(deltas, vec![Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0)]);
    assert_eq!(of_kind(&local, GestureKind::DragStart).len(), 1);
    assert_eq!(of_kind(&local, GestureKind::DragEnd).len(), 1);
    assert!(of_kind(&local, GestureKind::Drag).iter().all(|e| e.target == Some(id)));
    assert!(engine.gestures().drag_target().is_none());
}

#[test]
fn test_hover_moves_between_entities() {
    let mut engine = engine();
    let (a, _) = spawn(&mut engine, Sprite::rect(Vec2::new(100.0, 100.0), Vec2::splat(40.0)));
    let (b, _) = spawn(&mut engine, Sprite::circle(Vec2::new(300.0, 100.0), 20.0));
    let global = engine.events_mut().record();

    mouse(&mut engine, 100.0, 100.0, PointerPhase::Move, 0);
    mouse(&mut engine, 105.0, 100.0, PointerPhase::Move, 10);
    mouse(&mut engine, 300.0, 100.0, PointerPhase::Move, 20);
    mouse(&mut engine, 380.0, 280.0, PointerPhase::Move, 30);

    let transitions: Vec<_> = global
        .borrow()
        .iter()
        .filter(|e| matches!(e.kind(), GestureKind::PointerOver | GestureKind::PointerOut))
        .map(|e| (e.kind(), e.target))
        .collect();
    assert_eq!(
        transitions,
        vec![
            (GestureKind::PointerOver, Some(a)),
            (GestureKind::PointerOut, Some(a)),
            (GestureKind::PointerOver, Some(b)),
            (GestureKind::PointerOut, Some(b)),
        ]
    );
    assert_eq!(engine.gestures().hover_target(), None);
}

#[test]
fn test_pinch_reports_scale_relative_to_start() {
    let mut engine = engine();
    let global = engine.events_mut().record();
    let (one, two) = (ContactId::Touch(1), ContactId::Touch(2));

    send(&mut engine, one, 100.0, 150.0, PointerPhase::Down, 0);
    send(&mut engine, two, 200.0, 150.0, PointerPhase::Down, 10);
    send(&mut engine, two, 300.0, 150.0, PointerPhase::Move, 20);

    let pinches = of_kind(&global, GestureKind::Pinch);
    let Some(Gesture::Pinch { distance, scale }) = pinches.last().map(|e| e.gesture) else {
        panic!("no pinch emitted");
    };
    assert!((distance - 200.0).abs() < EPSILON);
    assert!((scale - 2.0).abs() < EPSILON);
    assert_eq!(pinches.last().map(|e| e.position), Some(Vec2::new(200.0, 150.0)));

    send(&mut engine, two, 300.0, 150.0, PointerPhase::Up, 30);
    assert!(engine.gestures().pinch().is_none());

    // The second contact also prevented the long press
    engine.update(ms(1000));
    assert!(of_kind(&global, GestureKind::LongPress).is_empty());
}

#[test]
fn test_focus_loss_cancels_drag() {
    let mut engine = engine();
    let (id, local) = spawn(&mut engine, Sprite::rect(Vec2::new(200.0, 150.0), Vec2::splat(20.0)));

    mouse(&mut engine, 200.0, 150.0, PointerPhase::Down, 0);
    mouse(&mut engine, 205.0, 150.0, PointerPhase::Move, 10);
    assert!(engine.handle_window_event(&WindowEvent::Focused(false), ms(20)));

    let ends = of_kind(&local, GestureKind::DragEnd);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].target, Some(id));
    assert_eq!(of_kind(&local, GestureKind::PointerOut).len(), 1);

    // No long press survives the cancel
    engine.update(ms(1000));
    assert!(of_kind(&local, GestureKind::LongPress).is_empty());
}

#[test]
fn test_destroy_flushes_and_detaches() {
    let mut engine = engine();
    let (_, local) = spawn(&mut engine, Sprite::rect(Vec2::new(200.0, 150.0), Vec2::splat(20.0)));
    let global = engine.events_mut().record();

    mouse(&mut engine, 200.0, 150.0, PointerPhase::Down, 0);
    engine.destroy();
    engine.destroy();

    assert_eq!(of_kind(&local, GestureKind::DragEnd).len(), 1);
    assert_eq!(of_kind(&global, GestureKind::DragEnd).len(), 1);
    assert!(!engine.is_attached());

    let seen = global.borrow().len();
    mouse(&mut engine, 200.0, 150.0, PointerPhase::Up, 100);
    engine.update(ms(1000));
    assert_eq!(global.borrow().len(), seen);
}

#[test]
fn test_scaled_canvas_and_camera() {
    // Canvas shown at half size, offset by (20, 10); camera zoomed 2x on the origin
    let canvas = Canvas::new(Rect::new(20.0, 10.0, 200.0, 150.0), Vec2::new(400.0, 300.0));
    let camera = Camera::new(Vec2::new(400.0, 300.0))
        .looking_at(Vec2::ZERO)
        .with_zoom(2.0);
    let mut engine: Engine = Engine::new(canvas, camera).with_scene(World::new());
    let (id, local) = spawn(&mut engine, Sprite::circle(Vec2::new(25.0, 0.0), 5.0));

    // Client (145, 85) → game (250, 150) → world (25, 0)
    assert_eq!(engine.client_to_world(Vec2::new(145.0, 85.0)), Vec2::new(25.0, 0.0));
    mouse(&mut engine, 145.0, 85.0, PointerPhase::Down, 0);
    mouse(&mut engine, 145.0, 85.0, PointerPhase::Up, 50);

    let taps = of_kind(&local, GestureKind::Tap);
    assert_eq!(taps.len(), 1);
    assert_eq!(taps[0].target, Some(id));
}
