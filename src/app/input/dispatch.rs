//! Listener registries and two-channel event delivery

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::events::{GestureEvent, GestureKind};
use crate::sim::Scene;

/// Callback invoked with each delivered event
pub type Listener = Box<dyn FnMut(&GestureEvent)>;

/// Shared, append-only capture of delivered events
pub type EventLog = Rc<RefCell<Vec<GestureEvent>>>;

/// Identifies a registered listener so it can be removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    /// `None` listens to every kind
    kind: Option<GestureKind>,
    listener: Listener,
}

/// Listener registry shared by entities (local channel) and the engine (global channel)
///
/// Listeners are invoked in registration order.
#[derive(Default)]
pub struct EventEmitter {
    registrations: Vec<Registration>,
    next_id: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for one event kind
    pub fn on(
        &mut self,
        kind: GestureKind,
        listener: impl FnMut(&GestureEvent) + 'static,
    ) -> ListenerId {
        self.register(Some(kind), Box::new(listener))
    }

    /// Registers a listener for every event kind
    pub fn on_any(&mut self, listener: impl FnMut(&GestureEvent) + 'static) -> ListenerId {
        self.register(None, Box::new(listener))
    }

    fn register(&mut self, kind: Option<GestureKind>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration { id, kind, listener });
        id
    }

    /// Registers a listener that clones every event into the returned log
    pub fn record(&mut self) -> EventLog {
        let log = EventLog::default();
        let sink = log.clone();
        self.on_any(move |event| sink.borrow_mut().push(event.clone()));
        log
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    /// Invokes every listener registered for the event's kind
    pub fn emit(&mut self, event: &GestureEvent) {
        let kind = event.kind();
        for registration in &mut self.registrations {
            if registration.kind.is_none_or(|k| k == kind) {
                (registration.listener)(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registrations.len()
    }

    pub fn clear(&mut self) {
        self.registrations.clear();
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.registrations.len())
            .finish()
    }
}

/// Delivers one event to its target entity (if any, and still alive) and then
/// to the global registry. Both channels see the same payload.
pub fn dispatch(
    scene: Option<&mut (dyn Scene + '_)>,
    global: &mut EventEmitter,
    event: &GestureEvent,
) {
    trace!(kind = %event.kind(), target = ?event.target, position = ?event.position, "dispatch");

    if let Some(target) = event.target
        && let Some(entity) = scene.and_then(|s| s.entity_mut(target))
    {
        entity.emit(event);
    }

    global.emit(event);
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::app::input::events::Gesture;
    use crate::sim::World;
    use crate::sim::sprite::Sprite;

    fn tap(target: Option<crate::sim::EntityId>) -> GestureEvent {
        GestureEvent::new(Gesture::Tap, Vec2::new(1.0, 2.0), target)
    }

    #[test]
    fn test_emitter_filters_by_kind() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::new();

        let log = seen.clone();
        emitter.on(GestureKind::Tap, move |e| log.borrow_mut().push(e.kind()));
        let log = seen.clone();
        emitter.on(GestureKind::Swipe, move |e| log.borrow_mut().push(e.kind()));

        emitter.emit(&tap(None));
        assert_eq!(*seen.borrow(), vec![GestureKind::Tap]);
    }

    #[test]
    fn test_emitter_off_removes_listener() {
        let count = Rc::new(RefCell::new(0));
        let mut emitter = EventEmitter::new();

        let c = count.clone();
        let id = emitter.on_any(move |_| *c.borrow_mut() += 1);
        emitter.emit(&tap(None));
        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        emitter.emit(&tap(None));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_dispatch_delivers_to_entity_and_global() {
        let mut world = World::new();
        let mut sprite = Sprite::rect(Vec2::ZERO, Vec2::splat(10.0));
        let local = sprite.events_mut().record();
        let id = world.spawn(sprite);

        let mut global = EventEmitter::new();
        let global_seen = global.record();

        let event = tap(Some(id));
        dispatch(Some(&mut world), &mut global, &event);

        assert_eq!(*local.borrow(), vec![event.clone()]);
        assert_eq!(*global_seen.borrow(), vec![event]);
    }

    #[test]
    fn test_dispatch_without_target_or_scene_reaches_global() {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let mut global = EventEmitter::new();
        global.on_any(move |_| *c.borrow_mut() += 1);

        let mut world = World::new();
        dispatch(Some(&mut world), &mut global, &tap(None));
        dispatch(None, &mut global, &tap(Some(crate::sim::EntityId(42))));

        assert_eq!(*count.borrow(), 2);
    }
}
