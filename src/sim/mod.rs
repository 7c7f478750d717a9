//! Scene module
//!
//! Defines the capability interfaces the input system consumes from the scene,
//! plus a simple paint-ordered entity store.

pub mod camera;
pub mod sprite;

use std::any::Any;
use std::collections::HashMap;

use glam::Vec2;

use crate::app::input::GestureEvent;

/// Stable handle to an entity in a [`Scene`]
///
/// The input system holds these instead of references, so an entity destroyed
/// between events simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Anything that can be hit-tested and receive gesture events
pub trait Entity {
    /// Whether the entity takes part in hit testing at all
    fn is_interactive(&self) -> bool;

    fn is_visible(&self) -> bool;

    /// Point-in-shape test in world coordinates
    fn contains_point(&self, point: Vec2) -> bool;

    /// Current world position
    fn position(&self) -> Vec2;

    /// Delivers an event to the entity's local listeners
    fn emit(&mut self, event: &GestureEvent);

    /// Allows downcasting to concrete entity types
    fn as_any(&self) -> &dyn Any;

    /// Mutable version of as_any for type-safe mutable access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The active set of entities, in paint order
pub trait Scene {
    /// Entity ids ordered back to front (last painted is visually topmost)
    fn paint_order(&self) -> &[EntityId];

    fn entity(&self, id: EntityId) -> Option<&dyn Entity>;

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut dyn Entity>;
}

/// Entity store that paints in spawn order
#[derive(Default)]
pub struct World {
    order: Vec<EntityId>,
    entities: HashMap<EntityId, Box<dyn Entity>>,
    next_id: u32,
}

impl World {
    /// Creates an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add an entity
    pub fn with_entity(mut self, entity: impl Entity + 'static) -> Self {
        self.spawn(entity);
        self
    }

    /// Adds an entity on top of everything spawned before it
    pub fn spawn(&mut self, entity: impl Entity + 'static) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.order.push(id);
        self.entities.insert(id, Box::new(entity));
        id
    }

    /// Removes an entity. Returns false if it did not exist.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.order.retain(|e| *e != id);
        self.entities.remove(&id).is_some()
    }

    /// Moves an entity to the top of the paint order
    pub fn bring_to_front(&mut self, id: EntityId) {
        if self.entities.contains_key(&id) {
            self.order.retain(|e| *e != id);
            self.order.push(id);
        }
    }

    /// Gets a typed reference to an entity
    ///
    /// # Example
    /// ```ignore
    /// if let Some(sprite) = world.get::<Sprite>(id) {
    ///     // Use Sprite-specific methods
    /// }
    /// ```
    pub fn get<T: 'static>(&self, id: EntityId) -> Option<&T> {
        self.entities
            .get(&id)
            .and_then(|e| e.as_any().downcast_ref::<T>())
    }

    /// Gets a mutable typed reference to an entity
    pub fn get_mut<T: 'static>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities
            .get_mut(&id)
            .and_then(|e| e.as_any_mut().downcast_mut::<T>())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Scene for World {
    fn paint_order(&self) -> &[EntityId] {
        &self.order
    }

    fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities.get(&id).map(|e| e.as_ref())
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut dyn Entity> {
        self.entities.get_mut(&id).map(|e| e.as_mut() as &mut dyn Entity)
    }
}
