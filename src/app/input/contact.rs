//! Normalized pointer input and per-contact state

use std::collections::HashMap;
use std::time::Duration;

use glam::Vec2;

/// Identifies one contact: the mouse, or a single touch point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactId {
    /// The mouse has exactly one implicit contact
    Mouse,
    /// Platform touch identifier
    Touch(u64),
}

/// Phase of a normalized pointer input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Pointer left the canvas, touch was cancelled or the contact was lost
    Cancel,
}

/// Platform-independent pointer input produced by the adapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub contact: ContactId,
    /// Client coordinates in logical pixels
    pub client: Vec2,
    pub phase: PointerPhase,
}

impl PointerInput {
    pub fn new(contact: ContactId, client: Vec2, phase: PointerPhase) -> Self {
        Self {
            contact,
            client,
            phase,
        }
    }
}

/// History of a single contact in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerContact {
    pub id: ContactId,
    pub start_position: Vec2,
    pub current_position: Vec2,
    pub previous_position: Vec2,
    pub start_time: Duration,
    pub is_down: bool,
}

impl PointerContact {
    /// Creates a contact that starts (and currently sits) at `position`
    pub fn new(id: ContactId, position: Vec2, time: Duration) -> Self {
        Self {
            id,
            start_position: position,
            current_position: position,
            previous_position: position,
            start_time: time,
            is_down: true,
        }
    }

    /// Shifts current into previous and records the new position
    pub fn advance(&mut self, position: Vec2) {
        self.previous_position = self.current_position;
        self.current_position = position;
    }

    /// Movement since the previous update
    pub fn step_delta(&self) -> Vec2 {
        self.current_position - self.previous_position
    }

    /// Total displacement from the start position to `position`
    pub fn displacement_to(&self, position: Vec2) -> Vec2 {
        position - self.start_position
    }

    /// Time since the contact started, saturating at zero
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start_time)
    }
}

/// Active contacts keyed by id
#[derive(Debug, Clone, Default)]
pub struct PointerTable {
    contacts: HashMap<ContactId, PointerContact>,
}

impl PointerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a contact, replacing any stale record with the same id
    pub fn begin(&mut self, id: ContactId, position: Vec2, time: Duration) -> &PointerContact {
        self.contacts
            .insert(id, PointerContact::new(id, position, time));
        &self.contacts[&id]
    }

    /// Moves a known contact. Returns `None` for contacts that were never registered.
    pub fn advance(&mut self, id: ContactId, position: Vec2) -> Option<&PointerContact> {
        let contact = self.contacts.get_mut(&id)?;
        contact.advance(position);
        Some(contact)
    }

    pub fn end(&mut self, id: ContactId) -> Option<PointerContact> {
        self.contacts.remove(&id)
    }

    pub fn get(&self, id: ContactId) -> Option<&PointerContact> {
        self.contacts.get(&id)
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.contacts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Current positions of both contacts when exactly two are active
    pub fn pair(&self) -> Option<(Vec2, Vec2)> {
        if self.contacts.len() != 2 {
            return None;
        }
        let mut positions = self.contacts.values().map(|c| c.current_position);
        Some((positions.next()?, positions.next()?))
    }
}
