//! Gesture classification
//!
//! Turns per-contact down/move/up/cancel input (already in world coordinates)
//! into tap, swipe, drag, long-press, pinch and hover events.
//!
//! All state lives in [`GestureRecognizer`]. The only deferred work is the
//! long-press timer, which fires from [`GestureRecognizer::poll_timers`].

use std::time::Duration;

use glam::Vec2;
use tracing::{debug, trace};

use super::contact::{ContactId, PointerContact, PointerTable};
use super::dispatch::{EventEmitter, dispatch};
use super::events::{Gesture, GestureEvent, SwipeDirection};
use super::hit::hit_test;
use super::timer::{TimerHandle, TimerQueue};
use crate::sim::{EntityId, Scene};

/// Default long-press delay in milliseconds.
///
/// A stationary contact held this long fires a long-press.
pub const DEFAULT_LONG_PRESS_DELAY_MS: u64 = 500;

/// Default minimum distance for a swipe in world units.
pub const DEFAULT_SWIPE_MIN_DISTANCE: f32 = 30.0;

/// Default maximum movement for a tap in world units.
///
/// Movement beyond this threshold also cancels a pending long-press.
pub const DEFAULT_TAP_MAX_MOVEMENT: f32 = 10.0;

/// Default tap timeout in milliseconds.
pub const DEFAULT_TAP_MAX_DURATION_MS: u64 = 300;

/// Lower bound for the elapsed time used in velocity calculations
const MIN_ELAPSED_MS: f32 = 1.0;

/// Movement and timing limits used for classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    pub long_press_delay: Duration,
    pub swipe_min_distance: f32,
    pub tap_max_movement: f32,
    pub tap_max_duration: Duration,
}

impl GestureThresholds {
    pub const DEFAULT: Self = Self {
        long_press_delay: Duration::from_millis(DEFAULT_LONG_PRESS_DELAY_MS),
        swipe_min_distance: DEFAULT_SWIPE_MIN_DISTANCE,
        tap_max_movement: DEFAULT_TAP_MAX_MOVEMENT,
        tap_max_duration: Duration::from_millis(DEFAULT_TAP_MAX_DURATION_MS),
    };
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of a released contact. Exactly one per release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    Tap,
    Swipe {
        direction: SwipeDirection,
        velocity: Vec2,
        distance: f32,
        delta: Vec2,
    },
    /// Moved too far for a tap but not far enough for a swipe, or held too long
    Neither,
}

/// Classifies a release from its start and end positions and its duration
pub fn classify_release(
    thresholds: &GestureThresholds,
    start: Vec2,
    end: Vec2,
    elapsed: Duration,
) -> Release {
    let delta = end - start;
    let distance = delta.length();

    if distance < thresholds.tap_max_movement && elapsed < thresholds.tap_max_duration {
        Release::Tap
    } else if distance > thresholds.swipe_min_distance {
        let elapsed_ms = (elapsed.as_micros() as f32 / 1000.0).max(MIN_ELAPSED_MS);
        Release::Swipe {
            direction: SwipeDirection::from_delta(delta),
            velocity: delta / elapsed_ms,
            distance,
            delta,
        }
    } else {
        Release::Neither
    }
}

/// Scene and global listeners the recognizer resolves targets in and emits to
pub struct GestureContext<'a> {
    scene: Option<&'a mut dyn Scene>,
    events: &'a mut EventEmitter,
}

impl<'a> GestureContext<'a> {
    pub fn new(scene: Option<&'a mut dyn Scene>, events: &'a mut EventEmitter) -> Self {
        Self { scene, events }
    }

    /// Fresh hit test against the current scene state
    fn hit_test(&self, point: Vec2) -> Option<EntityId> {
        hit_test(self.scene.as_deref(), point)
    }

    fn entity_position(&self, id: EntityId) -> Option<Vec2> {
        self.scene.as_deref()?.entity(id).map(|e| e.position())
    }

    fn dispatch(&mut self, gesture: Gesture, position: Vec2, target: Option<EntityId>) {
        let event = GestureEvent::new(gesture, position, target);
        dispatch(self.scene.as_deref_mut(), self.events, &event);
    }
}

/// Entity bound at contact down and held until release or cancel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTarget {
    pub entity: EntityId,
    /// Last pointer position that moved the drag
    pub last_position: Vec2,
}

/// Two-contact pinch in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchContext {
    pub start_distance: f32,
    pub target: Option<EntityId>,
}

#[derive(Debug, Clone, Copy)]
struct LongPress {
    handle: TimerHandle,
    contact: ContactId,
}

/// Gesture state machine for one canvas
#[derive(Debug, Default)]
pub struct GestureRecognizer {
    thresholds: GestureThresholds,
    pointers: PointerTable,
    timers: TimerQueue<ContactId>,
    long_press: Option<LongPress>,
    hover: Option<EntityId>,
    drag: Option<DragTarget>,
    pinch: Option<PinchContext>,
    /// Last world position seen from any contact
    last_position: Option<Vec2>,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    /// Handles a contact going down at a world position
    pub fn pointer_down(
        &mut self,
        ctx: &mut GestureContext<'_>,
        contact: ContactId,
        position: Vec2,
        now: Duration,
    ) {
        self.last_position = Some(position);
        self.pointers.begin(contact, position, now);

        let target = ctx.hit_test(position);
        ctx.dispatch(Gesture::PointerDown { contact }, position, target);

        // Drag ownership is global: a second contact does not rebind it
        if let Some(entity) = target
            && self.drag.is_none()
        {
            debug!(?contact, ?entity, "drag start");
            self.drag = Some(DragTarget {
                entity,
                last_position: position,
            });
            ctx.dispatch(Gesture::DragStart, position, Some(entity));
        }

        match self.pointers.len() {
            1 => self.arm_long_press(contact, now),
            2 => {
                self.disarm_long_press();
                self.begin_pinch(ctx);
            }
            _ => {
                // Pinch is defined over exactly two contacts
                if self.pinch.take().is_some() {
                    debug!(contacts = self.pointers.len(), "pinch suspended");
                }
            }
        }
    }

    /// Handles movement. The mouse drives hover even while no button is held;
    /// moves from touch contacts that never went down are ignored.
    pub fn pointer_move(&mut self, ctx: &mut GestureContext<'_>, contact: ContactId, position: Vec2) {
        if matches!(contact, ContactId::Touch(_)) && !self.pointers.contains(contact) {
            trace!(?contact, "move for unknown touch ignored");
            return;
        }
        self.last_position = Some(position);

        let hit = ctx.hit_test(position);
        ctx.dispatch(Gesture::PointerMove { contact }, position, hit);
        self.update_hover(ctx, position, hit);

        let Some(record) = self.pointers.advance(contact, position).copied() else {
            return;
        };

        if record.displacement_to(position).length() > self.thresholds.tap_max_movement
            && self.long_press.is_some_and(|lp| lp.contact == contact)
        {
            trace!(?contact, "moved past tap slop, long press disarmed");
            self.disarm_long_press();
        }

        if record.is_down
            && let Some(drag) = self.drag.as_mut()
        {
            drag.last_position = position;
            let entity = drag.entity;
            ctx.dispatch(
                Gesture::Drag {
                    delta: record.step_delta(),
                },
                position,
                Some(entity),
            );
        }

        if self.pinch.is_some() {
            self.update_pinch(ctx);
        }
    }

    /// Handles a release: classifies tap/swipe, ends any drag and refreshes hover.
    /// Releases for unknown contacts are ignored.
    pub fn pointer_up(
        &mut self,
        ctx: &mut GestureContext<'_>,
        contact: ContactId,
        position: Vec2,
        now: Duration,
    ) {
        let Some(record) = self.pointers.get(contact).copied() else {
            trace!(?contact, "release for unknown contact ignored");
            return;
        };
        self.last_position = Some(position);

        let hit = ctx.hit_test(position);
        ctx.dispatch(Gesture::PointerUp { contact }, position, hit);

        self.emit_release(ctx, &record, position, now);

        self.disarm_long_press();

        if let Some(drag) = self.drag.take() {
            debug!(?contact, entity = ?drag.entity, "drag end");
            ctx.dispatch(Gesture::DragEnd, position, Some(drag.entity));
        }

        self.pointers.end(contact);
        match self.pointers.len() {
            0 | 1 => {
                if self.pinch.take().is_some() {
                    debug!("pinch end");
                }
            }
            // Back to a pair: measure scale from the pair that remains
            2 if self.pinch.is_none() => self.begin_pinch(ctx),
            _ => {}
        }

        let hit = ctx.hit_test(position);
        self.update_hover(ctx, position, hit);
    }

    /// Aborts everything in flight. Safe to call repeatedly.
    pub fn cancel(&mut self, ctx: &mut GestureContext<'_>) {
        self.disarm_long_press();
        self.timers.clear();

        if let Some(entity) = self.hover.take() {
            let position = self
                .last_position
                .or_else(|| ctx.entity_position(entity))
                .unwrap_or(Vec2::ZERO);
            ctx.dispatch(Gesture::PointerOut, position, Some(entity));
        }

        if let Some(drag) = self.drag.take() {
            // No fresh pointer coordinate; use where the entity is now
            let position = ctx
                .entity_position(drag.entity)
                .unwrap_or(drag.last_position);
            debug!(entity = ?drag.entity, "drag cancelled");
            ctx.dispatch(Gesture::DragEnd, position, Some(drag.entity));
        }

        if !self.pointers.is_empty() {
            debug!(contacts = self.pointers.len(), "gesture cancelled");
        }
        self.pointers.clear();
        self.pinch = None;
    }

    /// Fires due long-press timers
    pub fn poll_timers(&mut self, ctx: &mut GestureContext<'_>, now: Duration) {
        for (handle, contact) in self.timers.poll(now) {
            if self.long_press.is_some_and(|lp| lp.handle == handle) {
                self.long_press = None;
            }

            let Some(record) = self.pointers.get(contact).copied() else {
                trace!(?contact, "long press timer fired for a released contact");
                continue;
            };

            // Resolve against where the press started, not where it is now
            let position = record.start_position;
            let target = ctx.hit_test(position);
            debug!(?contact, ?target, "long press");
            ctx.dispatch(Gesture::LongPress, position, target);
        }
    }

    fn emit_release(
        &mut self,
        ctx: &mut GestureContext<'_>,
        record: &PointerContact,
        position: Vec2,
        now: Duration,
    ) {
        let start = record.start_position;
        match classify_release(&self.thresholds, start, position, record.elapsed(now)) {
            Release::Tap => {
                let target = ctx.hit_test(start);
                debug!(contact = ?record.id, ?target, "tap");
                ctx.dispatch(Gesture::Tap, start, target);
            }
            Release::Swipe {
                direction,
                velocity,
                distance,
                delta,
            } => {
                let target = ctx.hit_test(start);
                debug!(contact = ?record.id, direction = direction.as_str(), distance, "swipe");
                ctx.dispatch(
                    Gesture::Swipe {
                        direction,
                        velocity,
                        distance,
                        delta,
                    },
                    position,
                    target,
                );
            }
            Release::Neither => {
                trace!(contact = ?record.id, "release was neither tap nor swipe");
            }
        }
    }

    fn update_hover(&mut self, ctx: &mut GestureContext<'_>, position: Vec2, hit: Option<EntityId>) {
        if hit == self.hover {
            return;
        }
        if let Some(previous) = self.hover.take() {
            ctx.dispatch(Gesture::PointerOut, position, Some(previous));
        }
        if let Some(current) = hit {
            ctx.dispatch(Gesture::PointerOver, position, Some(current));
        }
        self.hover = hit;
    }

    fn arm_long_press(&mut self, contact: ContactId, now: Duration) {
        self.disarm_long_press();
        let handle = self
            .timers
            .schedule(now + self.thresholds.long_press_delay, contact);
        self.long_press = Some(LongPress { handle, contact });
    }

    fn disarm_long_press(&mut self) {
        if let Some(long_press) = self.long_press.take() {
            self.timers.cancel(long_press.handle);
        }
    }

    fn begin_pinch(&mut self, ctx: &mut GestureContext<'_>) {
        let Some((a, b)) = self.pointers.pair() else {
            return;
        };
        let distance = a.distance(b);
        let midpoint = (a + b) * 0.5;
        let target = ctx.hit_test(midpoint);

        debug!(distance, ?target, "pinch start");
        self.pinch = Some(PinchContext {
            start_distance: distance,
            target,
        });
        ctx.dispatch(
            Gesture::Pinch {
                distance,
                scale: 1.0,
            },
            midpoint,
            target,
        );
    }

    fn update_pinch(&mut self, ctx: &mut GestureContext<'_>) {
        let Some((a, b)) = self.pointers.pair() else {
            return;
        };
        let Some(pinch) = self.pinch.as_mut() else {
            return;
        };

        let distance = a.distance(b);
        if pinch.start_distance <= f32::EPSILON {
            pinch.start_distance = distance;
        }
        let scale = if pinch.start_distance > f32::EPSILON {
            distance / pinch.start_distance
        } else {
            1.0
        };
        let target = pinch.target;

        ctx.dispatch(Gesture::Pinch { distance, scale }, (a + b) * 0.5, target);
    }

    /// Entity currently under the pointer
    pub fn hover_target(&self) -> Option<EntityId> {
        self.hover
    }

    pub fn drag_target(&self) -> Option<DragTarget> {
        self.drag
    }

    pub fn pinch(&self) -> Option<PinchContext> {
        self.pinch
    }

    pub fn contact(&self, id: ContactId) -> Option<&PointerContact> {
        self.pointers.get(id)
    }

    pub fn active_contacts(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_long_press_armed(&self) -> bool {
        self.long_press.is_some()
    }

    /// When the next pending timer falls due
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.timers.next_deadline()
    }
}
