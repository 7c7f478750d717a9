//! Topmost-entity hit testing

use glam::Vec2;

use crate::sim::{EntityId, Scene};

/// Returns the visually topmost entity that is interactive, visible and
/// contains `point`. Walks paint order back to front so the last painted wins.
pub fn hit_test(scene: Option<&(dyn Scene + '_)>, point: Vec2) -> Option<EntityId> {
    let scene = scene?;
    scene.paint_order().iter().rev().copied().find(|id| {
        scene
            .entity(*id)
            .is_some_and(|e| e.is_interactive() && e.is_visible() && e.contains_point(point))
    })
}
