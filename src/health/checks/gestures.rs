//! Gesture pipeline health check

use std::time::Duration;

use glam::Vec2;

use crate::app::input::{Canvas, ContactId, GestureKind, PointerInput, PointerPhase};
use crate::engine::Engine;
use crate::health::check::{CheckResult, SystemCheck};
use crate::sim::World;
use crate::sim::camera::Camera;
use crate::sim::sprite::Sprite;

/// Drives synthetic input through a scratch engine and checks the recognized gestures
pub struct GestureCheck;

impl GestureCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GestureCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// One scripted interaction and the gesture it must produce
struct Scenario {
    name: &'static str,
    inputs: &'static [(f32, f32, PointerPhase, u64)],
    expect: GestureKind,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "tap",
        inputs: &[
            (200.0, 150.0, PointerPhase::Down, 0),
            (200.0, 150.0, PointerPhase::Up, 100),
        ],
        expect: GestureKind::Tap,
    },
    Scenario {
        name: "swipe",
        inputs: &[
            (100.0, 100.0, PointerPhase::Down, 0),
            (150.0, 100.0, PointerPhase::Move, 50),
            (200.0, 100.0, PointerPhase::Up, 100),
        ],
        expect: GestureKind::Swipe,
    },
    Scenario {
        name: "long press",
        inputs: &[
            (200.0, 150.0, PointerPhase::Down, 0),
            (200.0, 150.0, PointerPhase::Up, 550),
        ],
        expect: GestureKind::LongPress,
    },
];

fn scratch_engine() -> Engine<World> {
    let size = Vec2::new(400.0, 300.0);
    let world = World::new().with_entity(Sprite::rect(Vec2::new(200.0, 150.0), Vec2::splat(20.0)));
    Engine::new(Canvas::sized(size), Camera::new(size)).with_scene(world)
}

impl SystemCheck for GestureCheck {
    fn name(&self) -> &'static str {
        "Gestures"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates tap, swipe and long-press recognition on a scratch scene")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let mut failures = 0;

        for scenario in SCENARIOS {
            let mut engine = scratch_engine();
            let log = engine.events_mut().record();

            for &(x, y, phase, at) in scenario.inputs {
                let input = PointerInput::new(ContactId::Mouse, Vec2::new(x, y), phase);
                engine.handle_input(input, Duration::from_millis(at));
            }
            engine.destroy();

            let count = log
                .borrow()
                .iter()
                .filter(|e| e.kind() == scenario.expect)
                .count();
            if count == 1 {
                details.push(format!("  ✓ {}: one '{}' event", scenario.name, scenario.expect));
            } else {
                failures += 1;
                details.push(format!(
                    "  ✗ {}: expected one '{}' event, got {}",
                    scenario.name, scenario.expect, count
                ));
            }
        }

        if failures > 0 {
            CheckResult::fail(format!("{failures} gesture scenario(s) misrecognized"))
                .with_details(details.join("\n"))
        } else {
            CheckResult::pass(format!("{} gesture scenarios recognized", SCENARIOS.len()))
                .with_details(details.join("\n"))
        }
    }
}
