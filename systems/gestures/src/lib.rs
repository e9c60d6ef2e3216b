#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure gesture system translating raw touch input into camera commands.
//!
//! A single contact drags the camera, two contacts pinch to zoom. Positions
//! are tracked in world space using the camera snapshot supplied with each
//! batch, so drag deltas can be forwarded to the world unchanged.

use glam::Vec2;
use scroller_core::{Command, ContactId, Event, TouchEvent, TouchPhase};
use scroller_world::camera::CameraState;

/// Distances at or below this value cannot produce a meaningful zoom ratio.
const MIN_PINCH_DISTANCE: f32 = 1e-6;

/// Contact followed by the gesture state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedContact {
    /// Identifier reported by the input adapter.
    pub id: ContactId,
    /// Last known position in world space.
    pub world: Vec2,
}

impl TrackedContact {
    /// Creates a tracked contact at the provided world position.
    #[must_use]
    pub const fn new(id: ContactId, world: Vec2) -> Self {
        Self { id, world }
    }
}

/// Gesture currently being recognised.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum GestureState {
    /// No contact is touching the surface.
    #[default]
    Idle,
    /// One contact drags the camera.
    Dragging {
        /// Contact driving the drag.
        contact: ContactId,
        /// World position reported by the previous event of the contact.
        last_world: Vec2,
    },
    /// Two contacts pinch to zoom.
    Pinching {
        /// Contact that started the gesture.
        first: TrackedContact,
        /// Contact that joined the gesture.
        second: TrackedContact,
        /// World distance between the contacts at the previous step.
        last_distance: f32,
    },
}

/// Gesture recogniser that emits scroll, zoom and tap commands.
#[derive(Clone, Debug, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    /// Creates an idle gesture controller.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    /// Current gesture state.
    #[must_use]
    pub const fn state(&self) -> GestureState {
        self.state
    }

    /// Processes every touch of a frame against the same camera snapshot.
    pub fn handle_batch(
        &mut self,
        touches: &[TouchEvent],
        camera: &CameraState,
        out: &mut Vec<Command>,
    ) {
        for touch in touches {
            self.handle(*touch, camera, out);
        }
    }

    /// Advances the state machine with a single touch event.
    pub fn handle(&mut self, touch: TouchEvent, camera: &CameraState, out: &mut Vec<Command>) {
        if touch.phase == TouchPhase::Cancel {
            self.state = GestureState::Idle;
            return;
        }

        let world = camera.screen_to_world(touch.position);
        self.state = match (self.state, touch.phase) {
            (GestureState::Idle, TouchPhase::Down) => {
                out.push(Command::TapAt { world });
                GestureState::Dragging {
                    contact: touch.contact,
                    last_world: world,
                }
            }
            (GestureState::Dragging { contact, .. }, TouchPhase::Down)
                if contact == touch.contact =>
            {
                GestureState::Dragging {
                    contact,
                    last_world: world,
                }
            }
            (
                GestureState::Dragging {
                    contact,
                    last_world,
                },
                TouchPhase::Down,
            ) => GestureState::Pinching {
                first: TrackedContact::new(contact, last_world),
                second: TrackedContact::new(touch.contact, world),
                last_distance: last_world.distance(world),
            },
            (
                GestureState::Dragging {
                    contact,
                    last_world,
                },
                TouchPhase::Move,
            ) if contact == touch.contact => {
                let delta = world - last_world;
                if delta != Vec2::ZERO {
                    out.push(Command::ScrollCamera { delta });
                }
                GestureState::Dragging {
                    contact,
                    last_world: world,
                }
            }
            (GestureState::Dragging { contact, .. }, TouchPhase::Up)
                if contact == touch.contact =>
            {
                GestureState::Idle
            }
            (
                GestureState::Pinching {
                    mut first,
                    mut second,
                    last_distance,
                },
                TouchPhase::Move,
            ) if touch.contact == first.id || touch.contact == second.id => {
                if touch.contact == first.id {
                    first.world = world;
                } else {
                    second.world = world;
                }
                let distance = first.world.distance(second.world);
                if distance > MIN_PINCH_DISTANCE && last_distance > MIN_PINCH_DISTANCE {
                    out.push(Command::ZoomCamera {
                        factor: distance / last_distance,
                    });
                }
                GestureState::Pinching {
                    first,
                    second,
                    last_distance: distance,
                }
            }
            (GestureState::Pinching { first, second, .. }, TouchPhase::Up)
                if touch.contact == first.id || touch.contact == second.id =>
            {
                let remaining = if touch.contact == first.id {
                    second
                } else {
                    first
                };
                GestureState::Dragging {
                    contact: remaining.id,
                    last_world: remaining.world,
                }
            }
            (state, _) => state,
        };
    }

    /// Reacts to world events that invalidate stored world positions.
    ///
    /// An accepted zoom step shrinks the world footprint of every screen
    /// position by `1 / factor`, so stored anchors are rescaled to keep
    /// subsequent deltas and ratios consistent with the new camera.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::ZoomChanged { factor, .. } = event {
                self.rescale(1.0 / factor);
            }
        }
    }

    fn rescale(&mut self, scale: f32) {
        match &mut self.state {
            GestureState::Idle => {}
            GestureState::Dragging { last_world, .. } => *last_world *= scale,
            GestureState::Pinching {
                first,
                second,
                last_distance,
            } => {
                first.world *= scale;
                second.world *= scale;
                *last_distance *= scale;
            }
        }
    }
}
