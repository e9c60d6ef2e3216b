use glam::Vec2;
use macroquad::input::{Touch, TouchPhase as MacroquadTouchPhase};
use scroller_core::{ContactId, TouchEvent, TouchPhase};

/// Contact identifier reserved for the emulated mouse contact.
pub(crate) const MOUSE_CONTACT: ContactId = ContactId::new(u64::MAX);

/// Maps a platform touch phase onto the core lifecycle.
///
/// Stationary contacts carry no new information and are dropped.
pub(crate) const fn translate_phase(phase: MacroquadTouchPhase) -> Option<TouchPhase> {
    match phase {
        MacroquadTouchPhase::Started => Some(TouchPhase::Down),
        MacroquadTouchPhase::Moved => Some(TouchPhase::Move),
        MacroquadTouchPhase::Ended => Some(TouchPhase::Up),
        MacroquadTouchPhase::Cancelled => Some(TouchPhase::Cancel),
        MacroquadTouchPhase::Stationary => None,
    }
}

pub(crate) fn translate_touches(touches: &[Touch]) -> Vec<TouchEvent> {
    touches
        .iter()
        .filter_map(|touch| {
            translate_phase(touch.phase).map(|phase| {
                TouchEvent::new(
                    ContactId::new(touch.id),
                    Vec2::new(touch.position.x, touch.position.y),
                    phase,
                )
            })
        })
        .collect()
}

/// Turns the left mouse button into a single touch contact.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct MouseTouchEmulator {
    pressed_at: Option<Vec2>,
}

impl MouseTouchEmulator {
    /// Feeds the current button state and cursor position.
    pub(crate) fn observe(&mut self, pressed: bool, position: Vec2) -> Option<TouchEvent> {
        let phase = match (self.pressed_at, pressed) {
            (None, true) => TouchPhase::Down,
            (Some(last), true) if last != position => TouchPhase::Move,
            (Some(_), false) => TouchPhase::Up,
            _ => return None,
        };
        self.pressed_at = pressed.then_some(position);
        Some(TouchEvent::new(MOUSE_CONTACT, position, phase))
    }

    /// Ends an emulated contact that is still held.
    fn release(&mut self) -> Option<TouchEvent> {
        self.pressed_at
            .take()
            .map(|position| TouchEvent::new(MOUSE_CONTACT, position, TouchPhase::Up))
    }
}

/// Produces the touch events of one frame from raw platform input.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InputTranslator {
    mouse: Option<MouseTouchEmulator>,
}

impl InputTranslator {
    pub(crate) fn new(mouse_emulation: bool) -> Self {
        Self {
            mouse: mouse_emulation.then(MouseTouchEmulator::default),
        }
    }

    /// The mouse only acts as a contact while no finger is down, including
    /// fingers held still.
    pub(crate) fn translate(
        &mut self,
        touches: &[Touch],
        mouse_pressed: bool,
        mouse_position: Vec2,
    ) -> Vec<TouchEvent> {
        let Some(mouse) = self.mouse.as_mut() else {
            return translate_touches(touches);
        };
        if touches.is_empty() {
            return mouse.observe(mouse_pressed, mouse_position).into_iter().collect();
        }
        let mut events: Vec<TouchEvent> = mouse.release().into_iter().collect();
        events.extend(translate_touches(touches));
        events
    }
}

#[cfg(test)]
mod tests {
    use macroquad::math::Vec2 as MacroquadVec2;
    use scroller_world::camera::CameraState;
    use scroller_system_gestures::{GestureController, GestureState};

    use super::*;

    fn touch(id: u64, phase: MacroquadTouchPhase, x: f32, y: f32) -> Touch {
        Touch {
            id,
            phase,
            position: MacroquadVec2::new(x, y),
        }
    }

    #[test]
    fn stationary_touches_are_dropped() {
        assert_eq!(translate_phase(MacroquadTouchPhase::Stationary), None);
        assert_eq!(
            translate_phase(MacroquadTouchPhase::Started),
            Some(TouchPhase::Down)
        );
        assert_eq!(
            translate_phase(MacroquadTouchPhase::Cancelled),
            Some(TouchPhase::Cancel)
        );
    }

    #[test]
    fn mouse_press_drag_release_forms_one_contact() {
        let mut emulator = MouseTouchEmulator::default();
        let start = Vec2::new(10.0, 20.0);
        let end = Vec2::new(30.0, 20.0);

        let phases: Vec<Option<TouchPhase>> = [
            (false, start),
            (true, start),
            (true, start),
            (true, end),
            (false, end),
            (false, end),
        ]
        .into_iter()
        .map(|(pressed, position)| {
            emulator
                .observe(pressed, position)
                .map(|event| event.phase)
        })
        .collect();

        assert_eq!(
            phases,
            vec![
                None,
                Some(TouchPhase::Down),
                None,
                Some(TouchPhase::Move),
                Some(TouchPhase::Up),
                None,
            ]
        );
    }

    #[test]
    fn emulated_events_use_the_reserved_contact() {
        let mut emulator = MouseTouchEmulator::default();
        let event = emulator
            .observe(true, Vec2::new(1.0, 2.0))
            .expect("press starts a contact");

        assert_eq!(event.contact, MOUSE_CONTACT);
        assert_eq!(event.position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn held_finger_suppresses_the_emulated_mouse() {
        let mut translator = InputTranslator::new(true);
        let at = Vec2::new(100.0, 100.0);

        let frames = [
            vec![touch(7, MacroquadTouchPhase::Started, 100.0, 100.0)],
            vec![touch(7, MacroquadTouchPhase::Stationary, 100.0, 100.0)],
            vec![touch(7, MacroquadTouchPhase::Moved, 140.0, 100.0)],
        ];
        let events: Vec<Vec<TouchEvent>> = frames
            .iter()
            .map(|touches| translator.translate(touches, true, at))
            .collect();

        assert!(events.iter().flatten().all(|event| event.contact != MOUSE_CONTACT));
        assert!(events[1].is_empty());
    }

    #[test]
    fn held_finger_keeps_a_single_finger_drag() {
        let mut translator = InputTranslator::new(true);
        let mut gestures = GestureController::new();
        let camera = CameraState::default();
        let mut commands = Vec::new();

        for touches in [
            vec![touch(7, MacroquadTouchPhase::Started, 100.0, 100.0)],
            vec![touch(7, MacroquadTouchPhase::Stationary, 100.0, 100.0)],
            vec![touch(7, MacroquadTouchPhase::Moved, 160.0, 100.0)],
        ] {
            let events = translator.translate(&touches, true, Vec2::new(100.0, 100.0));
            gestures.handle_batch(&events, &camera, &mut commands);
        }

        assert!(matches!(gestures.state(), GestureState::Dragging { .. }));
    }

    #[test]
    fn touch_ends_a_held_mouse_contact() {
        let mut translator = InputTranslator::new(true);
        let cursor = Vec2::new(5.0, 5.0);
        let down = translator.translate(&[], true, cursor);
        assert_eq!(down[0].phase, TouchPhase::Down);

        let events = translator.translate(
            &[touch(3, MacroquadTouchPhase::Started, 50.0, 50.0)],
            true,
            cursor,
        );

        assert_eq!(events.len(), 2);
        assert_eq!((events[0].contact, events[0].phase), (MOUSE_CONTACT, TouchPhase::Up));
        assert_eq!(events[1].contact, ContactId::new(3));
    }

    #[test]
    fn disabled_emulation_ignores_the_mouse() {
        let mut translator = InputTranslator::new(false);

        assert!(translator.translate(&[], true, Vec2::ZERO).is_empty());
    }
}
