use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, PointerButtonEvent, PointerMoveEvent};
use super::Modifiers;

/// Current input state for the window.
///
/// Holds held keys, modifiers and the pointer position that the platform
/// layer stamps onto button events. Per-frame transitions are recorded into
/// an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    /// Pointer position in logical pixels, `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(false) => {
                // Avoid stuck keys when focus changes mid-press.
                self.keys_down.clear();
            }

            InputEvent::Focused(true) => {}

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { x, y, modifiers, .. }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MouseButton, MouseButtonState};

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            modifiers: Modifiers::default(),
            repeat,
        }
    }

    #[test]
    fn key_press_is_one_transition_while_held() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, &key(Key::Z, KeyState::Pressed, false));
        assert!(frame.key_pressed(Key::Z));

        frame.clear();
        state.apply_event(&mut frame, &key(Key::Z, KeyState::Pressed, true));
        assert!(!frame.key_pressed(Key::Z));
        assert!(state.keys_down.contains(&Key::Z));
    }

    #[test]
    fn release_rearms_the_key() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, &key(Key::Q, KeyState::Pressed, false));
        state.apply_event(&mut frame, &key(Key::Q, KeyState::Released, false));
        frame.clear();
        state.apply_event(&mut frame, &key(Key::Q, KeyState::Pressed, false));

        assert_eq!(frame.pressed_keys().collect::<Vec<_>>(), vec![Key::Q]);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, &key(Key::W, KeyState::Pressed, false));
        state.apply_event(&mut frame, &InputEvent::Focused(false));
        frame.clear();
        state.apply_event(&mut frame, &key(Key::W, KeyState::Pressed, false));

        assert!(frame.key_pressed(Key::W));
    }

    #[test]
    fn button_press_records_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(
            &mut frame,
            &InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
                x: 10.0,
                y: 20.0,
                modifiers: Modifiers::default(),
            }),
        );

        assert_eq!(state.pointer_pos, Some((10.0, 20.0)));
        assert!(frame.keys_pressed.is_empty());
    }

    #[test]
    fn pointer_left_clears_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(
            &mut frame,
            &InputEvent::PointerMoved(PointerMoveEvent { x: 5.0, y: 5.0 }),
        );
        state.apply_event(&mut frame, &InputEvent::PointerLeft);

        assert_eq!(state.pointer_pos, None);
    }
}
