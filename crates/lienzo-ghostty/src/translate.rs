//! Translation between native ghostty input and abstract events.
//!
//! Key translation runs in three stages, first match wins: control
//! chords the runtime already resolved to a semantic letter code, then
//! printable codepoints (with control shortcuts folded out of them),
//! then the semantic key table. Releases are dropped up front; the
//! abstract contract only carries presses and repeats.

use lienzo_core::{Key, KeyAction, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};

use crate::ffi::{self, GhosttyKeyData, GhosttyMouseData};

/// Narrows a native cell coordinate to the abstract grid range.
pub(crate) fn clamp_cell_coord(v: i32) -> u16 {
    v.clamp(0, i32::from(u16::MAX)) as u16
}

pub(crate) fn mods_from_native(mods: i32) -> Modifiers {
    let mut out = Modifiers::NONE;
    if mods & ffi::MOD_SHIFT != 0 {
        out |= Modifiers::SHIFT;
    }
    if mods & ffi::MOD_CTRL != 0 {
        out |= Modifiers::CTRL;
    }
    if mods & ffi::MOD_ALT != 0 {
        out |= Modifiers::ALT;
    }
    if mods & ffi::MOD_SUPER != 0 {
        out |= Modifiers::SUPER;
    }
    out
}

pub(crate) fn mods_to_native(mods: Modifiers) -> i32 {
    let mut out = 0;
    if mods.contains(Modifiers::SHIFT) {
        out |= ffi::MOD_SHIFT;
    }
    if mods.contains(Modifiers::CTRL) {
        out |= ffi::MOD_CTRL;
    }
    if mods.contains(Modifiers::ALT) {
        out |= ffi::MOD_ALT;
    }
    if mods.contains(Modifiers::SUPER) {
        out |= ffi::MOD_SUPER;
    }
    out
}

/// Translates one polled key event, or `None` when it has no abstract
/// representation.
pub(crate) fn key_event(key: GhosttyKeyData) -> Option<KeyEvent> {
    if key.action == ffi::ACTION_RELEASE {
        return None;
    }
    let mods = mods_from_native(key.mods);
    let action = if key.action == ffi::ACTION_REPEAT {
        KeyAction::Repeat
    } else {
        KeyAction::Press
    };

    if mods.contains(Modifiers::CTRL) {
        if let Some(shortcut) = control_chord(key.key) {
            return Some(KeyEvent::new(shortcut, mods).with_action(action));
        }
    }

    if let Some(ch) = char::from_u32(key.codepoint).filter(|&ch| ch != '\0') {
        if mods.contains(Modifiers::CTRL) {
            if let Some(shortcut) = Key::from_control_rune(ch.to_ascii_lowercase()) {
                return Some(KeyEvent::new(shortcut, mods).with_action(action));
            }
        }
        return Some(KeyEvent::rune(ch, mods).with_action(action));
    }

    let sym = semantic_key(key.key)?;
    Some(KeyEvent::new(sym, mods).with_action(action))
}

/// Translates one polled mouse event. `tag` selects how the shared
/// payload is read.
pub(crate) fn mouse_event(tag: u32, mouse: GhosttyMouseData) -> Option<MouseEvent> {
    let mods = mods_from_native(mouse.mods);
    let x = clamp_cell_coord(mouse.x);
    let y = clamp_cell_coord(mouse.y);
    match tag {
        ffi::EVENT_MOUSE_MOVE => Some(MouseEvent {
            x,
            y,
            button: MouseButton::None,
            action: MouseAction::Move,
            mods,
        }),
        ffi::EVENT_MOUSE_BUTTON => {
            let button = match mouse.button {
                ffi::MOUSE_BUTTON_NONE => MouseButton::None,
                ffi::MOUSE_BUTTON_LEFT => MouseButton::Left,
                ffi::MOUSE_BUTTON_RIGHT => MouseButton::Right,
                ffi::MOUSE_BUTTON_MIDDLE => MouseButton::Middle,
                _ => return None,
            };
            let action = if mouse.state == ffi::MOUSE_STATE_RELEASE {
                MouseAction::Release
            } else {
                MouseAction::Press
            };
            Some(MouseEvent {
                x,
                y,
                button,
                action,
                mods,
            })
        }
        ffi::EVENT_MOUSE_SCROLL => {
            if mouse.scroll_y == 0.0 {
                return None;
            }
            let button = if mouse.scroll_y > 0.0 {
                MouseButton::WheelUp
            } else {
                MouseButton::WheelDown
            };
            Some(MouseEvent {
                x,
                y,
                button,
                action: MouseAction::Press,
                mods,
            })
        }
        _ => None,
    }
}

/// Native code for an abstract button, `None` for buttons the native
/// side has no representation for.
pub(crate) fn native_button(button: MouseButton) -> Option<i32> {
    match button {
        MouseButton::Left => Some(ffi::MOUSE_BUTTON_LEFT),
        MouseButton::Right => Some(ffi::MOUSE_BUTTON_RIGHT),
        MouseButton::Middle => Some(ffi::MOUSE_BUTTON_MIDDLE),
        MouseButton::None | MouseButton::WheelUp | MouseButton::WheelDown => None,
    }
}

/// Control chords the runtime resolves to a semantic letter code
/// before they reach the poll stream.
fn control_chord(code: i32) -> Option<Key> {
    match code {
        ffi::KEY_B => Some(Key::CtrlB),
        ffi::KEY_C => Some(Key::CtrlC),
        ffi::KEY_D => Some(Key::CtrlD),
        ffi::KEY_F => Some(Key::CtrlF),
        ffi::KEY_P => Some(Key::CtrlP),
        ffi::KEY_V => Some(Key::CtrlV),
        ffi::KEY_X => Some(Key::CtrlX),
        ffi::KEY_Z => Some(Key::CtrlZ),
        _ => None,
    }
}

/// Semantic key table. Numpad codes fold onto their main-keyboard
/// equivalents.
fn semantic_key(code: i32) -> Option<Key> {
    match code {
        ffi::KEY_ENTER | ffi::KEY_NUMPAD_ENTER => Some(Key::Enter),
        ffi::KEY_BACKSPACE | ffi::KEY_NUMPAD_BACKSPACE => Some(Key::Backspace),
        ffi::KEY_TAB => Some(Key::Tab),
        ffi::KEY_ESCAPE => Some(Key::Escape),
        ffi::KEY_DELETE | ffi::KEY_NUMPAD_DELETE => Some(Key::Delete),
        ffi::KEY_INSERT | ffi::KEY_NUMPAD_INSERT => Some(Key::Insert),
        ffi::KEY_HOME | ffi::KEY_NUMPAD_HOME => Some(Key::Home),
        ffi::KEY_END | ffi::KEY_NUMPAD_END => Some(Key::End),
        ffi::KEY_PAGE_UP | ffi::KEY_NUMPAD_PAGE_UP => Some(Key::PageUp),
        ffi::KEY_PAGE_DOWN | ffi::KEY_NUMPAD_PAGE_DOWN => Some(Key::PageDown),
        ffi::KEY_UP | ffi::KEY_NUMPAD_UP => Some(Key::Up),
        ffi::KEY_DOWN | ffi::KEY_NUMPAD_DOWN => Some(Key::Down),
        ffi::KEY_LEFT | ffi::KEY_NUMPAD_LEFT => Some(Key::Left),
        ffi::KEY_RIGHT | ffi::KEY_NUMPAD_RIGHT => Some(Key::Right),
        code @ ffi::KEY_F1..=ffi::KEY_F12 => function_key(code),
        _ => None,
    }
}

fn function_key(code: i32) -> Option<Key> {
    match code - ffi::KEY_F1 {
        0 => Some(Key::F1),
        1 => Some(Key::F2),
        2 => Some(Key::F3),
        3 => Some(Key::F4),
        4 => Some(Key::F5),
        5 => Some(Key::F6),
        6 => Some(Key::F7),
        7 => Some(Key::F8),
        8 => Some(Key::F9),
        9 => Some(Key::F10),
        10 => Some(Key::F11),
        11 => Some(Key::F12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key_data(action: i32, mods: i32, key: i32, codepoint: u32) -> GhosttyKeyData {
        GhosttyKeyData {
            action,
            mods,
            key,
            codepoint,
        }
    }

    #[test]
    fn test_release_is_dropped() {
        let ev = key_data(ffi::ACTION_RELEASE, 0, 0, u32::from('a'));
        assert_eq!(key_event(ev), None);
    }

    #[test]
    fn test_plain_rune_press() {
        let ev = key_event(key_data(ffi::ACTION_PRESS, 0, 0, u32::from('a'))).unwrap();
        assert_eq!(ev.key, Key::Rune);
        assert_eq!(ev.ch, Some('a'));
        assert_eq!(ev.mods, Modifiers::NONE);
        assert_eq!(ev.action, KeyAction::Press);
    }

    #[test]
    fn test_repeat_action_is_preserved() {
        let ev = key_event(key_data(ffi::ACTION_REPEAT, 0, 0, u32::from('a'))).unwrap();
        assert_eq!(ev.action, KeyAction::Repeat);
    }

    #[test]
    fn test_prebound_control_chord_wins_over_codepoint() {
        let ev = key_event(key_data(
            ffi::ACTION_PRESS,
            ffi::MOD_CTRL,
            ffi::KEY_C,
            u32::from('c'),
        ))
        .unwrap();
        assert_eq!(ev.key, Key::CtrlC);
        assert_eq!(ev.ch, None);
        assert!(ev.mods.contains(Modifiers::CTRL));
    }

    #[test]
    fn test_control_rune_folds_to_shortcut() {
        let ev = key_event(key_data(ffi::ACTION_PRESS, ffi::MOD_CTRL, 0, u32::from('b'))).unwrap();
        assert_eq!(ev.key, Key::CtrlB);
        assert_eq!(ev.ch, None);
    }

    #[test]
    fn test_control_rune_folds_case_insensitively() {
        let ev = key_event(key_data(ffi::ACTION_PRESS, ffi::MOD_CTRL, 0, u32::from('X'))).unwrap();
        assert_eq!(ev.key, Key::CtrlX);
    }

    #[test]
    fn test_unmapped_control_rune_stays_a_rune() {
        let ev = key_event(key_data(ffi::ACTION_PRESS, ffi::MOD_CTRL, 0, u32::from('q'))).unwrap();
        assert_eq!(ev.key, Key::Rune);
        assert_eq!(ev.ch, Some('q'));
        assert!(ev.mods.contains(Modifiers::CTRL));
    }

    #[test]
    fn test_every_control_chord_round_trips() {
        let chords = [
            (ffi::KEY_B, Key::CtrlB, 'b'),
            (ffi::KEY_C, Key::CtrlC, 'c'),
            (ffi::KEY_D, Key::CtrlD, 'd'),
            (ffi::KEY_F, Key::CtrlF, 'f'),
            (ffi::KEY_P, Key::CtrlP, 'p'),
            (ffi::KEY_V, Key::CtrlV, 'v'),
            (ffi::KEY_X, Key::CtrlX, 'x'),
            (ffi::KEY_Z, Key::CtrlZ, 'z'),
        ];
        for (code, expected, rune) in chords {
            let ev = key_event(key_data(ffi::ACTION_PRESS, ffi::MOD_CTRL, code, 0)).unwrap();
            assert_eq!(ev.key, expected);
            assert_eq!(expected.control_rune(), Some(rune));
        }
    }

    #[test]
    fn test_numpad_folds_onto_main_keys() {
        let pairs = [
            (ffi::KEY_NUMPAD_ENTER, Key::Enter),
            (ffi::KEY_NUMPAD_BACKSPACE, Key::Backspace),
            (ffi::KEY_NUMPAD_DELETE, Key::Delete),
            (ffi::KEY_NUMPAD_INSERT, Key::Insert),
            (ffi::KEY_NUMPAD_HOME, Key::Home),
            (ffi::KEY_NUMPAD_END, Key::End),
            (ffi::KEY_NUMPAD_PAGE_UP, Key::PageUp),
            (ffi::KEY_NUMPAD_PAGE_DOWN, Key::PageDown),
            (ffi::KEY_NUMPAD_UP, Key::Up),
            (ffi::KEY_NUMPAD_DOWN, Key::Down),
            (ffi::KEY_NUMPAD_LEFT, Key::Left),
            (ffi::KEY_NUMPAD_RIGHT, Key::Right),
        ];
        for (code, expected) in pairs {
            let ev = key_event(key_data(ffi::ACTION_PRESS, 0, code, 0)).unwrap();
            assert_eq!(ev.key, expected, "code {code}");
        }
    }

    #[test]
    fn test_function_keys_are_contiguous() {
        let expected = [
            Key::F1,
            Key::F2,
            Key::F3,
            Key::F4,
            Key::F5,
            Key::F6,
            Key::F7,
            Key::F8,
            Key::F9,
            Key::F10,
            Key::F11,
            Key::F12,
        ];
        for (offset, key) in expected.into_iter().enumerate() {
            let code = ffi::KEY_F1 + offset as i32;
            let ev = key_event(key_data(ffi::ACTION_PRESS, 0, code, 0)).unwrap();
            assert_eq!(ev.key, key);
        }
    }

    #[test]
    fn test_unknown_semantic_code_is_dropped() {
        assert_eq!(key_event(key_data(ffi::ACTION_PRESS, 0, 9999, 0)), None);
    }

    #[test]
    fn test_invalid_codepoint_falls_back_to_semantic_table() {
        // 0xD800 is a surrogate, not a scalar value.
        let ev = key_event(key_data(ffi::ACTION_PRESS, 0, ffi::KEY_UP, 0xD800)).unwrap();
        assert_eq!(ev.key, Key::Up);
        assert_eq!(ev.ch, None);
    }

    #[test]
    fn test_mouse_move() {
        let ev = mouse_event(
            ffi::EVENT_MOUSE_MOVE,
            GhosttyMouseData {
                x: 10,
                y: 4,
                ..GhosttyMouseData::default()
            },
        )
        .unwrap();
        assert_eq!((ev.x, ev.y), (10, 4));
        assert_eq!(ev.button, MouseButton::None);
        assert_eq!(ev.action, MouseAction::Move);
    }

    #[test]
    fn test_mouse_button_press_and_release() {
        let press = mouse_event(
            ffi::EVENT_MOUSE_BUTTON,
            GhosttyMouseData {
                button: ffi::MOUSE_BUTTON_LEFT,
                state: ffi::MOUSE_STATE_PRESS,
                ..GhosttyMouseData::default()
            },
        )
        .unwrap();
        assert_eq!(press.button, MouseButton::Left);
        assert_eq!(press.action, MouseAction::Press);

        let release = mouse_event(
            ffi::EVENT_MOUSE_BUTTON,
            GhosttyMouseData {
                button: ffi::MOUSE_BUTTON_RIGHT,
                state: ffi::MOUSE_STATE_RELEASE,
                ..GhosttyMouseData::default()
            },
        )
        .unwrap();
        assert_eq!(release.button, MouseButton::Right);
        assert_eq!(release.action, MouseAction::Release);
    }

    #[test]
    fn test_buttonless_event_passes_unrecognized_fails() {
        let none = mouse_event(
            ffi::EVENT_MOUSE_BUTTON,
            GhosttyMouseData {
                button: ffi::MOUSE_BUTTON_NONE,
                state: ffi::MOUSE_STATE_PRESS,
                ..GhosttyMouseData::default()
            },
        )
        .unwrap();
        assert_eq!(none.button, MouseButton::None);

        let unknown = mouse_event(
            ffi::EVENT_MOUSE_BUTTON,
            GhosttyMouseData {
                button: 7,
                ..GhosttyMouseData::default()
            },
        );
        assert_eq!(unknown, None);
    }

    #[test]
    fn test_scroll_direction_maps_to_wheel_buttons() {
        let up = mouse_event(
            ffi::EVENT_MOUSE_SCROLL,
            GhosttyMouseData {
                scroll_y: 3.0,
                ..GhosttyMouseData::default()
            },
        )
        .unwrap();
        assert_eq!(up.button, MouseButton::WheelUp);
        assert_eq!(up.action, MouseAction::Press);

        let down = mouse_event(
            ffi::EVENT_MOUSE_SCROLL,
            GhosttyMouseData {
                scroll_y: -1.0,
                ..GhosttyMouseData::default()
            },
        )
        .unwrap();
        assert_eq!(down.button, MouseButton::WheelDown);
    }

    #[test]
    fn test_zero_scroll_is_dropped() {
        let ev = mouse_event(ffi::EVENT_MOUSE_SCROLL, GhosttyMouseData::default());
        assert_eq!(ev, None);
    }

    #[test]
    fn test_negative_coordinates_clamp_to_origin() {
        let ev = mouse_event(
            ffi::EVENT_MOUSE_MOVE,
            GhosttyMouseData {
                x: -3,
                y: -1,
                ..GhosttyMouseData::default()
            },
        )
        .unwrap();
        assert_eq!((ev.x, ev.y), (0, 0));
    }

    #[test]
    fn test_clamp_cell_coord_bounds() {
        assert_eq!(clamp_cell_coord(-1), 0);
        assert_eq!(clamp_cell_coord(0), 0);
        assert_eq!(clamp_cell_coord(80), 80);
        assert_eq!(clamp_cell_coord(70_000), u16::MAX);
    }

    #[test]
    fn test_wheel_buttons_have_no_native_code() {
        assert_eq!(native_button(MouseButton::WheelUp), None);
        assert_eq!(native_button(MouseButton::WheelDown), None);
        assert_eq!(native_button(MouseButton::None), None);
        assert_eq!(native_button(MouseButton::Left), Some(ffi::MOUSE_BUTTON_LEFT));
    }

    proptest! {
        #[test]
        fn prop_modifier_bits_round_trip(bits in 0u8..16) {
            let mods = Modifiers::from_bits(bits);
            prop_assert_eq!(mods_from_native(mods_to_native(mods)), mods);
        }

        #[test]
        fn prop_native_mods_survive_key_translation(mods in 0i32..16) {
            let ev = key_event(key_data(ffi::ACTION_PRESS, mods, 0, u32::from('k')));
            prop_assert!(ev.is_some());
            let translated = ev.unwrap();
            prop_assert_eq!(mods_to_native(translated.mods), mods);
        }

        #[test]
        fn prop_mouse_coordinates_clamp_into_cell_range(x in any::<i32>(), y in any::<i32>()) {
            let ev = mouse_event(
                ffi::EVENT_MOUSE_MOVE,
                GhosttyMouseData {
                    x,
                    y,
                    ..GhosttyMouseData::default()
                },
            )
            .unwrap();
            prop_assert_eq!(i32::from(ev.x), x.clamp(0, i32::from(u16::MAX)));
            prop_assert_eq!(i32::from(ev.y), y.clamp(0, i32::from(u16::MAX)));
        }
    }
}
