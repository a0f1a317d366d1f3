//! Native input events through the poll loop: key and mouse translation
//! end to end, drop rules, and the injection fallback path.

use lienzo_core::{
    Backend, Event, InputInjector, Key, KeyAction, KeyEvent, Modifiers, MouseAction, MouseButton,
    MouseEvent,
};
use lienzo_ghostty::sim::{abi, SimCaps, SimSession};
use lienzo_ghostty::GhosttyBackend;

fn ready_backend(session: &SimSession) -> GhosttyBackend {
    let backend = session.backend();
    backend.init().unwrap();
    backend
}

fn poll_key(backend: &GhosttyBackend) -> KeyEvent {
    match backend.poll_event() {
        Some(Event::Key(key)) => key,
        other => panic!("expected a key event, got {other:?}"),
    }
}

fn poll_mouse(backend: &GhosttyBackend) -> MouseEvent {
    match backend.poll_event() {
        Some(Event::Mouse(mouse)) => mouse,
        other => panic!("expected a mouse event, got {other:?}"),
    }
}

/// Queue a recognizable key and assert it is the next polled event,
/// proving everything queued before it was swallowed.
fn assert_next_is_marker(session: &SimSession, backend: &GhosttyBackend) {
    session.push_key(abi::ACTION_PRESS, 0, abi::KEY_ENTER, 0);
    let key = poll_key(backend);
    assert_eq!(key.key, Key::Enter);
}

#[test]
fn ctrl_chords_surface_as_shortcuts() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_key(abi::ACTION_PRESS, abi::MOD_CTRL, abi::KEY_C, 0);

    let key = poll_key(&backend);
    assert_eq!(key.key, Key::CtrlC);
    assert_eq!(key.ch, None);
    assert!(key.mods.contains(Modifiers::CTRL));
    assert_eq!(key.action, KeyAction::Press);
    backend.close();
}

#[test]
fn printable_runes_carry_the_character() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_key(abi::ACTION_PRESS, abi::MOD_SHIFT, 0, u32::from('G'));

    let key = poll_key(&backend);
    assert_eq!(key.key, Key::Rune);
    assert_eq!(key.ch, Some('G'));
    assert_eq!(key.mods, Modifiers::SHIFT);
    backend.close();
}

#[test]
fn ctrl_runes_fold_to_shortcuts() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_key(abi::ACTION_PRESS, abi::MOD_CTRL, 0, u32::from('X'));

    assert_eq!(poll_key(&backend).key, Key::CtrlX);
    backend.close();
}

#[test]
fn key_releases_are_swallowed() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_key(abi::ACTION_RELEASE, 0, abi::KEY_C, u32::from('c'));
    assert_next_is_marker(&session, &backend);
    backend.close();
}

#[test]
fn repeats_keep_their_action() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_key(abi::ACTION_REPEAT, 0, abi::KEY_DOWN, 0);

    let key = poll_key(&backend);
    assert_eq!(key.key, Key::Down);
    assert_eq!(key.action, KeyAction::Repeat);
    backend.close();
}

#[test]
fn semantic_and_numpad_keys_translate() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_key(abi::ACTION_PRESS, 0, abi::KEY_PAGE_UP, 0);
    session.push_key(abi::ACTION_PRESS, 0, abi::KEY_NUMPAD_ENTER, 0);
    session.push_key(abi::ACTION_PRESS, 0, abi::KEY_F1, 0);
    session.push_key(abi::ACTION_PRESS, 0, abi::KEY_F12, 0);

    assert_eq!(poll_key(&backend).key, Key::PageUp);
    assert_eq!(poll_key(&backend).key, Key::Enter);
    assert_eq!(poll_key(&backend).key, Key::F1);
    assert_eq!(poll_key(&backend).key, Key::F12);
    backend.close();
}

#[test]
fn unmapped_keys_without_a_codepoint_are_swallowed() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_key(abi::ACTION_PRESS, 0, 999, 0);
    assert_next_is_marker(&session, &backend);
    backend.close();
}

#[test]
fn button_presses_and_releases_translate() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_mouse_button(5, 3, abi::MOUSE_BUTTON_LEFT, abi::MOUSE_STATE_PRESS, 0);
    session.push_mouse_button(5, 3, abi::MOUSE_BUTTON_LEFT, abi::MOUSE_STATE_RELEASE, 0);

    assert_eq!(
        poll_mouse(&backend),
        MouseEvent {
            x: 5,
            y: 3,
            button: MouseButton::Left,
            action: MouseAction::Press,
            mods: Modifiers::NONE,
        }
    );
    assert_eq!(poll_mouse(&backend).action, MouseAction::Release);
    backend.close();
}

#[test]
fn pointer_motion_has_no_button() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_mouse_move(7, 9, abi::MOD_ALT);

    let mouse = poll_mouse(&backend);
    assert_eq!(mouse.button, MouseButton::None);
    assert_eq!(mouse.action, MouseAction::Move);
    assert_eq!((mouse.x, mouse.y), (7, 9));
    assert_eq!(mouse.mods, Modifiers::ALT);
    backend.close();
}

#[test]
fn wheel_steps_map_to_direction_buttons() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_mouse_scroll(1, 2, 3.0, 0);
    session.push_mouse_scroll(1, 2, -1.0, 0);

    let up = poll_mouse(&backend);
    assert_eq!(up.button, MouseButton::WheelUp);
    assert_eq!(up.action, MouseAction::Press);
    assert_eq!(poll_mouse(&backend).button, MouseButton::WheelDown);
    backend.close();
}

#[test]
fn horizontal_only_scrolls_are_swallowed() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_mouse_scroll(1, 2, 0.0, 0);
    assert_next_is_marker(&session, &backend);
    backend.close();
}

#[test]
fn negative_pointer_coordinates_clamp_to_the_origin() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_mouse_button(-5, -2, abi::MOUSE_BUTTON_LEFT, abi::MOUSE_STATE_PRESS, 0);

    let mouse = poll_mouse(&backend);
    assert_eq!((mouse.x, mouse.y), (0, 0));
    backend.close();
}

#[test]
fn unknown_buttons_are_swallowed() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_mouse_button(1, 1, 99, abi::MOUSE_STATE_PRESS, 0);
    assert_next_is_marker(&session, &backend);
    backend.close();
}

#[test]
fn modifier_combinations_carry_through_mouse_events() {
    let session = SimSession::begin();
    let backend = ready_backend(&session);

    session.push_mouse_move(0, 0, abi::MOD_CTRL | abi::MOD_SHIFT);

    let mouse = poll_mouse(&backend);
    assert!(mouse.mods.contains(Modifiers::CTRL));
    assert!(mouse.mods.contains(Modifiers::SHIFT));
    assert!(!mouse.mods.contains(Modifiers::ALT));
    backend.close();
}

#[test]
fn injection_falls_back_to_the_event_stream() {
    let session = SimSession::begin();
    let backend = session.backend_with(SimCaps {
        omit_key: true,
        ..SimCaps::default()
    });
    backend.init().unwrap();

    let event = KeyEvent::rune('a', Modifiers::NONE);
    assert!(!backend.inject_key(event));
    assert_eq!(backend.poll_event(), Some(Event::Key(event)));
    backend.close();
}
