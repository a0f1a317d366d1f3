//! Synthetic input injection into the native surface.
//!
//! Injection drives the real native input path so automation exercises
//! the same key encoding and pointer bookkeeping as a user would. When
//! the surface or a needed entry point is missing, the event is
//! requeued onto the abstract event stream instead and the injection
//! reports unhandled.

use std::ffi::CString;
use std::ptr;
use std::ptr::NonNull;

use lienzo_core::{
    Backend, Event, InputInjector, KeyEvent, MouseAction, MouseButton, MouseEvent,
};
use tracing::debug;

use crate::backend::{GhosttyBackend, PointerState, State};
use crate::ffi::{self, GhosttyInputKey, GhosttyLib, GhosttySurface};
use crate::keycodes;
use crate::translate;

impl InputInjector for GhosttyBackend {
    fn inject_key(&self, event: KeyEvent) -> bool {
        let (native, text) = native_key(event);
        if native.keycode == 0 && text.is_none() {
            return false;
        }
        let state = self.shared.state.lock();
        let (Some(surface), Some(surface_key)) = (state.surface, self.shared.lib.surface_key)
        else {
            drop(state);
            return self.requeue(Event::Key(event));
        };
        // `text` owns the buffer `native.text` points at and must stay
        // alive across this call.
        let handled = unsafe { surface_key(surface.as_ptr(), native) };
        drop(state);
        drop(text);
        handled
    }

    fn inject_mouse(&self, event: MouseEvent) -> bool {
        let lib = &*self.shared.lib;
        let wheel = matches!(
            event.button,
            MouseButton::WheelUp | MouseButton::WheelDown
        );
        let needs_button = !wheel && event.action != MouseAction::Move;

        let mut state = self.shared.state.lock();
        let (Some(surface), Some(mouse_pos)) = (state.surface, lib.surface_mouse_pos) else {
            drop(state);
            return self.requeue(Event::Mouse(event));
        };
        if (wheel && lib.surface_mouse_scroll.is_none())
            || (needs_button && lib.surface_mouse_button.is_none())
        {
            drop(state);
            return self.requeue(Event::Mouse(event));
        }

        let mods = translate::mods_to_native(event.mods);
        ensure_pointer(&mut state, lib, surface, mouse_pos, event.x, event.y, mods);

        match event.action {
            MouseAction::Move => true,
            MouseAction::Press | MouseAction::Release => {
                if wheel {
                    let delta = if event.button == MouseButton::WheelDown {
                        -1.0
                    } else {
                        1.0
                    };
                    if let Some(scroll) = lib.surface_mouse_scroll {
                        unsafe { scroll(surface.as_ptr(), 0.0, delta, 0) };
                    }
                    return true;
                }
                let Some(button) = translate::native_button(event.button) else {
                    return false;
                };
                let Some(mouse_button) = lib.surface_mouse_button else {
                    return false;
                };
                let action = if event.action == MouseAction::Release {
                    ffi::MOUSE_STATE_RELEASE
                } else {
                    ffi::MOUSE_STATE_PRESS
                };
                unsafe { mouse_button(surface.as_ptr(), action, button, mods) }
            }
        }
    }
}

impl GhosttyBackend {
    /// Hands an uninjectable event to the abstract stream. Always
    /// reports unhandled; queue overflow is dropped on the floor.
    fn requeue(&self, event: Event) -> bool {
        debug!(?event, "injection fell back to the event stream");
        let _ = self.post_event(event);
        false
    }
}

/// Builds the native key description. The returned [`CString`] owns
/// the text buffer the struct points at.
fn native_key(event: KeyEvent) -> (GhosttyInputKey, Option<CString>) {
    let ch = event.ch.filter(|&ch| ch != '\0');
    let mut keycode = keycodes::keycode_for_key(event.key).unwrap_or(0);
    if keycode == 0 {
        if let Some(ch) = ch {
            keycode = keycodes::keycode_for_rune(ch).unwrap_or(0);
        }
    }
    let text = ch.and_then(|ch| CString::new(ch.to_string()).ok());
    let native = GhosttyInputKey {
        action: ffi::ACTION_PRESS,
        mods: translate::mods_to_native(event.mods),
        consumed_mods: 0,
        keycode,
        text: text.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
        unshifted_codepoint: ch.map_or(0, u32::from),
        composing: false,
    };
    (native, text)
}

/// Repositions the native pointer unless it already sits in the target
/// cell. Pixel coordinates come from the native cell metrics when
/// available, falling back to a 1:1 mapping.
fn ensure_pointer(
    state: &mut State,
    lib: &GhosttyLib,
    surface: NonNull<GhosttySurface>,
    mouse_pos: unsafe extern "C" fn(*mut GhosttySurface, f64, f64, i32),
    x: u16,
    y: u16,
    mods: i32,
) {
    if state.pointer.valid && state.pointer.x == x && state.pointer.y == y {
        return;
    }
    let (px, py) = cell_to_pixel(lib, surface, x, y);
    unsafe { mouse_pos(surface.as_ptr(), px, py, mods) };
    state.pointer = PointerState { x, y, valid: true };
}

fn cell_to_pixel(lib: &GhosttyLib, surface: NonNull<GhosttySurface>, x: u16, y: u16) -> (f64, f64) {
    if let Some(surface_size) = lib.surface_size {
        let size = unsafe { surface_size(surface.as_ptr()) };
        if size.cell_width_px > 0 && size.cell_height_px > 0 {
            return (
                f64::from(x) * f64::from(size.cell_width_px),
                f64::from(y) * f64::from(size.cell_height_px),
            );
        }
    }
    (f64::from(x), f64::from(y))
}
