//! C ABI surface of libghostty's headless embedding interface.
//!
//! The native event struct is flat rather than a tagged union: every
//! payload rides along and `tag` selects which one is meaningful. That
//! lets `ghostty_surface_poll` fill a caller-owned struct without any
//! allocation or pointer chasing across the boundary.

use std::ffi::c_char;

use libloading::Library;

// Event tags reported by `ghostty_surface_poll`.
pub(crate) const EVENT_RENDER: u32 = 0;
pub(crate) const EVENT_RESIZE: u32 = 1;
pub(crate) const EVENT_KEY: u32 = 2;
pub(crate) const EVENT_MOUSE_BUTTON: u32 = 3;
pub(crate) const EVENT_MOUSE_MOVE: u32 = 4;
pub(crate) const EVENT_MOUSE_SCROLL: u32 = 5;

// Key and mouse action codes shared by polled events and injected
// input. These and the groups below are plain `pub` so the sim module
// can re-export them for session scripting.
pub const ACTION_RELEASE: i32 = 0;
pub const ACTION_PRESS: i32 = 1;
pub const ACTION_REPEAT: i32 = 2;

// Modifier bitmask used on both sides of the boundary.
pub const MOD_SHIFT: i32 = 1 << 0;
pub const MOD_CTRL: i32 = 1 << 1;
pub const MOD_ALT: i32 = 1 << 2;
pub const MOD_SUPER: i32 = 1 << 3;

// Mouse buttons and button states.
pub const MOUSE_BUTTON_NONE: i32 = 0;
pub const MOUSE_BUTTON_LEFT: i32 = 1;
pub const MOUSE_BUTTON_RIGHT: i32 = 2;
pub const MOUSE_BUTTON_MIDDLE: i32 = 3;
pub const MOUSE_STATE_RELEASE: i32 = 0;
pub const MOUSE_STATE_PRESS: i32 = 1;

// Semantic key codes carried in the `key` field of polled key events.
// Letter codes appear only when the runtime pre-binds a control chord.
pub const KEY_B: i32 = 21;
pub const KEY_C: i32 = 22;
pub const KEY_D: i32 = 23;
pub const KEY_F: i32 = 25;
pub const KEY_P: i32 = 35;
pub const KEY_V: i32 = 41;
pub const KEY_X: i32 = 43;
pub const KEY_Z: i32 = 45;
pub const KEY_BACKSPACE: i32 = 53;
pub const KEY_ENTER: i32 = 58;
pub const KEY_TAB: i32 = 64;
pub const KEY_DELETE: i32 = 68;
pub const KEY_END: i32 = 69;
pub const KEY_HOME: i32 = 71;
pub const KEY_INSERT: i32 = 72;
pub const KEY_PAGE_DOWN: i32 = 73;
pub const KEY_PAGE_UP: i32 = 74;
pub const KEY_DOWN: i32 = 75;
pub const KEY_LEFT: i32 = 76;
pub const KEY_RIGHT: i32 = 77;
pub const KEY_UP: i32 = 78;
pub const KEY_NUMPAD_BACKSPACE: i32 = 91;
pub const KEY_NUMPAD_ENTER: i32 = 97;
pub const KEY_NUMPAD_UP: i32 = 109;
pub const KEY_NUMPAD_DOWN: i32 = 110;
pub const KEY_NUMPAD_RIGHT: i32 = 111;
pub const KEY_NUMPAD_LEFT: i32 = 112;
pub const KEY_NUMPAD_HOME: i32 = 114;
pub const KEY_NUMPAD_END: i32 = 115;
pub const KEY_NUMPAD_INSERT: i32 = 116;
pub const KEY_NUMPAD_DELETE: i32 = 117;
pub const KEY_NUMPAD_PAGE_UP: i32 = 118;
pub const KEY_NUMPAD_PAGE_DOWN: i32 = 119;
pub const KEY_ESCAPE: i32 = 120;
pub const KEY_F1: i32 = 121;
pub const KEY_F12: i32 = 132;

/// Opaque native configuration handle.
#[repr(C)]
pub(crate) struct GhosttyConfig {
    _opaque: [u8; 0],
}

/// Opaque native application handle.
#[repr(C)]
pub(crate) struct GhosttyApp {
    _opaque: [u8; 0],
}

/// Opaque native surface handle.
#[repr(C)]
pub(crate) struct GhosttySurface {
    _opaque: [u8; 0],
}

/// One polled native event with every payload inline.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GhosttyEvent {
    pub(crate) tag: u32,
    pub(crate) resize: GhosttyResizeData,
    pub(crate) key: GhosttyKeyData,
    pub(crate) mouse: GhosttyMouseData,
}

/// Resize payload of a polled event.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GhosttyResizeData {
    pub(crate) columns: i32,
    pub(crate) rows: i32,
}

/// Key payload of a polled event.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GhosttyKeyData {
    pub(crate) action: i32,
    pub(crate) mods: i32,
    pub(crate) key: i32,
    pub(crate) codepoint: u32,
}

/// Mouse payload of a polled event, shared by button, motion, and
/// scroll tags.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GhosttyMouseData {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) button: i32,
    pub(crate) state: i32,
    pub(crate) scroll_x: f64,
    pub(crate) scroll_y: f64,
    pub(crate) mods: i32,
}

/// Key description passed by value to `ghostty_surface_key`.
///
/// `text` may be null; when set it must outlive the call it is passed
/// to, and no longer.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub(crate) struct GhosttyInputKey {
    pub(crate) action: i32,
    pub(crate) mods: i32,
    pub(crate) consumed_mods: i32,
    pub(crate) keycode: u32,
    pub(crate) text: *const c_char,
    pub(crate) unshifted_codepoint: u32,
    pub(crate) composing: bool,
}

/// Surface geometry returned by value from `ghostty_surface_size`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GhosttySurfaceSize {
    pub(crate) columns: u16,
    pub(crate) rows: u16,
    pub(crate) width_px: u32,
    pub(crate) height_px: u32,
    pub(crate) cell_width_px: u32,
    pub(crate) cell_height_px: u32,
}

/// Resolved capability table over one loaded copy of libghostty.
///
/// Required entry points are bare function pointers; everything the
/// backend can degrade without is an `Option` probed at call sites.
/// The table keeps the [`Library`] handle alive for as long as any
/// pointer taken from it can be called.
pub(crate) struct GhosttyLib {
    /// Keeps the dynamic library mapped. `None` for in-process tables.
    pub(crate) _lib: Option<Library>,

    // Required entry points.
    pub(crate) init: unsafe extern "C" fn(usize, *mut *mut c_char) -> i32,
    pub(crate) config_new: unsafe extern "C" fn() -> *mut GhosttyConfig,
    pub(crate) config_free: unsafe extern "C" fn(*mut GhosttyConfig),
    pub(crate) config_set:
        unsafe extern "C" fn(*mut GhosttyConfig, *const c_char, *const c_char),
    pub(crate) app_new_headless: unsafe extern "C" fn(*mut GhosttyConfig) -> *mut GhosttyApp,
    pub(crate) app_free: unsafe extern "C" fn(*mut GhosttyApp),
    /// Load-validated but never called: the poll loop would only need
    /// it without `surface_poll`, and resolution requires both.
    #[allow(dead_code)]
    pub(crate) app_tick: unsafe extern "C" fn(*mut GhosttyApp),
    pub(crate) surface_new_headless:
        unsafe extern "C" fn(*mut GhosttyApp) -> *mut GhosttySurface,
    pub(crate) surface_free: unsafe extern "C" fn(*mut GhosttySurface),
    pub(crate) surface_get_size: unsafe extern "C" fn(*mut GhosttySurface, *mut i32, *mut i32),
    pub(crate) surface_set_cell:
        unsafe extern "C" fn(*mut GhosttySurface, u32, u32, u32, u32, u32, u8),
    pub(crate) surface_clear: unsafe extern "C" fn(*mut GhosttySurface),
    pub(crate) surface_show: unsafe extern "C" fn(*mut GhosttySurface),
    pub(crate) surface_poll:
        unsafe extern "C" fn(*mut GhosttySurface, *mut GhosttyEvent, i32) -> i32,

    // Optional entry points.
    pub(crate) config_finalize: Option<unsafe extern "C" fn(*mut GhosttyConfig)>,
    pub(crate) surface_size:
        Option<unsafe extern "C" fn(*mut GhosttySurface) -> GhosttySurfaceSize>,
    pub(crate) surface_set_cursor_pos: Option<unsafe extern "C" fn(*mut GhosttySurface, i32, i32)>,
    pub(crate) surface_show_cursor: Option<unsafe extern "C" fn(*mut GhosttySurface)>,
    pub(crate) surface_hide_cursor: Option<unsafe extern "C" fn(*mut GhosttySurface)>,
    pub(crate) surface_key_translation_mods:
        Option<unsafe extern "C" fn(*mut GhosttySurface, i32) -> i32>,
    pub(crate) surface_key: Option<unsafe extern "C" fn(*mut GhosttySurface, GhosttyInputKey) -> bool>,
    pub(crate) surface_key_is_binding:
        Option<unsafe extern "C" fn(*mut GhosttySurface, GhosttyInputKey, *mut i32) -> bool>,
    pub(crate) surface_text: Option<unsafe extern "C" fn(*mut GhosttySurface, *mut c_char, usize)>,
    pub(crate) surface_preedit:
        Option<unsafe extern "C" fn(*mut GhosttySurface, *mut c_char, usize)>,
    pub(crate) surface_mouse_captured: Option<unsafe extern "C" fn(*mut GhosttySurface) -> bool>,
    pub(crate) surface_mouse_button:
        Option<unsafe extern "C" fn(*mut GhosttySurface, i32, i32, i32) -> bool>,
    pub(crate) surface_mouse_pos: Option<unsafe extern "C" fn(*mut GhosttySurface, f64, f64, i32)>,
    pub(crate) surface_mouse_scroll:
        Option<unsafe extern "C" fn(*mut GhosttySurface, f64, f64, i32)>,
}

impl GhosttyLib {
    /// Names of the optional entry points present in this table, for
    /// load-time diagnostics.
    pub(crate) fn optional_symbols(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        macro_rules! probe {
            ($field:ident, $name:literal) => {
                if self.$field.is_some() {
                    present.push($name);
                }
            };
        }
        probe!(config_finalize, "ghostty_config_finalize");
        probe!(surface_size, "ghostty_surface_size");
        probe!(surface_set_cursor_pos, "ghostty_surface_set_cursor_pos");
        probe!(surface_show_cursor, "ghostty_surface_show_cursor");
        probe!(surface_hide_cursor, "ghostty_surface_hide_cursor");
        probe!(
            surface_key_translation_mods,
            "ghostty_surface_key_translation_mods"
        );
        probe!(surface_key, "ghostty_surface_key");
        probe!(surface_key_is_binding, "ghostty_surface_key_is_binding");
        probe!(surface_text, "ghostty_surface_text");
        probe!(surface_preedit, "ghostty_surface_preedit");
        probe!(surface_mouse_captured, "ghostty_surface_mouse_captured");
        probe!(surface_mouse_button, "ghostty_surface_mouse_button");
        probe!(surface_mouse_pos, "ghostty_surface_mouse_pos");
        probe!(surface_mouse_scroll, "ghostty_surface_mouse_scroll");
        present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_struct_is_flat_and_copyable() {
        let ev = GhosttyEvent {
            tag: EVENT_RESIZE,
            resize: GhosttyResizeData {
                columns: 120,
                rows: 40,
            },
            ..GhosttyEvent::default()
        };
        let copy = ev;
        assert_eq!(copy.tag, EVENT_RESIZE);
        assert_eq!(copy.resize.columns, 120);
        assert_eq!(copy.resize.rows, 40);
    }

    #[test]
    fn test_default_event_is_render_tagged() {
        // Tag zero doubles as the render request, so a zeroed struct is
        // a valid event.
        assert_eq!(GhosttyEvent::default().tag, EVENT_RENDER);
    }

    #[test]
    fn test_function_key_codes_are_contiguous() {
        assert_eq!(KEY_F12 - KEY_F1, 11);
    }
}
