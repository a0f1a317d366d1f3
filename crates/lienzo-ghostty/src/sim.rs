//! In-process simulation of libghostty for tests and benches.
//!
//! The simulated library records every semantic native call in a
//! session log and serves scripted poll events, so backend behavior can
//! be asserted without a real libghostty install. Sessions are
//! process-exclusive: the C ABI gives the stub functions no way to
//! carry a session handle, so all of them share one global state and
//! [`SimSession::begin`] blocks until the previous session ends.
//!
//! Poll and tick calls are counted rather than logged; the poller
//! polls continuously and the noise would drown out the calls tests
//! care about. The tick counter stays so tests can assert it is never
//! touched.

use std::collections::VecDeque;
use std::ffi::{c_char, CStr};
use std::ptr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, MutexGuard};

use crate::backend::GhosttyBackend;
use crate::ffi::{
    self, GhosttyApp, GhosttyConfig, GhosttyEvent, GhosttyInputKey, GhosttyKeyData, GhosttyLib,
    GhosttyMouseData, GhosttyResizeData, GhosttySurface, GhosttySurfaceSize,
};

/// Native constants mirrored for scripting sessions.
pub mod abi {
    pub use crate::ffi::*;
}

static SESSION: Mutex<()> = Mutex::new(());
static STATE: Mutex<SimState> = Mutex::new(SimState::new());

/// One recorded native call.
#[derive(Debug, Clone, PartialEq)]
pub enum SimCall {
    ConfigNew,
    ConfigSet { key: String, value: String },
    ConfigFinalize,
    ConfigFree,
    AppNew,
    AppFree,
    SurfaceNew,
    SurfaceFree,
    GetSize,
    SetCell {
        x: u32,
        y: u32,
        codepoint: u32,
        fg: u32,
        bg: u32,
        attrs: u8,
    },
    Clear,
    Show,
    SetCursorPos { x: i32, y: i32 },
    ShowCursor,
    HideCursor,
    Key {
        keycode: u32,
        mods: i32,
        text: Option<String>,
    },
    MousePos { x: f64, y: f64, mods: i32 },
    MouseButton { action: i32, button: i32, mods: i32 },
    MouseScroll { dx: f64, dy: f64, mods: i32 },
}

/// Which optional entry points to omit from a simulated table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimCaps {
    pub omit_config_finalize: bool,
    pub omit_surface_size: bool,
    pub omit_cursor: bool,
    pub omit_key: bool,
    pub omit_mouse_pos: bool,
    pub omit_mouse_button: bool,
    pub omit_mouse_scroll: bool,
}

struct SimState {
    calls: Vec<SimCall>,
    recording: bool,
    poll_queue: VecDeque<GhosttyEvent>,
    columns: i32,
    rows: i32,
    metrics: GhosttySurfaceSize,
    fail_config: bool,
    fail_app: bool,
    fail_surface: bool,
    key_handled: bool,
    button_handled: bool,
    poll_count: u64,
    tick_count: u64,
}

impl SimState {
    const fn new() -> Self {
        Self {
            calls: Vec::new(),
            recording: true,
            poll_queue: VecDeque::new(),
            columns: 80,
            rows: 24,
            metrics: GhosttySurfaceSize {
                columns: 80,
                rows: 24,
                width_px: 640,
                height_px: 384,
                cell_width_px: 8,
                cell_height_px: 16,
            },
            fail_config: false,
            fail_app: false,
            fail_surface: false,
            key_handled: true,
            button_handled: true,
            poll_count: 0,
            tick_count: 0,
        }
    }
}

/// An exclusive scripting session over the simulated library.
///
/// Defaults: an 80x24 grid, 8x16 pixel cells, every entry point
/// present, and key and button injection reported as handled. Close
/// (or drop) every backend created from a session before the session
/// itself ends, otherwise its poller keeps writing into the next
/// session's state.
pub struct SimSession {
    _exclusive: MutexGuard<'static, ()>,
}

impl SimSession {
    pub fn begin() -> Self {
        let guard = SESSION.lock();
        *STATE.lock() = SimState::new();
        Self { _exclusive: guard }
    }

    /// A backend bound to the simulated library.
    #[must_use]
    pub fn backend(&self) -> GhosttyBackend {
        self.backend_with(SimCaps::default())
    }

    /// A backend whose capability table omits the listed entry points.
    #[must_use]
    pub fn backend_with(&self, caps: SimCaps) -> GhosttyBackend {
        GhosttyBackend::with_lib(Arc::new(sim_lib(caps)), Vec::new())
    }

    /// A backend that applies the given configuration pairs on init.
    #[must_use]
    pub fn backend_with_config(&self, options: Vec<(String, String)>) -> GhosttyBackend {
        GhosttyBackend::with_lib(Arc::new(sim_lib(SimCaps::default())), options)
    }

    /// Grid dimensions reported by `ghostty_surface_get_size`.
    pub fn set_grid(&self, columns: i32, rows: i32) {
        let mut st = STATE.lock();
        st.columns = columns;
        st.rows = rows;
    }

    /// Cell metrics reported by `ghostty_surface_size`.
    pub fn set_cell_metrics(&self, cell_width_px: u32, cell_height_px: u32) {
        let mut st = STATE.lock();
        st.metrics.cell_width_px = cell_width_px;
        st.metrics.cell_height_px = cell_height_px;
    }

    /// Makes the next `ghostty_config_new` return null.
    pub fn fail_next_config(&self) {
        STATE.lock().fail_config = true;
    }

    /// Makes the next `ghostty_app_new_headless` return null.
    pub fn fail_next_app(&self) {
        STATE.lock().fail_app = true;
    }

    /// Makes the next `ghostty_surface_new_headless` return null.
    pub fn fail_next_surface(&self) {
        STATE.lock().fail_surface = true;
    }

    /// Return value of `ghostty_surface_key`.
    pub fn set_key_handled(&self, handled: bool) {
        STATE.lock().key_handled = handled;
    }

    /// Return value of `ghostty_surface_mouse_button`.
    pub fn set_button_handled(&self, handled: bool) {
        STATE.lock().button_handled = handled;
    }

    pub fn push_render(&self) {
        push_event(GhosttyEvent {
            tag: ffi::EVENT_RENDER,
            ..GhosttyEvent::default()
        });
    }

    pub fn push_resize(&self, columns: i32, rows: i32) {
        push_event(GhosttyEvent {
            tag: ffi::EVENT_RESIZE,
            resize: GhosttyResizeData { columns, rows },
            ..GhosttyEvent::default()
        });
    }

    pub fn push_key(&self, action: i32, mods: i32, key: i32, codepoint: u32) {
        push_event(GhosttyEvent {
            tag: ffi::EVENT_KEY,
            key: GhosttyKeyData {
                action,
                mods,
                key,
                codepoint,
            },
            ..GhosttyEvent::default()
        });
    }

    pub fn push_mouse_move(&self, x: i32, y: i32, mods: i32) {
        push_event(GhosttyEvent {
            tag: ffi::EVENT_MOUSE_MOVE,
            mouse: GhosttyMouseData {
                x,
                y,
                mods,
                ..GhosttyMouseData::default()
            },
            ..GhosttyEvent::default()
        });
    }

    pub fn push_mouse_button(&self, x: i32, y: i32, button: i32, state: i32, mods: i32) {
        push_event(GhosttyEvent {
            tag: ffi::EVENT_MOUSE_BUTTON,
            mouse: GhosttyMouseData {
                x,
                y,
                button,
                state,
                mods,
                ..GhosttyMouseData::default()
            },
            ..GhosttyEvent::default()
        });
    }

    pub fn push_mouse_scroll(&self, x: i32, y: i32, scroll_y: f64, mods: i32) {
        push_event(GhosttyEvent {
            tag: ffi::EVENT_MOUSE_SCROLL,
            mouse: GhosttyMouseData {
                x,
                y,
                scroll_y,
                mods,
                ..GhosttyMouseData::default()
            },
            ..GhosttyEvent::default()
        });
    }

    /// Snapshot of the calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<SimCall> {
        STATE.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        STATE.lock().calls.clear();
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        STATE.lock().tick_count
    }

    #[must_use]
    pub fn poll_count(&self) -> u64 {
        STATE.lock().poll_count
    }

    /// Stops logging calls. Benches use this to keep the log from
    /// growing without bound.
    pub fn pause_recording(&self) {
        STATE.lock().recording = false;
    }

    /// Blocks until the recorded calls satisfy `predicate`, or until a
    /// two second deadline passes. Returns whether it was satisfied.
    pub fn wait_for<F>(&self, predicate: F) -> bool
    where
        F: Fn(&[SimCall]) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if predicate(&STATE.lock().calls) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        false
    }
}

fn push_event(event: GhosttyEvent) {
    STATE.lock().poll_queue.push_back(event);
}

fn record(call: SimCall) {
    let mut st = STATE.lock();
    if st.recording {
        st.calls.push(call);
    }
}

fn sim_lib(caps: SimCaps) -> GhosttyLib {
    GhosttyLib {
        _lib: None,
        init: sim_init,
        config_new: sim_config_new,
        config_free: sim_config_free,
        config_set: sim_config_set,
        app_new_headless: sim_app_new_headless,
        app_free: sim_app_free,
        app_tick: sim_app_tick,
        surface_new_headless: sim_surface_new_headless,
        surface_free: sim_surface_free,
        surface_get_size: sim_surface_get_size,
        surface_set_cell: sim_surface_set_cell,
        surface_clear: sim_surface_clear,
        surface_show: sim_surface_show,
        surface_poll: sim_surface_poll,
        config_finalize: if caps.omit_config_finalize {
            None
        } else {
            Some(sim_config_finalize)
        },
        surface_size: if caps.omit_surface_size {
            None
        } else {
            Some(sim_surface_size)
        },
        surface_set_cursor_pos: if caps.omit_cursor {
            None
        } else {
            Some(sim_surface_set_cursor_pos)
        },
        surface_show_cursor: if caps.omit_cursor {
            None
        } else {
            Some(sim_surface_show_cursor)
        },
        surface_hide_cursor: if caps.omit_cursor {
            None
        } else {
            Some(sim_surface_hide_cursor)
        },
        surface_key_translation_mods: Some(sim_surface_key_translation_mods),
        surface_key: if caps.omit_key { None } else { Some(sim_surface_key) },
        surface_key_is_binding: Some(sim_surface_key_is_binding),
        surface_text: Some(sim_surface_text),
        surface_preedit: Some(sim_surface_preedit),
        surface_mouse_captured: Some(sim_surface_mouse_captured),
        surface_mouse_button: if caps.omit_mouse_button {
            None
        } else {
            Some(sim_surface_mouse_button)
        },
        surface_mouse_pos: if caps.omit_mouse_pos {
            None
        } else {
            Some(sim_surface_mouse_pos)
        },
        surface_mouse_scroll: if caps.omit_mouse_scroll {
            None
        } else {
            Some(sim_surface_mouse_scroll)
        },
    }
}

unsafe extern "C" fn sim_init(_argc: usize, _argv: *mut *mut c_char) -> i32 {
    0
}

unsafe extern "C" fn sim_config_new() -> *mut GhosttyConfig {
    let mut st = STATE.lock();
    if st.recording {
        st.calls.push(SimCall::ConfigNew);
    }
    if st.fail_config {
        st.fail_config = false;
        return ptr::null_mut();
    }
    drop(st);
    Box::into_raw(Box::new(0u8)).cast()
}

unsafe extern "C" fn sim_config_free(config: *mut GhosttyConfig) {
    record(SimCall::ConfigFree);
    if !config.is_null() {
        drop(unsafe { Box::from_raw(config.cast::<u8>()) });
    }
}

unsafe extern "C" fn sim_config_set(
    _config: *mut GhosttyConfig,
    key: *const c_char,
    value: *const c_char,
) {
    let key = unsafe { CStr::from_ptr(key) }.to_string_lossy().into_owned();
    let value = unsafe { CStr::from_ptr(value) }
        .to_string_lossy()
        .into_owned();
    record(SimCall::ConfigSet { key, value });
}

unsafe extern "C" fn sim_config_finalize(_config: *mut GhosttyConfig) {
    record(SimCall::ConfigFinalize);
}

unsafe extern "C" fn sim_app_new_headless(_config: *mut GhosttyConfig) -> *mut GhosttyApp {
    let mut st = STATE.lock();
    if st.recording {
        st.calls.push(SimCall::AppNew);
    }
    if st.fail_app {
        st.fail_app = false;
        return ptr::null_mut();
    }
    drop(st);
    Box::into_raw(Box::new(0u8)).cast()
}

unsafe extern "C" fn sim_app_free(app: *mut GhosttyApp) {
    record(SimCall::AppFree);
    if !app.is_null() {
        drop(unsafe { Box::from_raw(app.cast::<u8>()) });
    }
}

unsafe extern "C" fn sim_app_tick(_app: *mut GhosttyApp) {
    STATE.lock().tick_count += 1;
}

unsafe extern "C" fn sim_surface_new_headless(_app: *mut GhosttyApp) -> *mut GhosttySurface {
    let mut st = STATE.lock();
    if st.recording {
        st.calls.push(SimCall::SurfaceNew);
    }
    if st.fail_surface {
        st.fail_surface = false;
        return ptr::null_mut();
    }
    drop(st);
    Box::into_raw(Box::new(0u8)).cast()
}

unsafe extern "C" fn sim_surface_free(surface: *mut GhosttySurface) {
    record(SimCall::SurfaceFree);
    if !surface.is_null() {
        drop(unsafe { Box::from_raw(surface.cast::<u8>()) });
    }
}

unsafe extern "C" fn sim_surface_get_size(
    _surface: *mut GhosttySurface,
    columns: *mut i32,
    rows: *mut i32,
) {
    let mut st = STATE.lock();
    if st.recording {
        st.calls.push(SimCall::GetSize);
    }
    unsafe {
        *columns = st.columns;
        *rows = st.rows;
    }
}

unsafe extern "C" fn sim_surface_set_cell(
    _surface: *mut GhosttySurface,
    x: u32,
    y: u32,
    codepoint: u32,
    fg: u32,
    bg: u32,
    attrs: u8,
) {
    record(SimCall::SetCell {
        x,
        y,
        codepoint,
        fg,
        bg,
        attrs,
    });
}

unsafe extern "C" fn sim_surface_clear(_surface: *mut GhosttySurface) {
    record(SimCall::Clear);
}

unsafe extern "C" fn sim_surface_show(_surface: *mut GhosttySurface) {
    record(SimCall::Show);
}

unsafe extern "C" fn sim_surface_poll(
    _surface: *mut GhosttySurface,
    out: *mut GhosttyEvent,
    _timeout_ms: i32,
) -> i32 {
    let mut st = STATE.lock();
    st.poll_count += 1;
    match st.poll_queue.pop_front() {
        Some(event) => {
            unsafe { *out = event };
            1
        }
        None => 0,
    }
}

unsafe extern "C" fn sim_surface_size(_surface: *mut GhosttySurface) -> GhosttySurfaceSize {
    STATE.lock().metrics
}

unsafe extern "C" fn sim_surface_set_cursor_pos(_surface: *mut GhosttySurface, x: i32, y: i32) {
    record(SimCall::SetCursorPos { x, y });
}

unsafe extern "C" fn sim_surface_show_cursor(_surface: *mut GhosttySurface) {
    record(SimCall::ShowCursor);
}

unsafe extern "C" fn sim_surface_hide_cursor(_surface: *mut GhosttySurface) {
    record(SimCall::HideCursor);
}

unsafe extern "C" fn sim_surface_key_translation_mods(
    _surface: *mut GhosttySurface,
    mods: i32,
) -> i32 {
    mods
}

unsafe extern "C" fn sim_surface_key(_surface: *mut GhosttySurface, key: GhosttyInputKey) -> bool {
    let text = if key.text.is_null() {
        None
    } else {
        Some(
            unsafe { CStr::from_ptr(key.text) }
                .to_string_lossy()
                .into_owned(),
        )
    };
    let mut st = STATE.lock();
    if st.recording {
        st.calls.push(SimCall::Key {
            keycode: key.keycode,
            mods: key.mods,
            text,
        });
    }
    st.key_handled
}

unsafe extern "C" fn sim_surface_key_is_binding(
    _surface: *mut GhosttySurface,
    _key: GhosttyInputKey,
    _action: *mut i32,
) -> bool {
    false
}

unsafe extern "C" fn sim_surface_text(_surface: *mut GhosttySurface, buf: *mut c_char, len: usize) {
    if !buf.is_null() && len > 0 {
        unsafe { *buf = 0 };
    }
}

unsafe extern "C" fn sim_surface_preedit(
    _surface: *mut GhosttySurface,
    buf: *mut c_char,
    len: usize,
) {
    if !buf.is_null() && len > 0 {
        unsafe { *buf = 0 };
    }
}

unsafe extern "C" fn sim_surface_mouse_captured(_surface: *mut GhosttySurface) -> bool {
    false
}

unsafe extern "C" fn sim_surface_mouse_button(
    _surface: *mut GhosttySurface,
    action: i32,
    button: i32,
    mods: i32,
) -> bool {
    let mut st = STATE.lock();
    if st.recording {
        st.calls.push(SimCall::MouseButton {
            action,
            button,
            mods,
        });
    }
    st.button_handled
}

unsafe extern "C" fn sim_surface_mouse_pos(
    _surface: *mut GhosttySurface,
    x: f64,
    y: f64,
    mods: i32,
) {
    record(SimCall::MousePos { x, y, mods });
}

unsafe extern "C" fn sim_surface_mouse_scroll(
    _surface: *mut GhosttySurface,
    dx: f64,
    dy: f64,
    mods: i32,
) {
    record(SimCall::MouseScroll { dx, dy, mods });
}
