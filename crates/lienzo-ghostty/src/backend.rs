//! The ghostty-backed implementation of the backend contract.
//!
//! All native handles live behind one mutex in [`State`]; the render
//! grid cached next to them lets `show` replay the full frame after a
//! resize or an explicit `sync`. Polled input flows through a bounded
//! queue so a stalled consumer can never wedge the poller thread.

use std::ffi::CString;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, Receiver, Sender, TrySendError};
use lienzo_core::{
    Backend, BackendError, Cell, Event, PushError, RectWriter, RowWriter, Style,
};
use parking_lot::Mutex;
use tracing::warn;

use crate::error::{LoadError, NullHandleError};
use crate::ffi::{GhosttyApp, GhosttyConfig, GhosttyLib, GhosttySurface};
use crate::loader;
use crate::poller;
use crate::translate;

/// How long the poller sleeps after an empty drain.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Capacity of the bounded queue feeding `poll_event`.
pub(crate) const EVENT_BUFFER: usize = 128;

/// A NUL cell is cached and emitted as the blank it stands for.
fn blank_nul(cell: Cell) -> Cell {
    if cell.ch == '\0' {
        Cell { ch: ' ', ..cell }
    } else {
        cell
    }
}

/// Last pointer position forwarded to the native surface.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PointerState {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) valid: bool,
}

/// Everything guarded by the backend mutex: native handles, the cached
/// grid, and the redraw flag.
pub(crate) struct State {
    pub(crate) config: Option<NonNull<GhosttyConfig>>,
    pub(crate) app: Option<NonNull<GhosttyApp>>,
    pub(crate) surface: Option<NonNull<GhosttySurface>>,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) cells: Vec<Cell>,
    pub(crate) force_redraw: bool,
    pub(crate) pointer: PointerState,
}

// SAFETY: the raw handles are only ever passed back to the native
// library, and every call site holds the state mutex, so a handle is
// never used from two threads at once even though the state itself
// moves between the caller and poller threads.
unsafe impl Send for State {}

impl State {
    fn new() -> Self {
        Self {
            config: None,
            app: None,
            surface: None,
            width: 0,
            height: 0,
            cells: Vec::new(),
            force_redraw: false,
            pointer: PointerState::default(),
        }
    }

    pub(crate) fn cell_index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// Pushes one cell to the native surface.
    pub(crate) fn emit_cell(
        &self,
        lib: &GhosttyLib,
        surface: NonNull<GhosttySurface>,
        x: u16,
        y: u16,
        cell: Cell,
    ) {
        let (fg, bg, attrs) = cell.style.decompose();
        unsafe {
            (lib.surface_set_cell)(
                surface.as_ptr(),
                u32::from(x),
                u32::from(y),
                u32::from(cell.ch),
                fg.as_u32(),
                bg.as_u32(),
                attrs.bits(),
            );
        }
    }

    /// Replays the whole cached grid to the native surface.
    pub(crate) fn redraw(&self, lib: &GhosttyLib) {
        let Some(surface) = self.surface else { return };
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[self.cell_index(x, y)];
                self.emit_cell(lib, surface, x, y, cell);
            }
        }
    }

    /// Re-queries the native grid size and reallocates on change.
    pub(crate) fn refresh_size(&mut self, lib: &GhosttyLib) {
        let Some(surface) = self.surface else { return };
        let mut columns: i32 = 0;
        let mut rows: i32 = 0;
        unsafe { (lib.surface_get_size)(surface.as_ptr(), &mut columns, &mut rows) };
        let columns = translate::clamp_cell_coord(columns);
        let rows = translate::clamp_cell_coord(rows);
        if columns == self.width && rows == self.height {
            return;
        }
        self.apply_size(columns, rows);
    }

    /// Adopts new grid dimensions. The cached grid and the recorded
    /// pointer position are both relative to the old grid, so they are
    /// dropped along with it.
    pub(crate) fn apply_size(&mut self, columns: u16, rows: u16) {
        self.width = columns;
        self.height = rows;
        self.reset_cells();
        self.force_redraw = true;
        self.pointer = PointerState::default();
    }

    pub(crate) fn reset_cells(&mut self) {
        let len = usize::from(self.width) * usize::from(self.height);
        self.cells.clear();
        self.cells.resize(len, Cell::BLANK);
    }
}

/// State shared with the poller thread.
pub(crate) struct Shared {
    pub(crate) lib: Arc<GhosttyLib>,
    pub(crate) state: Mutex<State>,
    pub(crate) closed: AtomicBool,
    pub(crate) events_tx: Sender<Event>,
}

impl Shared {
    /// Queues one event for `poll_event` without ever blocking.
    pub(crate) fn post(&self, event: Event) -> Result<(), PushError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PushError::Closed);
        }
        match self.events_tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(PushError::Full),
            Err(TrySendError::Disconnected(_)) => Err(PushError::Closed),
        }
    }
}

/// Terminal backend rendering through a dynamically loaded libghostty.
///
/// Construction resolves the native library; [`Backend::init`] creates
/// the headless surface and starts the poller thread. Dropping the
/// backend closes it.
pub struct GhosttyBackend {
    pub(crate) shared: Arc<Shared>,
    events_rx: Receiver<Event>,
    closed_rx: Receiver<()>,
    close_tx: Mutex<Option<Sender<()>>>,
    poller: Mutex<Option<JoinHandle<()>>>,
    close_lock: Mutex<()>,
    config_options: Vec<(String, String)>,
}

impl GhosttyBackend {
    /// Creates a backend over the process-wide loaded library.
    pub fn new() -> Result<Self, LoadError> {
        Self::with_config(Vec::new())
    }

    /// Creates a backend that applies the given configuration pairs to
    /// the native config object before the application is created.
    pub fn with_config(options: Vec<(String, String)>) -> Result<Self, LoadError> {
        Ok(Self::with_lib(loader::load()?, options))
    }

    pub(crate) fn with_lib(lib: Arc<GhosttyLib>, config_options: Vec<(String, String)>) -> Self {
        let (events_tx, events_rx) = bounded(EVENT_BUFFER);
        let (close_tx, closed_rx) = bounded::<()>(0);
        Self {
            shared: Arc::new(Shared {
                lib,
                state: Mutex::new(State::new()),
                closed: AtomicBool::new(false),
                events_tx,
            }),
            events_rx,
            closed_rx,
            close_tx: Mutex::new(Some(close_tx)),
            poller: Mutex::new(None),
            close_lock: Mutex::new(()),
            config_options,
        }
    }

    /// Creates the config, app, and surface handles if they do not
    /// exist yet, unwinding partial progress on failure.
    fn ensure_surface(&self, state: &mut State) -> Result<(), BackendError> {
        if state.surface.is_some() {
            return Ok(());
        }
        let lib = &*self.shared.lib;

        let config = NonNull::new(unsafe { (lib.config_new)() })
            .ok_or_else(|| BackendError::init(NullHandleError::new("ghostty_config_new")))?;
        for (key, value) in &self.config_options {
            let (Ok(key), Ok(value)) = (CString::new(key.as_str()), CString::new(value.as_str()))
            else {
                continue;
            };
            unsafe { (lib.config_set)(config.as_ptr(), key.as_ptr(), value.as_ptr()) };
        }
        if let Some(finalize) = lib.config_finalize {
            unsafe { finalize(config.as_ptr()) };
        }

        let app = match NonNull::new(unsafe { (lib.app_new_headless)(config.as_ptr()) }) {
            Some(app) => app,
            None => {
                unsafe { (lib.config_free)(config.as_ptr()) };
                return Err(BackendError::init(NullHandleError::new(
                    "ghostty_app_new_headless",
                )));
            }
        };
        let surface = match NonNull::new(unsafe { (lib.surface_new_headless)(app.as_ptr()) }) {
            Some(surface) => surface,
            None => {
                unsafe {
                    (lib.app_free)(app.as_ptr());
                    (lib.config_free)(config.as_ptr());
                }
                return Err(BackendError::init(NullHandleError::new(
                    "ghostty_surface_new_headless",
                )));
            }
        };

        state.config = Some(config);
        state.app = Some(app);
        state.surface = Some(surface);
        state.refresh_size(lib);
        self.start_poller();
        Ok(())
    }

    /// Starts the poller thread. It runs until close and is never
    /// restarted.
    fn start_poller(&self) {
        let mut slot = self.poller.lock();
        if slot.is_some() || self.shared.closed.load(Ordering::SeqCst) {
            return;
        }
        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("lienzo-ghostty-poll".to_string())
            .spawn(move || poller::run(&shared));
        match spawned {
            Ok(handle) => *slot = Some(handle),
            Err(err) => warn!(error = %err, "failed to start the event poller"),
        }
    }
}

impl Backend for GhosttyBackend {
    fn init(&self) -> Result<(), BackendError> {
        if self.shared.closed.load(Ordering::SeqCst) {
            return Err(BackendError::Closed);
        }
        let mut state = self.shared.state.lock();
        self.ensure_surface(&mut state)
    }

    fn close(&self) {
        let _closing = self.close_lock.lock();
        self.shared.closed.store(true, Ordering::SeqCst);
        // Dropping the sender wakes every blocked poll_event caller.
        self.close_tx.lock().take();
        if let Some(handle) = self.poller.lock().take() {
            if handle.join().is_err() {
                warn!("event poller panicked during shutdown");
            }
        }
        let mut state = self.shared.state.lock();
        let lib = &*self.shared.lib;
        if let Some(surface) = state.surface.take() {
            unsafe { (lib.surface_free)(surface.as_ptr()) };
        }
        if let Some(app) = state.app.take() {
            unsafe { (lib.app_free)(app.as_ptr()) };
        }
        if let Some(config) = state.config.take() {
            unsafe { (lib.config_free)(config.as_ptr()) };
        }
    }

    fn size(&self) -> (u16, u16) {
        let mut state = self.shared.state.lock();
        if state.surface.is_some() {
            state.refresh_size(&self.shared.lib);
        }
        (state.width, state.height)
    }

    fn set_content(&self, x: u16, y: u16, ch: char, style: Style) {
        let mut state = self.shared.state.lock();
        let Some(surface) = state.surface else { return };
        if x >= state.width || y >= state.height {
            return;
        }
        let cell = blank_nul(Cell { ch, style });
        let idx = state.cell_index(x, y);
        state.cells[idx] = cell;
        state.emit_cell(&self.shared.lib, surface, x, y, cell);
    }

    fn show(&self) {
        let mut state = self.shared.state.lock();
        let Some(surface) = state.surface else { return };
        if state.force_redraw {
            state.redraw(&self.shared.lib);
            state.force_redraw = false;
        }
        unsafe { (self.shared.lib.surface_show)(surface.as_ptr()) };
    }

    fn clear(&self) {
        let mut state = self.shared.state.lock();
        if let Some(surface) = state.surface {
            unsafe { (self.shared.lib.surface_clear)(surface.as_ptr()) };
        }
        state.reset_cells();
    }

    fn sync(&self) {
        self.shared.state.lock().force_redraw = true;
    }

    fn show_cursor(&self) {
        let state = self.shared.state.lock();
        let (Some(surface), Some(show)) = (state.surface, self.shared.lib.surface_show_cursor)
        else {
            return;
        };
        unsafe { show(surface.as_ptr()) };
    }

    fn hide_cursor(&self) {
        let state = self.shared.state.lock();
        let (Some(surface), Some(hide)) = (state.surface, self.shared.lib.surface_hide_cursor)
        else {
            return;
        };
        unsafe { hide(surface.as_ptr()) };
    }

    fn set_cursor_pos(&self, x: u16, y: u16) {
        let state = self.shared.state.lock();
        let (Some(surface), Some(set_pos)) =
            (state.surface, self.shared.lib.surface_set_cursor_pos)
        else {
            return;
        };
        unsafe { set_pos(surface.as_ptr(), i32::from(x), i32::from(y)) };
    }

    fn poll_event(&self) -> Option<Event> {
        select! {
            recv(self.events_rx) -> event => event.ok(),
            recv(self.closed_rx) -> _ => None,
        }
    }

    fn post_event(&self, event: Event) -> Result<(), PushError> {
        self.shared.post(event)
    }
}

impl RowWriter for GhosttyBackend {
    fn set_row(&self, y: u16, start_x: u16, cells: &[Cell]) {
        let mut state = self.shared.state.lock();
        let Some(surface) = state.surface else { return };
        if cells.is_empty() || y >= state.height || start_x >= state.width {
            return;
        }
        let span = cells.len().min(usize::from(state.width - start_x));
        for (i, &cell) in cells.iter().take(span).enumerate() {
            let cell = blank_nul(cell);
            let x = start_x + i as u16;
            let idx = state.cell_index(x, y);
            state.cells[idx] = cell;
            state.emit_cell(&self.shared.lib, surface, x, y, cell);
        }
    }
}

impl RectWriter for GhosttyBackend {
    fn set_rect(&self, x: u16, y: u16, width: u16, height: u16, cells: &[Cell]) {
        if width == 0 || height == 0 {
            return;
        }
        let needed = usize::from(width) * usize::from(height);
        if cells.len() < needed {
            return;
        }
        let mut state = self.shared.state.lock();
        let Some(surface) = state.surface else { return };
        for row in 0..height {
            let ty = u32::from(y) + u32::from(row);
            if ty >= u32::from(state.height) {
                continue;
            }
            for col in 0..width {
                let tx = u32::from(x) + u32::from(col);
                if tx >= u32::from(state.width) {
                    continue;
                }
                let cell =
                    blank_nul(cells[usize::from(row) * usize::from(width) + usize::from(col)]);
                let (cx, cy) = (tx as u16, ty as u16);
                let idx = state.cell_index(cx, cy);
                state.cells[idx] = cell;
                state.emit_cell(&self.shared.lib, surface, cx, cy, cell);
            }
        }
    }
}

impl Drop for GhosttyBackend {
    fn drop(&mut self) {
        self.close();
    }
}
