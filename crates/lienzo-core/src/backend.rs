//! The backend contract.
//!
//! A backend owns the screen: the framework writes cells into it, asks it
//! to present, and pulls input events back out. Implementations are
//! internally synchronized; every method takes `&self` so a backend can be
//! shared between the UI thread and background workers.
//!
//! Optional fast paths and input injection are separate traits so a
//! backend only advertises what it can actually do.

use crate::cell::{Cell, Style};
use crate::error::{BackendError, PushError};
use crate::event::{Event, KeyEvent, MouseEvent};

/// A terminal rendering backend.
pub trait Backend: Send + Sync {
    /// Bring the backend up. Safe to call again once it succeeded.
    fn init(&self) -> Result<(), BackendError>;

    /// Tear everything down. Idempotent and safe to call concurrently.
    fn close(&self);

    /// Current grid size in cells.
    fn size(&self) -> (u16, u16);

    /// Write one cell. Out-of-range writes are ignored.
    fn set_content(&self, x: u16, y: u16, ch: char, style: Style);

    /// Present pending updates to the screen.
    fn show(&self);

    /// Reset every cell to blank.
    fn clear(&self);

    /// Force the next [`show`](Backend::show) to repaint every cell.
    fn sync(&self);

    /// Make the cursor visible.
    fn show_cursor(&self);

    /// Hide the cursor.
    fn hide_cursor(&self);

    /// Move the cursor.
    fn set_cursor_pos(&self, x: u16, y: u16);

    /// Block until the next event. `None` once the backend closes.
    fn poll_event(&self) -> Option<Event>;

    /// Publish an event into the backend's own stream without blocking.
    fn post_event(&self, event: Event) -> Result<(), PushError>;

    /// Audible bell.
    fn beep(&self) {}
}

/// Optional fast path: write a run of cells within one row.
pub trait RowWriter {
    /// Write `cells` starting at `(start_x, y)`; the out-of-range tail is
    /// ignored.
    fn set_row(&self, y: u16, start_x: u16, cells: &[Cell]);
}

/// Optional fast path: write a row-major rectangular block of cells.
pub trait RectWriter {
    /// Write a `width`×`height` block with origin `(x, y)`; out-of-range
    /// cells are ignored.
    fn set_rect(&self, x: u16, y: u16, width: u16, height: u16, cells: &[Cell]);
}

/// Optional capability: feed synthetic input through the native layer.
///
/// Used by automation drivers. The boolean tells the caller whether the
/// native surface consumed the input directly; `false` means the backend
/// fell back to publishing an event (or dropped it).
pub trait InputInjector {
    /// Inject a key activation.
    fn inject_key(&self, event: KeyEvent) -> bool;

    /// Inject a pointer action.
    fn inject_mouse(&self, event: MouseEvent) -> bool;
}
