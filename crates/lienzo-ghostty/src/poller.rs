//! Poller thread that pumps native events into the backend queue.
//!
//! The thread holds the state lock only for the duration of a single
//! native call, so render writes from the owning thread interleave
//! freely with the drain loop. `ghostty_surface_poll` is a mandatory
//! symbol, so the poll calls themselves service the app runloop and
//! `ghostty_app_tick` is never needed between drains.

use std::sync::atomic::Ordering;
use std::thread;

use lienzo_core::Event;
use tracing::debug;

use crate::backend::{Shared, POLL_INTERVAL};
use crate::ffi::{self, GhosttyEvent, GhosttyResizeData};
use crate::translate;

/// Runs until the backend is closed. Never restarted. A drain that
/// handled events loops straight back to polling; an empty pass
/// sleeps.
pub(crate) fn run(shared: &Shared) {
    loop {
        if shared.closed.load(Ordering::SeqCst) {
            return;
        }
        if drain(shared) {
            continue;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Pulls every immediately available native event, reporting whether
/// any was handled.
fn drain(shared: &Shared) -> bool {
    let mut handled = false;
    loop {
        if shared.closed.load(Ordering::SeqCst) {
            return handled;
        }
        let Some(event) = poll_one(shared) else {
            return handled;
        };
        dispatch(shared, event);
        handled = true;
    }
}

fn poll_one(shared: &Shared) -> Option<GhosttyEvent> {
    let state = shared.state.lock();
    let surface = state.surface?;
    let mut event = GhosttyEvent::default();
    let got = unsafe { (shared.lib.surface_poll)(surface.as_ptr(), &mut event, 0) };
    (got == 1).then_some(event)
}

fn dispatch(shared: &Shared, event: GhosttyEvent) {
    match event.tag {
        ffi::EVENT_RENDER => render(shared),
        ffi::EVENT_RESIZE => resize(shared, event.resize),
        ffi::EVENT_KEY => {
            if let Some(key) = translate::key_event(event.key) {
                publish(shared, Event::Key(key));
            }
        }
        ffi::EVENT_MOUSE_BUTTON | ffi::EVENT_MOUSE_MOVE | ffi::EVENT_MOUSE_SCROLL => {
            if let Some(mouse) = translate::mouse_event(event.tag, event.mouse) {
                publish(shared, Event::Mouse(mouse));
            }
        }
        tag => debug!(tag, "ignoring unknown native event"),
    }
}

/// A native render request: replay the cached grid if a redraw is
/// pending, then present. Not forwarded as an abstract event.
fn render(shared: &Shared) {
    let mut state = shared.state.lock();
    let Some(surface) = state.surface else { return };
    if state.force_redraw {
        state.redraw(&shared.lib);
        state.force_redraw = false;
    }
    unsafe { (shared.lib.surface_show)(surface.as_ptr()) };
}

/// A native resize: adopt the new grid under the lock, then publish
/// outside it. Resizes to the current dimensions are dropped.
fn resize(shared: &Shared, resize: GhosttyResizeData) {
    let columns = translate::clamp_cell_coord(resize.columns);
    let rows = translate::clamp_cell_coord(resize.rows);
    let changed = {
        let mut state = shared.state.lock();
        if state.surface.is_some() && (columns != state.width || rows != state.height) {
            state.apply_size(columns, rows);
            true
        } else {
            false
        }
    };
    if changed {
        publish(shared, Event::Resize { columns, rows });
    }
}

fn publish(shared: &Shared, event: Event) {
    if let Err(err) = shared.post(event) {
        debug!(%err, ?event, "dropping native event");
    }
}
