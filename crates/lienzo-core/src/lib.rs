//! Backend contract and terminal types for the Lienzo UI framework.
//!
//! This crate defines the seam between the framework and its terminal
//! backends:
//! - The [`Backend`] trait plus the optional [`RowWriter`], [`RectWriter`]
//!   and [`InputInjector`] capabilities
//! - Input events: [`Event`], [`KeyEvent`], [`MouseEvent`]
//! - Grid content: [`Cell`], [`Style`], [`Color`], [`AttrMask`]
//!
//! Backends live in their own crates (e.g. `lienzo-ghostty`); this crate
//! stays free of I/O and unsafe code.

#![deny(unsafe_code)]

mod backend;
mod cell;
mod error;
mod event;

pub use backend::{Backend, InputInjector, RectWriter, RowWriter};
pub use cell::{AttrMask, Cell, Color, Style};
pub use error::{BackendError, PushError};
pub use event::{Event, Key, KeyAction, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
