//! Ghostty terminal backend for the Lienzo UI framework.
//!
//! [`GhosttyBackend`] drives a dynamically loaded libghostty: render
//! writes go out through a cached cell grid, native events come back
//! over a dedicated poller thread, and synthetic input is pushed into
//! the real native input path. The library is resolved once per
//! process, from an explicit override, a bundled `libs/` directory, or
//! the system loader; optional entry points that are missing degrade
//! their feature instead of failing the load.
//!
//! The [`sim`] module ships an in-process stand-in for libghostty so
//! backend behavior can be exercised without a native install.

#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]

mod backend;
mod error;
mod ffi;
mod inject;
mod keycodes;
mod loader;
mod poller;
pub mod sim;
mod translate;

pub use backend::GhosttyBackend;
pub use error::{LoadError, NullHandleError};
pub use loader::{ENV_LIB_OVERRIDE, ENV_LIB_PATH};
