//! Error types for locating, loading, and driving libghostty.

use thiserror::Error;

/// Failure to locate or initialize the native library.
///
/// Loading is memoized process-wide, so the same value may be returned
/// to every caller. All variants are therefore cheaply cloneable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// No candidate path produced a loadable library.
    ///
    /// Each attempt is recorded as `path: reason` so a misconfigured
    /// override or a missing install shows up in one message.
    #[error("libghostty not found; tried: {}", .attempts.join("; "))]
    NotFound {
        /// One `path: reason` entry per candidate, in probe order.
        attempts: Vec<String>,
    },

    /// The library opened but lacks a required symbol.
    #[error("libghostty is missing required symbol {name}")]
    MissingSymbol {
        /// Name of the first unresolvable required symbol.
        name: &'static str,
    },

    /// `ghostty_init` returned a non-zero status.
    #[error("ghostty_init failed with status {status}")]
    InitFailed {
        /// Raw status code from the native runtime.
        status: i32,
    },

    /// No library name is defined for the current platform.
    #[error("the ghostty backend is not supported on {os}")]
    Unsupported {
        /// Operating system reported by the toolchain.
        os: &'static str,
    },
}

/// A native constructor returned a null handle.
///
/// Raised during surface setup when `ghostty_config_new`,
/// `ghostty_app_new_headless`, or `ghostty_surface_new_headless` fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{call} returned null")]
pub struct NullHandleError {
    /// The native call that produced the null handle.
    pub call: &'static str,
}

impl NullHandleError {
    pub(crate) const fn new(call: &'static str) -> Self {
        Self { call }
    }
}
