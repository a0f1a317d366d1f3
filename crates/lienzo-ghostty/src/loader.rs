//! Locates, opens, and resolves libghostty exactly once per process.
//!
//! Loading is memoized: the first caller pays for the search and every
//! later caller gets the same table or the same error. A library that
//! opens but fails symbol resolution or runtime init is rejected
//! outright rather than falling through to the next candidate, since a
//! half-working install is a configuration problem the user should see.

use std::env::consts;
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::{Arc, OnceLock};

use libloading::Library;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::ffi::GhosttyLib;

/// Highest-precedence override naming the exact library file to open.
pub const ENV_LIB_OVERRIDE: &str = "LIENZO_GHOSTTY_LIB";

/// Secondary override shared with other ghostty embedders.
pub const ENV_LIB_PATH: &str = "GHOSTTY_LIB_PATH";

static LIB: OnceLock<Result<Arc<GhosttyLib>, LoadError>> = OnceLock::new();

/// Returns the process-wide capability table, loading it on first use.
pub(crate) fn load() -> Result<Arc<GhosttyLib>, LoadError> {
    LIB.get_or_init(open_lib).clone()
}

fn open_lib() -> Result<Arc<GhosttyLib>, LoadError> {
    let lib_name = platform_lib_name()?;
    let overrides = [env_override(ENV_LIB_OVERRIDE), env_override(ENV_LIB_PATH)];
    let candidates = candidate_paths(lib_name, overrides);

    let mut attempts = Vec::with_capacity(candidates.len());
    for path in &candidates {
        let lib = match unsafe { Library::new(path) } {
            Ok(lib) => lib,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "libghostty candidate rejected");
                attempts.push(format!("{}: {err}", path.display()));
                continue;
            }
        };
        let table = resolve_table(lib)?;
        let status = unsafe { (table.init)(0, ptr::null_mut()) };
        if status != 0 {
            return Err(LoadError::InitFailed { status });
        }
        info!(path = %path.display(), "loaded libghostty");
        debug!(
            optional = ?table.optional_symbols(),
            "resolved optional entry points"
        );
        return Ok(Arc::new(table));
    }
    Err(LoadError::NotFound { attempts })
}

/// Builds the candidate list in probe order. A non-empty override
/// replaces the whole search: a user who names a library wants that
/// library or an error, not a silent fallback.
fn candidate_paths(lib_name: &str, overrides: [Option<PathBuf>; 2]) -> Vec<PathBuf> {
    let [primary, secondary] = overrides;
    if let Some(path) = primary {
        return vec![path];
    }
    if let Some(path) = secondary {
        return vec![path];
    }

    let bundled = Path::new("libs")
        .join(format!("{}_{}", consts::OS, consts::ARCH))
        .join(lib_name);
    let mut paths = vec![bundled.clone()];
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join(&bundled));
    }
    paths.push(Path::new(env!("CARGO_MANIFEST_DIR")).join(&bundled));
    paths.push(PathBuf::from(lib_name));
    paths
}

fn env_override(name: &str) -> Option<PathBuf> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

fn platform_lib_name() -> Result<&'static str, LoadError> {
    match consts::OS {
        "linux" => Ok("libghostty.so"),
        "macos" => Ok("libghostty.dylib"),
        "windows" => Ok("ghostty.dll"),
        os => Err(LoadError::Unsupported { os }),
    }
}

macro_rules! required {
    ($lib:expr, $name:literal) => {
        match unsafe { $lib.get($name.as_bytes()) } {
            Ok(sym) => *sym,
            Err(_) => return Err(LoadError::MissingSymbol { name: $name }),
        }
    };
}

macro_rules! optional {
    ($lib:expr, $name:literal) => {
        unsafe { $lib.get($name.as_bytes()) }.ok().map(|sym| *sym)
    };
}

/// Resolves every entry point out of an opened library. Dropping the
/// [`Library`] on a missing required symbol unloads it again.
fn resolve_table(lib: Library) -> Result<GhosttyLib, LoadError> {
    Ok(GhosttyLib {
        init: required!(lib, "ghostty_init"),
        config_new: required!(lib, "ghostty_config_new"),
        config_free: required!(lib, "ghostty_config_free"),
        config_set: required!(lib, "ghostty_config_set"),
        app_new_headless: required!(lib, "ghostty_app_new_headless"),
        app_free: required!(lib, "ghostty_app_free"),
        app_tick: required!(lib, "ghostty_app_tick"),
        surface_new_headless: required!(lib, "ghostty_surface_new_headless"),
        surface_free: required!(lib, "ghostty_surface_free"),
        surface_get_size: required!(lib, "ghostty_surface_get_size"),
        surface_set_cell: required!(lib, "ghostty_surface_set_cell"),
        surface_clear: required!(lib, "ghostty_surface_clear"),
        surface_show: required!(lib, "ghostty_surface_show"),
        surface_poll: required!(lib, "ghostty_surface_poll"),
        config_finalize: optional!(lib, "ghostty_config_finalize"),
        surface_size: optional!(lib, "ghostty_surface_size"),
        surface_set_cursor_pos: optional!(lib, "ghostty_surface_set_cursor_pos"),
        surface_show_cursor: optional!(lib, "ghostty_surface_show_cursor"),
        surface_hide_cursor: optional!(lib, "ghostty_surface_hide_cursor"),
        surface_key_translation_mods: optional!(lib, "ghostty_surface_key_translation_mods"),
        surface_key: optional!(lib, "ghostty_surface_key"),
        surface_key_is_binding: optional!(lib, "ghostty_surface_key_is_binding"),
        surface_text: optional!(lib, "ghostty_surface_text"),
        surface_preedit: optional!(lib, "ghostty_surface_preedit"),
        surface_mouse_captured: optional!(lib, "ghostty_surface_mouse_captured"),
        surface_mouse_button: optional!(lib, "ghostty_surface_mouse_button"),
        surface_mouse_pos: optional!(lib, "ghostty_surface_mouse_pos"),
        surface_mouse_scroll: optional!(lib, "ghostty_surface_mouse_scroll"),
        _lib: Some(lib),
    })
}
