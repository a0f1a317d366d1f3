//! Library discovery through the public constructor.
//!
//! Kept to a single test: it rewrites process environment variables and
//! the resolved library is memoized process-wide.

use lienzo_ghostty::{GhosttyBackend, LoadError, ENV_LIB_OVERRIDE, ENV_LIB_PATH};

#[test]
fn constructor_reports_the_failed_override_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("libghostty.so");
    std::env::remove_var(ENV_LIB_PATH);
    std::env::set_var(ENV_LIB_OVERRIDE, &bogus);

    let err = match GhosttyBackend::new() {
        Err(err) => err,
        Ok(_) => panic!("constructor found a library despite the bogus override"),
    };
    let LoadError::NotFound { attempts } = &err else {
        panic!("expected NotFound, got {err:?}");
    };
    assert_eq!(attempts.len(), 1, "the override must be exclusive");
    assert!(attempts[0].starts_with(&bogus.display().to_string()));

    // The outcome is memoized for the life of the process.
    assert_eq!(GhosttyBackend::new().err(), Some(err));
}
