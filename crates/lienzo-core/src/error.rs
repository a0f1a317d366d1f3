//! Errors shared across backend implementations.

use thiserror::Error;

/// Failure to bring a backend up.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The native engine behind the backend could not be prepared.
    #[error("backend init: {0}")]
    Init(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    /// The backend was already shut down.
    #[error("backend closed")]
    Closed,
}

impl BackendError {
    /// Wrap an engine-specific failure.
    pub fn init<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Init(Box::new(source))
    }
}

/// Result of a non-blocking event publish.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// The outbound queue is at capacity; the event was not enqueued.
    #[error("event queue full")]
    Full,
    /// The backend has shut down; no further events are accepted.
    #[error("backend closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_error_display() {
        assert_eq!(PushError::Full.to_string(), "event queue full");
        assert_eq!(PushError::Closed.to_string(), "backend closed");
    }

    #[test]
    fn test_backend_error_preserves_source() {
        let err = BackendError::init(PushError::Full);
        assert!(err.to_string().contains("event queue full"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
