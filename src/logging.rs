//! Logging utilities for structured tracing

use std::time::Instant;

/// Track operation timing and log on drop
pub struct Timer {
    start: Instant,
    operation: String,
    direction: String,
}

impl Timer {
    /// Create a new timer for an operation on one relay direction
    pub fn new(operation: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
            direction: direction.into(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        tracing::debug!(
            operation = %self.operation,
            direction = %self.direction,
            duration_ms = self.elapsed_ms(),
            "Operation completed"
        );
    }
}

/// Log a per-event failure; the caller keeps going
pub fn log_error(operation: &str, direction: &str, error: &impl std::error::Error) {
    tracing::error!(
        operation = %operation,
        direction = %direction,
        error = %error,
        error_kind = std::any::type_name_of_val(error),
        "Operation failed"
    );
}
