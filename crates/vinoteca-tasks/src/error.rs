//! Task outcome error types.

use std::time::Duration;

use thiserror::Error;

/// Why a dispatched task did not produce a value.
///
/// `Failed` carries the display text of the operation's own error; the
/// shell shows it verbatim in its failure signal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The unit of work itself returned an error.
    #[error("task failed: {0}")]
    Failed(String),

    /// The runner's per-call timeout elapsed before the work finished.
    #[error("task timed out after {0:?}")]
    TimedOut(Duration),

    /// The caller cancelled the task before it finished.
    #[error("task was cancelled")]
    Cancelled,

    /// The worker disappeared without reporting (runtime shut down).
    #[error("worker dropped without reporting an outcome")]
    Abandoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_keeps_the_operation_message() {
        let err = TaskError::Failed("Connection failed: store unreachable".to_string());
        assert_eq!(
            err.to_string(),
            "task failed: Connection failed: store unreachable"
        );
    }
}
