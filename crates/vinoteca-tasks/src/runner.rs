//! # Task Runner
//!
//! Spawns one worker per dispatched unit of work and hands the caller a
//! handle that delivers exactly one outcome.
//!
//! ## Contract
//! - The dispatching context returns immediately; it never blocks on the
//!   worker. A control thread polls [`TaskHandle::try_outcome`], an async
//!   context awaits [`TaskHandle::outcome`].
//! - Dispatches are independent: each worker owns its future outright and
//!   shares nothing with other workers.
//! - A handle is one-shot. Consuming the outcome consumes the handle.
//! - Cancellation is cooperative: `cancel()` resolves the outcome as
//!   [`TaskError::Cancelled`] and the worker's future is dropped at its
//!   next suspension point.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::TaskError;

// =============================================================================
// Task Runner
// =============================================================================

/// Dispatches asynchronous units of work onto the runtime.
///
/// ## Usage
/// ```rust,ignore
/// let runner = TaskRunner::new().with_timeout(Duration::from_secs(30));
///
/// let handle = runner.dispatch(async move { repo.statistics().await });
/// // ... later, on the control thread:
/// if let Some(outcome) = handle.try_outcome() {
///     match outcome {
///         Ok(stats) => dashboard.update(stats),
///         Err(err) => dashboard.show_error(err.to_string()),
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskRunner {
    /// Optional per-call deadline applied to every dispatch.
    timeout: Option<Duration>,
}

impl TaskRunner {
    /// A runner without a per-call timeout: work runs to completion,
    /// failure or cancellation.
    pub fn new() -> Self {
        TaskRunner { timeout: None }
    }

    /// Applies a deadline to every future dispatched through this runner.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Spawns `work` on the runtime and returns its completion handle.
    ///
    /// The worker resolves to exactly one of:
    /// - `Ok(value)` - the work succeeded
    /// - `Err(TaskError::Failed(text))` - the work returned its own error
    /// - `Err(TaskError::TimedOut(_))` - the runner's deadline elapsed
    /// - `Err(TaskError::Cancelled)` - the caller cancelled the handle
    pub fn dispatch<T, E, F>(&self, work: F) -> TaskHandle<T>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let (report, outcome) = oneshot::channel();
        let token = CancellationToken::new();
        let worker_token = token.clone();
        let deadline = self.timeout;

        tokio::spawn(async move {
            let result = match deadline {
                Some(limit) => tokio::select! {
                    _ = worker_token.cancelled() => Err(TaskError::Cancelled),
                    timed = tokio::time::timeout(limit, work) => match timed {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(err)) => Err(TaskError::Failed(err.to_string())),
                        Err(_) => Err(TaskError::TimedOut(limit)),
                    },
                },
                None => tokio::select! {
                    _ = worker_token.cancelled() => Err(TaskError::Cancelled),
                    finished = work => finished.map_err(|err| TaskError::Failed(err.to_string())),
                },
            };

            if let Err(err) = &result {
                debug!(%err, "Worker finished without a value");
            }
            // The receiver may already be gone; that is the caller's choice.
            let _ = report.send(result);
        });

        TaskHandle { outcome, token }
    }
}

// =============================================================================
// Task Handle
// =============================================================================

/// The caller's side of one dispatched task.
pub struct TaskHandle<T> {
    outcome: oneshot::Receiver<Result<T, TaskError>>,
    token: CancellationToken,
}

impl<T> TaskHandle<T> {
    /// Requests cancellation. Idempotent; safe from any thread.
    ///
    /// The worker resolves to [`TaskError::Cancelled`] unless it already
    /// finished, in which case the original outcome stands.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Non-blocking poll for the outcome, for use on a control thread.
    ///
    /// Returns `None` while the worker is still running. Once it returns
    /// `Some`, the delivery happened and later polls would return
    /// [`TaskError::Abandoned`]; poll until the first `Some` only.
    pub fn try_outcome(&mut self) -> Option<Result<T, TaskError>> {
        match self.outcome.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(TaskError::Abandoned)),
        }
    }

    /// Awaits the outcome, consuming the handle.
    pub async fn outcome(self) -> Result<T, TaskError> {
        match self.outcome.await {
            Ok(result) => result,
            Err(_) => Err(TaskError::Abandoned),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn delivers_the_success_value() {
        let runner = TaskRunner::new();
        let handle = runner.dispatch(async { Ok::<_, String>(41 + 1) });
        assert_eq!(handle.outcome().await, Ok(42));
    }

    #[tokio::test]
    async fn delivers_the_failure_text() {
        let runner = TaskRunner::new();
        let handle = runner.dispatch(async { Err::<i32, _>("store unreachable".to_string()) });
        assert_eq!(
            handle.outcome().await,
            Err(TaskError::Failed("store unreachable".to_string()))
        );
    }

    #[tokio::test]
    async fn timeout_interrupts_slow_work() {
        let runner = TaskRunner::new().with_timeout(Duration::from_millis(20));
        let handle = runner.dispatch(async {
            sleep(Duration::from_secs(5)).await;
            Ok::<_, String>(())
        });
        assert_eq!(
            handle.outcome().await,
            Err(TaskError::TimedOut(Duration::from_millis(20)))
        );
    }

    #[tokio::test]
    async fn cancellation_resolves_the_outcome() {
        let runner = TaskRunner::new();
        let handle = runner.dispatch(async {
            sleep(Duration::from_secs(5)).await;
            Ok::<_, String>(())
        });
        handle.cancel();
        assert_eq!(handle.outcome().await, Err(TaskError::Cancelled));
    }

    #[tokio::test]
    async fn fast_work_beats_the_timeout() {
        let runner = TaskRunner::new().with_timeout(Duration::from_secs(5));
        let handle = runner.dispatch(async { Ok::<_, String>("done") });
        assert_eq!(handle.outcome().await, Ok("done"));
    }

    #[tokio::test]
    async fn try_outcome_polls_without_blocking() {
        let runner = TaskRunner::new();
        let mut handle = runner.dispatch(async {
            sleep(Duration::from_millis(10)).await;
            Ok::<_, String>(7)
        });

        // Usually still pending right after dispatch; never blocks either way.
        let _ = handle.try_outcome();

        let mut waited = 0;
        loop {
            if let Some(outcome) = handle.try_outcome() {
                assert_eq!(outcome, Ok(7));
                break;
            }
            waited += 1;
            assert!(waited < 500, "worker never reported");
            sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn dispatches_complete_independently_and_out_of_order() {
        let runner = TaskRunner::new();
        let slow = runner.dispatch(async {
            sleep(Duration::from_millis(50)).await;
            Ok::<_, String>("slow")
        });
        let fast = runner.dispatch(async { Ok::<_, String>("fast") });

        // The second dispatch finishes first; the first is unaffected.
        assert_eq!(fast.outcome().await, Ok("fast"));
        assert_eq!(slow.outcome().await, Ok("slow"));
    }
}
