//! Completion listeners.

use super::TaskError;

/// Receives the outcome of a dispatched task.
///
/// The listener is consumed by whichever method is called, so each task
/// reports to it exactly once. Methods run on the background runtime.
pub trait CompletionListener: Send + 'static {
    /// The task completed successfully.
    fn on_success(self);

    /// The task failed.
    fn on_failure(self, error: &TaskError);
}

/// Listener that ignores the outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl CompletionListener for NoopListener {
    fn on_success(self) {}

    fn on_failure(self, _error: &TaskError) {}
}

/// Listener built from a pair of closures. See [`listener`].
pub struct FnListener<S, F> {
    on_success: S,
    on_failure: F,
}

/// Creates a listener from two closures.
///
/// # Example
///
/// ```
/// use cellguard::task::{listener, CompletionListener};
///
/// let l = listener(|| println!("done"), |e| eprintln!("failed: {}", e));
/// l.on_success();
/// ```
pub fn listener<S, F>(on_success: S, on_failure: F) -> FnListener<S, F>
where
    S: FnOnce() + Send + 'static,
    F: FnOnce(&TaskError) + Send + 'static,
{
    FnListener {
        on_success,
        on_failure,
    }
}

impl<S, F> CompletionListener for FnListener<S, F>
where
    S: FnOnce() + Send + 'static,
    F: FnOnce(&TaskError) + Send + 'static,
{
    fn on_success(self) {
        (self.on_success)()
    }

    fn on_failure(self, error: &TaskError) {
        (self.on_failure)(error)
    }
}
