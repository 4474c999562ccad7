//! In-flight guard, task handle and the shared spawn routine.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{CompletionListener, TaskError};

/// Single-in-flight guard.
///
/// At most one [`InFlightPermit`] exists at a time. Clones share the same
/// flag.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

impl InFlight {
    /// Creates an idle guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the permit, or returns `None` if it is already taken.
    pub fn try_acquire(&self) -> Option<InFlightPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    /// Whether a permit is currently held.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Permission to run one task. Released on drop.
#[derive(Debug)]
pub struct InFlightPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Handle to a dispatched task.
///
/// Awaiting [`TaskHandle::wait`] yields the same outcome the listener saw.
/// Dropping the handle does not cancel the task.
pub struct TaskHandle<T> {
    task: JoinHandle<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    /// Waits for the task to finish.
    pub async fn wait(self) -> Result<T, TaskError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(TaskError::Aborted(e.to_string())),
        }
    }

    /// Whether the task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns `work` on `runtime` and reports its outcome to `listener`.
///
/// The permit is released before the listener runs, so a listener may
/// start a follow-up task. A panic inside `work` is reported as
/// [`TaskError::Aborted`].
pub(crate) fn spawn_task<T, Fut, L>(
    runtime: &Handle,
    permit: InFlightPermit,
    listener: L,
    work: Fut,
) -> TaskHandle<T>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    L: CompletionListener,
{
    let task = runtime.spawn(async move {
        let outcome = match AssertUnwindSafe(work).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(TaskError::Aborted(panic_message(&*panic))),
        };
        drop(permit);

        match &outcome {
            Ok(_) => {
                debug!("Task succeeded");
                listener.on_success();
            }
            Err(e) => {
                debug!(error = %e, "Task failed");
                listener.on_failure(e);
            }
        }
        outcome
    });

    TaskHandle { task }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
