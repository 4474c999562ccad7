//! Background task plumbing shared by the fetcher and the file importer.
//!
//! Both operations follow the same life cycle:
//!
//! ```text
//! IDLE ──► CHECK_CONNECTIVITY ──► REFUSED_NO_NETWORK
//!                │
//!                ▼
//!          CHECK_API_KEY (fetch only) ──► REFUSED_NO_KEY
//!                │
//!                ▼
//!          CHECK_LOCATION ──► REFUSED_NO_LOCATION
//!                │
//!                ▼
//!          CHECK_IN_FLIGHT ──► REFUSED_IN_FLIGHT
//!                │
//!                ▼
//!          BUILD_REQUEST ──► IN_FLIGHT ──► SUCCEEDED | FAILED
//! ```
//!
//! Refusals are returned synchronously as [`Refusal`] values. Once a task
//! is dispatched, its outcome is reported exactly once to a
//! [`CompletionListener`] and can also be awaited through the returned
//! [`TaskHandle`].

mod handle;
mod listener;
mod refusal;

pub use handle::{InFlight, InFlightPermit, TaskHandle};
pub(crate) use handle::spawn_task;
pub use listener::{listener, CompletionListener, FnListener, NoopListener};
pub use refusal::{Refusal, NO_API_KEY_MESSAGE, NO_NETWORK_BODY, NO_NETWORK_TITLE};

use crate::import::ImportError;
use crate::platform::StoreError;
use crate::provider::ProviderError;
use crate::towers::TowerParseError;

/// Failure of a dispatched task.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The HTTP request failed.
    #[error("Download failed: {0}")]
    Provider(#[from] ProviderError),

    /// The downloaded body was not valid tower CSV.
    #[error("Invalid response: {0}")]
    Parse(#[from] TowerParseError),

    /// The import file could not be read.
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    /// The tower store rejected the records.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The task panicked or was aborted.
    #[error("Task aborted: {0}")]
    Aborted(String),
}
