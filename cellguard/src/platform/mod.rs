//! Collaborator interfaces provided by the host platform.
//!
//! The core never talks to a UI, a database or the OS network stack
//! directly. Everything it needs from the outside world goes through the
//! small traits in this module, so that an Android shell, a desktop CLI and
//! the test suite can each plug in their own implementation.
//!
//! # Collaborators
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`UserNotifier`] | Transient messages and blocking dialogs |
//! | [`NetworkMonitor`] | State of the network transports |
//! | [`LocationSource`] | Current device position |
//! | [`TowerStore`] | Destination for fetched/imported tower records |
//! | [`CellReconciler`] | Re-check of the serving cell after new data arrived |

use std::sync::Arc;

use crate::coord::GeoPoint;
use crate::towers::TowerRecord;

/// Network transports the connectivity gate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Wireless LAN.
    Wifi,
    /// Cellular data.
    Mobile,
    /// Wired LAN.
    Ethernet,
}

impl Transport {
    /// All transports, in the order they are queried.
    pub const ALL: [Transport; 3] = [Transport::Wifi, Transport::Mobile, Transport::Ethernet];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Transport::Wifi => "wifi",
            Transport::Mobile => "mobile",
            Transport::Ethernet => "ethernet",
        }
    }
}

/// Errors a network monitor may report.
#[derive(Debug, thiserror::Error)]
pub enum NetworkStateError {
    /// The platform's network service could not be reached.
    #[error("Network service unavailable: {0}")]
    Unavailable(String),

    /// I/O error while reading the network state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reports the state of the device's network transports.
pub trait NetworkMonitor: Send + Sync {
    /// Whether `transport` is connected.
    ///
    /// Returns `Ok(None)` when the device has no such transport.
    fn is_connected(&self, transport: Transport) -> Result<Option<bool>, NetworkStateError>;
}

/// Surfaces messages to the user.
pub trait UserNotifier: Send + Sync {
    /// Shows a short, transient message.
    fn notify_user(&self, message: &str);

    /// Shows a message the user has to acknowledge.
    fn notify_user_blocking(&self, title: &str, body: &str);
}

/// Provides the device's current position.
pub trait LocationSource: Send + Sync {
    /// The last known position, `None` while there is no fix.
    fn current_position(&self) -> Option<GeoPoint>;
}

/// Where fetched or imported tower records end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Download triggered by the background tracking service.
    Background,
    /// Download requested by the user from the map view.
    MapView,
    /// Records imported from a user-supplied file.
    Import,
}

impl Destination {
    /// All destinations, in lookup order.
    pub const ALL: [Destination; 3] = [
        Destination::Background,
        Destination::MapView,
        Destination::Import,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Destination::Background => "background",
            Destination::MapView => "map",
            Destination::Import => "import",
        }
    }
}

/// Error returned by a [`TowerStore`].
#[derive(Debug, thiserror::Error)]
#[error("Failed to store tower records: {0}")]
pub struct StoreError(pub String);

/// Persists tower reference records.
pub trait TowerStore: Send + Sync {
    /// Stores `towers` for `destination` and returns how many were stored.
    fn store_towers(
        &self,
        destination: Destination,
        towers: &[TowerRecord],
    ) -> Result<usize, StoreError>;
}

/// Compares the currently connected cell against stored reference data.
pub trait CellReconciler: Send + Sync {
    /// Runs the comparison.
    fn reconcile(&self);
}

/// The set of collaborators the fetch and import tasks need.
#[derive(Clone)]
pub struct Platform {
    /// User messaging.
    pub notifier: Arc<dyn UserNotifier>,
    /// Network transport state.
    pub network: Arc<dyn NetworkMonitor>,
    /// Tower record destination.
    pub store: Arc<dyn TowerStore>,
    /// Device position, if the platform can provide one.
    pub location: Option<Arc<dyn LocationSource>>,
}

impl Platform {
    /// Creates a platform bundle without a location source.
    pub fn new(
        notifier: Arc<dyn UserNotifier>,
        network: Arc<dyn NetworkMonitor>,
        store: Arc<dyn TowerStore>,
    ) -> Self {
        Self {
            notifier,
            network,
            store,
            location: None,
        }
    }

    /// Adds a location source.
    pub fn with_location(mut self, location: Arc<dyn LocationSource>) -> Self {
        self.location = Some(location);
        self
    }
}
