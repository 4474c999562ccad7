//! Serving-cell reconciliation against stored reference data.
//!
//! After new tower data arrives, the serving cell is looked up in the
//! store. A cell whose id is known but whose LAC differs, or a cell that
//! is missing entirely from the reference data, is worth telling the user
//! about: both are typical signs of a fake base station.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::cell::CellIdentity;
use crate::platform::{CellReconciler, Destination, StoreError, TowerStore, UserNotifier};
use crate::task::{CompletionListener, TaskError};
use crate::towers::TowerRecord;

/// In-memory tower store.
///
/// Each store call replaces the records previously held for the same
/// destination.
#[derive(Debug, Default)]
pub struct MemoryTowerStore {
    towers: RwLock<HashMap<Destination, Vec<TowerRecord>>>,
}

impl MemoryTowerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records held for `destination`.
    pub fn towers(&self, destination: Destination) -> Vec<TowerRecord> {
        self.towers
            .read()
            .get(&destination)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of records across all destinations.
    pub fn len(&self) -> usize {
        self.towers.read().values().map(Vec::len).sum()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records with the given network and cell id, from any destination.
    ///
    /// Destinations are searched in [`Destination::ALL`] order.
    pub fn find_cell(&self, mcc: u16, mnc: u16, cid: u32) -> Vec<TowerRecord> {
        let towers = self.towers.read();
        Destination::ALL
            .iter()
            .filter_map(|destination| towers.get(destination))
            .flatten()
            .filter(|t| t.mcc == mcc && t.mnc == mnc && t.cellid == cid)
            .cloned()
            .collect()
    }
}

impl TowerStore for MemoryTowerStore {
    fn store_towers(
        &self,
        destination: Destination,
        towers: &[TowerRecord],
    ) -> Result<usize, StoreError> {
        self.towers.write().insert(destination, towers.to_vec());
        debug!(destination = destination.name(), count = towers.len(), "Towers stored");
        Ok(towers.len())
    }
}

/// Reports the cell the modem is currently camped on.
pub trait ServingCellSource: Send + Sync {
    /// The serving cell, `None` when not registered.
    fn serving_cell(&self) -> Option<CellIdentity>;
}

/// Outcome of comparing the serving cell against the reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVerdict {
    /// The cell is known with the same LAC.
    Known,
    /// The cell id is known but under a different LAC.
    LacMismatch { expected: u32, actual: u32 },
    /// The cell is not in the reference data.
    Unknown,
    /// The serving cell identity is not complete enough to compare.
    Incomplete,
}

/// Compares the serving cell with the towers in a [`MemoryTowerStore`].
pub struct ServingCellReconciler {
    source: Arc<dyn ServingCellSource>,
    store: Arc<MemoryTowerStore>,
    notifier: Arc<dyn UserNotifier>,
}

impl ServingCellReconciler {
    /// Creates a reconciler.
    pub fn new(
        source: Arc<dyn ServingCellSource>,
        store: Arc<MemoryTowerStore>,
        notifier: Arc<dyn UserNotifier>,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
        }
    }

    /// Classifies the current serving cell without notifying anyone.
    pub fn check(&self) -> CellVerdict {
        let Some(cell) = self.source.serving_cell() else {
            return CellVerdict::Incomplete;
        };
        let (Some(mcc), Some(mnc), Some(lac), Some(cid)) = (cell.mcc, cell.mnc, cell.lac, cell.cid)
        else {
            return CellVerdict::Incomplete;
        };

        let matches = self.store.find_cell(mcc, mnc, cid);
        if matches.is_empty() {
            CellVerdict::Unknown
        } else if matches.iter().any(|t| t.lac == lac) {
            CellVerdict::Known
        } else {
            CellVerdict::LacMismatch {
                expected: matches[0].lac,
                actual: lac,
            }
        }
    }
}

impl CellReconciler for ServingCellReconciler {
    fn reconcile(&self) {
        let cell = self.source.serving_cell().unwrap_or_default();
        match self.check() {
            CellVerdict::Known => info!(cell = %cell, "Serving cell matches reference data"),
            CellVerdict::Incomplete => debug!(cell = %cell, "Serving cell identity incomplete"),
            CellVerdict::Unknown => {
                warn!(cell = %cell, "Serving cell not found in reference data");
                self.notifier.notify_user(&format!(
                    "Serving cell {} is not listed in OpenCellID",
                    cell
                ));
            }
            CellVerdict::LacMismatch { expected, actual } => {
                warn!(cell = %cell, expected, actual, "Serving cell LAC mismatch");
                self.notifier.notify_user(&format!(
                    "Serving cell {} reports LAC {}, OpenCellID lists LAC {}",
                    cell, actual, expected
                ));
            }
        }
    }
}

/// Default completion listener: reconcile on success, log and tell the
/// user on failure.
pub struct ReconcileOnSuccess {
    reconciler: Arc<dyn CellReconciler>,
    notifier: Arc<dyn UserNotifier>,
}

impl ReconcileOnSuccess {
    /// Creates the listener.
    pub fn new(reconciler: Arc<dyn CellReconciler>, notifier: Arc<dyn UserNotifier>) -> Self {
        Self {
            reconciler,
            notifier,
        }
    }
}

impl CompletionListener for ReconcileOnSuccess {
    fn on_success(self) {
        debug!("Download succeeded, rechecking serving cell");
        self.reconciler.reconcile();
    }

    fn on_failure(self, error: &TaskError) {
        error!(error = %error, "Tower data download failed");
        self.notifier.notify_user(&error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::tests::RecordingNotifier;
    use crate::towers::parse_towers;
    use crate::towers::tests::API_CSV;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedCell(Option<CellIdentity>);

    impl ServingCellSource for FixedCell {
        fn serving_cell(&self) -> Option<CellIdentity> {
            self.0
        }
    }

    fn loaded_store() -> Arc<MemoryTowerStore> {
        let store = Arc::new(MemoryTowerStore::new());
        let towers = parse_towers(API_CSV.as_bytes()).unwrap();
        store.store_towers(Destination::MapView, &towers).unwrap();
        store
    }

    fn reconciler(
        cell: Option<CellIdentity>,
    ) -> (ServingCellReconciler, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let r = ServingCellReconciler::new(
            Arc::new(FixedCell(cell)),
            loaded_store(),
            notifier.clone(),
        );
        (r, notifier)
    }

    #[test]
    fn test_store_replaces_per_destination() {
        let store = loaded_store();
        assert_eq!(store.len(), 2);

        let towers = parse_towers(API_CSV.as_bytes()).unwrap();
        store.store_towers(Destination::MapView, &towers[..1]).unwrap();
        store.store_towers(Destination::Import, &towers).unwrap();

        assert_eq!(store.towers(Destination::MapView).len(), 1);
        assert_eq!(store.towers(Destination::Import).len(), 2);
        assert!(store.towers(Destination::Background).is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_known_cell() {
        let cell = CellIdentity::network(262, 1).with_lac(4711).with_cid(10001);
        let (r, notifier) = reconciler(Some(cell));

        assert_eq!(r.check(), CellVerdict::Known);
        r.reconcile();
        assert!(notifier.messages.lock().is_empty());
    }

    #[test]
    fn test_lac_mismatch_notifies() {
        let cell = CellIdentity::network(262, 1).with_lac(9999).with_cid(10001);
        let (r, notifier) = reconciler(Some(cell));

        assert_eq!(
            r.check(),
            CellVerdict::LacMismatch {
                expected: 4711,
                actual: 9999
            }
        );
        r.reconcile();
        let messages = notifier.messages.lock();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("LAC 9999"));
    }

    #[test]
    fn test_lac_mismatch_reports_first_destination() {
        let store = loaded_store();
        let mut moved = parse_towers(API_CSV.as_bytes()).unwrap();
        moved[0].lac = 5000;
        store.store_towers(Destination::Import, &moved).unwrap();
        store.store_towers(Destination::Background, &moved).unwrap();

        let cell = CellIdentity::network(262, 1).with_lac(9999).with_cid(10001);
        let r = ServingCellReconciler::new(
            Arc::new(FixedCell(Some(cell))),
            store.clone(),
            Arc::new(RecordingNotifier::default()),
        );

        let lacs: Vec<u32> = store.find_cell(262, 1, 10001).iter().map(|t| t.lac).collect();
        assert_eq!(lacs, vec![5000, 4711, 5000]);
        assert_eq!(
            r.check(),
            CellVerdict::LacMismatch {
                expected: 5000,
                actual: 9999
            }
        );
    }

    #[test]
    fn test_unknown_cell_notifies() {
        let cell = CellIdentity::network(262, 1).with_lac(4711).with_cid(55555);
        let (r, notifier) = reconciler(Some(cell));

        assert_eq!(r.check(), CellVerdict::Unknown);
        r.reconcile();
        assert_eq!(notifier.messages.lock().len(), 1);
    }

    #[test]
    fn test_incomplete_identity() {
        let (r, _) = reconciler(Some(CellIdentity::network(262, 1)));
        assert_eq!(r.check(), CellVerdict::Incomplete);

        let (r, notifier) = reconciler(None);
        assert_eq!(r.check(), CellVerdict::Incomplete);
        r.reconcile();
        assert!(notifier.messages.lock().is_empty());
    }

    struct CountingReconciler(AtomicUsize);

    impl CellReconciler for CountingReconciler {
        fn reconcile(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_default_listener() {
        let reconciler = Arc::new(CountingReconciler(AtomicUsize::new(0)));
        let notifier = Arc::new(RecordingNotifier::default());

        ReconcileOnSuccess::new(reconciler.clone(), notifier.clone()).on_success();
        assert_eq!(reconciler.0.load(Ordering::SeqCst), 1);
        assert!(notifier.messages.lock().is_empty());

        ReconcileOnSuccess::new(reconciler.clone(), notifier.clone())
            .on_failure(&TaskError::Aborted("timeout".to_string()));
        assert_eq!(reconciler.0.load(Ordering::SeqCst), 1);
        assert_eq!(
            *notifier.messages.lock(),
            vec!["Task aborted: timeout".to_string()]
        );
    }
}
