//! File import task.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info};

use super::ImportError;
use crate::cell::CellIdentity;
use crate::connectivity::ConnectivityGate;
use crate::coord::{BoundingBox, GeoPoint, EARTH_RADIUS_KM};
use crate::platform::{Destination, Platform};
use crate::provider::AreaRequest;
use crate::task::{
    spawn_task, CompletionListener, InFlight, Refusal, TaskError, TaskHandle, NO_NETWORK_BODY,
    NO_NETWORK_TITLE,
};
use crate::towers::{parse_towers, TowerRecord};

/// Result of a completed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// The imported file.
    pub path: PathBuf,
    /// Rows in the file.
    pub read: usize,
    /// Rows on the serving network and inside the radius.
    pub kept: usize,
    /// Rows accepted by the store.
    pub stored: usize,
}

/// Imports tower records from a file on a blocking worker.
///
/// Shares the fetcher's preconditions except the API key, and its
/// single-in-flight rule.
pub struct ImportTask {
    platform: Platform,
    gate: ConnectivityGate,
    in_flight: InFlight,
    runtime: Handle,
}

impl ImportTask {
    /// Creates an import task running on `runtime`.
    pub fn new(platform: Platform, runtime: Handle) -> Self {
        let gate = ConnectivityGate::new(Arc::clone(&platform.network));
        Self {
            platform,
            gate,
            in_flight: InFlight::new(),
            runtime,
        }
    }

    /// Whether an import is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Starts importing `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - CSV file, plain or gzip-compressed
    /// * `request` - Serving cell, location and radius used to filter rows
    /// * `listener` - Receives the outcome once the import finished
    pub fn start<L: CompletionListener>(
        &self,
        path: impl AsRef<Path>,
        request: &AreaRequest,
        listener: L,
    ) -> Result<TaskHandle<ImportSummary>, Refusal> {
        if !self.gate.is_available() {
            self.platform
                .notifier
                .notify_user_blocking(NO_NETWORK_TITLE, NO_NETWORK_BODY);
            return Err(Refusal::NoNetwork);
        }

        let Some(location) = request.location else {
            debug!("Location unknown, skipping import");
            return Err(Refusal::NoLocation);
        };

        let Some(permit) = self.in_flight.try_acquire() else {
            debug!("Import already in flight");
            return Err(Refusal::AlreadyInFlight);
        };

        let path = path.as_ref().to_path_buf();
        info!(
            path = %path.display(),
            location = %location,
            radius_km = request.radius_km,
            cell = %request.cell,
            "Importing tower data"
        );

        let cell = request.cell;
        let radius_km = request.radius_km;
        let store = Arc::clone(&self.platform.store);
        let work = async move {
            let (read, kept) = {
                let path = path.clone();
                tokio::task::spawn_blocking(move || read_filtered(&path, cell, location, radius_km))
                    .await
                    .map_err(|e| TaskError::Aborted(e.to_string()))??
            };
            let stored = store.store_towers(Destination::Import, &kept)?;

            info!(read, kept = kept.len(), stored, "Import finished");
            Ok::<_, TaskError>(ImportSummary {
                path,
                read,
                kept: kept.len(),
                stored,
            })
        };

        Ok(spawn_task(&self.runtime, permit, listener, work))
    }
}

/// Reads `path` and keeps the rows matching the serving network inside
/// the search circle. Returns the total row count and the kept rows.
fn read_filtered(
    path: &Path,
    cell: CellIdentity,
    center: GeoPoint,
    radius_km: f64,
) -> Result<(usize, Vec<TowerRecord>), ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let towers = parse_towers(file).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let read = towers.len();
    let bbox = BoundingBox::around(&center, radius_km);
    let kept = towers
        .into_iter()
        .filter(|t| cell.matches_network(t.mcc, t.mnc))
        .filter(|t| {
            t.position().is_some_and(|p| {
                bbox.contains(&p) && center.distance_to(&p, EARTH_RADIUS_KM) <= radius_km
            })
        })
        .collect();
    Ok((read, kept))
}
