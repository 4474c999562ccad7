//! Common types and utilities shared across CLI commands.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use clap::Args;
use cellguard::cell::CellIdentity;
use cellguard::config::ConfigFile;
use cellguard::connectivity::SysfsNetworkMonitor;
use cellguard::coord::GeoPoint;
use cellguard::platform::{CellReconciler, Platform, UserNotifier};
use cellguard::provider::AreaRequest;
use cellguard::reconcile::{MemoryTowerStore, ReconcileOnSuccess, ServingCellReconciler};
use cellguard::towers::TowerRecord;

use crate::console::{ConsoleNotifier, StaticServingCell};
use crate::error::CliError;

/// Device position arguments.
#[derive(Debug, Clone, Args)]
pub struct PositionArgs {
    /// Latitude in degrees (0 together with --lon 0 means "unknown")
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Search radius in kilometers (default from config)
    #[arg(long)]
    pub radius_km: Option<f64>,
}

impl PositionArgs {
    /// The position, `None` for the all-zero "unknown" value.
    pub fn location(&self) -> Result<Option<GeoPoint>, CliError> {
        GeoPoint::from_raw_degrees(self.lat, self.lon)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))
    }

    /// Radius from the arguments, else from the config.
    pub fn radius_km(&self, config: &ConfigFile) -> Result<f64, CliError> {
        let radius = self.radius_km.unwrap_or(config.ocid.radius_km);
        if radius.is_finite() && radius > 0.0 {
            Ok(radius)
        } else {
            Err(CliError::InvalidArgument(format!(
                "radius must be greater than zero, got {}",
                radius
            )))
        }
    }
}

/// Serving cell arguments.
#[derive(Debug, Clone, Default, Args)]
pub struct CellArgs {
    /// Mobile country code of the serving cell
    #[arg(long)]
    pub mcc: Option<u16>,

    /// Mobile network code of the serving cell
    #[arg(long)]
    pub mnc: Option<u16>,

    /// Location area code of the serving cell
    #[arg(long)]
    pub lac: Option<u32>,

    /// Cell id of the serving cell
    #[arg(long)]
    pub cid: Option<u32>,
}

impl CellArgs {
    /// The serving cell identity.
    pub fn identity(&self) -> CellIdentity {
        CellIdentity {
            mcc: self.mcc,
            mnc: self.mnc,
            lac: self.lac,
            cid: self.cid,
        }
    }
}

/// Builds the area request from position and cell arguments.
pub fn area_request(
    position: &PositionArgs,
    cell: &CellArgs,
    config: &ConfigFile,
) -> Result<AreaRequest, CliError> {
    Ok(AreaRequest::new(cell.identity(), position.location()?)
        .with_radius(position.radius_km(config)?))
}

/// Console collaborators plus an in-memory store.
pub struct ConsolePlatform {
    pub platform: Platform,
    pub store: Arc<MemoryTowerStore>,
    pub notifier: Arc<dyn UserNotifier>,
}

impl ConsolePlatform {
    /// Creates the collaborators for a command run.
    pub fn new() -> Self {
        let notifier: Arc<dyn UserNotifier> = Arc::new(ConsoleNotifier);
        let store = Arc::new(MemoryTowerStore::new());
        let platform = Platform::new(
            Arc::clone(&notifier),
            Arc::new(SysfsNetworkMonitor::new()),
            store.clone(),
        );
        Self {
            platform,
            store,
            notifier,
        }
    }

    /// Listener that rechecks `cell` once new data has been stored.
    pub fn reconcile_listener(&self, cell: CellIdentity) -> ReconcileOnSuccess {
        let reconciler: Arc<dyn CellReconciler> = Arc::new(ServingCellReconciler::new(
            Arc::new(StaticServingCell(cell)),
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
        ));
        ReconcileOnSuccess::new(reconciler, Arc::clone(&self.notifier))
    }
}

impl Default for ConsolePlatform {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes towers as CSV with a `getInArea`-style header.
pub fn write_towers_csv(path: &Path, towers: &[TowerRecord]) -> Result<(), CliError> {
    let io_err = |e: &dyn std::fmt::Display| {
        CliError::Io(format!("Failed to write {}: {}", path.display(), e))
    };

    let file = File::create(path).map_err(|e| io_err(&e))?;
    let mut writer = csv::Writer::from_writer(file);
    for tower in towers {
        writer.serialize(tower).map_err(|e| io_err(&e))?;
    }
    writer.flush().map_err(|e| io_err(&e))?;
    Ok(())
}

/// Prints a short table of towers.
pub fn print_towers(towers: &[TowerRecord]) {
    if towers.is_empty() {
        println!("No towers.");
        return;
    }
    println!(
        "{:<6} {:>4} {:>4} {:>8} {:>10} {:>10} {:>11}",
        "RADIO", "MCC", "MNC", "LAC", "CELL", "LAT", "LON"
    );
    for t in towers {
        println!(
            "{:<6} {:>4} {:>4} {:>8} {:>10} {:>10.5} {:>11.5}",
            t.radio.as_deref().unwrap_or("-"),
            t.mcc,
            t.mnc,
            t.lac,
            t.cellid,
            t.lat,
            t.lon
        );
    }
}
