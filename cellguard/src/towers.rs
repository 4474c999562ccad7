//! OpenCellID tower records.
//!
//! Two CSV dialects are accepted, distinguished by their header row:
//!
//! - The `getInArea` API response:
//!   `lat,lon,mcc,mnc,lac,cellid,averageSignalStrength,range,samples,changeable,radio,...`
//! - The bulk export (`cell_towers.csv`):
//!   `radio,mcc,net,area,cell,unit,lon,lat,range,samples,changeable,created,updated,averageSignal`
//!
//! Columns not modelled by [`TowerRecord`] are ignored. Input may be plain
//! text or gzip-compressed; compression is detected from the magic bytes.

use std::io::{BufRead, BufReader, Read};

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::coord::GeoPoint;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// One cell tower as known to OpenCellID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerRecord {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Mobile country code.
    pub mcc: u16,
    /// Mobile network code.
    #[serde(alias = "net")]
    pub mnc: u16,
    /// Location area code.
    #[serde(alias = "area")]
    pub lac: u32,
    /// Cell id.
    #[serde(alias = "cell")]
    pub cellid: u32,
    /// Radio technology (GSM, UMTS, LTE, ...).
    #[serde(default)]
    pub radio: Option<String>,
    /// Estimated coverage range in meters.
    #[serde(default)]
    pub range: Option<u32>,
    /// Number of measurements the position is based on.
    #[serde(default)]
    pub samples: Option<u32>,
    /// Average signal strength in dBm.
    #[serde(default, rename = "averageSignalStrength", alias = "averageSignal")]
    pub average_signal: Option<i32>,
}

impl TowerRecord {
    /// Tower position, `None` if the coordinates are out of range.
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::from_degrees(self.lat, self.lon).ok()
    }
}

/// Errors while parsing tower CSV data.
#[derive(Debug, thiserror::Error)]
pub enum TowerParseError {
    /// I/O error while reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV row.
    #[error("Invalid tower record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    /// The input has no header row with the required columns.
    #[error("Missing CSV header (expected lat, lon, mcc, mnc/net, lac/area, cellid/cell)")]
    MissingHeader,
}

/// Parses tower records from plain or gzip-compressed CSV.
///
/// Parsing stops at the first malformed row.
pub fn parse_towers<R: Read>(reader: R) -> Result<Vec<TowerRecord>, TowerParseError> {
    let mut reader = BufReader::new(reader);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        parse_csv(GzDecoder::new(reader))
    } else {
        parse_csv(reader)
    }
}

fn parse_csv<R: Read>(reader: R) -> Result<Vec<TowerRecord>, TowerParseError> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv
        .headers()
        .map_err(|e| invalid_record(1, &e))?
        .clone();
    if !has_required_columns(&headers) {
        return Err(TowerParseError::MissingHeader);
    }

    let mut towers = Vec::new();
    for row in csv.deserialize::<TowerRecord>() {
        match row {
            Ok(tower) => towers.push(tower),
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                return Err(invalid_record(line, &e));
            }
        }
    }
    Ok(towers)
}

fn has_required_columns(headers: &csv::StringRecord) -> bool {
    let has = |names: &[&str]| headers.iter().any(|h| names.contains(&h));
    has(&["lat"])
        && has(&["lon"])
        && has(&["mcc"])
        && has(&["mnc", "net"])
        && has(&["lac", "area"])
        && has(&["cellid", "cell"])
}

fn invalid_record(line: u64, err: &csv::Error) -> TowerParseError {
    if let csv::ErrorKind::Io(io) = err.kind() {
        return TowerParseError::Io(std::io::Error::new(io.kind(), io.to_string()));
    }
    TowerParseError::InvalidRecord {
        line,
        reason: err.to_string(),
    }
}
