//! OpenCellID `getInArea` query.
//!
//! # URL Pattern
//!
//! `{base}/cell/getInArea?key={key}&BBOX={latmin},{lonmin},{latmax},{lonmax}[&mcc={mcc}][&mnc={mnc}]&format=csv`
//!
//! - `mcc`/`mnc` are only sent when the serving cell reported them
//! - The LAC and cell id are never sent; the whole area is requested

use crate::cell::CellIdentity;
use crate::config::ApiKey;
use crate::coord::BoundingBox;

/// Path of the area query below the base URL.
const GET_IN_AREA_PATH: &str = "/cell/getInArea";

/// Response format requested from the server.
const FORMAT: &str = "csv";

/// A single area query against OpenCellID.
#[derive(Debug, Clone)]
pub struct OcidQuery<'a> {
    api_key: &'a ApiKey,
    bbox: BoundingBox,
    cell: CellIdentity,
}

impl<'a> OcidQuery<'a> {
    /// Creates a query for all towers inside `bbox`, optionally filtered
    /// by the known network part of `cell`.
    pub fn new(api_key: &'a ApiKey, bbox: BoundingBox, cell: CellIdentity) -> Self {
        Self {
            api_key,
            bbox,
            cell,
        }
    }

    /// The area being queried.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Builds the request URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Server root without trailing slash, e.g. `http://www.opencellid.org`
    pub fn to_url(&self, base_url: &str) -> String {
        self.build(base_url, self.api_key.as_str())
    }

    /// Same as [`to_url`](Self::to_url) with the key masked, for logging.
    pub fn redacted_url(&self, base_url: &str) -> String {
        self.build(base_url, "****")
    }

    fn build(&self, base_url: &str, key: &str) -> String {
        let mut url = format!(
            "{}{}?key={}&BBOX={}",
            base_url.trim_end_matches('/'),
            GET_IN_AREA_PATH,
            key,
            self.bbox.to_bbox_param()
        );
        if let Some(mcc) = self.cell.mcc {
            url.push_str(&format!("&mcc={}", mcc));
        }
        if let Some(mnc) = self.cell.mnc {
            url.push_str(&format!("&mnc={}", mnc));
        }
        url.push_str("&format=");
        url.push_str(FORMAT);
        url
    }
}
