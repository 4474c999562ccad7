//! OpenCellID data provider.
//!
//! This module downloads cell tower reference data for the area around the
//! device from the OpenCellID `getInArea` API.
//!
//! ```text
//! AreaRequest ──► BoundingBox::around ──► OcidQuery::to_url
//!                                               │
//!                                               ▼
//!                 TowerStore ◄── parse_towers ◄── AsyncHttpClient::get
//!                      │
//!                      ▼
//!              CompletionListener
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cellguard::provider::{AreaRequest, FetchConfig, OcidFetcher, ReqwestClient};
//!
//! let fetcher = OcidFetcher::new(ReqwestClient::new()?, FetchConfig::new(key), platform, handle);
//! let summary = fetcher
//!     .fetch(&AreaRequest::new(cell, Some(position)), Destination::MapView, NoopListener)?
//!     .wait()
//!     .await?;
//! ```

mod fetcher;
mod http;
mod query;
mod types;

pub use fetcher::{AreaRequest, FetchConfig, FetchSummary, OcidFetcher};
pub use http::{AsyncHttpClient, ReqwestClient};
pub use query::OcidQuery;
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;

/// Default OpenCellID server root.
pub const DEFAULT_BASE_URL: &str = "http://www.opencellid.org";

/// Default search radius around the device in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 2.0;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
