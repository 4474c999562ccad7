//! Area download from OpenCellID.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::{AsyncHttpClient, OcidQuery, DEFAULT_BASE_URL, DEFAULT_RADIUS_KM};
use crate::cell::CellIdentity;
use crate::config::{ApiKey, OcidSettings};
use crate::connectivity::ConnectivityGate;
use crate::coord::{BoundingBox, GeoPoint};
use crate::platform::{Destination, Platform};
use crate::task::{
    spawn_task, CompletionListener, InFlight, Refusal, TaskError, TaskHandle, NO_API_KEY_MESSAGE,
    NO_NETWORK_BODY, NO_NETWORK_TITLE,
};
use crate::towers::parse_towers;

/// What to download: the area around a position, in the context of the
/// serving cell's network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaRequest {
    /// Serving cell; only MCC/MNC are used, and only when known.
    pub cell: CellIdentity,
    /// Center of the area, `None` while the position is unknown.
    pub location: Option<GeoPoint>,
    /// Radius around `location` in kilometers.
    pub radius_km: f64,
}

impl AreaRequest {
    /// Creates a request with the default radius.
    pub fn new(cell: CellIdentity, location: Option<GeoPoint>) -> Self {
        Self {
            cell,
            location,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }

    /// Sets the radius.
    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }
}

/// Result of a completed download.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSummary {
    /// Where the records were stored.
    pub destination: Destination,
    /// The queried area.
    pub bbox: BoundingBox,
    /// Records in the response.
    pub received: usize,
    /// Records accepted by the store.
    pub stored: usize,
}

/// Fetcher settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// API key; a fetch without one is refused.
    pub api_key: Option<ApiKey>,
    /// Server root.
    pub base_url: String,
    /// Radius used by [`OcidFetcher::fetch_current_position`].
    pub radius_km: f64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl FetchConfig {
    /// Creates a configuration with the given key and default endpoint.
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            api_key,
            ..Default::default()
        }
    }

    /// Sets the server root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the default radius.
    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }
}

impl From<&OcidSettings> for FetchConfig {
    fn from(settings: &OcidSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            radius_km: settings.radius_km,
        }
    }
}

/// Downloads tower data for an area and hands it to the tower store.
///
/// At most one download runs per fetcher; overlapping calls are refused
/// with [`Refusal::AlreadyInFlight`].
///
/// # Example
///
/// ```ignore
/// let fetcher = OcidFetcher::new(ReqwestClient::new()?, config, platform, Handle::current());
/// let request = AreaRequest::new(cell, Some(position));
/// let handle = fetcher.fetch(&request, Destination::MapView, ReconcileOnSuccess::new(..))?;
/// let summary = handle.wait().await?;
/// ```
pub struct OcidFetcher<C: AsyncHttpClient> {
    client: Arc<C>,
    config: FetchConfig,
    platform: Platform,
    gate: ConnectivityGate,
    in_flight: InFlight,
    runtime: Handle,
}

impl<C: AsyncHttpClient + 'static> OcidFetcher<C> {
    /// Creates a fetcher.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client for making requests
    /// * `config` - API key, endpoint and default radius
    /// * `platform` - Host collaborators
    /// * `runtime` - Runtime the downloads run on
    pub fn new(client: C, config: FetchConfig, platform: Platform, runtime: Handle) -> Self {
        let gate = ConnectivityGate::new(Arc::clone(&platform.network));
        Self {
            client: Arc::new(client),
            config,
            platform,
            gate,
            in_flight: InFlight::new(),
            runtime,
        }
    }

    /// Whether a download is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Starts a download of the area described by `request`.
    ///
    /// Preconditions are checked in order: connectivity, API key, location,
    /// no other download running. A refusal never makes a network call and
    /// never invokes `listener`.
    pub fn fetch<L: CompletionListener>(
        &self,
        request: &AreaRequest,
        destination: Destination,
        listener: L,
    ) -> Result<TaskHandle<FetchSummary>, Refusal> {
        if !self.gate.is_available() {
            self.platform
                .notifier
                .notify_user_blocking(NO_NETWORK_TITLE, NO_NETWORK_BODY);
            return Err(Refusal::NoNetwork);
        }

        let Some(api_key) = self.config.api_key.as_ref() else {
            self.platform.notifier.notify_user(NO_API_KEY_MESSAGE);
            return Err(Refusal::NoApiKey);
        };

        let Some(location) = request.location else {
            debug!("Location unknown, skipping OpenCellID download");
            return Err(Refusal::NoLocation);
        };

        let Some(permit) = self.in_flight.try_acquire() else {
            debug!("OpenCellID download already in flight");
            return Err(Refusal::AlreadyInFlight);
        };

        let bbox = BoundingBox::around(&location, request.radius_km);
        if bbox.crosses_antimeridian() {
            warn!(bbox = %bbox, "Query area crosses the antimeridian");
        }

        let query = OcidQuery::new(api_key, bbox, request.cell);
        let url = query.to_url(&self.config.base_url);
        info!(
            url = %query.redacted_url(&self.config.base_url),
            destination = destination.name(),
            "Requesting OpenCellID data"
        );

        let client = Arc::clone(&self.client);
        let store = Arc::clone(&self.platform.store);
        let work = async move {
            let body = client.get(&url).await?;
            let towers = parse_towers(body.as_slice())?;
            let stored = store.store_towers(destination, &towers)?;

            info!(
                received = towers.len(),
                stored,
                destination = destination.name(),
                "OpenCellID data stored"
            );
            Ok::<_, TaskError>(FetchSummary {
                destination,
                bbox,
                received: towers.len(),
                stored,
            })
        };

        Ok(spawn_task(&self.runtime, permit, listener, work))
    }

    /// Starts a download around the position reported by the platform's
    /// location source, using the configured radius.
    pub fn fetch_current_position<L: CompletionListener>(
        &self,
        cell: CellIdentity,
        destination: Destination,
        listener: L,
    ) -> Result<TaskHandle<FetchSummary>, Refusal> {
        let location = self
            .platform
            .location
            .as_ref()
            .and_then(|source| source.current_position());
        let request = AreaRequest::new(cell, location).with_radius(self.config.radius_km);
        self.fetch(&request, destination, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::tests::{CollectingStore, FixedNetwork, RecordingNotifier};
    use crate::platform::LocationSource;
    use crate::provider::{MockAsyncHttpClient, ProviderError};
    use crate::task::{listener, NoopListener};
    use crate::towers::tests::API_CSV;
    use parking_lot::Mutex;

    struct Fixture {
        notifier: Arc<RecordingNotifier>,
        store: Arc<CollectingStore>,
        client: MockAsyncHttpClient,
    }

    impl Fixture {
        fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self {
                notifier: Arc::new(RecordingNotifier::default()),
                store: Arc::new(CollectingStore::default()),
                client: MockAsyncHttpClient::new(response),
            }
        }

        fn fetcher(
            &self,
            network: FixedNetwork,
            key: Option<&str>,
        ) -> OcidFetcher<MockAsyncHttpClient> {
            let platform = Platform::new(
                self.notifier.clone(),
                Arc::new(network),
                self.store.clone(),
            );
            let config =
                FetchConfig::new(key.and_then(ApiKey::parse)).with_base_url("http://ocid.test");
            OcidFetcher::new(self.client.clone(), config, platform, Handle::current())
        }
    }

    fn berlin() -> Option<GeoPoint> {
        GeoPoint::from_degrees(52.52, 13.405).ok()
    }

    #[tokio::test]
    async fn test_offline_shows_dialog_and_skips_request() {
        let fx = Fixture::new(Ok(API_CSV.as_bytes().to_vec()));
        let fetcher = fx.fetcher(FixedNetwork::offline(), Some("key"));

        let result = fetcher.fetch(
            &AreaRequest::new(CellIdentity::network(262, 1), berlin()),
            Destination::MapView,
            NoopListener,
        );

        assert!(matches!(result, Err(Refusal::NoNetwork)));
        assert_eq!(fx.client.call_count(), 0);
        assert_eq!(
            *fx.notifier.dialogs.lock(),
            vec![(NO_NETWORK_TITLE.to_string(), NO_NETWORK_BODY.to_string())]
        );
        assert!(fx.notifier.messages.lock().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_notifies_without_request() {
        let fx = Fixture::new(Ok(API_CSV.as_bytes().to_vec()));
        let fetcher = fx.fetcher(FixedNetwork::online(), Some("NA"));

        let result = fetcher.fetch(
            &AreaRequest::new(CellIdentity::default(), berlin()),
            Destination::Background,
            NoopListener,
        );

        assert!(matches!(result, Err(Refusal::NoApiKey)));
        assert_eq!(fx.client.call_count(), 0);
        assert_eq!(*fx.notifier.messages.lock(), vec![NO_API_KEY_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_location_is_silent_noop() {
        let fx = Fixture::new(Ok(API_CSV.as_bytes().to_vec()));
        let fetcher = fx.fetcher(FixedNetwork::online(), Some("key"));

        let result = fetcher.fetch(
            &AreaRequest::new(CellIdentity::default(), None),
            Destination::Background,
            NoopListener,
        );

        assert!(matches!(result, Err(Refusal::NoLocation)));
        assert_eq!(fx.client.call_count(), 0);
        assert!(fx.notifier.messages.lock().is_empty());
        assert!(fx.notifier.dialogs.lock().is_empty());
    }

    #[tokio::test]
    async fn test_success_stores_and_notifies_once() {
        let fx = Fixture::new(Ok(API_CSV.as_bytes().to_vec()));
        let fetcher = fx.fetcher(FixedNetwork::online(), Some("key"));

        let events = Arc::new(Mutex::new(Vec::new()));
        let (s, f) = (Arc::clone(&events), Arc::clone(&events));
        let l = listener(
            move || s.lock().push("success"),
            move |_| f.lock().push("failure"),
        );

        let handle = fetcher
            .fetch(
                &AreaRequest::new(CellIdentity::network(262, 1), berlin()),
                Destination::MapView,
                l,
            )
            .unwrap();
        let summary = handle.wait().await.unwrap();

        assert_eq!(summary.received, 2);
        assert_eq!(summary.stored, 2);
        assert_eq!(*events.lock(), vec!["success"]);

        let batches = fx.store.batches.lock();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0, Destination::MapView);

        let requests = fx.client.requests.lock();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("http://ocid.test/cell/getInArea?key=key&BBOX="));
        assert!(requests[0].ends_with("&mcc=262&mnc=1&format=csv"));
        assert!(!fetcher.is_busy());
    }

    #[tokio::test]
    async fn test_http_failure_reaches_listener() {
        let fx = Fixture::new(Err(ProviderError::HttpError("connection refused".to_string())));
        let fetcher = fx.fetcher(FixedNetwork::online(), Some("key"));

        let failures = Arc::new(Mutex::new(Vec::new()));
        let f = Arc::clone(&failures);
        let l = listener(|| {}, move |e| f.lock().push(e.to_string()));

        let request = AreaRequest::new(CellIdentity::default(), berlin());
        let handle = fetcher.fetch(&request, Destination::MapView, l).unwrap();

        assert!(matches!(handle.wait().await, Err(TaskError::Provider(_))));
        let failures = failures.lock();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("connection refused"));
        assert!(fx.store.batches.lock().is_empty());
    }

    #[tokio::test]
    async fn test_garbage_body_is_parse_failure() {
        let fx = Fixture::new(Ok(b"<rsp stat=\"fail\"><err code=\"1\"/></rsp>".to_vec()));
        let fetcher = fx.fetcher(FixedNetwork::online(), Some("key"));

        let request = AreaRequest::new(CellIdentity::default(), berlin());
        let handle = fetcher
            .fetch(&request, Destination::MapView, NoopListener)
            .unwrap();
        assert!(matches!(handle.wait().await, Err(TaskError::Parse(_))));
    }

    #[tokio::test]
    async fn test_overlapping_fetch_is_refused() {
        let fx = Fixture::new(Ok(API_CSV.as_bytes().to_vec()));
        let fetcher = fx.fetcher(FixedNetwork::online(), Some("key"));
        let request = AreaRequest::new(CellIdentity::default(), berlin());

        // The current-thread test runtime does not poll the first task
        // until we await, so it is still in flight here.
        let first = fetcher.fetch(&request, Destination::MapView, NoopListener).unwrap();
        let second = fetcher.fetch(&request, Destination::MapView, NoopListener);
        assert!(matches!(second, Err(Refusal::AlreadyInFlight)));

        first.wait().await.unwrap();
        let third = fetcher.fetch(&request, Destination::MapView, NoopListener).unwrap();
        third.wait().await.unwrap();
        assert_eq!(fx.client.call_count(), 2);
    }

    struct FixedLocation(Option<GeoPoint>);

    impl LocationSource for FixedLocation {
        fn current_position(&self) -> Option<GeoPoint> {
            self.0
        }
    }

    #[tokio::test]
    async fn test_fetch_current_position_uses_location_source() {
        let fx = Fixture::new(Ok(API_CSV.as_bytes().to_vec()));
        let platform = Platform::new(
            fx.notifier.clone(),
            Arc::new(FixedNetwork::online()),
            fx.store.clone(),
        )
        .with_location(Arc::new(FixedLocation(berlin())));
        let config = FetchConfig::new(ApiKey::parse("key")).with_radius(5.0);
        let fetcher = OcidFetcher::new(fx.client.clone(), config, platform, Handle::current());

        let summary = fetcher
            .fetch_current_position(CellIdentity::default(), Destination::Background, NoopListener)
            .unwrap()
            .wait()
            .await
            .unwrap();

        let expected = BoundingBox::around(&berlin().unwrap(), 5.0);
        assert_eq!(summary.bbox, expected);
        assert_eq!(summary.destination, Destination::Background);
    }

    #[tokio::test]
    async fn test_fetch_current_position_without_source() {
        let fx = Fixture::new(Ok(API_CSV.as_bytes().to_vec()));
        let fetcher = fx.fetcher(FixedNetwork::online(), Some("key"));

        let result = fetcher.fetch_current_position(
            CellIdentity::default(),
            Destination::Background,
            NoopListener,
        );
        assert!(matches!(result, Err(Refusal::NoLocation)));
        assert_eq!(fx.client.call_count(), 0);
    }
}
