/// USGS earthquake summary feed client.
///
/// Handles URL construction, GeoJSON parsing and the blocking fetch for the
/// real-time summary feeds:
///   https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/
///
/// The feed is a GeoJSON `FeatureCollection`. Each feature carries a large,
/// open-ended `properties` object; only the handful of fields the analysis
/// needs are extracted here and everything else is ignored. See
/// `fixtures.rs` for annotated examples of the response structure.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::model::{Event, FeedError, Position, TimeWindow};

/// Place shown when the feed omits one.
pub const UNKNOWN_PLACE: &str = "Unknown location";

pub const DEFAULT_BASE_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Serde structures for GeoJSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    metadata: Option<FeedMetadata>,
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    id: Option<String>,
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

/// The subset of `properties` we read. Unknown keys (`felt`, `cdi`, `mmi`,
/// `alert`, `tsunami`, `sig`, ...) are dropped by serde.
#[derive(Deserialize, Default)]
struct Properties {
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

/// Snapshot-level metadata from the feed envelope.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedMetadata {
    /// Generation time in epoch milliseconds.
    pub generated: Option<i64>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub status: Option<u16>,
    pub api: Option<String>,
    pub count: Option<u64>,
}

/// One parsed feed snapshot.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub metadata: Option<FeedMetadata>,
    pub events: Vec<Event>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the summary feed URL for a time window.
///
/// ```
/// use quakemon_service::ingest::usgs::{feed_url, DEFAULT_BASE_URL};
/// use quakemon_service::model::TimeWindow;
///
/// let url = feed_url(DEFAULT_BASE_URL, TimeWindow::Week);
/// assert!(url.ends_with("/all_week.geojson"));
/// ```
pub fn feed_url(base_url: &str, window: TimeWindow) -> String {
    let file = match window {
        TimeWindow::Day => "all_day.geojson",
        TimeWindow::Week => "all_week.geojson",
        TimeWindow::Month => "all_month.geojson",
    };
    format!("{}/{}", base_url.trim_end_matches('/'), file)
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a feed body into events plus envelope metadata.
///
/// Missing or null `mag` becomes 0, `place` becomes [`UNKNOWN_PLACE`], `url`
/// becomes an empty string and a missing depth becomes 0. Features without
/// an id, a time or at least a longitude/latitude pair are skipped with a
/// warning rather than failing the whole snapshot.
///
/// # Errors
/// - `FeedError::Decode` — the body is not a GeoJSON feature collection.
pub fn parse_snapshot(json: &str) -> Result<FeedSnapshot, FeedError> {
    let collection: FeatureCollection = serde_json::from_str(json).map_err(FeedError::Decode)?;

    let mut events = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let Some(id) = feature.id else {
            warn!("skipping feature without an id");
            continue;
        };

        let properties = feature.properties.unwrap_or_default();

        let Some(time_ms) = properties.time else {
            warn!(%id, "skipping feature without an origin time");
            continue;
        };

        let coordinates = feature.geometry.map(|g| g.coordinates).unwrap_or_default();
        let (longitude, latitude) = match coordinates.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            _ => {
                warn!(%id, "skipping feature without a usable position");
                continue;
            }
        };
        let depth_km = coordinates.get(2).copied().unwrap_or(0.0);

        let place = properties
            .place
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string());

        events.push(Event {
            id,
            magnitude: properties.mag.unwrap_or(0.0),
            place,
            time_ms,
            position: Position { longitude, latitude, depth_km },
            url: properties.url.unwrap_or_default(),
        });
    }

    if let Some(meta) = &collection.metadata {
        debug!(
            title = meta.title.as_deref().unwrap_or("-"),
            count = meta.count.unwrap_or(0),
            parsed = events.len(),
            "parsed feed snapshot"
        );
    }

    Ok(FeedSnapshot { metadata: collection.metadata, events })
}

/// Parses a feed body into events, discarding envelope metadata.
pub fn parse_feed(json: &str) -> Result<Vec<Event>, FeedError> {
    parse_snapshot(json).map(|snapshot| snapshot.events)
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Anything that can produce a feed snapshot for a time window.
pub trait EventSource {
    fn fetch_snapshot(&self, window: TimeWindow) -> Result<FeedSnapshot, FeedError>;

    fn fetch(&self, window: TimeWindow) -> Result<Vec<Event>, FeedError> {
        self.fetch_snapshot(window).map(|snapshot| snapshot.events)
    }
}

/// Blocking HTTP client for the USGS summary feeds.
pub struct UsgsFeed {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl UsgsFeed {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quakemon_service/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FeedError::Http)?;

        Ok(Self { client, base_url: base_url.into() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn try_fetch(&self, url: &str) -> Result<FeedSnapshot, FeedError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/geo+json, application/json")
            .send()
            .map_err(FeedError::Http)?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.text().map_err(FeedError::Http)?;
        parse_snapshot(&body)
    }
}

impl EventSource for UsgsFeed {
    fn fetch_snapshot(&self, window: TimeWindow) -> Result<FeedSnapshot, FeedError> {
        let url = feed_url(&self.base_url, window);
        info!(%url, %window, "fetching earthquake feed");

        match self.try_fetch(&url) {
            Ok(snapshot) => {
                info!(events = snapshot.events.len(), %window, "feed snapshot received");
                Ok(snapshot)
            }
            Err(e) => {
                error!(%url, detail = %e.detail(), "error fetching earthquake data");
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    // --- URL construction ---------------------------------------------------

    #[test]
    fn test_feed_url_per_window() {
        assert_eq!(
            feed_url(DEFAULT_BASE_URL, TimeWindow::Day),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson"
        );
        assert_eq!(
            feed_url(DEFAULT_BASE_URL, TimeWindow::Week),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"
        );
        assert_eq!(
            feed_url(DEFAULT_BASE_URL, TimeWindow::Month),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson"
        );
    }

    #[test]
    fn test_feed_url_tolerates_trailing_slash() {
        let url = feed_url("http://localhost:9000/feeds/", TimeWindow::Day);
        assert_eq!(url, "http://localhost:9000/feeds/all_day.geojson");
    }

    // --- Parsing: happy path ------------------------------------------------

    #[test]
    fn test_parse_southern_california_events_and_fields() {
        let events = parse_feed(fixture_southern_california_json())
            .expect("valid fixture should parse without error");
        assert_eq!(events.len(), 3);

        let mainshock = events
            .iter()
            .find(|e| e.id == "ci38457511")
            .expect("should find the Ridgecrest mainshock");

        assert!((mainshock.magnitude - 7.1).abs() < 1e-9);
        assert_eq!(mainshock.place, "2019 Ridgecrest Earthquake Sequence");
        assert_eq!(mainshock.time_ms, 1_562_383_193_040);
        assert!((mainshock.position.longitude - -117.5993833).abs() < 1e-9);
        assert!((mainshock.position.latitude - 35.7695).abs() < 1e-9);
        assert!((mainshock.position.depth_km - 8.0).abs() < 1e-9);
        assert_eq!(mainshock.url, "https://earthquake.usgs.gov/earthquakes/eventpage/ci38457511");
    }

    #[test]
    fn test_parse_preserves_feed_order() {
        let events = parse_feed(fixture_southern_california_json()).expect("should parse");
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ci38457847", "ci38457511", "ak0199ux4mfj"]);
    }

    #[test]
    fn test_parse_snapshot_reads_metadata() {
        let snapshot = parse_snapshot(fixture_southern_california_json()).expect("should parse");
        let meta = snapshot.metadata.expect("fixture has metadata");
        assert_eq!(meta.title.as_deref(), Some("USGS All Earthquakes, Past Day"));
        assert_eq!(meta.count, Some(3));
        assert_eq!(meta.status, Some(200));
    }

    #[test]
    fn test_parse_empty_feature_collection_is_empty_snapshot() {
        let events = parse_feed(fixture_empty_feed_json()).expect("empty feed is valid");
        assert!(events.is_empty());
    }

    // --- Parsing: lenient defaults ------------------------------------------

    #[test]
    fn test_parse_missing_magnitude_defaults_to_zero() {
        let events = parse_feed(fixture_missing_fields_json()).expect("should parse");
        let e = events.iter().find(|e| e.id == "hv74103036").expect("should keep event");
        assert_eq!(e.magnitude, 0.0);
    }

    #[test]
    fn test_parse_missing_place_defaults_to_unknown() {
        let events = parse_feed(fixture_missing_fields_json()).expect("should parse");
        let e = events.iter().find(|e| e.id == "hv74103036").expect("should keep event");
        assert_eq!(e.place, UNKNOWN_PLACE);

        let empty_place = events.iter().find(|e| e.id == "nc73950001").expect("should keep event");
        assert_eq!(empty_place.place, "Unknown location");
    }

    #[test]
    fn test_parse_missing_url_defaults_to_empty() {
        let events = parse_feed(fixture_missing_fields_json()).expect("should parse");
        let e = events.iter().find(|e| e.id == "hv74103036").expect("should keep event");
        assert_eq!(e.url, "");
    }

    #[test]
    fn test_parse_two_coordinate_geometry_defaults_depth() {
        let events = parse_feed(fixture_missing_fields_json()).expect("should parse");
        let e = events.iter().find(|e| e.id == "nc73950001").expect("should keep event");
        assert_eq!(e.position.depth_km, 0.0);
        assert!((e.position.latitude - 38.8).abs() < 1e-9);
    }

    #[test]
    fn test_parse_skips_features_without_position_or_time() {
        let events = parse_feed(fixture_missing_fields_json()).expect("should parse");
        assert!(events.iter().all(|e| e.id != "us-no-geometry"));
        assert!(events.iter().all(|e| e.id != "us-no-time"));
        assert_eq!(events.len(), 2);
    }

    // --- Parsing: error cases -----------------------------------------------

    #[test]
    fn test_parse_malformed_json_returns_decode_error() {
        let result = parse_feed("{ this is not valid json }}}");
        assert!(
            matches!(result, Err(FeedError::Decode(_))),
            "malformed JSON should return Decode, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_empty_string_returns_decode_error() {
        assert!(matches!(parse_feed(""), Err(FeedError::Decode(_))));
    }

    #[test]
    fn test_parse_missing_features_array_returns_decode_error() {
        let json = r#"{ "type": "FeatureCollection", "metadata": { "count": 0 } }"#;
        assert!(matches!(parse_feed(json), Err(FeedError::Decode(_))));
    }

    #[test]
    fn test_decode_error_shows_generic_message() {
        let err = parse_feed("nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch earthquake data. Please check your internet connection."
        );
        assert!(err.detail().starts_with("GeoJSON decoding failed"));
    }

    // --- Fetching -----------------------------------------------------------

    #[test]
    fn test_fetch_from_unreachable_host_is_generic_feed_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let feed = UsgsFeed::new("http://127.0.0.1:9", Duration::from_secs(2))
            .expect("client should build");
        let err = feed.fetch(TimeWindow::Day).expect_err("fetch should fail");
        assert!(matches!(err, FeedError::Http(_)));
        assert_eq!(
            err.to_string(),
            "Failed to fetch earthquake data. Please check your internet connection."
        );
    }
}
