/// HTTP endpoint for felt-intensity queries
///
/// Provides a small JSON API so dashboards and scripts can ask "what was
/// felt here?" without linking the crate.
///
/// Endpoints:
/// - GET /felt?lat={lat}&lon={lon}[&window=24h|7d|30d][&limit=N]
///     Ranked felt-intensity results for the observer. Without `lat`/`lon`
///     the server's default observer is used, if one is configured.
/// - GET /health - Service health check

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::ranking::rank;
use crate::ingest::usgs::{EventSource, FeedMetadata};
use crate::location::{LocationProvider, locate_within};
use crate::model::{IntensityResult, ObserverLocation, TimeWindow};

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Ranked results for one observer and one feed snapshot
#[derive(Debug, Serialize)]
pub struct FeltResponse {
    pub observer: ObserverLocation,
    pub window: TimeWindow,

    /// Feed envelope metadata, when the feed sent one
    pub feed: Option<FeedMetadata>,

    /// Events in the snapshot
    pub total_events: usize,

    /// Ranked results, strongest first, truncated to `limit` if given
    pub results: Vec<IntensityResult>,
}

// ---------------------------------------------------------------------------
// Query Parsing
// ---------------------------------------------------------------------------

/// Parsed `/felt` query string
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeltQuery {
    pub observer: Option<ObserverLocation>,
    pub window: Option<TimeWindow>,
    pub limit: Option<usize>,
}

/// Parses the query string of a `/felt` request (without the leading `?`).
pub fn parse_felt_query(query: &str) -> Result<FeltQuery, String> {
    let mut lat = None;
    let mut lon = None;
    let mut accuracy = None;
    let mut parsed = FeltQuery::default();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(raw)
            .map_err(|_| format!("query parameter '{}' is not valid UTF-8", key))?;

        match key {
            "lat" | "latitude" => lat = Some(parse_number(key, &value)?),
            "lon" | "lng" | "longitude" => lon = Some(parse_number(key, &value)?),
            "accuracy" => accuracy = Some(parse_number(key, &value)?),
            "window" => parsed.window = Some(value.parse::<TimeWindow>()?),
            "limit" => {
                let limit = value
                    .parse::<usize>()
                    .map_err(|_| format!("limit must be a non-negative integer, got '{}'", value))?;
                parsed.limit = Some(limit);
            }
            _ => {} // ignore unknown parameters
        }
    }

    parsed.observer = match (lat, lon) {
        (Some(latitude), Some(longitude)) => Some(ObserverLocation { latitude, longitude, accuracy }),
        (None, None) => None,
        _ => return Err("lat and lon must be given together".to_string()),
    };

    Ok(parsed)
}

fn parse_number(key: &str, value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{} must be a number, got '{}'", key, value))
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Everything a request handler needs: the event source, defaults, and an
/// optional server-side observer.
pub struct FeltService {
    source: Box<dyn EventSource>,
    default_window: TimeWindow,
    default_observer: Option<Arc<dyn LocationProvider + Send + Sync>>,
    location_timeout: Duration,
}

impl FeltService {
    pub fn new(source: Box<dyn EventSource>, default_window: TimeWindow) -> Self {
        Self {
            source,
            default_window,
            default_observer: None,
            location_timeout: Duration::from_secs(10),
        }
    }

    /// Observer used when a request has no `lat`/`lon`.
    pub fn with_default_observer(
        mut self,
        provider: Arc<dyn LocationProvider + Send + Sync>,
        timeout: Duration,
    ) -> Self {
        self.default_observer = Some(provider);
        self.location_timeout = timeout;
        self
    }

    /// Routes one request URL to a status code and JSON body.
    pub fn route(&self, url: &str) -> (u16, serde_json::Value) {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));

        match path {
            "/health" => (200, health_body()),
            "/felt" => self.handle_felt(query),
            _ => (
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": ["/health", "/felt?lat={lat}&lon={lon}"]
                }),
            ),
        }
    }

    /// Handle /felt endpoint
    fn handle_felt(&self, query: &str) -> (u16, serde_json::Value) {
        let query = match parse_felt_query(query) {
            Ok(q) => q,
            Err(e) => return (400, serde_json::json!({ "error": e })),
        };

        let observer = match query.observer {
            Some(observer) => observer,
            None => match &self.default_observer {
                Some(provider) => match locate_within(Arc::clone(provider), self.location_timeout) {
                    Ok(observer) => observer,
                    Err(e) => return (503, serde_json::json!({ "error": e.to_string() })),
                },
                None => {
                    return (
                        400,
                        serde_json::json!({ "error": "lat and lon query parameters are required" }),
                    );
                }
            },
        };

        let window = query.window.unwrap_or(self.default_window);

        let snapshot = match self.source.fetch_snapshot(window) {
            Ok(snapshot) => snapshot,
            Err(e) => return (502, serde_json::json!({ "error": e.to_string() })),
        };

        let mut results = rank(&snapshot.events, &observer);
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        let response = FeltResponse {
            observer,
            window,
            feed: snapshot.metadata,
            total_events: snapshot.events.len(),
            results,
        };

        match serde_json::to_value(&response) {
            Ok(body) => (200, body),
            Err(e) => (500, serde_json::json!({ "error": format!("serialization failed: {}", e) })),
        }
    }
}

fn health_body() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "service": "quakemon_service",
        "version": env!("CARGO_PKG_VERSION")
    })
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port
pub fn start_endpoint_server(port: u16, service: FeltService) -> Result<(), Box<dyn Error + Send + Sync>> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))?;

    info!(port, "HTTP endpoint listening");
    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET /felt?lat={{lat}}&lon={{lon}}[&window=24h|7d|30d][&limit=N]");
    println!("   GET /health - Service health check\n");

    for request in server.incoming_requests() {
        let (status, body) = if *request.method() == tiny_http::Method::Get {
            service.route(request.url())
        } else {
            (405, serde_json::json!({ "error": "Only GET is supported" }))
        };

        info!(method = ?request.method(), url = %request.url(), status, "request");

        if let Err(e) = request.respond(create_response(status, &body)) {
            warn!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());

    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
