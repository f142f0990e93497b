/// Shared data types for the earthquake felt-intensity service.
///
/// Everything the ingest layer produces and the analysis layer consumes
/// lives here, along with the collaborator error types. Keeping them in one
/// place means the analysis code never imports anything from `ingest` or
/// `location`.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Epicenter position as reported by the feed: longitude and latitude in
/// degrees, depth in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
}

/// A single earthquake from one feed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Feed identifier, unique within a snapshot (e.g. `"ci40567890"`).
    pub id: String,
    pub magnitude: f64,
    /// Human-readable place, e.g. `"10 km NE of Ridgecrest, CA"`.
    pub place: String,
    /// Origin time in epoch milliseconds.
    pub time_ms: i64,
    pub position: Position,
    /// USGS event page.
    pub url: String,
}

impl Event {
    /// Origin time as a UTC timestamp, or `None` if `time_ms` is out of
    /// chrono's representable range.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time_ms).single()
    }
}

/// The point for which felt intensity is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl ObserverLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, accuracy: None }
    }
}

// ---------------------------------------------------------------------------
// Intensity results
// ---------------------------------------------------------------------------

/// Categorical felt-intensity label, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntensityLabel {
    Weak,
    Light,
    Moderate,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl IntensityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityLabel::Weak => "Weak",
            IntensityLabel::Light => "Light",
            IntensityLabel::Moderate => "Moderate",
            IntensityLabel::Strong => "Strong",
            IntensityLabel::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for IntensityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event evaluated against one observer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityResult {
    pub event: Event,
    /// Great-circle distance from the observer to the epicenter.
    pub distance_km: f64,
    /// Felt intensity on the 0-10 scale.
    pub intensity: f64,
    pub intensity_label: IntensityLabel,
}

// ---------------------------------------------------------------------------
// Feed time windows
// ---------------------------------------------------------------------------

/// Which USGS summary feed to read: past day, week or month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [TimeWindow::Day, TimeWindow::Week, TimeWindow::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "24h",
            TimeWindow::Week => "7d",
            TimeWindow::Month => "30d",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "24h" | "day" => Ok(TimeWindow::Day),
            "7d" | "week" => Ok(TimeWindow::Week),
            "30d" | "month" => Ok(TimeWindow::Month),
            other => Err(format!("unknown time window '{}' (expected 24h, 7d or 30d)", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Errors from the event-source collaborator.
///
/// Every variant renders the same user-facing message; the underlying cause
/// is kept for logging and is available through [`FeedError::detail`].
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Failed to fetch earthquake data. Please check your internet connection.")]
    Http(#[source] reqwest::Error),

    #[error("Failed to fetch earthquake data. Please check your internet connection.")]
    Status(u16),

    #[error("Failed to fetch earthquake data. Please check your internet connection.")]
    Decode(#[source] serde_json::Error),
}

impl FeedError {
    /// The cause behind the generic message, for logs.
    pub fn detail(&self) -> String {
        match self {
            FeedError::Http(e) => format!("transport error: {}", e),
            FeedError::Status(code) => format!("feed returned HTTP {}", code),
            FeedError::Decode(e) => format!("GeoJSON decoding failed: {}", e),
        }
    }
}

/// Errors from the location collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location access denied by user")]
    PermissionDenied,

    #[error("Location information unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Geolocation is not supported in this environment")]
    Unsupported,
}
