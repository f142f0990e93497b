/// Observer-location providers.
///
/// The analysis layer only ever sees a complete `ObserverLocation`. Where
/// that comes from is decided here:
///
/// - `ManualLocation` — a fixed position supplied by the caller (CLI flags,
///   query parameters, config presets).
/// - `EnvLocation` — `QUAKEMON_LATITUDE` / `QUAKEMON_LONGITUDE` /
///   `QUAKEMON_ACCURACY`, after loading `.env`.
/// - `CachedLocation` — wraps another provider and reuses its last fix
///   while it is younger than the maximum age.
/// - `locate_within` — runs a provider on a worker thread and gives up
///   after the acquisition timeout.
///
/// Failures are one of the four `LocationError` causes and are meant to be
/// shown to the user as-is.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::model::{LocationError, ObserverLocation};

pub const LATITUDE_VAR: &str = "QUAKEMON_LATITUDE";
pub const LONGITUDE_VAR: &str = "QUAKEMON_LONGITUDE";
pub const ACCURACY_VAR: &str = "QUAKEMON_ACCURACY";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Acquisition options, mirroring what a platform geolocation API accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationOptions {
    /// How long to wait for a fix before failing with `Timeout`.
    pub timeout: Duration,
    /// How old a cached fix may be and still be reused.
    pub maximum_age: Duration,
    /// Ask the provider for its best accuracy. Providers that cannot
    /// trade accuracy for speed ignore it.
    pub high_accuracy: bool,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(5 * 60),
            high_accuracy: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Source of the observer's current position.
pub trait LocationProvider {
    fn current_location(&self) -> Result<ObserverLocation, LocationError>;
}

/// A caller-supplied position.
#[derive(Debug, Clone, Copy)]
pub struct ManualLocation(pub ObserverLocation);

impl LocationProvider for ManualLocation {
    fn current_location(&self) -> Result<ObserverLocation, LocationError> {
        Ok(self.0)
    }
}

/// Position read from environment variables.
///
/// Values are captured when the provider is built so lookups are cheap and
/// repeatable. Both coordinates unset means this environment has no
/// location source at all (`Unsupported`); anything partial, unparseable or
/// out of range is `PositionUnavailable`.
#[derive(Debug, Clone, Default)]
pub struct EnvLocation {
    latitude: Option<String>,
    longitude: Option<String>,
    accuracy: Option<String>,
}

impl EnvLocation {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            latitude: std::env::var(LATITUDE_VAR).ok(),
            longitude: std::env::var(LONGITUDE_VAR).ok(),
            accuracy: std::env::var(ACCURACY_VAR).ok(),
        }
    }

    pub fn from_values(
        latitude: Option<&str>,
        longitude: Option<&str>,
        accuracy: Option<&str>,
    ) -> Self {
        Self {
            latitude: latitude.map(str::to_string),
            longitude: longitude.map(str::to_string),
            accuracy: accuracy.map(str::to_string),
        }
    }
}

impl LocationProvider for EnvLocation {
    fn current_location(&self) -> Result<ObserverLocation, LocationError> {
        let (lat, lon) = match (&self.latitude, &self.longitude) {
            (None, None) => return Err(LocationError::Unsupported),
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                warn!("only one of {} / {} is set", LATITUDE_VAR, LONGITUDE_VAR);
                return Err(LocationError::PositionUnavailable);
            }
        };

        let latitude = parse_coordinate(lat, 90.0).ok_or_else(|| {
            warn!(value = %lat, "invalid {}", LATITUDE_VAR);
            LocationError::PositionUnavailable
        })?;
        let longitude = parse_coordinate(lon, 180.0).ok_or_else(|| {
            warn!(value = %lon, "invalid {}", LONGITUDE_VAR);
            LocationError::PositionUnavailable
        })?;

        // A bad accuracy value only loses the estimate.
        let accuracy = self
            .accuracy
            .as_deref()
            .and_then(|a| a.trim().parse::<f64>().ok())
            .filter(|a| a.is_finite() && *a >= 0.0);

        Ok(ObserverLocation { latitude, longitude, accuracy })
    }
}

fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
}

/// Reuses the wrapped provider's last successful fix while it is younger
/// than `maximum_age`. Failures are never cached.
pub struct CachedLocation<P> {
    inner: P,
    maximum_age: Duration,
    last_fix: Mutex<Option<(DateTime<Utc>, ObserverLocation)>>,
}

impl<P: LocationProvider> CachedLocation<P> {
    pub fn new(inner: P, maximum_age: Duration) -> Self {
        Self { inner, maximum_age, last_fix: Mutex::new(None) }
    }

    /// Same as `current_location`, with an explicit clock.
    pub fn current_location_at(&self, now: DateTime<Utc>) -> Result<ObserverLocation, LocationError> {
        let mut last_fix = self.last_fix.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some((taken_at, location)) = *last_fix {
            let age = (now - taken_at).to_std().unwrap_or(Duration::ZERO);
            if age < self.maximum_age {
                debug!(age_secs = age.as_secs(), "reusing cached location");
                return Ok(location);
            }
        }

        let location = self.inner.current_location()?;
        *last_fix = Some((now, location));
        Ok(location)
    }
}

impl<P: LocationProvider> LocationProvider for CachedLocation<P> {
    fn current_location(&self) -> Result<ObserverLocation, LocationError> {
        self.current_location_at(Utc::now())
    }
}

// ---------------------------------------------------------------------------
// Acquisition timeout
// ---------------------------------------------------------------------------

/// Asks `provider` for a position on a worker thread and waits at most
/// `timeout` for the answer.
///
/// A provider that is still working when the timeout expires is left to
/// finish on its own; its eventual answer is discarded.
pub fn locate_within<P>(provider: Arc<P>, timeout: Duration) -> Result<ObserverLocation, LocationError>
where
    P: LocationProvider + Send + Sync + ?Sized + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        // Receiver is gone once we've timed out.
        let _ = tx.send(provider.current_location());
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "location request timed out");
            Err(LocationError::Timeout)
        }
        Err(RecvTimeoutError::Disconnected) => {
            warn!("location provider exited without an answer");
            Err(LocationError::PositionUnavailable)
        }
    }
}
