/// Felt-intensity model: magnitude and distance to a 0-10 score, and the
/// score to a categorical label.
///
/// The attenuation curve is a closed-form approximation, not a calibrated
/// seismological model:
///
/// ```text
/// I = M - 3 * log10(max(d_km, 1)) - 3        clamped to [0, 10]
/// ```
///
/// Distances under 1 km are floored to 1 km so `log10` never sees zero and
/// intensity is capped at the epicenter.

use crate::model::IntensityLabel;

pub const MIN_INTENSITY: f64 = 0.0;
pub const MAX_INTENSITY: f64 = 10.0;

/// Distance floor applied before taking the logarithm.
pub const MIN_DISTANCE_KM: f64 = 1.0;

// Lower bounds (inclusive) of each label above Weak.
const LIGHT_FROM: f64 = 2.0;
const MODERATE_FROM: f64 = 4.0;
const STRONG_FROM: f64 = 6.0;
const VERY_STRONG_FROM: f64 = 8.0;

/// Felt intensity at `distance_km` from an event of `magnitude`.
///
/// Always within [0, 10] for numeric input. A NaN magnitude or distance
/// yields NaN.
pub fn felt_intensity(magnitude: f64, distance_km: f64) -> f64 {
    // f64::max would swallow a NaN distance; keep it.
    let distance = if distance_km < MIN_DISTANCE_KM { MIN_DISTANCE_KM } else { distance_km };
    let intensity = magnitude - 3.0 * distance.log10() - 3.0;
    intensity.clamp(MIN_INTENSITY, MAX_INTENSITY)
}

/// Label for a felt-intensity score.
///
/// Bands are inclusive-lower, exclusive-upper: `[0,2)` Weak, `[2,4)`
/// Light, `[4,6)` Moderate, `[6,8)` Strong, `[8,10]` Very Strong.
pub fn intensity_label(score: f64) -> IntensityLabel {
    if score < LIGHT_FROM {
        IntensityLabel::Weak
    } else if score < MODERATE_FROM {
        IntensityLabel::Light
    } else if score < STRONG_FROM {
        IntensityLabel::Moderate
    } else if score < VERY_STRONG_FROM {
        IntensityLabel::Strong
    } else {
        IntensityLabel::VeryStrong
    }
}
