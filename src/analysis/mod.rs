/// Felt-intensity analysis. Pure functions only: no I/O, no shared state.
///
/// Submodules:
/// - `distance`  — haversine great-circle distance.
/// - `intensity` — magnitude + distance → 0-10 score, score → label.
/// - `ranking`   — evaluates a snapshot against one observer and orders
///                 the results strongest first.

pub mod distance;
pub mod intensity;
pub mod ranking;
