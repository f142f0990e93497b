//! quakemon_service: felt-intensity ranking for recent earthquakes.
//!
//! Given a snapshot of the USGS real-time feed and an observer position,
//! estimates how strongly each event was felt there and ranks the events
//! strongest first.
//!
//! # Module structure
//!
//! ```text
//! quakemon_service
//! ├── model       — shared data types (Event, ObserverLocation, IntensityResult, FeedError, …)
//! ├── config      — service configuration loader (quakemon.toml)
//! ├── location    — observer-location providers, caching and acquisition timeout
//! ├── endpoint    — JSON HTTP API for felt-intensity queries
//! ├── ingest
//! │   ├── usgs    — USGS GeoJSON summary feed: URL construction, parsing, fetch
//! │   └── fixtures (test only) — representative feed payloads
//! └── analysis
//!     ├── distance  — haversine great-circle distance
//!     ├── intensity — felt-intensity model and labels
//!     └── ranking   — per-event evaluation and strongest-first ranking
//! ```

// Public modules
pub mod analysis;
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod location;
pub mod model;

pub use analysis::distance::distance_km;
pub use analysis::intensity::{felt_intensity, intensity_label};
pub use analysis::ranking::rank;
