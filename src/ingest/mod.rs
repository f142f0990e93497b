/// Event-source collaborators.
///
/// - `usgs`     — USGS GeoJSON summary feed: URL construction, parsing, fetch.
/// - `fixtures` — (test only) representative feed payloads.

pub mod usgs;

#[cfg(test)]
pub(crate) mod fixtures;
