/// Test fixtures: representative GeoJSON payloads from the USGS summary feed.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parser. They reflect the real envelope returned by:
///   https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson
///
/// Feed shape:
///   response.metadata                   — title, count, generated (epoch ms)
///   response.features[]
///     .id                               — event id (string)
///     .properties.mag                   — magnitude, may be null
///     .properties.place                 — place string, may be null
///     .properties.time                  — origin time, epoch ms
///     .properties.url                   — event page
///     .properties.*                     — dozens of other keys we ignore
///     .geometry.coordinates             — [longitude, latitude, depth_km]
///
/// Note: coordinates are longitude first. Mixing that up puts Ridgecrest in
/// the Southern Ocean.

/// 2019 Ridgecrest sequence: an M4.4 aftershock listed ahead of the M7.1
/// mainshock, plus an unrelated small Alaska event. Properties carry the
/// usual extra keys to prove they are ignored.
#[cfg(test)]
pub(crate) fn fixture_southern_california_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "metadata": {
        "generated": 1562386800000,
        "url": "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson",
        "title": "USGS All Earthquakes, Past Day",
        "status": 200,
        "api": "1.10.3",
        "count": 3
      },
      "features": [
        {
          "type": "Feature",
          "properties": {
            "mag": 4.4,
            "place": "14km NNE of Ridgecrest, CA",
            "time": 1562384622340,
            "updated": 1562385821040,
            "tz": null,
            "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ci38457847",
            "felt": 12,
            "cdi": 3.4,
            "mmi": null,
            "alert": null,
            "status": "reviewed",
            "tsunami": 0,
            "sig": 298,
            "net": "ci",
            "types": ",dyfi,origin,phase-data,"
          },
          "geometry": { "type": "Point", "coordinates": [-117.6273, 35.7545, 6.62] },
          "id": "ci38457847"
        },
        {
          "type": "Feature",
          "properties": {
            "mag": 7.1,
            "place": "2019 Ridgecrest Earthquake Sequence",
            "time": 1562383193040,
            "updated": 1562386211040,
            "tz": null,
            "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ci38457511",
            "felt": 20231,
            "cdi": 8.2,
            "mmi": 8.6,
            "alert": "yellow",
            "status": "reviewed",
            "tsunami": 0,
            "sig": 2158,
            "net": "ci",
            "types": ",dyfi,finite-fault,losspager,moment-tensor,shakemap,"
          },
          "geometry": { "type": "Point", "coordinates": [-117.5993833, 35.7695, 8.0] },
          "id": "ci38457511"
        },
        {
          "type": "Feature",
          "properties": {
            "mag": 1.6,
            "place": "45 km NW of Talkeetna, Alaska",
            "time": 1562380012512,
            "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ak0199ux4mfj",
            "status": "automatic",
            "net": "ak"
          },
          "geometry": { "type": "Point", "coordinates": [-150.5765, 62.6329, 78.3] },
          "id": "ak0199ux4mfj"
        }
      ],
      "bbox": [-150.5765, 35.7545, 6.62, -117.5993833, 62.6329, 78.3]
    }"#
}

/// Quiet day: a valid envelope with no features.
#[cfg(test)]
pub(crate) fn fixture_empty_feed_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "metadata": {
        "generated": 1562386800000,
        "title": "USGS Significant Earthquakes, Past Day",
        "status": 200,
        "count": 0
      },
      "features": []
    }"#
}

/// Records with gaps the parser must tolerate or drop:
/// - `hv74103036`: null mag, missing place, missing url (kept, defaulted)
/// - `nc73950001`: empty place, two-element coordinates (kept, depth 0)
/// - `us-no-geometry`: null geometry (dropped)
/// - `us-no-time`: no origin time (dropped)
#[cfg(test)]
pub(crate) fn fixture_missing_fields_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "properties": { "mag": null, "time": 1714564800000, "type": "earthquake" },
          "geometry": { "type": "Point", "coordinates": [-155.2834, 19.4069, 1.2] },
          "id": "hv74103036"
        },
        {
          "type": "Feature",
          "properties": { "mag": 2.1, "place": "", "time": 1714564900000, "url": "https://earthquake.usgs.gov/earthquakes/eventpage/nc73950001" },
          "geometry": { "type": "Point", "coordinates": [-122.8, 38.8] },
          "id": "nc73950001"
        },
        {
          "type": "Feature",
          "properties": { "mag": 3.3, "place": "somewhere", "time": 1714565000000 },
          "geometry": null,
          "id": "us-no-geometry"
        },
        {
          "type": "Feature",
          "properties": { "mag": 3.9, "place": "somewhere else" },
          "geometry": { "type": "Point", "coordinates": [140.1, 36.2, 40.0] },
          "id": "us-no-time"
        }
      ]
    }"#
}
