pub mod api;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod layers;
pub mod session;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use api::{HttpTransport, TripApi};
pub use config::{ConfigOverrides, ViewerConfig};
pub use error::{ConfigError, FetchError};
pub use session::{
    Applied, Generation, OutboundRequest, SelectionChange, TableState, ViewerState,
};

#[cfg(feature = "reqwest")]
pub use api::ReqwestTransport;

/// Opaque vehicle identifier as handed out by `/devices/all`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Returns `None` for the empty placeholder selection. Any other value is an id exactly
    /// as the backend listed it.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub device_id: DeviceId,
    pub trip_start: String, // verbatim backend timestamp
    #[serde(default)]
    pub trip_end: Option<String>, // null while the trip is ongoing
}

/// `/devices/{id}/ongoing` answers with one trip or with the list of open trips.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OngoingResponse {
    Many(Vec<TripRecord>),
    One(TripRecord),
}

impl OngoingResponse {
    pub fn into_first(self) -> Option<TripRecord> {
        match self {
            OngoingResponse::Many(trips) => trips.into_iter().next(),
            OngoingResponse::One(trip) => Some(trip),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCoordinate {
    pub lat: f64,
    pub lon: f64,
    pub zoom: Option<f64>,
}

pub const DEFAULT_ZOOM: f64 = 2.5;

/// Where the map opens when nothing has recentred it yet.
pub const DEFAULT_CENTER: MapCoordinate = MapCoordinate {
    lat: 37.38948,
    lon: -50.200489,
    zoom: Some(DEFAULT_ZOOM),
};

impl MapCoordinate {
    pub fn zoom_or_default(&self) -> f64 {
        self.zoom.unwrap_or(DEFAULT_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_selection_is_not_a_device() {
        assert_eq!(DeviceId::parse(""), None);
        assert_eq!(DeviceId::parse("abc"), Some(DeviceId::from("abc")));
        // ids are opaque; whitespace belongs to the id
        assert_eq!(DeviceId::parse(" abc "), Some(DeviceId::from(" abc ")));
    }

    #[test]
    fn trip_end_may_be_null_or_missing() {
        let raw = r#"[
            {"trip_id":"t1","device_id":"d1","trip_start":"2022-09-01T10:00:00Z","trip_end":null},
            {"trip_id":"t2","device_id":"d1","trip_start":"2022-09-02T10:00:00Z"}
        ]"#;
        let trips: Vec<TripRecord> = serde_json::from_str(raw).expect("trips should parse");
        assert_eq!(trips.len(), 2);
        assert!(trips.iter().all(|t| t.trip_end.is_none()));
    }

    #[test]
    fn ongoing_accepts_object_or_list() {
        let one = r#"{"trip_id":"t1","device_id":"d1","trip_start":"s","trip_end":null}"#;
        let trip = serde_json::from_str::<OngoingResponse>(one)
            .expect("single object")
            .into_first();
        assert_eq!(trip.map(|t| t.trip_id), Some("t1".to_string()));

        let empty = serde_json::from_str::<OngoingResponse>("[]").expect("empty list");
        assert_eq!(empty.into_first(), None);
    }

    #[test]
    fn default_center_carries_zoom() {
        assert_eq!(DEFAULT_CENTER.zoom_or_default(), 2.5);
        let bare = MapCoordinate {
            lat: 1.0,
            lon: 2.0,
            zoom: None,
        };
        assert_eq!(bare.zoom_or_default(), DEFAULT_ZOOM);
    }
}
