//! Viewer state container.
//!
//! All mutation goes through the methods below. A selection change hands out a new
//! [`Generation`]; fetch results are applied only while their generation is current, so a
//! response that arrives after the user moved on is dropped instead of overwriting newer data.

use crate::endpoints::tile_url_template;
use crate::error::FetchError;
use crate::{DEFAULT_CENTER, DeviceId, MapCoordinate, TripRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn advance(&mut self) -> Generation {
        self.0 += 1;
        *self
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Effects of one selection change, in the order they are started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    TileSource(String),
    OngoingTrip(DeviceId),
    AllTrips(DeviceId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub generation: Generation,
    pub device: DeviceId,
    pub requests: Vec<OutboundRequest>,
}

/// Outcome of handling the selector's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// A new device was selected; its effects should be started.
    Started(Selection),
    /// The placeholder replaced a selected device.
    Cleared,
    /// Nothing changed.
    Unchanged,
}

impl SelectionChange {
    /// Whether fetches of the previous selection should be cancelled.
    pub fn supersedes_in_flight(&self) -> bool {
        !matches!(self, SelectionChange::Unchanged)
    }

    pub fn started(self) -> Option<Selection> {
        match self {
            SelectionChange::Started(selection) => Some(selection),
            _ => None,
        }
    }
}

/// What happened to a fetch result handed to the state container.
#[derive(Debug)]
pub enum Applied {
    Updated,
    /// The selection changed while the request was in flight.
    Stale,
    /// The request failed; state was left as it was.
    Failed(FetchError),
}

impl Applied {
    pub fn is_updated(&self) -> bool {
        matches!(self, Applied::Updated)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    tile_base: String,
    device_ids: Vec<DeviceId>,
    selected: Option<DeviceId>,
    ongoing: Option<TripRecord>,
    all_trips: Vec<TripRecord>,
    map_center: Option<MapCoordinate>,
    tile_url: String,
    map_key: u64,
    generation: Generation,
}

impl ViewerState {
    pub fn new(tile_server_base_url: &str) -> Self {
        Self {
            tile_base: tile_server_base_url.to_string(),
            device_ids: Vec::new(),
            selected: None,
            ongoing: None,
            all_trips: Vec::new(),
            map_center: None,
            tile_url: tile_url_template(tile_server_base_url, None),
            map_key: 0,
            generation: Generation::default(),
        }
    }

    pub fn device_ids(&self) -> &[DeviceId] {
        &self.device_ids
    }

    pub fn selected(&self) -> Option<&DeviceId> {
        self.selected.as_ref()
    }

    pub fn ongoing(&self) -> Option<&TripRecord> {
        self.ongoing.as_ref()
    }

    pub fn all_trips(&self) -> &[TripRecord] {
        &self.all_trips
    }

    pub fn tile_url(&self) -> &str {
        &self.tile_url
    }

    /// Bumped on every tile rebuild; the map is keyed on it and remounts.
    pub fn map_key(&self) -> u64 {
        self.map_key
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn map_center(&self) -> MapCoordinate {
        self.map_center.unwrap_or(DEFAULT_CENTER)
    }

    pub fn recenter(&mut self, center: MapCoordinate) {
        self.map_center = Some(center);
    }

    /// Device list is loaded once; a failure leaves the selector empty.
    pub fn apply_device_list(&mut self, result: Result<Vec<DeviceId>, FetchError>) -> Applied {
        match result {
            Ok(mut ids) => {
                ids.sort();
                ids.dedup();
                self.device_ids = ids;
                Applied::Updated
            }
            Err(e) => Applied::Failed(e),
        }
    }

    /// Handles the selector's raw value.
    pub fn select(&mut self, raw: &str) -> SelectionChange {
        let Some(device) = DeviceId::parse(raw) else {
            return if self.clear_selection() {
                SelectionChange::Cleared
            } else {
                SelectionChange::Unchanged
            };
        };

        if self.selected.as_ref() == Some(&device) {
            return SelectionChange::Unchanged;
        }

        let generation = self.generation.advance();
        self.selected = Some(device.clone());
        self.tile_url = tile_url_template(&self.tile_base, Some(&device));
        self.map_key += 1;

        SelectionChange::Started(Selection {
            generation,
            requests: vec![
                OutboundRequest::TileSource(self.tile_url.clone()),
                OutboundRequest::OngoingTrip(device.clone()),
                OutboundRequest::AllTrips(device.clone()),
            ],
            device,
        })
    }

    fn clear_selection(&mut self) -> bool {
        if self.selected.take().is_none() {
            return false;
        }
        self.generation.advance();
        self.ongoing = None;
        self.all_trips.clear();
        true
    }

    pub fn apply_ongoing(
        &mut self,
        generation: Generation,
        result: Result<Option<TripRecord>, FetchError>,
    ) -> Applied {
        if generation != self.generation {
            return Applied::Stale;
        }
        match result {
            Ok(trip) => {
                self.ongoing = trip;
                Applied::Updated
            }
            Err(e) => Applied::Failed(e),
        }
    }

    pub fn apply_all_trips(
        &mut self,
        generation: Generation,
        result: Result<Vec<TripRecord>, FetchError>,
    ) -> Applied {
        if generation != self.generation {
            return Applied::Stale;
        }
        match result {
            Ok(trips) => {
                self.all_trips = trips;
                Applied::Updated
            }
            Err(e) => Applied::Failed(e),
        }
    }
}

/// Rows of one trip table, fetched independently of the viewer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableState {
    device: Option<DeviceId>,
    /// Base URL and token the rows were requested with.
    source: (String, String),
    rows: Vec<TripRecord>,
    generation: Generation,
}

impl TableState {
    pub fn device(&self) -> Option<&DeviceId> {
        self.device.as_ref()
    }

    pub fn rows(&self) -> &[TripRecord] {
        &self.rows
    }

    /// Points the table at `device`, served from `base_url` with `auth_token`. Returns the
    /// fetch to run when a device is shown and it or its source changed. Clearing the device
    /// drops the rows.
    pub fn show(
        &mut self,
        device: Option<DeviceId>,
        base_url: &str,
        auth_token: &str,
    ) -> Option<(Generation, DeviceId)> {
        let source_changed = self.source.0 != base_url || self.source.1 != auth_token;
        if source_changed {
            self.source = (base_url.to_string(), auth_token.to_string());
        }
        if self.device == device && (device.is_none() || !source_changed) {
            return None;
        }

        let generation = self.generation.advance();
        self.device = device.clone();
        match device {
            Some(device) => Some((generation, device)),
            None => {
                self.rows.clear();
                None
            }
        }
    }

    pub fn apply(
        &mut self,
        generation: Generation,
        result: Result<Vec<TripRecord>, FetchError>,
    ) -> Applied {
        if generation != self.generation {
            return Applied::Stale;
        }
        match result {
            Ok(rows) => {
                self.rows = rows;
                Applied::Updated
            }
            Err(e) => Applied::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILES: &str = "http://localhost:7800";
    const API: &str = "http://localhost:8000";

    fn trip(id: &str, device: &str) -> TripRecord {
        TripRecord {
            trip_id: id.to_string(),
            device_id: DeviceId::from(device),
            trip_start: format!("{id}-start"),
            trip_end: Some(format!("{id}-end")),
        }
    }

    fn failure() -> FetchError {
        FetchError::Status {
            url: "http://localhost:8000/devices/x/alltrips".to_string(),
            status: 500,
        }
    }

    #[test]
    fn device_list_is_sorted() {
        let mut state = ViewerState::new(TILES);
        let ids = ["b", "a", "c"].map(DeviceId::from).to_vec();
        assert!(state.apply_device_list(Ok(ids)).is_updated());
        let shown: Vec<_> = state.device_ids().iter().map(DeviceId::as_str).collect();
        assert_eq!(shown, ["a", "b", "c"]);
    }

    #[test]
    fn failed_device_list_leaves_selector_empty() {
        let mut state = ViewerState::new(TILES);
        assert!(matches!(
            state.apply_device_list(Err(failure())),
            Applied::Failed(_)
        ));
        assert!(state.device_ids().is_empty());
    }

    #[test]
    fn selecting_a_device_starts_three_effects() {
        let mut state = ViewerState::new(TILES);
        let selection = state.select("dev-9").started().expect("non-empty selection");

        assert_eq!(selection.requests.len(), 3);
        let OutboundRequest::TileSource(url) = &selection.requests[0] else {
            panic!("tile rebuild comes first");
        };
        assert!(url.ends_with("?device_key=dev-9"));
        assert_eq!(
            selection.requests[1],
            OutboundRequest::OngoingTrip(DeviceId::from("dev-9"))
        );
        assert_eq!(
            selection.requests[2],
            OutboundRequest::AllTrips(DeviceId::from("dev-9"))
        );
        assert_eq!(state.tile_url(), url);
        assert_eq!(state.map_key(), 1);
    }

    #[test]
    fn placeholder_selection_starts_nothing() {
        let mut state = ViewerState::new(TILES);
        assert_eq!(state.select(""), SelectionChange::Unchanged);
        assert_eq!(state.map_key(), 0);
        assert_eq!(state.generation(), Generation::default());
    }

    #[test]
    fn reselecting_same_device_is_a_no_op() {
        let mut state = ViewerState::new(TILES);
        state.select("a").started().expect("first selection");
        let again = state.select("a");
        assert_eq!(again, SelectionChange::Unchanged);
        assert!(!again.supersedes_in_flight());
        assert_eq!(state.map_key(), 1);
    }

    #[test]
    fn clearing_selection_drops_trips_and_in_flight_results() {
        let mut state = ViewerState::new(TILES);
        let sel = state.select("a").started().expect("selection");
        state.apply_all_trips(sel.generation, Ok(vec![trip("t1", "a")]));

        let cleared = state.select("");
        assert_eq!(cleared, SelectionChange::Cleared);
        assert!(cleared.supersedes_in_flight());
        assert!(state.all_trips().is_empty());
        assert!(state.selected().is_none());
        assert!(matches!(
            state.apply_ongoing(sel.generation, Ok(Some(trip("t2", "a")))),
            Applied::Stale
        ));
        assert!(state.ongoing().is_none());
    }

    #[test]
    fn all_trips_keep_response_order() {
        let mut state = ViewerState::new(TILES);
        let sel = state.select("a").started().expect("selection");
        let rows = vec![trip("t2", "a"), trip("t1", "a")];
        assert!(state.apply_all_trips(sel.generation, Ok(rows.clone())).is_updated());
        assert_eq!(state.all_trips(), rows.as_slice());
    }

    #[test]
    fn failed_fetch_keeps_previous_rows() {
        let mut state = ViewerState::new(TILES);
        let first = state.select("a").started().expect("selection");
        state.apply_all_trips(first.generation, Ok(vec![trip("t1", "a")]));

        let second = state.select("b").started().expect("selection");
        assert!(matches!(
            state.apply_all_trips(second.generation, Err(failure())),
            Applied::Failed(_)
        ));
        assert_eq!(state.all_trips(), [trip("t1", "a")].as_slice());
    }

    #[test]
    fn late_response_for_previous_device_is_dropped() {
        let mut state = ViewerState::new(TILES);
        let a = state.select("a").started().expect("selection");
        let b = state.select("b").started().expect("selection");

        // b resolves first, then a's slower response lands.
        assert!(state.apply_all_trips(b.generation, Ok(vec![trip("tb", "b")])).is_updated());
        assert!(matches!(
            state.apply_all_trips(a.generation, Ok(vec![trip("ta", "a")])),
            Applied::Stale
        ));
        assert!(state.apply_ongoing(b.generation, Ok(None)).is_updated());
        assert!(matches!(
            state.apply_ongoing(a.generation, Ok(Some(trip("ta", "a")))),
            Applied::Stale
        ));

        assert_eq!(state.selected(), Some(&DeviceId::from("b")));
        assert_eq!(state.all_trips(), [trip("tb", "b")].as_slice());
        assert!(state.ongoing().is_none());
        assert_eq!(state.map_key(), 2);
    }

    #[test]
    fn map_center_falls_back_to_default() {
        let mut state = ViewerState::new(TILES);
        assert_eq!(state.map_center(), DEFAULT_CENTER);
        let here = MapCoordinate {
            lat: 52.5,
            lon: 13.4,
            zoom: Some(10.0),
        };
        state.recenter(here);
        assert_eq!(state.map_center(), here);
    }

    #[test]
    fn table_fetches_only_for_new_devices() {
        let mut table = TableState::default();
        assert!(table.show(None, API, "tok").is_none());

        let (generation, device) = table.show(Some(DeviceId::from("a")), API, "tok").expect("fetch for a");
        assert_eq!(device, DeviceId::from("a"));
        assert!(table.show(Some(DeviceId::from("a")), API, "tok").is_none());

        let rows = vec![trip("t1", "a"), trip("t2", "a")];
        assert!(table.apply(generation, Ok(rows.clone())).is_updated());
        assert_eq!(table.rows(), rows.as_slice());
    }

    #[test]
    fn table_keeps_rows_on_failure_and_ignores_stale() {
        let mut table = TableState::default();
        let (first, _) = table.show(Some(DeviceId::from("a")), API, "tok").expect("fetch");
        table.apply(first, Ok(vec![trip("t1", "a")]));

        let (second, _) = table.show(Some(DeviceId::from("b")), API, "tok").expect("fetch");
        assert!(matches!(table.apply(second, Err(failure())), Applied::Failed(_)));
        assert_eq!(table.rows(), [trip("t1", "a")].as_slice());

        assert!(matches!(
            table.apply(first, Ok(vec![trip("late", "a")])),
            Applied::Stale
        ));
        assert_eq!(table.rows(), [trip("t1", "a")].as_slice());

        assert!(table.show(None, API, "tok").is_none());
        assert!(table.rows().is_empty());
    }

    #[test]
    fn listed_id_is_selected_verbatim() {
        let mut state = ViewerState::new(TILES);
        let listed = DeviceId::from(" dev1 ");
        state.apply_device_list(Ok(vec![listed.clone()]));

        let first = state.device_ids()[0].clone();
        let sel = state.select(first.as_str()).started().expect("selection");
        assert_eq!(sel.device, listed);
        assert_eq!(state.selected(), Some(&listed));
        assert_eq!(sel.requests[2], OutboundRequest::AllTrips(listed.clone()));
        assert!(state.tile_url().ends_with("?device_key=+dev1+"));
    }

    #[test]
    fn table_refetches_when_source_changes() {
        let mut table = TableState::default();
        let (first, _) = table.show(Some(DeviceId::from("a")), API, "tok").expect("fetch");
        assert!(table.show(Some(DeviceId::from("a")), API, "tok").is_none());

        let (second, device) = table
            .show(Some(DeviceId::from("a")), API, "new-token")
            .expect("new token refetches");
        assert_eq!(device, DeviceId::from("a"));
        assert_ne!(first, second);
        assert!(matches!(
            table.apply(first, Ok(vec![trip("old", "a")])),
            Applied::Stale
        ));

        assert!(table.show(Some(DeviceId::from("a")), "http://other:8000", "new-token").is_some());

        // No device: a source change alone fetches nothing.
        assert!(table.show(None, API, "tok").is_none());
        assert!(table.show(None, "http://third:8000", "tok").is_none());
    }
}
