//! Static styling of the three trip layers drawn on top of the base map.

use serde_json::{Value, json};

/// Every layer reads the same source-layer name from its tiles.
pub const SOURCE_LAYER: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerKind {
    Circle {
        radius: f64,
        color: &'static str,
        stroke_color: &'static str,
        stroke_width: f64,
        opacity: f64,
    },
    Line {
        color: &'static str,
        width: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    /// Used as both source id and layer id.
    pub id: &'static str,
    pub label: &'static str,
    pub kind: LayerKind,
    /// Show a pointer cursor while hovering features of this layer.
    pub hover_pointer: bool,
}

pub const POINTS_ODOMETER: LayerSpec = LayerSpec {
    id: "public.points_odometer",
    label: "Points",
    kind: LayerKind::Circle {
        radius: 3.0,
        color: "#f5efbc",
        stroke_color: "#f5efbc",
        stroke_width: 1.0,
        opacity: 0.5,
    },
    hover_pointer: true,
};

pub const TRIPS_ODOMETER: LayerSpec = LayerSpec {
    id: "public.trips_odometer",
    label: "Trips (odometer)",
    kind: LayerKind::Line {
        color: "#43d1d1",
        width: 3.0,
    },
    hover_pointer: false,
};

pub const TRIPS_SPEED: LayerSpec = LayerSpec {
    id: "public.trips_speed",
    label: "Trips (speed)",
    kind: LayerKind::Line {
        color: "#fc5e03",
        width: 3.0,
    },
    hover_pointer: false,
};

/// Registration order on style load.
pub const TRIP_LAYERS: [LayerSpec; 3] = [POINTS_ODOMETER, TRIPS_ODOMETER, TRIPS_SPEED];

impl LayerSpec {
    pub fn source(&self, tile_url: &str) -> Value {
        json!({
            "type": "vector",
            "tiles": [tile_url],
        })
    }

    pub fn layer(&self) -> Value {
        match self.kind {
            LayerKind::Circle {
                radius,
                color,
                stroke_color,
                stroke_width,
                opacity,
            } => json!({
                "id": self.id,
                "type": "circle",
                "source": self.id,
                "source-layer": SOURCE_LAYER,
                "paint": {
                    "circle-radius": radius,
                    "circle-color": color,
                    "circle-stroke-color": stroke_color,
                    "circle-stroke-width": stroke_width,
                    "circle-opacity": opacity,
                },
            }),
            LayerKind::Line { color, width } => json!({
                "id": self.id,
                "type": "line",
                "source": self.id,
                "source-layer": SOURCE_LAYER,
                "layout": {
                    "line-join": "round",
                    "line-cap": "round",
                },
                "paint": {
                    "line-color": color,
                    "line-width": width,
                },
            }),
        }
    }
}

/// `[{id, source, layer, hover_pointer}, ...]` for the map bridge.
pub fn registration_payload(tile_url: &str) -> Value {
    Value::Array(
        TRIP_LAYERS
            .iter()
            .map(|spec| {
                json!({
                    "id": spec.id,
                    "source": spec.source(tile_url),
                    "layer": spec.layer(),
                    "hover_pointer": spec.hover_pointer,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_register_points_first() {
        let ids: Vec<_> = TRIP_LAYERS.iter().map(|l| l.id).collect();
        assert_eq!(
            ids,
            ["public.points_odometer", "public.trips_odometer", "public.trips_speed"]
        );
        assert!(POINTS_ODOMETER.hover_pointer);
        assert!(!TRIPS_SPEED.hover_pointer);
    }

    #[test]
    fn circle_paint_matches_style() {
        let layer = POINTS_ODOMETER.layer();
        assert_eq!(layer["type"], "circle");
        assert_eq!(layer["source-layer"], "default");
        assert_eq!(layer["paint"]["circle-radius"], 3.0);
        assert_eq!(layer["paint"]["circle-color"], "#f5efbc");
        assert_eq!(layer["paint"]["circle-opacity"], 0.5);
        assert!(layer.get("layout").is_none());
    }

    #[test]
    fn line_layers_are_rounded() {
        let layer = TRIPS_SPEED.layer();
        assert_eq!(layer["layout"]["line-join"], "round");
        assert_eq!(layer["layout"]["line-cap"], "round");
        assert_eq!(layer["paint"]["line-color"], "#fc5e03");
        assert_eq!(TRIPS_ODOMETER.layer()["paint"]["line-color"], "#43d1d1");
    }

    #[test]
    fn every_source_points_at_current_tiles() {
        let payload = registration_payload("http://t/{z}/{x}/{y}.pbf?device_key=a");
        let entries = payload.as_array().expect("array payload");
        assert_eq!(entries.len(), 3);
        for entry in entries {
            assert_eq!(entry["source"]["type"], "vector");
            assert_eq!(entry["source"]["tiles"][0], "http://t/{z}/{x}/{y}.pbf?device_key=a");
            assert_eq!(entry["layer"]["source"], entry["id"]);
        }
    }
}
