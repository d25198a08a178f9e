// frontend/src/app.rs

use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use crate::trip_viewer::TripViewer;
use crate::trip_viewer::settings::SettingsPage;

// --- global css ---
const GLOBAL_CSS: &str = r#"
html, body {
    margin: 0;
    padding: 0;
    width: 100%;
    height: 100%;
    background: #0b0f19;
}

:root, html {
    color-scheme: dark;
}

#main {
    width: 100%;
    min-height: 100%;
    background: #0b0f19;
}

table.trips {
    border-collapse: collapse;
    width: 100%;
    font-size: 13px;
}

table.trips th, table.trips td {
    padding: 4px 10px;
    border-bottom: 1px solid #1f2937;
    text-align: left;
    white-space: nowrap;
}

* { box-sizing: border-box; }
"#;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[route("/")]
    Viewer {},

    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    rsx! {
        document::Style { "{GLOBAL_CSS}" }
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }

        document::Link {
            rel: "stylesheet",
            href: asset!("/static/vendor/mapbox-gl/mapbox-gl.css"),
        }
        document::Script { src: asset!("/static/vendor/mapbox-gl/mapbox-gl.js") }
        document::Script { src: asset!("/static/trip_map.js") }

        div {
            style: "min-height: 100vh; width: 100%; background: #0b0f19; color: #e5e7eb;",
            Router::<Route> {}
        }
    }
}

#[component]
pub fn Viewer() -> Element {
    rsx! { TripViewer {} }
}

#[component]
pub fn Settings() -> Element {
    rsx! { SettingsPage {} }
}
