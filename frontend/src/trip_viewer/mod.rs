// frontend/src/trip_viewer/mod.rs

macro_rules! log {
    ($($t:tt)*) => {{
        let s = format!($($t)*);
        crate::trip_viewer::log(&s);
    }}
}

macro_rules! log_error {
    ($($t:tt)*) => {{
        let s = format!($($t)*);
        crate::trip_viewer::log_error(&s);
    }}
}

mod http;
pub mod map_view;
pub mod settings;
pub mod trip_table;

use crate::app::Route;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use map_view::MapView;
use trip_table::TripTable;
use tripviewer_shared::session::OutboundRequest;
use tripviewer_shared::{Applied, DeviceId, MapCoordinate, ViewerState};

const TABLE_TITLE: &str = "Trips Calculated Using Speed";

// ============================================================================
// TripViewer: device selector + map + trip table.
// All state lives in one ViewerState signal; fetch tasks of the current
// selection are tracked so the next selection can cancel them.
// ============================================================================
#[component]
pub fn TripViewer() -> Element {
    let config = use_signal(settings::load_config);
    let mut state = use_signal(|| ViewerState::new(&config.peek().tile_server_base_url));
    let mut in_flight = use_signal(Vec::<Task>::new);
    let nav = use_navigator();

    // Device list, once per mount. No retry on failure.
    use_effect(move || {
        let api = http::trip_api(&config.peek());
        spawn(async move {
            let result = api.device_ids().await;
            let applied = state.write().apply_device_list(result);
            match applied {
                Applied::Failed(e) => log_error!("[DEVICES] loading device list failed: {e}"),
                _ => log!("[DEVICES] {} device(s) available", state.peek().device_ids().len()),
            }
        });
    });

    let on_select = move |evt: FormEvent| {
        let change = state.write().select(&evt.value());
        if change.supersedes_in_flight() {
            for task in in_flight.write().drain(..) {
                task.cancel();
            }
        }

        let Some(selection) = change.started() else {
            return;
        };

        let generation = selection.generation;
        log!(
            "[TRIPS] selected {} (generation {})",
            selection.device,
            generation.get()
        );

        let api = http::trip_api(&config.read());
        let mut tasks = Vec::new();
        for request in selection.requests {
            match request {
                OutboundRequest::TileSource(url) => {
                    log!("[MAP] tile source rebuilt: {url}");
                }
                OutboundRequest::OngoingTrip(device) => {
                    let api = api.clone();
                    tasks.push(spawn(async move {
                        let result = api.ongoing_trip(&device).await;
                        let mut state = state;
                        let applied = state.write().apply_ongoing(generation, result);
                        if applied.is_updated() {
                            match state.peek().ongoing() {
                                Some(trip) => log!(
                                    "[TRIPS] ongoing trip for {device}: {} since {}",
                                    trip.trip_id,
                                    trip.trip_start
                                ),
                                None => log!("[TRIPS] no ongoing trip for {device}"),
                            }
                        } else {
                            report("ongoing trip", &device, applied);
                        }
                    }));
                }
                OutboundRequest::AllTrips(device) => {
                    let api = api.clone();
                    tasks.push(spawn(async move {
                        let result = api.all_trips(&device).await;
                        let mut state = state;
                        let applied = state.write().apply_all_trips(generation, result);
                        report("all trips", &device, applied);
                    }));
                }
            }
        }
        in_flight.set(tasks);
    };

    let on_map_move = move |center: MapCoordinate| {
        state.write().recenter(center);
    };

    let cfg = config.read().clone();
    let view = state.read();
    let selected = view.selected().cloned();
    let selected_label = selected.as_ref().map(DeviceId::to_string).unwrap_or_default();
    let device_ids = view.device_ids().to_vec();
    let trip_count = view.all_trips().len();
    let map_key = view.map_key();
    let tile_url = view.tile_url().to_string();
    let center = view.map_center();
    drop(view);

    rsx! {
        div {
            style: "
                min-height:100vh;
                padding:24px;
                color:#e5e7eb;
                font-family:system-ui, -apple-system, BlinkMacSystemFont;
                display:flex;
                flex-direction:column;
                gap:16px;
            ",

            div {
                style: "display:flex; align-items:center; justify-content:space-between; gap:16px; flex-wrap:wrap;",
                h1 { style: "margin:0; font-size:24px; font-weight:800; color:#43d1d1;", "Vehicle Trips" }
                button {
                    style: "
                        padding:0.45rem 0.85rem;
                        border-radius:0.75rem;
                        border:1px solid #334155;
                        background:#111827;
                        color:#e5e7eb;
                        font-weight:700;
                        cursor:pointer;
                    ",
                    onclick: move |_| {
                        let _ = nav.push(Route::Settings {});
                    },
                    "Settings"
                }
            }

            MapView {
                key: "{map_key}",
                map_key: map_key,
                tile_url: tile_url,
                access_token: cfg.map_access_token.clone(),
                style_url: cfg.map_style_url.clone(),
                center: center,
                on_move: on_map_move,
            }

            div {
                style: "display:flex; flex-direction:column; gap:10px; padding:16px; border-radius:12px; background:#111827; border:1px solid #1f2937;",
                h2 { style: "margin:0; font-size:18px;",
                    "Selected Device: {selected_label}"
                    if selected.is_some() {
                        span { style: "margin-left:12px; color:#9ca3af; font-size:14px; font-weight:400;",
                            "{trip_count} trip(s)"
                        }
                    }
                }

                label { r#for: "DeviceIDs", style: "color:#9ca3af;", "Select a Device ID:" }
                select {
                    id: "DeviceIDs",
                    name: "DeviceIDs",
                    style: "max-width:420px; padding:6px; border-radius:8px; background:#0b0f19; color:#e5e7eb; border:1px solid #334155;",
                    value: "{selected_label}",
                    onchange: on_select,
                    option { value: "", "Select a device" }
                    for id in device_ids {
                        option { key: "{id}", value: "{id}", "{id}" }
                    }
                }

                TripTable {
                    device: selected,
                    base_url: cfg.api_base_url.clone(),
                    auth_token: cfg.auth_token.clone(),
                    title: TABLE_TITLE.to_string(),
                }
            }
        }
    }
}

fn report(what: &str, device: &DeviceId, applied: Applied) {
    match applied {
        Applied::Updated => log!("[TRIPS] {what} for {device} loaded"),
        Applied::Stale => log!("[TRIPS] dropped stale {what} response for {device}"),
        Applied::Failed(e) => log_error!("[TRIPS] {what} for {device} failed: {e}"),
    }
}

// ---------- Web vs Native logging ----------
fn log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    println!("{msg}");
}

fn log_error(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{msg}");
}

// --------------------------------------------------------------------------------------------
// JS helpers
// --------------------------------------------------------------------------------------------
#[cfg(target_arch = "wasm32")]
fn js_eval(js: &str) {
    let _ = js_sys::eval(js);
}

#[cfg(not(target_arch = "wasm32"))]
fn js_eval(js: &str) {
    let _ = dioxus::document::eval(js);
}
