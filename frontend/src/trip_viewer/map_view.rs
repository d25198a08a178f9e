// frontend/src/trip_viewer/map_view.rs

use super::js_eval;
use dioxus::prelude::*;
use serde_json::json;
use tripviewer_shared::MapCoordinate;
use tripviewer_shared::layers::{TRIP_LAYERS, registration_payload};

const INIT_RETRY_MS: u32 = 50;
const INIT_MAX_TRIES: u32 = 200; // ~10s

/// One map instance per `map_key`; the parent keys this component on it, so a new tile
/// source means a fresh mount.
#[component]
pub fn MapView(
    map_key: u64,
    tile_url: String,
    access_token: String,
    style_url: String,
    center: MapCoordinate,
    on_move: EventHandler<MapCoordinate>,
) -> Element {
    let container_id = format!("trip-map-{map_key}");

    {
        let container_id = container_id.clone();
        use_effect(move || {
            js_init_map(&container_id, &access_token, &style_url, &tile_url, center);
        });
    }

    // moveend events from JS -> parent state
    {
        let container_id = container_id.clone();
        use_future(move || {
            let container_id = container_id.clone();
            async move {
                let mut moves = document::eval(&move_channel_script(&container_id));
                while let Ok(center) = moves.recv::<MapCoordinate>().await {
                    on_move.call(center);
                }
            }
        });
    }

    {
        let container_id = container_id.clone();
        use_drop(move || js_remove_map(&container_id));
    }

    rsx! {
        div {
            style: "display:flex; flex-direction:column; gap:8px;",
            div {
                id: "{container_id}",
                style: "width:100%; height:45vh; border-radius:12px; overflow:hidden; background:#000; border:1px solid #1f2937;",
            }
            div { style: "display:flex; gap:16px; flex-wrap:wrap; font-size:13px; color:#cbd5e1;",
                for index in 0..TRIP_LAYERS.len() {
                    LayerToggle { key: "{index}", container_id: container_id.clone(), layer: index }
                }
            }
        }
    }
}

#[component]
fn LayerToggle(container_id: String, layer: usize) -> Element {
    let mut visible = use_signal(|| true);
    let spec = TRIP_LAYERS[layer];

    rsx! {
        label { style: "display:flex; align-items:center; gap:6px; cursor:pointer;",
            input {
                r#type: "checkbox",
                checked: *visible.read(),
                onchange: move |evt: FormEvent| {
                    let on = evt.checked();
                    visible.set(on);
                    js_set_layer_visibility(&container_id, spec.id, on);
                },
            }
            "{spec.label}"
        }
    }
}

/* ================================================================================================
 * JS bridge helpers (window.tvInitMap & co. live in static/trip_map.js)
 * ============================================================================================== */

fn js_init_map(
    container_id: &str,
    access_token: &str,
    style_url: &str,
    tile_url: &str,
    center: MapCoordinate,
) {
    let opts = json!({
        "accessToken": access_token,
        "style": style_url,
        "center": [center.lon, center.lat],
        "zoom": center.zoom_or_default(),
        "layers": registration_payload(tile_url),
    });
    let id_js = serde_json::to_string(container_id).unwrap_or_else(|_| "\"\"".to_string());

    let script = r#"
    (function() {
      const id = __ID__;
      const opts = __OPTS__;
      let tries = 0;

      const t = setInterval(() => {
        tries++;
        try {
          const el = document.getElementById(id);
          if (el && window.mapboxgl && typeof window.tvInitMap === "function") {
            clearInterval(t);
            window.tvInitMap(id, opts);
            return;
          }
        } catch (e) {
          clearInterval(t);
          console.error("[MAP] tvInitMap threw:", e);
          return;
        }

        if (tries >= __MAX_TRIES__) {
          clearInterval(t);
          console.warn("[MAP] map init retry timed out for " + id);
        }
      }, __RETRY_MS__);
    })();
    "#;

    js_eval(
        &script
            .replace("__ID__", &id_js)
            .replace("__OPTS__", &opts.to_string())
            .replace("__MAX_TRIES__", &INIT_MAX_TRIES.to_string())
            .replace("__RETRY_MS__", &INIT_RETRY_MS.to_string()),
    );
}

fn js_remove_map(container_id: &str) {
    let id_js = serde_json::to_string(container_id).unwrap_or_else(|_| "\"\"".to_string());
    js_eval(&format!(
        r#"
        (function() {{
          try {{
            if (typeof window.tvRemoveMap === "function") {{
              window.tvRemoveMap({id_js});
            }}
          }} catch (e) {{
            console.warn("tvRemoveMap threw:", e);
          }}
        }})();
        "#
    ));
}

fn js_set_layer_visibility(container_id: &str, layer_id: &str, visible: bool) {
    let id_js = serde_json::to_string(container_id).unwrap_or_else(|_| "\"\"".to_string());
    let layer_js = serde_json::to_string(layer_id).unwrap_or_else(|_| "\"\"".to_string());
    js_eval(&format!(
        r#"
        (function() {{
          try {{
            if (typeof window.tvSetLayerVisibility === "function") {{
              window.tvSetLayerVisibility({id_js}, {layer_js}, {visible});
            }}
          }} catch (e) {{
            console.warn("tvSetLayerVisibility threw:", e);
          }}
        }})();
        "#
    ));
}

/// Registers a moveend listener that posts `{lat, lon, zoom}` back over the eval channel.
fn move_channel_script(container_id: &str) -> String {
    let id_js = serde_json::to_string(container_id).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"
        window.__tv_move_listeners = window.__tv_move_listeners || {{}};
        window.__tv_move_listeners[{id_js}] = (c) => dioxus.send(c);
        await new Promise(() => {{}});
        "#
    )
}
