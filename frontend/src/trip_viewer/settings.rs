// frontend/src/trip_viewer/settings.rs

use super::http;
use crate::app::Route;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tripviewer_shared::config::normalize_base_url;
use tripviewer_shared::{ConfigOverrides, ViewerConfig};

const CONFIG_STORAGE_KEY: &str = "tv_config";

const INPUT_STYLE: &str = "width:100%; padding:10px; border-radius:10px; border:1px solid #334155; background:#020617; color:#e5e7eb; outline:none; box-sizing:border-box;";
const BUTTON_STYLE: &str = "padding:10px 14px; border-radius:12px; border:1px solid #334155; background:#111827; color:#e5e7eb; cursor:pointer;";

/// Effective configuration: defaults, build-time environment, then whatever the settings
/// page saved.
pub fn load_config() -> ViewerConfig {
    ViewerConfig::resolve(load_overrides().as_ref())
}

fn load_overrides() -> Option<ConfigOverrides> {
    let raw = persist::get_string(CONFIG_STORAGE_KEY)?;
    match ConfigOverrides::from_json(&raw) {
        Ok(overrides) => Some(overrides),
        Err(e) => {
            log_error!("[CONFIG] ignoring stored settings: {e}");
            None
        }
    }
}

/// Stores only the fields that differ from the unsaved baseline, so later changes to
/// build-time defaults still apply to untouched fields.
fn save_config(config: &ViewerConfig) {
    let overrides = ConfigOverrides::diff(&ViewerConfig::resolve(None), config);
    if overrides.is_empty() {
        persist::remove(CONFIG_STORAGE_KEY);
        log!("[CONFIG] settings match defaults, cleared stored overrides");
        return;
    }
    match overrides.to_json() {
        Ok(raw) => {
            persist::set_string(CONFIG_STORAGE_KEY, &raw);
            log!("[CONFIG] settings saved");
        }
        Err(e) => log_error!("[CONFIG] could not save settings: {e}"),
    }
}

fn reset_config() -> ViewerConfig {
    persist::remove(CONFIG_STORAGE_KEY);
    log!("[CONFIG] settings reset");
    ViewerConfig::resolve(None)
}

#[component]
pub fn SettingsPage() -> Element {
    let nav = use_navigator();
    let mut form = use_signal(load_config);
    let mut status = use_signal(String::new);
    let mut testing = use_signal(|| false);

    let current = form.read().clone();

    rsx! {
        div {
            style: "min-height:100vh; display:flex; align-items:center; justify-content:center; color:#e5e7eb; font-family:system-ui;",
            div {
                style: "width:min(720px, 94vw); padding:24px; border:1px solid #334155; border-radius:16px; background:#0b1220; box-shadow:0 12px 30px rgba(0,0,0,0.5); display:flex; flex-direction:column; gap:14px;",

                h1 { style: "margin:0; font-size:20px;", "Settings" }
                p { style: "margin:0; color:#94a3b8;",
                    "Blank fields fall back to the built-in defaults."
                }

                SettingField {
                    label: "Trip API base URL",
                    value: current.api_base_url.clone(),
                    on_input: move |v: String| form.write().api_base_url = v,
                }
                SettingField {
                    label: "Tile server base URL",
                    value: current.tile_server_base_url.clone(),
                    on_input: move |v: String| form.write().tile_server_base_url = v,
                }
                SettingField {
                    label: "Map access token",
                    value: current.map_access_token.clone(),
                    on_input: move |v: String| form.write().map_access_token = v,
                }
                SettingField {
                    label: "Map style URL",
                    value: current.map_style_url.clone(),
                    on_input: move |v: String| form.write().map_style_url = v,
                }
                SettingField {
                    label: "API auth token",
                    value: current.auth_token.clone(),
                    on_input: move |v: String| form.write().auth_token = v,
                }

                if !status().is_empty() {
                    pre {
                        style: "margin:0; padding:12px; border-radius:12px; border:1px solid #334155; background:#020617; color:#cbd5e1; font-size:12px; white-space:pre-wrap;",
                        "{status()}"
                    }
                }

                div { style: "display:flex; gap:12px; justify-content:flex-end; flex-wrap:wrap;",
                    button {
                        style: BUTTON_STYLE,
                        disabled: testing(),
                        onclick: move |_| {
                            let base = normalize_base_url(form.read().api_base_url.clone());
                            if !(base.starts_with("http://") || base.starts_with("https://")) {
                                status.set("API URL must start with http:// or https://".to_string());
                                return;
                            }
                            let token = form.read().auth_token.clone();
                            testing.set(true);
                            status.set(format!("Querying {base}/devices/all ..."));
                            spawn(async move {
                                let report = match http::trip_api_for(&base, &token).device_ids().await {
                                    Ok(ids) => format!("OK: {} device(s) reported by {base}", ids.len()),
                                    Err(e) => format!("FAILED: {e}"),
                                };
                                testing.set(false);
                                status.set(report);
                            });
                        },
                        if testing() { "Testing..." } else { "Test API" }
                    }
                    button {
                        style: BUTTON_STYLE,
                        onclick: move |_| {
                            form.set(reset_config());
                            status.set("Settings reset to defaults.".to_string());
                        },
                        "Reset"
                    }
                    button {
                        style: BUTTON_STYLE,
                        onclick: move |_| {
                            let _ = nav.push(Route::Viewer {});
                        },
                        "Back"
                    }
                    button {
                        style: "{BUTTON_STYLE} border-color:#43d1d1;",
                        onclick: move |_| {
                            let saved = ViewerConfig::resolve(None)
                                .with_overrides(&ConfigOverrides::from_config(&form.read()));
                            save_config(&saved);
                            let _ = nav.push(Route::Viewer {});
                        },
                        "Save"
                    }
                }
            }
        }
    }
}

#[component]
fn SettingField(label: &'static str, value: String, on_input: EventHandler<String>) -> Element {
    rsx! {
        label { style: "display:flex; flex-direction:column; gap:6px; color:#9ca3af; font-size:13px;",
            "{label}"
            input {
                style: INPUT_STYLE,
                value: "{value}",
                oninput: move |evt| on_input.call(evt.value()),
            }
        }
    }
}

// ---------- Persistence (web: localStorage, native: JSON file) ----------
mod persist {
    pub fn get_string(key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            use web_sys::window;
            let w = window()?;
            let ls = w.local_storage().ok()??;
            return ls.get_item(key).ok().flatten();
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            native::get_string(key).ok().flatten()
        }
    }

    pub fn set_string(key: &str, value: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            use web_sys::window;
            if let Some(w) = window() {
                if let Ok(Some(ls)) = w.local_storage() {
                    let _ = ls.set_item(key, value);
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Err(e) = native::set_string(key, value) {
                log_error!("[CONFIG] writing {key} failed: {e}");
            }
        }
    }

    pub fn remove(key: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            use web_sys::window;
            if let Some(w) = window() {
                if let Ok(Some(ls)) = w.local_storage() {
                    let _ = ls.remove_item(key);
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Err(e) = native::remove(key) {
                log_error!("[CONFIG] removing {key} failed: {e}");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod native {
        use std::collections::HashMap;
        use std::io;
        use std::path::PathBuf;

        fn storage_path() -> PathBuf {
            let mut base = dirs::data_local_dir()
                .or_else(dirs::data_dir)
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| ".".into()));
            base.push("tripviewer");
            base.push("storage.json");
            base
        }

        fn load_map() -> Result<HashMap<String, String>, io::Error> {
            let bytes = match std::fs::read(storage_path()) {
                Ok(b) => b,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
                Err(e) => return Err(e),
            };
            Ok(serde_json::from_slice(&bytes).unwrap_or_default())
        }

        fn save_map(map: &HashMap<String, String>) -> Result<(), io::Error> {
            let path = storage_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let bytes = serde_json::to_vec_pretty(map).map_err(io::Error::other)?;
            std::fs::write(path, bytes)
        }

        pub fn get_string(key: &str) -> Result<Option<String>, io::Error> {
            Ok(load_map()?.remove(key))
        }

        pub fn set_string(key: &str, value: &str) -> Result<(), io::Error> {
            let mut map = load_map()?;
            map.insert(key.to_string(), value.to_string());
            save_map(&map)
        }

        pub fn remove(key: &str) -> Result<(), io::Error> {
            let mut map = load_map()?;
            if map.remove(key).is_some() {
                save_map(&map)?;
            }
            Ok(())
        }
    }
}
