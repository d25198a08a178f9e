// frontend/src/trip_viewer/trip_table.rs

use super::http;
use dioxus::prelude::*;
use tripviewer_shared::{Applied, DeviceId, TableState};

#[component]
pub fn TripTable(
    device: Option<DeviceId>,
    base_url: String,
    auth_token: String,
    title: String,
) -> Element {
    let mut table = use_signal(TableState::default);
    let mut in_flight = use_signal(|| None::<Task>);

    // Refetch whenever the device, API base or token changes.
    use_effect(use_reactive(
        (&device, &base_url, &auth_token),
        move |(device, base_url, auth_token)| {
            let cleared = device.is_none();
            let fetch = table.write().show(device, &base_url, &auth_token);
            if cleared || fetch.is_some() {
                if let Some(task) = in_flight.write().take() {
                    task.cancel();
                }
            }

            let Some((generation, device)) = fetch else {
                return;
            };

            let api = http::trip_api_for(&base_url, &auth_token);
            let task = spawn(async move {
                let result = api.all_trips(&device).await;
                let applied = table.write().apply(generation, result);
                match applied {
                    Applied::Updated => {
                        log!("[TABLE] {} row(s) for {device}", table.peek().rows().len())
                    }
                    Applied::Stale => log!("[TABLE] dropped stale rows for {device}"),
                    Applied::Failed(e) => log_error!("[TABLE] loading trips for {device} failed: {e}"),
                }
            });
            in_flight.set(Some(task));
        },
    ));

    let rows = table.read().rows().to_vec();

    rsx! {
        div { style: "display:flex; flex-direction:column; gap:8px; overflow-x:auto;",
            h3 { style: "margin:8px 0 0 0; color:#fc5e03;", "{title}" }
            table { class: "trips",
                thead {
                    tr {
                        th { "Trip" }
                        th { "Device" }
                        th { "Start" }
                        th { "End" }
                    }
                }
                tbody {
                    for (i, trip) in rows.iter().enumerate() {
                        tr { key: "{i}",
                            td { "{trip.trip_id}" }
                            td { "{trip.device_id}" }
                            td { "{trip.trip_start}" }
                            td { {trip.trip_end.clone().unwrap_or_default()} }
                        }
                    }
                }
            }
        }
    }
}
