use crate::DeviceId;
use crate::error::FetchError;
use url::{Url, form_urlencoded};

/// Vector-tile layers served by the tile server, in the order its URL lists them.
pub const TILE_LAYERS: [&str; 3] = [
    "public.trips_odometer",
    "public.points_odometer",
    "public.trips_speed",
];

pub const DEVICE_KEY_PARAM: &str = "device_key";

fn api_url(base: &str, segments: &[&str]) -> Result<String, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;

    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl {
            url: base.to_string(),
            reason: "base URL cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url.into())
}

/// `{base}/devices/all`
pub fn devices_all_url(base: &str) -> Result<String, FetchError> {
    api_url(base, &["devices", "all"])
}

/// `{base}/devices/{id}/ongoing`
pub fn device_ongoing_url(base: &str, device: &DeviceId) -> Result<String, FetchError> {
    api_url(base, &["devices", device.as_str(), "ongoing"])
}

/// `{base}/devices/{id}/alltrips`
pub fn device_alltrips_url(base: &str, device: &DeviceId) -> Result<String, FetchError> {
    api_url(base, &["devices", device.as_str(), "alltrips"])
}

/// Tile source template handed to the map. The `{z}/{x}/{y}` placeholders are filled in by
/// the map library, so this is plain string assembly rather than `Url`, which would escape
/// the braces.
pub fn tile_url_template(tile_base: &str, device: Option<&DeviceId>) -> String {
    let base = tile_base.trim_end_matches('/');
    let layers = TILE_LAYERS.join(",");
    let mut out = format!("{base}/{layers}/{{z}}/{{x}}/{{y}}.pbf");

    if let Some(device) = device {
        let encoded: String = form_urlencoded::byte_serialize(device.as_str().as_bytes()).collect();
        out.push_str(&format!("?{DEVICE_KEY_PARAM}={encoded}"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_paths_follow_backend_routes() {
        let id = DeviceId::from("abc123");
        assert_eq!(
            devices_all_url("http://localhost:8000").unwrap(),
            "http://localhost:8000/devices/all"
        );
        assert_eq!(
            device_ongoing_url("http://localhost:8000", &id).unwrap(),
            "http://localhost:8000/devices/abc123/ongoing"
        );
        assert_eq!(
            device_alltrips_url("http://localhost:8000/api", &id).unwrap(),
            "http://localhost:8000/api/devices/abc123/alltrips"
        );
    }

    #[test]
    fn device_id_is_one_path_segment() {
        let id = DeviceId::from("a/b c");
        assert_eq!(
            device_alltrips_url("http://h", &id).unwrap(),
            "http://h/devices/a%2Fb%20c/alltrips"
        );
    }

    #[test]
    fn relative_base_is_rejected() {
        let err = devices_all_url("localhost:8000").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn tile_template_without_device() {
        assert_eq!(
            tile_url_template("http://localhost:7800/", None),
            "http://localhost:7800/public.trips_odometer,public.points_odometer,public.trips_speed/{z}/{x}/{y}.pbf"
        );
    }

    #[test]
    fn tile_template_embeds_device_key() {
        let url = tile_url_template("http://localhost:7800", Some(&DeviceId::from("dev 1&x")));
        assert!(url.ends_with("/{z}/{x}/{y}.pbf?device_key=dev+1%26x"), "{url}");
    }
}
