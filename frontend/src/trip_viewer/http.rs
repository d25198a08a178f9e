// frontend/src/trip_viewer/http.rs

use tripviewer_shared::{TripApi, ViewerConfig};

#[cfg(target_arch = "wasm32")]
pub type Transport = GlooTransport;

#[cfg(not(target_arch = "wasm32"))]
pub type Transport = tripviewer_shared::ReqwestTransport;

pub fn trip_api(config: &ViewerConfig) -> TripApi<Transport> {
    TripApi::new(config, Transport::default())
}

pub fn trip_api_for(base_url: &str, auth_token: &str) -> TripApi<Transport> {
    TripApi::from_parts(base_url, auth_token, Transport::default())
}

/// Browser fetch through gloo-net.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[cfg(target_arch = "wasm32")]
impl tripviewer_shared::HttpTransport for GlooTransport {
    async fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<tripviewer_shared::api::HttpResponse, tripviewer_shared::FetchError> {
        use gloo_net::http::Request;
        use tripviewer_shared::FetchError;

        let transport_err = |e: gloo_net::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut req = Request::get(url);
        if let Some(token) = bearer {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }

        let resp = req.send().await.map_err(transport_err)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport_err)?;
        Ok(tripviewer_shared::api::HttpResponse { status, body })
    }
}
