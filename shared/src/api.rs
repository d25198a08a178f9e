//! Client for the trip backend.
//!
//! The HTTP stack differs per target (reqwest natively, gloo-net in the browser), so requests
//! go through [`HttpTransport`]. Status checks and JSON decoding live here once.

use crate::config::ViewerConfig;
use crate::endpoints::{device_alltrips_url, device_ongoing_url, devices_all_url};
use crate::error::{DecodeSnafu, FetchError};
use crate::{DeviceId, OngoingResponse, TripRecord};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// GET `url`. When `bearer` is set it is sent as `Authorization: Bearer {bearer}`.
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct TripApi<T> {
    base_url: String,
    auth_token: String,
    transport: T,
}

impl<T: HttpTransport> TripApi<T> {
    pub fn new(config: &ViewerConfig, transport: T) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            auth_token: config.auth_token.clone(),
            transport,
        }
    }

    pub fn from_parts(
        base_url: impl Into<String>,
        auth_token: impl Into<String>,
        transport: T,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: auth_token.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        url: String,
        bearer: Option<&str>,
    ) -> Result<R, FetchError> {
        let resp = self.transport.get(&url, bearer).await?;
        if !(200..300).contains(&resp.status) {
            return Err(FetchError::Status {
                url,
                status: resp.status,
            });
        }
        serde_json::from_str(&resp.body).context(DecodeSnafu { url })
    }

    /// All known devices, sorted. No credentials are sent.
    pub async fn device_ids(&self) -> Result<Vec<DeviceId>, FetchError> {
        let url = devices_all_url(&self.base_url)?;
        let mut ids: Vec<DeviceId> = self.get_json(url, None).await?;
        ids.sort();
        Ok(ids)
    }

    pub async fn ongoing_trip(&self, device: &DeviceId) -> Result<Option<TripRecord>, FetchError> {
        let url = device_ongoing_url(&self.base_url, device)?;
        let resp: OngoingResponse = self.get_json(url, Some(&self.auth_token)).await?;
        Ok(resp.into_first())
    }

    pub async fn all_trips(&self, device: &DeviceId) -> Result<Vec<TripRecord>, FetchError> {
        let url = device_alltrips_url(&self.base_url, device)?;
        self.get_json(url, Some(&self.auth_token)).await
    }
}

#[cfg(feature = "reqwest")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "reqwest")]
impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, FetchError> {
        let transport_err = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut req = self.client.get(url);
        if let Some(token) = bearer {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let resp = req.send().await.map_err(transport_err)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(transport_err)?;
        Ok(HttpResponse { status, body })
    }
}
