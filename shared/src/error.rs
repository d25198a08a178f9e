// Error types for the trip viewer

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum FetchError {
    #[snafu(display("Request to {url} failed: {message}"))]
    Transport { url: String, message: String },
    #[snafu(display("Request to {url} returned HTTP {status}"))]
    Status { url: String, status: u16 },
    #[snafu(display("Unexpected response body from {url}"))]
    Decode {
        url: String,
        source: serde_json::Error,
    },
    #[snafu(display("Invalid request URL {url}: {reason}"))]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. }
            | FetchError::InvalidUrl { url, .. } => url,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    #[snafu(display("Stored configuration is not valid JSON"))]
    ConfigParse { source: serde_json::Error },
    #[snafu(display("Error serializing configuration"))]
    ConfigSerialize { source: serde_json::Error },
}
