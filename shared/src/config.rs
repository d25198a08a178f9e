use crate::error::{ConfigError, ConfigParseSnafu, ConfigSerializeSnafu};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TILE_SERVER_BASE_URL: &str = "http://localhost:7800";
pub const DEFAULT_MAP_STYLE_URL: &str = "mapbox://styles/mapbox/dark-v10";

/// Runtime options of the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub tile_server_base_url: String,
    pub api_base_url: String,
    pub map_access_token: String,
    pub auth_token: String,
    pub map_style_url: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tile_server_base_url: DEFAULT_TILE_SERVER_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            map_access_token: String::new(),
            auth_token: String::new(),
            map_style_url: DEFAULT_MAP_STYLE_URL.to_string(),
        }
    }
}

/// Partial configuration, as persisted by the settings page or baked in at build time.
/// Missing or blank fields leave the underlying value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_server_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_style_url: Option<String>,
}

impl ConfigOverrides {
    /// Values provided through `TRIPVIEWER_*` variables when this crate was compiled.
    pub fn from_build_env() -> Self {
        Self {
            tile_server_base_url: option_env!("TRIPVIEWER_TILE_SERVER_BASE_URL").map(String::from),
            api_base_url: option_env!("TRIPVIEWER_API_BASE_URL").map(String::from),
            map_access_token: option_env!("TRIPVIEWER_MAP_ACCESS_TOKEN").map(String::from),
            auth_token: option_env!("TRIPVIEWER_AUTH_TOKEN").map(String::from),
            map_style_url: option_env!("TRIPVIEWER_MAP_STYLE_URL").map(String::from),
        }
    }

    /// Every field of `config` as an override; blank fields are then ignored on apply.
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            tile_server_base_url: Some(config.tile_server_base_url.clone()),
            api_base_url: Some(config.api_base_url.clone()),
            map_access_token: Some(config.map_access_token.clone()),
            auth_token: Some(config.auth_token.clone()),
            map_style_url: Some(config.map_style_url.clone()),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).context(ConfigParseSnafu)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).context(ConfigSerializeSnafu)
    }

    /// Overrides that turn `base` into `target`; fields equal to `base` are left out.
    pub fn diff(base: &ViewerConfig, target: &ViewerConfig) -> Self {
        fn changed(a: &str, b: &str) -> Option<String> {
            (a != b).then(|| b.to_string())
        }
        Self {
            tile_server_base_url: changed(&base.tile_server_base_url, &target.tile_server_base_url),
            api_base_url: changed(&base.api_base_url, &target.api_base_url),
            map_access_token: changed(&base.map_access_token, &target.map_access_token),
            auth_token: changed(&base.auth_token, &target.auth_token),
            map_style_url: changed(&base.map_style_url, &target.map_style_url),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ViewerConfig {
    /// Defaults, then build-time environment, then the persisted overrides.
    pub fn resolve(persisted: Option<&ConfigOverrides>) -> Self {
        let mut config = Self::default().with_overrides(&ConfigOverrides::from_build_env());
        if let Some(persisted) = persisted {
            config = config.with_overrides(persisted);
        }
        config
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        fn pick(slot: &mut String, value: &Option<String>, url: bool) {
            let Some(v) = value.as_deref() else { return };
            if v.trim().is_empty() {
                return;
            }
            *slot = if url {
                normalize_base_url(v.to_string())
            } else {
                v.trim().to_string()
            };
        }

        pick(&mut self.tile_server_base_url, &overrides.tile_server_base_url, true);
        pick(&mut self.api_base_url, &overrides.api_base_url, true);
        pick(&mut self.map_access_token, &overrides.map_access_token, false);
        pick(&mut self.auth_token, &overrides.auth_token, false);
        pick(&mut self.map_style_url, &overrides.map_style_url, false);
        self
    }
}

/// Strips fragment, surrounding whitespace and trailing slashes. Paths are kept so the
/// API may live under a prefix.
pub fn normalize_base_url(mut url: String) -> String {
    if let Some(idx) = url.find('#') {
        url.truncate(idx);
    }
    url.trim().trim_end_matches('/').to_string()
}
