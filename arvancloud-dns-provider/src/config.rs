//! Provider configuration.
//!
//! [`ArvanCloudConfig`] can be deserialized from a config file, or built from
//! the flat key/value map a settings form produces via [`ArvanCloudConfig::from_map`].

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default ArvanCloud CDN API base URL.
pub const DEFAULT_BASE_URL: &str = "https://napi.arvancloud.ir/cdn/4.0";
/// 默认连接超时（秒）
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Validation error for [`ArvanCloudConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConfigValidationError {
    /// A required field is missing entirely.
    #[error("Missing required field: {label}")]
    MissingField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A field is present but empty/whitespace-only.
    #[error("Field must not be empty: {label}")]
    EmptyField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A field has an invalid format.
    #[error("{label}: {reason}")]
    InvalidFormat {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl ConfigValidationError {
    /// Machine-readable key of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. }
            | Self::EmptyField { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}

/// Settings for an [`ArvanCloudProvider`](crate::ArvanCloudProvider).
///
/// Serialized field names follow the ArvanCloud plugin config (`auth_api_key`, ...).
/// The `Debug` impl redacts the API key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArvanCloudConfig {
    /// API key from the ArvanCloud user panel.
    pub auth_api_key: String,
    /// Overrides the API base URL. Defaults to [`DEFAULT_BASE_URL`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Connect timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ArvanCloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArvanCloudConfig")
            .field("auth_api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl ArvanCloudConfig {
    /// Creates a config with the given API key and default settings.
    pub fn new(auth_api_key: impl Into<String>) -> Self {
        Self {
            auth_api_key: auth_api_key.into(),
            base_url: None,
            timeout_secs: None,
            connect_timeout_secs: None,
        }
    }

    /// Builds a config from a flat key/value map.
    ///
    /// Keys: `authApiKey` (required), `baseUrl`, `timeoutSecs`, `connectTimeoutSecs`.
    /// Optional keys with blank values are treated as absent.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, ConfigValidationError> {
        let config = Self {
            auth_api_key: get_required_field(map, "authApiKey", "API Key")?,
            base_url: get_optional_field(map, "baseUrl"),
            timeout_secs: get_optional_secs(map, "timeoutSecs", "Request Timeout")?,
            connect_timeout_secs: get_optional_secs(
                map,
                "connectTimeoutSecs",
                "Connect Timeout",
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Convert the config to a `HashMap` for flat key-value storage.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map: HashMap<String, String> =
            [("authApiKey".to_string(), self.auth_api_key.clone())].into();
        if let Some(base_url) = &self.base_url {
            map.insert("baseUrl".to_string(), base_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            map.insert("timeoutSecs".to_string(), secs.to_string());
        }
        if let Some(secs) = self.connect_timeout_secs {
            map.insert("connectTimeoutSecs".to_string(), secs.to_string());
        }
        map
    }

    /// Checks the API key, base URL and timeouts.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.auth_api_key.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField {
                field: "authApiKey".to_string(),
                label: "API Key".to_string(),
            });
        }

        if let Some(base_url) = &self.base_url {
            let url = reqwest::Url::parse(base_url).map_err(|e| {
                ConfigValidationError::InvalidFormat {
                    field: "baseUrl".to_string(),
                    label: "Base URL".to_string(),
                    reason: e.to_string(),
                }
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigValidationError::InvalidFormat {
                    field: "baseUrl".to_string(),
                    label: "Base URL".to_string(),
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
        }

        for (field, label, secs) in [
            ("timeoutSecs", "Request Timeout", self.timeout_secs),
            ("connectTimeoutSecs", "Connect Timeout", self.connect_timeout_secs),
        ] {
            if secs == Some(0) {
                return Err(ConfigValidationError::InvalidFormat {
                    field: field.to_string(),
                    label: label.to_string(),
                    reason: "must be greater than 0".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }
}

/// Obtain required fields from `HashMap` and verify that it is not empty
fn get_required_field(
    map: &HashMap<String, String>,
    key: &str,
    label: &str,
) -> Result<String, ConfigValidationError> {
    match map.get(key) {
        None => Err(ConfigValidationError::MissingField {
            field: key.to_string(),
            label: label.to_string(),
        }),
        Some(v) if v.trim().is_empty() => Err(ConfigValidationError::EmptyField {
            field: key.to_string(),
            label: label.to_string(),
        }),
        Some(v) => Ok(v.trim().to_string()),
    }
}

fn get_optional_field(map: &HashMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn get_optional_secs(
    map: &HashMap<String, String>,
    key: &str,
    label: &str,
) -> Result<Option<u64>, ConfigValidationError> {
    get_optional_field(map, key)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|e| ConfigValidationError::InvalidFormat {
                    field: key.to_string(),
                    label: label.to_string(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}
