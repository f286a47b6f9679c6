//! ArvanCloud DNS Provider

mod codec;
mod error;
mod http;
mod locator;
mod provider;
/// ArvanCloud API-specific request/response types.
pub(crate) mod types;

use std::time::Duration;

use reqwest::Client;

use crate::config::ArvanCloudConfig;
use crate::error::{ProviderError, Result};
use crate::http_client::create_http_client;

/// Provider identifier used in errors and logs.
pub(crate) const PROVIDER_NAME: &str = "arvancloud";
/// Records requested per page when listing a zone.
pub(crate) const PAGE_SIZE: u32 = 100;

/// ArvanCloud DNS provider implementation.
///
/// Authenticates with a static API key (`Authorization: Apikey <key>`).
/// One instance owns one HTTP connection pool; share it behind an `Arc`
/// rather than creating a provider per call.
///
/// # Construction
///
/// ```rust,no_run
/// use arvancloud_dns_provider::ArvanCloudProvider;
///
/// # fn main() -> arvancloud_dns_provider::Result<()> {
/// let provider = ArvanCloudProvider::new("your-api-key")?;
/// # Ok(())
/// # }
/// ```
pub struct ArvanCloudProvider {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) operation_timeout: Option<Duration>,
}

impl std::fmt::Debug for ArvanCloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArvanCloudProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ArvanCloudProvider`] with configurable endpoint and timeouts.
#[derive(Debug)]
pub struct ArvanCloudProviderBuilder {
    config: ArvanCloudConfig,
    operation_timeout: Option<Duration>,
}

impl ArvanCloudProviderBuilder {
    fn new(config: ArvanCloudConfig) -> Self {
        Self {
            config,
            operation_timeout: None,
        }
    }

    /// Set the API base URL (default: `https://napi.arvancloud.ir/cdn/4.0`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the per-request timeout (default: 30s, whole seconds, at least 1s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = Some(timeout.as_secs().max(1));
        self
    }

    /// Set the connect timeout (default: 10s, whole seconds, at least 1s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_secs = Some(timeout.as_secs().max(1));
        self
    }

    /// Set a deadline for a whole record operation, covering every request it makes.
    ///
    /// An operation that runs past it fails with [`ProviderError::Timeout`] and
    /// its in-flight request is dropped. Off by default.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Build the [`ArvanCloudProvider`] instance.
    pub fn build(self) -> Result<ArvanCloudProvider> {
        self.config
            .validate()
            .map_err(|e| ProviderError::InvalidParameter {
                provider: PROVIDER_NAME.to_string(),
                param: e.field().to_string(),
                detail: e.to_string(),
            })?;

        let client = create_http_client(
            self.config.connect_timeout(),
            self.config.timeout(),
            PROVIDER_NAME,
        )?;

        Ok(ArvanCloudProvider {
            client,
            api_key: self.config.auth_api_key.trim().to_string(),
            base_url: self.config.base_url().to_string(),
            operation_timeout: self.operation_timeout,
        })
    }
}

impl ArvanCloudProvider {
    /// Creates a provider for the public ArvanCloud API with default timeouts.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(api_key: impl Into<String>) -> ArvanCloudProviderBuilder {
        ArvanCloudProviderBuilder::new(ArvanCloudConfig::new(api_key))
    }

    /// Creates a provider from a deserialized or form-built config.
    pub fn from_config(config: &ArvanCloudConfig) -> Result<Self> {
        ArvanCloudProviderBuilder::new(config.clone()).build()
    }

    /// API base URL this provider talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
