//! Generic HTTP client tools
//!
//! Sends requests built by the provider, logs them, and turns transport-level
//! failures into [`ProviderError`]s. The provider keeps full control over URL,
//! headers and body; status and envelope handling stay with the provider.
//!
//! Nothing here retries: a failed request is reported once.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

/// Maximum number of bytes of a response body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns response text
    ///
    /// # Arguments
    /// * `request_builder` - configured request constructor (including URL, headers, body, etc.)
    /// * `provider_name` - Provider name (for logging)
    /// * `method_name` - request method name (such as "GET", "POST", used for logs)
    /// * `url` - request URL (for logging)
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` - status code and body for any non-429 response
    /// * `Err(ProviderError::Timeout)` - the request ran past the client timeout
    /// * `Err(ProviderError::NetworkError)` - connection or body read failure
    /// * `Err(ProviderError::RateLimited)` - HTTP 429
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        // Retry-After 需在读取 body 之前取出
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        let response_text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: format!("Timed out reading response body: {e}"),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(ProviderError::ParseError)` - parsing failed
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

/// 创建带超时配置的 HTTP Client
pub(crate) fn create_http_client(
    connect_timeout: Duration,
    timeout: Duration,
    provider_name: &str,
) -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider_name.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// Truncate a string for safe logging.
///
/// Record values (DKIM keys, verification tokens) end up in response bodies,
/// so bodies are cut to [`TRUNCATE_LIMIT`] bytes on a char boundary.
pub(crate) fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }

    let mut end = TRUNCATE_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}
