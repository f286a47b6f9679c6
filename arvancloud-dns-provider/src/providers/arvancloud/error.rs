//! ArvanCloud 错误映射
//!
//! ArvanCloud 不提供业务错误码，只能依据 HTTP 状态码分类：
//!
//! - **401**：API Key 无效 → `InvalidCredentials`
//! - **403**：无权限 → `PermissionDenied`
//! - **404**：带记录 ID 时为 `RecordNotFound`，否则为 `DomainNotFound`
//! - **409**：记录冲突 → `RecordExists`
//! - **400 / 422**：参数校验失败 → `InvalidParameter`
//! - **429**：限流 → `RateLimited`（通常已在 `HttpUtils` 中处理）
//! - 其他状态码 fallback 到 `Unknown`，保留原始响应体

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{ArvanCloudProvider, PROVIDER_NAME};

impl ProviderErrorMapper for ArvanCloudProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let status = raw.code.as_deref().and_then(|code| code.parse::<u16>().ok());

        match status {
            Some(401) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some(403) => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some(404) => match context.record_id {
                Some(record_id) => ProviderError::RecordNotFound {
                    provider: self.provider_name().to_string(),
                    record_id,
                    raw_message: Some(raw.message),
                },
                None => ProviderError::DomainNotFound {
                    provider: self.provider_name().to_string(),
                    domain: context.domain.unwrap_or_default(),
                    raw_message: Some(raw.message),
                },
            },

            Some(409) => ProviderError::RecordExists {
                provider: self.provider_name().to_string(),
                record_name: context.record_name.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            Some(400 | 422) => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context.record_name.map_or_else(
                    || "request".to_string(),
                    |name| format!("record '{name}'"),
                ),
                detail: raw.message,
            },

            Some(429) => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}
