use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::record::Record;

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（ArvanCloud 下为 HTTP 状态码）
    pub code: Option<String>,
    /// 原始错误消息（响应体原文）
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists` 等错误）
    pub record_name: Option<String>,
    /// 记录 ID（用于 `RecordNotFound` 等错误）
    pub record_id: Option<String>,
    /// 域名（用于 `DomainNotFound` 等错误）
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone: &str) -> Self {
        Self {
            domain: Some(zone.to_string()),
            ..Self::default()
        }
    }

    pub fn with_record_id(mut self, record_id: &str) -> Self {
        self.record_id = Some(record_id.to_string());
        self
    }

    pub fn with_record_name(mut self, record_name: &str) -> Self {
        self.record_name = Some(record_name.to_string());
        self
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Lists the records of a zone.
#[async_trait]
pub trait RecordGetter: Send + Sync {
    /// Returns every record in `zone`.
    ///
    /// Fails as a whole if any record cannot be fetched or translated.
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>>;
}

/// Adds records to a zone.
#[async_trait]
pub trait RecordAppender: Send + Sync {
    /// Creates `records` in `zone` and returns the records as created by the provider.
    ///
    /// Records are created one by one. On failure the records created before
    /// the failing one stay in place.
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;
}

/// Replaces records in a zone.
#[async_trait]
pub trait RecordSetter: Send + Sync {
    /// Makes `records` the only records for each of their (name, type) pairs.
    ///
    /// Not atomic: existing records are deleted before the new ones are
    /// created, and a failure midway leaves the zone partially updated.
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;
}

/// Removes records from a zone.
#[async_trait]
pub trait RecordDeleter: Send + Sync {
    /// Deletes `records` from `zone` and returns the records actually removed.
    ///
    /// Records that do not exist are skipped without error.
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;
}

/// A provider that supports every record operation.
///
/// Implemented for any type implementing the four record traits, so callers
/// can hold an `Arc<dyn DnsRecordProvider>`.
pub trait DnsRecordProvider: RecordGetter + RecordAppender + RecordSetter + RecordDeleter {}

impl<T> DnsRecordProvider for T where T: RecordGetter + RecordAppender + RecordSetter + RecordDeleter {}
