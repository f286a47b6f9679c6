//! ArvanCloud HTTP 请求方法
//!
//! 所有请求都经过同一个 `send`：鉴权头、状态码检查、信封 `errors` 检查，
//! 全部通过后才解析 `data`。

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::types::{ArvanDnsRecord, ArvanResponse, UpdatedRecord};
use super::{ArvanCloudProvider, PAGE_SIZE};

/// 去掉 zone 末尾的点
pub(crate) fn normalize_zone(zone: &str) -> &str {
    zone.strip_suffix('.').unwrap_or(zone)
}

impl ArvanCloudProvider {
    // ==================== 辅助方法 ====================

    fn records_url(&self, zone: &str) -> String {
        format!(
            "{}/domains/{}/dns-records",
            self.base_url,
            urlencoding::encode(normalize_zone(zone))
        )
    }

    fn record_url(&self, zone: &str, record_id: &str) -> String {
        format!(
            "{}/{}",
            self.records_url(zone),
            urlencoding::encode(record_id)
        )
    }

    /// 统一处理响应：HTTP 状态码 → 信封解析 → `errors` 检查
    fn handle_response(
        &self,
        status: u16,
        response_text: &str,
        ctx: ErrorContext,
    ) -> Result<ArvanResponse> {
        if status >= 400 {
            return Err(self.map_error(
                RawApiError::with_code(status.to_string(), response_text),
                ctx,
            ));
        }

        // DELETE 等接口可能返回空 body
        if response_text.trim().is_empty() {
            return Ok(ArvanResponse::default());
        }

        let envelope: ArvanResponse = HttpUtils::parse_json(response_text, self.provider_name())?;

        if !envelope.errors.is_empty() {
            log::error!(
                "[{}] API 错误: {}",
                self.provider_name(),
                envelope.errors.join("; ")
            );
            return Err(ProviderError::ProviderReported {
                provider: self.provider_name().to_string(),
                messages: envelope.errors,
            });
        }

        if let Some(message) = &envelope.message {
            log::debug!("[{}] API message: {message}", self.provider_name());
        }

        Ok(envelope)
    }

    /// 执行请求并返回已通过检查的信封
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&ArvanDnsRecord>,
        ctx: ErrorContext,
    ) -> Result<ArvanResponse> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(AUTHORIZATION, format!("Apikey {}", self.api_key))
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            let payload =
                serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                    provider: self.provider_name().to_string(),
                    detail: e.to_string(),
                })?;
            log::debug!("[{}] Request Body: {payload}", self.provider_name());
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), url)
                .await?;

        self.handle_response(status, &response_text, ctx)
    }

    /// 将 `data` 解析为目标类型，缺失时报错
    fn decode_data<T: DeserializeOwned>(&self, data: Option<Value>) -> Result<T> {
        let data = data.ok_or_else(|| self.parse_error("响应中缺少 data 字段"))?;
        serde_json::from_value(data).map_err(|e| {
            log::error!("[{}] data 解析失败: {e}", self.provider_name());
            self.parse_error(e)
        })
    }

    // ==================== 记录接口 ====================

    /// 分页获取 zone 下的全部记录，任意一页失败则整体失败
    pub(crate) async fn list_records(&self, zone: &str) -> Result<Vec<ArvanDnsRecord>> {
        let base = self.records_url(zone);
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!("{base}?page={page}&per_page={PAGE_SIZE}");
            let envelope = self
                .send(Method::GET, &url, None, ErrorContext::zone(zone))
                .await?;

            let has_next_page = envelope.has_next_page();
            if let Some(total) = envelope.meta.as_ref().and_then(|meta| meta.total) {
                log::debug!(
                    "[{}] zone {zone}: page {page}, {total} records in total",
                    self.provider_name()
                );
            }

            let batch: Vec<ArvanDnsRecord> = match envelope.data {
                Some(Value::Null) | None => Vec::new(),
                data => self.decode_data(data)?,
            };
            let fetched = batch.len();
            records.extend(batch);

            if !has_next_page || fetched == 0 {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    /// 创建记录
    pub(crate) async fn create_record(
        &self,
        zone: &str,
        record: &ArvanDnsRecord,
    ) -> Result<ArvanDnsRecord> {
        let ctx = ErrorContext::zone(zone).with_record_name(&record.name);
        let envelope = self
            .send(Method::POST, &self.records_url(zone), Some(record), ctx)
            .await?;
        self.decode_data(envelope.data)
    }

    /// 更新记录（响应的 `data` 多包一层）
    pub(crate) async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        record: &ArvanDnsRecord,
    ) -> Result<ArvanDnsRecord> {
        let ctx = ErrorContext::zone(zone)
            .with_record_id(record_id)
            .with_record_name(&record.name);
        let envelope = self
            .send(
                Method::PUT,
                &self.record_url(zone, record_id),
                Some(record),
                ctx,
            )
            .await?;
        let updated: UpdatedRecord = self.decode_data(envelope.data)?;
        Ok(updated.into_record())
    }

    /// 删除记录，返回 API 回显的记录（如有）
    pub(crate) async fn delete_record(
        &self,
        zone: &str,
        record_id: &str,
    ) -> Result<Option<ArvanDnsRecord>> {
        let ctx = ErrorContext::zone(zone).with_record_id(record_id);
        let envelope = self
            .send(Method::DELETE, &self.record_url(zone, record_id), None, ctx)
            .await?;

        // 回显仅供参考，格式不符时忽略
        Ok(envelope
            .data
            .and_then(|data| serde_json::from_value::<ArvanDnsRecord>(data).ok()))
    }
}
