//! ArvanCloud 记录操作 trait 实现

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::record::Record;
use crate::traits::{
    ProviderErrorMapper, RecordAppender, RecordDeleter, RecordGetter, RecordSetter,
};

use super::ArvanCloudProvider;
use super::codec::{
    address_entries, is_address_type, split_addresses, to_generic, to_provider, with_address,
    with_addresses,
};
use super::locator::{find_existing_position, find_existing_record};
use super::types::{AddressValue, ArvanDnsRecord};

/// 地址条目是否与记录数据相同（能解析为 IP 时按 IP 比较）
fn same_address(entry: &AddressValue, data: &str) -> bool {
    let (entry_ip, data) = (entry.ip.trim(), data.trim());
    match (entry_ip.parse::<IpAddr>(), data.parse::<IpAddr>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => entry_ip.eq_ignore_ascii_case(data),
    }
}

impl ArvanCloudProvider {
    /// 为整个操作套上截止时间，并按错误类型记录日志
    async fn with_deadline<T>(
        &self,
        operation: &str,
        zone: &str,
        future: impl Future<Output = Result<T>> + Send,
    ) -> Result<T> {
        let result = match self.operation_timeout {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .unwrap_or_else(|_| Err(self.deadline_error(operation, zone, limit))),
            None => future.await,
        };

        if let Err(e) = &result {
            if e.is_expected() {
                log::warn!("[{}] {operation} on {zone} failed: {e}", self.provider_name());
            } else {
                log::error!("[{}] {operation} on {zone} failed: {e}", self.provider_name());
            }
        }

        result
    }

    fn deadline_error(&self, operation: &str, zone: &str, limit: Duration) -> ProviderError {
        ProviderError::Timeout {
            provider: self.provider_name().to_string(),
            detail: format!("{operation} on zone '{zone}' did not finish within {limit:?}"),
        }
    }

    /// 将 API 记录展开为通用记录（A/AAAA 每个地址一条）
    fn translate(record: &ArvanDnsRecord, zone: &str, out: &mut Vec<Record>) -> Result<()> {
        for single in split_addresses(record)? {
            out.push(to_generic(&single, zone)?);
        }
        Ok(())
    }

    async fn fetch_records(&self, zone: &str) -> Result<Vec<Record>> {
        let records = self.list_records(zone).await?;
        let mut generic = Vec::with_capacity(records.len());
        for record in &records {
            Self::translate(record, zone, &mut generic)?;
        }
        log::debug!(
            "[{}] zone {zone}: {} provider records, {} records",
            self.provider_name(),
            records.len(),
            generic.len()
        );
        Ok(generic)
    }

    /// 依次创建记录，遇到第一个错误即停止
    async fn create_all(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let mut created = Vec::with_capacity(records.len());
        for record in records {
            let body = to_provider(record)?;
            let response = self.create_record(zone, &body).await?;
            log::info!(
                "[{}] created {} record '{}' in {zone}",
                self.provider_name(),
                response.record_type,
                response.name
            );
            Self::translate(&response, zone, &mut created)?;
        }
        Ok(created)
    }

    /// 先删除每个 (name, type) 已有的记录，再创建新记录
    ///
    /// 定位基于一次性拉取的快照；输入中同一 (name, type) 出现多次时，
    /// 第二次删除会命中已删除的 ID 并返回 `RecordNotFound`。
    async fn replace_all(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let existing = self.list_records(zone).await?;

        for record in records {
            let rr = record.rr();
            if let Some(found) = find_existing_record(&existing, &rr.name, &rr.record_type, zone) {
                self.delete_record(zone, &found.id).await?;
                log::info!(
                    "[{}] removed {} record '{}' ({}) before replacing it",
                    self.provider_name(),
                    found.record_type,
                    found.name,
                    found.id
                );
            }
        }

        self.create_all(zone, records).await
    }

    /// 删除记录；A/AAAA 只移除匹配的地址，其余地址保留
    async fn remove_all(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        // 本地快照随每次删除/更新同步修改，后续定位看到的是最新状态
        let mut snapshot = self.list_records(zone).await?;
        let mut deleted = Vec::new();

        for record in records {
            let rr = record.rr();
            let Some(index) = find_existing_position(&snapshot, &rr.name, &rr.record_type, zone)
            else {
                log::debug!(
                    "[{}] {} record '{}' not found in {zone}, skipping",
                    self.provider_name(),
                    rr.record_type,
                    rr.name
                );
                continue;
            };

            if !is_address_type(&snapshot[index].record_type) {
                self.delete_record(zone, &snapshot[index].id).await?;
                let found = snapshot.remove(index);
                deleted.push(to_generic(&found, zone)?);
                continue;
            }

            let (removed, kept): (Vec<AddressValue>, Vec<AddressValue>) =
                address_entries(&snapshot[index])?
                    .into_iter()
                    .partition(|entry| same_address(entry, &rr.data));

            if removed.is_empty() {
                log::debug!(
                    "[{}] '{}' has no address {}, skipping",
                    self.provider_name(),
                    rr.name,
                    rr.data
                );
                continue;
            }

            let found = if kept.is_empty() {
                self.delete_record(zone, &snapshot[index].id).await?;
                snapshot.remove(index)
            } else {
                let reduced = with_addresses(&snapshot[index], &kept)?;
                self.update_record(zone, &reduced.id, &reduced).await?;
                log::info!(
                    "[{}] '{}' keeps {} of {} addresses",
                    self.provider_name(),
                    reduced.name,
                    kept.len(),
                    kept.len() + removed.len()
                );
                std::mem::replace(&mut snapshot[index], reduced)
            };

            for entry in &removed {
                deleted.push(to_generic(&with_address(&found, entry)?, zone)?);
            }
        }

        Ok(deleted)
    }
}

#[async_trait]
impl RecordGetter for ArvanCloudProvider {
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>> {
        self.with_deadline("get_records", zone, self.fetch_records(zone))
            .await
    }
}

#[async_trait]
impl RecordAppender for ArvanCloudProvider {
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.with_deadline("append_records", zone, self.create_all(zone, records))
            .await
    }
}

#[async_trait]
impl RecordSetter for ArvanCloudProvider {
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.with_deadline("set_records", zone, self.replace_all(zone, records))
            .await
    }
}

#[async_trait]
impl RecordDeleter for ArvanCloudProvider {
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.with_deadline("delete_records", zone, self.remove_all(zone, records))
            .await
    }
}
