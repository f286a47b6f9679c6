//! 在已拉取的记录列表中查找同名同类型的记录
//!
//! ArvanCloud 返回的 `name` 可能是 `@`、相对名或带/不带末尾点的完整域名，
//! 比较前统一转为小写的完整域名。

use super::http::normalize_zone;
use super::types::ArvanDnsRecord;
use crate::record::absolute_name;

/// 名称的规范形式：小写、无末尾点的完整域名
fn canonical_name(name: &str, zone: &str) -> String {
    let zone = normalize_zone(zone).to_ascii_lowercase();
    let name = name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase();

    // 已是完整域名时不再拼接 zone
    if name == zone || name.ends_with(&format!(".{zone}")) {
        return name;
    }
    absolute_name(&name, &zone)
}

/// 返回第一条名称与类型都匹配的记录下标
pub(crate) fn find_existing_position(
    records: &[ArvanDnsRecord],
    name: &str,
    record_type: &str,
    zone: &str,
) -> Option<usize> {
    let wanted = canonical_name(name, zone);
    records.iter().position(|record| {
        record.record_type.eq_ignore_ascii_case(record_type)
            && canonical_name(&record.name, zone) == wanted
    })
}

/// Finds the provider record with the same name and type as the given record.
///
/// Names match whether written as `@`, relative, or fully qualified, with or
/// without a trailing dot and in any case.
pub(crate) fn find_existing_record<'a>(
    records: &'a [ArvanDnsRecord],
    name: &str,
    record_type: &str,
    zone: &str,
) -> Option<&'a ArvanDnsRecord> {
    find_existing_position(records, name, record_type, zone).map(|index| &records[index])
}
