//! ArvanCloud API 类型定义

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// ArvanCloud API 通用响应信封
///
/// `data` 保持为原始 JSON，先检查 `errors` 再按调用方需要的类型解析。
#[derive(Debug, Default, Deserialize)]
pub struct ArvanResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_errors")]
    pub errors: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub links: Option<PageLinks>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl ArvanResponse {
    /// 是否还有下一页：需要 `links.next` 存在，且 `meta` 未表明已到最后一页
    ///
    /// 只有 `current_page` 与 `last_page` 同时给出时才参与判断。
    pub fn has_next_page(&self) -> bool {
        let has_next_link = self
            .links
            .as_ref()
            .and_then(|links| links.next.as_deref())
            .is_some_and(|next| !next.is_empty());
        let before_last_page = self
            .meta
            .as_ref()
            .is_none_or(|meta| match (meta.current_page, meta.last_page) {
                (Some(current), Some(last)) => current < last,
                _ => true,
            });
        has_next_link && before_last_page
    }
}

/// `errors` 字段有两种形态：字符串数组，或 `{字段: [消息]}` 形式的校验错误
fn deserialize_errors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn flatten(prefix: Option<&str>, value: &Value, out: &mut Vec<String>) {
        match value {
            Value::Null => {}
            Value::String(msg) => out.push(match prefix {
                Some(field) => format!("{field}: {msg}"),
                None => msg.clone(),
            }),
            Value::Array(items) => {
                for item in items {
                    flatten(prefix, item, out);
                }
            }
            Value::Object(fields) => {
                for (field, item) in fields {
                    flatten(Some(field.as_str()), item, out);
                }
            }
            other => out.push(match prefix {
                Some(field) => format!("{field}: {other}"),
                None => other.to_string(),
            }),
        }
    }

    let value = Value::deserialize(deserializer)?;
    let mut errors = Vec::new();
    flatten(None, &value, &mut errors);
    Ok(errors)
}

/// ArvanCloud DNS 记录
///
/// `value` 的结构随记录类型变化，A/AAAA 为 [`AddressValue`] 数组。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArvanDnsRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub cloud: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_protected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_https: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_filter_mode: Option<IpFilter>,
}

/// IP 过滤模式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpFilter {
    #[serde(default)]
    pub count: String,
    #[serde(default)]
    pub geo_filter: String,
    #[serde(default)]
    pub order: String,
}

/// PUT 响应的 `data` 比其他接口多包一层 `{data, message}`，也兼容直接返回记录
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UpdatedRecord {
    Wrapped { data: ArvanDnsRecord },
    Bare(ArvanDnsRecord),
}

impl UpdatedRecord {
    pub fn into_record(self) -> ArvanDnsRecord {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

// ============ 各记录类型的 value 结构 ============

/// A/AAAA 记录值（API 中为数组元素）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressValue {
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtValue {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxValue {
    pub host: String,
    pub priority: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnameValue {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnameValue {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvValue {
    pub target: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
}

/// CAA 记录值（API 不提供 flags）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaValue {
    pub value: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NsValue {
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtrValue {
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsaValue {
    pub usage: String,
    pub selector: String,
    pub matching_type: String,
    pub certificate: String,
}
