//! Translation between [`Record`] and [`ArvanDnsRecord`].
//!
//! ArvanCloud stores every A/AAAA address of a name in one record whose value
//! is a list of entries. The generic model has one record per address, so
//! list results go through [`split_addresses`] before [`to_generic`], and
//! [`to_provider`] always sends a single-entry list.

use std::net::IpAddr;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ProviderError, Result};
use crate::record::{Address, Caa, Cname, Mx, Ns, Record, Rr, Srv, Txt, relative_name};

use super::PROVIDER_NAME;
use super::types::{
    AddressValue, AnameValue, ArvanDnsRecord, CaaValue, CnameValue, MxValue, NsValue, PtrValue,
    SrvValue, TlsaValue, TxtValue,
};

/// Whether the type tag is A or AAAA, in any case.
pub(crate) fn is_address_type(record_type: &str) -> bool {
    record_type.eq_ignore_ascii_case("A") || record_type.eq_ignore_ascii_case("AAAA")
}

/// Converts a provider record to the generic model.
///
/// A/AAAA records must already be narrowed to a single address entry.
pub(crate) fn to_generic(record: &ArvanDnsRecord, zone: &str) -> Result<Record> {
    let name = relative_name(&record.name, zone);
    let ttl = Duration::from_secs(u64::from(record.ttl));
    let record_type = record.record_type.to_ascii_uppercase();

    let generic = match record_type.as_str() {
        "A" | "AAAA" => {
            let entry = single_address(record)?;
            let ip = entry
                .ip
                .trim()
                .parse::<IpAddr>()
                .map_err(|e| ProviderError::MalformedAddress {
                    provider: PROVIDER_NAME.to_string(),
                    address: entry.ip.clone(),
                    detail: e.to_string(),
                })?;
            Record::Address(Address { name, ttl, ip })
        }
        "CAA" => {
            let value: CaaValue = decode_value(record)?;
            Record::Caa(Caa {
                name,
                ttl,
                flags: 0,
                tag: value.tag,
                value: value.value,
            })
        }
        "CNAME" => {
            let value: CnameValue = decode_value(record)?;
            Record::Cname(Cname {
                name,
                ttl,
                target: value.host,
            })
        }
        "MX" => {
            let value: MxValue = decode_value(record)?;
            Record::Mx(Mx {
                name,
                ttl,
                preference: value.priority,
                target: value.host,
            })
        }
        "NS" => {
            let value: NsValue = decode_value(record)?;
            Record::Ns(Ns {
                name,
                ttl,
                target: value.host,
            })
        }
        "SRV" => {
            let value: SrvValue = decode_value(record)?;
            Record::Srv(Srv {
                name,
                ttl,
                priority: value.priority,
                weight: value.weight,
                port: value.port,
                target: value.target,
            })
        }
        "TXT" => {
            let value: TxtValue = decode_value(record)?;
            Record::Txt(Txt {
                name,
                ttl,
                text: unwrap_txt(&value.text).to_string(),
            })
        }
        _ => {
            let rr = Rr {
                name,
                ttl,
                record_type,
                data: flatten_value(record)?,
            };
            rr.parse()
                .map_err(|e| invalid_data(&rr.record_type, e.to_string()))?
        }
    };

    Ok(generic)
}

/// Converts a generic record to the provider's request body.
///
/// [`Record::Rr`] is encoded when the type has a known ArvanCloud value shape
/// (PTR, ANAME, TLSA, or a typed record in raw form). Any other raw type is
/// rejected with [`ProviderError::UnsupportedRecordType`].
pub(crate) fn to_provider(record: &Record) -> Result<ArvanDnsRecord> {
    let (record_type, value) = match record {
        Record::Address(r) => {
            let record_type = if r.ip.is_ipv4() { "A" } else { "AAAA" };
            let entry = AddressValue {
                ip: r.ip.to_string(),
                ..AddressValue::default()
            };
            (record_type.to_string(), to_json(&[entry])?)
        }
        Record::Cname(r) => (
            "CNAME".to_string(),
            to_json(&CnameValue {
                host: r.target.clone(),
                host_header: None,
                port: None,
            })?,
        ),
        Record::Mx(r) => (
            "MX".to_string(),
            to_json(&MxValue {
                host: r.target.clone(),
                priority: r.preference,
            })?,
        ),
        Record::Ns(r) => (
            "NS".to_string(),
            to_json(&NsValue {
                host: r.target.clone(),
            })?,
        ),
        Record::Srv(r) => (
            "SRV".to_string(),
            to_json(&SrvValue {
                target: r.target.clone(),
                port: r.port,
                priority: r.priority,
                weight: r.weight,
            })?,
        ),
        Record::Txt(r) => (
            "TXT".to_string(),
            to_json(&TxtValue {
                text: wrap_txt(&r.text),
            })?,
        ),
        Record::Caa(r) => (
            "CAA".to_string(),
            to_json(&CaaValue {
                value: r.value.clone(),
                tag: r.tag.clone(),
            })?,
        ),
        Record::Rr(rr) => match rr.parse() {
            Ok(Record::Rr(_)) => encode_raw(rr)?,
            Ok(typed) => return to_provider(&typed),
            Err(e) => return Err(invalid_data(&rr.record_type, e.to_string())),
        },
    };

    Ok(ArvanDnsRecord {
        record_type,
        name: record.name().to_string(),
        value,
        ttl: u32::try_from(record.ttl().as_secs()).unwrap_or(u32::MAX),
        ..ArvanDnsRecord::default()
    })
}

/// Expands an A/AAAA record into one record per address entry.
///
/// Other types are returned as a single unchanged record.
pub(crate) fn split_addresses(record: &ArvanDnsRecord) -> Result<Vec<ArvanDnsRecord>> {
    if !is_address_type(&record.record_type) {
        return Ok(vec![record.clone()]);
    }

    address_entries(record)?
        .into_iter()
        .map(|entry| with_address(record, &entry))
        .collect()
}

/// Decodes the address entries of an A/AAAA record.
///
/// A bare entry object is accepted as a one-entry list.
pub(crate) fn address_entries(record: &ArvanDnsRecord) -> Result<Vec<AddressValue>> {
    match &record.value {
        Value::Array(_) => decode_value(record),
        Value::Object(_) => Ok(vec![decode_value(record)?]),
        other => Err(invalid_data(
            &record.record_type,
            format!("expected a list of address entries, got {other}"),
        )),
    }
}

/// Copy of `record` whose value is the given single address entry.
pub(crate) fn with_address(record: &ArvanDnsRecord, entry: &AddressValue) -> Result<ArvanDnsRecord> {
    Ok(ArvanDnsRecord {
        value: to_json(entry)?,
        ..record.clone()
    })
}

/// Copy of `record` whose value is the given address list.
pub(crate) fn with_addresses(
    record: &ArvanDnsRecord,
    entries: &[AddressValue],
) -> Result<ArvanDnsRecord> {
    Ok(ArvanDnsRecord {
        value: to_json(entries)?,
        ..record.clone()
    })
}

fn single_address(record: &ArvanDnsRecord) -> Result<AddressValue> {
    let mut entries = address_entries(record)?;
    if entries.len() != 1 {
        return Err(invalid_data(
            &record.record_type,
            format!(
                "record '{}' holds {} addresses, expected exactly one",
                record.name,
                entries.len()
            ),
        ));
    }
    Ok(entries.remove(0))
}

/// Encodes raw record data for the types ArvanCloud has a value shape for.
fn encode_raw(rr: &Rr) -> Result<(String, Value)> {
    let record_type = rr.record_type.to_ascii_uppercase();
    let data = rr.data.trim();

    let value = match record_type.as_str() {
        "PTR" => to_json(&PtrValue {
            domain: data.to_string(),
        })?,
        "ANAME" => to_json(&AnameValue {
            location: data.to_string(),
            host_header: None,
            port: None,
        })?,
        "TLSA" => {
            let fields: Vec<&str> = data.split_whitespace().collect();
            let [usage, selector, matching_type, certificate] = fields.as_slice() else {
                return Err(invalid_data(
                    &record_type,
                    format!("'{data}' must have 4 fields"),
                ));
            };
            to_json(&TlsaValue {
                usage: (*usage).to_string(),
                selector: (*selector).to_string(),
                matching_type: (*matching_type).to_string(),
                certificate: (*certificate).to_string(),
            })?
        }
        _ => {
            return Err(ProviderError::UnsupportedRecordType {
                provider: PROVIDER_NAME.to_string(),
                record_type,
            });
        }
    };

    if data.is_empty() {
        return Err(invalid_data(&record_type, "record data is empty".to_string()));
    }

    Ok((record_type, value))
}

/// Flattens an object value into its field values joined by spaces, in wire order.
///
/// The value may be an inline object or a string holding a JSON object.
fn flatten_value(record: &ArvanDnsRecord) -> Result<String> {
    let fields: Map<String, Value> = match &record.value {
        Value::Object(fields) => fields.clone(),
        Value::String(raw) => serde_json::from_str(raw).map_err(|e| {
            invalid_data(
                &record.record_type,
                format!("value of '{}' is not a JSON object: {e}", record.name),
            )
        })?,
        other => {
            return Err(invalid_data(
                &record.record_type,
                format!("value of '{}' is not a JSON object: {other}", record.name),
            ));
        }
    };

    let parts: Vec<String> = fields
        .values()
        .filter_map(|value| match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect();

    Ok(parts.join(" "))
}

/// Strips one layer of surrounding double quotes, if present.
fn unwrap_txt(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Wraps text in double quotes unless it already is.
fn wrap_txt(text: &str) -> String {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text.to_string()
    } else {
        format!("\"{text}\"")
    }
}

fn decode_value<T: DeserializeOwned>(record: &ArvanDnsRecord) -> Result<T> {
    serde_json::from_value(record.value.clone()).map_err(|e| {
        invalid_data(
            &record.record_type,
            format!("value of '{}' does not match its type: {e}", record.name),
        )
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ProviderError::SerializationError {
        provider: PROVIDER_NAME.to_string(),
        detail: e.to_string(),
    })
}

fn invalid_data(record_type: &str, detail: String) -> ProviderError {
    ProviderError::InvalidRecordData {
        provider: PROVIDER_NAME.to_string(),
        record_type: record_type.to_ascii_uppercase(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ZONE: &str = "example.com";

    fn ttl() -> Duration {
        Duration::from_secs(300)
    }

    fn provider_record(record_type: &str, name: &str, value: Value) -> ArvanDnsRecord {
        ArvanDnsRecord {
            id: "id-1".to_string(),
            record_type: record_type.to_string(),
            name: name.to_string(),
            value,
            ttl: 300,
            ..ArvanDnsRecord::default()
        }
    }

    fn assert_round_trip(record: &Record) {
        let first = to_provider(record).unwrap();
        let generic = to_generic(&first, ZONE).unwrap();
        let second = to_provider(&generic).unwrap();
        assert_eq!(first, second, "round trip changed {record}");
    }

    #[test]
    fn round_trip_modeled_types() {
        let records = [
            Record::Address(Address {
                name: "www".to_string(),
                ttl: ttl(),
                ip: "192.0.2.1".parse().unwrap(),
            }),
            Record::Address(Address {
                name: "@".to_string(),
                ttl: ttl(),
                ip: "2001:db8::1".parse().unwrap(),
            }),
            Record::Cname(Cname {
                name: "blog".to_string(),
                ttl: ttl(),
                target: "host.example.net".to_string(),
            }),
            Record::Mx(Mx {
                name: "@".to_string(),
                ttl: ttl(),
                preference: 10,
                target: "mail.example.com".to_string(),
            }),
            Record::Ns(Ns {
                name: "sub".to_string(),
                ttl: ttl(),
                target: "ns1.example.net".to_string(),
            }),
            Record::Srv(Srv {
                name: "_sip._tcp".to_string(),
                ttl: ttl(),
                priority: 1,
                weight: 5,
                port: 5060,
                target: "sip.example.com".to_string(),
            }),
            Record::Txt(Txt {
                name: "_acme-challenge".to_string(),
                ttl: ttl(),
                text: "token".to_string(),
            }),
            Record::Txt(Txt {
                name: "quoted".to_string(),
                ttl: ttl(),
                text: "\"already quoted\"".to_string(),
            }),
            Record::Caa(Caa {
                name: "@".to_string(),
                ttl: ttl(),
                flags: 0,
                tag: "issue".to_string(),
                value: "letsencrypt.org".to_string(),
            }),
        ];

        for record in &records {
            assert_round_trip(record);
        }
    }

    #[test]
    fn address_is_sent_as_single_entry_list() {
        let record = Record::Address(Address {
            name: "www".to_string(),
            ttl: ttl(),
            ip: "192.0.2.1".parse().unwrap(),
        });
        let body = to_provider(&record).unwrap();
        assert_eq!(body.record_type, "A");
        assert_eq!(body.value, json!([{ "ip": "192.0.2.1" }]));
        assert!(body.id.is_empty());
    }

    #[test]
    fn txt_is_wrapped_once() {
        assert_eq!(wrap_txt("hello"), "\"hello\"");
        assert_eq!(wrap_txt("\"hello\""), "\"hello\"");
        assert_eq!(wrap_txt("\""), "\"\"\"");
        assert_eq!(unwrap_txt("\"hello\""), "hello");
        assert_eq!(unwrap_txt("hello"), "hello");
        assert_eq!(unwrap_txt("\""), "\"");
    }

    #[test]
    fn txt_read_strips_quotes() {
        let record = provider_record("txt", "@", json!({ "text": "\"v=spf1 -all\"" }));
        let generic = to_generic(&record, ZONE).unwrap();
        assert!(
            matches!(&generic, Record::Txt(txt) if txt.text == "v=spf1 -all" && txt.name == "@"),
            "unexpected record: {generic:?}"
        );
    }

    #[test]
    fn fully_qualified_names_become_relative() {
        let record = provider_record("CNAME", "www.example.com.", json!({ "host": "x.net" }));
        assert_eq!(to_generic(&record, "example.com.").unwrap().name(), "www");
    }

    #[test]
    fn bad_ip_is_malformed_address() {
        let record = provider_record("A", "www", json!({ "ip": "999.1.1.1" }));
        let result = to_generic(&record, ZONE);
        assert!(
            matches!(&result, Err(ProviderError::MalformedAddress { address, .. }) if address == "999.1.1.1"),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn unsplit_address_list_is_rejected() {
        let record = provider_record(
            "A",
            "www",
            json!([{ "ip": "192.0.2.1" }, { "ip": "192.0.2.2" }]),
        );
        assert!(matches!(
            to_generic(&record, ZONE),
            Err(ProviderError::InvalidRecordData { .. })
        ));
    }

    #[test]
    fn split_addresses_keeps_flags() {
        let mut record = provider_record(
            "A",
            "www",
            json!([{ "ip": "192.0.2.1", "weight": 100 }, { "ip": "192.0.2.2" }]),
        );
        record.cloud = true;

        let split = split_addresses(&record).unwrap();
        assert_eq!(split.len(), 2);
        assert!(split.iter().all(|r| r.cloud && r.id == "id-1"));
        assert_eq!(split[0].value, json!({ "ip": "192.0.2.1", "weight": 100 }));

        let ips: Vec<String> = split
            .iter()
            .map(|r| to_generic(r, ZONE).unwrap().rr().data)
            .collect();
        assert_eq!(ips, vec!["192.0.2.1", "192.0.2.2"]);
    }

    #[test]
    fn split_leaves_other_types_alone() {
        let record = provider_record("MX", "@", json!({ "host": "mail.example.com", "priority": 10 }));
        assert_eq!(split_addresses(&record).unwrap(), vec![record]);
    }

    #[test]
    fn fallback_flattens_in_wire_order() {
        let record = provider_record(
            "TLSA",
            "_443._tcp",
            json!({ "usage": "3", "selector": "1", "matching_type": "1", "certificate": "abcd" }),
        );
        let generic = to_generic(&record, ZONE).unwrap();
        assert_eq!(
            generic,
            Record::Rr(Rr {
                name: "_443._tcp".to_string(),
                ttl: ttl(),
                record_type: "TLSA".to_string(),
                data: "3 1 1 abcd".to_string(),
            })
        );
    }

    #[test]
    fn fallback_accepts_json_string_and_skips_empty_fields() {
        let record = provider_record(
            "ANAME",
            "@",
            json!(r#"{"location":"origin.example.net","host_header":"","port":null}"#),
        );
        let generic = to_generic(&record, ZONE).unwrap();
        assert_eq!(generic.rr().data, "origin.example.net");
    }

    #[test]
    fn fallback_rejects_non_object() {
        let record = provider_record("PTR", "1", json!("not json"));
        assert!(matches!(
            to_generic(&record, ZONE),
            Err(ProviderError::InvalidRecordData { .. })
        ));
    }

    #[test]
    fn raw_records_with_known_shapes_are_encoded() {
        let ptr = Record::Rr(Rr {
            name: "1".to_string(),
            ttl: ttl(),
            record_type: "PTR".to_string(),
            data: "host.example.com".to_string(),
        });
        let body = to_provider(&ptr).unwrap();
        assert_eq!(body.value, json!({ "domain": "host.example.com" }));
        assert_round_trip(&ptr);

        let tlsa = Record::Rr(Rr {
            name: "_443._tcp".to_string(),
            ttl: ttl(),
            record_type: "tlsa".to_string(),
            data: "3 1 1 abcd".to_string(),
        });
        assert_eq!(to_provider(&tlsa).unwrap().record_type, "TLSA");
        assert_round_trip(&tlsa);
    }

    #[test]
    fn raw_record_of_typed_kind_uses_typed_encoding() {
        let raw_mx = Record::Rr(Rr {
            name: "@".to_string(),
            ttl: ttl(),
            record_type: "MX".to_string(),
            data: "10 mail.example.com".to_string(),
        });
        let body = to_provider(&raw_mx).unwrap();
        assert_eq!(body.value, json!({ "host": "mail.example.com", "priority": 10 }));
    }

    #[test]
    fn unknown_raw_type_is_unsupported() {
        let loc = Record::Rr(Rr {
            name: "@".to_string(),
            ttl: ttl(),
            record_type: "LOC".to_string(),
            data: "52 22 23.000 N 4 53 32.000 E -2.00m".to_string(),
        });
        let result = to_provider(&loc);
        assert!(
            matches!(&result, Err(ProviderError::UnsupportedRecordType { record_type, .. }) if record_type == "LOC"),
            "unexpected result: {result:?}"
        );
    }
}
