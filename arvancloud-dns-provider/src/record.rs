//! Provider-agnostic DNS record model.
//!
//! A [`Record`] is one resource record relative to a zone. Every variant can be
//! projected to its canonical (name, type, TTL, data) form with [`Record::rr`],
//! and an [`Rr`] can be parsed back into the typed variant with [`Rr::parse`].

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Error raised when raw record data cannot be parsed into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordParseError {
    /// The data of an A/AAAA record is not an address of the matching family.
    #[error("{record_type} record data '{data}' is not a valid address")]
    InvalidAddress {
        /// Record type.
        record_type: String,
        /// Raw data.
        data: String,
    },

    /// The data does not have the number of whitespace-separated fields the type needs.
    #[error("{record_type} record data '{data}' must have {expected} fields")]
    FieldCount {
        /// Record type.
        record_type: String,
        /// Number of fields the type needs.
        expected: usize,
        /// Raw data.
        data: String,
    },

    /// A numeric field does not fit its type.
    #[error("{record_type} record field '{field}' has invalid value '{value}'")]
    InvalidNumber {
        /// Record type.
        record_type: String,
        /// Field name.
        field: &'static str,
        /// Raw field value.
        value: String,
    },

    /// The record data is empty.
    #[error("{record_type} record data is empty")]
    EmptyData {
        /// Record type.
        record_type: String,
    },
}

/// A DNS record relative to a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A or AAAA record, depending on the address family.
    Address(Address),
    /// CNAME record.
    Cname(Cname),
    /// MX record.
    Mx(Mx),
    /// NS record.
    Ns(Ns),
    /// SRV record.
    Srv(Srv),
    /// TXT record.
    Txt(Txt),
    /// CAA record.
    Caa(Caa),
    /// Any other record type, kept in its raw form.
    Rr(Rr),
}

/// A or AAAA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub name: String,
    pub ttl: Duration,
    pub ip: IpAddr,
}

/// CNAME record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cname {
    pub name: String,
    pub ttl: Duration,
    pub target: String,
}

/// MX record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mx {
    pub name: String,
    pub ttl: Duration,
    pub preference: u16,
    pub target: String,
}

/// NS record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ns {
    pub name: String,
    pub ttl: Duration,
    pub target: String,
}

/// SRV record. The name carries the `_service._proto` labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Srv {
    pub name: String,
    pub ttl: Duration,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// TXT record. `text` is the unquoted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Txt {
    pub name: String,
    pub ttl: Duration,
    pub text: String,
}

/// CAA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caa {
    pub name: String,
    pub ttl: Duration,
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

/// Canonical (name, type, TTL, data) form of a record.
///
/// `data` uses zone-file presentation order, e.g. `"10 mail.example.com"` for MX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rr {
    pub name: String,
    pub ttl: Duration,
    pub record_type: String,
    pub data: String,
}

impl Record {
    /// Zone-relative name of the record (`@` for the apex).
    pub fn name(&self) -> &str {
        match self {
            Self::Address(r) => &r.name,
            Self::Cname(r) => &r.name,
            Self::Mx(r) => &r.name,
            Self::Ns(r) => &r.name,
            Self::Srv(r) => &r.name,
            Self::Txt(r) => &r.name,
            Self::Caa(r) => &r.name,
            Self::Rr(r) => &r.name,
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            Self::Address(r) => r.ttl,
            Self::Cname(r) => r.ttl,
            Self::Mx(r) => r.ttl,
            Self::Ns(r) => r.ttl,
            Self::Srv(r) => r.ttl,
            Self::Txt(r) => r.ttl,
            Self::Caa(r) => r.ttl,
            Self::Rr(r) => r.ttl,
        }
    }

    /// Canonical projection of the record.
    pub fn rr(&self) -> Rr {
        let (record_type, data) = match self {
            Self::Address(r) => {
                let record_type = if r.ip.is_ipv4() { "A" } else { "AAAA" };
                (record_type.to_string(), r.ip.to_string())
            }
            Self::Cname(r) => ("CNAME".to_string(), r.target.clone()),
            Self::Mx(r) => ("MX".to_string(), format!("{} {}", r.preference, r.target)),
            Self::Ns(r) => ("NS".to_string(), r.target.clone()),
            Self::Srv(r) => (
                "SRV".to_string(),
                format!("{} {} {} {}", r.priority, r.weight, r.port, r.target),
            ),
            Self::Txt(r) => ("TXT".to_string(), r.text.clone()),
            Self::Caa(r) => (
                "CAA".to_string(),
                format!("{} {} \"{}\"", r.flags, r.tag, r.value),
            ),
            Self::Rr(r) => return r.clone(),
        };

        Rr {
            name: self.name().to_string(),
            ttl: self.ttl(),
            record_type,
            data,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rr = self.rr();
        write!(
            f,
            "{} {} {} {}",
            rr.name,
            rr.ttl.as_secs(),
            rr.record_type,
            rr.data
        )
    }
}

impl Rr {
    /// Parses the raw data into the typed record for its type.
    ///
    /// Types without a typed variant come back unchanged as [`Record::Rr`].
    pub fn parse(&self) -> Result<Record, RecordParseError> {
        let record_type = self.record_type.to_ascii_uppercase();
        let name = self.name.clone();
        let ttl = self.ttl;
        let data = self.data.trim();

        let record = match record_type.as_str() {
            "A" | "AAAA" => {
                let ip: IpAddr = data
                    .parse()
                    .map_err(|_| RecordParseError::InvalidAddress {
                        record_type: record_type.clone(),
                        data: data.to_string(),
                    })?;
                if ip.is_ipv4() != (record_type == "A") {
                    return Err(RecordParseError::InvalidAddress {
                        record_type: record_type.clone(),
                        data: data.to_string(),
                    });
                }
                Record::Address(Address { name, ttl, ip })
            }
            "CNAME" => Record::Cname(Cname {
                name,
                ttl,
                target: non_empty(&record_type, data)?,
            }),
            "NS" => Record::Ns(Ns {
                name,
                ttl,
                target: non_empty(&record_type, data)?,
            }),
            "TXT" => Record::Txt(Txt {
                name,
                ttl,
                text: self.data.clone(),
            }),
            "MX" => {
                let [preference, target] = fields::<2>(&record_type, data)?;
                Record::Mx(Mx {
                    name,
                    ttl,
                    preference: number(&record_type, "preference", preference)?,
                    target: target.to_string(),
                })
            }
            "SRV" => {
                let [priority, weight, port, target] = fields::<4>(&record_type, data)?;
                Record::Srv(Srv {
                    name,
                    ttl,
                    priority: number(&record_type, "priority", priority)?,
                    weight: number(&record_type, "weight", weight)?,
                    port: number(&record_type, "port", port)?,
                    target: target.to_string(),
                })
            }
            "CAA" => {
                let mut parts = data.splitn(3, char::is_whitespace);
                let (Some(flags), Some(tag), Some(value)) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err(RecordParseError::FieldCount {
                        record_type: record_type.clone(),
                        expected: 3,
                        data: data.to_string(),
                    });
                };
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(value);
                Record::Caa(Caa {
                    name,
                    ttl,
                    flags: number(&record_type, "flags", flags)?,
                    tag: tag.to_string(),
                    value: value.to_string(),
                })
            }
            _ => Record::Rr(self.clone()),
        };

        Ok(record)
    }
}

fn non_empty(record_type: &str, data: &str) -> Result<String, RecordParseError> {
    if data.is_empty() {
        return Err(RecordParseError::EmptyData {
            record_type: record_type.to_string(),
        });
    }
    Ok(data.to_string())
}

/// Splits `data` into exactly `N` whitespace-separated fields.
fn fields<'a, const N: usize>(
    record_type: &str,
    data: &'a str,
) -> Result<[&'a str; N], RecordParseError> {
    let parts: Vec<&str> = data.split_whitespace().collect();
    parts
        .try_into()
        .map_err(|_| RecordParseError::FieldCount {
            record_type: record_type.to_string(),
            expected: N,
            data: data.to_string(),
        })
}

fn number<T: std::str::FromStr>(
    record_type: &str,
    field: &'static str,
    value: &str,
) -> Result<T, RecordParseError> {
    value.parse().map_err(|_| RecordParseError::InvalidNumber {
        record_type: record_type.to_string(),
        field,
        value: value.to_string(),
    })
}

// ============ 名称转换 ============

/// Converts a fully-qualified name to a name relative to `zone`.
///
/// `"www.example.com."` + `"example.com"` -> `"www"`,
/// `"example.com"` + `"example.com"` -> `"@"`.
/// Names outside the zone are returned without their trailing dot.
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let full = fqdn.strip_suffix('.').unwrap_or(fqdn);
    let zone = zone.strip_suffix('.').unwrap_or(zone);

    if full.eq_ignore_ascii_case(zone) {
        return "@".to_string();
    }

    let suffix_len = zone.len() + 1;
    if full.len() > suffix_len
        && full.is_char_boundary(full.len() - suffix_len)
        && full[full.len() - suffix_len..].eq_ignore_ascii_case(&format!(".{zone}"))
    {
        return full[..full.len() - suffix_len].to_string();
    }

    full.to_string()
}

/// Converts a zone-relative name to a fully-qualified name (without trailing dot).
///
/// `"www"` + `"example.com"` -> `"www.example.com"`,
/// `"@"` + `"example.com"` -> `"example.com"`.
pub fn absolute_name(name: &str, zone: &str) -> String {
    let zone = zone.strip_suffix('.').unwrap_or(zone);

    if name == "@" || name.is_empty() {
        zone.to_string()
    } else {
        format!("{name}.{zone}")
    }
}
