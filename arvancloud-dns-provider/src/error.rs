use serde::{Deserialize, Serialize};

/// Unified error type for all ArvanCloud record operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// Nothing in this crate retries. Transient failures ([`NetworkError`](Self::NetworkError),
/// [`Timeout`](Self::Timeout), [`RateLimited`](Self::RateLimited)) are returned to the caller
/// as-is, and retry policy belongs to whoever drives the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The API key was rejected (HTTP 401).
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A DNS record with the same name/type already exists.
    RecordExists {
        /// Provider that produced the error.
        provider: String,
        /// Name of the conflicting record.
        record_name: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified DNS record was not found.
    RecordNotFound {
        /// Provider that produced the error.
        provider: String,
        /// ID of the record that was not found.
        record_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter is invalid (e.g., bad TTL value, malformed record value).
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The record type cannot be expressed in the provider's value format.
    UnsupportedRecordType {
        /// Provider that produced the error.
        provider: String,
        /// The unsupported record type string.
        record_type: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The HTTP request or the whole operation ran past its deadline.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The specified zone was not found.
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Zone name that was not found.
        domain: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The API key lacks permission for the requested operation (HTTP 403).
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The response envelope carried error messages despite a successful HTTP status.
    ProviderReported {
        /// Provider that produced the error.
        provider: String,
        /// Messages from the envelope's `errors` list, in order.
        messages: Vec<String>,
    },

    /// An address record holds text that is not an IPv4/IPv6 literal.
    MalformedAddress {
        /// Provider that produced the error.
        provider: String,
        /// The offending address text.
        address: String,
        /// Parser error details.
        detail: String,
    },

    /// A provider record value could not be translated to or from the generic record model.
    InvalidRecordData {
        /// Provider that produced the error.
        provider: String,
        /// Record type of the offending record.
        record_type: String,
        /// What went wrong.
        detail: String,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the provider API.
    ///
    /// Catch-all for HTTP statuses not mapped to a specific variant. `raw_message`
    /// holds the raw response body.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code from the API (the HTTP status), if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether the error is expected behaviour (bad input, missing resource, ...).
    ///
    /// Used to pick the log level: `true` logs at `warn`, `false` at `error`.
    /// Keep this in sync when adding variants.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::RecordExists { .. }
                | Self::RecordNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::UnsupportedRecordType { .. }
                | Self::DomainNotFound { .. }
                | Self::PermissionDenied { .. }
                | Self::ProviderReported { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::RecordExists {
                provider,
                record_name,
                ..
            } => {
                write!(f, "[{provider}] Record '{record_name}' already exists")
            }
            Self::RecordNotFound {
                provider,
                record_id,
                ..
            } => {
                write!(f, "[{provider}] Record '{record_id}' not found")
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::UnsupportedRecordType {
                provider,
                record_type,
            } => {
                write!(f, "[{provider}] Unsupported record type: {record_type}")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::DomainNotFound {
                provider,
                domain,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Domain '{domain}' not found: {msg}")
                } else {
                    write!(f, "[{provider}] Domain '{domain}' not found")
                }
            }
            Self::PermissionDenied {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Permission denied: {msg}")
                } else {
                    write!(f, "[{provider}] Permission denied")
                }
            }
            Self::ProviderReported { provider, messages } => {
                write!(f, "[{provider}] API reported errors: {}", messages.join("; "))
            }
            Self::MalformedAddress {
                provider,
                address,
                detail,
            } => {
                write!(f, "[{provider}] Malformed address '{address}': {detail}")
            }
            Self::InvalidRecordData {
                provider,
                record_type,
                detail,
            } => {
                write!(f, "[{provider}] Invalid {record_type} record data: {detail}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_code,
                raw_message,
            } => {
                if let Some(code) = raw_code {
                    write!(f, "[{provider}] HTTP {code}: {raw_message}")
                } else {
                    write!(f, "[{provider}] {raw_message}")
                }
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
