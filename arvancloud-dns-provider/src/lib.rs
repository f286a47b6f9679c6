//! # arvancloud-dns-provider
//!
//! Manage DNS records hosted on [ArvanCloud](https://www.arvancloud.ir/) through a
//! provider-agnostic record model.
//!
//! The crate exposes four record operations, each as its own trait so callers
//! can depend on only what they use:
//!
//! | Trait | Operation |
//! |-------|-----------|
//! | [`RecordGetter`] | List every record of a zone |
//! | [`RecordAppender`] | Create records |
//! | [`RecordSetter`] | Replace the records of each (name, type) pair |
//! | [`RecordDeleter`] | Delete records, skipping ones that do not exist |
//!
//! [`DnsRecordProvider`] combines all four.
//!
//! ArvanCloud keeps every address of an A/AAAA name in one multi-value record.
//! The generic model has one [`Record::Address`] per address: listing expands
//! them, and deleting one address only removes that entry.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! arvancloud-dns-provider = "0.1"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use arvancloud_dns_provider::{
//!     ArvanCloudProvider, Record, RecordAppender, RecordDeleter, RecordGetter, Txt,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ArvanCloudProvider::builder("your-api-key")
//!         .operation_timeout(Duration::from_secs(60))
//!         .build()?;
//!
//!     for record in provider.get_records("example.com").await? {
//!         println!("{record}");
//!     }
//!
//!     let challenge = Record::Txt(Txt {
//!         name: "_acme-challenge".to_string(),
//!         ttl: Duration::from_secs(120),
//!         text: "token".to_string(),
//!     });
//!     provider.append_records("example.com", &[challenge.clone()]).await?;
//!     provider.delete_records("example.com", &[challenge]).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`]: the API key was rejected
//! - [`ProviderError::ProviderReported`]: the response envelope listed errors
//! - [`ProviderError::UnsupportedRecordType`]: the record cannot be sent to ArvanCloud
//! - [`ProviderError::Timeout`]: a request or the whole operation ran out of time
//!
//! Nothing is retried. Operations are not atomic: on failure, changes made
//! before the failing step stay in place.

mod config;
mod error;
mod http_client;
mod providers;
pub mod record;
mod traits;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export configuration
pub use config::{ArvanCloudConfig, ConfigValidationError, DEFAULT_BASE_URL};

// Re-export the record model
pub use record::{Address, Caa, Cname, Mx, Ns, Record, RecordParseError, Rr, Srv, Txt};

// Re-export record operation traits (internal traits are not exported)
pub use traits::{DnsRecordProvider, RecordAppender, RecordDeleter, RecordGetter, RecordSetter};

pub use providers::{ArvanCloudProvider, ArvanCloudProviderBuilder};
