//! DNS Provider implementations

mod arvancloud;

pub use arvancloud::{ArvanCloudProvider, ArvanCloudProviderBuilder};
