//! Error types
//!
//! Every failure the labeler can hit while processing a batch. Unrecognized
//! asset types are not errors; the dispatcher reports them as skipped.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration is missing or malformed. Fatal before discovery.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The asset search call failed. Fatal before any asset is processed.
    #[error("Asset discovery failed: {0}")]
    Discovery(String),

    /// A resource name did not have the shape its asset type requires.
    #[error("Cannot parse resource name {name:?}: {reason}")]
    Parse { name: String, reason: String },

    /// A read, clear or write call against a provider API failed.
    #[error("Provider call failed for {asset}: {source:#}")]
    Provider {
        asset: String,
        #[source]
        source: anyhow::Error,
    },

    /// A compute label write did not reach DONE within the wait bound.
    #[error("Operation {operation} did not complete within {timeout:?}")]
    OperationTimeout { operation: String, timeout: Duration },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(name: &str, reason: impl Into<String>) -> Self {
        Error::Parse {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn provider(asset: &str, source: anyhow::Error) -> Self {
        Error::Provider {
            asset: asset.to_string(),
            source,
        }
    }
}
