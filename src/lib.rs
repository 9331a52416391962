//! Bulk labeling of Google Cloud assets.
//!
//! Searches a project with Cloud Asset Inventory and applies (or merges) a
//! fixed label set on every BigQuery dataset, Cloud Storage bucket, Pub/Sub
//! topic and subscription, Bigtable instance and Compute Engine VM found.

pub mod asset;
pub mod config;
pub mod error;
pub mod gcp;
pub mod labels;
pub mod provider;
pub mod run;

pub use error::{Error, Result};
