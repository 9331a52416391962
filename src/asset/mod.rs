//! Asset handling
//!
//! Everything between a search hit and a label write.
//!
//! # Architecture
//!
//! - [`discovery`] - Finds assets through Cloud Asset Inventory
//! - [`kind`] - The supported asset types and their type tags
//! - [`name`] - Parses full resource names into provider identifiers
//! - [`adapter`] - Per-type read/clear/write and the reconcile flow
//! - [`dispatch`] - Routes a discovered asset to its adapter
//!
//! # Example
//!
//! ```ignore
//! use gcp_labeler::asset::{search_assets, Dispatcher};
//!
//! async fn label_all(registry: &ProviderRegistry, desired: &LabelSet) -> Result<()> {
//!     let assets = search_assets(registry.client(), "my-project", &types).await?;
//!     let dispatcher = Dispatcher::new(registry, "my-project", desired, false);
//!     for asset in &assets {
//!         dispatcher.process(asset).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod discovery;
pub mod dispatch;
pub mod kind;
pub mod name;

pub use adapter::{reconcile, LabelAdapter};
pub use discovery::{search_assets, DiscoveredAsset};
pub use dispatch::{AssetOutcome, Dispatch, Dispatcher};
pub use kind::{supported_type_tags, AssetKind};
pub use name::{parse_resource_name, ResourceId};
