//! Resource name parsing
//!
//! Turns a full resource name such as
//! `//compute.googleapis.com/projects/p1/zones/us-central1-c/instances/vm-1`
//! into the identifiers the type-specific API needs.

use super::kind::AssetKind;
use crate::error::{Error, Result};

const PROJECT_PLACEHOLDER: &str = "$PROJECT_ID";

/// Identifiers of one resource, shaped for its provider API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceId {
    /// `project.dataset`
    Dataset { dataset_ref: String },
    Bucket { bucket: String },
    Topic { topic_id: String },
    Subscription { subscription_id: String },
    BigtableInstance { instance_id: String },
    ComputeInstance { zone: String, instance_id: String },
}

impl ResourceId {
    /// The id printed in the success line
    pub fn display_id(&self) -> &str {
        match self {
            ResourceId::Dataset { dataset_ref } => dataset_ref,
            ResourceId::Bucket { bucket } => bucket,
            ResourceId::Topic { topic_id } => topic_id,
            ResourceId::Subscription { subscription_id } => subscription_id,
            ResourceId::BigtableInstance { instance_id } => instance_id,
            ResourceId::ComputeInstance { instance_id, .. } => instance_id,
        }
    }
}

/// Substitute the active project into a prefix pattern
pub fn resolve_prefix(pattern: &str, project_id: &str) -> String {
    pattern.replace(PROJECT_PLACEHOLDER, project_id)
}

fn strip<'a>(name: &'a str, prefix: &str) -> Result<&'a str> {
    let rest = name
        .strip_prefix(prefix)
        .ok_or_else(|| Error::parse(name, format!("expected prefix {:?}", prefix)))?;
    if rest.is_empty() {
        return Err(Error::parse(name, "nothing after prefix"));
    }
    Ok(rest)
}

fn single_segment<'a>(name: &str, rest: &'a str) -> Result<&'a str> {
    if rest.contains('/') {
        return Err(Error::parse(name, "unexpected '/' in resource id"));
    }
    Ok(rest)
}

/// Parse `name` for an asset of type `kind` within `project_id`
pub fn parse_resource_name(kind: AssetKind, name: &str, project_id: &str) -> Result<ResourceId> {
    let prefix = resolve_prefix(kind.name_prefix(), project_id);
    let rest = strip(name, &prefix)?;

    match kind {
        AssetKind::BigQueryDataset => {
            // {project}/datasets/{dataset}
            let (project, dataset) = rest
                .split_once("/datasets/")
                .ok_or_else(|| Error::parse(name, "missing '/datasets/' segment"))?;
            if project.is_empty() || dataset.is_empty() {
                return Err(Error::parse(name, "empty project or dataset"));
            }
            single_segment(name, project)?;
            single_segment(name, dataset)?;
            Ok(ResourceId::Dataset {
                dataset_ref: format!("{}.{}", project, dataset),
            })
        }
        AssetKind::StorageBucket => Ok(ResourceId::Bucket {
            bucket: single_segment(name, rest)?.to_string(),
        }),
        AssetKind::PubsubTopic => Ok(ResourceId::Topic {
            topic_id: single_segment(name, rest)?.to_string(),
        }),
        AssetKind::PubsubSubscription => Ok(ResourceId::Subscription {
            subscription_id: single_segment(name, rest)?.to_string(),
        }),
        AssetKind::BigtableInstance => Ok(ResourceId::BigtableInstance {
            instance_id: single_segment(name, rest)?.to_string(),
        }),
        AssetKind::ComputeInstance => {
            // {zone}/instances/{instance}
            let segments: Vec<&str> = rest.split('/').collect();
            match segments.as_slice() {
                [zone, "instances", instance] if !zone.is_empty() && !instance.is_empty() => {
                    Ok(ResourceId::ComputeInstance {
                        zone: zone.to_string(),
                        instance_id: instance.to_string(),
                    })
                }
                _ => Err(Error::parse(
                    name,
                    "expected '{zone}/instances/{instance}' after the zones prefix",
                )),
            }
        }
    }
}
