//! Label sets and the merge policy
//!
//! Pure functions deciding which labels get written to an asset. Each asset
//! type has its own overwrite behaviour, captured by [`OverwritePolicy`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Label key to label value
pub type LabelSet = BTreeMap<String, String>;

/// Label patch where `None` tells the provider to delete the key
pub type LabelPatch = BTreeMap<String, Option<String>>;

/// Copy `existing` and insert every desired entry, replacing values on
/// conflicting keys. Keys only in `existing` are kept.
pub fn merge(existing: &LabelSet, desired: &LabelSet) -> LabelSet {
    let mut merged = existing.clone();
    for (key, value) in desired {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// How an asset type behaves when overwrite mode is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Tombstone every existing key, then merge desired on top; one write.
    Tombstone,
    /// Ignore existing labels and write desired as-is.
    Discard,
    /// Clear all labels in a separate write, then write desired.
    ClearFirst,
}

/// The final label payload for the write call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteSet {
    /// The resource ends up with exactly these labels
    Replace(LabelSet),
    /// Keys mapped to `None` are deleted, the rest are set
    Patch(LabelPatch),
}

impl WriteSet {
    /// Labels the resource carries once the write is applied on top of
    /// `existing`
    pub fn resulting_labels(&self) -> LabelSet {
        match self {
            WriteSet::Replace(labels) => labels.clone(),
            WriteSet::Patch(patch) => patch
                .iter()
                .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.clone())))
                .collect(),
        }
    }

    /// JSON object for a REST `labels` field; tombstones become `null`
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = match self {
            WriteSet::Replace(labels) => labels
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
            WriteSet::Patch(patch) => patch
                .iter()
                .map(|(k, v)| {
                    let value = v.clone().map(Value::String).unwrap_or(Value::Null);
                    (k.clone(), value)
                })
                .collect(),
        };
        Value::Object(map)
    }
}

/// What the adapter must send to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPlan {
    pub clear_first: bool,
    pub write: WriteSet,
}

/// Compute the writes for one asset.
///
/// `existing` is `None` only when the policy never reads current labels
/// (bucket in overwrite mode); it is treated as empty otherwise.
pub fn plan_labels(
    policy: OverwritePolicy,
    existing: Option<&LabelSet>,
    desired: &LabelSet,
    overwrite: bool,
) -> LabelPlan {
    let empty = LabelSet::new();
    let existing = existing.unwrap_or(&empty);

    if !overwrite {
        let merged = merge(existing, desired);
        let write = match policy {
            OverwritePolicy::Tombstone => {
                WriteSet::Patch(merged.into_iter().map(|(k, v)| (k, Some(v))).collect())
            }
            _ => WriteSet::Replace(merged),
        };
        return LabelPlan {
            clear_first: false,
            write,
        };
    }

    match policy {
        OverwritePolicy::Tombstone => {
            let mut patch: LabelPatch = existing.keys().map(|k| (k.clone(), None)).collect();
            for (key, value) in desired {
                patch.insert(key.clone(), Some(value.clone()));
            }
            LabelPlan {
                clear_first: false,
                write: WriteSet::Patch(patch),
            }
        }
        OverwritePolicy::Discard => LabelPlan {
            clear_first: false,
            write: WriteSet::Replace(desired.clone()),
        },
        OverwritePolicy::ClearFirst => LabelPlan {
            clear_first: true,
            write: WriteSet::Replace(desired.clone()),
        },
    }
}

/// Read a REST `labels` object into a [`LabelSet`]. Missing means empty.
pub fn labels_from_json(value: Option<&Value>) -> LabelSet {
    value
        .and_then(|v| v.as_object())
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Render labels the way the success line prints them
pub fn format_labels(labels: &LabelSet) -> String {
    let body = labels
        .iter()
        .map(|(k, v)| format!("'{}': '{}'", k, v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", body)
}
