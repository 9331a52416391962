//! Property-based tests using proptest
//!
//! These tests verify the merge policy and resource name parsing using
//! randomized label sets and identifiers.

use gcp_labeler::asset::{parse_resource_name, AssetKind, ResourceId};
use gcp_labeler::labels::{merge, plan_labels, LabelSet, OverwritePolicy, WriteSet};
use proptest::prelude::*;

/// Label keys and values in the character set GCP accepts
fn arb_labels() -> impl Strategy<Value = LabelSet> {
    prop::collection::btree_map("[a-z][a-z0-9_-]{0,10}", "[a-z0-9_-]{0,10}", 0..12)
}

fn arb_policy() -> impl Strategy<Value = OverwritePolicy> {
    prop_oneof![
        Just(OverwritePolicy::Tombstone),
        Just(OverwritePolicy::Discard),
        Just(OverwritePolicy::ClearFirst),
    ]
}

proptest! {
    /// Every desired key carries the desired value after a merge
    #[test]
    fn merge_applies_every_desired_label(existing in arb_labels(), desired in arb_labels()) {
        let merged = merge(&existing, &desired);
        for (key, value) in &desired {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    /// Existing keys the user did not mention survive a merge untouched
    #[test]
    fn merge_preserves_unmentioned_labels(existing in arb_labels(), desired in arb_labels()) {
        let merged = merge(&existing, &desired);
        for (key, value) in existing.iter().filter(|(k, _)| !desired.contains_key(*k)) {
            prop_assert_eq!(merged.get(key), Some(value));
        }
        prop_assert!(merged.len() >= desired.len());
        prop_assert!(merged.len() <= existing.len() + desired.len());
    }

    /// Merge mode never drops a key, whatever the asset type
    #[test]
    fn merge_mode_is_lossless(
        policy in arb_policy(),
        existing in arb_labels(),
        desired in arb_labels(),
    ) {
        let plan = plan_labels(policy, Some(&existing), &desired, false);
        prop_assert!(!plan.clear_first);
        prop_assert_eq!(plan.write.resulting_labels(), merge(&existing, &desired));
    }

    /// Overwrite mode leaves exactly the desired labels for every asset type
    #[test]
    fn overwrite_mode_yields_desired(
        policy in arb_policy(),
        existing in arb_labels(),
        desired in arb_labels(),
    ) {
        let plan = plan_labels(policy, Some(&existing), &desired, true);
        prop_assert_eq!(plan.write.resulting_labels(), desired.clone());
    }

    /// Dataset overwrite: every existing key is either tombstoned or superseded
    #[test]
    fn dataset_overwrite_covers_existing_keys(existing in arb_labels(), desired in arb_labels()) {
        let plan = plan_labels(OverwritePolicy::Tombstone, Some(&existing), &desired, true);
        let WriteSet::Patch(patch) = plan.write else {
            return Err(TestCaseError::fail("dataset overwrite must be a patch"));
        };
        for key in existing.keys() {
            let expected = desired.get(key).cloned();
            prop_assert_eq!(patch.get(key), Some(&expected));
        }
    }

    /// Bucket overwrite ignores existing labels entirely
    #[test]
    fn bucket_overwrite_is_independent_of_existing(
        existing in arb_labels(),
        desired in arb_labels(),
    ) {
        let with_existing = plan_labels(OverwritePolicy::Discard, Some(&existing), &desired, true);
        let without = plan_labels(OverwritePolicy::Discard, None, &desired, true);
        prop_assert_eq!(with_existing, without);
    }

    /// Parsing a compute name is deterministic and recovers zone and id
    #[test]
    fn compute_names_parse_back(
        project in "[a-z][a-z0-9-]{4,20}[a-z0-9]",
        zone in "[a-z]{2,8}-[a-z]{2,8}[0-9]-[a-f]",
        instance in "[a-z][a-z0-9-]{0,30}",
    ) {
        let name = format!(
            "//compute.googleapis.com/projects/{}/zones/{}/instances/{}",
            project, zone, instance
        );
        let first = parse_resource_name(AssetKind::ComputeInstance, &name, &project).unwrap();
        let second = parse_resource_name(AssetKind::ComputeInstance, &name, &project).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, ResourceId::ComputeInstance { zone, instance_id: instance });
    }

    /// Dataset names always become `project.dataset`
    #[test]
    fn dataset_names_parse_to_dotted_ref(
        project in "[a-z][a-z0-9-]{4,20}[a-z0-9]",
        dataset in "[a-zA-Z0-9_]{1,30}",
    ) {
        let name = format!("//bigquery.googleapis.com/projects/{}/datasets/{}", project, dataset);
        let id = parse_resource_name(AssetKind::BigQueryDataset, &name, &project).unwrap();
        prop_assert_eq!(id.display_id(), format!("{}.{}", project, dataset));
    }

    /// Names from another service never parse as a compute instance
    #[test]
    fn foreign_names_are_rejected(bucket in "[a-z0-9][a-z0-9._-]{2,40}") {
        let name = format!("//storage.googleapis.com/{}", bucket);
        prop_assert!(parse_resource_name(AssetKind::ComputeInstance, &name, "demo-project").is_err());
    }
}

/// Fixed cases from the reference scenarios
mod scenarios {
    use super::*;

    fn set(pairs: &[(&str, &str)]) -> LabelSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn vm_name_parses_zone_and_instance() {
        let id = parse_resource_name(
            AssetKind::ComputeInstance,
            "//compute.googleapis.com/projects/p1/zones/us-central1-c/instances/vm-1",
            "p1",
        )
        .unwrap();
        assert_eq!(
            id,
            ResourceId::ComputeInstance {
                zone: "us-central1-c".to_string(),
                instance_id: "vm-1".to_string(),
            }
        );
    }

    #[test]
    fn dataset_name_parses_to_dotted_ref() {
        let id = parse_resource_name(
            AssetKind::BigQueryDataset,
            "//bigquery.googleapis.com/projects/p1/datasets/ds1",
            "p1",
        )
        .unwrap();
        assert_eq!(id.display_id(), "p1.ds1");
    }

    #[test]
    fn bucket_merge_and_overwrite() {
        let existing = set(&[("team", "x")]);
        let desired = set(&[("env", "prod")]);

        let merged = plan_labels(OverwritePolicy::Discard, Some(&existing), &desired, false);
        assert_eq!(
            merged.write.resulting_labels(),
            set(&[("team", "x"), ("env", "prod")])
        );

        let replaced = plan_labels(OverwritePolicy::Discard, None, &desired, true);
        assert_eq!(replaced.write.resulting_labels(), set(&[("env", "prod")]));
    }
}
