//! Property-based tests for reconciler invariants.
//!
//! These tests apply randomized sequences of lifecycle signals to a record
//! and verify the record-level invariants hold after every transition,
//! regardless of delivery order, duplication, or interleaving of failures.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use proptest::prelude::*;
use tokio_test::block_on;

use accord_core::{
    Environment, MemoryBackend, RecordKey, RecordStore, RoleStatus, StaticDirectory,
    TenantAccountRecord, TenantId,
};
use accord_lifecycle::{Correlator, LifecycleSignal, PipelineConfig, Reconciler};

const ACCOUNT_IDS: [&str; 2] = ["111122223333", "444455556666"];
const ACCOUNT_NAMES: [&str; 2] = ["n1", "n2"];

fn arb_provision() -> impl Strategy<Value = LifecycleSignal> {
    (
        prop::sample::select(vec!["CREATED", "IN_PROGRESS", "FAILED", "TAINTED"]),
        prop::option::of(prop::sample::select(ACCOUNT_NAMES.to_vec())),
    )
        .prop_map(|(status, name)| LifecycleSignal::ProvisionRequested {
            tenant_id: TenantId::new("t1").unwrap(),
            environment: Environment::Dev,
            account_name: name.map(String::from),
            raw_status: status.to_string(),
        })
}

fn arb_account_created() -> impl Strategy<Value = LifecycleSignal> {
    (
        prop::sample::select(ACCOUNT_IDS.to_vec()),
        prop::sample::select(ACCOUNT_NAMES.to_vec()),
        prop::sample::select(vec!["SUCCEEDED", "FAILED", "IN_PROGRESS"]),
    )
        .prop_map(|(id, name, state)| LifecycleSignal::AccountCreated {
            account_id: id.to_string(),
            account_name: name.to_string(),
            raw_state: state.to_string(),
        })
}

fn arb_role_deployed() -> impl Strategy<Value = LifecycleSignal> {
    (
        prop::sample::select(ACCOUNT_IDS.to_vec()),
        prop::sample::select(vec![
            "SUCCEEDED",
            "CREATE_COMPLETE",
            "CREATE_FAILED",
            "DELETE_COMPLETE",
        ]),
    )
        .prop_map(|(id, status)| LifecycleSignal::RoleDeployed {
            cloud_account_id: id.to_string(),
            raw_status: status.to_string(),
        })
}

fn arb_signal() -> impl Strategy<Value = LifecycleSignal> {
    prop_oneof![arb_provision(), arb_account_created(), arb_role_deployed()]
}

/// Applies a signal sequence to a single record, snapshotting the stored
/// record after each step. Correlation misses and write conflicts drop the
/// signal, exactly as the pipeline does.
async fn apply_sequence(signals: &[LifecycleSignal]) -> Vec<TenantAccountRecord> {
    let store = RecordStore::new(Arc::new(MemoryBackend::new()));
    let directory = Arc::new(StaticDirectory::new());
    directory.insert(ACCOUNT_IDS[0], ACCOUNT_NAMES[0]).unwrap();
    directory.insert(ACCOUNT_IDS[1], ACCOUNT_NAMES[1]).unwrap();

    let key = RecordKey::new(TenantId::new("t1").unwrap(), Environment::Dev);
    let initial = TenantAccountRecord::new(key.clone());
    store.create(&initial).await.unwrap();

    let correlator = Correlator::new(store.clone(), directory);
    let reconciler = Reconciler::new(store.clone(), PipelineConfig::default());

    let mut snapshots = vec![initial];
    for signal in signals {
        let Ok(matched) = correlator.correlate(signal).await else {
            continue;
        };
        let _ = reconciler.apply(signal, &matched).await;
        let read = store.get(&key).await.unwrap().unwrap();
        snapshots.push(read.record);
    }
    snapshots
}

proptest! {
    /// INVARIANT: `role_arn` is non-empty exactly when `role_status` is
    /// READY, after every transition.
    #[test]
    fn role_arn_tracks_role_readiness(signals in prop::collection::vec(arb_signal(), 1..24)) {
        let snapshots = block_on(apply_sequence(&signals));

        for record in &snapshots {
            prop_assert_eq!(
                record.role_arn.is_empty(),
                record.role_status != RoleStatus::Ready,
                "role_arn '{}' disagrees with role_status '{}'",
                record.role_arn,
                record.role_status
            );
        }
    }

    /// INVARIANT: `account_id` and `account_name`, once assigned, are
    /// never cleared by any later signal.
    #[test]
    fn assignments_are_never_cleared(signals in prop::collection::vec(arb_signal(), 1..24)) {
        let snapshots = block_on(apply_sequence(&signals));

        let mut id_assigned = false;
        let mut name_assigned = false;
        for record in &snapshots {
            if id_assigned {
                prop_assert!(!record.account_id.is_empty(), "account_id was cleared");
            }
            if name_assigned {
                prop_assert!(!record.account_name.is_empty(), "account_name was cleared");
            }
            id_assigned |= !record.account_id.is_empty();
            name_assigned |= !record.account_name.is_empty();
        }
    }

    /// INVARIANT: `last_modified` never moves backward under the
    /// reconciler's own writes.
    #[test]
    fn last_modified_is_monotonic(signals in prop::collection::vec(arb_signal(), 1..24)) {
        let snapshots = block_on(apply_sequence(&signals));

        for pair in snapshots.windows(2) {
            prop_assert!(pair[0].last_modified <= pair[1].last_modified);
        }
    }

    /// INVARIANT: a raw `CREATED` provisioning status never survives into
    /// the stored record.
    #[test]
    fn raw_created_status_never_persists(signals in prop::collection::vec(arb_signal(), 1..24)) {
        let snapshots = block_on(apply_sequence(&signals));

        for record in &snapshots {
            prop_assert_ne!(record.account_status.as_str(), "CREATED");
        }
    }

    /// Replaying the same sequence twice converges to the same visible
    /// state: the rules are deterministic and idempotent by construction.
    #[test]
    fn sequences_are_deterministic(signals in prop::collection::vec(arb_signal(), 1..16)) {
        let first = block_on(apply_sequence(&signals));
        let second = block_on(apply_sequence(&signals));

        let a = first.last().unwrap();
        let b = second.last().unwrap();
        prop_assert!(a.visible_eq(b));
    }
}
