//! The reconciler state machine.
//!
//! A record's position in its lifecycle is the pair of its two status axes;
//! there is no single global state enum. Each signal kind has one
//! transition rule, and every rule is idempotent by construction:
//! re-applying a signal to an already-updated record computes the same
//! record again, and writes that would change nothing externally visible
//! are skipped rather than forced.
//!
//! Writes are compare-and-swap against the version token the record was
//! correlated at. A losing writer surfaces `StoreWriteConflict` and drops
//! the event; redelivery of the same upstream event is the recovery path.

use chrono::Utc;

use accord_core::{RecordStore, RoleStatus, TenantAccountRecord, VersionedRecord, WriteResult};

use crate::config::PipelineConfig;
use crate::error::{LifecycleError, Result};
use crate::signal::LifecycleSignal;
use crate::status::{creation_account_status, deployment_role_status, provision_account_status};

/// Outcome of processing one lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A write was performed.
    Applied,
    /// The record was already current; no write was performed.
    NoChange,
    /// The event matched no recognized (source, event-type) pair.
    Ignored,
}

/// Applies correlated signals to tenant account records.
#[derive(Debug, Clone)]
pub struct Reconciler {
    store: RecordStore,
    config: PipelineConfig,
}

impl Reconciler {
    /// Creates a reconciler over the given store.
    #[must_use]
    pub fn new(store: RecordStore, config: PipelineConfig) -> Self {
        Self { store, config }
    }

    /// Applies a signal to its correlated record.
    ///
    /// # Errors
    ///
    /// Returns `StoreWriteConflict` if the record changed between
    /// correlation and write, or a storage error.
    pub async fn apply(
        &self,
        signal: &LifecycleSignal,
        current: &VersionedRecord,
    ) -> Result<Disposition> {
        // Redelivered "already current" success events must not produce
        // writes: a record that is READY with its role ARN set stays
        // untouched.
        if let LifecycleSignal::RoleDeployed { raw_status, .. } = signal {
            if deployment_role_status(raw_status) == RoleStatus::Ready
                && current.record.role_status == RoleStatus::Ready
                && !current.record.role_arn.is_empty()
            {
                tracing::debug!(
                    key = %current.record.key(),
                    "role already deployed; skipping redundant write"
                );
                return Ok(Disposition::NoChange);
            }
        }

        let mut next = transition(&current.record, signal, &self.config);
        if next.visible_eq(&current.record) {
            tracing::debug!(
                key = %current.record.key(),
                signal = signal.kind(),
                "record already current; skipping write"
            );
            return Ok(Disposition::NoChange);
        }

        // last_modified never moves backward, even under clock skew
        // between invocations.
        next.last_modified = Utc::now().max(current.record.last_modified);

        match self.store.put(&next, &current.version).await? {
            WriteResult::Success { version } => {
                tracing::info!(
                    key = %next.key(),
                    signal = signal.kind(),
                    account_status = %next.account_status,
                    role_status = %next.role_status,
                    version = %version,
                    "record reconciled"
                );
                Ok(Disposition::Applied)
            }
            WriteResult::PreconditionFailed { current_version } => {
                tracing::warn!(
                    key = %next.key(),
                    signal = signal.kind(),
                    read_version = %current.version,
                    current_version = %current_version,
                    "write lost to concurrent modification"
                );
                Err(LifecycleError::StoreWriteConflict {
                    key: next.key().to_string(),
                })
            }
        }
    }
}

/// Computes the successor record for a signal. Pure.
///
/// The `(tenant, environment)` key is immutable; `account_id` and
/// `account_name` are only ever overwritten with non-empty values; and
/// `role_arn` is non-empty exactly when the role status is `Ready`.
#[must_use]
pub fn transition(
    current: &TenantAccountRecord,
    signal: &LifecycleSignal,
    config: &PipelineConfig,
) -> TenantAccountRecord {
    let mut next = current.clone();

    match signal {
        LifecycleSignal::ProvisionRequested {
            account_name,
            raw_status,
            ..
        } => {
            next.account_status = provision_account_status(raw_status);
            if let Some(name) = account_name {
                if !name.is_empty() {
                    next.account_name = name.clone();
                }
            }
        }
        LifecycleSignal::AccountCreated {
            account_id,
            raw_state,
            ..
        } => {
            if !account_id.is_empty() {
                next.account_id = account_id.clone();
            }
            next.account_status = creation_account_status(raw_state);
        }
        LifecycleSignal::RoleDeployed {
            cloud_account_id,
            raw_status,
        } => {
            let role_status = deployment_role_status(raw_status);
            next.role_arn = if role_status == RoleStatus::Ready {
                config.role_arn_for(cloud_account_id)
            } else {
                String::new()
            };
            next.role_status = role_status;
        }
    }

    next
}
