//! Status remap tables, one per signal kind.
//!
//! Each upstream system reports progress in its own vocabulary. The
//! reconciler's transition rules work on canonical statuses, so every raw
//! value passes through exactly one of these finite mappings. Values with
//! no mapping pass through verbatim as `Other`, preserving whatever the
//! upstream said.

use accord_core::{AccountStatus, RoleStatus};

/// Raw provisioning statuses remapped on `ProvisionRequested`.
///
/// The provisioning system reports `CREATED` when the *request* record is
/// created, long before the account exists. Left unmapped it would read as
/// a terminal status mid-flight.
const PROVISION_REMAP: [(&str, AccountStatus); 1] = [("CREATED", AccountStatus::InProgress)];

/// Raw workflow states remapped on `AccountCreated`.
const CREATION_REMAP: [(&str, AccountStatus); 1] = [("SUCCEEDED", AccountStatus::Ready)];

/// Raw deployment statuses treated as success on `RoleDeployed`.
///
/// Stack-based deployments report completion as `*_COMPLETE`; workflow
/// wrappers report `SUCCEEDED`.
const ROLE_SUCCESS: [&str; 3] = ["SUCCEEDED", "CREATE_COMPLETE", "UPDATE_COMPLETE"];

/// Maps a raw provisioning status to the account status axis.
#[must_use]
pub fn provision_account_status(raw: &str) -> AccountStatus {
    for (from, to) in PROVISION_REMAP {
        if raw == from {
            return to;
        }
    }
    AccountStatus::from(raw.to_string())
}

/// Maps a raw account-factory state to the account status axis.
#[must_use]
pub fn creation_account_status(raw: &str) -> AccountStatus {
    for (from, to) in CREATION_REMAP {
        if raw == from {
            return to;
        }
    }
    AccountStatus::from(raw.to_string())
}

/// Maps a raw role-deployment status to the role status axis.
#[must_use]
pub fn deployment_role_status(raw: &str) -> RoleStatus {
    if ROLE_SUCCESS.contains(&raw) {
        return RoleStatus::Ready;
    }
    RoleStatus::from(raw.to_string())
}
