//! The tenant account record: the unit of state the reconciler maintains.
//!
//! One record exists per `(tenant, environment)` pair. It is created once by
//! the provisioning-request step in `PENDING`/`PENDING` and then mutated
//! exclusively by the reconciler in response to lifecycle signals. Records
//! are never deleted by this system.
//!
//! Both status axes pass unknown upstream values through verbatim: the
//! canonical variants exist so the transition rules can match on them, not
//! to constrain what upstream systems may report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tenant::{Environment, TenantId};

/// Status of the cloud account itself.
///
/// Serialized as the raw upstream string (`PENDING`, `IN_PROGRESS`, ...).
/// Values outside the canonical set round-trip verbatim through [`Other`].
///
/// [`Other`]: AccountStatus::Other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountStatus {
    /// Record created, no provisioning activity observed yet.
    Pending,
    /// Provisioning request accepted; the account does not exist yet.
    InProgress,
    /// The account exists and is usable.
    Ready,
    /// Provisioning failed.
    Failed,
    /// Any other raw upstream status, passed through verbatim.
    Other(String),
}

impl AccountStatus {
    /// Returns the raw string form of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Ready => "READY",
            Self::Failed => "FAILED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for AccountStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => Self::Pending,
            "IN_PROGRESS" => Self::InProgress,
            "READY" => Self::Ready,
            "FAILED" => Self::Failed,
            _ => Self::Other(raw),
        }
    }
}

impl From<AccountStatus> for String {
    fn from(status: AccountStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of the cross-account role deployment.
///
/// Same passthrough encoding as [`AccountStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleStatus {
    /// Role deployment has not completed.
    Pending,
    /// The cross-account role is deployed and usable.
    Ready,
    /// Any other raw upstream status, passed through verbatim.
    Other(String),
}

impl RoleStatus {
    /// Returns the raw string form of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Ready => "READY",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for RoleStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => Self::Pending,
            "READY" => Self::Ready,
            _ => Self::Other(raw),
        }
    }
}

impl From<RoleStatus> for String {
    fn from(status: RoleStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RoleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Primary key of a tenant account record.
///
/// Immutable once the record is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// The tenant this account belongs to.
    pub tenant_id: TenantId,
    /// The environment the account serves.
    pub environment: Environment,
}

impl RecordKey {
    /// Creates a new record key.
    #[must_use]
    pub fn new(tenant_id: TenantId, environment: Environment) -> Self {
        Self {
            tenant_id,
            environment,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant_id, self.environment)
    }
}

/// Persistent state of one tenant-scoped cloud account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantAccountRecord {
    /// The tenant this account belongs to.
    pub tenant_id: TenantId,

    /// The environment the account serves.
    pub environment: Environment,

    /// Status of the account creation workflow.
    pub account_status: AccountStatus,

    /// Cloud account identifier. Empty until assigned; never cleared.
    pub account_id: String,

    /// Human-readable account name. Empty until assigned; never cleared.
    /// Secondary correlation attribute: assumed unique across records.
    pub account_name: String,

    /// Status of the cross-account role deployment.
    pub role_status: RoleStatus,

    /// Identifier of the deployed cross-account role.
    /// Non-empty if and only if `role_status` is `Ready`.
    pub role_arn: String,

    /// Timestamp of the last successful write.
    pub last_modified: DateTime<Utc>,
}

impl TenantAccountRecord {
    /// Creates the initial placeholder record for a key.
    ///
    /// This is the shape the provisioning-request step persists before any
    /// lifecycle event arrives: both axes `PENDING`, all assignments empty.
    #[must_use]
    pub fn new(key: RecordKey) -> Self {
        Self {
            tenant_id: key.tenant_id,
            environment: key.environment,
            account_status: AccountStatus::Pending,
            account_id: String::new(),
            account_name: String::new(),
            role_status: RoleStatus::Pending,
            role_arn: String::new(),
            last_modified: Utc::now(),
        }
    }

    /// Returns the primary key of this record.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.tenant_id.clone(), self.environment)
    }

    /// Compares the externally-visible fields of two records.
    ///
    /// `last_modified` is excluded: a write that changes nothing else must
    /// be skipped rather than forced, so the timestamp alone never makes
    /// two records differ.
    #[must_use]
    pub fn visible_eq(&self, other: &Self) -> bool {
        self.tenant_id == other.tenant_id
            && self.environment == other.environment
            && self.account_status == other.account_status
            && self.account_id == other.account_id
            && self.account_name == other.account_name
            && self.role_status == other.role_status
            && self.role_arn == other.role_arn
    }
}
