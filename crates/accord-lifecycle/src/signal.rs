//! Canonical lifecycle signals.
//!
//! A signal is the source-agnostic form of one upstream lifecycle event,
//! produced by the normalizer and consumed by the correlator and
//! reconciler. Only `ProvisionRequested` carries the primary record key;
//! the other two kinds must be correlated through the account name.

use serde::{Deserialize, Serialize};

use accord_core::{Environment, TenantId};

/// A normalized lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleSignal {
    /// A provisioning request was submitted for a tenant account.
    ///
    /// Derived from the product-provisioning audit event; the only signal
    /// kind that embeds the `(tenant, environment)` primary key.
    ProvisionRequested {
        /// Tenant the request was tagged with.
        tenant_id: TenantId,
        /// Environment the request was tagged with.
        environment: Environment,
        /// Account name chosen at provisioning time, when supplied.
        account_name: Option<String>,
        /// Raw provisioning record status.
        raw_status: String,
    },

    /// The account-creation workflow completed in the account factory.
    ///
    /// Carries no tenant key; correlated by account name.
    AccountCreated {
        /// Identifier of the created cloud account.
        account_id: String,
        /// Name of the created cloud account.
        account_name: String,
        /// Raw workflow completion state.
        raw_state: String,
    },

    /// The cross-account role deployment changed status.
    ///
    /// Carries only the target account identifier, extracted from the
    /// deployment stack's resource id; correlated by directory-resolved
    /// account name.
    RoleDeployed {
        /// Cloud account the role was deployed into.
        cloud_account_id: String,
        /// Raw deployment status.
        raw_status: String,
    },
}

impl LifecycleSignal {
    /// Returns a short name for the signal kind, used in logs and spans.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProvisionRequested { .. } => "provision_requested",
            Self::AccountCreated { .. } => "account_created",
            Self::RoleDeployed { .. } => "role_deployed",
        }
    }
}
