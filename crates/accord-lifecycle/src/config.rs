//! Pipeline configuration.
//!
//! The recognized event sources, the tag and parameter keys carrying the
//! correlation fields, and the role naming convention are deployment
//! choices, not code. Defaults match the production event bus wiring;
//! operators override individual fields where their upstream differs.

use serde::{Deserialize, Serialize};

/// Configuration for the lifecycle event pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source of product-provisioning audit events.
    pub provisioning_source: String,

    /// Provisioning API operation that starts an account workflow.
    pub provision_event_name: String,

    /// Source of account-factory service events.
    pub account_factory_source: String,

    /// Account-factory event marking workflow completion.
    pub account_created_event_name: String,

    /// Source of role-deployment stack events.
    pub role_stack_source: String,

    /// Bus classification of role-deployment status changes.
    pub role_stack_detail_type: String,

    /// Tag key carrying the tenant identifier on provisioning requests.
    pub tenant_id_tag: String,

    /// Tag key carrying the environment on provisioning requests.
    pub environment_tag: String,

    /// Provisioning parameter key carrying the chosen account name.
    pub account_name_parameter: String,

    /// Name of the cross-account role deployed into each account.
    pub cross_account_role_name: String,

    /// Segment position of the account id in a stack resource id.
    pub account_id_segment: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            provisioning_source: "aws.servicecatalog".to_string(),
            provision_event_name: "ProvisionProduct".to_string(),
            account_factory_source: "aws.controltower".to_string(),
            account_created_event_name: "CreateManagedAccount".to_string(),
            role_stack_source: "aws.cloudformation".to_string(),
            role_stack_detail_type: "CloudFormation Stack Status Change".to_string(),
            tenant_id_tag: "tenant-id".to_string(),
            environment_tag: "environment".to_string(),
            account_name_parameter: "AccountName".to_string(),
            cross_account_role_name: "TenantAccountAccessRole".to_string(),
            account_id_segment: 4,
        }
    }
}

impl PipelineConfig {
    /// Constructs the conventional ARN of the cross-account role in the
    /// given account.
    #[must_use]
    pub fn role_arn_for(&self, account_id: &str) -> String {
        format!(
            "arn:aws:iam::{account_id}:role/{}",
            self.cross_account_role_name
        )
    }
}
