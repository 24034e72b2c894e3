//! Raw inbound event envelopes.
//!
//! Lifecycle events arrive on an event bus as a routing envelope (`source`,
//! `detail-type`) wrapping an arbitrary nested payload. The payload shape
//! differs per upstream system; the typed structs here cover only the
//! fields the normalizer reads. Everything else in the payload is ignored.
//!
//! Fields that may legitimately be absent deserialize to `None`/empty so
//! that missing-field handling happens in the normalizer (where it maps to
//! the correlation-key taxonomy) rather than as a blanket parse failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Routing envelope for one delivered event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Originating system (e.g. `aws.servicecatalog`).
    pub source: String,

    /// Bus-level event classification, where the source provides one.
    #[serde(rename = "detail-type", default, skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<String>,

    /// The source-specific payload, left raw until the source is known.
    pub detail: Value,
}

impl EventEnvelope {
    /// Builds an envelope from its parts.
    #[must_use]
    pub fn new(source: impl Into<String>, detail_type: Option<String>, detail: Value) -> Self {
        Self {
            source: source.into(),
            detail_type,
            detail,
        }
    }
}

/// A key/value tag attached to a provisioning request.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// A provisioning parameter supplied with a provisioning request.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisioningParameter {
    /// Parameter key.
    pub key: String,
    /// Parameter value.
    pub value: String,
}

/// Payload of a product-provisioning audit event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningDetail {
    /// API operation name; only `ProvisionProduct` is relevant.
    pub event_name: String,

    /// Request parameters, carrying the correlation tags.
    #[serde(default)]
    pub request_parameters: Option<ProvisioningRequestParameters>,

    /// Response elements, carrying the provisioning record status.
    #[serde(default)]
    pub response_elements: Option<ProvisioningResponseElements>,
}

/// Request half of a provisioning audit event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequestParameters {
    /// Tags on the provisioning request.
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Parameters passed to the provisioned product.
    #[serde(default)]
    pub provisioning_parameters: Vec<ProvisioningParameter>,
}

/// Response half of a provisioning audit event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningResponseElements {
    /// Detail of the provisioning record created by the request.
    #[serde(default)]
    pub record_detail: Option<RecordDetail>,
}

/// Provisioning record detail.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    /// Raw provisioning status (e.g. `CREATED`, `IN_PROGRESS`).
    pub status: String,
}

/// Payload of an account-factory service event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFactoryDetail {
    /// Service event name; only `CreateManagedAccount` is relevant.
    pub event_name: String,

    /// Nested service event details.
    #[serde(default)]
    pub service_event_details: Option<ServiceEventDetails>,
}

/// Container for the account-creation status block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEventDetails {
    /// Status of the managed-account creation workflow.
    #[serde(default)]
    pub create_managed_account_status: Option<CreateManagedAccountStatus>,
}

/// Completion status of an account-factory run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagedAccountStatus {
    /// Raw workflow state (e.g. `SUCCEEDED`, `FAILED`).
    pub state: String,

    /// The account the workflow operated on.
    #[serde(default)]
    pub account: Option<AccountDetail>,
}

/// Identity of a managed account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    /// Cloud account identifier.
    #[serde(default)]
    pub account_id: String,

    /// Account name chosen at provisioning time.
    #[serde(default)]
    pub account_name: String,
}

/// Payload of a role-deployment stack status-change event.
#[derive(Debug, Clone, Deserialize)]
pub struct StackStatusDetail {
    /// Colon-delimited resource identifier of the deployment stack.
    /// The target account id sits at a fixed segment position.
    #[serde(rename = "stack-id")]
    pub stack_id: String,

    /// Status block for the stack transition.
    #[serde(rename = "status-details", default)]
    pub status_details: Option<StackStatusDetails>,
}

/// Status block of a stack status-change event.
#[derive(Debug, Clone, Deserialize)]
pub struct StackStatusDetails {
    /// Fine-grained status, preferred when present.
    #[serde(rename = "detailed-status", default)]
    pub detailed_status: Option<String>,

    /// Coarse stack status, used as fallback.
    #[serde(default)]
    pub status: Option<String>,
}
