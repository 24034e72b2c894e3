//! Event normalization: raw envelopes to canonical signals.
//!
//! Pure parsing, no side effects. An envelope resolves to exactly one of:
//!
//! - `Ok(Some(signal))`: a recognized lifecycle event
//! - `Ok(None)`: irrelevant to this pipeline (not an error)
//! - `Err(..)`: a recognized event whose payload cannot be used
//!   (`CorrelationKeyMissing`, `MalformedResourceId`, `Malformed`)

use std::str::FromStr;

use accord_core::{Environment, TenantId};
use serde::de::DeserializeOwned;

use crate::config::PipelineConfig;
use crate::envelope::{
    AccountFactoryDetail, EventEnvelope, ProvisioningDetail, StackStatusDetail,
};
use crate::error::{LifecycleError, Result};
use crate::signal::LifecycleSignal;

/// Parses raw lifecycle events into canonical signals.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: PipelineConfig,
}

impl Normalizer {
    /// Creates a normalizer with the given pipeline configuration.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Normalizes an envelope into a lifecycle signal.
    ///
    /// Returns `Ok(None)` for envelopes from unrecognized (source,
    /// event-type) combinations; those are ignored, not failed.
    ///
    /// # Errors
    ///
    /// Returns `CorrelationKeyMissing` when a required field is absent from
    /// a recognized event, `MalformedResourceId` when a stack resource id
    /// does not decompose, and `Malformed` when the payload does not
    /// deserialize.
    pub fn normalize(&self, envelope: &EventEnvelope) -> Result<Option<LifecycleSignal>> {
        if envelope.source == self.config.provisioning_source {
            return self.normalize_provisioning(envelope);
        }
        if envelope.source == self.config.account_factory_source {
            return self.normalize_account_factory(envelope);
        }
        if envelope.source == self.config.role_stack_source {
            return self.normalize_stack_status(envelope);
        }
        Ok(None)
    }

    fn normalize_provisioning(&self, envelope: &EventEnvelope) -> Result<Option<LifecycleSignal>> {
        let detail: ProvisioningDetail = parse_detail(envelope)?;
        if detail.event_name != self.config.provision_event_name {
            return Ok(None);
        }

        let request = detail.request_parameters.as_ref();

        let tenant_raw = request
            .and_then(|r| tag_value(&r.tags, &self.config.tenant_id_tag))
            .ok_or(LifecycleError::CorrelationKeyMissing {
                field: "requestParameters.tags[tenant-id]",
            })?;
        let tenant_id =
            TenantId::new(tenant_raw).map_err(|_| LifecycleError::CorrelationKeyMissing {
                field: "requestParameters.tags[tenant-id]",
            })?;

        let environment_raw = request
            .and_then(|r| tag_value(&r.tags, &self.config.environment_tag))
            .ok_or(LifecycleError::CorrelationKeyMissing {
                field: "requestParameters.tags[environment]",
            })?;
        let environment = Environment::from_str(&environment_raw).map_err(|_| {
            LifecycleError::CorrelationKeyMissing {
                field: "requestParameters.tags[environment]",
            }
        })?;

        let account_name = request.and_then(|r| {
            r.provisioning_parameters
                .iter()
                .find(|p| p.key == self.config.account_name_parameter)
                .map(|p| p.value.clone())
                .filter(|v| !v.is_empty())
        });

        let raw_status = detail
            .response_elements
            .and_then(|r| r.record_detail)
            .map(|d| d.status)
            .ok_or(LifecycleError::CorrelationKeyMissing {
                field: "responseElements.recordDetail.status",
            })?;

        Ok(Some(LifecycleSignal::ProvisionRequested {
            tenant_id,
            environment,
            account_name,
            raw_status,
        }))
    }

    fn normalize_account_factory(
        &self,
        envelope: &EventEnvelope,
    ) -> Result<Option<LifecycleSignal>> {
        let detail: AccountFactoryDetail = parse_detail(envelope)?;
        if detail.event_name != self.config.account_created_event_name {
            return Ok(None);
        }

        let status = detail
            .service_event_details
            .and_then(|d| d.create_managed_account_status)
            .ok_or(LifecycleError::CorrelationKeyMissing {
                field: "serviceEventDetails.createManagedAccountStatus",
            })?;

        let account = status
            .account
            .ok_or(LifecycleError::CorrelationKeyMissing {
                field: "createManagedAccountStatus.account",
            })?;
        if account.account_name.is_empty() {
            return Err(LifecycleError::CorrelationKeyMissing {
                field: "createManagedAccountStatus.account.accountName",
            });
        }

        Ok(Some(LifecycleSignal::AccountCreated {
            account_id: account.account_id,
            account_name: account.account_name,
            raw_state: status.state,
        }))
    }

    fn normalize_stack_status(&self, envelope: &EventEnvelope) -> Result<Option<LifecycleSignal>> {
        if envelope.detail_type.as_deref() != Some(self.config.role_stack_detail_type.as_str()) {
            return Ok(None);
        }

        let detail: StackStatusDetail = parse_detail(envelope)?;
        let cloud_account_id =
            extract_account_id(&detail.stack_id, self.config.account_id_segment)?;

        let raw_status = detail
            .status_details
            .and_then(|s| s.detailed_status.or(s.status))
            .ok_or(LifecycleError::CorrelationKeyMissing {
                field: "status-details.status",
            })?;

        Ok(Some(LifecycleSignal::RoleDeployed {
            cloud_account_id,
            raw_status,
        }))
    }
}

/// Extracts the account id segment from a colon-delimited resource id.
fn extract_account_id(resource_id: &str, segment: usize) -> Result<String> {
    let segments: Vec<&str> = resource_id.split(':').collect();
    if segments.len() <= segment {
        return Err(LifecycleError::MalformedResourceId {
            resource_id: resource_id.to_string(),
            reason: format!(
                "expected at least {} colon-delimited segments, found {}",
                segment + 1,
                segments.len()
            ),
        });
    }

    let account_id = segments[segment];
    if account_id.is_empty() {
        return Err(LifecycleError::MalformedResourceId {
            resource_id: resource_id.to_string(),
            reason: format!("segment {segment} is empty"),
        });
    }

    Ok(account_id.to_string())
}

fn tag_value(tags: &[crate::envelope::Tag], key: &str) -> Option<String> {
    tags.iter()
        .find(|t| t.key == key)
        .map(|t| t.value.clone())
        .filter(|v| !v.is_empty())
}

fn parse_detail<T: DeserializeOwned>(envelope: &EventEnvelope) -> Result<T> {
    serde_json::from_value(envelope.detail.clone()).map_err(|e| LifecycleError::Malformed {
        message: format!("event detail from '{}' did not parse: {e}", envelope.source),
    })
}
