//! Signal correlation: resolving a signal to exactly one tenant record.
//!
//! `ProvisionRequested` carries the primary key and resolves with a point
//! lookup. The other two signal kinds carry no tenant key at all and fall
//! back to scanning on the account name, which is populated asynchronously
//! by the provisioning step. A miss there can be an ordering race; a
//! multiple match is a broken uniqueness invariant and is surfaced loudly.

use std::sync::Arc;

use accord_core::{DirectoryLookup, RecordKey, RecordStore, VersionedRecord};

use crate::error::{LifecycleError, Result};
use crate::signal::LifecycleSignal;

/// Resolves lifecycle signals to tenant account records.
#[derive(Clone)]
pub struct Correlator {
    store: RecordStore,
    directory: Arc<dyn DirectoryLookup>,
}

impl std::fmt::Debug for Correlator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Correlator")
            .field("store", &self.store)
            .field("directory", &"DirectoryLookup")
            .finish()
    }
}

impl Correlator {
    /// Creates a correlator over the given store and directory port.
    #[must_use]
    pub fn new(store: RecordStore, directory: Arc<dyn DirectoryLookup>) -> Self {
        Self { store, directory }
    }

    /// Resolves a signal to the unique record it should update.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` when no record matches (for scan-correlated
    /// signals this may be an ordering race; redelivery recovers it), and
    /// `AmbiguousCorrelation` when the account name matches more than one
    /// record.
    pub async fn correlate(&self, signal: &LifecycleSignal) -> Result<VersionedRecord> {
        match signal {
            LifecycleSignal::ProvisionRequested {
                tenant_id,
                environment,
                ..
            } => {
                let key = RecordKey::new(tenant_id.clone(), *environment);
                self.store
                    .get(&key)
                    .await?
                    .ok_or_else(|| LifecycleError::RecordNotFound {
                        context: format!("no record for key {key}"),
                    })
            }
            LifecycleSignal::AccountCreated { account_name, .. } => {
                self.match_by_account_name(account_name).await
            }
            LifecycleSignal::RoleDeployed {
                cloud_account_id, ..
            } => {
                let account_name = self
                    .directory
                    .resolve_account_name(cloud_account_id)
                    .await?
                    .ok_or_else(|| LifecycleError::RecordNotFound {
                        context: format!(
                            "directory has no entry for account {cloud_account_id}"
                        ),
                    })?;
                self.match_by_account_name(&account_name).await
            }
        }
    }

    /// Scans for the unique record holding the given account name.
    async fn match_by_account_name(&self, account_name: &str) -> Result<VersionedRecord> {
        let mut matches = self.store.scan_by_account_name(account_name).await?;

        match matches.len() {
            0 => Err(LifecycleError::RecordNotFound {
                context: format!("no record with account name '{account_name}'"),
            }),
            1 => Ok(matches.remove(0)),
            n => {
                // Broken uniqueness invariant, not a transient race.
                tracing::error!(
                    account_name = account_name,
                    matches = n,
                    "ambiguous correlation: account name matches multiple tenant records"
                );
                Err(LifecycleError::AmbiguousCorrelation {
                    account_name: account_name.to_string(),
                    matches: n,
                })
            }
        }
    }
}
