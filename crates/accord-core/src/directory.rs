//! Directory lookup port.
//!
//! Role-deployment events carry only a cloud account identifier. Resolving
//! that identifier to the human-readable account name (the secondary
//! correlation attribute) requires a read-only query against the account
//! directory of the surrounding organization. This port abstracts that
//! query; nothing else in the system talks to the directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};

/// Read-only directory query for resolving account identifiers.
#[async_trait]
pub trait DirectoryLookup: Send + Sync + 'static {
    /// Resolves a cloud account identifier to its account name.
    ///
    /// Returns `None` if the directory has no entry for the identifier
    /// (e.g. the account is still being enrolled).
    async fn resolve_account_name(&self, account_id: &str) -> Result<Option<String>>;
}

/// In-memory directory for testing.
///
/// Entries are registered up front; lookups never touch the network.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account id to name entry.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the directory lock is poisoned.
    pub fn insert(&self, account_id: impl Into<String>, name: impl Into<String>) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| Error::Internal {
                message: "lock poisoned".into(),
            })?
            .insert(account_id.into(), name.into());
        Ok(())
    }
}

#[async_trait]
impl DirectoryLookup for StaticDirectory {
    async fn resolve_account_name(&self, account_id: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;
        Ok(entries.get(account_id).cloned())
    }
}
