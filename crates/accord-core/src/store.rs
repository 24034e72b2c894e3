//! Typed record store for [`TenantAccountRecord`]s.
//!
//! Layers record (de)serialization and key construction over the raw
//! [`StorageBackend`]. Each record is one JSON object at a deterministic
//! key derived from its `(tenant, environment)` primary key:
//!
//! ```text
//! records/tenant={tenant}/environment={env}.json
//! ```
//!
//! All mutation goes through conditional writes: `create` insists the key
//! does not exist yet, `put` is a compare-and-swap against the version
//! token observed at read time. The secondary-attribute scan reads every
//! record under the `records/` prefix; there is deliberately no reverse
//! index from account name to key.

use bytes::Bytes;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::record::{RecordKey, TenantAccountRecord};
use crate::storage::{StorageBackend, WritePrecondition, WriteResult};

/// Prefix under which all tenant account records live.
const RECORD_PREFIX: &str = "records/";

/// A record together with the store version token it was read at.
///
/// The token must be handed back unchanged to [`RecordStore::put`] so the
/// write fails if another invocation modified the record in between.
#[derive(Debug, Clone)]
pub struct VersionedRecord {
    /// The deserialized record.
    pub record: TenantAccountRecord,
    /// Opaque version token for the subsequent CAS write.
    pub version: String,
}

/// Typed store for tenant account records.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("backend", &"StorageBackend")
            .finish()
    }
}

impl RecordStore {
    /// Creates a new record store over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Returns the storage key for a record key.
    #[must_use]
    pub fn record_path(key: &RecordKey) -> String {
        format!(
            "{RECORD_PREFIX}tenant={}/environment={}.json",
            key.tenant_id,
            key.environment.key_str()
        )
    }

    /// Creates a record, failing if one already exists for its key.
    ///
    /// Returns the version token of the newly created record.
    ///
    /// # Errors
    ///
    /// Returns `Error::PreconditionFailed` if a record already exists for
    /// the key (the existing record is left untouched), or a storage/
    /// serialization error.
    pub async fn create(&self, record: &TenantAccountRecord) -> Result<String> {
        let key = record.key();
        let data = encode(record)?;

        match self
            .backend
            .put(&Self::record_path(&key), data, WritePrecondition::DoesNotExist)
            .await?
        {
            WriteResult::Success { version } => Ok(version),
            WriteResult::PreconditionFailed { .. } => Err(Error::PreconditionFailed {
                message: format!("record already exists for {key}"),
            }),
        }
    }

    /// Reads the record for a key, if present.
    ///
    /// The returned version token is pinned before the data is read, so a
    /// concurrent write between the two reads surfaces as a CAS failure on
    /// the next `put` rather than a lost update.
    ///
    /// # Errors
    ///
    /// Returns a storage or deserialization error.
    pub async fn get(&self, key: &RecordKey) -> Result<Option<VersionedRecord>> {
        let path = Self::record_path(key);

        let Some(meta) = self.backend.head(&path).await? else {
            return Ok(None);
        };

        let bytes = match self.backend.get(&path).await {
            Ok(bytes) => bytes,
            Err(Error::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(Some(VersionedRecord {
            record: decode(&path, &bytes)?,
            version: meta.version,
        }))
    }

    /// Conditionally replaces a record.
    ///
    /// The write succeeds only if the stored version still matches
    /// `expected_version`. A precondition failure is a normal result; the
    /// caller decides whether to report it as a conflict.
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error.
    pub async fn put(
        &self,
        record: &TenantAccountRecord,
        expected_version: &str,
    ) -> Result<WriteResult> {
        let data = encode(record)?;
        self.backend
            .put(
                &Self::record_path(&record.key()),
                data,
                WritePrecondition::MatchesVersion(expected_version.to_string()),
            )
            .await
    }

    /// Scans all records for an exact `account_name` match.
    ///
    /// This is a full scan over the record prefix; the result carries every
    /// matching record so the caller can detect ambiguity. An empty account
    /// name never matches (records start with the name unassigned).
    ///
    /// # Errors
    ///
    /// Returns a storage or deserialization error.
    pub async fn scan_by_account_name(&self, account_name: &str) -> Result<Vec<VersionedRecord>> {
        if account_name.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for meta in self.backend.list(RECORD_PREFIX).await? {
            let bytes = match self.backend.get(&meta.key).await {
                Ok(bytes) => bytes,
                // Raced with a concurrent delete outside this core; skip.
                Err(Error::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };

            let record = decode(&meta.key, &bytes)?;
            if record.account_name == account_name {
                matches.push(VersionedRecord {
                    record,
                    version: meta.version,
                });
            }
        }

        Ok(matches)
    }
}

fn encode(record: &TenantAccountRecord) -> Result<Bytes> {
    serde_json::to_vec(record)
        .map(Bytes::from)
        .map_err(|e| Error::serialization(format!("failed to serialize record: {e}")))
}

fn decode(key: &str, bytes: &Bytes) -> Result<TenantAccountRecord> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::serialization(format!("failed to parse record at '{key}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AccountStatus;
    use crate::storage::MemoryBackend;
    use crate::tenant::{Environment, TenantId};

    fn store() -> RecordStore {
        RecordStore::new(Arc::new(MemoryBackend::new()))
    }

    fn record(tenant: &str, env: Environment) -> TenantAccountRecord {
        TenantAccountRecord::new(RecordKey::new(TenantId::new(tenant).unwrap(), env))
    }

    #[tokio::test]
    async fn create_then_get_roundtrip() {
        let store = store();
        let record = record("t1", Environment::Dev);

        let version = store.create(&record).await.unwrap();
        assert_eq!(version, "1");

        let read = store.get(&record.key()).await.unwrap().unwrap();
        assert_eq!(read.record, record);
        assert_eq!(read.version, "1");
    }

    #[tokio::test]
    async fn get_missing_record_is_none() {
        let store = store();
        let key = RecordKey::new(TenantId::new("t1").unwrap(), Environment::Uat);
        assert!(store.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_create_fails_and_leaves_record_unmodified() {
        let store = store();
        let original = record("t1", Environment::Dev);
        store.create(&original).await.unwrap();

        let mut intruder = record("t1", Environment::Dev);
        intruder.account_id = "999999999999".into();
        let err = store.create(&intruder).await.unwrap_err();
        assert!(matches!(err, Error::PreconditionFailed { .. }));

        let read = store.get(&original.key()).await.unwrap().unwrap();
        assert_eq!(read.record, original);
        assert_eq!(read.version, "1");
    }

    #[tokio::test]
    async fn put_with_stale_version_is_rejected() {
        let store = store();
        let mut rec = record("t1", Environment::Dev);
        let version = store.create(&rec).await.unwrap();

        rec.account_status = AccountStatus::InProgress;
        assert!(store.put(&rec, &version).await.unwrap().is_success());

        // A second write with the original token must lose.
        rec.account_status = AccountStatus::Ready;
        let result = store.put(&rec, &version).await.unwrap();
        assert!(matches!(result, WriteResult::PreconditionFailed { .. }));
    }

    #[tokio::test]
    async fn scan_matches_on_account_name() {
        let store = store();

        let mut a = record("t1", Environment::Dev);
        a.account_name = "workload-one".into();
        store.create(&a).await.unwrap();

        let mut b = record("t2", Environment::Dev);
        b.account_name = "workload-two".into();
        store.create(&b).await.unwrap();

        let unnamed = record("t3", Environment::Dev);
        store.create(&unnamed).await.unwrap();

        let matches = store.scan_by_account_name("workload-one").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].record.tenant_id.as_str(), "t1");

        assert!(store.scan_by_account_name("workload-nine").await.unwrap().is_empty());
        // Unassigned names never match, even though several records hold "".
        assert!(store.scan_by_account_name("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_for_same_tenant_in_different_environments_are_distinct() {
        let store = store();
        store.create(&record("t1", Environment::Dev)).await.unwrap();
        store.create(&record("t1", Environment::Prod)).await.unwrap();

        let dev_key = RecordKey::new(TenantId::new("t1").unwrap(), Environment::Dev);
        let prod_key = RecordKey::new(TenantId::new("t1").unwrap(), Environment::Prod);
        assert!(store.get(&dev_key).await.unwrap().is_some());
        assert!(store.get(&prod_key).await.unwrap().is_some());
        assert_ne!(RecordStore::record_path(&dev_key), RecordStore::record_path(&prod_key));
    }
}
