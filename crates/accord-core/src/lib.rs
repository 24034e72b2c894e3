//! # accord-core
//!
//! Core abstractions for the Accord tenant account lifecycle reconciler.
//!
//! This crate provides the foundational types and traits used across all
//! Accord components:
//!
//! - **Tenant Identity**: Validated tenant identifiers and the closed
//!   environment set
//! - **Record Model**: The per-tenant account state record and its status
//!   axes
//! - **Storage**: Conditional-write storage backend abstraction and the
//!   typed record store
//! - **Directory Port**: Read-only account directory lookups
//! - **Error Types**: Shared error definitions and result types
//!
//! ## Crate Boundary
//!
//! `accord-core` is the **only** crate allowed to define shared primitives.
//! The lifecycle pipeline in `accord-lifecycle` builds exclusively on the
//! contracts defined here.
//!
//! ## Example
//!
//! ```rust
//! use accord_core::prelude::*;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let store = RecordStore::new(backend);
//!
//! let tenant = TenantId::new("acme-corp").unwrap();
//! let key = RecordKey::new(tenant, Environment::Dev);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod directory;
pub mod error;
pub mod observability;
pub mod record;
pub mod storage;
pub mod store;
pub mod tenant;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use accord_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::directory::{DirectoryLookup, StaticDirectory};
    pub use crate::error::{Error, Result};
    pub use crate::record::{
        AccountStatus, RecordKey, RoleStatus, TenantAccountRecord,
    };
    pub use crate::storage::{
        MemoryBackend, ObjectMeta, StorageBackend, WritePrecondition, WriteResult,
    };
    pub use crate::store::{RecordStore, VersionedRecord};
    pub use crate::tenant::{Environment, TenantId};
}

// Re-export key types at crate root for ergonomics
pub use directory::{DirectoryLookup, StaticDirectory};
pub use error::{Error, Result};
pub use observability::{LogFormat, init_logging};
pub use record::{AccountStatus, RecordKey, RoleStatus, TenantAccountRecord};
pub use storage::{MemoryBackend, ObjectMeta, StorageBackend, WritePrecondition, WriteResult};
pub use store::{RecordStore, VersionedRecord};
pub use tenant::{Environment, TenantId};
