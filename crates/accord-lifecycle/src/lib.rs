//! # accord-lifecycle
//!
//! The Accord event-processing pipeline: normalization, correlation, and
//! state reconciliation for tenant cloud-account lifecycle events.
//!
//! Three upstream systems report progress on a tenant account at
//! unpredictable times and in unpredictable order:
//!
//! - the provisioning system acknowledges the provisioning request,
//! - the account factory reports account creation,
//! - the role deployment stack reports cross-account role status.
//!
//! None of them carries the full `(tenant, environment)` key the tenant
//! system needs, so every event is normalized into a [`LifecycleSignal`],
//! correlated to exactly one [`TenantAccountRecord`] (directly or through
//! a best-effort account-name scan), and applied as an idempotent,
//! order-tolerant conditional update.
//!
//! ## Pipeline
//!
//! ```text
//! EventEnvelope --> Normalizer --> LifecycleSignal
//!                                      |
//!                                 Correlator  (RecordStore + DirectoryLookup)
//!                                      |
//!                                 Reconciler --> conditional write
//! ```
//!
//! Each invocation is stateless and independent; all coordination between
//! racing invocations happens through the store's compare-and-swap
//! contract.
//!
//! [`TenantAccountRecord`]: accord_core::TenantAccountRecord

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod correlate;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod processor;
pub mod reconcile;
pub mod signal;
pub mod status;

pub use config::PipelineConfig;
pub use correlate::Correlator;
pub use envelope::EventEnvelope;
pub use error::{LifecycleError, Result};
pub use normalize::Normalizer;
pub use processor::LifecycleProcessor;
pub use reconcile::{Disposition, Reconciler, transition};
pub use signal::LifecycleSignal;
