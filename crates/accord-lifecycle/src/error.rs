//! Error types for lifecycle event processing.
//!
//! Every variant is terminal for the single event being processed: the
//! event is reported and dropped, and recovery relies on the transport's
//! own redelivery behavior. Nothing here is retried internally.

use thiserror::Error;

/// Result type alias for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors that can occur while normalizing, correlating, or applying a
/// lifecycle event.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A field required to correlate or apply the event is absent.
    ///
    /// The upstream never redelivers a corrected payload, so this is
    /// reported and the event dropped.
    #[error("correlation key missing: {field}")]
    CorrelationKeyMissing {
        /// Path of the missing field within the event payload.
        field: &'static str,
    },

    /// A structured resource identifier did not decompose as expected.
    #[error("malformed resource id: '{resource_id}' ({reason})")]
    MalformedResourceId {
        /// The identifier that failed to parse.
        resource_id: String,
        /// Why it failed.
        reason: String,
    },

    /// No tenant record matched the event at correlation time.
    ///
    /// For scan-correlated signals this can be an ordering race (the
    /// account name not yet persisted); redelivery is the recovery path.
    #[error("no tenant record matched: {context}")]
    RecordNotFound {
        /// What was looked up.
        context: String,
    },

    /// More than one tenant record matched the secondary attribute.
    ///
    /// This is a data-integrity violation, not a transient race. The
    /// update is withheld from every matched record.
    #[error("ambiguous correlation: {matches} records share account name '{account_name}'")]
    AmbiguousCorrelation {
        /// The non-unique account name.
        account_name: String,
        /// How many records matched.
        matches: usize,
    },

    /// A conditional write lost to a concurrent modification.
    ///
    /// Redelivery of the same upstream event is the expected recovery path.
    #[error("store write conflict for {key}")]
    StoreWriteConflict {
        /// The record key whose write was rejected.
        key: String,
    },

    /// The event payload did not deserialize into the expected shape.
    #[error("malformed event payload: {message}")]
    Malformed {
        /// Description of the parse failure.
        message: String,
    },

    /// A core storage or serialization failure.
    #[error(transparent)]
    Core(#[from] accord_core::Error),
}
