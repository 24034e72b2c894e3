//! Per-invocation event processing.
//!
//! Each delivered event runs through normalize, correlate, and reconcile in
//! one stateless invocation. Invocations share nothing in memory; races on
//! the same record are resolved entirely by the store's conditional-write
//! contract. Every failure is terminal for the event being processed:
//! it is reported through the structured log and the invocation ends,
//! leaving recovery to the transport's redelivery.

use std::sync::Arc;

use tracing::Instrument;

use accord_core::observability::lifecycle_span;
use accord_core::{DirectoryLookup, RecordStore};

use crate::config::PipelineConfig;
use crate::correlate::Correlator;
use crate::envelope::EventEnvelope;
use crate::error::{LifecycleError, Result};
use crate::normalize::Normalizer;
use crate::reconcile::{Disposition, Reconciler};

/// Processes raw lifecycle events end to end.
#[derive(Debug, Clone)]
pub struct LifecycleProcessor {
    normalizer: Normalizer,
    correlator: Correlator,
    reconciler: Reconciler,
}

impl LifecycleProcessor {
    /// Wires a processor from its ports.
    #[must_use]
    pub fn new(
        store: RecordStore,
        directory: Arc<dyn DirectoryLookup>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            normalizer: Normalizer::new(config.clone()),
            correlator: Correlator::new(store.clone(), directory),
            reconciler: Reconciler::new(store, config),
        }
    }

    /// Processes one delivered event.
    ///
    /// # Errors
    ///
    /// Propagates normalization, correlation, and reconciliation failures
    /// after reporting them; see [`LifecycleError`] for the taxonomy.
    pub async fn process(&self, envelope: &EventEnvelope) -> Result<Disposition> {
        let span = lifecycle_span("process", &envelope.source);
        self.process_in_span(envelope).instrument(span).await
    }

    async fn process_in_span(&self, envelope: &EventEnvelope) -> Result<Disposition> {
        let signal = match self.normalizer.normalize(envelope) {
            Ok(Some(signal)) => signal,
            Ok(None) => {
                tracing::debug!(
                    detail_type = envelope.detail_type.as_deref().unwrap_or(""),
                    "event is not a recognized lifecycle event; ignoring"
                );
                return Ok(Disposition::Ignored);
            }
            Err(e) => {
                tracing::warn!(error = %e, "event failed normalization; dropping");
                return Err(e);
            }
        };

        let matched = match self.correlator.correlate(&signal).await {
            Ok(matched) => matched,
            Err(e) => {
                // AmbiguousCorrelation already logged at error level by the
                // correlator; everything else is a per-event drop.
                if !matches!(e, LifecycleError::AmbiguousCorrelation { .. }) {
                    tracing::warn!(
                        signal = signal.kind(),
                        error = %e,
                        "signal failed correlation; dropping"
                    );
                }
                return Err(e);
            }
        };

        self.reconciler.apply(&signal, &matched).await
    }
}
