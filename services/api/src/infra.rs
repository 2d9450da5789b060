use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use archeval::config::{AppConfig, NarrativeConfig, StoreConfig};
use archeval::workflows::assessment::{
    AssessmentService, DisabledSubmissionStore, GeminiNarrativeGenerator,
    InMemorySubmissionStore, NarrativeGenerator, RestSubmissionStore, SubmissionStore,
    TemplateNarrativeGenerator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

pub(crate) type SharedAssessmentService =
    AssessmentService<dyn SubmissionStore, dyn NarrativeGenerator>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// What to use when no remote store is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreFallback {
    /// In-memory store seeded with mock history.
    SampleHistory,
    /// Nothing is persisted.
    Disabled,
}

pub(crate) fn narrative_generator(config: &NarrativeConfig) -> Arc<dyn NarrativeGenerator> {
    match GeminiNarrativeGenerator::from_config(config) {
        Ok(Some(generator)) => {
            info!(model = %config.model, "narratives generated by Gemini");
            Arc::new(generator)
        }
        Ok(None) => {
            info!("no Gemini API key configured; using template narratives");
            Arc::new(TemplateNarrativeGenerator)
        }
        Err(err) => {
            warn!(error = %err, "Gemini client unavailable; using template narratives");
            Arc::new(TemplateNarrativeGenerator)
        }
    }
}

pub(crate) fn submission_store(
    config: &StoreConfig,
    fallback: StoreFallback,
) -> Arc<dyn SubmissionStore> {
    match RestSubmissionStore::from_config(config) {
        Ok(Some(store)) => {
            info!(table = %config.table, "submissions persisted to remote store");
            return Arc::new(store);
        }
        Ok(None) => {}
        Err(err) => warn!(error = %err, "remote store misconfigured; falling back"),
    }

    match fallback {
        StoreFallback::SampleHistory => Arc::new(InMemorySubmissionStore::with_sample_history()),
        StoreFallback::Disabled => Arc::new(DisabledSubmissionStore),
    }
}

pub(crate) fn assessment_service(
    config: &AppConfig,
    fallback: StoreFallback,
) -> SharedAssessmentService {
    AssessmentService::new(
        submission_store(&config.store, fallback),
        narrative_generator(&config.narrative),
    )
    .with_narrative_timeout(config.narrative.timeout)
    .with_admin_password(config.admin_password.clone())
}
