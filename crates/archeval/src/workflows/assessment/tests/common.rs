use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::assessment::answers::{AnswerSet, ApiTolerance, ProjectMetadata};
use crate::workflows::assessment::narrative::{
    NarrativeError, NarrativeGenerator, NarrativeRequest,
};
use crate::workflows::assessment::questions::{GatekeeperId, GATEKEEPERS, SCORED_QUESTIONS};
use crate::workflows::assessment::store::{
    InMemorySubmissionStore, StoreError, SubmissionRecord, SubmissionStore,
};
use crate::workflows::assessment::AssessmentService;

pub(super) fn project() -> ProjectMetadata {
    ProjectMetadata {
        project_name: "Warehouse ticket routing".to_string(),
        contact_name: "Ops Platform".to_string(),
        contact_email: "ops-platform@example.com".to_string(),
        description: "Classify inbound support tickets by warehouse.".to_string(),
    }
}

/// Answers with the listed gatekeepers true and every response set to `response`.
pub(super) fn answers_with(gatekeepers: &[GatekeeperId], response: u8) -> AnswerSet {
    let mut builder = AnswerSet::builder()
        .project(project())
        .api_tolerance(ApiTolerance::RiskMitigation);
    for id in gatekeepers {
        builder = builder.gatekeeper(*id, true);
    }
    builder
        .remaining_gatekeepers(false)
        .remaining_responses(response)
        .build()
        .expect("complete answers")
}

/// No gatekeepers; non-reverse questions get `forward`, reverse questions get `reverse`.
pub(super) fn polarized(forward: u8, reverse: u8) -> AnswerSet {
    let mut builder = AnswerSet::builder()
        .project(project())
        .api_tolerance(ApiTolerance::RiskMitigation)
        .remaining_gatekeepers(false);
    for question in &SCORED_QUESTIONS {
        let value = if question.reverse { reverse } else { forward };
        builder = builder.response(question.id, value);
    }
    builder.build().expect("complete answers")
}

/// Answers from a gatekeeper bitmask over [`GATEKEEPERS`] in declared order.
pub(super) fn answers_from_mask(mask: u32, response: u8, tolerance: ApiTolerance) -> AnswerSet {
    let mut builder = AnswerSet::builder().api_tolerance(tolerance);
    for (index, question) in GATEKEEPERS.iter().enumerate() {
        builder = builder.gatekeeper(question.id, mask & (1 << index) != 0);
    }
    builder
        .remaining_responses(response)
        .build()
        .expect("complete answers")
}

pub(super) struct EchoNarrator;

#[async_trait]
impl NarrativeGenerator for EchoNarrator {
    async fn generate(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Ok(format!("{} at {}", request.decision, request.score))
    }
}

pub(super) struct FailingNarrator;

#[async_trait]
impl NarrativeGenerator for FailingNarrator {
    async fn generate(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Err(NarrativeError::Status {
            status: 503,
            body: "model overloaded".to_string(),
        })
    }
}

pub(super) struct HangingNarrator;

#[async_trait]
impl NarrativeGenerator for HangingNarrator {
    async fn generate(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        std::future::pending::<()>().await;
        Ok(String::new())
    }
}

/// Narrator that waits for [`GatedNarrator::release`] before answering.
#[derive(Default)]
pub(super) struct GatedNarrator {
    gate: Notify,
}

impl GatedNarrator {
    pub(super) fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl NarrativeGenerator for GatedNarrator {
    async fn generate(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        self.gate.notified().await;
        Ok("released narrative".to_string())
    }
}

#[derive(Default)]
pub(super) struct RecordingStore {
    saved: Mutex<Vec<SubmissionRecord>>,
}

impl RecordingStore {
    pub(super) fn saved(&self) -> Vec<SubmissionRecord> {
        self.saved.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl SubmissionStore for RecordingStore {
    async fn save(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        self.saved
            .lock()
            .expect("store mutex poisoned")
            .push(record.clone());
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        let mut records = self.saved();
        records.reverse();
        Ok(records)
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl SubmissionStore for UnavailableStore {
    async fn save(&self, _record: &SubmissionRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn fetch_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AssessmentService<RecordingStore, EchoNarrator>,
    Arc<RecordingStore>,
) {
    let store = Arc::new(RecordingStore::default());
    let service = AssessmentService::new(store.clone(), Arc::new(EchoNarrator));
    (service, store)
}

pub(super) fn sample_history_service(
    admin_password: Option<&str>,
) -> AssessmentService<InMemorySubmissionStore, EchoNarrator> {
    AssessmentService::new(
        Arc::new(InMemorySubmissionStore::with_sample_history()),
        Arc::new(EchoNarrator),
    )
    .with_admin_password(admin_password.map(str::to_string))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
