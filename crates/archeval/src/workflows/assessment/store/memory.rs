use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use super::super::answers::{AnswerSet, ApiTolerance, ProjectMetadata};
use super::super::engine::evaluate;
use super::super::narrative::{NarrativeRequest, TemplateNarrativeGenerator};
use super::super::questions::{GatekeeperId, ScoredQuestionId};
use super::{newest_first, StoreError, SubmissionRecord, SubmissionStore};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemorySubmissionStore {
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl InMemorySubmissionStore {
    /// Store pre-populated with mock submissions for demo history views.
    pub fn with_sample_history() -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.records.lock() {
            guard.extend(sample_history());
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn save(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?
            .clone();
        newest_first(&mut records);
        Ok(records)
    }
}

fn sample_history() -> Vec<SubmissionRecord> {
    let samples = [
        (
            ProjectMetadata {
                project_name: "Invoice field extraction".to_string(),
                contact_name: "Finance Ops".to_string(),
                contact_email: "finance-ops@example.com".to_string(),
                description: "Pull totals and vendor names from scanned invoices.".to_string(),
            },
            AnswerSet::builder()
                .api_tolerance(ApiTolerance::RiskMitigation)
                .remaining_gatekeepers(false)
                .response(ScoredQuestionId::NarrowTaskScope, 5)
                .response(ScoredQuestionId::HighRequestVolume, 5)
                .response(ScoredQuestionId::BroadKnowledgeRequired, 1)
                .remaining_responses(4),
            (2025, 9, 2),
        ),
        (
            ProjectMetadata {
                project_name: "Customer research assistant".to_string(),
                contact_name: "Product Insights".to_string(),
                contact_email: "insights@example.com".to_string(),
                description: "Answer open questions across market research reports.".to_string(),
            },
            AnswerSet::builder()
                .api_tolerance(ApiTolerance::FullyAcceptable)
                .remaining_gatekeepers(false)
                .response(ScoredQuestionId::BroadKnowledgeRequired, 5)
                .response(ScoredQuestionId::ComplexReasoningRequired, 5)
                .response(ScoredQuestionId::OpenEndedGeneration, 5)
                .remaining_responses(2),
            (2025, 9, 9),
        ),
        (
            ProjectMetadata {
                project_name: "Clinic intake triage".to_string(),
                contact_name: "Clinical Systems".to_string(),
                contact_email: "clinical-systems@example.com".to_string(),
                description: "Route patient intake notes to the right department.".to_string(),
            },
            AnswerSet::builder()
                .api_tolerance(ApiTolerance::NotAcceptable)
                .gatekeeper(GatekeeperId::DataMustStayOnPremises, true)
                .remaining_gatekeepers(false)
                .remaining_responses(3),
            (2025, 9, 16),
        ),
    ];

    samples
        .into_iter()
        .filter_map(|(project, builder, (year, month, day))| {
            let answers = builder.project(project).build().ok()?;
            let result = evaluate(&answers);
            let narrative =
                TemplateNarrativeGenerator::render(&NarrativeRequest::new(&answers, &result));
            let mut record = SubmissionRecord::new(answers, result);
            record.created_at = Utc.with_ymd_and_hms(year, month, day, 9, 30, 0).single()?;
            record.narrative = Some(narrative);
            Some(record)
        })
        .collect()
}
