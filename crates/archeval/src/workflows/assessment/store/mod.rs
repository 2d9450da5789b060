//! Persistence adapters for submission history.

mod memory;
mod rest;

pub use memory::InMemorySubmissionStore;
pub use rest::RestSubmissionStore;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answers::{AnswerSet, ProjectMetadata};
use super::engine::DecisionResult;

/// Identifier wrapper for questionnaire submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A published submission. `narrative` is attached after the decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub created_at: DateTime<Utc>,
    pub project: ProjectMetadata,
    pub answers: AnswerSet,
    pub result: DecisionResult,
    #[serde(default)]
    pub narrative: Option<String>,
}

impl SubmissionRecord {
    pub fn new(answers: AnswerSet, result: DecisionResult) -> Self {
        Self {
            id: SubmissionId::generate(),
            created_at: Utc::now(),
            project: answers.project().clone(),
            answers,
            result,
            narrative: None,
        }
    }

    pub fn narrative_pending(&self) -> bool {
        self.narrative.is_none()
    }
}

/// Storage abstraction for submission history.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// `false` marks an intentionally absent store, which is not an error.
    fn is_configured(&self) -> bool {
        true
    }

    async fn save(&self, record: &SubmissionRecord) -> Result<(), StoreError>;

    /// All stored submissions, newest first.
    async fn fetch_all(&self) -> Result<Vec<SubmissionRecord>, StoreError>;
}

/// Store used when persistence is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSubmissionStore;

#[async_trait]
impl SubmissionStore for DisabledSubmissionStore {
    fn is_configured(&self) -> bool {
        false
    }

    async fn save(&self, _record: &SubmissionRecord) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn fetch_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("submission store is not configured")]
    NotConfigured,
    #[error("store transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub(crate) fn newest_first(records: &mut [SubmissionRecord]) {
    records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
}
