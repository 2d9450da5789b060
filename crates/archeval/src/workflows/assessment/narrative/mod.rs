//! Prose explanations of decision results.
//!
//! Generators are fallible; callers compose them strictly after the engine
//! has produced a result and degrade failures to [`NARRATIVE_FALLBACK`].

mod gemini;
mod prompt;
mod template;

pub use gemini::GeminiNarrativeGenerator;
pub use prompt::build_prompt;
pub use template::TemplateNarrativeGenerator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::answers::{AnswerSet, ApiTolerance, ProjectMetadata};
use super::engine::{DecisionResult, ScoreComponent};
use super::questions::Architecture;

/// Placeholder shown when no explanation could be generated.
pub const NARRATIVE_FALLBACK: &str = "Unable to generate explanation.";

/// Everything a generator needs to explain one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub project: ProjectMetadata,
    pub api_tolerance: ApiTolerance,
    pub decision: Architecture,
    pub score: u32,
    pub max_score: u32,
    pub hard_blocker: Option<String>,
    pub components: Vec<ScoreComponent>,
}

impl NarrativeRequest {
    pub fn new(answers: &AnswerSet, result: &DecisionResult) -> Self {
        Self {
            project: answers.project().clone(),
            api_tolerance: answers.api_tolerance(),
            decision: result.decision,
            score: result.score,
            max_score: result.max_score,
            hard_blocker: result.hard_blocker.clone(),
            components: result.components.clone(),
        }
    }
}

/// Capability interface for text-generation backends.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, request: &NarrativeRequest) -> Result<String, NarrativeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("narrative api returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("narrative api returned no text")]
    EmptyResponse,
    #[error("narrative generation timed out after {0} seconds")]
    Timeout(u64),
}
