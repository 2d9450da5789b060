//! SLM versus LLM architecture assessment.
//!
//! The [`engine`] is a pure function over a validated [`AnswerSet`]; every
//! other module in this workflow is plumbing around it.

pub mod answers;
pub mod engine;
pub mod narrative;
pub mod questions;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use answers::{
    AnswerError, AnswerSet, AnswerSetBuilder, AnswerSubmission, ApiTolerance, LikertResponse,
    ProjectMetadata,
};
pub use engine::{decide_from_score, evaluate, DecisionResult, HardBlocker, ScoreComponent};
pub use narrative::{
    GeminiNarrativeGenerator, NarrativeError, NarrativeGenerator, NarrativeRequest,
    TemplateNarrativeGenerator, NARRATIVE_FALLBACK,
};
pub use questions::{
    gatekeepers_in_tier, Architecture, GatekeeperId, GatekeeperQuestion, GatekeeperTier,
    ScoredQuestion, ScoredQuestionId, GATEKEEPERS, MAX_SCORE, SCORED_QUESTIONS,
    SCORING_THRESHOLD,
};
pub use router::assessment_router;
pub use service::AssessmentService;
pub use store::{
    DisabledSubmissionStore, InMemorySubmissionStore, RestSubmissionStore, StoreError,
    SubmissionId, SubmissionRecord, SubmissionStore,
};
