mod gatekeepers;
mod scoring;

pub use gatekeepers::{first_blocker, HardBlocker};

use super::answers::{AnswerSet, LikertResponse};
use super::questions::{
    Architecture, GatekeeperId, ScoredQuestionId, MAX_SCORE, SCORING_THRESHOLD,
};
use serde::{Deserialize, Serialize};

/// Evaluates a complete answer set into an architecture recommendation.
///
/// Gatekeepers are checked first: any true LLM-forcing gatekeeper fixes the
/// decision to LLM, otherwise any true SLM-forcing gatekeeper fixes it to SLM.
/// The weighted score is always computed and reported, but only decides the
/// outcome when no gatekeeper fired.
pub fn evaluate(answers: &AnswerSet) -> DecisionResult {
    let blocker = first_blocker(answers);
    let (components, score) = scoring::score_answers(answers);

    let decision = match &blocker {
        Some(blocker) => blocker.decision,
        None => decide_from_score(score),
    };

    DecisionResult {
        decision,
        score,
        max_score: MAX_SCORE,
        hard_blocker: blocker.as_ref().map(|blocker| blocker.text.to_string()),
        triggered_gatekeeper: blocker.map(|blocker| blocker.gatekeeper),
        components,
    }
}

/// Score-only resolution used when no gatekeeper fired.
pub fn decide_from_score(score: u32) -> Architecture {
    if score >= SCORING_THRESHOLD {
        Architecture::Slm
    } else {
        Architecture::Llm
    }
}

/// Weighted contribution of a single scored question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub question: ScoredQuestionId,
    pub response: LikertResponse,
    /// Response after reverse questions are inverted (`6 - response`).
    pub effective: u8,
    pub weight: u32,
    pub contribution: u32,
}

/// Immutable engine output for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub decision: Architecture,
    pub score: u32,
    pub max_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_blocker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_gatekeeper: Option<GatekeeperId>,
    #[serde(default)]
    pub components: Vec<ScoreComponent>,
}

impl DecisionResult {
    pub fn score_pct(&self) -> f32 {
        if self.max_score == 0 {
            return 0.0;
        }
        self.score as f32 / self.max_score as f32
    }

    pub fn summary(&self) -> String {
        match &self.hard_blocker {
            Some(blocker) => format!(
                "{} required by hard constraint: {} (fit score {}/{})",
                self.decision, blocker, self.score, self.max_score
            ),
            None => format!(
                "{} recommended by fit score {}/{} (threshold {})",
                self.decision, self.score, self.max_score, SCORING_THRESHOLD
            ),
        }
    }
}
