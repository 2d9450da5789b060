use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Deployment architecture classes the questionnaire chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    /// Self-hosted small language model.
    #[serde(rename = "SLM")]
    Slm,
    /// Managed large language model API.
    #[serde(rename = "LLM")]
    Llm,
}

impl Architecture {
    pub fn label(&self) -> &'static str {
        match self {
            Architecture::Slm => "SLM",
            Architecture::Llm => "LLM",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Architecture::Slm => "self-hosted small language model",
            Architecture::Llm => "managed large language model API",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Precedence class of a gatekeeper. LLM-forcing gatekeepers always win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatekeeperTier {
    LlmForcing,
    SlmForcing,
}

/// Gatekeeper identifiers. Variant order matches [`GATEKEEPERS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatekeeperId {
    OrgRefusesInfrastructure,
    TimeToMarketCritical,
    DataMustStayOnPremises,
    EdgeDeploymentRequired,
    OfflineOperationRequired,
}

impl GatekeeperId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatekeeperId::OrgRefusesInfrastructure => "org_refuses_infrastructure",
            GatekeeperId::TimeToMarketCritical => "time_to_market_critical",
            GatekeeperId::DataMustStayOnPremises => "data_must_stay_on_premises",
            GatekeeperId::EdgeDeploymentRequired => "edge_deployment_required",
            GatekeeperId::OfflineOperationRequired => "offline_operation_required",
        }
    }

    pub fn question(&self) -> &'static GatekeeperQuestion {
        &GATEKEEPERS[*self as usize]
    }
}

impl fmt::Display for GatekeeperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatekeeperId {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        GATEKEEPERS
            .iter()
            .map(|question| question.id)
            .find(|id| id.as_str() == value)
            .ok_or(())
    }
}

/// Scored question identifiers. Variant order matches [`SCORED_QUESTIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoredQuestionId {
    NarrowTaskScope,
    DomainDataAvailable,
    HighRequestVolume,
    LowLatencyRequired,
    MlTeamCapacity,
    CostSensitive,
    BroadKnowledgeRequired,
    ComplexReasoningRequired,
    OpenEndedGeneration,
    RequirementsVolatile,
}

impl ScoredQuestionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoredQuestionId::NarrowTaskScope => "narrow_task_scope",
            ScoredQuestionId::DomainDataAvailable => "domain_data_available",
            ScoredQuestionId::HighRequestVolume => "high_request_volume",
            ScoredQuestionId::LowLatencyRequired => "low_latency_required",
            ScoredQuestionId::MlTeamCapacity => "ml_team_capacity",
            ScoredQuestionId::CostSensitive => "cost_sensitive",
            ScoredQuestionId::BroadKnowledgeRequired => "broad_knowledge_required",
            ScoredQuestionId::ComplexReasoningRequired => "complex_reasoning_required",
            ScoredQuestionId::OpenEndedGeneration => "open_ended_generation",
            ScoredQuestionId::RequirementsVolatile => "requirements_volatile",
        }
    }

    pub fn question(&self) -> &'static ScoredQuestion {
        &SCORED_QUESTIONS[*self as usize]
    }
}

impl fmt::Display for ScoredQuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoredQuestionId {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SCORED_QUESTIONS
            .iter()
            .map(|question| question.id)
            .find(|id| id.as_str() == value)
            .ok_or(())
    }
}

/// Boolean hard constraint that forces the decision when answered "yes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GatekeeperQuestion {
    pub id: GatekeeperId,
    pub label: &'static str,
    pub force_decision: Architecture,
    pub blocker_text: &'static str,
}

impl GatekeeperQuestion {
    pub const fn tier(&self) -> GatekeeperTier {
        match self.force_decision {
            Architecture::Llm => GatekeeperTier::LlmForcing,
            Architecture::Slm => GatekeeperTier::SlmForcing,
        }
    }
}

/// Likert question contributing `weight * effective_response` to the fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredQuestion {
    pub id: ScoredQuestionId,
    pub label: &'static str,
    pub weight: u32,
    /// Agreement favors LLM, so the response is inverted before weighting.
    pub reverse: bool,
}

/// Gatekeepers in declared order. Within a tier the first true answer wins.
pub const GATEKEEPERS: [GatekeeperQuestion; 5] = [
    GatekeeperQuestion {
        id: GatekeeperId::OrgRefusesInfrastructure,
        label: "Our organization will not provision or operate its own model-serving infrastructure.",
        force_decision: Architecture::Llm,
        blocker_text: "The organization will not host or maintain model infrastructure, so a managed LLM API is the only viable path.",
    },
    GatekeeperQuestion {
        id: GatekeeperId::TimeToMarketCritical,
        label: "The solution must be in production within weeks, leaving no time for model fine-tuning or hosting setup.",
        force_decision: Architecture::Llm,
        blocker_text: "The time-to-market constraint leaves no room to fine-tune and deploy a self-hosted model; an LLM API is required.",
    },
    GatekeeperQuestion {
        id: GatekeeperId::DataMustStayOnPremises,
        label: "Regulatory or contractual rules forbid sending this data to any third-party API.",
        force_decision: Architecture::Slm,
        blocker_text: "Data may not leave the organization's environment, so the model must be self-hosted.",
    },
    GatekeeperQuestion {
        id: GatekeeperId::EdgeDeploymentRequired,
        label: "The model must run on edge or embedded devices.",
        force_decision: Architecture::Slm,
        blocker_text: "Edge deployment requires a model small enough to run on the target devices.",
    },
    GatekeeperQuestion {
        id: GatekeeperId::OfflineOperationRequired,
        label: "The system must keep working without internet connectivity.",
        force_decision: Architecture::Slm,
        blocker_text: "Offline operation rules out any hosted API; a locally deployed SLM is required.",
    },
];

/// Wire key of the informational API tolerance answer.
pub const API_TOLERANCE_ID: &str = "api_tolerance";

/// Informational question about exposing data to external APIs. Never scored.
pub const API_TOLERANCE_LABEL: &str =
    "How acceptable is it for project data to be processed by an external API provider?";

pub const SCORED_QUESTIONS: [ScoredQuestion; 10] = [
    ScoredQuestion {
        id: ScoredQuestionId::NarrowTaskScope,
        label: "The task is narrow and well defined (classification, extraction, routing).",
        weight: 3,
        reverse: false,
    },
    ScoredQuestion {
        id: ScoredQuestionId::DomainDataAvailable,
        label: "We have domain-specific data available for fine-tuning.",
        weight: 3,
        reverse: false,
    },
    ScoredQuestion {
        id: ScoredQuestionId::HighRequestVolume,
        label: "We expect a high, sustained request volume where per-call cost matters.",
        weight: 2,
        reverse: false,
    },
    ScoredQuestion {
        id: ScoredQuestionId::LowLatencyRequired,
        label: "Responses must arrive with very low latency.",
        weight: 2,
        reverse: false,
    },
    ScoredQuestion {
        id: ScoredQuestionId::MlTeamCapacity,
        label: "We have in-house ML engineering capacity to train and operate models.",
        weight: 2,
        reverse: false,
    },
    ScoredQuestion {
        id: ScoredQuestionId::CostSensitive,
        label: "Long-term operating cost is a primary concern.",
        weight: 2,
        reverse: false,
    },
    ScoredQuestion {
        id: ScoredQuestionId::BroadKnowledgeRequired,
        label: "The task requires broad general world knowledge.",
        weight: 2,
        reverse: true,
    },
    ScoredQuestion {
        id: ScoredQuestionId::ComplexReasoningRequired,
        label: "The task requires complex multi-step reasoning.",
        weight: 2,
        reverse: true,
    },
    ScoredQuestion {
        id: ScoredQuestionId::OpenEndedGeneration,
        label: "Outputs are open-ended, creative or multilingual.",
        weight: 1,
        reverse: true,
    },
    ScoredQuestion {
        id: ScoredQuestionId::RequirementsVolatile,
        label: "Requirements are likely to change frequently.",
        weight: 1,
        reverse: true,
    },
];

pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

const fn total_weight(questions: &[ScoredQuestion]) -> u32 {
    let mut total = 0;
    let mut index = 0;
    while index < questions.len() {
        total += questions[index].weight;
        index += 1;
    }
    total
}

pub const TOTAL_WEIGHT: u32 = total_weight(&SCORED_QUESTIONS);

/// Highest achievable fit score.
pub const MAX_SCORE: u32 = TOTAL_WEIGHT * LIKERT_MAX as u32;

/// Scores at or above this recommend SLM when no gatekeeper fired.
pub const SCORING_THRESHOLD: u32 = MAX_SCORE / 2;

/// Gatekeepers of one tier, preserving declared order.
pub fn gatekeepers_in_tier(
    tier: GatekeeperTier,
) -> impl Iterator<Item = &'static GatekeeperQuestion> {
    GATEKEEPERS
        .iter()
        .filter(move |question| question.tier() == tier)
}
