use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::questions::{
    GatekeeperId, ScoredQuestionId, API_TOLERANCE_ID, GATEKEEPERS, LIKERT_MAX, LIKERT_MIN,
    SCORED_QUESTIONS,
};

/// Likert response in `1..=5`, from "Strongly Disagree" to "Strongly Agree".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LikertResponse(u8);

impl LikertResponse {
    pub const NEUTRAL: LikertResponse = LikertResponse(3);

    pub fn new(value: u8) -> Option<Self> {
        (LIKERT_MIN..=LIKERT_MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Strongly Disagree",
            2 => "Disagree",
            3 => "Neutral",
            4 => "Agree",
            _ => "Strongly Agree",
        }
    }
}

impl TryFrom<u8> for LikertResponse {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!("likert response {value} outside {LIKERT_MIN}..={LIKERT_MAX}")
        })
    }
}

impl From<LikertResponse> for u8 {
    fn from(value: LikertResponse) -> Self {
        value.0
    }
}

/// Tolerance for routing project data through an external API provider.
///
/// Collected and reported alongside the decision; it has no effect on the
/// forced decision or the fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiTolerance {
    NotAcceptable,
    #[default]
    RiskMitigation,
    FullyAcceptable,
}

impl ApiTolerance {
    pub fn label(&self) -> &'static str {
        match self {
            ApiTolerance::NotAcceptable => "Not acceptable",
            ApiTolerance::RiskMitigation => "Acceptable with risk mitigation",
            ApiTolerance::FullyAcceptable => "Fully acceptable",
        }
    }
}

/// Free-text project details captured with a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub description: String,
}

/// Complete, validated answers for every question in the static tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AnswerSubmission", into = "AnswerSubmission")]
pub struct AnswerSet {
    project: ProjectMetadata,
    api_tolerance: ApiTolerance,
    gatekeepers: BTreeMap<GatekeeperId, bool>,
    responses: BTreeMap<ScoredQuestionId, LikertResponse>,
}

impl AnswerSet {
    pub fn builder() -> AnswerSetBuilder {
        AnswerSetBuilder::default()
    }

    pub fn project(&self) -> &ProjectMetadata {
        &self.project
    }

    pub fn api_tolerance(&self) -> ApiTolerance {
        self.api_tolerance
    }

    pub fn gatekeeper(&self, id: GatekeeperId) -> bool {
        self.gatekeepers.get(&id).copied().unwrap_or(false)
    }

    pub fn response(&self, id: ScoredQuestionId) -> LikertResponse {
        self.responses
            .get(&id)
            .copied()
            .unwrap_or(LikertResponse::NEUTRAL)
    }
}

/// Incrementally assembles an [`AnswerSet`], validating on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct AnswerSetBuilder {
    project: ProjectMetadata,
    api_tolerance: Option<ApiTolerance>,
    gatekeepers: BTreeMap<GatekeeperId, bool>,
    responses: BTreeMap<ScoredQuestionId, u8>,
}

impl AnswerSetBuilder {
    pub fn project(mut self, project: ProjectMetadata) -> Self {
        self.project = project;
        self
    }

    pub fn api_tolerance(mut self, tolerance: ApiTolerance) -> Self {
        self.api_tolerance = Some(tolerance);
        self
    }

    pub fn gatekeeper(mut self, id: GatekeeperId, value: bool) -> Self {
        self.gatekeepers.insert(id, value);
        self
    }

    /// Answers every gatekeeper not yet set with `value`.
    pub fn remaining_gatekeepers(mut self, value: bool) -> Self {
        for question in &GATEKEEPERS {
            self.gatekeepers.entry(question.id).or_insert(value);
        }
        self
    }

    pub fn response(mut self, id: ScoredQuestionId, value: u8) -> Self {
        self.responses.insert(id, value);
        self
    }

    /// Answers every scored question not yet set with `value`.
    pub fn remaining_responses(mut self, value: u8) -> Self {
        for question in &SCORED_QUESTIONS {
            self.responses.entry(question.id).or_insert(value);
        }
        self
    }

    pub fn build(self) -> Result<AnswerSet, AnswerError> {
        let missing: Vec<String> = GATEKEEPERS
            .iter()
            .filter(|question| !self.gatekeepers.contains_key(&question.id))
            .map(|question| question.id.as_str().to_string())
            .chain(
                self.api_tolerance
                    .is_none()
                    .then(|| API_TOLERANCE_ID.to_string()),
            )
            .chain(
                SCORED_QUESTIONS
                    .iter()
                    .filter(|question| !self.responses.contains_key(&question.id))
                    .map(|question| question.id.as_str().to_string()),
            )
            .collect();
        if !missing.is_empty() {
            return Err(AnswerError::MissingAnswers { ids: missing });
        }

        let mut responses = BTreeMap::new();
        for (id, value) in self.responses {
            let response = LikertResponse::new(value).ok_or(AnswerError::OutOfRange {
                id: id.as_str().to_string(),
                value: i64::from(value),
            })?;
            responses.insert(id, response);
        }

        let api_tolerance = self.api_tolerance.ok_or_else(|| AnswerError::MissingAnswers {
            ids: vec![API_TOLERANCE_ID.to_string()],
        })?;

        Ok(AnswerSet {
            project: self.project,
            api_tolerance,
            gatekeepers: self.gatekeepers,
            responses,
        })
    }
}

/// Wire form of a questionnaire submission keyed by question id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerSubmission {
    #[serde(default)]
    pub project: ProjectMetadata,
    /// Required like every other answer; there is no serde default.
    pub api_tolerance: ApiTolerance,
    pub gatekeepers: BTreeMap<String, bool>,
    pub responses: BTreeMap<String, i64>,
}

impl TryFrom<AnswerSubmission> for AnswerSet {
    type Error = AnswerError;

    fn try_from(submission: AnswerSubmission) -> Result<Self, Self::Error> {
        let mut builder = AnswerSet::builder()
            .project(submission.project)
            .api_tolerance(submission.api_tolerance);

        for (key, value) in submission.gatekeepers {
            let id = key
                .parse::<GatekeeperId>()
                .map_err(|_| AnswerError::UnknownQuestion { id: key.clone() })?;
            builder = builder.gatekeeper(id, value);
        }

        for (key, value) in submission.responses {
            let id = key
                .parse::<ScoredQuestionId>()
                .map_err(|_| AnswerError::UnknownQuestion { id: key.clone() })?;
            let value = u8::try_from(value)
                .ok()
                .filter(|value| (LIKERT_MIN..=LIKERT_MAX).contains(value))
                .ok_or(AnswerError::OutOfRange {
                    id: key.clone(),
                    value,
                })?;
            builder = builder.response(id, value);
        }

        builder.build()
    }
}

impl From<AnswerSet> for AnswerSubmission {
    fn from(answers: AnswerSet) -> Self {
        Self {
            project: answers.project,
            api_tolerance: answers.api_tolerance,
            gatekeepers: answers
                .gatekeepers
                .into_iter()
                .map(|(id, value)| (id.as_str().to_string(), value))
                .collect(),
            responses: answers
                .responses
                .into_iter()
                .map(|(id, value)| (id.as_str().to_string(), i64::from(value.value())))
                .collect(),
        }
    }
}

/// Input validation failures raised before the decision engine runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("missing answers for: {}", ids.join(", "))]
    MissingAnswers { ids: Vec<String> },
    #[error("unknown question id '{id}'")]
    UnknownQuestion { id: String },
    #[error("response {value} for '{id}' must be between 1 and 5")]
    OutOfRange { id: String, value: i64 },
}
