use async_trait::async_trait;

use super::super::questions::{Architecture, SCORING_THRESHOLD};
use super::{NarrativeError, NarrativeGenerator, NarrativeRequest};

/// Offline generator producing a fixed-structure explanation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrativeGenerator;

impl TemplateNarrativeGenerator {
    pub fn render(request: &NarrativeRequest) -> String {
        let opening = match &request.hard_blocker {
            Some(blocker) => format!(
                "{} is required for this project. {}",
                request.decision, blocker
            ),
            None => format!(
                "{} is recommended: the weighted fit score is {} of {}, {} the threshold of {}.",
                request.decision,
                request.score,
                request.max_score,
                if request.score >= SCORING_THRESHOLD {
                    "at or above"
                } else {
                    "below"
                },
                SCORING_THRESHOLD
            ),
        };

        let mut strongest: Vec<_> = request
            .components
            .iter()
            .filter(|component| match request.decision {
                Architecture::Slm => component.effective >= 4,
                Architecture::Llm => component.effective <= 2,
            })
            .collect();
        strongest.sort_by(|left, right| right.weight.cmp(&left.weight));

        let drivers: Vec<&str> = strongest
            .iter()
            .take(3)
            .map(|component| component.question.question().label)
            .collect();

        let mut narrative = opening;
        if !drivers.is_empty() {
            narrative.push_str("\n\nThe answers that weigh most toward this outcome:");
            for driver in drivers {
                narrative.push_str("\n- ");
                narrative.push_str(driver);
            }
        }

        if request.hard_blocker.is_some() {
            narrative.push_str(&format!(
                "\n\nThe fit score of {} of {} is reported for reference only; the hard constraint takes precedence.",
                request.score, request.max_score
            ));
        }

        narrative
    }
}

#[async_trait]
impl NarrativeGenerator for TemplateNarrativeGenerator {
    async fn generate(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Ok(Self::render(request))
    }
}
