use super::super::answers::AnswerSet;
use super::super::questions::{gatekeepers_in_tier, Architecture, GatekeeperId, GatekeeperTier};

/// Gatekeeper that fixed the decision, with its reported reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardBlocker {
    pub gatekeeper: GatekeeperId,
    pub decision: Architecture,
    pub text: &'static str,
}

const TIER_PRECEDENCE: [GatekeeperTier; 2] =
    [GatekeeperTier::LlmForcing, GatekeeperTier::SlmForcing];

/// First true gatekeeper, scanning LLM-forcing before SLM-forcing and each
/// tier in declared order.
pub fn first_blocker(answers: &AnswerSet) -> Option<HardBlocker> {
    TIER_PRECEDENCE.iter().find_map(|tier| {
        gatekeepers_in_tier(*tier)
            .find(|question| answers.gatekeeper(question.id))
            .map(|question| HardBlocker {
                gatekeeper: question.id,
                decision: question.force_decision,
                text: question.blocker_text,
            })
    })
}
