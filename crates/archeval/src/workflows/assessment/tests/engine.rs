use super::common::*;
use crate::workflows::assessment::answers::{AnswerSet, ApiTolerance};
use crate::workflows::assessment::engine::{decide_from_score, evaluate};
use crate::workflows::assessment::questions::{
    Architecture, GatekeeperId, GatekeeperTier, GATEKEEPERS, MAX_SCORE, SCORED_QUESTIONS,
    SCORING_THRESHOLD, TOTAL_WEIGHT,
};

const ALL_MASKS: std::ops::Range<u32> = 0..(1 << GATEKEEPERS.len());

#[test]
fn neutral_answers_score_three_times_total_weight() {
    let result = evaluate(&answers_with(&[], 3));

    assert_eq!(result.score, 3 * TOTAL_WEIGHT);
    assert_eq!(result.max_score, MAX_SCORE);
    assert!(result.hard_blocker.is_none());
    assert!(result.triggered_gatekeeper.is_none());
    assert_eq!(result.decision, decide_from_score(3 * TOTAL_WEIGHT));
    assert_eq!(result.decision, Architecture::Slm);
}

#[test]
fn llm_forcing_gatekeeper_beats_slm_forcing_gatekeeper() {
    let answers = answers_with(
        &[
            GatekeeperId::OrgRefusesInfrastructure,
            GatekeeperId::EdgeDeploymentRequired,
        ],
        3,
    );

    let result = evaluate(&answers);

    assert_eq!(result.decision, Architecture::Llm);
    assert_eq!(
        result.hard_blocker.as_deref(),
        Some(GatekeeperId::OrgRefusesInfrastructure.question().blocker_text)
    );
    assert_eq!(
        result.triggered_gatekeeper,
        Some(GatekeeperId::OrgRefusesInfrastructure)
    );
}

#[test]
fn slm_forcing_gatekeeper_overrides_llm_leaning_score() {
    let answers = answers_with(&[GatekeeperId::EdgeDeploymentRequired], 1);
    let unblocked = evaluate(&answers_with(&[], 1));
    assert!(unblocked.score < SCORING_THRESHOLD);
    assert_eq!(unblocked.decision, Architecture::Llm);

    let result = evaluate(&answers);

    assert_eq!(result.decision, Architecture::Slm);
    assert_eq!(
        result.hard_blocker.as_deref(),
        Some(GatekeeperId::EdgeDeploymentRequired.question().blocker_text)
    );
    assert_eq!(
        result.score, unblocked.score,
        "score is still reported when a gatekeeper fires"
    );
}

#[test]
fn maximal_slm_answers_reach_max_score() {
    let result = evaluate(&polarized(5, 1));

    assert_eq!(result.score, MAX_SCORE);
    assert_eq!(result.decision, Architecture::Slm);
    assert!(result.hard_blocker.is_none());
}

#[test]
fn maximal_llm_answers_reach_min_score() {
    let result = evaluate(&polarized(1, 5));

    assert_eq!(result.score, TOTAL_WEIGHT);
    assert_eq!(result.decision, Architecture::Llm);
    assert!(result.hard_blocker.is_none());
}

#[test]
fn threshold_boundary_is_inclusive() {
    assert_eq!(decide_from_score(SCORING_THRESHOLD), Architecture::Slm);
    assert_eq!(decide_from_score(SCORING_THRESHOLD - 1), Architecture::Llm);
    assert_eq!(SCORING_THRESHOLD, MAX_SCORE / 2);
}

#[test]
fn evaluation_is_deterministic() {
    for mask in ALL_MASKS {
        let answers = answers_from_mask(mask, 2, ApiTolerance::RiskMitigation);
        assert_eq!(evaluate(&answers), evaluate(&answers));
    }
}

#[test]
fn first_true_llm_forcing_gatekeeper_always_wins() {
    for mask in ALL_MASKS {
        let answers = answers_from_mask(mask, 4, ApiTolerance::FullyAcceptable);
        let result = evaluate(&answers);

        let first_llm = GATEKEEPERS
            .iter()
            .filter(|q| q.tier() == GatekeeperTier::LlmForcing)
            .find(|q| answers.gatekeeper(q.id));
        let first_slm = GATEKEEPERS
            .iter()
            .filter(|q| q.tier() == GatekeeperTier::SlmForcing)
            .find(|q| answers.gatekeeper(q.id));

        match (first_llm, first_slm) {
            (Some(question), _) => {
                assert_eq!(result.decision, Architecture::Llm, "mask {mask:#07b}");
                assert_eq!(result.hard_blocker.as_deref(), Some(question.blocker_text));
            }
            (None, Some(question)) => {
                assert_eq!(result.decision, Architecture::Slm, "mask {mask:#07b}");
                assert_eq!(result.hard_blocker.as_deref(), Some(question.blocker_text));
            }
            (None, None) => {
                assert!(result.hard_blocker.is_none());
                assert_eq!(result.decision, decide_from_score(result.score));
            }
        }
    }
}

#[test]
fn later_gatekeeper_in_same_tier_does_not_replace_first() {
    let answers = answers_with(
        &[
            GatekeeperId::OfflineOperationRequired,
            GatekeeperId::DataMustStayOnPremises,
        ],
        3,
    );

    let result = evaluate(&answers);

    assert_eq!(
        result.triggered_gatekeeper,
        Some(GatekeeperId::DataMustStayOnPremises)
    );
}

#[test]
fn scoring_is_monotonic_in_each_response() {
    for question in &SCORED_QUESTIONS {
        let mut previous = None;
        for value in 1..=5 {
            let answers = AnswerSet::builder()
                .api_tolerance(ApiTolerance::RiskMitigation)
                .remaining_gatekeepers(false)
                .response(question.id, value)
                .remaining_responses(3)
                .build()
                .expect("complete answers");
            let score = evaluate(&answers).score;

            if let Some(previous) = previous {
                if question.reverse {
                    assert!(score <= previous, "{} increased score", question.id);
                } else {
                    assert!(score >= previous, "{} decreased score", question.id);
                }
            }
            previous = Some(score);
        }
    }
}

#[test]
fn score_stays_within_bounds() {
    for forward in 1..=5 {
        for reverse in 1..=5 {
            let result = evaluate(&polarized(forward, reverse));
            assert!(result.score <= result.max_score);
            assert!(result.score >= TOTAL_WEIGHT);
            assert_eq!(result.max_score, 5 * TOTAL_WEIGHT);
        }
    }
}

#[test]
fn components_explain_the_score() {
    let result = evaluate(&polarized(4, 1));

    assert_eq!(result.components.len(), SCORED_QUESTIONS.len());
    assert_eq!(
        result
            .components
            .iter()
            .map(|component| component.contribution)
            .sum::<u32>(),
        result.score
    );
    for component in &result.components {
        let question = component.question.question();
        let expected = if question.reverse { 5 } else { 4 };
        assert_eq!(component.effective, expected);
        assert_eq!(component.contribution, u32::from(expected) * question.weight);
    }
}

#[test]
fn api_tolerance_never_changes_the_result() {
    for mask in ALL_MASKS {
        let baseline = evaluate(&answers_from_mask(mask, 3, ApiTolerance::NotAcceptable));
        for tolerance in [ApiTolerance::RiskMitigation, ApiTolerance::FullyAcceptable] {
            assert_eq!(evaluate(&answers_from_mask(mask, 3, tolerance)), baseline);
        }
    }
}

#[test]
fn summary_describes_decision_source() {
    let blocked = evaluate(&answers_with(&[GatekeeperId::TimeToMarketCritical], 3));
    assert!(blocked.summary().starts_with("LLM required by hard constraint"));

    let scored = evaluate(&answers_with(&[], 3));
    assert_eq!(
        scored.summary(),
        "SLM recommended by fit score 60/100 (threshold 50)"
    );
    assert!((scored.score_pct() - 0.6).abs() < f32::EPSILON);
}
