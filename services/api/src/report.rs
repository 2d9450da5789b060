use crate::infra::{assessment_service, StoreFallback};
use archeval::config::AppConfig;
use archeval::error::AppError;
use archeval::telemetry::{self, LogOutput};
use archeval::workflows::assessment::{
    evaluate, gatekeepers_in_tier, AnswerSet, AnswerSubmission, DecisionResult, GatekeeperTier,
    MAX_SCORE, SCORED_QUESTIONS, SCORING_THRESHOLD,
};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file containing project details and questionnaire answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Emit the result as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip narrative generation and persistence
    #[arg(long)]
    pub(crate) no_narrative: bool,
}

#[derive(Debug, Serialize)]
struct EvaluationOutput<'a> {
    project_name: &'a str,
    #[serde(flatten)]
    result: &'a DecisionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    narrative: Option<&'a str>,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_output(&config.telemetry, LogOutput::Stderr)?;

    let answers = load_answers(&args.answers)?;

    let (result, narrative) = if args.no_narrative {
        (evaluate(&answers), None)
    } else {
        let record = assessment_service(&config, StoreFallback::Disabled)
            .submit_and_wait(answers.clone())
            .await;
        (record.result, record.narrative)
    };

    let project_name = answers.project().project_name.as_str();
    if args.json {
        let output = EvaluationOutput {
            project_name,
            result: &result,
            narrative: narrative.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_result(project_name, &result));
        if let Some(narrative) = narrative {
            println!();
            println!("{narrative}");
        }
    }

    Ok(())
}

pub(crate) fn load_answers(path: &Path) -> Result<AnswerSet, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let submission: AnswerSubmission = serde_json::from_str(&raw)?;
    Ok(AnswerSet::try_from(submission)?)
}

pub(crate) fn render_result(project_name: &str, result: &DecisionResult) -> String {
    let mut out = String::new();
    let title = if project_name.is_empty() {
        "Unnamed project"
    } else {
        project_name
    };

    out.push_str(&format!("{title}\n"));
    out.push_str(&format!(
        "  Decision: {} ({})\n",
        result.decision,
        result.decision.description()
    ));
    out.push_str(&format!(
        "  Fit score: {}/{} ({:.0}%)\n",
        result.score,
        result.max_score,
        result.score_pct() * 100.0
    ));
    out.push_str(&format!("  Basis: {}\n", result.summary()));

    out.push_str("  Score breakdown:\n");
    for component in &result.components {
        out.push_str(&format!(
            "    {:<28} answer {} -> {} x{} = {}\n",
            component.question.as_str(),
            component.response.value(),
            component.effective,
            component.weight,
            component.contribution
        ));
    }

    out
}

pub(crate) fn render_questions() -> String {
    let mut out = String::new();

    out.push_str("Gatekeepers (first \"yes\" in tier order forces the decision):\n");
    for tier in [GatekeeperTier::LlmForcing, GatekeeperTier::SlmForcing] {
        for question in gatekeepers_in_tier(tier) {
            out.push_str(&format!(
                "  [{}] {:<28} {}\n",
                question.force_decision,
                question.id.as_str(),
                question.label
            ));
        }
    }

    out.push_str("\nScored questions (1 = strongly disagree, 5 = strongly agree):\n");
    for question in &SCORED_QUESTIONS {
        let direction = if question.reverse { "reverse" } else { "forward" };
        out.push_str(&format!(
            "  w{} {:<7} {:<28} {}\n",
            question.weight,
            direction,
            question.id.as_str(),
            question.label
        ));
    }

    out.push_str(&format!(
        "\nMaximum score {MAX_SCORE}; SLM is recommended at {SCORING_THRESHOLD} or above.\n"
    ));
    out
}

pub(crate) fn run_questions() {
    print!("{}", render_questions());
}

#[cfg(test)]
mod tests {
    use super::*;
    use archeval::workflows::assessment::{Architecture, ApiTolerance, GatekeeperId, GATEKEEPERS};

    fn answers_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "archeval-{name}-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("write answers file");
        path
    }

    #[test]
    fn load_answers_rejects_out_of_range_responses() {
        let path = answers_file(
            "out-of-range",
            r#"{"api_tolerance": "risk_mitigation", "gatekeepers": {}, "responses": {"narrow_task_scope": 9}}"#,
        );

        let outcome = load_answers(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(outcome, Err(AppError::Answers(_))));
    }

    #[test]
    fn load_answers_requires_api_tolerance() {
        let path = answers_file(
            "no-tolerance",
            r#"{"gatekeepers": {}, "responses": {}}"#,
        );

        let outcome = load_answers(&path);
        std::fs::remove_file(&path).ok();
        match outcome {
            Err(AppError::Json(err)) => assert!(err.to_string().contains("api_tolerance")),
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn load_answers_reports_invalid_json() {
        let path = answers_file("invalid-json", "not json");

        let outcome = load_answers(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(outcome, Err(AppError::Json(_))));
    }

    #[test]
    fn load_answers_reports_missing_file() {
        let path = std::env::temp_dir().join("archeval-does-not-exist.json");
        assert!(matches!(load_answers(&path), Err(AppError::Io(_))));
    }

    #[test]
    fn rendered_result_names_the_blocker() {
        let answers = AnswerSet::builder()
            .api_tolerance(ApiTolerance::RiskMitigation)
            .remaining_gatekeepers(false)
            .gatekeeper(GatekeeperId::OrgRefusesInfrastructure, true)
            .remaining_responses(3)
            .build()
            .expect("complete answers");
        let result = evaluate(&answers);
        assert_eq!(result.decision, Architecture::Llm);

        let text = render_result("Support bot", &result);
        assert!(text.starts_with("Support bot\n"));
        assert!(text.contains("Fit score: 60/100"));
        assert!(text.contains("Basis: LLM required by hard constraint:"));
        assert!(text.contains("(fit score 60/100)"));
    }

    #[test]
    fn question_listing_covers_every_question() {
        let text = render_questions();
        for gatekeeper in &GATEKEEPERS {
            assert!(text.contains(gatekeeper.id.as_str()));
        }
        for question in &SCORED_QUESTIONS {
            assert!(text.contains(question.id.as_str()));
        }
        assert!(text.contains("Maximum score 100"));
    }
}
