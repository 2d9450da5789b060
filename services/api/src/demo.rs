use crate::report::render_result;
use archeval::error::AppError;
use archeval::workflows::assessment::{
    evaluate, AnswerError, AnswerSet, AnswerSetBuilder, ApiTolerance, DecisionResult,
    GatekeeperId, NarrativeRequest, TemplateNarrativeGenerator, SCORED_QUESTIONS,
};
use clap::Args;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Include the template narrative for each scenario
    #[arg(long)]
    pub(crate) explain: bool,
}

/// Reference answer sets exercising every decision path.
pub(crate) fn scenarios() -> Result<Vec<(&'static str, AnswerSet)>, AnswerError> {
    Ok(vec![
        ("Neutral answers, no hard constraints", neutral().build()?),
        (
            "Infrastructure refused and edge deployment required",
            neutral()
                .gatekeeper(GatekeeperId::OrgRefusesInfrastructure, true)
                .gatekeeper(GatekeeperId::EdgeDeploymentRequired, true)
                .build()?,
        ),
        (
            "Edge deployment required, every statement disagreed with",
            AnswerSet::builder()
                .api_tolerance(ApiTolerance::RiskMitigation)
                .remaining_gatekeepers(false)
                .gatekeeper(GatekeeperId::EdgeDeploymentRequired, true)
                .remaining_responses(1)
                .build()?,
        ),
        ("Narrow, high-volume workload", polarized(5, 1).build()?),
        ("Open-ended, knowledge-heavy workload", polarized(1, 5).build()?),
    ])
}

fn neutral() -> AnswerSetBuilder {
    AnswerSet::builder()
        .api_tolerance(ApiTolerance::RiskMitigation)
        .remaining_gatekeepers(false)
        .remaining_responses(3)
}

fn polarized(forward: u8, reverse: u8) -> AnswerSetBuilder {
    SCORED_QUESTIONS.iter().fold(
        AnswerSet::builder()
            .api_tolerance(ApiTolerance::RiskMitigation)
            .remaining_gatekeepers(false),
        |builder, question| {
            let value = if question.reverse { reverse } else { forward };
            builder.response(question.id, value)
        },
    )
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    for (index, (title, answers)) in scenarios()?.into_iter().enumerate() {
        let result = evaluate(&answers);
        println!("Scenario {}:", index + 1);
        print!("{}", render_result(title, &result));
        if args.explain {
            println!("{}", explanation(&answers, &result));
        }
        println!();
    }
    Ok(())
}

fn explanation(answers: &AnswerSet, result: &DecisionResult) -> String {
    TemplateNarrativeGenerator::render(&NarrativeRequest::new(answers, result))
}
