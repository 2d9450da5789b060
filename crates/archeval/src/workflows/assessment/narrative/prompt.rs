use super::super::questions::{MAX_SCORE, SCORING_THRESHOLD};
use super::NarrativeRequest;

/// Renders the text-generation prompt for a decision.
pub fn build_prompt(request: &NarrativeRequest) -> String {
    let mut prompt = String::from(
        "You are an AI architecture advisor. Explain in two or three short paragraphs why the \
         recommended deployment architecture fits this project. Be concrete and avoid marketing language.\n\n",
    );

    let project = &request.project;
    if !project.project_name.is_empty() {
        prompt.push_str(&format!("Project: {}\n", project.project_name));
    }
    if !project.description.is_empty() {
        prompt.push_str(&format!("Description: {}\n", project.description));
    }

    prompt.push_str(&format!(
        "Recommendation: {} ({})\n",
        request.decision,
        request.decision.description()
    ));
    prompt.push_str(&format!(
        "Fit score: {}/{} (scores of {} or more favor SLM; max {})\n",
        request.score, request.max_score, SCORING_THRESHOLD, MAX_SCORE
    ));
    prompt.push_str(&format!(
        "External API tolerance: {}\n",
        request.api_tolerance.label()
    ));

    match &request.hard_blocker {
        Some(blocker) => prompt.push_str(&format!(
            "Hard constraint that decided the outcome regardless of score: {blocker}\n"
        )),
        None => prompt.push_str("No hard constraint applied; the fit score decided.\n"),
    }

    prompt.push_str("\nQuestion responses (1 = strongly disagree, 5 = strongly agree):\n");
    for component in &request.components {
        let question = component.question.question();
        prompt.push_str(&format!(
            "- {} -> {} ({}{}, weight {})\n",
            question.label,
            component.response.value(),
            component.response.label(),
            if question.reverse { ", favors LLM" } else { "" },
            component.weight
        ));
    }

    if request.hard_blocker.is_some() {
        prompt.push_str("\nState plainly that the hard constraint overrides the weighted score.\n");
    }

    prompt
}
