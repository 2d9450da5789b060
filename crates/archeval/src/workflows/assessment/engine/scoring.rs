use super::super::answers::AnswerSet;
use super::super::questions::{ScoredQuestion, LIKERT_MAX, LIKERT_MIN, SCORED_QUESTIONS};
use super::ScoreComponent;

pub(crate) fn score_answers(answers: &AnswerSet) -> (Vec<ScoreComponent>, u32) {
    let components: Vec<ScoreComponent> = SCORED_QUESTIONS
        .iter()
        .map(|question| component(question, answers))
        .collect();
    let total = components
        .iter()
        .map(|component| component.contribution)
        .sum();

    (components, total)
}

fn component(question: &ScoredQuestion, answers: &AnswerSet) -> ScoreComponent {
    let response = answers.response(question.id);
    let effective = if question.reverse {
        LIKERT_MAX + LIKERT_MIN - response.value()
    } else {
        response.value()
    };

    ScoreComponent {
        question: question.id,
        response,
        effective,
        weight: question.weight,
        contribution: u32::from(effective) * question.weight,
    }
}
