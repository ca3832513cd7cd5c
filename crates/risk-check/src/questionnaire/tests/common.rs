use crate::questionnaire::{
    Advance, AnswerKey, AnswerSet, AnswerValue, Questionnaire, QuestionnaireState,
};

pub(super) fn key(raw: &str) -> AnswerKey {
    AnswerKey::try_from(raw.to_string()).expect("valid answer key")
}

pub(super) fn text(value: &str) -> AnswerValue {
    AnswerValue::text(value)
}

pub(super) fn list(values: &[&str]) -> AnswerValue {
    AnswerValue::List(values.iter().map(|value| value.to_string()).collect())
}

pub(super) fn answers(pairs: &[(&str, AnswerValue)]) -> AnswerSet {
    pairs
        .iter()
        .map(|(raw, value)| (key(raw), value.clone()))
        .collect()
}

/// Household of two (34 and a 62-year-old parent) in Mumbai, in step order.
pub(super) fn worked_example_pairs() -> Vec<(&'static str, AnswerValue)> {
    vec![
        ("family", list(&["parents"])),
        ("family.parents_count", text("1")),
        ("dependents", list(&["parents"])),
        ("ages.self", text("34")),
        ("ages.parent_1", text("62")),
        ("conditions", list(&["none"])),
        ("income.monthly_lakhs", text("12")),
        ("debt.outstanding_lakhs", text("30")),
        ("savings.liquid_lakhs", text("10")),
        ("health_insurance", text("yes")),
        ("health_cover.cover_lakhs", text("5")),
        ("life_insurance", text("no")),
        ("city.name", text("Mumbai")),
    ]
}

pub(super) fn worked_example() -> AnswerSet {
    answers(&worked_example_pairs())
}

pub(super) fn without(
    pairs: Vec<(&'static str, AnswerValue)>,
    skip: &[&str],
) -> Vec<(&'static str, AnswerValue)> {
    pairs
        .into_iter()
        .filter(|(raw, _)| !skip.contains(raw))
        .collect()
}

pub(super) fn answer(
    engine: &Questionnaire,
    state: QuestionnaireState,
    raw: &str,
    value: AnswerValue,
) -> QuestionnaireState {
    engine
        .answer(state, &key(raw), value)
        .unwrap_or_else(|err| panic!("answer '{raw}' rejected: {err}"))
}

pub(super) fn answer_all(
    engine: &Questionnaire,
    state: QuestionnaireState,
    pairs: &[(&str, AnswerValue)],
) -> QuestionnaireState {
    pairs.iter().fold(state, |state, (raw, value)| {
        answer(engine, state, raw, value.clone())
    })
}

pub(super) fn moved(advance: Advance) -> QuestionnaireState {
    match advance {
        Advance::Moved(state) => state,
        other => panic!("expected the questionnaire to move, got {other:?}"),
    }
}

/// Advance until `step` is mounted; every intermediate step must already be satisfied.
pub(super) fn walk_to(
    engine: &Questionnaire,
    mut state: QuestionnaireState,
    step: usize,
) -> QuestionnaireState {
    while state.step() < step {
        state = moved(engine.advance(state));
    }
    state
}
