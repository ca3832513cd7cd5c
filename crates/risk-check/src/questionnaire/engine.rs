use tracing::debug;

use super::catalog::standard_questions;
use super::domain::{
    Advance, AnswerKey, AnswerSet, AnswerValue, CompletedAnswers, Dependent, InputField,
    InputKind, Question, QuestionKind, QuestionOption, QuestionnaireError, QuestionnaireState,
    Retreat,
};

/// Ordered questionnaire definition plus the pure transitions over [`QuestionnaireState`].
#[derive(Debug, Clone)]
pub struct Questionnaire {
    questions: Vec<Question>,
}

/// What an [`AnswerKey`] points at inside the definition.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Question(&'a Question),
    Field(&'a InputField),
    Counter {
        question: &'a Question,
        option: &'a QuestionOption,
        min: u8,
        max: u8,
    },
}

/// A located target and the option that has to be selected for it to be active.
#[derive(Debug, Clone, Copy)]
struct Located<'a> {
    target: Target<'a>,
    trigger: Option<(&'a str, &'a str)>,
}

impl Located<'_> {
    fn is_active(&self, answers: &AnswerSet) -> bool {
        let triggered = self
            .trigger
            .map(|(question, option)| answers.has_option(question, option))
            .unwrap_or(true);

        let counter_triggered = match self.target {
            Target::Counter {
                question, option, ..
            } => answers.has_option(question.id, option.id),
            _ => true,
        };

        let visible = match self.target {
            Target::Field(field) => field.visibility.holds(answers),
            _ => true,
        };

        triggered && counter_triggered && visible
    }
}

impl Questionnaire {
    pub fn standard() -> Self {
        Self::new(standard_questions())
    }

    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, step: usize) -> Option<&Question> {
        self.questions.get(step)
    }

    /// Fresh run: step 0 with nothing answered.
    pub fn restart(&self) -> QuestionnaireState {
        QuestionnaireState::new()
    }

    /// Record, replace, toggle, or clear an answer. A single option toggles a
    /// multi-select; a list replaces the whole selection. The state is returned
    /// untouched on error.
    pub fn answer(
        &self,
        state: QuestionnaireState,
        key: &AnswerKey,
        value: AnswerValue,
    ) -> Result<QuestionnaireState, QuestionnaireError> {
        let located = self.locate(key)?;
        if !located.is_active(state.answers()) {
            return Err(QuestionnaireError::Inactive(key.to_string()));
        }

        let mut answers = state.answers().clone();
        match located.target {
            Target::Question(question) => match &question.kind {
                QuestionKind::SingleSelect { .. } => {
                    select_single(&mut answers, question, key, value)?
                }
                QuestionKind::MultiSelect { .. } => match value {
                    AnswerValue::Text(option) => toggle(&mut answers, question, option.trim())?,
                    AnswerValue::List(options) => select_many(&mut answers, question, &options)?,
                },
                QuestionKind::FreeInput { .. } => {
                    return Err(QuestionnaireError::FieldRequired(question.id.to_string()));
                }
            },
            Target::Field(field) => {
                let raw = single_text(key, value)?;
                let stored = match field.input {
                    InputKind::Numeric { min, max } => parse_number(key, &raw)?
                        .map(|number| format_number(number.clamp(min, max))),
                    InputKind::Text { .. } => Some(raw.trim().to_string()),
                };
                store(&mut answers, key, stored);
            }
            Target::Counter { min, max, .. } => {
                let raw = single_text(key, value)?;
                let stored = parse_number(key, &raw)?.map(|number| {
                    format_number(number.round().clamp(f64::from(min), f64::from(max)))
                });
                store(&mut answers, key, stored);
            }
        }

        debug!(%key, step = state.step(), "questionnaire answer recorded");
        Ok(state.with_answers(answers))
    }

    /// Whether every required answer of the current step, and of each activated
    /// counter or follow-up, is present.
    pub fn can_advance(&self, state: &QuestionnaireState) -> bool {
        self.question(state.step())
            .map(|question| satisfied(question, state.answers(), question.required))
            .unwrap_or(false)
    }

    pub fn advance(&self, state: QuestionnaireState) -> Advance {
        if !self.can_advance(&state) {
            return Advance::Blocked(state);
        }

        let next = state.step() + 1;
        if next < self.len() {
            debug!(step = next, "questionnaire advanced");
            return Advance::Moved(state.with_step(next));
        }

        let mut answers = state.into_answers();
        for question in &self.questions {
            prune(&mut answers, question);
        }
        debug!(answers = answers.len(), "questionnaire completed");
        Advance::Completed(CompletedAnswers::new(answers))
    }

    pub fn retreat(&self, state: QuestionnaireState) -> Retreat {
        match state.step() {
            0 => Retreat::Exit,
            step => Retreat::Moved(state.with_step(step - 1)),
        }
    }

    /// Walk a full answer set through every step in order, as a user would.
    /// Answers to sub-questions that are not active are dropped.
    pub fn replay(&self, answers: &AnswerSet) -> Result<CompletedAnswers, QuestionnaireError> {
        for (key, _) in answers.iter() {
            self.locate(key)?;
        }

        let mut state = self.restart();
        loop {
            let step = state.step();
            let question = self
                .question(step)
                .ok_or_else(|| QuestionnaireError::Incomplete {
                    step,
                    question: String::new(),
                })?;
            state = self.replay_question(state, question, answers)?;

            state = match self.advance(state) {
                Advance::Moved(next) => next,
                Advance::Completed(completed) => return Ok(completed),
                Advance::Blocked(_) => {
                    return Err(QuestionnaireError::Incomplete {
                        step,
                        question: question.id.to_string(),
                    })
                }
            };
        }
    }

    fn replay_question(
        &self,
        mut state: QuestionnaireState,
        question: &Question,
        answers: &AnswerSet,
    ) -> Result<QuestionnaireState, QuestionnaireError> {
        let own = AnswerKey::question(question.id);
        if let Some(value) = answers.get(&own) {
            state = self.answer(state, &own, value.clone())?;
        }

        for (key, value) in answers.iter() {
            if key.question_id() != question.id || key.field_id().is_none() {
                continue;
            }
            if self.locate(key)?.is_active(state.answers()) {
                state = self.answer(state, key, value.clone())?;
            }
        }

        for option in question.options() {
            if let Dependent::FollowUp(follow_up) = &option.dependent {
                if state.answers().has_option(question.id, option.id) {
                    state = self.replay_question(state, follow_up, answers)?;
                }
            }
        }

        Ok(state)
    }

    fn locate(&self, key: &AnswerKey) -> Result<Located<'_>, QuestionnaireError> {
        self.questions
            .iter()
            .find_map(|question| locate_in(question, None, key))
            .ok_or_else(|| {
                if self.find_question(key.question_id()).is_some() {
                    QuestionnaireError::UnknownField {
                        question: key.question_id().to_string(),
                        field: key.field_id().unwrap_or_default().to_string(),
                    }
                } else {
                    QuestionnaireError::UnknownQuestion(key.question_id().to_string())
                }
            })
    }

    fn find_question(&self, id: &str) -> Option<&Question> {
        fn walk<'q>(question: &'q Question, id: &str) -> Option<&'q Question> {
            if question.id == id {
                return Some(question);
            }
            question.options().iter().find_map(|option| match &option.dependent {
                Dependent::FollowUp(follow_up) => walk(follow_up, id),
                _ => None,
            })
        }

        self.questions.iter().find_map(|question| walk(question, id))
    }
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::standard()
    }
}

fn locate_in<'a>(
    question: &'a Question,
    trigger: Option<(&'a str, &'a str)>,
    key: &AnswerKey,
) -> Option<Located<'a>> {
    if key.question_id() == question.id {
        let target = match key.field_id() {
            None => Target::Question(question),
            Some(field_id) => match question.field(field_id) {
                Some(field) => Target::Field(field),
                None => question.options().iter().find_map(|option| {
                    match &option.dependent {
                        Dependent::Counter(counter) if counter.id == field_id => {
                            Some(Target::Counter {
                                question,
                                option,
                                min: counter.min,
                                max: counter.max,
                            })
                        }
                        _ => None,
                    }
                })?,
            },
        };
        return Some(Located { target, trigger });
    }

    question.options().iter().find_map(|option| match &option.dependent {
        Dependent::FollowUp(follow_up) => {
            locate_in(follow_up, Some((question.id, option.id)), key)
        }
        _ => None,
    })
}

fn select_single(
    answers: &mut AnswerSet,
    question: &Question,
    key: &AnswerKey,
    value: AnswerValue,
) -> Result<(), QuestionnaireError> {
    let raw = single_text(key, value)?;
    let choice = raw.trim();

    if !choice.is_empty() && question.option(choice).is_none() {
        return Err(QuestionnaireError::UnknownOption {
            question: question.id.to_string(),
            option: choice.to_string(),
        });
    }

    let previous = answers.text(key).map(str::to_string);
    if let Some(previous) = previous.filter(|previous| previous != choice) {
        if let Some(option) = question.option(&previous) {
            clear_dependent(answers, question.id, option);
        }
    }

    answers.insert(key.clone(), AnswerValue::text(choice));
    Ok(())
}

fn toggle(
    answers: &mut AnswerSet,
    question: &Question,
    option_id: &str,
) -> Result<(), QuestionnaireError> {
    let option = question
        .option(option_id)
        .ok_or_else(|| QuestionnaireError::UnknownOption {
            question: question.id.to_string(),
            option: option_id.to_string(),
        })?;

    let mut selected = answers.list(question.id).to_vec();
    if let Some(position) = selected.iter().position(|item| item == option.id) {
        selected.remove(position);
        clear_dependent(answers, question.id, option);
    } else {
        selected.retain(|item| {
            let keep = match question.option(item) {
                Some(other) => !(option.exclusive || other.exclusive),
                None => false,
            };
            if !keep {
                if let Some(other) = question.option(item) {
                    clear_dependent(answers, question.id, other);
                }
            }
            keep
        });
        selected.push(option.id.to_string());
    }

    answers.insert(AnswerKey::question(question.id), AnswerValue::List(selected));
    Ok(())
}

/// Replace the selection with `option_ids` as a set. Duplicates and an
/// exclusive option listed next to others are rejected.
fn select_many(
    answers: &mut AnswerSet,
    question: &Question,
    option_ids: &[String],
) -> Result<(), QuestionnaireError> {
    let mut chosen: Vec<&QuestionOption> = Vec::with_capacity(option_ids.len());
    for raw in option_ids {
        let option_id = raw.trim();
        let option = question
            .option(option_id)
            .ok_or_else(|| QuestionnaireError::UnknownOption {
                question: question.id.to_string(),
                option: option_id.to_string(),
            })?;
        if chosen.iter().any(|existing| existing.id == option.id) {
            return Err(QuestionnaireError::DuplicateOption {
                question: question.id.to_string(),
                option: option.id.to_string(),
            });
        }
        chosen.push(option);
    }

    if chosen.len() > 1 {
        if let Some(exclusive) = chosen.iter().find(|option| option.exclusive) {
            return Err(QuestionnaireError::ExclusiveConflict {
                question: question.id.to_string(),
                option: exclusive.id.to_string(),
            });
        }
    }

    for option in question.options() {
        let kept = chosen.iter().any(|selected| selected.id == option.id);
        if !kept && answers.has_option(question.id, option.id) {
            clear_dependent(answers, question.id, option);
        }
    }

    let selected = chosen.iter().map(|option| option.id.to_string()).collect();
    answers.insert(AnswerKey::question(question.id), AnswerValue::List(selected));
    Ok(())
}

/// Remove whatever the option activated, recursively for follow-ups.
fn clear_dependent(answers: &mut AnswerSet, question_id: &str, option: &QuestionOption) {
    match &option.dependent {
        Dependent::None => {}
        Dependent::Counter(counter) => {
            answers.remove(&AnswerKey::field(question_id, counter.id));
        }
        Dependent::FollowUp(follow_up) => {
            for nested in follow_up.options() {
                clear_dependent(answers, follow_up.id, nested);
            }
            answers.remove_question(follow_up.id);
        }
    }
}

/// Drop answers hidden by the final selections.
fn prune(answers: &mut AnswerSet, question: &Question) {
    for field in question.fields() {
        if !field.visibility.holds(answers) {
            answers.remove(&AnswerKey::field(question.id, field.id));
        }
    }

    for option in question.options() {
        if answers.has_option(question.id, option.id) {
            if let Dependent::FollowUp(follow_up) = &option.dependent {
                prune(answers, follow_up);
            }
        } else {
            clear_dependent(answers, question.id, option);
        }
    }
}

fn satisfied(question: &Question, answers: &AnswerSet, required: bool) -> bool {
    match &question.kind {
        QuestionKind::SingleSelect { options } | QuestionKind::MultiSelect { options } => {
            if required && !answers.contains(&AnswerKey::question(question.id)) {
                return false;
            }
            options
                .iter()
                .filter(|option| answers.has_option(question.id, option.id))
                .all(|option| match &option.dependent {
                    Dependent::None => true,
                    Dependent::Counter(counter) => {
                        answers.contains(&AnswerKey::field(question.id, counter.id))
                    }
                    Dependent::FollowUp(follow_up) => satisfied(follow_up, answers, true),
                })
        }
        QuestionKind::FreeInput { fields } => {
            !required
                || fields
                    .iter()
                    .filter(|field| field.visibility.holds(answers))
                    .all(|field| field_filled(answers, question, field))
        }
    }
}

fn field_filled(answers: &AnswerSet, question: &Question, field: &InputField) -> bool {
    let key = AnswerKey::field(question.id, field.id);
    match field.input {
        InputKind::Numeric { .. } => answers.number(&key).is_some(),
        InputKind::Text { min_len } => answers
            .text(&key)
            .map(|text| text.trim().chars().count() >= min_len.max(1))
            .unwrap_or(false),
    }
}

fn single_text(key: &AnswerKey, value: AnswerValue) -> Result<String, QuestionnaireError> {
    match value {
        AnswerValue::Text(text) => Ok(text),
        AnswerValue::List(_) => Err(QuestionnaireError::UnexpectedList(key.to_string())),
    }
}

/// `None` for a blank value, which clears the answer.
fn parse_number(key: &AnswerKey, raw: &str) -> Result<Option<f64>, QuestionnaireError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .map(Some)
        .ok_or_else(|| QuestionnaireError::InvalidNumber {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

fn format_number(number: f64) -> String {
    number.to_string()
}

fn store(answers: &mut AnswerSet, key: &AnswerKey, value: Option<String>) {
    match value {
        Some(value) => answers.insert(key.clone(), AnswerValue::Text(value)),
        None => {
            answers.remove(key);
        }
    }
}
