use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Statically defined question rendered as one questionnaire step (or nested under an option).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<&'static str>,
    pub required: bool,
    pub kind: QuestionKind,
}

impl Question {
    pub fn options(&self) -> &[QuestionOption] {
        match &self.kind {
            QuestionKind::SingleSelect { options } | QuestionKind::MultiSelect { options } => {
                options
            }
            QuestionKind::FreeInput { .. } => &[],
        }
    }

    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options().iter().find(|option| option.id == option_id)
    }

    pub fn fields(&self) -> &[InputField] {
        match &self.kind {
            QuestionKind::FreeInput { fields } => fields,
            _ => &[],
        }
    }

    pub fn field(&self, field_id: &str) -> Option<&InputField> {
        self.fields().iter().find(|field| field.id == field_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    SingleSelect { options: Vec<QuestionOption> },
    MultiSelect { options: Vec<QuestionOption> },
    FreeInput { fields: Vec<InputField> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOption {
    pub id: &'static str,
    pub label: &'static str,
    /// Selecting an exclusive option deselects every other option, and vice versa.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive: bool,
    #[serde(skip_serializing_if = "Dependent::is_none")]
    pub dependent: Dependent,
}

impl QuestionOption {
    pub const fn plain(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            exclusive: false,
            dependent: Dependent::None,
        }
    }
}

/// Sub-question activated while its owning option is selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "prompt", rename_all = "snake_case")]
pub enum Dependent {
    None,
    Counter(CounterPrompt),
    FollowUp(Box<Question>),
}

impl Dependent {
    pub fn is_none(&self) -> bool {
        matches!(self, Dependent::None)
    }
}

/// Inline stepper stored under `<question>.<counter id>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterPrompt {
    pub id: &'static str,
    pub label: &'static str,
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputField {
    pub id: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    #[serde(skip_serializing_if = "Visibility::is_always")]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    /// Slider-style input; out-of-range values are clamped rather than rejected.
    Numeric { min: f64, max: f64 },
    Text { min_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Visibility {
    Always,
    WhenSelected {
        question: &'static str,
        option: &'static str,
    },
    WhenCountAtLeast {
        question: &'static str,
        option: &'static str,
        counter: &'static str,
        count: u8,
    },
}

impl Visibility {
    pub fn is_always(&self) -> bool {
        matches!(self, Visibility::Always)
    }

    pub fn holds(&self, answers: &AnswerSet) -> bool {
        match *self {
            Visibility::Always => true,
            Visibility::WhenSelected { question, option } => answers.has_option(question, option),
            Visibility::WhenCountAtLeast {
                question,
                option,
                counter,
                count,
            } => {
                answers.has_option(question, option)
                    && answers
                        .number(&AnswerKey::field(question, counter))
                        .map(|value| value >= f64::from(count))
                        .unwrap_or(false)
            }
        }
    }
}

/// Address of an answer: a question, or one field/counter of a question (`question.field`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnswerKey {
    question: String,
    field: Option<String>,
}

impl AnswerKey {
    pub fn question(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            field: None,
        }
    }

    pub fn field(question: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            field: Some(field.into()),
        }
    }

    pub fn question_id(&self) -> &str {
        &self.question
    }

    pub fn field_id(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}.{}", self.question, field),
            None => f.write_str(&self.question),
        }
    }
}

impl TryFrom<String> for AnswerKey {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let trimmed = raw.trim();
        let (question, field) = match trimmed.split_once('.') {
            Some((question, field)) => (question, Some(field)),
            None => (trimmed, None),
        };

        if question.is_empty() || field.is_some_and(str::is_empty) {
            return Err(format!("'{raw}' is not a valid answer key"));
        }

        Ok(Self {
            question: question.to_string(),
            field: field.map(str::to_string),
        })
    }
}

impl From<AnswerKey> for String {
    fn from(key: AnswerKey) -> Self {
        key.to_string()
    }
}

/// A single text/numeric answer or a multi-select list. JSON numbers are
/// accepted and kept in their string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for AnswerValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AnswerValueVisitor)
    }
}

struct AnswerValueVisitor;

impl<'de> Visitor<'de> for AnswerValueVisitor {
    type Value = AnswerValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, a number, or a list of option ids")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(AnswerValue::text(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(AnswerValue::Text(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(AnswerValue::Text(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(AnswerValue::Text(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if !value.is_finite() {
            return Err(E::invalid_value(de::Unexpected::Float(value), &self));
        }
        Ok(AnswerValue::Text(value.to_string()))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<String>()? {
            items.push(item);
        }
        Ok(AnswerValue::List(items))
    }
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(text) => text.trim().is_empty(),
            AnswerValue::List(items) => items.is_empty(),
        }
    }
}

/// Flat map of everything answered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<AnswerKey, AnswerValue>,
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AnswerSetVisitor)
    }
}

struct AnswerSetVisitor;

impl<'de> Visitor<'de> for AnswerSetVisitor {
    type Value = AnswerSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of answer keys to values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut answers = AnswerSet::new();
        while let Some(key) = map.next_key::<AnswerKey>()? {
            let value = map
                .next_value::<AnswerValue>()
                .map_err(|err| <A::Error as de::Error>::custom(format!("answer '{key}': {err}")))?;
            answers.insert(key, value);
        }
        Ok(answers)
    }
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, &AnswerValue)> {
        self.values.iter()
    }

    pub fn get(&self, key: &AnswerKey) -> Option<&AnswerValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &AnswerKey) -> bool {
        self.values
            .get(key)
            .map(|value| !value.is_empty())
            .unwrap_or(false)
    }

    pub fn text(&self, key: &AnswerKey) -> Option<&str> {
        match self.values.get(key) {
            Some(AnswerValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, key: &AnswerKey) -> Option<f64> {
        self.text(key)
            .and_then(|text| text.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }

    pub fn list(&self, question: &str) -> &[String] {
        match self.values.get(&AnswerKey::question(question)) {
            Some(AnswerValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Whether `option` is the single-select answer or a member of the multi-select list.
    pub fn has_option(&self, question: &str, option: &str) -> bool {
        match self.values.get(&AnswerKey::question(question)) {
            Some(AnswerValue::Text(text)) => text == option,
            Some(AnswerValue::List(items)) => items.iter().any(|item| item == option),
            None => false,
        }
    }

    /// Inserting an empty value removes the key instead.
    pub fn insert(&mut self, key: AnswerKey, value: AnswerValue) {
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    pub fn remove(&mut self, key: &AnswerKey) -> Option<AnswerValue> {
        self.values.remove(key)
    }

    /// Drop the question's own answer and every field stored under it.
    pub fn remove_question(&mut self, question: &str) {
        self.values.retain(|key, _| key.question != question);
    }
}

impl FromIterator<(AnswerKey, AnswerValue)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (AnswerKey, AnswerValue)>>(iter: I) -> Self {
        let mut answers = AnswerSet::new();
        for (key, value) in iter {
            answers.insert(key, value);
        }
        answers
    }
}

/// Answer set that walked every step of the questionnaire; the only input scoring accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompletedAnswers(AnswerSet);

impl CompletedAnswers {
    pub(crate) fn new(answers: AnswerSet) -> Self {
        Self(answers)
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.0
    }

    pub fn into_inner(self) -> AnswerSet {
        self.0
    }
}

/// Position in the questionnaire plus everything answered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionnaireState {
    step: usize,
    answers: AnswerSet,
}

impl QuestionnaireState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub(crate) fn with_step(self, step: usize) -> Self {
        Self { step, ..self }
    }

    pub(crate) fn with_answers(self, answers: AnswerSet) -> Self {
        Self { answers, ..self }
    }

    pub(crate) fn into_answers(self) -> AnswerSet {
        self.answers
    }
}

/// Result of asking the engine to move forward.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved(QuestionnaireState),
    Blocked(QuestionnaireState),
    Completed(CompletedAnswers),
}

/// Result of asking the engine to move back.
#[derive(Debug, Clone, PartialEq)]
pub enum Retreat {
    Moved(QuestionnaireState),
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("question '{question}' has no field '{field}'")]
    UnknownField { question: String, field: String },
    #[error("question '{question}' has no option '{option}'")]
    UnknownOption { question: String, option: String },
    #[error("question '{0}' is answered per field")]
    FieldRequired(String),
    #[error("'{0}' is not active for the current answers")]
    Inactive(String),
    #[error("'{key}' expects a number, got '{value}'")]
    InvalidNumber { key: String, value: String },
    #[error("'{0}' expects a single value")]
    UnexpectedList(String),
    #[error("option '{option}' is listed more than once for '{question}'")]
    DuplicateOption { question: String, option: String },
    #[error("option '{option}' of '{question}' cannot be combined with other options")]
    ExclusiveConflict { question: String, option: String },
    #[error("step {step} ('{question}') is missing required answers")]
    Incomplete { step: usize, question: String },
}
