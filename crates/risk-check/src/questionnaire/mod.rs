//! Ten-step household questionnaire.
//!
//! The definition is static data; [`Questionnaire`] owns it and exposes pure
//! transitions over an explicit [`QuestionnaireState`]. A finished run yields
//! [`CompletedAnswers`], which [`HouseholdProfile`] projects into typed inputs
//! for scoring.

mod catalog;
pub mod domain;
mod engine;
pub mod profile;

#[cfg(test)]
mod tests;

pub use catalog::{ids, MAX_CHILDREN, MAX_PARENTS};
pub use domain::{
    Advance, AnswerKey, AnswerSet, AnswerValue, CompletedAnswers, CounterPrompt, Dependent,
    InputField, InputKind, Question, QuestionKind, QuestionOption, QuestionnaireError,
    QuestionnaireState, Retreat, Visibility,
};
pub use engine::Questionnaire;
pub use profile::{FamilyMember, HealthCondition, HouseholdProfile, MemberRole};
