use serde::Serialize;

use super::catalog::{ids, MAX_CHILDREN, MAX_PARENTS};
use super::domain::{AnswerKey, AnswerSet, CompletedAnswers};

const MEMBER_COLORS: [&str; 6] = [
    "#7c5cf6", "#3b82f6", "#ec4899", "#f59e0b", "#10b981", "#ef4444",
];

const DEFAULT_SELF_AGE: u8 = 34;
const DEFAULT_SPOUSE_AGE: u8 = 31;
const DEFAULT_CHILD_AGE: u8 = 8;
const DEFAULT_PARENT_AGE: u8 = 62;
const DEFAULT_CHILDREN: u8 = 1;
const DEFAULT_PARENTS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    PrimaryEarner,
    Spouse,
    Child,
    Parent,
}

impl MemberRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PrimaryEarner => "Primary earner",
            Self::Spouse => "Spouse",
            Self::Child => "Child",
            Self::Parent => "Parent",
        }
    }
}

/// Household member as shown on the ages step and the family screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyMember {
    pub name: String,
    pub role: MemberRole,
    pub age: u8,
    pub color: &'static str,
    pub initials: String,
}

impl FamilyMember {
    /// Stand-in used when no member could be read from the answers.
    pub fn default_self() -> Self {
        Self {
            name: "You".to_string(),
            role: MemberRole::PrimaryEarner,
            age: DEFAULT_SELF_AGE,
            color: MEMBER_COLORS[0],
            initials: "Me".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCondition {
    Diabetes,
    Heart,
    Cancer,
    Kidney,
    Ortho,
    Respiratory,
    Mental,
}

impl HealthCondition {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "diabetes" => Some(Self::Diabetes),
            "heart" => Some(Self::Heart),
            "cancer" => Some(Self::Cancer),
            "kidney" => Some(Self::Kidney),
            "ortho" => Some(Self::Ortho),
            "respiratory" => Some(Self::Respiratory),
            "mental" => Some(Self::Mental),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes",
            Self::Heart => "Heart disease / hypertension",
            Self::Cancer => "Cancer history",
            Self::Kidney => "Kidney / liver disease",
            Self::Ortho => "Orthopaedic / joint issues",
            Self::Respiratory => "Asthma / respiratory",
            Self::Mental => "Mental health condition",
        }
    }

    /// Conditions that double the critical-illness loading.
    pub const fn is_critical(self) -> bool {
        matches!(self, Self::Cancer | Self::Heart)
    }
}

/// Typed projection of a completed answer set. Missing or malformed answers
/// fall back to the same defaults the questionnaire starts from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdProfile {
    pub members: Vec<FamilyMember>,
    pub dependent_count: u8,
    pub conditions: Vec<HealthCondition>,
    pub monthly_income_lakhs: f64,
    pub debt_lakhs: f64,
    pub savings_lakhs: f64,
    /// `None` when the household has no health insurance.
    pub health_cover_lakhs: Option<f64>,
    pub life_cover_lakhs: Option<f64>,
    pub city: String,
}

impl HouseholdProfile {
    pub fn from_completed(completed: &CompletedAnswers) -> Self {
        let answers = completed.answers();

        let spouse = answers.has_option(ids::FAMILY, ids::SPOUSE);
        let children = group_size(answers, ids::CHILDREN, ids::CHILDREN_COUNT, DEFAULT_CHILDREN)
            .min(MAX_CHILDREN);
        let parents = group_size(answers, ids::PARENTS, ids::PARENTS_COUNT, DEFAULT_PARENTS)
            .min(MAX_PARENTS);

        let members = members(answers, spouse, children, parents);

        let dependent_count = answers
            .list(ids::DEPENDENTS)
            .iter()
            .map(|group| match group.as_str() {
                ids::SPOUSE if spouse => 1,
                ids::CHILDREN => children,
                ids::PARENTS => parents,
                _ => 0,
            })
            .sum();

        let mut conditions: Vec<HealthCondition> = answers
            .list(ids::CONDITIONS)
            .iter()
            .filter_map(|id| HealthCondition::from_id(id))
            .collect();
        conditions.sort();
        conditions.dedup();

        Self {
            members,
            dependent_count,
            conditions,
            monthly_income_lakhs: amount(answers, ids::INCOME, ids::MONTHLY_LAKHS),
            debt_lakhs: amount(answers, ids::DEBT, ids::OUTSTANDING_LAKHS),
            savings_lakhs: amount(answers, ids::SAVINGS, ids::LIQUID_LAKHS),
            health_cover_lakhs: cover(answers, ids::HEALTH_INSURANCE, ids::HEALTH_COVER),
            life_cover_lakhs: cover(answers, ids::LIFE_INSURANCE, ids::LIFE_COVER),
            city: answers
                .text(&AnswerKey::field(ids::CITY, ids::CITY_NAME))
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn has_critical_condition(&self) -> bool {
        self.conditions.iter().any(|condition| condition.is_critical())
    }
}

/// Number of people behind a family option; zero when the option is not selected.
fn group_size(answers: &AnswerSet, option: &str, counter: &str, default: u8) -> u8 {
    if !answers.has_option(ids::FAMILY, option) {
        return 0;
    }

    answers
        .number(&AnswerKey::field(ids::FAMILY, counter))
        .map(|count| count.round().max(1.0) as u8)
        .unwrap_or(default)
}

fn members(answers: &AnswerSet, spouse: bool, children: u8, parents: u8) -> Vec<FamilyMember> {
    let mut members = vec![FamilyMember {
        age: age(answers, ids::SELF_AGE, DEFAULT_SELF_AGE),
        ..FamilyMember::default_self()
    }];

    if spouse {
        members.push(FamilyMember {
            name: "Spouse".to_string(),
            role: MemberRole::Spouse,
            age: age(answers, ids::SPOUSE_AGE, DEFAULT_SPOUSE_AGE),
            color: MEMBER_COLORS[1],
            initials: "SP".to_string(),
        });
    }

    for (index, field) in ids::CHILD_AGES.iter().take(children as usize).enumerate() {
        members.push(FamilyMember {
            name: format!("Child {}", index + 1),
            role: MemberRole::Child,
            age: age(answers, field, DEFAULT_CHILD_AGE),
            color: MEMBER_COLORS[4],
            initials: format!("C{}", index + 1),
        });
    }

    for (index, field) in ids::PARENT_AGES.iter().take(parents as usize).enumerate() {
        members.push(FamilyMember {
            name: format!("Parent {}", index + 1),
            role: MemberRole::Parent,
            age: age(answers, field, DEFAULT_PARENT_AGE),
            color: MEMBER_COLORS[2],
            initials: format!("P{}", index + 1),
        });
    }

    members
}

fn age(answers: &AnswerSet, field: &str, default: u8) -> u8 {
    answers
        .number(&AnswerKey::field(ids::AGES, field))
        .map(|age| age.round().clamp(0.0, 99.0) as u8)
        .unwrap_or(default)
}

fn amount(answers: &AnswerSet, question: &str, field: &str) -> f64 {
    answers
        .number(&AnswerKey::field(question, field))
        .map(|value| value.max(0.0))
        .unwrap_or(0.0)
}

fn cover(answers: &AnswerSet, insured_question: &str, cover_question: &str) -> Option<f64> {
    if !answers.has_option(insured_question, ids::YES) {
        return None;
    }

    Some(amount(answers, cover_question, ids::COVER_LAKHS))
}
