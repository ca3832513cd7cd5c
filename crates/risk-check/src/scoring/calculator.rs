use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::report::RiskReport;
use super::tables::{annual_hospitalisation_cost, CityCostTable};
use super::{RiskBreakdown, RiskResult, RiskTier, MAX_SCORE};
use crate::questionnaire::{CompletedAnswers, FamilyMember, HouseholdProfile};

const CONDITION_LOADING: f64 = 0.3;
const HEALTH_COVER_STEP: f64 = 5.0;
const HEALTH_COVER_FLOOR: f64 = 10.0;
const LIFE_COVER_STEP: f64 = 10.0;
const INCOME_FLOOR: f64 = 0.1;
const BASE_INCOME_YEARS: f64 = 0.5;
const YEARS_PER_DEPENDENT: f64 = 0.2;
const CRITICAL_ILLNESS_SHARE: f64 = 0.5;
const BASE_ILLNESS_SHARE: f64 = 0.25;
const SCORE_SCALE: f64 = 300.0;

/// Household profile together with the figures scored from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub profile: HouseholdProfile,
    pub result: RiskResult,
}

/// Stateless scorer; only the city table is configurable.
#[derive(Debug, Clone, Default)]
pub struct RiskScoreCalculator {
    cities: CityCostTable,
}

impl RiskScoreCalculator {
    pub fn new(cities: CityCostTable) -> Self {
        Self { cities }
    }

    pub fn standard() -> Self {
        Self::new(CityCostTable::standard())
    }

    pub fn cities(&self) -> &CityCostTable {
        &self.cities
    }

    pub fn score(&self, answers: &CompletedAnswers) -> RiskResult {
        self.assess(answers).result
    }

    pub fn assess(&self, answers: &CompletedAnswers) -> RiskAssessment {
        let profile = HouseholdProfile::from_completed(answers);
        let result = self.score_profile(&profile);
        RiskAssessment { profile, result }
    }

    pub fn report(
        &self,
        answers: &CompletedAnswers,
        assessed_on: NaiveDate,
        include_insights: bool,
    ) -> RiskReport {
        let assessment = self.assess(answers);
        let city_recognised = self.cities.is_known(&assessment.profile.city);
        RiskReport::new(&assessment, city_recognised, assessed_on, include_insights)
    }

    fn score_profile(&self, profile: &HouseholdProfile) -> RiskResult {
        let fallback = [FamilyMember::default_self()];
        let members: &[FamilyMember] = if profile.members.is_empty() {
            &fallback
        } else {
            &profile.members
        };

        let base_member_cost: f64 = members
            .iter()
            .map(|member| annual_hospitalisation_cost(member.age))
            .sum();
        let city_multiplier = self.cities.multiplier(&profile.city);
        let condition_multiplier = 1.0 + CONDITION_LOADING * profile.conditions.len() as f64;
        let exposure = base_member_cost * city_multiplier * condition_multiplier;

        let recommended_health_cover =
            round_up_to(exposure, HEALTH_COVER_STEP).max(HEALTH_COVER_FLOOR);
        let health_cover_gap =
            (recommended_health_cover - profile.health_cover_lakhs.unwrap_or(0.0)).max(0.0);

        let monthly_income = profile.monthly_income_lakhs.max(INCOME_FLOOR);
        let income_years =
            BASE_INCOME_YEARS + YEARS_PER_DEPENDENT * f64::from(profile.dependent_count);
        let recommended_life_cover = round_up_to(
            monthly_income * 12.0 * income_years + profile.debt_lakhs,
            LIFE_COVER_STEP,
        );
        let life_cover_gap =
            (recommended_life_cover - profile.life_cover_lakhs.unwrap_or(0.0)).max(0.0);

        let critical_illness_risk = if profile.has_critical_condition() {
            CRITICAL_ILLNESS_SHARE * exposure
        } else {
            BASE_ILLNESS_SHARE * exposure
        };

        let raw_score =
            (health_cover_gap + life_cover_gap + critical_illness_risk) / SCORE_SCALE * 100.0;
        let composite_score = raw_score.round().clamp(0.0, f64::from(MAX_SCORE)) as u8;
        let risk_tier = RiskTier::from_score(composite_score);

        debug!(
            members = members.len(),
            exposure,
            health_cover_gap,
            life_cover_gap,
            composite_score,
            tier = risk_tier.label(),
            "risk scored"
        );

        RiskResult {
            total_hospitalization_exposure: exposure,
            health_cover_gap,
            life_cover_gap,
            composite_score,
            risk_tier,
            breakdown: RiskBreakdown {
                base_member_cost,
                city_multiplier,
                condition_multiplier,
                recommended_health_cover,
                recommended_life_cover,
                critical_illness_risk,
            },
        }
    }
}

fn round_up_to(value: f64, step: f64) -> f64 {
    (value / step).ceil() * step
}
