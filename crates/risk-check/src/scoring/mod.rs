//! Deterministic risk arithmetic over a completed questionnaire.

mod calculator;
mod insights;
mod report;
pub mod tables;

pub use calculator::{RiskAssessment, RiskScoreCalculator};
pub use insights::{
    format_lakhs, generate_insights, Insight, InsightKind, Recommendation, RiskInsights,
};
pub use report::RiskReport;
pub use tables::{annual_hospitalisation_cost, CityCost, CityCostTable, CityTableError};

use serde::Serialize;

/// Highest score the gauge can show.
pub const MAX_SCORE: u8 = 97;

/// Segments drawn on the score gauge.
pub const GAUGE_TICKS: u8 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn from_score(score: u8) -> Self {
        if score >= 65 {
            RiskTier::High
        } else if score >= 40 {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            RiskTier::Low => "Well protected",
            RiskTier::Moderate => "Needs attention",
            RiskTier::High => "Needs urgent attention",
        }
    }
}

/// Intermediate figures behind a [`RiskResult`], all in lakh except the multipliers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBreakdown {
    pub base_member_cost: f64,
    pub city_multiplier: f64,
    pub condition_multiplier: f64,
    pub recommended_health_cover: f64,
    pub recommended_life_cover: f64,
    pub critical_illness_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub total_hospitalization_exposure: f64,
    pub health_cover_gap: f64,
    pub life_cover_gap: f64,
    pub composite_score: u8,
    pub risk_tier: RiskTier,
    pub breakdown: RiskBreakdown,
}

impl RiskResult {
    /// Index of the last lit tick on the score gauge.
    pub fn gauge_tick(&self) -> u8 {
        let span = f64::from(GAUGE_TICKS - 1);
        (f64::from(self.composite_score) / 100.0 * span).round() as u8
    }
}
