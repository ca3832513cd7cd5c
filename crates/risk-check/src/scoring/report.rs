use chrono::NaiveDate;
use serde::Serialize;

use super::insights::{generate_insights, RiskInsights};
use super::{RiskAssessment, RiskResult};
use crate::questionnaire::FamilyMember;

/// Dated, display-ready view of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub assessed_on: NaiveDate,
    pub city: String,
    pub city_recognised: bool,
    pub members: Vec<FamilyMember>,
    pub dependent_count: u8,
    pub result: RiskResult,
    pub tier_label: &'static str,
    pub badge: &'static str,
    pub gauge_tick: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<RiskInsights>,
}

impl RiskReport {
    pub fn new(
        assessment: &RiskAssessment,
        city_recognised: bool,
        assessed_on: NaiveDate,
        include_insights: bool,
    ) -> Self {
        let result = assessment.result.clone();
        Self {
            assessed_on,
            city: assessment.profile.city.clone(),
            city_recognised,
            members: assessment.profile.members.clone(),
            dependent_count: assessment.profile.dependent_count,
            tier_label: result.risk_tier.label(),
            badge: result.risk_tier.badge(),
            gauge_tick: result.gauge_tick(),
            insights: include_insights.then(|| generate_insights(assessment)),
            result,
        }
    }
}
