use serde::Serialize;

use super::{RiskAssessment, RiskTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Positive,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

/// Copy for the score-analysis screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskInsights {
    pub findings: Vec<Insight>,
    pub outlook: String,
    pub recommendations: Vec<Recommendation>,
}

/// `₹5L`, `₹17.5L`, `₹1.5 Cr`; zero or less reads as `None`.
pub fn format_lakhs(lakhs: f64) -> String {
    if lakhs <= 0.0 {
        "None".to_string()
    } else if lakhs >= 100.0 {
        format!("₹{:.1} Cr", lakhs / 100.0)
    } else {
        let rounded = (lakhs * 10.0).round() / 10.0;
        format!("₹{rounded}L")
    }
}

pub fn generate_insights(assessment: &RiskAssessment) -> RiskInsights {
    let profile = &assessment.profile;
    let result = &assessment.result;
    let breakdown = &result.breakdown;

    let mut findings = Vec::new();
    let mut recommendations = Vec::new();

    match profile.health_cover_lakhs {
        Some(cover) if result.health_cover_gap <= 0.0 => findings.push(Insight {
            kind: InsightKind::Positive,
            title: "Your health cover keeps pace with hospital costs".to_string(),
            detail: format!(
                "Your {} policy covers the {} a major hospitalisation could cost your household.",
                format_lakhs(cover),
                format_lakhs(result.total_hospitalization_exposure)
            ),
        }),
        Some(cover) => {
            findings.push(Insight {
                kind: InsightKind::Positive,
                title: "You have basic health coverage".to_string(),
                detail: format!(
                    "You have a {} health policy in place. That's a solid foundation.",
                    format_lakhs(cover)
                ),
            });
            findings.push(Insight {
                kind: InsightKind::Alert,
                title: "Your current health coverage may not be enough".to_string(),
                detail: format!(
                    "A major medical event {} can cost around {}, leaving a {} gap.",
                    location_phrase(&profile.city),
                    format_lakhs(breakdown.recommended_health_cover),
                    format_lakhs(result.health_cover_gap)
                ),
            });
            recommendations.push(Recommendation {
                title: "Upgrade your health cover".to_string(),
                description: format!(
                    "Keep your {} base plan and add a {} super top up. This significantly boosts coverage at a relatively low cost.",
                    format_lakhs(cover),
                    format_lakhs(result.health_cover_gap)
                ),
            });
        }
        None => {
            findings.push(Insight {
                kind: InsightKind::Alert,
                title: "You do not have health insurance".to_string(),
                detail: format!(
                    "Every hospital bill would be paid out of pocket. Your household's exposure is about {} a year.",
                    format_lakhs(result.total_hospitalization_exposure)
                ),
            });
            recommendations.push(Recommendation {
                title: format!(
                    "Start with a {} family health plan",
                    format_lakhs(breakdown.recommended_health_cover)
                ),
                description:
                    "A family floater covers every member under one sum insured and is the cheapest way to start."
                        .to_string(),
            });
        }
    }

    let dependents = match profile.dependent_count {
        0 => "Nobody depends on your income yet".to_string(),
        1 => "You have 1 dependent".to_string(),
        count => format!("You have {count} dependents"),
    };

    match profile.life_cover_lakhs {
        None => findings.push(Insight {
            kind: InsightKind::Alert,
            title: "You do not have life insurance".to_string(),
            detail: format!(
                "{dependents}. Without life cover, outstanding debt and living costs fall on your current savings."
            ),
        }),
        Some(cover) if result.life_cover_gap > 0.0 => findings.push(Insight {
            kind: InsightKind::Alert,
            title: "Your life cover falls short".to_string(),
            detail: format!(
                "{dependents}. Your {} cover is {} below what would replace your income and clear your debt.",
                format_lakhs(cover),
                format_lakhs(result.life_cover_gap)
            ),
        }),
        Some(cover) => findings.push(Insight {
            kind: InsightKind::Positive,
            title: "Your life cover protects your family".to_string(),
            detail: format!(
                "Your {} cover replaces your income and clears your debt.",
                format_lakhs(cover)
            ),
        }),
    }

    if result.life_cover_gap > 0.0 {
        let recommended = format_lakhs(breakdown.recommended_life_cover);
        recommendations.push(Recommendation {
            title: format!("Protect your family's future with a {recommended} term life plan"),
            description: format!(
                "A {recommended} term-life plan can replace your income for your dependents and clear your debt. Buying earlier locks in lower premiums and long term protection."
            ),
        });
    }

    if !profile.conditions.is_empty() {
        findings.push(Insight {
            kind: InsightKind::Alert,
            title: "Existing conditions raise your medical costs".to_string(),
            detail: format!(
                "{} reported condition(s) push expected hospital costs up by {:.0}%.",
                profile.conditions.len(),
                (breakdown.condition_multiplier - 1.0) * 100.0
            ),
        });
    }

    if profile.savings_lakhs > 0.0 && profile.savings_lakhs >= result.health_cover_gap {
        findings.push(Insight {
            kind: InsightKind::Positive,
            title: "Your savings can absorb a hospital bill".to_string(),
            detail: format!(
                "{} in liquid savings covers your current health cover gap.",
                format_lakhs(profile.savings_lakhs)
            ),
        });
    }

    let outlook = match result.risk_tier {
        RiskTier::High => "In a major health emergency, you may need to pay a large part of the bill out-of-pocket. This could create financial stress for your family.",
        RiskTier::Moderate => "Your family has some protection, but a serious illness or loss of income would still strain your savings.",
        RiskTier::Low => "Your family is well protected against most medical and income shocks. Review your cover as your family grows.",
    }
    .to_string();

    RiskInsights {
        findings,
        outlook,
        recommendations,
    }
}

fn location_phrase(city: &str) -> String {
    if city.is_empty() {
        "in your city".to_string()
    } else {
        format!("in {city}")
    }
}
