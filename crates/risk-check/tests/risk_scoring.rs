use chrono::NaiveDate;
use risk_check::questionnaire::{AnswerSet, CompletedAnswers, Questionnaire};
use risk_check::scoring::{CityCostTable, InsightKind, RiskScoreCalculator, RiskTier, MAX_SCORE};
use serde_json::{json, Value};

fn worked_example() -> Value {
    json!({
        "family": ["parents"],
        "family.parents_count": "1",
        "dependents": ["parents"],
        "ages.self": "34",
        "ages.parent_1": "62",
        "conditions": ["none"],
        "income.monthly_lakhs": "12",
        "debt.outstanding_lakhs": "30",
        "savings.liquid_lakhs": "10",
        "health_insurance": "yes",
        "health_cover.cover_lakhs": "5",
        "life_insurance": "no",
        "city.name": "Mumbai"
    })
}

fn complete(value: Value) -> CompletedAnswers {
    let answers: AnswerSet = serde_json::from_value(value).expect("answer set parses");
    Questionnaire::standard()
        .replay(&answers)
        .expect("answer set completes the questionnaire")
}

fn with(mut base: Value, overrides: Value) -> Value {
    if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
        for (key, value) in overrides {
            base.insert(key.clone(), value.clone());
        }
    }
    base
}

fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

#[test]
fn worked_example_scores_moderate() {
    let calculator = RiskScoreCalculator::standard();

    let result = calculator.score(&complete(worked_example()));

    assert!(approx(result.total_hospitalization_exposure, 18.225));
    assert!(approx(result.breakdown.city_multiplier, 1.35));
    assert!(approx(result.breakdown.condition_multiplier, 1.0));
    assert_eq!(result.breakdown.recommended_health_cover, 20.0);
    assert_eq!(result.health_cover_gap, 15.0);
    assert_eq!(result.breakdown.recommended_life_cover, 140.0);
    assert_eq!(result.life_cover_gap, 140.0);
    assert!(approx(result.breakdown.critical_illness_risk, 4.55625));
    assert_eq!(result.composite_score, 53);
    assert_eq!(result.risk_tier, RiskTier::Moderate);
    assert_eq!(result.gauge_tick(), 23);
}

#[test]
fn identical_answers_score_identically() {
    let calculator = RiskScoreCalculator::standard();

    let first = calculator.assess(&complete(worked_example()));
    let second = calculator.assess(&complete(worked_example()));

    assert_eq!(first, second);
}

#[test]
fn score_is_capped_at_97() {
    let calculator = RiskScoreCalculator::standard();
    let answers = with(
        worked_example(),
        json!({
            "debt.outstanding_lakhs": "200",
            "income.monthly_lakhs": "60",
            "conditions": ["cancer", "heart", "kidney"],
            "health_insurance": "no",
        }),
    );
    let mut answers = answers;
    if let Some(map) = answers.as_object_mut() {
        map.remove("health_cover.cover_lakhs");
    }

    let result = calculator.score(&complete(answers));

    assert_eq!(result.composite_score, MAX_SCORE);
    assert_eq!(result.risk_tier, RiskTier::High);
}

#[test]
fn zero_income_and_no_dependents_stays_in_range() {
    let calculator = RiskScoreCalculator::standard();
    let answers = with(
        worked_example(),
        json!({
            "dependents": [],
            "income.monthly_lakhs": "0",
            "debt.outstanding_lakhs": "0",
        }),
    );

    let result = calculator.score(&complete(answers));

    // 0.1 lakh floor: 0.1 × 12 × 0.5 rounds up to one 10 lakh step.
    assert_eq!(result.breakdown.recommended_life_cover, 10.0);
    assert!(result.composite_score <= MAX_SCORE);
    assert_eq!(result.risk_tier, RiskTier::Low);
}

#[test]
fn critical_conditions_double_the_illness_loading() {
    let calculator = RiskScoreCalculator::standard();
    let answers = with(worked_example(), json!({ "conditions": ["heart"] }));

    let result = calculator.score(&complete(answers));

    assert!(approx(result.breakdown.condition_multiplier, 1.3));
    assert!(approx(
        result.breakdown.critical_illness_risk,
        0.5 * result.total_hospitalization_exposure
    ));
}

#[test]
fn unknown_city_uses_baseline_multiplier() {
    let calculator = RiskScoreCalculator::standard();
    let answers = with(worked_example(), json!({ "city.name": "Shillong" }));

    let assessment = calculator.assess(&complete(answers));

    assert_eq!(assessment.result.breakdown.city_multiplier, 1.0);
    assert!(approx(assessment.result.total_hospitalization_exposure, 13.5));
}

#[test]
fn health_cover_floor_is_ten_lakh() {
    let calculator = RiskScoreCalculator::standard();
    let answers = with(
        worked_example(),
        json!({
            "family": [],
            "dependents": [],
            "ages.self": "25",
            "city.name": "Patna",
        }),
    );
    let mut answers = answers;
    if let Some(map) = answers.as_object_mut() {
        map.remove("family.parents_count");
        map.remove("ages.parent_1");
    }

    let result = calculator.score(&complete(answers));

    assert_eq!(result.breakdown.recommended_health_cover, 10.0);
    assert_eq!(result.health_cover_gap, 5.0);
}

#[test]
fn custom_city_table_changes_the_multiplier() {
    let table = CityCostTable::from_reader("city,multiplier\nMumbai,2.0\n".as_bytes())
        .expect("valid table");
    let calculator = RiskScoreCalculator::new(table);

    let result = calculator.score(&complete(worked_example()));

    assert!(approx(result.total_hospitalization_exposure, 27.0));
}

#[test]
fn report_carries_insights_and_labels() {
    let calculator = RiskScoreCalculator::standard();
    let assessed_on = NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date");

    let report = calculator.report(&complete(worked_example()), assessed_on, true);

    assert_eq!(report.assessed_on, assessed_on);
    assert!(report.city_recognised);
    assert_eq!(report.tier_label, "Moderate");
    assert_eq!(report.members.len(), 2);
    let insights = report.insights.expect("insights requested");
    assert!(insights
        .findings
        .iter()
        .any(|insight| insight.kind == InsightKind::Positive
            && insight.title == "You have basic health coverage"));
    assert!(insights
        .findings
        .iter()
        .any(|insight| insight.title == "You do not have life insurance"));
    assert!(insights
        .recommendations
        .iter()
        .any(|recommendation| recommendation.title.contains("₹1.4 Cr")));
}

#[test]
fn report_skips_insights_unless_requested() {
    let calculator = RiskScoreCalculator::standard();
    let assessed_on = NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date");

    let report = calculator.report(&complete(worked_example()), assessed_on, false);

    assert!(report.insights.is_none());
    let payload = serde_json::to_value(&report).expect("report serializes");
    assert!(payload.get("insights").is_none());
    assert_eq!(payload["result"]["composite_score"], 53);
}
