use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use risk_check::config::RiskConfig;
use risk_check::error::AppError;
use risk_check::questionnaire::{AnswerSet, CompletedAnswers, Questionnaire};
use risk_check::scoring::{CityCostTable, RiskScoreCalculator};
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) questionnaire: Arc<Questionnaire>,
    pub(crate) calculator: Arc<RiskScoreCalculator>,
}

/// Standard table unless a CSV override is given, either explicitly or via `RISK_CITY_TABLE`.
pub(crate) fn load_calculator(
    config: &RiskConfig,
    city_table: Option<&Path>,
) -> Result<RiskScoreCalculator, AppError> {
    let path = city_table.or(config.city_table.as_deref());
    let table = match path {
        Some(path) => {
            let table = CityCostTable::from_path(path)?;
            info!(path = %path.display(), cities = table.cities().len(), "loaded city cost table");
            table
        }
        None => CityCostTable::standard(),
    };
    Ok(RiskScoreCalculator::new(table))
}

pub(crate) fn read_answers(path: &Path) -> Result<AnswerSet, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn complete_answers(
    questionnaire: &Questionnaire,
    answers: &AnswerSet,
) -> Result<CompletedAnswers, AppError> {
    Ok(questionnaire.replay(answers)?)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
