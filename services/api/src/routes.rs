use crate::infra::{complete_answers, deserialize_optional_date, AppState};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use risk_check::error::AppError;
use risk_check::questionnaire::{AnswerSet, Question};
use risk_check::scoring::{CityCost, RiskReport};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) answers: AnswerSet,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) assessed_on: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) include_insights: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionnaireResponse {
    pub(crate) steps: usize,
    pub(crate) questions: Vec<Question>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CitiesQuery {
    #[serde(default)]
    pub(crate) prefix: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CitiesResponse {
    pub(crate) cities: Vec<CityCost>,
}

pub(crate) fn risk_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/risk/questionnaire", get(questionnaire_endpoint))
        .route("/api/v1/risk/cities", get(cities_endpoint))
        .route("/api/v1/risk/score", post(score_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn questionnaire_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<QuestionnaireResponse> {
    let questions = state.questionnaire.questions().to_vec();
    Json(QuestionnaireResponse {
        steps: questions.len(),
        questions,
    })
}

pub(crate) async fn cities_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<CitiesQuery>,
) -> Json<CitiesResponse> {
    let table = state.calculator.cities();
    let prefix = query.prefix.unwrap_or_default();
    let cities = table
        .suggest(&prefix)
        .into_iter()
        .map(|city| CityCost {
            city: city.to_string(),
            multiplier: table.multiplier(city),
        })
        .collect();

    Json(CitiesResponse { cities })
}

/// Body is taken as raw JSON so malformed answer sets surface as 400 rather
/// than the extractor's 422.
pub(crate) async fn score_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<RiskReport>, AppError> {
    let ScoreRequest {
        answers,
        assessed_on,
        include_insights,
    } = serde_json::from_value::<ScoreRequest>(payload)?;

    let completed = complete_answers(&state.questionnaire, &answers)?;
    let assessed_on = assessed_on.unwrap_or_else(|| Local::now().date_naive());
    let report = state
        .calculator
        .report(&completed, assessed_on, include_insights);

    info!(
        score = report.result.composite_score,
        tier = report.tier_label,
        city = %report.city,
        "risk score computed"
    );

    Ok(Json(report))
}
