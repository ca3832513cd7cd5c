use crate::infra::{complete_answers, load_calculator, read_answers};
use chrono::{Local, NaiveDate};
use clap::Args;
use risk_check::config::AppConfig;
use risk_check::error::AppError;
use risk_check::questionnaire::{
    AnswerKey, AnswerSet, AnswerValue, Dependent, InputKind, Question, QuestionKind,
    Questionnaire, QuestionnaireError,
};
use risk_check::scoring::{format_lakhs, InsightKind, RiskReport, GAUGE_TICKS};
use risk_check::screens::{NavigationEvent, Outcome, RiskCheckSession, ScreenRouter, Tab, View};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Answer set (JSON) to feed through the questionnaire. Defaults to a sample household.
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Override the analysing pause in milliseconds.
    #[arg(long)]
    pub(crate) delay_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Answer set (JSON object of question or question.field keys)
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// CSV of city,multiplier rows replacing the built-in city table
    #[arg(long)]
    pub(crate) city_table: Option<PathBuf>,
    /// Include findings, outlook, and recommendations
    #[arg(long)]
    pub(crate) insights: bool,
    /// Assessment date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) assessed_on: Option<NaiveDate>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CitiesArgs {
    /// Only list cities starting with this text
    #[arg(long)]
    pub(crate) prefix: Option<String>,
    /// CSV of city,multiplier rows replacing the built-in city table
    #[arg(long)]
    pub(crate) city_table: Option<PathBuf>,
}

pub(crate) fn run_questions() -> Result<(), AppError> {
    let questionnaire = Questionnaire::standard();

    println!("Risk check questionnaire ({} steps)", questionnaire.len());
    for (index, question) in questionnaire.questions().iter().enumerate() {
        let optional = if question.required { "" } else { " (optional)" };
        println!("\n{}. {}{}", index + 1, question.title, optional);
        if let Some(subtitle) = question.subtitle {
            println!("   {subtitle}");
        }
        render_question(question, "   ");
    }

    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        answers,
        city_table,
        insights,
        assessed_on,
        json,
    } = args;

    let config = AppConfig::load()?;
    let calculator = load_calculator(&config.risk, city_table.as_deref())?;
    let answers = read_answers(&answers)?;
    let completed = complete_answers(&Questionnaire::standard(), &answers)?;
    let assessed_on = assessed_on.unwrap_or_else(|| Local::now().date_naive());

    let report = calculator.report(&completed, assessed_on, insights);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }

    Ok(())
}

pub(crate) fn run_city_search(args: CitiesArgs) -> Result<(), AppError> {
    let CitiesArgs { prefix, city_table } = args;

    let config = AppConfig::load()?;
    let calculator = load_calculator(&config.risk, city_table.as_deref())?;
    let table = calculator.cities();
    let prefix = prefix.unwrap_or_default();

    let matches = table.suggest(&prefix);
    if matches.is_empty() {
        println!("No cities match '{prefix}'; scoring will use the 1.0 baseline.");
        return Ok(());
    }

    for city in matches {
        println!("{city:<16} x{:.2}", table.multiplier(city));
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { answers, delay_ms } = args;

    let config = AppConfig::load()?;
    let delay = delay_ms
        .map(Duration::from_millis)
        .unwrap_or(config.risk.analysis_delay);
    let answers = match answers {
        Some(path) => read_answers(&path)?,
        None => sample_household()?,
    };

    let questionnaire = Arc::new(Questionnaire::standard());
    let calculator = Arc::new(load_calculator(&config.risk, None)?);
    let router = ScreenRouter::new(questionnaire.clone(), calculator.clone());
    let mut session = RiskCheckSession::new(router, delay);

    println!("Family risk check demo");
    println!("  screen: {}", session.router().current().name());
    for event in [
        NavigationEvent::SelectTab(Tab::Explore),
        NavigationEvent::OpenFamily,
        NavigationEvent::CalculateRisk,
    ] {
        session.dispatch(event)?;
        println!("  screen: {}", session.router().current().name());
    }

    loop {
        let step = match session.router().current() {
            View::Questionnaire(state) => state.step(),
            _ => break,
        };
        let Some(question) = questionnaire.question(step) else {
            break;
        };

        println!(
            "\nStep {}/{}: {}",
            step + 1,
            questionnaire.len(),
            question.title
        );
        for (key, value) in step_answers(question, &answers) {
            let event = NavigationEvent::Answer {
                key: key.clone(),
                value: value.clone(),
            };
            match session.dispatch(event) {
                Ok(_) => println!("  {key} = {}", describe(value)),
                Err(err) => println!("  skipped {key}: {err}"),
            }
        }

        if session.dispatch(NavigationEvent::Advance)? == Outcome::Ignored {
            return Err(AppError::from(QuestionnaireError::Incomplete {
                step,
                question: question.id.to_string(),
            }));
        }
    }

    let Some(ticket) = session.pending_ticket() else {
        println!("\nQuestionnaire closed before analysis started.");
        return Ok(());
    };
    println!(
        "\nAnalysing your household (ticket {ticket}, {} ms)...",
        delay.as_millis()
    );
    session.run_pending().await;

    let View::ScoreAnalysis(assessment) = session.router().current() else {
        println!("Analysis did not finish.");
        return Ok(());
    };
    let city_recognised = calculator.cities().is_known(&assessment.profile.city);
    let report = RiskReport::new(
        assessment,
        city_recognised,
        Local::now().date_naive(),
        true,
    );
    render_report(&report);

    session.dispatch(NavigationEvent::Understood)?;
    if let View::Family {
        risk_score: Some(score),
    } = session.router().current()
    {
        println!("\nFamily screen now shows a risk score of {score}/100.");
    }

    Ok(())
}

/// Keys owned by one step: the question itself plus any follow-up questions
/// it opens. Selections go in before the counters and fields they unlock.
fn step_answers<'a>(
    question: &Question,
    answers: &'a AnswerSet,
) -> Vec<(&'a AnswerKey, &'a AnswerValue)> {
    let mut owners = vec![question.id];
    owners.extend(
        question
            .options()
            .iter()
            .filter_map(|option| match &option.dependent {
                Dependent::FollowUp(follow_up) => Some(follow_up.id),
                _ => None,
            }),
    );

    let position = |key: &AnswerKey| owners.iter().position(|id| *id == key.question_id());
    let mut selected: Vec<_> = answers
        .iter()
        .filter(|(key, _)| position(*key).is_some())
        .collect();
    selected.sort_by_key(|(key, _)| (position(*key), key.field_id().is_some()));
    selected
}

fn describe(value: &AnswerValue) -> String {
    match value {
        AnswerValue::Text(text) => text.clone(),
        AnswerValue::List(items) if items.is_empty() => "(none)".to_string(),
        AnswerValue::List(items) => items.join(", "),
    }
}

fn sample_household() -> Result<AnswerSet, AppError> {
    let answers = json!({
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
    });
    Ok(serde_json::from_value(answers)?)
}

fn render_question(question: &Question, indent: &str) {
    match &question.kind {
        QuestionKind::SingleSelect { options } | QuestionKind::MultiSelect { options } => {
            let mode = if matches!(question.kind, QuestionKind::MultiSelect { .. }) {
                "choose any"
            } else {
                "choose one"
            };
            println!("{indent}[{}] {mode}", question.id);
            for option in options {
                let marker = if option.exclusive { " (exclusive)" } else { "" };
                println!("{indent}- {} = {}{marker}", option.id, option.label);
                match &option.dependent {
                    Dependent::None => {}
                    Dependent::Counter(counter) => println!(
                        "{indent}    {}.{}: {} ({}-{})",
                        question.id, counter.id, counter.label, counter.min, counter.max
                    ),
                    Dependent::FollowUp(follow_up) => {
                        println!("{indent}    then: {}", follow_up.title);
                        render_question(follow_up, &format!("{indent}    "));
                    }
                }
            }
        }
        QuestionKind::FreeInput { fields } => {
            for field in fields {
                let input = match field.input {
                    InputKind::Numeric { min, max } => format!("number {min}-{max}"),
                    InputKind::Text { min_len } => format!("text, {min_len}+ characters"),
                };
                let shown = if field.visibility.is_always() {
                    ""
                } else {
                    " (conditional)"
                };
                println!(
                    "{indent}- {}.{}: {} [{input}]{shown}",
                    question.id, field.id, field.label
                );
            }
        }
    }
}

fn render_report(report: &RiskReport) {
    let result = &report.result;
    let breakdown = &result.breakdown;

    println!("\nRisk analysis ({})", report.assessed_on);
    let city_note = if report.city_recognised {
        ""
    } else {
        " (not in the city table, baseline costs used)"
    };
    println!("City: {}{}", report.city, city_note);
    println!("Household:");
    for member in &report.members {
        println!(
            "  [{}] {:<10} {:<14} age {}",
            member.initials,
            member.name,
            member.role.label(),
            member.age
        );
    }
    println!("  Dependents: {}", report.dependent_count);

    let gauge: String = (0..GAUGE_TICKS)
        .map(|tick| if tick <= report.gauge_tick { '#' } else { '.' })
        .collect();
    println!(
        "\nScore: {}/100 {} ({})",
        result.composite_score, report.tier_label, report.badge
    );
    println!("  [{gauge}]");

    println!(
        "\nHospitalisation exposure: {}",
        format_lakhs(result.total_hospitalization_exposure)
    );
    println!(
        "  base {} x city {:.2} x conditions {:.2}",
        format_lakhs(breakdown.base_member_cost),
        breakdown.city_multiplier,
        breakdown.condition_multiplier
    );
    println!(
        "Health cover: recommended {}, gap {}",
        format_lakhs(breakdown.recommended_health_cover),
        format_lakhs(result.health_cover_gap)
    );
    println!(
        "Life cover: recommended {}, gap {}",
        format_lakhs(breakdown.recommended_life_cover),
        format_lakhs(result.life_cover_gap)
    );
    println!(
        "Critical illness risk: {}",
        format_lakhs(breakdown.critical_illness_risk)
    );

    let Some(insights) = &report.insights else {
        return;
    };

    println!("\nFindings:");
    for finding in &insights.findings {
        let marker = match finding.kind {
            InsightKind::Positive => "+",
            InsightKind::Alert => "!",
        };
        println!("  {marker} {}", finding.title);
        println!("    {}", finding.detail);
    }
    println!("\nOutlook: {}", insights.outlook);
    if !insights.recommendations.is_empty() {
        println!("\nRecommendations:");
        for recommendation in &insights.recommendations {
            println!("  - {}", recommendation.title);
            println!("    {}", recommendation.description);
        }
    }
}
