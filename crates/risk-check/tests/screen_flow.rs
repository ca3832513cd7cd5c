use std::sync::Arc;
use std::time::Duration;

use risk_check::questionnaire::{AnswerKey, AnswerValue, Questionnaire, QuestionnaireError};
use risk_check::scoring::RiskScoreCalculator;
use risk_check::screens::{
    NavigationEvent, Outcome, RiskCheckSession, ScreenRouter, Tab, View,
};

const DELAY: Duration = Duration::from_millis(2800);

fn router() -> ScreenRouter {
    ScreenRouter::new(
        Arc::new(Questionnaire::standard()),
        Arc::new(RiskScoreCalculator::standard()),
    )
}

fn answer_event(key: &str, value: AnswerValue) -> NavigationEvent {
    NavigationEvent::Answer {
        key: AnswerKey::try_from(key.to_string()).expect("valid key"),
        value,
    }
}

fn text(value: &str) -> AnswerValue {
    AnswerValue::text(value)
}

fn list(values: &[&str]) -> AnswerValue {
    AnswerValue::List(values.iter().map(|value| value.to_string()).collect())
}

fn worked_example_events() -> Vec<NavigationEvent> {
    vec![
        answer_event("family", list(&["parents"])),
        answer_event("family.parents_count", text("1")),
        answer_event("dependents", list(&["parents"])),
        answer_event("ages.self", text("34")),
        answer_event("ages.parent_1", text("62")),
        answer_event("conditions", list(&["none"])),
        answer_event("income.monthly_lakhs", text("12")),
        answer_event("debt.outstanding_lakhs", text("30")),
        answer_event("savings.liquid_lakhs", text("10")),
        answer_event("health_insurance", text("yes")),
        answer_event("health_cover.cover_lakhs", text("5")),
        answer_event("life_insurance", text("no")),
        answer_event("city.name", text("Mumbai")),
    ]
}

fn dispatch(router: &mut ScreenRouter, event: NavigationEvent) -> Outcome {
    router.handle(event).expect("event accepted")
}

/// Home tab → explore → family → questionnaire, answered and advanced to analysing.
fn drive_to_analysing(session: &mut RiskCheckSession) {
    for event in [
        NavigationEvent::SelectTab(Tab::Explore),
        NavigationEvent::OpenFamily,
        NavigationEvent::CalculateRisk,
    ] {
        session.dispatch(event).expect("navigation accepted");
    }
    for event in worked_example_events() {
        session.dispatch(event).expect("answer accepted");
    }
    for _ in 0..10 {
        session
            .dispatch(NavigationEvent::Advance)
            .expect("advance accepted");
    }
}

#[test]
fn starts_on_home_tab() {
    let router = router();

    assert_eq!(router.current(), &View::Tabs(Tab::Home));
    assert!(router.pending_analysis().is_none());
}

#[test]
fn detail_screens_return_home() {
    let mut router = router();

    for open in [
        NavigationEvent::OpenVehicleDetail,
        NavigationEvent::OpenNotifications,
        NavigationEvent::OpenProfile,
    ] {
        assert_eq!(dispatch(&mut router, open), Outcome::Changed);
        assert_eq!(dispatch(&mut router, NavigationEvent::Back), Outcome::Changed);
        assert_eq!(router.current(), &View::Tabs(Tab::Home));
    }
}

#[test]
fn family_backs_out_to_explore() {
    let mut router = router();
    dispatch(&mut router, NavigationEvent::SelectTab(Tab::Explore));
    dispatch(&mut router, NavigationEvent::OpenFamily);

    assert_eq!(router.current(), &View::Family { risk_score: None });

    dispatch(&mut router, NavigationEvent::Back);
    assert_eq!(router.current(), &View::Tabs(Tab::Explore));
}

#[test]
fn events_for_other_screens_are_ignored() {
    let mut router = router();

    assert_eq!(dispatch(&mut router, NavigationEvent::Advance), Outcome::Ignored);
    assert_eq!(dispatch(&mut router, NavigationEvent::Understood), Outcome::Ignored);
    assert_eq!(dispatch(&mut router, NavigationEvent::Back), Outcome::Ignored);
    assert_eq!(router.current(), &View::Tabs(Tab::Home));
}

#[test]
fn exiting_the_questionnaire_returns_to_family() {
    let mut router = router();
    dispatch(&mut router, NavigationEvent::SelectTab(Tab::Explore));
    dispatch(&mut router, NavigationEvent::OpenFamily);
    dispatch(&mut router, NavigationEvent::CalculateRisk);

    assert!(matches!(router.current(), View::Questionnaire(state) if state.step() == 0));

    dispatch(&mut router, NavigationEvent::Retreat);
    assert_eq!(router.current(), &View::Family { risk_score: None });
}

#[test]
fn rejected_answers_keep_the_questionnaire_mounted() {
    let mut router = router();
    dispatch(&mut router, NavigationEvent::SelectTab(Tab::Explore));
    dispatch(&mut router, NavigationEvent::OpenFamily);
    dispatch(&mut router, NavigationEvent::CalculateRisk);

    let err = router
        .handle(answer_event("ages.self", text("old")))
        .expect_err("not a number");

    assert!(matches!(err, QuestionnaireError::InvalidNumber { .. }));
    assert!(matches!(router.current(), View::Questionnaire(_)));
}

#[test]
fn blocked_advance_is_ignored() {
    let mut router = router();
    dispatch(&mut router, NavigationEvent::SelectTab(Tab::Explore));
    dispatch(&mut router, NavigationEvent::OpenFamily);
    dispatch(&mut router, NavigationEvent::CalculateRisk);
    dispatch(&mut router, NavigationEvent::Advance);
    dispatch(&mut router, NavigationEvent::Advance);

    assert_eq!(dispatch(&mut router, NavigationEvent::Advance), Outcome::Ignored);
    assert!(matches!(router.current(), View::Questionnaire(state) if state.step() == 2));
}

#[tokio::test(start_paused = true)]
async fn analysing_delay_leads_to_score_and_family_score() {
    let mut session = RiskCheckSession::new(router(), DELAY);
    drive_to_analysing(&mut session);

    let ticket = session.router().pending_analysis().expect("analysing mounted");
    assert_eq!(session.pending_ticket(), Some(ticket));

    let started = tokio::time::Instant::now();
    let outcome = session.run_pending().await;

    assert_eq!(outcome, Some(Outcome::Changed));
    assert!(started.elapsed() >= DELAY);
    match session.router().current() {
        View::ScoreAnalysis(assessment) => {
            assert_eq!(assessment.result.composite_score, 53);
        }
        other => panic!("expected score analysis, got {}", other.name()),
    }
    assert!(session.pending_ticket().is_none());

    session
        .dispatch(NavigationEvent::Understood)
        .expect("understood accepted");
    assert_eq!(
        session.router().current(),
        &View::Family {
            risk_score: Some(53)
        }
    );
}

#[tokio::test(start_paused = true)]
async fn leaving_analysing_cancels_the_timer() {
    let mut session = RiskCheckSession::new(router(), DELAY);
    drive_to_analysing(&mut session);

    session.dispatch(NavigationEvent::Back).expect("back accepted");

    assert_eq!(
        session.router().current(),
        &View::Family { risk_score: None }
    );
    assert!(session.pending_ticket().is_none());
    assert_eq!(session.run_pending().await, None);

    tokio::time::sleep(DELAY * 2).await;
    assert_eq!(
        session.router().current(),
        &View::Family { risk_score: None }
    );
}

#[tokio::test(start_paused = true)]
async fn stale_ticket_cannot_finish_a_new_analysis() {
    let mut session = RiskCheckSession::new(router(), DELAY);
    drive_to_analysing(&mut session);
    let first = session.router().pending_analysis().expect("analysing mounted");

    session.dispatch(NavigationEvent::Back).expect("back accepted");
    session
        .dispatch(NavigationEvent::CalculateRisk)
        .expect("restart accepted");
    for event in worked_example_events() {
        session.dispatch(event).expect("answer accepted");
    }
    for _ in 0..10 {
        session
            .dispatch(NavigationEvent::Advance)
            .expect("advance accepted");
    }
    let second = session.router().pending_analysis().expect("analysing mounted");
    assert_ne!(first, second);

    let outcome = session
        .dispatch(NavigationEvent::AnalysisFinished(first))
        .expect("event handled");
    assert_eq!(outcome, Outcome::Ignored);
    assert!(matches!(session.router().current(), View::Analysing { .. }));

    assert_eq!(session.run_pending().await, Some(Outcome::Changed));
    assert!(matches!(session.router().current(), View::ScoreAnalysis(_)));
}
