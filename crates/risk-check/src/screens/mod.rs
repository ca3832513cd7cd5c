//! Client-side view switcher for the risk check flow.
//!
//! [`ScreenRouter`] holds exactly one mounted [`View`] and no history; each
//! transition knows its own back target. The analysing delay is driven by
//! [`RiskCheckSession`], which owns the timer for the mounted view.

mod session;

pub use session::RiskCheckSession;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::questionnaire::{
    Advance, AnswerKey, AnswerValue, CompletedAnswers, Questionnaire, QuestionnaireError,
    QuestionnaireState, Retreat,
};
use crate::scoring::{RiskAssessment, RiskScoreCalculator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Home,
    Explore,
    Support,
}

/// Identifies one scheduled analysing delay. Only the ticket of the mounted
/// `Analysing` view can finish it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AnalysisTicket(u64);

impl fmt::Display for AnalysisTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Tabs(Tab),
    VehicleDetail,
    Notifications,
    Profile,
    Family {
        risk_score: Option<u8>,
    },
    Questionnaire(QuestionnaireState),
    Analysing {
        ticket: AnalysisTicket,
        answers: CompletedAnswers,
    },
    ScoreAnalysis(Box<RiskAssessment>),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Tabs(Tab::Home) => "home",
            View::Tabs(Tab::Explore) => "explore",
            View::Tabs(Tab::Support) => "support",
            View::VehicleDetail => "vehicle_detail",
            View::Notifications => "notifications",
            View::Profile => "profile",
            View::Family { .. } => "family",
            View::Questionnaire(_) => "questionnaire",
            View::Analysing { .. } => "analysing",
            View::ScoreAnalysis(_) => "score_analysis",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    SelectTab(Tab),
    OpenVehicleDetail,
    OpenNotifications,
    OpenProfile,
    OpenFamily,
    CalculateRisk,
    Answer { key: AnswerKey, value: AnswerValue },
    Advance,
    Retreat,
    AnalysisFinished(AnalysisTicket),
    Understood,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    /// The event does not apply to the mounted view.
    Ignored,
}

pub struct ScreenRouter {
    view: View,
    questionnaire: Arc<Questionnaire>,
    calculator: Arc<RiskScoreCalculator>,
    last_score: Option<u8>,
    next_ticket: u64,
}

impl ScreenRouter {
    pub fn new(questionnaire: Arc<Questionnaire>, calculator: Arc<RiskScoreCalculator>) -> Self {
        Self {
            view: View::Tabs(Tab::Home),
            questionnaire,
            calculator,
            last_score: None,
            next_ticket: 0,
        }
    }

    pub fn current(&self) -> &View {
        &self.view
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    /// Score shown on the family screen once a check has been completed.
    pub fn last_score(&self) -> Option<u8> {
        self.last_score
    }

    pub fn pending_analysis(&self) -> Option<AnalysisTicket> {
        match &self.view {
            View::Analysing { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    /// Mount `view` unconditionally.
    pub fn navigate(&mut self, view: View) {
        debug!(from = self.view.name(), to = view.name(), "navigate");
        self.view = view;
    }

    pub fn handle(&mut self, event: NavigationEvent) -> Result<Outcome, QuestionnaireError> {
        let next = match (&self.view, event) {
            (View::Tabs(_) | View::Family { .. }, NavigationEvent::SelectTab(tab)) => {
                Some(View::Tabs(tab))
            }
            (View::Tabs(Tab::Home), NavigationEvent::OpenVehicleDetail) => {
                Some(View::VehicleDetail)
            }
            (View::Tabs(_), NavigationEvent::OpenNotifications) => Some(View::Notifications),
            (View::Tabs(_), NavigationEvent::OpenProfile) => Some(View::Profile),
            (View::Tabs(Tab::Explore), NavigationEvent::OpenFamily) => Some(self.family()),
            (View::Family { .. }, NavigationEvent::CalculateRisk) => {
                Some(View::Questionnaire(self.questionnaire.restart()))
            }
            (View::Questionnaire(state), NavigationEvent::Answer { key, value }) => {
                let state = self.questionnaire.answer(state.clone(), &key, value)?;
                Some(View::Questionnaire(state))
            }
            (View::Questionnaire(state), NavigationEvent::Advance) => {
                match self.questionnaire.advance(state.clone()) {
                    Advance::Moved(state) => Some(View::Questionnaire(state)),
                    Advance::Blocked(_) => None,
                    Advance::Completed(answers) => {
                        self.next_ticket += 1;
                        Some(View::Analysing {
                            ticket: AnalysisTicket(self.next_ticket),
                            answers,
                        })
                    }
                }
            }
            (View::Questionnaire(state), NavigationEvent::Retreat | NavigationEvent::Back) => {
                match self.questionnaire.retreat(state.clone()) {
                    Retreat::Moved(state) => Some(View::Questionnaire(state)),
                    Retreat::Exit => Some(self.family()),
                }
            }
            (View::Analysing { ticket, answers }, NavigationEvent::AnalysisFinished(finished))
                if *ticket == finished =>
            {
                let assessment = self.calculator.assess(answers);
                self.last_score = Some(assessment.result.composite_score);
                Some(View::ScoreAnalysis(Box::new(assessment)))
            }
            (View::ScoreAnalysis(_), NavigationEvent::Understood | NavigationEvent::Back)
            | (View::Analysing { .. }, NavigationEvent::Back) => Some(self.family()),
            (
                View::VehicleDetail | View::Notifications | View::Profile,
                NavigationEvent::Back,
            ) => Some(View::Tabs(Tab::Home)),
            (View::Family { .. }, NavigationEvent::Back) => Some(View::Tabs(Tab::Explore)),
            _ => None,
        };

        Ok(match next {
            Some(view) => {
                self.navigate(view);
                Outcome::Changed
            }
            None => Outcome::Ignored,
        })
    }

    fn family(&self) -> View {
        View::Family {
            risk_score: self.last_score,
        }
    }
}
