use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{AnalysisTicket, NavigationEvent, Outcome, ScreenRouter};
use crate::questionnaire::QuestionnaireError;

/// Pending `AnalysisFinished` for one mounted analysing view. Dropping it
/// cancels the timer.
struct ScheduledTransition {
    ticket: AnalysisTicket,
    handle: JoinHandle<()>,
}

impl Drop for ScheduledTransition {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Router plus the timer that moves `Analysing` on to the score screen.
///
/// Must be used inside a tokio runtime.
pub struct RiskCheckSession {
    router: ScreenRouter,
    analysis_delay: Duration,
    timer: Option<ScheduledTransition>,
    finished_tx: mpsc::UnboundedSender<AnalysisTicket>,
    finished_rx: mpsc::UnboundedReceiver<AnalysisTicket>,
}

impl RiskCheckSession {
    pub fn new(router: ScreenRouter, analysis_delay: Duration) -> Self {
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        Self {
            router,
            analysis_delay,
            timer: None,
            finished_tx,
            finished_rx,
        }
    }

    pub fn router(&self) -> &ScreenRouter {
        &self.router
    }

    pub fn pending_ticket(&self) -> Option<AnalysisTicket> {
        self.timer.as_ref().map(|timer| timer.ticket)
    }

    pub fn dispatch(&mut self, event: NavigationEvent) -> Result<Outcome, QuestionnaireError> {
        let outcome = self.router.handle(event)?;
        if outcome == Outcome::Changed {
            self.sync_timer();
        }
        Ok(outcome)
    }

    /// Wait for the scheduled analysing delay and apply it. Returns `None`
    /// when no timer is pending. Late tickets from cancelled timers are
    /// discarded along the way.
    pub async fn run_pending(&mut self) -> Option<Outcome> {
        while self.timer.is_some() {
            let ticket = self.finished_rx.recv().await?;
            match self
                .router
                .handle(NavigationEvent::AnalysisFinished(ticket))
            {
                Ok(Outcome::Changed) => {
                    self.sync_timer();
                    return Some(Outcome::Changed);
                }
                Ok(Outcome::Ignored) | Err(_) => {
                    debug!(%ticket, "discarded stale analysis timer");
                }
            }
        }
        None
    }

    /// Keep exactly one timer alive, and only while `Analysing` is mounted.
    fn sync_timer(&mut self) {
        let wanted = self.router.pending_analysis();
        if self.pending_ticket() == wanted {
            return;
        }

        if let Some(previous) = self.timer.take() {
            debug!(ticket = %previous.ticket, "analysis timer cancelled");
        }

        if let Some(ticket) = wanted {
            let delay = self.analysis_delay;
            let finished_tx = self.finished_tx.clone();
            let handle = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = finished_tx.send(ticket);
            });
            debug!(%ticket, delay_ms = delay.as_millis() as u64, "analysis timer scheduled");
            self.timer = Some(ScheduledTransition { ticket, handle });
        }
    }
}
