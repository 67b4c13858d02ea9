//! One-shot tracker commands
//!
//! Each command opens a fresh tracker screen, performs one action, renders
//! the result, and closes the screen again.

use crate::tracker::presenter::TrackerPresenter;
use sleep_application::{
    BehaviorConfig, Clock, NightStore, SleepQualityController, SleepSessionController,
    format_duration,
};
use sleep_domain::SleepQuality;
use std::sync::Arc;
use tracing::{debug, error};

/// A single action requested from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerAction {
    Start,
    Stop,
    Clear,
    History,
    Rate(SleepQuality),
}

/// Rendered result of a one-shot command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<String>,
    /// False when the action failed
    pub success: bool,
}

impl CommandOutput {
    fn ok() -> Self {
        Self {
            lines: Vec::new(),
            success: true,
        }
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn fail(&mut self, line: impl Into<String>) {
        self.success = false;
        self.lines.push(line.into());
    }
}

/// Runs one-shot tracker commands against a store
pub struct TrackerRunner<S: NightStore + 'static> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    behavior: BehaviorConfig,
    presenter: TrackerPresenter,
}

impl<S: NightStore + 'static> TrackerRunner<S> {
    pub fn new(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        behavior: BehaviorConfig,
        presenter: TrackerPresenter,
    ) -> Self {
        Self {
            store,
            clock,
            behavior,
            presenter,
        }
    }

    fn open_screen(&self) -> SleepSessionController<S> {
        SleepSessionController::with_parts(
            self.store.clone(),
            self.clock.clone(),
            self.behavior.clone(),
            self.presenter.display().clone(),
        )
    }

    pub async fn execute(&self, action: TrackerAction) -> CommandOutput {
        debug!(?action, "Running tracker command");
        if let TrackerAction::Rate(quality) = action {
            return self.rate(quality).await;
        }

        let screen = self.open_screen();
        screen.settled().await;
        let mut output = CommandOutput::ok();

        if let Some(message) = screen.take_error() {
            output.fail(self.presenter.error(&message));
            screen.close();
            return output;
        }

        let state = screen.state();
        let handle = match action {
            TrackerAction::Start if !state.start_visible() => {
                output.push(self.presenter.notice("Already tracking; nothing to start."));
                None
            }
            TrackerAction::Stop if !state.stop_visible() => {
                output.push(self.presenter.notice("Not tracking; nothing to stop."));
                None
            }
            TrackerAction::Clear if !state.clear_visible() => {
                output.push(self.presenter.notice("No sleep data to clear."));
                None
            }
            TrackerAction::Start => Some(screen.on_start()),
            TrackerAction::Stop => Some(screen.on_stop()),
            TrackerAction::Clear => Some(screen.on_clear()),
            TrackerAction::History | TrackerAction::Rate(_) => None,
        };

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(?action, error = %e, "Tracker action task failed");
                output.fail(self.presenter.error(&format!("{:?} did not finish: {}", action, e)));
            }
            screen.settled().await;
        }

        if let Some(message) = screen.take_error() {
            output.fail(self.presenter.error(&message));
        }
        if let Some(snackbar) = screen.take_snackbar() {
            output.push(self.presenter.snackbar(snackbar));
        }
        if let Some(night) = screen.take_navigation() {
            output.push(format!(
                "Stopped after {}. Rate it with `sleep-tracker rate <0-5>`.",
                format_duration(night.duration())
            ));
        }

        output.push(self.presenter.screen(&screen.state()));
        screen.close();
        output
    }

    /// Rate the most recent night, which must already be finished.
    async fn rate(&self, quality: SleepQuality) -> CommandOutput {
        let mut output = CommandOutput::ok();

        let night = match self.store.current_night().await {
            Ok(Some(night)) if !night.is_active() => night,
            Ok(Some(_)) => {
                output.fail(self.presenter.error("Tonight is still being tracked; stop it first."));
                return output;
            }
            Ok(None) => {
                output.fail(self.presenter.error("No finished night to rate."));
                return output;
            }
            Err(e) => {
                output.fail(self.presenter.error(&e.to_string()));
                return output;
            }
        };

        let screen = SleepQualityController::new(self.store.clone(), night.id)
            .with_behavior(self.behavior.clone());
        let finished = screen.on_set_sleep_quality(quality).await;
        screen.settled().await;

        let state = screen.state();
        if let Err(e) = finished {
            error!(error = %e, "Rating task failed");
            output.fail(self.presenter.error(&format!("Rating did not finish: {}", e)));
        } else if let Some(message) = state.error.peek() {
            output.fail(self.presenter.error(message));
            screen.acknowledge_error();
        } else if state.navigate_back.is_pending() {
            screen.acknowledge_navigate_back();
            output.push(self.presenter.rated(quality));
        }
        screen.close();
        output
    }
}
