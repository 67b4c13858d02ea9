//! Interactive tracker REPL
//!
//! Each pass through the outer loop is one visit to the tracker screen with
//! its own controller. Stopping a night opens the rating screen; saving a
//! rating returns to a fresh tracker screen.

use crate::cli::commands::parse_rating;
use crate::tracker::presenter::TrackerPresenter;
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use sleep_application::{
    BehaviorConfig, Clock, NightStore, SleepQualityController, SleepSessionController,
};
use sleep_domain::{SleepNight, SleepQuality};
use std::io;
use std::sync::Arc;
use tracing::{debug, error, info};

/// A line typed at the tracker prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Start,
    Stop,
    Clear,
    History,
    Help,
    Quit,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let word = line.trim().trim_start_matches('/').to_ascii_lowercase();
        match word.as_str() {
            "start" | "s" => Ok(ReplCommand::Start),
            "stop" | "x" => Ok(ReplCommand::Stop),
            "clear" => Ok(ReplCommand::Clear),
            "history" | "h" | "show" | "" => Ok(ReplCommand::History),
            "help" | "?" => Ok(ReplCommand::Help),
            "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

/// What the rating screen answered with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RatingInput {
    Rate(SleepQuality),
    Skip,
}

fn parse_rating_input(line: &str) -> Result<RatingInput, String> {
    let line = line.trim();
    if line.is_empty() || line.eq_ignore_ascii_case("skip") {
        return Ok(RatingInput::Skip);
    }
    parse_rating(line).map(RatingInput::Rate)
}

/// Where the REPL goes after a screen visit
enum Exit {
    Quit,
    Rate(SleepNight),
}

/// Interactive tracker REPL
pub struct TrackerRepl<S: NightStore + 'static> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    behavior: BehaviorConfig,
    presenter: TrackerPresenter,
}

impl<S: NightStore + 'static> TrackerRepl<S> {
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

    /// Run the REPL until the user quits.
    ///
    /// Line editing blocks the calling worker, so this needs the
    /// multi-threaded runtime.
    pub async fn run(&self) -> io::Result<()> {
        let mut editor = Reedline::create();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("sleep".to_string()),
            DefaultPromptSegment::Empty,
        );
        let rating_prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("rating 0-5".to_string()),
            DefaultPromptSegment::Empty,
        );

        println!("{}", self.presenter.welcome());
        loop {
            match self.tracker_screen(&mut editor, &prompt).await? {
                Exit::Quit => break,
                Exit::Rate(night) => self.quality_screen(&mut editor, &rating_prompt, night).await?,
            }
        }
        info!("Tracker REPL finished");
        Ok(())
    }

    async fn tracker_screen(&self, editor: &mut Reedline, prompt: &DefaultPrompt) -> io::Result<Exit> {
        let screen = SleepSessionController::with_parts(
            self.store.clone(),
            self.clock.clone(),
            self.behavior.clone(),
            self.presenter.display().clone(),
        );
        screen.settled().await;
        self.show_notifications(&screen);
        println!("{}", self.presenter.screen(&screen.state()));

        let exit = loop {
            let line = match read_line(editor, prompt)? {
                Some(line) => line,
                None => break Exit::Quit,
            };
            let command = match ReplCommand::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    println!("{}", self.presenter.error(&message));
                    continue;
                }
            };
            debug!(?command, "REPL command");

            let state = screen.state();
            let handle = match command {
                ReplCommand::Quit => break Exit::Quit,
                ReplCommand::Help => {
                    println!("{}", self.presenter.help());
                    continue;
                }
                ReplCommand::History => None,
                ReplCommand::Start if state.start_visible() => Some(screen.on_start()),
                ReplCommand::Stop if state.stop_visible() => Some(screen.on_stop()),
                ReplCommand::Clear if state.clear_visible() => Some(screen.on_clear()),
                ReplCommand::Start | ReplCommand::Stop | ReplCommand::Clear => {
                    println!("{}", self.presenter.notice("That button is hidden right now."));
                    None
                }
            };
            if let Some(handle) = handle {
                if let Err(e) = handle.await {
                    error!(?command, error = %e, "Tracker action task failed");
                    println!("{}", self.presenter.error(&format!("{:?} did not finish: {}", command, e)));
                }
                screen.settled().await;
            }

            self.show_notifications(&screen);
            let state = screen.state();
            if let Some(night) = state.navigation.peek().cloned() {
                screen.acknowledge_navigation();
                break Exit::Rate(night);
            }
            println!("{}", self.presenter.screen(&state));
        };

        screen.close();
        Ok(exit)
    }

    async fn quality_screen(
        &self,
        editor: &mut Reedline,
        prompt: &DefaultPrompt,
        night: SleepNight,
    ) -> io::Result<()> {
        let screen = SleepQualityController::new(self.store.clone(), night.id)
            .with_behavior(self.behavior.clone());
        println!("{}", self.presenter.rating_prompt(&night));

        loop {
            let line = match read_line(editor, prompt)? {
                Some(line) => line,
                None => break,
            };
            let quality = match parse_rating_input(&line) {
                Ok(RatingInput::Skip) => break,
                Ok(RatingInput::Rate(quality)) => quality,
                Err(message) => {
                    println!("{}", self.presenter.error(&message));
                    continue;
                }
            };

            if let Err(e) = screen.on_set_sleep_quality(quality).await {
                error!(error = %e, "Rating task failed");
                println!("{}", self.presenter.error(&format!("Rating did not finish: {}", e)));
                continue;
            }
            screen.settled().await;
            let state = screen.state();
            if let Some(message) = state.error.peek() {
                println!("{}", self.presenter.error(message));
                screen.acknowledge_error();
                continue;
            }
            if state.navigate_back.is_pending() {
                screen.acknowledge_navigate_back();
                println!("{}", self.presenter.rated(quality));
                break;
            }
        }

        screen.close();
        Ok(())
    }

    fn show_notifications(&self, screen: &SleepSessionController<S>) {
        if let Some(message) = screen.take_error() {
            println!("{}", self.presenter.error(&message));
        }
        if let Some(snackbar) = screen.take_snackbar() {
            println!("{}", self.presenter.snackbar(snackbar));
        }
    }
}

/// Read one line; `None` on Ctrl-D or Ctrl-C.
fn read_line(editor: &mut Reedline, prompt: &DefaultPrompt) -> io::Result<Option<String>> {
    let signal = tokio::task::block_in_place(|| editor.read_line(prompt))?;
    match signal {
        Signal::Success(line) => Ok(Some(line)),
        Signal::CtrlC | Signal::CtrlD => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("start"), Ok(ReplCommand::Start));
        assert_eq!(ReplCommand::parse("  STOP "), Ok(ReplCommand::Stop));
        assert_eq!(ReplCommand::parse("/clear"), Ok(ReplCommand::Clear));
        assert_eq!(ReplCommand::parse(""), Ok(ReplCommand::History));
        assert_eq!(ReplCommand::parse("q"), Ok(ReplCommand::Quit));
        assert!(ReplCommand::parse("snooze").is_err());
    }

    #[test]
    fn test_parse_rating_input() {
        assert_eq!(
            parse_rating_input("3"),
            Ok(RatingInput::Rate(SleepQuality::Ok))
        );
        assert_eq!(parse_rating_input(""), Ok(RatingInput::Skip));
        assert_eq!(parse_rating_input("skip"), Ok(RatingInput::Skip));
        assert!(parse_rating_input("-1").is_err());
        assert!(parse_rating_input("9").is_err());
    }
}
