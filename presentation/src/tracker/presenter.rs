//! Terminal rendering for the tracker screens
//!
//! All colored output is produced here. Methods return strings so the REPL
//! and the one-shot commands decide where they go.

use colored::Colorize;
use sleep_application::{DisplayConfig, SleepScreenState, Snackbar, format_timestamp};
use sleep_domain::{SleepNight, SleepQuality};

/// Renders tracker state for the terminal
pub struct TrackerPresenter {
    display: DisplayConfig,
}

impl TrackerPresenter {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// Button row followed by the history text.
    pub fn screen(&self, state: &SleepScreenState) -> String {
        format!("{}\n\n{}", self.buttons(state), self.history(state))
    }

    /// The three tracker buttons; hidden ones are dimmed and struck through.
    pub fn buttons(&self, state: &SleepScreenState) -> String {
        let button = |label: &str, visible: bool| {
            if visible {
                format!("[ {} ]", label.to_uppercase()).green().bold().to_string()
            } else {
                format!("[ {} ]", label.to_uppercase())
                    .dimmed()
                    .strikethrough()
                    .to_string()
            }
        };

        let mut row = format!(
            "{}  {}  {}",
            button("start", state.start_visible()),
            button("stop", state.stop_visible()),
            button("clear", state.clear_visible()),
        );
        if let Some(night) = state.tonight.as_ref().filter(|n| n.is_active()) {
            row.push_str(&format!(
                "\n{} {}",
                "Tracking since".cyan(),
                format_timestamp(&night.start_time, &self.display)
            ));
        }
        row
    }

    pub fn history(&self, state: &SleepScreenState) -> String {
        state.formatted_history(&self.display)
    }

    pub fn snackbar(&self, snackbar: Snackbar) -> String {
        format!("{} {}", "»".yellow().bold(), snackbar.message().yellow())
    }

    pub fn error(&self, message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    /// Header and choices of the rating screen for a stopped night.
    pub fn rating_prompt(&self, night: &SleepNight) -> String {
        let mut out = format!(
            "{}\n{} {}\n{} {}\n\n",
            "How was your sleep?".bold().cyan(),
            "Start:".bold(),
            format_timestamp(&night.start_time, &self.display),
            "End:".bold(),
            format_timestamp(&night.end_time, &self.display),
        );
        for quality in SleepQuality::RATINGS {
            out.push_str(&format!(
                "  {}  {}\n",
                quality.value().to_string().yellow().bold(),
                quality.label()
            ));
        }
        out
    }

    pub fn rated(&self, quality: SleepQuality) -> String {
        format!("{} {}", "Saved rating:".green().bold(), quality.label())
    }

    pub fn notice(&self, message: &str) -> String {
        message.dimmed().to_string()
    }

    pub fn welcome(&self) -> String {
        format!(
            "{}\n{}",
            "Sleep Tracker".bold().cyan(),
            "Type 'help' for commands, 'quit' to exit.".dimmed()
        )
    }

    pub fn help(&self) -> String {
        let mut out = format!("{}\n", "Commands:".bold());
        for (name, description) in [
            ("start", "Start tracking tonight's sleep"),
            ("stop", "Stop tracking and rate the night"),
            ("clear", "Delete all sleep data"),
            ("history", "Show the buttons and sleep history"),
            ("help", "Show this help"),
            ("quit", "Exit the tracker"),
        ] {
            out.push_str(&format!("  {:<10} {}\n", name.cyan(), description));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use sleep_domain::NightId;

    fn presenter() -> TrackerPresenter {
        colored::control::set_override(false);
        TrackerPresenter::new(DisplayConfig::utc())
    }

    fn night(hours: i64) -> SleepNight {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap();
        let mut night = SleepNight::begin(start).with_id(NightId::new(1));
        if hours > 0 {
            night.finish(start + Duration::hours(hours)).unwrap();
        }
        night
    }

    #[test]
    fn test_buttons_follow_visibility() {
        let presenter = presenter();
        let empty = SleepScreenState::default();
        let row = presenter.buttons(&empty);
        assert!(row.contains("[ START ]"));
        assert!(!row.contains("Tracking since"));

        let tracking = SleepScreenState {
            tonight: Some(night(0)),
            nights: vec![night(0)],
            ..Default::default()
        };
        let row = presenter.buttons(&tracking);
        assert!(row.contains("[ STOP ]"));
        assert!(row.contains("Tracking since Monday Jan-01-2024 Time: 22:00"));
    }

    #[test]
    fn test_screen_includes_history() {
        let presenter = presenter();
        let state = SleepScreenState {
            nights: vec![night(8)],
            ..Default::default()
        };
        let screen = presenter.screen(&state);
        assert!(screen.contains("HERE IS YOUR SLEEP DATA"));
        assert!(screen.contains("Hours:Minutes:Seconds: 8:00:00"));
        assert!(screen.contains("Quality: --"));
    }

    #[test]
    fn test_rating_prompt_lists_every_rating() {
        let prompt = presenter().rating_prompt(&night(7));
        assert!(prompt.contains("How was your sleep?"));
        for quality in SleepQuality::RATINGS {
            assert!(prompt.contains(quality.label()));
        }
        assert!(!prompt.contains("--"));
    }

    #[test]
    fn test_snackbar_and_error() {
        let presenter = presenter();
        assert!(
            presenter
                .snackbar(Snackbar::Cleared)
                .contains("All your data is gone forever ((|)).")
        );
        assert_eq!(presenter.error("disk full"), "Error: disk full");
    }
}
