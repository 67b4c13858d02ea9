//! Text rendering of the sleep history.

use crate::config::{DisplayConfig, DisplayTimezone};
use chrono::{DateTime, Duration, Local, Utc};
use sleep_domain::SleepNight;
use std::fmt::Write;

const HISTORY_HEADER: &str = "HERE IS YOUR SLEEP DATA";

/// Render nights as the history text shown under the tracker buttons.
///
/// Closed nights list end time, quality and duration; an active night lists
/// only its start.
pub fn format_nights(nights: &[SleepNight], display: &DisplayConfig) -> String {
    let mut out = String::from(HISTORY_HEADER);
    out.push('\n');

    for night in nights {
        out.push('\n');
        let _ = writeln!(out, "Start: {}", format_timestamp(&night.start_time, display));
        if !night.is_active() {
            let _ = writeln!(out, "End: {}", format_timestamp(&night.end_time, display));
            let _ = writeln!(out, "Quality: {}", night.quality.label());
            let _ = writeln!(
                out,
                "Hours:Minutes:Seconds: {}",
                format_duration(night.duration())
            );
        }
    }

    out
}

/// Format a timestamp with the configured layout and timezone.
///
/// Falls back to RFC 3339 when the layout contains an invalid specifier.
pub fn format_timestamp(at: &DateTime<Utc>, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let written = match display.timezone {
        DisplayTimezone::Utc => write!(out, "{}", at.format(&display.time_format)),
        DisplayTimezone::Local => write!(
            out,
            "{}",
            at.with_timezone(&Local).format(&display.time_format)
        ),
    };
    if written.is_err() {
        return at.to_rfc3339();
    }
    out
}

/// `H:MM:SS`; negative durations render as zero.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sleep_domain::{NightId, SleepQuality};

    fn closed_night(id: i64) -> SleepNight {
        let mut night = SleepNight::begin(Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap())
            .with_id(NightId::new(id));
        night
            .finish(Utc.with_ymd_and_hms(2024, 1, 2, 6, 30, 15).unwrap())
            .unwrap();
        night.rate(SleepQuality::PrettyGood);
        night
    }

    #[test]
    fn test_format_empty_history() {
        let text = format_nights(&[], &DisplayConfig::utc());
        assert_eq!(text, "HERE IS YOUR SLEEP DATA\n");
    }

    #[test]
    fn test_format_closed_night() {
        let text = format_nights(&[closed_night(1)], &DisplayConfig::utc());
        let expected = "HERE IS YOUR SLEEP DATA\n\
                        \n\
                        Start: Monday Jan-01-2024 Time: 22:00\n\
                        End: Tuesday Jan-02-2024 Time: 06:30\n\
                        Quality: Pretty good\n\
                        Hours:Minutes:Seconds: 8:30:15\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_format_active_night_shows_start_only() {
        let night = SleepNight::begin(Utc.with_ymd_and_hms(2024, 3, 5, 23, 15, 0).unwrap());
        let text = format_nights(&[night], &DisplayConfig::utc());
        assert!(text.contains("Start: Tuesday Mar-05-2024 Time: 23:15"));
        assert!(!text.contains("End:"));
        assert!(!text.contains("Quality:"));
    }

    #[test]
    fn test_format_custom_layout() {
        let display = DisplayConfig::utc().with_time_format("%Y-%m-%d %H:%M");
        let text = format_nights(&[closed_night(1)], &display);
        assert!(text.contains("Start: 2024-01-01 22:00"));
        assert!(text.contains("End: 2024-01-02 06:30"));
    }

    #[test]
    fn test_invalid_layout_falls_back_to_rfc3339() {
        let display = DisplayConfig::utc().with_time_format("%Q");
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap();
        assert_eq!(format_timestamp(&at, &display), at.to_rfc3339());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(0)), "0:00:00");
        assert_eq!(format_duration(Duration::seconds(3661)), "1:01:01");
        assert_eq!(format_duration(Duration::hours(10)), "10:00:00");
        assert_eq!(format_duration(Duration::seconds(-5)), "0:00:00");
    }
}
