//! Night entity - one recorded sleep interval.

use super::value_objects::{NightId, SleepQuality};
use crate::core::error::DomainError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A recorded sleep session.
///
/// A night is *active* (still being slept) while its end time equals its
/// start time. Finishing a night moves the end time strictly past the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepNight {
    /// Store-assigned id ([`NightId::UNASSIGNED`] before insert)
    #[serde(default)]
    pub id: NightId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub quality: SleepQuality,
}

impl SleepNight {
    /// Begin a new, unpersisted night at the given instant.
    pub fn begin(at: DateTime<Utc>) -> Self {
        Self {
            id: NightId::UNASSIGNED,
            start_time: at,
            end_time: at,
            quality: SleepQuality::Unrated,
        }
    }

    /// Return a copy carrying the given id.
    pub fn with_id(mut self, id: NightId) -> Self {
        self.id = id;
        self
    }

    pub fn is_active(&self) -> bool {
        self.start_time == self.end_time
    }

    /// Close an active night.
    ///
    /// The end time is clamped to at least one millisecond after the start, so
    /// a finished night never reads as active again even when the clock has
    /// not advanced (or went backwards).
    pub fn finish(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::NightAlreadyClosed(self.id.value()));
        }
        let earliest = self.start_time + Duration::milliseconds(1);
        self.end_time = at.max(earliest);
        Ok(())
    }

    pub fn rate(&mut self, quality: SleepQuality) {
        self.quality = quality;
    }

    /// Time slept; zero while the night is active.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_begin_is_active_and_unrated() {
        let night = SleepNight::begin(at(22, 0));
        assert!(night.is_active());
        assert_eq!(night.id, NightId::UNASSIGNED);
        assert_eq!(night.quality, SleepQuality::Unrated);
        assert_eq!(night.duration(), Duration::zero());
    }

    #[test]
    fn test_finish_sets_end_time() {
        let mut night = SleepNight::begin(at(1, 0)).with_id(NightId::new(1));
        night.finish(at(7, 30)).unwrap();
        assert!(!night.is_active());
        assert_eq!(night.end_time, at(7, 30));
        assert_eq!(night.duration(), Duration::minutes(390));
    }

    #[test]
    fn test_finish_clamps_to_after_start() {
        let mut night = SleepNight::begin(at(1, 0));
        night.finish(at(1, 0)).unwrap();
        assert!(night.end_time > night.start_time);

        let mut night = SleepNight::begin(at(1, 0));
        night.finish(at(0, 30)).unwrap();
        assert!(night.end_time > night.start_time);
    }

    #[test]
    fn test_finish_closed_night_fails() {
        let mut night = SleepNight::begin(at(1, 0)).with_id(NightId::new(5));
        night.finish(at(2, 0)).unwrap();
        assert_eq!(
            night.finish(at(3, 0)).unwrap_err(),
            DomainError::NightAlreadyClosed(5)
        );
        assert_eq!(night.end_time, at(2, 0));
    }

    #[test]
    fn test_serde_round_trip_keeps_quality_numeric() {
        let mut night = SleepNight::begin(at(23, 0)).with_id(NightId::new(2));
        night.rate(SleepQuality::Excellent);
        let json = serde_json::to_value(&night).unwrap();
        assert_eq!(json["quality"], 5);
        assert_eq!(json["id"], 2);
        let back: SleepNight = serde_json::from_value(json).unwrap();
        assert_eq!(back, night);
    }
}
