//! Night value objects - identifiers and ratings.
//!
//! # Identifiers
//! - [`NightId`] - Store-assigned identifier for a recorded night
//!
//! # Ratings
//! - [`SleepQuality`] - How well the user slept, on a -1..=5 scale

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier for a recorded night.
///
/// Ids are assigned by the store on insert and increase monotonically, so the
/// highest id is always the most recently created night. A night that has not
/// been persisted yet carries [`NightId::UNASSIGNED`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NightId(i64);

impl NightId {
    /// Placeholder id for a night that has not been inserted yet.
    pub const UNASSIGNED: NightId = NightId(0);

    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }

    /// The id following this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<i64> for NightId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sleep quality rating.
///
/// Persisted as its numeric value: `-1` for unrated, `0` (very bad) through
/// `5` (excellent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SleepQuality {
    #[default]
    Unrated,
    VeryBad,
    Poor,
    SoSo,
    Ok,
    PrettyGood,
    Excellent,
}

impl SleepQuality {
    /// Every rating a user can pick, worst first.
    pub const RATINGS: [SleepQuality; 6] = [
        SleepQuality::VeryBad,
        SleepQuality::Poor,
        SleepQuality::SoSo,
        SleepQuality::Ok,
        SleepQuality::PrettyGood,
        SleepQuality::Excellent,
    ];

    pub fn value(&self) -> i64 {
        match self {
            SleepQuality::Unrated => -1,
            SleepQuality::VeryBad => 0,
            SleepQuality::Poor => 1,
            SleepQuality::SoSo => 2,
            SleepQuality::Ok => 3,
            SleepQuality::PrettyGood => 4,
            SleepQuality::Excellent => 5,
        }
    }

    /// Human-readable label used in the history view.
    pub fn label(&self) -> &'static str {
        match self {
            SleepQuality::Unrated => "--",
            SleepQuality::VeryBad => "Very bad",
            SleepQuality::Poor => "Poor",
            SleepQuality::SoSo => "So-so",
            SleepQuality::Ok => "OK",
            SleepQuality::PrettyGood => "Pretty good",
            SleepQuality::Excellent => "Excellent",
        }
    }

    pub fn is_rated(&self) -> bool {
        !matches!(self, SleepQuality::Unrated)
    }
}

impl TryFrom<i64> for SleepQuality {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(SleepQuality::Unrated),
            0 => Ok(SleepQuality::VeryBad),
            1 => Ok(SleepQuality::Poor),
            2 => Ok(SleepQuality::SoSo),
            3 => Ok(SleepQuality::Ok),
            4 => Ok(SleepQuality::PrettyGood),
            5 => Ok(SleepQuality::Excellent),
            other => Err(DomainError::InvalidQuality(other)),
        }
    }
}

impl From<SleepQuality> for i64 {
    fn from(quality: SleepQuality) -> Self {
        quality.value()
    }
}

impl FromStr for SleepQuality {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidQuality(i64::MIN))?;
        Self::try_from(value)
    }
}

impl std::fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
