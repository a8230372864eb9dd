//! Frequency text + unit to a capture interval

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Unit the frequency field is expressed in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl IntervalUnit {
    pub const ALL: [IntervalUnit; 3] = [Self::Seconds, Self::Minutes, Self::Hours];

    /// Seconds in one of this unit
    pub fn seconds(self) -> u64 {
        match self {
            IntervalUnit::Seconds => 1,
            IntervalUnit::Minutes => 60,
            IntervalUnit::Hours => 3600,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntervalUnit::Seconds => "seconds",
            IntervalUnit::Minutes => "minutes",
            IntervalUnit::Hours => "hours",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalUnit {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seconds" | "second" | "s" => Ok(IntervalUnit::Seconds),
            "minutes" | "minute" | "m" => Ok(IntervalUnit::Minutes),
            "hours" | "hour" | "h" => Ok(IntervalUnit::Hours),
            _ => Err(IntervalError::UnknownUnit(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum IntervalError {
    #[error("Frequency '{0}' is not a number")]
    NotANumber(String),
    #[error("Frequency must be greater than zero, got {0}")]
    NotPositive(f64),
    #[error("Unknown unit '{0}', expected seconds, minutes or hours")]
    UnknownUnit(String),
}

/// Parse the frequency field and scale it by `unit`.
///
/// Fractional frequencies are kept: `0.5` minutes is thirty seconds.
pub fn parse_interval(frequency: &str, unit: IntervalUnit) -> Result<Duration, IntervalError> {
    let text = frequency.trim();
    let value: f64 = text
        .parse()
        .map_err(|_| IntervalError::NotANumber(text.to_string()))?;

    if !value.is_finite() {
        return Err(IntervalError::NotANumber(text.to_string()));
    }
    if value <= 0.0 {
        return Err(IntervalError::NotPositive(value));
    }

    let seconds = value * unit.seconds() as f64;
    Duration::try_from_secs_f64(seconds).map_err(|_| IntervalError::NotANumber(text.to_string()))
}
