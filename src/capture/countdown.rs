use std::fmt;
use std::time::Duration;

/// Time left before the next capture, split for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    pub fn from_secs(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }

    /// Whole seconds of `interval`; the fraction is not shown
    pub fn from_duration(interval: Duration) -> Self {
        Self::from_secs(interval.as_secs())
    }

    pub fn remaining(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.remaining() == 0
    }

    /// Take one second off, borrowing from minutes and hours.
    /// Returns false once already at zero.
    pub fn tick(&mut self) -> bool {
        if self.is_zero() {
            return false;
        }
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
        }
        true
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Text for the countdown readout
pub fn countdown_label(countdown: Option<Countdown>) -> String {
    match countdown {
        Some(c) => format!("Next screenshot in: {}", c),
        None => "Next screenshot in: --".to_string(),
    }
}
