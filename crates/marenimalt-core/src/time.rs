//! Scene clock values.
//!
//! Both types hold non-negative seconds. Anything negative or NaN clamps to
//! zero on construction, so the scene clock can only move forward.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

fn clamp(seconds: f64) -> f64 {
    if seconds.is_nan() {
        0.0
    } else {
        seconds.max(0.0)
    }
}

/// A length of scene time: a transition, a pause or an audio clip.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration {
    seconds: f64,
}

impl Duration {
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds: clamp(seconds),
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0.0
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration::from_seconds(self.seconds + rhs.seconds)
    }
}

/// Sub-second lengths print in milliseconds, longer ones in seconds.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seconds {
            s if s < 1.0 => write!(f, "{:.0}ms", s * 1000.0),
            s => write!(f, "{:.2}s", s),
        }
    }
}

/// A position on the scene clock, measured from the first directive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Timestamp {
    seconds: f64,
}

impl Timestamp {
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds: clamp(seconds),
        }
    }

    pub fn zero() -> Self {
        Self::from_seconds(0.0)
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Whole milliseconds since the start, rounded.
    pub fn whole_millis(&self) -> u64 {
        (self.seconds * 1000.0).round() as u64
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp::from_seconds(self.seconds + rhs.as_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_and_nan_clamp_to_zero() {
        assert!(Duration::from_seconds(-1.0).is_zero());
        assert!(Duration::from_seconds(f64::NAN).is_zero());
        assert_eq!(Timestamp::from_seconds(-3.0), Timestamp::zero());
    }

    #[test]
    fn test_duration_sum() {
        let d = Duration::from_seconds(1.5) + Duration::from_seconds(0.5);
        assert!((d.as_seconds() - 2.0).abs() < 1e-9);
        assert!(!d.is_zero());
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(Duration::from_seconds(0.5).to_string(), "500ms");
        assert_eq!(Duration::from_seconds(2.25).to_string(), "2.25s");
    }

    #[test]
    fn test_clock_advances() {
        let t = Timestamp::zero() + Duration::from_seconds(1.5) + Duration::from_seconds(0.0015);
        assert!((t.as_seconds() - 1.5015).abs() < 1e-9);
        assert_eq!(t.whole_millis(), 1502);
    }
}
