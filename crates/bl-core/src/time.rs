//! Simulation time model.
//!
//! # Design
//!
//! Time is a discrete integer-second counter measured from midnight of the
//! service day.  Every schedule value in the system (passenger arrivals, bus
//! start times, event stamps) is a [`SimTime`], so all arithmetic is exact and
//! comparisons are O(1).
//!
//! A run covers the closed window `[start, start + duration]`.  Windows that
//! cross midnight keep counting upward (`24:05:00`, …) instead of wrapping, so
//! ordering stays total.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

pub const SECS_PER_MINUTE: u32 = 60;
pub const SECS_PER_HOUR:   u32 = 3_600;
pub const SECS_PER_DAY:    u32 = 86_400;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// Seconds since midnight of the simulated service day.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct SimTime(pub u32);

impl SimTime {
    pub const MIDNIGHT: SimTime = SimTime(0);

    /// Build a time from clock components.  Out-of-range components are
    /// rejected rather than normalised.
    pub fn from_hms(h: u32, m: u32, s: u32) -> CoreResult<SimTime> {
        if h > 23 || m > 59 || s > 59 {
            return Err(CoreError::InvalidTime(format!("{h:02}:{m:02}:{s:02}")));
        }
        Ok(SimTime(h * SECS_PER_HOUR + m * SECS_PER_MINUTE + s))
    }

    /// `(hours, minutes, seconds)`.  Hours may exceed 23 past midnight.
    pub fn hms(self) -> (u32, u32, u32) {
        (
            self.0 / SECS_PER_HOUR,
            (self.0 % SECS_PER_HOUR) / SECS_PER_MINUTE,
            self.0 % SECS_PER_MINUTE,
        )
    }

    /// Parse `HH:MM:SS` or `HH:MM` (seconds default to 0).
    pub fn parse_hms(s: &str) -> CoreResult<SimTime> {
        let parts = split_clock(s)?;
        match parts.as_slice() {
            [h, m]    => SimTime::from_hms(*h, *m, 0),
            [h, m, s] => SimTime::from_hms(*h, *m, *s),
            _         => Err(CoreError::InvalidTime(s.to_owned())),
        }
    }

    /// Parse `HH:MM`; a trailing `:SS` is accepted and discarded.
    pub fn parse_hm(s: &str) -> CoreResult<SimTime> {
        let parts = split_clock(s)?;
        match parts.as_slice() {
            [h, m] | [h, m, _] => SimTime::from_hms(*h, *m, 0),
            _                  => Err(CoreError::InvalidTime(s.to_owned())),
        }
    }

    /// Convert a spreadsheet day fraction (`0.5` = noon) to the nearest second.
    ///
    /// Returns `None` outside `[0, 1)`.
    pub fn from_day_fraction(f: f64) -> Option<SimTime> {
        if !f.is_finite() || !(0.0..1.0).contains(&f) {
            return None;
        }
        let secs = (f * SECS_PER_DAY as f64).round() as u32;
        Some(SimTime(secs.min(SECS_PER_DAY - 1)))
    }

    /// The time `secs` seconds after `self`.
    #[inline]
    pub fn offset(self, secs: u32) -> SimTime {
        SimTime(self.0.saturating_add(secs))
    }

    /// Seconds elapsed from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u32 {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub fn from_minutes(minutes: u32) -> SimTime {
        SimTime(minutes * SECS_PER_MINUTE)
    }
}

impl std::ops::Add<u32> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u32) -> SimTime {
        self.offset(rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: SimTime) -> u32 {
        self.since(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

impl FromStr for SimTime {
    type Err = CoreError;
    fn from_str(s: &str) -> CoreResult<SimTime> {
        SimTime::parse_hms(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SimTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SimTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SimTime::parse_hms(&s).map_err(serde::de::Error::custom)
    }
}

/// Split `H:MM[:SS]` into numeric components.  Hours take one or two digits,
/// minutes and seconds exactly two.
fn split_clock(s: &str) -> CoreResult<Vec<u32>> {
    let s = s.trim();
    let bad = || CoreError::InvalidTime(s.to_owned());
    let parts: Vec<&str> = s.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(bad());
    }
    parts
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let width_ok = if i == 0 { (1..=2).contains(&p.len()) } else { p.len() == 2 };
            if !width_ok || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad());
            }
            p.parse::<u32>().map_err(|_| bad())
        })
        .collect()
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation clock: a cursor moving through `[start, end]`.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    pub start: SimTime,
    /// Inclusive end of the window.  The clock never moves past it.
    pub end:   SimTime,
    pub now:   SimTime,
}

impl SimClock {
    /// Create a clock positioned at `start`.
    pub fn new(start: SimTime, end: SimTime) -> Self {
        Self { start, end, now: start }
    }

    /// Advance one second, clamped to `end`.  Returns the new time.
    #[inline]
    pub fn advance(&mut self) -> SimTime {
        self.now = self.now.offset(1).min(self.end);
        self.now
    }

    /// Move directly to `target`, clamped to `[now, end]`.  Returns the new
    /// time.
    pub fn jump_to(&mut self, target: SimTime) -> SimTime {
        self.now = target.max(self.now).min(self.end);
        self.now
    }

    /// Move back to `start`.
    pub fn rewind(&mut self) {
        self.now = self.start;
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.now >= self.end
    }

    /// Simulated seconds since `start`.
    #[inline]
    pub fn elapsed_secs(&self) -> u32 {
        self.now.since(self.start)
    }

    /// Total length of the window in seconds.
    #[inline]
    pub fn window_secs(&self) -> u32 {
        self.end.since(self.start)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} → {})", self.now, self.start, self.end)
    }
}
