//! Run parameters and the wall-clock pacing they imply.

use std::time::Duration;

use crate::{CoreError, CoreResult, SimClock, SimTime};

/// Speed factors at or above this value select event-jump pacing.
pub const MAX_SPEED_SENTINEL: f64 = 9_999.0;

/// Shortest real interval between two normal-speed ticks.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Real interval between two max-speed jumps.
pub const JUMP_INTERVAL: Duration = Duration::from_millis(50);

// ── Pacing ────────────────────────────────────────────────────────────────────

/// How a real-time driver should schedule engine advances.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pacing {
    /// One simulated second per interval.
    Interval(Duration),
    /// Jump to the next pending event once per interval.
    Jump(Duration),
}

impl Pacing {
    /// Real time to wait before the next advance.
    pub fn interval(self) -> Duration {
        match self {
            Pacing::Interval(d) | Pacing::Jump(d) => d,
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Pacing::Jump(_))
    }
}

// ── SimParams ─────────────────────────────────────────────────────────────────

/// User-facing run configuration.  Replaced atomically by
/// `Engine::configure`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimParams {
    /// Time of day the window opens.  Default: 07:00:00.
    pub start_time: SimTime,

    /// Window length in minutes.  Must be positive.  Default: 60.
    pub duration_minutes: u32,

    /// Simulated seconds per real second.  `>= MAX_SPEED_SENTINEL` selects
    /// max-speed jumping.  Default: 1.0.
    pub speed_factor: f64,

    /// Restart automatically after completion.
    pub repeat: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            start_time:       SimTime(7 * crate::time::SECS_PER_HOUR),
            duration_minutes: 60,
            speed_factor:     1.0,
            repeat:           false,
        }
    }
}

impl SimParams {
    /// Inclusive end of the simulated window.
    #[inline]
    pub fn end_time(&self) -> SimTime {
        self.start_time.offset(self.duration_minutes * crate::time::SECS_PER_MINUTE)
    }

    /// Construct a `SimClock` positioned at the start of the window.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_time, self.end_time())
    }

    #[inline]
    pub fn is_max_speed(&self) -> bool {
        self.speed_factor >= MAX_SPEED_SENTINEL
    }

    /// Pacing for a real-time driver: `max(10 ms, 1000 ms / speed)` per
    /// second at normal speed, a fixed 50 ms cadence when jumping.
    pub fn pacing(&self) -> Pacing {
        if self.is_max_speed() {
            return Pacing::Jump(JUMP_INTERVAL);
        }
        let micros = (1_000_000.0 / self.speed_factor) as u64;
        Pacing::Interval(Duration::from_micros(micros).max(MIN_TICK_INTERVAL))
    }

    /// `true` when `other` differs only in `speed_factor`.
    pub fn same_window(&self, other: &SimParams) -> bool {
        self.start_time == other.start_time
            && self.duration_minutes == other.duration_minutes
            && self.repeat == other.repeat
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.duration_minutes == 0 {
            return Err(CoreError::Config("duration_minutes must be positive".into()));
        }
        if !self.speed_factor.is_finite() || self.speed_factor <= 0.0 {
            return Err(CoreError::Config(format!(
                "speed_factor must be a positive number, got {}",
                self.speed_factor
            )));
        }
        Ok(())
    }
}
