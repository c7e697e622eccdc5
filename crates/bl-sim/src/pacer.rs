//! Wall-clock driver for an [`Engine`].

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::{Engine, SimObserver, SimResult};

/// Drives an engine in real time: sleep for the current pacing interval,
/// then deliver one timer callback.
///
/// The interval is re-read from the engine's parameters before every sleep,
/// so a speed change while running takes effect on the next tick.
pub struct Pacer {
    sleep:    Box<dyn FnMut(Duration)>,
    max_runs: u64,
}

impl Default for Pacer {
    fn default() -> Self {
        Self {
            sleep:    Box::new(std::thread::sleep),
            max_runs: 1,
        }
    }
}

impl fmt::Debug for Pacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pacer").field("max_runs", &self.max_runs).finish_non_exhaustive()
    }
}

impl Pacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `std::thread::sleep`, e.g. with a recorder in tests.
    pub fn with_sleep(mut self, sleep: impl FnMut(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Stop after this many completed runs when `repeat` keeps restarting.
    /// Default: 1.
    pub fn max_runs(mut self, runs: u64) -> Self {
        self.max_runs = runs.max(1);
        self
    }

    /// Start the engine if needed and pace it until it stops running or
    /// `max_runs` runs complete.
    pub fn run<O: SimObserver>(&mut self, engine: &mut Engine, observer: &mut O) -> SimResult<()> {
        engine.start()?;
        let target = engine.completions() + self.max_runs;
        while let Some(handle) = engine.timer() {
            let interval = engine.params().pacing().interval();
            (self.sleep)(interval);
            engine.on_timer(handle, observer)?;
            if engine.completions() >= target {
                break;
            }
        }
        debug!(completions = engine.completions(), "pacer stopped");
        if engine.is_running() {
            engine.pause();
        }
        Ok(())
    }
}
