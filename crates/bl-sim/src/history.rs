//! Per-stop waiting/boarded/alighted observations.

use bl_core::{SimTime, StopId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry {
    pub time:     SimTime,
    pub stop:     StopId,
    /// Queue length at the stop after this observation.
    pub waiting:  u32,
    pub boarded:  u32,
    pub alighted: u32,
}

/// Time-ordered history with one entry per `(time, stop)`.
///
/// A second observation for the same key is folded into the first: boarded
/// and alighted counts add up, and `waiting` takes the newer queue length.
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, time: SimTime, stop: StopId, waiting: u32, boarded: u32, alighted: u32) {
        let existing = self
            .entries
            .iter_mut()
            .rev()
            .take_while(|e| e.time == time)
            .find(|e| e.stop == stop);
        match existing {
            Some(e) => {
                e.waiting   = waiting;
                e.boarded  += boarded;
                e.alighted += alighted;
            }
            None => self.entries.push(HistoryEntry { time, stop, waiting, boarded, alighted }),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries for one stop, oldest first.
    pub fn for_stop(&self, stop: StopId) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.entries.iter().filter(move |e| e.stop == stop)
    }
}
