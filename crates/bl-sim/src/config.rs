//! Engine-level settings that are not part of the user-facing run parameters.

/// What to do when a bus, stop, or passenger reference cannot be resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReferenceMode {
    /// Emit a warning and skip the operation.
    #[default]
    Lenient,
    /// Fail with [`SimError::DanglingReference`](crate::SimError::DanglingReference).
    Strict,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub reference_mode: ReferenceMode,

    /// Keep only the newest N narrative log entries.  `None` = unbounded.
    pub log_capacity: Option<usize>,

    /// Call `SimObserver::on_snapshot` every N simulated seconds.  0 disables
    /// snapshots.  Default: 60.
    pub snapshot_interval_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_mode:         ReferenceMode::Lenient,
            log_capacity:           None,
            snapshot_interval_secs: 60,
        }
    }
}
