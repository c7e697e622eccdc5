//! Strongly typed identifier wrappers.
//!
//! Stop, bus, and passenger ids come straight from the imported records, so
//! unlike arena indices they are sparse and user-chosen.  They are still
//! `Copy + Ord + Hash` so they can key maps and be sorted without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The id one past `self`, used when minting fresh records.
            #[inline]
            pub fn next(self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(n: $inner) -> $name {
                $name(n)
            }
        }
    };
}

typed_id! {
    /// Identifier of a stop as given in the stop table.  The depot is
    /// usually `StopId(0)`.
    pub struct StopId(u32);
}

typed_id! {
    /// Identifier of a bus run.
    pub struct BusId(u32);
}

typed_id! {
    /// Identifier of a passenger in the manifest.
    pub struct PassengerId(u32);
}

// ── RouteId ───────────────────────────────────────────────────────────────────

/// Route every record falls back to when the import leaves it blank.
pub const DEFAULT_ROUTE: &str = "171";

/// Free-form route label.  Only one route is simulated at a time but stops and
/// buses still carry it so reports can be filtered.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RouteId(pub String);

impl RouteId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Blank input maps to [`DEFAULT_ROUTE`].
    pub fn or_default(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() { Self::default() } else { Self(s.to_owned()) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RouteId {
    fn default() -> Self {
        Self(DEFAULT_ROUTE.to_owned())
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
