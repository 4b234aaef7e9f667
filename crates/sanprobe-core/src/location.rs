//! Instrumentation insertion points.

use serde::{Deserialize, Serialize};

/// A pipeline position at which the instrumentation pass is manually inserted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    /// Baseline: no manual instrumentation requested
    None,

    /// Before the optimization pipeline
    Pre,

    /// In the middle of the optimization pipeline
    Mid,

    /// After the optimization pipeline
    Post,
}

impl Location {
    /// The built-in trial order: baseline first, then pipeline order.
    pub const SEQUENCE: [Location; 4] =
        [Location::None, Location::Pre, Location::Mid, Location::Post];

    /// Value handed to the compiler through its environment.
    pub fn env_value(&self) -> &'static str {
        match self {
            Location::None => "NONE",
            Location::Pre => "PRE",
            Location::Mid => "MID",
            Location::Post => "POST",
        }
    }

    /// Whether this is the "no instrumentation" baseline.
    pub fn is_baseline(&self) -> bool {
        matches!(self, Location::None)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.env_value())
    }
}
