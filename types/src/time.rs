//! Points in time as the engine sees them.
//!
//! Timestamps are Unix epoch seconds (UTC). Every entry point of the engine receives the
//! current time from its caller; the engine never reads the wall clock itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// The moment `lifetime_secs` after this one. Saturates at the end of time.
    pub fn deadline(&self, lifetime_secs: u64) -> Timestamp {
        Self(self.0.saturating_add(lifetime_secs))
    }

    /// Whether a lifetime starting here is over at `now`. The deadline itself counts as
    /// expired.
    pub fn has_expired(&self, lifetime_secs: u64, now: Timestamp) -> bool {
        now >= self.deadline(lifetime_secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
