//! Nullable clock: the `now` every engine call takes, under test control.

use lss_types::Timestamp;
use std::cell::Cell;

/// Time only moves when a test moves it.
pub struct NullClock {
    now: Cell<Timestamp>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            now: Cell::new(Timestamp::new(initial_secs)),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now.get()
    }

    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get().deadline(secs));
    }

    /// Jump to the first second at which a lifetime of `lifetime_secs` started at `start`
    /// counts as expired.
    pub fn expire(&self, start: Timestamp, lifetime_secs: u64) {
        self.now.set(start.deadline(lifetime_secs));
    }
}
