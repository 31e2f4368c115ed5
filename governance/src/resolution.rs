//! Resolution engine: turns class verdicts into the single, final verdict of a report.
//!
//! Each class counts once, whatever the committee size. A tie between classes, or no
//! verdict at all, resolves to `NotMalicious`: the accused is favoured absent a clear
//! majority.

use crate::report::Resolution;
use crate::tally::{ClassVerdict, ClassVerdicts};

/// Whether a report can be resolved right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Every class has a verdict.
    AllVoted,
    /// The lifetime elapsed; missing classes abstain.
    TimedOut,
    /// Votes are missing and the lifetime has not elapsed.
    Pending,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

pub struct ResolutionEngine;

impl ResolutionEngine {
    pub fn readiness(&self, verdicts: &ClassVerdicts, expired: bool) -> Readiness {
        if verdicts.all_decided() {
            Readiness::AllVoted
        } else if expired {
            Readiness::TimedOut
        } else {
            Readiness::Pending
        }
    }

    /// Majority over the class verdicts.
    pub fn decide(&self, verdicts: &ClassVerdicts) -> Resolution {
        let (positive, negative) = verdicts.iter().fold((0u8, 0u8), |(p, n), v| match v {
            ClassVerdict::Positive => (p + 1, n),
            ClassVerdict::Negative => (p, n + 1),
            ClassVerdict::NoVote => (p, n),
        });
        Resolution::from_malicious(positive > negative)
    }
}
