//! Engine state snapshots.
//!
//! A snapshot holds every authoritative record (reports, votes, stakes, claim flags,
//! compensation entitlements) plus the audit log. Collaborators and settings are not part
//! of it; they are supplied again on restore.

use crate::compensation::CompensationBook;
use crate::error::GovernanceError;
use crate::events::AuditLog;
use crate::report::ReportRegistry;
use crate::rewards::RewardBook;
use crate::staking::StakeBook;
use crate::tally::VotingTally;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub version: u32,
    pub registry: ReportRegistry,
    pub tally: VotingTally,
    pub stakes: StakeBook,
    pub rewards: RewardBook,
    pub compensation: CompensationBook,
    pub audit: AuditLog,
}

impl EngineSnapshot {
    pub const VERSION: u32 = 1;

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Decode a snapshot produced by [`EngineSnapshot::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GovernanceError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        if snapshot.version != Self::VERSION {
            return Err(GovernanceError::Snapshot(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version,
                Self::VERSION
            )));
        }
        Ok(snapshot)
    }
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            registry: ReportRegistry::default(),
            tally: VotingTally::default(),
            stakes: StakeBook::default(),
            rewards: RewardBook::default(),
            compensation: CompensationBook::default(),
            audit: AuditLog::default(),
        }
    }
}
