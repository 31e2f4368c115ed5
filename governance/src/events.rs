//! Events emitted by the engine.
//!
//! Every successful state-mutating call appends one record to the [`AuditLog`] and fans it
//! out to the [`EventBus`] listeners. Neither is consulted by the engine itself; the
//! authoritative state lives in the registry and books.

use crate::report::Resolution;
use crate::rewards::RewardRole;
use crate::tally::{VoteValue, VoterClass};
use lss_types::{Address, ReportId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    ReportCreated {
        report_id: ReportId,
        reporter: Address,
        token: Address,
        reported_address: Address,
        second_reported_address: Option<Address>,
    },
    VoteCast {
        report_id: ReportId,
        voter_class: VoterClass,
        voter: Address,
        value: VoteValue,
    },
    Staked {
        report_id: ReportId,
        staker: Address,
        amount: u128,
    },
    ReportResolved {
        report_id: ReportId,
        resolution: Resolution,
    },
    RewardClaimed {
        report_id: ReportId,
        role: RewardRole,
        account: Address,
        /// Reported-token reward.
        amount: u128,
        /// Protocol-token refund paid alongside.
        refund: u128,
    },
    CompensationRetrieval {
        reported_address: Address,
        compensation_percentage: u32,
    },
}

impl GovernanceEvent {
    /// Stable event name, used as the record type in exported logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReportCreated { .. } => "ReportCreated",
            Self::VoteCast { .. } => "VoteCast",
            Self::Staked { .. } => "Staked",
            Self::ReportResolved { .. } => "ReportResolved",
            Self::RewardClaimed { .. } => "RewardClaimed",
            Self::CompensationRetrieval { .. } => "CompensationRetrieval",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    pub at: Timestamp,
    pub event: GovernanceEvent,
}

/// Append-only record of every event.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, at: Timestamp, event: GovernanceEvent) -> &AuditRecord {
        let sequence = self.records.len() as u64;
        self.records.push(AuditRecord {
            sequence,
            at,
            event,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record, if any.
    pub fn last(&self) -> Option<&AuditRecord> {
        self.records.last()
    }
}

/// Synchronous fan-out of audit records to external monitors.
///
/// Listeners run inline on the calling thread after the state change has been written;
/// keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&AuditRecord) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&AuditRecord) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, record: &AuditRecord) {
        for listener in &self.listeners {
            listener(record);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
