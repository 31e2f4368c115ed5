//! Stakes placed on open reports.
//!
//! Staking on a report endorses it: every stake backs the `Malicious` verdict. Stakes are
//! locked until the report is resolved and the staker claims.

use crate::error::GovernanceError;
use lss_types::{Address, ReportId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub report_id: ReportId,
    pub staker: Address,
    /// Protocol-token amount locked.
    pub amount: u128,
    pub staked_at: Timestamp,
    /// Set once the staker's payout (or refund) has been released.
    pub claimed: bool,
}

/// Read view of staked amounts. The settlement only ever reads stakes through this trait.
pub trait StakeLedger {
    /// Amount `staker` locked on `report`, zero if none.
    fn staked_amount(&self, report: ReportId, staker: &Address) -> u128;

    /// Sum of all stakes on `report`.
    fn total_staked(&self, report: ReportId) -> Result<u128, GovernanceError>;

    fn stakers(&self, report: ReportId) -> Vec<Address>;
}

/// Stake records keyed by report, then staker.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StakeBook {
    stakes: BTreeMap<ReportId, BTreeMap<Address, Stake>>,
}

impl StakeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, report: ReportId, staker: &Address) -> Option<&Stake> {
        self.stakes.get(&report)?.get(staker)
    }

    pub fn stakes(&self, report: ReportId) -> impl Iterator<Item = &Stake> {
        self.stakes.get(&report).into_iter().flat_map(|m| m.values())
    }

    pub(crate) fn insert(&mut self, stake: Stake) -> Result<(), GovernanceError> {
        let per_report = self.stakes.entry(stake.report_id).or_default();
        if per_report.contains_key(&stake.staker) {
            return Err(GovernanceError::AlreadyStaked {
                report: stake.report_id,
                staker: stake.staker,
            });
        }
        per_report.insert(stake.staker, stake);
        Ok(())
    }

    /// Fails with `NoStake` or `AlreadyClaimed` when the stake cannot pay out.
    pub(crate) fn claimable(
        &self,
        report: ReportId,
        staker: &Address,
    ) -> Result<&Stake, GovernanceError> {
        let stake = self
            .get(report, staker)
            .filter(|s| s.amount > 0)
            .ok_or(GovernanceError::NoStake {
                report,
                staker: *staker,
            })?;
        if stake.claimed {
            return Err(GovernanceError::AlreadyClaimed {
                report,
                account: *staker,
            });
        }
        Ok(stake)
    }

    pub(crate) fn mark_claimed(
        &mut self,
        report: ReportId,
        staker: &Address,
    ) -> Result<(), GovernanceError> {
        self.claimable(report, staker)?;
        if let Some(stake) = self.stakes.get_mut(&report).and_then(|m| m.get_mut(staker)) {
            stake.claimed = true;
        }
        Ok(())
    }
}

impl StakeLedger for StakeBook {
    fn staked_amount(&self, report: ReportId, staker: &Address) -> u128 {
        self.get(report, staker).map(|s| s.amount).unwrap_or(0)
    }

    fn total_staked(&self, report: ReportId) -> Result<u128, GovernanceError> {
        self.stakes(report).try_fold(0u128, |total, s| {
            total
                .checked_add(s.amount)
                .ok_or(GovernanceError::Overflow("total stake"))
        })
    }

    fn stakers(&self, report: ReportId) -> Vec<Address> {
        self.stakes(report).map(|s| s.staker).collect()
    }
}
