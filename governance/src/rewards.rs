//! Reward settlement: what each participant of a resolved report may claim.
//!
//! A malicious verdict seizes the reported addresses' funds; fixed percentages of those
//! retrieved funds form the reward pools:
//! - Reporter: reporting fee refunded, less any compensation it funds, + reporter pool
//! - Stakers: stake refunded + a share of the stakers pool proportional to their stake
//! - Committee members who voted Positive: equal shares of the committee pool
//! - Admin: admin pool
//!
//! A not-malicious verdict pays no rewards. The reporting fee stays with the treasury to
//! fund compensation, and stakes are forfeited unless the protocol disables forfeiture.
//! Every share is a floor; the truncated remainder stays in the treasury.

use crate::error::GovernanceError;
use crate::report::Resolution;
use lss_external::Transfer;
use lss_types::{percent_of, proportional_share, Address, ProtocolParams, ReportId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Who is claiming.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RewardRole {
    Reporter,
    Staker,
    CommitteeMember,
    Admin,
}

/// Reward pools carved out of the retrieved funds (reported token).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardPools {
    pub reporter: u128,
    pub stakers: u128,
    pub committee: u128,
    pub admin: u128,
}

impl RewardPools {
    pub fn from_retrieved(retrieved: u128, params: &ProtocolParams) -> Result<Self, GovernanceError> {
        let pool = |pct| percent_of(retrieved, pct).ok_or(GovernanceError::Overflow("reward pool"));
        Ok(Self {
            reporter: pool(params.reporter_reward_percentage)?,
            stakers: pool(params.stakers_reward_percentage)?,
            committee: pool(params.committee_reward_percentage)?,
            admin: pool(params.admin_reward_percentage)?,
        })
    }
}

/// What one claimant receives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payout {
    /// Protocol-token amount returned (reporting fee or stake).
    pub refund: u128,
    /// Reported-token reward out of the retrieved funds.
    pub reward: u128,
}

impl Payout {
    pub const NONE: Self = Self {
        refund: 0,
        reward: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.refund == 0 && self.reward == 0
    }

    /// Ledger legs paying this payout from the treasury to `to`.
    pub fn transfers(
        &self,
        treasury: Address,
        protocol_token: Address,
        reported_token: Address,
        to: Address,
    ) -> Vec<Transfer> {
        let mut legs = Vec::with_capacity(2);
        if self.refund > 0 {
            legs.push(Transfer {
                token: protocol_token,
                from: treasury,
                to,
                amount: self.refund,
            });
        }
        if self.reward > 0 {
            legs.push(Transfer {
                token: reported_token,
                from: treasury,
                to,
                amount: self.reward,
            });
        }
        legs
    }
}

/// Reporter: fee back plus the reporter pool on a malicious verdict, nothing otherwise.
/// `reserved` is the part of the fee granted as compensation; it is never refunded.
pub fn reporter_payout(
    resolution: Resolution,
    reporting_amount: u128,
    reserved: u128,
    pools: &RewardPools,
) -> Payout {
    match resolution {
        Resolution::Malicious => Payout {
            refund: reporting_amount.saturating_sub(reserved),
            reward: pools.reporter,
        },
        _ => Payout::NONE,
    }
}

/// Staker: stake back plus `floor(stakers_pool * stake / total_stake)` on a malicious
/// verdict. On a not-malicious verdict the stake is forfeited, or only refunded when
/// `forfeit_losing_stakes` is off.
pub fn staker_payout(
    resolution: Resolution,
    stake: u128,
    total_stake: u128,
    pools: &RewardPools,
    forfeit_losing_stakes: bool,
) -> Result<Payout, GovernanceError> {
    match resolution {
        Resolution::Malicious => {
            let reward = proportional_share(pools.stakers, stake, total_stake)
                .ok_or(GovernanceError::Overflow("staker share"))?;
            Ok(Payout {
                refund: stake,
                reward,
            })
        }
        Resolution::NotMalicious if !forfeit_losing_stakes => Ok(Payout {
            refund: stake,
            reward: 0,
        }),
        _ => Ok(Payout::NONE),
    }
}

/// Committee member: an equal share of the committee pool for members who voted Positive
/// on a malicious report.
pub fn committee_payout(
    resolution: Resolution,
    voted_positive: bool,
    positive_voters: u128,
    pools: &RewardPools,
) -> Payout {
    if resolution != Resolution::Malicious || !voted_positive || positive_voters == 0 {
        return Payout::NONE;
    }
    Payout {
        refund: 0,
        reward: pools.committee / positive_voters,
    }
}

/// Admin: the admin pool on a malicious verdict.
pub fn admin_payout(resolution: Resolution, pools: &RewardPools) -> Payout {
    match resolution {
        Resolution::Malicious => Payout {
            refund: 0,
            reward: pools.admin,
        },
        _ => Payout::NONE,
    }
}

/// Claimed flags for reporter, committee and admin payouts. Staker claims live on the
/// stake record itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RewardBook {
    claimed: BTreeSet<(ReportId, RewardRole, Address)>,
}

impl RewardBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_claimed(&self, report: ReportId, role: RewardRole, account: &Address) -> bool {
        self.claimed.contains(&(report, role, *account))
    }

    /// Record a claim. Fails if this claim was already recorded.
    pub(crate) fn mark_claimed(
        &mut self,
        report: ReportId,
        role: RewardRole,
        account: Address,
    ) -> Result<(), GovernanceError> {
        if !self.claimed.insert((report, role, account)) {
            return Err(GovernanceError::AlreadyClaimed { report, account });
        }
        Ok(())
    }
}
