//! Protocol parameters: fees, lifetimes, and the payout percentages.
//!
//! All percentages are whole percent (`20` = 20%) and every payout computed from them is
//! truncated toward zero.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// When a resolved report creates a compensation entitlement for the reported address.
///
/// Compensation restores a harmed holder of funds and is orthogonal to the verdict on the
/// accused, so the default pays on any resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationPolicy {
    /// Entitlement on every resolution, whatever the verdict.
    #[default]
    VerdictIndependent,
    /// Entitlement only when the report resolves `NotMalicious`.
    NotMaliciousOnly,
}

/// All protocol parameters the engine reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    // ── Reporting ────────────────────────────────────────────────────────
    /// Fee (protocol token, raw units) a reporter pays to file a report.
    pub reporting_amount: u128,

    /// Seconds a report stays open for voting and staking. Once elapsed, the report can be
    /// resolved with whatever verdicts exist.
    pub report_lifetime_secs: u64,

    // ── Staking ──────────────────────────────────────────────────────────
    /// Smallest stake (protocol token, raw units) accepted on a report.
    pub min_stake_amount: u128,

    /// Whether stakers behind a report that resolves `NotMalicious` lose their stake.
    pub forfeit_losing_stakes: bool,

    // ── Reward pools, as a share of retrieved funds ──────────────────────
    pub reporter_reward_percentage: u32,
    pub stakers_reward_percentage: u32,
    pub committee_reward_percentage: u32,
    pub admin_reward_percentage: u32,

    // ── Compensation ─────────────────────────────────────────────────────
    /// Share of the reporting fee paid to each compensated address. At most
    /// [`ProtocolParams::MAX_COMPENSATION_PERCENTAGE`].
    pub compensation_percentage: u32,

    pub compensation_policy: CompensationPolicy,
}

impl ProtocolParams {
    /// A report names at most two addresses, and both entitlements come out of one fee.
    pub const MAX_COMPENSATION_PERCENTAGE: u32 = 50;

    /// Defaults of the live protocol.
    pub fn protocol_defaults() -> Self {
        Self {
            reporting_amount: 1_000,
            report_lifetime_secs: 24 * 3600, // 1 day

            min_stake_amount: 1,
            forfeit_losing_stakes: true,

            reporter_reward_percentage: 2,
            stakers_reward_percentage: 2,
            committee_reward_percentage: 2,
            admin_reward_percentage: 10,

            compensation_percentage: 20,
            compensation_policy: CompensationPolicy::VerdictIndependent,
        }
    }

    /// Sum of all reward pool percentages.
    pub fn total_reward_percentage(&self) -> u64 {
        [
            self.reporter_reward_percentage,
            self.stakers_reward_percentage,
            self.committee_reward_percentage,
            self.admin_reward_percentage,
        ]
        .iter()
        .map(|p| *p as u64)
        .sum()
    }

    /// Check that the parameters describe a payable configuration.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.total_reward_percentage() > 100 {
            return Err(TypesError::InvalidParams(format!(
                "reward percentages sum to {}%, more than the retrieved funds",
                self.total_reward_percentage()
            )));
        }
        if self.compensation_percentage > Self::MAX_COMPENSATION_PERCENTAGE {
            return Err(TypesError::InvalidParams(format!(
                "compensation percentage {}% over two reported addresses exceeds the reporting fee",
                self.compensation_percentage
            )));
        }
        if self.min_stake_amount == 0 {
            return Err(TypesError::InvalidParams(
                "minimum stake must be non-zero".to_string(),
            ));
        }
        if self.report_lifetime_secs == 0 {
            return Err(TypesError::InvalidParams(
                "report lifetime must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self::protocol_defaults()
    }
}
