//! Compensation for reported addresses.
//!
//! Resolving a report grants each address it names an entitlement of
//! `floor(reporting_amount * compensation_percentage / 100)` protocol tokens, paid out of
//! the reporter's fee. A fee that funds compensation is not refunded to the reporter, even
//! when the report resolves malicious. Whether the verdict matters is decided by
//! [`CompensationPolicy`]; compensation is restitution, not a judgement on the accused.

use crate::error::GovernanceError;
use crate::report::{Report, Resolution};
use lss_types::{percent_of, Address, CompensationPolicy, ProtocolParams, ReportId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compensation owed to one address by one resolved report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationEntitlement {
    pub report_id: ReportId,
    pub address: Address,
    pub amount: u128,
    /// Percentage in force when the entitlement was granted.
    pub percentage: u32,
    pub claimed: bool,
}

/// Whether `policy` grants compensation for a report resolved as `resolution`.
pub fn is_entitled(policy: CompensationPolicy, resolution: Resolution) -> bool {
    match policy {
        CompensationPolicy::VerdictIndependent => resolution != Resolution::Unset,
        CompensationPolicy::NotMaliciousOnly => resolution == Resolution::NotMalicious,
    }
}

/// `floor(reporting_amount * percentage / 100)`.
pub fn compensation_amount(reporting_amount: u128, percentage: u32) -> Result<u128, GovernanceError> {
    percent_of(reporting_amount, percentage).ok_or(GovernanceError::Overflow("compensation"))
}

/// Entitlements keyed by compensated address.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompensationBook {
    entitlements: BTreeMap<Address, Vec<CompensationEntitlement>>,
}

impl CompensationBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entitlements(&self, address: &Address) -> &[CompensationEntitlement] {
        self.entitlements
            .get(address)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The entitlements a just-resolved report creates, without recording them.
    pub fn entitlements_for(
        report: &Report,
        resolution: Resolution,
        params: &ProtocolParams,
    ) -> Result<Vec<CompensationEntitlement>, GovernanceError> {
        if !is_entitled(params.compensation_policy, resolution) {
            return Ok(Vec::new());
        }
        let amount = compensation_amount(report.reporting_amount, params.compensation_percentage)?;
        if amount == 0 {
            return Ok(Vec::new());
        }
        Ok(report
            .reported_addresses()
            .map(|address| CompensationEntitlement {
                report_id: report.id,
                address: *address,
                amount,
                percentage: params.compensation_percentage,
                claimed: false,
            })
            .collect())
    }

    /// Total granted by `report` across every address, paid or not.
    pub fn reserved_for(&self, report: ReportId) -> Result<u128, GovernanceError> {
        self.entitlements
            .values()
            .flatten()
            .filter(|e| e.report_id == report)
            .try_fold(0u128, |total, e| {
                total
                    .checked_add(e.amount)
                    .ok_or(GovernanceError::Overflow("reserved compensation"))
            })
    }

    pub(crate) fn grant(&mut self, entitlements: Vec<CompensationEntitlement>) {
        for entitlement in entitlements {
            self.entitlements
                .entry(entitlement.address)
                .or_default()
                .push(entitlement);
        }
    }

    /// Unpaid total for `address`.
    ///
    /// Fails with `NoCompensationAvailable` when nothing was ever granted and with
    /// `AlreadyCompensated` when every entitlement has been paid.
    pub fn outstanding(&self, address: &Address) -> Result<u128, GovernanceError> {
        let granted = self.entitlements(address);
        if granted.is_empty() {
            return Err(GovernanceError::NoCompensationAvailable(*address));
        }
        let mut unpaid = granted.iter().filter(|e| !e.claimed).peekable();
        if unpaid.peek().is_none() {
            return Err(GovernanceError::AlreadyCompensated(*address));
        }
        unpaid.try_fold(0u128, |total, e| {
            total
                .checked_add(e.amount)
                .ok_or(GovernanceError::Overflow("compensation total"))
        })
    }

    /// Mark every unpaid entitlement of `address` as paid. Returns the reports settled.
    pub(crate) fn settle(&mut self, address: &Address) -> Vec<ReportId> {
        self.entitlements
            .get_mut(address)
            .into_iter()
            .flat_map(|granted| granted.iter_mut())
            .filter(|e| !e.claimed)
            .map(|e| {
                e.claimed = true;
                e.report_id
            })
            .collect()
    }
}
