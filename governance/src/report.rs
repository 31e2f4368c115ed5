//! Report registry: the authoritative record of every report and its verdict.

use crate::error::GovernanceError;
use lss_types::{Address, ReportId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    /// Accepting votes and stakes.
    Open,
    /// Verdict written; the report is read-only from here on.
    Resolved,
}

/// The verdict on a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// No verdict yet. Only ever paired with [`ReportStatus::Open`].
    Unset,
    /// The reported address was found fraudulent.
    Malicious,
    /// The report was rejected.
    NotMalicious,
}

impl Resolution {
    pub fn from_malicious(malicious: bool) -> Self {
        if malicious {
            Self::Malicious
        } else {
            Self::NotMalicious
        }
    }
}

/// A filed report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    /// The token whose transfer was reported.
    pub token: Address,
    /// Administrator of `token` at creation; the designated TokenOwner voter.
    pub token_owner: Address,
    pub reporter: Address,
    pub reported_address: Address,
    /// Address the reported funds were forwarded to, reported in the same action.
    pub second_reported_address: Option<Address>,
    /// Fee the reporter paid, in the protocol token.
    pub reporting_amount: u128,
    pub created_at: Timestamp,
    pub status: ReportStatus,
    pub resolution: Resolution,
    pub resolved_at: Option<Timestamp>,
    /// Reported-token funds seized from the reported addresses on a malicious verdict.
    pub retrieved_funds: u128,
}

impl Report {
    pub fn is_resolved(&self) -> bool {
        self.status == ReportStatus::Resolved
    }

    /// The reported address followed by the linked second address, if any.
    pub fn reported_addresses(&self) -> impl Iterator<Item = &Address> {
        std::iter::once(&self.reported_address).chain(self.second_reported_address.iter())
    }

    /// Whether `address` is named by this report, directly or as the linked address.
    pub fn names(&self, address: &Address) -> bool {
        self.reported_addresses().any(|a| a == address)
    }

    pub fn has_expired(&self, lifetime_secs: u64, now: Timestamp) -> bool {
        self.created_at.has_expired(lifetime_secs, now)
    }
}

/// Everything the registry needs to file a report.
#[derive(Clone, Debug)]
pub struct NewReport {
    pub token: Address,
    pub token_owner: Address,
    pub reporter: Address,
    pub reported_address: Address,
    pub second_reported_address: Option<Address>,
    pub reporting_amount: u128,
    pub created_at: Timestamp,
}

/// Arena of reports indexed by `id - 1`, plus an index of open reports by target.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportRegistry {
    reports: Vec<Report>,
    open_by_target: BTreeMap<(Address, Address), ReportId>,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next report will receive.
    pub fn next_id(&self) -> ReportId {
        ReportId::new(self.reports.len() as u64 + 1)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// The open report on `reported` for `token`, if any.
    pub fn open_report_on(&self, token: &Address, reported: &Address) -> Option<ReportId> {
        self.open_by_target.get(&(*token, *reported)).copied()
    }

    pub fn get(&self, id: ReportId) -> Result<&Report, GovernanceError> {
        let index = id
            .get()
            .checked_sub(1)
            .ok_or(GovernanceError::ReportNotFound(id))?;
        self.reports
            .get(index as usize)
            .ok_or(GovernanceError::ReportNotFound(id))
    }

    pub fn is_resolved(&self, id: ReportId) -> Result<bool, GovernanceError> {
        Ok(self.get(id)?.is_resolved())
    }

    pub fn resolution(&self, id: ReportId) -> Result<Resolution, GovernanceError> {
        Ok(self.get(id)?.resolution)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Report> {
        self.reports.iter()
    }

    /// File a report. Fails if an open report already targets the same address and token.
    pub(crate) fn insert(&mut self, new: NewReport) -> Result<ReportId, GovernanceError> {
        if let Some(existing) = self.open_report_on(&new.token, &new.reported_address) {
            return Err(GovernanceError::ReportAlreadyExists {
                token: new.token,
                reported: new.reported_address,
                existing,
            });
        }
        let id = self.next_id();
        self.open_by_target
            .insert((new.token, new.reported_address), id);
        self.reports.push(Report {
            id,
            token: new.token,
            token_owner: new.token_owner,
            reporter: new.reporter,
            reported_address: new.reported_address,
            second_reported_address: new.second_reported_address,
            reporting_amount: new.reporting_amount,
            created_at: new.created_at,
            status: ReportStatus::Open,
            resolution: Resolution::Unset,
            resolved_at: None,
            retrieved_funds: 0,
        });
        Ok(id)
    }

    /// Write the verdict. The only place `status` and `resolution` ever change.
    pub(crate) fn resolve(
        &mut self,
        id: ReportId,
        resolution: Resolution,
        retrieved_funds: u128,
        now: Timestamp,
    ) -> Result<&Report, GovernanceError> {
        debug_assert_ne!(resolution, Resolution::Unset);
        let index = self.get(id)?.id.get() as usize - 1;
        let report = &mut self.reports[index];
        if report.is_resolved() {
            return Err(GovernanceError::ReportAlreadyResolved(id));
        }
        report.status = ReportStatus::Resolved;
        report.resolution = resolution;
        report.resolved_at = Some(now);
        report.retrieved_funds = retrieved_funds;
        self.open_by_target
            .remove(&(report.token, report.reported_address));
        Ok(&*report)
    }
}
