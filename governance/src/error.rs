use lss_external::LedgerError;
use lss_types::{Address, ReportId};
use thiserror::Error;

use crate::tally::VoterClass;

/// Why a compensation claimant was turned away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimantRejection {
    /// The address is not a deployed contract.
    NotAContract,
}

/// Coarse classification of a [`GovernanceError`] for off-chain monitoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller lacks the role for the action.
    Unauthorized,
    /// The input or the report's state does not allow the action.
    InvalidRequest,
    /// The action already happened; nothing is left to do.
    AlreadySettled,
    /// Funds could not be moved.
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("report {0} not found")]
    ReportNotFound(ReportId),

    #[error("{caller} is not authorized to vote as {class:?} on report {report}")]
    NotAuthorized {
        report: ReportId,
        class: VoterClass,
        caller: Address,
    },

    #[error("report {0} is already resolved")]
    ReportAlreadyResolved(ReportId),

    #[error("report {0} is not resolved yet")]
    ReportNotResolved(ReportId),

    #[error("report {0} has expired")]
    ReportExpired(ReportId),

    #[error("report {0} cannot be resolved yet: votes are missing and its lifetime has not elapsed")]
    ResolutionNotReady(ReportId),

    #[error("an open report on {reported} for token {token} already exists: {existing}")]
    ReportAlreadyExists {
        token: Address,
        reported: Address,
        existing: ReportId,
    },

    #[error("{0} is whitelisted and cannot be reported")]
    CannotReportWhitelisted(Address),

    #[error("{0} is a listed exchange and cannot be reported")]
    CannotReportDex(Address),

    #[error("token {0} has no administrator")]
    UnknownToken(Address),

    #[error("the reporter of report {0} cannot stake on it")]
    ReporterCannotStake(ReportId),

    #[error("{staker} has already staked on report {report}")]
    AlreadyStaked { report: ReportId, staker: Address },

    #[error("stake too small: need at least {min}, got {amount}")]
    StakeTooSmall { amount: u128, min: u128 },

    #[error("{staker} has no stake on report {report}")]
    NoStake { report: ReportId, staker: Address },

    #[error("{account} has nothing to claim on report {report}")]
    NothingToClaim { report: ReportId, account: Address },

    #[error("{account} has already claimed on report {report}")]
    AlreadyClaimed { report: ReportId, account: Address },

    #[error("invalid compensation claimant {address}: {reason:?}")]
    InvalidClaimant {
        address: Address,
        reason: ClaimantRejection,
    },

    #[error("no compensation is available for {0}")]
    NoCompensationAvailable(Address),

    #[error("{0} has already retrieved its compensation")]
    AlreadyCompensated(Address),

    #[error("transfer failed: {0}")]
    TransferFailed(#[from] LedgerError),

    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthorized { .. } => ErrorKind::Unauthorized,
            Self::ReportAlreadyResolved(_)
            | Self::AlreadyStaked { .. }
            | Self::AlreadyClaimed { .. }
            | Self::AlreadyCompensated(_)
            | Self::ReportAlreadyExists { .. } => ErrorKind::AlreadySettled,
            Self::TransferFailed(_) | Self::Snapshot(_) => ErrorKind::Infrastructure,
            _ => ErrorKind::InvalidRequest,
        }
    }
}
