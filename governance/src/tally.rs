//! Voting tally: votes from the three voter classes and the verdict of each class.
//!
//! Admin and TokenOwner are single-voter classes. The committee class is aggregated by
//! majority over the current roster, counting only the votes of current members.
//! Committee tie-break policy: a tie (e.g. 2 of 4 members Positive, 2 Negative) resolves
//! to `Negative`, biasing the class against false positives.

use lss_external::CommitteeRoster;
use lss_types::{Address, ReportId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The three voter classes of a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VoterClass {
    /// The protocol administrator.
    Admin,
    /// The administrator of the reported token.
    TokenOwner,
    /// Any member of the committee roster.
    Committee,
}

/// A single vote on whether the reported address is malicious.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteValue {
    /// Not malicious; take no action.
    Negative,
    /// Malicious.
    Positive,
}

/// The verdict of one voter class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassVerdict {
    /// The class has not (or not decisively) voted.
    NoVote,
    Negative,
    Positive,
}

impl From<VoteValue> for ClassVerdict {
    fn from(value: VoteValue) -> Self {
        match value {
            VoteValue::Negative => Self::Negative,
            VoteValue::Positive => Self::Positive,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub report_id: ReportId,
    pub voter_class: VoterClass,
    pub voter: Address,
    pub value: VoteValue,
    pub cast_at: Timestamp,
}

/// Member vote counts of the committee on one report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitteeCount {
    pub positive: u32,
    pub negative: u32,
}

impl CommitteeCount {
    pub fn cast(&self) -> u32 {
        self.positive + self.negative
    }

    /// Verdict while voting is open: a strict majority of the roster, or a tie once every
    /// member has voted.
    pub fn decisive_verdict(&self, member_count: u32) -> ClassVerdict {
        let (positive, negative, members) =
            (self.positive as u64, self.negative as u64, member_count as u64);
        if positive * 2 > members {
            ClassVerdict::Positive
        } else if negative * 2 > members {
            ClassVerdict::Negative
        } else if members > 0 && self.cast() as u64 >= members {
            ClassVerdict::Negative
        } else {
            ClassVerdict::NoVote
        }
    }

    /// Verdict after the report lifetime elapsed: majority of the votes actually cast.
    pub fn timeout_verdict(&self) -> ClassVerdict {
        if self.positive > self.negative {
            ClassVerdict::Positive
        } else if self.cast() > 0 {
            ClassVerdict::Negative
        } else {
            ClassVerdict::NoVote
        }
    }
}

/// One verdict per class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassVerdicts {
    pub admin: ClassVerdict,
    pub token_owner: ClassVerdict,
    pub committee: ClassVerdict,
}

impl ClassVerdicts {
    pub fn iter(&self) -> impl Iterator<Item = ClassVerdict> {
        [self.admin, self.token_owner, self.committee].into_iter()
    }

    /// Whether every class has reached a verdict.
    pub fn all_decided(&self) -> bool {
        self.iter().all(|v| v != ClassVerdict::NoVote)
    }
}

/// Votes keyed by report, then by `(class, voter)`. Re-voting overwrites.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VotingTally {
    votes: BTreeMap<ReportId, BTreeMap<(VoterClass, Address), Vote>>,
}

impl VotingTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a vote. Returns the vote it replaced, if any.
    pub(crate) fn record(&mut self, vote: Vote) -> Option<Vote> {
        self.votes
            .entry(vote.report_id)
            .or_default()
            .insert((vote.voter_class, vote.voter), vote)
    }

    pub fn votes(&self, report: ReportId) -> impl Iterator<Item = &Vote> {
        self.votes.get(&report).into_iter().flat_map(|m| m.values())
    }

    pub fn vote_of(&self, report: ReportId, class: VoterClass, voter: &Address) -> Option<&Vote> {
        self.votes.get(&report)?.get(&(class, *voter))
    }

    fn latest_single(&self, report: ReportId, class: VoterClass) -> ClassVerdict {
        self.votes(report)
            .filter(|v| v.voter_class == class)
            .max_by_key(|v| v.cast_at)
            .map(|v| ClassVerdict::from(v.value))
            .unwrap_or(ClassVerdict::NoVote)
    }

    fn committee_votes<'a>(
        &'a self,
        report: ReportId,
        roster: &'a dyn CommitteeRoster,
    ) -> impl Iterator<Item = &'a Vote> {
        self.votes(report)
            .filter(move |v| v.voter_class == VoterClass::Committee && roster.is_member(&v.voter))
    }

    /// Votes of current roster members only.
    pub fn committee_count(&self, report: ReportId, roster: &dyn CommitteeRoster) -> CommitteeCount {
        self.committee_votes(report, roster)
            .fold(CommitteeCount::default(), |mut count, v| {
                match v.value {
                    VoteValue::Positive => count.positive += 1,
                    VoteValue::Negative => count.negative += 1,
                }
                count
            })
    }

    /// Committee members whose vote on `report` was `value`.
    pub fn committee_voters(&self, report: ReportId, value: VoteValue) -> Vec<Address> {
        self.votes(report)
            .filter(|v| v.voter_class == VoterClass::Committee && v.value == value)
            .map(|v| v.voter)
            .collect()
    }

    /// Drop the committee votes of accounts no longer on the roster. Returns how many
    /// were dropped.
    pub(crate) fn retain_members(&mut self, report: ReportId, roster: &dyn CommitteeRoster) -> usize {
        let Some(votes) = self.votes.get_mut(&report) else {
            return 0;
        };
        let before = votes.len();
        votes.retain(|(class, voter), _| *class != VoterClass::Committee || roster.is_member(voter));
        before - votes.len()
    }

    /// Verdict of `class` while voting is open.
    pub fn class_verdict(
        &self,
        report: ReportId,
        class: VoterClass,
        roster: &dyn CommitteeRoster,
    ) -> ClassVerdict {
        match class {
            VoterClass::Admin | VoterClass::TokenOwner => self.latest_single(report, class),
            VoterClass::Committee => self
                .committee_count(report, roster)
                .decisive_verdict(roster.member_count()),
        }
    }

    /// Verdicts of every class. After the lifetime elapsed the committee is read by the
    /// majority of cast votes instead of the roster majority.
    pub fn verdicts(
        &self,
        report: ReportId,
        roster: &dyn CommitteeRoster,
        expired: bool,
    ) -> ClassVerdicts {
        let committee = if expired {
            self.committee_count(report, roster).timeout_verdict()
        } else {
            self.class_verdict(report, VoterClass::Committee, roster)
        };
        ClassVerdicts {
            admin: self.latest_single(report, VoterClass::Admin),
            token_owner: self.latest_single(report, VoterClass::TokenOwner),
            committee,
        }
    }
}
