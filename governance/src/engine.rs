//! Governance engine: ties the registry, tally, resolution and settlement together behind
//! the protocol's entry points.
//!
//! Every entry point takes `&mut self`, so calls are applied one after another. Within a
//! call all preconditions are checked and all ledger movements performed before the first
//! engine write; a failing call leaves no trace.

use crate::compensation::CompensationBook;
use crate::error::{ClaimantRejection, GovernanceError};
use crate::events::{AuditLog, AuditRecord, EventBus, GovernanceEvent};
use crate::report::{NewReport, Report, ReportRegistry, Resolution};
use crate::resolution::ResolutionEngine;
use crate::rewards::{
    admin_payout, committee_payout, reporter_payout, staker_payout, Payout, RewardBook,
    RewardPools, RewardRole,
};
use crate::settings::GovernanceSettings;
use crate::snapshot::EngineSnapshot;
use crate::staking::{Stake, StakeBook, StakeLedger};
use crate::tally::{ClassVerdict, Vote, VoteValue, VoterClass, VotingTally};
use lss_external::{AccessRegistry, AssetLedger, CapabilityProbe, CommitteeRoster, Transfer};
use lss_types::{Address, ProtocolParams, ReportId, Timestamp};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The external services the engine calls into.
#[derive(Clone)]
pub struct Collaborators {
    pub ledger: Arc<dyn AssetLedger>,
    pub access: Arc<dyn AccessRegistry>,
    pub committee: Arc<dyn CommitteeRoster>,
    pub probe: Arc<dyn CapabilityProbe>,
}

pub struct GovernanceEngine {
    settings: GovernanceSettings,
    collaborators: Collaborators,
    resolver: ResolutionEngine,
    registry: ReportRegistry,
    tally: VotingTally,
    stakes: StakeBook,
    rewards: RewardBook,
    compensation: CompensationBook,
    audit: AuditLog,
    bus: EventBus,
}

impl GovernanceEngine {
    pub fn new(
        settings: GovernanceSettings,
        collaborators: Collaborators,
    ) -> Result<Self, GovernanceError> {
        Self::from_snapshot(settings, collaborators, EngineSnapshot::default())
    }

    /// Rebuild an engine from a snapshot taken with [`GovernanceEngine::snapshot`].
    pub fn from_snapshot(
        settings: GovernanceSettings,
        collaborators: Collaborators,
        snapshot: EngineSnapshot,
    ) -> Result<Self, GovernanceError> {
        settings.validate()?;
        Ok(Self {
            settings,
            collaborators,
            resolver: ResolutionEngine,
            registry: snapshot.registry,
            tally: snapshot.tally,
            stakes: snapshot.stakes,
            rewards: snapshot.rewards,
            compensation: snapshot.compensation,
            audit: snapshot.audit,
            bus: EventBus::new(),
        })
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            version: EngineSnapshot::VERSION,
            registry: self.registry.clone(),
            tally: self.tally.clone(),
            stakes: self.stakes.clone(),
            rewards: self.rewards.clone(),
            compensation: self.compensation.clone(),
            audit: self.audit.clone(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &GovernanceSettings {
        &self.settings
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.settings.params
    }

    pub fn compensation_percentage(&self) -> u32 {
        self.settings.params.compensation_percentage
    }

    pub fn report(&self, id: ReportId) -> Result<&Report, GovernanceError> {
        self.registry.get(id)
    }

    pub fn reports(&self) -> &ReportRegistry {
        &self.registry
    }

    pub fn is_report_solved(&self, id: ReportId) -> Result<bool, GovernanceError> {
        self.registry.is_resolved(id)
    }

    pub fn report_resolution(&self, id: ReportId) -> Result<Resolution, GovernanceError> {
        self.registry.resolution(id)
    }

    pub fn class_verdict(
        &self,
        id: ReportId,
        class: VoterClass,
    ) -> Result<ClassVerdict, GovernanceError> {
        self.registry.get(id)?;
        Ok(self
            .tally
            .class_verdict(id, class, self.collaborators.committee.as_ref()))
    }

    pub fn tally(&self) -> &VotingTally {
        &self.tally
    }

    pub fn stake_ledger(&self) -> &impl StakeLedger {
        &self.stakes
    }

    pub fn stakes(&self) -> &StakeBook {
        &self.stakes
    }

    pub fn compensation_book(&self) -> &CompensationBook {
        &self.compensation
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Register a listener for every future audit record.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&AuditRecord) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    // ── Reporting ────────────────────────────────────────────────────────

    /// File a report on `reported_address` (and optionally the address the funds were
    /// forwarded to), collecting the reporting fee from `reporter`.
    pub fn create_report(
        &mut self,
        reporter: Address,
        token: Address,
        reported_address: Address,
        second_reported_address: Option<Address>,
        now: Timestamp,
    ) -> Result<ReportId, GovernanceError> {
        let second_reported_address = second_reported_address.filter(|a| *a != reported_address);
        for target in std::iter::once(&reported_address).chain(second_reported_address.iter()) {
            if self.collaborators.access.is_whitelisted(target) {
                return Err(GovernanceError::CannotReportWhitelisted(*target));
            }
            if self.collaborators.access.is_dex_listed(target) {
                return Err(GovernanceError::CannotReportDex(*target));
            }
        }
        if let Some(existing) = self.registry.open_report_on(&token, &reported_address) {
            return Err(GovernanceError::ReportAlreadyExists {
                token,
                reported: reported_address,
                existing,
            });
        }
        let token_owner = self
            .collaborators
            .ledger
            .token_admin(&token)?
            .ok_or(GovernanceError::UnknownToken(token))?;

        let fee = self.settings.params.reporting_amount;
        if fee > 0 {
            self.collaborators.ledger.transfer_from(
                &self.settings.protocol_token,
                &self.settings.treasury,
                &reporter,
                &self.settings.treasury,
                fee,
            )?;
        }

        let id = self.registry.insert(NewReport {
            token,
            token_owner,
            reporter,
            reported_address,
            second_reported_address,
            reporting_amount: fee,
            created_at: now,
        })?;
        info!(
            report = %id,
            reporter = %reporter,
            token = %token,
            reported = %reported_address,
            "report created"
        );
        self.emit(
            now,
            GovernanceEvent::ReportCreated {
                report_id: id,
                reporter,
                token,
                reported_address,
                second_reported_address,
            },
        );
        Ok(id)
    }

    // ── Voting ───────────────────────────────────────────────────────────

    /// Cast or replace `caller`'s vote in `class` on an open report.
    pub fn cast_vote(
        &mut self,
        caller: Address,
        report_id: ReportId,
        class: VoterClass,
        value: VoteValue,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let report = self.registry.get(report_id)?;
        let authorized = match class {
            VoterClass::Admin => caller == self.settings.admin,
            VoterClass::TokenOwner => caller == report.token_owner,
            VoterClass::Committee => self.collaborators.committee.is_member(&caller),
        };
        if !authorized {
            return Err(GovernanceError::NotAuthorized {
                report: report_id,
                class,
                caller,
            });
        }
        if report.is_resolved() {
            return Err(GovernanceError::ReportAlreadyResolved(report_id));
        }
        if report.has_expired(self.settings.params.report_lifetime_secs, now) {
            return Err(GovernanceError::ReportExpired(report_id));
        }

        let replaced = self.tally.record(Vote {
            report_id,
            voter_class: class,
            voter: caller,
            value,
            cast_at: now,
        });
        debug!(
            report = %report_id,
            ?class,
            voter = %caller,
            ?value,
            revote = replaced.is_some(),
            "vote cast"
        );
        self.emit(
            now,
            GovernanceEvent::VoteCast {
                report_id,
                voter_class: class,
                voter: caller,
                value,
            },
        );
        Ok(())
    }

    // ── Staking ──────────────────────────────────────────────────────────

    /// Lock `amount` protocol tokens from `staker` behind an open report.
    pub fn stake(
        &mut self,
        staker: Address,
        report_id: ReportId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let params = &self.settings.params;
        let report = self.registry.get(report_id)?;
        if report.is_resolved() {
            return Err(GovernanceError::ReportAlreadyResolved(report_id));
        }
        if report.has_expired(params.report_lifetime_secs, now) {
            return Err(GovernanceError::ReportExpired(report_id));
        }
        if staker == report.reporter {
            return Err(GovernanceError::ReporterCannotStake(report_id));
        }
        if amount < params.min_stake_amount {
            return Err(GovernanceError::StakeTooSmall {
                amount,
                min: params.min_stake_amount,
            });
        }
        if self.stakes.get(report_id, &staker).is_some() {
            return Err(GovernanceError::AlreadyStaked {
                report: report_id,
                staker,
            });
        }

        self.collaborators.ledger.transfer_from(
            &self.settings.protocol_token,
            &self.settings.treasury,
            &staker,
            &self.settings.treasury,
            amount,
        )?;
        self.stakes.insert(Stake {
            report_id,
            staker,
            amount,
            staked_at: now,
            claimed: false,
        })?;
        debug!(report = %report_id, staker = %staker, amount, "stake placed");
        self.emit(
            now,
            GovernanceEvent::Staked {
                report_id,
                staker,
                amount,
            },
        );
        Ok(())
    }

    // ── Resolution ───────────────────────────────────────────────────────

    /// Resolve a report. Callable by anyone; succeeds at most once per report.
    pub fn resolve_report(
        &mut self,
        report_id: ReportId,
        now: Timestamp,
    ) -> Result<Resolution, GovernanceError> {
        let report = self.registry.get(report_id)?.clone();
        if report.is_resolved() {
            return Err(GovernanceError::ReportAlreadyResolved(report_id));
        }

        let expired = report.has_expired(self.settings.params.report_lifetime_secs, now);
        let roster = self.collaborators.committee.as_ref();
        let verdicts = self.tally.verdicts(report_id, roster, expired);
        let readiness = self.resolver.readiness(&verdicts, expired);
        if !readiness.is_ready() {
            return Err(GovernanceError::ResolutionNotReady(report_id));
        }
        let resolution = self.resolver.decide(&verdicts);

        let entitlements =
            CompensationBook::entitlements_for(&report, resolution, &self.settings.params)?;
        let mut retrieved = 0u128;
        if resolution == Resolution::Malicious {
            let seizure = self.seizure_plan(&report)?;
            for leg in &seizure {
                retrieved = retrieved
                    .checked_add(leg.amount)
                    .ok_or(GovernanceError::Overflow("retrieved funds"))?;
            }
            if !seizure.is_empty() {
                self.collaborators.ledger.transfer_batch(&seizure)?;
            }
        }

        self.registry.resolve(report_id, resolution, retrieved, now)?;
        let dropped = self
            .tally
            .retain_members(report_id, self.collaborators.committee.as_ref());
        if dropped > 0 {
            debug!(report = %report_id, dropped, "dropped votes of former committee members");
        }
        self.compensation.grant(entitlements);
        info!(
            report = %report_id,
            ?resolution,
            ?readiness,
            ?verdicts,
            retrieved,
            "report resolved"
        );
        self.emit(
            now,
            GovernanceEvent::ReportResolved {
                report_id,
                resolution,
            },
        );
        Ok(resolution)
    }

    /// Ledger legs moving every reported address's balance of the reported token into the
    /// treasury.
    fn seizure_plan(&self, report: &Report) -> Result<Vec<Transfer>, GovernanceError> {
        let mut legs = Vec::new();
        for address in report.reported_addresses() {
            let balance = self
                .collaborators
                .ledger
                .balance_of(&report.token, address)?;
            if balance > 0 {
                legs.push(Transfer {
                    token: report.token,
                    from: *address,
                    to: self.settings.treasury,
                    amount: balance,
                });
            }
        }
        Ok(legs)
    }

    // ── Rewards ──────────────────────────────────────────────────────────

    /// Release `staker`'s stake and reward on a resolved report.
    pub fn claim_reward(
        &mut self,
        report_id: ReportId,
        staker: Address,
        now: Timestamp,
    ) -> Result<Payout, GovernanceError> {
        let report = self.resolved_report(report_id)?;
        let stake = self.stakes.claimable(report_id, &staker)?.amount;
        let pools = RewardPools::from_retrieved(report.retrieved_funds, &self.settings.params)?;
        let payout = staker_payout(
            report.resolution,
            stake,
            self.stakes.total_staked(report_id)?,
            &pools,
            self.settings.params.forfeit_losing_stakes,
        )?;
        if payout.is_empty() {
            return Err(GovernanceError::NothingToClaim {
                report: report_id,
                account: staker,
            });
        }

        self.pay(&report, staker, payout)?;
        self.stakes.mark_claimed(report_id, &staker)?;
        self.record_claim(now, report_id, RewardRole::Staker, staker, payout);
        Ok(payout)
    }

    /// Release the reporter's fee refund and reward on a report resolved malicious. The
    /// refund excludes the part of the fee reserved for compensating the reported
    /// addresses.
    pub fn claim_reporter_reward(
        &mut self,
        report_id: ReportId,
        caller: Address,
        now: Timestamp,
    ) -> Result<Payout, GovernanceError> {
        let report = self.resolved_report(report_id)?;
        let payout = if caller == report.reporter {
            let pools = RewardPools::from_retrieved(report.retrieved_funds, &self.settings.params)?;
            let reserved = self.compensation.reserved_for(report_id)?;
            reporter_payout(report.resolution, report.reporting_amount, reserved, &pools)
        } else {
            Payout::NONE
        };
        self.claim_role(&report, RewardRole::Reporter, caller, payout, now)
    }

    /// Release a committee member's share of the committee pool.
    pub fn claim_committee_reward(
        &mut self,
        report_id: ReportId,
        member: Address,
        now: Timestamp,
    ) -> Result<Payout, GovernanceError> {
        let report = self.resolved_report(report_id)?;
        let voted_positive = self
            .tally
            .vote_of(report_id, VoterClass::Committee, &member)
            .is_some_and(|v| v.value == VoteValue::Positive);
        let positive_voters = self
            .tally
            .committee_voters(report_id, VoteValue::Positive)
            .len() as u128;
        let pools = RewardPools::from_retrieved(report.retrieved_funds, &self.settings.params)?;
        let payout = committee_payout(report.resolution, voted_positive, positive_voters, &pools);
        self.claim_role(&report, RewardRole::CommitteeMember, member, payout, now)
    }

    /// Release the admin reward pool.
    pub fn claim_admin_reward(
        &mut self,
        report_id: ReportId,
        caller: Address,
        now: Timestamp,
    ) -> Result<Payout, GovernanceError> {
        let report = self.resolved_report(report_id)?;
        let payout = if caller == self.settings.admin {
            let pools = RewardPools::from_retrieved(report.retrieved_funds, &self.settings.params)?;
            admin_payout(report.resolution, &pools)
        } else {
            Payout::NONE
        };
        self.claim_role(&report, RewardRole::Admin, caller, payout, now)
    }

    fn resolved_report(&self, report_id: ReportId) -> Result<Report, GovernanceError> {
        let report = self.registry.get(report_id)?;
        if !report.is_resolved() {
            return Err(GovernanceError::ReportNotResolved(report_id));
        }
        Ok(report.clone())
    }

    /// Shared tail of the non-staker claims.
    fn claim_role(
        &mut self,
        report: &Report,
        role: RewardRole,
        account: Address,
        payout: Payout,
        now: Timestamp,
    ) -> Result<Payout, GovernanceError> {
        if self.rewards.has_claimed(report.id, role, &account) {
            return Err(GovernanceError::AlreadyClaimed {
                report: report.id,
                account,
            });
        }
        if payout.is_empty() {
            return Err(GovernanceError::NothingToClaim {
                report: report.id,
                account,
            });
        }
        self.pay(report, account, payout)?;
        self.rewards.mark_claimed(report.id, role, account)?;
        self.record_claim(now, report.id, role, account, payout);
        Ok(payout)
    }

    fn pay(&self, report: &Report, to: Address, payout: Payout) -> Result<(), GovernanceError> {
        let legs = payout.transfers(
            self.settings.treasury,
            self.settings.protocol_token,
            report.token,
            to,
        );
        self.collaborators.ledger.transfer_batch(&legs)?;
        Ok(())
    }

    fn record_claim(
        &mut self,
        now: Timestamp,
        report_id: ReportId,
        role: RewardRole,
        account: Address,
        payout: Payout,
    ) {
        info!(
            report = %report_id,
            ?role,
            account = %account,
            reward = payout.reward,
            refund = payout.refund,
            "reward claimed"
        );
        self.emit(
            now,
            GovernanceEvent::RewardClaimed {
                report_id,
                role,
                account,
                amount: payout.reward,
                refund: payout.refund,
            },
        );
    }

    // ── Compensation ─────────────────────────────────────────────────────

    /// Pay the outstanding compensation of a contract address. Callable by anyone, since
    /// a contract may have no way to call in itself.
    pub fn retrieve_compensation_for_contracts(
        &mut self,
        address: Address,
        now: Timestamp,
    ) -> Result<u128, GovernanceError> {
        if !self.collaborators.probe.is_contract(&address) {
            warn!(address = %address, "compensation refused: not a contract");
            return Err(GovernanceError::InvalidClaimant {
                address,
                reason: ClaimantRejection::NotAContract,
            });
        }
        self.pay_compensation(address, now)
    }

    /// Pay the caller's own outstanding compensation.
    pub fn retrieve_compensation(
        &mut self,
        caller: Address,
        now: Timestamp,
    ) -> Result<u128, GovernanceError> {
        self.pay_compensation(caller, now)
    }

    fn pay_compensation(&mut self, address: Address, now: Timestamp) -> Result<u128, GovernanceError> {
        let amount = self.compensation.outstanding(&address)?;
        self.collaborators.ledger.transfer(Transfer {
            token: self.settings.protocol_token,
            from: self.settings.treasury,
            to: address,
            amount,
        })?;
        let settled = self.compensation.settle(&address);
        let compensation_percentage = self.settings.params.compensation_percentage;
        info!(
            address = %address,
            amount,
            reports = settled.len(),
            compensation_percentage,
            "compensation retrieved"
        );
        self.emit(
            now,
            GovernanceEvent::CompensationRetrieval {
                reported_address: address,
                compensation_percentage,
            },
        );
        Ok(amount)
    }

    fn emit(&mut self, at: Timestamp, event: GovernanceEvent) {
        let record = self.audit.append(at, event);
        self.bus.emit(record);
    }
}
