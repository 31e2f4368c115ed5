//! Integration tests driving the governance engine end to end against the nullable
//! collaborators: report → vote/stake → resolve → claims and compensation.

use lss_external::AssetLedger;
use lss_governance::{
    ClaimantRejection, ClassVerdict, Collaborators, EngineSnapshot, GovernanceEngine,
    GovernanceError, GovernanceEvent, GovernanceSettings, Payout, Resolution, VoteValue,
    VoterClass,
};
use lss_nullables::{NullAccessRegistry, NullClock, NullLedger, NullProbe, NullRoster};
use lss_types::{Address, CompensationPolicy, ProtocolParams, ReportId};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const fn addr(n: u8) -> Address {
    Address::from_bytes([n; 20])
}

const ADMIN: Address = addr(1);
const TREASURY: Address = addr(2);
const PROTOCOL_TOKEN: Address = addr(3);
const TOKEN: Address = addr(4);
const TOKEN_OWNER: Address = addr(5);
const REPORTER: Address = addr(6);
const TARGET: Address = addr(7);
const SECOND: Address = addr(8);
const MEMBERS: [Address; 4] = [addr(10), addr(11), addr(12), addr(13)];
const STAKER_A: Address = addr(20);
const STAKER_B: Address = addr(21);
const DAY: u64 = 86_400;

struct Harness {
    engine: GovernanceEngine,
    ledger: Arc<NullLedger>,
    access: Arc<NullAccessRegistry>,
    roster: Arc<NullRoster>,
    probe: Arc<NullProbe>,
    clock: NullClock,
}

impl Harness {
    fn new() -> Self {
        Self::with_params(ProtocolParams::default())
    }

    fn with_params(params: ProtocolParams) -> Self {
        let ledger = Arc::new(NullLedger::new());
        let access = Arc::new(NullAccessRegistry::new());
        let roster = Arc::new(NullRoster::with_members(MEMBERS));
        let probe = Arc::new(NullProbe::new());

        ledger.set_token_admin(TOKEN, TOKEN_OWNER);
        ledger.mint(TOKEN, TARGET, 10_000);
        for participant in [REPORTER, STAKER_A, STAKER_B] {
            ledger.mint(PROTOCOL_TOKEN, participant, 10_000);
            ledger
                .approve(&PROTOCOL_TOKEN, &participant, &TREASURY, 10_000)
                .unwrap();
        }

        let settings = GovernanceSettings {
            admin: ADMIN,
            treasury: TREASURY,
            protocol_token: PROTOCOL_TOKEN,
            params,
        };
        let collaborators = Collaborators {
            ledger: ledger.clone(),
            access: access.clone(),
            committee: roster.clone(),
            probe: probe.clone(),
        };
        let engine = GovernanceEngine::new(settings, collaborators).unwrap();
        Self {
            engine,
            ledger,
            access,
            roster,
            probe,
            clock: NullClock::new(1_000),
        }
    }

    fn report(&mut self) -> ReportId {
        self.engine
            .create_report(REPORTER, TOKEN, TARGET, None, self.clock.now())
            .unwrap()
    }

    fn vote(&mut self, caller: Address, id: ReportId, class: VoterClass, value: VoteValue) {
        self.engine
            .cast_vote(caller, id, class, value, self.clock.now())
            .unwrap();
    }

    /// Admin, token owner and every committee member vote `value`.
    fn vote_all(&mut self, id: ReportId, value: VoteValue) {
        self.vote(ADMIN, id, VoterClass::Admin, value);
        self.vote(TOKEN_OWNER, id, VoterClass::TokenOwner, value);
        for member in MEMBERS {
            self.vote(member, id, VoterClass::Committee, value);
        }
    }

    fn resolve(&mut self, id: ReportId) -> Result<Resolution, GovernanceError> {
        self.engine.resolve_report(id, self.clock.now())
    }

    fn balance(&self, token: Address, account: Address) -> u128 {
        self.ledger.balance_of(&token, &account).unwrap()
    }
}

// ---------------------------------------------------------------------------
// Report creation
// ---------------------------------------------------------------------------

#[test]
fn create_report_collects_fee() {
    let mut h = Harness::new();
    let id = h.report();
    assert_eq!(id, ReportId::new(1));
    assert_eq!(h.balance(PROTOCOL_TOKEN, TREASURY), 1_000);
    assert_eq!(h.balance(PROTOCOL_TOKEN, REPORTER), 9_000);

    let report = h.engine.report(id).unwrap();
    assert_eq!(report.token_owner, TOKEN_OWNER);
    assert_eq!(report.resolution, Resolution::Unset);
    assert!(!h.engine.is_report_solved(id).unwrap());
    assert!(matches!(
        h.engine.audit_log().last().map(|r| &r.event),
        Some(GovernanceEvent::ReportCreated { reported_address, .. }) if *reported_address == TARGET
    ));
}

#[test]
fn protected_addresses_cannot_be_reported() {
    let mut h = Harness::new();
    h.access.whitelist(TARGET);
    h.access.list_dex(SECOND);
    let now = h.clock.now();

    let err = h
        .engine
        .create_report(REPORTER, TOKEN, TARGET, None, now)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::CannotReportWhitelisted(a) if a == TARGET));

    let err = h
        .engine
        .create_report(REPORTER, TOKEN, addr(30), Some(SECOND), now)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::CannotReportDex(a) if a == SECOND));
    assert!(h.engine.reports().is_empty());
    assert_eq!(h.balance(PROTOCOL_TOKEN, TREASURY), 0);
}

#[test]
fn duplicate_open_report_rejected() {
    let mut h = Harness::new();
    let first = h.report();
    let err = h
        .engine
        .create_report(STAKER_A, TOKEN, TARGET, None, h.clock.now())
        .unwrap_err();
    assert!(matches!(err, GovernanceError::ReportAlreadyExists { existing, .. } if existing == first));
}

#[test]
fn unknown_token_rejected() {
    let mut h = Harness::new();
    let err = h
        .engine
        .create_report(REPORTER, addr(99), TARGET, None, h.clock.now())
        .unwrap_err();
    assert!(matches!(err, GovernanceError::UnknownToken(t) if t == addr(99)));
}

#[test]
fn fee_failure_creates_nothing() {
    let mut h = Harness::new();
    h.ledger.fail_transfers(true);
    let err = h
        .engine
        .create_report(REPORTER, TOKEN, TARGET, None, h.clock.now())
        .unwrap_err();
    assert!(matches!(err, GovernanceError::TransferFailed(_)));
    assert!(h.engine.reports().is_empty());
    assert!(h.engine.audit_log().is_empty());
}

#[test]
fn second_address_equal_to_first_is_dropped() {
    let mut h = Harness::new();
    let id = h
        .engine
        .create_report(REPORTER, TOKEN, TARGET, Some(TARGET), h.clock.now())
        .unwrap();
    assert_eq!(h.engine.report(id).unwrap().second_reported_address, None);
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

#[test]
fn votes_require_class_membership() {
    let mut h = Harness::new();
    let id = h.report();
    let now = h.clock.now();

    let err = h
        .engine
        .cast_vote(REPORTER, id, VoterClass::Admin, VoteValue::Positive, now)
        .unwrap_err();
    assert_eq!(err.kind(), lss_governance::ErrorKind::Unauthorized);

    for (caller, class) in [
        (REPORTER, VoterClass::Admin),
        (ADMIN, VoterClass::TokenOwner),
        (addr(40), VoterClass::Committee),
    ] {
        let err = h
            .engine
            .cast_vote(caller, id, class, VoteValue::Positive, now)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::NotAuthorized { .. }));
    }

    let err = h
        .engine
        .cast_vote(ADMIN, ReportId::new(9), VoterClass::Admin, VoteValue::Positive, now)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::ReportNotFound(_)));
}

#[test]
fn revote_replaces_previous_value() {
    let mut h = Harness::new();
    let id = h.report();
    h.vote(ADMIN, id, VoterClass::Admin, VoteValue::Positive);
    h.clock.advance(10);
    h.vote(ADMIN, id, VoterClass::Admin, VoteValue::Negative);
    assert_eq!(
        h.engine.class_verdict(id, VoterClass::Admin).unwrap(),
        ClassVerdict::Negative
    );
}

#[test]
fn committee_tie_resolves_negative() {
    let mut h = Harness::new();
    let id = h.report();
    h.vote(MEMBERS[0], id, VoterClass::Committee, VoteValue::Positive);
    h.vote(MEMBERS[1], id, VoterClass::Committee, VoteValue::Positive);
    h.vote(MEMBERS[2], id, VoterClass::Committee, VoteValue::Negative);
    assert_eq!(
        h.engine.class_verdict(id, VoterClass::Committee).unwrap(),
        ClassVerdict::NoVote
    );
    h.vote(MEMBERS[3], id, VoterClass::Committee, VoteValue::Negative);
    assert_eq!(
        h.engine.class_verdict(id, VoterClass::Committee).unwrap(),
        ClassVerdict::Negative
    );
}

#[test]
fn committee_rotation_discounts_former_members() {
    let mut h = Harness::new();
    let id = h.report();
    for member in &MEMBERS[..3] {
        h.vote(*member, id, VoterClass::Committee, VoteValue::Positive);
    }
    assert_eq!(
        h.engine.class_verdict(id, VoterClass::Committee).unwrap(),
        ClassVerdict::Positive
    );

    for member in &MEMBERS[..3] {
        h.roster.remove(member);
    }
    h.roster.add(addr(14));
    h.roster.add(addr(15));
    assert_eq!(
        h.engine.class_verdict(id, VoterClass::Committee).unwrap(),
        ClassVerdict::NoVote
    );

    h.vote(addr(14), id, VoterClass::Committee, VoteValue::Negative);
    h.vote(addr(15), id, VoterClass::Committee, VoteValue::Negative);
    h.vote(ADMIN, id, VoterClass::Admin, VoteValue::Positive);
    h.vote(TOKEN_OWNER, id, VoterClass::TokenOwner, VoteValue::Negative);
    assert_eq!(
        h.engine.class_verdict(id, VoterClass::Committee).unwrap(),
        ClassVerdict::Negative
    );
    assert_eq!(h.resolve(id).unwrap(), Resolution::NotMalicious);
    // Former members' votes are not settled on.
    assert!(h
        .engine
        .tally()
        .vote_of(id, VoterClass::Committee, &MEMBERS[0])
        .is_none());
}

#[test]
fn votes_after_expiry_or_resolution_rejected() {
    let mut h = Harness::new();
    let id = h.report();
    h.clock.advance(DAY);
    let err = h
        .engine
        .cast_vote(ADMIN, id, VoterClass::Admin, VoteValue::Positive, h.clock.now())
        .unwrap_err();
    assert!(matches!(err, GovernanceError::ReportExpired(_)));

    h.resolve(id).unwrap();
    let err = h
        .engine
        .cast_vote(ADMIN, id, VoterClass::Admin, VoteValue::Positive, h.clock.now())
        .unwrap_err();
    assert!(matches!(err, GovernanceError::ReportAlreadyResolved(_)));
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[test]
fn resolution_waits_for_verdicts_or_timeout() {
    let mut h = Harness::new();
    let id = h.report();
    h.vote(ADMIN, id, VoterClass::Admin, VoteValue::Positive);
    assert!(matches!(
        h.resolve(id),
        Err(GovernanceError::ResolutionNotReady(_))
    ));
    h.clock.advance(DAY - 1);
    assert!(matches!(
        h.resolve(id),
        Err(GovernanceError::ResolutionNotReady(_))
    ));
    h.clock.advance(1);
    // Admin positive, the other classes abstain: one of one → malicious.
    assert_eq!(h.resolve(id).unwrap(), Resolution::Malicious);
}

#[test]
fn timeout_without_votes_is_not_malicious() {
    let mut h = Harness::new();
    let id = h.report();
    let created = h.engine.report(id).unwrap().created_at;
    h.clock.expire(created, DAY);
    assert_eq!(h.resolve(id).unwrap(), Resolution::NotMalicious);
    assert_eq!(h.balance(TOKEN, TARGET), 10_000);
}

#[test]
fn resolution_is_written_once() {
    let mut h = Harness::new();
    let id = h.report();
    h.vote_all(id, VoteValue::Negative);
    assert_eq!(h.resolve(id).unwrap(), Resolution::NotMalicious);
    assert!(matches!(
        h.resolve(id),
        Err(GovernanceError::ReportAlreadyResolved(_))
    ));
    let resolved = h
        .engine
        .audit_log()
        .records()
        .iter()
        .filter(|r| matches!(r.event, GovernanceEvent::ReportResolved { .. }))
        .count();
    assert_eq!(resolved, 1);
}

#[test]
fn seizure_failure_leaves_report_open() {
    let mut h = Harness::new();
    let id = h.report();
    h.vote_all(id, VoteValue::Positive);
    h.ledger.fail_transfers(true);
    assert!(matches!(h.resolve(id), Err(GovernanceError::TransferFailed(_))));
    assert!(!h.engine.is_report_solved(id).unwrap());
    assert!(h.engine.compensation_book().entitlements(&TARGET).is_empty());

    h.ledger.fail_transfers(false);
    assert_eq!(h.resolve(id).unwrap(), Resolution::Malicious);
}

#[test]
fn resolved_target_can_be_reported_again() {
    let mut h = Harness::new();
    let id = h.report();
    h.vote_all(id, VoteValue::Negative);
    h.resolve(id).unwrap();
    assert_eq!(h.report(), ReportId::new(2));
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

#[test]
fn malicious_report_pays_every_role() {
    let mut h = Harness::new();
    let id = h.report();
    let now = h.clock.now();
    h.engine.stake(STAKER_A, id, 100, now).unwrap();
    h.engine.stake(STAKER_B, id, 200, now).unwrap();

    h.vote(ADMIN, id, VoterClass::Admin, VoteValue::Positive);
    h.vote(TOKEN_OWNER, id, VoterClass::TokenOwner, VoteValue::Positive);
    for member in &MEMBERS[..3] {
        h.vote(*member, id, VoterClass::Committee, VoteValue::Positive);
    }
    h.vote(MEMBERS[3], id, VoterClass::Committee, VoteValue::Negative);

    assert_eq!(h.resolve(id).unwrap(), Resolution::Malicious);
    assert_eq!(h.engine.report(id).unwrap().retrieved_funds, 10_000);
    assert_eq!(h.balance(TOKEN, TARGET), 0);
    assert_eq!(h.balance(TOKEN, TREASURY), 10_000);

    // Pools on 10_000 retrieved: reporter 200, stakers 200, committee 200, admin 1_000.
    let now = h.clock.now();
    assert_eq!(
        h.engine.claim_reward(id, STAKER_A, now).unwrap(),
        Payout { refund: 100, reward: 66 }
    );
    assert_eq!(
        h.engine.claim_reward(id, STAKER_B, now).unwrap(),
        Payout { refund: 200, reward: 133 }
    );
    // 200 of the fee stays reserved for compensating TARGET.
    assert_eq!(
        h.engine.claim_reporter_reward(id, REPORTER, now).unwrap(),
        Payout { refund: 800, reward: 200 }
    );
    assert_eq!(
        h.engine.claim_committee_reward(id, MEMBERS[0], now).unwrap(),
        Payout { refund: 0, reward: 66 }
    );
    assert!(matches!(
        h.engine.claim_committee_reward(id, MEMBERS[3], now),
        Err(GovernanceError::NothingToClaim { .. })
    ));
    assert!(matches!(
        h.engine.claim_admin_reward(id, REPORTER, now),
        Err(GovernanceError::NothingToClaim { .. })
    ));
    assert_eq!(
        h.engine.claim_admin_reward(id, ADMIN, now).unwrap(),
        Payout { refund: 0, reward: 1_000 }
    );

    assert_eq!(h.balance(PROTOCOL_TOKEN, STAKER_A), 10_000);
    assert_eq!(h.balance(TOKEN, STAKER_A), 66);
    assert_eq!(h.balance(PROTOCOL_TOKEN, REPORTER), 9_800);
    assert_eq!(h.balance(PROTOCOL_TOKEN, TREASURY), 200);
    assert_eq!(h.balance(TOKEN, ADMIN), 1_000);
    assert_eq!(h.balance(TOKEN, TREASURY), 10_000 - 66 - 133 - 200 - 66 - 1_000);
}

#[test]
fn malicious_report_funds_compensation_and_every_claim() {
    let mut h = Harness::new();
    h.probe.deploy_contract(TARGET);
    let now = h.clock.now();
    let id = h
        .engine
        .create_report(REPORTER, TOKEN, TARGET, Some(SECOND), now)
        .unwrap();
    h.engine.stake(STAKER_A, id, 100, now).unwrap();
    h.engine.stake(STAKER_B, id, 200, now).unwrap();
    h.vote_all(id, VoteValue::Positive);
    assert_eq!(h.resolve(id).unwrap(), Resolution::Malicious);
    assert_eq!(h.balance(PROTOCOL_TOKEN, TREASURY), 1_300);

    // Compensation first, then every reward: each must still be covered.
    let now = h.clock.now();
    assert_eq!(
        h.engine.retrieve_compensation_for_contracts(TARGET, now).unwrap(),
        200
    );
    assert_eq!(h.engine.retrieve_compensation(SECOND, now).unwrap(), 200);
    assert_eq!(
        h.engine.claim_reporter_reward(id, REPORTER, now).unwrap(),
        Payout { refund: 600, reward: 200 }
    );
    h.engine.claim_reward(id, STAKER_A, now).unwrap();
    h.engine.claim_reward(id, STAKER_B, now).unwrap();
    for member in MEMBERS {
        assert_eq!(
            h.engine.claim_committee_reward(id, member, now).unwrap(),
            Payout { refund: 0, reward: 50 }
        );
    }
    h.engine.claim_admin_reward(id, ADMIN, now).unwrap();

    // The fee and the stakes are paid out exactly; nothing came from other funds.
    assert_eq!(h.balance(PROTOCOL_TOKEN, TREASURY), 0);
    assert_eq!(h.balance(PROTOCOL_TOKEN, TARGET), 200);
    assert_eq!(h.balance(PROTOCOL_TOKEN, SECOND), 200);
    assert_eq!(h.balance(PROTOCOL_TOKEN, REPORTER), 9_600);
    assert_eq!(h.ledger.supply(&PROTOCOL_TOKEN), 30_000);
    assert_eq!(
        h.balance(TOKEN, TREASURY),
        10_000 - 200 - 66 - 133 - 4 * 50 - 1_000
    );
}

#[test]
fn compensation_before_reporter_claim_leaves_other_reports_untouched() {
    let mut h = Harness::new();
    h.probe.deploy_contract(TARGET);
    let first = h.report();
    h.vote_all(first, VoteValue::Positive);
    h.resolve(first).unwrap();
    // A second, still open report keeps its fee escrowed in the treasury.
    let open = h
        .engine
        .create_report(REPORTER, TOKEN, addr(31), None, h.clock.now())
        .unwrap();

    let now = h.clock.now();
    h.engine.retrieve_compensation_for_contracts(TARGET, now).unwrap();
    h.engine.claim_reporter_reward(first, REPORTER, now).unwrap();
    assert_eq!(h.balance(PROTOCOL_TOKEN, TREASURY), 1_000);
    assert!(!h.engine.is_report_solved(open).unwrap());
}

#[test]
fn stake_claimed_at_most_once() {
    let mut h = Harness::new();
    let id = h.report();
    h.engine.stake(STAKER_A, id, 100, h.clock.now()).unwrap();
    h.vote_all(id, VoteValue::Positive);
    h.resolve(id).unwrap();

    let now = h.clock.now();
    h.engine.claim_reward(id, STAKER_A, now).unwrap();
    assert!(matches!(
        h.engine.claim_reward(id, STAKER_A, now),
        Err(GovernanceError::AlreadyClaimed { .. })
    ));
    assert!(matches!(
        h.engine.claim_reward(id, STAKER_B, now),
        Err(GovernanceError::NoStake { .. })
    ));
    h.engine.claim_reporter_reward(id, REPORTER, now).unwrap();
    assert!(matches!(
        h.engine.claim_reporter_reward(id, REPORTER, now),
        Err(GovernanceError::AlreadyClaimed { .. })
    ));
}

#[test]
fn claims_require_resolution() {
    let mut h = Harness::new();
    let id = h.report();
    h.engine.stake(STAKER_A, id, 100, h.clock.now()).unwrap();
    assert!(matches!(
        h.engine.claim_reward(id, STAKER_A, h.clock.now()),
        Err(GovernanceError::ReportNotResolved(_))
    ));
}

#[test]
fn stake_preconditions() {
    let mut h = Harness::new();
    let id = h.report();
    let now = h.clock.now();
    assert!(matches!(
        h.engine.stake(REPORTER, id, 100, now),
        Err(GovernanceError::ReporterCannotStake(_))
    ));
    assert!(matches!(
        h.engine.stake(STAKER_A, id, 0, now),
        Err(GovernanceError::StakeTooSmall { min: 1, .. })
    ));
    h.engine.stake(STAKER_A, id, 100, now).unwrap();
    assert!(matches!(
        h.engine.stake(STAKER_A, id, 100, now),
        Err(GovernanceError::AlreadyStaked { .. })
    ));
    assert_eq!(h.balance(PROTOCOL_TOKEN, STAKER_A), 9_900);

    h.clock.advance(DAY);
    assert!(matches!(
        h.engine.stake(STAKER_B, id, 100, h.clock.now()),
        Err(GovernanceError::ReportExpired(_))
    ));
}

#[test]
fn losing_stakes_forfeited_by_default() {
    let mut h = Harness::new();
    let id = h.report();
    h.engine.stake(STAKER_A, id, 100, h.clock.now()).unwrap();
    h.vote_all(id, VoteValue::Negative);
    h.resolve(id).unwrap();
    let now = h.clock.now();
    assert!(matches!(
        h.engine.claim_reward(id, STAKER_A, now),
        Err(GovernanceError::NothingToClaim { .. })
    ));
    assert!(matches!(
        h.engine.claim_reporter_reward(id, REPORTER, now),
        Err(GovernanceError::NothingToClaim { .. })
    ));
}

#[test]
fn losing_stakes_refunded_without_forfeiture() {
    let mut h = Harness::with_params(ProtocolParams {
        forfeit_losing_stakes: false,
        ..ProtocolParams::default()
    });
    let id = h.report();
    h.engine.stake(STAKER_A, id, 100, h.clock.now()).unwrap();
    h.vote_all(id, VoteValue::Negative);
    h.resolve(id).unwrap();
    assert_eq!(
        h.engine.claim_reward(id, STAKER_A, h.clock.now()).unwrap(),
        Payout { refund: 100, reward: 0 }
    );
}

#[test]
fn failed_payout_leaves_claim_open() {
    let mut h = Harness::new();
    let id = h.report();
    h.engine.stake(STAKER_A, id, 100, h.clock.now()).unwrap();
    h.vote_all(id, VoteValue::Positive);
    h.resolve(id).unwrap();

    h.ledger.fail_transfers(true);
    assert!(matches!(
        h.engine.claim_reward(id, STAKER_A, h.clock.now()),
        Err(GovernanceError::TransferFailed(_))
    ));
    assert!(!h.engine.stakes().get(id, &STAKER_A).unwrap().claimed);
    h.ledger.fail_transfers(false);
    assert!(h.engine.claim_reward(id, STAKER_A, h.clock.now()).is_ok());
}

// ---------------------------------------------------------------------------
// Compensation
// ---------------------------------------------------------------------------

#[test]
fn not_malicious_contract_retrieves_compensation() {
    let mut h = Harness::new();
    h.probe.deploy_contract(TARGET);
    let id = h.report();
    h.vote_all(id, VoteValue::Negative);
    assert_eq!(h.resolve(id).unwrap(), Resolution::NotMalicious);
    assert!(h.engine.is_report_solved(id).unwrap());
    assert_eq!(h.engine.report_resolution(id).unwrap(), Resolution::NotMalicious);

    let paid = h
        .engine
        .retrieve_compensation_for_contracts(TARGET, h.clock.now())
        .unwrap();
    assert_eq!(paid, 1_000 * 20 / 100);
    assert_eq!(h.balance(PROTOCOL_TOKEN, TARGET), 200);
    assert_eq!(h.engine.compensation_percentage(), 20);
    assert_eq!(
        h.engine.audit_log().last().map(|r| r.event.clone()),
        Some(GovernanceEvent::CompensationRetrieval {
            reported_address: TARGET,
            compensation_percentage: 20,
        })
    );

    assert!(matches!(
        h.engine.retrieve_compensation_for_contracts(TARGET, h.clock.now()),
        Err(GovernanceError::AlreadyCompensated(_))
    ));
}

#[test]
fn externally_owned_target_is_invalid_claimant() {
    let mut h = Harness::new();
    let id = h.report();
    h.vote_all(id, VoteValue::Negative);
    h.resolve(id).unwrap();

    let err = h
        .engine
        .retrieve_compensation_for_contracts(TARGET, h.clock.now())
        .unwrap_err();
    assert!(matches!(
        err,
        GovernanceError::InvalidClaimant {
            address,
            reason: ClaimantRejection::NotAContract,
        } if address == TARGET
    ));
    assert_eq!(h.balance(PROTOCOL_TOKEN, TARGET), 0);
}

#[test]
fn invalid_claimant_regardless_of_outcome() {
    let mut h = Harness::new();
    let now = h.clock.now();
    // No report at all.
    assert!(matches!(
        h.engine.retrieve_compensation_for_contracts(addr(50), now),
        Err(GovernanceError::InvalidClaimant { .. })
    ));
    // Malicious verdict.
    let id = h.report();
    h.vote_all(id, VoteValue::Positive);
    h.resolve(id).unwrap();
    assert!(matches!(
        h.engine.retrieve_compensation_for_contracts(TARGET, now),
        Err(GovernanceError::InvalidClaimant { .. })
    ));
    // Under construction counts as not a contract.
    h.probe
        .set_kind(TARGET, lss_types::AccountKind::UnderConstruction);
    assert!(matches!(
        h.engine.retrieve_compensation_for_contracts(TARGET, now),
        Err(GovernanceError::InvalidClaimant { .. })
    ));
}

#[test]
fn compensation_is_a_floor() {
    let mut h = Harness::with_params(ProtocolParams {
        reporting_amount: 999,
        ..ProtocolParams::default()
    });
    h.probe.deploy_contract(TARGET);
    let id = h.report();
    h.vote_all(id, VoteValue::Negative);
    h.resolve(id).unwrap();
    assert_eq!(
        h.engine
            .retrieve_compensation_for_contracts(TARGET, h.clock.now())
            .unwrap(),
        199
    );
}

#[test]
fn compensation_requires_a_resolved_report() {
    let mut h = Harness::new();
    h.probe.deploy_contract(TARGET);
    h.report();
    assert!(matches!(
        h.engine.retrieve_compensation_for_contracts(TARGET, h.clock.now()),
        Err(GovernanceError::NoCompensationAvailable(_))
    ));
}

#[test]
fn externally_owned_target_claims_for_itself() {
    let mut h = Harness::new();
    let id = h
        .engine
        .create_report(REPORTER, TOKEN, TARGET, Some(SECOND), h.clock.now())
        .unwrap();
    h.vote_all(id, VoteValue::Negative);
    h.resolve(id).unwrap();
    let now = h.clock.now();
    assert_eq!(h.engine.retrieve_compensation(TARGET, now).unwrap(), 200);
    assert_eq!(h.engine.retrieve_compensation(SECOND, now).unwrap(), 200);
    assert!(matches!(
        h.engine.retrieve_compensation(TARGET, now),
        Err(GovernanceError::AlreadyCompensated(_))
    ));
}

#[test]
fn not_malicious_only_policy_blocks_compensation_on_malicious() {
    let mut h = Harness::with_params(ProtocolParams {
        compensation_policy: CompensationPolicy::NotMaliciousOnly,
        ..ProtocolParams::default()
    });
    h.probe.deploy_contract(TARGET);
    let id = h.report();
    h.vote_all(id, VoteValue::Positive);
    h.resolve(id).unwrap();
    assert!(matches!(
        h.engine.retrieve_compensation_for_contracts(TARGET, h.clock.now()),
        Err(GovernanceError::NoCompensationAvailable(_))
    ));
}

#[test]
fn failed_compensation_transfer_keeps_entitlement() {
    let mut h = Harness::new();
    h.probe.deploy_contract(TARGET);
    let id = h.report();
    h.vote_all(id, VoteValue::Negative);
    h.resolve(id).unwrap();
    h.ledger.fail_transfers(true);
    assert!(matches!(
        h.engine.retrieve_compensation_for_contracts(TARGET, h.clock.now()),
        Err(GovernanceError::TransferFailed(_))
    ));
    h.ledger.fail_transfers(false);
    assert_eq!(
        h.engine
            .retrieve_compensation_for_contracts(TARGET, h.clock.now())
            .unwrap(),
        200
    );
}

// ---------------------------------------------------------------------------
// Events and snapshots
// ---------------------------------------------------------------------------

#[test]
fn listeners_see_every_record() {
    let mut h = Harness::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    h.engine.subscribe(Box::new(move |record| {
        sink.lock().unwrap().push(record.event.name());
    }));
    let id = h.report();
    h.vote(ADMIN, id, VoterClass::Admin, VoteValue::Negative);
    assert_eq!(*seen.lock().unwrap(), vec!["ReportCreated", "VoteCast"]);
}

#[test]
fn snapshot_restores_every_record() {
    let mut h = Harness::new();
    h.probe.deploy_contract(TARGET);
    let id = h.report();
    h.engine.stake(STAKER_A, id, 100, h.clock.now()).unwrap();
    h.vote_all(id, VoteValue::Negative);
    h.resolve(id).unwrap();

    let bytes = h.engine.snapshot().to_bytes().unwrap();
    let restored = EngineSnapshot::from_bytes(&bytes).unwrap();
    let collaborators = Collaborators {
        ledger: h.ledger.clone(),
        access: h.access.clone(),
        committee: Arc::new(NullRoster::with_members(MEMBERS)),
        probe: h.probe.clone(),
    };
    let mut engine =
        GovernanceEngine::from_snapshot(h.engine.settings().clone(), collaborators, restored)
            .unwrap();

    assert_eq!(engine.report(id).unwrap(), h.engine.report(id).unwrap());
    assert_eq!(engine.audit_log().len(), h.engine.audit_log().len());
    assert_eq!(
        engine.stakes().get(id, &STAKER_A),
        h.engine.stakes().get(id, &STAKER_A)
    );
    assert!(matches!(
        engine.resolve_report(id, h.clock.now()),
        Err(GovernanceError::ReportAlreadyResolved(_))
    ));
    assert_eq!(
        engine
            .retrieve_compensation_for_contracts(TARGET, h.clock.now())
            .unwrap(),
        200
    );
}
