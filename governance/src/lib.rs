//! Report governance: voting on flagged addresses and settling the outcome.
//!
//! Lifecycle of a report:
//! 1. **Report**: a reporter pays the reporting fee to flag an address for a token.
//! 2. **Vote**: Admin, the token's owner and the committee vote; participants may stake.
//! 3. **Resolve**: anyone triggers resolution once every class has a verdict or the report
//!    lifetime elapsed. The verdict is written exactly once.
//! 4. **Settle**: reporters, stakers, committee members and the admin claim rewards;
//!    reported addresses retrieve compensation.
//!
//! Token movement, allow-lists, committee membership and account probing are external
//! collaborators reached through the `lss-external` traits.

pub mod compensation;
pub mod engine;
pub mod error;
pub mod events;
pub mod report;
pub mod resolution;
pub mod rewards;
pub mod settings;
pub mod snapshot;
pub mod staking;
pub mod tally;

pub use compensation::{CompensationBook, CompensationEntitlement};
pub use engine::{Collaborators, GovernanceEngine};
pub use error::{ClaimantRejection, ErrorKind, GovernanceError};
pub use events::{AuditLog, AuditRecord, EventBus, GovernanceEvent};
pub use report::{Report, ReportRegistry, ReportStatus, Resolution};
pub use resolution::{Readiness, ResolutionEngine};
pub use rewards::{Payout, RewardPools, RewardRole};
pub use settings::GovernanceSettings;
pub use snapshot::EngineSnapshot;
pub use staking::{Stake, StakeBook, StakeLedger};
pub use tally::{ClassVerdict, ClassVerdicts, Vote, VoteValue, VoterClass, VotingTally};
