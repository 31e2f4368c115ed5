//! Abstract interfaces to the external collaborators of the governance engine.
//!
//! The engine never moves tokens, keeps allow-lists, or administers the committee itself.
//! Each of those services is reached through one of these traits; production deployments
//! supply adapters, tests supply the nullables.

pub mod access;
pub mod committee;
pub mod error;
pub mod ledger;
pub mod probe;

pub use access::AccessRegistry;
pub use committee::CommitteeRoster;
pub use error::LedgerError;
pub use ledger::{AssetLedger, Transfer};
pub use probe::CapabilityProbe;
