//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the governance engine reaches through `lss-external` has an
//! in-memory stand-in here. The nullables:
//! - return deterministic values
//! - can be configured programmatically (balances, members, account kinds)
//! - never touch a chain, the filesystem or the network
//!
//! Usage: hand them to the engine wrapped in `Arc` in place of production adapters.

pub mod access;
pub mod clock;
pub mod ledger;
pub mod probe;
pub mod roster;

pub use access::NullAccessRegistry;
pub use clock::NullClock;
pub use ledger::NullLedger;
pub use probe::NullProbe;
pub use roster::NullRoster;
