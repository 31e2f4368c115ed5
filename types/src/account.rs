//! Account kinds as reported by a capability probe.

use serde::{Deserialize, Serialize};

/// What kind of account lives at an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    /// Externally-controlled account (a key holder).
    External,
    /// A deployed contract whose code was in place before the probe ran.
    Contract,
    /// A contract whose deployment has not completed. Carries no code yet, so it
    /// cannot be told apart from an external account and is never trusted as one.
    UnderConstruction,
}

impl AccountKind {
    /// Whether this account may act through contract-only paths.
    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract)
    }
}
