//! Nullable capability probe.

use lss_external::CapabilityProbe;
use lss_types::{AccountKind, Address};
use std::collections::HashMap;
use std::sync::Mutex;

/// Answers from a configured table. Unconfigured addresses are externally owned accounts.
#[derive(Default)]
pub struct NullProbe {
    kinds: Mutex<HashMap<Address, AccountKind>>,
}

impl NullProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_kind(&self, address: Address, kind: AccountKind) {
        self.kinds.lock().unwrap().insert(address, kind);
    }

    /// Shorthand for `set_kind(address, AccountKind::Contract)`.
    pub fn deploy_contract(&self, address: Address) {
        self.set_kind(address, AccountKind::Contract);
    }
}

impl CapabilityProbe for NullProbe {
    fn account_kind(&self, address: &Address) -> AccountKind {
        self.kinds
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(AccountKind::External)
    }
}
