//! Nullable access registry.

use lss_external::AccessRegistry;
use lss_types::Address;
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory whitelist and DEX list. Both start empty.
#[derive(Default)]
pub struct NullAccessRegistry {
    whitelisted: Mutex<HashSet<Address>>,
    dex_listed: Mutex<HashSet<Address>>,
}

impl NullAccessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn whitelist(&self, address: Address) {
        self.whitelisted.lock().unwrap().insert(address);
    }

    pub fn list_dex(&self, address: Address) {
        self.dex_listed.lock().unwrap().insert(address);
    }
}

impl AccessRegistry for NullAccessRegistry {
    fn is_whitelisted(&self, address: &Address) -> bool {
        self.whitelisted.lock().unwrap().contains(address)
    }

    fn is_dex_listed(&self, address: &Address) -> bool {
        self.dex_listed.lock().unwrap().contains(address)
    }
}
