//! Account capability probing.

use lss_types::{AccountKind, Address};

/// Trait for determining what kind of account lives at an address.
///
/// Implementations must be side-effect free and must answer from state established before
/// the call began (deployed code), never from anything the probed address can influence
/// while the probe runs. A contract still under construction has no code yet and must be
/// reported as [`AccountKind::UnderConstruction`].
pub trait CapabilityProbe: Send + Sync {
    fn account_kind(&self, address: &Address) -> AccountKind;

    fn is_contract(&self, address: &Address) -> bool {
        self.account_kind(address).is_contract()
    }
}
