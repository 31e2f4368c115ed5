//! Address allow-lists consulted before a report is accepted.

use lss_types::Address;

/// Trait for the registry of addresses that can never be reported.
pub trait AccessRegistry: Send + Sync {
    /// Protocol-whitelisted addresses (bridges, treasuries, the engine itself).
    fn is_whitelisted(&self, address: &Address) -> bool;

    /// Addresses of listed exchanges.
    fn is_dex_listed(&self, address: &Address) -> bool;
}
