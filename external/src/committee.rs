//! Committee membership.

use lss_types::Address;

/// Trait for the committee roster. Membership is administered elsewhere; the engine only
/// reads it to authorize committee votes and to size majorities.
pub trait CommitteeRoster: Send + Sync {
    fn is_member(&self, account: &Address) -> bool;

    fn member_count(&self) -> u32;
}
