//! Token ledger interface.

use crate::LedgerError;
use lss_types::Address;
use serde::{Deserialize, Serialize};

/// One leg of a ledger movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: u128,
}

/// Trait for the token ledger holding every asset the engine moves.
///
/// The engine acts as controller of the reported tokens: it may move funds out of a
/// reported address and out of its own treasury without an allowance. Funds belonging to
/// participants are only pulled through [`AssetLedger::transfer_from`].
pub trait AssetLedger: Send + Sync {
    /// Balance of `account` in `token`.
    fn balance_of(&self, token: &Address, account: &Address) -> Result<u128, LedgerError>;

    /// Amount `spender` may still pull from `owner`.
    fn allowance(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<u128, LedgerError>;

    /// Set the allowance of `spender` over `owner`'s funds.
    fn approve(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), LedgerError>;

    /// Move `amount` from `owner` to `to`, consuming `spender`'s allowance.
    fn transfer_from(
        &self,
        token: &Address,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), LedgerError>;

    /// Apply every transfer or none of them.
    fn transfer_batch(&self, transfers: &[Transfer]) -> Result<(), LedgerError>;

    /// Single transfer; a batch of one.
    fn transfer(&self, transfer: Transfer) -> Result<(), LedgerError> {
        self.transfer_batch(std::slice::from_ref(&transfer))
    }

    /// The administrator account of `token`, if the token is known.
    fn token_admin(&self, token: &Address) -> Result<Option<Address>, LedgerError>;
}
