//! Nullable asset ledger: thread-safe in-memory balances for testing.

use lss_external::{AssetLedger, LedgerError, Transfer};
use lss_types::Address;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

type Balances = HashMap<(Address, Address), u128>;

/// An in-memory multi-token ledger.
///
/// Tokens need no registration to hold balances; `token_admin` only answers for tokens
/// registered with [`NullLedger::set_token_admin`]. [`NullLedger::fail_transfers`] makes
/// every movement fail with `Unavailable`, for exercising rollback paths.
#[derive(Default)]
pub struct NullLedger {
    balances: Mutex<Balances>,
    allowances: Mutex<HashMap<(Address, Address, Address), u128>>,
    token_admins: Mutex<HashMap<Address, Address>>,
    failing: AtomicBool,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `token` to `account` out of thin air.
    pub fn mint(&self, token: Address, account: Address, amount: u128) {
        *self
            .balances
            .lock()
            .unwrap()
            .entry((token, account))
            .or_default() += amount;
    }

    pub fn set_token_admin(&self, token: Address, admin: Address) {
        self.token_admins.lock().unwrap().insert(token, admin);
    }

    pub fn fail_transfers(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Sum of every balance held in `token`.
    pub fn supply(&self, token: &Address) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .iter()
            .filter(|((t, _), _)| t == token)
            .map(|(_, amount)| amount)
            .sum()
    }

    fn check_available(&self) -> Result<(), LedgerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("transfers disabled".to_string()));
        }
        Ok(())
    }

    fn apply(balances: &mut Balances, leg: &Transfer) -> Result<(), LedgerError> {
        let from = balances.get(&(leg.token, leg.from)).copied().unwrap_or(0);
        if from < leg.amount {
            return Err(LedgerError::InsufficientBalance {
                token: leg.token,
                account: leg.from,
                needed: leg.amount,
                available: from,
            });
        }
        balances.insert((leg.token, leg.from), from - leg.amount);
        let to = balances.entry((leg.token, leg.to)).or_default();
        *to = to.checked_add(leg.amount).ok_or(LedgerError::Overflow(leg.to))?;
        Ok(())
    }
}

impl AssetLedger for NullLedger {
    fn balance_of(&self, token: &Address, account: &Address) -> Result<u128, LedgerError> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&(*token, *account))
            .copied()
            .unwrap_or(0))
    }

    fn allowance(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<u128, LedgerError> {
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0))
    }

    fn approve(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.allowances
            .lock()
            .unwrap()
            .insert((*token, *owner, *spender), amount);
        Ok(())
    }

    fn transfer_from(
        &self,
        token: &Address,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.check_available()?;
        let mut allowances = self.allowances.lock().unwrap();
        let key = (*token, *owner, *spender);
        let available = allowances.get(&key).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientAllowance {
                token: *token,
                owner: *owner,
                spender: *spender,
                needed: amount,
                available,
            });
        }
        self.transfer(Transfer {
            token: *token,
            from: *owner,
            to: *to,
            amount,
        })?;
        allowances.insert(key, available - amount);
        Ok(())
    }

    fn transfer_batch(&self, transfers: &[Transfer]) -> Result<(), LedgerError> {
        self.check_available()?;
        let mut balances = self.balances.lock().unwrap();
        let mut staged = balances.clone();
        for leg in transfers {
            Self::apply(&mut staged, leg)?;
        }
        *balances = staged;
        Ok(())
    }

    fn token_admin(&self, token: &Address) -> Result<Option<Address>, LedgerError> {
        Ok(self.token_admins.lock().unwrap().get(token).copied())
    }
}
