use lss_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient balance of {token} on {account}: need {needed}, have {available}")]
    InsufficientBalance {
        token: Address,
        account: Address,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance of {token} from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        needed: u128,
        available: u128,
    },

    #[error("unknown token: {0}")]
    UnknownToken(Address),

    #[error("balance overflow on {0}")]
    Overflow(Address),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
