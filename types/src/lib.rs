//! Fundamental types for the report governance protocol.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, account kinds, report identifiers, timestamps, protocol parameters,
//! and the integer percentage arithmetic every payout is computed with.

pub mod account;
pub mod address;
pub mod amount;
pub mod error;
pub mod params;
pub mod report_id;
pub mod time;

pub use account::AccountKind;
pub use address::Address;
pub use amount::{percent_of, proportional_share};
pub use error::TypesError;
pub use params::{CompensationPolicy, ProtocolParams};
pub use report_id::ReportId;
pub use time::Timestamp;
