//! Governance node: hosts a [`GovernanceEngine`](lss_governance::GovernanceEngine).
//!
//! The node owns what the engine deliberately leaves out:
//! - TOML configuration of identity and protocol parameters
//! - Structured logging initialisation
//! - Snapshot persistence to disk
//! - Audit-log export as JSON lines

pub mod config;
pub mod error;
pub mod logging;
pub mod node;

pub use config::{NodeConfig, ParamsConfig};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::GovernanceNode;
