//! Engine identity and parameters.

use crate::error::GovernanceError;
use lss_types::{Address, ProtocolParams};
use serde::{Deserialize, Serialize};

/// Who the engine is and which rules it applies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSettings {
    /// The designated Admin-class voter; also receives the admin reward pool.
    pub admin: Address,
    /// The engine's own account. Holds fees, stakes and seized funds, and is the spender
    /// participants approve.
    pub treasury: Address,
    /// Token fees, stakes, refunds and compensation are paid in.
    pub protocol_token: Address,
    pub params: ProtocolParams,
}

impl GovernanceSettings {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        self.params
            .validate()
            .map_err(|e| GovernanceError::InvalidSettings(e.to_string()))?;
        if self.treasury.is_zero() {
            return Err(GovernanceError::InvalidSettings(
                "treasury must not be the zero address".to_string(),
            ));
        }
        if self.protocol_token.is_zero() {
            return Err(GovernanceError::InvalidSettings(
                "protocol token must not be the zero address".to_string(),
            ));
        }
        if self.admin == self.treasury {
            return Err(GovernanceError::InvalidSettings(
                "admin and treasury must be distinct accounts".to_string(),
            ));
        }
        Ok(())
    }
}
