//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use lss_governance::GovernanceSettings;
use lss_types::{Address, CompensationPolicy, ProtocolParams};

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a governance node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Admin-class voter, `0x`-prefixed hex.
    #[serde(default)]
    pub admin: String,

    /// Engine treasury account, `0x`-prefixed hex.
    #[serde(default)]
    pub treasury: String,

    /// Token fees, stakes and compensation are paid in, `0x`-prefixed hex.
    #[serde(default)]
    pub protocol_token: String,

    /// Where the engine snapshot is kept. No persistence when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,

    #[serde(default)]
    pub params: ParamsConfig,
}

/// The `[params]` table. TOML integers are 64-bit, so amounts are `u64` here and widen
/// into [`ProtocolParams`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsConfig {
    pub reporting_amount: u64,
    pub report_lifetime_secs: u64,
    pub min_stake_amount: u64,
    pub forfeit_losing_stakes: bool,
    pub reporter_reward_percentage: u32,
    pub stakers_reward_percentage: u32,
    pub committee_reward_percentage: u32,
    pub admin_reward_percentage: u32,
    pub compensation_percentage: u32,
    pub compensation_policy: CompensationPolicy,
}

impl ParamsConfig {
    pub fn to_params(&self) -> ProtocolParams {
        ProtocolParams {
            reporting_amount: self.reporting_amount as u128,
            report_lifetime_secs: self.report_lifetime_secs,
            min_stake_amount: self.min_stake_amount as u128,
            forfeit_losing_stakes: self.forfeit_losing_stakes,
            reporter_reward_percentage: self.reporter_reward_percentage,
            stakers_reward_percentage: self.stakers_reward_percentage,
            committee_reward_percentage: self.committee_reward_percentage,
            admin_reward_percentage: self.admin_reward_percentage,
            compensation_percentage: self.compensation_percentage,
            compensation_policy: self.compensation_policy,
        }
    }
}

impl TryFrom<&ProtocolParams> for ParamsConfig {
    type Error = NodeError;

    fn try_from(params: &ProtocolParams) -> Result<Self, NodeError> {
        let amount = |name: &str, value: u128| {
            u64::try_from(value)
                .map_err(|_| NodeError::Config(format!("{name} {value} does not fit in TOML")))
        };
        Ok(Self {
            reporting_amount: amount("reporting_amount", params.reporting_amount)?,
            report_lifetime_secs: params.report_lifetime_secs,
            min_stake_amount: amount("min_stake_amount", params.min_stake_amount)?,
            forfeit_losing_stakes: params.forfeit_losing_stakes,
            reporter_reward_percentage: params.reporter_reward_percentage,
            stakers_reward_percentage: params.stakers_reward_percentage,
            committee_reward_percentage: params.committee_reward_percentage,
            admin_reward_percentage: params.admin_reward_percentage,
            compensation_percentage: params.compensation_percentage,
            compensation_policy: params.compensation_policy,
        })
    }
}

impl Default for ParamsConfig {
    fn default() -> Self {
        let defaults = ProtocolParams::protocol_defaults();
        Self {
            reporting_amount: 1_000,
            report_lifetime_secs: defaults.report_lifetime_secs,
            min_stake_amount: 1,
            forfeit_losing_stakes: defaults.forfeit_losing_stakes,
            reporter_reward_percentage: defaults.reporter_reward_percentage,
            stakers_reward_percentage: defaults.stakers_reward_percentage,
            committee_reward_percentage: defaults.committee_reward_percentage,
            admin_reward_percentage: defaults.admin_reward_percentage,
            compensation_percentage: defaults.compensation_percentage,
            compensation_policy: defaults.compensation_policy,
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    /// Engine identity and parameters, parsed and validated.
    pub fn settings(&self) -> Result<GovernanceSettings, NodeError> {
        let settings = GovernanceSettings {
            admin: Address::parse(&self.admin)?,
            treasury: Address::parse(&self.treasury)?,
            protocol_token: Address::parse(&self.protocol_token)?,
            params: self.params.to_params(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            admin: String::new(),
            treasury: String::new(),
            protocol_token: String::new(),
            snapshot_path: None,
            params: ParamsConfig::default(),
        }
    }
}
