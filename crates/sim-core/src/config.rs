//! Configuration loading for the simulation.
//!
//! Engine-level knobs live here and can be loaded from a TOML file; the
//! behavioral constants of the decision engine stay in their own
//! constants modules and are not configurable at runtime.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete simulation configuration.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of agents to spawn
    pub agents: usize,
    /// Starting balance per agent, in credits
    pub initial_balance: f64,
    /// Number of rounds to simulate
    pub rounds: u64,
    /// Bonds are evaluated every this many rounds
    pub bond_eval_interval: u64,
    /// Run matches through the settlement oracle instead of offline
    pub verified: bool,
    /// Settlement-layer settings
    pub settlement: SettlementConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agents: 10,
            initial_balance: 10.0,
            rounds: 20,
            bond_eval_interval: 5,
            verified: false,
            settlement: SettlementConfig::default(),
        }
    }
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::TomlError)
    }
}

/// Settings for verified settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Ticks before a stalled game can be claimed by timeout
    pub timeout_ticks: u64,
    /// Hard per-round stake ceiling under verified settlement
    pub stake_ceiling: f64,
    /// Balance headroom reserved for settlement fees
    pub fee_buffer: f64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            timeout_ticks: 50,
            stake_ceiling: 0.5,
            fee_buffer: 0.05,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file
    IoError(std::io::Error),
    /// Error parsing TOML config
    TomlError(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::TomlError(e) => Some(e),
        }
    }
}
