use chrono::{DateTime, Utc};
use config::{Config, ConfigError, Environment, FileFormat};
use serde::Deserialize;

use crate::types::{Money, Position};

pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";
pub const ENV_PREFIX: &str = "ROSTER";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub roster: RosterRules,
    #[serde(default)]
    pub transfer_window: TransferWindowConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Squad composition and budget limits for one competition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterRules {
    #[serde(default)]
    pub slots: SlotCapacity,
    #[serde(default = "default_bench_capacity")]
    pub bench_capacity: usize,
    #[serde(default = "default_budget")]
    pub budget: Money,
    // None means unlimited
    #[serde(default)]
    pub free_transfers: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlotCapacity {
    #[serde(default = "default_goalkeepers")]
    pub goalkeeper: usize,
    #[serde(default = "default_defenders")]
    pub defender: usize,
    #[serde(default = "default_midfielders")]
    pub midfielder: usize,
    #[serde(default = "default_forwards")]
    pub forward: usize,
}

/// Window in which roster swaps may be saved, `opens_at <= now < closes_at`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransferWindowConfig {
    #[serde(default = "closed_window_bound")]
    pub opens_at: DateTime<Utc>,
    #[serde(default = "closed_window_bound")]
    pub closes_at: DateTime<Utc>,
    // users allowed to save outside the window
    #[serde(default)]
    pub bypass_user_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_bench_capacity() -> usize {
    4
}

fn default_budget() -> Money {
    100_000
}

fn default_goalkeepers() -> usize {
    1
}

fn default_defenders() -> usize {
    5
}

fn default_midfielders() -> usize {
    5
}

fn default_forwards() -> usize {
    3
}

fn closed_window_bound() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

fn default_db_path() -> String {
    "roster.db".to_string()
}

impl Default for RosterRules {
    fn default() -> Self {
        Self {
            slots: SlotCapacity::default(),
            bench_capacity: default_bench_capacity(),
            budget: default_budget(),
            free_transfers: None,
        }
    }
}

impl Default for SlotCapacity {
    fn default() -> Self {
        Self {
            goalkeeper: default_goalkeepers(),
            defender: default_defenders(),
            midfielder: default_midfielders(),
            forward: default_forwards(),
        }
    }
}

impl SlotCapacity {
    pub fn for_position(&self, position: Position) -> usize {
        match position {
            Position::Goalkeeper => self.goalkeeper,
            Position::Defender => self.defender,
            Position::Midfielder => self.midfielder,
            Position::Forward => self.forward,
        }
    }
}

// A closed window: nothing passes without a bypass entry.
impl Default for TransferWindowConfig {
    fn default() -> Self {
        Self {
            opens_at: closed_window_bound(),
            closes_at: closed_window_bound(),
            bypass_user_ids: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("transfer_window.bypass_user_ids")
}

impl AppConfig {
    /// Reads `roster.toml` when present, then `ROSTER_` environment overrides
    /// (nested keys use `__`, e.g. `ROSTER_ROSTER__BUDGET`). The bypass list
    /// is comma separated: `ROSTER_TRANSFER_WINDOW__BYPASS_USER_IDS=a,b`.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(environment())
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::from_str(raw, FileFormat::Toml))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let window = &self.transfer_window;
        if window.closes_at < window.opens_at {
            return Err(ConfigError::Message(format!(
                "transfer_window.closes_at ({}) is before opens_at ({})",
                window.closes_at, window.opens_at
            )));
        }
        Ok(())
    }
}
