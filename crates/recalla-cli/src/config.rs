//! CLI configuration
//!
//! Resolution order, later wins: built-in defaults, `config.json` in the data
//! directory, `RECALLA_*` environment variables, command-line flags.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use recalla_core::{RoundConfig, SelectionOptions};
use serde::{Deserialize, Serialize};

/// Name of the optional config file inside the data directory
pub const CONFIG_FILE: &str = "config.json";

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "recalla.db";

const ENV_DATA_DIR: &str = "RECALLA_DATA_DIR";
const ENV_BOARD_PAIRS: &str = "RECALLA_BOARD_PAIRS";
const ENV_MAX_DIFFICULTY: &str = "RECALLA_MAX_DIFFICULTY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine a data directory; pass --data-dir")]
    NoDataDir,
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Settings read from `config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RecallaConfig {
    pub board_pairs: usize,
    pub max_difficulty: u8,
    pub balance_challenge: bool,
    pub min_replenish_delay_ms: u64,
    pub max_replenish_delay_ms: u64,
    /// Resolved data directory; never read from the file
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for RecallaConfig {
    fn default() -> Self {
        let round = RoundConfig::default();
        Self {
            board_pairs: round.board_pairs,
            max_difficulty: round.selection.max_difficulty,
            balance_challenge: round.selection.balance_challenge,
            min_replenish_delay_ms: round.min_replenish_delay_ms,
            max_replenish_delay_ms: round.max_replenish_delay_ms,
            data_dir: PathBuf::new(),
        }
    }
}

impl RecallaConfig {
    /// Load from the process environment
    pub fn load(data_dir_flag: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(data_dir_flag, |key| std::env::var(key).ok())
    }

    /// Load using `env` as the variable lookup
    pub fn load_with(
        data_dir_flag: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = match data_dir_flag.or_else(|| env(ENV_DATA_DIR).map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let mut config = Self::from_file(&data_dir.join(CONFIG_FILE))?;
        config.data_dir = data_dir;

        if let Some(value) = env(ENV_BOARD_PAIRS) {
            config.board_pairs = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_BOARD_PAIRS,
                        value,
                    });
                }
            };
        }
        if let Some(value) = env(ENV_MAX_DIFFICULTY) {
            config.max_difficulty = match value.trim().parse::<u8>() {
                Ok(n) if n <= 100 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_MAX_DIFFICULTY,
                        value,
                    });
                }
            };
        }

        config.validate()?;
        tracing::debug!(?config, "Configuration resolved");
        Ok(config)
    }

    /// Reject values the round cannot run with
    fn validate(&self) -> Result<(), ConfigError> {
        if self.board_pairs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "boardPairs",
                value: self.board_pairs.to_string(),
            });
        }
        if self.max_difficulty > 100 {
            return Err(ConfigError::InvalidValue {
                key: "maxDifficulty",
                value: self.max_difficulty.to_string(),
            });
        }
        Ok(())
    }

    /// Read `path`, falling back to defaults when it does not exist
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn selection(&self) -> SelectionOptions {
        SelectionOptions {
            balance_challenge: self.balance_challenge,
            max_difficulty: self.max_difficulty,
            ..SelectionOptions::default()
        }
    }

    pub fn round(&self) -> RoundConfig {
        RoundConfig {
            board_pairs: self.board_pairs,
            min_replenish_delay_ms: self.min_replenish_delay_ms,
            max_replenish_delay_ms: self.max_replenish_delay_ms,
            selection: self.selection(),
            ..RoundConfig::default()
        }
    }
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("com", "recalla", "core")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDir)
}
