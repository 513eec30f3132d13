use peppa_bot::HUMAN_NAME;
use peppa_core::game::state::DEFAULT_TOTAL_ROUNDS;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

const DEFAULT_HUMAN_TURN_SECS: u64 = 40;
const DEFAULT_BOT_TURN_SECS: u64 = 5;
const DEFAULT_BOT_PACE_MS: u64 = 1_000;
const DEFAULT_TRICK_PAUSE_MS: u64 = 1_500;
const DEFAULT_PASS_PAUSE_MS: u64 = 1_000;
const DEFAULT_ADVISORY_TIMEOUT_MS: u64 = 15_000;

/// Table session configuration loaded from YAML. Every field has a default,
/// so an empty document is a valid configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub total_rounds: u32,
    pub human_turn_secs: u64,
    pub bot_turn_secs: u64,
    pub bot_pace_ms: u64,
    pub trick_pause_ms: u64,
    pub pass_pause_ms: u64,
    pub human_name: String,
    pub advisory: AdvisoryConfig,
    pub logging: LoggingConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            human_turn_secs: DEFAULT_HUMAN_TURN_SECS,
            bot_turn_secs: DEFAULT_BOT_TURN_SECS,
            bot_pace_ms: DEFAULT_BOT_PACE_MS,
            trick_pause_ms: DEFAULT_TRICK_PAUSE_MS,
            pass_pause_ms: DEFAULT_PASS_PAUSE_MS,
            human_name: HUMAN_NAME.to_string(),
            advisory: AdvisoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TableConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: TableConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.total_rounds == 0 {
            return Err(invalid("total_rounds", "at least one round must be played"));
        }

        for (field, value) in [
            ("human_turn_secs", self.human_turn_secs),
            ("bot_turn_secs", self.bot_turn_secs),
            ("bot_pace_ms", self.bot_pace_ms),
            ("trick_pause_ms", self.trick_pause_ms),
            ("pass_pause_ms", self.pass_pause_ms),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }

        if self.human_turn_secs < self.bot_turn_secs {
            return Err(invalid(
                "human_turn_secs",
                "human turn budget must not be shorter than the bot budget",
            ));
        }

        self.human_name = self.human_name.trim().to_string();
        if self.human_name.is_empty() {
            return Err(invalid("human_name", "name must not be empty"));
        }

        self.advisory.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn human_turn(&self) -> Duration {
        Duration::from_secs(self.human_turn_secs)
    }

    pub fn bot_turn(&self) -> Duration {
        Duration::from_secs(self.bot_turn_secs)
    }

    pub fn bot_pace(&self) -> Duration {
        Duration::from_millis(self.bot_pace_ms)
    }

    pub fn trick_pause(&self) -> Duration {
        Duration::from_millis(self.trick_pause_ms)
    }

    pub fn pass_pause(&self) -> Duration {
        Duration::from_millis(self.pass_pause_ms)
    }
}

/// External advisory service. Disabled unless a command is configured.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub enabled: bool,
    pub timeout_ms: u64,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_ms: DEFAULT_ADVISORY_TIMEOUT_MS,
            command: None,
            args: Vec::new(),
            working_dir: None,
        }
    }
}

impl AdvisoryConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 {
            return Err(invalid(
                "advisory.timeout_ms",
                "advisory timeout must be greater than zero",
            ));
        }

        let has_command = self
            .command
            .as_deref()
            .is_some_and(|cmd| !cmd.trim().is_empty());
        if self.enabled && !has_command {
            return Err(invalid(
                "advisory.command",
                "an enabled advisory service needs a command",
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Logging defaults to human-readable output at `info`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_tracing_level(),
            json_file: None,
        }
    }
}

impl LoggingConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            self.level = default_tracing_level();
        }
        if self.level().is_none() {
            return Err(invalid(
                "logging.level",
                format!("unknown tracing level '{}'", self.level),
            ));
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
