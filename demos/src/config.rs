//! Demo configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. Default values
//! 2. YAML configuration file
//! 3. `.env` file and `LIGHTSOUT_*` environment variables
//! 4. Command-line flags (applied by the binary)

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use lightsout_core::{DEFAULT_SHOTS, SolverConfig};
use lightsout_hal::BackendConfig;
use serde::{Deserialize, Serialize};

use crate::display::LedLayout;

/// Settings for a demo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Shots per solve.
    pub shots: u32,
    /// Pause between animation frames in milliseconds.
    pub delay_ms: u64,
    /// Print frames to the terminal.
    pub console: bool,
    /// LED layout to drive, if any.
    pub led_layout: Option<LedLayout>,
    /// Where LED frames are written as JSON lines; stdout when unset.
    pub led_output: Option<PathBuf>,
    /// File of custom boards to use instead of the built-in catalog.
    pub custom_grid: Option<PathBuf>,
    /// Seed for board selection and simulator sampling.
    pub seed: Option<u64>,
    /// Required ratio of top count over runner-up; `None` disables the check.
    pub dominance_ratio: Option<f64>,
    /// Rounds to play; `None` plays forever.
    pub rounds: Option<u64>,
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub log_level: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let solver = SolverConfig::default();
        Self {
            shots: DEFAULT_SHOTS,
            delay_ms: 1000,
            console: false,
            led_layout: None,
            led_output: None,
            custom_grid: None,
            seed: None,
            dominance_ratio: solver.dominance_ratio,
            rounds: None,
            log_level: "warn".to_string(),
        }
    }
}

impl DemoConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load with file and environment overrides.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LIGHTSOUT_*` overrides read through `lookup`.
    ///
    /// Only variables that are set override; a set but unparsable value is
    /// an error.
    pub fn merge_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("LIGHTSOUT_SHOTS") {
            self.shots = parse_env("LIGHTSOUT_SHOTS", &v)?;
        }
        if let Some(v) = lookup("LIGHTSOUT_DELAY_MS") {
            self.delay_ms = parse_env("LIGHTSOUT_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("LIGHTSOUT_CONSOLE") {
            self.console = parse_env("LIGHTSOUT_CONSOLE", &v)?;
        }
        if let Some(v) = lookup("LIGHTSOUT_LED_LAYOUT") {
            self.led_layout = Some(LedLayout::from_str(&v, true).map_err(|_| {
                ConfigError::ValidationError(format!("Unknown LED layout: {v}"))
            })?);
        }
        if let Some(v) = lookup("LIGHTSOUT_LED_OUTPUT") {
            self.led_output = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("LIGHTSOUT_CUSTOM_GRID") {
            self.custom_grid = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("LIGHTSOUT_SEED") {
            self.seed = Some(parse_env("LIGHTSOUT_SEED", &v)?);
        }
        if let Some(v) = lookup("LIGHTSOUT_DOMINANCE_RATIO") {
            self.dominance_ratio = match v.as_str() {
                "none" | "off" => None,
                other => Some(parse_env("LIGHTSOUT_DOMINANCE_RATIO", other)?),
            };
        }
        if let Some(v) = lookup("LIGHTSOUT_ROUNDS") {
            self.rounds = Some(parse_env("LIGHTSOUT_ROUNDS", &v)?);
        }
        if let Some(v) = lookup("LIGHTSOUT_LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }

        if let Some(ratio) = self.dominance_ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "dominance_ratio must be positive, got {ratio}"
                )));
            }
        }

        if self.console && self.led_on_stdout() {
            return Err(ConfigError::ValidationError(
                "console frames and LED frames cannot share stdout; set led_output".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Whether LED frames are written to stdout.
    pub fn led_on_stdout(&self) -> bool {
        self.led_layout.is_some() && self.led_output.is_none()
    }

    /// Simulator settings: the seed, when one is configured.
    pub fn backend_config(&self) -> BackendConfig {
        let config = BackendConfig::new("simulator");
        match self.seed {
            Some(seed) => config.with_extra("seed", serde_json::json!(seed)),
            None => config,
        }
    }

    /// Solver settings derived from this configuration.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            shots: self.shots,
            dominance_ratio: self.dominance_ratio,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}={value}")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
