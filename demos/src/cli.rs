//! Command-line interface.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::DemoConfig;
use crate::display::LedLayout;

#[derive(Parser, Debug)]
#[command(name = "lightsout-demo")]
#[command(version, about = "Solve 3x3 Lights-Out boards with Grover search")]
pub struct Cli {
    /// Display the board in the console
    #[arg(short, long)]
    pub console: bool,

    /// YAML configuration file
    #[arg(long, env = "LIGHTSOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// File of comma-separated 0/1 boards to play instead of the catalog
    #[arg(long)]
    pub custom_grid: Option<PathBuf>,

    /// Number of rounds (default: play forever)
    #[arg(long)]
    pub rounds: Option<u64>,

    /// Seed for board selection and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause between frames in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Shots per solve
    #[arg(long)]
    pub shots: Option<u32>,

    /// LED layout to drive
    #[arg(long, value_enum)]
    pub led_layout: Option<LedLayout>,

    /// Write LED frames here as JSON lines (default: stdout)
    #[arg(long)]
    pub led_output: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse the process arguments after loading `.env` from the working
    /// directory, so `LIGHTSOUT_CONFIG` may come from there.
    pub fn parse_with_dotenv() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    /// Parse `args` after loading the env file at `env_file`.
    ///
    /// Variables already set in the process keep their values.
    pub fn try_parse_with_env_file<I, T>(env_file: &Path, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        dotenvy::from_path(env_file).ok();
        Self::try_parse_from(args)
    }

    /// Flags set on the command line win over every other source.
    pub fn apply(&self, mut config: DemoConfig) -> DemoConfig {
        if self.console {
            config.console = true;
        }
        if let Some(path) = &self.custom_grid {
            config.custom_grid = Some(path.clone());
        }
        if self.rounds.is_some() {
            config.rounds = self.rounds;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(delay) = self.delay_ms {
            config.delay_ms = delay;
        }
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if self.led_layout.is_some() {
            config.led_layout = self.led_layout;
        }
        if let Some(path) = &self.led_output {
            config.led_output = Some(path.clone());
        }
        config
    }
}
