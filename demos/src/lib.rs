//! Lights-Out Demo
//!
//! Picks boards, solves them with the Grover solver on the local simulator
//! and replays the presses on the terminal and LED hardware.
//!
//! - [`cli::Cli`] parses the command line.
//! - [`config::DemoConfig`] collects settings from YAML, environment and CLI.
//! - [`display`] renders frames to the console or a pixel sink.
//! - [`round`] solves a board and replays the solution.

pub mod cli;
pub mod config;
pub mod display;
pub mod round;

use std::io::{self, Write};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

/// Create a spinner shown while a board is being solved.
///
/// Spinners draw to stderr.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        pb.set_style(template);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Human-facing progress text.
///
/// Goes to stdout normally, and to stderr when stdout carries LED frames.
pub struct Reporter<W: Write = Box<dyn Write>> {
    out: W,
}

impl Reporter {
    /// Report on stderr if `stdout_taken`, otherwise on stdout.
    pub fn for_stdout_taken(stdout_taken: bool) -> Self {
        if stdout_taken {
            Self::new(Box::new(io::stderr()))
        } else {
            Self::new(Box::new(io::stdout()))
        }
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print a demo header.
    pub fn header(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", style("═".repeat(60)).cyan())?;
        writeln!(self.out, "{}", style(format!("  {title}")).cyan().bold())?;
        writeln!(self.out, "{}", style("═".repeat(60)).cyan())?;
        writeln!(self.out)
    }

    /// Print a demo section.
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", style(format!("▶ {title}")).green().bold())?;
        writeln!(self.out, "{}", style("─".repeat(40)).dim())
    }

    /// Print a result line.
    pub fn result(&mut self, label: &str, value: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "  {} {}", style(format!("{label}:")).dim(), value)
    }

    /// Print a success message.
    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", style("✓").green().bold(), message)
    }

    /// Print a warning message.
    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", style("!").yellow().bold(), message)
    }

    /// Print an info message.
    pub fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", style("ℹ").blue(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_writes_to_its_target() {
        console::set_colors_enabled(false);
        let mut reporter = Reporter::new(Vec::new());
        reporter.section("Round 1").unwrap();
        reporter.result("Presses", "110010101").unwrap();
        reporter.success("Board cleared").unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("▶ Round 1\n"));
        assert!(text.contains("  Presses: 110010101\n"));
        assert!(text.ends_with("✓ Board cleared\n"));
    }
}
