//! Lights-Out demo.
//!
//! Picks a board, solves it with Grover search on the local simulator and
//! replays the presses on the terminal and/or an LED layout. Repeats until
//! the requested number of rounds is played, or forever.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::time::Duration;

use anyhow::Context;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lightsout_adapter_sim::SimulatorBackend;
use lightsout_core::{Grid, Solver, catalog};
use lightsout_demos::cli::Cli;
use lightsout_demos::config::DemoConfig;
use lightsout_demos::display::{ConsoleDisplay, Display, JsonLinesSink, LedSession, PixelSink};
use lightsout_demos::round::replay;
use lightsout_demos::{Reporter, create_spinner};
use lightsout_hal::BackendFactory;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_with_dotenv();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.apply(DemoConfig::load(cli.config.as_deref())?);
    config.validate()?;

    let filter = match cli.verbose {
        0 => EnvFilter::new(&config.log_level),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let boards = match &config.custom_grid {
        Some(path) => catalog::load_custom(path)
            .with_context(|| format!("loading custom boards from {}", path.display()))?,
        None => catalog::builtin(),
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let backend = SimulatorBackend::from_config(config.backend_config())?;
    let solver = Solver::with_config(backend, config.solver_config());

    let mut displays = open_displays(&config)?;
    let mut report = Reporter::for_stdout_taken(config.led_on_stdout());

    report.header("Lights-Out: Grover Search Solver")?;
    report.result("Boards", boards.len())?;
    report.result("Shots", config.shots)?;
    match config.rounds {
        Some(n) => report.result("Rounds", n)?,
        None => report.result("Rounds", "until interrupted")?,
    }

    let rounds = play(
        &solver,
        &boards,
        &mut rng,
        &mut displays,
        &mut report,
        &config,
    );
    let interrupted = tokio::select! {
        result = rounds => {
            result?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        report.info("Interrupted, clearing displays")?;
    }

    // Dropping the displays releases any LED session.
    drop(displays);
    Ok(())
}

fn open_displays(config: &DemoConfig) -> anyhow::Result<Vec<Box<dyn Display>>> {
    let mut displays: Vec<Box<dyn Display>> = Vec::new();

    if config.console {
        displays.push(Box::new(ConsoleDisplay::stdout()));
    }

    if let Some(layout) = config.led_layout {
        let sink: Box<dyn PixelSink> = match &config.led_output {
            Some(path) => Box::new(
                JsonLinesSink::create(path)
                    .with_context(|| format!("opening LED output {}", path.display()))?,
            ),
            None => Box::new(JsonLinesSink::new(std::io::stdout())),
        };
        displays.push(Box::new(LedSession::acquire(layout, sink)?));
        info!(?layout, "LED session acquired");
    }

    Ok(displays)
}

async fn play(
    solver: &Solver<SimulatorBackend>,
    boards: &[Grid],
    rng: &mut StdRng,
    displays: &mut [Box<dyn Display>],
    report: &mut Reporter,
    config: &DemoConfig,
) -> anyhow::Result<()> {
    let delay = Duration::from_millis(config.delay_ms);
    let mut round = 0u64;

    while config.rounds.is_none_or(|n| round < n) {
        round += 1;
        let Some(grid) = catalog::pick(boards, rng) else {
            anyhow::bail!("no boards to play");
        };

        report.section(&format!("Round {round}"))?;
        report.result("Board", grid.bits().iter().map(u8::to_string).collect::<String>())?;

        let spinner = create_spinner("Computing quantum solution...");
        let solved = solver.solve_detailed(&grid).await;
        spinner.finish_and_clear();

        let solution = match solved {
            Ok(solution) => solution,
            Err(e) => {
                warn!(round, error = %e, "round abandoned");
                report.warning(&format!("Round abandoned: {e}"))?;
                continue;
            }
        };
        report.result("Presses", solution.press)?;
        report.result("Confidence", format!("{:.1}%", solution.confidence() * 100.0))?;

        match replay(grid, solution, displays, delay).await {
            Ok(outcome) => {
                if outcome.solved() {
                    report.success("Board cleared")?;
                } else {
                    report.warning("Board still has lights on")?;
                }
                info!(round, frames = outcome.frames, "round finished");
            }
            Err(e) => {
                warn!(round, error = %e, "round abandoned");
                report.warning(&format!("Round abandoned: {e}"))?;
            }
        }
    }

    Ok(())
}
