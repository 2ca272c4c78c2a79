//! Rounds played against the seeded simulator, rendered to in-memory
//! displays.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lightsout_adapter_sim::SimulatorBackend;
use lightsout_core::{Grid, Solver, catalog};
use lightsout_demos::config::DemoConfig;
use lightsout_demos::display::{ConsoleDisplay, Display, LedLayout, LedSession, MemorySink};
use lightsout_demos::round::{RoundError, play_round, replay};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn solver() -> Solver<SimulatorBackend> {
    Solver::new(SimulatorBackend::new().with_seed(7))
}

fn reference_board() -> Grid {
    Grid::from_bits([0, 1, 1, 1, 0, 0, 1, 1, 1]).unwrap()
}

#[tokio::test]
async fn test_round_clears_reference_board() {
    let sink = MemorySink::new();
    let out = SharedBuf::default();
    let mut displays: Vec<Box<dyn Display>> = vec![
        Box::new(ConsoleDisplay::new(out.clone(), false)),
        Box::new(LedSession::acquire(LedLayout::NeoPixel, sink.clone()).unwrap()),
    ];

    let report = play_round(&solver(), reference_board(), &mut displays, Duration::ZERO)
        .await
        .unwrap();

    assert!(report.solved());
    assert_eq!(report.initial, reference_board());
    assert_eq!(report.solution.press.to_string(), "110010101");
    assert_eq!(report.frames, 1 + 2 * 5);

    // Three rows and a blank line per frame.
    assert_eq!(out.text().lines().count(), report.frames * 4);
    assert!(out.text().starts_with("□ ■ ■\n■ □ □\n■ ■ ■\n\n"));

    // One clear on acquire, then one buffer per frame.
    assert_eq!(sink.history().len(), 1 + report.frames);
    let last = sink.last().unwrap();
    for cell in 0..9 {
        for &pixel in LedLayout::NeoPixel.cell_pixels(cell) {
            assert_eq!(last[pixel], LedLayout::NeoPixel.off_color());
        }
    }

    drop(displays);
    assert!(sink.last().unwrap().iter().all(|&p| p == 0));
}

#[tokio::test]
async fn test_displays_are_idle_until_replay() {
    let sink = MemorySink::new();
    let mut displays: Vec<Box<dyn Display>> =
        vec![Box::new(LedSession::acquire(LedLayout::NeoPixel, sink.clone()).unwrap())];

    let solution = solver().solve_detailed(&reference_board()).await.unwrap();
    assert_eq!(sink.history().len(), 1);

    let report = replay(reference_board(), solution, &mut displays, Duration::ZERO)
        .await
        .unwrap();
    assert!(report.solved());
    assert_eq!(sink.history().len(), 1 + report.frames);
}

#[tokio::test(start_paused = true)]
async fn test_round_waits_between_frames() {
    let mut displays: Vec<Box<dyn Display>> = Vec::new();
    let start = tokio::time::Instant::now();

    let report = play_round(
        &solver(),
        reference_board(),
        &mut displays,
        Duration::from_secs(1),
    )
    .await
    .unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(report.frames as u64));
}

#[tokio::test]
async fn test_failed_solve_renders_nothing() {
    let sink = MemorySink::new();
    let mut displays: Vec<Box<dyn Display>> =
        vec![Box::new(LedSession::acquire(LedLayout::SenseHat, sink.clone()).unwrap())];

    // The search circuit needs 20 qubits.
    let small = Solver::new(SimulatorBackend::with_max_qubits(10));
    let err = play_round(&small, reference_board(), &mut displays, Duration::ZERO)
        .await
        .unwrap_err();

    assert!(matches!(err, RoundError::Solve(_)));
    assert_eq!(sink.history().len(), 1);
}

#[tokio::test]
async fn test_custom_boards_play_through() {
    let boards = catalog::parse_custom("1,0,1,0,0,0,1,0,0,\n0,0,0,0,1,1,0,0,0").unwrap();
    assert_eq!(boards.len(), 2);

    let solver = solver();
    for board in boards {
        let mut displays: Vec<Box<dyn Display>> = Vec::new();
        let report = play_round(&solver, board, &mut displays, Duration::ZERO)
            .await
            .unwrap();
        assert!(report.solved(), "board {board} not cleared");
        assert_eq!(report.frames, 1 + 2 * report.solution.press.count());
    }
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("lightsout-demo-{}.yaml", std::process::id()));
    std::fs::write(
        &path,
        "shots: 2000\ndelay_ms: 0\nconsole: true\nled_layout: sensehat\n\
         led_output: leds.jsonl\nrounds: 3\nseed: 11\n",
    )
    .unwrap();

    let config = DemoConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.shots, 2000);
    assert_eq!(config.delay_ms, 0);
    assert!(config.console);
    assert_eq!(config.led_layout, Some(LedLayout::SenseHat));
    assert_eq!(config.rounds, Some(3));
    assert_eq!(config.seed, Some(11));
    assert!(!config.led_on_stdout());
    assert_eq!(config.log_level, "warn");

    let solver = config.solver_config();
    assert_eq!(solver.shots, 2000);
    assert_eq!(solver.dominance_ratio, Some(2.0));
}
