//! Addressable LED output.
//!
//! A [`LedDisplay`] maps board cells onto pixel indices of a [`LedLayout`]
//! and pushes the whole pixel buffer to a [`PixelSink`] per frame. Colours
//! are `0xRRGGBB`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use clap::ValueEnum;
use lightsout_core::{Frame, GRID_SIZE};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Display, DisplayError};

/// Length of the NeoPixel strip.
pub const NEOPIXEL_PIXELS: usize = 192;

/// Strip indices lit for each cell, four per cell, centred on the panel.
pub const NEOPIXEL_CELL_PIXELS: [[usize; 4]; GRID_SIZE] = [
    [38, 41, 37, 42],
    [46, 49, 45, 50],
    [54, 53, 57, 58],
    [36, 43, 155, 148],
    [44, 51, 147, 140],
    [52, 59, 139, 132],
    [154, 149, 153, 150],
    [146, 141, 145, 142],
    [138, 133, 137, 134],
];

/// Side of the Sense HAT matrix.
pub const SENSE_HAT_WIDTH: usize = 8;

/// Pixels on the Sense HAT matrix.
pub const SENSE_HAT_PIXELS: usize = SENSE_HAT_WIDTH * SENSE_HAT_WIDTH;

/// `(x, y)` matrix coordinates for each cell.
pub const SENSE_HAT_CELL_COORDS: [(usize, usize); GRID_SIZE] = [
    (2, 2),
    (2, 3),
    (2, 4),
    (3, 2),
    (3, 3),
    (3, 4),
    (4, 2),
    (4, 3),
    (4, 4),
];

/// Supported LED hardware layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LedLayout {
    /// 192-pixel NeoPixel strip folded into a panel.
    #[value(name = "neopixel")]
    NeoPixel,
    /// 8x8 Sense HAT matrix.
    #[value(name = "sensehat")]
    SenseHat,
}

impl LedLayout {
    pub fn num_pixels(self) -> usize {
        match self {
            LedLayout::NeoPixel => NEOPIXEL_PIXELS,
            LedLayout::SenseHat => SENSE_HAT_PIXELS,
        }
    }

    /// Pixel indices belonging to `cell`.
    pub fn cell_pixels(self, cell: usize) -> &'static [usize] {
        match self {
            LedLayout::NeoPixel => &NEOPIXEL_INDEX[cell],
            LedLayout::SenseHat => &SENSE_HAT_INDEX[cell],
        }
    }

    pub fn on_color(self) -> u32 {
        match self {
            LedLayout::NeoPixel => 0x80_80_80,
            LedLayout::SenseHat => 0x00_00_FF,
        }
    }

    pub fn off_color(self) -> u32 {
        match self {
            LedLayout::NeoPixel => 0x83_20_9E,
            LedLayout::SenseHat => 0x14_14_14,
        }
    }

    pub fn pressed_color(self) -> u32 {
        match self {
            LedLayout::NeoPixel => 0xFA_01_00,
            LedLayout::SenseHat => 0xFF_00_00,
        }
    }
}

static NEOPIXEL_INDEX: [[usize; 4]; GRID_SIZE] = NEOPIXEL_CELL_PIXELS;

/// Row-major matrix index of each Sense HAT cell.
static SENSE_HAT_INDEX: [[usize; 1]; GRID_SIZE] = {
    let mut index = [[0; 1]; GRID_SIZE];
    let mut i = 0;
    while i < GRID_SIZE {
        let (x, y) = SENSE_HAT_CELL_COORDS[i];
        index[i] = [y * SENSE_HAT_WIDTH + x];
        i += 1;
    }
    index
};

/// Receives complete pixel buffers.
pub trait PixelSink {
    fn show(&mut self, pixels: &[u32]) -> Result<(), DisplayError>;
}

/// Keeps every shown buffer in memory. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    history: Arc<Mutex<Vec<Vec<u32>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All buffers shown so far, oldest first.
    pub fn history(&self) -> Vec<Vec<u32>> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Vec<u32>> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl PixelSink for MemorySink {
    fn show(&mut self, pixels: &[u32]) -> Result<(), DisplayError> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(pixels.to_vec());
        Ok(())
    }
}

/// Writes one JSON array of colours per buffer, newline-terminated, for an
/// external LED driver to consume.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Create or truncate `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, DisplayError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> PixelSink for JsonLinesSink<W> {
    fn show(&mut self, pixels: &[u32]) -> Result<(), DisplayError> {
        serde_json::to_writer(&mut self.out, pixels)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<S: PixelSink + ?Sized> PixelSink for Box<S> {
    fn show(&mut self, pixels: &[u32]) -> Result<(), DisplayError> {
        (**self).show(pixels)
    }
}

/// Maps frames onto a pixel buffer.
///
/// Pixels outside the board keep whatever they were last set to.
pub struct LedDisplay<S: PixelSink> {
    layout: LedLayout,
    pixels: Vec<u32>,
    sink: S,
}

impl<S: PixelSink> LedDisplay<S> {
    pub fn new(layout: LedLayout, sink: S) -> Self {
        Self {
            layout,
            pixels: vec![0; layout.num_pixels()],
            sink,
        }
    }

    pub fn layout(&self) -> LedLayout {
        self.layout
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Turn every pixel off and show the result.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.pixels.fill(0);
        self.sink.show(&self.pixels)
    }
}

impl<S: PixelSink> Display for LedDisplay<S> {
    fn render(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        for (cell, state) in frame.grid.cells().iter().enumerate() {
            let color = if frame.highlight == Some(cell) {
                self.layout.pressed_color()
            } else if state.is_on() {
                self.layout.on_color()
            } else {
                self.layout.off_color()
            };
            for &pixel in self.layout.cell_pixels(cell) {
                self.pixels[pixel] = color;
            }
        }
        self.sink.show(&self.pixels)
    }
}

/// An acquired LED device. All pixels are cleared on acquisition and again
/// when the session ends, whether through [`LedSession::release`] or drop.
pub struct LedSession<S: PixelSink> {
    display: Option<LedDisplay<S>>,
}

impl<S: PixelSink> LedSession<S> {
    pub fn acquire(layout: LedLayout, sink: S) -> Result<Self, DisplayError> {
        let mut display = LedDisplay::new(layout, sink);
        display.clear()?;
        Ok(Self {
            display: Some(display),
        })
    }

    /// End the session, reporting a failure to clear.
    pub fn release(mut self) -> Result<(), DisplayError> {
        match self.display.take() {
            Some(mut display) => display.clear(),
            None => Ok(()),
        }
    }
}

impl<S: PixelSink> Display for LedSession<S> {
    fn render(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        match self.display.as_mut() {
            Some(display) => display.render(frame),
            None => Ok(()),
        }
    }
}

impl<S: PixelSink> Drop for LedSession<S> {
    fn drop(&mut self) {
        if let Some(mut display) = self.display.take() {
            if let Err(e) = display.clear() {
                warn!("Failed to clear LEDs: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightsout_core::Grid;

    fn frame(bits: [u8; 9], highlight: Option<usize>) -> Frame {
        Frame {
            grid: Grid::from_bits(bits).unwrap(),
            highlight,
        }
    }

    #[test]
    fn test_neopixel_tables_are_disjoint_and_in_range() {
        let mut seen = std::collections::HashSet::new();
        for pixels in NEOPIXEL_CELL_PIXELS {
            for p in pixels {
                assert!(p < NEOPIXEL_PIXELS);
                assert!(seen.insert(p), "pixel {p} used twice");
            }
        }
        assert_eq!(seen.len(), 36);
    }

    #[test]
    fn test_sense_hat_index() {
        assert_eq!(LedLayout::SenseHat.cell_pixels(0), &[18]);
        assert_eq!(LedLayout::SenseHat.cell_pixels(1), &[26]);
        assert_eq!(LedLayout::SenseHat.cell_pixels(8), &[36]);
    }

    #[test]
    fn test_neopixel_render_colors() {
        let sink = MemorySink::new();
        let mut display = LedDisplay::new(LedLayout::NeoPixel, sink.clone());
        display
            .render(&frame([1, 0, 0, 0, 0, 0, 0, 0, 0], Some(8)))
            .unwrap();

        let pixels = sink.last().unwrap();
        assert_eq!(pixels.len(), NEOPIXEL_PIXELS);
        assert_eq!(pixels[38], 0x808080);
        assert_eq!(pixels[46], 0x83209E);
        assert_eq!(pixels[138], 0xFA0100);
        assert_eq!(pixels[0], 0);
    }

    #[test]
    fn test_session_clears_on_drop() {
        let sink = MemorySink::new();
        {
            let mut session = LedSession::acquire(LedLayout::SenseHat, sink.clone()).unwrap();
            session
                .render(&frame([1, 1, 1, 1, 1, 1, 1, 1, 1], None))
                .unwrap();
            assert!(sink.last().unwrap().iter().any(|&p| p != 0));
        }
        let history = sink.history();
        assert_eq!(history.len(), 3);
        assert!(history[0].iter().all(|&p| p == 0));
        assert!(history[2].iter().all(|&p| p == 0));
    }

    #[test]
    fn test_session_release_clears_once() {
        let sink = MemorySink::new();
        let session = LedSession::acquire(LedLayout::NeoPixel, sink.clone()).unwrap();
        session.release().unwrap();
        assert_eq!(sink.history().len(), 2);
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.show(&[0x0000FF, 0]).unwrap();
        sink.show(&[0xFF0000, 1]).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "[255,0]\n[16711680,1]\n");
    }
}
