//! Frame renderers.
//!
//! The solver core only produces [`Frame`]s; everything here turns them
//! into something visible.

mod led;
mod terminal;

pub use self::led::{
    JsonLinesSink, LedDisplay, LedLayout, LedSession, MemorySink, NEOPIXEL_CELL_PIXELS,
    NEOPIXEL_PIXELS, PixelSink, SENSE_HAT_CELL_COORDS, SENSE_HAT_PIXELS, SENSE_HAT_WIDTH,
};
pub use self::terminal::ConsoleDisplay;

use lightsout_core::Frame;

/// Errors from rendering a frame.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Something that shows frames.
pub trait Display {
    fn render(&mut self, frame: &Frame) -> Result<(), DisplayError>;
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn render(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        (**self).render(frame)
    }
}
