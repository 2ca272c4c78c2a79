use std::io::{self, Write};

use console::style;
use lightsout_core::{Frame, GRID_WIDTH};

use super::{Display, DisplayError};

const ON: &str = "■";
const OFF: &str = "□";

/// Prints frames as three rows of `■`/`□` followed by a blank line.
///
/// With colour enabled the highlighted cell is drawn in bold red.
pub struct ConsoleDisplay<W: Write = io::Stdout> {
    out: W,
    color: bool,
}

impl ConsoleDisplay {
    /// Render to stdout, coloured when stdout supports it.
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            color: console::colors_enabled(),
        }
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for ConsoleDisplay<W> {
    fn render(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        for (r, row) in frame.grid.cells().chunks(GRID_WIDTH).enumerate() {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    let symbol = if cell.is_on() { ON } else { OFF };
                    if frame.highlight == Some(r * GRID_WIDTH + c) {
                        style(symbol)
                            .red()
                            .bold()
                            .force_styling(self.color)
                            .to_string()
                    } else {
                        symbol.to_string()
                    }
                })
                .collect();
            writeln!(self.out, "{}", line.join(" "))?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
