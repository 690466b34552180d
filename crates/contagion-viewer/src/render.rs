//! Terminal rendering of simulation frames.

use contagion_core::{CellState, Error, Result};
use contagion_world::{Frame, FrameSink};
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};

pub fn color(state: CellState) -> Color {
    let (r, g, b) = state.color();
    Color::Rgb { r, g, b }
}

/// Draws each frame as a block of colored cells, two columns per cell
pub struct TerminalRenderer<W: Write> {
    out: W,
    clear: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, clear: true }
    }

    /// Keep earlier frames on screen instead of redrawing in place
    pub fn without_clear(mut self) -> Self {
        self.clear = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        if self.clear {
            queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        }
        queue!(self.out, Print(format!("Iteration {}\n", frame.iteration)))?;

        for row in frame.grid.rows() {
            for state in row {
                queue!(self.out, SetBackgroundColor(color(*state)), Print("  "))?;
            }
            queue!(self.out, ResetColor, Print("\n"))?;
        }

        self.draw_legend()?;
        self.out.flush()
    }

    fn draw_legend(&mut self) -> io::Result<()> {
        for (i, state) in CellState::all().iter().enumerate() {
            if i > 0 {
                queue!(self.out, Print("   "))?;
            }
            queue!(
                self.out,
                SetBackgroundColor(color(*state)),
                Print("  "),
                ResetColor,
                Print(format!(" {}", state.label()))
            )?;
        }
        queue!(self.out, Print("\n"))
    }
}

impl<W: Write> FrameSink for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.draw(frame).map_err(|e| {
            Error::Render(format!("failed to draw iteration {}: {}", frame.iteration, e))
        })
    }
}
