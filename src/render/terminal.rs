use super::Cell;
use crate::color::Color;
use crossterm::{
    cursor::{self, MoveTo},
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};

/// The visible area of the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    pub columns: u16,
    pub rows: u16,
}

impl WindowSize {
    /// Get the current terminal size.
    pub fn current() -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        Ok(Self { columns, rows })
    }
}

/// Draws frames onto a terminal.
pub struct TerminalRenderer<W: Write> {
    writer: W,
    background: Option<Color>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(writer: W, background: Option<Color>) -> Self {
        Self { writer, background }
    }

    /// Switch to the alternate screen in raw mode.
    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        queue!(self.writer, EnterAlternateScreen, cursor::Hide)?;
        self.writer.flush()
    }

    /// Undo everything [TerminalRenderer::enter] did.
    pub fn leave(&mut self) -> io::Result<()> {
        queue!(self.writer, ResetColor, cursor::Show, LeaveAlternateScreen)?;
        self.writer.flush()?;
        terminal::disable_raw_mode()
    }

    /// Clear the screen using the background color.
    pub fn clear(&mut self) -> io::Result<()> {
        self.apply_background()?;
        queue!(self.writer, Clear(ClearType::All))?;
        Ok(())
    }

    /// Draw a frame with its top left corner at the given position.
    ///
    /// Rows and columns falling outside of the window are clipped.
    pub fn draw_frame(&mut self, frame: &[Vec<Cell>], column: i32, row: i32, window: WindowSize) -> io::Result<()> {
        for (offset, line) in frame.iter().enumerate() {
            let Ok(y) = u16::try_from(row + offset as i32) else {
                continue;
            };
            if y >= window.rows {
                break;
            }
            for (index, cell) in line.iter().enumerate() {
                let Ok(x) = u16::try_from(column + index as i32) else {
                    continue;
                };
                if x >= window.columns {
                    break;
                }
                self.draw_cell(cell, x, y)?;
            }
        }
        Ok(())
    }

    /// Print a line of plain text.
    pub fn draw_text(&mut self, text: &str, column: u16, row: u16) -> io::Result<()> {
        queue!(self.writer, MoveTo(column, row), ResetColor)?;
        self.apply_background()?;
        queue!(self.writer, Print(text))?;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn draw_cell(&mut self, cell: &Cell, x: u16, y: u16) -> io::Result<()> {
        queue!(self.writer, MoveTo(x, y))?;
        match cell.foreground {
            Some(color) => queue!(self.writer, SetForegroundColor(color.into()))?,
            None => queue!(self.writer, ResetColor)?,
        };
        self.apply_background()?;
        queue!(self.writer, Print(cell.ch))?;
        Ok(())
    }

    fn apply_background(&mut self) -> io::Result<()> {
        if let Some(color) = self.background {
            queue!(self.writer, SetBackgroundColor(color.into()))?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}
