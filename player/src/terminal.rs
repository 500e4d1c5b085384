use std::io::{self, BufWriter, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use tracing::{debug, warn};

use sensefx_core::{DisplaySink, MatrixError, PixelGrid, Rotation};

use crate::driver::{Flow, Pacer};
use crate::render::{self, Cell, FrameDiff};

/// Shows the matrix in the middle of the terminal using half-block cells.
pub struct TerminalSink<W: Write> {
    out: W,
    scale: u16,
    origin: (u16, u16),
    rotation: Rotation,
    shown: PixelGrid,
    cells: Vec<Cell>,
    render_buf: Vec<u8>,
    raw: bool,
}

impl TerminalSink<BufWriter<Stdout>> {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor.
    pub fn open(scale: u16) -> anyhow::Result<Self> {
        let (term_cols, term_rows) = terminal::size()
            .map_err(|e| MatrixError::SinkUnavailable(format!("no terminal to draw on: {e}")))?;
        let (cols, rows) = render::cell_size(scale);
        if term_cols < cols || term_rows < rows {
            warn!(
                "terminal is {term_cols}x{term_rows} but the matrix needs {cols}x{rows}; try a smaller --scale"
            );
        }

        // Set up panic hook for terminal cleanup
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            cleanup_terminal();
            original_hook(info);
        }));

        terminal::enable_raw_mode().context("enable raw mode")?;
        let mut out = BufWriter::with_capacity(64 * 1024, io::stdout());
        crossterm::execute!(
            out,
            terminal::EnterAlternateScreen,
            crossterm::cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )
        .context("enter alt screen")?;

        let mut sink = Self::new(out, scale, (term_cols, term_rows));
        sink.raw = true;
        Ok(sink)
    }
}

impl<W: Write> TerminalSink<W> {
    /// Draw into any writer; `term` is the terminal size used for centring.
    pub fn new(out: W, scale: u16, term: (u16, u16)) -> Self {
        let scale = scale.clamp(1, render::MAX_SCALE);
        let (cols, rows) = render::cell_size(scale);
        let origin = (
            term.1.saturating_sub(rows) / 2 + 1,
            term.0.saturating_sub(cols) / 2 + 1,
        );
        Self {
            out,
            scale,
            origin,
            rotation: Rotation::Deg0,
            shown: PixelGrid::new(),
            cells: Vec::new(),
            render_buf: Vec::with_capacity(16 * 1024),
            raw: false,
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let cells = render::grid_to_cells(&self.shown.rotated(self.rotation), self.scale);
        let (cols, rows) = render::cell_size(self.scale);

        match render::compute_delta(&self.cells, &cells, cols) {
            FrameDiff::Full(ref all) => {
                render::render_full(all, cols, rows, self.origin, &mut self.render_buf)
            }
            FrameDiff::Delta(ref d) => render::render_delta(d, self.origin, &mut self.render_buf),
        }
        self.cells = cells;

        self.out.write_all(&self.render_buf)?;
        self.out.flush()
    }
}

fn unavailable(e: io::Error) -> MatrixError {
    MatrixError::SinkUnavailable(e.to_string())
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn get_pixels(&mut self) -> sensefx_core::Result<PixelGrid> {
        Ok(self.shown.clone())
    }

    fn set_pixels(&mut self, grid: &PixelGrid) -> sensefx_core::Result<()> {
        self.shown = grid.clone();
        self.draw().map_err(unavailable)
    }

    fn set_rotation(&mut self, rotation: Rotation) -> sensefx_core::Result<()> {
        debug!(degrees = rotation.degrees(), "rotation");
        self.rotation = rotation;
        self.draw().map_err(unavailable)
    }
}

impl<W: Write> Drop for TerminalSink<W> {
    fn drop(&mut self) {
        if self.raw {
            let _ = self.out.flush();
            cleanup_terminal();
        }
    }
}

fn cleanup_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        crossterm::style::ResetColor,
        crossterm::cursor::Show,
        terminal::LeaveAlternateScreen
    );
}

/// Waits out frame holds while watching for `q`, `Esc` or `Ctrl+C`.
pub struct KeyboardPacer;

/// Longest single wait when a hold has no reachable deadline.
const IDLE_POLL: Duration = Duration::from_secs(1);

/// `None` when `duration` runs past what `Instant` can represent.
fn deadline(duration: Duration) -> Option<Instant> {
    Instant::now().checked_add(duration)
}

impl Pacer for KeyboardPacer {
    fn hold(&mut self, duration: Duration) -> anyhow::Result<Flow> {
        let deadline = deadline(duration);
        loop {
            let left = match deadline {
                Some(d) => d.saturating_duration_since(Instant::now()),
                None => IDLE_POLL,
            };
            if event::poll(left).context("polling events")? {
                if let Event::Key(KeyEvent {
                    code, modifiers, ..
                }) = event::read().context("reading event")?
                {
                    match code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(Flow::Stop),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(Flow::Stop)
                        }
                        _ => {}
                    }
                }
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Ok(Flow::Continue);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensefx_core::Rgb;

    #[test]
    fn first_push_draws_everything_centred() {
        let mut out = Vec::new();
        {
            let mut sink = TerminalSink::new(&mut out, 1, (80, 24));
            sink.set_pixels(&PixelGrid::filled(Rgb::new(0, 0, 255))).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        // 8x4 cells centred in 80x24
        assert!(text.starts_with("\x1b[11;37H"));
        assert_eq!(text.matches('▄').count(), 32);
    }

    #[test]
    fn later_pushes_only_touch_changed_cells() {
        let mut out = Vec::new();
        {
            let mut sink = TerminalSink::new(&mut out, 1, (8, 4));
            sink.set_pixels(&PixelGrid::new()).unwrap();
            let mut grid = PixelGrid::new();
            grid.set(0, Rgb::new(255, 0, 0));
            sink.set_pixels(&grid).unwrap();
            assert_eq!(sink.get_pixels().unwrap(), grid);
        }
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('▄').count(), 33);
        assert!(text.ends_with("\x1b[1;1H\x1b[48;2;255;0;0m\x1b[38;2;0;0;0m▄\x1b[0m"));
    }

    #[test]
    fn rotation_is_applied_on_screen_only() {
        let mut out = Vec::new();
        let mut grid = PixelGrid::new();
        grid.set(0, Rgb::new(255, 0, 0));
        let mut sink = TerminalSink::new(&mut out, 1, (8, 4));
        sink.set_rotation(Rotation::Deg180).unwrap();
        sink.set_pixels(&grid).unwrap();
        assert_eq!(sink.get_pixels().unwrap(), grid);
        assert_eq!(sink.cells[31].bottom, Rgb::new(255, 0, 0));
        assert_eq!(sink.cells[0].top, Rgb::OFF);
    }

    #[test]
    fn unreachable_deadline_waits_without_one() {
        assert!(deadline(Duration::from_millis(10)).is_some());
        assert!(deadline(Duration::MAX).is_none());
    }

    #[test]
    fn scale_is_clamped() {
        let mut out = Vec::new();
        let sink = TerminalSink::new(&mut out, u16::MAX, (80, 24));
        assert_eq!(sink.scale, render::MAX_SCALE);
        drop(sink);
        let sink = TerminalSink::new(&mut out, 0, (80, 24));
        assert_eq!(sink.scale, 1);
    }
}
