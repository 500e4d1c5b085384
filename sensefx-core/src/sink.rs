use tracing::trace;

use crate::error::{MatrixError, Result};
use crate::grid::{PixelGrid, Rotation};

/// Something that shows a [`PixelGrid`]: real LEDs, a terminal, a test double.
pub trait DisplaySink {
    /// Snapshot of what is currently shown.
    fn get_pixels(&mut self) -> Result<PixelGrid>;

    /// Show `grid`.
    fn set_pixels(&mut self, grid: &PixelGrid) -> Result<()>;

    fn set_rotation(&mut self, rotation: Rotation) -> Result<()>;
}

/// Keeps every pushed frame in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    current: PixelGrid,
    history: Vec<PixelGrid>,
    offline: bool,
}

impl MemorySink {
    pub fn new(initial: PixelGrid) -> Self {
        Self {
            current: initial,
            ..Self::default()
        }
    }

    /// A sink whose every call fails with `SinkUnavailable`.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn history(&self) -> &[PixelGrid] {
        &self.history
    }

    fn check(&self) -> Result<()> {
        if self.offline {
            return Err(MatrixError::SinkUnavailable("memory sink is offline".into()));
        }
        Ok(())
    }
}

impl DisplaySink for MemorySink {
    fn get_pixels(&mut self) -> Result<PixelGrid> {
        self.check()?;
        Ok(self.current.clone())
    }

    fn set_pixels(&mut self, grid: &PixelGrid) -> Result<()> {
        self.check()?;
        trace!(frame = self.history.len(), "memory sink push");
        self.current = grid.clone();
        self.history.push(grid.clone());
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<()> {
        self.check()?;
        trace!(degrees = rotation.degrees(), "memory sink rotation");
        Ok(())
    }
}
