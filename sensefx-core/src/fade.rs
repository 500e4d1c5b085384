use tracing::debug;

use crate::grid::PixelGrid;

/// Channel value at which a Sense HAT LED already looks off.
pub const ZERO_BRIGHTNESS: u8 = 47;

/// Enough steps to take a full-white pixel down to [`ZERO_BRIGHTNESS`].
pub const DEFAULT_STEPS: usize = 256 - ZERO_BRIGHTNESS as usize;

/// Dims a captured buffer one unit per channel per step.
///
/// Yields at most `max_steps` buffers. It also stops after the first buffer in
/// which every channel of every pixel is below `floor`; `floor` is only the
/// stop test, channels keep decreasing toward 0 until then. The sequence
/// cannot be restarted.
pub struct Fade {
    current: PixelGrid,
    floor: u8,
    remaining: usize,
    finished: bool,
}

impl Fade {
    pub fn new(initial: PixelGrid, floor: u8, max_steps: usize) -> Self {
        Self {
            current: initial,
            floor,
            remaining: max_steps,
            finished: false,
        }
    }

    /// Sense HAT defaults.
    pub fn out(initial: PixelGrid) -> Self {
        Self::new(initial, ZERO_BRIGHTNESS, DEFAULT_STEPS)
    }
}

impl Iterator for Fade {
    type Item = PixelGrid;

    fn next(&mut self) -> Option<PixelGrid> {
        if self.finished || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let mut next = PixelGrid::new();
        for (i, p) in self.current.iter().enumerate() {
            next.set(i, p.dimmed());
        }
        self.current = next;

        // one boolean over every channel of every pixel
        if self.current.iter().all(|p| p.below(self.floor)) {
            debug!(remaining = self.remaining, "fade reached floor {}", self.floor);
            self.finished = true;
        }
        Some(self.current.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}
