use crate::coord::{self, EXTENT};
use crate::error::{MatrixError, Result};
use crate::grid::{PixelGrid, Rgb};
use crate::repeat::Repeat;

pub const MIN_RADIUS: u8 = 1;
pub const MAX_RADIUS: u8 = EXTENT as u8;

/// One frame of the pulse: a rounded diamond ring of `radius` lit in `colour`,
/// everything else off.
pub fn frame(colour: Rgb, radius: u8) -> Result<PixelGrid> {
    if !(MIN_RADIUS..=MAX_RADIUS).contains(&radius) {
        return Err(MatrixError::InvalidRadius(radius));
    }

    let mut grid = PixelGrid::new();
    let r = radius as i8;
    for pix in (-r..=r).filter(|&p| p != 0) {
        // outermost diagonal corners stay dark so the ring reads round
        if -EXTENT < pix && pix < EXTENT {
            set_mirrored(&mut grid, pix, -pix, colour)?;
        }
        set_mirrored(&mut grid, 1, pix, colour)?;
        if pix.abs() > 2 {
            set_mirrored(&mut grid, 2, pix, colour)?;
        }
    }
    Ok(grid)
}

/// Light `(x, y)` together with `(-x, y)`, `(y, x)` and `(y, -x)`.
fn set_mirrored(grid: &mut PixelGrid, x: i8, y: i8, colour: Rgb) -> Result<()> {
    for a in [x, -x] {
        grid.set(coord::to_index(a, y)?, colour);
        grid.set(coord::to_index(y, a)?, colour);
    }
    Ok(())
}

/// Radii of a single pulse: grow 1..=4 then shrink 4..=1.
pub fn cycle_radii() -> impl Iterator<Item = u8> + Clone {
    (MIN_RADIUS..=MAX_RADIUS).chain((MIN_RADIUS..=MAX_RADIUS).rev())
}

/// Frames for a run of pulses. Frames are computed on demand; pacing is up
/// to the caller.
pub struct PulseSequence {
    colour: Rgb,
    repeat: Repeat,
    cycles_done: u32,
    step: usize,
}

const STEPS_PER_CYCLE: usize = 2 * MAX_RADIUS as usize;

impl PulseSequence {
    pub fn new(colour: Rgb, repeat: Repeat) -> Self {
        Self {
            colour,
            repeat,
            cycles_done: 0,
            step: 0,
        }
    }
}

impl Iterator for PulseSequence {
    type Item = PixelGrid;

    fn next(&mut self) -> Option<PixelGrid> {
        if !self.repeat.allows(self.cycles_done) {
            return None;
        }
        let radius = cycle_radii().nth(self.step)?;
        self.step += 1;
        if self.step == STEPS_PER_CYCLE {
            self.step = 0;
            self.cycles_done = self.cycles_done.saturating_add(1);
        }
        // radius always comes from cycle_radii, which stays in range
        frame(self.colour, radius).ok()
    }
}
