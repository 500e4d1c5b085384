//! Centered coordinates: both axes run -4..=-1 and 1..=4, there is no zero
//! row or column. `(-4, 4)` is the top-left pixel, `(4, -4)` the bottom-right.
//!
//! ```text
//!    -4 -3 -2 -1 +1 +2 +3 +4
//! +4  00 01 02 03 04 05 06 07
//! +3  08 09 10 11 12 13 14 15
//!  ..
//! -4  56 57 58 59 60 61 62 63
//! ```

use crate::error::{MatrixError, Result};
use crate::grid::PixelGrid;

/// Largest magnitude on either axis.
pub const EXTENT: i8 = 4;

/// All valid values on one axis, ascending.
pub const AXIS: [i8; 8] = [-4, -3, -2, -1, 1, 2, 3, 4];

/// Map a centered `(x, y)` to a linear grid index.
pub fn to_index(x: i8, y: i8) -> Result<usize> {
    if !valid(x) || !valid(y) {
        return Err(MatrixError::InvalidCoordinate { x, y });
    }

    // shift onto 0..=8 then close the gap left by the missing zero
    let mut a = (x + EXTENT) as usize;
    let mut b = (EXTENT - y) as usize;
    if a > 4 {
        a -= 1;
    }
    if b > 4 {
        b -= 1;
    }
    Ok(a + PixelGrid::WIDTH * b)
}

fn valid(v: i8) -> bool {
    v != 0 && (-EXTENT..=EXTENT).contains(&v)
}
