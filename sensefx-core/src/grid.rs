use crate::error::{MatrixError, Result};

/// One LED: three 0-255 channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// One step darker on every channel, saturating at 0.
    pub fn dimmed(self) -> Self {
        Self {
            r: self.r.saturating_sub(1),
            g: self.g.saturating_sub(1),
            b: self.b.saturating_sub(1),
        }
    }

    /// True when every channel is strictly below `floor`.
    pub fn below(&self, floor: u8) -> bool {
        self.r < floor && self.g < floor && self.b < floor
    }
}

/// Display rotation in clockwise degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(deg: u16) -> Option<Self> {
        match deg {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// The 8x8 frame buffer: 64 pixels, row-major, `index = row * 8 + col`.
///
/// Each grid owns its pixels outright; copies are independent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: [Rgb; PixelGrid::LEN],
}

impl PixelGrid {
    pub const WIDTH: usize = 8;
    pub const HEIGHT: usize = 8;
    pub const LEN: usize = Self::WIDTH * Self::HEIGHT;

    /// All pixels off.
    pub fn new() -> Self {
        Self::filled(Rgb::OFF)
    }

    pub fn filled(colour: Rgb) -> Self {
        Self {
            pixels: [colour; Self::LEN],
        }
    }

    /// Build from an arbitrary pixel list, which must hold exactly 64 entries.
    pub fn from_pixels(pixels: &[Rgb]) -> Result<Self> {
        let pixels: [Rgb; Self::LEN] = pixels
            .try_into()
            .map_err(|_| MatrixError::MalformedTemplate { len: pixels.len() })?;
        Ok(Self { pixels })
    }

    pub fn get(&self, index: usize) -> Rgb {
        self.pixels[index]
    }

    pub fn set(&mut self, index: usize, colour: Rgb) {
        self.pixels[index] = colour;
    }

    pub fn at(&self, row: usize, col: usize) -> Rgb {
        self.pixels[row * Self::WIDTH + col]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.pixels.iter()
    }

    pub fn is_off(&self) -> bool {
        self.pixels.iter().all(|p| *p == Rgb::OFF)
    }

    /// Indices where the two grids differ.
    pub fn diff(&self, other: &PixelGrid) -> Vec<usize> {
        (0..Self::LEN)
            .filter(|&i| self.pixels[i] != other.pixels[i])
            .collect()
    }

    /// The grid as it appears after turning the panel clockwise.
    pub fn rotated(&self, rotation: Rotation) -> PixelGrid {
        let n = Self::WIDTH - 1;
        let mut out = PixelGrid::new();
        for row in 0..Self::HEIGHT {
            for col in 0..Self::WIDTH {
                let (r, c) = match rotation {
                    Rotation::Deg0 => (row, col),
                    Rotation::Deg90 => (col, n - row),
                    Rotation::Deg180 => (n - row, n - col),
                    Rotation::Deg270 => (n - col, row),
                };
                out.pixels[r * Self::WIDTH + c] = self.at(row, col);
            }
        }
        out
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pixels_rejects_wrong_length() {
        let short = vec![Rgb::OFF; 63];
        assert_eq!(
            PixelGrid::from_pixels(&short),
            Err(MatrixError::MalformedTemplate { len: 63 })
        );
        assert!(PixelGrid::from_pixels(&[Rgb::OFF; 64]).is_ok());
    }

    #[test]
    fn rotation_moves_top_left_corner() {
        let red = Rgb::new(255, 0, 0);
        let mut grid = PixelGrid::new();
        grid.set(0, red);

        assert_eq!(grid.rotated(Rotation::Deg0).get(0), red);
        assert_eq!(grid.rotated(Rotation::Deg90).get(7), red);
        assert_eq!(grid.rotated(Rotation::Deg180).get(63), red);
        assert_eq!(grid.rotated(Rotation::Deg270).get(56), red);

        let back = grid
            .rotated(Rotation::Deg90)
            .rotated(Rotation::Deg90)
            .rotated(Rotation::Deg180);
        assert_eq!(back, grid);
    }

    #[test]
    fn dimming_saturates_at_zero() {
        let c = Rgb::new(1, 0, 200).dimmed();
        assert_eq!(c, Rgb::new(0, 0, 199));
        assert!(Rgb::new(46, 46, 46).below(47));
        assert!(!Rgb::new(46, 47, 0).below(47));
    }
}
