//! Icons are written as 64 single-letter palette codes, one per pixel,
//! row-major. Whitespace anywhere in the text is ignored.

use crate::error::{MatrixError, Result};
use crate::grid::{PixelGrid, Rgb};

/// A named colour with its template code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    pub code: char,
    pub name: &'static str,
    pub colour: Rgb,
}

const fn entry(code: char, name: &'static str, r: u8, g: u8, b: u8) -> PaletteEntry {
    PaletteEntry {
        code,
        name,
        colour: Rgb::new(r, g, b),
    }
}

pub const PALETTE: [PaletteEntry; 15] = [
    entry('W', "white", 255, 255, 255),
    entry('R', "red", 255, 0, 0),
    entry('G', "green", 0, 255, 0),
    entry('B', "blue", 0, 0, 255),
    entry('C', "cyan", 0, 255, 255),
    entry('M', "magenta", 255, 0, 255),
    entry('Y', "yellow", 255, 255, 0),
    entry('K', "black", 0, 0, 0),
    entry('O', "orange", 255, 128, 0),
    entry('P', "pink", 255, 0, 127),
    entry('L', "lime", 128, 255, 0),
    entry('T', "turquoise", 0, 255, 128),
    entry('U', "ultramarine", 0, 128, 255),
    entry('V', "violet", 127, 0, 255),
    entry('S', "stone", 128, 128, 128),
];

pub fn colour_for_code(code: char) -> Result<Rgb> {
    PALETTE
        .iter()
        .find(|e| e.code == code)
        .map(|e| e.colour)
        .ok_or(MatrixError::UnknownColorCode(code))
}

pub fn code_for_colour(colour: Rgb) -> Result<char> {
    PALETTE
        .iter()
        .find(|e| e.colour == colour)
        .map(|e| e.code)
        .ok_or(MatrixError::NoPaletteCode(colour))
}

/// Case-insensitive lookup by colour name.
pub fn named(name: &str) -> Option<Rgb> {
    PALETTE
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name))
        .map(|e| e.colour)
}

/// Decode template text into a grid.
pub fn decode(text: &str) -> Result<PixelGrid> {
    let pixels = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(colour_for_code)
        .collect::<Result<Vec<Rgb>>>()?;
    PixelGrid::from_pixels(&pixels)
}

/// Encode a grid back to 64 codes without whitespace.
pub fn encode(grid: &PixelGrid) -> Result<String> {
    grid.iter().map(|&c| code_for_colour(c)).collect()
}

const SAMPLE: &str = "
    WRGBCMYK
    WRGBCMYK
    WRGBCMYK
    WRGBCMYK
    WRGBCMYK
    WRGBCMYK
    WRGBCMYK
    WRGBCMYK
";

const TEMPLATE: &str = "
    BBBBBBBB
    BBBBBBBB
    BBBBBBBB
    BBBBBBBB
    BBBBBBBB
    BBBBBBBB
    BBBBBBBB
    BBBBBBBB
";

const ESTELADA: &str = "
    BYYYYYYY
    BBRRRRRR
    BBBYYYYY
    BWBBRRRR
    BBBYYYYY
    BBRRRRRR
    BYYYYYYY
    KKKKKKKK
";

/// The built-in icons, by name.
pub struct IconStore {
    icons: &'static [(&'static str, &'static str)],
}

impl IconStore {
    pub fn builtin() -> Self {
        Self {
            icons: &[("sample", SAMPLE), ("template", TEMPLATE), ("estelada", ESTELADA)],
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.icons.iter().map(|(name, _)| *name)
    }

    pub fn get(&self, name: &str) -> Result<PixelGrid> {
        let (_, text) = self
            .icons
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| MatrixError::UnknownIcon(name.to_string()))?;
        decode(text)
    }
}

impl Default for IconStore {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_icon_decodes() {
        let store = IconStore::builtin();
        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, vec!["sample", "template", "estelada"]);
        for name in names {
            assert!(store.get(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn sample_rows_cycle_through_the_first_eight_codes() {
        let grid = IconStore::builtin().get("sample").unwrap();
        for row in 0..8 {
            assert_eq!(grid.at(row, 0), Rgb::new(255, 255, 255));
            assert_eq!(grid.at(row, 3), Rgb::new(0, 0, 255));
            assert_eq!(grid.at(row, 7), Rgb::OFF);
        }
    }

    #[test]
    fn decode_then_encode_gives_back_the_codes() {
        let text = "WRGBCMYK OPLTUVSW\n\tKKKKKKKK RRRRRRRR GGGGGGGG BBBBBBBB YYYYYYYY SSSSSSSS";
        let grid = decode(text).unwrap();
        let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(encode(&grid).unwrap(), stripped);
    }

    #[test]
    fn unknown_code_fails_closed() {
        let mut text = "K".repeat(63);
        text.push('X');
        assert_eq!(decode(&text), Err(MatrixError::UnknownColorCode('X')));
        // lower case is not a palette code either
        assert_eq!(decode(&"w".repeat(64)), Err(MatrixError::UnknownColorCode('w')));
    }

    #[test]
    fn wrong_length_is_malformed() {
        assert_eq!(decode(&"K".repeat(65)), Err(MatrixError::MalformedTemplate { len: 65 }));
        assert_eq!(decode("   "), Err(MatrixError::MalformedTemplate { len: 0 }));
    }

    #[test]
    fn off_palette_colour_cannot_be_encoded() {
        let mut grid = PixelGrid::new();
        grid.set(5, Rgb::new(1, 2, 3));
        assert_eq!(encode(&grid), Err(MatrixError::NoPaletteCode(Rgb::new(1, 2, 3))));
    }

    #[test]
    fn unknown_icon_name() {
        assert_eq!(
            IconStore::builtin().get("nope"),
            Err(MatrixError::UnknownIcon("nope".to_string()))
        );
    }

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(named("Ultramarine"), Some(Rgb::new(0, 128, 255)));
        assert_eq!(named("mauve"), None);
        assert_eq!(colour_for_code('S'), Ok(Rgb::new(128, 128, 128)));
    }
}
