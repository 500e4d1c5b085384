use std::error::Error;
use std::fmt;

use crate::grid::Rgb;

/// Everything that can go wrong inside the core. Every operation either
/// returns a complete buffer or one of these; nothing is retried here.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// A centered coordinate was zero or outside -4..=4.
    InvalidCoordinate { x: i8, y: i8 },
    /// Pulse ring radius outside 1..=4.
    InvalidRadius(u8),
    /// Hour or minute outside its domain (or not finite).
    InvalidTimeValue { hour: f64, minute: f64 },
    /// Injected clock string was not four `HHMM` digits.
    InvalidTimeFormat(String),
    /// Icon template contained a code with no palette entry.
    UnknownColorCode(char),
    /// Icon template (or raw pixel list) did not hold exactly 64 pixels.
    MalformedTemplate { len: usize },
    /// The display collaborator could not be reached.
    SinkUnavailable(String),
    /// No icon registered under this name.
    UnknownIcon(String),
    /// A pixel colour has no single-character palette code.
    NoPaletteCode(Rgb),
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::InvalidCoordinate { x, y } => {
                write!(f, "invalid coordinate ({x}, {y}): both axes must be in -4..=4 and non-zero")
            }
            MatrixError::InvalidRadius(r) => write!(f, "invalid ring radius {r}: expected 1..=4"),
            MatrixError::InvalidTimeValue { hour, minute } => {
                write!(f, "invalid time {hour}h {minute}m: expected hour in [0, 12) and minute in [0, 60)")
            }
            MatrixError::InvalidTimeFormat(s) => write!(f, "invalid time {s:?}: expected HHMM"),
            MatrixError::UnknownColorCode(c) => write!(f, "unknown colour code {c:?}"),
            MatrixError::MalformedTemplate { len } => {
                write!(f, "malformed template: {len} pixels, expected 64")
            }
            MatrixError::SinkUnavailable(why) => write!(f, "display unavailable: {why}"),
            MatrixError::UnknownIcon(name) => write!(f, "unknown icon {name:?}"),
            MatrixError::NoPaletteCode(c) => {
                write!(f, "colour ({}, {}, {}) has no palette code", c.r, c.g, c.b)
            }
        }
    }
}

impl Error for MatrixError {}

pub type Result<T> = std::result::Result<T, MatrixError>;
