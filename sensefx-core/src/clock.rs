//! A tiny analogue clock. The face can show eight hour positions and sixteen
//! minute positions, so hands snap to the nearest segment.

use chrono::{Local, NaiveTime, Timelike};

use crate::error::{MatrixError, Result};
use crate::grid::{PixelGrid, Rgb};
use crate::icon;

const FACE: &str = "
    RRRRRRRK
    RKKKKKRK
    RKKKKKRK
    RKKRKKRK
    RKKKKKRK
    RKKKKKRK
    RRRRRRRK
    KKKKKKKK
";

const HOUR_SEGMENTS: i32 = 8;
const MINUTE_SEGMENTS: i32 = 16;

/// Pixel for hour segment `i`, stored at `i + 1` (segment -1 wraps onto 7).
const HOUR_PIXELS: [usize; 9] = [19, 20, 28, 36, 35, 34, 26, 18, 19];

/// Pixels for minute segment `i`, stored at `i + 1`. Diagonal positions use
/// two pixels so the hand stays centred.
const MINUTE_PIXELS: [&[usize]; 17] = [
    &[19, 11],
    &[19, 12],
    &[20, 13],
    &[28, 21],
    &[28, 29],
    &[28, 37],
    &[36, 45],
    &[35, 44],
    &[35, 43],
    &[35, 42],
    &[34, 41],
    &[26, 33],
    &[26, 25],
    &[26, 17],
    &[18, 9],
    &[19, 10],
    &[19, 11],
];

/// First segment `i` in `-1..segments` with
/// `shift + interval * i <= value <= shift + interval * (i + 1)`.
/// Scan order settles values sitting exactly on a boundary.
fn segment(value: f64, span: f64, segments: i32) -> Option<i32> {
    let interval = span / segments as f64;
    let shift = interval / 2.0;
    (-1..segments).find(|&i| {
        let lo = shift + interval * i as f64;
        let hi = shift + interval * (i + 1) as f64;
        lo <= value && value <= hi
    })
}

/// Renders the clock face with both hands highlighted.
#[derive(Clone, Debug)]
pub struct ClockFace {
    face: PixelGrid,
    highlight: Rgb,
}

impl ClockFace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            face: icon::decode(FACE)?,
            highlight: Rgb::new(255, 255, 255),
        })
    }

    pub fn with_highlight(mut self, colour: Rgb) -> Self {
        self.highlight = colour;
        self
    }

    /// The face with no hands drawn.
    pub fn face(&self) -> &PixelGrid {
        &self.face
    }

    /// `hour` in `[0, 12)` (fractional allowed), `minute` in `[0, 60)`.
    pub fn render(&self, hour: f64, minute: f64) -> Result<PixelGrid> {
        if !(0.0..12.0).contains(&hour) || !(0.0..60.0).contains(&minute) {
            return Err(MatrixError::InvalidTimeValue { hour, minute });
        }

        // a fractional hour plus minutes can run past 12; wrap back onto the face
        let decimal_time = (hour % 12.0 + minute / 60.0) % 12.0;
        let hour_seg = segment(decimal_time, 12.0, HOUR_SEGMENTS)
            .ok_or(MatrixError::InvalidTimeValue { hour, minute })?;
        let minute_seg = segment(minute, 60.0, MINUTE_SEGMENTS)
            .ok_or(MatrixError::InvalidTimeValue { hour, minute })?;

        let mut grid = self.face.clone();
        grid.set(HOUR_PIXELS[(hour_seg + 1) as usize], self.highlight);
        for &px in MINUTE_PIXELS[(minute_seg + 1) as usize] {
            grid.set(px, self.highlight);
        }
        Ok(grid)
    }

    pub fn render_time(&self, time: ClockTime) -> Result<PixelGrid> {
        self.render((time.hour % 12) as f64, time.minute as f64)
    }
}

/// Wall-clock hour (0-23) and minute (0-59).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    /// Parse a 24-hour `HHMM` string, e.g. `"0930"`.
    pub fn parse(hhmm: &str) -> Result<Self> {
        let invalid = || MatrixError::InvalidTimeFormat(hhmm.to_string());
        if hhmm.len() != 4 || !hhmm.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let t = NaiveTime::parse_from_str(hhmm, "%H%M").map_err(|_| invalid())?;
        Ok(Self::from_timelike(&t))
    }

    fn from_timelike(t: &impl Timelike) -> Self {
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }
}

/// Where the clock gets its time from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClockSource {
    Now,
    Fixed(String),
}

impl ClockSource {
    pub fn read(&self) -> Result<ClockTime> {
        match self {
            ClockSource::Now => Ok(ClockTime::from_timelike(&Local::now())),
            ClockSource::Fixed(hhmm) => ClockTime::parse(hhmm),
        }
    }
}
