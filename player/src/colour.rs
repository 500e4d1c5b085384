use anyhow::{bail, Context};

use sensefx_core::icon;
use sensefx_core::{Rgb, Rotation};

/// `--colour` values: a palette name (`orange`), a palette code (`O`), or
/// `#rrggbb`.
pub fn parse_colour(s: &str) -> anyhow::Result<Rgb> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            bail!("expected #rrggbb, got {s:?}");
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).with_context(|| format!("bad hex colour {s:?}"))
        };
        return Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?));
    }

    let mut chars = s.chars();
    if let (Some(code), None) = (chars.next(), chars.next()) {
        return Ok(icon::colour_for_code(code.to_ascii_uppercase())?);
    }

    match icon::named(s) {
        Some(c) => Ok(c),
        None => {
            let known: Vec<&str> = icon::PALETTE.iter().map(|e| e.name).collect();
            bail!("unknown colour {s:?}; try one of {}", known.join(", "))
        }
    }
}

pub fn parse_rotation(s: &str) -> anyhow::Result<Rotation> {
    let deg: u16 = s.trim().parse().with_context(|| format!("bad rotation {s:?}"))?;
    Rotation::from_degrees(deg).with_context(|| format!("rotation must be 0, 90, 180 or 270, got {deg}"))
}
