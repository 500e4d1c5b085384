use sensefx_core::{PixelGrid, Rgb};

const HALF_BLOCK: &str = "▄";

/// A single terminal cell: background = upper pixel, foreground = lower pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub top: Rgb,
    pub bottom: Rgb,
}

/// A changed cell: position + new cell data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeltaCell {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

/// Largest `--scale`; keeps the footprint well inside `u16`.
pub const MAX_SCALE: u16 = 64;

/// Terminal footprint of the matrix at a given scale, in cells.
pub fn cell_size(scale: u16) -> (u16, u16) {
    let side = PixelGrid::WIDTH as u16 * scale;
    (side, side / 2)
}

/// Blow the 8x8 grid up by `scale` and fold pixel rows in pairs onto
/// half-block cells. Output is row-major, `cell_size(scale)` in extent.
pub fn grid_to_cells(grid: &PixelGrid, scale: u16) -> Vec<Cell> {
    let scale = scale.max(1) as usize;
    let (cols, rows) = cell_size(scale as u16);
    let mut cells = Vec::with_capacity(cols as usize * rows as usize);

    for row in 0..rows as usize {
        let top_y = row * 2 / scale;
        let bot_y = (row * 2 + 1) / scale;
        for col in 0..cols as usize {
            let x = col / scale;
            cells.push(Cell {
                top: grid.at(top_y, x),
                bottom: grid.at(bot_y, x),
            });
        }
    }

    cells
}

/// Result of comparing two frames.
pub enum FrameDiff {
    /// Redraw everything (no previous frame, or most cells changed).
    Full(Vec<Cell>),
    /// Only the changed cells.
    Delta(Vec<DeltaCell>),
}

pub fn compute_delta(prev: &[Cell], current: &[Cell], cols: u16) -> FrameDiff {
    if prev.len() != current.len() {
        return FrameDiff::Full(current.to_vec());
    }

    let total = current.len();
    let mut deltas = Vec::new();

    for i in 0..total {
        if current[i] != prev[i] {
            deltas.push(DeltaCell {
                x: (i % cols as usize) as u16,
                y: (i / cols as usize) as u16,
                cell: current[i],
            });
        }
    }

    // If >60% of cells changed, just redraw the lot
    if deltas.len() > total * 60 / 100 {
        FrameDiff::Full(current.to_vec())
    } else {
        FrameDiff::Delta(deltas)
    }
}

/// Render every cell, row by row, starting at 1-indexed `origin` (row, col).
/// Colour escapes are skipped when they repeat the previous cell's.
pub fn render_full(cells: &[Cell], cols: u16, rows: u16, origin: (u16, u16), buf: &mut Vec<u8>) {
    buf.clear();

    let mut prev: Option<Cell> = None;

    for row in 0..rows {
        write_cursor_pos(buf, origin.0 + row, origin.1);
        for col in 0..cols {
            let cell = cells[row as usize * cols as usize + col as usize];
            if prev.map_or(true, |p| p.top != cell.top) {
                write_bg(buf, cell.top);
            }
            if prev.map_or(true, |p| p.bottom != cell.bottom) {
                write_fg(buf, cell.bottom);
            }
            prev = Some(cell);
            buf.extend_from_slice(HALF_BLOCK.as_bytes());
        }
    }

    buf.extend_from_slice(b"\x1b[0m");
}

/// Render only the changed cells.
pub fn render_delta(deltas: &[DeltaCell], origin: (u16, u16), buf: &mut Vec<u8>) {
    buf.clear();

    for d in deltas {
        write_cursor_pos(buf, origin.0 + d.y, origin.1 + d.x);
        write_bg(buf, d.cell.top);
        write_fg(buf, d.cell.bottom);
        buf.extend_from_slice(HALF_BLOCK.as_bytes());
    }

    if !deltas.is_empty() {
        buf.extend_from_slice(b"\x1b[0m");
    }
}

fn write_bg(buf: &mut Vec<u8>, c: Rgb) {
    buf.extend_from_slice(b"\x1b[48;2;");
    write_rgb(buf, c);
    buf.push(b'm');
}

fn write_fg(buf: &mut Vec<u8>, c: Rgb) {
    buf.extend_from_slice(b"\x1b[38;2;");
    write_rgb(buf, c);
    buf.push(b'm');
}

fn write_rgb(buf: &mut Vec<u8>, c: Rgb) {
    write_u16(buf, c.r as u16);
    buf.push(b';');
    write_u16(buf, c.g as u16);
    buf.push(b';');
    write_u16(buf, c.b as u16);
}

fn write_cursor_pos(buf: &mut Vec<u8>, row: u16, col: u16) {
    buf.extend_from_slice(b"\x1b[");
    write_u16(buf, row);
    buf.push(b';');
    write_u16(buf, col);
    buf.push(b'H');
}

/// Integer-to-ASCII without allocating.
fn write_u16(buf: &mut Vec<u8>, v: u16) {
    let mut digits = [0u8; 5];
    let mut n = v;
    let mut len = 0;
    loop {
        digits[len] = b'0' + (n % 10) as u8;
        len += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    buf.extend(digits[..len].iter().rev());
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn unscaled_cells_pair_up_rows() {
        let mut grid = PixelGrid::new();
        grid.set(0, RED); // row 0
        grid.set(9, RED); // row 1, col 1
        let cells = grid_to_cells(&grid, 1);
        assert_eq!(cells.len(), 8 * 4);
        assert_eq!(cells[0], Cell { top: RED, bottom: Rgb::OFF });
        assert_eq!(cells[1], Cell { top: Rgb::OFF, bottom: RED });
    }

    #[test]
    fn scaling_repeats_pixels() {
        let mut grid = PixelGrid::new();
        grid.set(63, RED);
        let cells = grid_to_cells(&grid, 2);
        let (cols, rows) = cell_size(2);
        assert_eq!((cols, rows), (16, 8));
        assert_eq!(cells.len(), 128);
        // last matrix pixel covers a 2x2 block: one full cell, bottom-right
        let last_row = &cells[(rows as usize - 1) * cols as usize..];
        assert_eq!(last_row[14], Cell { top: RED, bottom: RED });
        assert_eq!(last_row[15], Cell { top: RED, bottom: RED });
        assert_eq!(last_row[13], Cell { top: Rgb::OFF, bottom: Rgb::OFF });
    }

    #[test]
    fn small_change_is_a_delta() {
        let before = grid_to_cells(&PixelGrid::new(), 1);
        let mut grid = PixelGrid::new();
        grid.set(10, RED);
        let after = grid_to_cells(&grid, 1);
        match compute_delta(&before, &after, 8) {
            FrameDiff::Delta(d) => {
                assert_eq!(d.len(), 1);
                assert_eq!((d[0].x, d[0].y), (2, 0));
            }
            FrameDiff::Full(_) => panic!("expected delta"),
        }
    }

    #[test]
    fn big_change_or_no_history_is_full() {
        let off = grid_to_cells(&PixelGrid::new(), 1);
        let red = grid_to_cells(&PixelGrid::filled(RED), 1);
        assert!(matches!(compute_delta(&off, &red, 8), FrameDiff::Full(_)));
        assert!(matches!(compute_delta(&[], &red, 8), FrameDiff::Full(_)));
    }

    #[test]
    fn full_render_positions_each_row() {
        let cells = grid_to_cells(&PixelGrid::new(), 1);
        let mut buf = Vec::new();
        render_full(&cells, 8, 4, (3, 10), &mut buf);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("\x1b[3;10H\x1b[48;2;0;0;0m\x1b[38;2;0;0;0m▄"));
        assert!(text.contains("\x1b[6;10H"));
        assert_eq!(text.matches('▄').count(), 32);
        assert!(text.ends_with("\x1b[0m"));
    }

    #[test]
    fn delta_render_moves_to_each_cell() {
        let d = DeltaCell {
            x: 4,
            y: 1,
            cell: Cell { top: RED, bottom: Rgb::OFF },
        };
        let mut buf = Vec::new();
        render_delta(&[d], (1, 1), &mut buf);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "\x1b[2;5H\x1b[48;2;255;0;0m\x1b[38;2;0;0;0m▄\x1b[0m"
        );

        let mut buf = vec![1, 2, 3];
        render_delta(&[], (1, 1), &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn writes_numbers() {
        let mut buf = Vec::new();
        for v in [0, 7, 42, 255, 65535] {
            write_u16(&mut buf, v);
            buf.push(b' ');
        }
        assert_eq!(buf, b"0 7 42 255 65535 ");
    }
}
