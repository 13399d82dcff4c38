// Program text to grid

use crate::constants::{BLANK_CELL, GRID_HEIGHT, GRID_WIDTH};
use crate::engine::errors::FungeResult;
use crate::space::{Coord, DenseTorus, Space};

/// Lay `source` out on a Befunge-93 grid
///
/// Each line becomes a row starting at column 0. The grid is 80×25 unless the
/// source is wider or taller, in which case it grows to fit. Lines may end in
/// `\n` or `\r\n`; cells the source does not cover are spaces.
pub fn load_program(source: &str) -> FungeResult<DenseTorus<u8>> {
    let lines: Vec<&[u8]> = source.lines().map(str::as_bytes).collect();

    let width = lines
        .iter()
        .map(|line| line.len())
        .max()
        .unwrap_or(0)
        .max(GRID_WIDTH);
    let height = lines.len().max(GRID_HEIGHT);

    let mut grid = DenseTorus::new(&[width, height], BLANK_CELL)?;
    for (y, line) in lines.iter().enumerate() {
        for (x, &cell) in line.iter().enumerate() {
            if cell != BLANK_CELL {
                grid.write(&Coord::from([x as i64, y as i64]), cell)?;
            }
        }
    }
    Ok(grid)
}
