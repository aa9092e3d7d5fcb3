//! Board builders shared by the rules tests.

use proptest::prelude::*;

use crate::game::tile::{Board, Position, Tile};
use crate::BOARD_SIZE;

/// Grid of values, `rows[y - 1][x - 1]`, 0 for an empty cell.
pub type Rows = [[u32; BOARD_SIZE as usize]; BOARD_SIZE as usize];

/// Build a board from rows. IDs are handed out in reading order from 1.
pub fn board_from_rows(rows: Rows) -> Board {
    let mut tiles = Vec::new();
    let mut id = 1;
    for (y, row) in rows.iter().enumerate() {
        for (x, value) in row.iter().enumerate() {
            if *value != 0 {
                tiles.push(Tile::new(id, *value, x as u8 + 1, y as u8 + 1));
                id += 1;
            }
        }
    }
    Board::from_tiles(tiles).expect("test rows form a valid board")
}

/// Read a board back into rows.
pub fn rows_of(board: &Board) -> Rows {
    let mut rows = [[0; BOARD_SIZE as usize]; BOARD_SIZE as usize];
    for tile in board.tiles() {
        rows[tile.y as usize - 1][tile.x as usize - 1] = tile.value;
    }
    rows
}

/// A 2/4 checkerboard: full, with no equal neighbours.
pub fn checkerboard() -> Rows {
    let mut rows = [[0; BOARD_SIZE as usize]; BOARD_SIZE as usize];
    for (y, row) in rows.iter_mut().enumerate() {
        for (x, value) in row.iter_mut().enumerate() {
            *value = if (x + y) % 2 == 0 { 2 } else { 4 };
        }
    }
    rows
}

/// Random boards with values 2..=64 on any subset of cells.
pub fn arb_board() -> impl Strategy<Value = Board> {
    proptest::collection::vec(proptest::option::of(1u32..=6), Board::CELLS).prop_map(|cells| {
        let tiles = Position::all()
            .zip(cells)
            .filter_map(|(position, exponent)| exponent.map(|e| (position, 1u32 << e)))
            .enumerate()
            .map(|(i, (position, value))| Tile::new(i as u32 + 1, value, position.x, position.y))
            .collect();
        Board::from_tiles(tiles).expect("generated board is valid")
    })
}
