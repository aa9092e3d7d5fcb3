//! Tile Spawning
//!
//! Free cell lookup and deterministic tile creation.

use crate::core::rng::DeterministicRng;
use crate::game::error::GameError;
use crate::game::tile::{Board, Position, Tile};
use crate::FOUR_SPAWN_PERCENT;

/// All unoccupied cells, column by column (`x` outer, `y` inner).
pub fn free_positions(board: &Board) -> Vec<Position> {
    Position::all()
        .filter(|position| !board.is_occupied(*position))
        .collect()
}

/// Pick one free cell uniformly.
///
/// Fails with [`GameError::NoSpace`] on a full board. Callers only spawn
/// after a moving turn or on a fresh board, so this is a bug guard rather
/// than a game outcome.
pub fn random_free_position(
    board: &Board,
    rng: &mut DeterministicRng,
) -> Result<Position, GameError> {
    let free = free_positions(board);
    rng.choose(&free).copied().ok_or(GameError::NoSpace)
}

/// Create a new tile on a free cell.
///
/// The tile gets `board.next_id()` and value 2, or 4 with a
/// [`FOUR_SPAWN_PERCENT`] chance. The board is not modified.
pub fn spawn_tile(board: &Board, rng: &mut DeterministicRng) -> Result<Tile, GameError> {
    let position = random_free_position(board, rng)?;
    let value = if rng.chance_percent(FOUR_SPAWN_PERCENT) { 4 } else { 2 };

    Ok(Tile::new(board.next_id(), value, position.x, position.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BOARD_SIZE;

    fn full_board() -> Board {
        let tiles = Position::all()
            .enumerate()
            .map(|(i, p)| Tile::new(i as u32 + 1, 2, p.x, p.y))
            .collect();
        Board::from_tiles(tiles).unwrap()
    }

    #[test]
    fn test_free_positions_empty_board() {
        let free = free_positions(&Board::new());
        assert_eq!(free.len(), Board::CELLS);
        assert_eq!(free.first(), Some(&Position::new(1, 1)));
        assert_eq!(free.last(), Some(&Position::new(BOARD_SIZE, BOARD_SIZE)));
    }

    #[test]
    fn test_free_positions_excludes_occupied() {
        let board = Board::from_tiles(vec![
            Tile::new(1, 2, 1, 1),
            Tile::new(2, 2, 3, 2),
        ])
        .unwrap();

        let free = free_positions(&board);
        assert_eq!(free.len(), Board::CELLS - 2);
        assert!(!free.contains(&Position::new(1, 1)));
        assert!(!free.contains(&Position::new(3, 2)));
    }

    #[test]
    fn test_random_free_position_full_board() {
        let mut rng = DeterministicRng::new(1);
        assert_eq!(random_free_position(&full_board(), &mut rng), Err(GameError::NoSpace));
        assert_eq!(spawn_tile(&full_board(), &mut rng), Err(GameError::NoSpace));
    }

    #[test]
    fn test_random_free_position_last_cell() {
        let tiles = Position::all()
            .filter(|p| *p != Position::new(2, 3))
            .enumerate()
            .map(|(i, p)| Tile::new(i as u32 + 1, 2, p.x, p.y))
            .collect();
        let board = Board::from_tiles(tiles).unwrap();
        let mut rng = DeterministicRng::new(77);

        for _ in 0..20 {
            assert_eq!(random_free_position(&board, &mut rng), Ok(Position::new(2, 3)));
        }
    }

    #[test]
    fn test_spawn_tile_ids_and_values() {
        let mut rng = DeterministicRng::new(2024);
        let board = Board::from_tiles(vec![Tile::new(5, 8, 1, 1)]).unwrap();

        for _ in 0..200 {
            let tile = spawn_tile(&board, &mut rng).unwrap();
            assert_eq!(tile.id, 6);
            assert!(tile.value == 2 || tile.value == 4);
            assert!(tile.position().is_on_board());
            assert_ne!(tile.position(), Position::new(1, 1));
        }

        assert_eq!(spawn_tile(&Board::new(), &mut rng).unwrap().id, 1);
    }

    #[test]
    fn test_spawn_value_ratio() {
        let mut rng = DeterministicRng::new(31337);
        let board = Board::new();
        let fours = (0..10_000)
            .filter(|_| spawn_tile(&board, &mut rng).map(|t| t.value == 4).unwrap_or(false))
            .count();

        assert!((800..1200).contains(&fours), "got {fours} fours");
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let mut rng1 = DeterministicRng::new(9);
        let mut rng2 = DeterministicRng::new(9);

        for _ in 0..50 {
            assert_eq!(
                spawn_tile(&Board::new(), &mut rng1),
                spawn_tile(&Board::new(), &mut rng2)
            );
        }
    }
}
