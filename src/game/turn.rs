//! Turn Resolution
//!
//! One player input applied end to end: collapse, spawn, score.
//! Pure with respect to the board; randomness comes only from the RNG passed
//! in.

use crate::core::rng::DeterministicRng;
use crate::game::allocator::{free_positions, spawn_tile};
use crate::game::collapse::{collapse, Collapse};
use crate::game::error::GameError;
use crate::game::tile::{Board, Direction, Tile, TileView};
use crate::INITIAL_TILES;

/// Result of a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Direction that was applied
    pub direction: Direction,
    /// Settled board after the turn (spawned tile included)
    pub board: Board,
    /// Whether any tile changed coordinate
    pub moved: bool,
    /// Sum of merged tile values (0 for a still turn)
    pub score_delta: u32,
    /// Post-collapse frame, before spawn and cleanup
    pub collapse: Collapse,
    /// Tile added after the move
    pub spawned: Option<Tile>,
}

impl TurnOutcome {
    /// Post-collapse frame with the spawned tile appended.
    ///
    /// Consumed tiles are still present and flagged, so a renderer can play
    /// the merge before they disappear.
    pub fn frame(&self) -> Vec<TileView> {
        let mut views = self.collapse.views();
        if let Some(tile) = &self.spawned {
            views.push(TileView::settled(tile));
        }
        views
    }
}

/// Apply one direction to a settled board.
///
/// A turn that moves nothing returns the board unchanged, with no spawn and
/// no score, and does not touch the RNG.
pub fn apply_turn(
    board: &Board,
    direction: Direction,
    rng: &mut DeterministicRng,
) -> Result<TurnOutcome, GameError> {
    let collapse = collapse(board, direction);

    if !collapse.moved {
        return Ok(TurnOutcome {
            direction,
            board: board.clone(),
            moved: false,
            score_delta: 0,
            collapse,
            spawned: None,
        });
    }

    // Score from the post-collapse, pre-spawn board
    let score_delta = collapse.score_delta();

    let mut next = collapse.settle();
    let tile = spawn_tile(&next, rng)?;
    next.insert(tile)?;

    Ok(TurnOutcome {
        direction,
        board: next,
        moved: true,
        score_delta,
        collapse,
        spawned: Some(tile),
    })
}

/// Check for game over: no free cell and no direction changes the board.
pub fn is_terminal(board: &Board) -> bool {
    free_positions(board).is_empty()
        && Direction::ALL
            .iter()
            .all(|direction| !collapse(board, *direction).moved)
}

/// Fresh board with [`INITIAL_TILES`] spawned one after another.
pub fn new_game(rng: &mut DeterministicRng) -> Result<Board, GameError> {
    let mut board = Board::new();
    for _ in 0..INITIAL_TILES {
        let tile = spawn_tile(&board, rng)?;
        board.insert(tile)?;
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::testing::{arb_board, board_from_rows, checkerboard, rows_of};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_new_game() {
        for seed in 0..100 {
            let mut rng = DeterministicRng::new(seed);
            let board = new_game(&mut rng).unwrap();

            assert_eq!(board.len(), 2);
            let tiles = board.tiles();
            assert_ne!(tiles[0].position(), tiles[1].position());
            assert!(tiles.iter().all(|t| t.value == 2 || t.value == 4));
            assert_eq!((tiles[0].id, tiles[1].id), (1, 2));
            assert_eq!(board.next_id(), 3);
        }
    }

    #[test]
    fn test_still_turn() {
        let board = board_from_rows([
            [2, 4, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut rng = DeterministicRng::new(1);
        let rng_before = rng.state();

        let outcome = apply_turn(&board, Direction::Left, &mut rng).unwrap();

        assert!(!outcome.moved);
        assert_eq!(outcome.score_delta, 0);
        assert!(outcome.spawned.is_none());
        assert_eq!(outcome.board, board);
        assert_eq!(rng.state(), rng_before);
    }

    #[test]
    fn test_merge_scores_new_value() {
        let board = board_from_rows([
            [0, 0, 0, 0],
            [8, 0, 8, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut rng = DeterministicRng::new(3);

        let outcome = apply_turn(&board, Direction::Right, &mut rng).unwrap();

        assert!(outcome.moved);
        assert_eq!(outcome.score_delta, 16);
        assert_eq!(outcome.board.len(), 2);

        let spawned = outcome.spawned.unwrap();
        assert_eq!(spawned.id, 3);
        assert_ne!(spawned.position(), crate::game::tile::Position::new(4, 2));
        assert_eq!(rows_of(&outcome.board)[1][3], 16);
    }

    #[test]
    fn test_spawned_tile_never_scores() {
        let board = board_from_rows([
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        for seed in 0..50 {
            let mut rng = DeterministicRng::new(seed);
            let outcome = apply_turn(&board, Direction::Down, &mut rng).unwrap();
            assert_eq!(outcome.score_delta, 0);
            assert!(outcome.spawned.is_some());
        }
    }

    #[test]
    fn test_frame_keeps_consumed_tile() {
        let board = board_from_rows([
            [4, 4, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut rng = DeterministicRng::new(8);
        let outcome = apply_turn(&board, Direction::Left, &mut rng).unwrap();
        let frame = outcome.frame();

        assert_eq!(frame.len(), 3);
        assert_eq!(frame.iter().filter(|v| v.removed).count(), 1);
        assert_eq!(frame.iter().filter(|v| v.merged).count(), 1);
        assert_eq!(outcome.board.len(), 2);
    }

    #[test]
    fn test_checkerboard_is_terminal() {
        let board = board_from_rows(checkerboard());
        assert!(board.is_full());
        assert!(is_terminal(&board));
    }

    #[test]
    fn test_one_equal_pair_is_not_terminal() {
        let mut rows = checkerboard();
        rows[0][0] = 4; // now equal to its right neighbour
        assert!(!is_terminal(&board_from_rows(rows)));

        let mut rows = checkerboard();
        rows[3][3] = 4; // equal to the cell above it
        assert!(!is_terminal(&board_from_rows(rows)));
    }

    #[test]
    fn test_board_with_space_is_not_terminal() {
        let mut rows = checkerboard();
        rows[2][1] = 0;
        assert!(!is_terminal(&board_from_rows(rows)));
        assert!(!is_terminal(&Board::new()));
    }

    #[test]
    fn test_terminal_check_does_not_mutate() {
        let board = board_from_rows(checkerboard());
        let before = board.clone();
        let _ = is_terminal(&board);
        assert_eq!(board, before);
    }

    #[test]
    fn test_ids_never_reused_over_a_game() {
        let mut rng = DeterministicRng::new(404);
        let mut board = new_game(&mut rng).unwrap();
        let mut seen: BTreeSet<u32> = board.tiles().iter().map(|t| t.id).collect();

        for turn in 0..500u32 {
            if is_terminal(&board) {
                break;
            }
            let direction = Direction::ALL[(turn % 4) as usize];
            let outcome = apply_turn(&board, direction, &mut rng).unwrap();
            if let Some(tile) = outcome.spawned {
                assert!(seen.insert(tile.id), "id {} reused", tile.id);
                assert!(seen.iter().all(|id| *id <= tile.id));
            }
            board = outcome.board;
        }
    }

    proptest! {
        #[test]
        fn prop_turn_keeps_cells_unique(board in arb_board(), dir in 0u8..4, seed in any::<u64>()) {
            let direction = Direction::try_from(dir).unwrap();
            let mut rng = DeterministicRng::new(seed);
            let outcome = apply_turn(&board, direction, &mut rng).unwrap();

            let cells: BTreeSet<_> = outcome.board.tiles().iter().map(|t| t.position()).collect();
            prop_assert_eq!(cells.len(), outcome.board.len());

            let expected = outcome.collapse.survivors().count() + usize::from(outcome.moved);
            prop_assert_eq!(outcome.board.len(), expected);
            prop_assert_eq!(outcome.spawned.is_some(), outcome.moved);
        }

        #[test]
        fn prop_terminal_means_no_turn_moves(board in arb_board(), seed in any::<u64>()) {
            let mut rng = DeterministicRng::new(seed);
            if is_terminal(&board) {
                for direction in Direction::ALL {
                    prop_assert!(!apply_turn(&board, direction, &mut rng).unwrap().moved);
                }
            } else if board.is_full() {
                let any_moves = Direction::ALL
                    .iter()
                    .any(|d| apply_turn(&board, *d, &mut rng).map(|o| o.moved).unwrap_or(false));
                prop_assert!(any_moves);
            }
        }
    }
}
