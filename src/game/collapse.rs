//! Line Collapse
//!
//! Slides and merges every line of the board toward one edge.
//!
//! # Merge Rule
//!
//! Each line is walked once, front to back (front = destination edge). A
//! tile merges into the tile directly ahead of it when their values match,
//! unless that tile was itself consumed in this pass. The doubled tile is
//! never compared again, so `[2, 2, 2]` becomes `[4, 2]`, and
//! `[2, 2, 2, 2]` becomes `[4, 4]`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

use crate::game::tile::{Board, Direction, Tile, TileId, TileView};
use crate::BOARD_SIZE;

// =============================================================================
// MOVE CONFIGURATION
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn get(self, tile: &Tile) -> u8 {
        match self {
            Axis::X => tile.x,
            Axis::Y => tile.y,
        }
    }

    #[inline]
    fn set(self, tile: &mut Tile, value: u8) {
        match self {
            Axis::X => tile.x = value,
            Axis::Y => tile.y = value,
        }
    }
}

/// How one direction maps onto lines and coordinates.
#[derive(Clone, Copy, Debug)]
struct MoveConfig {
    /// Coordinate that identifies the line (unchanged by the move)
    line: Axis,
    /// Coordinate the tiles slide along
    moving: Axis,
    /// Destination edge is coordinate 1 rather than BOARD_SIZE
    toward_origin: bool,
}

impl MoveConfig {
    fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self { line: Axis::X, moving: Axis::Y, toward_origin: true },
            Direction::Down => Self { line: Axis::X, moving: Axis::Y, toward_origin: false },
            Direction::Left => Self { line: Axis::Y, moving: Axis::X, toward_origin: true },
            Direction::Right => Self { line: Axis::Y, moving: Axis::X, toward_origin: false },
        }
    }

    /// Tiles closest to the destination edge sort first.
    fn order(self, a: &Tile, b: &Tile) -> Ordering {
        let by_coord = self.moving.get(a).cmp(&self.moving.get(b));
        if self.toward_origin {
            by_coord
        } else {
            by_coord.reverse()
        }
    }

    /// Moving coordinate of the survivor with the given 0-based rank.
    fn destination(self, rank: u8) -> u8 {
        if self.toward_origin {
            rank + 1
        } else {
            BOARD_SIZE - rank
        }
    }
}

// =============================================================================
// COLLAPSE RESULT
// =============================================================================

/// One merge: `absorbed` slid into `survivor`, which now holds `value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    /// Tile that keeps its ID
    pub survivor: TileId,
    /// Tile consumed by the merge
    pub absorbed: TileId,
    /// Survivor's new value
    pub value: u32,
}

/// Result of collapsing a board in one direction.
///
/// `tiles` holds every input tile at its post-move coordinate, including the
/// consumed ones, which sit on the cell of the tile they merged into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collapse {
    /// Direction that was applied
    pub direction: Direction,
    /// All tiles after the move, consumed ones included
    pub tiles: Vec<Tile>,
    /// IDs of tiles that absorbed another tile
    pub merged: BTreeSet<TileId>,
    /// IDs of tiles consumed by a merge
    pub removed: BTreeSet<TileId>,
    /// Merges in line order
    pub merges: Vec<Merge>,
    /// Any tile changed coordinate
    pub moved: bool,
    next_id: TileId,
}

impl Collapse {
    /// Tiles that survive the turn.
    pub fn survivors(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |t| !self.removed.contains(&t.id))
    }

    /// Score earned by this collapse: the new values of all merged tiles.
    pub fn score_delta(&self) -> u32 {
        self.tiles
            .iter()
            .filter(|t| self.merged.contains(&t.id))
            .map(|t| t.value)
            .sum()
    }

    /// Render frame with merge and removal flags.
    pub fn views(&self) -> Vec<TileView> {
        self.tiles
            .iter()
            .map(|t| TileView {
                merged: self.merged.contains(&t.id),
                removed: self.removed.contains(&t.id),
                ..TileView::settled(t)
            })
            .collect()
    }

    /// Drop consumed tiles and clear flags, giving the settled board.
    pub fn settle(&self) -> Board {
        Board::from_settled(self.survivors().copied().collect(), self.next_id)
    }
}

// =============================================================================
// COLLAPSE
// =============================================================================

/// Slide and merge every line toward `direction`.
///
/// The input board is only read; speculative calls (terminal detection) are
/// free of side effects.
pub fn collapse(board: &Board, direction: Direction) -> Collapse {
    let config = MoveConfig::for_direction(direction);
    let mut tiles: Vec<Tile> = board.tiles().to_vec();
    let mut merged = BTreeSet::new();
    let mut removed = BTreeSet::new();
    let mut merges = Vec::new();
    let mut moved = false;

    for line in 1..=BOARD_SIZE {
        let mut order: Vec<usize> = (0..tiles.len())
            .filter(|&i| config.line.get(&tiles[i]) == line)
            .collect();
        order.sort_by(|&a, &b| config.order(&tiles[a], &tiles[b]));

        // 1. Merge pass
        let mut consumed = vec![false; order.len()];
        for k in 1..order.len() {
            if consumed[k - 1] {
                continue;
            }
            let (prev, cur) = (order[k - 1], order[k]);
            if tiles[prev].value == tiles[cur].value {
                tiles[prev].value *= 2;
                consumed[k] = true;

                merged.insert(tiles[prev].id);
                removed.insert(tiles[cur].id);
                merges.push(Merge {
                    survivor: tiles[prev].id,
                    absorbed: tiles[cur].id,
                    value: tiles[prev].value,
                });
            }
        }

        // 2. Compaction pass
        let mut rank = 0u8;
        let mut previous_coord = 0u8;
        for (k, &idx) in order.iter().enumerate() {
            let target = if consumed[k] {
                // consumed[0] is never set, so a predecessor exists
                previous_coord
            } else {
                let coord = config.destination(rank);
                rank += 1;
                coord
            };

            if config.moving.get(&tiles[idx]) != target {
                moved = true;
            }
            config.moving.set(&mut tiles[idx], target);
            previous_coord = target;
        }
    }

    Collapse {
        direction,
        tiles,
        merged,
        removed,
        merges,
        moved,
        next_id: board.next_id(),
    }
}
