//! Tile and Board Definitions
//!
//! A settled board never carries merge flags or consumed tiles; those exist
//! only inside a turn's [`Collapse`](crate::game::collapse::Collapse) and are
//! surfaced to renderers through [`TileView`].

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::game::error::GameError;
use crate::BOARD_SIZE;

/// Unique tile identifier (monotonic, never reused).
pub type TileId = u32;

// =============================================================================
// POSITION
// =============================================================================

/// A grid cell. 1-based: `x` is the column, `y` the row (`y = 1` on top).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column, 1..=BOARD_SIZE
    pub x: u8,
    /// Row, 1..=BOARD_SIZE
    pub y: u8,
}

impl Position {
    /// Create a position.
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Check if the position lies on the board.
    #[inline]
    pub fn is_on_board(self) -> bool {
        (1..=BOARD_SIZE).contains(&self.x) && (1..=BOARD_SIZE).contains(&self.y)
    }

    /// Iterate every cell, column by column.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=BOARD_SIZE).flat_map(|x| (1..=BOARD_SIZE).map(move |y| Position::new(x, y)))
    }
}

// =============================================================================
// TILE
// =============================================================================

/// A numbered tile.
///
/// `==` compares the whole value (id, value and cell). Identity across
/// turns is the `id` alone; use [`Tile::is_same_tile`] for that.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Unique tile ID
    pub id: TileId,
    /// Power of two, starting at 2
    pub value: u32,
    /// Column
    pub x: u8,
    /// Row
    pub y: u8,
}

impl Tile {
    /// Create a tile.
    pub const fn new(id: TileId, value: u32, x: u8, y: u8) -> Self {
        Self { id, value, x, y }
    }

    /// Same tile, possibly moved or merged since.
    #[inline]
    pub fn is_same_tile(&self, other: &Tile) -> bool {
        self.id == other.id
    }

    /// Get the tile's cell.
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Hash this tile for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id);
        hasher.update_u32(self.value);
        hasher.update_u8(self.x);
        hasher.update_u8(self.y);
    }
}

/// What a renderer sees of a tile at a checkpoint.
///
/// `merged` marks a tile that absorbed another this turn; `removed` marks the
/// absorbed tile, drawn on top of its survivor until the turn settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    /// Tile ID
    pub id: TileId,
    /// Tile value
    pub value: u32,
    /// Column
    pub x: u8,
    /// Row
    pub y: u8,
    /// Absorbed another tile this turn
    pub merged: bool,
    /// Consumed by a merge, pending removal
    pub removed: bool,
}

impl TileView {
    /// View of a settled tile (no flags).
    pub fn settled(tile: &Tile) -> Self {
        Self {
            id: tile.id,
            value: tile.value,
            x: tile.x,
            y: tile.y,
            merged: false,
            removed: false,
        }
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Slide direction. Closed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Toward row 1
    Up = 0,
    /// Toward row BOARD_SIZE
    Down = 1,
    /// Toward column 1
    Left = 2,
    /// Toward column BOARD_SIZE
    Right = 3,
}

impl Direction {
    /// All directions, in discriminant order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(GameError::InvalidDirection(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| GameError::InvalidDirection(index.to_string()))
    }
}

// =============================================================================
// BOARD
// =============================================================================

/// A settled board: surviving tiles plus the next tile ID to hand out.
///
/// Deserializing runs the same checks as [`Board::from_tiles`] and also
/// rejects a `next_id` that does not lie above every tile ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    tiles: Vec<Tile>,
    next_id: TileId,
}

/// Unvalidated wire form of a [`Board`].
#[derive(Deserialize)]
struct BoardRepr {
    tiles: Vec<Tile>,
    next_id: TileId,
}

impl TryFrom<BoardRepr> for Board {
    type Error = GameError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        let board = Board::from_tiles(repr.tiles)?;
        if repr.next_id < board.next_id {
            return Err(GameError::InvalidBoard(format!(
                "next_id {} would reuse an existing tile id",
                repr.next_id
            )));
        }
        Ok(Self { tiles: board.tiles, next_id: repr.next_id })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Number of cells on the board.
    pub const CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

    /// Create an empty board.
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            next_id: 1,
        }
    }

    /// Build a board from explicit tiles.
    ///
    /// Rejects off-board coordinates, values that are not a power of two
    /// (or below 2), zero or duplicate IDs, and stacked tiles.
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self, GameError> {
        let mut ids = std::collections::BTreeSet::new();
        let mut cells = std::collections::BTreeSet::new();

        for tile in &tiles {
            if !tile.position().is_on_board() {
                return Err(GameError::InvalidBoard(format!(
                    "tile {} at ({}, {}) is off the board",
                    tile.id, tile.x, tile.y
                )));
            }
            if tile.value < 2 || !tile.value.is_power_of_two() {
                return Err(GameError::InvalidBoard(format!(
                    "tile {} has value {}",
                    tile.id, tile.value
                )));
            }
            if tile.id == 0 || !ids.insert(tile.id) {
                return Err(GameError::InvalidBoard(format!("tile id {} is not unique", tile.id)));
            }
            if !cells.insert(tile.position()) {
                return Err(GameError::InvalidBoard(format!(
                    "two tiles share ({}, {})",
                    tile.x, tile.y
                )));
            }
        }

        let next_id = match ids.last() {
            Some(max) => next_after(*max)?,
            None => 1,
        };
        Ok(Self { tiles, next_id })
    }

    /// Rebuild a board from tiles that are already known to be valid.
    pub(crate) fn from_settled(tiles: Vec<Tile>, next_id: TileId) -> Self {
        Self { tiles, next_id }
    }

    /// Add a freshly spawned tile.
    pub(crate) fn insert(&mut self, tile: Tile) -> Result<(), GameError> {
        self.next_id = self.next_id.max(next_after(tile.id)?);
        self.tiles.push(tile);
        Ok(())
    }

    /// All tiles, in insertion order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// ID the next spawned tile receives.
    pub fn next_id(&self) -> TileId {
        self.next_id
    }

    /// Number of tiles on the board.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Check if the board has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Check if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.tiles.len() >= Self::CELLS
    }

    /// Tile at a cell, if any.
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.position() == position)
    }

    /// Check if a cell is occupied.
    pub fn is_occupied(&self, position: Position) -> bool {
        self.tile_at(position).is_some()
    }

    /// Largest tile value (0 on an empty board).
    pub fn max_value(&self) -> u32 {
        self.tiles.iter().map(|t| t.value).max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn value_sum(&self) -> u64 {
        self.tiles.iter().map(|t| t.value as u64).sum()
    }

    /// Views of every tile, without flags.
    pub fn views(&self) -> Vec<TileView> {
        self.tiles.iter().map(TileView::settled).collect()
    }

    /// Hash the board in ID order.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        let mut sorted: Vec<&Tile> = self.tiles.iter().collect();
        sorted.sort_by_key(|t| t.id);

        hasher.update_u32(self.next_id);
        hasher.update_u32(sorted.len() as u32);
        for tile in sorted {
            tile.hash_into(hasher);
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 1..=BOARD_SIZE {
            for x in 1..=BOARD_SIZE {
                match self.tile_at(Position::new(x, y)) {
                    Some(tile) => write!(f, "{:>6}", tile.value)?,
                    None => write!(f, "{:>6}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn next_after(id: TileId) -> Result<TileId, GameError> {
    id.checked_add(1)
        .ok_or_else(|| GameError::InvalidBoard("tile id space exhausted".to_string()))
}
