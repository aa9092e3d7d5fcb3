//! Turn Events
//!
//! Events produced while resolving turns, for logs and adapters.

use serde::{Serialize, Deserialize};
use crate::game::tile::{Tile, TileId};

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Merges resolve first
    Merge = 0,
    /// Then the spawn
    Spawn = 1,
    /// Then milestones
    Milestone = 2,
    /// Game over last
    GameOver = 3,
}

/// Turn event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEventData {
    /// Two tiles merged
    TilesMerged {
        survivor: TileId,
        absorbed: TileId,
        value: u32,
    },

    /// A tile was added after a move
    TileSpawned {
        tile: Tile,
    },

    /// A tile reached the win value for the first time
    WinTileReached {
        tile_id: TileId,
        value: u32,
    },

    /// No direction changes the board any more
    GameOver {
        final_score: u32,
        max_tile: u32,
    },
}

/// An event with its turn and priority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    /// Turn when the event occurred (1-based)
    pub turn: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Event data
    pub data: TurnEventData,
}

impl TurnEvent {
    /// Create a new event; priority follows from the data.
    pub fn new(turn: u32, data: TurnEventData) -> Self {
        let priority = match &data {
            TurnEventData::TilesMerged { .. } => EventPriority::Merge,
            TurnEventData::TileSpawned { .. } => EventPriority::Spawn,
            TurnEventData::WinTileReached { .. } => EventPriority::Milestone,
            TurnEventData::GameOver { .. } => EventPriority::GameOver,
        };

        Self { turn, priority, data }
    }

    /// Create tiles merged event.
    pub fn tiles_merged(turn: u32, survivor: TileId, absorbed: TileId, value: u32) -> Self {
        Self::new(turn, TurnEventData::TilesMerged { survivor, absorbed, value })
    }

    /// Create tile spawned event.
    pub fn tile_spawned(turn: u32, tile: Tile) -> Self {
        Self::new(turn, TurnEventData::TileSpawned { tile })
    }

    /// Create win tile reached event.
    pub fn win_tile_reached(turn: u32, tile_id: TileId, value: u32) -> Self {
        Self::new(turn, TurnEventData::WinTileReached { tile_id, value })
    }

    /// Create game over event.
    pub fn game_over(turn: u32, final_score: u32, max_tile: u32) -> Self {
        Self::new(turn, TurnEventData::GameOver { final_score, max_tile })
    }
}

impl PartialOrd for TurnEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TurnEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.turn
            .cmp(&other.turn)
            .then(self.priority.cmp(&other.priority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ordering() {
        let merge = TurnEvent::tiles_merged(3, 1, 2, 8);
        let spawn = TurnEvent::tile_spawned(3, Tile::new(9, 2, 1, 1));
        let over = TurnEvent::game_over(3, 120, 32);
        let later_merge = TurnEvent::tiles_merged(4, 5, 6, 4);

        assert!(merge < spawn);
        assert!(spawn < over);
        assert!(over < later_merge);
    }

    #[test]
    fn test_priority_from_data() {
        assert_eq!(TurnEvent::win_tile_reached(1, 4, 2048).priority, EventPriority::Milestone);
        assert_eq!(TurnEvent::game_over(1, 0, 4).priority, EventPriority::GameOver);
    }
}
