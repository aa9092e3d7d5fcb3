//! Presentation checkpoints.
//!
//! Read-only snapshots handed to renderers. Adapters never see the live
//! game state.

use serde::{Serialize, Deserialize};

use crate::game::state::GameState;
use crate::game::tile::{Direction, TileView};
use crate::game::turn::TurnOutcome;

/// Point within a turn a checkpoint was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointStage {
    /// After slide and merge, before spawn. Consumed tiles still present.
    Collapsed,
    /// After spawn and cleanup.
    Settled,
}

/// Snapshot of the board at one stage of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Turn number (0 before any input).
    pub turn: u32,
    /// Stage within the turn.
    pub stage: CheckpointStage,
    /// Direction applied, if any.
    pub direction: Option<Direction>,
    /// Tiles to draw, with merge flags on `Collapsed`.
    pub tiles: Vec<TileView>,
    /// Cumulative score.
    pub score: u32,
    /// Whether the turn changed the board.
    pub moved: bool,
    /// Whether the game has ended.
    pub game_over: bool,
}

impl Checkpoint {
    /// Settled snapshot of a game before any input.
    pub fn initial(game: &GameState) -> Self {
        Self {
            turn: game.turn,
            stage: CheckpointStage::Settled,
            direction: None,
            tiles: game.board.views(),
            score: game.score,
            moved: false,
            game_over: game.is_over(),
        }
    }

    /// Post-collapse frame of the turn just applied to `game`.
    pub fn collapsed(game: &GameState, outcome: &TurnOutcome) -> Self {
        Self {
            turn: game.turn,
            stage: CheckpointStage::Collapsed,
            direction: Some(outcome.direction),
            tiles: outcome.collapse.views(),
            score: game.score,
            moved: outcome.moved,
            game_over: false,
        }
    }

    /// Settled board after the turn just applied to `game`.
    pub fn settled(game: &GameState, outcome: &TurnOutcome) -> Self {
        Self {
            turn: game.turn,
            stage: CheckpointStage::Settled,
            direction: Some(outcome.direction),
            tiles: game.board.views(),
            score: game.score,
            moved: outcome.moved,
            game_over: game.is_over(),
        }
    }

    /// Tiles that will be gone once the turn settles.
    pub fn removed_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.removed).count()
    }

    /// Check if this is the settled end of a turn.
    pub fn is_settled(&self) -> bool {
        self.stage == CheckpointStage::Settled
    }
}
