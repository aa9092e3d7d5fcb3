//! Game Logic Module
//!
//! All rules code. Synchronous and 100% deterministic.
//!
//! ## Module Structure
//!
//! - `tile`: Tile, Board and Direction types
//! - `allocator`: Free cell lookup and tile spawning
//! - `collapse`: Per-line slide and merge for one direction
//! - `turn`: One full turn, new game, terminal detection
//! - `state`: Running game with score, phase and history
//! - `events`: Turn events for logging and adapters
//! - `replay`: Transcripts and replay verification
//! - `error`: Rule errors

pub mod error;
pub mod tile;
pub mod allocator;
pub mod collapse;
pub mod turn;
pub mod state;
pub mod events;
pub mod replay;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use error::GameError;
pub use tile::{Board, Direction, Position, Tile, TileId, TileView};
pub use collapse::{collapse, Collapse, Merge};
pub use turn::{apply_turn, is_terminal, new_game, TurnOutcome};
pub use state::{GamePhase, GameState};
pub use events::TurnEvent;
pub use replay::{replay, verify, GameTranscript, ReplayError};
