//! # Tile Merge
//!
//! Deterministic rules engine for a sliding-tile merge puzzle (2048-style).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TILE MERGE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── rng.rs        - Seeded Xorshift128+ PRNG                │
//! │  └── hash.rs       - State hashing for replay verification   │
//! │                                                              │
//! │  game/             - Rules (deterministic, synchronous)      │
//! │  ├── tile.rs       - Tile, Board, Direction                  │
//! │  ├── allocator.rs  - Free cells and tile spawning            │
//! │  ├── collapse.rs   - Per-line slide and merge                │
//! │  ├── turn.rs       - One complete turn, terminal detection   │
//! │  ├── state.rs      - Running game (score, phase, history)    │
//! │  ├── events.rs     - Turn events                             │
//! │  └── replay.rs     - Transcripts and replay verification     │
//! │                                                              │
//! │  sequencer/        - Turn serialization (async)              │
//! │  ├── checkpoint.rs - Staged presentation snapshots           │
//! │  ├── listener.rs   - Checkpoint and score callbacks          │
//! │  └── runner.rs     - Single-writer turn task                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! `core/` and `game/` never read the clock and take all randomness from a
//! seeded [`DeterministicRng`]. Given the same seed and the same sequence of
//! directions, a game produces identical boards, scores and state hashes.
//! The sequencer only adds cosmetic delays between checkpoints.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod sequencer;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use game::error::GameError;
pub use game::tile::{Board, Direction, Position, Tile, TileId, TileView};
pub use game::collapse::{collapse, Collapse};
pub use game::turn::{apply_turn, is_terminal, new_game, TurnOutcome};
pub use game::state::{GamePhase, GameState};
pub use game::replay::{replay, verify, GameTranscript, ReplayError};
pub use sequencer::{
    Checkpoint, CheckpointStage, SequencerConfig, SequencerError, TurnListener, TurnSequencer,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Side length of the square board.
pub const BOARD_SIZE: u8 = 4;

/// Tiles placed on a fresh board.
pub const INITIAL_TILES: usize = 2;

/// Chance (in percent) that a spawned tile is a 4 instead of a 2.
pub const FOUR_SPAWN_PERCENT: u32 = 10;

/// Tile value that counts as reaching the goal.
pub const WIN_TILE: u32 = 2048;
