//! Turn Sequencer
//!
//! Serializes player input and paces each turn for presentation.
//! This layer is **non-deterministic** in timing only; every outcome comes
//! from `game/`, one turn at a time.

pub mod checkpoint;
pub mod listener;
pub mod runner;

use std::time::Duration;
use thiserror::Error;

use crate::game::GameError;

pub use checkpoint::{Checkpoint, CheckpointStage};
pub use listener::{ChannelListener, LogListener, SequencerUpdate, TurnListener};
pub use runner::TurnSequencer;

/// Pacing for the presentation checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Wait after the post-collapse checkpoint (merge animation).
    pub collapse_delay: Duration,
    /// Wait after the settled checkpoint (appear animation).
    pub settle_delay: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            collapse_delay: Duration::from_millis(100),
            settle_delay: Duration::from_millis(150),
        }
    }
}

impl SequencerConfig {
    /// Both delays in milliseconds.
    pub fn from_millis(collapse_ms: u64, settle_ms: u64) -> Self {
        Self {
            collapse_delay: Duration::from_millis(collapse_ms),
            settle_delay: Duration::from_millis(settle_ms),
        }
    }

    /// No pacing at all.
    pub fn immediate() -> Self {
        Self::from_millis(0, 0)
    }

    /// Time a moving turn holds the sequencer.
    pub fn turn_duration(&self) -> Duration {
        self.collapse_delay + self.settle_delay
    }
}

/// Sequencer errors.
#[derive(Debug, Error)]
pub enum SequencerError {
    /// The sequencer task has stopped.
    #[error("Sequencer is closed")]
    Closed,

    /// A rules error ended the game task.
    #[error("Fatal game error: {0}")]
    Fatal(#[from] GameError),

    /// The task panicked or was cancelled.
    #[error("Sequencer task failed: {0}")]
    Join(String),
}
