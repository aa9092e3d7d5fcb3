//! Game Transcript
//!
//! Seed plus every direction applied is enough to rebuild a game. The final
//! score and state hash let a replay be checked against the recorded run.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::{hash_hex, StateHash};
use crate::game::error::GameError;
use crate::game::state::GameState;
use crate::game::tile::Direction;

/// Current transcript version.
pub const TRANSCRIPT_VERSION: u8 = 1;

/// Recorded game, enough to replay it deterministically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTranscript {
    /// Version for forward compatibility.
    pub version: u8,

    /// RNG seed the game started from.
    pub seed: u64,

    /// Directions in the order they were applied.
    pub directions: Vec<Direction>,

    /// Score after the last direction.
    pub final_score: u32,

    /// State hash after the last direction.
    pub final_hash: StateHash,
}

/// Errors that can occur with transcripts.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Rules error while replaying
    #[error("Replay failed: {0}")]
    Game(#[from] GameError),

    /// Replayed state does not match the recording
    #[error("Final state hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch {
        /// Hex of the recorded hash
        expected: String,
        /// Hex of the replayed hash
        computed: String,
    },

    /// Replayed score differs from the recorded one
    #[error("Final score mismatch: expected {expected}, computed {computed}")]
    ScoreMismatch {
        /// Recorded score
        expected: u32,
        /// Replayed score
        computed: u32,
    },

    /// Version mismatch
    #[error("Version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Supported version
        expected: u8,
        /// Version found
        got: u8,
    },

    /// Encoding or decoding failed
    #[error("Transcript codec failed: {0}")]
    Decode(String),
}

impl GameTranscript {
    /// Record a transcript from a game in progress.
    pub fn record(state: &GameState) -> Self {
        Self {
            version: TRANSCRIPT_VERSION,
            seed: state.seed,
            directions: state.history.clone(),
            final_score: state.score,
            final_hash: state.compute_hash(),
        }
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        bincode::serialize(self).map_err(|e| ReplayError::Decode(e.to_string()))
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ReplayError> {
        let transcript: Self =
            bincode::deserialize(data).map_err(|e| ReplayError::Decode(e.to_string()))?;

        if transcript.version != TRANSCRIPT_VERSION {
            return Err(ReplayError::VersionMismatch {
                expected: TRANSCRIPT_VERSION,
                got: transcript.version,
            });
        }

        Ok(transcript)
    }

    /// Pretty JSON for logs and debugging.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        serde_json::to_string_pretty(self).map_err(|e| ReplayError::Decode(e.to_string()))
    }

    /// Number of recorded directions.
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Check if no direction was recorded.
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

impl GameState {
    /// Transcript of this game so far.
    pub fn transcript(&self) -> GameTranscript {
        GameTranscript::record(self)
    }
}

/// Rebuild a game by applying every recorded direction to a fresh state.
pub fn replay(transcript: &GameTranscript) -> Result<GameState, ReplayError> {
    let mut state = GameState::new(transcript.seed)?;
    for direction in &transcript.directions {
        state.apply(*direction)?;
    }
    Ok(state)
}

/// Replay a transcript and check its final hash and score.
pub fn verify(transcript: &GameTranscript) -> Result<GameState, ReplayError> {
    let state = replay(transcript)?;
    let computed = state.compute_hash();

    if state.score != transcript.final_score {
        return Err(ReplayError::ScoreMismatch {
            expected: transcript.final_score,
            computed: state.score,
        });
    }

    if computed != transcript.final_hash {
        return Err(ReplayError::HashMismatch {
            expected: hash_hex(&transcript.final_hash),
            computed: hash_hex(&computed),
        });
    }

    Ok(state)
}
