//! State Hashing for Verification
//!
//! SHA-256 over a fixed field order, used to compare a live game with its
//! replay.

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state.
///
/// Order of updates is part of the hash; callers must feed fields in a
/// fixed order.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for a game state.
    pub fn for_game_state() -> Self {
        Self::new(b"TILE_MERGE_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(u8::from(value));
    }

    /// Update with a length-prefixed list of u32 values.
    pub fn update_u32_list(&mut self, values: &[u32]) {
        self.update_u32(values.len() as u32);
        for value in values {
            self.update_u32(*value);
        }
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Lowercase hex for logs and error messages.
pub fn hash_hex(hash: &StateHash) -> String {
    hex::encode(hash)
}

/// Compute a game state hash.
///
/// Turn and seed go first; `add_state` appends the board and score.
pub fn compute_state_hash<F>(turn: u32, seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();

    hasher.update_u32(turn);
    hasher.update_u64(seed);

    add_state(&mut hasher);

    hasher.finalize()
}
