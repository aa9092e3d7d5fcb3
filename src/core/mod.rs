//! Core deterministic primitives.
//!
//! Everything that makes a game reproducible from its seed lives here.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, hash_hex, StateHash, StateHasher};
