//! Game State
//!
//! A running game: board, score, RNG and the inputs applied so far.

use serde::{Serialize, Deserialize};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::error::GameError;
use crate::game::events::TurnEvent;
use crate::game::tile::{Board, Direction};
use crate::game::turn::{apply_turn, is_terminal, new_game, TurnOutcome};
use crate::WIN_TILE;

/// Current phase of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Moves still possible
    #[default]
    Playing,
    /// Board is terminal
    Over,
}

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    /// RNG seed (for replay)
    pub seed: u64,

    /// Inputs applied so far, still ones included
    pub turn: u32,

    /// Cumulative score
    pub score: u32,

    /// Current phase
    pub phase: GamePhase,

    /// Settled board
    pub board: Board,

    /// Deterministic RNG state
    pub rng: DeterministicRng,

    /// Every direction applied, in order
    pub history: Vec<Direction>,

    /// A tile has reached [`WIN_TILE`]
    pub win_reached: bool,

    /// Events generated since the last `take_events`
    pending_events: Vec<TurnEvent>,
}

impl GameState {
    /// Start a new game from a seed.
    pub fn new(seed: u64) -> Result<Self, GameError> {
        let mut rng = DeterministicRng::new(seed);
        let board = new_game(&mut rng)?;
        Ok(Self::from_parts(seed, board, rng))
    }

    /// Start from an explicit board. The RNG is seeded from `seed` as is.
    pub fn with_board(seed: u64, board: Board) -> Self {
        Self::from_parts(seed, board, DeterministicRng::new(seed))
    }

    fn from_parts(seed: u64, board: Board, rng: DeterministicRng) -> Self {
        let phase = if is_terminal(&board) { GamePhase::Over } else { GamePhase::Playing };
        let win_reached = board.max_value() >= WIN_TILE;

        Self {
            seed,
            turn: 0,
            score: 0,
            phase,
            board,
            rng,
            history: Vec::new(),
            win_reached,
            pending_events: Vec::new(),
        }
    }

    /// Apply one direction.
    ///
    /// Updates the score, records events and moves to [`GamePhase::Over`]
    /// once the board is terminal. Input after game over resolves as a still
    /// turn.
    pub fn apply(&mut self, direction: Direction) -> Result<TurnOutcome, GameError> {
        let outcome = apply_turn(&self.board, direction, &mut self.rng)?;

        self.turn += 1;
        self.history.push(direction);

        if !outcome.moved {
            return Ok(outcome);
        }

        self.score = self.score.saturating_add(outcome.score_delta);

        for merge in &outcome.collapse.merges {
            self.push_event(TurnEvent::tiles_merged(self.turn, merge.survivor, merge.absorbed, merge.value));
        }
        if let Some(tile) = outcome.spawned {
            self.push_event(TurnEvent::tile_spawned(self.turn, tile));
        }

        if !self.win_reached {
            if let Some(merge) = outcome.collapse.merges.iter().find(|m| m.value >= WIN_TILE) {
                self.win_reached = true;
                self.push_event(TurnEvent::win_tile_reached(self.turn, merge.survivor, merge.value));
            }
        }

        self.board = outcome.board.clone();

        if is_terminal(&self.board) {
            self.phase = GamePhase::Over;
            self.push_event(TurnEvent::game_over(self.turn, self.score, self.board.max_value()));
        }

        Ok(outcome)
    }

    /// Replace this game with a fresh one.
    pub fn reset(&mut self, seed: u64) -> Result<(), GameError> {
        *self = Self::new(seed)?;
        Ok(())
    }

    /// Check if the game has ended.
    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Over)
    }

    /// Largest tile on the board.
    pub fn max_tile(&self) -> u32 {
        self.board.max_value()
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.turn, self.seed, |hasher| {
            self.board.hash_into(hasher);
            hasher.update_u32(self.score);
            hasher.update_bool(self.is_over());
            hasher.update_bool(self.win_reached);

            let directions: Vec<u32> = self.history.iter().map(|d| *d as u32).collect();
            hasher.update_u32_list(&directions);

            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a turn event.
    pub fn push_event(&mut self, event: TurnEvent) {
        self.pending_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::TurnEventData;
    use crate::game::testing::{board_from_rows, checkerboard};

    #[test]
    fn test_game_state_determinism() {
        let mut a = GameState::new(12345).unwrap();
        let mut b = GameState::new(12345).unwrap();
        assert_eq!(a.board, b.board);
        assert_eq!(a.compute_hash(), b.compute_hash());

        for turn in 0..40u32 {
            let direction = Direction::ALL[(turn * 7 % 4) as usize];
            a.apply(direction).unwrap();
            b.apply(direction).unwrap();
        }

        assert_eq!(a.board, b.board);
        assert_eq!(a.score, b.score);
        assert_eq!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = GameState::new(1).unwrap();
        let b = GameState::new(2).unwrap();
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_apply_accumulates_score_and_events() {
        let board = board_from_rows([
            [8, 8, 0, 0],
            [4, 0, 4, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut state = GameState::with_board(7, board);

        let outcome = state.apply(Direction::Left).unwrap();
        assert_eq!(outcome.score_delta, 24);
        assert_eq!(state.score, 24);
        assert_eq!(state.turn, 1);
        assert_eq!(state.history, vec![Direction::Left]);

        let events = state.take_events();
        let merges = events.iter().filter(|e| matches!(e.data, TurnEventData::TilesMerged { .. })).count();
        let spawns = events.iter().filter(|e| matches!(e.data, TurnEventData::TileSpawned { .. })).count();
        assert_eq!((merges, spawns), (2, 1));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_still_turn_counts_but_scores_nothing() {
        let board = board_from_rows([
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut state = GameState::with_board(7, board.clone());

        let outcome = state.apply(Direction::Up).unwrap();
        assert!(!outcome.moved);
        assert_eq!(state.turn, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.board, board);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_win_tile_event_once() {
        let board = board_from_rows([
            [1024, 1024, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [2, 2, 0, 0],
        ]);
        let mut state = GameState::with_board(11, board);

        state.apply(Direction::Left).unwrap();
        assert!(state.win_reached);
        let wins = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e.data, TurnEventData::WinTileReached { value: 2048, .. }))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(state.max_tile(), 2048);
    }

    #[test]
    fn test_terminal_board_starts_over() {
        let state = GameState::with_board(0, board_from_rows(checkerboard()));
        assert!(state.is_over());
    }

    #[test]
    fn test_game_runs_to_game_over() {
        let mut state = GameState::new(2048).unwrap();
        let mut turn = 0usize;

        while !state.is_over() {
            state.apply(Direction::ALL[turn % 4]).unwrap();
            turn += 1;
            assert!(turn < 100_000, "game should end");
        }

        assert!(is_terminal(&state.board));
        let events = state.take_events();
        assert!(matches!(events.last().map(|e| &e.data), Some(TurnEventData::GameOver { .. })));

        // Further input is a still turn
        let outcome = state.apply(Direction::Up).unwrap();
        assert!(!outcome.moved);
    }

    #[test]
    fn test_reset() {
        let mut state = GameState::new(5).unwrap();
        state.apply(Direction::Left).unwrap();
        state.apply(Direction::Down).unwrap();

        state.reset(6).unwrap();
        assert_eq!(state.turn, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.board.len(), 2);
        assert!(state.history.is_empty());
        assert_eq!(state.compute_hash(), GameState::new(6).unwrap().compute_hash());
    }
}
