//! Rule errors.

/// Errors raised by the rules engine.
///
/// A turn that moves nothing is a normal outcome and never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A tile was requested but every cell is occupied.
    #[error("No free position on the board")]
    NoSpace,

    /// Input outside the four directions.
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    /// Tiles handed to `Board::from_tiles` break a board invariant.
    #[error("Invalid board: {0}")]
    InvalidBoard(String),
}
