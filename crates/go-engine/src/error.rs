//! Move validation errors.

use go_core::CoordError;
use thiserror::Error;

/// Reasons the rules engine rejects a request.
///
/// A rejected request never changes the game state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid point: {0}")]
    InvalidPoint(String),
    #[error("point {0} is already occupied")]
    OccupiedPoint(String),
    #[error("the move leads to a repeated position")]
    RepeatedPosition,
    #[error("board size {0} is not supported")]
    InvalidBoardSize(u8),
    #[error("the game has already finished")]
    GameFinished,
    #[error("handicap stones can only be placed on an empty board")]
    HandicapNotAllowed,
}

impl From<CoordError> for RuleError {
    fn from(e: CoordError) -> Self {
        match e {
            CoordError::InvalidColor(s) => RuleError::InvalidColor(s),
            CoordError::InvalidPoint(s) | CoordError::InvalidScore(s) => {
                RuleError::InvalidPoint(s)
            }
        }
    }
}
