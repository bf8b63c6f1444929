use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::rules::errors::RulesError;

/// Rejection and failure reasons for a move proposal. `Persistence` is kept
/// distinct from move rejections: a rejected move may not be resubmitted
/// blindly, a failed save may.
#[derive(Debug)]
pub enum MoveEngineError {
    NotFound,
    GameNotActive,
    OutOfTurn,
    IllegalMove(String),
    InvalidPosition(String),
    Persistence(GameRepositoryError),
}

impl MoveEngineError {
    /// True for rejections a player can recover from by picking another
    /// move; false for request-fatal or infrastructure failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            MoveEngineError::GameNotActive
                | MoveEngineError::OutOfTurn
                | MoveEngineError::IllegalMove(_)
        )
    }
}

impl std::fmt::Display for MoveEngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveEngineError::NotFound => write!(f, "Game not found"),
            MoveEngineError::GameNotActive => write!(f, "Game is not active"),
            MoveEngineError::OutOfTurn => write!(f, "Not your turn"),
            MoveEngineError::IllegalMove(msg) => write!(f, "Illegal move: {}", msg),
            MoveEngineError::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
            MoveEngineError::Persistence(err) => write!(f, "Persistence error: {}", err),
        }
    }
}

impl std::error::Error for MoveEngineError {}

impl From<GameRepositoryError> for MoveEngineError {
    fn from(err: GameRepositoryError) -> Self {
        MoveEngineError::Persistence(err)
    }
}

impl From<RulesError> for MoveEngineError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::IllegalMove(msg) => MoveEngineError::IllegalMove(msg),
            RulesError::InvalidPosition(msg) => MoveEngineError::InvalidPosition(msg),
        }
    }
}
