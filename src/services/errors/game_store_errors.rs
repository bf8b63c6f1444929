use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[derive(Debug)]
pub enum GameStoreError {
    NotFound,
    SeatTaken,
    TableFull,
    Repository(GameRepositoryError),
}

impl std::fmt::Display for GameStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStoreError::NotFound => write!(f, "Game not found"),
            GameStoreError::SeatTaken => write!(f, "Side is already taken"),
            GameStoreError::TableFull => write!(f, "Game already has two players"),
            GameStoreError::Repository(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for GameStoreError {}

impl From<GameRepositoryError> for GameStoreError {
    fn from(err: GameRepositoryError) -> Self {
        GameStoreError::Repository(err)
    }
}
