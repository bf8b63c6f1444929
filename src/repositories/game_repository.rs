use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::game_record::GameRecord;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[cfg(test)]
use mockall::automock;

/// Keyed load/save of game records. Saves are whole-record overwrites with
/// last-write-wins semantics; callers serialize writes per game id.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn create_game(&self, record: &GameRecord) -> Result<(), GameRepositoryError>;
    async fn get_game(&self, id: &str) -> Result<Option<GameRecord>, GameRepositoryError>;
    async fn list_games(&self) -> Result<Vec<GameRecord>, GameRepositoryError>;
    async fn save_game(&self, record: &GameRecord) -> Result<(), GameRepositoryError>;
}

#[derive(Default)]
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<String, GameRecord>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create_game(&self, record: &GameRecord) -> Result<(), GameRepositoryError> {
        let mut games = self.games.write().await;
        games.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get_game(&self, id: &str) -> Result<Option<GameRecord>, GameRepositoryError> {
        let games = self.games.read().await;
        Ok(games.get(id).cloned())
    }

    async fn list_games(&self) -> Result<Vec<GameRecord>, GameRepositoryError> {
        let games = self.games.read().await;
        Ok(games.values().cloned().collect())
    }

    async fn save_game(&self, record: &GameRecord) -> Result<(), GameRepositoryError> {
        self.create_game(record).await
    }
}

/// Mirrors the whole game map to a single JSON document on every mutation
/// and reloads it on construction. Readers and writers go through the
/// in-memory map; the file is write-through only.
pub struct JsonFileGameRepository {
    path: PathBuf,
    games: RwLock<HashMap<String, GameRecord>>,
}

impl JsonFileGameRepository {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, GameRepositoryError> {
        let path = path.as_ref().to_path_buf();
        let games = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| GameRepositoryError::Storage(e.to_string()))?;
            serde_json::from_str(&raw)
                .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            games: RwLock::new(games),
        })
    }

    async fn flush(&self, games: &HashMap<String, GameRecord>) -> Result<(), GameRepositoryError> {
        let raw = serde_json::to_string_pretty(games)
            .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| GameRepositoryError::Storage(e.to_string()))
    }
}

#[async_trait]
impl GameRepository for JsonFileGameRepository {
    async fn create_game(&self, record: &GameRecord) -> Result<(), GameRepositoryError> {
        // Flush happens under the write lock so file contents track map order.
        let mut games = self.games.write().await;
        games.insert(record.id.clone(), record.clone());
        self.flush(&games).await
    }

    async fn get_game(&self, id: &str) -> Result<Option<GameRecord>, GameRepositoryError> {
        let games = self.games.read().await;
        Ok(games.get(id).cloned())
    }

    async fn list_games(&self) -> Result<Vec<GameRecord>, GameRepositoryError> {
        let games = self.games.read().await;
        Ok(games.values().cloned().collect())
    }

    async fn save_game(&self, record: &GameRecord) -> Result<(), GameRepositoryError> {
        self.create_game(record).await
    }
}
