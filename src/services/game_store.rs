use std::sync::Arc;

use tracing::info;

use crate::models::game_record::{GameRecord, GameStatus, Player, Side};
use crate::repositories::game_repository::GameRepository;
use crate::services::errors::game_store_errors::GameStoreError;

/// Owns all reads and writes of game records. Every mutation persists
/// explicitly through the repository; nothing else touches it.
#[derive(Clone)]
pub struct GameStore {
    repository: Arc<dyn GameRepository + Send + Sync>,
}

impl GameStore {
    pub fn new(repository: Arc<dyn GameRepository + Send + Sync>) -> Self {
        GameStore { repository }
    }

    /// Creates a game at the starting position with the given seats.
    /// Two seats start Active, fewer wait for a join.
    pub async fn create(&self, players: Vec<Player>) -> Result<GameRecord, GameStoreError> {
        if players.len() > 2 {
            return Err(GameStoreError::TableFull);
        }
        if players.len() == 2 && players[0].side == players[1].side {
            return Err(GameStoreError::SeatTaken);
        }

        let record = GameRecord::new(players);
        self.repository.create_game(&record).await?;
        info!("Created game {} ({:?})", record.id, record.status);
        Ok(record)
    }

    /// The instant-start flow: seats the caller as White and the automated
    /// opponent as Black, so the game is Active immediately.
    pub async fn create_vs_engine(
        &self,
        wallet: &str,
        display_name: Option<String>,
    ) -> Result<GameRecord, GameStoreError> {
        let mut human = Player::human(wallet, Side::White, 0);
        human.display_name = display_name;
        self.create(vec![human, Player::engine(Side::Black, 1)])
            .await
    }

    /// Claims a free side in a waiting game; fills the second seat and
    /// activates the game.
    pub async fn join(&self, id: &str, wallet: &str, side: Side) -> Result<GameRecord, GameStoreError> {
        let mut record = self
            .repository
            .get_game(id)
            .await?
            .ok_or(GameStoreError::NotFound)?;

        if record.players.len() >= 2 {
            return Err(GameStoreError::TableFull);
        }
        if record.player_on(side).is_some() {
            return Err(GameStoreError::SeatTaken);
        }

        let seat_index = record.players.len() as u8;
        record.players.push(Player::human(wallet, side, seat_index));
        if record.players.len() == 2 {
            record.status = GameStatus::Active;
        }
        self.repository.save_game(&record).await?;
        info!("Player {} joined game {} as {}", wallet, id, side);
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Result<Option<GameRecord>, GameStoreError> {
        self.repository.get_game(id).await.map_err(GameStoreError::from)
    }

    pub async fn list(&self) -> Result<Vec<GameRecord>, GameStoreError> {
        self.repository.list_games().await.map_err(GameStoreError::from)
    }

    /// Idempotent whole-record overwrite, last-write-wins.
    pub async fn save(&self, record: &GameRecord) -> Result<(), GameStoreError> {
        self.repository.save_game(record).await?;
        Ok(())
    }
}
