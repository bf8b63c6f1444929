use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::models::events::GameEvent;
use crate::models::game_record::{GameRecord, GameResult, GameStatus, Side};
use crate::models::move_request::MoveRequest;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::rules::chess_rules::{ChessRules, GameEnding};
use crate::services::errors::game_store_errors::GameStoreError;
use crate::services::errors::move_engine_errors::MoveEngineError;
use crate::services::game_store::GameStore;
use crate::services::opponent::OpponentStrategy;

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1500);
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The game session state machine. `propose_move` is the only mutation
/// entry point; human moves and the automated opponent's replies both go
/// through it. Writes are serialized per game id, and every accepted
/// mutation is persisted as a single whole-record save.
#[derive(Clone)]
pub struct MoveEngine {
    store: GameStore,
    rules: ChessRules,
    strategy: Arc<dyn OpponentStrategy + Send + Sync>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    events: broadcast::Sender<GameEvent>,
    reply_delay: Duration,
}

impl MoveEngine {
    pub fn new(
        store: GameStore,
        rules: ChessRules,
        strategy: Arc<dyn OpponentStrategy + Send + Sync>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        MoveEngine {
            store,
            rules,
            strategy,
            locks: Arc::new(Mutex::new(HashMap::new())),
            events,
            reply_delay: DEFAULT_REPLY_DELAY,
        }
    }

    /// The automated opponent's thinking delay before it replies.
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Events published on every accepted mutation. Best-effort: lagging
    /// or absent subscribers never affect move handling.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Validates and applies a move proposal. On success the returned
    /// record is the persisted post-move state. Any rejection leaves the
    /// stored record unchanged.
    pub async fn propose_move(
        &self,
        acting_side: Side,
        request: &MoveRequest,
    ) -> Result<GameRecord, MoveEngineError> {
        let game_id = request.game_id.as_str();
        let lock = self.game_lock(game_id).await;
        let _guard = lock.lock().await;

        let record = match self.store.get(game_id).await.map_err(store_error)? {
            Some(record) => record,
            None => {
                // Unknown ids never earn a lasting lock entry.
                self.discard_lock(game_id).await;
                return Err(MoveEngineError::NotFound);
            }
        };

        if record.status != GameStatus::Active {
            if record.status == GameStatus::Finished {
                // Finished is absorbing; nothing left to serialize.
                self.discard_lock(game_id).await;
            }
            return Err(MoveEngineError::GameNotActive);
        }
        if acting_side != record.turn {
            return Err(MoveEngineError::OutOfTurn);
        }

        let applied = self.rules.validate_and_apply(
            &record.position,
            &request.from_square,
            &request.to_square,
            request.promotion_piece.as_deref(),
        )?;

        let mut updated = record.clone();
        updated.position = applied.position.clone();
        updated.turn = applied.side_to_move;
        updated.history.push(applied.notation.clone());
        updated.last_activity_at = Utc::now();

        match applied.ending {
            GameEnding::None => {}
            GameEnding::Checkmate => {
                updated.status = GameStatus::Finished;
                updated.result = Some(GameResult::WonBy(acting_side));
            }
            GameEnding::Stalemate => {
                updated.status = GameStatus::Finished;
                updated.result = Some(GameResult::Draw);
            }
        }

        self.store.save(&updated).await.map_err(store_error)?;
        info!(
            "Game {}: {} played {} ({} moves)",
            game_id,
            acting_side,
            applied.notation,
            updated.history.len()
        );

        let _ = self.events.send(GameEvent::MoveApplied {
            game_id: updated.id.clone(),
            position: updated.position.clone(),
            notation: applied.notation,
            by: acting_side,
        });

        if updated.status == GameStatus::Finished {
            // Terminal moves never wake the opponent.
            if let Some(result) = updated.result {
                info!("Game {} finished: {:?}", game_id, result);
                let _ = self.events.send(GameEvent::GameEnded {
                    game_id: updated.id.clone(),
                    result,
                });
            }
            self.discard_lock(game_id).await;
        } else if updated.engine_side() == Some(updated.turn) {
            self.schedule_reply(game_id);
        }

        Ok(updated)
    }

    /// Fire-and-forget handoff to the automated opponent. The caller's
    /// result is already decided; the reply happens after a thinking
    /// delay on its own task.
    fn schedule_reply(&self, game_id: &str) {
        let engine = self.clone();
        let game_id = game_id.to_string();
        tokio::spawn(async move {
            engine.opponent_reply(&game_id).await;
        });
    }

    /// Sleeps out the thinking delay, re-validates that it is still the
    /// opponent's turn in a live game, then re-enters `propose_move` like
    /// any other actor. No lock is held during the sleep.
    async fn opponent_reply(&self, game_id: &str) {
        tokio::time::sleep(self.reply_delay).await;

        let record = match self.store.get(game_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!("Opponent reply for unknown game {}", game_id);
                return;
            }
            Err(e) => {
                error!("Opponent reply load failed for game {}: {}", game_id, e);
                return;
            }
        };

        let engine_side = match record.engine_side() {
            Some(side) => side,
            None => return,
        };
        if record.status != GameStatus::Active || record.turn != engine_side {
            debug!("Opponent reply for game {} no longer applies", game_id);
            return;
        }

        let legal_moves = match self.rules.legal_moves(&record.position) {
            Ok(moves) => moves,
            Err(e) => {
                error!("Game {} has an unreadable position: {}", game_id, e);
                return;
            }
        };
        let chosen = match self.strategy.choose(&record.position, &legal_moves) {
            Some(mv) => mv,
            None => {
                // An active game always has at least one legal move.
                warn!("Strategy produced no move for game {}", game_id);
                return;
            }
        };

        let request = match chosen.promotion {
            Some(promotion) => MoveRequest::with_promotion(
                game_id.to_string(),
                chosen.from,
                chosen.to,
                promotion,
            ),
            None => MoveRequest::new(game_id.to_string(), chosen.from, chosen.to),
        };

        match self.propose_move(engine_side, &request).await {
            Ok(_) => {}
            Err(e) if e.is_rejection() => {
                // Lost the race to a state change during the delay.
                debug!("Opponent reply rejected for game {}: {}", game_id, e);
            }
            Err(e) => {
                error!("Opponent reply failed for game {}: {}", game_id, e);
            }
        }
    }

    async fn game_lock(&self, game_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(game_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn discard_lock(&self, game_id: &str) {
        let mut locks = self.locks.lock().await;
        locks.remove(game_id);
    }
}

/// The store only feeds `get` and `save` into the move path; seat errors
/// cannot occur here and would indicate store misbehavior if they did.
fn store_error(err: GameStoreError) -> MoveEngineError {
    match err {
        GameStoreError::NotFound => MoveEngineError::NotFound,
        GameStoreError::Repository(e) => MoveEngineError::Persistence(e),
        other => MoveEngineError::Persistence(GameRepositoryError::Storage(other.to_string())),
    }
}
