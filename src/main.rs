use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use flashchain_engine::models::game_record::{GameStatus, Side};
use flashchain_engine::models::move_request::MoveRequest;
use flashchain_engine::repositories::game_repository::InMemoryGameRepository;
use flashchain_engine::rules::chess_rules::ChessRules;
use flashchain_engine::services::game_store::GameStore;
use flashchain_engine::services::identity::mock_wallet_address;
use flashchain_engine::services::move_engine::MoveEngine;
use flashchain_engine::services::opponent::{OpponentStrategy, RandomStrategy};

// Random play rarely converges, so the demo stops after this many plies.
const MAX_PLIES: usize = 200;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let repository = Arc::new(InMemoryGameRepository::new());
    let store = GameStore::new(repository);
    let engine = MoveEngine::new(
        store.clone(),
        ChessRules::new(),
        Arc::new(RandomStrategy::new()),
    )
    .with_reply_delay(Duration::from_millis(300));

    let wallet = mock_wallet_address();
    let game = store
        .create_vs_engine(&wallet, Some("You".to_string()))
        .await?;
    info!("Created game {} for wallet {}", game.id, wallet);

    // Stand in for the human with random picks, and poll for state the way
    // the UI does while the opponent thinks.
    let rules = ChessRules::new();
    let human = RandomStrategy::new();

    loop {
        let record = store.get(&game.id).await?.ok_or("game disappeared")?;

        if record.status == GameStatus::Finished {
            info!(
                "Game over after {} moves: {:?} ({:?} for the human)",
                record.history.len(),
                record.result,
                record.outcome_for(Side::White)
            );
            break;
        }
        if record.history.len() >= MAX_PLIES {
            info!("Stopping after {} plies: {}", MAX_PLIES, record.position);
            break;
        }

        if record.turn == Side::White {
            let legal = rules.legal_moves(&record.position)?;
            let chosen = human
                .choose(&record.position, &legal)
                .ok_or("no legal move in an active game")?;
            let request = match chosen.promotion {
                Some(promotion) => MoveRequest::with_promotion(
                    game.id.clone(),
                    chosen.from,
                    chosen.to,
                    promotion,
                ),
                None => MoveRequest::new(game.id.clone(), chosen.from, chosen.to),
            };
            if let Err(e) = engine.propose_move(Side::White, &request).await {
                if e.is_rejection() {
                    warn!("Move rejected: {}", e);
                } else {
                    return Err(e.into());
                }
            }
        } else {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    Ok(())
}
