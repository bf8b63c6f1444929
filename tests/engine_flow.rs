use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;

use flashchain_engine::models::game_record::{
    GameRecord, GameResult, GameStatus, Player, Side, STARTING_POSITION,
};
use flashchain_engine::models::move_request::MoveRequest;
use flashchain_engine::repositories::game_repository::{
    GameRepository, InMemoryGameRepository, JsonFileGameRepository,
};
use flashchain_engine::rules::chess_rules::ChessRules;
use flashchain_engine::services::errors::move_engine_errors::MoveEngineError;
use flashchain_engine::services::game_store::GameStore;
use flashchain_engine::services::move_engine::MoveEngine;
use flashchain_engine::services::opponent::{OpponentStrategy, RandomStrategy};

const REPLY_DELAY: Duration = Duration::from_millis(400);

fn build_engine(repository: Arc<dyn GameRepository + Send + Sync>) -> (GameStore, MoveEngine) {
    let store = GameStore::new(repository);
    let engine = MoveEngine::new(
        store.clone(),
        ChessRules::new(),
        Arc::new(RandomStrategy::new()),
    )
    .with_reply_delay(REPLY_DELAY);
    (store, engine)
}

fn mv(game_id: &str, from: &str, to: &str) -> MoveRequest {
    MoveRequest::new(game_id.to_string(), from.to_string(), to.to_string())
}

async fn human_game(store: &GameStore) -> GameRecord {
    store
        .create(vec![
            Player::human("0xaaa", Side::White, 0),
            Player::human("0xbbb", Side::Black, 1),
        ])
        .await
        .unwrap()
}

#[tokio::test]
async fn opening_move_is_recorded_in_san() {
    let (store, engine) = build_engine(Arc::new(InMemoryGameRepository::new()));
    let game = human_game(&store).await;

    let updated = engine
        .propose_move(Side::White, &mv(&game.id, "e2", "e4"))
        .await
        .unwrap();

    assert_eq!(updated.history, vec!["e4".to_string()]);
    assert_eq!(updated.turn, Side::Black);
    assert_eq!(updated.status, GameStatus::Active);
    assert_ne!(updated.position, STARTING_POSITION);
}

#[tokio::test]
async fn out_of_turn_proposal_changes_nothing() {
    let (store, engine) = build_engine(Arc::new(InMemoryGameRepository::new()));
    let game = human_game(&store).await;

    let result = engine
        .propose_move(Side::Black, &mv(&game.id, "e7", "e5"))
        .await;

    assert!(matches!(result, Err(MoveEngineError::OutOfTurn)));
    assert_eq!(store.get(&game.id).await.unwrap(), Some(game));
}

#[tokio::test]
async fn move_exposing_own_king_is_rejected() {
    let (store, engine) = build_engine(Arc::new(InMemoryGameRepository::new()));
    let mut game = human_game(&store).await;
    // White rook on e2 is pinned against the king by the rook on e8.
    game.position = "4r2k/8/8/8/8/8/4R3/4K3 w - - 0 1".to_string();
    store.save(&game).await.unwrap();

    let result = engine
        .propose_move(Side::White, &mv(&game.id, "e2", "a2"))
        .await;

    assert!(matches!(result, Err(MoveEngineError::IllegalMove(_))));
    assert_eq!(store.get(&game.id).await.unwrap(), Some(game));
}

#[rstest]
#[case::bad_rank("e9", "e4")]
#[case::same_square("e2", "e2")]
#[case::garbage("xx", "yy")]
#[tokio::test]
async fn malformed_squares_are_illegal_moves(#[case] from: &str, #[case] to: &str) {
    let (store, engine) = build_engine(Arc::new(InMemoryGameRepository::new()));
    let game = human_game(&store).await;

    let result = engine
        .propose_move(Side::White, &mv(&game.id, from, to))
        .await;

    assert!(matches!(result, Err(MoveEngineError::IllegalMove(_))));
}

#[tokio::test]
async fn checkmate_finishes_and_never_wakes_the_opponent() {
    // Engine seated on Black, but the test plays Black's moves first, so
    // every scheduled reply loses its re-validation race.
    let (store, engine) = build_engine(Arc::new(InMemoryGameRepository::new()));
    let game = store.create_vs_engine("0xaaa", None).await.unwrap();

    for (side, from, to) in [
        (Side::White, "f2", "f3"),
        (Side::Black, "e7", "e5"),
        (Side::White, "g2", "g4"),
        (Side::Black, "d8", "h4"),
    ] {
        engine
            .propose_move(side, &mv(&game.id, from, to))
            .await
            .unwrap();
    }

    let finished = store.get(&game.id).await.unwrap().unwrap();
    assert_eq!(finished.status, GameStatus::Finished);
    assert_eq!(finished.result, Some(GameResult::WonBy(Side::Black)));

    // Wait out any reply still pending from the g4 handoff; it must
    // observe the finished game and do nothing.
    tokio::time::sleep(REPLY_DELAY + Duration::from_millis(200)).await;
    let after = store.get(&game.id).await.unwrap().unwrap();
    assert_eq!(after.history.len(), 4);
    assert_eq!(after.status, GameStatus::Finished);

    let result = engine
        .propose_move(Side::White, &mv(&game.id, "a2", "a3"))
        .await;
    assert!(matches!(result, Err(MoveEngineError::GameNotActive)));
}

#[tokio::test]
async fn opponent_replies_once_after_the_delay() {
    let (store, engine) = build_engine(Arc::new(InMemoryGameRepository::new()));
    let game = store.create_vs_engine("0xaaa", None).await.unwrap();

    engine
        .propose_move(Side::White, &mv(&game.id, "e2", "e4"))
        .await
        .unwrap();

    let before = store.get(&game.id).await.unwrap().unwrap();
    assert_eq!(before.history.len(), 1);

    tokio::time::sleep(REPLY_DELAY + Duration::from_millis(300)).await;

    let after = store.get(&game.id).await.unwrap().unwrap();
    assert_eq!(after.history.len(), 2);
    assert_eq!(after.turn, Side::White);
}

#[tokio::test]
async fn turn_alternates_and_history_appends_over_random_play() {
    let (store, engine) = build_engine(Arc::new(InMemoryGameRepository::new()));
    let game = human_game(&store).await;
    let rules = ChessRules::new();
    let picker = RandomStrategy::new();

    let mut expected_turn = Side::White;
    let mut history_so_far: Vec<String> = Vec::new();

    for ply in 0..30 {
        let record = store.get(&game.id).await.unwrap().unwrap();
        if record.status == GameStatus::Finished {
            break;
        }
        assert_eq!(record.turn, expected_turn);
        assert_eq!(record.history.len(), ply);
        // Prior entries never change value.
        assert_eq!(record.history, history_so_far);

        let legal = rules.legal_moves(&record.position).unwrap();
        let chosen = picker.choose(&record.position, &legal).unwrap();
        let request = match chosen.promotion {
            Some(promotion) => MoveRequest::with_promotion(
                game.id.clone(),
                chosen.from,
                chosen.to,
                promotion,
            ),
            None => MoveRequest::new(game.id.clone(), chosen.from, chosen.to),
        };
        let updated = engine
            .propose_move(record.turn, &request)
            .await
            .unwrap();

        history_so_far = updated.history.clone();
        assert_eq!(history_so_far.len(), ply + 1);
        expected_turn = expected_turn.opposite();
    }
}

#[tokio::test]
async fn games_survive_a_repository_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.json");

    let game_id = {
        let (store, engine) =
            build_engine(Arc::new(JsonFileGameRepository::new(&path).unwrap()));
        let game = human_game(&store).await;
        engine
            .propose_move(Side::White, &mv(&game.id, "g1", "f3"))
            .await
            .unwrap();
        game.id
    };

    let (store, _) = build_engine(Arc::new(JsonFileGameRepository::new(&path).unwrap()));
    let reloaded = store.get(&game_id).await.unwrap().unwrap();
    assert_eq!(reloaded.history, vec!["Nf3".to_string()]);
    assert_eq!(reloaded.turn, Side::Black);
    assert_eq!(store.list().await.unwrap().len(), 1);
}
