use serde::{Deserialize, Serialize};

use crate::models::game_record::{GameResult, Side};

/// Published on every accepted mutation. Polling `GameStore::get` remains the
/// primary read path; subscribers get these as a convenience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MoveApplied {
        game_id: String,
        position: String,
        notation: String,
        by: Side,
    },
    GameEnded {
        game_id: String,
        result: GameResult,
    },
}
