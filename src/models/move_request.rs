use serde::{Deserialize, Serialize};

/// A move proposal, as submitted by the UI for a human or built by the
/// scheduler for the automated opponent. The acting side travels
/// separately; this is just the move itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub game_id: String,
    pub from_square: String,             // e.g., "e2"
    pub to_square: String,               // e.g., "e4"
    pub promotion_piece: Option<String>, // e.g., "q" for queen
}

impl MoveRequest {
    pub fn new(game_id: String, from_square: String, to_square: String) -> Self {
        MoveRequest {
            game_id,
            from_square,
            to_square,
            promotion_piece: None,
        }
    }

    pub fn with_promotion(
        game_id: String,
        from_square: String,
        to_square: String,
        promotion_piece: String,
    ) -> Self {
        MoveRequest {
            game_id,
            from_square,
            to_square,
            promotion_piece: Some(promotion_piece),
        }
    }
}
