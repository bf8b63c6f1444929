use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STARTING_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Waiting,
    Active,
    Finished,
}

/// Absolute terminal result. Human-relative labels are derived at the
/// presentation boundary via [`GameRecord::outcome_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    WonBy(Side),
    Draw,
}

/// Presentation-only outcome label, relative to one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub wallet: String,
    pub side: Side,
    pub seat_index: u8,
    pub display_name: Option<String>,
    pub is_engine: bool,
}

impl Player {
    pub fn human(wallet: &str, side: Side, seat_index: u8) -> Self {
        Player {
            wallet: wallet.to_string(),
            side,
            seat_index,
            display_name: None,
            is_engine: false,
        }
    }

    pub fn engine(side: Side, seat_index: u8) -> Self {
        Player {
            wallet: "AI-AGENT-001".to_string(),
            side,
            seat_index,
            display_name: Some("FlashChain AI".to_string()),
            is_engine: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub players: Vec<Player>,
    pub position: String,
    pub turn: Side,
    pub history: Vec<String>,
    pub status: GameStatus,
    pub result: Option<GameResult>,
    pub last_activity_at: DateTime<Utc>,
}

impl GameRecord {
    /// Builds a record at the standard starting position. Status follows the
    /// seat count: two seated players start Active, fewer wait.
    pub fn new(players: Vec<Player>) -> Self {
        let status = if players.len() == 2 {
            GameStatus::Active
        } else {
            GameStatus::Waiting
        };
        GameRecord {
            id: Uuid::new_v4().to_string(),
            players,
            position: STARTING_POSITION.to_string(),
            turn: Side::White,
            history: Vec::new(),
            status,
            result: None,
            last_activity_at: Utc::now(),
        }
    }

    pub fn player_on(&self, side: Side) -> Option<&Player> {
        self.players.iter().find(|p| p.side == side)
    }

    /// The side occupied by the automated opponent, if one is seated.
    pub fn engine_side(&self) -> Option<Side> {
        self.players.iter().find(|p| p.is_engine).map(|p| p.side)
    }

    /// Relative outcome label for a side, for display only.
    pub fn outcome_for(&self, side: Side) -> Option<Outcome> {
        match self.result? {
            GameResult::Draw => Some(Outcome::Draw),
            GameResult::WonBy(winner) if winner == side => Some(Outcome::Win),
            GameResult::WonBy(_) => Some(Outcome::Loss),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_waiting_with_one_seat() {
        let record = GameRecord::new(vec![Player::human("0xabc", Side::White, 0)]);

        assert_eq!(record.status, GameStatus::Waiting);
        assert_eq!(record.position, STARTING_POSITION);
        assert_eq!(record.turn, Side::White);
        assert!(record.history.is_empty());
        assert!(record.result.is_none());
    }

    #[test]
    fn test_new_record_active_with_two_seats() {
        let record = GameRecord::new(vec![
            Player::human("0xabc", Side::White, 0),
            Player::engine(Side::Black, 1),
        ]);

        assert_eq!(record.status, GameStatus::Active);
        assert_eq!(record.engine_side(), Some(Side::Black));
    }

    #[test]
    fn test_record_id_uniqueness() {
        let a = GameRecord::new(vec![]);
        let b = GameRecord::new(vec![]);

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_outcome_for_is_relative() {
        let mut record = GameRecord::new(vec![
            Player::human("0xabc", Side::White, 0),
            Player::engine(Side::Black, 1),
        ]);
        record.status = GameStatus::Finished;
        record.result = Some(GameResult::WonBy(Side::White));

        assert_eq!(record.outcome_for(Side::White), Some(Outcome::Win));
        assert_eq!(record.outcome_for(Side::Black), Some(Outcome::Loss));

        record.result = Some(GameResult::Draw);
        assert_eq!(record.outcome_for(Side::White), Some(Outcome::Draw));
    }

    #[test]
    fn test_outcome_absent_before_finish() {
        let record = GameRecord::new(vec![Player::human("0xabc", Side::White, 0)]);

        assert_eq!(record.outcome_for(Side::White), None);
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let record = GameRecord::new(vec![
            Player::human("0xabc", Side::White, 0),
            Player::engine(Side::Black, 1),
        ]);

        let serialized = serde_json::to_string(&record).unwrap();
        assert!(serialized.contains("\"position\""));
        assert!(serialized.contains("AI-AGENT-001"));

        let deserialized: GameRecord = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, record);
    }
}
