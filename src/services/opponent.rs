use rand::seq::SliceRandom;

use crate::rules::chess_rules::LegalMove;

/// Move selection for the automated opponent. Implementations see the
/// current position and its legal moves and pick one; the engine and
/// scheduler stay untouched when the strategy changes.
pub trait OpponentStrategy: Send + Sync {
    fn choose(&self, position: &str, legal_moves: &[LegalMove]) -> Option<LegalMove>;
}

/// Uniformly random legal move. Good enough to keep a game moving.
#[derive(Clone, Default)]
pub struct RandomStrategy;

impl RandomStrategy {
    pub fn new() -> Self {
        RandomStrategy
    }
}

impl OpponentStrategy for RandomStrategy {
    fn choose(&self, _position: &str, legal_moves: &[LegalMove]) -> Option<LegalMove> {
        legal_moves.choose(&mut rand::thread_rng()).cloned()
    }
}
