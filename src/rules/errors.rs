#[derive(Debug)]
pub enum RulesError {
    InvalidPosition(String),
    IllegalMove(String),
}

impl std::fmt::Display for RulesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesError::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
            RulesError::IllegalMove(msg) => write!(f, "Illegal move: {}", msg),
        }
    }
}

impl std::error::Error for RulesError {}
