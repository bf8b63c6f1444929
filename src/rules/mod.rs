pub mod chess_rules;
pub mod errors;
