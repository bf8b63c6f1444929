pub mod errors;
pub mod game_store;
pub mod identity;
pub mod move_engine;
pub mod opponent;
