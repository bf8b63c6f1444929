pub mod game_store_errors;
pub mod move_engine_errors;
