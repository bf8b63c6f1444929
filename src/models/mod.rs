pub mod events;
pub mod game_record;
pub mod move_request;
