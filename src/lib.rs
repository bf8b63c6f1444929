//! Chess game session engine: owns canonical game state, validates and
//! applies move proposals, detects terminal conditions, and hands the turn
//! to an automated opponent. Consumed by a polling UI; the rules of chess
//! come from the `chess` crate behind a thin adapter.

pub mod models;
pub mod repositories;
pub mod rules;
pub mod services;
