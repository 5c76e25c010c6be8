//! Per-user statistics across rounds.
//!
//! This module provides pure aggregation over settled history:
//! - Rounds played, won and lost
//! - Games won, lost and drawn
//! - Win and loss amounts, best and worst game
//! - Leaderboards ranked by score or win rate

pub mod service;
pub mod types;


pub use service::StatsService;
pub use types::*;
