//! Statistics data types.

use rounds_shared::types::{Points, UserId};
use serde::{Deserialize, Serialize};

/// A user's record across a set of rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    /// The user the figures belong to.
    pub user_id: UserId,
    /// Rounds the user holds a seat in.
    pub rounds_played: u32,
    /// Rounds the user finished ahead.
    pub rounds_won: u32,
    /// Rounds the user finished behind.
    pub rounds_lost: u32,
    /// Games with an entry for the user.
    pub games_played: u32,
    /// Games with a positive delta.
    pub games_won: u32,
    /// Games with a negative delta.
    pub games_lost: u32,
    /// Games with a zero delta.
    pub games_drawn: u32,
    /// Net result over all games.
    pub total: Points,
    /// Sum of positive deltas.
    pub win_amount: Points,
    /// Sum of negative deltas, as a positive figure.
    pub loss_amount: Points,
    /// Largest single-game delta.
    pub best_game: Option<Points>,
    /// Smallest single-game delta.
    pub worst_game: Option<Points>,
}

impl UserStatistics {
    /// Creates an all-zero record for the user.
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            rounds_played: 0,
            rounds_won: 0,
            rounds_lost: 0,
            games_played: 0,
            games_won: 0,
            games_lost: 0,
            games_drawn: 0,
            total: Points::ZERO,
            win_amount: Points::ZERO,
            loss_amount: Points::ZERO,
            best_game: None,
            worst_game: None,
        }
    }

    /// Share of played games won, as a whole percentage rounded down.
    #[must_use]
    pub fn win_rate_percent(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }
        let rate = u64::from(self.games_won) * 100 / u64::from(self.games_played);
        u32::try_from(rate).unwrap_or(100)
    }

    /// Average net result per round played, rounded toward zero.
    #[must_use]
    pub fn average_per_round(&self) -> Points {
        if self.rounds_played == 0 {
            return Points::ZERO;
        }
        Points::new(self.total.value() / i64::from(self.rounds_played))
    }
}

/// What a leaderboard ranks by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeaderboardMetric {
    /// Net result over all games.
    #[default]
    Score,
    /// Share of played games won.
    WinRate,
}

/// Direction of a leaderboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lowest first.
    Asc,
    /// Highest first.
    #[default]
    Desc,
}

/// Leaderboard ordering; highest score first by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSort {
    /// Ranking key.
    #[serde(default, rename = "sortBy")]
    pub metric: LeaderboardMetric,
    /// Direction.
    #[serde(default, rename = "sortOrder")]
    pub order: SortOrder,
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: u32,
    /// Display name from the first roster entry that carried one.
    pub display_name: Option<String>,
    /// The user's figures over the ranked rounds.
    pub statistics: UserStatistics,
}
