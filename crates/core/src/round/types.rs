//! Round status and acting-user types.

use std::fmt;

use rounds_shared::types::UserId;
use serde::{Deserialize, Serialize};

/// Round status.
///
/// The valid transitions are:
/// - Waiting → InProgress (start, resume)
/// - InProgress → Waiting (pause)
/// - InProgress → Completed (end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Open for players to join.
    #[serde(alias = "pending")]
    Waiting,
    /// Games are being played and recorded.
    #[serde(alias = "playing", alias = "active")]
    InProgress,
    /// Ended; no more records.
    #[serde(alias = "finished", alias = "ended")]
    Completed,
}

impl RoundStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns true if moving to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::InProgress)
                | (Self::InProgress, Self::Waiting)
                | (Self::InProgress, Self::Completed)
        )
    }

    /// Returns true if players may join or leave the roster.
    #[must_use]
    pub fn accepts_participants(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns true if game records may be appended.
    #[must_use]
    pub fn accepts_records(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Returns true if running totals are worth showing.
    #[must_use]
    pub fn shows_totals(&self) -> bool {
        !matches!(self, Self::Waiting)
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The user performing a round operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Acting user.
    pub user_id: UserId,
    /// Whether the user holds the admin privilege.
    pub is_admin: bool,
}

impl Actor {
    /// A regular user.
    #[must_use]
    pub fn user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: false,
        }
    }

    /// An administrator.
    #[must_use]
    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: true,
        }
    }
}
