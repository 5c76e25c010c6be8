//! Ledger domain types: roster entries, game records and balances.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rounds_shared::types::{ParticipantId, Points, RecordId, RoundId, UserId, timestamp};
use serde::{Deserialize, Serialize};

/// Role a roster entry plays in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    /// The user who created the round.
    Creator,
    /// A player who joined the round.
    #[serde(alias = "player")]
    Participant,
    /// Banker/house stake. Not a human player.
    #[serde(alias = "table", alias = "table-board")]
    TableBoard,
}

impl ParticipantRole {
    /// Returns the wire representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Participant => "participant",
            Self::TableBoard => "table_board",
        }
    }

    /// Returns true for roles held by a person rather than the table board.
    #[must_use]
    pub fn is_human(&self) -> bool {
        !matches!(self, Self::TableBoard)
    }
}

/// One entry of a round's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Identifier, unique within the roster.
    pub id: ParticipantId,
    /// Role in the round.
    pub role: ParticipantRole,
    /// Display name, if the service provided one.
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// When the entry joined the roster.
    #[serde(
        default,
        with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub joined_at: Option<DateTime<Utc>>,
}

impl Participant {
    /// Creates a roster entry with no presentation metadata.
    #[must_use]
    pub fn new(id: impl Into<ParticipantId>, role: ParticipantRole) -> Self {
        Self {
            id: id.into(),
            role,
            display_name: None,
            joined_at: None,
        }
    }

    /// Creates the round creator's entry.
    #[must_use]
    pub fn creator(id: impl Into<ParticipantId>) -> Self {
        Self::new(id, ParticipantRole::Creator)
    }

    /// Creates a regular player's entry.
    #[must_use]
    pub fn player(id: impl Into<ParticipantId>) -> Self {
        Self::new(id, ParticipantRole::Participant)
    }

    /// Creates the table board entry.
    #[must_use]
    pub fn table_board(id: impl Into<ParticipantId>) -> Self {
        Self::new(id, ParticipantRole::TableBoard)
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns true if this entry belongs to the given user.
    #[must_use]
    pub fn is_user(&self, user: &UserId) -> bool {
        self.role.is_human() && self.id == *user
    }
}

/// The result of one game: signed deltas per participant.
///
/// Records are appended and never edited. A missing key means the
/// participant's delta for this game is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Record identifier.
    #[serde(alias = "recordId")]
    pub id: RecordId,
    /// Owning round.
    pub round_id: RoundId,
    /// 1-based position of the game within the round.
    #[serde(alias = "sequenceNumber")]
    pub game_number: u32,
    /// Delta per participant for this game.
    #[serde(default)]
    pub participant_amounts: BTreeMap<ParticipantId, Points>,
    /// When the record was submitted.
    #[serde(
        default,
        with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Who submitted the record.
    #[serde(default, alias = "recorderId", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
}

impl GameRecord {
    /// Creates a record with the given deltas and no provenance metadata.
    #[must_use]
    pub fn new<I, K>(round_id: RoundId, game_number: u32, amounts: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<ParticipantId>,
    {
        Self {
            id: RecordId::generate(),
            round_id,
            game_number,
            participant_amounts: amounts
                .into_iter()
                .map(|(id, amount)| (id.into(), Points::new(amount)))
                .collect(),
            created_at: None,
            created_by: None,
        }
    }

    /// Returns the participant's delta for this game (zero if absent).
    #[must_use]
    pub fn amount_for(&self, participant: &ParticipantId) -> Points {
        self.participant_amounts
            .get(participant)
            .copied()
            .unwrap_or(Points::ZERO)
    }

    /// Returns true if the record carries an entry for the participant.
    #[must_use]
    pub fn references(&self, participant: &ParticipantId) -> bool {
        self.participant_amounts.contains_key(participant)
    }

    /// Returns the sum of all deltas in this record.
    #[must_use]
    pub fn sum(&self) -> Points {
        self.participant_amounts.values().sum()
    }
}

/// A new game result as submitted by a player, before the data layer
/// assigns it an id and a game number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSubmission {
    /// Round the result belongs to.
    pub round_id: RoundId,
    /// Delta per participant.
    pub participant_amounts: BTreeMap<ParticipantId, Points>,
    /// Free-form remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl RecordSubmission {
    /// Creates a submission from `(participant, amount)` pairs.
    #[must_use]
    pub fn new<I, K>(round_id: RoundId, amounts: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<ParticipantId>,
    {
        Self {
            round_id,
            participant_amounts: amounts
                .into_iter()
                .map(|(id, amount)| (id.into(), Points::new(amount)))
                .collect(),
            remarks: None,
        }
    }

    /// Returns the sum of all deltas in this submission.
    #[must_use]
    pub fn sum(&self) -> Points {
        self.participant_amounts.values().sum()
    }
}

/// A roster entry annotated with its running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantBalance {
    /// The roster entry.
    #[serde(flatten)]
    pub participant: Participant,
    /// Sum of the participant's deltas over all records.
    pub running_total: Points,
}
