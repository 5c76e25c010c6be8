//! Wire shapes of the rounds service and their mapping onto engine types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rounds_core::ledger::{GameRecord, Participant, ParticipantRole, RecordSubmission};
use rounds_core::round::{Roster, Round, RoundStatus};
use rounds_shared::types::{ParticipantId, Points, RecordId, RoundId, UserId, timestamp};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::session::UserProfile;

/// Login request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// One-time login code from the identity provider.
    pub code: String,
    /// Display name to register on first login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Round as returned by `/rounds` endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundInfo {
    /// Round identifier.
    #[serde(alias = "id")]
    pub round_id: RoundId,
    /// Short join code.
    #[serde(default)]
    pub round_code: Option<String>,
    /// Game type label.
    #[serde(default)]
    pub game_type: Option<String>,
    /// The user who created the round.
    #[serde(default)]
    pub creator: Option<UserProfile>,
    /// Whether the round plays with a table board.
    #[serde(default)]
    pub has_table: bool,
    /// The user account standing in for the table board.
    #[serde(default)]
    pub table_user: Option<UserProfile>,
    /// Lifecycle status.
    pub status: RoundStatus,
    /// Seat limit.
    #[serde(default)]
    pub max_participants: Option<u32>,
    /// Seats taken.
    #[serde(default)]
    pub current_participants: Option<u32>,
    /// Creation time.
    #[serde(default, with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
    /// Participants, when the endpoint includes them.
    #[serde(default)]
    pub participants: Vec<ParticipantInfo>,
}

impl RoundInfo {
    /// Display name for the round.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.round_code
            .clone()
            .or_else(|| self.game_type.clone())
            .unwrap_or_else(|| format!("Round {}", self.round_id))
    }
}

/// Participant as returned by `/rounds/{id}/participants`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    /// The member.
    pub user_info: UserProfile,
    /// `player`, `spectator` or `table`.
    #[serde(default)]
    pub role: Option<String>,
    /// Join time.
    #[serde(default, with = "timestamp::optional")]
    pub joined_at: Option<DateTime<Utc>>,
}

impl ParticipantInfo {
    /// Maps the member onto a roster entry.
    ///
    /// Spectators hold no stake and yield `None`.
    #[must_use]
    pub fn to_participant(&self, creator: Option<&UserId>) -> Option<Participant> {
        let role = match self.role.as_deref() {
            Some("spectator") => return None,
            Some("table" | "table_board" | "table-board") => ParticipantRole::TableBoard,
            _ if creator == Some(&self.user_info.user_id) => ParticipantRole::Creator,
            _ => ParticipantRole::Participant,
        };
        let mut participant = Participant::new(ParticipantId::from(&self.user_info.user_id), role);
        participant.display_name = self.user_info.nickname.clone();
        participant.joined_at = self.joined_at;
        Some(participant)
    }
}

/// One participant's line in a stored record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecordInfo {
    /// The participant.
    pub user_info: UserProfile,
    /// Signed delta.
    #[serde(deserialize_with = "deserialize_points")]
    pub amount_change: Points,
    /// Winner flag as stored by the service.
    #[serde(default)]
    pub is_winner: Option<bool>,
}

/// Record as returned by `/records` endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInfo {
    /// Record identifier.
    #[serde(alias = "id")]
    pub record_id: RecordId,
    /// Owning round.
    pub round_id: RoundId,
    /// Game number within the round.
    #[serde(alias = "gameNumber")]
    pub sequence_number: u32,
    /// Who submitted the record.
    #[serde(default)]
    pub recorder: Option<UserProfile>,
    /// Submission time.
    #[serde(default, with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
    /// Per-participant lines.
    #[serde(default)]
    pub participant_details: Vec<ParticipantRecordInfo>,
}

impl From<RecordInfo> for GameRecord {
    fn from(info: RecordInfo) -> Self {
        let participant_amounts: BTreeMap<ParticipantId, Points> = info
            .participant_details
            .into_iter()
            .map(|line| (ParticipantId::from(line.user_info.user_id), line.amount_change))
            .collect();

        Self {
            id: info.record_id,
            round_id: info.round_id,
            game_number: info.sequence_number,
            participant_amounts,
            created_at: info.created_at,
            created_by: info.recorder.map(|r| r.user_id),
        }
    }
}

/// Body for `POST /records`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    /// Round the record belongs to.
    pub round_id: RoundId,
    /// Record type; multi-party results are `special`.
    pub record_type: String,
    /// Short description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sum of the winning deltas.
    pub total_amount: Points,
    /// Per-participant lines.
    pub participant_records: Vec<ParticipantRecordRequest>,
    /// Free-form remarks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// One line of [`CreateRecordRequest`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecordRequest {
    /// The participant.
    pub user_id: ParticipantId,
    /// Signed delta.
    pub amount_change: Points,
    /// Whether the delta is a win.
    pub is_winner: bool,
}

impl From<&RecordSubmission> for CreateRecordRequest {
    fn from(submission: &RecordSubmission) -> Self {
        let total_amount: Points = submission
            .participant_amounts
            .values()
            .filter(|a| a.is_positive())
            .sum();

        Self {
            round_id: submission.round_id.clone(),
            record_type: "special".to_string(),
            description: None,
            total_amount,
            participant_records: submission
                .participant_amounts
                .iter()
                .map(|(id, amount)| ParticipantRecordRequest {
                    user_id: id.clone(),
                    amount_change: *amount,
                    is_winner: amount.is_positive(),
                })
                .collect(),
            remarks: submission.remarks.clone(),
        }
    }
}

/// Body for `POST /rounds`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoundRequest {
    /// Game type label.
    pub game_type: String,
    /// Seat limit.
    pub max_participants: u32,
    /// Whether the round plays with a table board.
    pub has_table: bool,
    /// Listed publicly.
    pub is_public: bool,
}

impl Default for CreateRoundRequest {
    fn default() -> Self {
        Self {
            game_type: "mahjong".to_string(),
            max_participants: 4,
            has_table: false,
            is_public: true,
        }
    }
}

/// Body for `POST /rounds/{id}/start`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRoundRequest {
    /// Whether the service should create the table board.
    pub has_table: bool,
}

/// Assembles an engine round from the service's three views of it.
///
/// Records keep the order the service returned them in, so numbering
/// problems stay visible to `audit`.
#[must_use]
pub fn assemble_round(
    info: &RoundInfo,
    participants: &[ParticipantInfo],
    records: Vec<RecordInfo>,
) -> Round {
    let creator = info.creator.as_ref().map(|c| &c.user_id);
    let mut entries: Vec<Participant> = participants
        .iter()
        .filter_map(|p| p.to_participant(creator))
        .collect();

    if let Some(creator) = creator
        && !entries.iter().any(|p| p.id == *creator)
    {
        entries.insert(0, Participant::creator(creator.clone()));
    }
    if let Some(table_user) = &info.table_user
        && !entries.iter().any(|p| p.id == table_user.user_id)
    {
        entries.push(Participant::table_board(table_user.user_id.clone()));
    }

    let records: Vec<GameRecord> = records.into_iter().map(GameRecord::from).collect();

    Round {
        id: info.round_id.clone(),
        name: info.display_name(),
        status: info.status,
        max_participants: info.max_participants,
        roster: Roster::new(entries),
        records,
    }
}

/// Reads a score that the service may send as an integer, a decimal with
/// a zero fraction (`15.00`), or a string of either.
fn deserialize_points<'de, D>(deserializer: D) -> Result<Points, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    let text = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    };
    parse_points(&text).ok_or_else(|| de::Error::custom(format!("not a whole score: {text}")))
}

fn parse_points(text: &str) -> Option<Points> {
    let text = text.trim();
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if !fraction.chars().all(|c| c == '0') {
        return None;
    }
    whole.parse::<i64>().ok().map(Points::new)
}
