//! Round lifecycle error types.

use rounds_shared::AppError;
use rounds_shared::types::{ParticipantId, RecordId, UserId};
use thiserror::Error;

use super::types::RoundStatus;
use crate::ledger::LedgerError;

/// Errors that can occur when changing a round or its roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    // ========== State Errors ==========
    /// The requested status change is not allowed.
    #[error("Cannot move round from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: RoundStatus,
        /// Requested status.
        to: RoundStatus,
    },

    /// The roster is frozen in the current status.
    #[error("Round is {0}; players can no longer join or leave")]
    RosterClosed(RoundStatus),

    /// Records can only be added while the round is in progress.
    #[error("Round is {0}; game records cannot be added")]
    RecordsClosed(RoundStatus),

    // ========== Permission Errors ==========
    /// Only the creator may perform this operation.
    #[error("Only the round creator can do this")]
    NotCreator,

    /// The user is neither allowed by role nor an admin.
    #[error("User {0} is not allowed to do this")]
    NotAuthorized(UserId),

    // ========== Roster Errors ==========
    /// The roster has no free seat.
    #[error("Round is full ({0} players)")]
    RoundFull(u32),

    /// The user is already on the roster.
    #[error("User {0} has already joined this round")]
    AlreadyJoined(UserId),

    /// The user is not on the roster.
    #[error("User {0} is not a participant of this round")]
    NotParticipant(UserId),

    /// The creator must stay in the round.
    #[error("The creator cannot leave the round")]
    CreatorCannotLeave,

    /// Game records reference the participant, so the entry must stay.
    #[error("Participant {0} appears in game records and cannot be removed")]
    ParticipantHasRecords(ParticipantId),

    /// The round already has a table board.
    #[error("Round already has a table board")]
    TableBoardAlreadyAssigned,

    /// The chosen id cannot act as the table board.
    #[error("{0} cannot be the table board")]
    InvalidTableBoard(ParticipantId),

    /// Two roster entries share an id.
    #[error("Duplicate participant {0}")]
    DuplicateParticipant(ParticipantId),

    /// The roster has no creator, or more than one.
    #[error("Roster must have exactly one creator, found {0}")]
    CreatorCount(usize),

    // ========== Record Errors ==========
    /// No record with this id in the round.
    #[error("Game record not found: {0}")]
    RecordNotFound(RecordId),

    /// The record failed ledger validation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl RoundError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::RosterClosed(_) => "ROSTER_CLOSED",
            Self::RecordsClosed(_) => "RECORDS_CLOSED",
            Self::NotCreator => "NOT_CREATOR",
            Self::NotAuthorized(_) => "NOT_AUTHORIZED",
            Self::RoundFull(_) => "ROUND_FULL",
            Self::AlreadyJoined(_) => "ALREADY_JOINED",
            Self::NotParticipant(_) => "NOT_PARTICIPANT",
            Self::CreatorCannotLeave => "CREATOR_CANNOT_LEAVE",
            Self::ParticipantHasRecords(_) => "PARTICIPANT_HAS_RECORDS",
            Self::TableBoardAlreadyAssigned => "TABLE_BOARD_ALREADY_ASSIGNED",
            Self::InvalidTableBoard(_) => "INVALID_TABLE_BOARD",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::CreatorCount(_) => "CREATOR_COUNT",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::Ledger(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed roster or record
            Self::InvalidTableBoard(_)
            | Self::DuplicateParticipant(_)
            | Self::CreatorCount(_) => 400,

            // 403 Forbidden - permission errors
            Self::NotCreator | Self::NotAuthorized(_) => 403,

            // 404 Not Found
            Self::NotParticipant(_) | Self::RecordNotFound(_) => 404,

            // 409 Conflict - state errors
            Self::InvalidTransition { .. }
            | Self::RosterClosed(_)
            | Self::RecordsClosed(_)
            | Self::RoundFull(_)
            | Self::AlreadyJoined(_)
            | Self::CreatorCannotLeave
            | Self::ParticipantHasRecords(_)
            | Self::TableBoardAlreadyAssigned => 409,

            Self::Ledger(err) => err.http_status_code(),
        }
    }
}

impl From<RoundError> for AppError {
    fn from(err: RoundError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Validation(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rounds_shared::types::Points;

    #[test]
    fn test_error_codes() {
        assert_eq!(RoundError::NotCreator.error_code(), "NOT_CREATOR");
        assert_eq!(RoundError::RoundFull(4).error_code(), "ROUND_FULL");
        assert_eq!(
            RoundError::Ledger(LedgerError::EmptySubmission).error_code(),
            "EMPTY_SUBMISSION"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(RoundError::NotCreator.http_status_code(), 403);
        assert_eq!(
            RoundError::NotParticipant(UserId::new("9")).http_status_code(),
            404
        );
        assert_eq!(RoundError::CreatorCannotLeave.http_status_code(), 409);
        assert_eq!(RoundError::CreatorCount(0).http_status_code(), 400);
        assert_eq!(
            RoundError::Ledger(LedgerError::InvalidRecordSum {
                game_number: None,
                sum: Points::new(1),
            })
            .http_status_code(),
            400
        );
    }

    #[test]
    fn test_error_display() {
        let err = RoundError::InvalidTransition {
            from: RoundStatus::Completed,
            to: RoundStatus::InProgress,
        };
        assert_eq!(err.to_string(), "Cannot move round from completed to in_progress");
        assert_eq!(
            RoundError::RecordsClosed(RoundStatus::Waiting).to_string(),
            "Round is waiting; game records cannot be added"
        );
    }

    #[test]
    fn test_converts_to_app_error() {
        let app: AppError = RoundError::NotCreator.into();
        assert!(matches!(app, AppError::Forbidden(_)));
        let app: AppError = RoundError::RoundFull(4).into();
        assert!(matches!(app, AppError::Conflict(_)));
        let app: AppError = RoundError::Ledger(LedgerError::EmptySubmission).into();
        assert!(matches!(app, AppError::Validation(_)));
    }
}
