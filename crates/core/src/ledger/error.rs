//! Ledger error types.
//!
//! These are the recoverable failures raised at the record-submission
//! boundary. Aggregations (totals, turnover, summaries) never fail; data
//! problems in stored history surface as [`IntegrityWarning`]s instead.
//!
//! [`IntegrityWarning`]: super::integrity::IntegrityWarning

use rounds_shared::AppError;
use rounds_shared::types::{ParticipantId, Points};
use thiserror::Error;

/// Errors that can occur when a game result is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The deltas of a record do not sum to zero.
    #[error("Game record does not balance: deltas sum to {sum}{}", game_label(.game_number))]
    InvalidRecordSum {
        /// Game number, when the record already has one.
        game_number: Option<u32>,
        /// The non-zero sum.
        sum: Points,
    },

    /// A submission carried no deltas at all.
    #[error("Game record has no participant amounts")]
    EmptySubmission,

    /// A submission references someone who is not on the roster.
    #[error("Participant {0} is not part of this round")]
    UnknownParticipant(ParticipantId),
}

#[allow(clippy::ref_option)]
fn game_label(game_number: &Option<u32>) -> String {
    game_number.map_or_else(String::new, |n| format!(" (game {n})"))
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRecordSum { .. } => "INVALID_RECORD_SUM",
            Self::EmptySubmission => "EMPTY_SUBMISSION",
            Self::UnknownParticipant(_) => "UNKNOWN_PARTICIPANT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidRecordSum { .. } | Self::EmptySubmission | Self::UnknownParticipant(_) => {
                400
            }
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}
