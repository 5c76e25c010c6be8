//! Ledger service: settlement of a whole round and the submission gate.
//!
//! Pure business logic with no network or storage dependencies. Callers
//! fetch the round, hand it over, and persist or display the result.

use rounds_shared::types::RoundId;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::LedgerError;
use super::integrity::{IntegrityWarning, audit};
use super::types::{Participant, ParticipantBalance, RecordSubmission};
use super::validation;
use crate::round::Round;

/// Everything the engine derives from one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// The settled round.
    pub round_id: RoundId,
    /// Running total per roster entry, in roster order.
    pub balances: Vec<ParticipantBalance>,
    /// Table-board turnover.
    pub turnover: u64,
    /// Number of records settled.
    pub record_count: usize,
    /// Integrity findings; never fatal.
    pub warnings: Vec<IntegrityWarning>,
}

impl Settlement {
    /// Returns true if the audit found nothing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Ledger service for round settlement and record submission.
pub struct LedgerService;

impl LedgerService {
    /// Settles a round: running totals, turnover and an integrity audit.
    ///
    /// Never fails. Each integrity warning is logged and returned so the
    /// caller can surface it.
    #[must_use]
    pub fn settle(round: &Round) -> Settlement {
        let balances = round.running_totals();
        let turnover = round.table_board_turnover();
        let warnings = audit(&round.roster, &round.records);

        for warning in &warnings {
            warn!(
                round_id = %round.id,
                code = warning.code(),
                "Integrity warning: {warning}"
            );
        }

        debug!(
            round_id = %round.id,
            records = round.records.len(),
            turnover,
            warnings = warnings.len(),
            "Round settled"
        );

        Settlement {
            round_id: round.id.clone(),
            balances,
            turnover,
            record_count: round.records.len(),
            warnings,
        }
    }

    /// Validates a new game result before it is sent for storage.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the submission is empty, names someone
    /// outside the roster, or does not sum to zero.
    pub fn validate_submission(
        roster: &[Participant],
        submission: &RecordSubmission,
    ) -> Result<(), LedgerError> {
        validation::validate_submission(roster, submission).inspect_err(|err| {
            debug!(
                round_id = %submission.round_id,
                code = err.error_code(),
                "Rejected record submission: {err}"
            );
        })
    }
}
