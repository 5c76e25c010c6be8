//! Ledger Engine.
//!
//! This module turns an ordered sequence of game records into balances:
//! - Domain types for roster entries, records and submissions
//! - Zero-sum validation
//! - Running totals, balance history and table-board turnover
//! - Integrity audit of stored history
//! - Per-viewer round summaries
//! - Ledger service tying settlement together

pub mod balance;
pub mod error;
pub mod integrity;
pub mod service;
pub mod summary;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod validation_props;

pub use balance::{
    RunningBalance, balance_history, compute_running_totals, table_board_turnover,
    table_board_turnover_for,
};
pub use error::LedgerError;
pub use integrity::{IntegrityWarning, audit};
pub use service::{LedgerService, Settlement};
pub use summary::{RoundSummary, compute_aggregate_rounds_view};
pub use types::{GameRecord, Participant, ParticipantBalance, ParticipantRole, RecordSubmission};
pub use validation::{check_zero_sum, validate_submission, validate_zero_sum};
