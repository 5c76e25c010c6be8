//! Running totals, per-game balance history and table-board turnover.
//!
//! Balances are never stored. They are recomputed from the record sequence
//! every time, which is what makes deleting a record safe: the next read
//! simply no longer sees it.

use std::collections::HashMap;

use rounds_shared::types::{ParticipantId, Points};
use serde::{Deserialize, Serialize};

use super::types::{GameRecord, Participant, ParticipantBalance};

/// Computes every roster participant's running total.
///
/// The result follows roster order. Records are consumed in the order given
/// and never re-sorted. Deltas for ids that are not on the roster are
/// ignored here; [`audit`](super::integrity::audit) reports them.
#[must_use]
pub fn compute_running_totals(
    roster: &[Participant],
    records: &[GameRecord],
) -> Vec<ParticipantBalance> {
    let mut totals: HashMap<&ParticipantId, Points> =
        roster.iter().map(|p| (&p.id, Points::ZERO)).collect();

    for record in records {
        for (id, amount) in &record.participant_amounts {
            if let Some(total) = totals.get_mut(id) {
                *total += *amount;
            }
        }
    }

    roster
        .iter()
        .map(|participant| ParticipantBalance {
            participant: participant.clone(),
            running_total: totals.get(&participant.id).copied().unwrap_or(Points::ZERO),
        })
        .collect()
}

/// Sum of the absolute table-board deltas under the conventional
/// `table_board` key.
#[must_use]
pub fn table_board_turnover(records: &[GameRecord]) -> u64 {
    table_board_turnover_for(records, &ParticipantId::table_board())
}

/// Sum of the absolute deltas recorded for the given table-board id.
///
/// The sign only says which way money moved through the banker; turnover
/// counts both directions.
#[must_use]
pub fn table_board_turnover_for(records: &[GameRecord], table_board: &ParticipantId) -> u64 {
    records
        .iter()
        .map(|record| record.amount_for(table_board).magnitude())
        .fold(0_u64, u64::saturating_add)
}

/// Running balance of one participant after one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningBalance {
    /// The game this step belongs to.
    pub game_number: u32,
    /// Balance before this game.
    pub previous_balance: Points,
    /// Delta from this game.
    pub change: Points,
    /// Balance after this game.
    pub current_balance: Points,
}

impl RunningBalance {
    /// Creates the step for the participant's first game.
    #[must_use]
    pub fn first_entry(game_number: u32, change: Points) -> Self {
        Self {
            game_number,
            previous_balance: Points::ZERO,
            change,
            current_balance: change,
        }
    }

    /// Creates the step following `previous`.
    ///
    /// - current_balance[N] = previous_balance[N] + change
    /// - previous_balance[N] = current_balance[N-1]
    #[must_use]
    pub fn next_entry(previous: &Self, game_number: u32, change: Points) -> Self {
        Self {
            game_number,
            previous_balance: previous.current_balance,
            change,
            current_balance: previous.current_balance + change,
        }
    }
}

/// Builds one participant's balance, game by game.
///
/// One step per record, including games the participant sat out (change 0),
/// so the history lines up with the record list.
#[must_use]
pub fn balance_history(participant: &ParticipantId, records: &[GameRecord]) -> Vec<RunningBalance> {
    let mut history: Vec<RunningBalance> = Vec::with_capacity(records.len());
    for record in records {
        let change = record.amount_for(participant);
        let step = match history.last() {
            Some(previous) => RunningBalance::next_entry(previous, record.game_number, change),
            None => RunningBalance::first_entry(record.game_number, change),
        };
        history.push(step);
    }
    history
}
