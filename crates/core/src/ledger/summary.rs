//! Per-viewer projection of a list of rounds.

use rounds_shared::types::{ParticipantId, Points, RoundId, UserId};
use serde::Serialize;

use super::types::ParticipantBalance;
use crate::round::{Round, RoundStatus};

/// A round as seen by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    /// Round identifier.
    pub round_id: RoundId,
    /// Round name.
    pub name: String,
    /// Lifecycle status.
    pub status: RoundStatus,
    /// The viewer created the round.
    pub is_creator: bool,
    /// The viewer is anywhere on the roster, table board included.
    pub is_participant: bool,
    /// Running totals, in roster order.
    pub balances: Vec<ParticipantBalance>,
    /// Number of game records.
    pub record_count: usize,
    /// Table-board turnover.
    pub turnover: u64,
    /// The viewer's own running total, if on the roster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_total: Option<Points>,
}

/// Summarises each round for `viewer`, preserving input order.
///
/// The viewer is matched by id against every roster entry, so a user
/// standing in as the table board sees their own stake.
/// Read-only; the rounds are not touched.
#[must_use]
pub fn compute_aggregate_rounds_view(rounds: &[Round], viewer: &UserId) -> Vec<RoundSummary> {
    let viewer_id = ParticipantId::from(viewer);
    rounds
        .iter()
        .map(|round| {
            let balances = round.running_totals();
            let viewer_total = balances
                .iter()
                .find(|b| b.participant.id == viewer_id)
                .map(|b| b.running_total);

            RoundSummary {
                round_id: round.id.clone(),
                name: round.name.clone(),
                status: round.status,
                is_creator: round.is_creator(viewer),
                is_participant: round.roster.contains(&viewer_id),
                balances,
                record_count: round.records.len(),
                turnover: round.table_board_turnover(),
                viewer_total,
            }
        })
        .collect()
}
