//! Property-based tests for running totals and turnover.
//!
//! Feature: ledger-engine
//! - Property 1: Running Total Additivity
//! - Property 2: Empty Input Identity
//! - Property 3: Idempotence
//! - Property 4: Turnover Non-Negativity
//! - Property 5: Balance History Consistency

use proptest::prelude::*;
use rounds_shared::types::{ParticipantId, Points, RoundId, TABLE_BOARD_KEY};

use super::balance::{balance_history, compute_running_totals, table_board_turnover};
use super::types::{GameRecord, Participant};

const PLAYERS: [&str; 4] = ["A", "B", "C", "D"];

fn roster() -> Vec<Participant> {
    let mut roster = vec![Participant::creator(PLAYERS[0])];
    roster.extend(PLAYERS[1..].iter().map(|id| Participant::player(*id)));
    roster.push(Participant::table_board(TABLE_BOARD_KEY));
    roster
}

/// Strategy to generate one balanced game: random player deltas, with the
/// table board absorbing the difference.
fn balanced_game() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(-500i64..=500, PLAYERS.len()).prop_map(|deltas| {
        let house: i64 = -deltas.iter().sum::<i64>();
        PLAYERS
            .iter()
            .map(|id| (*id).to_string())
            .zip(deltas)
            .chain(std::iter::once((TABLE_BOARD_KEY.to_string(), house)))
            .collect()
    })
}

/// Strategy to generate a game between players only (no table board key).
fn players_only_game() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(-500i64..=500, PLAYERS.len() - 1).prop_map(|deltas| {
        let last: i64 = -deltas.iter().sum::<i64>();
        PLAYERS
            .iter()
            .map(|id| (*id).to_string())
            .zip(deltas.into_iter().chain(std::iter::once(last)))
            .collect()
    })
}

fn to_records(games: Vec<Vec<(String, i64)>>) -> Vec<GameRecord> {
    let round_id = RoundId::new("prop-round");
    games
        .into_iter()
        .zip(1u32..)
        .map(|(amounts, n)| GameRecord::new(round_id.clone(), n, amounts))
        .collect()
}

fn totals(records: &[GameRecord]) -> Vec<Points> {
    compute_running_totals(&roster(), records)
        .into_iter()
        .map(|b| b.running_total)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Running Total Additivity**
    ///
    /// *For any* split of a record sequence into a prefix and a suffix, the
    /// totals over the whole equal the per-participant sum of the totals
    /// over each part.
    #[test]
    fn prop_totals_are_additive(
        games in prop::collection::vec(balanced_game(), 0..12),
        split in 0usize..12,
    ) {
        let records = to_records(games);
        let split = split.min(records.len());
        let (head, tail) = records.split_at(split);

        let whole = totals(&records);
        let parts: Vec<Points> = totals(head)
            .into_iter()
            .zip(totals(tail))
            .map(|(a, b)| a + b)
            .collect();

        prop_assert_eq!(whole, parts);
    }

    /// **Property 2: Empty Input Identity**
    ///
    /// *For any* roster, no records means every total is zero.
    #[test]
    fn prop_empty_records_all_zero(extra in prop::collection::vec("[a-z]{1,6}", 0..6)) {
        let mut roster = roster();
        roster.extend(extra.into_iter().map(|id| Participant::player(format!("x-{id}"))));
        let balances = compute_running_totals(&roster, &[]);
        prop_assert_eq!(balances.len(), roster.len());
        prop_assert!(balances.iter().all(|b| b.running_total.is_zero()));
    }

    /// **Property 3: Idempotence**
    ///
    /// *For any* input, computing twice gives the same result.
    #[test]
    fn prop_totals_idempotent(games in prop::collection::vec(balanced_game(), 0..12)) {
        let records = to_records(games);
        let first = compute_running_totals(&roster(), &records);
        let second = compute_running_totals(&roster(), &records);
        prop_assert_eq!(first, second);
    }

    /// **Property 3.1: Balanced Records Keep the Roster Balanced**
    ///
    /// *For any* sequence of zero-sum records over roster ids only, the
    /// running totals sum to zero.
    #[test]
    fn prop_balanced_records_sum_to_zero(games in prop::collection::vec(balanced_game(), 0..12)) {
        let records = to_records(games);
        let sum: Points = totals(&records).into_iter().sum();
        prop_assert!(sum.is_zero());
    }

    /// **Property 4: Turnover Non-Negativity**
    ///
    /// *For any* records, turnover is the sum of absolute table-board
    /// deltas, so it is at least the magnitude of the table board's total.
    #[test]
    fn prop_turnover_bounds_table_board_total(
        games in prop::collection::vec(balanced_game(), 0..12),
    ) {
        let records = to_records(games);
        let turnover = table_board_turnover(&records);
        let house_total: Points = records
            .iter()
            .map(|r| r.amount_for(&ParticipantId::table_board()))
            .sum();
        prop_assert!(turnover >= house_total.magnitude());
    }

    /// **Property 4.1: No Table Board, No Turnover**
    ///
    /// *For any* records without a table-board key, turnover is zero.
    #[test]
    fn prop_turnover_zero_without_table_board(
        games in prop::collection::vec(players_only_game(), 0..12),
    ) {
        let records = to_records(games);
        prop_assert_eq!(table_board_turnover(&records), 0);
    }

    /// **Property 5: Balance History Consistency**
    ///
    /// *For any* participant, each step starts where the previous one ended
    /// and the final balance equals the running total.
    #[test]
    fn prop_history_chain_matches_total(
        games in prop::collection::vec(balanced_game(), 1..12),
        who in 0usize..PLAYERS.len(),
    ) {
        let records = to_records(games);
        let id = ParticipantId::new(PLAYERS[who]);
        let history = balance_history(&id, &records);

        prop_assert_eq!(history.len(), records.len());
        prop_assert!(history[0].previous_balance.is_zero());
        for pair in history.windows(2) {
            prop_assert_eq!(pair[1].previous_balance, pair[0].current_balance);
        }
        for step in &history {
            prop_assert_eq!(step.current_balance, step.previous_balance + step.change);
        }

        let total = totals(&records)[who];
        prop_assert_eq!(history.last().map(|s| s.current_balance), Some(total));
    }
}
