//! Property-based tests for zero-sum validation.
//!
//! Feature: ledger-engine, Property 6: Zero-Sum Record Validation

use proptest::prelude::*;
use rounds_shared::types::{Points, RoundId};

use super::error::LedgerError;
use super::types::{GameRecord, Participant, RecordSubmission};
use super::validation::{check_zero_sum, validate_submission, validate_zero_sum};

/// Strategy to generate deltas that sum to zero across 2..=6 participants.
fn zero_sum_amounts() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(-10_000i64..=10_000, 1..6).prop_map(|deltas| {
        let balance: i64 = -deltas.iter().sum::<i64>();
        deltas
            .into_iter()
            .chain(std::iter::once(balance))
            .enumerate()
            .map(|(i, amount)| (format!("p{i}"), amount))
            .collect()
    })
}

fn roster_for(amounts: &[(String, i64)]) -> Vec<Participant> {
    amounts
        .iter()
        .map(|(id, _)| Participant::player(id.clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 6.1: Balanced Records Pass**
    ///
    /// *For any* record whose deltas sum to zero, validation SHALL accept it.
    #[test]
    fn prop_balanced_record_accepted(amounts in zero_sum_amounts()) {
        let record = GameRecord::new(RoundId::new("r"), 1, amounts);
        prop_assert!(validate_zero_sum(&record));
        prop_assert!(check_zero_sum(&record).is_ok());
    }

    /// **Property 6.2: Any Skew Is Rejected**
    ///
    /// *For any* balanced record nudged by a non-zero amount, validation
    /// SHALL reject it and report exactly that amount as the sum.
    #[test]
    fn prop_skewed_record_rejected(
        amounts in zero_sum_amounts(),
        skew in prop_oneof![-1_000i64..=-1, 1i64..=1_000],
    ) {
        let mut amounts = amounts;
        amounts[0].1 += skew;
        let record = GameRecord::new(RoundId::new("r"), 3, amounts);

        prop_assert!(!validate_zero_sum(&record));
        prop_assert_eq!(
            check_zero_sum(&record),
            Err(LedgerError::InvalidRecordSum {
                game_number: Some(3),
                sum: Points::new(skew),
            })
        );
    }

    /// **Property 6.3: Submissions Follow the Same Rule**
    ///
    /// *For any* submission over roster ids, acceptance coincides with the
    /// zero-sum rule.
    #[test]
    fn prop_submission_matches_zero_sum(
        amounts in zero_sum_amounts(),
        skew in -50i64..=50,
    ) {
        let roster = roster_for(&amounts);
        let mut amounts = amounts;
        amounts[0].1 += skew;
        let submission = RecordSubmission::new(RoundId::new("r"), amounts);

        let result = validate_submission(&roster, &submission);
        prop_assert_eq!(result.is_ok(), skew == 0);
    }
}
