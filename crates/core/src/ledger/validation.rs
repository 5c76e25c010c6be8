//! Zero-sum validation for game records and submissions.

use super::error::LedgerError;
use super::types::{GameRecord, Participant, RecordSubmission};

/// Returns true iff the record's deltas sum to exactly zero.
///
/// Every unit one player wins is lost by another (or taken/paid by the table
/// board), so anything else is a bad record.
#[must_use]
pub fn validate_zero_sum(record: &GameRecord) -> bool {
    record.sum().is_zero()
}

/// Typed variant of [`validate_zero_sum`].
///
/// # Errors
///
/// Returns `LedgerError::InvalidRecordSum` carrying the offending sum.
pub fn check_zero_sum(record: &GameRecord) -> Result<(), LedgerError> {
    let sum = record.sum();
    if sum.is_zero() {
        Ok(())
    } else {
        Err(LedgerError::InvalidRecordSum {
            game_number: Some(record.game_number),
            sum,
        })
    }
}

/// Validates a new game result against the current roster.
///
/// Checked in order: the submission has at least one delta, every key is on
/// the roster, and the deltas sum to zero. Unlike stored history, a new
/// record may not name anyone outside the roster.
///
/// # Errors
///
/// Returns the first rule the submission breaks.
pub fn validate_submission(
    roster: &[Participant],
    submission: &RecordSubmission,
) -> Result<(), LedgerError> {
    if submission.participant_amounts.is_empty() {
        return Err(LedgerError::EmptySubmission);
    }

    if let Some(unknown) = submission
        .participant_amounts
        .keys()
        .find(|id| !roster.iter().any(|p| &p.id == *id))
    {
        return Err(LedgerError::UnknownParticipant(unknown.clone()));
    }

    let sum = submission.sum();
    if !sum.is_zero() {
        return Err(LedgerError::InvalidRecordSum {
            game_number: None,
            sum,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rounds_shared::types::{ParticipantId, Points, RoundId};

    fn round() -> RoundId {
        RoundId::new("r1")
    }

    fn roster() -> Vec<Participant> {
        vec![
            Participant::creator("A"),
            Participant::player("B"),
            Participant::player("C"),
            Participant::player("D"),
            Participant::table_board("table_board"),
        ]
    }

    #[test]
    fn test_balanced_record_with_table_board() {
        let record = GameRecord::new(
            round(),
            1,
            [("A", 15), ("B", 10), ("C", -10), ("D", -25), ("table_board", 10)],
        );
        assert!(validate_zero_sum(&record));
        assert!(check_zero_sum(&record).is_ok());
    }

    #[test]
    fn test_unbalanced_record() {
        let record = GameRecord::new(round(), 2, [("A", 15), ("B", 10)]);
        assert!(!validate_zero_sum(&record));
        assert_eq!(
            check_zero_sum(&record),
            Err(LedgerError::InvalidRecordSum {
                game_number: Some(2),
                sum: Points::new(25),
            })
        );
    }

    #[test]
    fn test_overflowing_record_is_unbalanced() {
        let record = GameRecord::new(round(), 3, [("A", i64::MAX), ("B", i64::MAX), ("C", 2)]);
        assert!(!validate_zero_sum(&record));
        assert_eq!(
            check_zero_sum(&record),
            Err(LedgerError::InvalidRecordSum {
                game_number: Some(3),
                sum: Points::new(i64::MAX),
            })
        );

        let submission =
            RecordSubmission::new(round(), [("A", i64::MAX), ("B", i64::MAX), ("C", 2)]);
        let roster = vec![
            Participant::creator("A"),
            Participant::player("B"),
            Participant::player("C"),
        ];
        assert!(validate_submission(&roster, &submission).is_err());
    }

    #[test]
    fn test_near_cancelling_extremes_are_unbalanced() {
        let record = GameRecord::new(round(), 1, [("A", i64::MAX), ("B", 1), ("C", -i64::MAX)]);
        assert!(!validate_zero_sum(&record));
    }

    #[test]
    fn test_empty_record_is_balanced() {
        let record = GameRecord::new(round(), 1, Vec::<(&str, i64)>::new());
        assert!(validate_zero_sum(&record));
    }

    #[test]
    fn test_submission_accepted() {
        let submission = RecordSubmission::new(round(), [("A", -30), ("B", 20), ("table_board", 10)]);
        assert!(validate_submission(&roster(), &submission).is_ok());
    }

    #[test]
    fn test_empty_submission_rejected() {
        let submission = RecordSubmission::new(round(), Vec::<(&str, i64)>::new());
        assert_eq!(
            validate_submission(&roster(), &submission),
            Err(LedgerError::EmptySubmission)
        );
    }

    #[test]
    fn test_submission_with_unknown_participant_rejected() {
        let submission = RecordSubmission::new(round(), [("A", 5), ("Z", -5)]);
        assert_eq!(
            validate_submission(&roster(), &submission),
            Err(LedgerError::UnknownParticipant(ParticipantId::new("Z")))
        );
    }

    #[test]
    fn test_unbalanced_submission_rejected() {
        let submission = RecordSubmission::new(round(), [("A", 15), ("B", 10)]);
        assert_eq!(
            validate_submission(&roster(), &submission),
            Err(LedgerError::InvalidRecordSum {
                game_number: None,
                sum: Points::new(25),
            })
        );
    }
}
