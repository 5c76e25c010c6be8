//! Integrity audit of stored round history.
//!
//! Findings here never block anything. Historical records may name a player
//! who has since left, and the upstream store owns game numbering, so the
//! engine only reports what it sees.

use std::collections::HashSet;
use std::fmt;

use rounds_shared::types::{ParticipantId, Points};
use serde::Serialize;

use super::types::{GameRecord, Participant};

/// A non-fatal data problem found in a round's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// A record carries a delta for an id that is not on the roster.
    UnknownParticipantReference {
        /// Game the record belongs to.
        game_number: u32,
        /// The unknown id.
        participant_id: ParticipantId,
    },
    /// Game numbers are duplicated, decreasing, gapped, or do not start at 1.
    OutOfOrderRecord {
        /// The preceding game number, `None` for the first record.
        previous: Option<u32>,
        /// The game number found.
        found: u32,
    },
    /// A stored record violates the zero-sum rule.
    UnbalancedHistoricalRecord {
        /// Game the record belongs to.
        game_number: u32,
        /// The non-zero sum.
        sum: Points,
    },
}

impl IntegrityWarning {
    /// Returns the warning code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownParticipantReference { .. } => "UNKNOWN_PARTICIPANT_REFERENCE",
            Self::OutOfOrderRecord { .. } => "OUT_OF_ORDER_RECORD",
            Self::UnbalancedHistoricalRecord { .. } => "UNBALANCED_HISTORICAL_RECORD",
        }
    }
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParticipantReference {
                game_number,
                participant_id,
            } => write!(
                f,
                "game {game_number} references {participant_id}, who is not on the roster"
            ),
            Self::OutOfOrderRecord {
                previous: Some(previous),
                found,
            } => write!(f, "game {found} follows game {previous}"),
            Self::OutOfOrderRecord {
                previous: None,
                found,
            } => write!(f, "first game is numbered {found}"),
            Self::UnbalancedHistoricalRecord { game_number, sum } => {
                write!(f, "game {game_number} does not balance (sum {sum})")
            }
        }
    }
}

/// Audits a record sequence against a roster.
///
/// Warnings come out in record order; within one record the numbering
/// finding comes first, then unknown ids (in key order), then the balance.
#[must_use]
pub fn audit(roster: &[Participant], records: &[GameRecord]) -> Vec<IntegrityWarning> {
    let known: HashSet<&ParticipantId> = roster.iter().map(|p| &p.id).collect();
    let mut warnings = Vec::new();
    let mut previous: Option<u32> = None;

    for record in records {
        let expected = previous.map_or(1, |p| p.saturating_add(1));
        if record.game_number != expected {
            warnings.push(IntegrityWarning::OutOfOrderRecord {
                previous,
                found: record.game_number,
            });
        }
        previous = Some(record.game_number);

        for id in record.participant_amounts.keys() {
            if !known.contains(id) {
                warnings.push(IntegrityWarning::UnknownParticipantReference {
                    game_number: record.game_number,
                    participant_id: id.clone(),
                });
            }
        }

        let sum = record.sum();
        if !sum.is_zero() {
            warnings.push(IntegrityWarning::UnbalancedHistoricalRecord {
                game_number: record.game_number,
                sum,
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rounds_shared::types::RoundId;

    fn roster() -> Vec<Participant> {
        vec![Participant::creator("A"), Participant::player("B")]
    }

    fn record(game_number: u32, amounts: &[(&str, i64)]) -> GameRecord {
        GameRecord::new(RoundId::new("r1"), game_number, amounts.iter().copied())
    }

    #[test]
    fn test_clean_history_has_no_warnings() {
        let records = vec![
            record(1, &[("A", 5), ("B", -5)]),
            record(2, &[("A", -3), ("B", 3)]),
        ];
        assert!(audit(&roster(), &records).is_empty());
        assert!(audit(&roster(), &[]).is_empty());
    }

    #[test]
    fn test_unknown_participant_flagged() {
        let records = vec![record(1, &[("A", 10), ("B", 5), ("Z", -15)])];
        assert_eq!(
            audit(&roster(), &records),
            vec![IntegrityWarning::UnknownParticipantReference {
                game_number: 1,
                participant_id: ParticipantId::new("Z"),
            }]
        );
    }

    #[test]
    fn test_gap_and_duplicate_flagged() {
        let records = vec![
            record(1, &[("A", 1), ("B", -1)]),
            record(3, &[("A", 1), ("B", -1)]),
            record(3, &[("A", 1), ("B", -1)]),
        ];
        assert_eq!(
            audit(&roster(), &records),
            vec![
                IntegrityWarning::OutOfOrderRecord {
                    previous: Some(1),
                    found: 3,
                },
                IntegrityWarning::OutOfOrderRecord {
                    previous: Some(3),
                    found: 3,
                },
            ]
        );
    }

    #[test]
    fn test_first_record_not_numbered_one() {
        let records = vec![record(2, &[("A", 1), ("B", -1)])];
        assert_eq!(
            audit(&roster(), &records),
            vec![IntegrityWarning::OutOfOrderRecord {
                previous: None,
                found: 2,
            }]
        );
    }

    #[test]
    fn test_unbalanced_history_flagged() {
        let records = vec![record(1, &[("A", 15), ("B", 10)])];
        assert_eq!(
            audit(&roster(), &records),
            vec![IntegrityWarning::UnbalancedHistoricalRecord {
                game_number: 1,
                sum: Points::new(25),
            }]
        );
    }

    #[test]
    fn test_warning_display_and_code() {
        let warning = IntegrityWarning::OutOfOrderRecord {
            previous: Some(4),
            found: 6,
        };
        assert_eq!(warning.to_string(), "game 6 follows game 4");
        assert_eq!(warning.code(), "OUT_OF_ORDER_RECORD");
    }

    #[test]
    fn test_warning_serialises_with_kind_tag() {
        let warning = IntegrityWarning::UnknownParticipantReference {
            game_number: 2,
            participant_id: ParticipantId::new("Z"),
        };
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(value["kind"], "unknown_participant_reference");
        assert_eq!(value["participant_id"], "Z");
    }
}
