//! Round roster: who plays, who created the round, who holds the table.

use std::collections::HashSet;
use std::ops::Deref;

use rounds_shared::types::{ParticipantId, UserId};
use serde::{Deserialize, Serialize};

use super::error::RoundError;
use crate::ledger::{GameRecord, Participant, ParticipantRole};

/// Ordered list of roster entries.
///
/// Dereferences to `[Participant]`, so it can be handed straight to the
/// ledger functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(Vec<Participant>);

impl Roster {
    /// Creates a roster from entries, without validating them.
    #[must_use]
    pub fn new(participants: Vec<Participant>) -> Self {
        Self(participants)
    }

    /// Creates a roster holding only the creator.
    #[must_use]
    pub fn with_creator(creator: &UserId) -> Self {
        Self(vec![Participant::creator(creator.clone())])
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.0.iter().find(|p| &p.id == id)
    }

    /// Returns true if the id is on the roster.
    #[must_use]
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.get(id).is_some()
    }

    /// Returns true if the user holds a human seat.
    #[must_use]
    pub fn has_user(&self, user: &UserId) -> bool {
        self.0.iter().any(|p| p.is_user(user))
    }

    /// The creator's entry.
    #[must_use]
    pub fn creator(&self) -> Option<&Participant> {
        self.0.iter().find(|p| p.role == ParticipantRole::Creator)
    }

    /// Returns true if the user created the round.
    #[must_use]
    pub fn is_creator(&self, user: &UserId) -> bool {
        self.creator().is_some_and(|p| p.id == *user)
    }

    /// The table board entry, if the round has one.
    #[must_use]
    pub fn table_board(&self) -> Option<&Participant> {
        self.0.iter().find(|p| p.role == ParticipantRole::TableBoard)
    }

    /// Number of human seats taken.
    #[must_use]
    pub fn human_count(&self) -> usize {
        self.0.iter().filter(|p| p.role.is_human()).count()
    }

    /// Checks the roster's structural rules: unique ids, exactly one
    /// creator, at most one table board.
    ///
    /// # Errors
    ///
    /// Returns the first rule the roster breaks.
    pub fn validate(&self) -> Result<(), RoundError> {
        let mut seen = HashSet::with_capacity(self.0.len());
        for participant in &self.0 {
            if !seen.insert(&participant.id) {
                return Err(RoundError::DuplicateParticipant(participant.id.clone()));
            }
        }

        let creators = self
            .0
            .iter()
            .filter(|p| p.role == ParticipantRole::Creator)
            .count();
        if creators != 1 {
            return Err(RoundError::CreatorCount(creators));
        }

        let table_boards = self
            .0
            .iter()
            .filter(|p| p.role == ParticipantRole::TableBoard)
            .count();
        if table_boards > 1 {
            return Err(RoundError::TableBoardAlreadyAssigned);
        }

        Ok(())
    }

    /// Adds a player, enforcing uniqueness and capacity.
    ///
    /// `max_players` counts human seats only; the table board never takes
    /// one.
    ///
    /// # Errors
    ///
    /// `AlreadyJoined` or `RoundFull`.
    pub fn join(&mut self, participant: Participant, max_players: Option<u32>) -> Result<(), RoundError> {
        if self.contains(&participant.id) {
            return Err(RoundError::AlreadyJoined(UserId::new(
                participant.id.into_inner(),
            )));
        }
        if let Some(max) = max_players {
            let taken = u32::try_from(self.human_count()).unwrap_or(u32::MAX);
            if participant.role.is_human() && taken >= max {
                return Err(RoundError::RoundFull(max));
            }
        }
        self.0.push(participant);
        Ok(())
    }

    /// Removes a player who is not referenced by any record.
    ///
    /// # Errors
    ///
    /// `NotParticipant`, `CreatorCannotLeave` or `ParticipantHasRecords`.
    pub fn leave(&mut self, user: &UserId, records: &[GameRecord]) -> Result<Participant, RoundError> {
        let index = self
            .0
            .iter()
            .position(|p| p.is_user(user))
            .ok_or_else(|| RoundError::NotParticipant(user.clone()))?;

        let participant = &self.0[index];
        if participant.role == ParticipantRole::Creator {
            return Err(RoundError::CreatorCannotLeave);
        }
        if records.iter().any(|r| r.references(&participant.id)) {
            return Err(RoundError::ParticipantHasRecords(participant.id.clone()));
        }

        Ok(self.0.remove(index))
    }

    /// Designates the table board.
    ///
    /// A player already on the roster is converted; an unknown id is added
    /// as a new table-board entry. The creator cannot hold the table.
    ///
    /// # Errors
    ///
    /// `TableBoardAlreadyAssigned` or `InvalidTableBoard`.
    pub fn assign_table_board(&mut self, id: ParticipantId) -> Result<(), RoundError> {
        if self.table_board().is_some() {
            return Err(RoundError::TableBoardAlreadyAssigned);
        }

        match self.0.iter_mut().find(|p| p.id == id) {
            Some(existing) if existing.role == ParticipantRole::Creator => {
                Err(RoundError::InvalidTableBoard(id))
            }
            Some(existing) => {
                existing.role = ParticipantRole::TableBoard;
                Ok(())
            }
            None => {
                self.0.push(Participant::table_board(id));
                Ok(())
            }
        }
    }
}

impl Deref for Roster {
    type Target = [Participant];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Participant>> for Roster {
    fn from(participants: Vec<Participant>) -> Self {
        Self(participants)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
