//! The round aggregate: status, roster and record history.

use rounds_shared::types::{ParticipantId, RecordId, RoundId, UserId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::RoundError;
use super::roster::Roster;
use super::types::{Actor, RoundStatus};
use crate::ledger::{
    GameRecord, Participant, ParticipantBalance, check_zero_sum, compute_running_totals,
    table_board_turnover, table_board_turnover_for,
};

/// A session of consecutive games among a fixed roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// Round identifier.
    pub id: RoundId,
    /// Human-readable name.
    #[serde(default, alias = "roundName")]
    pub name: String,
    /// Lifecycle status.
    pub status: RoundStatus,
    /// Seat limit for human players, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    /// Roster entries, in join order.
    #[serde(default, alias = "participants")]
    pub roster: Roster,
    /// Game records, in game order.
    #[serde(default)]
    pub records: Vec<GameRecord>,
}

impl Round {
    /// Creates a waiting round holding only its creator.
    #[must_use]
    pub fn new(id: RoundId, name: impl Into<String>, creator: &UserId) -> Self {
        Self {
            id,
            name: name.into(),
            status: RoundStatus::Waiting,
            max_participants: None,
            roster: Roster::with_creator(creator),
            records: Vec::new(),
        }
    }

    /// Sets the human seat limit.
    #[must_use]
    pub fn with_max_participants(mut self, max: u32) -> Self {
        self.max_participants = Some(max);
        self
    }

    /// Returns true if the user created this round.
    #[must_use]
    pub fn is_creator(&self, user: &UserId) -> bool {
        self.roster.is_creator(user)
    }

    /// Returns true if the user holds a seat in this round.
    #[must_use]
    pub fn is_participant(&self, user: &UserId) -> bool {
        self.roster.has_user(user)
    }

    /// Adds a player while the round is waiting.
    ///
    /// # Errors
    ///
    /// `RosterClosed`, `AlreadyJoined` or `RoundFull`.
    pub fn join(&mut self, user: &UserId) -> Result<(), RoundError> {
        if !self.status.accepts_participants() {
            return Err(RoundError::RosterClosed(self.status));
        }
        self.roster
            .join(Participant::player(user.clone()), self.max_participants)?;
        debug!(round_id = %self.id, user_id = %user, "Player joined round");
        Ok(())
    }

    /// Removes a player while the round is waiting.
    ///
    /// # Errors
    ///
    /// `RosterClosed`, plus the roster's own leave errors.
    pub fn leave(&mut self, user: &UserId) -> Result<(), RoundError> {
        if !self.status.accepts_participants() {
            return Err(RoundError::RosterClosed(self.status));
        }
        self.roster.leave(user, &self.records)?;
        debug!(round_id = %self.id, user_id = %user, "Player left round");
        Ok(())
    }

    /// Starts play. Only the creator may start, optionally naming the
    /// table board.
    ///
    /// # Errors
    ///
    /// `NotCreator`, `InvalidTransition`, or a table-board error.
    pub fn start(&mut self, actor: &Actor, table_board: Option<ParticipantId>) -> Result<(), RoundError> {
        if !self.is_creator(&actor.user_id) {
            return Err(RoundError::NotCreator);
        }
        self.transition(RoundStatus::InProgress)?;
        if let Some(id) = table_board
            && let Err(err) = self.roster.assign_table_board(id)
        {
            self.status = RoundStatus::Waiting;
            return Err(err);
        }
        debug!(round_id = %self.id, "Round started");
        Ok(())
    }

    /// Pauses play, reopening the roster. Creator only.
    ///
    /// # Errors
    ///
    /// `NotCreator` or `InvalidTransition` unless the round is in progress.
    pub fn pause(&mut self, actor: &Actor) -> Result<(), RoundError> {
        if !self.is_creator(&actor.user_id) {
            return Err(RoundError::NotCreator);
        }
        self.transition(RoundStatus::Waiting)?;
        debug!(round_id = %self.id, "Round paused");
        Ok(())
    }

    /// Resumes a paused round. Creator only; the table board is left as is.
    ///
    /// # Errors
    ///
    /// `NotCreator` or `InvalidTransition` unless the round is waiting.
    pub fn resume(&mut self, actor: &Actor) -> Result<(), RoundError> {
        if !self.is_creator(&actor.user_id) {
            return Err(RoundError::NotCreator);
        }
        self.transition(RoundStatus::InProgress)?;
        debug!(round_id = %self.id, "Round resumed");
        Ok(())
    }

    /// Ends a round in progress. The creator, any seated player or an admin
    /// may end it.
    ///
    /// # Errors
    ///
    /// `NotAuthorized`, or `InvalidTransition` unless the round is in
    /// progress.
    pub fn end(&mut self, actor: &Actor) -> Result<(), RoundError> {
        if !actor.is_admin && !self.is_participant(&actor.user_id) {
            return Err(RoundError::NotAuthorized(actor.user_id.clone()));
        }
        self.transition(RoundStatus::Completed)?;
        debug!(round_id = %self.id, "Round ended");
        Ok(())
    }

    /// Appends a game record.
    ///
    /// # Errors
    ///
    /// `RecordsClosed` outside play, or the zero-sum failure.
    pub fn append_record(&mut self, record: GameRecord) -> Result<(), RoundError> {
        if !self.status.accepts_records() {
            return Err(RoundError::RecordsClosed(self.status));
        }
        check_zero_sum(&record)?;
        self.records.push(record);
        Ok(())
    }

    /// Deletes a game record. Creator or admin only.
    ///
    /// # Errors
    ///
    /// `NotAuthorized` or `RecordNotFound`.
    pub fn remove_record(&mut self, record_id: &RecordId, actor: &Actor) -> Result<GameRecord, RoundError> {
        if !actor.is_admin && !self.is_creator(&actor.user_id) {
            return Err(RoundError::NotAuthorized(actor.user_id.clone()));
        }
        let index = self
            .records
            .iter()
            .position(|r| &r.id == record_id)
            .ok_or_else(|| RoundError::RecordNotFound(record_id.clone()))?;
        debug!(round_id = %self.id, record_id = %record_id, "Game record removed");
        Ok(self.records.remove(index))
    }

    /// The number the next appended game should carry.
    #[must_use]
    pub fn next_game_number(&self) -> u32 {
        self.records
            .iter()
            .map(|r| r.game_number)
            .max()
            .map_or(1, |n| n.saturating_add(1))
    }

    /// Running totals for every roster entry.
    #[must_use]
    pub fn running_totals(&self) -> Vec<ParticipantBalance> {
        compute_running_totals(&self.roster, &self.records)
    }

    /// Table-board turnover, keyed by the roster's table board when it has
    /// one.
    #[must_use]
    pub fn table_board_turnover(&self) -> u64 {
        match self.roster.table_board() {
            Some(table_board) => table_board_turnover_for(&self.records, &table_board.id),
            None => table_board_turnover(&self.records),
        }
    }

    fn transition(&mut self, next: RoundStatus) -> Result<(), RoundError> {
        if !self.status.can_transition_to(next) {
            return Err(RoundError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
