//! Round lifecycle and roster rules.
//!
//! A round moves `waiting → in_progress → completed`. Players join and
//! leave only while it waits; records are appended only while it is in
//! progress. Balances are never cached on the round, so removing a record
//! needs no follow-up bookkeeping.

pub mod error;
pub mod roster;
pub mod state;
pub mod types;

pub use error::RoundError;
pub use roster::Roster;
pub use state::Round;
pub use types::{Actor, RoundStatus};
