//! Core settlement logic for Rounds.
//!
//! This crate contains pure logic with ZERO network or storage dependencies.
//! The data layer hands it rosters and ordered game records; it hands back
//! balances, turnover figures, summaries and integrity findings.
//!
//! # Modules
//!
//! - `ledger` - Running totals, zero-sum validation, turnover, audits
//! - `round` - Round lifecycle and roster rules
//! - `stats` - Per-user statistics across rounds

pub mod ledger;
pub mod round;
pub mod stats;
