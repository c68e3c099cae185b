//! Crowd-sourced availability verifications.
//!
//! A verification is one visitor's claim that a product was (or was not)
//! actually on the shelf at a store. Votes are appended to a keyed log in
//! the realtime database and never mutated; the read path reduces the log
//! to the active window, collapses repeat voters to their latest vote, and
//! derives counts from the surviving sequence.

pub mod error;
pub mod records;
pub mod store;

pub use error::VerifyError;
pub use records::{active_records, VerificationRecord, VoteSummary};
pub use store::VerifyStore;
