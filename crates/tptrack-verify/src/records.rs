//! Verification records and the pure read-path reductions over them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One vote: a visitor's claim about product availability at a store.
///
/// Append-only: records are never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// `true` verifies availability, `false` disputes it.
    pub available: bool,
    #[serde(rename = "userIP")]
    pub user_ip: String,
    pub timestamp: DateTime<Utc>,
}

/// The rolling window inside which a vote still counts.
fn active_window() -> Duration {
    Duration::hours(24)
}

/// Reduces a raw vote log to its active records.
///
/// Keeps votes inside `(now − 24h, now]`, orders them most-recent first,
/// and collapses repeat submitters to their latest vote. Votes stamped in
/// the future are excluded along with expired ones.
#[must_use]
pub fn active_records(
    records: Vec<VerificationRecord>,
    now: DateTime<Utc>,
) -> Vec<VerificationRecord> {
    let cutoff = now - active_window();

    let mut active: Vec<VerificationRecord> = records
        .into_iter()
        .filter(|r| r.timestamp > cutoff && r.timestamp <= now)
        .collect();
    active.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut seen = HashSet::new();
    active.retain(|r| seen.insert(r.user_ip.clone()));
    active
}

/// Vote counts derived from an active, deduped sequence.
///
/// Pure derivation; there is no stored counter that can drift from the
/// underlying log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteSummary {
    pub upvotes: usize,
    pub downvotes: usize,
    pub last_upvote_at: Option<DateTime<Utc>>,
    pub last_downvote_at: Option<DateTime<Utc>>,
}

impl VoteSummary {
    /// Summarizes a sequence already reduced by [`active_records`]
    /// (most-recent first).
    #[must_use]
    pub fn from_active(records: &[VerificationRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            if record.available {
                summary.upvotes += 1;
                if summary.last_upvote_at.is_none() {
                    summary.last_upvote_at = Some(record.timestamp);
                }
            } else {
                summary.downvotes += 1;
                if summary.last_downvote_at.is_none() {
                    summary.last_downvote_at = Some(record.timestamp);
                }
            }
        }
        summary
    }
}
