//! Chronological ordering and pairing of TLE records.
//!
//! Catalog queries return element sets in arbitrary order and may repeat
//! an epoch. The sequencer sorts ascending by epoch, collapses duplicate
//! epochs, and derives (predecessor, successor) pairs for drift analysis.

use chrono::{DateTime, Utc};

use crate::time::elapsed_seconds;
use crate::types::TleRecord;

/// Time-ordered, duplicate-free records for one tracked object.
///
/// Epochs are strictly increasing. Where the input repeats an epoch, the
/// first record encountered wins; ties are not re-resolved by any other
/// field.
#[derive(Debug, Clone, Default)]
pub struct TleSequence {
    records: Vec<TleRecord>,
}

impl TleSequence {
    /// Sort records ascending by epoch and collapse duplicate epochs.
    ///
    /// Zero or one record is a valid sequence; it simply yields no pairs.
    pub fn from_records(records: impl IntoIterator<Item = TleRecord>) -> Self {
        let mut records: Vec<TleRecord> = records.into_iter().collect();
        // Stable sort: input order breaks epoch ties, dedup keeps the winner.
        records.sort_by_key(|r| r.epoch);
        records.dedup_by_key(|r| r.epoch);
        TleSequence { records }
    }

    pub fn records(&self) -> &[TleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last epoch, or `None` for an empty sequence.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.records.first()?.epoch, self.records.last()?.epoch))
    }

    /// Consecutive (predecessor, successor) pairs in chronological order.
    ///
    /// The first record has no predecessor and produces no pair, never a
    /// fabricated pair against itself.
    pub fn pairs(&self) -> impl Iterator<Item = TlePair<'_>> + '_ {
        self.records.windows(2).map(|w| TlePair {
            predecessor: &w[0],
            successor: &w[1],
            elapsed_seconds: elapsed_seconds(w[0].epoch, w[1].epoch),
        })
    }
}

/// A record and its immediate predecessor.
#[derive(Debug, Clone, Copy)]
pub struct TlePair<'a> {
    pub predecessor: &'a TleRecord,
    pub successor: &'a TleRecord,
    /// successor.epoch − predecessor.epoch. Positive by construction.
    pub elapsed_seconds: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
