//! Append-only verification history of a single stamp.

use crate::error::LedgerError;
use attest_types::{Timestamp, WindowPolicy, SECS_PER_DAY};

/// One verification in a stamp's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub at: Timestamp,
    /// Verify threshold (days) in force when the entry was appended.
    pub verify_window_days: u32,
}

/// Strictly increasing list of history entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub(crate) fn starting_at(entry: HistoryEntry) -> Self {
        Self {
            entries: vec![entry],
        }
    }

    pub(crate) fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Append, refusing anything not strictly after the latest entry.
    pub(crate) fn append(&mut self, entry: HistoryEntry) -> Result<(), LedgerError> {
        if let Some(latest) = self.latest() {
            if entry.at <= latest.at {
                return Err(LedgerError::OutOfOrder {
                    latest: latest.at,
                    attempted: entry.at,
                });
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    pub(crate) fn timestamps(&self) -> Vec<Timestamp> {
        self.entries.iter().map(|e| e.at).collect()
    }

    /// The prefix of timestamps `<= query`, provided the latest entry in that
    /// prefix is still inside its validity window at `query`.
    ///
    /// Returns `None` when nothing precedes `query` or the window has lapsed.
    pub(crate) fn valid_prefix_at(
        &self,
        query: Timestamp,
        current_window_days: u32,
        policy: WindowPolicy,
    ) -> Option<Vec<Timestamp>> {
        let count = self.entries.partition_point(|e| e.at <= query);
        let latest = self.entries[..count].last()?;

        let window_days = match policy {
            WindowPolicy::QueryTime => current_window_days,
            WindowPolicy::VerificationTime => latest.verify_window_days,
        };
        let window_secs = u64::from(window_days).saturating_mul(SECS_PER_DAY);
        if latest.at.elapsed_since(query) > window_secs {
            return None;
        }
        Some(self.entries[..count].iter().map(|e| e.at).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = SECS_PER_DAY;

    fn entry(at: u64, days: u32) -> HistoryEntry {
        HistoryEntry {
            at: Timestamp::new(at),
            verify_window_days: days,
        }
    }

    fn two_entries() -> History {
        let mut history = History::starting_at(entry(1_000, 60));
        history.append(entry(1_000 + 40 * DAY, 30)).unwrap();
        history
    }

    #[test]
    fn append_rejects_duplicates_and_regressions() {
        let mut history = History::starting_at(entry(100, 60));
        assert_eq!(
            history.append(entry(100, 60)),
            Err(LedgerError::OutOfOrder {
                latest: Timestamp::new(100),
                attempted: Timestamp::new(100),
            })
        );
        assert!(history.append(entry(99, 60)).is_err());
        assert!(history.append(entry(101, 60)).is_ok());
        assert_eq!(history.timestamps().len(), 2);
    }

    #[test]
    fn before_first_entry_is_none() {
        let history = two_entries();
        assert_eq!(
            history.valid_prefix_at(Timestamp::new(999), 60, WindowPolicy::QueryTime),
            None
        );
    }

    #[test]
    fn prefix_truncates_to_query() {
        let history = two_entries();
        let q = Timestamp::new(1_000 + 10 * DAY);
        assert_eq!(
            history.valid_prefix_at(q, 60, WindowPolicy::QueryTime),
            Some(vec![Timestamp::new(1_000)])
        );
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let history = History::starting_at(entry(1_000, 60));
        let last_valid = Timestamp::new(1_000 + 60 * DAY);
        let first_invalid = Timestamp::new(1_000 + 60 * DAY + 1);
        assert!(history
            .valid_prefix_at(last_valid, 60, WindowPolicy::QueryTime)
            .is_some());
        assert!(history
            .valid_prefix_at(first_invalid, 60, WindowPolicy::QueryTime)
            .is_none());
    }

    #[test]
    fn verification_time_policy_uses_recorded_window() {
        let history = two_entries();
        // 35 days after the second entry: outside its recorded 30-day window,
        // inside the 60-day current window.
        let q = Timestamp::new(1_000 + 75 * DAY);
        assert!(history
            .valid_prefix_at(q, 60, WindowPolicy::VerificationTime)
            .is_none());
        assert_eq!(
            history.valid_prefix_at(q, 60, WindowPolicy::QueryTime),
            Some(history.timestamps())
        );
    }
}
