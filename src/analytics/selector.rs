//! Commit selection for a target date

use chrono::NaiveDate;

use crate::models::Commit;

/// Selects the commits recorded on `target_date`, oldest first.
///
/// The date is read in each commit's own recorded offset, not in UTC.
/// `history` is usually newest-first (history walk order); commits sharing
/// the same instant end up in the reverse of their input order.
pub fn select_commits(history: &[Commit], target_date: NaiveDate) -> Vec<Commit> {
    let mut selected: Vec<Commit> = history
        .iter()
        .filter(|commit| commit.local_date() == target_date)
        .cloned()
        .collect();

    selected.reverse();
    selected.sort_by_key(|commit| commit.timestamp);
    selected
}
