// ============================================================================
// Sorting and pagination of matched players
// ============================================================================

use std::cmp::Ordering;

use crate::core::Result;
use crate::model::Player;
use crate::query::{Page, SortKey};

/// Compares two players on a sort key.
pub struct PlayerComparator<'a> {
    key: &'a SortKey,
}

impl<'a> PlayerComparator<'a> {
    pub fn new(key: &'a SortKey) -> Self {
        Self { key }
    }

    pub fn compare(&self, left: &Player, right: &Player) -> Result<Ordering> {
        left.value_of(self.key.field)
            .compare(&right.value_of(self.key.field))
    }
}

pub struct SortExecutor;

impl SortExecutor {
    /// Sorts ascending on `key`.
    ///
    /// The sort is stable, so players that compare equal keep the order they
    /// arrived in (the store hands them over in id order).
    pub fn sort(players: &mut [Player], key: &SortKey) -> Result<()> {
        if players.len() < 2 {
            return Ok(());
        }

        let comparator = PlayerComparator::new(key);

        // Columns are single-typed: if one pair compares, every pair does.
        comparator.compare(&players[0], &players[1])?;

        players.sort_by(|left, right| {
            comparator
                .compare(left, right)
                .unwrap_or(Ordering::Equal)
        });

        Ok(())
    }

    /// Keeps the `page.limit` players starting at `page.offset`.
    pub fn paginate(players: Vec<Player>, page: &Page) -> Vec<Player> {
        players
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect()
    }
}
