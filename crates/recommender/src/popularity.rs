//! Global read counts per group and per genre.
//!
//! Every loan event counts once: a group borrowed three times has a read
//! count of three. Each genre of the borrowed copy is counted once per loan.

use data_loader::{CatalogSource, Genre, GroupHash};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularityStats {
    group_reads: HashMap<GroupHash, u32>,
    genre_reads: HashMap<Genre, u32>,
}

impl PopularityStats {
    /// Count reads over the whole loan history.
    ///
    /// Loans are folded in parallel and the partial counts summed, so the
    /// result does not depend on loan order. Loans for copies the catalog
    /// does not know are skipped.
    #[instrument(skip_all)]
    pub fn build(catalog: &impl CatalogSource) -> Self {
        let loans = catalog.loan_history();

        let stats = loans
            .par_iter()
            .fold(Self::default, |mut local, loan| {
                let (Some(group), Some(genres)) =
                    (catalog.group_of(loan.book_id), catalog.genres_of(loan.book_id))
                else {
                    warn!(book_id = loan.book_id, "Loan references unknown book, skipping");
                    return local;
                };
                *local.group_reads.entry(group).or_insert(0) += 1;
                for genre in genres {
                    *local.genre_reads.entry(genre.clone()).or_insert(0) += 1;
                }
                local
            })
            .reduce(Self::default, Self::merge);

        debug!(
            "Counted {} loans over {} groups and {} genres",
            loans.len(),
            stats.group_reads.len(),
            stats.genre_reads.len()
        );
        stats
    }

    fn merge(mut self, other: Self) -> Self {
        for (group, count) in other.group_reads {
            *self.group_reads.entry(group).or_insert(0) += count;
        }
        for (genre, count) in other.genre_reads {
            *self.genre_reads.entry(genre).or_insert(0) += count;
        }
        self
    }

    /// Number of loans of any copy of the group (0 if never borrowed)
    pub fn read_count(&self, group: &GroupHash) -> u32 {
        self.group_reads.get(group).copied().unwrap_or(0)
    }

    /// Number of loans of copies carrying the genre (0 if never borrowed)
    pub fn genre_count(&self, genre: &str) -> u32 {
        self.genre_reads.get(genre).copied().unwrap_or(0)
    }

    /// The `n` most-read groups, ties broken by hash for a stable listing
    pub fn most_read_groups(&self, n: usize) -> Vec<(GroupHash, u32)> {
        let mut groups: Vec<(GroupHash, u32)> =
            self.group_reads.iter().map(|(g, c)| (*g, *c)).collect();
        groups.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        groups.truncate(n);
        groups
    }

    /// The `n` most-read genres, ties broken alphabetically
    pub fn most_read_genres(&self, n: usize) -> Vec<(&str, u32)> {
        let mut genres: Vec<(&str, u32)> = self
            .genre_reads
            .iter()
            .map(|(g, c)| (g.as_str(), *c))
            .collect();
        genres.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        genres.truncate(n);
        genres
    }

    pub fn total_reads(&self) -> u32 {
        self.group_reads.values().sum()
    }
}
