//! Build a member's genre profile from the loan history.
//!
//! The profile gathers everything the stream needs about one member up
//! front:
//! - How many times they borrowed a copy carrying each genre
//! - The order genres were first met, walking the history newest first
//! - Every group they have already borrowed (returned or not)

use crate::types::Cluster;
use data_loader::{CatalogSource, Genre, GroupHash};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::cmp::Reverse;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberProfile {
    pub member: String,
    /// Loans of copies carrying each genre
    pub genre_counts: HashMap<Genre, u32>,
    /// Genres in the order they were first seen, most recent loan first
    pub genre_order: Vec<Genre>,
    /// Groups the member has borrowed at least once
    pub already_read: HashSet<GroupHash>,
}

impl MemberProfile {
    /// Aggregate one member's loans.
    ///
    /// A member with no history gets an empty profile. Loans of copies the
    /// catalog cannot resolve are skipped.
    #[instrument(skip(catalog))]
    pub fn build(member: &str, catalog: &impl CatalogSource) -> Self {
        let mut profile = Self {
            member: member.to_string(),
            ..Self::default()
        };

        for loan in catalog
            .loan_history()
            .iter()
            .rev()
            .filter(|loan| loan.member == member)
        {
            let (Some(group), Some(genres)) =
                (catalog.group_of(loan.book_id), catalog.genres_of(loan.book_id))
            else {
                warn!(book_id = loan.book_id, "Loan references unknown book, skipping");
                continue;
            };

            profile.already_read.insert(group);
            for genre in genres {
                let count = profile.genre_counts.entry(genre.clone()).or_insert(0);
                if *count == 0 {
                    profile.genre_order.push(genre.clone());
                }
                *count += 1;
            }
        }

        debug!(
            "Member {} read {} groups across {} genres",
            member,
            profile.already_read.len(),
            profile.genre_counts.len()
        );
        profile
    }

    pub fn is_empty(&self) -> bool {
        self.genre_counts.is_empty()
    }

    pub fn count(&self, genre: &str) -> u32 {
        self.genre_counts.get(genre).copied().unwrap_or(0)
    }

    /// Genre counts in first-seen order
    pub fn counts_in_order(&self) -> Vec<(&str, u32)> {
        self.genre_order
            .iter()
            .map(|genre| (genre.as_str(), self.count(genre)))
            .collect()
    }

    /// Group genres by count and keep the `max` highest counts.
    ///
    /// Clusters come out highest count first; inside a cluster genres keep
    /// their first-seen order.
    pub fn top_clusters(&self, max: usize) -> Vec<Cluster> {
        let mut by_count: BTreeMap<Reverse<u32>, Cluster> = BTreeMap::new();
        for genre in &self.genre_order {
            by_count
                .entry(Reverse(self.count(genre)))
                .or_default()
                .push(genre.clone());
        }
        by_count.into_values().take(max).collect()
    }

    /// The genres of `top_clusters(max)`, flattened
    pub fn top_genres(&self, max: usize) -> Vec<Genre> {
        self.top_clusters(max).into_iter().flatten().collect()
    }
}
