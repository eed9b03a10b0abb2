//! Genre → groups lookup.
//!
//! A group appears under a genre exactly when its genre list contains that
//! genre. Built from the group table in one pass.

use data_loader::{CatalogSource, Genre, GroupHash};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreIndex {
    groups_by_genre: HashMap<Genre, HashSet<GroupHash>>,
}

impl GenreIndex {
    /// Index every group of the catalog under each of its genres
    #[instrument(skip_all)]
    pub fn build(catalog: &impl CatalogSource) -> Self {
        let mut groups_by_genre: HashMap<Genre, HashSet<GroupHash>> = HashMap::new();

        for (hash, group) in catalog.group_table() {
            for genre in &group.genres {
                groups_by_genre
                    .entry(genre.clone())
                    .or_default()
                    .insert(*hash);
            }
        }

        debug!("Indexed {} genres", groups_by_genre.len());
        Self { groups_by_genre }
    }

    /// Groups containing `genre`; `None` when no group has it
    pub fn groups(&self, genre: &str) -> Option<&HashSet<GroupHash>> {
        self.groups_by_genre.get(genre)
    }

    pub fn contains(&self, genre: &str, group: &GroupHash) -> bool {
        self.groups(genre).is_some_and(|groups| groups.contains(group))
    }

    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.groups_by_genre.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups_by_genre.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups_by_genre.is_empty()
    }
}
