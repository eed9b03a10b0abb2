//! The immutable engine state and the per-member entry point.
//!
//! `EngineSnapshot` bundles everything derived from the whole catalog. It is
//! never updated in place: after any change to the catalog or loan log,
//! build a new one with `rebuild_indices`. Streams borrow the snapshot, so
//! a snapshot cannot be replaced while one of its streams is still alive.

use crate::config::EngineConfig;
use crate::genre_index::GenreIndex;
use crate::member_profile::MemberProfile;
use crate::popularity::PopularityStats;
use crate::stream::RecommendationStream;
use data_loader::{CatalogSource, Genre, Group, GroupHash};
use std::collections::HashMap;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub(crate) genre_index: GenreIndex,
    pub(crate) popularity: PopularityStats,
    pub(crate) groups: HashMap<GroupHash, Group>,
    pub(crate) config: EngineConfig,
}

/// Everything the calling layer needs to present recommendations for one
/// member.
pub struct MemberRecommendations<'a> {
    /// Loans per genre for this member
    pub genre_counts: HashMap<Genre, u32>,
    /// Genres of the top clusters, highest count first
    pub top_genres: Vec<Genre>,
    /// Lazy ranked recommendations; pull as many as needed
    pub stream: RecommendationStream<'a>,
}

/// Recompute every derived index from the catalog with default settings
pub fn rebuild_indices(catalog: &impl CatalogSource) -> EngineSnapshot {
    EngineSnapshot::build(catalog, EngineConfig::default())
}

impl EngineSnapshot {
    /// Full recomputation of the genre index, popularity counts and group
    /// table.
    #[instrument(skip(catalog))]
    pub fn build(catalog: &impl CatalogSource, config: EngineConfig) -> Self {
        let (genre_index, popularity) = rayon::join(
            || GenreIndex::build(catalog),
            || PopularityStats::build(catalog),
        );
        let groups = catalog.group_table().clone();

        info!(
            groups = groups.len(),
            genres = genre_index.len(),
            reads = popularity.total_reads(),
            "Engine indices rebuilt"
        );
        Self {
            genre_index,
            popularity,
            groups,
            config,
        }
    }

    pub fn genre_index(&self) -> &GenreIndex {
        &self.genre_index
    }

    pub fn popularity(&self) -> &PopularityStats {
        &self.popularity
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a hash back to its display fields
    pub fn group(&self, hash: &GroupHash) -> Option<&Group> {
        self.groups.get(hash)
    }

    pub fn read_count(&self, hash: &GroupHash) -> u32 {
        self.popularity.read_count(hash)
    }

    /// Start recommending for a member.
    ///
    /// The profile is computed fresh from the catalog's loan history. An
    /// unknown member or one with no loans gets empty counts and an empty
    /// stream.
    #[instrument(skip(self, catalog))]
    pub fn recommend(&self, member: &str, catalog: &impl CatalogSource) -> MemberRecommendations<'_> {
        let profile = MemberProfile::build(member, catalog);
        let clusters = profile.top_clusters(self.config.max_clusters);
        let top_genres: Vec<Genre> = clusters.iter().flatten().cloned().collect();

        MemberRecommendations {
            genre_counts: profile.genre_counts,
            top_genres,
            stream: RecommendationStream::new(self, clusters, profile.already_read),
        }
    }
}
