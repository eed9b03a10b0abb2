//! # Recommender Crate
//!
//! Genre-based "what to read next" recommendations for library members.
//!
//! ## Components
//!
//! ### Engine snapshot
//! Built once from the whole catalog and replaced after every change:
//! - `GenreIndex`: genre to the groups carrying it
//! - `PopularityStats`: loans per group and per genre
//! - The group table, for resolving hashes to title and author
//!
//! ### Per-member stream
//! - `MemberProfile`: genre counts, first-seen order and groups already read
//! - Clusters: genres with equal counts, the top few kept
//! - `CombinationPlanner`: which subsets of which clusters to try, in order
//! - `RecommendationStream`: queries each step, interleaves the results by
//!   popularity and never repeats a group
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use recommender::rebuild_indices;
//!
//! let catalog = Catalog::load_from_files("database")?;
//! let snapshot = rebuild_indices(&catalog);
//!
//! let recs = snapshot.recommend("ABCD", &catalog);
//! for rec in recs.stream.take(10) {
//!     let group = snapshot.group(&rec.group).unwrap();
//!     println!("{} by {} ({} genres)", group.title, group.author, rec.match_count);
//! }
//! ```

pub mod config;
pub mod genre_index;
pub mod member_profile;
pub mod planner;
pub mod popularity;
pub mod query;
pub mod session;
pub mod snapshot;
pub mod stream;
pub mod subsets;
pub mod types;

pub use config::{EngineConfig, DEFAULT_MAX_CLUSTERS};
pub use genre_index::GenreIndex;
pub use member_profile::MemberProfile;
pub use planner::{CombinationPlanner, PlanStep};
pub use popularity::PopularityStats;
pub use session::RecommendationSession;
pub use snapshot::{rebuild_indices, EngineSnapshot, MemberRecommendations};
pub use stream::RecommendationStream;
pub use subsets::SubsetEnumerator;
pub use types::{Cluster, Recommendation};

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::GroupHash;

    #[test]
    fn test_default_config() {
        assert_eq!(EngineConfig::default().max_clusters, DEFAULT_MAX_CLUSTERS);
        assert_eq!(EngineConfig::new().with_max_clusters(2).max_clusters, 2);
    }

    #[test]
    fn test_match_percent() {
        let rec = Recommendation::new(GroupHash::of("Dune", "Herbert"), 3);
        assert_eq!(rec.match_percent(4), 75.0);
        assert_eq!(rec.match_percent(0), 0.0);
    }

    #[test]
    fn test_empty_catalog_snapshot() {
        let catalog = data_loader::Catalog::new();
        let snapshot = rebuild_indices(&catalog);
        assert!(snapshot.genre_index().is_empty());
        assert_eq!(snapshot.recommend("ABCD", &catalog).stream.count(), 0);
    }
}
