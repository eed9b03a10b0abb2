//! Result and intermediate types shared by the engine modules.

use data_loader::{Genre, GroupHash};
use serde::{Deserialize, Serialize};

/// Genres tied at the same read count for one member, in first-seen order
pub type Cluster = Vec<Genre>;

/// A group the engine suggests, with the number of genres it matched.
///
/// `match_count` is the size of the genre set that was queried; the group
/// contains every one of those genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recommendation {
    pub group: GroupHash,
    pub match_count: usize,
}

impl Recommendation {
    pub fn new(group: GroupHash, match_count: usize) -> Self {
        Self { group, match_count }
    }

    /// Match percentage against the member's full list of top genres
    pub fn match_percent(&self, total_genres: usize) -> f32 {
        if total_genres == 0 {
            return 0.0;
        }
        self.match_count as f32 / total_genres as f32 * 100.0
    }
}
