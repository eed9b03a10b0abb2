//! Per-session memo of the member currently being browsed.
//!
//! Asking again for the same member returns the recommendations already
//! pulled and only advances the stream for the extra ones. Switching member
//! discards the memo and starts a fresh stream.

use crate::snapshot::EngineSnapshot;
use crate::stream::RecommendationStream;
use crate::types::Recommendation;
use data_loader::{CatalogSource, Genre};
use std::collections::HashMap;
use tracing::debug;

struct ActiveMember<'a> {
    member: String,
    genre_counts: HashMap<Genre, u32>,
    top_genres: Vec<Genre>,
    stream: RecommendationStream<'a>,
    pulled: Vec<Recommendation>,
    exhausted: bool,
}

pub struct RecommendationSession<'a> {
    snapshot: &'a EngineSnapshot,
    active: Option<ActiveMember<'a>>,
}

impl<'a> RecommendationSession<'a> {
    pub fn new(snapshot: &'a EngineSnapshot) -> Self {
        Self {
            snapshot,
            active: None,
        }
    }

    /// The first `limit` recommendations for `member`, or fewer if the
    /// stream runs out.
    pub fn take(
        &mut self,
        member: &str,
        catalog: &impl CatalogSource,
        limit: usize,
    ) -> &[Recommendation] {
        if !self.is_active(member) {
            debug!(member, "Starting a new recommendation stream");
            let recs = self.snapshot.recommend(member, catalog);
            self.active = Some(ActiveMember {
                member: member.to_string(),
                genre_counts: recs.genre_counts,
                top_genres: recs.top_genres,
                stream: recs.stream,
                pulled: Vec::new(),
                exhausted: false,
            });
        }
        let Some(active) = self.active.as_mut() else {
            return &[];
        };

        while active.pulled.len() < limit && !active.exhausted {
            match active.stream.next() {
                Some(rec) => active.pulled.push(rec),
                None => active.exhausted = true,
            }
        }
        &active.pulled[..limit.min(active.pulled.len())]
    }

    pub fn is_active(&self, member: &str) -> bool {
        self.active.as_ref().is_some_and(|a| a.member == member)
    }

    pub fn member(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.member.as_str())
    }

    pub fn genre_counts(&self) -> Option<&HashMap<Genre, u32>> {
        self.active.as_ref().map(|a| &a.genre_counts)
    }

    pub fn top_genres(&self) -> Option<&[Genre]> {
        self.active.as_ref().map(|a| a.top_genres.as_slice())
    }

    /// Whether the stream for the active member has nothing more to give
    pub fn is_exhausted(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.exhausted)
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}
