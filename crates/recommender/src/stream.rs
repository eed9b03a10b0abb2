//! The lazy recommendation stream.
//!
//! For every plan step the stream runs one compatible-groups query per tail
//! subset (query genres = head union that subset), then interleaves the
//! ranked lists round by round. Inside one round the candidates are ordered
//! by read count, most read first, with ties keeping list order. Groups
//! already yielded or already read by the member are dropped, so each group
//! appears at most once.

use crate::planner::{CombinationPlanner, PlanStep};
use crate::popularity::PopularityStats;
use crate::snapshot::EngineSnapshot;
use crate::types::{Cluster, Recommendation};
use data_loader::GroupHash;
use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};
use std::vec;
use tracing::trace;

// ============================================================================
// Round-robin over one step's ranked lists
// ============================================================================

struct Lane {
    match_count: usize,
    groups: vec::IntoIter<GroupHash>,
}

struct RoundRobin {
    /// `None` once a lane has run dry
    lanes: Vec<Option<Lane>>,
    round: VecDeque<Recommendation>,
}

impl RoundRobin {
    fn new(lanes: Vec<Lane>) -> Self {
        Self {
            lanes: lanes.into_iter().map(Some).collect(),
            round: VecDeque::new(),
        }
    }

    fn next(&mut self, popularity: &PopularityStats) -> Option<Recommendation> {
        if self.round.is_empty() {
            self.fill_round(popularity);
        }
        self.round.pop_front()
    }

    /// Take one group from every live lane
    fn fill_round(&mut self, popularity: &PopularityStats) {
        let mut round = Vec::with_capacity(self.lanes.len());
        for slot in &mut self.lanes {
            let Some(lane) = slot else { continue };
            match lane.groups.next() {
                Some(group) => round.push(Recommendation::new(group, lane.match_count)),
                None => *slot = None,
            }
        }
        round.sort_by_key(|rec: &Recommendation| Reverse(popularity.read_count(&rec.group)));
        self.round = round.into();
    }
}

// ============================================================================
// Stream
// ============================================================================

/// Ranked, deduplicated recommendations for one member.
///
/// Borrows the snapshot it was created from. Pull only as many items as
/// needed; the plan is expanded one step at a time.
pub struct RecommendationStream<'a> {
    snapshot: &'a EngineSnapshot,
    planner: CombinationPlanner,
    already_read: HashSet<GroupHash>,
    seen: HashSet<GroupHash>,
    current: Option<RoundRobin>,
}

impl<'a> RecommendationStream<'a> {
    pub fn new(
        snapshot: &'a EngineSnapshot,
        clusters: Vec<Cluster>,
        already_read: HashSet<GroupHash>,
    ) -> Self {
        Self {
            snapshot,
            planner: CombinationPlanner::new(clusters),
            already_read,
            seen: HashSet::new(),
            current: None,
        }
    }

    /// Query every tail subset of the step against the snapshot
    fn interleave(&self, step: &PlanStep) -> RoundRobin {
        let head = step.head_genres();
        let lanes = step
            .tail
            .iter()
            .map(|subset| {
                let mut query = head.clone();
                for genre in subset {
                    if !query.contains(&genre.as_str()) {
                        query.push(genre);
                    }
                }
                let groups = self.snapshot.compatible_groups(&query);
                trace!(?query, found = groups.len(), "Compatible groups");
                Lane {
                    match_count: query.len(),
                    groups: groups.into_iter(),
                }
            })
            .collect();
        RoundRobin::new(lanes)
    }
}

impl Iterator for RecommendationStream<'_> {
    type Item = Recommendation;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(round_robin) = self.current.as_mut() {
                while let Some(rec) = round_robin.next(&self.snapshot.popularity) {
                    if self.seen.insert(rec.group) && !self.already_read.contains(&rec.group) {
                        return Some(rec);
                    }
                }
            }
            let step = self.planner.next()?;
            self.current = Some(self.interleave(&step));
        }
    }
}
