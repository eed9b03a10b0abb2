//! Combine subset choices across a member's clusters.
//!
//! Each step fixes one subset for every earlier cluster (the head) and
//! varies one later cluster (the tail), handing over every tail subset of
//! a single size at once so the stream can interleave them fairly.
//!
//! For clusters `[C0, C1]` the steps are, in order:
//! 1. each subset of C0 (largest first) as head, with each size batch of C1
//!    as tail;
//! 2. each size batch of C0 alone.
//!
//! With more clusters the same rule applies recursively: all combinations
//! that include later clusters are explored before a cluster's own subsets
//! are tried on their own, which is how partial matches (not using every
//! cluster) are reached.

use crate::subsets::SubsetEnumerator;
use crate::types::Cluster;
use data_loader::Genre;
use std::iter;
use std::rc::Rc;

/// One unit of work for the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    /// One fixed subset per earlier cluster
    pub head: Vec<Vec<Genre>>,
    /// Every subset of one size from the cluster being varied
    pub tail: Vec<Vec<Genre>>,
}

impl PlanStep {
    /// Union of the head subsets in first-seen order
    pub fn head_genres(&self) -> Vec<&str> {
        let mut genres: Vec<&str> = Vec::new();
        for genre in self.head.iter().flatten() {
            if !genres.contains(&genre.as_str()) {
                genres.push(genre);
            }
        }
        genres
    }
}

type Steps = Box<dyn Iterator<Item = PlanStep>>;

/// Lazy iterator over the plan for a list of clusters.
///
/// Clusters must already be ordered by descending frequency. Nothing is
/// enumerated until a step is pulled.
pub struct CombinationPlanner {
    steps: Steps,
}

impl CombinationPlanner {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self {
            steps: plan(Rc::from(clusters), 0),
        }
    }
}

impl Iterator for CombinationPlanner {
    type Item = PlanStep;

    fn next(&mut self) -> Option<Self::Item> {
        self.steps.next()
    }
}

/// Steps for `clusters[depth..]`. Recursion depth is bounded by the number
/// of clusters.
fn plan(clusters: Rc<[Cluster]>, depth: usize) -> Steps {
    let Some(cluster) = clusters.get(depth) else {
        return Box::new(iter::empty());
    };

    let rest = Rc::clone(&clusters);
    let combined = SubsetEnumerator::new(cluster).flat_map(move |subset| {
        plan(Rc::clone(&rest), depth + 1).map(move |mut step| {
            step.head.insert(0, subset.clone());
            step
        })
    });
    let alone = SubsetEnumerator::by_size(cluster).map(|tail| PlanStep {
        head: Vec::new(),
        tail,
    });

    Box::new(combined.chain(alone))
}
