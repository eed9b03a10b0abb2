//! Decreasing-size subsets of a genre cluster.
//!
//! For a cluster of n genres the sequence is the whole cluster, then every
//! (n-1)-subset, and so on down to the singletons. Subsets of one size come
//! in lexicographic order of their positions in the cluster, so
//! `[a, b, c]` gives `[a, b, c]`, `[a, b]`, `[a, c]`, `[b, c]`, `[a]`,
//! `[b]`, `[c]`.

use data_loader::Genre;

/// Iterator over the subsets of one cluster.
///
/// Pure function of the cluster's genre order. Building a new enumerator
/// over the same cluster replays the same sequence.
#[derive(Debug, Clone)]
pub struct SubsetEnumerator {
    cluster: Vec<Genre>,
    /// Positions of the next subset to yield
    positions: Vec<usize>,
    /// Smallest subset size to produce
    floor: usize,
    done: bool,
}

impl SubsetEnumerator {
    /// All subsets from the full cluster down to singletons
    pub fn new(cluster: &[Genre]) -> Self {
        Self::sizes(cluster, cluster.len(), 1)
    }

    /// Only the subsets of exactly `size` genres
    pub fn exact(cluster: &[Genre], size: usize) -> Self {
        Self::sizes(cluster, size, size)
    }

    fn sizes(cluster: &[Genre], from: usize, floor: usize) -> Self {
        Self {
            cluster: cluster.to_vec(),
            positions: (0..from).collect(),
            floor,
            done: from == 0 || from > cluster.len(),
        }
    }

    /// The same sequence as `new`, one batch per subset size
    pub fn by_size(cluster: &[Genre]) -> impl Iterator<Item = Vec<Vec<Genre>>> + use<> {
        let cluster = cluster.to_vec();
        (1..=cluster.len())
            .rev()
            .map(move |size| Self::exact(&cluster, size).collect())
    }

    /// Move `positions` to the next combination, dropping to the next
    /// smaller size once the current one is exhausted.
    fn advance(&mut self) {
        let n = self.cluster.len();
        let k = self.positions.len();

        if let Some(i) = (0..k).rev().find(|&i| self.positions[i] < n - k + i) {
            self.positions[i] += 1;
            for j in i + 1..k {
                self.positions[j] = self.positions[j - 1] + 1;
            }
        } else if k > self.floor {
            self.positions = (0..k - 1).collect();
        } else {
            self.done = true;
        }
    }
}

impl Iterator for SubsetEnumerator {
    type Item = Vec<Genre>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let subset = self
            .positions
            .iter()
            .map(|&i| self.cluster[i].clone())
            .collect();
        self.advance();
        Some(subset)
    }
}
