//! Redundancy clusters: connected components of the match graph.

use super::similarity::MatchPair;
use crate::core::video::SegmentKey;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Segments from different videos expressing the same content. Always at
/// least two members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub members: BTreeSet<SegmentKey>,
}

impl Cluster {
    pub fn contains(&self, key: &SegmentKey) -> bool {
        self.members.contains(key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Lowest-indexed member that belongs to `video`.
    pub fn member_in_video(&self, video: usize) -> Option<SegmentKey> {
        self.members.iter().copied().find(|k| k.video == video)
    }
}

/// Union-find over an arena of segment keys (union by rank, path halving).
#[derive(Debug, Default)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn push(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        self.rank.push(0);
        id
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            let grandparent = self.parent[self.parent[x]];
            self.parent[x] = grandparent;
            x = grandparent;
        }
        x
    }

    fn union(&mut self, x: usize, y: usize) {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return;
        }
        if self.rank[rx] < self.rank[ry] {
            self.parent[rx] = ry;
        } else if self.rank[rx] > self.rank[ry] {
            self.parent[ry] = rx;
        } else {
            self.parent[ry] = rx;
            self.rank[rx] += 1;
        }
    }
}

#[derive(Debug, Default)]
pub struct ClusterBuilder {
    sets: DisjointSet,
    ids: FxHashMap<SegmentKey, usize>,
    keys: Vec<SegmentKey>,
}

impl ClusterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn id_of(&mut self, key: SegmentKey) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.sets.push();
        self.ids.insert(key, id);
        self.keys.push(key);
        id
    }

    pub fn add(&mut self, pair: &MatchPair) {
        let a = self.id_of(pair.a);
        let b = self.id_of(pair.b);
        self.sets.union(a, b);
    }

    /// Clusters in discovery order: a cluster comes before another when its
    /// first key was seen earlier in the match stream.
    pub fn build(mut self) -> Vec<Cluster> {
        let mut slot_of_root: FxHashMap<usize, usize> = FxHashMap::default();
        let mut clusters: Vec<BTreeSet<SegmentKey>> = Vec::new();

        // keys 按首次出现顺序排列
        for id in 0..self.keys.len() {
            let root = self.sets.find(id);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                clusters.push(BTreeSet::new());
                clusters.len() - 1
            });
            clusters[slot].insert(self.keys[id]);
        }

        clusters
            .into_iter()
            .filter(|members| members.len() >= 2)
            .map(|members| Cluster { members })
            .collect()
    }

    pub fn from_matches(matches: &[MatchPair]) -> Vec<Cluster> {
        let mut builder = Self::new();
        for pair in matches {
            builder.add(pair);
        }
        builder.build()
    }
}
