//! Cross-video similarity graph with a runtime-dependent threshold.

use crate::core::config::ThresholdConfig;
use crate::core::text::FeatureMatrix;
use crate::core::video::SegmentKey;
use log::debug;
use rayon::prelude::*;

/// Two segments from different videos judged similar. `a.video < b.video`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPair {
    pub a: SegmentKey,
    pub b: SegmentKey,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityGraph {
    threshold: ThresholdConfig,
}

impl SimilarityGraph {
    pub fn new(threshold: ThresholdConfig) -> Self {
        Self { threshold }
    }

    pub fn threshold_for(&self, total_runtime_secs: u64) -> f64 {
        self.threshold.threshold_for(total_runtime_secs as f64)
    }

    /// Keeps only the highest-scoring pair for every pair of videos.
    /// Ties go to the lowest `(a, b)` keys.
    pub fn best_matches(&self, matrix: &FeatureMatrix, threshold: f64) -> Vec<MatchPair> {
        let matches: Vec<MatchPair> = Self::video_pairs(matrix)
            .into_par_iter()
            .filter_map(|(rows_a, rows_b)| {
                let mut best: Option<MatchPair> = None;
                for &ra in &rows_a {
                    for &rb in &rows_b {
                        let Some(pair) = Self::score(matrix, ra, rb, threshold) else {
                            continue;
                        };
                        if best.map_or(true, |b| pair.score > b.score) {
                            best = Some(pair);
                        }
                    }
                }
                best
            })
            .collect();

        debug!(
            "🔗 {} best matches above threshold {:.4}",
            matches.len(),
            threshold
        );
        matches
    }

    fn score(matrix: &FeatureMatrix, ra: usize, rb: usize, threshold: f64) -> Option<MatchPair> {
        let similarity = matrix.vectors[ra].dot(&matrix.vectors[rb]).min(1.0);
        (similarity > threshold).then(|| MatchPair {
            a: matrix.keys[ra],
            b: matrix.keys[rb],
            score: similarity,
        })
    }

    /// Row groups of each `(video_a, video_b)` with `video_a < video_b`, sorted.
    fn video_pairs(matrix: &FeatureMatrix) -> Vec<(Vec<usize>, Vec<usize>)> {
        let groups: Vec<Vec<usize>> = matrix.rows_by_video().into_values().collect();
        let mut pairs = Vec::new();
        for i in 0..groups.len() {
            for j in (i + 1)..groups.len() {
                pairs.push((groups[i].clone(), groups[j].clone()));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::text::FeatureVector;

    fn matrix(rows: Vec<(SegmentKey, Vec<(u32, f64)>)>) -> FeatureMatrix {
        let mut m = FeatureMatrix::default();
        for (key, weights) in rows {
            let mut v = FeatureVector::from_weights(weights);
            v.normalize();
            m.keys.push(key);
            m.vectors.push(v);
        }
        m
    }

    #[test]
    fn test_same_video_pairs_ignored() {
        let m = matrix(vec![
            (SegmentKey::new(0, 0), vec![(0, 1.0)]),
            (SegmentKey::new(0, 1), vec![(0, 1.0)]),
        ]);
        let graph = SimilarityGraph::default();
        assert!(graph.best_matches(&m, 0.1).is_empty());
    }

    #[test]
    fn test_best_match_per_video_pair() {
        let m = matrix(vec![
            (SegmentKey::new(0, 0), vec![(0, 1.0), (1, 1.0)]),
            (SegmentKey::new(0, 1), vec![(2, 1.0)]),
            (SegmentKey::new(1, 0), vec![(0, 1.0)]),
            (SegmentKey::new(1, 1), vec![(2, 1.0)]),
        ]);
        let graph = SimilarityGraph::default();

        let best = graph.best_matches(&m, 0.5);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].a, SegmentKey::new(0, 1));
        assert_eq!(best[0].b, SegmentKey::new(1, 1));
        assert!((best[0].score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tie_break_lowest_keys() {
        let m = matrix(vec![
            (SegmentKey::new(0, 0), vec![(0, 1.0)]),
            (SegmentKey::new(0, 1), vec![(0, 1.0)]),
            (SegmentKey::new(1, 0), vec![(0, 1.0)]),
        ]);
        let best = SimilarityGraph::default().best_matches(&m, 0.5);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].a, SegmentKey::new(0, 0));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let m = matrix(vec![
            (SegmentKey::new(0, 0), vec![(0, 1.0)]),
            (SegmentKey::new(1, 0), vec![(0, 1.0)]),
        ]);
        let graph = SimilarityGraph::default();
        assert!(graph.best_matches(&m, 1.0).is_empty());
        assert_eq!(graph.best_matches(&m, 0.999).len(), 1);
    }

    #[test]
    fn test_one_match_per_video_pair_across_three_videos() {
        let m = matrix(vec![
            (SegmentKey::new(0, 0), vec![(0, 1.0)]),
            (SegmentKey::new(1, 0), vec![(0, 1.0)]),
            (SegmentKey::new(2, 0), vec![(0, 1.0)]),
        ]);
        let best = SimilarityGraph::default().best_matches(&m, 0.17);
        let video_pairs: Vec<(usize, usize)> = best.iter().map(|p| (p.a.video, p.b.video)).collect();
        assert_eq!(video_pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }
}
