//! Visual vocabulary fitted with seeded k-means++ and Lloyd iterations.

use super::descriptor::{Descriptor, DESCRIPTOR_LEN};
use crate::core::error::{Result, SummaryError};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone)]
pub struct VisualVocabulary {
    centroids: Vec<Descriptor>,
}

fn squared_distance(a: &Descriptor, b: &Descriptor) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Number of bitwise-distinct descriptors.
pub fn distinct_count(descriptors: &[Descriptor]) -> usize {
    descriptors
        .iter()
        .map(|d| d.map(f32::to_bits))
        .collect::<FxHashSet<_>>()
        .len()
}

impl VisualVocabulary {
    /// Fits `k` visual words. Fails with `VocabularyFit` when there are
    /// fewer than `k` distinct descriptors.
    pub fn fit(descriptors: &[Descriptor], k: usize, iterations: usize, seed: u64) -> Result<Self> {
        let available = distinct_count(descriptors);
        if k == 0 || available < k {
            return Err(SummaryError::VocabularyFit {
                requested: k,
                available,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut centroids = Self::init_plus_plus(descriptors, k, &mut rng);

        let mut assignments: Vec<usize> = vec![usize::MAX; descriptors.len()];
        for iteration in 0..iterations {
            let next: Vec<usize> = descriptors
                .par_iter()
                .map(|d| nearest(&centroids, d))
                .collect();
            if next == assignments {
                debug!("🎯 k-means converged after {} iterations", iteration);
                break;
            }
            assignments = next;

            let mut sums = vec![[0f32; DESCRIPTOR_LEN]; k];
            let mut counts = vec![0usize; k];
            for (d, &c) in descriptors.iter().zip(&assignments) {
                counts[c] += 1;
                for (s, v) in sums[c].iter_mut().zip(d.iter()) {
                    *s += v;
                }
            }
            // 空簇保留原中心
            for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
                if count > 0 {
                    for (c, s) in centroid.iter_mut().zip(sum.iter()) {
                        *c = s / count as f32;
                    }
                }
            }
        }

        Ok(Self { centroids })
    }

    fn init_plus_plus(descriptors: &[Descriptor], k: usize, rng: &mut StdRng) -> Vec<Descriptor> {
        let mut centroids = Vec::with_capacity(k);
        centroids.push(descriptors[rng.gen_range(0..descriptors.len())]);

        let mut distances: Vec<f32> = descriptors
            .iter()
            .map(|d| squared_distance(d, &centroids[0]))
            .collect();

        while centroids.len() < k {
            let total: f64 = distances.iter().map(|&d| d as f64).sum();
            let chosen = if total > 0.0 {
                let mut target = rng.gen::<f64>() * total;
                let mut pick = None;
                for (i, &dist) in distances.iter().enumerate() {
                    if dist <= 0.0 {
                        continue;
                    }
                    target -= dist as f64;
                    if target <= 0.0 {
                        pick = Some(i);
                        break;
                    }
                }
                // 浮点误差兜底：取最后一个未覆盖的点
                pick.or_else(|| distances.iter().rposition(|&d| d > 0.0))
            } else {
                None
            };

            let Some(index) = chosen else {
                break;
            };
            let centroid = descriptors[index];
            for (dist, d) in distances.iter_mut().zip(descriptors) {
                *dist = dist.min(squared_distance(d, &centroid));
            }
            centroids.push(centroid);
        }
        centroids
    }

    pub fn size(&self) -> usize {
        self.centroids.len()
    }

    pub fn assign(&self, descriptor: &Descriptor) -> usize {
        nearest(&self.centroids, descriptor)
    }

    /// Visual-word counts of a descriptor set.
    pub fn histogram(&self, descriptors: &[Descriptor]) -> Vec<u32> {
        let mut counts = vec![0u32; self.size()];
        for d in descriptors {
            counts[self.assign(d)] += 1;
        }
        counts
    }
}

fn nearest(centroids: &[Descriptor], descriptor: &Descriptor) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let dist = squared_distance(descriptor, c);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// `log10(k / df)` per word; words no document uses weigh 0.
pub fn inverse_document_frequency(histograms: &[Vec<u32>], size: usize) -> Vec<f64> {
    let mut doc_freq = vec![0u32; size];
    for histogram in histograms {
        for (word, &count) in histogram.iter().enumerate() {
            if count > 0 {
                doc_freq[word] += 1;
            }
        }
    }
    doc_freq
        .iter()
        .map(|&df| {
            if df == 0 {
                0.0
            } else {
                (size as f64 / df as f64).log10()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(axis: usize, jitter: f32) -> Descriptor {
        let mut d = [0f32; DESCRIPTOR_LEN];
        d[axis] = 1.0;
        d[(axis + 1) % DESCRIPTOR_LEN] = jitter;
        d
    }

    fn blobs() -> Vec<Descriptor> {
        let mut ds = Vec::new();
        for axis in [0, 10, 20] {
            for j in 0..5 {
                ds.push(unit(axis, j as f32 * 0.01));
            }
        }
        ds
    }

    #[test]
    fn test_fit_separates_blobs() {
        let ds = blobs();
        let vocab = VisualVocabulary::fit(&ds, 3, 20, 7).unwrap();
        assert_eq!(vocab.size(), 3);

        let a = vocab.assign(&unit(0, 0.0));
        let b = vocab.assign(&unit(10, 0.0));
        let c = vocab.assign(&unit(20, 0.0));
        assert!(a != b && b != c && a != c);
        assert_eq!(vocab.assign(&unit(0, 0.04)), a);
    }

    #[test]
    fn test_fit_is_deterministic_for_seed() {
        let ds = blobs();
        let first = VisualVocabulary::fit(&ds, 4, 20, 42).unwrap();
        let second = VisualVocabulary::fit(&ds, 4, 20, 42).unwrap();
        assert_eq!(first.histogram(&ds), second.histogram(&ds));
    }

    #[test]
    fn test_not_enough_distinct_descriptors() {
        let ds = vec![unit(0, 0.0); 10];
        let err = VisualVocabulary::fit(&ds, 3, 10, 1).unwrap_err();
        assert!(matches!(
            err,
            SummaryError::VocabularyFit {
                requested: 3,
                available: 1
            }
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_inverse_document_frequency() {
        let histograms = vec![vec![1, 0, 2], vec![3, 0, 0]];
        let idf = inverse_document_frequency(&histograms, 3);
        assert!((idf[0] - (3.0f64 / 2.0).log10()).abs() < 1e-12);
        assert_eq!(idf[1], 0.0);
        assert!((idf[2] - 3.0f64.log10()).abs() < 1e-12);
    }
}
