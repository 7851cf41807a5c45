use super::cluster::Cluster;
use crate::core::error::Result;
use crate::core::video::{SegmentKey, VideoSet};
use crate::core::visual::{QualityScorer, QualityScores};
use log::debug;

/// The segment kept for a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct RepresentativeChoice {
    pub cluster: Cluster,
    pub chosen: SegmentKey,
    pub quality_score: f64,
}

impl RepresentativeChoice {
    /// Members of the cluster that lose to the chosen one.
    pub fn discarded(&self) -> impl Iterator<Item = SegmentKey> + '_ {
        self.cluster
            .members
            .iter()
            .copied()
            .filter(move |k| *k != self.chosen)
    }
}

pub struct RepresentativeSelector<'a> {
    scorer: &'a dyn QualityScorer,
}

impl<'a> RepresentativeSelector<'a> {
    pub fn new(scorer: &'a dyn QualityScorer) -> Self {
        Self { scorer }
    }

    /// One choice per non-empty cluster, in cluster order. Every clustered
    /// segment is scored in a single scorer call.
    pub fn select(&self, videos: &VideoSet, clusters: &[Cluster]) -> Result<Vec<RepresentativeChoice>> {
        if clusters.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<SegmentKey> = clusters
            .iter()
            .flat_map(|c| c.members.iter().copied())
            .collect();
        let scores = self.scorer.score_segments(videos, &keys)?;

        let choices: Vec<RepresentativeChoice> = clusters
            .iter()
            .filter_map(|cluster| Self::choose(cluster, &scores))
            .collect();
        for choice in &choices {
            debug!(
                "⭐ {} chosen from {} members (score {:.3})",
                choice.chosen,
                choice.cluster.len(),
                choice.quality_score
            );
        }
        Ok(choices)
    }

    /// Highest score wins, ties go to the lowest key. Missing scores count as 0.
    /// `None` for an empty cluster.
    pub fn choose(cluster: &Cluster, scores: &QualityScores) -> Option<RepresentativeChoice> {
        let mut best: Option<(SegmentKey, f64)> = None;
        for key in &cluster.members {
            let score = scores.get(key).copied().unwrap_or(0.0);
            let better = match best {
                None => true,
                Some((_, best_score)) => score.total_cmp(&best_score).is_gt(),
            };
            if better {
                best = Some((*key, score));
            }
        }

        best.map(|(chosen, quality_score)| RepresentativeChoice {
            cluster: cluster.clone(),
            chosen,
            quality_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::visual::StaticQualityScorer;
    use std::collections::BTreeSet;

    fn cluster(keys: &[(usize, usize)]) -> Cluster {
        Cluster {
            members: keys.iter().map(|&(v, s)| SegmentKey::new(v, s)).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_empty_cluster_list() {
        let scorer = StaticQualityScorer::new();
        let selector = RepresentativeSelector::new(&scorer);
        assert!(selector.select(&VideoSet::default(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_empty_cluster_has_no_choice() {
        let scorer = StaticQualityScorer::new().with_score(SegmentKey::new(0, 0), 3.0);
        let empty = Cluster {
            members: BTreeSet::new(),
        };
        assert!(RepresentativeSelector::choose(&empty, &QualityScores::new()).is_none());

        let clusters = vec![empty, cluster(&[(0, 2), (1, 1)])];
        let choices = RepresentativeSelector::new(&scorer)
            .select(&VideoSet::default(), &clusters)
            .unwrap();
        assert_eq!(choices.len(), 1);
        assert!(choices[0].cluster.contains(&choices[0].chosen));
    }

    #[test]
    fn test_highest_score_wins() {
        let scorer = StaticQualityScorer::new()
            .with_score(SegmentKey::new(0, 1), 2.0)
            .with_score(SegmentKey::new(1, 0), 5.0)
            .with_score(SegmentKey::new(2, 4), 1.0);
        let clusters = vec![cluster(&[(0, 1), (1, 0), (2, 4)])];

        let choices = RepresentativeSelector::new(&scorer)
            .select(&VideoSet::default(), &clusters)
            .unwrap();
        assert_eq!(choices[0].chosen, SegmentKey::new(1, 0));
        assert_eq!(choices[0].quality_score, 5.0);

        let discarded: Vec<SegmentKey> = choices[0].discarded().collect();
        assert_eq!(discarded, vec![SegmentKey::new(0, 1), SegmentKey::new(2, 4)]);
    }

    #[test]
    fn test_ties_go_to_lowest_key() {
        let scorer = StaticQualityScorer::new()
            .with_score(SegmentKey::new(2, 0), 1.0)
            .with_score(SegmentKey::new(1, 3), 1.0);
        let c = cluster(&[(2, 0), (1, 3)]);
        let scores = scorer
            .score_segments(&VideoSet::default(), &c.members.iter().copied().collect::<Vec<_>>())
            .unwrap();
        assert_eq!(
            RepresentativeSelector::choose(&c, &scores).unwrap().chosen,
            SegmentKey::new(1, 3)
        );
    }

    #[test]
    fn test_one_member_choice_per_cluster() {
        let scorer = StaticQualityScorer::new().with_score(SegmentKey::new(3, 3), 9.0);
        let clusters: Vec<Cluster> = (0..6)
            .map(|i| cluster(&[(0, i), (1, i), (i % 3 + 2, i)]))
            .collect();
        let choices = RepresentativeSelector::new(&scorer)
            .select(&VideoSet::default(), &clusters)
            .unwrap();

        assert_eq!(choices.len(), clusters.len());
        for (choice, cluster) in choices.iter().zip(&clusters) {
            assert!(cluster.contains(&choice.chosen));
            assert_eq!(&choice.cluster, cluster);
        }
        assert_eq!(choices[3].chosen, SegmentKey::new(3, 3));
    }
}
