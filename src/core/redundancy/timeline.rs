//! 多视频时间线合并
//!
//! Representatives are placed one cluster at a time. A new item goes in
//! front of the first placed item it is not later than. "Later" is judged
//! in the new item's own video: when the placed item's cluster has a
//! member there, that member's position is the reference; otherwise the
//! raw segment indices are compared. Items from the same video always keep
//! their relative order.

use super::cluster::Cluster;
use super::selector::RepresentativeChoice;
use crate::core::video::SegmentKey;

#[derive(Debug, Default)]
pub struct TimelineMerger<'a> {
    placed: Vec<(SegmentKey, &'a Cluster)>,
}

impl<'a> TimelineMerger<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(choices: &'a [RepresentativeChoice]) -> Vec<SegmentKey> {
        let mut merger = Self::new();
        for choice in choices {
            merger.insert(choice.chosen, &choice.cluster);
        }
        merger.into_keys()
    }

    pub fn insert(&mut self, key: SegmentKey, cluster: &'a Cluster) {
        let position = self.insert_position(key);
        self.placed.insert(position, (key, cluster));
    }

    pub fn into_keys(self) -> Vec<SegmentKey> {
        self.placed.into_iter().map(|(k, _)| k).collect()
    }

    fn is_later(new: SegmentKey, placed: SegmentKey, placed_cluster: &Cluster) -> bool {
        match placed_cluster.member_in_video(new.video) {
            Some(member) => new.segment > member.segment,
            None => new.segment > placed.segment,
        }
    }

    fn insert_position(&self, key: SegmentKey) -> usize {
        let preferred = self
            .placed
            .iter()
            .position(|(placed, cluster)| !Self::is_later(key, *placed, cluster))
            .unwrap_or(self.placed.len());

        // 同一视频内的先后顺序不能被打乱
        let lower = self
            .placed
            .iter()
            .rposition(|(p, _)| p.video == key.video && p.segment < key.segment)
            .map_or(0, |i| i + 1);
        let upper = self
            .placed
            .iter()
            .position(|(p, _)| p.video == key.video && p.segment > key.segment)
            .unwrap_or(self.placed.len());

        preferred.clamp(lower, upper.max(lower))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn choice(chosen: (usize, usize), members: &[(usize, usize)]) -> RepresentativeChoice {
        RepresentativeChoice {
            cluster: Cluster {
                members: members
                    .iter()
                    .map(|&(v, s)| SegmentKey::new(v, s))
                    .collect::<BTreeSet<_>>(),
            },
            chosen: SegmentKey::new(chosen.0, chosen.1),
            quality_score: 0.0,
        }
    }

    fn keys(raw: &[(usize, usize)]) -> Vec<SegmentKey> {
        raw.iter().map(|&(v, s)| SegmentKey::new(v, s)).collect()
    }

    #[test]
    fn test_empty() {
        assert!(TimelineMerger::merge(&[]).is_empty());
    }

    #[test]
    fn test_cluster_member_orders_across_videos() {
        // 第二个代表来自视频 1，但第一个簇在视频 1 中的成员位置更靠后
        let choices = vec![
            choice((0, 2), &[(0, 2), (1, 5)]),
            choice((1, 1), &[(1, 1), (2, 0)]),
        ];
        assert_eq!(TimelineMerger::merge(&choices), keys(&[(1, 1), (0, 2)]));
    }

    #[test]
    fn test_raw_index_fallback() {
        let choices = vec![
            choice((0, 3), &[(0, 3), (1, 3)]),
            choice((2, 1), &[(2, 1), (3, 0)]),
            choice((2, 7), &[(2, 7), (3, 4)]),
        ];
        assert_eq!(
            TimelineMerger::merge(&choices),
            keys(&[(2, 1), (0, 3), (2, 7)])
        );
    }

    #[test]
    fn test_same_video_order_preserved() {
        // 簇在视频 0 中含有较低成员时，首选位置会越过同视频的更后片段
        let choices = vec![
            choice((0, 5), &[(0, 0), (0, 5), (1, 2)]),
            choice((0, 3), &[(0, 3), (2, 2)]),
            choice((1, 9), &[(1, 9), (0, 1)]),
            choice((0, 8), &[(0, 8), (2, 0)]),
        ];
        let merged = TimelineMerger::merge(&choices);
        assert_eq!(merged.len(), 4);

        for (i, a) in merged.iter().enumerate() {
            for b in merged.iter().skip(i + 1) {
                if a.video == b.video {
                    assert!(a.segment < b.segment, "{} placed before {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_merge_chronology_over_generated_inputs() {
        for seed in 0..40usize {
            let mut choices = Vec::new();
            let mut used = BTreeSet::new();
            for i in 0..6usize {
                let chosen = ((seed + i) % 3, (seed * 7 + i * 5) % 11);
                let partner = ((seed + i) % 3 + 3, (seed + i * 3) % 9);
                let extra = ((seed + i + 1) % 3, (seed * 3 + i * 2) % 11);
                if !used.insert(chosen) || !used.insert(partner) || !used.insert(extra) {
                    continue;
                }
                choices.push(choice(chosen, &[chosen, partner, extra]));
            }

            let merged = TimelineMerger::merge(&choices);
            assert_eq!(merged.len(), choices.len());
            for (i, a) in merged.iter().enumerate() {
                for b in merged.iter().skip(i + 1) {
                    if a.video == b.video {
                        assert!(a.segment < b.segment, "seed {}: {} before {}", seed, a, b);
                    }
                }
            }
        }
    }
}
