//! TF-IDF vectorizer
//!
//! Each segment becomes a sparse vector over the stemmed vocabulary of the
//! whole corpus. Weights are `tf * log10(N / df)` and non-zero vectors are
//! scaled to unit L2 norm, so the dot product of two vectors is their
//! cosine similarity.

use super::preprocess::TextPreprocessor;
use crate::core::error::Result;
use crate::core::video::{SegmentKey, VideoSet};
use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};

/// Sparse term weights sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(u32, f64)>,
}

impl FeatureVector {
    /// Builds from `(term, weight)` pairs, dropping zero weights.
    pub fn from_weights(weights: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let mut entries: Vec<(u32, f64)> = weights.into_iter().filter(|(_, w)| *w != 0.0).collect();
        entries.sort_by_key(|(term, _)| *term);
        Self { entries }
    }

    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn weight(&self, term: u32) -> f64 {
        self.entries
            .binary_search_by_key(&term, |(t, _)| *t)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// Scales to unit norm; a zero vector is left as is.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in self.entries.iter_mut() {
                *w /= norm;
            }
        }
    }

    /// Dot product over the shared terms, 0 when none are shared.
    pub fn dot(&self, other: &FeatureVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            if ta == tb {
                dot += wa * wb;
                i += 1;
                j += 1;
            } else if ta < tb {
                i += 1;
            } else {
                j += 1;
            }
        }
        dot
    }
}

/// Vectors of every segment, row-aligned with `keys`.
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    pub vocabulary: Vec<String>,
    pub keys: Vec<SegmentKey>,
    pub vectors: Vec<FeatureVector>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, key: SegmentKey) -> Option<&FeatureVector> {
        self.keys
            .binary_search(&key)
            .ok()
            .map(|row| &self.vectors[row])
    }

    /// Rows grouped by video, in video order.
    pub fn rows_by_video(&self) -> BTreeMap<usize, Vec<usize>> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (row, key) in self.keys.iter().enumerate() {
            groups.entry(key.video).or_default().push(row);
        }
        groups
    }
}

pub struct Vectorizer {
    preprocessor: TextPreprocessor,
}

impl Vectorizer {
    pub fn new(language: &str) -> Result<Self> {
        Ok(Self {
            preprocessor: TextPreprocessor::new(language)?,
        })
    }

    pub fn vectorize(&self, videos: &VideoSet) -> FeatureMatrix {
        let documents: Vec<(SegmentKey, &str)> = videos
            .videos()
            .iter()
            .enumerate()
            .flat_map(|(v, video)| {
                video
                    .segments()
                    .iter()
                    .enumerate()
                    .map(move |(s, seg)| (SegmentKey::new(v, s), seg.content.as_str()))
            })
            .collect();
        self.vectorize_documents(&documents)
    }

    /// `documents` must be sorted by key.
    pub fn vectorize_documents(&self, documents: &[(SegmentKey, &str)]) -> FeatureMatrix {
        let tokenized: Vec<Vec<String>> = documents
            .par_iter()
            .map(|(_, text)| self.preprocessor.tokens(text))
            .collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        let term_ids: FxHashMap<&str, u32> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i as u32))
            .collect();

        // 词频 + 文档频率
        let mut doc_freq = vec![0u32; vocabulary.len()];
        let term_counts: Vec<BTreeMap<u32, u32>> = tokenized
            .iter()
            .map(|tokens| {
                let mut counts = BTreeMap::new();
                for token in tokens {
                    if let Some(&id) = term_ids.get(token.as_str()) {
                        *counts.entry(id).or_insert(0) += 1;
                    }
                }
                for id in counts.keys() {
                    doc_freq[*id as usize] += 1;
                }
                counts
            })
            .collect();

        let n_docs = documents.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| if df == 0 { 0.0 } else { (n_docs / df as f64).log10() })
            .collect();

        let vectors: Vec<FeatureVector> = term_counts
            .iter()
            .map(|counts| {
                let mut vector = FeatureVector::from_weights(
                    counts
                        .iter()
                        .map(|(&id, &tf)| (id, tf as f64 * idf[id as usize])),
                );
                vector.normalize();
                vector
            })
            .collect();

        debug!(
            "📝 Vectorized {} segments over {} terms",
            documents.len(),
            vocabulary.len()
        );

        FeatureMatrix {
            vocabulary,
            keys: documents.iter().map(|(k, _)| *k).collect(),
            vectors,
        }
    }
}
