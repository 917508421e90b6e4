//! TF-IDF over word n-grams.
//!
//! Raw term counts are weighted by a smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1` and each row is scaled to unit L2 norm.
//! The vocabulary is ordered lexically, so column `j` is always the `j`-th
//! term in sorted order.

use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::AnalyticsError;
use crate::text::{ngrams, tokenize};

/// One document as (column, value) pairs, columns strictly increasing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseRow {
    entries: Vec<(usize, f64)>,
}

impl SparseRow {
    pub fn from_sorted(entries: Vec<(usize, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries.iter().map(|&(j, v)| v * dense[j]).sum()
    }

    pub fn squared_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum()
    }

    /// `dense += scale * self`
    pub fn add_scaled_to(&self, scale: f64, dense: &mut [f64]) {
        for &(j, v) in &self.entries {
            dense[j] += scale * v;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub rows: Vec<SparseRow>,
    pub n_features: usize,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    ngram_range: (usize, usize),
    min_df: usize,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    pub fn new() -> Self {
        Self {
            ngram_range: (1, 1),
            min_df: 1,
            terms: Vec::new(),
            idf: Vec::new(),
        }
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        let lo = min_n.max(1);
        self.ngram_range = (lo, max_n.max(lo));
        self
    }

    /// Terms appearing in fewer than `min_df` documents are dropped.
    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df.max(1);
        self
    }

    /// Column names, in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    fn count_terms(&self, doc: &str) -> HashMap<String, usize> {
        let tokens = tokenize(doc);
        let mut counts = HashMap::new();
        for n in self.ngram_range.0..=self.ngram_range.1 {
            for gram in ngrams(&tokens, n) {
                *counts.entry(gram).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Learn vocabulary and IDF from `documents`, then return their TF-IDF rows.
    pub fn fit_transform<S: AsRef<str>>(
        &mut self,
        documents: &[S],
    ) -> Result<FeatureMatrix, AnalyticsError> {
        if documents.is_empty() {
            return Err(AnalyticsError::NoDocuments);
        }

        let per_doc: Vec<HashMap<String, usize>> =
            documents.iter().map(|d| self.count_terms(d.as_ref())).collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for counts in &per_doc {
            for term in counts.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f64;
        let (terms, idf): (Vec<String>, Vec<f64>) = doc_freq
            .into_iter()
            .filter(|&(_, df)| df >= self.min_df)
            .map(|(term, df)| (term.to_string(), ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0))
            .unzip();

        if terms.is_empty() {
            return Err(AnalyticsError::EmptyVocabulary);
        }
        self.terms = terms;
        self.idf = idf;

        let column: HashMap<&str, usize> = self
            .terms
            .iter()
            .enumerate()
            .map(|(j, t)| (t.as_str(), j))
            .collect();

        let rows = per_doc
            .iter()
            .map(|counts| {
                let mut entries: Vec<(usize, f64)> = counts
                    .iter()
                    .filter_map(|(term, &tf)| {
                        column.get(term.as_str()).map(|&j| (j, tf as f64 * self.idf[j]))
                    })
                    .collect();
                entries.sort_by_key(|&(j, _)| j);
                let norm = entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, v) in entries.iter_mut() {
                        *v /= norm;
                    }
                }
                SparseRow::from_sorted(entries)
            })
            .collect::<Vec<_>>();

        if rows.iter().flat_map(|r| r.entries()).any(|&(_, v)| !v.is_finite()) {
            return Err(AnalyticsError::NonFinite("tf-idf matrix"));
        }

        debug!(
            "TF-IDF fitted - documents={}, features={}, ngram_range={:?}",
            documents.len(),
            self.terms.len(),
            self.ngram_range
        );

        Ok(FeatureMatrix {
            rows,
            n_features: self.terms.len(),
        })
    }
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
