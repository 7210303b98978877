//! TF-IDF (Term Frequency-Inverse Document Frequency) vectorizer.
//!
//! Documents are the whitespace-joined token streams produced by the text
//! pipeline, so negated tokens arrive as `NOT_<stem>` and form their own
//! terms. Terms are unigrams plus bigrams (`"a b"`). The vocabulary is
//! fixed by [`TfidfVectorizer::fit`]; terms unseen at fit time are ignored.

use crate::error::{Error, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A sparse feature row: `(index, value)` pairs sorted by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub dim: usize,
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn zeros(dim: usize) -> Self {
        SparseVector {
            dim,
            entries: Vec::new(),
        }
    }

    /// True when no feature is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Dot product with a dense weight vector. Indices past the end of
    /// `weights` contribute nothing.
    pub fn dot(&self, weights: &Array1<f64>) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(i, v)| weights.get(i).map(|w| w * v))
            .sum()
    }

    pub fn to_dense(&self) -> Array1<f64> {
        let mut dense = Array1::zeros(self.dim);
        for &(i, v) in &self.entries {
            dense[i] = v;
        }
        dense
    }
}

/// TF-IDF vectorizer over unigrams and bigrams.
///
/// - IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`
/// - The `max_features` terms with the highest `corpus count * idf` are
///   kept, ties broken by term
/// - Feature indices follow term order, so a fit is fully deterministic
/// - Rows are L2-normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term to feature index mapping
    vocabulary: BTreeMap<String, usize>,
    /// Inverse document frequency per feature index
    idf: Vec<f64>,
    /// Maximum number of features to keep
    max_features: usize,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer.
    ///
    /// # Arguments
    ///
    /// * `max_features` - Maximum number of terms (unigrams and bigrams) to keep
    pub fn new(max_features: usize) -> Self {
        TfidfVectorizer {
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
            max_features,
        }
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Number of features produced by [`TfidfVectorizer::transform`].
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Fit the vectorizer on a collection of documents.
    ///
    /// Fails when `documents` is empty or yields no term at all.
    ///
    /// # Arguments
    ///
    /// * `documents` - Processed documents (space-separated tokens)
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(Error::InvalidInput(
                "cannot fit vectorizer on zero documents".to_string(),
            ));
        }

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut corpus_count: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = extract_terms(doc);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *corpus_count.entry(term).or_insert(0) += 1;
            }
        }

        if corpus_count.is_empty() {
            return Err(Error::InvalidInput(
                "empty vocabulary: documents contain no terms".to_string(),
            ));
        }

        let n_docs = documents.len() as f64;
        let smoothed_idf = |df: usize| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0;

        // Rank by corpus count * idf, then keep the top terms
        let mut ranked: Vec<(String, f64)> = corpus_count
            .into_iter()
            .map(|(term, count)| {
                let score = count as f64 * smoothed_idf(doc_freq[&term]);
                (term, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let mut selected: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        selected.sort();

        self.idf = selected
            .iter()
            .map(|term| smoothed_idf(doc_freq[term]))
            .collect();
        self.vocabulary = selected
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF row.
    ///
    /// # Arguments
    ///
    /// * `document` - Processed document to transform
    ///
    /// # Returns
    ///
    /// A sparse row over the fitted vocabulary; out-of-vocabulary terms are dropped
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in extract_terms(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, count * self.idf[idx]))
            .collect();

        let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut entries {
                *v /= norm;
            }
        }

        SparseVector {
            dim: self.dim(),
            entries,
        }
    }

    /// Fit on `documents`, then transform each of them.
    ///
    /// # Returns
    ///
    /// One TF-IDF row per input document, in input order
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        Ok(documents.iter().map(|doc| self.transform(doc)).collect())
    }

    /// Check that vocabulary indices and idf weights agree.
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(Error::CorruptBundle(format!(
                "vectorizer has {} terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }
        let mut seen = vec![false; self.idf.len()];
        for (term, &idx) in &self.vocabulary {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(Error::CorruptBundle(format!(
                        "vectorizer term {:?} has invalid index {}",
                        term, idx
                    )))
                }
            }
        }
        Ok(())
    }
}

/// Lowercased whitespace unigrams followed by adjacent-pair bigrams.
fn extract_terms(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let mut terms: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    terms.extend(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}
