use crate::document::{Document, DocumentId};
use crate::keywords::KeywordSet;
use crate::normalize::normalize;
use crate::ranking::{rank, DocumentScore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

/// Result of one analysis run: per-keyword totals and per-document scores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    frequencies: BTreeMap<String, u64>,
    scores: BTreeMap<DocumentId, u64>,
}

impl Analysis {
    /// Total occurrences of a keyword (normalized form); zero when never seen.
    pub fn frequency(&self, term: &str) -> u64 {
        self.frequencies.get(&normalize(term)).copied().unwrap_or(0)
    }

    /// Matched keywords by descending count, ties by term.
    pub fn frequencies(&self) -> Vec<TermCount> {
        let mut out: Vec<TermCount> = self
            .frequencies
            .iter()
            .filter(|(_, c)| **c > 0)
            .map(|(t, &c)| TermCount { term: t.clone(), count: c })
            .collect();
        out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        out
    }

    pub fn score(&self, id: &DocumentId) -> Option<u64> { self.scores.get(id).copied() }

    pub fn scores(&self) -> &BTreeMap<DocumentId, u64> { &self.scores }

    pub fn ranking(&self) -> Vec<DocumentScore> {
        rank(self.scores.iter().map(|(id, &s)| (id.clone(), s)))
    }

    pub fn document_count(&self) -> usize { self.scores.len() }

    pub fn total_occurrences(&self) -> u64 { self.frequencies.values().sum() }
}

/// Count keyword occurrences across a batch. Pure: the same input always yields the same output.
pub fn analyze(documents: &[Document], keywords: &KeywordSet) -> Analysis {
    let mut analysis = Analysis::default();
    for doc in documents {
        let text = normalize(doc.text());
        let mut doc_total = 0u64;
        for (term, n) in keywords.count_in(&text) {
            *analysis.frequencies.entry(term.to_string()).or_insert(0) += n;
            doc_total += n;
        }
        tracing::debug!(id = %doc.id, score = doc_total, "document analysed");
        match analysis.scores.get_mut(&doc.id) {
            Some(existing) => {
                tracing::warn!(id = %doc.id, "duplicate document id, merging scores");
                *existing += doc_total;
            }
            None => { analysis.scores.insert(doc.id.clone(), doc_total); }
        }
    }
    tracing::info!(
        documents = analysis.scores.len(),
        keywords = keywords.len(),
        occurrences = analysis.total_occurrences(),
        "analysis complete"
    );
    analysis
}
