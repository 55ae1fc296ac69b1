use crate::analysis::{Analysis, TermCount};
use crate::ranking::DocumentScore;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub const DEFAULT_TOP_N: usize = 3;

/// What a dashboard shows after one run: frequency table, truncated ranking, totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub documents: usize,
    pub total_occurrences: u64,
    pub frequencies: Vec<TermCount>,
    pub top_documents: Vec<DocumentScore>,
}

impl Report {
    pub fn build(analysis: &Analysis, top_n: usize) -> Self {
        let mut top_documents = analysis.ranking();
        top_documents.truncate(top_n);
        Self {
            documents: analysis.document_count(),
            total_occurrences: analysis.total_occurrences(),
            frequencies: analysis.frequencies(),
            top_documents,
        }
    }

    /// The `n` most frequent keywords, for charting.
    pub fn top_terms(&self, n: usize) -> &[TermCount] {
        &self.frequencies[..n.min(self.frequencies.len())]
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let term_w = self.frequencies.iter().map(|t| t.term.chars().count()).max().unwrap_or(0).max("Keyword".len());
        let _ = writeln!(out, "Keyword frequency ({} documents, {} occurrences)", self.documents, self.total_occurrences);
        let _ = writeln!(out, "{:<term_w$}  {:>9}", "Keyword", "Frequency");
        if self.frequencies.is_empty() {
            let _ = writeln!(out, "(no keywords found)");
        }
        for t in &self.frequencies {
            let _ = writeln!(out, "{:<term_w$}  {:>9}", t.term, t.count);
        }

        let id_w = self.top_documents.iter().map(|d| d.id.as_str().chars().count()).max().unwrap_or(0).max("Document".len());
        let _ = writeln!(out);
        let _ = writeln!(out, "Top {} documents", self.top_documents.len());
        let _ = writeln!(out, "{:<id_w$}  {:>11}", "Document", "Occurrences");
        for d in &self.top_documents {
            let _ = writeln!(out, "{:<id_w$}  {:>11}", d.id, d.score);
        }
        out
    }
}
