use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}_]+").expect("valid regex");
}

/// Split already-normalized text into maximal runs of letters, digits and underscores.
pub fn tokenize(text: &str) -> Vec<&str> {
    WORD.find_iter(text).map(|m| m.as_str()).collect()
}

/// Token frequency table for exact single-token matching.
pub fn token_counts(text: &str) -> HashMap<&str, u64> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for tok in WORD.find_iter(text) {
        *counts.entry(tok.as_str()).or_insert(0) += 1;
    }
    counts
}

/// True when `text` is exactly one word run.
pub fn is_single_token(text: &str) -> bool {
    match WORD.find(text) {
        Some(m) => m.start() == 0 && m.end() == text.len(),
        None => false,
    }
}
