use crate::normalize::normalize;
use crate::tokenizer::{is_single_token, token_counts};
use serde::Serialize;
use std::collections::HashSet;

/// Legal and IP terms tracked by default, in accented and unaccented spellings.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "marca",
    "registro",
    "trademark",
    "pirataria",
    "contrafação",
    "contrafacao",
    "imitação",
    "imitacao",
    "trade dress",
    "design",
    "autoral",
    "propriedade intelectual",
    "uso indevido",
    "direitos autorais",
];

/// A normalized, de-duplicated keyword list split into phrases and single tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordSet {
    phrases: Vec<String>,
    tokens: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut set = KeywordSet::default();
        for raw in keywords {
            let kw = normalize(raw.as_ref());
            if kw.is_empty() || !seen.insert(kw.clone()) { continue; }
            if is_single_token(&kw) {
                set.tokens.push(kw);
            } else {
                set.phrases.push(kw);
            }
        }
        set
    }

    pub fn phrases(&self) -> &[String] { &self.phrases }
    pub fn tokens(&self) -> &[String] { &self.tokens }

    /// All keywords in normalized form, phrases first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().chain(self.tokens.iter()).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.phrases.len() + self.tokens.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Occurrences of each keyword in one normalized text. Keywords with no match are omitted.
    pub fn count_in<'a>(&'a self, normalized: &str) -> Vec<(&'a str, u64)> {
        let mut hits = Vec::new();
        if normalized.is_empty() { return hits; }
        for phrase in &self.phrases {
            let n = normalized.matches(phrase.as_str()).count() as u64;
            if n > 0 { hits.push((phrase.as_str(), n)); }
        }
        if !self.tokens.is_empty() {
            let counts = token_counts(normalized);
            for token in &self.tokens {
                if let Some(&n) = counts.get(token.as_str()) {
                    hits.push((token.as_str(), n));
                }
            }
        }
        hits
    }

    /// Parse a keyword file: one keyword per line, blank lines and `#` comments skipped.
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }
}

lazy_static::lazy_static! {
    static ref DEFAULT_SET: KeywordSet = KeywordSet::new(DEFAULT_KEYWORDS);
}

/// The default keyword set, built once.
pub fn default_keywords() -> &'static KeywordSet { &DEFAULT_SET }
