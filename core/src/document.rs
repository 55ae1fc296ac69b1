use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Opaque document identifier, unique within a batch.
///
/// Ordering is numeric when both ids are unsigned integers, so `99 < 101`. Numeric ids
/// sort before non-numeric ones; everything else compares as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self { Self(s) }
}

impl From<u64> for DocumentId {
    fn from(n: u64) -> Self { Self(n.to_string()) }
}

impl From<usize> for DocumentId {
    fn from(n: usize) -> Self { Self(n.to_string()) }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.pad(&self.0) }
}

impl Ord for DocumentId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.trim().parse::<u64>(), other.0.trim().parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for DocumentId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub date: Option<String>,
    /// Raw text; `None` and `""` both analyse as empty.
    #[serde(default)]
    pub text: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, text: impl Into<String>) -> Self {
        Self { id: id.into(), date: None, text: Some(text.into()) }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn text(&self) -> &str { self.text.as_deref().unwrap_or("") }
}

const SAMPLE: [(u64, &str, &str); 5] = [
    (101, "2025-01-10", "A grande marca de luxo ingressou com ação de contrafação pelo design não autorizado do produto. A propriedade intelectual foi violada."),
    (102, "2025-02-15", "Novo registro de marca para a coleção sustentável. A empresa protegeu sua marca e seu trade dress."),
    (103, "2025-03-20", "Discussão sobre a proteção de direitos autorais em estampas de moda. A imitação de tecidos é uma preocupação."),
    (104, "2025-04-01", "A pirataria de tênis continua sendo um desafio. Uso indevido de logo é recorrente."),
    (105, "2025-05-05", "Registro da nova cor como marca tridimensional. Fortalecimento da proteção da marca."),
];

/// The bundled five-document batch used when no input table is given.
pub fn sample_documents() -> Vec<Document> {
    SAMPLE
        .iter()
        .map(|(id, date, text)| Document::new(*id, *text).with_date(*date))
        .collect()
}
