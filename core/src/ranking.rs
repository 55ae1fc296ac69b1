use crate::document::DocumentId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentScore {
    pub id: DocumentId,
    pub score: u64,
}

/// Order documents by descending score, ties by ascending id. Callers truncate.
pub fn rank<I>(scores: I) -> Vec<DocumentScore>
where
    I: IntoIterator<Item = (DocumentId, u64)>,
{
    let mut ranked: Vec<DocumentScore> = scores
        .into_iter()
        .map(|(id, score)| DocumentScore { id, score })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_with_id_tiebreak() {
        let ranked = rank(vec![
            (DocumentId::from("105"), 3),
            (DocumentId::from("20"), 1),
            (DocumentId::from("101"), 3),
            (DocumentId::from("3"), 0),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["101", "105", "20", "3"]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = rank(vec![(DocumentId::from("b"), 2), (DocumentId::from("a"), 2)]);
        let b = rank(vec![(DocumentId::from("a"), 2), (DocumentId::from("b"), 2)]);
        assert_eq!(a, b);
    }
}
