pub mod analysis;
pub mod chart;
pub mod document;
pub mod error;
pub mod keywords;
pub mod normalize;
pub mod ranking;
pub mod report;
pub mod table;
pub mod tokenizer;

pub use analysis::{analyze, Analysis, TermCount};
pub use document::{sample_documents, Document, DocumentId};
pub use error::{AnalysisError, AnalysisResult};
pub use keywords::{default_keywords, KeywordSet, DEFAULT_KEYWORDS};
pub use normalize::normalize;
pub use ranking::{rank, DocumentScore};
pub use report::{Report, DEFAULT_TOP_N};
