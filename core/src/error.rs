//! Error types for loading and analysing document tables.

use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A column the analysis cannot run without is absent from the header row.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
