use thiserror::Error;

/// Failures raised inside feature extraction and model fitting.
///
/// These never leave the phrase discriminator: it downgrades every variant
/// to an "insufficient data" outcome.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("cannot fit on an empty document set")]
    NoDocuments,

    #[error("vocabulary is empty (documents contain no n-grams after stop word removal)")]
    EmptyVocabulary,

    #[error("sample count mismatch: {rows} rows vs {labels} labels")]
    DimensionMismatch { rows: usize, labels: usize },

    #[error("training labels hold a single class")]
    SingleClass,

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("non-finite value produced in {0}")]
    NonFinite(&'static str),
}

/// Stored authenticity flags must be exactly 0 or 1.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("authenticity label must be 0 or 1, got {0}")]
pub struct InvalidLabel(pub i64);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
