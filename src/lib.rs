//! Review authenticity analytics for a single business.
//!
//! `analyze` turns the labeled reviews of one business into a fake-review
//! ratio, overall and authentic-only average ratings, and the bigrams whose
//! linear-SVM weights best separate high from low ratings among authentic
//! reviews. `store`, `render` and `viz_export` are the SQLite, terminal and
//! JSON collaborators used by the `ingestra` binary.

pub mod config;
pub mod csv_rows;
pub mod discriminate;
pub mod error;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod sentiment;
pub mod store;
pub mod svm;
pub mod text;
pub mod vectorize;
pub mod viz_export;

pub use config::{AnalysisParams, DiscriminatorParams};
pub use models::{
    AnalyticsResult, AuthenticityLabel, Business, BusinessId, BusinessQuery, InsufficientReason,
    PhraseOutcome, PhraseWeight, ReviewRecord,
};
pub use orchestrator::{analyze, analyze_with, run_report, ReportOutcome};
pub use sentiment::{normalize, Sentiment, POSITIVE_RATING_THRESHOLD};
