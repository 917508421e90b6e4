use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InvalidLabel;
use crate::sentiment::{normalize, Sentiment};

pub const MIN_STARS: f64 = 0.0;
pub const MAX_STARS: f64 = 5.0;

pub fn is_valid_stars(stars: f64) -> bool {
    (MIN_STARS..=MAX_STARS).contains(&stars)
}

/// Stored per-review flag: 1 = authentic, 0 = suspected fake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum AuthenticityLabel {
    Fake,
    Authentic,
}

impl From<AuthenticityLabel> for i64 {
    fn from(label: AuthenticityLabel) -> Self {
        match label {
            AuthenticityLabel::Fake => 0,
            AuthenticityLabel::Authentic => 1,
        }
    }
}

impl TryFrom<i64> for AuthenticityLabel {
    type Error = InvalidLabel;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(AuthenticityLabel::Fake),
            1 => Ok(AuthenticityLabel::Authentic),
            other => Err(InvalidLabel(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub text: Option<String>,
    pub stars: f64, // [0.0, 5.0]
    pub authenticity_label: AuthenticityLabel,
}

impl ReviewRecord {
    pub fn new(text: impl Into<String>, stars: f64, authenticity_label: AuthenticityLabel) -> Self {
        Self {
            text: Some(text.into()),
            stars,
            authenticity_label,
        }
    }

    pub fn without_text(stars: f64, authenticity_label: AuthenticityLabel) -> Self {
        Self {
            text: None,
            stars,
            authenticity_label,
        }
    }

    pub fn is_authentic(&self) -> bool {
        self.authenticity_label == AuthenticityLabel::Authentic
    }

    /// Derived on every call; never cached on the record.
    pub fn sentiment(&self) -> Sentiment {
        normalize(self.stars)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessId(pub String);

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub postal_code: String,
}

/// Lookup key for a business: exact postal code plus exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessQuery {
    pub postal_code: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RatingMetrics {
    pub fake_ratio: Option<f64>,    // [0.0, 1.0]; None for an empty review set
    pub overall_avg: Option<f64>,   // None for an empty review set
    pub authentic_avg: Option<f64>, // None without authentic reviews
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseWeight {
    pub phrase: String,
    pub weight: f64, // < 0 leans low ratings, > 0 leans high ratings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientReason {
    NoAuthenticReviews,
    TooFewDistinctTexts,
    SingleSentimentClass,
    EmptyVocabulary,
    NumericFailure,
}

impl fmt::Display for InsufficientReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            InsufficientReason::NoAuthenticReviews => "no authentic reviews with text",
            InsufficientReason::TooFewDistinctTexts => "fewer than two distinct authentic reviews",
            InsufficientReason::SingleSentimentClass => {
                "authentic reviews cover only one rating class"
            }
            InsufficientReason::EmptyVocabulary => "no two-word phrases left after stop word removal",
            InsufficientReason::NumericFailure => "model fitting failed",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhraseOutcome {
    /// Ordered from most negative to most positive weight.
    Ranked { phrases: Vec<PhraseWeight> },
    InsufficientData { reason: InsufficientReason },
}

impl PhraseOutcome {
    pub fn phrases(&self) -> Option<&[PhraseWeight]> {
        match self {
            PhraseOutcome::Ranked { phrases } => Some(phrases),
            PhraseOutcome::InsufficientData { .. } => None,
        }
    }

    pub fn insufficient(reason: InsufficientReason) -> Self {
        PhraseOutcome::InsufficientData { reason }
    }
}

/// One analysis of one business. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsResult {
    pub fake_ratio: Option<f64>,
    pub overall_avg_rating: Option<f64>,
    pub authentic_avg_rating: Option<f64>,
    pub discriminative_phrases: PhraseOutcome,
}

impl AnalyticsResult {
    pub fn from_parts(metrics: RatingMetrics, phrases: PhraseOutcome) -> Self {
        Self {
            fake_ratio: metrics.fake_ratio,
            overall_avg_rating: metrics.overall_avg,
            authentic_avg_rating: metrics.authentic_avg,
            discriminative_phrases: phrases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trips_through_integers() {
        assert_eq!(AuthenticityLabel::try_from(0), Ok(AuthenticityLabel::Fake));
        assert_eq!(AuthenticityLabel::try_from(1), Ok(AuthenticityLabel::Authentic));
        assert_eq!(AuthenticityLabel::try_from(2), Err(InvalidLabel(2)));
        assert_eq!(i64::from(AuthenticityLabel::Authentic), 1);
    }

    #[test]
    fn label_serializes_as_integer() {
        let json = serde_json::to_string(&AuthenticityLabel::Fake).unwrap();
        assert_eq!(json, "0");
        let parsed: Result<AuthenticityLabel, _> = serde_json::from_str("7");
        assert!(parsed.is_err());
    }

    #[test]
    fn star_bounds() {
        assert!(is_valid_stars(0.0));
        assert!(is_valid_stars(5.0));
        assert!(!is_valid_stars(5.5));
        assert!(!is_valid_stars(f64::NAN));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let out = PhraseOutcome::insufficient(InsufficientReason::SingleSentimentClass);
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["status"], "insufficient_data");
        assert_eq!(v["reason"], "single_sentiment_class");
    }
}
