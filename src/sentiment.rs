use serde::{Deserialize, Serialize};

/// Star ratings at or above this value count as positive sentiment.
///
/// This is the only place the cutoff lives. It drives the label used for
/// phrase discrimination and has nothing to do with the stored
/// authenticity flag.
pub const POSITIVE_RATING_THRESHOLD: f64 = 3.0;

/// Binary sentiment class derived from a star rating. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    /// Signed target for margin classifiers: -1.0 / +1.0.
    pub fn signed(self) -> f64 {
        match self {
            Sentiment::Negative => -1.0,
            Sentiment::Positive => 1.0,
        }
    }
}

/// Map a star rating to its sentiment class. Total: NaN lands on `Negative`.
pub fn normalize(stars: f64) -> Sentiment {
    if stars >= POSITIVE_RATING_THRESHOLD {
        Sentiment::Positive
    } else {
        Sentiment::Negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(normalize(3.0), Sentiment::Positive);
        assert_eq!(normalize(2.999), Sentiment::Negative);
        assert_eq!(normalize(5.0), Sentiment::Positive);
        assert_eq!(normalize(0.0), Sentiment::Negative);
    }

    #[test]
    fn nan_and_out_of_range_inputs_are_defined() {
        assert_eq!(normalize(f64::NAN), Sentiment::Negative);
        assert_eq!(normalize(-1.0), Sentiment::Negative);
        assert_eq!(normalize(12.0), Sentiment::Positive);
    }

    #[test]
    fn signed_targets() {
        assert_eq!(Sentiment::Negative.signed(), -1.0);
        assert_eq!(Sentiment::Positive.signed(), 1.0);
    }
}
