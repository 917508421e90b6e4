use crate::models::{RatingMetrics, ReviewRecord};

/// Fake ratio plus overall and authentic-only mean ratings.
///
/// Every field is `None` when there is nothing to average over; an empty
/// review set never reports a 0% fake ratio.
pub fn compute_metrics(reviews: &[ReviewRecord]) -> RatingMetrics {
    RatingMetrics {
        fake_ratio: fake_ratio(reviews),
        overall_avg: mean(reviews.iter().map(|r| r.stars)),
        authentic_avg: mean(reviews.iter().filter(|r| r.is_authentic()).map(|r| r.stars)),
    }
}

pub fn fake_ratio(reviews: &[ReviewRecord]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let fake = reviews.iter().filter(|r| !r.is_authentic()).count();
    Some(fake as f64 / reviews.len() as f64)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}
