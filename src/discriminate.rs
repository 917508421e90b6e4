use itertools::Itertools;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::config::DiscriminatorParams;
use crate::error::AnalyticsError;
use crate::models::{InsufficientReason, PhraseOutcome, PhraseWeight, ReviewRecord};
use crate::sentiment::Sentiment;
use crate::svm::LinearSvc;
use crate::vectorize::TfIdfVectorizer;

/// Bigrams that best separate high from low ratings among authentic reviews.
///
/// Never fails: every degenerate input and every numeric problem comes back
/// as `PhraseOutcome::InsufficientData`.
pub fn discriminate(reviews: &[ReviewRecord], params: &DiscriminatorParams) -> PhraseOutcome {
    // 1) authentic reviews that carry text
    let docs: Vec<(&str, Sentiment)> = reviews
        .iter()
        .filter(|r| r.is_authentic())
        .filter_map(|r| r.text.as_deref().map(|t| (t, r.sentiment())))
        .collect();

    if docs.is_empty() {
        debug!("Phrase analysis skipped - no authentic reviews with text");
        return PhraseOutcome::insufficient(InsufficientReason::NoAuthenticReviews);
    }
    let distinct: BTreeSet<&str> = docs.iter().map(|(t, _)| *t).collect();
    if distinct.len() < 2 {
        debug!("Phrase analysis skipped - distinct_texts={}", distinct.len());
        return PhraseOutcome::insufficient(InsufficientReason::TooFewDistinctTexts);
    }

    // 2) + 3) derived labels must cover both classes
    let labels: Vec<Sentiment> = docs.iter().map(|(_, s)| *s).collect();
    if labels.iter().all_equal() {
        debug!("Phrase analysis skipped - single sentiment class, docs={}", docs.len());
        return PhraseOutcome::insufficient(InsufficientReason::SingleSentimentClass);
    }

    let texts: Vec<&str> = docs.iter().map(|(t, _)| *t).collect();
    match fit_and_rank(&texts, &labels, params) {
        Ok(phrases) => {
            info!(
                "Phrase analysis completed - docs={}, phrases={}",
                texts.len(),
                phrases.len()
            );
            PhraseOutcome::Ranked { phrases }
        }
        Err(AnalyticsError::EmptyVocabulary) => {
            debug!("Phrase analysis skipped - empty bigram vocabulary");
            PhraseOutcome::insufficient(InsufficientReason::EmptyVocabulary)
        }
        Err(e) => {
            warn!("Phrase analysis failed - error={}", e);
            PhraseOutcome::insufficient(InsufficientReason::NumericFailure)
        }
    }
}

fn fit_and_rank(
    texts: &[&str],
    labels: &[Sentiment],
    params: &DiscriminatorParams,
) -> Result<Vec<PhraseWeight>, AnalyticsError> {
    // 4) bigram tf-idf
    let mut vectorizer = TfIdfVectorizer::new()
        .with_ngram_range(2, 2)
        .with_min_df(params.min_df);
    let x = vectorizer.fit_transform(texts)?;

    // 5) linear separator
    let mut svm = LinearSvc::new(params.svm);
    svm.fit(&x, labels)?;
    let coef = svm.coef().ok_or(AnalyticsError::NonFinite("svm weights"))?;
    debug!(
        "Separator ready - features={}, iterations={}, intercept={:.4}",
        coef.len(),
        svm.iterations(),
        svm.intercept()
    );

    // 6) + 7)
    Ok(rank_features(vectorizer.feature_names(), coef, params.phrases_per_side))
}

/// Lowest `k` then highest `k` weights, ordered by ascending weight.
///
/// Ties at either cut are resolved in favour of the lexically smaller
/// phrase. The two blocks never share a feature: the high end is picked
/// from what the low end left over. With fewer than `2k` features every
/// feature is returned once.
pub fn rank_features(names: &[String], weights: &[f64], k: usize) -> Vec<PhraseWeight> {
    let n = names.len().min(weights.len());
    let ascending = |a: &usize, b: &usize| {
        weights[*a]
            .total_cmp(&weights[*b])
            .then_with(|| names[*a].cmp(&names[*b]))
    };

    let order: Vec<usize> = (0..n).sorted_by(ascending).collect();
    let picked: Vec<usize> = if n < 2 * k {
        order
    } else {
        let (negative, rest) = order.split_at(k);
        let positive = rest
            .iter()
            .copied()
            .sorted_by(|a, b| {
                weights[*b]
                    .total_cmp(&weights[*a])
                    .then_with(|| names[*a].cmp(&names[*b]))
            })
            .take(k)
            .sorted_by(ascending);
        negative.iter().copied().chain(positive).collect()
    };

    picked
        .into_iter()
        .map(|j| PhraseWeight {
            phrase: names[j].clone(),
            weight: weights[j],
        })
        .collect()
}
