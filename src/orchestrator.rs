use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::config::AnalysisParams;
use crate::discriminate::discriminate;
use crate::metrics::compute_metrics;
use crate::models::{AnalyticsResult, Business, BusinessId, BusinessQuery, ReviewRecord};
use crate::render::render_report;
use crate::store::{find_business, load_reviews};
use crate::viz_export::write_chart_bundle;

/// Analyze one business's reviews with the default parameters.
pub fn analyze(reviews: &[ReviewRecord]) -> AnalyticsResult {
    analyze_with(reviews, &AnalysisParams::default())
}

/// Metrics and phrase discrimination run independently: an insufficient
/// phrase outcome never blanks the metrics, and empty input only yields
/// undefined metrics.
pub fn analyze_with(reviews: &[ReviewRecord], params: &AnalysisParams) -> AnalyticsResult {
    let start = std::time::Instant::now();
    debug!("Analysis started - reviews={}", reviews.len());

    // 1) metrics
    let metrics = compute_metrics(reviews);

    // 2) phrases over authentic reviews
    let phrases = discriminate(reviews, &params.discriminator);

    let result = AnalyticsResult::from_parts(metrics, phrases);
    info!(
        "Analysis completed - duration={:.3}s, reviews={}, fake_ratio={:?}, phrases={}",
        start.elapsed().as_secs_f32(),
        reviews.len(),
        result.fake_ratio,
        result
            .discriminative_phrases
            .phrases()
            .map(|p| p.len().to_string())
            .unwrap_or_else(|| "insufficient".to_string())
    );
    result
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    BusinessNotFound {
        postal_code: String,
        name: String,
    },
    Analyzed {
        business: Business,
        review_count: usize,
        result: AnalyticsResult,
        report: String,
        written: Vec<PathBuf>,
    },
}

/// Look up the business, load its reviews, analyze, render and optionally
/// export the chart bundle.
pub fn run_report(
    conn: &Connection,
    query: &BusinessQuery,
    params: &AnalysisParams,
    output_dir: Option<&Path>,
) -> Result<ReportOutcome> {
    let Some(business) = find_business(conn, &query.postal_code, &query.name)
        .context("business lookup failed")?
    else {
        info!(
            "Business not found - postal_code={}, name={}",
            query.postal_code, query.name
        );
        return Ok(ReportOutcome::BusinessNotFound {
            postal_code: query.postal_code.clone(),
            name: query.name.clone(),
        });
    };

    let reviews = load_reviews(conn, &business.id)
        .with_context(|| format!("loading reviews for {}", business.id))?;
    let result = analyze_with(&reviews, params);
    let report = render_report(&business, &result);

    let written = match output_dir {
        Some(dir) => {
            let dir = bundle_dir(dir, &business.id)?;
            let files = write_chart_bundle(&dir, &business, &reviews, &result)?;
            info!("Chart bundle written - directory={}, files={}", dir.display(), files.len());
            files
        }
        None => Vec::new(),
    };

    Ok(ReportOutcome::Analyzed {
        business,
        review_count: reviews.len(),
        result,
        report,
        written,
    })
}

/// `root/<id>`, refusing ids that would resolve anywhere but one level below `root`.
fn bundle_dir(root: &Path, id: &BusinessId) -> Result<PathBuf> {
    let mut parts = Path::new(&id.0).components();
    let single = matches!(
        (parts.next(), parts.next()),
        (Some(Component::Normal(name)), None) if name.to_str() == Some(id.0.as_str())
    );
    if !single || id.0.contains(['/', '\\']) {
        bail!("business id {:?} cannot be used as a directory name", id.0);
    }
    Ok(root.join(&id.0))
}
