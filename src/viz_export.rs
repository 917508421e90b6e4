// src/viz_export.rs
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::{
    fs,
    path::{Path, PathBuf},
};
use xxhash_rust::xxh3::xxh3_64;

use crate::models::{AnalyticsResult, Business, PhraseOutcome, ReviewRecord};

pub const CHART_FILE: &str = "chart.phrases.json";
pub const REPORT_FILE: &str = "report.json";
pub const INDEX_FILE: &str = "chart.index.json";

/* -------------------------------------------------------------------------- */
/* Entry point                                                                */
/* -------------------------------------------------------------------------- */

/// Write the chart-ready JSON bundle for one analysis into `out_dir`.
pub fn write_chart_bundle(
    out_dir: &Path,
    business: &Business,
    reviews: &[ReviewRecord],
    result: &AnalyticsResult,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {:?}", out_dir))?;

    // 1) Diverging bars
    let chart = build_phrase_chart(&result.discriminative_phrases);
    let chart_path = out_dir.join(CHART_FILE);
    write_json(&chart_path, &chart)?;

    // 2) Full result
    let report_path = out_dir.join(REPORT_FILE);
    write_json(
        &report_path,
        &json!({ "business": business, "result": result }),
    )?;

    // 3) Index
    let index_path = out_dir.join(INDEX_FILE);
    write_json(
        &index_path,
        &json!({
            "business_id": business.id,
            "version": 1,
            "review_count": reviews.len(),
            "input_fingerprint": input_fingerprint(reviews),
            "files": [CHART_FILE, REPORT_FILE],
        }),
    )?;

    Ok(vec![chart_path, report_path, index_path])
}

fn write_json<P: AsRef<Path>, T: ?Sized + Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("write {:?}", path))
}

/// Stable hash of the analysed review set; equal inputs give equal ids.
pub fn input_fingerprint(reviews: &[ReviewRecord]) -> String {
    let mut buf = Vec::new();
    for r in reviews {
        buf.extend_from_slice(r.text.as_deref().unwrap_or("").as_bytes());
        buf.push(0x1f);
        buf.extend_from_slice(&r.stars.to_bits().to_le_bytes());
        buf.push(u8::from(r.is_authentic()));
        buf.push(0x1e);
    }
    format!("{:016x}", xxh3_64(&buf))
}

/* -------------------------------------------------------------------------- */
/* Phrase chart                                                               */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize, PartialEq)]
pub struct VBar {
    pub phrase: String,
    pub weight: f64,
    pub color: &'static str, // red = low ratings, blue = high ratings
}

#[derive(Debug, Serialize, PartialEq)]
pub struct VPhraseChart {
    pub title: &'static str,
    pub status: &'static str,
    pub reason: Option<String>,
    pub bars: Vec<VBar>,
}

pub fn build_phrase_chart(outcome: &PhraseOutcome) -> VPhraseChart {
    match outcome {
        PhraseOutcome::Ranked { phrases } => VPhraseChart {
            title: "Key Phrases Influencing Ratings",
            status: "ranked",
            reason: None,
            bars: phrases
                .iter()
                .map(|p| VBar {
                    phrase: p.phrase.clone(),
                    weight: p.weight,
                    color: if p.weight < 0.0 { "red" } else { "blue" },
                })
                .collect(),
        },
        PhraseOutcome::InsufficientData { reason } => VPhraseChart {
            title: "Key Phrases Influencing Ratings",
            status: "insufficient_data",
            reason: Some(reason.to_string()),
            bars: Vec::new(),
        },
    }
}
