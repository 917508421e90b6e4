// src/render.rs
use crate::models::{AnalyticsResult, Business, PhraseOutcome, PhraseWeight};

const BAR_WIDTH: usize = 20;

pub fn fmt_ratio(v: Option<f64>) -> String {
    v.map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn fmt_rating(v: Option<f64>) -> String {
    v.map(|r| format!("{:.2}", r))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn render_report(business: &Business, result: &AnalyticsResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n\n", business.name, business.postal_code));

    out.push_str(&format!(
        "{:<24}{:<24}{:<24}\n",
        "Fake Review Ratio", "Avg Rating (All)", "Avg Rating (Authentic)"
    ));
    out.push_str(&format!(
        "{:<24}{:<24}{:<24}\n",
        fmt_ratio(result.fake_ratio),
        fmt_rating(result.overall_avg_rating),
        fmt_rating(result.authentic_avg_rating)
    ));

    out.push_str("\nKey Phrases Influencing Ratings\n");
    match &result.discriminative_phrases {
        PhraseOutcome::Ranked { phrases } if !phrases.is_empty() => {
            out.push_str(&render_diverging_bars(phrases));
        }
        PhraseOutcome::Ranked { .. } => {
            out.push_str("No phrases ranked.\n");
        }
        PhraseOutcome::InsufficientData { reason } => {
            out.push_str(&format!(
                "Not enough authentic reviews to perform phrase analysis ({}).\n",
                reason
            ));
        }
    }

    out
}

/// Text rendition of a diverging bar chart: low-rating phrases grow left
/// of the axis, high-rating phrases grow right.
pub fn render_diverging_bars(phrases: &[PhraseWeight]) -> String {
    let max_abs = phrases
        .iter()
        .map(|p| p.weight.abs())
        .fold(0.0f64, f64::max);
    let label_w = phrases.iter().map(|p| p.phrase.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for p in phrases {
        let len = if max_abs > 0.0 {
            ((p.weight.abs() / max_abs) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let (left, right) = if p.weight < 0.0 {
            ("-".repeat(len), String::new())
        } else {
            (String::new(), "+".repeat(len))
        };
        out.push_str(&format!(
            "{:>lw$} {:>bw$}|{:<bw$} {:+.3}\n",
            p.phrase,
            left,
            right,
            p.weight,
            lw = label_w,
            bw = BAR_WIDTH
        ));
    }
    out
}
