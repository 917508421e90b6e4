use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::svm::SvmParams;

/// Phrases kept at each end of the weight ranking (10 total).
pub const PHRASES_PER_SIDE: usize = 5;

pub const DEFAULT_DB_PATH: &str = "yelp_demo.db";
pub const DB_PATH_ENV: &str = "INGESTRA_DB";

pub const DEMO_POSTAL_CODE: &str = "226021";
pub const DEMO_BUSINESS_NAME: &str = "Demo Cafe";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscriminatorParams {
    pub phrases_per_side: usize,
    pub min_df: usize,
    pub svm: SvmParams,
}

impl Default for DiscriminatorParams {
    fn default() -> Self {
        Self {
            phrases_per_side: PHRASES_PER_SIDE,
            min_df: 1,
            svm: SvmParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AnalysisParams {
    pub discriminator: DiscriminatorParams,
}

/// Database path: explicit flag, else `INGESTRA_DB`, else `yelp_demo.db`.
pub fn resolve_db_path(cli: Option<&Path>) -> PathBuf {
    if let Some(p) = cli {
        debug!("Using database from --db argument: {}", p.display());
        return p.to_path_buf();
    }
    match std::env::var(DB_PATH_ENV) {
        Ok(p) if !p.trim().is_empty() => {
            debug!("Using database from {}: {}", DB_PATH_ENV, p);
            PathBuf::from(p)
        }
        _ => PathBuf::from(DEFAULT_DB_PATH),
    }
}
