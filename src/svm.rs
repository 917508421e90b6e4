//! Linear support vector classifier.
//!
//! Minimizes `0.5 * ||w||^2 + C * sum(max(0, 1 - y_i * w.x_i)^2)` by
//! coordinate descent on the dual. The intercept is learned as the weight of
//! an extra constant feature (so it is regularized like every other weight).
//! Coordinates are visited in a fixed cyclic order: identical input always
//! yields identical weights.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AnalyticsError;
use crate::sentiment::Sentiment;
use crate::vectorize::FeatureMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SvmParams {
    pub c: f64,
    pub tol: f64,
    pub max_iter: usize,
    pub intercept_scaling: f64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            tol: 1e-4,
            max_iter: 1000,
            intercept_scaling: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearSvc {
    params: SvmParams,
    weights: Option<Vec<f64>>,
    intercept: f64,
    iterations: usize,
}

impl LinearSvc {
    pub fn new(params: SvmParams) -> Self {
        Self {
            params,
            weights: None,
            intercept: 0.0,
            iterations: 0,
        }
    }

    /// Learned per-feature weights; positive values push toward `Positive`.
    pub fn coef(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn fit(&mut self, x: &FeatureMatrix, y: &[Sentiment]) -> Result<(), AnalyticsError> {
        let SvmParams {
            c,
            tol,
            max_iter,
            intercept_scaling: bias,
        } = self.params;

        if !(c > 0.0 && c.is_finite()) {
            return Err(AnalyticsError::InvalidParameter {
                name: "c",
                reason: format!("must be positive and finite, got {c}"),
            });
        }
        if x.n_rows() != y.len() {
            return Err(AnalyticsError::DimensionMismatch {
                rows: x.n_rows(),
                labels: y.len(),
            });
        }
        if x.n_rows() == 0 || x.n_features == 0 {
            return Err(AnalyticsError::NoDocuments);
        }
        let has_pos = y.contains(&Sentiment::Positive);
        let has_neg = y.contains(&Sentiment::Negative);
        if !(has_pos && has_neg) {
            return Err(AnalyticsError::SingleClass);
        }

        let n_samples = x.n_rows();
        let ys: Vec<f64> = y.iter().map(|s| s.signed()).collect();
        // squared hinge: diagonal shift 1/(2C), no upper bound on alpha
        let diag = 0.5 / c;
        let qd: Vec<f64> = x
            .rows
            .iter()
            .map(|r| r.squared_norm() + bias * bias + diag)
            .collect();

        let mut alpha = vec![0.0f64; n_samples];
        let mut w = vec![0.0f64; x.n_features];
        let mut w_bias = 0.0f64;
        let mut converged = false;
        let mut iter = 0;

        while iter < max_iter {
            let mut pg_max = f64::NEG_INFINITY;
            let mut pg_min = f64::INFINITY;

            for i in 0..n_samples {
                let row = &x.rows[i];
                let yi = ys[i];
                let g = yi * (row.dot(&w) + w_bias * bias) - 1.0 + diag * alpha[i];
                let pg = if alpha[i] == 0.0 { g.min(0.0) } else { g };

                pg_max = pg_max.max(pg);
                pg_min = pg_min.min(pg);

                if pg.abs() > 1e-12 {
                    let old = alpha[i];
                    alpha[i] = (old - g / qd[i]).max(0.0);
                    let step = (alpha[i] - old) * yi;
                    row.add_scaled_to(step, &mut w);
                    w_bias += step * bias;
                }
            }

            iter += 1;
            if pg_max - pg_min <= tol {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!("LinearSvc did not converge - max_iter={}, samples={}", max_iter, n_samples);
        }
        if w.iter().any(|v| !v.is_finite()) || !w_bias.is_finite() {
            return Err(AnalyticsError::NonFinite("svm weights"));
        }

        debug!(
            "LinearSvc fitted - samples={}, features={}, iterations={}, converged={}",
            n_samples, x.n_features, iter, converged
        );

        self.weights = Some(w);
        self.intercept = w_bias * bias;
        self.iterations = iter;
        Ok(())
    }
}

impl Default for LinearSvc {
    fn default() -> Self {
        Self::new(SvmParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorize::SparseRow;
    use Sentiment::{Negative, Positive};

    fn matrix(rows: Vec<Vec<(usize, f64)>>, n_features: usize) -> FeatureMatrix {
        FeatureMatrix {
            rows: rows.into_iter().map(SparseRow::from_sorted).collect(),
            n_features,
        }
    }

    #[test]
    fn separates_disjoint_features() {
        let x = matrix(
            vec![
                vec![(0, 1.0)],
                vec![(1, 1.0)],
                vec![(2, 1.0)],
                vec![(3, 1.0)],
            ],
            4,
        );
        let y = [Positive, Positive, Negative, Negative];
        let mut svm = LinearSvc::default();
        svm.fit(&x, &y).unwrap();

        let w = svm.coef().unwrap();
        assert!(w[0] > 0.0 && w[1] > 0.0);
        assert!(w[2] < 0.0 && w[3] < 0.0);
        for (row, label) in x.rows.iter().zip(y) {
            let margin = row.dot(w) + svm.intercept();
            assert_eq!(margin > 0.0, label == Positive);
        }
    }

    #[test]
    fn refit_is_deterministic() {
        let x = matrix(
            vec![
                vec![(0, 0.6), (1, 0.8)],
                vec![(1, 1.0)],
                vec![(0, 0.8), (2, 0.6)],
                vec![(2, 1.0)],
            ],
            3,
        );
        let y = [Positive, Negative, Positive, Negative];
        let mut a = LinearSvc::default();
        let mut b = LinearSvc::default();
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.coef(), b.coef());
        assert_eq!(a.intercept(), b.intercept());
    }

    #[test]
    fn single_class_is_rejected() {
        let x = matrix(vec![vec![(0, 1.0)], vec![(1, 1.0)]], 2);
        let mut svm = LinearSvc::default();
        assert_eq!(svm.fit(&x, &[Positive, Positive]), Err(AnalyticsError::SingleClass));
        assert!(svm.coef().is_none());
    }

    #[test]
    fn label_count_must_match_rows() {
        let x = matrix(vec![vec![(0, 1.0)]], 1);
        let mut svm = LinearSvc::default();
        assert_eq!(
            svm.fit(&x, &[Positive, Negative]),
            Err(AnalyticsError::DimensionMismatch { rows: 1, labels: 2 })
        );
    }

    #[test]
    fn non_positive_c_is_rejected() {
        let x = matrix(vec![vec![(0, 1.0)], vec![(1, 1.0)]], 2);
        let mut svm = LinearSvc::new(SvmParams {
            c: 0.0,
            ..SvmParams::default()
        });
        assert!(matches!(
            svm.fit(&x, &[Positive, Negative]),
            Err(AnalyticsError::InvalidParameter { name: "c", .. })
        ));
    }
}
