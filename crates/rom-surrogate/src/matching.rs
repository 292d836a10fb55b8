// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Point Matching
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tolerance matching of design points against sampled rows.

use ndarray::ArrayView2;

/// Coordinates a and b coincide when |a - b| <= tol * max(1, |a|, |b|).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMatcher {
    pub tolerance: f64,
}

impl Default for PointMatcher {
    fn default() -> Self {
        Self { tolerance: 1e-10 }
    }
}

impl PointMatcher {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn coincide(&self, a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| self.close(x, y))
    }

    /// Index of the first row of `samples` coinciding with `point`.
    pub fn find(&self, samples: ArrayView2<'_, f64>, point: &[f64]) -> Option<usize> {
        if samples.ncols() != point.len() {
            return None;
        }
        samples
            .outer_iter()
            .position(|row| row.iter().zip(point).all(|(&x, &y)| self.close(x, y)))
    }

    fn close(&self, x: f64, y: f64) -> bool {
        (x - y).abs() <= self.tolerance * 1.0_f64.max(x.abs()).max(y.abs())
    }
}
