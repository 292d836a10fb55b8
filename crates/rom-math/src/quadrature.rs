// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Gauss Quadrature
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Univariate Gauss rules via the Golub-Welsch construction.
//!
//! The nodes of the n-point rule are the eigenvalues of the symmetric
//! tridiagonal Jacobi matrix
//!   J[k,k] = a_k,  J[k,k+1] = J[k+1,k] = sqrt(b_{k+1})
//! built from the family's recurrence. Each eigenvalue is isolated by
//! Sturm-sequence bisection and polished with Newton steps on p_n.
//! Weights follow from the Christoffel function
//!   w_i = mass / sum_{k<n} p_k(x_i)^2
//! and are expressed in the family's native weight function.

use rom_types::error::{RomError, RomResult};

use crate::polynomial::PolynomialFamily;

const BISECTION_MAX_ITERS: usize = 200;
const NEWTON_ITERS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    pub family: PolynomialFamily,
    /// Ascending nodes in the family's standardized coordinate.
    pub nodes: Vec<f64>,
    /// Weights against the native weight function.
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// n-point Gauss rule, exact for polynomials up to degree 2n - 1.
    pub fn gauss(family: PolynomialFamily, n: usize) -> RomResult<Self> {
        if n == 0 {
            return Err(RomError::ConfigError(format!(
                "{family:?} Gauss rule requires at least one node"
            )));
        }

        let diag: Vec<f64> = (0..n).map(|k| family.recurrence(k).0).collect();
        let off_sq: Vec<f64> = (1..n).map(|k| family.recurrence(k).1).collect();

        let mut nodes: Vec<f64> = (0..n)
            .map(|k| {
                let x = bisect_eigenvalue(&diag, &off_sq, k);
                newton_polish(family, n, x)
            })
            .collect();

        // Both families are symmetric about zero.
        for i in 0..n / 2 {
            let j = n - 1 - i;
            let half = 0.5 * (nodes[j] - nodes[i]);
            nodes[i] = -half;
            nodes[j] = half;
        }
        if n % 2 == 1 {
            nodes[n / 2] = 0.0;
        }

        let mass = family.native_mass();
        let weights = nodes
            .iter()
            .map(|&x| {
                let christoffel: f64 = family
                    .values_upto(n - 1, x)
                    .iter()
                    .map(|p| p * p)
                    .sum();
                mass / christoffel
            })
            .collect();

        Ok(Self {
            family,
            nodes,
            weights,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Apply the rule to `f` against the native weight.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F) -> f64 {
        self.nodes
            .iter()
            .zip(self.weights.iter())
            .map(|(&x, &w)| w * f(x))
            .sum()
    }
}

/// Number of eigenvalues of the tridiagonal matrix strictly below `x`.
fn sturm_count(diag: &[f64], off_sq: &[f64], x: f64) -> usize {
    let mut count = 0;
    let mut q = diag[0] - x;
    if q < 0.0 {
        count += 1;
    }
    for i in 1..diag.len() {
        let denom = if q == 0.0 { f64::EPSILON } else { q };
        q = diag[i] - x - off_sq[i - 1] / denom;
        if q < 0.0 {
            count += 1;
        }
    }
    count
}

/// k-th smallest eigenvalue by bisection inside the Gershgorin interval.
fn bisect_eigenvalue(diag: &[f64], off_sq: &[f64], k: usize) -> f64 {
    let n = diag.len();
    let off: Vec<f64> = off_sq.iter().map(|b| b.sqrt()).collect();
    let mut radius = 0.0_f64;
    for i in 0..n {
        let left = if i > 0 { off[i - 1] } else { 0.0 };
        let right = if i + 1 < n { off[i] } else { 0.0 };
        radius = radius.max(diag[i].abs() + left + right);
    }
    let mut lo = -radius - 1.0;
    let mut hi = radius + 1.0;

    for _ in 0..BISECTION_MAX_ITERS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if sturm_count(diag, off_sq, mid) > k {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    0.5 * (lo + hi)
}

fn newton_polish(family: PolynomialFamily, n: usize, x0: f64) -> f64 {
    let mut x = x0;
    for _ in 0..NEWTON_ITERS {
        let (p, d) = family.value_and_derivative(n, x);
        if d == 0.0 || !d.is_finite() {
            break;
        }
        let step = p / d;
        // Bisection already lands within a few ulps; reject anything larger.
        if !step.is_finite() || step.abs() > 1e-8 * (1.0 + x.abs()) {
            break;
        }
        x -= step;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_points_rejected() {
        let err = QuadratureRule::gauss(PolynomialFamily::Legendre, 0).unwrap_err();
        assert!(matches!(err, RomError::ConfigError(_)));
    }

    #[test]
    fn test_two_point_legendre() {
        let rule = QuadratureRule::gauss(PolynomialFamily::Legendre, 2).unwrap();
        let r = 1.0 / 3f64.sqrt();
        assert!((rule.nodes[0] + r).abs() < 1e-14);
        assert!((rule.nodes[1] - r).abs() < 1e-14);
        assert!((rule.weights[0] - 1.0).abs() < 1e-14);
        assert!((rule.weights[1] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_three_point_hermite() {
        let rule = QuadratureRule::gauss(PolynomialFamily::Hermite, 3).unwrap();
        let s3 = 3f64.sqrt();
        assert!((rule.nodes[0] + s3).abs() < 1e-13);
        assert_eq!(rule.nodes[1], 0.0);
        assert!((rule.nodes[2] - s3).abs() < 1e-13);
        // Probability weights 1/6, 2/3, 1/6.
        let norm = PolynomialFamily::Hermite.measure_norm();
        assert!((rule.weights[0] * norm - 1.0 / 6.0).abs() < 1e-13);
        assert!((rule.weights[1] * norm - 2.0 / 3.0).abs() < 1e-13);
    }

    #[test]
    fn test_weights_sum_to_native_mass() {
        for family in [PolynomialFamily::Legendre, PolynomialFamily::Hermite] {
            for n in 1..12 {
                let rule = QuadratureRule::gauss(family, n).unwrap();
                let total: f64 = rule.weights.iter().sum();
                assert!(
                    (total - family.native_mass()).abs() < 1e-12,
                    "{family:?} n={n}: weight sum {total}"
                );
            }
        }
    }

    #[test]
    fn test_legendre_exact_to_degree_2n_minus_1() {
        let n = 5;
        let rule = QuadratureRule::gauss(PolynomialFamily::Legendre, n).unwrap();
        for deg in 0..(2 * n) {
            let approx = rule.integrate(|x| x.powi(deg as i32));
            let exact = if deg % 2 == 1 {
                0.0
            } else {
                2.0 / (deg as f64 + 1.0)
            };
            assert!(
                (approx - exact).abs() < 1e-13,
                "degree {deg}: {approx} vs {exact}"
            );
        }
    }

    #[test]
    fn test_hermite_moments() {
        // E[X^4] = 3, E[X^6] = 15 for X ~ N(0, 1).
        let rule = QuadratureRule::gauss(PolynomialFamily::Hermite, 4).unwrap();
        let norm = PolynomialFamily::Hermite.measure_norm();
        assert!((rule.integrate(|x| x.powi(4)) * norm - 3.0).abs() < 1e-11);
        assert!((rule.integrate(|x| x.powi(6)) * norm - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_nodes_ascending_and_symmetric() {
        let rule = QuadratureRule::gauss(PolynomialFamily::Legendre, 9).unwrap();
        for i in 1..rule.len() {
            assert!(rule.nodes[i] > rule.nodes[i - 1]);
        }
        for i in 0..rule.len() {
            assert_eq!(rule.nodes[i], -rule.nodes[rule.len() - 1 - i]);
        }
    }
}
