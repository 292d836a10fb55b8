// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Orthonormal Polynomial Families
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Univariate orthonormal polynomial families.
//!
//! Every family is normalised against its *probability* measure, so that
//!   E[p_m(X) p_n(X)] = delta_mn
//! with X uniform on [-1, 1] (Legendre) or standard normal (Hermite).
//! Evaluation uses the orthonormal three-term recurrence
//!   sqrt(b_{k+1}) p_{k+1}(x) = (x - a_k) p_k(x) - sqrt(b_k) p_{k-1}(x)
//! with p_0 = 1.

use rom_types::config::PolynomialKind;
use serde::{Deserialize, Serialize};

const SQRT_TWO_PI: f64 = 2.506_628_274_631_000_5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolynomialFamily {
    Legendre,
    Hermite,
}

impl From<PolynomialKind> for PolynomialFamily {
    fn from(kind: PolynomialKind) -> Self {
        match kind {
            PolynomialKind::Legendre => PolynomialFamily::Legendre,
            PolynomialKind::Hermite => PolynomialFamily::Hermite,
        }
    }
}

impl PolynomialFamily {
    /// Monic recurrence coefficients (a_k, b_k). b_0 is unused and returned as 0.
    pub fn recurrence(&self, k: usize) -> (f64, f64) {
        if k == 0 {
            return (0.0, 0.0);
        }
        let kf = k as f64;
        match self {
            PolynomialFamily::Legendre => (0.0, kf * kf / (4.0 * kf * kf - 1.0)),
            PolynomialFamily::Hermite => (0.0, kf),
        }
    }

    /// Total mass of the native quadrature weight function
    /// (1 on [-1, 1]; exp(-x^2/2) on the real line).
    pub fn native_mass(&self) -> f64 {
        match self {
            PolynomialFamily::Legendre => 2.0,
            PolynomialFamily::Hermite => SQRT_TWO_PI,
        }
    }

    /// Factor turning native quadrature weights into probability weights.
    pub fn measure_norm(&self) -> f64 {
        1.0 / self.native_mass()
    }

    /// Orthonormal polynomial of degree `order` at standardized `x`.
    pub fn value(&self, order: usize, x: f64) -> f64 {
        if order == 0 {
            return 1.0;
        }
        let (a0, _) = self.recurrence(0);
        let mut prev = 1.0;
        let mut cur = (x - a0) / self.recurrence(1).1.sqrt();
        for k in 1..order {
            let (ak, bk) = self.recurrence(k);
            let (_, bk1) = self.recurrence(k + 1);
            let next = ((x - ak) * cur - bk.sqrt() * prev) / bk1.sqrt();
            prev = cur;
            cur = next;
        }
        cur
    }

    /// Value and derivative of the orthonormal polynomial of degree `order`.
    pub fn value_and_derivative(&self, order: usize, x: f64) -> (f64, f64) {
        if order == 0 {
            return (1.0, 0.0);
        }
        let sb1 = self.recurrence(1).1.sqrt();
        let (mut p_prev, mut d_prev) = (1.0, 0.0);
        let (mut p, mut d) = (x / sb1, 1.0 / sb1);
        for k in 1..order {
            let (ak, bk) = self.recurrence(k);
            let sbk1 = self.recurrence(k + 1).1.sqrt();
            let sbk = bk.sqrt();
            let p_next = ((x - ak) * p - sbk * p_prev) / sbk1;
            let d_next = (p + (x - ak) * d - sbk * d_prev) / sbk1;
            p_prev = p;
            d_prev = d;
            p = p_next;
            d = d_next;
        }
        (p, d)
    }

    /// All orthonormal polynomials of degree 0..=max_order at `x`.
    pub fn values_upto(&self, max_order: usize, x: f64) -> Vec<f64> {
        let mut out = Vec::with_capacity(max_order + 1);
        out.push(1.0);
        if max_order == 0 {
            return out;
        }
        out.push(x / self.recurrence(1).1.sqrt());
        for k in 1..max_order {
            let (ak, bk) = self.recurrence(k);
            let (_, bk1) = self.recurrence(k + 1);
            let next = ((x - ak) * out[k] - bk.sqrt() * out[k - 1]) / bk1.sqrt();
            out.push(next);
        }
        out
    }
}
