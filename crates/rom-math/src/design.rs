// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Design Query Traits
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Query interfaces the surrogates consume.
//!
//! Surrogates only ever read through these traits; how a grid or a basis was
//! constructed is invisible to them.

use std::fmt::Debug;

/// Ordered integration nodes (physical coordinates) with per-node weights.
pub trait QuadratureDesign: Debug + Send + Sync {
    fn var_names(&self) -> &[String];

    fn len(&self) -> usize;

    fn node(&self, i: usize) -> &[f64];

    /// Weight against the product of the native univariate weight functions.
    fn weight(&self, i: usize) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> DesignIter<'_, Self>
    where
        Self: Sized,
    {
        DesignIter {
            design: self,
            next: 0,
        }
    }
}

/// Per-variable standardizing maps and orthonormal polynomials.
pub trait BasisCatalog: Debug + Send + Sync {
    fn var_names(&self) -> &[String];

    /// Physical coordinate -> quadrature coordinate for dimension `dim`.
    fn standardize(&self, dim: usize, physical: f64) -> f64;

    /// Converts the native weight of dimension `dim` into a probability measure.
    fn measure_norm(&self, dim: usize) -> f64;

    fn polynomial_value(&self, dim: usize, order: usize, standard: f64) -> f64;

    fn n_dims(&self) -> usize {
        self.var_names().len()
    }

    /// Product of the per-dimension measure constants.
    fn total_measure_norm(&self) -> f64 {
        (0..self.n_dims()).map(|d| self.measure_norm(d)).product()
    }
}

pub struct DesignIter<'a, D: QuadratureDesign + ?Sized> {
    design: &'a D,
    next: usize,
}

impl<'a, D: QuadratureDesign + ?Sized> Iterator for DesignIter<'a, D> {
    type Item = (&'a [f64], f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.design.len() {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some((self.design.node(i), self.design.weight(i)))
    }
}

/// `(node, weight)` pairs of a type-erased design.
pub fn design_pairs<'a>(
    design: &'a (dyn QuadratureDesign + 'a),
) -> DesignIter<'a, dyn QuadratureDesign + 'a> {
    DesignIter { design, next: 0 }
}
