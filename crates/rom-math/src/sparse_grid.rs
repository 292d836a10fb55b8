// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Sparse Grids
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tensor and Smolyak quadrature designs over Gauss rules.
//!
//! The Smolyak rule uses the combination technique
//!   Q = sum_{l in L} c_l (Q_{l_1} x ... x Q_{l_d}),
//!   c_l = sum_{z in {0,1}^d, l+z in L} (-1)^{|z|}
//! with an (l+1)-point Gauss rule at level l. Coincident nodes from different
//! tensor terms are merged and their weights summed.

use std::collections::BTreeMap;

use rom_types::error::{RomError, RomResult};
use tracing::debug;

use crate::basis::OrthoBasis;
use crate::design::{BasisCatalog, QuadratureDesign};
use crate::index_set::IndexSet;
use crate::quadrature::QuadratureRule;

/// Resolution used to decide that two standardized nodes coincide.
const MERGE_SCALE: f64 = 1e12;
const ZERO_WEIGHT_REL: f64 = 1e-14;

#[derive(Debug, Clone)]
pub struct SparseGrid {
    var_names: Vec<String>,
    /// Physical coordinates, one row per node.
    points: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

impl SparseGrid {
    /// Full tensor grid with `points_per_dim[d]` Gauss nodes in dimension d.
    pub fn tensor(basis: &OrthoBasis, points_per_dim: &[usize]) -> RomResult<Self> {
        if points_per_dim.len() != basis.n_dims() {
            return Err(RomError::ConfigError(format!(
                "tensor grid over {:?} needs {} point counts, got {}",
                basis.var_names(),
                basis.n_dims(),
                points_per_dim.len()
            )));
        }
        let rules = basis
            .variables()
            .iter()
            .zip(points_per_dim)
            .map(|(v, &n)| QuadratureRule::gauss(v.family, n))
            .collect::<RomResult<Vec<_>>>()?;
        let mut acc = BTreeMap::new();
        accumulate_tensor(&rules, 1.0, &mut acc);
        Ok(Self::finish(basis, acc))
    }

    /// Isotropic tensor grid with `level + 1` nodes per dimension.
    pub fn tensor_level(basis: &OrthoBasis, level: usize) -> RomResult<Self> {
        Self::tensor(basis, &vec![level + 1; basis.n_dims()])
    }

    /// Smolyak combination over the downward-closed level set `levels`.
    pub fn smolyak(basis: &OrthoBasis, levels: &IndexSet) -> RomResult<Self> {
        if levels.n_dims() != basis.n_dims() {
            return Err(RomError::ConfigError(format!(
                "Smolyak level set has dimension {}, basis over {:?} has {}",
                levels.n_dims(),
                basis.var_names(),
                basis.n_dims()
            )));
        }
        if !levels.is_downward_closed() {
            return Err(RomError::ConfigError(
                "Smolyak level set must be downward closed".to_string(),
            ));
        }

        let n_dims = basis.n_dims();
        let mut cache: BTreeMap<(usize, usize), QuadratureRule> = BTreeMap::new();
        let mut acc = BTreeMap::new();
        for level in levels {
            let coeff = combination_coefficient(levels, level);
            if coeff == 0 {
                continue;
            }
            let mut rules = Vec::with_capacity(n_dims);
            for (d, &l) in level.iter().enumerate() {
                if !cache.contains_key(&(d, l)) {
                    let rule = QuadratureRule::gauss(basis.variables()[d].family, l + 1)?;
                    cache.insert((d, l), rule);
                }
                rules.push(cache[&(d, l)].clone());
            }
            accumulate_tensor(&rules, coeff as f64, &mut acc);
        }
        let grid = Self::finish(basis, acc);
        debug!(
            vars = ?grid.var_names,
            terms = levels.len(),
            nodes = grid.len(),
            "built Smolyak grid"
        );
        Ok(grid)
    }

    fn finish(basis: &OrthoBasis, acc: BTreeMap<Vec<i64>, (Vec<f64>, f64)>) -> Self {
        let scale: f64 = acc.values().map(|(_, w)| w.abs()).sum::<f64>().max(f64::MIN_POSITIVE);
        let mut points = Vec::with_capacity(acc.len());
        let mut weights = Vec::with_capacity(acc.len());
        for (_, (std_pt, w)) in acc {
            if w.abs() <= ZERO_WEIGHT_REL * scale {
                continue;
            }
            let phys = std_pt
                .iter()
                .zip(basis.variables())
                .map(|(&s, v)| v.distribution.to_physical(s))
                .collect();
            points.push(phys);
            weights.push(w);
        }
        Self {
            var_names: basis.var_names().to_vec(),
            points,
            weights,
        }
    }

    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl QuadratureDesign for SparseGrid {
    fn var_names(&self) -> &[String] {
        &self.var_names
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn node(&self, i: usize) -> &[f64] {
        &self.points[i]
    }

    fn weight(&self, i: usize) -> f64 {
        self.weights[i]
    }
}

fn combination_coefficient(levels: &IndexSet, level: &[usize]) -> i64 {
    let d = level.len();
    let mut coeff = 0i64;
    for mask in 0..(1usize << d) {
        let shifted: Vec<usize> = (0..d)
            .map(|k| level[k] + ((mask >> k) & 1))
            .collect();
        if levels.contains(&shifted) {
            coeff += if mask.count_ones() % 2 == 0 { 1 } else { -1 };
        }
    }
    coeff
}

/// Adds `scale * (rules[0] x ... x rules[d-1])` into `acc`, keyed by quantized node.
fn accumulate_tensor(
    rules: &[QuadratureRule],
    scale: f64,
    acc: &mut BTreeMap<Vec<i64>, (Vec<f64>, f64)>,
) {
    let d = rules.len();
    let mut counter = vec![0usize; d];
    loop {
        let node: Vec<f64> = (0..d).map(|k| rules[k].nodes[counter[k]]).collect();
        let weight: f64 = (0..d).map(|k| rules[k].weights[counter[k]]).product::<f64>() * scale;
        let key: Vec<i64> = node.iter().map(|x| (x * MERGE_SCALE).round() as i64).collect();
        acc.entry(key).or_insert_with(|| (node, 0.0)).1 += weight;

        let mut k = 0;
        while k < d {
            counter[k] += 1;
            if counter[k] < rules[k].len() {
                break;
            }
            counter[k] = 0;
            k += 1;
        }
        if k == d {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::VariableBasis;
    use crate::distribution::Distribution;

    fn uniform_basis(n: usize) -> OrthoBasis {
        OrthoBasis::new(
            (0..n)
                .map(|i| {
                    VariableBasis::new(
                        format!("x{i}"),
                        Distribution::Uniform {
                            lower: -1.0,
                            upper: 1.0,
                        },
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    fn integrate(grid: &SparseGrid, f: impl Fn(&[f64]) -> f64) -> f64 {
        grid.iter().map(|(x, w)| f(x) * w).sum()
    }

    #[test]
    fn test_tensor_grid_size_and_mass() {
        let basis = uniform_basis(2);
        let grid = SparseGrid::tensor(&basis, &[2, 3]).unwrap();
        assert_eq!(grid.len(), 6);
        let mass: f64 = grid.weights().iter().sum();
        assert!((mass - 4.0).abs() < 1e-13);
    }

    #[test]
    fn test_tensor_grid_rejects_wrong_arity() {
        let basis = uniform_basis(2);
        assert!(SparseGrid::tensor(&basis, &[2]).is_err());
    }

    #[test]
    fn test_one_dim_smolyak_is_gauss_rule() {
        let basis = uniform_basis(1);
        let grid = SparseGrid::smolyak(&basis, &IndexSet::total_degree(1, 3)).unwrap();
        assert_eq!(grid.len(), 4);
        let rule = QuadratureRule::gauss(basis.variables()[0].family, 4).unwrap();
        for (i, (x, w)) in grid.iter().enumerate() {
            assert!((x[0] - rule.nodes[i]).abs() < 1e-14);
            assert!((w - rule.weights[i]).abs() < 1e-13);
        }
    }

    #[test]
    fn test_smolyak_total_degree_exactness() {
        // Level-2 total-degree Smolyak integrates x^a y^b exactly for
        // (a <= 5, b <= 1), (a <= 3, b <= 3), (a <= 1, b <= 5).
        let basis = uniform_basis(2);
        let grid = SparseGrid::smolyak(&basis, &IndexSet::total_degree(2, 2)).unwrap();
        let mass: f64 = grid.weights().iter().sum();
        assert!((mass - 4.0).abs() < 1e-12);
        for (a, b) in [(4, 0), (2, 2), (0, 4), (3, 3), (5, 1)] {
            let approx = integrate(&grid, |x| x[0].powi(a) * x[1].powi(b));
            let m = |k: i32| if k % 2 == 1 { 0.0 } else { 2.0 / (k as f64 + 1.0) };
            let exact = m(a) * m(b);
            assert!(
                (approx - exact).abs() < 1e-12,
                "x^{a} y^{b}: {approx} vs {exact}"
            );
        }
    }

    #[test]
    fn test_smolyak_smaller_than_tensor() {
        let basis = uniform_basis(3);
        let sparse = SparseGrid::smolyak(&basis, &IndexSet::total_degree(3, 3)).unwrap();
        let full = SparseGrid::tensor_level(&basis, 3).unwrap();
        assert!(sparse.len() < full.len());
    }

    #[test]
    fn test_smolyak_rejects_gapped_level_set() {
        let basis = uniform_basis(2);
        let gap = IndexSet::custom(2, &[vec![0, 0], vec![0, 2]]).unwrap();
        assert!(SparseGrid::smolyak(&basis, &gap).is_err());
    }

    #[test]
    fn test_physical_mapping() {
        let basis = OrthoBasis::new(vec![VariableBasis::new(
            "t",
            Distribution::Uniform {
                lower: 10.0,
                upper: 20.0,
            },
        )])
        .unwrap();
        let grid = SparseGrid::tensor(&basis, &[3]).unwrap();
        assert!((grid.node(1)[0] - 15.0).abs() < 1e-13);
        assert!(grid.points().iter().all(|p| p[0] > 10.0 && p[0] < 20.0));
    }

    #[test]
    fn test_combination_coefficients_sum_to_one() {
        let levels = IndexSet::total_degree(3, 2);
        let total: i64 = levels
            .iter()
            .map(|l| combination_coefficient(&levels, l))
            .sum();
        assert_eq!(total, 1);
    }
}
