// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Polynomial Chaos Expansion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Polynomial Chaos Expansion (PCE) by spectral projection.
//!
//! Coefficients are the discrete projections
//!   c_a = norm * sum_n f(x_n) * prod_d p_{a_d}(s_d(x_n)) * w_n
//! of the sampled response onto an orthonormal basis, where the sum runs
//! over the nodes of the quadrature design, s_d standardizes coordinate d and
//! `norm` turns the design's native weights into a probability measure.
//! The projection is exact whenever the response lies in the span of the
//! index set and the design integrates that span exactly.

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView2};
use rom_math::basis::OrthoBasis;
use rom_math::design::{design_pairs, BasisCatalog, QuadratureDesign};
use rom_math::index_set::{IndexSet, MultiIndex};
use rom_math::sparse_grid::SparseGrid;
use rom_types::config::{GridKind, IndexSetKind, RomConfig};
use rom_types::error::{RomError, RomResult};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::matching::PointMatcher;

/// Multi-index -> expansion coefficient.
pub type CoefficientMap = BTreeMap<MultiIndex, f64>;

/// Whether the expansion stands alone or is one cut of an HDMR decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurrogateRole {
    Standalone,
    Cut,
}

#[derive(Debug, Clone)]
pub struct PolynomialChaos {
    label: String,
    features: Vec<String>,
    target: String,
    index_set: IndexSet,
    design: Arc<dyn QuadratureDesign>,
    basis: Arc<dyn BasisCatalog>,
    matcher: PointMatcher,
    role: SurrogateRole,
    num_runs: Option<usize>,
    norm: f64,
    coefficients: Option<CoefficientMap>,
}

impl PolynomialChaos {
    /// Checked constructor. The index set, design and basis must all span
    /// `features`, in that order.
    pub fn new(
        features: Vec<String>,
        target: impl Into<String>,
        index_set: IndexSet,
        design: Arc<dyn QuadratureDesign>,
        basis: Arc<dyn BasisCatalog>,
    ) -> RomResult<Self> {
        let target = target.into();
        let label = format!("pce({target})");
        if features.is_empty() {
            return Err(RomError::ConfigError(format!(
                "{label}: feature names not provided"
            )));
        }
        if features.iter().any(|f| *f == target) {
            return Err(RomError::ConfigError(format!(
                "{label}: the target and one of the features have the same name"
            )));
        }
        if index_set.is_empty() {
            return Err(RomError::ConfigError(format!("{label}: empty index set")));
        }
        if index_set.n_dims() != features.len() {
            return Err(RomError::ConfigError(format!(
                "{label}: index set has dimension {}, but {} features {:?} are declared",
                index_set.n_dims(),
                features.len(),
                features
            )));
        }
        if design.var_names() != features.as_slice() {
            return Err(RomError::ConfigError(format!(
                "{label}: quadrature design spans {:?}, expected {:?}",
                design.var_names(),
                features
            )));
        }
        if design.is_empty() {
            return Err(RomError::ConfigError(format!(
                "{label}: quadrature design has no nodes"
            )));
        }
        if basis.var_names() != features.as_slice() {
            return Err(RomError::ConfigError(format!(
                "{label}: basis catalog spans {:?}, expected {:?}",
                basis.var_names(),
                features
            )));
        }
        let norm = basis.total_measure_norm();
        Ok(Self {
            label,
            features,
            target,
            index_set,
            design,
            basis,
            matcher: PointMatcher::default(),
            role: SurrogateRole::Standalone,
            num_runs: None,
            norm,
            coefficients: None,
        })
    }

    /// Builds basis, index set and quadrature design from a configuration.
    pub fn from_config(config: &RomConfig) -> RomResult<Self> {
        config.validate()?;
        let basis = OrthoBasis::from_config(config)?;
        let index_set = IndexSet::from_kind(
            config.index_set,
            config.n_dims(),
            config.polynomial_order,
            &config.index_points,
        )?;
        let design = build_design(&basis, config)?;
        Ok(Self::new(
            config.features.clone(),
            config.target.clone(),
            index_set,
            Arc::new(design),
            Arc::new(basis),
        )?
        .with_tolerance(config.match_tolerance))
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.matcher = PointMatcher::new(tolerance);
        self
    }

    /// Overrides the reported number of model runs.
    pub fn with_num_runs(mut self, num_runs: usize) -> Self {
        self.num_runs = Some(num_runs);
        self
    }

    pub(crate) fn into_cut(mut self, label: String) -> Self {
        self.role = SurrogateRole::Cut;
        self.label = label;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn index_set(&self) -> &IndexSet {
        &self.index_set
    }

    pub fn design(&self) -> &dyn QuadratureDesign {
        self.design.as_ref()
    }

    pub fn basis(&self) -> &dyn BasisCatalog {
        self.basis.as_ref()
    }

    pub fn role(&self) -> SurrogateRole {
        self.role
    }

    pub fn is_trained(&self) -> bool {
        self.coefficients.is_some()
    }

    pub fn num_runs(&self) -> usize {
        self.num_runs.unwrap_or_else(|| self.design.len())
    }

    pub fn coefficients(&self) -> Option<&CoefficientMap> {
        self.coefficients.as_ref()
    }

    /// Train from a named dataset.
    pub fn fit(&mut self, data: &Dataset) -> RomResult<()> {
        let (samples, targets) = data.training_matrix(&self.features, &self.target)?;
        self.fit_matrix(samples.view(), &targets.to_vec())
    }

    /// Train from a (samples x features) matrix. Every quadrature node must
    /// have a matching row; otherwise nothing is modified.
    pub fn fit_matrix(&mut self, samples: ArrayView2<'_, f64>, targets: &[f64]) -> RomResult<()> {
        if samples.nrows() != targets.len() {
            return Err(RomError::DataMismatch {
                context: self.label.clone(),
                detail: format!(
                    "{} sample rows but {} target values",
                    samples.nrows(),
                    targets.len()
                ),
            });
        }
        if samples.ncols() != self.features.len() {
            return Err(RomError::DataMismatch {
                context: self.label.clone(),
                detail: format!(
                    "samples have {} columns, expected {} features {:?}",
                    samples.ncols(),
                    self.features.len(),
                    self.features
                ),
            });
        }

        let mut node_targets = Vec::with_capacity(self.design.len());
        let mut missing = Vec::new();
        for (node, _) in design_pairs(self.design.as_ref()) {
            match self.matcher.find(samples, node) {
                Some(row) => node_targets.push(targets[row]),
                None => missing.push(node.to_vec()),
            }
        }
        if !missing.is_empty() {
            debug!(
                surrogate = %self.label,
                missing = ?missing,
                "quadrature nodes absent from training data"
            );
            return Err(RomError::MissingNodes {
                context: self.label.clone(),
                missing,
            });
        }
        if let Some(bad) = node_targets.iter().find(|v| !v.is_finite()) {
            return Err(RomError::DataMismatch {
                context: self.label.clone(),
                detail: format!("non-finite target value {bad} at a quadrature node"),
            });
        }

        let max_orders = self.index_set.max_orders();
        let mut coefficients: CoefficientMap = self
            .index_set
            .iter()
            .map(|idx| (idx.clone(), 0.0))
            .collect();
        for ((node, weight), &soln) in design_pairs(self.design.as_ref()).zip(&node_targets) {
            let table = self.basis_table(node, &max_orders);
            for (idx, coeff) in coefficients.iter_mut() {
                *coeff += soln * product_term(&table, idx) * weight;
            }
        }
        for coeff in coefficients.values_mut() {
            *coeff *= self.norm;
        }

        info!(
            surrogate = %self.label,
            terms = coefficients.len(),
            nodes = self.design.len(),
            "polynomial chaos trained"
        );
        self.coefficients = Some(coefficients);
        Ok(())
    }

    /// Expansion value at a physical point.
    pub fn evaluate(&self, point: &[f64]) -> RomResult<f64> {
        let coefficients = self.trained_coefficients()?;
        if point.len() != self.features.len() {
            return Err(RomError::DataMismatch {
                context: self.label.clone(),
                detail: format!(
                    "input dimension mismatch: expected {}, got {}",
                    self.features.len(),
                    point.len()
                ),
            });
        }
        let table = self.basis_table(point, &self.index_set.max_orders());
        Ok(coefficients
            .iter()
            .map(|(idx, c)| c * product_term(&table, idx))
            .sum())
    }

    /// Evaluate every row of a (samples x features) matrix.
    pub fn evaluate_batch(&self, samples: &Array2<f64>) -> RomResult<Array1<f64>> {
        samples
            .outer_iter()
            .map(|row| self.evaluate(&row.to_vec()))
            .collect::<RomResult<Vec<_>>>()
            .map(Array1::from_vec)
    }

    /// Evaluate the named evaluation set.
    pub fn predict(&self, data: &Dataset) -> RomResult<Array1<f64>> {
        self.evaluate_batch(&data.evaluation_matrix(&self.features)?)
    }

    /// r-th raw moment of the surrogate.
    ///
    /// r = 1 and r = 2 come straight from the coefficients (orthonormality).
    /// Higher orders evaluate the expansion on every quadrature node, so they
    /// are only as exact as the design is for polynomials of r times the
    /// expansion degree, and are unavailable for HDMR cuts.
    pub fn moment(&self, r: usize) -> RomResult<f64> {
        let coefficients = self.trained_coefficients()?;
        match r {
            0 => Ok(1.0),
            1 => Ok(coefficients
                .get(&vec![0usize; self.features.len()])
                .copied()
                .unwrap_or(0.0)),
            2 => Ok(coefficients.values().map(|c| c * c).sum()),
            _ if self.role == SurrogateRole::Cut => Err(RomError::UnsupportedMoment {
                order: r,
                context: self.label.clone(),
            }),
            _ => self.quadrature_moment(r),
        }
    }

    /// r-th raw moment integrated numerically over the quadrature design.
    pub fn quadrature_moment(&self, r: usize) -> RomResult<f64> {
        let exponent = i32::try_from(r).map_err(|_| RomError::UnsupportedMoment {
            order: r,
            context: self.label.clone(),
        })?;
        let mut total = 0.0;
        for (node, weight) in design_pairs(self.design.as_ref()) {
            total += self.evaluate(node)?.powi(exponent) * weight;
        }
        Ok(total * self.norm)
    }

    pub fn mean(&self) -> RomResult<f64> {
        self.moment(1)
    }

    pub fn variance(&self) -> RomResult<f64> {
        let mean = self.moment(1)?;
        Ok(self.moment(2)? - mean * mean)
    }

    /// First-order Sobol indices from the coefficients, one per feature.
    pub fn sobol_indices(&self) -> RomResult<Vec<f64>> {
        let coefficients = self.trained_coefficients()?;
        let n_dims = self.features.len();
        let mut first_order_var = vec![0.0; n_dims];
        let mut total_var = 0.0;

        for (alpha, c) in coefficients.iter() {
            let active: Vec<usize> = (0..n_dims).filter(|&d| alpha[d] > 0).collect();
            if active.is_empty() {
                continue;
            }
            let energy = c * c;
            total_var += energy;
            if let [only_dim] = active.as_slice() {
                first_order_var[*only_dim] += energy;
            }
        }

        if total_var <= 1e-16 {
            return Ok(vec![0.0; n_dims]);
        }
        Ok(first_order_var
            .into_iter()
            .map(|v| (v / total_var).clamp(0.0, 1.0))
            .collect())
    }

    /// Total-effect Sobol indices: share of variance in terms touching each feature.
    pub fn total_sobol_indices(&self) -> RomResult<Vec<f64>> {
        let coefficients = self.trained_coefficients()?;
        let n_dims = self.features.len();
        let mut touching = vec![0.0; n_dims];
        let mut total_var = 0.0;
        for (alpha, c) in coefficients.iter() {
            if alpha.iter().all(|&a| a == 0) {
                continue;
            }
            let energy = c * c;
            total_var += energy;
            for d in 0..n_dims {
                if alpha[d] > 0 {
                    touching[d] += energy;
                }
            }
        }
        if total_var <= 1e-16 {
            return Ok(vec![0.0; n_dims]);
        }
        Ok(touching
            .into_iter()
            .map(|v| (v / total_var).clamp(0.0, 1.0))
            .collect())
    }

    /// Coefficients with magnitude above `tol`, ordered by multi-index.
    pub fn nonzero_coefficients(&self, tol: f64) -> RomResult<Vec<(MultiIndex, f64)>> {
        Ok(self
            .trained_coefficients()?
            .iter()
            .filter(|(_, c)| c.abs() > tol)
            .map(|(idx, c)| (idx.clone(), *c))
            .collect())
    }

    /// Dump the significant coefficients at debug level.
    pub fn log_coefficients(&self) {
        let Some(coefficients) = self.coefficients.as_ref() else {
            debug!(surrogate = %self.label, "no coefficients: not trained");
            return;
        };
        for (idx, c) in coefficients.iter().filter(|(_, c)| c.abs() > 1e-12) {
            debug!(surrogate = %self.label, index = ?idx, coefficient = *c);
        }
    }

    /// Drop the coefficients; index set, design and basis are kept.
    pub fn reset(&mut self) {
        self.coefficients = None;
    }

    fn trained_coefficients(&self) -> RomResult<&CoefficientMap> {
        self.coefficients
            .as_ref()
            .ok_or_else(|| RomError::NotTrained(self.label.clone()))
    }

    /// table[d][o] = p_o(s_d(x_d)) for o up to the highest order used in d.
    fn basis_table(&self, point: &[f64], max_orders: &[usize]) -> Vec<Vec<f64>> {
        point
            .iter()
            .enumerate()
            .map(|(d, &x)| {
                let s = self.basis.standardize(d, x);
                (0..=max_orders[d])
                    .map(|o| self.basis.polynomial_value(d, o, s))
                    .collect()
            })
            .collect()
    }
}

fn product_term(table: &[Vec<f64>], idx: &[usize]) -> f64 {
    idx.iter()
        .enumerate()
        .fold(1.0, |acc, (d, &o)| acc * table[d][o])
}

/// Quadrature design described by a configuration over the given basis.
pub(crate) fn build_design(basis: &OrthoBasis, config: &RomConfig) -> RomResult<SparseGrid> {
    let level = config.grid_level();
    match config.sparse_grid.kind {
        GridKind::Tensor => SparseGrid::tensor_level(basis, level),
        GridKind::Smolyak => {
            let kind = match config.index_set {
                IndexSetKind::Custom => IndexSetKind::TotalDegree,
                other => other,
            };
            let levels = IndexSet::from_kind(kind, basis.n_dims(), level, &[])?;
            SparseGrid::smolyak(basis, &levels)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rom_math::basis::VariableBasis;
    use rom_math::distribution::Distribution;

    fn unit_basis(names: &[&str]) -> OrthoBasis {
        OrthoBasis::new(
            names
                .iter()
                .map(|n| {
                    VariableBasis::new(
                        *n,
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

    fn bilinear(x: &[f64]) -> f64 {
        3.0 + 2.0 * x[0] - x[1] + x[0] * x[1]
    }

    fn trained_bilinear() -> PolynomialChaos {
        let basis = unit_basis(&["x1", "x2"]);
        let grid = SparseGrid::tensor_level(&basis, 1).unwrap();
        let rows: Vec<Vec<f64>> = grid.points().to_vec();
        let targets: Vec<f64> = rows.iter().map(|r| bilinear(r)).collect();
        let features = vec!["x1".to_string(), "x2".to_string()];
        let mut pce = PolynomialChaos::new(
            features.clone(),
            "y",
            IndexSet::custom(2, &[vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]).unwrap(),
            Arc::new(grid),
            Arc::new(basis),
        )
        .unwrap();
        let data = Dataset::from_rows(&features, "y", &rows, &targets).unwrap();
        pce.fit(&data).unwrap();
        pce
    }

    #[test]
    fn test_bilinear_scenario() {
        let pce = trained_bilinear();
        assert!((pce.mean().unwrap() - 3.0).abs() < 1e-12);
        assert!((pce.evaluate(&[0.0, 0.0]).unwrap() - 3.0).abs() < 1e-12);
        assert!((pce.evaluate(&[1.0, 1.0]).unwrap() - 5.0).abs() < 1e-12);
        // Var = 4/3 + 1/3 + 1/9 for independent U(-1, 1) inputs.
        let expected_var = 4.0 / 3.0 + 1.0 / 3.0 + 1.0 / 9.0;
        assert!((pce.variance().unwrap() - expected_var).abs() < 1e-12);
    }

    #[test]
    fn test_index_set_dimension_mismatch_is_config_error() {
        let basis = unit_basis(&["x1", "x2"]);
        let grid = SparseGrid::tensor_level(&basis, 1).unwrap();
        let err = PolynomialChaos::new(
            vec!["x1".to_string(), "x2".to_string()],
            "y",
            IndexSet::total_degree(3, 1),
            Arc::new(grid),
            Arc::new(basis),
        )
        .unwrap_err();
        match err {
            RomError::ConfigError(msg) => assert!(msg.contains("dimension 3")),
            other => panic!("Expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_design_variable_order_checked() {
        let basis = unit_basis(&["x2", "x1"]);
        let grid = SparseGrid::tensor_level(&basis, 1).unwrap();
        let res = PolynomialChaos::new(
            vec!["x1".to_string(), "x2".to_string()],
            "y",
            IndexSet::total_degree(2, 1),
            Arc::new(grid),
            Arc::new(unit_basis(&["x1", "x2"])),
        );
        assert!(matches!(res, Err(RomError::ConfigError(_))));
    }

    #[test]
    fn test_evaluate_before_training() {
        let mut pce = trained_bilinear();
        pce.reset();
        assert!(!pce.is_trained());
        match pce.evaluate(&[0.0, 0.0]).unwrap_err() {
            RomError::NotTrained(label) => assert_eq!(label, "pce(y)"),
            other => panic!("Expected NotTrained, got {other:?}"),
        }
        assert!(matches!(pce.moment(1), Err(RomError::NotTrained(_))));
    }

    #[test]
    fn test_evaluate_rejects_dimension_mismatch() {
        let pce = trained_bilinear();
        match pce.evaluate(&[0.1, 0.2, 0.3]).unwrap_err() {
            RomError::DataMismatch { detail, .. } => {
                assert!(detail.contains("dimension mismatch"))
            }
            other => panic!("Expected DataMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_node_leaves_coefficients_untouched() {
        let mut pce = trained_bilinear();
        let before = pce.coefficients().cloned();
        let rows: Vec<Vec<f64>> = design_pairs(pce.design()).skip(1).map(|(x, _)| x.to_vec()).collect();
        let targets: Vec<f64> = rows.iter().map(|r| bilinear(r)).collect();
        let data = Dataset::from_rows(pce.features(), "y", &rows, &targets).unwrap();
        match pce.fit(&data).unwrap_err() {
            RomError::MissingNodes { context, missing } => {
                assert_eq!(context, "pce(y)");
                assert_eq!(missing.len(), 1);
            }
            other => panic!("Expected MissingNodes, got {other:?}"),
        }
        assert_eq!(pce.coefficients().cloned(), before);
    }

    #[test]
    fn test_reset_then_refit_is_identical() {
        let mut pce = trained_bilinear();
        let first = pce.coefficients().cloned().unwrap();
        let rows: Vec<Vec<f64>> = design_pairs(pce.design()).map(|(x, _)| x.to_vec()).collect();
        let targets: Vec<f64> = rows.iter().map(|r| bilinear(r)).collect();
        let data = Dataset::from_rows(pce.features(), "y", &rows, &targets).unwrap();
        pce.reset();
        pce.fit(&data).unwrap();
        assert_eq!(pce.coefficients().unwrap(), &first);
    }

    #[test]
    fn test_sobol_indices_bilinear() {
        let pce = trained_bilinear();
        let s = pce.sobol_indices().unwrap();
        let total = 4.0 / 3.0 + 1.0 / 3.0 + 1.0 / 9.0;
        assert!((s[0] - (4.0 / 3.0) / total).abs() < 1e-12);
        assert!((s[1] - (1.0 / 3.0) / total).abs() < 1e-12);
        let st = pce.total_sobol_indices().unwrap();
        assert!((st[0] - (4.0 / 3.0 + 1.0 / 9.0) / total).abs() < 1e-12);
    }

    #[test]
    fn test_nonzero_coefficients() {
        let pce = trained_bilinear();
        let nz = pce.nonzero_coefficients(1e-12).unwrap();
        assert_eq!(nz.len(), 4);
        assert_eq!(nz[0].0, vec![0, 0]);
        assert!((nz[0].1 - 3.0).abs() < 1e-12);
    }

    fn cubic(x: &[f64]) -> f64 {
        0.5 - x[0] + 2.0 * x[1] * x[1] + x[0] * x[1] * x[2] - 0.25 * x[2].powi(3)
    }

    fn trained_cubic() -> PolynomialChaos {
        let basis = unit_basis(&["a", "b", "c"]);
        let grid = SparseGrid::tensor_level(&basis, 3).unwrap();
        let mut pce = PolynomialChaos::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            "y",
            IndexSet::total_degree(3, 3),
            Arc::new(grid),
            Arc::new(basis),
        )
        .unwrap();
        let rows: Vec<Vec<f64>> = design_pairs(pce.design()).map(|(x, _)| x.to_vec()).collect();
        let targets: Vec<f64> = rows.iter().map(|r| cubic(r)).collect();
        let data = Dataset::from_rows(pce.features(), "y", &rows, &targets).unwrap();
        pce.fit(&data).unwrap();
        pce
    }

    #[test]
    fn test_exact_recovery_off_nodes() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let pce = trained_cubic();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let x: Vec<f64> = (0..3).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let err = (pce.evaluate(&x).unwrap() - cubic(&x)).abs();
            assert!(err < 1e-12, "error {err} at {x:?}");
        }
    }

    #[test]
    fn test_moment_paths_agree() {
        let pce = trained_cubic();
        let mean = pce.mean().unwrap();
        let from_coefficients = pce.variance().unwrap();
        let from_quadrature = pce.quadrature_moment(2).unwrap() - mean * mean;
        assert!(
            (from_coefficients - from_quadrature).abs() < 1e-12 * from_coefficients.max(1.0),
            "{from_coefficients} vs {from_quadrature}"
        );
        assert!((pce.quadrature_moment(1).unwrap() - mean).abs() < 1e-12);
        // Standalone expansions fall back to quadrature above order 2.
        assert!(pce.moment(3).unwrap().is_finite());
        assert_eq!(pce.moment(0).unwrap(), 1.0);
    }

    #[test]
    fn test_cut_role_rejects_high_moments() {
        let pce = trained_cubic().into_cut("cut".to_string());
        match pce.moment(3).unwrap_err() {
            RomError::UnsupportedMoment { order, context } => {
                assert_eq!(order, 3);
                assert_eq!(context, "cut");
            }
            other => panic!("Expected UnsupportedMoment, got {other:?}"),
        }
    }

    #[test]
    fn test_moment_order_beyond_exponent_range() {
        let pce = trained_cubic();
        assert!(matches!(
            pce.moment(usize::MAX),
            Err(RomError::UnsupportedMoment { order: usize::MAX, .. })
        ));
        assert!(matches!(
            pce.quadrature_moment(i32::MAX as usize + 1),
            Err(RomError::UnsupportedMoment { .. })
        ));
    }

    #[test]
    fn test_normal_input_with_hermite_basis() {
        let basis = OrthoBasis::new(vec![VariableBasis::new(
            "b",
            Distribution::Normal { mean: 1.0, std: 0.5 },
        )])
        .unwrap();
        let grid = SparseGrid::tensor_level(&basis, 2).unwrap();
        let mut pce = PolynomialChaos::new(
            vec!["b".to_string()],
            "y",
            IndexSet::total_degree(1, 2),
            Arc::new(grid),
            Arc::new(basis),
        )
        .unwrap();
        let f = |b: f64| 1.0 + b + b * b;
        let rows: Vec<Vec<f64>> = design_pairs(pce.design()).map(|(x, _)| x.to_vec()).collect();
        let targets: Vec<f64> = rows.iter().map(|r| f(r[0])).collect();
        let data = Dataset::from_rows(pce.features(), "y", &rows, &targets).unwrap();
        pce.fit(&data).unwrap();
        // f = 3 + 1.5 z + 0.25 z^2 with z standard normal.
        assert!((pce.mean().unwrap() - 3.25).abs() < 1e-12);
        assert!((pce.variance().unwrap() - 2.375).abs() < 1e-12);
        assert!((pce.evaluate(&[2.7]).unwrap() - f(2.7)).abs() < 1e-12);

        use rand::rngs::StdRng;
        use rand::SeedableRng;
        use rand_distr::{Distribution as _, Normal};
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Normal::new(1.0, 0.5).unwrap();
        for _ in 0..20 {
            let b = normal.sample(&mut rng);
            assert!((pce.evaluate(&[b]).unwrap() - f(b)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_num_runs_defaults_to_design_size() {
        let pce = trained_bilinear();
        assert_eq!(pce.num_runs(), 4);
        assert_eq!(pce.with_num_runs(9).num_runs(), 9);
    }
}
