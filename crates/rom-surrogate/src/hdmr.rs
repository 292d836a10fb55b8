// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Cut-HDMR Decomposition
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cut High-Dimensional Model Representation over polynomial chaos cuts.
//!
//! Every combo (ordered, non-empty subset of the features) owns a
//! [`PolynomialChaos`] trained with the excluded variables pinned at their
//! reference values. The unique contribution of a combo c is
//!   f_c = f(x_c; ref) - f_ref - sum_{d proper subset of c} f_d,
//! evaluated in ascending cardinality so every f_d is known before f_c.
//! The same correction applied to sub-surrogate moments yields the mean,
//! variance and per-combo Sobol contributions of the decomposition.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, OnceLock};

use ndarray::{Array1, Array2, ArrayView2};
use rayon::prelude::*;
use rom_math::basis::OrthoBasis;
use rom_math::design::design_pairs;
use rom_math::index_set::IndexSet;
use rom_types::config::{IndexSetKind, RomConfig};
use rom_types::error::{RomError, RomResult};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::matching::PointMatcher;
use crate::pce::{build_design, PolynomialChaos};

/// Ordered subset of feature names.
pub type Combo = Vec<String>;

/// Sensitivities normalised by a benchmark variance.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentSensitivities {
    pub fractions: BTreeMap<Combo, f64>,
    /// Sum of all fractions; 1 when the benchmark is the computed variance.
    pub total_fraction: f64,
    /// Sum of the per-combo contributions, whatever the benchmark.
    pub total_variance: f64,
}

#[derive(Debug, Clone)]
pub struct HdmrDecomposition {
    features: Vec<String>,
    target: String,
    references: Vec<f64>,
    combos: BTreeMap<Combo, PolynomialChaos>,
    /// Feature positions of each combo's variables.
    positions: BTreeMap<Combo, Vec<usize>>,
    /// levels[k] holds the combos of cardinality k + 1, filled by training.
    levels: Vec<Vec<Combo>>,
    ref_soln: Option<f64>,
    matcher: PointMatcher,
    parallel: bool,
    mean_cache: OnceLock<f64>,
    variance_cache: OnceLock<f64>,
    sensitivity_cache: OnceLock<BTreeMap<Combo, f64>>,
}

impl HdmrDecomposition {
    pub fn new(
        features: Vec<String>,
        target: impl Into<String>,
        references: Vec<f64>,
    ) -> RomResult<Self> {
        let target = target.into();
        if features.is_empty() {
            return Err(RomError::ConfigError(
                "HDMR: feature names not provided".to_string(),
            ));
        }
        if references.len() != features.len() {
            return Err(RomError::ConfigError(format!(
                "HDMR: {} reference values for {} features {:?}",
                references.len(),
                features.len(),
                features
            )));
        }
        if let Some(bad) = references.iter().find(|r| !r.is_finite()) {
            return Err(RomError::ConfigError(format!(
                "HDMR: reference values must be finite, got {bad}"
            )));
        }
        let mut seen = HashSet::new();
        for f in &features {
            if !seen.insert(f.as_str()) {
                return Err(RomError::ConfigError(format!(
                    "HDMR: feature '{f}' declared more than once"
                )));
            }
        }
        if seen.contains(target.as_str()) {
            return Err(RomError::ConfigError(format!(
                "HDMR: the target and one of the features have the same name '{target}'"
            )));
        }
        Ok(Self {
            features,
            target,
            references,
            combos: BTreeMap::new(),
            positions: BTreeMap::new(),
            levels: Vec::new(),
            ref_soln: None,
            matcher: PointMatcher::default(),
            parallel: false,
            mean_cache: OnceLock::new(),
            variance_cache: OnceLock::new(),
            sensitivity_cache: OnceLock::new(),
        })
    }

    /// Decomposition with every combo up to `sobol_order`, each on its own
    /// sub-basis, index set and quadrature design.
    pub fn from_config(config: &RomConfig) -> RomResult<Self> {
        config.validate()?;
        let sobol_order = config.sobol_order.ok_or_else(|| {
            RomError::ConfigError("HDMR requires 'sobol_order'".to_string())
        })?;
        if sobol_order == 0 || sobol_order > config.n_dims() {
            return Err(RomError::ConfigError(format!(
                "HDMR: sobol_order must be in 1..={}, got {sobol_order}",
                config.n_dims()
            )));
        }
        if config.index_set == IndexSetKind::Custom {
            return Err(RomError::ConfigError(
                "HDMR: a custom index set cannot be shared across combos of different size"
                    .to_string(),
            ));
        }

        let basis = OrthoBasis::from_config(config)?;
        let mut hdmr = Self::new(
            config.features.clone(),
            config.target.clone(),
            basis.reference_point(),
        )?
        .with_tolerance(config.match_tolerance)
        .with_parallel(config.parallel_training);

        for k in 1..=sobol_order {
            for picks in combinations(config.n_dims(), k) {
                let combo: Combo = picks.iter().map(|&i| config.features[i].clone()).collect();
                let sub_basis = basis.subset(&combo)?;
                let index_set =
                    IndexSet::from_kind(config.index_set, k, config.polynomial_order, &[])?;
                let design = build_design(&sub_basis, config)?;
                let pce = PolynomialChaos::new(
                    combo,
                    config.target.clone(),
                    index_set,
                    Arc::new(design),
                    Arc::new(sub_basis),
                )?;
                hdmr.register(pce)?;
            }
        }
        info!(
            target_name = %hdmr.target,
            combos = hdmr.combos.len(),
            sobol_order,
            "HDMR decomposition configured"
        );
        Ok(hdmr)
    }

    /// Tolerance for node and reference lookups; also applied to every
    /// registered sub-surrogate.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.matcher = PointMatcher::new(tolerance);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Adds the sub-surrogate for its feature subset. The subset must follow
    /// the decomposition's feature order and must not already be registered.
    /// Any previous training is dropped; the decomposition must be retrained.
    pub fn register(&mut self, pce: PolynomialChaos) -> RomResult<()> {
        let combo: Combo = pce.features().to_vec();
        if pce.target() != self.target {
            return Err(RomError::ConfigError(format!(
                "HDMR: combo {combo:?} predicts '{}', decomposition predicts '{}'",
                pce.target(),
                self.target
            )));
        }
        let mut positions = Vec::with_capacity(combo.len());
        for name in &combo {
            let pos = self.features.iter().position(|f| f == name).ok_or_else(|| {
                RomError::ConfigError(format!(
                    "HDMR: combo {combo:?} uses unknown variable '{name}'"
                ))
            })?;
            positions.push(pos);
        }
        if positions.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RomError::ConfigError(format!(
                "HDMR: combo {combo:?} must list distinct variables in feature order {:?}",
                self.features
            )));
        }
        if self.combos.contains_key(&combo) {
            return Err(RomError::ConfigError(format!(
                "HDMR: combo {combo:?} registered twice"
            )));
        }

        let label = format!("pce({}) combo {:?}", self.target, combo);
        let mut pce = pce
            .with_tolerance(self.matcher.tolerance)
            .into_cut(label);
        pce.reset();
        self.positions.insert(combo.clone(), positions);
        self.combos.insert(combo, pce);
        self.reset();
        Ok(())
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn references(&self) -> &[f64] {
        &self.references
    }

    pub fn combos(&self) -> impl Iterator<Item = &Combo> {
        self.combos.keys()
    }

    pub fn sub_surrogate(&self, combo: &[String]) -> Option<&PolynomialChaos> {
        self.combos.get(combo)
    }

    /// Highest registered combo cardinality.
    pub fn max_level(&self) -> usize {
        self.combos.keys().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_trained(&self) -> bool {
        self.ref_soln.is_some()
    }

    pub fn reference_solution(&self) -> Option<f64> {
        self.ref_soln
    }

    /// Full-dimensional point with the combo's coordinates taken from
    /// `node` and the rest at their reference values.
    pub fn fill_with_reference(&self, combo: &[String], node: &[f64]) -> RomResult<Vec<f64>> {
        let positions = self.positions.get(combo).ok_or_else(|| {
            RomError::ConfigError(format!("HDMR: combo {combo:?} is not registered"))
        })?;
        if node.len() != positions.len() {
            return Err(RomError::DataMismatch {
                context: format!("HDMR combo {combo:?}"),
                detail: format!("node has {} coordinates, expected {}", node.len(), positions.len()),
            });
        }
        let mut point = self.references.clone();
        for (&pos, &x) in positions.iter().zip(node) {
            point[pos] = x;
        }
        Ok(point)
    }

    /// Points a training set must contain: the reference point first, then
    /// every combo's cut points, without duplicates.
    pub fn required_points(&self) -> RomResult<Vec<Vec<f64>>> {
        let mut out = vec![self.references.clone()];
        for (combo, pce) in &self.combos {
            for (node, _) in design_pairs(pce.design()) {
                let point = self.fill_with_reference(combo, node)?;
                if !out.iter().any(|p| self.matcher.coincide(p, &point)) {
                    out.push(point);
                }
            }
        }
        Ok(out)
    }

    /// Train every combo from a named dataset.
    pub fn train(&mut self, data: &Dataset) -> RomResult<()> {
        let (samples, targets) = data.training_matrix(&self.features, &self.target)?;
        self.train_matrix(samples.view(), &targets.to_vec())
    }

    /// Train every combo from full-dimensional samples. On failure the
    /// previous state is kept.
    pub fn train_matrix(&mut self, samples: ArrayView2<'_, f64>, targets: &[f64]) -> RomResult<()> {
        if samples.nrows() != targets.len() || samples.ncols() != self.features.len() {
            return Err(RomError::DataMismatch {
                context: format!("HDMR({})", self.target),
                detail: format!(
                    "samples are {}x{} with {} targets, expected {} feature columns",
                    samples.nrows(),
                    samples.ncols(),
                    targets.len(),
                    self.features.len()
                ),
            });
        }
        if self.combos.is_empty() {
            return Err(RomError::ConfigError(
                "HDMR: no combos registered".to_string(),
            ));
        }
        self.check_subset_closed()?;

        let ref_row = self
            .matcher
            .find(samples, &self.references)
            .ok_or_else(|| RomError::MissingReferencePoint {
                point: self.references.clone(),
            })?;
        let ref_soln = targets[ref_row];

        let mut jobs = Vec::with_capacity(self.combos.len());
        for (combo, pce) in &self.combos {
            let (slice, slice_targets) = self.cut_slice(combo, pce, samples, targets)?;
            jobs.push((combo.clone(), pce.clone(), slice, slice_targets));
        }

        debug!(
            combos = jobs.len(),
            parallel = self.parallel,
            ref_soln,
            "training HDMR sub-surrogates"
        );
        let fit = |(combo, mut pce, slice, slice_targets): (Combo, PolynomialChaos, Array2<f64>, Vec<f64>)| {
            pce.reset();
            pce.fit_matrix(slice.view(), &slice_targets).map(|()| (combo, pce))
        };
        let trained: Vec<RomResult<(Combo, PolynomialChaos)>> = if self.parallel {
            jobs.into_par_iter().map(fit).collect()
        } else {
            jobs.into_iter().map(fit).collect()
        };
        let trained = trained.into_iter().collect::<RomResult<BTreeMap<_, _>>>()?;

        let mut levels: Vec<Vec<Combo>> = vec![Vec::new(); self.max_level()];
        for combo in trained.keys() {
            levels[combo.len() - 1].push(combo.clone());
        }

        self.combos = trained;
        self.levels = levels;
        self.ref_soln = Some(ref_soln);
        self.invalidate();
        info!(
            target_name = %self.target,
            combos = self.combos.len(),
            ref_soln,
            "HDMR decomposition trained"
        );
        Ok(())
    }

    /// Drop all training results; registrations stay.
    pub fn reset(&mut self) {
        for pce in self.combos.values_mut() {
            pce.reset();
        }
        self.levels.clear();
        self.ref_soln = None;
        self.invalidate();
    }

    /// refSoln plus the corrected contribution of every combo at `point`.
    pub fn evaluate(&self, point: &[f64]) -> RomResult<f64> {
        let ref_soln = self.trained_ref()?;
        if point.len() != self.features.len() {
            return Err(RomError::DataMismatch {
                context: format!("HDMR({})", self.target),
                detail: format!(
                    "input dimension mismatch: expected {}, got {}",
                    self.features.len(),
                    point.len()
                ),
            });
        }
        let contributions = self.corrected(self.max_level(), |combo, pce| {
            let cut: Vec<f64> = self.positions[combo].iter().map(|&p| point[p]).collect();
            Ok(pce.evaluate(&cut)? - ref_soln)
        })?;
        Ok(ref_soln + contributions.iter().map(|(_, v)| v).sum::<f64>())
    }

    pub fn evaluate_batch(&self, samples: &Array2<f64>) -> RomResult<Array1<f64>> {
        samples
            .outer_iter()
            .map(|row| self.evaluate(&row.to_vec()))
            .collect::<RomResult<Vec<_>>>()
            .map(Array1::from_vec)
    }

    pub fn predict(&self, data: &Dataset) -> RomResult<Array1<f64>> {
        self.evaluate_batch(&data.evaluation_matrix(&self.features)?)
    }

    pub fn mean(&self) -> RomResult<f64> {
        if let Some(&m) = self.mean_cache.get() {
            return Ok(m);
        }
        let ref_soln = self.trained_ref()?;
        let contributions =
            self.corrected(self.max_level(), |_, pce| Ok(pce.moment(1)? - ref_soln))?;
        let mean = ref_soln + contributions.iter().map(|(_, v)| v).sum::<f64>();
        Ok(*self.mean_cache.get_or_init(|| mean))
    }

    pub fn variance(&self) -> RomResult<f64> {
        if let Some(&v) = self.variance_cache.get() {
            return Ok(v);
        }
        let variance = self.sensitivities(None)?.values().sum::<f64>();
        Ok(*self.variance_cache.get_or_init(|| variance))
    }

    /// Raw moments up to order 2; higher orders have no decomposed form.
    pub fn moment(&self, r: usize) -> RomResult<f64> {
        match r {
            0 => {
                self.trained_ref()?;
                Ok(1.0)
            }
            1 => self.mean(),
            2 => {
                let mean = self.mean()?;
                Ok(self.variance()? + mean * mean)
            }
            _ => Err(RomError::UnsupportedMoment {
                order: r,
                context: format!("HDMR decomposition of '{}'", self.target),
            }),
        }
    }

    /// Corrected variance contribution of every combo with cardinality up to
    /// `max_level` (default: all registered).
    pub fn sensitivities(&self, max_level: Option<usize>) -> RomResult<BTreeMap<Combo, f64>> {
        self.trained_ref()?;
        let top = self.max_level();
        let level = max_level.unwrap_or(top);
        if level > top {
            return Err(RomError::ConfigError(format!(
                "HDMR: sensitivity level {level} requested, highest registered combo order is {top}"
            )));
        }
        if level == top {
            if let Some(cached) = self.sensitivity_cache.get() {
                return Ok(cached.clone());
            }
        }
        let contributions = self.corrected(level, |_, pce| pce.variance())?;
        let table: BTreeMap<Combo, f64> = contributions.into_iter().collect();
        if level == top {
            return Ok(self.sensitivity_cache.get_or_init(|| table).clone());
        }
        Ok(table)
    }

    /// Sensitivities as fractions of `benchmark`, or of the computed
    /// variance when none is given.
    pub fn percent_sensitivities(&self, benchmark: Option<f64>) -> RomResult<PercentSensitivities> {
        let sensitivities = self.sensitivities(None)?;
        let total_variance: f64 = sensitivities.values().sum();
        let normalizer = match benchmark {
            Some(b) => {
                if !b.is_finite() || b <= 0.0 {
                    return Err(RomError::ConfigError(format!(
                        "HDMR: benchmark variance must be positive and finite, got {b}"
                    )));
                }
                b
            }
            None => {
                if !total_variance.is_finite() || total_variance <= 0.0 {
                    return Err(RomError::ConfigError(format!(
                        "HDMR: cannot normalise sensitivities by computed variance {total_variance}"
                    )));
                }
                total_variance
            }
        };
        let fractions: BTreeMap<Combo, f64> = sensitivities
            .into_iter()
            .map(|(c, s)| (c, s / normalizer))
            .collect();
        let total_fraction = fractions.values().sum();
        Ok(PercentSensitivities {
            fractions,
            total_fraction,
            total_variance,
        })
    }

    /// Applies the inclusion-exclusion pass to a per-combo quantity, combos
    /// of cardinality above `max_level` excluded. Output is in processing order.
    fn corrected<F>(&self, max_level: usize, raw: F) -> RomResult<Vec<(Combo, f64)>>
    where
        F: Fn(&Combo, &PolynomialChaos) -> RomResult<f64>,
    {
        let mut done: Vec<(Combo, f64)> = Vec::with_capacity(self.combos.len());
        for combo in self.levels.iter().take(max_level).flatten() {
            let pce = &self.combos[combo];
            let mut value = raw(combo, pce)?;
            for (sub, sub_value) in &done {
                if sub.len() < combo.len() && sub.iter().all(|v| combo.contains(v)) {
                    value -= sub_value;
                }
            }
            done.push((combo.clone(), value));
        }
        Ok(done)
    }

    /// Node matrix and targets of one combo, looked up in the full samples.
    fn cut_slice(
        &self,
        combo: &Combo,
        pce: &PolynomialChaos,
        samples: ArrayView2<'_, f64>,
        targets: &[f64],
    ) -> RomResult<(Array2<f64>, Vec<f64>)> {
        let n_nodes = pce.design().len();
        let mut slice = Array2::zeros((n_nodes, combo.len()));
        let mut slice_targets = Vec::with_capacity(n_nodes);
        let mut missing = Vec::new();
        for (i, (node, _)) in design_pairs(pce.design()).enumerate() {
            let full = self.fill_with_reference(combo, node)?;
            match self.matcher.find(samples, &full) {
                Some(row) => {
                    slice.row_mut(i).assign(&ndarray::ArrayView1::from(node));
                    slice_targets.push(targets[row]);
                }
                None => missing.push(full),
            }
        }
        if !missing.is_empty() {
            return Err(RomError::MissingNodes {
                context: format!("HDMR combo {combo:?}"),
                missing,
            });
        }
        Ok((slice, slice_targets))
    }

    /// Every non-empty proper subset of a registered combo must be registered.
    fn check_subset_closed(&self) -> RomResult<()> {
        for combo in self.combos.keys().filter(|c| c.len() > 1) {
            for drop in 0..combo.len() {
                let mut sub = combo.clone();
                sub.remove(drop);
                if !self.combos.contains_key(&sub) {
                    return Err(RomError::ConfigError(format!(
                        "HDMR: combo {combo:?} registered without its subset {sub:?}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn trained_ref(&self) -> RomResult<f64> {
        self.ref_soln
            .ok_or_else(|| RomError::NotTrained(format!("HDMR({})", self.target)))
    }

    fn invalidate(&mut self) {
        self.mean_cache = OnceLock::new();
        self.variance_cache = OnceLock::new();
        self.sensitivity_cache = OnceLock::new();
    }
}

/// k-subsets of 0..n in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn recurse(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            recurse(i + 1, n, k, current, out);
            current.pop();
        }
    }
    let mut out = Vec::new();
    recurse(0, n, k, &mut Vec::with_capacity(k), &mut out);
    out
}
