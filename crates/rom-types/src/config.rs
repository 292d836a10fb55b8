// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{RomError, RomResult};

/// Top-level surrogate configuration.
/// One JSON document describes either a standalone polynomial chaos ROM or,
/// when `sobol_order` is present, a Cut-HDMR decomposition of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RomConfig {
    pub features: Vec<String>,
    pub target: String,
    #[serde(default)]
    pub index_set: IndexSetKind,
    /// Explicit multi-indices, only read when `index_set` is `custom`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_points: Vec<Vec<usize>>,
    pub polynomial_order: usize,
    pub interpolation: BTreeMap<String, InterpolationConfig>,
    #[serde(default)]
    pub sparse_grid: SparseGridConfig,
    /// Depth of the HDMR expansion. Absent for a plain PCE.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sobol_order: Option<usize>,
    #[serde(default = "default_match_tolerance")]
    pub match_tolerance: f64,
    #[serde(default)]
    pub parallel_training: bool,
}

/// How the polynomial index set is enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexSetKind {
    TensorProduct,
    #[default]
    TotalDegree,
    HyperbolicCross,
    Custom,
}

/// Per-variable input description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    pub distribution: DistributionSpec,
    /// Overrides the distribution's natural polynomial family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polynomial: Option<PolynomialKind>,
    /// Cut value used by HDMR. Defaults to the distribution's centre.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionSpec {
    Uniform { lower: f64, upper: f64 },
    Normal { mean: f64, std: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolynomialKind {
    Legendre,
    Hermite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridKind {
    #[default]
    Smolyak,
    Tensor,
}

/// Quadrature design construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SparseGridConfig {
    #[serde(default)]
    pub kind: GridKind,
    /// Smolyak level (defaults to `polynomial_order`) or, for a tensor grid,
    /// the number of points per dimension minus one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
}

fn default_match_tolerance() -> f64 {
    1e-10
}

impl DistributionSpec {
    pub fn validate(&self, name: &str) -> RomResult<()> {
        match *self {
            DistributionSpec::Uniform { lower, upper } => {
                if !lower.is_finite() || !upper.is_finite() || lower >= upper {
                    return Err(RomError::ConfigError(format!(
                        "variable '{name}': uniform bounds must be finite with lower < upper, got [{lower}, {upper}]"
                    )));
                }
            }
            DistributionSpec::Normal { mean, std } => {
                if !mean.is_finite() || !std.is_finite() || std <= 0.0 {
                    return Err(RomError::ConfigError(format!(
                        "variable '{name}': normal distribution needs finite mean and std > 0, got N({mean}, {std})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Centre of the distribution, the default HDMR cut value.
    pub fn centre(&self) -> f64 {
        match *self {
            DistributionSpec::Uniform { lower, upper } => 0.5 * (lower + upper),
            DistributionSpec::Normal { mean, .. } => mean,
        }
    }
}

impl InterpolationConfig {
    pub fn reference_value(&self) -> f64 {
        self.reference.unwrap_or_else(|| self.distribution.centre())
    }
}

impl RomConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> RomResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> RomResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> RomResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn n_dims(&self) -> usize {
        self.features.len()
    }

    /// Effective sparse-grid level.
    pub fn grid_level(&self) -> usize {
        self.sparse_grid.level.unwrap_or(self.polynomial_order)
    }

    /// Reference (cut) values in feature order.
    pub fn reference_point(&self) -> RomResult<Vec<f64>> {
        self.features
            .iter()
            .map(|name| {
                self.interpolation
                    .get(name)
                    .map(InterpolationConfig::reference_value)
                    .ok_or_else(|| {
                        RomError::ConfigError(format!(
                            "no interpolation entry for feature '{name}'"
                        ))
                    })
            })
            .collect()
    }

    pub fn validate(&self) -> RomResult<()> {
        if self.features.is_empty() {
            return Err(RomError::ConfigError(
                "feature names not provided".to_string(),
            ));
        }
        if self.target.is_empty() {
            return Err(RomError::ConfigError("target name not provided".to_string()));
        }
        let mut seen = HashSet::new();
        for name in &self.features {
            if !seen.insert(name.as_str()) {
                return Err(RomError::ConfigError(format!(
                    "feature '{name}' is declared more than once"
                )));
            }
        }
        if seen.contains(self.target.as_str()) {
            return Err(RomError::ConfigError(format!(
                "the target and one of the features have the same name '{}'",
                self.target
            )));
        }
        if self.polynomial_order < 1 {
            return Err(RomError::ConfigError(
                "polynomial order cannot be less than 1".to_string(),
            ));
        }
        for name in &self.features {
            let Some(interp) = self.interpolation.get(name) else {
                return Err(RomError::ConfigError(format!(
                    "no interpolation entry for feature '{name}'"
                )));
            };
            interp.distribution.validate(name)?;
            if let Some(r) = interp.reference {
                if !r.is_finite() {
                    return Err(RomError::ConfigError(format!(
                        "variable '{name}': reference value must be finite, got {r}"
                    )));
                }
            }
        }
        for name in self.interpolation.keys() {
            if !seen.contains(name.as_str()) {
                return Err(RomError::ConfigError(format!(
                    "interpolation entry '{name}' does not name a feature"
                )));
            }
        }
        if self.index_set == IndexSetKind::Custom {
            if self.index_points.is_empty() {
                return Err(RomError::ConfigError(
                    "custom index set requires index_points".to_string(),
                ));
            }
            if let Some(bad) = self
                .index_points
                .iter()
                .find(|p| p.len() != self.features.len())
            {
                return Err(RomError::ConfigError(format!(
                    "custom index point {bad:?} has {} entries, expected {}",
                    bad.len(),
                    self.features.len()
                )));
            }
        }
        if let Some(order) = self.sobol_order {
            if order < 1 || order > self.features.len() {
                return Err(RomError::ConfigError(format!(
                    "sobol_order must lie in 1..={}, got {order}",
                    self.features.len()
                )));
            }
        }
        if !self.match_tolerance.is_finite() || self.match_tolerance < 0.0 {
            return Err(RomError::ConfigError(format!(
                "match_tolerance must be finite and non-negative, got {}",
                self.match_tolerance
            )));
        }
        Ok(())
    }
}
