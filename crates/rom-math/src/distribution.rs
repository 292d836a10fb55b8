// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Input Distributions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Input distributions and their maps onto quadrature coordinates.

use rom_types::config::DistributionSpec;
use rom_types::error::RomResult;

use crate::polynomial::PolynomialFamily;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    Uniform { lower: f64, upper: f64 },
    Normal { mean: f64, std: f64 },
}

impl From<DistributionSpec> for Distribution {
    fn from(spec: DistributionSpec) -> Self {
        match spec {
            DistributionSpec::Uniform { lower, upper } => Distribution::Uniform { lower, upper },
            DistributionSpec::Normal { mean, std } => Distribution::Normal { mean, std },
        }
    }
}

impl Distribution {
    pub fn try_from_spec(spec: DistributionSpec, name: &str) -> RomResult<Self> {
        spec.validate(name)?;
        Ok(spec.into())
    }

    /// Natural orthogonal family (Askey scheme).
    pub fn default_family(&self) -> PolynomialFamily {
        match self {
            Distribution::Uniform { .. } => PolynomialFamily::Legendre,
            Distribution::Normal { .. } => PolynomialFamily::Hermite,
        }
    }

    /// Physical value -> standardized quadrature coordinate.
    pub fn standardize(&self, x: f64) -> f64 {
        match *self {
            Distribution::Uniform { lower, upper } => (2.0 * x - (lower + upper)) / (upper - lower),
            Distribution::Normal { mean, std } => (x - mean) / std,
        }
    }

    /// Standardized quadrature coordinate -> physical value.
    pub fn to_physical(&self, s: f64) -> f64 {
        match *self {
            Distribution::Uniform { lower, upper } => 0.5 * (lower + upper) + 0.5 * (upper - lower) * s,
            Distribution::Normal { mean, std } => mean + std * s,
        }
    }

    pub fn centre(&self) -> f64 {
        self.to_physical(0.0)
    }
}
