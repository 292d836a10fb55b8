// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Basis Catalog
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Concrete per-variable basis catalog.

use std::collections::HashSet;

use rom_types::config::RomConfig;
use rom_types::error::{RomError, RomResult};

use crate::design::BasisCatalog;
use crate::distribution::Distribution;
use crate::polynomial::PolynomialFamily;

/// One input variable: its distribution, polynomial family and cut value.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBasis {
    pub name: String,
    pub distribution: Distribution,
    pub family: PolynomialFamily,
    pub reference: f64,
}

impl VariableBasis {
    /// Variable with the distribution's natural family, cut at its centre.
    pub fn new(name: impl Into<String>, distribution: Distribution) -> Self {
        Self {
            name: name.into(),
            family: distribution.default_family(),
            reference: distribution.centre(),
            distribution,
        }
    }

    pub fn with_family(mut self, family: PolynomialFamily) -> Self {
        self.family = family;
        self
    }

    pub fn with_reference(mut self, reference: f64) -> Self {
        self.reference = reference;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrthoBasis {
    names: Vec<String>,
    variables: Vec<VariableBasis>,
}

impl OrthoBasis {
    pub fn new(variables: Vec<VariableBasis>) -> RomResult<Self> {
        let mut seen = HashSet::new();
        for v in &variables {
            if !seen.insert(v.name.as_str()) {
                return Err(RomError::ConfigError(format!(
                    "basis variable '{}' declared more than once",
                    v.name
                )));
            }
            if !v.reference.is_finite() {
                return Err(RomError::ConfigError(format!(
                    "basis variable '{}' has non-finite reference {}",
                    v.name, v.reference
                )));
            }
        }
        let names = variables.iter().map(|v| v.name.clone()).collect();
        Ok(Self { names, variables })
    }

    pub fn from_config(config: &RomConfig) -> RomResult<Self> {
        let variables = config
            .features
            .iter()
            .map(|name| {
                let interp = config.interpolation.get(name).ok_or_else(|| {
                    RomError::ConfigError(format!("no interpolation entry for feature '{name}'"))
                })?;
                let dist = Distribution::try_from_spec(interp.distribution, name)?;
                let mut var = VariableBasis::new(name.clone(), dist)
                    .with_reference(interp.reference_value());
                if let Some(kind) = interp.polynomial {
                    var = var.with_family(kind.into());
                }
                Ok(var)
            })
            .collect::<RomResult<Vec<_>>>()?;
        Self::new(variables)
    }

    /// Catalog restricted to `names`, in the order given.
    pub fn subset(&self, names: &[String]) -> RomResult<Self> {
        let variables = names
            .iter()
            .map(|n| {
                self.variable(n).cloned().ok_or_else(|| {
                    RomError::ConfigError(format!("variable '{n}' is not in the basis catalog"))
                })
            })
            .collect::<RomResult<Vec<_>>>()?;
        Self::new(variables)
    }

    pub fn variable(&self, name: &str) -> Option<&VariableBasis> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variables(&self) -> &[VariableBasis] {
        &self.variables
    }

    pub fn reference_point(&self) -> Vec<f64> {
        self.variables.iter().map(|v| v.reference).collect()
    }
}

impl BasisCatalog for OrthoBasis {
    fn var_names(&self) -> &[String] {
        &self.names
    }

    fn standardize(&self, dim: usize, physical: f64) -> f64 {
        self.variables[dim].distribution.standardize(physical)
    }

    fn measure_norm(&self, dim: usize) -> f64 {
        self.variables[dim].family.measure_norm()
    }

    fn polynomial_value(&self, dim: usize, order: usize, standard: f64) -> f64 {
        self.variables[dim].family.value(order, standard)
    }
}
