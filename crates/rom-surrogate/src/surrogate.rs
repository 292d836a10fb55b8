// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Surrogate Kinds
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Closed set of surrogate kinds behind one train/evaluate/moment/reset API.

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use rom_types::config::RomConfig;
use rom_types::error::{RomError, RomResult};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::hdmr::HdmrDecomposition;
use crate::pce::PolynomialChaos;
use crate::report::RomReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurrogateKind {
    PolynomialChaos,
    Hdmr,
}

impl fmt::Display for SurrogateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PolynomialChaos => write!(f, "polynomial_chaos"),
            Self::Hdmr => write!(f, "hdmr"),
        }
    }
}

impl FromStr for SurrogateKind {
    type Err = RomError;

    /// Accepts the short names and the legacy ROM type names, case-insensitive.
    fn from_str(s: &str) -> RomResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pce" | "polynomial_chaos" | "gausspolynomialrom" => Ok(Self::PolynomialChaos),
            "hdmr" | "hdmrrom" => Ok(Self::Hdmr),
            other => Err(RomError::ConfigError(format!(
                "unknown surrogate kind '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Surrogate {
    PolynomialChaos(PolynomialChaos),
    Hdmr(HdmrDecomposition),
}

impl From<PolynomialChaos> for Surrogate {
    fn from(pce: PolynomialChaos) -> Self {
        Self::PolynomialChaos(pce)
    }
}

impl From<HdmrDecomposition> for Surrogate {
    fn from(hdmr: HdmrDecomposition) -> Self {
        Self::Hdmr(hdmr)
    }
}

impl Surrogate {
    pub fn from_config(kind: SurrogateKind, config: &RomConfig) -> RomResult<Self> {
        match kind {
            SurrogateKind::PolynomialChaos => PolynomialChaos::from_config(config).map(Self::from),
            SurrogateKind::Hdmr => HdmrDecomposition::from_config(config).map(Self::from),
        }
    }

    pub fn kind(&self) -> SurrogateKind {
        match self {
            Self::PolynomialChaos(_) => SurrogateKind::PolynomialChaos,
            Self::Hdmr(_) => SurrogateKind::Hdmr,
        }
    }

    pub fn features(&self) -> &[String] {
        match self {
            Self::PolynomialChaos(p) => p.features(),
            Self::Hdmr(h) => h.features(),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::PolynomialChaos(p) => p.target(),
            Self::Hdmr(h) => h.target(),
        }
    }

    pub fn train(&mut self, data: &Dataset) -> RomResult<()> {
        match self {
            Self::PolynomialChaos(p) => p.fit(data),
            Self::Hdmr(h) => h.train(data),
        }
    }

    pub fn evaluate(&self, data: &Dataset) -> RomResult<Array1<f64>> {
        match self {
            Self::PolynomialChaos(p) => p.predict(data),
            Self::Hdmr(h) => h.predict(data),
        }
    }

    pub fn evaluate_point(&self, point: &[f64]) -> RomResult<f64> {
        match self {
            Self::PolynomialChaos(p) => p.evaluate(point),
            Self::Hdmr(h) => h.evaluate(point),
        }
    }

    pub fn moment(&self, r: usize) -> RomResult<f64> {
        match self {
            Self::PolynomialChaos(p) => p.moment(r),
            Self::Hdmr(h) => h.moment(r),
        }
    }

    pub fn mean(&self) -> RomResult<f64> {
        match self {
            Self::PolynomialChaos(p) => p.mean(),
            Self::Hdmr(h) => h.mean(),
        }
    }

    pub fn variance(&self) -> RomResult<f64> {
        match self {
            Self::PolynomialChaos(p) => p.variance(),
            Self::Hdmr(h) => h.variance(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::PolynomialChaos(p) => p.reset(),
            Self::Hdmr(h) => h.reset(),
        }
    }

    pub fn is_trained(&self) -> bool {
        match self {
            Self::PolynomialChaos(p) => p.is_trained(),
            Self::Hdmr(h) => h.is_trained(),
        }
    }

    /// Report for a comma-separated request list such as `"mean,variance"`.
    pub fn report(&self, what: &str) -> RomResult<RomReport> {
        RomReport::build(self, what)
    }
}
