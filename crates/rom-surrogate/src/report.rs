// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Surrogate Reports
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Serializable summaries of trained surrogates.
//!
//! Requests are case-insensitive names from a comma-separated list; `all`
//! expands to everything the surrogate kind can answer.

use rom_types::error::{RomError, RomResult};
use serde::Serialize;
use tracing::warn;

use crate::surrogate::Surrogate;

/// Sensitivities at or below this magnitude are listed after the rest.
const SIGNIFICANT_SENSITIVITY: f64 = 1e-10;

const PCE_REQUESTS: [&str; 3] = ["mean", "variance", "numRuns"];
const HDMR_REQUESTS: [&str; 3] = ["mean", "variance", "indices"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityEntry {
    pub variables: Vec<String>,
    pub sensitivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    pub total_variance: f64,
    pub entries: Vec<SensitivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportValue {
    Scalar(f64),
    Count(usize),
    Indices(SensitivityReport),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub request: String,
    pub value: ReportValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RomReport {
    pub target: String,
    pub kind: String,
    pub entries: Vec<ReportEntry>,
}

impl RomReport {
    pub fn build(surrogate: &Surrogate, what: &str) -> RomResult<Self> {
        if !surrogate.is_trained() {
            return Err(RomError::NotTrained(format!(
                "report for '{}'",
                surrogate.target()
            )));
        }
        let can_do: &[&str] = match surrogate {
            Surrogate::PolynomialChaos(_) => &PCE_REQUESTS,
            Surrogate::Hdmr(_) => &HDMR_REQUESTS,
        };
        let mut requests: Vec<String> = what
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if requests.iter().any(|r| r.eq_ignore_ascii_case("all")) {
            requests = can_do.iter().map(|r| r.to_string()).collect();
        }

        let mut entries = Vec::with_capacity(requests.len());
        for request in requests {
            let value = answer(surrogate, &request)?;
            entries.push(ReportEntry { request, value });
        }
        Ok(Self {
            target: surrogate.target().to_string(),
            kind: surrogate.kind().to_string(),
            entries,
        })
    }

    pub fn get(&self, request: &str) -> Option<&ReportValue> {
        self.entries
            .iter()
            .find(|e| e.request.eq_ignore_ascii_case(request))
            .map(|e| &e.value)
    }

    pub fn to_json(&self) -> RomResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn answer(surrogate: &Surrogate, request: &str) -> RomResult<ReportValue> {
    let value = match (surrogate, request.to_ascii_lowercase().as_str()) {
        (_, "mean" | "expectedvalue") => ReportValue::Scalar(surrogate.mean()?),
        (_, "variance") => ReportValue::Scalar(surrogate.variance()?),
        (Surrogate::PolynomialChaos(p), "numruns") => ReportValue::Count(p.num_runs()),
        (Surrogate::Hdmr(h), "indices") => {
            let pct = h.percent_sensitivities(None)?;
            let (mut significant, mut insignificant): (Vec<_>, Vec<_>) = pct
                .fractions
                .into_iter()
                .map(|(variables, sensitivity)| SensitivityEntry {
                    variables,
                    sensitivity,
                })
                .partition(|e| e.sensitivity.abs() > SIGNIFICANT_SENSITIVITY);
            significant.sort_by(|a, b| b.sensitivity.total_cmp(&a.sensitivity));
            insignificant.sort_by(|a, b| a.variables.cmp(&b.variables));
            significant.extend(insignificant);
            ReportValue::Indices(SensitivityReport {
                total_variance: pct.total_variance,
                entries: significant,
            })
        }
        _ => {
            warn!(
                surrogate = %surrogate.kind(),
                request,
                "surrogate does not know how to return request"
            );
            ReportValue::NotFound
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rom_math::basis::{OrthoBasis, VariableBasis};
    use rom_math::distribution::Distribution;
    use rom_math::index_set::IndexSet;
    use rom_math::sparse_grid::SparseGrid;

    use crate::dataset::Dataset;
    use crate::hdmr::HdmrDecomposition;
    use crate::pce::PolynomialChaos;

    fn basis(names: &[&str]) -> OrthoBasis {
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

    fn cut(names: &[&str]) -> PolynomialChaos {
        let b = basis(names);
        let grid = SparseGrid::tensor_level(&b, 1).unwrap();
        PolynomialChaos::new(
            names.iter().map(|s| s.to_string()).collect(),
            "y",
            IndexSet::tensor_product(names.len(), 1),
            Arc::new(grid),
            Arc::new(b),
        )
        .unwrap()
    }

    /// y = 1 + 2u + w on three inputs; v has no effect.
    fn trained_hdmr() -> Surrogate {
        let names = ["u", "v", "w"];
        let mut hdmr = HdmrDecomposition::new(
            names.iter().map(|s| s.to_string()).collect(),
            "y",
            vec![0.0; 3],
        )
        .unwrap();
        for n in names {
            hdmr.register(cut(&[n])).unwrap();
        }
        let rows = hdmr.required_points().unwrap();
        let targets: Vec<f64> = rows.iter().map(|r| 1.0 + 2.0 * r[0] + r[2]).collect();
        let data = Dataset::from_rows(hdmr.features(), "y", &rows, &targets).unwrap();
        hdmr.train(&data).unwrap();
        hdmr.into()
    }

    #[test]
    fn test_indices_ordering() {
        let report = trained_hdmr().report("indices").unwrap();
        let Some(ReportValue::Indices(idx)) = report.get("indices") else {
            panic!("Expected indices");
        };
        // Var(2u) = 4/3, Var(w) = 1/3.
        assert!((idx.total_variance - 5.0 / 3.0).abs() < 1e-12);
        let order: Vec<&str> = idx.entries.iter().map(|e| e.variables[0].as_str()).collect();
        assert_eq!(order, vec!["u", "w", "v"]);
        assert!((idx.entries[0].sensitivity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_all_expands_per_kind() {
        let report = trained_hdmr().report("ALL").unwrap();
        let names: Vec<&str> = report.entries.iter().map(|e| e.request.as_str()).collect();
        assert_eq!(names, HDMR_REQUESTS.to_vec());
        assert_eq!(report.kind, "hdmr");
    }

    #[test]
    fn test_unknown_request_not_found() {
        let report = trained_hdmr().report("mean, numRuns").unwrap();
        assert!(matches!(report.get("mean"), Some(ReportValue::Scalar(m)) if (m - 1.0).abs() < 1e-12));
        assert_eq!(report.get("numruns"), Some(&ReportValue::NotFound));
        let json = report.to_json().unwrap();
        assert!(json.contains("not_found"));
    }

    #[test]
    fn test_pce_report_and_untrained() {
        let mut pce = cut(&["u", "v"]);
        let rows: Vec<Vec<f64>> = rom_math::design::design_pairs(pce.design())
            .map(|(x, _)| x.to_vec())
            .collect();
        let targets: Vec<f64> = rows.iter().map(|r| r[0] - r[1]).collect();
        let data = Dataset::from_rows(pce.features(), "y", &rows, &targets).unwrap();

        let untrained: Surrogate = pce.clone().into();
        assert!(matches!(untrained.report("mean"), Err(RomError::NotTrained(_))));

        pce.fit(&data).unwrap();
        let report = Surrogate::from(pce).report("expectedValue,numRuns,variance").unwrap();
        assert_eq!(report.get("numRuns"), Some(&ReportValue::Count(4)));
        assert!(matches!(report.get("variance"), Some(ReportValue::Scalar(v)) if (v - 2.0 / 3.0).abs() < 1e-12));
    }
}
