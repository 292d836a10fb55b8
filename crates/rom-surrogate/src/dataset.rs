// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Training Dataset
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Named one-dimensional sample columns.
//!
//! A dataset maps variable names (target included) to equal-length arrays.
//! Shape problems are reported before any surrogate arithmetic runs.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayD, Ix1};
use rom_types::error::{RomError, RomResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: BTreeMap<String, Array1<f64>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Array1<f64>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Array1<f64>) {
        self.columns.insert(name.into(), values);
    }

    /// Accepts arbitrary-rank arrays and rejects anything that is not 1-D.
    /// A 0-D array is read as a single sample.
    pub fn from_dyn<I, S>(columns: I) -> RomResult<Self>
    where
        I: IntoIterator<Item = (S, ArrayD<f64>)>,
        S: Into<String>,
    {
        let mut out = Self::new();
        for (name, arr) in columns {
            let name = name.into();
            let column = match arr.ndim() {
                0 => Array1::from_iter(arr.iter().copied()),
                1 => arr.into_dimensionality::<Ix1>().map_err(|e| RomError::DataMismatch {
                    context: format!("column '{name}'"),
                    detail: e.to_string(),
                })?,
                n => {
                    return Err(RomError::DataMismatch {
                        context: format!("column '{name}'"),
                        detail: format!("the array must be 1-d, got {n} dimensions"),
                    })
                }
            };
            out.insert(name, column);
        }
        Ok(out)
    }

    /// Builds a dataset from row-major feature vectors and their targets.
    pub fn from_rows(
        features: &[String],
        target: &str,
        rows: &[Vec<f64>],
        targets: &[f64],
    ) -> RomResult<Self> {
        if rows.len() != targets.len() {
            return Err(RomError::DataMismatch {
                context: format!("rows for target '{target}'"),
                detail: format!("{} rows but {} target values", rows.len(), targets.len()),
            });
        }
        if let Some((i, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != features.len()) {
            return Err(RomError::DataMismatch {
                context: format!("row {i} for target '{target}'"),
                detail: format!("{} values for {} features", bad.len(), features.len()),
            });
        }
        let mut out = Self::new();
        for (d, name) in features.iter().enumerate() {
            out.insert(name.clone(), rows.iter().map(|r| r[d]).collect());
        }
        out.insert(target, Array1::from_vec(targets.to_vec()));
        Ok(out)
    }

    pub fn column(&self, name: &str) -> Option<&Array1<f64>> {
        self.columns.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Sample count of the target column, or of any column if `target` is absent.
    pub fn n_samples(&self, target: &str) -> usize {
        self.columns
            .get(target)
            .or_else(|| self.columns.values().next())
            .map_or(0, Array1::len)
    }

    /// (samples x features) matrix and target vector for training.
    pub fn training_matrix(
        &self,
        features: &[String],
        target: &str,
    ) -> RomResult<(Array2<f64>, Array1<f64>)> {
        if features.iter().any(|f| f == target) {
            return Err(RomError::ConfigError(format!(
                "the target and one of the features have the same name '{target}'"
            )));
        }
        let targets = self.columns.get(target).ok_or_else(|| RomError::DataMismatch {
            context: "training set".to_string(),
            detail: format!("the output sought '{target}' is not in the training set"),
        })?;
        let samples = self.stack(features, targets.len(), "training set")?;
        Ok((samples, targets.clone()))
    }

    /// (samples x features) matrix for evaluation requests.
    pub fn evaluation_matrix(&self, features: &[String]) -> RomResult<Array2<f64>> {
        let n = features
            .first()
            .and_then(|f| self.columns.get(f))
            .map_or(0, Array1::len);
        self.stack(features, n, "evaluate set")
    }

    fn stack(&self, features: &[String], n: usize, context: &str) -> RomResult<Array2<f64>> {
        let mut out = Array2::zeros((n, features.len()));
        for (j, name) in features.iter().enumerate() {
            let col = self.columns.get(name).ok_or_else(|| RomError::DataMismatch {
                context: context.to_string(),
                detail: format!("the feature sought '{name}' is not in the {context}"),
            })?;
            if col.len() != n {
                return Err(RomError::DataMismatch {
                    context: context.to_string(),
                    detail: format!(
                        "feature '{name}' has {} values, expected {n}",
                        col.len()
                    ),
                });
            }
            out.column_mut(j).assign(col);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, ArrayD, IxDyn};

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_training_matrix_layout() {
        let ds = Dataset::new()
            .with_column("a", array![1.0, 2.0, 3.0])
            .with_column("b", array![4.0, 5.0, 6.0])
            .with_column("y", array![7.0, 8.0, 9.0]);
        let (x, y) = ds.training_matrix(&names(&["b", "a"]), "y").unwrap();
        assert_eq!(x.dim(), (3, 2));
        assert_eq!(x[[0, 0]], 4.0);
        assert_eq!(x[[2, 1]], 3.0);
        assert_eq!(y[1], 8.0);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let ds = Dataset::new()
            .with_column("a", array![1.0, 2.0])
            .with_column("y", array![7.0, 8.0, 9.0]);
        match ds.training_matrix(&names(&["a"]), "y").unwrap_err() {
            RomError::DataMismatch { detail, .. } => assert!(detail.contains("'a'")),
            other => panic!("Expected DataMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_target_rejected() {
        let ds = Dataset::new().with_column("a", array![1.0]);
        match ds.training_matrix(&names(&["a"]), "y").unwrap_err() {
            RomError::DataMismatch { detail, .. } => assert!(detail.contains("'y'")),
            other => panic!("Expected DataMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_two_dimensional_column_rejected() {
        let bad = ArrayD::<f64>::zeros(IxDyn(&[2, 2]));
        let err = Dataset::from_dyn(vec![("x", bad)]).unwrap_err();
        match err {
            RomError::DataMismatch { context, detail } => {
                assert!(context.contains("'x'"));
                assert!(detail.contains("1-d"));
            }
            other => panic!("Expected DataMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_scalar_column_is_single_sample() {
        let scalar = ArrayD::<f64>::from_elem(IxDyn(&[]), 2.5);
        let ds = Dataset::from_dyn(vec![("x", scalar)]).unwrap();
        assert_eq!(ds.column("x").unwrap(), &array![2.5]);
    }

    #[test]
    fn test_from_rows_round_trip_into_matrix() {
        let f = names(&["p", "q"]);
        let ds = Dataset::from_rows(&f, "t", &[vec![1.0, 2.0], vec![3.0, 4.0]], &[5.0, 6.0])
            .unwrap();
        let (x, y) = ds.training_matrix(&f, "t").unwrap();
        assert_eq!(x, array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(y, array![5.0, 6.0]);
        assert_eq!(ds.n_samples("t"), 2);
    }

    #[test]
    fn test_target_named_like_feature_rejected() {
        let ds = Dataset::new().with_column("a", array![1.0]);
        assert!(matches!(
            ds.training_matrix(&names(&["a"]), "a"),
            Err(RomError::ConfigError(_))
        ));
    }
}
