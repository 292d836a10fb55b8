// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Multi-Index Sets
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multi-index sets selecting the terms of a polynomial expansion.
//!
//! Indices are stored in ascending total degree, ties broken
//! lexicographically, so coefficient order is reproducible.

use std::collections::BTreeSet;

use rom_types::config::IndexSetKind;
use rom_types::error::{RomError, RomResult};

pub type MultiIndex = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSet {
    n_dims: usize,
    indices: Vec<MultiIndex>,
}

impl IndexSet {
    /// Every index with max_d i_d <= order.
    pub fn tensor_product(n_dims: usize, order: usize) -> Self {
        Self::filtered(n_dims, order, |_| true)
    }

    /// Every index with sum_d i_d <= order.
    pub fn total_degree(n_dims: usize, order: usize) -> Self {
        let mut out = Vec::new();
        if n_dims == 0 {
            return Self::from_sorted(0, vec![Vec::new()]);
        }
        let mut current = vec![0usize; n_dims];
        for total in 0..=order {
            enumerate_multi_index(0, total, &mut current, &mut out);
        }
        Self::from_sorted(n_dims, sorted(out))
    }

    /// Every index with prod_d (i_d + 1) <= order + 1.
    pub fn hyperbolic_cross(n_dims: usize, order: usize) -> Self {
        Self::filtered(n_dims, order, |idx| {
            idx.iter().map(|&i| i + 1).product::<usize>() <= order + 1
        })
    }

    /// Caller-supplied indices, dimension-checked and de-duplicated.
    pub fn custom(n_dims: usize, points: &[MultiIndex]) -> RomResult<Self> {
        if points.is_empty() {
            return Err(RomError::ConfigError(
                "custom index set must contain at least one multi-index".to_string(),
            ));
        }
        if let Some(bad) = points.iter().find(|p| p.len() != n_dims) {
            return Err(RomError::ConfigError(format!(
                "custom multi-index {bad:?} has dimension {}, expected {n_dims}",
                bad.len()
            )));
        }
        let unique: BTreeSet<MultiIndex> = points.iter().cloned().collect();
        Ok(Self::from_sorted(n_dims, sorted(unique.into_iter().collect())))
    }

    pub fn from_kind(
        kind: IndexSetKind,
        n_dims: usize,
        order: usize,
        custom_points: &[MultiIndex],
    ) -> RomResult<Self> {
        match kind {
            IndexSetKind::TensorProduct => Ok(Self::tensor_product(n_dims, order)),
            IndexSetKind::TotalDegree => Ok(Self::total_degree(n_dims, order)),
            IndexSetKind::HyperbolicCross => Ok(Self::hyperbolic_cross(n_dims, order)),
            IndexSetKind::Custom => Self::custom(n_dims, custom_points),
        }
    }

    fn filtered<F: Fn(&[usize]) -> bool>(n_dims: usize, order: usize, keep: F) -> Self {
        let mut out = Vec::new();
        let mut current = vec![0usize; n_dims];
        loop {
            if keep(&current) {
                out.push(current.clone());
            }
            // Odometer increment over {0..=order}^n_dims.
            let mut d = 0;
            while d < n_dims {
                if current[d] < order {
                    current[d] += 1;
                    break;
                }
                current[d] = 0;
                d += 1;
            }
            if d == n_dims {
                break;
            }
        }
        Self::from_sorted(n_dims, sorted(out))
    }

    fn from_sorted(n_dims: usize, indices: Vec<MultiIndex>) -> Self {
        Self { n_dims, indices }
    }

    pub fn n_dims(&self) -> usize {
        self.n_dims
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MultiIndex> {
        self.indices.iter()
    }

    pub fn indices(&self) -> &[MultiIndex] {
        &self.indices
    }

    pub fn contains(&self, idx: &[usize]) -> bool {
        self.indices.iter().any(|i| i.as_slice() == idx)
    }

    /// Highest univariate order appearing in each dimension.
    pub fn max_orders(&self) -> Vec<usize> {
        let mut out = vec![0usize; self.n_dims];
        for idx in &self.indices {
            for (d, &o) in idx.iter().enumerate() {
                out[d] = out[d].max(o);
            }
        }
        out
    }

    /// True when every backward neighbour of every member is also a member.
    pub fn is_downward_closed(&self) -> bool {
        let members: BTreeSet<&MultiIndex> = self.indices.iter().collect();
        self.indices.iter().all(|idx| {
            (0..idx.len()).all(|d| {
                if idx[d] == 0 {
                    return true;
                }
                let mut back = idx.clone();
                back[d] -= 1;
                members.contains(&back)
            })
        })
    }
}

impl<'a> IntoIterator for &'a IndexSet {
    type Item = &'a MultiIndex;
    type IntoIter = std::slice::Iter<'a, MultiIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

fn sorted(mut indices: Vec<MultiIndex>) -> Vec<MultiIndex> {
    indices.sort_by(|a, b| {
        let ta: usize = a.iter().sum();
        let tb: usize = b.iter().sum();
        ta.cmp(&tb).then_with(|| a.cmp(b))
    });
    indices
}

fn enumerate_multi_index(
    dim: usize,
    remaining: usize,
    current: &mut [usize],
    out: &mut Vec<MultiIndex>,
) {
    if dim + 1 == current.len() {
        current[dim] = remaining;
        out.push(current.to_vec());
        return;
    }
    for v in 0..=remaining {
        current[dim] = v;
        enumerate_multi_index(dim + 1, remaining - v, current, out);
    }
}
