// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — ROM Math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Mathematical primitives for SCPN ROM.
//!
//! Orthonormal polynomial families, Gauss rules, input distributions,
//! multi-index sets and the quadrature designs built from them.

pub mod basis;
pub mod design;
pub mod distribution;
pub mod index_set;
pub mod polynomial;
pub mod quadrature;
pub mod sparse_grid;
