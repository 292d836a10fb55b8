// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — ROM Surrogate
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reduced order models.
//!
//! Spectral-projection polynomial chaos on Gauss sparse grids, and its
//! Cut-HDMR decomposition for variance-based sensitivity analysis.

pub mod dataset;
pub mod hdmr;
pub mod matching;
pub mod pce;
pub mod report;
pub mod surrogate;
