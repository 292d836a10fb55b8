// ─────────────────────────────────────────────────────────────────────
// SCPN ROM — Error Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RomError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Shape or length disagreement in supplied data.
    #[error("Data mismatch in {context}: {detail}")]
    DataMismatch { context: String, detail: String },

    /// Quadrature nodes with no counterpart in the training data.
    #[error("Data mismatch in {context}: {} quadrature node(s) missing from training data, first {:?}", .missing.len(), .missing.first())]
    MissingNodes {
        context: String,
        missing: Vec<Vec<f64>>,
    },

    #[error("Reference point {point:?} is absent from the training data")]
    MissingReferencePoint { point: Vec<f64> },

    #[error("Not trained: {0}")]
    NotTrained(String),

    #[error("Moment of order {order} is not supported for {context}")]
    UnsupportedMoment { order: usize, context: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RomResult<T> = Result<T, RomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_nodes_message_names_context_and_count() {
        let err = RomError::MissingNodes {
            context: "pce(y) combo [x1]".to_string(),
            missing: vec![vec![0.5, -0.5], vec![0.1, 0.2]],
        };
        let msg = err.to_string();
        assert!(msg.contains("pce(y) combo [x1]"));
        assert!(msg.contains("2 quadrature node(s)"));
        assert!(msg.contains("0.5"));
    }

    #[test]
    fn test_unsupported_moment_message() {
        let err = RomError::UnsupportedMoment {
            order: 3,
            context: "HDMR decomposition".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Moment of order 3 is not supported for HDMR decomposition"
        );
    }
}
