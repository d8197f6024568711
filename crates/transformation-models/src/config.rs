//! JSON configuration for building a transformation.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use transformation_models_affine::AffineFitParams;
use transformation_models_core::SolverParams;

use crate::{AnyTransformation, TransformKind};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Model choice plus per-model fit settings.
///
/// ```json
/// { "kind": "tps", "solver": { "pivot": "partial", "singular_tolerance": 1e-12 } }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub kind: TransformKind,
    /// Matrix solver settings (TPS).
    #[serde(default)]
    pub solver: SolverParams,
    /// Least-squares settings (Affine).
    #[serde(default)]
    pub affine: AffineFitParams,
}

impl TransformConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Build an empty transformation with these settings.
    pub fn build(&self) -> AnyTransformation {
        AnyTransformation::with_params(self.kind, self.affine, self.solver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transformation_models_core::PivotStrategy;

    #[test]
    fn empty_object_is_default_affine() {
        let cfg = TransformConfig::from_json_str("{}").expect("json");
        assert_eq!(cfg, TransformConfig::default());
        assert_eq!(cfg.build().kind(), TransformKind::Affine);
    }

    #[test]
    fn solver_overrides_reach_the_model() {
        let cfg = TransformConfig::from_json_str(
            r#"{ "kind": "tps", "solver": { "pivot": "first_non_zero", "singular_tolerance": 0.0 } }"#,
        )
        .expect("json");
        let built = cfg.build();
        let tps = built.as_tps().expect("tps variant");
        assert_eq!(tps.model().solver.pivot, PivotStrategy::FirstNonZero);
        assert_eq!(tps.model().solver.singular_tolerance, 0.0);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(matches!(
            TransformConfig::from_json_str(r#"{ "kind": "polynomial" }"#),
            Err(ConfigError::Json(_))
        ));
    }
}
