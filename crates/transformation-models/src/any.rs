use std::sync::atomic::AtomicBool;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use transformation_models_affine::{Affine, AffineFitParams};
use transformation_models_core::{SolverParams, TransformError};
use transformation_models_tps::Tps;

use crate::{TransformState, Transformation};

/// Which transformation model to fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    #[default]
    Affine,
    Tps,
}

/// A transformation whose model is chosen at runtime.
#[derive(Clone, Debug)]
pub enum AnyTransformation {
    Affine(Transformation<Affine>),
    Tps(Transformation<Tps>),
}

impl AnyTransformation {
    /// Empty transformation of `kind` with default fit settings.
    pub fn new(kind: TransformKind) -> Self {
        Self::with_params(kind, AffineFitParams::default(), SolverParams::default())
    }

    pub fn with_params(kind: TransformKind, affine: AffineFitParams, solver: SolverParams) -> Self {
        match kind {
            TransformKind::Affine => Self::Affine(Transformation::new(Affine::new(affine))),
            TransformKind::Tps => Self::Tps(Transformation::new(Tps::new(solver))),
        }
    }

    pub fn kind(&self) -> TransformKind {
        match self {
            Self::Affine(_) => TransformKind::Affine,
            Self::Tps(_) => TransformKind::Tps,
        }
    }

    pub fn calculate(
        &mut self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
    ) -> Result<(), TransformError> {
        match self {
            Self::Affine(t) => t.calculate(source, target),
            Self::Tps(t) => t.calculate(source, target),
        }
    }

    pub fn calculate_with_cancel(
        &mut self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
        cancel: &AtomicBool,
    ) -> Result<(), TransformError> {
        match self {
            Self::Affine(t) => t.calculate_with_cancel(source, target, cancel),
            Self::Tps(t) => t.calculate_with_cancel(source, target, cancel),
        }
    }

    pub fn forward(&self, point: impl Into<Point2<f64>>) -> Result<Point2<f64>, TransformError> {
        match self {
            Self::Affine(t) => t.forward(point),
            Self::Tps(t) => t.forward(point),
        }
    }

    pub fn inverse(&self, point: impl Into<Point2<f64>>) -> Result<Point2<f64>, TransformError> {
        match self {
            Self::Affine(t) => t.inverse(point),
            Self::Tps(t) => t.inverse(point),
        }
    }

    pub fn state(&self) -> TransformState {
        match self {
            Self::Affine(t) => t.state(),
            Self::Tps(t) => t.state(),
        }
    }

    pub fn source_points(&self) -> &[Point2<f64>] {
        match self {
            Self::Affine(t) => t.source_points(),
            Self::Tps(t) => t.source_points(),
        }
    }

    pub fn target_points(&self) -> &[Point2<f64>] {
        match self {
            Self::Affine(t) => t.target_points(),
            Self::Tps(t) => t.target_points(),
        }
    }

    pub fn as_affine(&self) -> Option<&Transformation<Affine>> {
        match self {
            Self::Affine(t) => Some(t),
            Self::Tps(_) => None,
        }
    }

    pub fn as_tps(&self) -> Option<&Transformation<Tps>> {
        match self {
            Self::Tps(t) => Some(t),
            Self::Affine(_) => None,
        }
    }
}

impl From<Transformation<Affine>> for AnyTransformation {
    fn from(t: Transformation<Affine>) -> Self {
        Self::Affine(t)
    }
}

impl From<Transformation<Tps>> for AnyTransformation {
    fn from(t: Transformation<Tps>) -> Self {
        Self::Tps(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        assert_eq!(
            AnyTransformation::new(TransformKind::Affine).kind(),
            TransformKind::Affine
        );
        let tps = AnyTransformation::new(TransformKind::Tps);
        assert_eq!(tps.kind(), TransformKind::Tps);
        assert!(tps.as_affine().is_none());
        assert!(tps.as_tps().is_some());
    }

    #[test]
    fn empty_policies_differ_per_model() {
        let affine = AnyTransformation::new(TransformKind::Affine);
        let tps = AnyTransformation::new(TransformKind::Tps);
        assert_eq!(affine.forward([1.0, 1.0]), Err(TransformError::NotCalculated));
        assert_eq!(tps.forward([1.0, 1.0]), Ok(Point2::new(1.0, 1.0)));
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TransformKind::Tps).expect("json"),
            "\"tps\""
        );
    }
}
