//! The transformation orchestrator.
//!
//! A [`Transformation`] owns one correspondence pair and two parameter
//! slots. `calculate` fits the forward slot on `(source, target)` and the
//! inverse slot independently on `(target, source)`, and publishes both only
//! when both fits succeed.

use std::sync::atomic::AtomicBool;

use log::{debug, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use transformation_models_affine::Affine;
use transformation_models_core::{TransformError, TransformModel};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Lifecycle of a [`Transformation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformState {
    /// At least one parameter slot is empty.
    Uninitialized,
    /// Forward and inverse parameters are both available.
    Ready,
}

#[derive(Clone, Debug)]
pub struct Transformation<M: TransformModel> {
    model: M,
    source: Vec<Point2<f64>>,
    target: Vec<Point2<f64>>,
    forward: Option<M::Parameters>,
    inverse: Option<M::Parameters>,
}

impl<M: TransformModel + Default> Default for Transformation<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: TransformModel> Transformation<M> {
    /// Create an empty transformation that will fit with `model`.
    pub fn new(model: M) -> Self {
        Self {
            model,
            source: Vec::new(),
            target: Vec::new(),
            forward: None,
            inverse: None,
        }
    }

    /// Create and immediately [`calculate`](Self::calculate).
    pub fn from_points(
        model: M,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
    ) -> Result<Self, TransformError> {
        let mut t = Self::new(model);
        t.calculate(source, target)?;
        Ok(t)
    }

    /// Fit forward and inverse parameters.
    ///
    /// On error the transformation is left exactly as it was.
    pub fn calculate(
        &mut self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
    ) -> Result<(), TransformError> {
        self.calculate_inner(source, target, None)
    }

    /// Like [`calculate`](Self::calculate), aborting with
    /// `MatrixError::Cancelled` once `cancel` is set.
    pub fn calculate_with_cancel(
        &mut self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
        cancel: &AtomicBool,
    ) -> Result<(), TransformError> {
        self.calculate_inner(source, target, Some(cancel))
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(model = M::NAME, n = source.len()))
    )]
    fn calculate_inner(
        &mut self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
        cancel: Option<&AtomicBool>,
    ) -> Result<(), TransformError> {
        debug!(
            "calculating {} transformation from {} point pairs",
            M::NAME,
            source.len()
        );

        let fitted = self.model.fit(source, target, cancel).and_then(|forward| {
            let inverse = self.model.fit(target, source, cancel)?;
            Ok((forward, inverse))
        });
        let (forward, inverse) = match fitted {
            Ok(params) => params,
            Err(err) => {
                warn!("{} calculate failed: {err}", M::NAME);
                return Err(err);
            }
        };

        self.source = source.to_vec();
        self.target = target.to_vec();
        self.forward = Some(forward);
        self.inverse = Some(inverse);
        Ok(())
    }

    /// Map a point from the source to the target system.
    pub fn forward(&self, point: impl Into<Point2<f64>>) -> Result<Point2<f64>, TransformError> {
        Self::evaluate_slot(self.forward.as_ref(), point.into())
    }

    /// Map a point from the target to the source system.
    pub fn inverse(&self, point: impl Into<Point2<f64>>) -> Result<Point2<f64>, TransformError> {
        Self::evaluate_slot(self.inverse.as_ref(), point.into())
    }

    fn evaluate_slot(
        params: Option<&M::Parameters>,
        point: Point2<f64>,
    ) -> Result<Point2<f64>, TransformError> {
        match params {
            Some(params) => Ok(M::evaluate(params, point)),
            None if M::PASSTHROUGH_WHEN_EMPTY => Ok(point),
            None => Err(TransformError::NotCalculated),
        }
    }

    pub fn state(&self) -> TransformState {
        if self.forward.is_some() && self.inverse.is_some() {
            TransformState::Ready
        } else {
            TransformState::Uninitialized
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn source_points(&self) -> &[Point2<f64>] {
        &self.source
    }

    pub fn target_points(&self) -> &[Point2<f64>] {
        &self.target
    }

    pub fn forward_parameters(&self) -> Option<&M::Parameters> {
        self.forward.as_ref()
    }

    pub fn inverse_parameters(&self) -> Option<&M::Parameters> {
        self.inverse.as_ref()
    }

    /// Replace the forward parameters, e.g. with an externally computed set.
    pub fn set_forward_parameters(&mut self, params: Option<M::Parameters>) {
        self.forward = params;
    }

    /// Replace the inverse parameters, e.g. with an externally computed set.
    pub fn set_inverse_parameters(&mut self, params: Option<M::Parameters>) {
        self.inverse = params;
    }
}

impl Transformation<Affine> {
    /// World-file text for the forward (or inverse) parameters.
    pub fn to_world_file(&self, use_inverse: bool) -> Result<String, TransformError> {
        let params = if use_inverse {
            self.inverse.as_ref()
        } else {
            self.forward.as_ref()
        };
        params
            .map(|p| p.to_world_file())
            .ok_or(TransformError::NotCalculated)
    }
}
