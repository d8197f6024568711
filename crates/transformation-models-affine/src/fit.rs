use std::sync::atomic::AtomicBool;

use log::{debug, warn};
use nalgebra::{Point2, Vector2};
use transformation_models_core::{check_correspondence, TransformError, TransformModel};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{AffineFitParams, AffineParameters};

/// Minimal number of correspondences for an affine fit.
pub const MIN_AFFINE_POINTS: usize = 3;

/// Affine model: centroid-based closed-form least squares.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Affine {
    pub params: AffineFitParams,
}

impl Affine {
    pub fn new(params: AffineFitParams) -> Self {
        Self { params }
    }

    /// Fit `target ~ A * source` in the least-squares sense.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(n = source.len()))
    )]
    pub fn fit_parameters(
        &self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
    ) -> Result<AffineParameters, TransformError> {
        let n = check_correspondence(source, target, MIN_AFFINE_POINTS)?;
        debug!("affine fit on {n} points");

        let sc = centroid(source);
        let tc = centroid(target);

        // Second moments over the centred point sets.
        let (mut x1, mut y1, mut x2, mut y2, mut x3, mut y3, mut x4) =
            (0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        for (s, t) in source.iter().zip(target) {
            let s = s - sc;
            let t = t - tc;
            x1 += s.x * t.x;
            y1 += s.y * t.x;
            x2 += s.x * s.x;
            y2 += s.y * t.y;
            x3 += s.x * t.y;
            y3 += s.y * s.y;
            x4 += s.x * s.y;
        }

        let n1 = x2 * y3 - x4 * x4;
        if !n1.is_finite() || n1 <= self.params.collinearity_tolerance * x2 * y3 {
            warn!("affine fit on {n} points is singular (n1 = {n1:e})");
            return Err(TransformError::SingularFit);
        }

        let a = (x1 * y3 - y1 * x4) / n1;
        let b = (y1 * x2 - x1 * x4) / n1;
        let e = (y2 * x2 - x3 * x4) / n1;
        let d = (x3 * y3 - y2 * x4) / n1;
        let params = AffineParameters {
            a,
            b,
            c: tc.x - a * sc.x - b * sc.y,
            d,
            e,
            f: tc.y - e * sc.y - d * sc.x,
        };
        if !params.is_finite() {
            warn!("affine fit on {n} points produced non-finite parameters");
            return Err(TransformError::SingularFit);
        }

        Ok(params)
    }
}

impl TransformModel for Affine {
    type Parameters = AffineParameters;

    const NAME: &'static str = "affine";

    fn fit(
        &self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
        _cancel: Option<&AtomicBool>,
    ) -> Result<AffineParameters, TransformError> {
        self.fit_parameters(source, target)
    }

    fn evaluate(params: &AffineParameters, point: Point2<f64>) -> Point2<f64> {
        params.apply(point)
    }
}

fn centroid(pts: &[Point2<f64>]) -> Vector2<f64> {
    let sum = pts
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p.coords);
    sum / pts.len() as f64
}
