use std::sync::atomic::AtomicBool;

use nalgebra::Point2;

use crate::TransformError;

/// A 2D transformation model: a fitter producing a parameter record and a
/// pure evaluator over that record.
///
/// Implementations are small strategy values; the orchestrator picks one at
/// construction and calls it twice per `calculate` (source -> target, then
/// target -> source).
pub trait TransformModel {
    type Parameters: Clone + std::fmt::Debug + Send + Sync;

    /// Short lowercase name used in log messages.
    const NAME: &'static str;

    /// Whether evaluating without parameters returns the input point
    /// unchanged instead of failing with [`TransformError::NotCalculated`].
    const PASSTHROUGH_WHEN_EMPTY: bool = false;

    /// Fit parameters mapping `source[i]` onto `target[i]`.
    ///
    /// `cancel` is polled by fitters that run long solves.
    fn fit(
        &self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
        cancel: Option<&AtomicBool>,
    ) -> Result<Self::Parameters, TransformError>;

    /// Map a single point with `params`.
    fn evaluate(params: &Self::Parameters, point: Point2<f64>) -> Point2<f64>;
}

/// Validate a correspondence pair and return the number of pairs.
pub fn check_correspondence(
    source: &[Point2<f64>],
    target: &[Point2<f64>],
    min_points: usize,
) -> Result<usize, TransformError> {
    if source.len() != target.len() {
        return Err(TransformError::PointCountMismatch {
            source_count: source.len(),
            target_count: target.len(),
        });
    }
    if source.len() < min_points {
        return Err(TransformError::InsufficientPoints {
            required: min_points,
            got: source.len(),
        });
    }
    Ok(source.len())
}
