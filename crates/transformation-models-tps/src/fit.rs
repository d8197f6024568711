use std::sync::atomic::AtomicBool;

use log::{debug, warn};
use nalgebra::{DMatrix, Point2};
use transformation_models_core::{
    check_correspondence, GaussJordan, SolverParams, TransformError, TransformModel,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{kernel, TpsParameters};

/// Thin plate spline model.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tps {
    pub solver: SolverParams,
}

impl Tps {
    pub fn new(solver: SolverParams) -> Self {
        Self { solver }
    }

    /// Fit a spline interpolating `source[i] -> target[i]`.
    ///
    /// Inversion of the `(m+3)x(m+3)` system dominates (`O(m^3)`); `cancel`
    /// is polled once per pivot column.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(m = source.len()))
    )]
    pub fn fit_parameters(
        &self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
        cancel: Option<&AtomicBool>,
    ) -> Result<TpsParameters, TransformError> {
        let m = check_correspondence(source, target, 0)?;
        debug!("tps fit on {m} control points");

        let a = system_matrix(source);
        let mut solver = GaussJordan::new(self.solver);
        if let Some(flag) = cancel {
            solver = solver.with_cancel(flag);
        }
        let inv = solver.invert(&a).inspect_err(|err| {
            warn!("tps fit on {m} control points failed: {err}");
        })?;

        let mut x_coeffs = vec![0.0; m + 3];
        let mut y_coeffs = vec![0.0; m + 3];
        for r in 0..m + 3 {
            for (c, t) in target.iter().enumerate() {
                let w = inv[(r, c + 3)];
                x_coeffs[r] += w * t.x;
                y_coeffs[r] += w * t.y;
            }
        }

        if x_coeffs.iter().chain(&y_coeffs).any(|v| !v.is_finite()) {
            warn!("tps fit on {m} control points produced non-finite coefficients");
            return Err(TransformError::SingularFit);
        }

        TpsParameters::new(x_coeffs, y_coeffs, source.to_vec())
    }
}

impl TransformModel for Tps {
    type Parameters = TpsParameters;

    const NAME: &'static str = "tps";
    const PASSTHROUGH_WHEN_EMPTY: bool = true;

    fn fit(
        &self,
        source: &[Point2<f64>],
        target: &[Point2<f64>],
        cancel: Option<&AtomicBool>,
    ) -> Result<TpsParameters, TransformError> {
        self.fit_parameters(source, target, cancel)
    }

    fn evaluate(params: &TpsParameters, point: Point2<f64>) -> Point2<f64> {
        params.apply(point)
    }
}

/// Build the symmetric `(m+3)x(m+3)` spline system for `m` control points:
///
/// ```text
/// | 0    P^T |      P[i] = [1, x_i, y_i]
/// | P    K   |      K[r][c] = kernel(p_r, p_c)
/// ```
pub fn system_matrix(control_points: &[Point2<f64>]) -> DMatrix<f64> {
    let m = control_points.len();
    let mut a = DMatrix::<f64>::zeros(m + 3, m + 3);

    for (i, p) in control_points.iter().enumerate() {
        a[(0, 3 + i)] = 1.0;
        a[(1, 3 + i)] = p.x;
        a[(2, 3 + i)] = p.y;

        a[(3 + i, 0)] = 1.0;
        a[(3 + i, 1)] = p.x;
        a[(3 + i, 2)] = p.y;
    }

    for r in 0..m {
        for c in r..m {
            let k = kernel(control_points[r], control_points[c]);
            a[(3 + r, 3 + c)] = k;
            a[(3 + c, 3 + r)] = k;
        }
    }

    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use transformation_models_core::{MatrixError, PivotStrategy};

    fn pts(raw: &[[f64; 2]]) -> Vec<Point2<f64>> {
        raw.iter().map(|&p| Point2::from(p)).collect()
    }

    fn scattered() -> Vec<Point2<f64>> {
        pts(&[
            [0.0, 0.0],
            [10.0, 0.5],
            [0.8, 9.5],
            [11.0, 12.0],
            [5.5, 4.8],
            [3.0, 7.0],
            [8.0, 3.0],
        ])
    }

    fn warp(p: Point2<f64>) -> Point2<f64> {
        Point2::new(
            1000.0 + 1.1 * p.x + 0.02 * p.y * p.y,
            -50.0 + 0.9 * p.y + 3.0 * (p.x / 4.0).sin(),
        )
    }

    #[test]
    fn interpolates_control_points() {
        let source = scattered();
        let target: Vec<_> = source.iter().map(|&p| warp(p)).collect();
        let params = Tps::default()
            .fit_parameters(&source, &target, None)
            .expect("fit");

        assert_eq!(params.m(), source.len());
        assert_eq!(params.x_coeffs().len(), source.len() + 3);
        for (s, t) in source.iter().zip(&target) {
            let q = params.apply(*s);
            assert_abs_diff_eq!(q.x, t.x, epsilon = 1e-6);
            assert_abs_diff_eq!(q.y, t.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn first_non_zero_pivoting_also_interpolates() {
        let source = scattered();
        let target: Vec<_> = source.iter().map(|&p| warp(p)).collect();
        let tps = Tps::new(SolverParams {
            pivot: PivotStrategy::FirstNonZero,
            singular_tolerance: 0.0,
        });
        let params = tps.fit_parameters(&source, &target, None).expect("fit");
        for (s, t) in source.iter().zip(&target) {
            let q = params.apply(*s);
            assert_abs_diff_eq!(q.x, t.x, epsilon = 1e-5);
            assert_abs_diff_eq!(q.y, t.y, epsilon = 1e-5);
        }
    }

    #[test]
    fn reproduces_an_affine_map_everywhere() {
        let source = scattered();
        let affine =
            |p: Point2<f64>| Point2::new(2.0 * p.x - 0.5 * p.y + 7.0, 0.3 * p.x + p.y - 1.0);
        let target: Vec<_> = source.iter().map(|&p| affine(p)).collect();
        let params = Tps::default()
            .fit_parameters(&source, &target, None)
            .expect("fit");

        for w in &params.x_coeffs()[3..] {
            assert_abs_diff_eq!(*w, 0.0, epsilon = 1e-7);
        }
        let probe = Point2::new(4.2, 1.7);
        let q = params.apply(probe);
        assert_abs_diff_eq!(q.x, affine(probe).x, epsilon = 1e-5);
        assert_abs_diff_eq!(q.y, affine(probe).y, epsilon = 1e-5);
    }

    #[test]
    fn identical_sets_give_identity_at_control_points() {
        let source = scattered();
        let params = Tps::default()
            .fit_parameters(&source, &source, None)
            .expect("fit");
        for s in &source {
            let q = params.apply(*s);
            assert_abs_diff_eq!(q.x, s.x, epsilon = 1e-6);
            assert_abs_diff_eq!(q.y, s.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn system_matrix_layout() {
        let cps = pts(&[[0.0, 0.0], [3.0, 4.0]]);
        let a = system_matrix(&cps);
        assert_eq!(a.shape(), (5, 5));
        assert_eq!(a, a.transpose());
        assert_eq!(a[(0, 0)], 0.0);
        assert_eq!(a[(0, 4)], 1.0);
        assert_eq!(a[(1, 4)], 3.0);
        assert_eq!(a[(4, 2)], 4.0);
        assert_eq!(a[(3, 3)], 0.0);
        assert_eq!(a[(3, 4)], 25.0 * 25.0_f64.ln());
    }

    #[test]
    fn mismatched_lengths_fail() {
        let source = scattered();
        let target = &source[..4];
        assert_eq!(
            Tps::default().fit_parameters(&source, target, None),
            Err(TransformError::PointCountMismatch {
                source_count: 7,
                target_count: 4
            })
        );
    }

    #[test]
    fn no_control_points_is_singular() {
        assert_eq!(
            Tps::default().fit_parameters(&[], &[], None),
            Err(TransformError::Matrix(MatrixError::Singular { column: 0 }))
        );
    }

    #[test]
    fn duplicate_control_points_are_singular() {
        let source = pts(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [0.0, 2.0]]);
        let target = pts(&[[1.0, 1.0], [3.0, 1.0], [1.0, 3.0], [1.5, 3.5]]);
        let err = Tps::default()
            .fit_parameters(&source, &target, None)
            .expect_err("duplicate control point");
        assert!(err.is_singular(), "unexpected error: {err}");
    }

    #[test]
    fn infinite_target_coordinate_fails_the_fit() {
        let source = pts(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        let target = pts(&[[0.0, 0.0], [1.0, 0.0], [0.0, f64::INFINITY], [1.0, 1.0]]);
        assert_eq!(
            Tps::default().fit_parameters(&source, &target, None),
            Err(TransformError::SingularFit)
        );
    }

    #[test]
    fn nan_target_coordinate_fails_the_fit() {
        let source = scattered();
        let mut target: Vec<_> = source.iter().map(|&p| warp(p)).collect();
        target[2].x = f64::NAN;
        assert_eq!(
            Tps::default().fit_parameters(&source, &target, None),
            Err(TransformError::SingularFit)
        );
    }

    #[test]
    fn nan_control_point_is_singular() {
        let mut source = scattered();
        source[2].y = f64::NAN;
        let target: Vec<_> = scattered().iter().map(|&p| warp(p)).collect();
        let err = Tps::default()
            .fit_parameters(&source, &target, None)
            .expect_err("nan control point");
        assert!(
            matches!(err, TransformError::Matrix(MatrixError::Singular { .. })),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn cancellation_is_reported() {
        let flag = AtomicBool::new(true);
        let source = scattered();
        assert_eq!(
            Tps::default().fit_parameters(&source, &source, Some(&flag)),
            Err(TransformError::Matrix(MatrixError::Cancelled))
        );
    }
}
