use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use transformation_models_core::TransformError;

use crate::kernel;

/// Fitted thin plate spline.
///
/// For `m` control points both coefficient vectors have `m + 3` entries:
/// the affine part `[c0, cx, cy]` followed by one kernel weight per control
/// point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TpsParametersRepr")]
pub struct TpsParameters {
    x_coeffs: Vec<f64>,
    y_coeffs: Vec<f64>,
    control_points: Vec<Point2<f64>>,
}

#[derive(Deserialize)]
struct TpsParametersRepr {
    x_coeffs: Vec<f64>,
    y_coeffs: Vec<f64>,
    control_points: Vec<Point2<f64>>,
}

impl TryFrom<TpsParametersRepr> for TpsParameters {
    type Error = TransformError;

    fn try_from(raw: TpsParametersRepr) -> Result<Self, Self::Error> {
        Self::new(raw.x_coeffs, raw.y_coeffs, raw.control_points)
    }
}

impl TpsParameters {
    /// Build parameters from externally computed coefficients.
    pub fn new(
        x_coeffs: Vec<f64>,
        y_coeffs: Vec<f64>,
        control_points: Vec<Point2<f64>>,
    ) -> Result<Self, TransformError> {
        let expected = control_points.len() + 3;
        for got in [x_coeffs.len(), y_coeffs.len()] {
            if got != expected {
                return Err(TransformError::CoefficientLength { expected, got });
            }
        }
        Ok(Self {
            x_coeffs,
            y_coeffs,
            control_points,
        })
    }

    /// Number of control points.
    pub fn m(&self) -> usize {
        self.control_points.len()
    }

    pub fn x_coeffs(&self) -> &[f64] {
        &self.x_coeffs
    }

    pub fn y_coeffs(&self) -> &[f64] {
        &self.y_coeffs
    }

    pub fn control_points(&self) -> &[Point2<f64>] {
        &self.control_points
    }

    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        let (xc, yc) = (&self.x_coeffs, &self.y_coeffs);
        let mut xo = xc[0] + xc[1] * p.x + xc[2] * p.y;
        let mut yo = yc[0] + yc[1] * p.x + yc[2] * p.y;
        for ((cp, wx), wy) in self.control_points.iter().zip(&xc[3..]).zip(&yc[3..]) {
            let k = kernel(p, *cp);
            xo += wx * k;
            yo += wy * k;
        }
        Point2::new(xo, yo)
    }
}
