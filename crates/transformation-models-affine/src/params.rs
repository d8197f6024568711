use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Affine transformation parameters.
///
/// `x' = a*x + b*y + c`, `y' = d*x + e*y + f`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineParameters {
    pub const IDENTITY: AffineParameters = AffineParameters {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[inline]
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        Point2::new(
            self.a * p.x + self.b * p.y + self.c,
            self.d * p.x + self.e * p.y + self.f,
        )
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Analytic inverse, `None` if the linear part is not invertible.
    ///
    /// Unlike the inverse slot filled by `calculate`, this is the exact
    /// inverse map of `self`, not a least-squares refit.
    pub fn inverse(&self) -> Option<AffineParameters> {
        let det = self.a * self.e - self.b * self.d;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let a = self.e / det;
        let b = -self.b / det;
        let d = -self.d / det;
        let e = self.a / det;
        let inv = AffineParameters {
            a,
            b,
            c: -(a * self.c + b * self.f),
            d,
            e,
            f: -(d * self.c + e * self.f),
        };
        inv.is_finite().then_some(inv)
    }
}

impl Default for AffineParameters {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Configuration for the affine fitter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffineFitParams {
    /// Reject the fit when `n1 <= collinearity_tolerance * sxx * syy`, with
    /// `n1 = sxx * syy - sxy^2` the normal-equation determinant over the
    /// centred source coordinates.
    pub collinearity_tolerance: f64,
}

impl Default for AffineFitParams {
    fn default() -> Self {
        Self {
            collinearity_tolerance: 1e-12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inverse_undoes_apply() {
        let p = AffineParameters::new(1.5, -0.2, 300.0, 0.3, 0.8, -50.0);
        let inv = p.inverse().expect("invertible");
        for q in [
            Point2::new(0.0, 0.0),
            Point2::new(12.5, -3.0),
            Point2::new(-400.0, 90.0),
        ] {
            let back = inv.apply(p.apply(q));
            assert_relative_eq!(back.x, q.x, epsilon = 1e-9);
            assert_relative_eq!(back.y, q.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn degenerate_linear_part_has_no_inverse() {
        let p = AffineParameters::new(1.0, 2.0, 0.0, 2.0, 4.0, 0.0);
        assert!(p.inverse().is_none());
    }

    #[test]
    fn identity_is_default() {
        let p = Point2::new(3.0, -7.0);
        assert_eq!(AffineParameters::default().apply(p), p);
    }
}
