use nalgebra::Point2;

/// Thin plate spline radial basis `d² ln(d²)` of the squared distance
/// between `p` and `q`; zero for coincident points.
#[inline]
pub fn kernel(p: Point2<f64>, q: Point2<f64>) -> f64 {
    if p == q {
        return 0.0;
    }
    let d2 = (p - q).norm_squared();
    if d2 == 0.0 {
        // underflow for points closer than ~1e-162
        return 0.0;
    }
    d2 * d2.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_at_coincident_points() {
        let p = Point2::new(4.0, -2.0);
        assert_eq!(kernel(p, p), 0.0);
    }

    #[test]
    fn unit_distance_is_a_root() {
        assert_eq!(kernel(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)), 0.0);
    }

    #[test]
    fn symmetric_squared_distance_log() {
        let p = Point2::new(1.0, 2.0);
        let q = Point2::new(4.0, 6.0);
        assert_relative_eq!(kernel(p, q), 25.0 * 25.0_f64.ln(), epsilon = 1e-12);
        assert_eq!(kernel(p, q), kernel(q, p));
    }
}
