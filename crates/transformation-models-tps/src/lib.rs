//! Thin plate spline (TPS) transformation.
//!
//! A TPS is an affine map plus a weighted sum of radial kernels centred on
//! the control points. Fitting solves one `(m+3)x(m+3)` linear system with
//! the Gauss-Jordan solver from `transformation-models-core`; the fitted
//! spline passes exactly through every control point.

mod fit;
mod kernel;
mod params;

pub use fit::{system_matrix, Tps};
pub use kernel::kernel;
pub use params::TpsParameters;
