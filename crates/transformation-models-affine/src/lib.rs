//! Affine (six-parameter) transformation between two point sets.
//!
//! Parameters are estimated in closed form: both point sets are centred on
//! their centroids, the 2x2 normal equations are solved analytically and the
//! offsets are recovered from the centroids. At least three non-collinear
//! correspondences are needed; exactly three give a zero-residual fit.

mod fit;
mod params;
mod world_file;

pub use fit::{Affine, MIN_AFFINE_POINTS};
pub use params::{AffineFitParams, AffineParameters};
pub use world_file::WorldFileError;
