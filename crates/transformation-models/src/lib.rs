//! Fit and evaluate 2D transformations between paired point sets.
//!
//! This crate provides:
//! - [`Transformation`], which fits forward (source -> target) and inverse
//!   (target -> source) parameters for a chosen model,
//! - [`AnyTransformation`] for choosing the model at runtime,
//! - [`TransformConfig`] to build either from JSON,
//! - re-exports of the model crates.
//!
//! ## Quickstart
//!
//! ```
//! use transformation_models::{Affine, Point2, Transformation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]].map(Point2::from);
//! let target = [[10.0, 20.0], [11.0, 20.0], [10.0, 21.0]].map(Point2::from);
//!
//! let affine = Transformation::from_points(Affine::default(), &source, &target)?;
//! let p = affine.forward([5.0, 5.0])?;
//! assert!((p.x - 15.0).abs() < 1e-9 && (p.y - 25.0).abs() < 1e-9);
//! println!("{}", affine.to_world_file(false)?);
//! # Ok(())
//! # }
//! ```
//!
//! Points are `(x, y)` = (Northing, Easting).
//!
//! ## Models
//! - [`Affine`]: six parameters, least squares, needs 3+ non-collinear points.
//!   Evaluating before a fit fails with [`TransformError::NotCalculated`].
//! - [`Tps`]: thin plate spline, interpolates every control point. Evaluating
//!   before a fit returns the input point unchanged.

mod any;
mod config;
mod transformation;

pub use transformation_models_affine as affine;
pub use transformation_models_core as core;
pub use transformation_models_tps as tps;

pub use any::{AnyTransformation, TransformKind};
pub use config::{ConfigError, TransformConfig};
pub use transformation::{TransformState, Transformation};

pub use transformation_models_affine::{
    Affine, AffineFitParams, AffineParameters, WorldFileError,
};
pub use transformation_models_core::{
    init_with_level, invert, GaussJordan, MatrixError, PivotStrategy, Point, Point2,
    SolverParams, TransformError, TransformModel,
};
pub use transformation_models_tps::{Tps, TpsParameters};

#[cfg(feature = "tracing")]
pub use transformation_models_core::init_tracing;
