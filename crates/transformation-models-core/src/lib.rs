//! Core types shared by the transformation models.
//!
//! This crate holds the pieces both estimators depend on: the error enums,
//! the Gauss-Jordan matrix solver, and the [`TransformModel`] trait the
//! orchestrator dispatches through. It has no knowledge of any concrete
//! model.

mod error;
mod logger;
mod matrix;
mod model;

pub use error::{MatrixError, TransformError};
pub use matrix::{invert, GaussJordan, PivotStrategy, SolverParams};
pub use model::{check_correspondence, TransformModel};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

pub use nalgebra::Point2;

/// A point as `(x, y)` = (Northing, Easting).
pub type Point = Point2<f64>;
