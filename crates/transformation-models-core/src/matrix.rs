//! Dense square-matrix inversion by Gauss-Jordan elimination.
//!
//! The solver reduces `[M | I]` to `[I | M^-1]` with row operations. Pivot
//! rows are chosen per [`PivotStrategy`]; a column without an acceptable
//! pivot means the matrix is singular.

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::MatrixError;

/// How the pivot row is selected for each column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotStrategy {
    /// First acceptable row at or below the diagonal.
    FirstNonZero,
    /// Acceptable row with the largest magnitude relative to its row scale.
    #[default]
    Partial,
}

/// Configuration for [`GaussJordan`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    pub pivot: PivotStrategy,
    /// A candidate pivot `v` in row `r` is accepted iff
    /// `|v| > singular_tolerance * scale(r)`, where `scale(r)` is the largest
    /// absolute entry of row `r` in the input matrix.
    ///
    /// `0.0` accepts any non-zero entry.
    pub singular_tolerance: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            pivot: PivotStrategy::Partial,
            singular_tolerance: 1e-12,
        }
    }
}

/// Gauss-Jordan inverter with an optional cancellation flag.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaussJordan<'a> {
    params: SolverParams,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> GaussJordan<'a> {
    pub fn new(params: SolverParams) -> Self {
        Self {
            params,
            cancel: None,
        }
    }

    /// Abort with [`MatrixError::Cancelled`] once `flag` is set.
    ///
    /// The flag is polled before each pivot column.
    pub fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Invert a square matrix.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(n = m.nrows()))
    )]
    pub fn invert(&self, m: &DMatrix<f64>) -> Result<DMatrix<f64>, MatrixError> {
        let (rows, cols) = m.shape();
        if rows != cols {
            return Err(MatrixError::NotSquare { rows, cols });
        }
        let n = rows;

        let mut work = m.clone();
        let mut inv = DMatrix::<f64>::identity(n, n);
        let mut scale: Vec<f64> = (0..n)
            .map(|r| work.row(r).iter().fold(0.0_f64, |acc, v| acc.max(v.abs())))
            .collect();

        for col in 0..n {
            if self.is_cancelled() {
                return Err(MatrixError::Cancelled);
            }

            let Some(pivot_row) = self.select_pivot(&work, &scale, col) else {
                debug!("no pivot in column {col} of {n}x{n} matrix");
                return Err(MatrixError::Singular { column: col });
            };
            if pivot_row != col {
                work.swap_rows(col, pivot_row);
                inv.swap_rows(col, pivot_row);
                scale.swap(col, pivot_row);
            }

            let pivot = work[(col, col)];
            for c in 0..n {
                work[(col, c)] /= pivot;
                inv[(col, c)] /= pivot;
            }

            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = work[(r, col)];
                if factor == 0.0 {
                    continue;
                }
                for c in 0..n {
                    let w = factor * work[(col, c)];
                    let i = factor * inv[(col, c)];
                    work[(r, c)] -= w;
                    inv[(r, c)] -= i;
                }
            }
        }

        if let Some(column) = inv
            .column_iter()
            .position(|c| c.iter().any(|v| !v.is_finite()))
        {
            debug!("non-finite entry in column {column} of the inverse");
            return Err(MatrixError::Singular { column });
        }

        Ok(inv)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn select_pivot(&self, work: &DMatrix<f64>, scale: &[f64], col: usize) -> Option<usize> {
        let tol = self.params.singular_tolerance;
        let weight = |r: usize| {
            let v = work[(r, col)].abs();
            if scale[r] > 0.0 {
                v / scale[r]
            } else {
                v
            }
        };
        let mut candidates = (col..work.nrows()).filter(|&r| {
            let v = work[(r, col)];
            v.is_finite() && v != 0.0 && v.abs() > tol * scale[r]
        });

        match self.params.pivot {
            PivotStrategy::FirstNonZero => candidates.next(),
            PivotStrategy::Partial => candidates
                .fold(None, |best: Option<(usize, f64)>, r| {
                    let w = weight(r);
                    match best {
                        Some((_, bw)) if bw >= w => best,
                        _ => Some((r, w)),
                    }
                })
                .map(|(r, _)| r),
        }
    }
}

/// Invert `m` with the default [`SolverParams`].
pub fn invert(m: &DMatrix<f64>) -> Result<DMatrix<f64>, MatrixError> {
    GaussJordan::default().invert(m)
}
