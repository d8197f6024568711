/// Errors returned by the Gauss-Jordan solver.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixError {
    #[error("matrix is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },
    #[error("matrix is singular (no usable pivot in column {column})")]
    Singular { column: usize },
    #[error("matrix inversion cancelled")]
    Cancelled,
}

/// Errors returned while fitting or evaluating a transformation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("number of points do not match (source={source_count}, target={target_count})")]
    PointCountMismatch {
        source_count: usize,
        target_count: usize,
    },
    #[error("at least {required} points are required, got {got}")]
    InsufficientPoints { required: usize, got: usize },
    #[error("least-squares fit is singular (points are collinear or coincident)")]
    SingularFit,
    #[error("transformation parameters have not been calculated")]
    NotCalculated,
    #[error("coefficient vectors must have {expected} entries, got {got}")]
    CoefficientLength { expected: usize, got: usize },
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

impl TransformError {
    /// `true` when the failure came from a singular matrix or a singular fit.
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            TransformError::SingularFit | TransformError::Matrix(MatrixError::Singular { .. })
        )
    }
}
