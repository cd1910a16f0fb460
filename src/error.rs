use thiserror::Error;

/// Malformed upstream geometry. Callers treat these as "no region" for the frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("boundary has {0} points, need at least 3")]
    BoundaryTooSmall(usize),
    #[error("defect references point {index} but boundary has {len} points")]
    DefectIndexOutOfRange { index: usize, len: usize },
}
