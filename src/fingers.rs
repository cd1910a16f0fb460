//! Finger counting from convexity defects
//!
//! Every deep, narrow defect is a valley between two raised fingers, so N
//! valleys mean N + 1 fingers.

use crate::config::Thresholds;
use crate::error::AnalysisError;
use crate::geometry::interior_angle;
use crate::types::{BoundaryPolygon, ConvexityDefect, FingerData};

/// A hand cannot show more
pub const MAX_FINGERS: u8 = 5;

#[derive(Debug, Clone, Copy)]
pub struct FingerCounter {
    min_depth: f64,
    max_angle: f64,
}

impl Default for FingerCounter {
    fn default() -> Self {
        Self::from_thresholds(&Thresholds::default())
    }
}

impl FingerCounter {
    pub fn from_thresholds(thresholds: &Thresholds) -> Self {
        Self {
            min_depth: thresholds.min_defect_depth,
            max_angle: thresholds.max_defect_angle,
        }
    }

    pub fn count(
        &self,
        defects: &[ConvexityDefect],
        boundary: &BoundaryPolygon,
    ) -> Result<FingerData, AnalysisError> {
        if defects.is_empty() {
            return Ok(FingerData::default());
        }

        let len = boundary.len();
        let mut valid = 0usize;
        let mut sum_angle = 0.0;

        for defect in defects {
            let point = |index: usize| {
                boundary
                    .get(index)
                    .ok_or(AnalysisError::DefectIndexOutOfRange { index, len })
            };
            let start = point(defect.start)?;
            let end = point(defect.end)?;
            let far = point(defect.far)?;

            // NaN depth is never deeper than the threshold
            if defect.depth.is_nan() || defect.depth <= self.min_depth {
                continue;
            }

            match interior_angle(start, far, end) {
                Some(angle) if angle < self.max_angle => {
                    valid += 1;
                    sum_angle += angle;
                }
                Some(_) => {}
                None => tracing::trace!(?defect, "skipping degenerate defect"),
            }
        }

        let avg_angle = if valid > 0 { sum_angle / valid as f64 } else { 0.0 };
        let count = (valid + 1).min(MAX_FINGERS as usize) as u8;

        Ok(FingerData {
            count,
            avg_angle,
            valid_defects: valid,
        })
    }
}
