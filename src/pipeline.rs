use crate::config::{AppConfig, Thresholds};
use crate::error::AnalysisError;
use crate::fingers::FingerCounter;
use crate::geometry::{approximate_polygon, centroid, convex_hull_indices, convexity_defects};
use crate::gesture::GestureClassifier;
use crate::region::RegionSelector;
use crate::types::{
    ContourFrame, FrameContext, FrameReport, FrameResult, Point2D, RegionGeometry,
};

/// Boundary outlines in, finger count and gesture out.
///
/// Holds only configuration; every call is independent of the previous one.
#[derive(Debug, Clone)]
pub struct GesturePipeline {
    selector: RegionSelector,
    counter: FingerCounter,
    classifier: GestureClassifier,
    approx_epsilon: f64,
}

impl Default for GesturePipeline {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl GesturePipeline {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_thresholds(config.thresholds.clone(), config.contour.approx_epsilon)
    }

    pub fn with_thresholds(thresholds: Thresholds, approx_epsilon: f64) -> Self {
        Self {
            selector: RegionSelector::new(thresholds.min_region_area),
            counter: FingerCounter::from_thresholds(&thresholds),
            classifier: GestureClassifier::new(thresholds),
            approx_epsilon,
        }
    }

    pub fn name(&self) -> String {
        "Convexity Defect Gestures".to_string()
    }

    pub fn process(&self, ctx: &FrameContext, frame: &ContourFrame) -> FrameReport {
        report_or_empty(ctx, self.process_contours(frame))
    }

    /// Per-frame entry point for upstream hull/defect data. Malformed geometry
    /// reads as "no hand" like in `process`.
    pub fn process_region(&self, ctx: &FrameContext, region: &RegionGeometry) -> FrameReport {
        report_or_empty(ctx, self.analyze(region).map(Some))
    }

    /// `Ok(None)` when no contour qualifies as a hand.
    pub fn process_contours(&self, frame: &ContourFrame) -> Result<Option<FrameResult>, AnalysisError> {
        let Some((index, area)) = self.selector.select_index(&frame.contours) else {
            return Ok(None);
        };
        let contour = &frame.contours[index];

        // Reported centroid and area come from the raw outline; hull analysis
        // and classification use the simplified one
        let boundary = approximate_polygon(contour, self.approx_epsilon);
        let shape_center = centroid(&boundary.points);
        let hull = convex_hull_indices(&boundary.points);
        let defects = convexity_defects(&boundary.points, &hull);

        let region = RegionGeometry {
            boundary,
            hull,
            defects,
            centroid: centroid(&contour.points),
            area,
        };
        self.evaluate(&region, shape_center).map(Some)
    }

    /// Finger count and gesture for a region whose hull and defects were
    /// computed upstream.
    pub fn analyze(&self, region: &RegionGeometry) -> Result<FrameResult, AnalysisError> {
        self.evaluate(region, region.centroid)
    }

    fn evaluate(
        &self,
        region: &RegionGeometry,
        shape_center: Point2D,
    ) -> Result<FrameResult, AnalysisError> {
        if !region.boundary.is_region() {
            return Err(AnalysisError::BoundaryTooSmall(region.boundary.len()));
        }

        let fingers = self.counter.count(&region.defects, &region.boundary)?;
        let gesture = self
            .classifier
            .classify(fingers.count, &region.boundary, shape_center);

        Ok(FrameResult {
            fingers,
            gesture,
            centroid: region.centroid,
            area: region.area,
            defect_count: region.defects.len(),
        })
    }
}

fn report_or_empty(
    ctx: &FrameContext,
    outcome: Result<Option<FrameResult>, AnalysisError>,
) -> FrameReport {
    let result = match outcome {
        Ok(Some(result)) => result,
        Ok(None) => FrameResult::empty(),
        Err(e) => {
            tracing::debug!(frame = ctx.index, "dropping malformed region: {}", e);
            FrameResult::empty()
        }
    };
    FrameReport {
        index: ctx.index,
        result,
    }
}
