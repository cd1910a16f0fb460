use crate::geometry::polygon_area;
use crate::types::BoundaryPolygon;

/// Picks the largest candidate outline above an area floor.
#[derive(Debug, Clone, Copy)]
pub struct RegionSelector {
    min_area: f64,
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new(5000.0)
    }
}

impl RegionSelector {
    pub fn new(min_area: f64) -> Self {
        Self { min_area }
    }

    pub fn min_area(&self) -> f64 {
        self.min_area
    }

    pub fn select<'a>(&self, contours: &'a [BoundaryPolygon]) -> Option<&'a BoundaryPolygon> {
        self.select_index(contours).map(|(i, _)| &contours[i])
    }

    /// Index and area of the winner. The running max starts at the floor, so a
    /// candidate has to strictly exceed it; equal areas keep the earlier one.
    pub fn select_index(&self, contours: &[BoundaryPolygon]) -> Option<(usize, f64)> {
        let mut max_area = self.min_area;
        let mut best = None;

        for (i, contour) in contours.iter().enumerate() {
            if !contour.is_region() {
                continue;
            }
            let area = polygon_area(&contour.points);
            if area > max_area {
                max_area = area;
                best = Some(i);
            }
        }

        best.map(|i| (i, max_area))
    }
}
