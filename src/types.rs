use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A single point in frame pixel coordinates (y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

/// Ordered outline of a detected foreground region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundaryPolygon {
    pub points: Vec<Point2D>,
}

impl BoundaryPolygon {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Hull and defect analysis needs at least a triangle.
    pub fn is_region(&self) -> bool {
        self.points.len() >= 3
    }

    pub fn get(&self, index: usize) -> Option<Point2D> {
        self.points.get(index).copied()
    }
}

impl From<Vec<(f64, f64)>> for BoundaryPolygon {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self {
            points: points.into_iter().map(|(x, y)| Point2D { x, y }).collect(),
        }
    }
}

/// A boundary point lying inside the convex hull, described by the hull edge
/// (`start`, `end`), the deepest interior point `far` and its distance from the edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvexityDefect {
    pub start: usize,
    pub end: usize,
    pub far: usize,
    pub depth: f64,
}

impl ConvexityDefect {
    pub fn new(start: usize, end: usize, far: usize, depth: f64) -> Self {
        Self { start, end, far, depth }
    }

    /// OpenCV packs defects as `[start, end, far, depth * 256]`.
    ///
    /// Negative indices become `usize::MAX` so the boundary range check
    /// rejects them.
    pub fn from_fixed_point(raw: [i32; 4]) -> Self {
        let index = |v: i32| usize::try_from(v).unwrap_or(usize::MAX);
        Self {
            start: index(raw[0]),
            end: index(raw[1]),
            far: index(raw[2]),
            depth: raw[3] as f64 / 256.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FingerData {
    pub count: u8,
    /// Mean interior angle (degrees) over valid defects only
    pub avg_angle: f64,
    pub valid_defects: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    /// No hand in frame
    #[default]
    None,
    Fist,
    Palm,
    ThumbsUp,
    IndexUp,
    Peace,
    Rock,
    Ok,
    Fingers(u8),
}

impl GestureLabel {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Fist => write!(f, "Fist"),
            Self::Palm => write!(f, "Palm"),
            Self::ThumbsUp => write!(f, "Thumbs Up"),
            Self::IndexUp => write!(f, "Index Up"),
            Self::Peace => write!(f, "Peace"),
            Self::Rock => write!(f, "Rock"),
            Self::Ok => write!(f, "OK"),
            Self::Fingers(n) => write!(f, "{} Fingers", n),
        }
    }
}

impl Serialize for GestureLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Everything rendering and telemetry need from one analysed frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameResult {
    pub fingers: FingerData,
    pub gesture: GestureLabel,
    pub centroid: Point2D,
    pub area: f64,
    /// All convexity defects of the region, valid or not
    pub defect_count: usize,
}

impl FrameResult {
    /// The steady-state "no hand visible" result
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_region(&self) -> bool {
        !self.gesture.is_none()
    }
}

/// One frame worth of upstream contour output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContourFrame {
    #[serde(default)]
    pub contours: Vec<BoundaryPolygon>,
}

/// Hull and defect data computed by an external contour stage
#[derive(Debug, Clone, Default)]
pub struct RegionGeometry {
    pub boundary: BoundaryPolygon,
    pub hull: Vec<usize>,
    pub defects: Vec<ConvexityDefect>,
    pub centroid: Point2D,
    pub area: f64,
}

/// Frame sequence position, owned by the caller and advanced once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameContext {
    pub index: u64,
}

impl FrameContext {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    pub fn advance(&mut self) {
        self.index += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub index: u64,
    pub result: FrameResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_label_strings() {
        assert_eq!(GestureLabel::ThumbsUp.to_string(), "Thumbs Up");
        assert_eq!(GestureLabel::Ok.to_string(), "OK");
        assert_eq!(GestureLabel::Fingers(4).to_string(), "4 Fingers");
        assert_eq!(GestureLabel::None.to_string(), "");
    }

    #[test]
    fn test_fixed_point_defect() {
        let d = ConvexityDefect::from_fixed_point([3, 9, 6, 6400]);
        assert_eq!((d.start, d.end, d.far), (3, 9, 6));
        assert!((d.depth - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_point_negative_index_out_of_range() {
        let d = ConvexityDefect::from_fixed_point([-1, 3, 2, 6400]);
        assert_eq!(d.start, usize::MAX);
        assert_eq!((d.end, d.far), (3, 2));
    }

    #[test]
    fn test_contour_frame_json() {
        let frame: ContourFrame =
            serde_json::from_str(r#"{"contours": [[[0, 0], [10, 0], [10, 10]]]}"#).unwrap();
        assert_eq!(frame.contours.len(), 1);
        assert_eq!(frame.contours[0].points[2], Point2D::new(10.0, 10.0));
    }

    #[test]
    fn test_frame_result_serializes_label_as_string() {
        let mut result = FrameResult::empty();
        result.gesture = GestureLabel::Peace;
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["gesture"], "Peace");
    }
}
