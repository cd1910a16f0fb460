//! Gesture classification
//!
//! An ordered decision table: rules are evaluated top to bottom and the first
//! matching predicate decides the label. Anything unmatched falls through to
//! `"<n> Fingers"`.

use crate::config::Thresholds;
use crate::geometry::distance;
use crate::types::{BoundaryPolygon, GestureLabel, Point2D};

/// Inputs a rule can look at
pub struct Observation<'a> {
    pub finger_count: u8,
    pub boundary: &'a BoundaryPolygon,
    pub centroid: Point2D,
    pub thresholds: &'a Thresholds,
}

pub struct GestureRule {
    pub name: &'static str,
    pub matches: fn(&Observation) -> bool,
    pub label: GestureLabel,
}

pub const GESTURE_RULES: &[GestureRule] = &[
    GestureRule {
        name: "fist",
        matches: |o| o.finger_count == 0,
        label: GestureLabel::Fist,
    },
    GestureRule {
        name: "palm",
        matches: |o| o.finger_count == 5,
        label: GestureLabel::Palm,
    },
    GestureRule {
        name: "thumbs_up",
        matches: |o| {
            o.finger_count == 1
                && topmost(&o.boundary.points).is_some_and(|p| p.y < o.centroid.y)
        },
        label: GestureLabel::ThumbsUp,
    },
    GestureRule {
        name: "index_up",
        matches: |o| o.finger_count == 1,
        label: GestureLabel::IndexUp,
    },
    GestureRule {
        name: "peace",
        matches: |o| {
            o.finger_count == 2
                && top_pair_spread(&o.boundary.points)
                    .is_some_and(|dx| dx > o.thresholds.peace_min_spread)
        },
        label: GestureLabel::Peace,
    },
    GestureRule {
        name: "rock",
        matches: |o| o.finger_count == 2,
        label: GestureLabel::Rock,
    },
    GestureRule {
        name: "ok",
        matches: |o| {
            o.finger_count == 3
                && any_pair_within(&o.boundary.points, o.thresholds.ok_max_pinch_distance)
        },
        label: GestureLabel::Ok,
    },
];

/// Topmost boundary point (smallest y). Ties keep the earliest point.
pub fn topmost(points: &[Point2D]) -> Option<Point2D> {
    points
        .iter()
        .copied()
        .reduce(|best, p| if p.y < best.y { p } else { best })
}

/// Horizontal distance between the two smallest-y boundary points
pub fn top_pair_spread(points: &[Point2D]) -> Option<f64> {
    let mut sorted = points.to_vec();
    // stable: equal heights stay in boundary order
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y));
    match sorted.as_slice() {
        [first, second, ..] => Some((first.x - second.x).abs()),
        _ => None,
    }
}

/// Whether the closest pair of boundary points is nearer than `max_distance`.
///
/// Same outcome as taking the minimum over all O(n²) pairs, but stops at the
/// first qualifying pair.
pub fn any_pair_within(points: &[Point2D], max_distance: f64) -> bool {
    points.iter().enumerate().any(|(i, &a)| {
        points[i + 1..]
            .iter()
            .any(|&b| distance(a, b) < max_distance)
    })
}

#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    thresholds: Thresholds,
}

impl GestureClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(
        &self,
        finger_count: u8,
        boundary: &BoundaryPolygon,
        centroid: Point2D,
    ) -> GestureLabel {
        let observation = Observation {
            finger_count,
            boundary,
            centroid,
            thresholds: &self.thresholds,
        };
        self.matching_rule(&observation)
            .map(|rule| rule.label)
            .unwrap_or(GestureLabel::Fingers(finger_count))
    }

    pub fn matching_rule(&self, observation: &Observation) -> Option<&'static GestureRule> {
        GESTURE_RULES.iter().find(|rule| (rule.matches)(observation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(points: &[(f64, f64)]) -> BoundaryPolygon {
        BoundaryPolygon::from(points.to_vec())
    }

    /// Points far apart from each other so the pinch rule never fires
    fn sparse_hand() -> BoundaryPolygon {
        boundary(&[(0.0, 300.0), (100.0, 0.0), (200.0, 300.0), (100.0, 400.0)])
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = GESTURE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["fist", "palm", "thumbs_up", "index_up", "peace", "rock", "ok"]
        );
    }

    #[test]
    fn test_fist_and_palm_ignore_geometry() {
        let c = GestureClassifier::default();
        let centroid = Point2D::new(100.0, 200.0);
        assert_eq!(c.classify(0, &sparse_hand(), centroid), GestureLabel::Fist);
        assert_eq!(c.classify(5, &sparse_hand(), centroid), GestureLabel::Palm);
        assert_eq!(c.classify(0, &BoundaryPolygon::default(), centroid), GestureLabel::Fist);
    }

    #[test]
    fn test_one_finger() {
        let c = GestureClassifier::default();
        let hand = sparse_hand();
        assert_eq!(c.classify(1, &hand, Point2D::new(100.0, 200.0)), GestureLabel::ThumbsUp);
        // topmost y == centroid y is not above it
        assert_eq!(c.classify(1, &hand, Point2D::new(100.0, 0.0)), GestureLabel::IndexUp);
    }

    #[test]
    fn test_two_fingers() {
        let c = GestureClassifier::default();
        let centroid = Point2D::new(40.0, 200.0);
        let peace = boundary(&[(10.0, 0.0), (35.0, 300.0), (60.0, 5.0)]);
        assert_eq!(c.classify(2, &peace, centroid), GestureLabel::Peace);

        let rock = boundary(&[(10.0, 0.0), (80.0, 300.0), (30.0, 5.0)]);
        assert_eq!(c.classify(2, &rock, centroid), GestureLabel::Rock);
    }

    #[test]
    fn test_three_fingers() {
        let c = GestureClassifier::default();
        let centroid = Point2D::new(100.0, 200.0);
        assert_eq!(c.classify(3, &sparse_hand(), centroid), GestureLabel::Fingers(3));

        let pinched = boundary(&[(0.0, 300.0), (100.0, 0.0), (130.0, 20.0), (200.0, 300.0)]);
        assert_eq!(c.classify(3, &pinched, centroid), GestureLabel::Ok);
    }

    #[test]
    fn test_four_fingers_default() {
        let c = GestureClassifier::default();
        let label = c.classify(4, &sparse_hand(), Point2D::new(100.0, 200.0));
        assert_eq!(label.to_string(), "4 Fingers");
    }

    #[test]
    fn test_topmost_tie_keeps_first() {
        let points = [Point2D::new(5.0, 1.0), Point2D::new(9.0, 1.0)];
        assert_eq!(topmost(&points), Some(Point2D::new(5.0, 1.0)));
        assert_eq!(topmost(&[]), None);
    }

    #[test]
    fn test_pair_checks() {
        let points = [Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0), Point2D::new(0.0, 49.0)];
        assert!(any_pair_within(&points, 50.0));
        assert!(!any_pair_within(&points, 49.0));
        assert_eq!(top_pair_spread(&points), Some(100.0));
        assert_eq!(top_pair_spread(&points[..1]), None);
    }
}
