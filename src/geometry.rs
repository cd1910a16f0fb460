//! Planar geometry over boundary polygons
//!
//! Area and centroid come from polygon moments (Green's theorem), the finger
//! valley angle from the law of cosines, and hull/defects follow the usual
//! contour-order conventions so defect indices point back into the polygon.

use crate::types::{BoundaryPolygon, ConvexityDefect, Point2D};

const DEGENERATE_EPS: f64 = 1e-9;

pub fn distance(a: Point2D, b: Point2D) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Raw spatial moments (m00, m10, m01) of a closed polygon
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

pub fn moments(points: &[Point2D]) -> Moments {
    let n = points.len();
    if n < 3 {
        return Moments::default();
    }

    let mut m = Moments::default();
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        m.m00 += cross;
        m.m10 += (p.x + q.x) * cross;
        m.m01 += (p.y + q.y) * cross;
    }
    m.m00 /= 2.0;
    m.m10 /= 6.0;
    m.m01 /= 6.0;

    // Orientation independent
    if m.m00 < 0.0 {
        m.m00 = -m.m00;
        m.m10 = -m.m10;
        m.m01 = -m.m01;
    }
    m
}

/// Enclosed area (shoelace), always non-negative
pub fn polygon_area(points: &[Point2D]) -> f64 {
    moments(points).m00
}

/// Area-weighted centroid. Zero-area outlines fall back to the vertex mean.
pub fn centroid(points: &[Point2D]) -> Point2D {
    let m = moments(points);
    if m.m00.abs() > DEGENERATE_EPS {
        return Point2D::new(m.m10 / m.m00, m.m01 / m.m00);
    }
    if points.is_empty() {
        return Point2D::default();
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2D::new(sx / n, sy / n)
}

/// Angle at `far` in the triangle (start, far, end), in degrees.
///
/// Uses the law of cosines: `acos((ab² + bc² - ac²) / (2·ab·bc))`.
/// Returns `None` when either side adjacent to `far` has zero length.
pub fn interior_angle(start: Point2D, far: Point2D, end: Point2D) -> Option<f64> {
    let ab = distance(start, far);
    let bc = distance(far, end);
    let ac = distance(start, end);

    if ab < DEGENERATE_EPS || bc < DEGENERATE_EPS {
        return None;
    }

    let cos_angle = ((ab * ab + bc * bc - ac * ac) / (2.0 * ab * bc)).clamp(-1.0, 1.0);
    let angle = cos_angle.acos().to_degrees();
    angle.is_finite().then_some(angle)
}

/// Perpendicular distance from `p` to the line through `a` and `b`
fn line_distance(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    let len = distance(a, b);
    if len < DEGENERATE_EPS {
        return distance(p, a);
    }
    ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / len
}

/// Douglas-Peucker simplification of a closed contour.
///
/// The contour is split at the vertex farthest from the first point so both
/// halves are open chains; the result keeps contour order.
pub fn approximate_polygon(polygon: &BoundaryPolygon, epsilon: f64) -> BoundaryPolygon {
    let points = &polygon.points;
    let n = points.len();
    if n < 3 || epsilon <= 0.0 {
        return polygon.clone();
    }

    let pivot = (1..n)
        .max_by(|&i, &j| {
            distance(points[0], points[i]).total_cmp(&distance(points[0], points[j]))
        })
        .unwrap_or(0);

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[pivot] = true;

    let first: Vec<usize> = (0..=pivot).collect();
    let second: Vec<usize> = (pivot..n).chain(std::iter::once(0)).collect();
    simplify_chain(points, &first, epsilon, &mut keep);
    simplify_chain(points, &second, epsilon, &mut keep);

    BoundaryPolygon::new(
        points
            .iter()
            .zip(keep)
            .filter_map(|(p, k)| k.then_some(*p))
            .collect(),
    )
}

fn simplify_chain(points: &[Point2D], chain: &[usize], epsilon: f64, keep: &mut [bool]) {
    let mut stack = vec![(0usize, chain.len().saturating_sub(1))];
    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let a = points[chain[lo]];
        let b = points[chain[hi]];

        let mut max_d = 0.0;
        let mut max_i = lo;
        for i in lo + 1..hi {
            let d = line_distance(points[chain[i]], a, b);
            if d > max_d {
                max_d = d;
                max_i = i;
            }
        }

        if max_d > epsilon {
            keep[chain[max_i]] = true;
            stack.push((lo, max_i));
            stack.push((max_i, hi));
        }
    }
}

fn cross(o: Point2D, a: Point2D, b: Point2D) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Indices of the convex hull vertices (Andrew's monotone chain), sorted in
/// contour order. Collinear edge points are dropped.
pub fn convex_hull_indices(points: &[Point2D]) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return (0..n).collect();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        points[i]
            .x
            .total_cmp(&points[j].x)
            .then(points[i].y.total_cmp(&points[j].y))
    });

    let mut hull: Vec<usize> = Vec::with_capacity(2 * n);
    // Lower chain
    for &i in &order {
        while hull.len() >= 2
            && cross(points[hull[hull.len() - 2]], points[hull[hull.len() - 1]], points[i]) <= 0.0
        {
            hull.pop();
        }
        hull.push(i);
    }
    // Upper chain
    let lower_len = hull.len() + 1;
    for &i in order.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(points[hull[hull.len() - 2]], points[hull[hull.len() - 1]], points[i]) <= 0.0
        {
            hull.pop();
        }
        hull.push(i);
    }
    hull.pop();

    hull.sort_unstable();
    hull.dedup();
    hull
}

/// Convexity defects between cyclically consecutive hull vertices.
///
/// For each hull edge the contour points strictly between its endpoints are
/// scanned and the farthest one from the edge becomes the defect's `far`
/// point. Edges with nothing receding from them produce no defect.
pub fn convexity_defects(points: &[Point2D], hull: &[usize]) -> Vec<ConvexityDefect> {
    let n = points.len();
    if n < 4 || hull.len() < 3 || hull.iter().any(|&i| i >= n) {
        return Vec::new();
    }

    let mut sorted = hull.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut defects = Vec::new();
    for k in 0..sorted.len() {
        let start = sorted[k];
        let end = sorted[(k + 1) % sorted.len()];
        let a = points[start];
        let b = points[end];

        let mut far = None;
        let mut depth = 0.0;
        let mut i = (start + 1) % n;
        while i != end {
            let d = line_distance(points[i], a, b);
            if d > depth {
                depth = d;
                far = Some(i);
            }
            i = (i + 1) % n;
        }

        if let Some(far) = far {
            defects.push(ConvexityDefect::new(start, end, far, depth));
        }
    }
    defects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(points: &[(f64, f64)]) -> Vec<Point2D> {
        points.iter().map(|&(x, y)| Point2D::new(x, y)).collect()
    }

    #[test]
    fn test_square_area_and_centroid() {
        let square = poly(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        assert!((polygon_area(&square) - 10_000.0).abs() < 1e-9);

        let mut reversed = square.clone();
        reversed.reverse();
        assert!((polygon_area(&reversed) - 10_000.0).abs() < 1e-9);

        let c = centroid(&square);
        assert!((c.x - 50.0).abs() < 1e-9);
        assert!((c.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_centroid_falls_back_to_mean() {
        let line = poly(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        assert_eq!(polygon_area(&line), 0.0);
        assert_eq!(centroid(&line), Point2D::new(10.0, 0.0));
    }

    #[test]
    fn test_right_angle() {
        let angle =
            interior_angle(Point2D::new(0.0, 10.0), Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0))
                .unwrap();
        assert!((angle - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_straight_angle() {
        let angle =
            interior_angle(Point2D::new(-5.0, 0.0), Point2D::new(0.0, 0.0), Point2D::new(5.0, 0.0))
                .unwrap();
        assert!((angle - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_angle() {
        let p = Point2D::new(3.0, 3.0);
        assert_eq!(interior_angle(p, p, Point2D::new(9.0, 9.0)), None);
        assert_eq!(interior_angle(Point2D::new(9.0, 9.0), p, p), None);
    }

    #[test]
    fn test_hull_of_square_with_interior_point() {
        let points = poly(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        assert_eq!(convex_hull_indices(&points), vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_rectangle_has_no_defects() {
        let rect = poly(&[(0.0, 0.0), (200.0, 0.0), (200.0, 100.0), (0.0, 100.0)]);
        let hull = convex_hull_indices(&rect);
        assert!(convexity_defects(&rect, &hull).is_empty());
    }

    #[test]
    fn test_notch_defect() {
        // Square with a V cut into the top edge
        let points = poly(&[
            (0.0, 0.0),
            (40.0, 0.0),
            (50.0, 60.0),
            (60.0, 0.0),
            (100.0, 0.0),
            (100.0, 100.0),
            (0.0, 100.0),
        ]);
        let hull = convex_hull_indices(&points);
        let defects = convexity_defects(&points, &hull);
        assert_eq!(defects.len(), 1);
        let d = defects[0];
        // Notch corners are collinear with the top edge, so the hull spans 0..4
        assert_eq!((d.start, d.far, d.end), (0, 2, 4));
        assert!((d.depth - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_approximation_drops_collinear_points() {
        let mut outline = Vec::new();
        for i in 0..10 {
            outline.push((i as f64 * 10.0, 0.0));
        }
        outline.push((100.0, 0.0));
        outline.push((100.0, 100.0));
        outline.push((0.0, 100.0));
        let approx = approximate_polygon(&BoundaryPolygon::from(outline), 3.0);
        assert_eq!(approx.len(), 4);
        assert!((polygon_area(&approx.points) - 10_000.0).abs() < 1e-9);
    }
}
