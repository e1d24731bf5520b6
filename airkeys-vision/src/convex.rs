//! Convex hull and convexity defects of a contour.

use airkeys_shared::Point;

use crate::geometry;

/// A region where the contour dips inward from its convex hull: the chord
/// between two hull vertices (`start`/`end`) and the contour point farthest
/// from that chord (`far`). All three are indices into the contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvexityDefect {
    pub start: usize,
    pub end: usize,
    pub far: usize,
    pub depth: f64,
}

/// Indices of the contour points forming its convex hull, sorted in contour
/// order. Collinear boundary points are not hull vertices. Degenerate input
/// (fewer than three distinct points) yields fewer than three indices.
pub fn hull_indices(contour: &[Point]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..contour.len()).collect();
    order.sort_by_key(|&i| (contour[i].x, contour[i].y, i));
    order.dedup_by_key(|i| (contour[*i].x, contour[*i].y));

    if order.len() <= 2 {
        return order;
    }

    let cross = |o: Point, a: Point, b: Point| -> i64 {
        (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
    };

    let mut hull: Vec<usize> = Vec::with_capacity(order.len() + 1);
    for &i in order.iter() {
        while hull.len() >= 2
            && cross(
                contour[hull[hull.len() - 2]],
                contour[hull[hull.len() - 1]],
                contour[i],
            ) <= 0
        {
            hull.pop();
        }
        hull.push(i);
    }
    let lower_len = hull.len() + 1;
    for &i in order.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(
                contour[hull[hull.len() - 2]],
                contour[hull[hull.len() - 1]],
                contour[i],
            ) <= 0
        {
            hull.pop();
        }
        hull.push(i);
    }
    hull.pop();

    hull.sort_unstable();
    hull
}

/// Convexity defects: for each hull edge, the farthest contour point
/// strictly between its endpoints in contour order. Hull indices must be
/// sorted in contour order, as [`hull_indices`] returns them. Shallow
/// defects are included; callers filter by depth and shape.
pub fn convexity_defects(contour: &[Point], hull: &[usize]) -> Vec<ConvexityDefect> {
    let n = contour.len();
    if hull.len() < 3 {
        return Vec::new();
    }

    let mut defects = Vec::new();
    for w in 0..hull.len() {
        let start = hull[w];
        let end = hull[(w + 1) % hull.len()];

        let mut far = None;
        let mut depth = 0.0;
        let mut j = (start + 1) % n;
        while j != end {
            let d = geometry::distance_to_line(contour[j], contour[start], contour[end]);
            if far.is_none() || d > depth {
                far = Some(j);
                depth = d;
            }
            j = (j + 1) % n;
        }

        if let Some(far) = far {
            defects.push(ConvexityDefect {
                start,
                end,
                far,
                depth,
            });
        }
    }
    defects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_hull_drops_collinear_points() {
        // Square traced clockwise with edge midpoints.
        let contour = pts(&[
            (0, 0),
            (5, 0),
            (10, 0),
            (10, 5),
            (10, 10),
            (5, 10),
            (0, 10),
            (0, 5),
        ]);
        let hull = hull_indices(&contour);
        assert_eq!(hull, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_hull_degenerate_line() {
        let contour = pts(&[(0, 0), (5, 0), (10, 0)]);
        let hull = hull_indices(&contour);
        assert!(hull.len() <= 2);
        assert!(convexity_defects(&contour, &hull).is_empty());
    }

    #[test]
    fn test_defect_in_notched_square() {
        // Top edge dips down to (5,5).
        let contour = pts(&[(0, 0), (5, 5), (10, 0), (10, 10), (0, 10)]);
        let hull = hull_indices(&contour);
        assert_eq!(hull, vec![0, 2, 3, 4]);

        let defects = convexity_defects(&contour, &hull);
        let deepest = defects
            .iter()
            .max_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap())
            .unwrap();
        assert_eq!(deepest.start, 0);
        assert_eq!(deepest.end, 2);
        assert_eq!(deepest.far, 1);
        assert!((deepest.depth - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_points_use_first_index() {
        let contour = pts(&[(0, 0), (10, 0), (10, 10), (0, 10), (0, 0), (10, 0)]);
        let hull = hull_indices(&contour);
        assert_eq!(hull, vec![0, 1, 2, 3]);
    }
}
