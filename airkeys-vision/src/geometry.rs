use airkeys_shared::Point;

/// Axis-aligned rectangle in pixel coordinates, width/height measured in
/// pixels covered (a single point has width 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Smallest rectangle covering all points. `None` for an empty slice.
pub fn bounding_rect(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    Some(Rect {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Angle at `b` in the triangle `a-b-c`, in degrees, via the law of
/// cosines. Degenerate triangles (a zero-length side) report a flat angle
/// so they never pass a narrow-valley test.
pub fn angle_at(a: Point, b: Point, c: Point) -> f64 {
    let ab = a.distance_to(&b);
    let bc = b.distance_to(&c);
    let ca = c.distance_to(&a);
    if ab == 0.0 || bc == 0.0 {
        return 180.0;
    }
    let cosine = ((ab * ab + bc * bc - ca * ca) / (2.0 * ab * bc)).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
/// Falls back to point distance when the chord is degenerate.
pub fn distance_to_line(p: Point, a: Point, b: Point) -> f64 {
    let chord = a.distance_to(&b);
    if chord == 0.0 {
        return p.distance_to(&a);
    }
    let cross = (b.x - a.x) as i64 * (p.y - a.y) as i64 - (b.y - a.y) as i64 * (p.x - a.x) as i64;
    cross.unsigned_abs() as f64 / chord
}
