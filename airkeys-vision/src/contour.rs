//! External contours of connected foreground regions.

use std::collections::HashSet;

use airkeys_shared::Point;

use crate::mask::Mask;

/// Closed boundary point sequence of one connected foreground region.
pub type Contour = Vec<Point>;

// Moore neighborhood in clockwise order (image coordinates, y down),
// starting west.
const NEIGHBORS: [(i64, i64); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

fn direction_index(delta: (i64, i64)) -> Option<usize> {
    NEIGHBORS.iter().position(|&d| d == delta)
}

/// Finds the outer boundary of every 8-connected foreground region, in
/// row-major discovery order. Holes inside a region are not traced.
pub fn find_external_contours(mask: &Mask) -> Vec<Contour> {
    let (w, h) = (mask.width(), mask.height());
    let mut labels = vec![0u32; w * h];
    let mut contours = Vec::new();
    let mut next_label = 0u32;

    for y in 0..h {
        for x in 0..w {
            if !mask.is_set(x as i64, y as i64) || labels[y * w + x] != 0 {
                continue;
            }
            next_label += 1;
            flood_fill(mask, &mut labels, next_label, (x, y));
            contours.push(trace_boundary(
                &labels,
                w,
                h,
                next_label,
                (x as i64, y as i64),
            ));
        }
    }
    contours
}

/// Enclosed area of a contour polygon (shoelace formula).
pub fn contour_area(contour: &[Point]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }
    let mut doubled: i64 = 0;
    for i in 0..contour.len() {
        let a = contour[i];
        let b = contour[(i + 1) % contour.len()];
        doubled += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    doubled.unsigned_abs() as f64 / 2.0
}

fn flood_fill(mask: &Mask, labels: &mut [u32], label: u32, start: (usize, usize)) {
    let (w, h) = (mask.width(), mask.height());
    let mut stack = vec![start];
    labels[start.1 * w + start.0] = label;
    while let Some((x, y)) = stack.pop() {
        for (dx, dy) in NEIGHBORS {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                continue;
            }
            let idx = ny as usize * w + nx as usize;
            if labels[idx] == 0 && mask.is_set(nx, ny) {
                labels[idx] = label;
                stack.push((nx as usize, ny as usize));
            }
        }
    }
}

/// Moore-neighbor boundary tracing over one labeled region. The start pixel
/// is the region's first pixel in row-major order, so the trace enters it
/// from the west. Terminates when a (pixel, entry direction) state repeats.
fn trace_boundary(labels: &[u32], w: usize, h: usize, label: u32, start: (i64, i64)) -> Contour {
    let in_region = |x: i64, y: i64| -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < w
            && (y as usize) < h
            && labels[y as usize * w + x as usize] == label
    };

    let mut contour = vec![Point::new(start.0 as i32, start.1 as i32)];
    let mut current = start;
    let mut backtrack = 0usize;
    let mut visited: HashSet<(i64, i64, usize)> = HashSet::new();

    loop {
        if !visited.insert((current.0, current.1, backtrack)) {
            break;
        }

        let mut hit = None;
        for k in 1..=8 {
            let dir = (backtrack + k) % 8;
            let (dx, dy) = NEIGHBORS[dir];
            if in_region(current.0 + dx, current.1 + dy) {
                hit = Some((dir, (backtrack + k - 1) % 8));
                break;
            }
        }
        let Some((dir, last_background_dir)) = hit else {
            // Isolated pixel.
            break;
        };

        let (dx, dy) = NEIGHBORS[dir];
        let next = (current.0 + dx, current.1 + dy);
        let background = (
            current.0 + NEIGHBORS[last_background_dir].0,
            current.1 + NEIGHBORS[last_background_dir].1,
        );
        // The background pixel scanned just before the hit is adjacent to
        // the hit pixel; entering from it defines the next scan origin.
        let delta = (background.0 - next.0, background.1 - next.1);
        backtrack = direction_index(delta).unwrap_or((dir + 4) % 8);

        contour.push(Point::new(next.0 as i32, next.1 as i32));
        current = next;
    }

    if contour.len() > 1 && contour.last() == contour.first() {
        contour.pop();
    }
    contour
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel_contour() {
        let mut mask = Mask::new(8, 8);
        mask.set(3, 4, true);
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0], vec![Point::new(3, 4)]);
    }

    #[test]
    fn test_rectangle_boundary_and_area() {
        let mut mask = Mask::new(32, 32);
        mask.fill_rect(5, 5, 26, 26);
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        let contour = &contours[0];
        // Every traced point lies on the rectangle's rim.
        for p in contour {
            let on_x_edge = p.x == 5 || p.x == 25;
            let on_y_edge = p.y == 5 || p.y == 25;
            assert!(on_x_edge || on_y_edge, "interior point {:?}", p);
        }
        // 21x21 pixels cover a 20x20 polygon.
        assert!((contour_area(contour) - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_regions_in_discovery_order() {
        let mut mask = Mask::new(40, 20);
        mask.fill_rect(25, 2, 35, 12);
        mask.fill_rect(2, 5, 12, 15);
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 2);
        // Row-major scan reaches the top-right block first.
        assert!(contours[0][0].x >= 25);
        assert!(contours[1][0].x <= 12);
    }

    #[test]
    fn test_hole_is_not_traced() {
        let mut mask = Mask::new(20, 20);
        mask.fill_rect(2, 2, 18, 18);
        mask.set(10, 10, false);
        mask.set(11, 10, false);
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        for p in &contours[0] {
            assert!(p.x == 2 || p.x == 17 || p.y == 2 || p.y == 17);
        }
    }

    #[test]
    fn test_empty_mask() {
        assert!(find_external_contours(&Mask::new(10, 10)).is_empty());
    }
}
