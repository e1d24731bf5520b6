use airkeys_shared::{ExtractorSettings, Hand, Point};

use crate::contour::{self, Contour};
use crate::convex::{self, ConvexityDefect};
use crate::geometry::{self, Rect};
use crate::mask::Mask;

/// Extracts up to two hand-shaped regions from a binary mask.
///
/// Stateless per call; all tuning lives in [`ExtractorSettings`].
pub struct HandExtractor {
    settings: ExtractorSettings,
}

impl HandExtractor {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self { settings }
    }

    /// Always returns exactly two Hands, left hand (smaller palm-center x)
    /// first. Undetected slots are default Hands. Degenerate geometry
    /// downgrades the whole frame to two default Hands; a dropped frame is
    /// acceptable, a crash is not.
    pub fn extract(&self, mask: &Mask) -> (Hand, Hand) {
        let contours = contour::find_external_contours(mask);
        let (first, second) = two_largest(&contours);

        let features = |index: Option<usize>| -> Option<Hand> {
            match index {
                Some(i) => self.hand_features(&contours[i]),
                None => Some(Hand::default()),
            }
        };

        let hands = (|| {
            let hand_1 = features(first)?;
            let hand_2 = features(second)?;
            Some(match (hand_1.palm_center, hand_2.palm_center) {
                (Some(c1), Some(c2)) if c1.x > c2.x => (hand_2, hand_1),
                _ => (hand_1, hand_2),
            })
        })();

        hands.unwrap_or_else(|| (Hand::default(), Hand::default()))
    }

    /// Fingertips and palm center of a single contour.
    fn hand_features(&self, contour: &[Point]) -> Option<Hand> {
        let hull = convex::hull_indices(contour);
        let hull_points: Vec<Point> = hull.iter().map(|&i| contour[i]).collect();
        let rect = geometry::bounding_rect(&hull_points)?;
        let ratio = self.settings.lowest_finger_ratio.max(1);

        let mut candidates = Vec::new();
        if contour.len() > 3 && contour::contour_area(contour) > self.settings.min_hand_area {
            let defects = convex::convexity_defects(contour, &hull);
            candidates =
                self.finger_candidates(&defects, contour, rect.height as f64 / ratio as f64);
        }
        let tips = self.filter_finger_tips(candidates, &rect);
        Some(Hand::new(tips, rect.center()))
    }

    /// True finger valleys are deep and narrow: both chord edges longer
    /// than the shortest plausible finger and an acute angle at the valley
    /// floor. Each passing defect contributes the fingertips on either
    /// side of it.
    fn finger_candidates(
        &self,
        defects: &[ConvexityDefect],
        contour: &[Point],
        finger_length: f64,
    ) -> Vec<Point> {
        let mut tips = Vec::new();
        for defect in defects {
            let start = contour[defect.start];
            let far = contour[defect.far];
            let end = contour[defect.end];
            if start.distance_to(&far) > finger_length
                && far.distance_to(&end) > finger_length
                && geometry::angle_at(start, far, end) < self.settings.max_finger_angle
            {
                tips.push(start);
                tips.push(end);
            }
        }
        tips
    }

    /// An interior finger shows up as the end of one valley and the start
    /// of the next; collapse candidates closer than the minimum finger
    /// spacing, and drop anything lower than a fingertip can sit (y grows
    /// downward).
    fn filter_finger_tips(&self, candidates: Vec<Point>, rect: &Rect) -> Vec<Point> {
        let ratio = self.settings.lowest_finger_ratio.max(1);
        let min_separation = rect.width as f64 / ratio as f64;
        let lowest_finger_y = rect.center().y + rect.height / ratio;

        let mut tips: Vec<Point> = Vec::new();
        for candidate in candidates {
            if candidate.y > lowest_finger_y {
                continue;
            }
            if tips
                .iter()
                .any(|tip| tip.distance_to(&candidate) < min_separation)
            {
                continue;
            }
            tips.push(candidate);
        }
        tips
    }
}

/// Indices of the two largest-area contours; the two hands are assumed to
/// be the two largest foreground blobs, smaller noise blobs are ignored.
/// Area ties are broken by index order. A blob never fills both slots.
fn two_largest(contours: &[Contour]) -> (Option<usize>, Option<usize>) {
    match contours.len() {
        0 => (None, None),
        1 => (Some(0), None),
        2 => (Some(0), Some(1)),
        _ => {
            let mut max_1 = 0usize;
            let mut max_2 = 0usize;
            let mut area_1 = 0.0;
            let mut area_2 = 0.0;
            for (i, c) in contours.iter().enumerate() {
                let area = contour::contour_area(c);
                if area > area_1 {
                    max_2 = max_1;
                    area_2 = area_1;
                    max_1 = i;
                    area_1 = area;
                } else if area > area_2 {
                    max_2 = i;
                    area_2 = area;
                }
            }
            if max_2 == max_1 {
                (Some(max_1), None)
            } else {
                (Some(max_1), Some(max_2))
            }
        }
    }
}
