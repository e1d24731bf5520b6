//! Temporal tracking of one hand: batches noisy per-frame hand snapshots,
//! derives a consensus hand per batch, and diffs consecutive consensus
//! hands into pressed ("click") coordinates.

use airkeys_shared::{Hand, Point, TrackerSettings};

// A hand with this many extended fingers counts as an open palm.
const OPEN_PALM_FINGERS: usize = 5;

/// Tracks a single hand across frames and maintains the set of currently
/// pressed coordinates.
///
/// The tracker is always in one of two phases: accumulating (batch not yet
/// full, updates return the click set unchanged) or just-completed (batch
/// reduced to a consensus hand and diffed against the previous one). A bad
/// frame is never retried; the next batch's majority vote absorbs it.
pub struct HandTracker {
    frames_per_batch: usize,
    movement_tolerance: f64,
    batch: Vec<Hand>,
    previous: Hand,
    click_points: Vec<Point>,
}

impl HandTracker {
    pub fn new(settings: &TrackerSettings) -> Self {
        Self {
            frames_per_batch: settings.frames_per_batch.max(1),
            movement_tolerance: settings.movement_tolerance,
            batch: Vec::new(),
            previous: Hand::default(),
            click_points: Vec::new(),
        }
    }

    /// Feeds one frame's hand snapshot and returns the click-point set,
    /// updated only at batch boundaries.
    pub fn update(&mut self, hand: Hand) -> &[Point] {
        self.batch.push(hand);
        if self.batch.len() == self.frames_per_batch {
            let mode = most_frequent_finger_count(&self.batch);
            let index = latest_reference_frame(&self.batch, mode);
            let mut current = self.batch[index].clone();
            self.analyse(&mut current);
            self.previous = current;
            self.batch.clear();
        }
        &self.click_points
    }

    pub fn click_points(&self) -> &[Point] {
        &self.click_points
    }

    /// Diffs the new consensus hand against the previous one. An open palm
    /// releases everything, a fist presses every previously extended
    /// finger; otherwise a change in finger count is resolved positionally.
    fn analyse(&mut self, current: &mut Hand) {
        if current.finger_count() >= OPEN_PALM_FINGERS {
            self.click_points.clear();
        } else if current.finger_count() == 0 {
            self.click_points.extend(self.previous.finger_tips.iter().copied());
        } else if current.finger_count() != self.previous.finger_count()
            && self.previous.is_detected()
        {
            // Fingers are matched by left-to-right rank, not nearest point:
            // hull ordering is unreliable frame to frame, x order is not.
            current.finger_tips.sort_by_key(|p| p.x);
            self.previous.finger_tips.sort_by_key(|p| p.x);
            let difference =
                current.finger_count() as i64 - self.previous.finger_count() as i64;
            if difference > 0 {
                unclick_fingers(
                    &mut self.click_points,
                    &self.previous.finger_tips,
                    &current.finger_tips,
                    self.movement_tolerance,
                    difference as usize,
                );
            } else {
                click_fingers(
                    &mut self.click_points,
                    &self.previous.finger_tips,
                    &current.finger_tips,
                    self.movement_tolerance,
                    (-difference) as usize,
                );
            }
        }
    }
}

/// The most common finger count in the batch, counts above five ignored.
/// The first maximum wins, so ties favor the smaller count.
fn most_frequent_finger_count(batch: &[Hand]) -> usize {
    let mut counts = [0usize; OPEN_PALM_FINGERS + 1];
    for hand in batch {
        if hand.finger_count() <= OPEN_PALM_FINGERS {
            counts[hand.finger_count()] += 1;
        }
    }
    let mut mode = 0;
    for (value, &frequency) in counts.iter().enumerate() {
        if frequency > counts[mode] {
            mode = value;
        }
    }
    mode
}

/// The most recent batch entry whose finger count matches the mode,
/// preferring fresh geometry over stale. Index 0 is only ever the fallback.
fn latest_reference_frame(batch: &[Hand], mode: usize) -> usize {
    for i in (1..batch.len()).rev() {
        if batch[i].finger_count() == mode {
            return i;
        }
    }
    0
}

/// The finger count went up: walk the (longer) current list and release a
/// click for each finger with no aligned counterpart in the previous list.
/// After each removal the previous-side index stays put, re-synchronizing
/// the rank alignment past the inserted finger.
fn unclick_fingers(
    click_points: &mut Vec<Point>,
    previous: &[Point],
    current: &[Point],
    tolerance: f64,
    to_remove: usize,
) {
    let mut previous_index = 0usize;
    let mut removed = 0usize;
    for tip in current {
        if previous_index >= previous.len() {
            // The right-most finger is the new one.
            if let Some(i) = index_of_closest_point(click_points, *tip) {
                click_points.remove(i);
            }
            previous_index += 1;
        } else if tip.distance_to(&previous[previous_index]) > tolerance {
            let mut realigned = false;
            if let Some(i) = index_of_closest_point(click_points, *tip) {
                click_points.remove(i);
                removed += 1;
                realigned = true;
            }
            if removed == to_remove {
                break;
            }
            if !realigned {
                previous_index += 1;
            }
        } else {
            previous_index += 1;
        }
    }
}

/// The finger count went down: walk the (longer) previous list and press
/// each finger with no aligned counterpart in the current list, with the
/// symmetric re-synchronization of the current-side index.
fn click_fingers(
    click_points: &mut Vec<Point>,
    previous: &[Point],
    current: &[Point],
    tolerance: f64,
    to_add: usize,
) {
    let mut current_index = 0usize;
    let mut added = 0usize;
    for tip in previous {
        if current_index >= current.len() {
            // The right-most finger was bent away.
            click_points.push(*tip);
            current_index += 1;
        } else if tip.distance_to(&current[current_index]) > tolerance {
            click_points.push(*tip);
            added += 1;
            if added == to_add {
                break;
            }
        } else {
            current_index += 1;
        }
    }
}

/// Index of the point nearest to `target`; the earliest wins on ties.
fn index_of_closest_point(points: &[Point], target: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, point) in points.iter().enumerate() {
        let distance = point.distance_to(&target);
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}
