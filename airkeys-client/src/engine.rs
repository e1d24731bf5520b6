use airkeys_shared::{remap_point, Point, Settings};
use airkeys_tracker::HandTracker;
use airkeys_vision::{Frame, HandExtractor, HsvRange, Mask, Segmenter};

/// Ties the per-frame pipeline together: segmentation, extraction, one
/// tracker per hand, and remapping of the merged click points into the
/// output window's coordinate space.
///
/// The engine starts with recognition off; calibration modes
/// (background training, HSV calibration) and recognition are mutually
/// exclusive, and enabling a calibration mode always drops recognition.
/// The toggles only change which intermediate masks are built and exposed,
/// never the click-point contract.
pub struct GestureEngine {
    segmenter: Segmenter,
    extractor: HandExtractor,
    left_tracker: HandTracker,
    right_tracker: HandTracker,
    output_width: i32,
    output_height: i32,
    recognition: bool,
    hsv_calibrating: bool,
    combined_mask: Option<Mask>,
    color_mask: Option<Mask>,
    left_finger_tips: Vec<Point>,
    right_finger_tips: Vec<Point>,
}

impl GestureEngine {
    pub fn new(settings: &Settings) -> Self {
        Self {
            segmenter: Segmenter::new(&settings.segmenter),
            extractor: HandExtractor::new(settings.extractor.clone()),
            left_tracker: HandTracker::new(&settings.tracker),
            right_tracker: HandTracker::new(&settings.tracker),
            output_width: settings.output.width,
            output_height: settings.output.height,
            recognition: false,
            hsv_calibrating: false,
            combined_mask: None,
            color_mask: None,
            left_finger_tips: Vec::new(),
            right_finger_tips: Vec::new(),
        }
    }

    /// Runs one frame through the pipeline and returns the merged click
    /// points of both hands in output-window coordinates. Outside
    /// recognition mode the result is always empty, but the background
    /// model still learns from every frame.
    pub fn update(&mut self, frame: &Frame) -> Vec<Point> {
        let frame = frame.flipped_horizontal();
        let combined = self.segmenter.segment(&frame);
        if self.hsv_calibrating {
            self.color_mask = Some(self.segmenter.color_mask(&frame));
        }

        if !self.recognition {
            self.combined_mask = Some(combined);
            self.left_finger_tips.clear();
            self.right_finger_tips.clear();
            return Vec::new();
        }

        let (left, right) = self.extractor.extract(&combined);
        self.combined_mask = Some(combined);

        let (src_w, src_h) = (frame.width() as i32, frame.height() as i32);
        self.left_finger_tips = self.remap_all(&left.finger_tips, src_w, src_h);
        self.right_finger_tips = self.remap_all(&right.finger_tips, src_w, src_h);

        let mut clicks: Vec<Point> = self.left_tracker.update(left).to_vec();
        clicks.extend_from_slice(self.right_tracker.update(right));
        self.remap_all(&clicks, src_w, src_h)
    }

    pub fn toggle_recognition(&mut self) {
        self.segmenter.set_training(false);
        self.hsv_calibrating = false;
        self.color_mask = None;
        self.recognition = !self.recognition;
    }

    pub fn toggle_background_training(&mut self) {
        self.recognition = false;
        self.segmenter.set_training(!self.segmenter.is_training());
    }

    pub fn toggle_hsv_calibration(&mut self) {
        self.recognition = false;
        self.hsv_calibrating = !self.hsv_calibrating;
        if !self.hsv_calibrating {
            self.color_mask = None;
        }
    }

    pub fn is_recognizing(&self) -> bool {
        self.recognition
    }

    pub fn is_training(&self) -> bool {
        self.segmenter.is_training()
    }

    pub fn is_hsv_calibrating(&self) -> bool {
        self.hsv_calibrating
    }

    /// Runtime adjustment of the HSV threshold bounds, fed from whatever
    /// calibration UI the embedding application provides.
    pub fn set_hsv_range(&mut self, range: HsvRange) {
        self.segmenter.set_range(range);
    }

    pub fn hsv_range(&self) -> HsvRange {
        self.segmenter.range()
    }

    pub fn reset_background(&mut self) {
        self.segmenter.reset_background();
    }

    /// The combined segmentation mask of the most recent frame.
    pub fn combined_mask(&self) -> Option<&Mask> {
        self.combined_mask.as_ref()
    }

    /// The raw HSV mask of the most recent frame, only while HSV
    /// calibration is on.
    pub fn color_mask(&self) -> Option<&Mask> {
        self.color_mask.as_ref()
    }

    /// The raw background-subtraction mask of the most recent frame, only
    /// while background training is on.
    pub fn background_mask(&self) -> Option<&Mask> {
        if self.segmenter.is_training() {
            self.segmenter.last_background_mask()
        } else {
            None
        }
    }

    /// Fingertips of the most recent frame in output-window coordinates,
    /// for display by the embedding application.
    pub fn left_finger_tips(&self) -> &[Point] {
        &self.left_finger_tips
    }

    pub fn right_finger_tips(&self) -> &[Point] {
        &self.right_finger_tips
    }

    fn remap_all(&self, points: &[Point], src_w: i32, src_h: i32) -> Vec<Point> {
        points
            .iter()
            .map(|&p| remap_point(p, src_w, src_h, self.output_width, self.output_height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GestureEngine {
        GestureEngine::new(&Settings::default())
    }

    #[test]
    fn test_starts_idle() {
        let engine = engine();
        assert!(!engine.is_recognizing());
        assert!(!engine.is_training());
        assert!(!engine.is_hsv_calibrating());
    }

    #[test]
    fn test_calibration_modes_drop_recognition() {
        let mut engine = engine();
        engine.toggle_recognition();
        assert!(engine.is_recognizing());
        engine.toggle_background_training();
        assert!(!engine.is_recognizing());
        assert!(engine.is_training());

        engine.toggle_recognition();
        assert!(!engine.is_training());
        engine.toggle_hsv_calibration();
        assert!(!engine.is_recognizing());
        assert!(engine.is_hsv_calibrating());
    }

    #[test]
    fn test_no_clicks_outside_recognition_mode() {
        let mut engine = engine();
        let frame = Frame::new(64, 64);
        assert!(engine.update(&frame).is_empty());
        assert!(engine.combined_mask().is_some());
    }

    #[test]
    fn test_blank_frames_produce_no_clicks() {
        let mut engine = engine();
        engine.toggle_recognition();
        let frame = Frame::new(64, 64);
        for _ in 0..10 {
            assert!(engine.update(&frame).is_empty());
        }
    }

    #[test]
    fn test_intermediate_masks_follow_modes() {
        let mut engine = engine();
        let frame = Frame::new(64, 64);

        engine.update(&frame);
        assert!(engine.color_mask().is_none());
        assert!(engine.background_mask().is_none());

        engine.toggle_hsv_calibration();
        engine.update(&frame);
        assert!(engine.color_mask().is_some());

        engine.toggle_hsv_calibration();
        assert!(engine.color_mask().is_none());

        engine.toggle_background_training();
        engine.update(&frame);
        assert!(engine.background_mask().is_some());
        engine.toggle_background_training();
        assert!(engine.background_mask().is_none());
    }

    #[test]
    fn test_set_hsv_range() {
        let mut engine = engine();
        let mut range = engine.hsv_range();
        range.hue_high = 12.5;
        engine.set_hsv_range(range);
        assert_eq!(engine.hsv_range().hue_high, 12.5);
    }
}
