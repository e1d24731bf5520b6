use airkeys_shared::SegmenterSettings;

use crate::background::AdaptiveBackground;
use crate::color::HsvRange;
use crate::frame::Frame;
use crate::mask::Mask;
use crate::morphology;

/// Produces the binary hand mask for a frame from two independent cues: the
/// adaptive background model and a static HSV color threshold. The final
/// mask is the intersection of both after identical morphological cleaning,
/// so each cue only has to be roughly right.
pub struct Segmenter {
    range: HsvRange,
    learning_rate: f64,
    training: bool,
    background: AdaptiveBackground,
    last_background: Option<Mask>,
}

impl Segmenter {
    pub fn new(settings: &SegmenterSettings) -> Self {
        Self {
            range: HsvRange::from(settings),
            learning_rate: settings.background_learning_rate,
            training: false,
            background: AdaptiveBackground::new(),
            last_background: None,
        }
    }

    /// The combined foreground mask. Mutates the background model; the
    /// first frame seeds it and yields an all-background mask.
    pub fn segment(&mut self, frame: &Frame) -> Mask {
        let background = self.background_mask(frame);
        let color = self.color_mask(frame);
        Mask::and(&morphology::clean(&color), &morphology::clean(&background))
    }

    /// The raw HSV threshold mask, before cleaning.
    pub fn color_mask(&self, frame: &Frame) -> Mask {
        let mut mask = Mask::new(frame.width(), frame.height());
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if self.range.contains(frame.rgb_at(x, y).to_hsv()) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// The raw background-subtraction mask, before cleaning. In training
    /// mode the model learns at the full configured rate; in steady state
    /// at a thousandth of it, so a resting hand stays foreground while
    /// other stationary clutter is slowly absorbed.
    pub fn background_mask(&mut self, frame: &Frame) -> Mask {
        let rate = if self.training {
            self.learning_rate
        } else {
            self.learning_rate / 1000.0
        };
        let mask = self.background.apply(frame, rate);
        self.last_background = Some(mask.clone());
        mask
    }

    /// The mask from the most recent model application, for calibration
    /// display, without advancing the model a second time.
    pub fn last_background_mask(&self) -> Option<&Mask> {
        self.last_background.as_ref()
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    pub fn range(&self) -> HsvRange {
        self.range
    }

    /// Runtime adjustment of the color-threshold bounds.
    pub fn set_range(&mut self, range: HsvRange) {
        self.range = range;
    }

    /// Forgets the learned background; the next frame re-seeds it.
    pub fn reset_background(&mut self) {
        self.background.reset();
        self.last_background = None;
    }
}
