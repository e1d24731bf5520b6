use crate::frame::Frame;
use crate::mask::Mask;

// A pixel is foreground when its luma deviates from the model mean by more
// than MATCH_DEVIATIONS standard deviations.
const MATCH_DEVIATIONS: f32 = 2.5;
const INITIAL_VARIANCE: f32 = 225.0;
const MIN_VARIANCE: f32 = 4.0;

/// Adaptive per-pixel Gaussian background model over frame luma.
///
/// Every [`apply`](AdaptiveBackground::apply) both classifies the frame and
/// folds it into the model at the given learning rate, so stationary scenery
/// is gradually absorbed into the background. The model initializes itself
/// from the first frame it sees (or the first after [`reset`](AdaptiveBackground::reset)).
#[derive(Debug, Clone)]
pub struct AdaptiveBackground {
    width: usize,
    height: usize,
    mean: Vec<f32>,
    variance: Vec<f32>,
}

impl AdaptiveBackground {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            mean: Vec::new(),
            variance: Vec::new(),
        }
    }

    /// Forgets all accumulated statistics; the next frame re-seeds the model.
    pub fn reset(&mut self) {
        self.width = 0;
        self.height = 0;
        self.mean.clear();
        self.variance.clear();
    }

    /// Classifies `frame` against the model and updates the model in place.
    /// Returns the foreground mask; the seeding frame is all background.
    pub fn apply(&mut self, frame: &Frame, learning_rate: f64) -> Mask {
        let (w, h) = (frame.width(), frame.height());
        if self.width != w || self.height != h {
            self.seed(frame);
            return Mask::new(w, h);
        }

        let alpha = learning_rate.clamp(0.0, 1.0) as f32;
        let mut mask = Mask::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let idx = y * w + x;
                let luma = frame.luma_at(x, y);
                let delta = luma - self.mean[idx];
                let squared = delta * delta;
                if squared > MATCH_DEVIATIONS * MATCH_DEVIATIONS * self.variance[idx] {
                    mask.set(x, y, true);
                }
                self.mean[idx] += alpha * delta;
                self.variance[idx] =
                    (self.variance[idx] + alpha * (squared - self.variance[idx])).max(MIN_VARIANCE);
            }
        }
        mask
    }

    fn seed(&mut self, frame: &Frame) {
        let (w, h) = (frame.width(), frame.height());
        self.width = w;
        self.height = h;
        self.mean = vec![0.0; w * h];
        self.variance = vec![INITIAL_VARIANCE; w * h];
        for y in 0..h {
            for x in 0..w {
                self.mean[y * w + x] = frame.luma_at(x, y);
            }
        }
    }
}

impl Default for AdaptiveBackground {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn flat_frame(width: usize, height: usize, level: u8) -> Frame {
        let mut frame = Frame::new(width, height);
        for y in 0..height {
            for x in 0..width {
                frame.set_rgb(x, y, Rgb::new(level, level, level));
            }
        }
        frame
    }

    #[test]
    fn test_static_scene_stays_background() {
        let mut model = AdaptiveBackground::new();
        let frame = flat_frame(8, 8, 120);
        for _ in 0..10 {
            let mask = model.apply(&frame, 0.0005);
            assert_eq!(mask.count_nonzero(), 0);
        }
    }

    #[test]
    fn test_scene_change_is_foreground_then_absorbed() {
        let mut model = AdaptiveBackground::new();
        model.apply(&flat_frame(8, 8, 0), 0.5);

        let bright = flat_frame(8, 8, 200);
        let first = model.apply(&bright, 0.5);
        assert_eq!(first.count_nonzero(), 64);

        // At full training rate the new scene is absorbed within a few frames.
        let mut last = first;
        for _ in 0..10 {
            last = model.apply(&bright, 0.5);
        }
        assert_eq!(last.count_nonzero(), 0);
    }

    #[test]
    fn test_training_absorbs_faster_than_steady_state() {
        let frames = 10;
        let rate = 0.5;

        let mut training = AdaptiveBackground::new();
        let mut steady = AdaptiveBackground::new();
        training.apply(&flat_frame(8, 8, 0), rate);
        steady.apply(&flat_frame(8, 8, 0), rate);

        let bright = flat_frame(8, 8, 200);
        let mut training_foreground = 0;
        let mut steady_foreground = 0;
        for _ in 0..frames {
            training_foreground += training.apply(&bright, rate).count_nonzero();
            steady_foreground += steady.apply(&bright, rate / 1000.0).count_nonzero();
        }
        assert!(training_foreground < steady_foreground);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut model = AdaptiveBackground::new();
        model.apply(&flat_frame(8, 8, 0), 0.5);
        model.reset();
        // First frame after reset seeds the model: all background even
        // though the scene changed completely.
        let mask = model.apply(&flat_frame(8, 8, 255), 0.5);
        assert_eq!(mask.count_nonzero(), 0);
    }
}
