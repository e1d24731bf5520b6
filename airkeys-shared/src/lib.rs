#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// A 2D point in camera pixel coordinates (y grows downward).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        libm::sqrt(dx * dx + dy * dy)
    }
}

/// Fingertips and palm center extracted from one hand-shaped region.
///
/// A default `Hand` has no fingertips and no palm center; `palm_center`
/// being `None` is the "no hand detected this frame" tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Hand {
    pub finger_tips: Vec<Point>,
    pub palm_center: Option<Point>,
}

impl Hand {
    pub fn new(finger_tips: Vec<Point>, palm_center: Point) -> Self {
        Self {
            finger_tips,
            palm_center: Some(palm_center),
        }
    }

    pub fn finger_count(&self) -> usize {
        self.finger_tips.len()
    }

    pub fn is_detected(&self) -> bool {
        self.palm_center.is_some()
    }
}

/// Foreground segmentation tuning.
///
/// HSV bounds are inclusive, with hue in [0, 360) and saturation/value in
/// [0, 100]. Defaults cover common skin tones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmenterSettings {
    pub hue_low: f32,
    pub hue_high: f32,
    pub saturation_low: f32,
    pub saturation_high: f32,
    pub value_low: f32,
    pub value_high: f32,
    /// Background model learning rate while training; steady state runs at
    /// one thousandth of this so a resting hand is not absorbed.
    pub background_learning_rate: f64,
}

impl Default for SegmenterSettings {
    fn default() -> Self {
        Self {
            hue_low: 0.0,
            hue_high: 50.0,
            saturation_low: 15.0,
            saturation_high: 90.0,
            value_low: 25.0,
            value_high: 95.0,
            background_learning_rate: 0.5,
        }
    }
}

/// Hand-geometry extraction tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractorSettings {
    /// Contours with a smaller enclosed area are not searched for fingers.
    pub min_hand_area: f64,
    /// Divides the hand bounding rectangle: height/ratio is the shortest
    /// finger-valley edge, width/ratio the closest two distinct fingertips
    /// may sit together.
    pub lowest_finger_ratio: i32,
    /// Maximum angle in degrees at a finger valley's deepest point.
    pub max_finger_angle: f64,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            min_hand_area: 1000.0,
            lowest_finger_ratio: 10,
            max_finger_angle: 95.0,
        }
    }
}

/// Temporal tracking tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerSettings {
    /// Frames accumulated before one consensus hand is derived.
    pub frames_per_batch: usize,
    /// Maximum distance in pixels a fingertip may move between consensus
    /// hands and still count as the same finger.
    pub movement_tolerance: f64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            frames_per_batch: 5,
            movement_tolerance: 20.0,
        }
    }
}

/// Output coordinate space of the consuming application window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub width: i32,
    pub height: i32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Key-bed geometry for the press-point consumer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyboardSettings {
    pub rows: usize,
    /// Total number of white keys; must be divisible by `rows`.
    pub white_keys: usize,
    /// Vertical gap between rows, in output pixels.
    pub row_margin: i32,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            rows: 2,
            white_keys: 14,
            row_margin: 20,
        }
    }
}

/// All tuning parameters, loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub segmenter: SegmenterSettings,
    pub extractor: ExtractorSettings,
    pub tracker: TrackerSettings,
    pub output: OutputSettings,
    pub keyboard: KeyboardSettings,
}

/// Rescales a camera-space point into the output window's coordinate space.
///
/// The vertical tenth-of-height offset compensates for the camera's framing
/// bias: hands enter the frame lower than they appear on screen.
pub fn remap_point(point: Point, src_w: i32, src_h: i32, out_w: i32, out_h: i32) -> Point {
    let x = out_w as i64 * point.x as i64 / src_w as i64;
    let y = out_h as i64 / 10 + out_h as i64 * point.y as i64 / src_h as i64;
    Point::new(x as i32, y as i32)
}
