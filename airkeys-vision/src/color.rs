use airkeys_shared::SegmenterSettings;

/// RGB color value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSV color value, hue in [0, 360), saturation and value in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert RGB to HSV color space
    pub fn to_hsv(&self) -> Hsv {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta) % 6.0)
        } else if max == g {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };

        let h = if h < 0.0 { h + 360.0 } else { h };

        let s = if max == 0.0 { 0.0 } else { delta / max * 100.0 };

        let v = max * 100.0;

        Hsv { h, s, v }
    }
}

/// Inclusive HSV bounds used by the color threshold mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvRange {
    pub hue_low: f32,
    pub hue_high: f32,
    pub saturation_low: f32,
    pub saturation_high: f32,
    pub value_low: f32,
    pub value_high: f32,
}

impl HsvRange {
    pub fn contains(&self, hsv: Hsv) -> bool {
        hsv.h >= self.hue_low
            && hsv.h <= self.hue_high
            && hsv.s >= self.saturation_low
            && hsv.s <= self.saturation_high
            && hsv.v >= self.value_low
            && hsv.v <= self.value_high
    }
}

impl From<&SegmenterSettings> for HsvRange {
    fn from(settings: &SegmenterSettings) -> Self {
        Self {
            hue_low: settings.hue_low,
            hue_high: settings.hue_high,
            saturation_low: settings.saturation_low,
            saturation_high: settings.saturation_high,
            value_low: settings.value_low,
            value_high: settings.value_high,
        }
    }
}
