//! Foreground segmentation and geometric hand-feature extraction.
//!
//! Everything operates on owned raw rasters: RGB24 [`Frame`]s in, binary
//! [`Mask`]s and [`airkeys_shared::Hand`]s out. The two public entry points
//! are [`Segmenter::segment`] and [`HandExtractor::extract`].

pub mod background;
pub mod color;
pub mod contour;
pub mod convex;
pub mod extractor;
pub mod frame;
pub mod geometry;
pub mod mask;
pub mod morphology;
pub mod segmenter;

pub use background::AdaptiveBackground;
pub use color::{Hsv, HsvRange, Rgb};
pub use extractor::HandExtractor;
pub use frame::Frame;
pub use mask::Mask;
pub use segmenter::Segmenter;
