//! Frame-driven client around the vision and tracking crates: the
//! [`engine::GestureEngine`] runs the whole per-frame pipeline and the
//! [`keyboard::KeyBed`] turns its press points into named keys.

pub mod engine;
pub mod keyboard;
pub mod ppm;
