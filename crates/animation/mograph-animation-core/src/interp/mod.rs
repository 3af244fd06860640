//! Interpolation primitives shared by value kinds and easing curves.

pub mod functions;

pub use functions::{bezier_ease, lerp_f64, lerp_path, lerp_point, lerp_rgba};
