//! Rendering-side types consumed by the culling pass

pub mod camera;

pub use camera::{Camera, Projection};
