//! Geometry primitives used across trellis.
//!
//! All quantities are `f32` pixels. Fractional values appear whenever a
//! scale factor is in play; snapping back to the pixel grid follows one
//! convention throughout the engine: sizes snap with [`Vec2::ceil`],
//! positions with [`Vec2::floor`], offsets with [`Vec2::round`].

#![warn(missing_docs)]

/// Layout axis helpers.
mod axis;
/// Per-edge inset helpers.
mod edges;
/// Rectangle operations.
mod rect;
/// Two-component vector helpers.
mod vec2;

pub use axis::Axis;
pub use edges::Edges;
pub use rect::Rect;
pub use vec2::Vec2;
