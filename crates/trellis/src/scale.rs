//! Display scale collaborator.

use trellis_geom::Vec2;

/// Source of the DPI/resolution scale factor. The layout engine only ever
/// reads it; per-axis factors are supported for anamorphic displays.
pub trait ScaleProvider {
    /// The current scale factor, per axis.
    fn scale(&self) -> Vec2;
}

/// A constant uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScale(pub f32);

impl ScaleProvider for FixedScale {
    fn scale(&self) -> Vec2 {
        Vec2::splat(self.0)
    }
}
