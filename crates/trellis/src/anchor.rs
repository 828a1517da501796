//! Compass anchors and the pure anchor resolver.

use trellis_geom::{Axis, Vec2};

/// One of the nine compass positions. Used both as a parent's reference
/// point and as a child's alignment point.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Top-left corner.
    #[default]
    TopLeft,
    /// Top edge, horizontally centered.
    Top,
    /// Top-right corner.
    TopRight,
    /// Left edge, vertically centered.
    Left,
    /// Dead center.
    Center,
    /// Right edge, vertically centered.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom edge, horizontally centered.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

/// Position of an anchor along a single axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Band {
    /// Left or top.
    Near,
    /// Centered.
    Mid,
    /// Right or bottom.
    Far,
}

impl Band {
    /// Fraction of the extent this band selects.
    fn fraction(self) -> f32 {
        match self {
            Self::Near => 0.0,
            Self::Mid => 0.5,
            Self::Far => 1.0,
        }
    }
}

impl Anchor {
    /// All nine anchors, row-major from the top-left.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Left,
        Self::Center,
        Self::Right,
        Self::BottomLeft,
        Self::Bottom,
        Self::BottomRight,
    ];

    /// The band this anchor occupies along the given axis.
    pub fn band(self, axis: Axis) -> Band {
        match axis {
            Axis::X => match self {
                Self::TopLeft | Self::Left | Self::BottomLeft => Band::Near,
                Self::Top | Self::Center | Self::Bottom => Band::Mid,
                Self::TopRight | Self::Right | Self::BottomRight => Band::Far,
            },
            Axis::Y => match self {
                Self::TopLeft | Self::Top | Self::TopRight => Band::Near,
                Self::Left | Self::Center | Self::Right => Band::Mid,
                Self::BottomLeft | Self::Bottom | Self::BottomRight => Band::Far,
            },
        }
    }
}

/// Offset of a child box within (or against) a parent region.
///
/// The parent anchor selects a reference point in a region of size
/// `parent_size`; the own anchor then pulls the child's box back by none,
/// half, or all of `child_size` along each axis.
pub fn anchor_offset(parent: Anchor, own: Anchor, parent_size: Vec2, child_size: Vec2) -> Vec2 {
    let x = parent_size.x * parent.band(Axis::X).fraction()
        - child_size.x * own.band(Axis::X).fraction();
    let y = parent_size.y * parent.band(Axis::Y).fraction()
        - child_size.y * own.band(Axis::Y).fraction();
    Vec2::new(x, y)
}

/// Does the anchor pair keep the child within the parent's box?
///
/// Along each axis: a center-banded parent anchor admits any own band, an
/// edge-banded parent anchor admits only the matching band. A child is
/// inside iff it is inside on both axes. Inside children contribute to
/// parent auto-sizing, receive margins and padding, and flow with
/// siblings; outside children hang off the parent's outer box.
pub fn is_inside(parent: Anchor, own: Anchor) -> bool {
    inside_axis(parent.band(Axis::X), own.band(Axis::X))
        && inside_axis(parent.band(Axis::Y), own.band(Axis::Y))
}

/// Inside classification along a single axis.
fn inside_axis(parent: Band, own: Band) -> bool {
    parent == Band::Mid || parent == own
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets() {
        let parent = Vec2::new(100.0, 50.0);
        let child = Vec2::new(20.0, 10.0);
        assert_eq!(
            anchor_offset(Anchor::TopLeft, Anchor::TopLeft, parent, child),
            Vec2::ZERO
        );
        assert_eq!(
            anchor_offset(Anchor::Center, Anchor::Center, parent, child),
            Vec2::new(40.0, 20.0)
        );
        assert_eq!(
            anchor_offset(Anchor::BottomRight, Anchor::BottomRight, parent, child),
            Vec2::new(80.0, 40.0)
        );
        // Child hangs above the parent's top edge.
        assert_eq!(
            anchor_offset(Anchor::Top, Anchor::Bottom, parent, child),
            Vec2::new(40.0, -10.0)
        );
    }

    #[test]
    fn inside_counts() {
        // Corners admit one own anchor, edges three, center all nine.
        let count = |parent: Anchor| {
            Anchor::ALL
                .iter()
                .filter(|own| is_inside(parent, **own))
                .count()
        };
        assert_eq!(count(Anchor::TopLeft), 1);
        assert_eq!(count(Anchor::Top), 3);
        assert_eq!(count(Anchor::Center), 9);
        assert_eq!(count(Anchor::BottomRight), 1);
    }
}
