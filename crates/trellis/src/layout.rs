//! Layout configuration carried by every window.

use trellis_geom::{Axis, Edges, Vec2};

use crate::anchor::Anchor;

/// Per-axis sizing policy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Sizing {
    /// An explicit size in unscaled pixels.
    Fixed(f32),
    /// Shrink to content.
    #[default]
    Fit,
    /// Expand to consume available space, competing with siblings.
    Grow,
}

impl Sizing {
    /// Legacy alias: `Fill` in the older model is equivalent to [`Sizing::Grow`].
    pub const FILL: Self = Self::Grow;

    /// Is this policy [`Sizing::Grow`]?
    pub fn is_grow(self) -> bool {
        matches!(self, Self::Grow)
    }
}

/// How a window arranges its children.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Children are anchored independently.
    #[default]
    Free,
    /// Children flow left to right.
    Row,
    /// Children flow top to bottom.
    Column,
    /// Children flow left to right, wrapping to new rows.
    RowWrap,
    /// Children flow top to bottom, wrapping to new columns.
    ColumnWrap,
}

impl LayoutMode {
    /// The list axis, if this is a list mode.
    pub fn main_axis(self) -> Option<Axis> {
        match self {
            Self::Free => None,
            Self::Row | Self::RowWrap => Some(Axis::X),
            Self::Column | Self::ColumnWrap => Some(Axis::Y),
        }
    }

    /// Does this mode re-flow children onto new rows or columns?
    pub fn wraps(self) -> bool {
        matches!(self, Self::RowWrap | Self::ColumnWrap)
    }
}

/// Layout configuration for a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Child arrangement mode.
    pub mode: LayoutMode,
    /// This window's own alignment point.
    pub anchor: Anchor,
    /// The reference point selected within the parent.
    pub parent_anchor: Anchor,
    /// Horizontal sizing policy.
    pub width: Sizing,
    /// Vertical sizing policy.
    pub height: Sizing,
    /// Minimum size in unscaled pixels.
    pub min_size: Vec2,
    /// Maximum size in unscaled pixels.
    pub max_size: Vec2,
    /// Outer margin, applied when the anchor pair is inside the parent.
    pub margin: Edges,
    /// Inner padding, applied to children only.
    pub padding: Edges,
    /// Gap between list children, per axis.
    pub spacing: Vec2,
    /// Fixed pixel offset added after anchoring or list placement.
    pub offset: Vec2,
    /// Sort key among siblings; also the paint order.
    pub order: i32,
    /// This window's own scale, multiplied into the propagated factor.
    pub scale: f32,
    /// Delegate placement to the widget's `arrange` hook; the standard
    /// measure and place passes skip this window's box entirely.
    pub custom: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Free,
            anchor: Anchor::TopLeft,
            parent_anchor: Anchor::TopLeft,
            width: Sizing::Fit,
            height: Sizing::Fit,
            min_size: Vec2::ZERO,
            max_size: Vec2::INFINITY,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
            spacing: Vec2::ZERO,
            offset: Vec2::ZERO,
            order: 0,
            scale: 1.0,
            custom: false,
        }
    }
}

impl Layout {
    /// Free-layout configuration.
    pub fn free() -> Self {
        Self::default()
    }

    /// Horizontal list configuration.
    pub fn row() -> Self {
        Self {
            mode: LayoutMode::Row,
            ..Self::default()
        }
    }

    /// Vertical list configuration.
    pub fn column() -> Self {
        Self {
            mode: LayoutMode::Column,
            ..Self::default()
        }
    }

    /// Wrapping horizontal list configuration.
    pub fn row_wrap() -> Self {
        Self {
            mode: LayoutMode::RowWrap,
            ..Self::default()
        }
    }

    /// Wrapping vertical list configuration.
    pub fn column_wrap() -> Self {
        Self {
            mode: LayoutMode::ColumnWrap,
            ..Self::default()
        }
    }

    /// A window that grows on both axes.
    pub fn fill() -> Self {
        Self::default().grow()
    }

    /// Set both axes to fixed sizes.
    pub fn fixed(mut self, w: f32, h: f32) -> Self {
        self.width = Sizing::Fixed(w);
        self.height = Sizing::Fixed(h);
        self
    }

    /// Set both axes to [`Sizing::Grow`].
    pub fn grow(mut self) -> Self {
        self.width = Sizing::Grow;
        self.height = Sizing::Grow;
        self
    }

    /// Set the horizontal sizing policy.
    pub fn width(mut self, s: Sizing) -> Self {
        self.width = s;
        self
    }

    /// Set the vertical sizing policy.
    pub fn height(mut self, s: Sizing) -> Self {
        self.height = s;
        self
    }

    /// Set both anchor points at once.
    pub fn anchors(mut self, parent: Anchor, own: Anchor) -> Self {
        self.parent_anchor = parent;
        self.anchor = own;
        self
    }

    /// Set the minimum size.
    pub fn min_size(mut self, v: Vec2) -> Self {
        self.min_size = v;
        self
    }

    /// Set the maximum size.
    pub fn max_size(mut self, v: Vec2) -> Self {
        self.max_size = v;
        self
    }

    /// Set the margin.
    pub fn margin(mut self, edges: Edges) -> Self {
        self.margin = edges;
        self
    }

    /// Set the padding.
    pub fn padding(mut self, edges: Edges) -> Self {
        self.padding = edges;
        self
    }

    /// Set the list spacing vector.
    pub fn spacing(mut self, v: Vec2) -> Self {
        self.spacing = v;
        self
    }

    /// Set the fixed pixel offset.
    pub fn offset(mut self, v: Vec2) -> Self {
        self.offset = v;
        self
    }

    /// Set the sibling sort key.
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Set this window's own scale factor.
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Delegate placement to the widget's `arrange` hook.
    pub fn custom(mut self) -> Self {
        self.custom = true;
        self
    }

    /// The sizing policy along an axis.
    pub fn sizing(&self, axis: Axis) -> Sizing {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }
}
