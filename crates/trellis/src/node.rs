//! Core window data stored in the arena.

use trellis_geom::{Rect, Vec2};

use crate::{layout::Layout, tree::WindowId, tween::TweenId, widget::Widget};

/// Lifecycle state of a window.
///
/// A window starts Uninitialized, becomes Open when attached into an open
/// tree, and Closed when detached. Closed is terminal for that attach
/// cycle; re-attaching restarts at Open. Only a controller-style root may
/// exist without ever transitioning via a parent.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Phase {
    /// Created but never attached into an open tree.
    #[default]
    Uninitialized,
    /// Attached and live.
    Open,
    /// Detached from its tree.
    Closed,
}

/// Core window data stored in the arena.
pub struct Window {
    /// Widget behavior and state.
    pub(crate) widget: Box<dyn Widget>,

    /// Parent in the arena tree. A back-reference only; the child list is
    /// the ownership edge.
    pub(crate) parent: Option<WindowId>,
    /// Children in the arena tree, kept sorted stably by layout order.
    pub(crate) children: Vec<WindowId>,

    /// Layout configuration.
    pub(crate) layout: Layout,

    /// Window name. May be empty; uniqueness is advisory.
    pub(crate) name: String,
    /// Lifecycle state.
    pub(crate) phase: Phase,
    /// Attach generation, bumped on every attach. Guards stale load results.
    pub(crate) epoch: u64,

    /// Window visibility.
    pub(crate) visible: bool,
    /// Take no layout space while hidden.
    pub(crate) collapse_when_hidden: bool,
    /// Fill a backdrop before the widget draws.
    pub(crate) background: bool,
    /// Render in the deferred overlay pass, above siblings.
    pub(crate) overlay: bool,
    /// This window responds to hit tests.
    pub(crate) handle_input: bool,
    /// Children of this window may respond to hit tests.
    pub(crate) children_handle_input: bool,
    /// Lay this window out as a logical child of the named window.
    pub(crate) relative_to: Option<String>,

    /// Render alpha in [0, 1].
    pub(crate) alpha: f32,
    /// Active alpha fade, if any.
    pub(crate) fade: Option<TweenId>,

    /// Layout must be recomputed for this subtree.
    pub(crate) layout_dirty: bool,
    /// A dispatched load task has not yet reported.
    pub(crate) loading: bool,
    /// Content loading completed successfully.
    pub(crate) loaded: bool,

    /// Measured minimum size, output of the measure pass.
    pub(crate) measured: Vec2,
    /// Final screen rect, output of the place pass.
    pub(crate) rect: Rect,
    /// Effective scale factor, output of the measure pass.
    pub(crate) scale_factor: Vec2,
}

impl Window {
    /// Construct a detached window around a widget.
    pub(crate) fn new(widget: Box<dyn Widget>, name: String) -> Self {
        Self {
            widget,
            parent: None,
            children: Vec::new(),
            layout: Layout::default(),
            name,
            phase: Phase::Uninitialized,
            epoch: 0,
            visible: true,
            collapse_when_hidden: false,
            background: false,
            overlay: false,
            handle_input: true,
            children_handle_input: true,
            relative_to: None,
            alpha: 1.0,
            fade: None,
            layout_dirty: false,
            loading: false,
            loaded: false,
            measured: Vec2::ZERO,
            rect: Rect::ZERO,
            scale_factor: Vec2::splat(1.0),
        }
    }

    /// Return the window's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the window's parent, if any.
    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    /// Return the window's children.
    pub fn children(&self) -> &[WindowId] {
        &self.children
    }

    /// Return the layout configuration.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Return the lifecycle state.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Return the attach generation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Return true if the window is visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Return true if the window renders in the overlay pass.
    pub fn is_overlay(&self) -> bool {
        self.overlay
    }

    /// Return the relative-to target name, if any.
    pub fn relative_to(&self) -> Option<&str> {
        self.relative_to.as_deref()
    }

    /// Return the render alpha.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Return the measured minimum size from the last layout pass.
    pub fn measured(&self) -> Vec2 {
        self.measured
    }

    /// Return the final screen rect from the last layout pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Return the effective scale factor from the last layout pass.
    pub fn scale_factor(&self) -> Vec2 {
        self.scale_factor
    }

    /// Return true if a dispatched load has not yet reported.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Does this window take layout space right now?
    pub(crate) fn takes_space(&self) -> bool {
        self.visible || !self.collapse_when_hidden
    }
}
