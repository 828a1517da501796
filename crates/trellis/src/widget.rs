//! Widget trait: the behavior attached to windows in the tree.

use std::any::Any;

use trellis_geom::{Rect, Vec2};

use crate::{
    event::{ButtonState, Key},
    loading::LoadTask,
    render::Painter,
};

/// Widgets are the behavior attached to windows. The engine owns geometry
/// and traversal; widgets expose a measured minimum size and consume a
/// final position and size, a draw callback, and input callbacks.
#[allow(unused_variables)]
pub trait Widget: Any + Send {
    /// Intrinsic minimum content size, in physical pixels, given the
    /// available content space and the effective scale factor. May be
    /// called several times per pass with the same inputs and must return
    /// consistent results.
    fn measure(&mut self, avail: Vec2, scale: Vec2) -> Vec2 {
        Vec2::ZERO
    }

    /// Hook after the content size is computed, before padding and margin
    /// are added. Returns the (possibly adjusted) content size.
    fn after_measure(&mut self, content: Vec2) -> Vec2 {
        content
    }

    /// Draw this widget. Returns `true` if the widget consumed the draw,
    /// meaning it rendered its whole subtree and children must be skipped.
    fn draw(&mut self, painter: &mut dyn Painter, rect: Rect, alpha: f32) -> bool {
        false
    }

    /// Hook after all children have drawn.
    fn after_children_draw(&mut self, painter: &mut dyn Painter, rect: Rect) {}

    /// Handle a key or mouse-button event. This is only called for windows
    /// on the focus path. Returns `true` to propagate to the parent.
    fn on_key(&mut self, key: Key, state: ButtonState, mouse: Vec2) -> bool {
        true
    }

    /// The cursor entered this window.
    fn on_mouse_enter(&mut self) {}

    /// The cursor left this window.
    fn on_mouse_leave(&mut self) {}

    /// The cursor moved while this window holds mouse focus.
    fn on_mouse_move(&mut self, pos: Vec2) {}

    /// Per-frame update hook.
    fn update(&mut self, dt: f32) {}

    /// The window transitioned to Open.
    fn on_open(&mut self) {}

    /// The window transitioned to Closed.
    fn on_close(&mut self) {}

    /// This window gained keyboard focus.
    fn on_focus_gained(&mut self) {}

    /// This window lost keyboard focus.
    fn on_focus_lost(&mut self) {}

    /// Can this window take keyboard focus?
    fn accepts_focus(&self) -> bool {
        false
    }

    /// Kick off background content loading. Returning `None` means the
    /// widget's content is immediately available.
    fn load(&mut self) -> Option<Box<dyn LoadTask>> {
        None
    }

    /// Placement override for windows with [`Layout::custom`] set. Receives
    /// the parent's content rect and returns this window's final rect.
    ///
    /// [`Layout::custom`]: crate::layout::Layout::custom
    fn arrange(&mut self, avail: Rect) -> Rect {
        Rect::from_pos_size(avail.pos, Vec2::ZERO)
    }
}
