//! The window arena and structural operations.

use slotmap::{SlotMap, new_key_type};
use trellis_geom::Vec2;

use crate::{
    error::{Error, Result},
    layout::Layout,
    node::{Phase, Window},
    widget::Widget,
};

new_key_type! {
    /// Opaque identifier for a window stored in the arena.
    ///
    /// The default key is a null sentinel: lookups against it always miss,
    /// so accessor chains on the "invalid window" stay safe.
    pub struct WindowId;
}

/// One controller's window tree. Owns the arena; parent links are
/// back-references and the child vectors are the ownership edges.
pub struct Tree {
    /// Window storage arena.
    pub(crate) windows: SlotMap<WindowId, Window>,
    /// Root window ID.
    pub(crate) root: WindowId,
}

impl Tree {
    /// Create a tree with an open controller-style root.
    pub fn new(widget: Box<dyn Widget>, name: impl Into<String>) -> Self {
        let mut windows = SlotMap::with_key();
        let mut root_window = Window::new(widget, name.into());
        root_window.phase = Phase::Open;
        root_window.layout_dirty = true;
        let root = windows.insert(root_window);
        Self { windows, root }
    }

    /// Return the root window id.
    pub fn root(&self) -> WindowId {
        self.root
    }

    /// Create a detached, uninitialized window around a widget.
    pub fn insert(&mut self, widget: Box<dyn Widget>, name: impl Into<String>) -> WindowId {
        self.windows.insert(Window::new(widget, name.into()))
    }

    /// Borrow a window.
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    /// Borrow a window mutably. Crate-internal: computed metrics are
    /// outputs of the layout pass and must not be mutated elsewhere.
    pub(crate) fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    /// Attach a detached window as a child.
    ///
    /// Rejects self-attach, unknown ids, attach cycles, and a child that is
    /// still Open in another tree position (a "double attach"): in debug
    /// builds that trips an assertion, in release builds the operation is
    /// logged and aborted with no partial linking. On success the child is
    /// appended, siblings are re-sorted stably by layout order, the Open
    /// state cascades top-down if this subtree is open, and layout is
    /// invalidated up the ancestor chain.
    pub fn attach(&mut self, parent: WindowId, child: WindowId) -> Result<()> {
        if parent == child {
            debug_assert!(false, "window attached to itself");
            tracing::warn!("rejected attaching a window to itself");
            return Err(Error::Invalid("attach to self".into()));
        }
        if !self.windows.contains_key(parent) {
            return Err(Error::UnknownWindow("attach parent".into()));
        }
        let Some(child_window) = self.windows.get(child) else {
            return Err(Error::UnknownWindow("attach child".into()));
        };
        if child_window.phase == Phase::Open || child_window.parent.is_some() {
            debug_assert!(false, "double attach of an open window");
            tracing::warn!(name = %child_window.name, "rejected double attach of an open window");
            return Err(Error::DoubleAttach(child_window.name.clone()));
        }
        if self.is_in_subtree(parent, child) {
            debug_assert!(false, "attach would create a cycle");
            tracing::warn!("rejected attach that would create a cycle");
            return Err(Error::Invalid("attach cycle".into()));
        }

        if cfg!(debug_assertions) {
            self.warn_duplicate_name(parent, child);
        }

        self.windows[child].parent = Some(parent);
        self.windows[child].epoch += 1;
        self.windows[parent].children.push(child);
        self.sort_children(parent);

        if self.windows[parent].phase == Phase::Open {
            self.cascade_open(child);
        }
        self.invalidate(parent);
        Ok(())
    }

    /// Detach a child from this parent.
    ///
    /// The child must currently be linked under `parent`; otherwise the
    /// operation traps in debug builds and is a logged no-op in release.
    /// Closes the child's subtree bottom-up and invalidates layout.
    pub fn detach(&mut self, parent: WindowId, child: WindowId) -> Result<()> {
        let Some(child_window) = self.windows.get(child) else {
            return Err(Error::UnknownWindow("detach child".into()));
        };
        if child_window.parent != Some(parent) {
            debug_assert!(false, "detach from the wrong parent");
            tracing::warn!(name = %child_window.name, "rejected detach from the wrong parent");
            return Err(Error::NotAChild(child_window.name.clone()));
        }

        if let Some(parent_window) = self.windows.get_mut(parent) {
            parent_window.children.retain(|c| *c != child);
        }
        self.windows[child].parent = None;
        self.cascade_closed(child);
        self.invalidate(parent);
        Ok(())
    }

    /// Detach (if attached) and drop a whole subtree from the arena.
    pub fn remove_subtree(&mut self, id: WindowId) -> Result<()> {
        let Some(window) = self.windows.get(id) else {
            return Err(Error::UnknownWindow("remove".into()));
        };
        if let Some(parent) = window.parent {
            self.detach(parent, id)?;
        } else if window.phase == Phase::Open && id != self.root {
            self.cascade_closed(id);
        }
        for sub in self.collect_subtree(id) {
            self.windows.remove(sub);
        }
        Ok(())
    }

    /// Mark layout dirty from this window up the ancestor chain. The walk
    /// always reaches the root: skipped subtrees can hold stale dirty
    /// bits, so an already-dirty ancestor is not proof the root knows.
    pub fn invalidate(&mut self, id: WindowId) {
        let mut current = Some(id);
        while let Some(cursor) = current {
            let Some(window) = self.windows.get_mut(cursor) else {
                return;
            };
            window.layout_dirty = true;
            current = window.parent;
        }
    }

    /// Is any layout work outstanding at the root?
    pub fn is_dirty(&self) -> bool {
        self.windows
            .get(self.root)
            .is_some_and(|w| w.layout_dirty)
    }

    /// Find a window by name under `start`. Direct children are checked
    /// for an exact match first; only then does the search recurse into
    /// each child's subtree in order. Returns the first match.
    pub fn find(&self, start: WindowId, name: &str) -> Option<WindowId> {
        let window = self.windows.get(start)?;
        for child in &window.children {
            if self.windows[*child].name == name {
                return Some(*child);
            }
        }
        for child in &window.children {
            if let Some(found) = self.find(*child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Like [`Tree::find`], but returns the null sentinel id on a miss so
    /// callers can chain accessor reads without unwrapping.
    pub fn find_or_invalid(&self, start: WindowId, name: &str) -> WindowId {
        self.find(start, name).unwrap_or_default()
    }

    /// Find the deepest window under a point, top-to-bottom: children are
    /// visited in reverse sibling order (most recently drawn first), and
    /// only if this window lets its children handle input. With
    /// `respect_input` false the input-handling flags are ignored.
    pub fn window_at(&self, start: WindowId, point: Vec2, respect_input: bool) -> Option<WindowId> {
        let window = self.windows.get(start)?;
        if !window.visible || window.phase != Phase::Open {
            return None;
        }
        if !respect_input || window.children_handle_input {
            for child in window.children.iter().rev() {
                if let Some(hit) = self.window_at(*child, point, respect_input) {
                    return Some(hit);
                }
            }
        }
        if (!respect_input || window.handle_input) && window.rect.contains(point) {
            return Some(start);
        }
        None
    }

    /// Is `id` inside the subtree rooted at `ancestor` (inclusive)?
    pub fn is_in_subtree(&self, id: WindowId, ancestor: WindowId) -> bool {
        let mut current = Some(id);
        while let Some(cursor) = current {
            if cursor == ancestor {
                return true;
            }
            current = self.windows.get(cursor).and_then(|w| w.parent);
        }
        false
    }

    /// The chain from `id` up to the root, leaf first.
    pub fn path_to_root(&self, id: WindowId) -> Vec<WindowId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(cursor) = current {
            if !self.windows.contains_key(cursor) {
                break;
            }
            path.push(cursor);
            current = self.windows[cursor].parent;
        }
        path
    }

    /// Update a window's layout configuration and invalidate it.
    pub fn with_layout(&mut self, id: WindowId, f: impl FnOnce(&mut Layout)) {
        if let Some(window) = self.windows.get_mut(id) {
            f(&mut window.layout);
            self.sort_children_of_parent(id);
            self.invalidate(id);
        }
    }

    /// Show or hide a window.
    pub fn set_visible(&mut self, id: WindowId, visible: bool) {
        if let Some(window) = self.windows.get_mut(id) {
            if window.visible != visible {
                window.visible = visible;
                self.invalidate(id);
            }
        }
    }

    /// Set whether a hidden window gives up its layout space.
    pub fn set_collapse_when_hidden(&mut self, id: WindowId, collapse: bool) {
        if let Some(window) = self.windows.get_mut(id) {
            window.collapse_when_hidden = collapse;
            self.invalidate(id);
        }
    }

    /// Set the backdrop-fill flag.
    pub fn set_background(&mut self, id: WindowId, background: bool) {
        if let Some(window) = self.windows.get_mut(id) {
            window.background = background;
        }
    }

    /// Set the overlay flag.
    pub fn set_overlay(&mut self, id: WindowId, overlay: bool) {
        if let Some(window) = self.windows.get_mut(id) {
            window.overlay = overlay;
            self.invalidate(id);
        }
    }

    /// Set the hit-test flags.
    pub fn set_input_handling(&mut self, id: WindowId, own: bool, children: bool) {
        if let Some(window) = self.windows.get_mut(id) {
            window.handle_input = own;
            window.children_handle_input = children;
        }
    }

    /// Set or clear the relative-to target name.
    pub fn set_relative_to(&mut self, id: WindowId, target: Option<String>) {
        if let Some(window) = self.windows.get_mut(id) {
            window.relative_to = target;
            self.invalidate(id);
        }
    }

    /// Set a window's render alpha directly.
    pub fn set_alpha(&mut self, id: WindowId, alpha: f32) {
        if let Some(window) = self.windows.get_mut(id) {
            window.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Re-sort the parent's children after an order change on `id`.
    fn sort_children_of_parent(&mut self, id: WindowId) {
        if let Some(parent) = self.windows.get(id).and_then(|w| w.parent) {
            self.sort_children(parent);
        }
    }

    /// Stable sort of a child list by layout order. Stability preserves
    /// insertion order for equal keys.
    fn sort_children(&mut self, parent: WindowId) {
        let mut children = std::mem::take(&mut self.windows[parent].children);
        children.sort_by_key(|c| self.windows[*c].layout.order);
        self.windows[parent].children = children;
    }

    /// Warn about a duplicate sibling name. Lookup by name returns the
    /// first match in sort order, so this is advisory only.
    fn warn_duplicate_name(&self, parent: WindowId, child: WindowId) {
        let name = &self.windows[child].name;
        if name.is_empty() {
            return;
        }
        let duplicate = self.windows[parent]
            .children
            .iter()
            .any(|c| self.windows[*c].name == *name);
        if duplicate {
            tracing::warn!(%name, "duplicate child name under one parent");
        }
    }

    /// Cascade Open top-down: each window's hook fires before its
    /// children's.
    fn cascade_open(&mut self, id: WindowId) {
        for sub in self.collect_subtree(id) {
            let window = &mut self.windows[sub];
            if window.phase != Phase::Open {
                window.phase = Phase::Open;
                window.widget.on_open();
            }
        }
    }

    /// Cascade Closed bottom-up: children's hooks fire before their
    /// parent's. Windows that never opened stay Uninitialized.
    fn cascade_closed(&mut self, id: WindowId) {
        let mut subtree = self.collect_subtree(id);
        subtree.reverse();
        for sub in subtree {
            let window = &mut self.windows[sub];
            if window.phase == Phase::Open {
                window.phase = Phase::Closed;
                window.widget.on_close();
            }
        }
    }

    /// Preorder ids of the subtree rooted at `id`.
    pub(crate) fn collect_subtree(&self, id: WindowId) -> Vec<WindowId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cursor) = stack.pop() {
            let Some(window) = self.windows.get(cursor) else {
                continue;
            };
            out.push(cursor);
            for child in window.children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }
}
