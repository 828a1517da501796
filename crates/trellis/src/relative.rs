//! The per-pass relative-to mapping.
//!
//! A window with a `relative_to` target is laid out as a logical child of
//! that window, wherever it sits in the real tree. The mapping is rebuilt
//! once per controller layout pass and never persisted; true child lists
//! are forked privately on first modification, so real ownership is never
//! mutated.

use std::collections::HashMap;

use crate::tree::{Tree, WindowId};

/// Alternate parent-to-children mapping for one layout pass.
#[derive(Default)]
pub(crate) struct RelativeMap {
    /// Forked child lists, keyed by logical parent. A window without an
    /// entry reuses its real child list.
    children: HashMap<WindowId, Vec<WindowId>>,
    /// Logical parent for every re-homed window.
    parents: HashMap<WindowId, WindowId>,
}

impl RelativeMap {
    /// Build the mapping for one pass over the tree under `root`. Also
    /// collects all overlay-flagged windows, in tree order, regardless of
    /// relative-to status.
    pub fn build(tree: &Tree, root: WindowId) -> (Self, Vec<WindowId>) {
        let mut map = Self::default();
        let mut overlays = Vec::new();

        for id in tree.collect_subtree(root) {
            let Some(window) = tree.window(id) else {
                continue;
            };
            if window.is_overlay() && id != root {
                overlays.push(id);
            }
            let Some(target_name) = window.relative_to() else {
                continue;
            };
            let Some(true_parent) = window.parent() else {
                continue;
            };

            // Resolve within the window's own subtree first, then fall
            // back to the whole controller's subtree.
            let target = tree
                .find(id, target_name)
                .or_else(|| tree.find(root, target_name));
            match target {
                Some(target) if target != id && !map.would_cycle(tree, id, target) => {
                    map.fork(tree, true_parent).retain(|c| *c != id);
                    map.fork(tree, target).push(id);
                    map.parents.insert(id, target);
                }
                Some(_) => {
                    tracing::warn!(
                        window = %window.name(),
                        target = target_name,
                        "relative-to target would create a layout cycle; using true parent"
                    );
                }
                None => {
                    tracing::warn!(
                        window = %window.name(),
                        target = target_name,
                        "relative-to target not found; using true parent"
                    );
                }
            }
        }

        (map, overlays)
    }

    /// The logical children of a window for this pass.
    pub fn children_of<'a>(&'a self, tree: &'a Tree, id: WindowId) -> &'a [WindowId] {
        match self.children.get(&id) {
            Some(forked) => forked,
            None => tree.window(id).map(|w| w.children()).unwrap_or(&[]),
        }
    }

    /// The logical parent of a window: its relative-to target when
    /// re-homed, its real parent otherwise.
    pub fn logical_parent(&self, tree: &Tree, id: WindowId) -> Option<WindowId> {
        self.parents
            .get(&id)
            .copied()
            .or_else(|| tree.window(id).and_then(|w| w.parent()))
    }

    /// Does the window's logical ancestor chain contain `ancestor`?
    pub fn chain_contains(&self, tree: &Tree, id: WindowId, ancestor: WindowId) -> bool {
        let mut current = self.logical_parent(tree, id);
        while let Some(cursor) = current {
            if cursor == ancestor {
                return true;
            }
            current = self.logical_parent(tree, cursor);
        }
        false
    }

    /// Fork a window's child list on first use.
    fn fork(&mut self, tree: &Tree, id: WindowId) -> &mut Vec<WindowId> {
        self.children
            .entry(id)
            .or_insert_with(|| tree.window(id).map(|w| w.children().to_vec()).unwrap_or_default())
    }

    /// Would re-homing `id` under `target` make `id` its own logical
    /// ancestor?
    fn would_cycle(&self, tree: &Tree, id: WindowId, target: WindowId) -> bool {
        let mut current = Some(target);
        while let Some(cursor) = current {
            if cursor == id {
                return true;
            }
            current = self.logical_parent(tree, cursor);
        }
        false
    }
}
