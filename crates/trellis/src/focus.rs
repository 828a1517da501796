//! Per-controller keyboard focus.
//!
//! Keyboard focus is scoped to one controller; it is not arbitrated
//! globally. Focus changes notify the minimal path between the old and
//! new windows: the common ancestors of both chains see neither a lost
//! nor a gained event.

use crate::{
    node::Phase,
    tree::{Tree, WindowId},
};

/// Can this window take keyboard focus right now? It must be open,
/// visible along its whole ancestor chain, and its widget must accept
/// focus.
pub(crate) fn is_focusable(tree: &Tree, id: WindowId) -> bool {
    let Some(window) = tree.window(id) else {
        return false;
    };
    if window.phase() != Phase::Open || !window.widget.accepts_focus() {
        return false;
    }
    tree.path_to_root(id)
        .iter()
        .all(|anc| tree.window(*anc).is_some_and(|w| w.is_visible()))
}

/// Move keyboard focus, firing paired focus-lost / focus-gained hooks
/// along the minimal path: lost fires leaf-upward on the old chain,
/// gained fires top-down on the new chain, and shared ancestors are not
/// notified at all.
pub(crate) fn move_focus(
    tree: &mut Tree,
    current: &mut Option<WindowId>,
    target: Option<WindowId>,
) {
    if *current == target {
        return;
    }
    let old_path = current.map(|id| tree.path_to_root(id)).unwrap_or_default();
    let new_path = target.map(|id| tree.path_to_root(id)).unwrap_or_default();

    // Shared ancestor count, measured from the root end of each chain.
    let mut common = 0;
    while common < old_path.len() && common < new_path.len() {
        if old_path[old_path.len() - 1 - common] != new_path[new_path.len() - 1 - common] {
            break;
        }
        common += 1;
    }

    for id in &old_path[..old_path.len() - common] {
        if let Some(window) = tree.window_mut(*id) {
            window.widget.on_focus_lost();
        }
    }
    for id in new_path[..new_path.len() - common].iter().rev() {
        if let Some(window) = tree.window_mut(*id) {
            window.widget.on_focus_gained();
        }
    }
    *current = target;
}
