//! The controller: the root window of a tree and its per-frame driver.

use trellis_geom::{Rect, Vec2};

use crate::{
    engine::LayoutPass,
    event::{ButtonState, Key, MouseButton, Pointer},
    focus,
    loading::Loader,
    node::Phase,
    relative::RelativeMap,
    render::Painter,
    scale::{FixedScale, ScaleProvider},
    tree::{Tree, WindowId},
    tween::{Easing, Tween, TweenScheduler},
    widget::Widget,
};

/// An overlay window registered for deferred rendering, with its
/// per-frame rendered flag.
struct OverlayEntry {
    /// The overlay window.
    id: WindowId,
    /// Already rendered this frame.
    rendered: bool,
}

/// A controller drives one window tree through the per-frame sequence:
/// loading gate, layout, input focus, mouse focus, update, and render.
/// Multiple controllers may be live at once, registered with one
/// [`FocusArbitrator`](crate::arbitrator::FocusArbitrator) and ordered by
/// input priority.
pub struct Controller {
    /// The window tree this controller owns.
    pub(crate) tree: Tree,
    /// Input priority among controllers; higher is queried first.
    priority: i32,
    /// Inactive controllers are skipped each tick and lose mouse focus.
    active: bool,
    /// Screen region the root is laid out against.
    viewport: Rect,
    /// Display scale collaborator.
    scale: Box<dyn ScaleProvider + Send>,
    /// Relative-to mapping from the most recent layout pass.
    relative: RelativeMap,
    /// Overlay windows collected during the most recent layout pass.
    overlays: Vec<OverlayEntry>,
    /// Current keyboard-focus window.
    key_focus: Option<WindowId>,
    /// Manual focus override; wins over the current focus while valid.
    manual_focus: Option<WindowId>,
    /// Current mouse-focus window, granted by the arbitrator.
    mouse_focus: Option<WindowId>,
    /// Currently open dropdown or rollover.
    dropdown: Option<WindowId>,
    /// Tick of the most recent update; the arbitrator's activity test.
    last_tick: u64,
    /// Background content loader.
    loader: Loader,
    /// The initial preload batch has completed. Until then, update and
    /// render are gated entirely; afterwards only the still-loading
    /// windows themselves are skipped.
    preloaded: bool,
    /// Animated property scheduler.
    tweens: TweenScheduler,
}

impl Controller {
    /// Construct a controller around a root widget.
    pub fn new(widget: Box<dyn Widget>, name: impl Into<String>, viewport: Rect) -> Self {
        Self {
            tree: Tree::new(widget, name),
            priority: 0,
            active: true,
            viewport,
            scale: Box::new(FixedScale(1.0)),
            relative: RelativeMap::default(),
            overlays: Vec::new(),
            key_focus: None,
            manual_focus: None,
            mouse_focus: None,
            dropdown: None,
            last_tick: 0,
            loader: Loader::new(),
            preloaded: false,
            tweens: TweenScheduler::new(),
        }
    }

    /// Set the input priority. Takes effect at registration time.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the scale provider.
    pub fn with_scale(mut self, scale: Box<dyn ScaleProvider + Send>) -> Self {
        self.scale = scale;
        self
    }

    /// The input priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Is this controller participating in updates?
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate this controller. Inactive controllers are
    /// skipped each tick and have their mouse focus cleared.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// The current viewport.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Resize the viewport and invalidate layout.
    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.viewport != viewport {
            self.viewport = viewport;
            let root = self.tree.root();
            self.tree.invalidate(root);
        }
    }

    /// Borrow the window tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Borrow the window tree mutably for structural changes.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The current keyboard-focus window.
    pub fn key_focus(&self) -> Option<WindowId> {
        self.key_focus
    }

    /// The current mouse-focus window.
    pub fn mouse_focus(&self) -> Option<WindowId> {
        self.mouse_focus
    }

    /// The currently open dropdown, if any.
    pub fn dropdown(&self) -> Option<WindowId> {
        self.dropdown
    }

    /// Run one frame: loading gate, layout, keyboard focus, widget
    /// updates. Mouse focus is resolved by the arbitrator once all
    /// controllers have updated this tick.
    pub fn update(&mut self, tick: u64, dt: f32, _pointer: &Pointer) {
        self.last_tick = tick;

        self.collect_loads();
        self.loader.run_all();
        self.apply_load_results();
        if self.loader.pending() > 0 && !self.preloaded {
            // Nothing updates or draws until the initial preload batch
            // lands; later loads only gate their own window.
            return;
        }
        self.preloaded = true;

        if self.tree.is_dirty() {
            self.perform_layout();
        }

        self.update_key_focus();

        self.tweens.tick(dt);
        self.apply_fades();
        self.update_widgets(dt);
    }

    /// Did this controller execute an update for the given tick?
    pub(crate) fn is_active_for(&self, tick: u64) -> bool {
        self.active && self.last_tick == tick
    }

    /// Rebuild the relative-to mapping and run a full layout pass.
    fn perform_layout(&mut self) {
        let root = self.tree.root();
        let (map, overlays) = RelativeMap::build(&self.tree, root);
        self.overlays = overlays
            .into_iter()
            .map(|id| OverlayEntry {
                id,
                rendered: false,
            })
            .collect();
        LayoutPass::run(&mut self.tree, &map, self.scale.scale(), self.viewport);
        self.relative = map;
    }

    /// Dispatch load tasks for newly opened windows.
    fn collect_loads(&mut self) {
        let root = self.tree.root();
        for id in self.tree.collect_subtree(root) {
            let Some(window) = self.tree.window_mut(id) else {
                continue;
            };
            if window.phase != Phase::Open || window.loaded || window.loading {
                continue;
            }
            let epoch = window.epoch;
            match window.widget.load() {
                Some(task) => {
                    window.loading = true;
                    self.loader.add_task(id, epoch, task);
                }
                None => window.loaded = true,
            }
        }
    }

    /// Apply completed loads, discarding results that are stale for their
    /// window: the window is gone, has closed, or has been re-attached
    /// since the task was dispatched.
    fn apply_load_results(&mut self) {
        for result in self.loader.poll() {
            let Some(window) = self.tree.window_mut(result.window) else {
                tracing::trace!("discarding load result for a removed window");
                continue;
            };
            if window.phase != Phase::Open || window.epoch != result.epoch {
                tracing::trace!(name = %window.name, "discarding stale load result");
                window.loading = false;
                continue;
            }
            window.loading = false;
            match result.outcome {
                Ok(()) => {
                    window.loaded = true;
                    // Content-dependent measurement may have changed.
                    self.tree.invalidate(result.window);
                }
                Err(err) => {
                    tracing::warn!(name = %window.name, %err, "window content load failed");
                }
            }
        }
    }

    /// Re-evaluate keyboard focus: the manual override wins while valid,
    /// and a focus invalidated by layout or visibility changes is
    /// dropped.
    fn update_key_focus(&mut self) {
        let manual = self.manual_focus.filter(|id| focus::is_focusable(&self.tree, *id));
        let current = self.key_focus.filter(|id| focus::is_focusable(&self.tree, *id));
        let desired = manual.or(current);
        if desired != self.key_focus {
            focus::move_focus(&mut self.tree, &mut self.key_focus, desired);
        }
    }

    /// Set keyboard focus directly.
    pub fn focus_window(&mut self, target: Option<WindowId>) {
        let target = target.filter(|id| focus::is_focusable(&self.tree, *id));
        focus::move_focus(&mut self.tree, &mut self.key_focus, target);
    }

    /// Set or clear the manual focus override.
    pub fn set_manual_focus(&mut self, target: Option<WindowId>) {
        self.manual_focus = target;
    }

    /// Advance window alpha fades and drop finished ones.
    fn apply_fades(&mut self) {
        let root = self.tree.root();
        for id in self.tree.collect_subtree(root) {
            let Some(window) = self.tree.window(id) else {
                continue;
            };
            let Some(fade) = window.fade else {
                continue;
            };
            let (value, finished) = match self.tweens.get(fade) {
                Some(tween) => (tween.value(), tween.finished()),
                None => continue,
            };
            if let Some(window) = self.tree.window_mut(id) {
                window.alpha = value.clamp(0.0, 1.0);
                if finished {
                    window.fade = None;
                }
            }
            if finished {
                self.tweens.stop(fade);
            }
        }
    }

    /// Start an alpha fade on a window.
    pub fn fade_window(&mut self, id: WindowId, target: f32, duration: f32, easing: Easing) {
        let Some(window) = self.tree.window(id) else {
            return;
        };
        let start = window.alpha();
        if let Some(old) = window.fade {
            self.tweens.stop(old);
        }
        let handle = self.tweens.start(Tween::new(start, target, duration, easing));
        if let Some(window) = self.tree.window_mut(id) {
            window.fade = Some(handle);
        }
    }

    /// Run the per-frame widget update hooks, skipping subtrees whose
    /// content load is still outstanding.
    fn update_widgets(&mut self, dt: f32) {
        let root = self.tree.root();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(window) = self.tree.window_mut(id) else {
                continue;
            };
            if window.phase != Phase::Open || window.loading {
                continue;
            }
            window.widget.update(dt);
            let children = window.children.clone();
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }
    }

    /// The deepest input-handling window under the cursor.
    pub(crate) fn window_under_mouse(&self, pos: Vec2) -> Option<WindowId> {
        self.tree.window_at(self.tree.root(), pos, true)
    }

    /// Grant or move mouse focus, firing enter/leave/move hooks.
    pub(crate) fn set_mouse_focus(&mut self, target: Option<WindowId>, pos: Vec2) {
        if self.mouse_focus == target {
            if let Some(id) = target {
                if let Some(window) = self.tree.window_mut(id) {
                    window.widget.on_mouse_move(pos);
                }
            }
            return;
        }
        if let Some(old) = self.mouse_focus.take() {
            if let Some(window) = self.tree.window_mut(old) {
                window.widget.on_mouse_leave();
            }
        }
        if let Some(new) = target {
            if let Some(window) = self.tree.window_mut(new) {
                window.widget.on_mouse_enter();
                window.widget.on_mouse_move(pos);
            }
        }
        self.mouse_focus = target;
    }

    /// Clear mouse focus, firing mouse-leave.
    pub(crate) fn clear_mouse_focus(&mut self) {
        if let Some(old) = self.mouse_focus.take() {
            if let Some(window) = self.tree.window_mut(old) {
                window.widget.on_mouse_leave();
            }
        }
    }

    /// Deliver a key event to the keyboard-focus window, bubbling up the
    /// ancestor chain while handlers ask for propagation.
    pub fn key_event(&mut self, key: Key, state: ButtonState, mouse: Vec2) {
        let mut current = self.key_focus;
        while let Some(id) = current {
            let Some(window) = self.tree.window_mut(id) else {
                break;
            };
            if !window.widget.on_key(key, state, mouse) {
                break;
            }
            current = window.parent;
        }
    }

    /// Deliver a mouse-button event.
    ///
    /// A press outside an open dropdown closes the dropdown first, before
    /// any focus change; the event is then routed to the mouse-focus
    /// window and bubbles like a key event.
    pub fn mouse_button(&mut self, button: MouseButton, state: ButtonState, pos: Vec2) {
        if state == ButtonState::Pressed {
            if let Some(dropdown) = self.dropdown {
                let hit = self.window_under_mouse(pos);
                let inside = hit.is_some_and(|h| self.tree.is_in_subtree(h, dropdown));
                if !inside {
                    self.close_dropdown();
                }
            }
            if let Some(hit) = self.window_under_mouse(pos) {
                // Click-to-focus: the nearest focus-accepting ancestor of
                // the hit window takes keyboard focus.
                let target = self
                    .tree
                    .path_to_root(hit)
                    .into_iter()
                    .find(|id| focus::is_focusable(&self.tree, *id));
                if target.is_some() {
                    focus::move_focus(&mut self.tree, &mut self.key_focus, target);
                }
            }
        }

        let mut current = self.mouse_focus;
        while let Some(id) = current {
            let Some(window) = self.tree.window_mut(id) else {
                break;
            };
            if !window.widget.on_key(Key::Mouse(button), state, pos) {
                break;
            }
            current = window.parent;
        }
    }

    /// Open a dropdown or rollover, attaching it under `parent`. Any
    /// previously open one is closed and detached first; that ordering is
    /// load-bearing, reversing it produces single-frame artifacts.
    pub fn open_dropdown(&mut self, parent: WindowId, id: WindowId) -> crate::Result<()> {
        self.close_dropdown();
        self.tree.attach(parent, id)?;
        self.dropdown = Some(id);
        Ok(())
    }

    /// Close and detach the current dropdown, if any.
    pub fn close_dropdown(&mut self) {
        if let Some(id) = self.dropdown.take() {
            if let Some(parent) = self.tree.window(id).and_then(|w| w.parent()) {
                let _ = self.tree.detach(parent, id);
            }
        }
    }

    /// Render the tree back-to-front. Overlay windows are deferred to a
    /// second pass after the subtree of their logical owner finishes, and
    /// each renders exactly once per frame.
    pub fn render(&mut self, painter: &mut dyn Painter) {
        if self.loader.pending() > 0 && !self.preloaded {
            return;
        }
        for entry in &mut self.overlays {
            entry.rendered = false;
        }
        self.render_window(self.tree.root(), painter);
    }

    /// Render one window and its subtree, then any overlays it owns.
    fn render_window(&mut self, id: WindowId, painter: &mut dyn Painter) {
        let Some(window) = self.tree.window(id) else {
            return;
        };
        if !window.is_visible() || window.phase() != Phase::Open || window.is_loading() {
            return;
        }
        let rect = window.rect();
        let alpha = window.alpha();
        let background = window.background;
        let name = window.name().to_string();

        painter.begin_window(&name, rect);
        if background {
            painter.fill(rect, alpha);
        }
        let consumed = self
            .tree
            .window_mut(id)
            .map(|w| w.widget.draw(painter, rect, alpha))
            .unwrap_or(false);

        if !consumed {
            let children: Vec<WindowId> = self
                .tree
                .window(id)
                .map(|w| w.children().to_vec())
                .unwrap_or_default();
            for child in children {
                let is_overlay = self
                    .tree
                    .window(child)
                    .is_some_and(|w| w.is_overlay());
                if is_overlay {
                    continue;
                }
                self.render_window(child, painter);
            }
        }

        if let Some(window) = self.tree.window_mut(id) {
            window.widget.after_children_draw(painter, rect);
        }

        let pending: Vec<WindowId> = self
            .overlays
            .iter()
            .filter(|entry| !entry.rendered)
            .map(|entry| entry.id)
            .collect();
        for overlay in pending {
            if self.relative.chain_contains(&self.tree, overlay, id) {
                if let Some(entry) = self.overlays.iter_mut().find(|e| e.id == overlay) {
                    entry.rendered = true;
                }
                self.render_window(overlay, painter);
            }
        }
    }
}
