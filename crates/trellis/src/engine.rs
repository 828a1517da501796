//! The two-pass layout engine.
//!
//! Pass one measures a subtree's minimum size bottom-up. Pass two first
//! grows children whose sizing policy allows it into the remaining space,
//! then places every window top-down. All three walks consult the
//! relative-to mapping, so a re-homed window is sized and positioned as a
//! logical child of its target.
//!
//! Rounding follows one convention: sizes ceil, positions floor, offsets
//! round to nearest.

use trellis_geom::{Axis, Rect, Vec2};

use crate::{
    anchor::{anchor_offset, is_inside},
    layout::{Layout, LayoutMode, Sizing},
    relative::RelativeMap,
    tree::{Tree, WindowId},
};

/// Hard cap on water-filling iterations. Exceeding it is an internal
/// assertion failure, never a silent truncation.
const MAX_GROW_ITERATIONS: usize = 1024;

/// Sizes within this distance compete as equals during distribution.
const SIZE_EPSILON: f32 = 0.01;

/// One layout pass over a controller's tree.
pub(crate) struct LayoutPass<'a> {
    /// The tree being laid out.
    tree: &'a mut Tree,
    /// Logical-children mapping for this pass.
    map: &'a RelativeMap,
}

impl<'a> LayoutPass<'a> {
    /// Run a full pass: measure the whole tree against the viewport, force
    /// the root to the viewport size, then grow and place from the origin.
    pub fn run(tree: &'a mut Tree, map: &'a RelativeMap, base_scale: Vec2, viewport: Rect) {
        let root = tree.root();
        let mut pass = Self { tree, map };
        pass.measure(root, viewport.size, base_scale);
        if let Some(window) = pass.tree.window_mut(root) {
            window.measured = viewport.size;
        }
        pass.grow(root);
        pass.place(root, viewport.pos);
    }

    /// The logical children of a window for this pass.
    fn logical_children(&self, id: WindowId) -> Vec<WindowId> {
        self.map.children_of(self.tree, id).to_vec()
    }

    /// Logical children that participate in the standard algorithm:
    /// custom-arranged and collapsed windows are excluded.
    fn standard_children(&self, id: WindowId) -> Vec<WindowId> {
        self.logical_children(id)
            .into_iter()
            .filter(|child| {
                self.tree
                    .window(*child)
                    .is_some_and(|w| !w.layout().custom && w.takes_space())
            })
            .collect()
    }

    /// Measure a subtree's minimum size given the available space. Returns
    /// the margin-box size: content plus scaled padding and margin, clamped
    /// to the scaled min/max bounds.
    fn measure(&mut self, id: WindowId, avail: Vec2, parent_scale: Vec2) -> Vec2 {
        let Some(window) = self.tree.window(id) else {
            return Vec2::ZERO;
        };
        let layout = window.layout();
        let scale = parent_scale * layout.scale;

        if !window.takes_space() {
            if let Some(w) = self.tree.window_mut(id) {
                w.measured = Vec2::ZERO;
                w.scale_factor = scale;
                w.layout_dirty = false;
            }
            return Vec2::ZERO;
        }

        let margin = layout.margin.scaled_axes(scale);
        let padding = layout.padding.scaled_axes(scale);
        let inner_avail = (avail - margin.total() - padding.total()).max(Vec2::ZERO);

        let children_size = self.measure_children(id, layout, inner_avail, scale);

        let intrinsic = self
            .tree
            .window_mut(id)
            .map(|w| w.widget.measure(inner_avail, scale))
            .unwrap_or(Vec2::ZERO);

        let mut content = Vec2::ZERO;
        for axis in [Axis::X, Axis::Y] {
            let v = match layout.sizing(axis) {
                Sizing::Fixed(size) => {
                    let px = (size * scale.axis(axis)).ceil();
                    if px < 0.0 {
                        tracing::warn!(
                            window = %layout_name(self.tree, id),
                            "negative fixed size; clamping to zero"
                        );
                        0.0
                    } else {
                        px
                    }
                }
                Sizing::Fit | Sizing::Grow => intrinsic.axis(axis).max(children_size.axis(axis)),
            };
            content = content.with_axis(axis, v);
        }

        let content = self
            .tree
            .window_mut(id)
            .map(|w| w.widget.after_measure(content))
            .unwrap_or(content);

        let min = (layout.min_size * scale).ceil();
        let max = layout.max_size * scale;
        let mut measured = (content + padding.total() + margin.total())
            .ceil()
            .clamp(min, max);
        if measured.x < 0.0 || measured.y < 0.0 {
            tracing::warn!(
                window = %layout_name(self.tree, id),
                "over-constrained window measured negative; clamping to zero"
            );
            measured = measured.max(Vec2::ZERO);
        }

        if let Some(w) = self.tree.window_mut(id) {
            w.measured = measured;
            w.scale_factor = scale;
            w.layout_dirty = false;
        }
        measured
    }

    /// Measure logical children and fold their sizes per layout mode.
    fn measure_children(
        &mut self,
        id: WindowId,
        layout: Layout,
        inner_avail: Vec2,
        scale: Vec2,
    ) -> Vec2 {
        let children = self.logical_children(id);
        if children.is_empty() {
            return Vec2::ZERO;
        }

        match layout.mode {
            LayoutMode::Free => {
                // Only anchor-inside children contribute to the parent's
                // auto-size; outside children hang off the box.
                let mut size = Vec2::ZERO;
                for child in children {
                    let child_size = self.measure(child, inner_avail, scale);
                    let Some(cw) = self.tree.window(child) else {
                        continue;
                    };
                    let cl = cw.layout();
                    if cl.custom || !cw.takes_space() {
                        continue;
                    }
                    if is_inside(cl.parent_anchor, cl.anchor) {
                        size = size.max(child_size);
                    }
                }
                size
            }
            LayoutMode::Row | LayoutMode::Column => {
                let main = layout.mode.main_axis().expect("list mode has a main axis");
                let spacing = (layout.spacing * scale).round().axis(main);
                let mut pen = 0.0;
                let mut cross_max: f32 = 0.0;
                let mut counted = 0usize;
                for child in children {
                    let child_size = self.measure(child, inner_avail, scale);
                    let Some(cw) = self.tree.window(child) else {
                        continue;
                    };
                    if cw.layout().custom || !cw.takes_space() {
                        continue;
                    }
                    pen += child_size.axis(main);
                    cross_max = cross_max.max(child_size.axis(main.cross()));
                    counted += 1;
                }
                if counted > 1 {
                    pen += spacing * (counted - 1) as f32;
                }
                Vec2::from_axes(main, pen, cross_max)
            }
            LayoutMode::RowWrap | LayoutMode::ColumnWrap => {
                self.measure_children_wrapped(id, layout, inner_avail, scale)
            }
        }
    }

    /// Measure a wrapping list by re-flowing children against the
    /// available list-axis extent.
    fn measure_children_wrapped(
        &mut self,
        id: WindowId,
        layout: Layout,
        inner_avail: Vec2,
        scale: Vec2,
    ) -> Vec2 {
        let main = layout.mode.main_axis().expect("wrap mode has a main axis");
        let cross = main.cross();
        let spacing = (layout.spacing * scale).round();
        let limit = inner_avail.axis(main);

        let mut pen = 0.0;
        let mut line_cross: f32 = 0.0;
        let mut extent_main: f32 = 0.0;
        let mut extent_cross = 0.0;
        let mut line_started = false;

        for child in self.logical_children(id) {
            let child_size = self.measure(child, inner_avail, scale);
            let Some(cw) = self.tree.window(child) else {
                continue;
            };
            if cw.layout().custom || !cw.takes_space() {
                continue;
            }
            let advance = child_size.axis(main);
            if line_started && pen + spacing.axis(main) + advance > limit {
                extent_main = extent_main.max(pen);
                extent_cross += line_cross + spacing.axis(cross);
                pen = 0.0;
                line_cross = 0.0;
                line_started = false;
            }
            if line_started {
                pen += spacing.axis(main);
            }
            pen += advance;
            line_cross = line_cross.max(child_size.axis(cross));
            line_started = true;
        }
        extent_main = extent_main.max(pen);
        if line_started {
            extent_cross += line_cross;
        }
        Vec2::from_axes(main, extent_main, extent_cross)
    }

    /// Distribute extra space to children with a Grow policy, then recurse.
    fn grow(&mut self, id: WindowId) {
        let Some(window) = self.tree.window(id) else {
            return;
        };
        if !window.takes_space() {
            return;
        }
        let layout = window.layout();
        let scale = window.scale_factor();
        let measured = window.measured();
        let margin = layout.margin.scaled_axes(scale);
        let padding = layout.padding.scaled_axes(scale);
        let content = (measured - margin.total() - padding.total()).max(Vec2::ZERO);

        let children = self.standard_children(id);

        match layout.mode {
            LayoutMode::Free => {
                // No competition between siblings: each Grow child is
                // forced up to the parent's content independently per axis.
                for child in &children {
                    self.grow_child_axis(*child, Axis::X, content.x);
                    self.grow_child_axis(*child, Axis::Y, content.y);
                }
            }
            LayoutMode::Row | LayoutMode::Column => {
                let main = layout.mode.main_axis().expect("list mode has a main axis");
                let cross = main.cross();
                for child in &children {
                    self.grow_child_axis(*child, cross, content.axis(cross));
                }
                let spacing = (layout.spacing * scale).round().axis(main);
                self.distribute_main(&children, main, content.axis(main), spacing);
            }
            LayoutMode::RowWrap | LayoutMode::ColumnWrap => {
                // Grow policies are not applied inside wrapping lists;
                // overflow is resolved by re-flowing instead.
            }
        }

        for child in children {
            self.grow(child);
        }
    }

    /// Force a Grow child up to the available extent along one axis,
    /// capped at the child's scaled maximum.
    fn grow_child_axis(&mut self, child: WindowId, axis: Axis, available: f32) {
        let Some(window) = self.tree.window(child) else {
            return;
        };
        let layout = window.layout();
        if !layout.sizing(axis).is_grow() {
            return;
        }
        let max = layout.max_size.axis(axis) * window.scale_factor().axis(axis);
        let current = window.measured().axis(axis);
        let target = current.max(available).min(max);
        if target > current {
            if let Some(w) = self.tree.window_mut(child) {
                w.measured = w.measured.with_axis(axis, target);
            }
        }
    }

    /// Water-filling distribution of the remaining list-axis space among
    /// growing children: repeatedly raise every child at the current
    /// smallest size toward the second-smallest, until the space is spent
    /// or nobody is eligible to grow.
    fn distribute_main(&mut self, children: &[WindowId], main: Axis, available: f32, spacing: f32) {
        let mut used = 0.0;
        for child in children {
            if let Some(w) = self.tree.window(*child) {
                used += w.measured().axis(main);
            }
        }
        if children.len() > 1 {
            used += spacing * (children.len() - 1) as f32;
        }
        let mut remaining = available - used;

        let growable: Vec<WindowId> = children
            .iter()
            .copied()
            .filter(|child| {
                self.tree
                    .window(*child)
                    .is_some_and(|w| w.layout().sizing(main).is_grow())
            })
            .collect();
        if growable.is_empty() {
            return;
        }

        let mut iterations = 0usize;
        while remaining > 1.0 {
            let eligible: Vec<WindowId> = growable
                .iter()
                .copied()
                .filter(|child| {
                    self.tree.window(*child).is_some_and(|w| {
                        let max = w.layout().max_size.axis(main) * w.scale_factor().axis(main);
                        w.measured().axis(main) < max - SIZE_EPSILON
                    })
                })
                .collect();
            if eligible.is_empty() {
                break;
            }

            iterations += 1;
            if iterations > MAX_GROW_ITERATIONS {
                debug_assert!(false, "grow distribution exceeded the iteration cap");
                tracing::error!("grow distribution exceeded the iteration cap");
                break;
            }

            let mut smallest = f32::INFINITY;
            let mut second = f32::INFINITY;
            for child in &eligible {
                let size = self.tree.window(*child).map_or(0.0, |w| w.measured().axis(main));
                if size < smallest - SIZE_EPSILON {
                    second = smallest;
                    smallest = size;
                } else if size > smallest + SIZE_EPSILON {
                    second = second.min(size);
                }
            }

            let share = (second - smallest).min(remaining / eligible.len() as f32);
            for child in &eligible {
                let Some(w) = self.tree.window(*child) else {
                    continue;
                };
                let size = w.measured().axis(main);
                if size > smallest + SIZE_EPSILON {
                    continue;
                }
                let max = w.layout().max_size.axis(main) * w.scale_factor().axis(main);
                let granted = share.min(max - size);
                if granted > 0.0 {
                    remaining -= granted;
                    if let Some(wm) = self.tree.window_mut(*child) {
                        wm.measured = wm.measured.with_axis(main, size + granted);
                    }
                }
            }
        }
    }

    /// Assign a window's final rect, given the resolved position of its
    /// margin-inset box, then place its children.
    fn place(&mut self, id: WindowId, pos: Vec2) {
        let Some(window) = self.tree.window(id) else {
            return;
        };
        let layout = window.layout();
        let scale = window.scale_factor();
        let margin = layout.margin.scaled_axes(scale);
        let offset = (layout.offset * scale).round();
        let final_pos = (pos + offset).floor();
        let size = (window.measured() - margin.total()).max(Vec2::ZERO);
        if let Some(w) = self.tree.window_mut(id) {
            w.rect = Rect::from_pos_size(final_pos, size);
        }
        self.place_children(id);
    }

    /// Place logical children within this window's content rect.
    fn place_children(&mut self, id: WindowId) {
        let Some(window) = self.tree.window(id) else {
            return;
        };
        let layout = window.layout();
        let scale = window.scale_factor();
        let rect = window.rect();
        let padding = layout.padding.scaled_axes(scale);
        let content = rect.inset(padding);

        let mut standard = Vec::new();
        for child in self.logical_children(id) {
            let Some(cw) = self.tree.window(child) else {
                continue;
            };
            if cw.layout().custom {
                if let Some(w) = self.tree.window_mut(child) {
                    w.rect = w.widget.arrange(content);
                }
                self.place_children(child);
                continue;
            }
            if !cw.takes_space() {
                if let Some(w) = self.tree.window_mut(child) {
                    w.rect = Rect::from_pos_size(content.pos, Vec2::ZERO);
                }
                continue;
            }
            standard.push(child);
        }

        match layout.mode {
            LayoutMode::Free => {
                for child in standard {
                    let Some(cw) = self.tree.window(child) else {
                        continue;
                    };
                    let cl = cw.layout();
                    let cmargin = cl.margin.scaled_axes(cw.scale_factor());
                    let csize = (cw.measured() - cmargin.total()).max(Vec2::ZERO);
                    let pos = if is_inside(cl.parent_anchor, cl.anchor) {
                        let region = content.inset(cmargin);
                        region.pos + anchor_offset(cl.parent_anchor, cl.anchor, region.size, csize)
                    } else {
                        // Outside children hang off the outer box; margins
                        // and padding do not apply.
                        rect.pos + anchor_offset(cl.parent_anchor, cl.anchor, rect.size, csize)
                    };
                    self.place(child, pos);
                }
            }
            LayoutMode::Row
            | LayoutMode::Column
            | LayoutMode::RowWrap
            | LayoutMode::ColumnWrap => {
                self.place_list(&standard, layout, scale, content);
            }
        }
    }

    /// Place list children along a moving pen, wrapping when the mode
    /// calls for it.
    fn place_list(&mut self, children: &[WindowId], layout: Layout, scale: Vec2, content: Rect) {
        let main = layout.mode.main_axis().expect("list mode has a main axis");
        let cross = main.cross();
        let spacing = (layout.spacing * scale).round();
        let wraps = layout.mode.wraps();
        let limit = content.size.axis(main);

        let mut pen_main = 0.0;
        let mut pen_cross = 0.0;
        let mut line_cross: f32 = 0.0;
        let mut line_started = false;

        for child in children {
            let Some(cw) = self.tree.window(*child) else {
                continue;
            };
            let cmargin = cw.layout().margin.scaled_axes(cw.scale_factor());
            let cmeasured = cw.measured();
            let advance = cmeasured.axis(main);

            if wraps && line_started && pen_main + spacing.axis(main) + advance > limit {
                pen_main = 0.0;
                pen_cross += line_cross + spacing.axis(cross);
                line_cross = 0.0;
                line_started = false;
            }
            if line_started {
                pen_main += spacing.axis(main);
            }

            let pen_pos = content.pos + Vec2::from_axes(main, pen_main, pen_cross);
            self.place(*child, pen_pos + cmargin.top_left());

            pen_main += advance;
            line_cross = line_cross.max(cmeasured.axis(cross));
            line_started = true;
        }
    }
}

/// Best-effort window name for diagnostics.
fn layout_name(tree: &Tree, id: WindowId) -> String {
    tree.window(id)
        .map(|w| w.name().to_string())
        .unwrap_or_else(|| "<gone>".into())
}
