//! Integration tests for focus arbitration and input routing.

#[cfg(test)]
mod tests {
    use trellis::{
        ButtonState, Controller, Key, Layout, MouseButton, Phase,
        error::Result,
        geom::{Rect, Vec2},
        testing::{EventLog, Harness, TWidget, drain_log, new_log},
    };

    /// Two controllers side by side: A on the left half, B on the right,
    /// with A at higher priority. Each gets one fill child.
    fn two_controllers(log: &EventLog) -> Harness {
        let a = Controller::new(
            Box::new(TWidget::new("a-root")),
            "a-root",
            Rect::new(0.0, 0.0, 160.0, 180.0),
        )
        .with_priority(10);
        let mut h = Harness::with_controller(a);
        let b = Controller::new(
            Box::new(TWidget::new("b-root")),
            "b-root",
            Rect::new(160.0, 0.0, 160.0, 180.0),
        );
        let b_id = h.arbitrator.register(b);

        for (cid, tag) in [(h.controller, "a"), (b_id, "b")] {
            let ctrl = h.arbitrator.controller_mut(cid).unwrap();
            let tree = ctrl.tree_mut();
            let root = tree.root();
            let w = tree.insert(Box::new(TWidget::new(tag).with_log(log)), tag);
            tree.attach(root, w).unwrap();
            tree.with_layout(w, |l| *l = Layout::fill());
        }
        h
    }

    /// The second controller registered in `two_controllers`.
    fn second(h: &Harness) -> trellis::ControllerId {
        *h.arbitrator
            .controller_ids()
            .iter()
            .find(|cid| **cid != h.controller)
            .unwrap()
    }

    #[test]
    fn focus_exclusivity() {
        let log = new_log();
        let mut h = two_controllers(&log);
        h.tick();
        h.mouse_move(80.0, 90.0);
        h.tick();

        let focused: Vec<bool> = h
            .arbitrator
            .controller_ids()
            .to_vec()
            .iter()
            .map(|cid| h.arbitrator.controller(*cid).unwrap().mouse_focus().is_some())
            .collect();
        assert_eq!(focused.iter().filter(|f| **f).count(), 1);
    }

    #[test]
    fn cursor_moves_between_controllers() {
        let log = new_log();
        let mut h = two_controllers(&log);
        h.tick();
        h.mouse_move(80.0, 90.0);
        h.tick();
        assert!(h.ctrl().mouse_focus().is_some());
        assert_eq!(drain_log(&log), ["a:enter"]);

        let b = second(&h);
        h.mouse_move(240.0, 90.0);
        h.tick();
        assert!(h.ctrl().mouse_focus().is_none());
        assert!(h.arbitrator.controller(b).unwrap().mouse_focus().is_some());
        assert_eq!(drain_log(&log), ["a:leave", "b:enter"]);
    }

    #[test]
    fn drag_preserves_focus() {
        let log = new_log();
        let mut h = two_controllers(&log);
        h.tick();
        h.mouse_move(80.0, 90.0);
        h.tick();
        let dragged = h.ctrl().mouse_focus();
        assert!(dragged.is_some());

        // With the button held on A's window, crossing into B's window
        // must not steal focus.
        h.press(MouseButton::Left);
        h.mouse_move(240.0, 90.0);
        h.tick();
        assert_eq!(h.ctrl().mouse_focus(), dragged);
        let b = second(&h);
        assert!(h.arbitrator.controller(b).unwrap().mouse_focus().is_none());

        // Releasing hands focus over on the next resolution.
        h.release(MouseButton::Left);
        h.tick();
        assert!(h.ctrl().mouse_focus().is_none());
        assert!(h.arbitrator.controller(b).unwrap().mouse_focus().is_some());
    }

    #[test]
    fn inactive_controllers_lose_focus() {
        let log = new_log();
        let mut h = two_controllers(&log);
        h.tick();
        h.mouse_move(80.0, 90.0);
        h.tick();
        assert!(h.ctrl().mouse_focus().is_some());

        h.ctrl_mut().set_active(false);
        h.tick();
        assert!(h.ctrl().mouse_focus().is_none());
    }

    #[test]
    fn higher_priority_controller_wins_overlap() {
        let low = Controller::new(
            Box::new(TWidget::new("low-root")),
            "low-root",
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        let mut h = Harness::with_controller(low);
        let high = Controller::new(
            Box::new(TWidget::new("high-root")),
            "high-root",
            Rect::new(0.0, 0.0, 100.0, 100.0),
        )
        .with_priority(5);
        let high_id = h.arbitrator.register(high);

        h.tick();
        h.mouse_move(50.0, 50.0);
        h.tick();

        assert!(h.arbitrator.controller(high_id).unwrap().mouse_focus().is_some());
        assert!(h.ctrl().mouse_focus().is_none());
    }

    #[test]
    fn keyboard_focus_notifies_minimal_path() -> Result<()> {
        let log = new_log();
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let panel = h.add(root, TWidget::new("panel").with_log(&log), "panel")?;
        let first = h.add(panel, TWidget::new("first").with_log(&log).focusable(), "first")?;
        let second = h.add(panel, TWidget::new("second").with_log(&log).focusable(), "second")?;
        h.tick();
        drain_log(&log);

        h.ctrl_mut().focus_window(Some(first));
        // Gained fires top-down along the whole new chain.
        assert_eq!(drain_log(&log), ["panel:focus", "first:focus"]);

        // Moving to a sibling only notifies the divergent leaves; the
        // shared panel ancestor sees nothing.
        h.ctrl_mut().focus_window(Some(second));
        assert_eq!(drain_log(&log), ["first:blur", "second:focus"]);
        Ok(())
    }

    #[test]
    fn hidden_focus_is_reevaluated() -> Result<()> {
        let log = new_log();
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let target = h.add(root, TWidget::new("t").with_log(&log).focusable(), "t")?;
        h.tick();
        h.ctrl_mut().focus_window(Some(target));
        assert_eq!(h.ctrl().key_focus(), Some(target));

        // Hiding the focused window drops focus on the next update.
        h.tree_mut().set_visible(target, false);
        h.tick();
        assert_eq!(h.ctrl().key_focus(), None);
        Ok(())
    }

    #[test]
    fn manual_focus_override_wins() -> Result<()> {
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let a = h.add(root, TWidget::new("a").focusable(), "a")?;
        let b = h.add(root, TWidget::new("b").focusable(), "b")?;
        h.tick();
        h.ctrl_mut().focus_window(Some(a));
        h.ctrl_mut().set_manual_focus(Some(b));
        h.tick();
        assert_eq!(h.ctrl().key_focus(), Some(b));
        Ok(())
    }

    #[test]
    fn key_events_bubble_until_swallowed() -> Result<()> {
        let log = new_log();
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let outer = h.add(root, TWidget::new("outer").with_log(&log).swallow_keys(), "outer")?;
        let inner = h.add(outer, TWidget::new("inner").with_log(&log).focusable(), "inner")?;
        h.tick();
        h.ctrl_mut().focus_window(Some(inner));
        drain_log(&log);

        h.ctrl_mut()
            .key_event(Key::Scan(42), ButtonState::Pressed, Vec2::ZERO);
        // inner propagates, outer swallows, the root never sees it.
        assert_eq!(drain_log(&log), ["inner:key", "outer:key"]);
        Ok(())
    }

    #[test]
    fn outside_click_closes_dropdown_first() -> Result<()> {
        let log = new_log();
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let menu = h.add(root, TWidget::new("menu"), "menu")?;
        h.tree_mut()
            .with_layout(menu, |l| *l = Layout::free().fixed(60.0, 20.0));

        let dd = h.tree_mut().insert(
            Box::new(TWidget::new("dd").with_log(&log)),
            "dd",
        );
        h.tree_mut()
            .with_layout(dd, |l| *l = Layout::free().fixed(60.0, 80.0).offset(Vec2::new(0.0, 20.0)));
        h.ctrl_mut().open_dropdown(root, dd)?;
        h.tick();
        assert_eq!(h.ctrl().dropdown(), Some(dd));
        assert_eq!(drain_log(&log), ["dd:open"]);

        // A click inside the dropdown leaves it open.
        h.mouse_move(30.0, 60.0);
        h.tick();
        h.press(MouseButton::Left);
        h.release(MouseButton::Left);
        assert_eq!(h.ctrl().dropdown(), Some(dd));

        // A click outside closes and detaches it.
        h.mouse_move(300.0, 170.0);
        h.tick();
        drain_log(&log);
        h.press(MouseButton::Left);
        assert_eq!(h.ctrl().dropdown(), None);
        assert_eq!(drain_log(&log), ["dd:close"]);
        assert_eq!(h.tree().window(dd).unwrap().phase(), Phase::Closed);
        assert_eq!(h.tree().window(dd).unwrap().parent(), None);
        Ok(())
    }

    #[test]
    fn open_dropdown_closes_the_previous_one_first() -> Result<()> {
        let log = new_log();
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let first = h
            .tree_mut()
            .insert(Box::new(TWidget::new("first").with_log(&log)), "first");
        let second = h
            .tree_mut()
            .insert(Box::new(TWidget::new("second").with_log(&log)), "second");

        h.ctrl_mut().open_dropdown(root, first)?;
        assert_eq!(drain_log(&log), ["first:open"]);

        // Close-before-open: the old dropdown is gone before the new one
        // attaches.
        h.ctrl_mut().open_dropdown(root, second)?;
        assert_eq!(drain_log(&log), ["first:close", "second:open"]);
        assert_eq!(h.ctrl().dropdown(), Some(second));
        Ok(())
    }
}
