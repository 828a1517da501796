//! Integration tests for tree structure and lifecycle.

#[cfg(test)]
mod tests {
    use trellis::{
        Phase, Tree,
        error::Result,
        geom::{Rect, Vec2},
        testing::{Harness, TWidget, drain_log, new_log},
    };

    fn tree() -> Tree {
        Tree::new(Box::new(TWidget::new("root")), "root")
    }

    #[test]
    fn stable_sort_preserves_insertion_order() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let a = t.insert(Box::new(TWidget::new("a")), "a");
        let b = t.insert(Box::new(TWidget::new("b")), "b");
        let c = t.insert(Box::new(TWidget::new("c")), "c");
        t.attach(root, a)?;
        t.attach(root, b)?;
        t.attach(root, c)?;
        assert_eq!(t.window(root).unwrap().children(), &[a, b, c]);

        // A lower order key sorts ahead; equal keys keep insertion order.
        let d = t.insert(Box::new(TWidget::new("d")), "d");
        t.with_layout(d, |l| l.order = -1);
        t.attach(root, d)?;
        assert_eq!(t.window(root).unwrap().children(), &[d, a, b, c]);

        let e = t.insert(Box::new(TWidget::new("e")), "e");
        t.attach(root, e)?;
        assert_eq!(t.window(root).unwrap().children(), &[d, a, b, c, e]);
        Ok(())
    }

    #[test]
    fn parent_links_stay_consistent() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let a = t.insert(Box::new(TWidget::new("a")), "a");
        t.attach(root, a)?;
        assert_eq!(t.window(a).unwrap().parent(), Some(root));

        t.detach(root, a)?;
        assert_eq!(t.window(a).unwrap().parent(), None);
        assert!(t.window(root).unwrap().children().is_empty());
        Ok(())
    }

    #[test]
    #[should_panic(expected = "double attach")]
    fn double_attach_traps_in_debug() {
        let mut t = tree();
        let root = t.root();
        let a = t.insert(Box::new(TWidget::new("a")), "a");
        let b = t.insert(Box::new(TWidget::new("b")), "b");
        t.attach(root, b).unwrap();
        t.attach(root, a).unwrap();
        // `a` is now Open; attaching it again must trap.
        let _ = t.attach(b, a);
    }

    #[test]
    #[should_panic(expected = "wrong parent")]
    fn detach_from_wrong_parent_traps_in_debug() {
        let mut t = tree();
        let root = t.root();
        let a = t.insert(Box::new(TWidget::new("a")), "a");
        let b = t.insert(Box::new(TWidget::new("b")), "b");
        t.attach(root, a).unwrap();
        t.attach(root, b).unwrap();
        let _ = t.detach(a, b);
    }

    #[test]
    fn lifecycle_hook_order() -> Result<()> {
        let log = new_log();
        let mut t = tree();
        let root = t.root();
        let panel = t.insert(Box::new(TWidget::new("panel").with_log(&log)), "panel");
        let leaf = t.insert(Box::new(TWidget::new("leaf").with_log(&log)), "leaf");

        // Attaching into a detached subtree fires nothing.
        t.attach(panel, leaf)?;
        assert!(drain_log(&log).is_empty());
        assert_eq!(t.window(leaf).unwrap().phase(), Phase::Uninitialized);

        // Open cascades top-down: parent hook before children.
        t.attach(root, panel)?;
        assert_eq!(drain_log(&log), ["panel:open", "leaf:open"]);
        assert_eq!(t.window(panel).unwrap().phase(), Phase::Open);
        assert_eq!(t.window(leaf).unwrap().phase(), Phase::Open);

        // Close cascades bottom-up: children hooks before the parent.
        t.detach(root, panel)?;
        assert_eq!(drain_log(&log), ["leaf:close", "panel:close"]);
        assert_eq!(t.window(panel).unwrap().phase(), Phase::Closed);
        assert_eq!(t.window(leaf).unwrap().phase(), Phase::Closed);

        // Re-attaching restarts at Open and fires the hooks once more.
        t.attach(root, panel)?;
        assert_eq!(drain_log(&log), ["panel:open", "leaf:open"]);
        Ok(())
    }

    #[test]
    fn epoch_bumps_on_every_attach() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let a = t.insert(Box::new(TWidget::new("a")), "a");
        assert_eq!(t.window(a).unwrap().epoch(), 0);
        t.attach(root, a)?;
        assert_eq!(t.window(a).unwrap().epoch(), 1);
        t.detach(root, a)?;
        t.attach(root, a)?;
        assert_eq!(t.window(a).unwrap().epoch(), 2);
        Ok(())
    }

    #[test]
    fn find_checks_direct_children_first() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let outer = t.insert(Box::new(TWidget::new("outer")), "outer");
        let nested = t.insert(Box::new(TWidget::new("nested")), "target");
        let direct = t.insert(Box::new(TWidget::new("direct")), "target");
        t.attach(root, outer)?;
        t.attach(outer, nested)?;
        t.attach(root, direct)?;

        // The direct child wins over the earlier-attached descendant.
        assert_eq!(t.find(root, "target"), Some(direct));
        assert_eq!(t.find(outer, "target"), Some(nested));
        assert_eq!(t.find(root, "absent"), None);
        Ok(())
    }

    #[test]
    fn find_or_invalid_returns_the_null_sentinel() {
        let t = tree();
        let missing = t.find_or_invalid(t.root(), "nope");
        assert!(t.window(missing).is_none());
    }

    #[test]
    fn hit_test_honors_order_and_input_flags() -> Result<()> {
        let mut h = Harness::new(100.0, 100.0);
        let root = h.tree().root();
        let low = h.add(root, TWidget::new("low"), "low")?;
        let high = h.add(root, TWidget::new("high"), "high")?;
        h.tree_mut()
            .with_layout(low, |l| *l = trellis::Layout::free().fixed(50.0, 50.0));
        h.tree_mut()
            .with_layout(high, |l| *l = trellis::Layout::free().fixed(50.0, 50.0).order(1));
        h.tick();

        // Both overlap at (10, 10); the higher order-in-parent wins.
        let hit = h.tree().window_at(root, Vec2::new(10.0, 10.0), true);
        assert_eq!(hit, Some(high));

        // A window that opts out of input falls through to the sibling.
        h.tree_mut().set_input_handling(high, false, true);
        let hit = h.tree().window_at(root, Vec2::new(10.0, 10.0), true);
        assert_eq!(hit, Some(low));

        // Blocking child input hit-tests the parent itself.
        h.tree_mut().set_input_handling(root, true, false);
        let hit = h.tree().window_at(root, Vec2::new(10.0, 10.0), true);
        assert_eq!(hit, Some(root));

        // respect_input=false ignores all the flags.
        let hit = h.tree().window_at(root, Vec2::new(10.0, 10.0), false);
        assert_eq!(hit, Some(high));
        Ok(())
    }

    #[test]
    fn hit_test_skips_hidden_windows() -> Result<()> {
        let mut h = Harness::new(100.0, 100.0);
        let root = h.tree().root();
        let a = h.add(root, TWidget::new("a"), "a")?;
        h.tree_mut()
            .with_layout(a, |l| *l = trellis::Layout::free().fixed(50.0, 50.0));
        h.tick();
        assert_eq!(
            h.tree().window_at(root, Vec2::new(10.0, 10.0), true),
            Some(a)
        );
        h.tree_mut().set_visible(a, false);
        assert_eq!(
            h.tree().window_at(root, Vec2::new(10.0, 10.0), true),
            Some(root)
        );
        Ok(())
    }

    #[test]
    fn viewport_rect_is_respected() {
        let h = {
            let mut h = Harness::with_controller(trellis::Controller::new(
                Box::new(TWidget::new("root")),
                "root",
                Rect::new(10.0, 20.0, 300.0, 200.0),
            ));
            h.tick();
            h
        };
        let root = h.tree().root();
        assert_eq!(
            h.tree().window(root).unwrap().rect(),
            Rect::new(10.0, 20.0, 300.0, 200.0)
        );
    }
}
