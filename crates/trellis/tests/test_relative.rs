//! Integration tests for relative-to attachment.

#[cfg(test)]
mod tests {
    use trellis::{
        Layout,
        error::Result,
        geom::{Rect, Vec2},
        testing::{Harness, TWidget},
    };

    /// Surface orphan warnings in test output.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[test]
    fn window_lays_out_under_its_target() -> Result<()> {
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let panel = h.add(root, TWidget::new("panel"), "panel")?;
        h.tree_mut().with_layout(panel, |l| {
            *l = Layout::free().fixed(50.0, 50.0).offset(Vec2::new(100.0, 20.0));
        });
        let tip = h.add(root, TWidget::new("tip"), "tip")?;
        h.tree_mut()
            .with_layout(tip, |l| *l = Layout::free().fixed(10.0, 10.0));
        h.tree_mut().set_relative_to(tip, Some("panel".into()));
        h.tick();

        // The tip is positioned as a logical child of the panel, not of
        // its true parent.
        assert_eq!(
            h.tree().window(tip).unwrap().rect(),
            Rect::new(100.0, 20.0, 10.0, 10.0)
        );
        // True ownership is untouched.
        assert_eq!(h.tree().window(tip).unwrap().parent(), Some(root));
        assert!(h.tree().window(panel).unwrap().children().is_empty());
        assert!(h.tree().window(root).unwrap().children().contains(&tip));
        Ok(())
    }

    #[test]
    fn relative_child_contributes_to_target_sizing() -> Result<()> {
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        // A fit-sized panel with no real children grows around its
        // logical child.
        let panel = h.add(root, TWidget::new("panel"), "panel")?;
        let tip = h.add(root, TWidget::new("tip"), "tip")?;
        h.tree_mut()
            .with_layout(tip, |l| *l = Layout::free().fixed(60.0, 40.0));
        h.tree_mut().set_relative_to(tip, Some("panel".into()));
        h.tick();

        assert_eq!(h.tree().window(panel).unwrap().rect().size, Vec2::new(60.0, 40.0));
        Ok(())
    }

    #[test]
    fn missing_target_falls_back_to_true_parent() -> Result<()> {
        init_tracing();
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let orphan = h.add(root, TWidget::new("orphan"), "orphan")?;
        let control = h.add(root, TWidget::new("control"), "control")?;
        for id in [orphan, control] {
            h.tree_mut()
                .with_layout(id, |l| *l = Layout::free().fixed(20.0, 20.0));
        }
        h.tree_mut().set_relative_to(orphan, Some("missing".into()));
        h.tick();

        // An unresolved target lays out exactly like no target at all.
        let orphan_rect = h.tree().window(orphan).unwrap().rect();
        let control_rect = h.tree().window(control).unwrap().rect();
        assert_eq!(orphan_rect, control_rect);
        Ok(())
    }

    #[test]
    fn unresolved_target_is_retried_every_pass() -> Result<()> {
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let tip = h.add(root, TWidget::new("tip"), "tip")?;
        h.tree_mut()
            .with_layout(tip, |l| *l = Layout::free().fixed(10.0, 10.0));
        h.tree_mut().set_relative_to(tip, Some("late".into()));
        h.tick();
        assert_eq!(h.tree().window(tip).unwrap().rect().pos, Vec2::ZERO);

        // Once the target attaches, resolution succeeds on the next pass.
        let late = h.add(root, TWidget::new("late"), "late")?;
        h.tree_mut().with_layout(late, |l| {
            *l = Layout::free().fixed(30.0, 30.0).offset(Vec2::new(200.0, 100.0));
        });
        h.tick();
        assert_eq!(
            h.tree().window(tip).unwrap().rect().pos,
            Vec2::new(200.0, 100.0)
        );
        Ok(())
    }

    #[test]
    fn self_reference_cycles_fall_back() -> Result<()> {
        let mut h = Harness::new(320.0, 180.0);
        let root = h.tree().root();
        let a = h.add(root, TWidget::new("a"), "a")?;
        let b = h.add(root, TWidget::new("b"), "b")?;
        for id in [a, b] {
            h.tree_mut()
                .with_layout(id, |l| *l = Layout::free().fixed(10.0, 10.0));
        }
        // a → b is honored; the reciprocal b → a would cycle and falls
        // back to the true parent.
        h.tree_mut().set_relative_to(a, Some("b".into()));
        h.tree_mut().set_relative_to(b, Some("a".into()));
        h.tick();

        let a_rect = h.tree().window(a).unwrap().rect();
        let b_rect = h.tree().window(b).unwrap().rect();
        assert_eq!(a_rect.pos, b_rect.pos);
        Ok(())
    }
}
