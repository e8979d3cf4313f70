//! Tests for the widget tree.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use trellis_render::{Axis, Color, DrawCommand, Point, Rect, RecordingRenderer, Renderer, Size};

    use crate::error::TreeError;
    use crate::widget::{
        Alignment, Alignment2, CellPadding, ChildResizeBlocker, Event, EventContext, GridLayout,
        Key, KeyEvent, MouseButton, MouseButtonEvent, NodeKind, Panel, SizeProperties, SizeProperty,
        StackPriority, TreeCommand, Widget, WidgetBase, WidgetId, WidgetTree,
    };

    type Log = Arc<Mutex<Vec<String>>>;

    /// A widget that records every hook the tree calls on it.
    struct Probe {
        base: WidgetBase,
        log: Log,
        consume: bool,
        destroy_on_event: bool,
    }

    impl Probe {
        fn new(name: &str, log: &Log) -> Self {
            Self {
                base: WidgetBase::new(name),
                log: Arc::clone(log),
                consume: true,
                destroy_on_event: false,
            }
        }

        fn focusable(mut self) -> Self {
            self.base = self.base.with_accepts_focus(true);
            self
        }

        fn passive(mut self) -> Self {
            self.consume = false;
            self
        }

        fn sized(mut self, size: Size) -> Self {
            self.base = self.base.with_size(size);
            self
        }

        fn record(&self, what: &str) {
            self.log.lock().push(format!("{}:{what}", self.base.name()));
        }
    }

    impl Widget for Probe {
        fn widget_base(&self) -> &WidgetBase {
            &self.base
        }

        fn widget_base_mut(&mut self) -> &mut WidgetBase {
            &mut self.base
        }

        fn handle_event(&mut self, _event: &Event, ctx: &mut EventContext<'_>) -> bool {
            self.record("event");
            if self.destroy_on_event {
                ctx.destroy_self();
            }
            self.consume
        }

        fn handle_focus(&mut self) {
            self.record("focus");
        }

        fn handle_unfocus(&mut self) {
            self.record("unfocus");
        }

        fn handle_mouseover_on(&mut self) {
            self.record("mouseover_on");
        }

        fn handle_mouseover_off(&mut self) {
            self.record("mouseover_off");
        }

        fn handle_mouse_grab_on(&mut self) {
            self.record("grab_on");
        }

        fn handle_mouse_grab_off(&mut self) {
            self.record("grab_off");
        }

        fn handle_modal_change(&mut self, modal: bool) {
            self.record(if modal { "modal_on" } else { "modal_off" });
        }
    }

    fn new_log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn drain(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.lock())
    }

    /// A 200x200 free root at the origin.
    fn fixture() -> (WidgetTree, WidgetId, Log) {
        let mut tree = WidgetTree::new();
        let root = tree.insert_container(Panel::new("root").with_size(Size::new(200, 200)));
        (tree, root, new_log())
    }

    /// Attach `probe` to `parent` at `rect`, relative to the parent.
    fn place(tree: &mut WidgetTree, parent: WidgetId, probe: Probe, kind: NodeKind, rect: Rect) -> WidgetId {
        let id = tree.insert(probe.sized(rect.size), kind);
        tree.move_to(id, rect.origin).unwrap();
        tree.attach_child(parent, id).unwrap();
        id
    }

    fn click(x: i32, y: i32) -> Event {
        Event::MouseButtonDown(MouseButtonEvent::new(MouseButton::Left, Point::new(x, y)))
    }

    fn min_props(w: i32, h: i32) -> SizeProperties {
        SizeProperties::new().with_min(Size::new(w, h))
    }

    // =========================================================================
    // Structure
    // =========================================================================

    #[test]
    fn test_attach_and_detach() {
        let (mut tree, root, _log) = fixture();
        let child = tree.insert_leaf(Panel::new("child"));

        tree.attach_child(root, child).unwrap();
        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.children(root), &[child]);

        assert_eq!(
            tree.attach_child(root, child),
            Err(TreeError::AlreadyParented { child, parent: root })
        );

        tree.detach_child(root, child).unwrap();
        assert_eq!(tree.parent(child), None);
        assert!(tree.children(root).is_empty());
        assert_eq!(
            tree.detach_child(root, child),
            Err(TreeError::NotAChild { container: root, child })
        );
        assert_eq!(tree.detach(child), Err(TreeError::Detached(child)));
    }

    #[test]
    fn test_leaf_cannot_take_children() {
        let (mut tree, _root, _log) = fixture();
        let leaf = tree.insert_leaf(Panel::new("leaf"));
        let other = tree.insert_leaf(Panel::new("other"));
        assert_eq!(tree.attach_child(leaf, other), Err(TreeError::NotAContainer(leaf)));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let (mut tree, root, _log) = fixture();
        let inner = tree.add_child(root, Panel::new("inner"), NodeKind::Container).unwrap();
        tree.detach(root).unwrap_err();

        let top = tree.insert_container(Panel::new("top"));
        tree.attach_child(top, root).unwrap();
        assert_eq!(
            tree.attach_child(inner, top),
            Err(TreeError::CircularParentage { container: inner, child: top })
        );
        assert_eq!(
            tree.attach_child(top, top),
            Err(TreeError::CircularParentage { container: top, child: top })
        );
    }

    #[test]
    fn test_add_child_failure_drops_widget() {
        let (mut tree, _root, _log) = fixture();
        let leaf = tree.insert_leaf(Panel::new("leaf"));
        let before = tree.len();
        assert!(tree.add_child(leaf, Panel::new("orphan"), NodeKind::Leaf).is_err());
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn test_attach_translates_relative_position() {
        let (mut tree, root, log) = fixture();
        let group = place(
            &mut tree,
            root,
            Probe::new("group", &log),
            NodeKind::Container,
            Rect::new(50, 50, 100, 100),
        );
        let leaf = place(&mut tree, group, Probe::new("leaf", &log), NodeKind::Leaf, Rect::new(10, 10, 5, 5));
        assert_eq!(tree.rect(leaf), Some(Rect::new(60, 60, 5, 5)));

        tree.move_by(group, Point::new(5, 0)).unwrap();
        assert_eq!(tree.rect(leaf), Some(Rect::new(65, 60, 5, 5)));

        tree.detach(leaf).unwrap();
        assert_eq!(tree.rect(leaf), Some(Rect::new(10, 10, 5, 5)));
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let (mut tree, root, _log) = fixture();
        let group = tree.add_child(root, Panel::new("group"), NodeKind::Container).unwrap();
        let a = tree.add_child(group, Panel::new("a"), NodeKind::Leaf).unwrap();
        let b = tree.add_child(group, Panel::new("b"), NodeKind::Leaf).unwrap();

        tree.destroy(group).unwrap();
        assert!(!tree.contains(group));
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.destroy(a), Err(TreeError::InvalidWidget(a)));
    }

    #[test]
    fn test_destroy_discards_queued_commands() {
        let (mut tree, root, _log) = fixture();
        let a = tree.add_child(root, Panel::new("a"), NodeKind::Leaf).unwrap();
        let b = tree.add_child(root, Panel::new("b"), NodeKind::Leaf).unwrap();
        tree.queue(TreeCommand::SetHidden(a, true));
        tree.queue(TreeCommand::SetHidden(b, true));

        tree.destroy(a).unwrap();
        assert_eq!(tree.pending_commands(), 1);
        tree.flush_commands();
        assert!(tree.base(b).unwrap().is_hidden());
    }

    // =========================================================================
    // Stacking
    // =========================================================================

    #[test]
    fn test_children_grouped_by_priority_band() {
        let (mut tree, root, _log) = fixture();
        let n1 = tree.add_child(root, Panel::new("n1"), NodeKind::Leaf).unwrap();
        let t = tree
            .add_child(root, Panel::new("t").with_stack_priority(StackPriority::Top), NodeKind::Leaf)
            .unwrap();
        let b = tree
            .add_child(root, Panel::new("b").with_stack_priority(StackPriority::Bottom), NodeKind::Leaf)
            .unwrap();
        let n2 = tree.add_child(root, Panel::new("n2"), NodeKind::Leaf).unwrap();
        assert_eq!(tree.children(root), &[b, n1, n2, t]);

        tree.move_child_to_top(n1).unwrap();
        assert_eq!(tree.children(root), &[b, n2, n1, t]);
        tree.move_child_up(n1).unwrap();
        assert_eq!(tree.children(root), &[b, n2, n1, t]);
        tree.move_child_down(n1).unwrap();
        assert_eq!(tree.children(root), &[b, n1, n2, t]);
        tree.move_child_to_bottom(n2).unwrap();
        assert_eq!(tree.children(root), &[b, n2, n1, t]);

        // Raised widgets land at the bottom of their new band.
        tree.set_stack_priority(b, StackPriority::Top).unwrap();
        assert_eq!(tree.children(root), &[n2, n1, b, t]);
        // Lowered widgets land at the top of theirs.
        tree.set_stack_priority(t, StackPriority::Neutral).unwrap();
        assert_eq!(tree.children(root), &[n2, n1, t, b]);
    }

    // =========================================================================
    // Focus and mouse grab
    // =========================================================================

    #[test]
    fn test_focus_unfocuses_old_chain_deepest_first() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 50, 50));
        let group = place(&mut tree, root, Probe::new("group", &log), NodeKind::Container, Rect::new(100, 0, 100, 100));
        let inner = place(&mut tree, group, Probe::new("inner", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 10, 10));

        assert_eq!(tree.focus(inner), Ok(true));
        assert_eq!(drain(&log), ["group:focus", "inner:focus"]);
        assert!(tree.is_focused(group));
        assert_eq!(tree.focused_leaf(root), Some(inner));

        assert_eq!(tree.focus(a), Ok(true));
        assert_eq!(drain(&log), ["inner:unfocus", "group:unfocus", "a:focus"]);
        assert_eq!(tree.focused_child(group), None);
        assert!(!tree.is_focused(inner));

        // Refocusing the focused widget is a no-op.
        assert_eq!(tree.focus(a), Ok(true));
        assert!(drain(&log).is_empty());
    }

    #[test]
    fn test_focus_declined() {
        let (mut tree, root, log) = fixture();
        let plain = place(&mut tree, root, Probe::new("plain", &log), NodeKind::Leaf, Rect::new(0, 0, 10, 10));
        let hidden = place(&mut tree, root, Probe::new("hidden", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 10, 10));
        tree.set_is_hidden(hidden, true).unwrap();

        assert_eq!(tree.focus(plain), Ok(false));
        assert_eq!(tree.focus(hidden), Ok(false));
        assert_eq!(tree.focused_child(root), None);
        assert!(drain(&log).is_empty());
    }

    #[test]
    fn test_attaching_top_child_keeps_focus() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 10, 10));
        tree.focus(a).unwrap();

        let top = tree.insert_leaf(Probe::new("top", &log).focusable());
        tree.set_stack_priority(top, StackPriority::Top).unwrap();
        tree.attach_child(root, top).unwrap();

        assert_eq!(tree.focused_child(root), Some(a));
        assert_eq!(tree.children(root).last(), Some(&top));
    }

    #[test]
    fn test_hiding_and_detaching_drop_focus() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 10, 10));
        let b = place(&mut tree, root, Probe::new("b", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 10, 10));

        tree.focus(a).unwrap();
        tree.set_is_hidden(a, true).unwrap();
        assert_eq!(tree.focused_child(root), None);

        tree.focus(b).unwrap();
        tree.detach(b).unwrap();
        assert_eq!(tree.focused_child(root), None);
        assert_eq!(drain(&log), ["a:focus", "a:unfocus", "b:focus", "b:unfocus"]);
    }

    #[test]
    fn test_focus_changed_signal() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 10, 10));
        let seen: Arc<Mutex<Vec<Option<WidgetId>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tree.focus_changed.connect(move |id| sink.lock().push(*id));

        tree.focus(a).unwrap();
        tree.unfocus(a).unwrap();
        assert_eq!(*seen.lock(), vec![Some(a), None]);
    }

    #[test]
    fn test_click_focus_routing() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 50, 50));
        let b = place(&mut tree, root, Probe::new("b", &log).focusable(), NodeKind::Leaf, Rect::new(25, 25, 50, 50));

        // Overlap goes to the topmost sibling.
        assert!(tree.route_focus(root, Point::new(30, 30)));
        assert_eq!(tree.focused_child(root), Some(b));

        assert!(tree.route_focus(root, Point::new(5, 5)));
        assert_eq!(tree.focused_child(root), Some(a));

        // Nothing focusable under the point: focus stays put.
        assert!(!tree.route_focus(root, Point::new(150, 150)));
        assert_eq!(tree.focused_child(root), Some(a));
    }

    #[test]
    fn test_mouse_grab_captures_events() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 50, 50));
        let b = place(&mut tree, root, Probe::new("b", &log), NodeKind::Leaf, Rect::new(100, 0, 50, 50));

        assert_eq!(tree.grab_mouse(a), Ok(true));
        assert!(tree.is_mouse_grabbed(a));
        assert_eq!(tree.mouse_grab_holder(root), Some(a));
        assert_eq!(drain(&log), ["a:focus", "a:grab_on"]);

        // Inside b, but a holds the grab.
        assert!(tree.dispatch_event(root, &click(120, 10)));
        assert_eq!(drain(&log), ["a:event"]);

        assert_eq!(tree.release_mouse(a), Ok(true));
        assert_eq!(tree.release_mouse(a), Ok(false));
        assert!(tree.dispatch_event(root, &click(120, 10)));
        assert_eq!(drain(&log), ["a:grab_off", "b:event"]);
        assert!(tree.is_focused(a));
        assert!(tree.contains(b));
    }

    #[test]
    fn test_unhandled_grab_does_not_reach_siblings() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log).focusable().passive(), NodeKind::Leaf, Rect::new(0, 0, 50, 50));
        place(&mut tree, root, Probe::new("b", &log), NodeKind::Leaf, Rect::new(100, 0, 50, 50));

        tree.grab_mouse(a).unwrap();
        drain(&log);
        assert!(!tree.dispatch_event(root, &click(120, 10)));
        assert_eq!(drain(&log), ["a:event"]);
    }

    #[test]
    fn test_unfocus_releases_grab() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 50, 50));
        let b = place(&mut tree, root, Probe::new("b", &log).focusable(), NodeKind::Leaf, Rect::new(100, 0, 50, 50));

        tree.grab_mouse(a).unwrap();
        drain(&log);
        tree.focus(b).unwrap();
        assert_eq!(drain(&log), ["a:grab_off", "a:unfocus", "b:focus"]);
        assert!(!tree.is_mouse_grabbed(a));
        assert!(!tree.focus_has_mouse_grab(root));
    }

    #[test]
    fn test_grab_requires_parent() {
        let (mut tree, root, _log) = fixture();
        assert_eq!(tree.grab_mouse(root), Err(TreeError::Detached(root)));
    }

    // =========================================================================
    // Event routing
    // =========================================================================

    #[test]
    fn test_positional_events_bubble() {
        let (mut tree, root, log) = fixture();
        let group = place(&mut tree, root, Probe::new("group", &log), NodeKind::Container, Rect::new(0, 0, 100, 100));
        place(&mut tree, group, Probe::new("under", &log), NodeKind::Leaf, Rect::new(0, 0, 50, 50));
        place(&mut tree, group, Probe::new("over", &log).passive(), NodeKind::Leaf, Rect::new(0, 0, 50, 50));

        // The topmost child declines, its sibling below takes it.
        assert!(tree.dispatch_event(root, &click(10, 10)));
        assert_eq!(drain(&log), ["over:event", "under:event"]);

        // Outside both leaves the group handles it itself.
        assert!(tree.dispatch_event(root, &click(80, 80)));
        assert_eq!(drain(&log), ["group:event"]);

        // Outside everything only the root is asked.
        assert!(!tree.dispatch_event(root, &click(150, 150)));
        assert!(drain(&log).is_empty());
    }

    #[test]
    fn test_disabled_widgets_are_skipped() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log).focusable(), NodeKind::Leaf, Rect::new(0, 0, 50, 50));
        tree.focus(a).unwrap();
        drain(&log);

        tree.set_is_enabled(a, false).unwrap();
        assert_eq!(drain(&log), ["a:unfocus"]);
        assert!(!tree.dispatch_event(root, &click(10, 10)));
        assert!(drain(&log).is_empty());
        assert_eq!(tree.focus(a), Ok(false));
    }

    #[test]
    fn test_keyboard_follows_focus_chain() {
        let (mut tree, root, log) = fixture();
        let group = place(&mut tree, root, Probe::new("group", &log).passive(), NodeKind::Container, Rect::new(0, 0, 100, 100));
        let leaf = place(&mut tree, group, Probe::new("leaf", &log).focusable().passive(), NodeKind::Leaf, Rect::new(0, 0, 10, 10));
        place(&mut tree, root, Probe::new("other", &log), NodeKind::Leaf, Rect::new(0, 0, 10, 10));
        tree.focus(leaf).unwrap();
        drain(&log);

        let key = Event::KeyDown(KeyEvent::new(Key::Enter));
        assert!(!tree.dispatch_event(root, &key));
        assert_eq!(drain(&log), ["leaf:event", "group:event"]);
    }

    #[test]
    fn test_hooks_defer_destruction() {
        let (mut tree, root, log) = fixture();
        let mut probe = Probe::new("doomed", &log);
        probe.destroy_on_event = true;
        let doomed = place(&mut tree, root, probe, NodeKind::Leaf, Rect::new(0, 0, 50, 50));

        assert!(tree.dispatch_event(root, &click(10, 10)));
        assert!(tree.contains(doomed));
        assert_eq!(tree.pending_commands(), 1);

        tree.flush_commands();
        assert!(!tree.contains(doomed));
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_frame_reaches_every_widget() {
        struct Ticker {
            base: WidgetBase,
            ticks: u32,
        }
        impl Widget for Ticker {
            fn widget_base(&self) -> &WidgetBase {
                &self.base
            }
            fn widget_base_mut(&mut self) -> &mut WidgetBase {
                &mut self.base
            }
            fn handle_frame(&mut self, _time: crate::widget::FrameTime, _ctx: &mut EventContext<'_>) {
                self.ticks += 1;
            }
        }

        let (mut tree, root, _log) = fixture();
        let group = tree.add_child(root, Panel::new("group"), NodeKind::Container).unwrap();
        let ids: Vec<WidgetId> = (0..3)
            .map(|i| {
                let ticker = Ticker { base: WidgetBase::new(format!("t{i}")), ticks: 0 };
                tree.add_child(group, ticker, NodeKind::Leaf).unwrap()
            })
            .collect();
        tree.set_is_hidden(ids[1], true).unwrap();

        tree.process_frame(root, Default::default());
        tree.process_frame(root, Default::default());
        for id in ids {
            assert_eq!(tree.widget::<Ticker>(id).map(|t| t.ticks), Some(2));
        }
    }

    // =========================================================================
    // Mouseover
    // =========================================================================

    #[test]
    fn test_mouseover_is_exclusive() {
        let (mut tree, root, log) = fixture();
        let a = place(&mut tree, root, Probe::new("a", &log), NodeKind::Leaf, Rect::new(0, 0, 50, 50));
        let group = place(&mut tree, root, Probe::new("group", &log), NodeKind::Container, Rect::new(100, 0, 100, 100));
        let inner = place(&mut tree, group, Probe::new("inner", &log), NodeKind::Leaf, Rect::new(0, 0, 10, 10));

        tree.update_mouseover(root, Some(Point::new(10, 10))).unwrap();
        assert_eq!(tree.mouseover_widget(root), Some(a));
        assert!(tree.is_mouseover(a));

        tree.update_mouseover(root, Some(Point::new(105, 5))).unwrap();
        assert_eq!(tree.mouseover_widget(root), Some(inner));
        assert_eq!(tree.mouseover_child(root), Some(group));
        assert!(!tree.is_mouseover(a));
        assert!(!tree.is_mouseover(group));

        tree.update_mouseover(root, Some(Point::new(150, 50))).unwrap();
        assert_eq!(tree.mouseover_widget(root), Some(group));
        assert_eq!(tree.mouseover_child(group), None);

        tree.update_mouseover(root, None).unwrap();
        assert_eq!(tree.mouseover_widget(root), None);
        assert!(!tree.is_mouseover(root));
        assert_eq!(
            drain(&log),
            [
                "a:mouseover_on",
                "a:mouseover_off",
                "inner:mouseover_on",
                "inner:mouseover_off",
                "group:mouseover_on",
                "group:mouseover_off",
            ]
        );
    }

    #[test]
    fn test_mouseover_skips_refusing_and_hidden_widgets() {
        let (mut tree, root, log) = fixture();
        let under = place(&mut tree, root, Probe::new("under", &log), NodeKind::Leaf, Rect::new(0, 0, 50, 50));
        let over = place(&mut tree, root, Probe::new("over", &log), NodeKind::Leaf, Rect::new(0, 0, 50, 50));

        tree.update_mouseover(root, Some(Point::new(10, 10))).unwrap();
        assert_eq!(tree.mouseover_widget(root), Some(over));

        tree.set_is_hidden(over, true).unwrap();
        assert_eq!(tree.mouseover_widget(root), None);
        tree.update_mouseover(root, Some(Point::new(10, 10))).unwrap();
        assert_eq!(tree.mouseover_widget(root), Some(under));

        tree.set_accepts_mouseover(under, false).unwrap();
        assert_eq!(tree.mouseover_widget(root), None);
        tree.update_mouseover(root, Some(Point::new(10, 10))).unwrap();
        assert_eq!(tree.mouseover_widget(root), None);
    }

    // =========================================================================
    // Modality
    // =========================================================================

    #[test]
    fn test_modal_widget_goes_to_root_stack() {
        let (mut tree, root, log) = fixture();
        let other = place(&mut tree, root, Probe::new("other", &log), NodeKind::Leaf, Rect::new(150, 150, 50, 50));
        let dialog_host = place(&mut tree, root, Probe::new("host", &log), NodeKind::Container, Rect::new(0, 0, 100, 100));
        let dialog = place(&mut tree, dialog_host, Probe::new("dialog", &log), NodeKind::Container, Rect::new(10, 10, 50, 50));

        tree.update_mouseover(root, Some(Point::new(160, 160))).unwrap();
        assert!(tree.is_mouseover(other));
        drain(&log);

        tree.add_modal_widget(dialog).unwrap();
        assert_eq!(tree.modal_stack(root), &[dialog]);
        assert_eq!(tree.modal_stack(dialog_host), &[dialog]);
        assert!(tree.is_modal(dialog));
        assert!(!tree.is_mouseover(other));
        assert!(tree.is_focused(dialog));
        assert_eq!(
            drain(&log),
            ["other:mouseover_off", "dialog:modal_on", "host:focus", "dialog:focus"]
        );
    }

    #[test]
    fn test_modal_blocks_input_outside() {
        let (mut tree, root, log) = fixture();
        place(&mut tree, root, Probe::new("other", &log), NodeKind::Leaf, Rect::new(150, 150, 50, 50));
        let dialog = place(&mut tree, root, Probe::new("dialog", &log), NodeKind::Container, Rect::new(10, 10, 50, 50));
        tree.add_modal_widget(dialog).unwrap();
        drain(&log);

        assert!(!tree.dispatch_event(root, &click(160, 160)));
        assert!(drain(&log).is_empty());

        tree.update_mouseover(root, Some(Point::new(160, 160))).unwrap();
        assert_eq!(tree.mouseover_widget(root), None);
        assert!(!tree.route_focus(root, Point::new(160, 160)));

        assert!(tree.dispatch_event(root, &click(20, 20)));
        assert_eq!(drain(&log), ["dialog:event"]);
        tree.update_mouseover(root, Some(Point::new(20, 20))).unwrap();
        assert_eq!(tree.mouseover_widget(root), Some(dialog));
    }

    #[test]
    fn test_remove_modal_widget() {
        let (mut tree, root, log) = fixture();
        let dialog = place(&mut tree, root, Probe::new("dialog", &log), NodeKind::Leaf, Rect::new(10, 10, 50, 50));
        let plain = place(&mut tree, root, Probe::new("plain", &log), NodeKind::Leaf, Rect::new(10, 10, 50, 50));

        assert_eq!(tree.remove_modal_widget(plain), Err(TreeError::ModalNotPresent(plain)));

        tree.add_modal_widget(dialog).unwrap();
        tree.remove_modal_widget(dialog).unwrap();
        assert!(tree.modal_stack(root).is_empty());
        assert!(!tree.is_modal(dialog));
        assert_eq!(tree.focused_child(root), None);
        assert!(tree.base(dialog).unwrap().is_visible());
    }

    #[test]
    fn test_set_is_modal_toggles_visibility() {
        let (mut tree, root, log) = fixture();
        let dialog = place(&mut tree, root, Probe::new("dialog", &log), NodeKind::Leaf, Rect::new(10, 10, 50, 50));
        tree.set_is_hidden(dialog, true).unwrap();

        tree.set_is_modal(dialog, true).unwrap();
        assert!(tree.base(dialog).unwrap().is_visible());
        assert_eq!(tree.top_visible_modal(root), Some(dialog));

        tree.set_is_modal(dialog, false).unwrap();
        assert!(tree.base(dialog).unwrap().is_hidden());
        assert_eq!(tree.top_modal(root), None);
    }

    #[test]
    fn test_clearing_modal_on_plain_widget_keeps_it_visible() {
        let (mut tree, root, log) = fixture();
        let panel = place(&mut tree, root, Probe::new("panel", &log), NodeKind::Leaf, Rect::new(10, 10, 50, 50));
        drain(&log);

        tree.set_is_modal(panel, false).unwrap();
        assert!(tree.base(panel).unwrap().is_visible());
        assert!(drain(&log).is_empty());

        tree.queue(TreeCommand::SetModal(panel, false));
        tree.flush_commands();
        assert!(tree.base(panel).unwrap().is_visible());
        assert!(tree.modal_stack(root).is_empty());
    }

    #[test]
    fn test_modal_requires_parent() {
        let (mut tree, root, _log) = fixture();
        assert_eq!(tree.add_modal_widget(root), Err(TreeError::Detached(root)));
    }

    #[test]
    fn test_detach_clears_modal_subtree() {
        let (mut tree, root, log) = fixture();
        let host = place(&mut tree, root, Probe::new("host", &log), NodeKind::Container, Rect::new(0, 0, 100, 100));
        let dialog = place(&mut tree, host, Probe::new("dialog", &log), NodeKind::Leaf, Rect::new(0, 0, 10, 10));
        tree.add_modal_widget(dialog).unwrap();
        drain(&log);

        let depths: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&depths);
        tree.modal_stack_changed.connect(move |depth| sink.lock().push(*depth));

        tree.detach(host).unwrap();
        assert!(tree.modal_stack(root).is_empty());
        assert!(!tree.is_modal(dialog));
        assert_eq!(*depths.lock(), vec![0]);
        assert_eq!(drain(&log), ["dialog:unfocus", "host:unfocus", "dialog:modal_off"]);
    }

    #[test]
    fn test_hidden_modal_does_not_block() {
        let (mut tree, root, log) = fixture();
        place(&mut tree, root, Probe::new("other", &log), NodeKind::Leaf, Rect::new(150, 150, 50, 50));
        let dialog = place(&mut tree, root, Probe::new("dialog", &log), NodeKind::Leaf, Rect::new(10, 10, 50, 50));
        tree.add_modal_widget(dialog).unwrap();
        tree.set_is_hidden(dialog, true).unwrap();
        drain(&log);

        assert_eq!(tree.top_modal(root), Some(dialog));
        assert_eq!(tree.top_visible_modal(root), None);
        assert!(tree.dispatch_event(root, &click(160, 160)));
        assert_eq!(drain(&log), ["other:event"]);
    }

    // =========================================================================
    // Size negotiation
    // =========================================================================

    #[test]
    fn test_layout_bounds_follow_children() {
        let (mut tree, root, _log) = fixture();
        let grid = tree.add_child(root, Panel::new("grid"), NodeKind::Layout(GridLayout::rows(2))).unwrap();
        let a = tree
            .add_child(grid, Panel::new("a").with_size_properties(min_props(10, 10)), NodeKind::Leaf)
            .unwrap();
        let b = tree
            .add_child(grid, Panel::new("b").with_size_properties(min_props(10, 10)), NodeKind::Leaf)
            .unwrap();
        assert_eq!(tree.size(grid), Some(Size::new(20, 10)));

        tree.update_size_properties(a, |p| *p = min_props(30, 15)).unwrap();
        assert_eq!(tree.size_properties(grid).unwrap().min_size(), Size::new(40, 15));
        assert_eq!(tree.size(grid), Some(Size::new(40, 15)));
        assert_eq!(tree.rect(a), Some(Rect::new(0, 0, 30, 15)));
        assert_eq!(tree.rect(b), Some(Rect::new(30, 0, 10, 15)));

        // Minimums first, the remaining 60 split evenly.
        assert_eq!(tree.resize(grid, Size::new(100, 50)), Ok(Size::new(100, 50)));
        assert_eq!(tree.rect(a), Some(Rect::new(0, 0, 60, 50)));
        assert_eq!(tree.rect(b), Some(Rect::new(60, 0, 40, 50)));

        // Shrinking below the children's minimums is clamped.
        assert_eq!(tree.resize(grid, Size::new(5, 5)), Ok(Size::new(40, 15)));
    }

    #[test]
    fn test_layout_cells_respect_max() {
        let (mut tree, root, _log) = fixture();
        let grid = tree.add_child(root, Panel::new("grid"), NodeKind::Layout(GridLayout::rows(2))).unwrap();
        let capped = tree
            .add_child(
                grid,
                Panel::new("capped").with_size_properties(SizeProperties::new().with_max(Size::new(20, 20))),
                NodeKind::Leaf,
            )
            .unwrap();
        let free = tree.add_child(grid, Panel::new("free"), NodeKind::Leaf).unwrap();

        tree.resize(grid, Size::new(100, 50)).unwrap();
        assert_eq!(tree.rect(capped), Some(Rect::new(0, 0, 20, 20)));
        assert_eq!(tree.rect(free), Some(Rect::new(20, 0, 80, 50)));
    }

    #[test]
    fn test_unbounded_max_values_do_not_overflow() {
        let (mut tree, root, _log) = fixture();
        let grid = tree.add_child(root, Panel::new("grid"), NodeKind::Layout(GridLayout::rows(5))).unwrap();
        let cells: Vec<WidgetId> = (0..5)
            .map(|_| tree.add_child(grid, Panel::new("cell"), NodeKind::Leaf).unwrap())
            .collect();
        for &cell in &cells {
            tree.set_size_property(cell, SizeProperty::Max, Axis::X, i32::MAX).unwrap();
        }

        let cap = SizeProperties::DEFAULT_MAX_SIZE_COMPONENT;
        assert_eq!(tree.size_properties(grid).unwrap().bounded_max(Axis::X), Some(cap));

        tree.resize(grid, Size::new(i32::MAX, 50)).unwrap();
        assert_eq!(tree.size(grid), Some(Size::new(cap, 50)));
        let total: i32 = cells.iter().map(|&c| tree.rect(c).unwrap().width()).sum();
        assert_eq!(total, cap);
    }

    #[test]
    fn test_hidden_cell_releases_space() {
        let (mut tree, root, _log) = fixture();
        let grid = tree.add_child(root, Panel::new("grid"), NodeKind::Layout(GridLayout::rows(2))).unwrap();
        let a = tree.add_child(grid, Panel::new("a"), NodeKind::Leaf).unwrap();
        let b = tree.add_child(grid, Panel::new("b"), NodeKind::Leaf).unwrap();
        tree.resize(grid, Size::new(100, 40)).unwrap();
        assert_eq!(tree.rect(a), Some(Rect::new(0, 0, 50, 40)));

        tree.set_is_hidden(b, true).unwrap();
        assert_eq!(tree.rect(a), Some(Rect::new(0, 0, 100, 40)));
        tree.set_is_hidden(b, false).unwrap();
        assert_eq!(tree.rect(a), Some(Rect::new(0, 0, 50, 40)));
        assert_eq!(tree.rect(b), Some(Rect::new(50, 0, 50, 40)));
    }

    #[test]
    fn test_layout_reconfiguration() {
        let (mut tree, root, _log) = fixture();
        let grid = tree.add_child(root, Panel::new("grid"), NodeKind::Layout(GridLayout::rows(2))).unwrap();
        let ids: Vec<WidgetId> = (0..4)
            .map(|i| tree.add_child(grid, Panel::new(format!("c{i}")), NodeKind::Leaf).unwrap())
            .collect();
        tree.resize(grid, Size::new(80, 80)).unwrap();
        assert_eq!(tree.rect(ids[1]), Some(Rect::new(40, 0, 40, 40)));

        tree.set_layout_major_count(grid, 4).unwrap();
        assert_eq!(tree.rect(ids[1]), Some(Rect::new(20, 0, 20, 80)));

        tree.set_layout_frame_margins(grid, Size::new(4, 4)).unwrap();
        assert_eq!(tree.rect(ids[0]), Some(Rect::new(4, 4, 18, 72)));
        assert_eq!(tree.layout(grid).map(|g| g.major_count()), Some(4));

        let leaf = ids[0];
        assert_eq!(tree.set_layout_major_count(leaf, 2), Err(TreeError::NotALayout(leaf)));
    }

    #[test]
    fn test_main_widget_mirrors_size() {
        let (mut tree, root, _log) = fixture();
        let frame = tree.add_child(root, Panel::new("frame"), NodeKind::Container).unwrap();
        let body = tree
            .add_child(frame, Panel::new("body").with_size_properties(min_props(30, 30)), NodeKind::Leaf)
            .unwrap();

        tree.set_main_widget(frame, Some(body)).unwrap();
        assert_eq!(tree.main_widget(frame), Some(body));
        assert_eq!(tree.size(frame), Some(Size::new(30, 30)));
        assert_eq!(tree.size_properties(frame).unwrap().min_size(), Size::new(30, 30));

        tree.resize(frame, Size::new(80, 60)).unwrap();
        assert_eq!(tree.size(body), Some(Size::new(80, 60)));

        tree.resize(body, Size::new(50, 50)).unwrap();
        assert_eq!(tree.size(frame), Some(Size::new(50, 50)));

        tree.detach(body).unwrap();
        assert_eq!(tree.main_widget(frame), None);

        let grid = tree.insert_layout(Panel::new("grid"), GridLayout::rows(1));
        let cell = tree.add_child(grid, Panel::new("cell"), NodeKind::Leaf).unwrap();
        assert_eq!(tree.set_main_widget(grid, Some(cell)), Err(TreeError::ArrangedContainer(grid)));
        assert_eq!(
            tree.set_main_widget(frame, Some(cell)),
            Err(TreeError::NotAChild { container: frame, child: cell })
        );
    }

    #[test]
    fn test_cell_padding_positions_child() {
        let (mut tree, root, _log) = fixture();
        let cell = tree
            .add_child(
                root,
                Panel::new("cell").with_size_properties(min_props(50, 50)),
                NodeKind::CellPadding(CellPadding::new(Size::new(5, 5)).with_alignment(Alignment2 {
                    x: Alignment::End,
                    y: Alignment::Start,
                })),
            )
            .unwrap();
        let child = tree
            .add_child(
                cell,
                Panel::new("child").with_size_properties(SizeProperties::new().with_max(Size::new(10, 10))),
                NodeKind::Leaf,
            )
            .unwrap();

        assert_eq!(tree.size(cell), Some(Size::new(50, 50)));
        assert_eq!(tree.rect(child), Some(Rect::new(35, 5, 10, 10)));

        assert_eq!(
            tree.add_child(cell, Panel::new("second"), NodeKind::Leaf),
            Err(TreeError::CellOccupied(cell))
        );

        tree.set_cell_alignment(cell, Alignment2::splat(Alignment::Center)).unwrap();
        assert_eq!(tree.rect(child), Some(Rect::new(20, 20, 10, 10)));
    }

    #[test]
    fn test_cell_padding_grows_with_child() {
        let (mut tree, root, _log) = fixture();
        let cell = tree
            .add_child(root, Panel::new("cell"), NodeKind::CellPadding(CellPadding::new(Size::new(4, 2))))
            .unwrap();
        assert_eq!(tree.size(cell), Some(Size::new(8, 4)));

        let child = tree
            .add_child(cell, Panel::new("child").with_size_properties(min_props(10, 10)), NodeKind::Leaf)
            .unwrap();
        assert_eq!(tree.size(cell), Some(Size::new(18, 14)));
        assert_eq!(tree.rect(child), Some(Rect::new(4, 2, 10, 10)));
    }

    #[test]
    fn test_size_property_setters() {
        let (mut tree, root, _log) = fixture();
        let w = tree.add_child(root, Panel::new("w"), NodeKind::Leaf).unwrap();

        tree.set_size_property(w, SizeProperty::Min, Axis::X, 40)
            .unwrap();
        assert_eq!(tree.size(w), Some(Size::new(40, 0)));

        tree.set_size_property_vector(w, SizeProperty::Max, Size::new(20, 20))
            .unwrap();
        // The max wins the conflict it was assigned into.
        let props = tree.preferred_size_properties(w).unwrap();
        assert_eq!(props.min_size().width, 20);
        assert_eq!(tree.size(w), Some(Size::new(20, 0)));

        tree.set_ratio_basis(200);
        tree.set_size_property_ratios(w, SizeProperty::Max, [0.5, 0.25]).unwrap();
        assert_eq!(tree.size_properties(w).unwrap().max_size(), Size::new(100, 50));

        tree.set_size_property_enabled_vector(w, SizeProperty::Max, [false, false])
            .unwrap();
        assert_eq!(tree.size_properties(w).unwrap().max_enabled(), [false, false]);
    }

    // =========================================================================
    // Resize blocking
    // =========================================================================

    #[test]
    fn test_blocker_consolidates_relayout() {
        let (mut tree, root, _log) = fixture();
        let grid = tree.add_child(root, Panel::new("grid"), NodeKind::Layout(GridLayout::rows(3))).unwrap();
        tree.resize(grid, Size::new(90, 30)).unwrap();
        let passes = tree.layout(grid).unwrap().allocation_passes();

        {
            let mut blocker = ChildResizeBlocker::new(&mut tree, grid).unwrap();
            for i in 0..5 {
                blocker
                    .add_child(grid, Panel::new(format!("c{i}")).with_size_properties(min_props(5, 5)), NodeKind::Leaf)
                    .unwrap();
            }
            assert_eq!(blocker.layout(grid).unwrap().allocation_passes(), passes);
        }
        assert_eq!(tree.layout(grid).unwrap().allocation_passes(), passes + 1);
        assert!(!tree.is_child_resize_blocked(grid));
    }

    #[test]
    fn test_blocker_nests() {
        let (mut tree, root, _log) = fixture();
        let grid = tree.add_child(root, Panel::new("grid"), NodeKind::Layout(GridLayout::rows(1))).unwrap();
        tree.block_child_resize(grid).unwrap();
        tree.block_child_resize(grid).unwrap();
        tree.add_child(grid, Panel::new("c").with_size_properties(min_props(5, 5)), NodeKind::Leaf)
            .unwrap();

        tree.unblock_child_resize(grid).unwrap();
        assert!(tree.is_child_resize_blocked(grid));
        assert_eq!(tree.size(grid), Some(Size::ZERO));

        tree.unblock_child_resize(grid).unwrap();
        assert_eq!(tree.size(grid), Some(Size::new(5, 5)));

        // Unbalanced unblocks are tolerated.
        tree.unblock_child_resize(grid).unwrap();
        let leaf = tree.children(grid)[0];
        assert_eq!(tree.block_child_resize(leaf), Err(TreeError::NotAContainer(leaf)));
    }

    #[test]
    fn test_with_child_resize_blocked() {
        let (mut tree, root, _log) = fixture();
        let grid = tree.add_child(root, Panel::new("grid"), NodeKind::Layout(GridLayout::rows(2))).unwrap();
        let count = tree
            .with_child_resize_blocked(grid, |tree| {
                for i in 0..4 {
                    tree.add_child(grid, Panel::new(format!("c{i}")), NodeKind::Leaf).unwrap();
                }
                tree.children(grid).len()
            })
            .unwrap();
        assert_eq!(count, 4);
        assert!(!tree.is_child_resize_blocked(grid));
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    #[test]
    fn test_draw_order_and_masks() {
        let (mut tree, root, _log) = fixture();
        let half = Color::new(0.5, 0.5, 0.5, 1.0);
        let group = tree
            .add_child(
                root,
                Panel::new("group")
                    .with_size(Size::new(100, 100))
                    .with_color_mask(half)
                    .with_background(trellis_render::Background::Solid(Color::WHITE)),
                NodeKind::Container,
            )
            .unwrap();
        tree.add_child(
            group,
            Panel::new("leaf")
                .with_size(Size::new(10, 10))
                .with_background(trellis_render::Background::Solid(Color::WHITE)),
            NodeKind::Leaf,
        )
        .unwrap();
        let dialog = tree
            .add_child(
                root,
                Panel::new("dialog")
                    .with_size(Size::new(20, 20))
                    .with_stack_priority(StackPriority::Bottom)
                    .with_background(trellis_render::Background::Solid(Color::RED)),
                NodeKind::Leaf,
            )
            .unwrap();
        tree.add_modal_widget(dialog).unwrap();

        let mut renderer = RecordingRenderer::new();
        renderer.begin_frame(Color::BLACK, Size::new(200, 200));
        tree.draw(root, &mut renderer);
        renderer.end_frame();

        let fills: Vec<(Rect, Color)> = renderer
            .commands()
            .iter()
            .filter_map(|c| match *c {
                DrawCommand::FillRect { rect, color } => Some((rect, color)),
                _ => None,
            })
            .collect();
        assert_eq!(
            fills,
            vec![
                (Rect::new(0, 0, 100, 100), half),
                (Rect::new(0, 0, 10, 10), half),
                (Rect::new(0, 0, 20, 20), Color::RED),
            ]
        );
    }

    #[test]
    fn test_hidden_widgets_are_not_drawn() {
        let (mut tree, root, _log) = fixture();
        let a = tree
            .add_child(
                root,
                Panel::new("a")
                    .with_size(Size::new(10, 10))
                    .with_background(trellis_render::Background::Solid(Color::RED)),
                NodeKind::Leaf,
            )
            .unwrap();
        tree.set_is_hidden(a, true).unwrap();

        let mut renderer = RecordingRenderer::new();
        renderer.begin_frame(Color::BLACK, Size::new(200, 200));
        tree.draw(root, &mut renderer);
        assert!(renderer.filled_rects().is_empty());
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[test]
    fn test_downcast_and_debug_output() {
        let (mut tree, root, log) = fixture();
        let probe = place(&mut tree, root, Probe::new("probe", &log), NodeKind::Leaf, Rect::new(1, 2, 3, 4));
        assert!(tree.widget::<Probe>(probe).is_some());
        assert!(tree.widget::<Panel>(probe).is_none());
        tree.widget_mut::<Probe>(probe).unwrap().consume = false;
        assert!(!tree.dispatch_event(root, &click(2, 3)));

        let text = trellis_core::TreeFormatter::with_options(trellis_core::TreeFormatOptions::detailed())
            .format_subtree(&tree, root);
        assert!(text.contains("probe"));
        assert!(text.contains("3x4@1,2"));
        assert!(text.contains("(Probe)"));
    }
}
