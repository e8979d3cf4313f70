//! Event routing and the frame tick.
//!
//! Positional events descend from a root to the topmost widget under the
//! pointer and bubble back up until some widget consumes them. Keyboard
//! events follow the focus chain instead, deepest widget first. A widget
//! holding the mouse grab captures positional events wherever they land.
//!
//! Hooks only get an [`EventContext`], never the tree, so structural changes
//! they request are queued and applied by [`WidgetTree::flush_commands`]
//! after the traversal.

use trellis_core::logging::targets;
use trellis_render::Point;

use super::context::EventContext;
use super::events::{Event, FrameTime};
use super::tree::{WidgetId, WidgetTree};

impl WidgetTree {
    /// Route `event` through `root`'s tree. Returns whether a widget
    /// consumed it.
    ///
    /// Commands queued by hooks stay pending until
    /// [`flush_commands`](Self::flush_commands).
    pub fn dispatch_event(&mut self, root: WidgetId, event: &Event) -> bool {
        if !self.contains(root) {
            return false;
        }
        let handled = match event.position() {
            Some(point) => self.route_positional(root, event, point),
            None => self.route_keyboard(root, event),
        };
        tracing::trace!(target: targets::EVENT, ?event, handled, "dispatched event");
        handled
    }

    /// Run every widget's frame hook in `root`'s subtree, parents first.
    pub fn process_frame(&mut self, root: WidgetId, time: FrameTime) {
        for id in self.subtree(root) {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            let rect = node.widget.widget_base().screen_rect();
            let mut ctx = EventContext::new(id, rect, &mut self.commands);
            node.widget.handle_frame(time, &mut ctx);
        }
    }

    fn deliver(&mut self, id: WidgetId, event: &Event) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let rect = node.widget.widget_base().screen_rect();
        let mut ctx = EventContext::new(id, rect, &mut self.commands);
        node.widget.handle_event(event, &mut ctx)
    }

    fn route_positional(&mut self, id: WidgetId, event: &Event, point: Point) -> bool {
        let Some(base) = self.base(id) else {
            return false;
        };
        if base.is_hidden() || !base.is_enabled() {
            return false;
        }
        let is_root = base.parent().is_none();
        if !self.is_container(id) {
            return self.deliver(id, event);
        }

        // Capture: the grab holder sees the event wherever it is, and
        // nothing beside the chain down to it gets a look.
        if self.focus_has_mouse_grab(id)
            && let Some(grabbed) = self.focused_child(id)
        {
            if self.route_positional(grabbed, event, point) {
                return true;
            }
            return self.deliver(id, event);
        }

        if is_root && let Some(modal) = self.top_visible_modal(id) {
            let inside = self.base(modal).is_some_and(|b| b.contains(point));
            if !inside {
                tracing::trace!(target: targets::EVENT, ?modal, "event blocked by modal widget");
                return false;
            }
            return self.route_positional(modal, event, point);
        }

        let children: Vec<WidgetId> = self.children(id).iter().rev().copied().collect();
        for child in children {
            let hit = self
                .base(child)
                .is_some_and(|b| b.is_visible() && b.is_enabled() && b.contains(point));
            if hit && self.route_positional(child, event, point) {
                return true;
            }
        }
        self.deliver(id, event)
    }

    fn route_keyboard(&mut self, id: WidgetId, event: &Event) -> bool {
        let Some(base) = self.base(id) else {
            return false;
        };
        if base.is_hidden() || !base.is_enabled() {
            return false;
        }
        if let Some(child) = self.focused_child(id)
            && self.route_keyboard(child, event)
        {
            return true;
        }
        self.deliver(id, event)
    }
}
