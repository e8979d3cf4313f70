//! Keyboard focus and mouse grab.
//!
//! Focus is a chain of `focus` pointers from a root down to the deepest
//! focused widget; a widget is focused when it is on that chain. Roots are
//! always focused. Changing focus rewrites the chain top-down: at each level
//! the previously focused sibling's subtree is unfocused (deepest first)
//! before the new child is focused, so unfocus hooks always run before the
//! matching focus hooks.
//!
//! The mouse grab rides on the focus chain. `focus_has_mouse_grab` is set
//! on every container from the root down to the grabbing widget's parent;
//! the holder is the widget at the end of that run of flags.

use trellis_core::logging::targets;
use trellis_render::Point;

use crate::error::{TreeError, TreeResult};

use super::tree::{violation, WidgetId, WidgetTree};

impl WidgetTree {
    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether `id` is on its root's focus chain. Roots always are.
    pub fn is_focused(&self, id: WidgetId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if self.focused_child(parent) != Some(current) {
                return false;
            }
            current = parent;
        }
        true
    }

    /// The deepest widget on `root`'s focus chain, excluding the root.
    pub fn focused_leaf(&self, root: WidgetId) -> Option<WidgetId> {
        let mut current = self.focused_child(root)?;
        while let Some(next) = self.focused_child(current) {
            current = next;
        }
        Some(current)
    }

    /// The widget holding the mouse grab in `root`'s tree.
    pub fn mouse_grab_holder(&self, root: WidgetId) -> Option<WidgetId> {
        let mut holder = None;
        let mut current = root;
        while let Some(state) = self.container(current) {
            if !state.focus_has_mouse_grab {
                break;
            }
            let Some(next) = state.focus else {
                break;
            };
            holder = Some(next);
            current = next;
        }
        holder
    }

    /// Whether `id` holds the mouse grab.
    pub fn is_mouse_grabbed(&self, id: WidgetId) -> bool {
        self.contains(id) && self.mouse_grab_holder(self.root_of(id)) == Some(id)
    }

    /// Whether `id` could take focus right now: it accepts focus (or is
    /// modal) and neither it nor any ancestor is hidden or disabled.
    pub fn can_focus(&self, id: WidgetId) -> bool {
        let Some(base) = self.base(id) else {
            return false;
        };
        if !(base.accepts_focus() || base.is_modal()) {
            return false;
        }
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter_map(|w| self.base(w))
            .all(|b| b.is_visible() && b.is_enabled())
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Put `id` on the focus chain.
    ///
    /// Returns `Ok(false)` without changing anything if the widget cannot
    /// take focus right now (see [`can_focus`](Self::can_focus)).
    pub fn focus(&mut self, id: WidgetId) -> TreeResult<bool> {
        if !self.contains(id) {
            return Err(violation(TreeError::InvalidWidget(id)));
        }
        if !self.can_focus(id) {
            tracing::trace!(target: targets::FOCUS, ?id, "focus declined");
            return Ok(false);
        }
        self.focus_chain(id);
        Ok(true)
    }

    /// Take `id` and everything below it off the focus chain.
    ///
    /// On a root, this clears the root's whole chain.
    pub fn unfocus(&mut self, id: WidgetId) -> TreeResult<()> {
        if !self.contains(id) {
            return Err(violation(TreeError::InvalidWidget(id)));
        }
        if self.is_focused(id) {
            self.drop_focus(id);
        }
        Ok(())
    }

    /// Rewrite the focus chain to end at `id`, ignoring focus acceptance.
    pub(crate) fn focus_chain(&mut self, id: WidgetId) {
        let mut path = self.ancestors(id);
        path.reverse();
        path.push(id);

        let mut changed = false;
        for pair in path.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            let previous = self.focused_child(parent);
            if previous == Some(child) {
                continue;
            }
            if let Some(previous) = previous {
                self.unfocus_subtree(previous);
            }
            if let Some(state) = self.container_mut(parent) {
                state.focus = Some(child);
            }
            if let Some(node) = self.nodes.get_mut(child) {
                node.widget.handle_focus();
            }
            changed = true;
        }

        if changed {
            tracing::trace!(target: targets::FOCUS, ?id, "focused");
            self.emit_focus_changed(path[0]);
        }
    }

    /// Drop focus held by `id` or below it, if any.
    pub(crate) fn drop_focus(&mut self, id: WidgetId) {
        let changed = match self.parent(id) {
            Some(parent) if self.focused_child(parent) == Some(id) => {
                self.unfocus_subtree(id);
                true
            }
            Some(_) => false,
            None => match self.focused_child(id) {
                Some(child) => {
                    self.unfocus_subtree(child);
                    true
                }
                None => false,
            },
        };
        if changed {
            tracing::trace!(target: targets::FOCUS, ?id, "unfocused");
            let root = self.root_of(id);
            self.emit_focus_changed(root);
        }
    }

    /// Unfocus `id`'s subtree, deepest first. `id` must be its parent's
    /// focused child.
    pub(crate) fn unfocus_subtree(&mut self, id: WidgetId) {
        if let Some(child) = self.focused_child(id) {
            self.unfocus_subtree(child);
        }
        let Some(parent) = self.parent(id) else {
            return;
        };
        if self.focused_child(parent) != Some(id) {
            return;
        }

        if self.focus_has_mouse_grab(parent) {
            self.clear_grab_flags(id);
            if let Some(node) = self.nodes.get_mut(id) {
                node.widget.handle_mouse_grab_off();
            }
            tracing::trace!(target: targets::FOCUS, ?id, "mouse grab released by unfocus");
        }
        if let Some(state) = self.container_mut(parent) {
            state.focus = None;
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget.handle_unfocus();
        }
    }

    pub(crate) fn emit_focus_changed(&self, root: WidgetId) {
        let root = self.root_of(root);
        self.focus_changed.emit(self.focused_leaf(root));
    }

    /// Offer focus to whatever lies under `point`, topmost first.
    ///
    /// Descends into visible, enabled children containing the point before
    /// trying the widget itself. With a visible modal widget on a root's
    /// stack, only the modal's subtree is considered. Returns whether some
    /// widget took focus; if none did, focus is left as it was.
    pub fn route_focus(&mut self, id: WidgetId, point: Point) -> bool {
        let Some(base) = self.base(id) else {
            return false;
        };
        if base.is_hidden() || !base.is_enabled() {
            return false;
        }
        let is_root = base.parent().is_none();
        let accepts = base.accepts_focus() && base.contains(point);

        if is_root && let Some(modal) = self.top_visible_modal(id) {
            let inside = self.base(modal).is_some_and(|b| b.is_enabled() && b.contains(point));
            return inside && self.route_focus(modal, point);
        }

        let children: Vec<WidgetId> = self.children(id).iter().rev().copied().collect();
        for child in children {
            let hit = self
                .base(child)
                .is_some_and(|b| b.is_visible() && b.is_enabled() && b.contains(point));
            if hit && self.route_focus(child, point) {
                return true;
            }
        }

        if accepts && !is_root {
            return self.focus(id).unwrap_or(false);
        }
        false
    }

    // =========================================================================
    // Mouse grab
    // =========================================================================

    /// Give `id` the mouse grab, focusing it first.
    ///
    /// A previous holder in the same tree loses the grab. Returns `Ok(false)`
    /// if the widget cannot take focus.
    pub fn grab_mouse(&mut self, id: WidgetId) -> TreeResult<bool> {
        let base = self.base(id).ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        if base.parent().is_none() {
            return Err(violation(TreeError::Detached(id)));
        }
        if !self.can_focus(id) {
            return Ok(false);
        }
        self.focus_chain(id);

        let root = self.root_of(id);
        let previous = self.mouse_grab_holder(root);
        if previous == Some(id) {
            return Ok(true);
        }
        if let Some(previous) = previous {
            self.clear_grab_flags(previous);
            if let Some(node) = self.nodes.get_mut(previous) {
                node.widget.handle_mouse_grab_off();
            }
        }

        for ancestor in self.ancestors(id) {
            if let Some(state) = self.container_mut(ancestor) {
                state.focus_has_mouse_grab = true;
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget.handle_mouse_grab_on();
        }
        tracing::trace!(target: targets::FOCUS, ?id, ?previous, "mouse grabbed");
        Ok(true)
    }

    /// Release the mouse grab if `id` holds it. Returns whether it did.
    pub fn release_mouse(&mut self, id: WidgetId) -> TreeResult<bool> {
        if !self.contains(id) {
            return Err(violation(TreeError::InvalidWidget(id)));
        }
        if !self.is_mouse_grabbed(id) {
            return Ok(false);
        }
        self.clear_grab_flags(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget.handle_mouse_grab_off();
        }
        tracing::trace!(target: targets::FOCUS, ?id, "mouse released");
        Ok(true)
    }

    fn clear_grab_flags(&mut self, holder: WidgetId) {
        for ancestor in self.ancestors(holder) {
            if let Some(state) = self.container_mut(ancestor) {
                state.focus_has_mouse_grab = false;
            }
        }
    }
}
