//! Mouseover tracking.
//!
//! Like focus, mouseover is a chain of per-container pointers
//! (`mouseover_focus`) from a root down to the hovered widget. Only the
//! widget at the end of the chain has its `is_mouseover` flag set, so at
//! most one widget per tree is hovered. Roots never hold mouseover
//! themselves.

use trellis_core::logging::targets;
use trellis_render::Point;

use crate::error::{TreeError, TreeResult};

use super::tree::{violation, WidgetId, WidgetTree};

impl WidgetTree {
    /// The hovered widget in `root`'s tree.
    pub fn mouseover_widget(&self, root: WidgetId) -> Option<WidgetId> {
        self.mouseover_chain(root).last().copied()
    }

    /// Whether `id` is the hovered widget.
    pub fn is_mouseover(&self, id: WidgetId) -> bool {
        self.base(id).is_some_and(|b| b.is_mouseover())
    }

    /// Recompute the mouseover chain of `root`'s tree for a pointer at
    /// `pointer`, or clear it when the pointer has left.
    ///
    /// The deepest visible, enabled widget that accepts mouseover and lies
    /// under the pointer becomes hovered, topmost sibling first. A visible
    /// modal widget confines the search to its subtree.
    pub fn update_mouseover(&mut self, root: WidgetId, pointer: Option<Point>) -> TreeResult<()> {
        if !self.contains(root) {
            return Err(violation(TreeError::InvalidWidget(root)));
        }
        let root = self.root_of(root);
        let path = match pointer {
            Some(point) => self.mouseover_path(root, point),
            None => Vec::new(),
        };
        self.apply_mouseover(root, path);
        Ok(())
    }

    /// Clear the mouseover chain of `root`'s tree.
    pub fn clear_mouseover(&mut self, root: WidgetId) {
        let root = self.root_of(root);
        self.apply_mouseover(root, Vec::new());
    }

    /// Clear mouseover if `id` is on its tree's chain.
    pub(crate) fn drop_mouseover(&mut self, id: WidgetId) {
        let root = self.root_of(id);
        let chain = self.mouseover_chain(root);
        if chain.is_empty() {
            return;
        }
        if id == root || chain.contains(&id) {
            self.apply_mouseover(root, Vec::new());
        }
    }

    /// The current chain below `root`, outermost first.
    fn mouseover_chain(&self, root: WidgetId) -> Vec<WidgetId> {
        let mut chain = Vec::new();
        let mut current = root;
        while let Some(next) = self.mouseover_child(current) {
            chain.push(next);
            current = next;
        }
        chain
    }

    fn hoverable(&self, id: WidgetId, point: Point) -> bool {
        self.base(id).is_some_and(|b| {
            b.is_visible() && b.is_enabled() && b.accepts_mouseover() && b.contains(point)
        })
    }

    /// The chain a pointer at `point` should produce, outermost first.
    fn mouseover_path(&self, root: WidgetId, point: Point) -> Vec<WidgetId> {
        let mut path = Vec::new();
        let mut current = root;

        if let Some(modal) = self.top_visible_modal(root) {
            if !self.hoverable(modal, point) {
                return path;
            }
            let mut lead = self.ancestors(modal);
            lead.pop();
            lead.reverse();
            path.extend(lead);
            path.push(modal);
            current = modal;
        }

        loop {
            let next = self
                .children(current)
                .iter()
                .rev()
                .copied()
                .find(|&child| self.hoverable(child, point));
            match next {
                Some(child) => {
                    path.push(child);
                    current = child;
                }
                None => break,
            }
        }
        path
    }

    fn apply_mouseover(&mut self, root: WidgetId, path: Vec<WidgetId>) {
        let old = self.mouseover_chain(root);
        if old == path {
            return;
        }
        let old_leaf = old.last().copied();
        let new_leaf = path.last().copied();

        if let Some(leaf) = old_leaf
            && old_leaf != new_leaf
            && let Some(node) = self.nodes.get_mut(leaf)
        {
            node.widget.widget_base_mut().set_mouseover(false);
            node.widget.handle_mouseover_off();
        }

        // Unlink the old chain from the bottom up, then link the new one
        // from the top down.
        for &widget in old.iter().rev() {
            if let Some(parent) = self.parent(widget)
                && let Some(state) = self.container_mut(parent)
                && state.mouseover_focus == Some(widget)
            {
                state.mouseover_focus = None;
            }
        }
        let mut parent = root;
        for &widget in &path {
            if let Some(state) = self.container_mut(parent) {
                state.mouseover_focus = Some(widget);
            }
            parent = widget;
        }

        if let Some(leaf) = new_leaf
            && old_leaf != new_leaf
            && let Some(node) = self.nodes.get_mut(leaf)
        {
            node.widget.widget_base_mut().set_mouseover(true);
            node.widget.handle_mouseover_on();
        }

        if old_leaf != new_leaf {
            tracing::trace!(target: targets::MOUSEOVER, from = ?old_leaf, to = ?new_leaf, "mouseover moved");
            self.mouseover_changed.emit(new_leaf);
        }
    }
}
