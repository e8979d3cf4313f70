//! Modal widgets.
//!
//! Each root keeps a stack of modal widgets from its tree. While a visible
//! modal widget sits on the stack, positional input, mouseover and focus
//! clicks are confined to it and it draws above everything else.

use trellis_core::logging::targets;

use crate::error::{TreeError, TreeResult};

use super::tree::{violation, WidgetId, WidgetTree};

impl WidgetTree {
    /// The modal stack of `root`'s tree, bottom first.
    pub fn modal_stack(&self, root: WidgetId) -> &[WidgetId] {
        let root = self.root_of(root);
        self.container(root).map(|s| s.modal_stack.as_slice()).unwrap_or(&[])
    }

    /// The most recently added modal widget in `root`'s tree.
    pub fn top_modal(&self, root: WidgetId) -> Option<WidgetId> {
        self.modal_stack(root).last().copied()
    }

    /// The topmost modal widget that is visible along with all its
    /// ancestors.
    pub fn top_visible_modal(&self, root: WidgetId) -> Option<WidgetId> {
        self.modal_stack(root)
            .iter()
            .rev()
            .copied()
            .find(|&m| self.is_visible_in_tree(m))
    }

    /// Whether `id` is currently modal.
    pub fn is_modal(&self, id: WidgetId) -> bool {
        self.base(id).is_some_and(|b| b.is_modal())
    }

    /// Push `id` onto its root's modal stack and focus it.
    ///
    /// Mouseover is cleared across the tree first. Adding a widget that is
    /// already modal moves it to the top of the stack.
    pub fn add_modal_widget(&mut self, id: WidgetId) -> TreeResult<()> {
        let base = self.base(id).ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        if base.parent().is_none() {
            return Err(violation(TreeError::Detached(id)));
        }
        let was_modal = base.is_modal();
        let root = self.root_of(id);
        self.clear_mouseover(root);

        if let Some(state) = self.container_mut(root) {
            state.modal_stack.retain(|&m| m != id);
            state.modal_stack.push(id);
        }
        if !was_modal && let Some(node) = self.nodes.get_mut(id) {
            node.widget.widget_base_mut().set_modal(true);
            node.widget.handle_modal_change(true);
        }
        if self.is_visible_in_tree(id) {
            self.focus_chain(id);
        }

        let depth = self.modal_stack(root).len();
        tracing::trace!(target: targets::MODAL, ?id, depth, "pushed modal widget");
        self.modal_stack_changed.emit(depth);
        Ok(())
    }

    /// Take `id` off its root's modal stack, unfocusing it.
    pub fn remove_modal_widget(&mut self, id: WidgetId) -> TreeResult<()> {
        if !self.contains(id) {
            return Err(violation(TreeError::InvalidWidget(id)));
        }
        let root = self.root_of(id);
        if !self.modal_stack(root).contains(&id) {
            return Err(violation(TreeError::ModalNotPresent(id)));
        }

        self.drop_focus(id);
        self.drop_mouseover(id);
        if let Some(state) = self.container_mut(root) {
            state.modal_stack.retain(|&m| m != id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget.widget_base_mut().set_modal(false);
            node.widget.handle_modal_change(false);
        }

        let depth = self.modal_stack(root).len();
        tracing::trace!(target: targets::MODAL, ?id, depth, "popped modal widget");
        self.modal_stack_changed.emit(depth);
        Ok(())
    }

    /// Make `id` modal (showing it) or not.
    ///
    /// A widget that stops being modal is hidden. Clearing the flag on a
    /// widget that was never modal changes nothing.
    pub fn set_is_modal(&mut self, id: WidgetId, modal: bool) -> TreeResult<()> {
        let base = self.base(id).ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        let was_modal = base.is_modal();
        if modal {
            self.set_is_hidden(id, false)?;
            self.add_modal_widget(id)
        } else if was_modal {
            self.remove_modal_widget(id)?;
            self.set_is_hidden(id, true)
        } else {
            Ok(())
        }
    }
}
