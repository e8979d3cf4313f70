//! Draw traversal.

use trellis_core::logging::targets;
use trellis_render::{Color, Renderer};

use super::traits::DrawContext;
use super::tree::{WidgetId, WidgetTree};

impl WidgetTree {
    /// Draw `root`'s tree.
    ///
    /// Visible widgets draw depth-first in child order, each clipped to its
    /// rectangle and masked by the product of its own and its ancestors'
    /// color masks. Modal widgets are skipped in that pass and drawn
    /// afterwards, bottom of the stack first, so they end up on top.
    pub fn draw(&self, root: WidgetId, renderer: &mut dyn Renderer) {
        let root = self.root_of(root);
        self.draw_subtree(root, Color::WHITE, renderer);

        for &modal in self.modal_stack(root) {
            if !self.is_visible_in_tree(modal) {
                continue;
            }
            let mask = self
                .ancestors(modal)
                .iter()
                .rev()
                .filter_map(|&a| self.base(a))
                .fold(Color::WHITE, |mask, base| mask.modulate(base.color_mask()));
            renderer.save();
            if let Some(parent) = self.parent(modal).and_then(|p| self.rect(p)) {
                renderer.clip_rect(parent);
            }
            self.draw_widget(modal, mask, renderer);
            renderer.restore();
            tracing::trace!(target: targets::MODAL, ?modal, "drew modal widget");
        }
    }

    fn draw_subtree(&self, id: WidgetId, parent_mask: Color, renderer: &mut dyn Renderer) {
        let Some(base) = self.base(id) else {
            return;
        };
        if base.is_hidden() || base.is_modal() {
            return;
        }
        self.draw_widget(id, parent_mask, renderer);
    }

    fn draw_widget(&self, id: WidgetId, parent_mask: Color, renderer: &mut dyn Renderer) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let base = node.widget.widget_base();
        let rect = base.screen_rect();
        let mask = parent_mask.modulate(base.color_mask());

        renderer.save();
        renderer.clip_rect(rect);
        {
            let mut ctx = DrawContext::new(&mut *renderer, rect, mask);
            node.widget.draw(&mut ctx);
        }
        for &child in self.children(id) {
            self.draw_subtree(child, mask, renderer);
        }
        renderer.restore();
    }
}
