//! Size negotiation.
//!
//! Sizes flow in two directions. Requests flow down: `resize` clamps the
//! requested size against the widget's effective [`SizeProperties`] and the
//! container then arranges its children inside the result. Constraints flow
//! up: when a child's bounds or size change, its container recomputes its
//! own effective bounds from its contents and, if anything changed, tells
//! its own parent in turn.
//!
//! A container is *arranged by* a child when the child is its main widget,
//! or when the container is a grid or cell-padding container. Only those
//! containers react to a child's changes; a free container leaves children
//! alone.

use trellis_core::logging::targets;
use trellis_render::{Axis, Point, Rect, ScreenCoord, Size};

use crate::error::{TreeError, TreeResult};

use super::layout::{Alignment2, CellInfo, CellPadding, GridLayout, MajorDirection};
use super::size_properties::{SizeProperties, SizeProperty};
use super::tree::{violation, Arrangement, WidgetId, WidgetTree};

impl WidgetTree {
    // =========================================================================
    // Resize and position
    // =========================================================================

    /// Request a new size for `id` and return the size it actually got.
    ///
    /// The request is clamped to the widget's effective bounds, minimum
    /// first, then maximum. If the size changed, children are rearranged
    /// and the parent is notified. A parent that arranges this widget may
    /// override the result.
    pub fn resize(&mut self, id: WidgetId, size: Size) -> TreeResult<Size> {
        if !self.contains(id) {
            return Err(violation(TreeError::InvalidWidget(id)));
        }
        self.resize_internal(id, size, true, false);
        Ok(self.size(id).unwrap_or_default())
    }

    /// Move `id` and its subtree so its top-left corner is at `position`.
    pub fn move_to(&mut self, id: WidgetId, position: Point) -> TreeResult<()> {
        let current = self
            .base(id)
            .ok_or_else(|| violation(TreeError::InvalidWidget(id)))?
            .position();
        self.translate_subtree(id, position - current);
        Ok(())
    }

    /// Move `id` and its subtree by `delta`.
    pub fn move_by(&mut self, id: WidgetId, delta: Point) -> TreeResult<()> {
        if !self.contains(id) {
            return Err(violation(TreeError::InvalidWidget(id)));
        }
        self.translate_subtree(id, delta);
        Ok(())
    }

    /// Clamp and apply a new size.
    ///
    /// With `notify`, a size change is reported to the parent. With
    /// `force_arrange`, children are rearranged even when the size is
    /// unchanged.
    pub(crate) fn resize_internal(
        &mut self,
        id: WidgetId,
        requested: Size,
        notify: bool,
        force_arrange: bool,
    ) -> Option<Size> {
        let node = self.nodes.get_mut(id)?;
        let base = node.widget.widget_base_mut();
        let old = base.size();
        let new = base.size_properties().clamp(requested);
        let parent = base.parent();

        if new != old {
            base.set_screen_rect(Rect::from_origin_size(base.position(), new));
            node.widget.handle_resize(old, new);
            tracing::trace!(target: targets::SIZE, ?id, ?old, ?new, "resized");

            self.arrange_children(id);
            if notify && let Some(parent) = parent {
                self.child_size_properties_changed(parent, id);
            }
        } else if force_arrange {
            self.arrange_children(id);
        }
        Some(new)
    }

    pub(crate) fn translate_subtree(&mut self, id: WidgetId, delta: Point) {
        if delta == Point::ZERO {
            return;
        }
        for widget in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(widget) {
                let base = node.widget.widget_base_mut();
                let old = base.screen_rect();
                base.set_screen_rect(old.offset(delta));
                node.widget.handle_reposition(old.origin, old.origin + delta);
            }
        }
    }

    /// Move and resize a child on its container's behalf.
    fn place(&mut self, id: WidgetId, rect: Rect) {
        let Some(current) = self.base(id).map(|b| b.position()) else {
            return;
        };
        self.translate_subtree(id, rect.origin - current);
        self.resize_internal(id, rect.size, false, false);
    }

    fn arrange_children(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let Some(state) = node.container.as_ref() else {
            return;
        };
        let rect = node.widget.widget_base().screen_rect();

        if let Some(main) = state.main_widget {
            self.place(main, rect);
            return;
        }

        match &node.arrangement {
            Arrangement::Free => {}
            Arrangement::Grid(_) => {
                let children = state.children.clone();
                let cells = self.cell_infos(&children);
                let Some(Arrangement::Grid(grid)) = self.nodes.get_mut(id).map(|n| &mut n.arrangement) else {
                    return;
                };
                let targets = grid.allocate(rect, &cells);
                for (child, target) in children.into_iter().zip(targets) {
                    if let Some(target) = target {
                        self.place(child, target);
                    }
                }
            }
            Arrangement::Padded(cell) => {
                let cell = *cell;
                let Some(&child) = state.children.first() else {
                    return;
                };
                if self.base(child).is_none_or(|b| b.is_hidden()) {
                    return;
                }
                let inner = cell.inner_rect(rect);
                let size = self
                    .resize_internal(child, inner.size, false, false)
                    .unwrap_or_default();
                let origin = cell.align(inner, size);
                let current = self.base(child).map(|b| b.position()).unwrap_or_default();
                self.translate_subtree(child, origin - current);
            }
        }
    }

    fn cell_infos(&self, children: &[WidgetId]) -> Vec<CellInfo> {
        children
            .iter()
            .filter_map(|&c| self.base(c))
            .map(|base| CellInfo {
                size_properties: *base.size_properties(),
                hidden: base.is_hidden(),
            })
            .collect()
    }

    // =========================================================================
    // Effective size properties
    // =========================================================================

    /// The bounds a container's contents impose, if it is arranged by them.
    fn content_size_properties(&mut self, id: WidgetId) -> Option<SizeProperties> {
        let node = self.nodes.get(id)?;
        let state = node.container.as_ref()?;
        if let Some(main) = state.main_widget {
            return self.size_properties(main);
        }

        match &node.arrangement {
            Arrangement::Free => None,
            Arrangement::Grid(_) => {
                let children = state.children.clone();
                let cells = self.cell_infos(&children);
                match &mut self.nodes.get_mut(id)?.arrangement {
                    Arrangement::Grid(grid) => Some(grid.content_size_properties(&cells)),
                    _ => None,
                }
            }
            Arrangement::Padded(cell) => {
                let child = state
                    .children
                    .first()
                    .and_then(|&c| self.base(c))
                    .filter(|b| b.is_visible())
                    .map(|b| *b.size_properties());
                Some(cell.content_size_properties(child.as_ref()))
            }
        }
    }

    /// Recompute the effective bounds of `id`. Returns whether they changed.
    pub(crate) fn refresh_size_properties(&mut self, id: WidgetId) -> bool {
        let content = self.content_size_properties(id);
        let Some(base) = self.base_mut(id) else {
            return false;
        };
        let preferred = *base.preferred_size_properties();
        let effective = match content {
            Some(content) => SizeProperties::combined(&content, &preferred),
            None => preferred,
        };
        let changed = effective != *base.size_properties();
        base.set_size_properties(effective);
        changed
    }

    /// Whether `container` positions or sizes itself after `child`.
    pub(crate) fn arranges(&self, container: WidgetId, child: WidgetId) -> bool {
        let Some(node) = self.nodes.get(container) else {
            return false;
        };
        let Some(state) = node.container.as_ref() else {
            return false;
        };
        state.main_widget == Some(child)
            || matches!(node.arrangement, Arrangement::Grid(_) | Arrangement::Padded(_))
    }

    /// A child's bounds, size or visibility changed.
    pub(crate) fn child_size_properties_changed(&mut self, container: WidgetId, child: WidgetId) {
        if self.arranges(container, child) {
            self.contents_changed(container);
        }
    }

    /// Recompute a container's bounds from its contents, re-clamp its size,
    /// rearrange its children and tell its parent if anything changed.
    ///
    /// While child resizes are blocked this only records that it happened.
    pub(crate) fn contents_changed(&mut self, container: WidgetId) {
        let Some(node) = self.nodes.get_mut(container) else {
            return;
        };
        if let Arrangement::Grid(grid) = &mut node.arrangement {
            grid.invalidate();
        }
        let Some(state) = node.container.as_mut() else {
            return;
        };
        if state.child_resize_blocked > 0 {
            state.child_resize_was_blocked = true;
            tracing::trace!(target: targets::SIZE, ?container, "child resize blocked");
            return;
        }
        let main = state.main_widget;

        let old_size = self.size(container).unwrap_or_default();
        let props_changed = self.refresh_size_properties(container);
        let target = main.and_then(|m| self.size(m)).unwrap_or(old_size);
        let new_size = self
            .resize_internal(container, target, false, true)
            .unwrap_or(old_size);

        if (props_changed || new_size != old_size)
            && let Some(parent) = self.parent(container)
        {
            self.child_size_properties_changed(parent, container);
        }
    }

    /// The preferred bounds of `id` changed.
    fn preferred_changed(&mut self, id: WidgetId) {
        let old_size = self.size(id).unwrap_or_default();
        let props_changed = self.refresh_size_properties(id);
        let new_size = self
            .resize_internal(id, old_size, false, false)
            .unwrap_or(old_size);
        tracing::trace!(
            target: targets::SIZE,
            ?id,
            props = ?self.size_properties(id),
            "size properties changed"
        );
        if (props_changed || new_size != old_size)
            && let Some(parent) = self.parent(id)
        {
            self.child_size_properties_changed(parent, id);
        }
    }

    // =========================================================================
    // Preferred size properties
    // =========================================================================

    /// Change several preferred bounds of `id` and renegotiate once.
    ///
    /// ```
    /// use trellis::prelude::*;
    ///
    /// let mut tree = WidgetTree::new();
    /// let id = tree.insert_leaf(Panel::new("w"));
    /// tree.update_size_properties(id, |props| {
    ///     *props = props.with_min(Size::new(10, 10)).with_max(Size::new(40, 20));
    /// })?;
    /// assert_eq!(tree.resize(id, Size::new(100, 0))?, Size::new(40, 10));
    /// # Ok::<(), trellis::TreeError>(())
    /// ```
    pub fn update_size_properties(
        &mut self,
        id: WidgetId,
        update: impl FnOnce(&mut SizeProperties),
    ) -> TreeResult<()> {
        let base = self
            .base_mut(id)
            .ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        update(base.preferred_size_properties_mut());
        self.preferred_changed(id);
        Ok(())
    }

    /// Set and enable one preferred bound.
    pub fn set_size_property(
        &mut self,
        id: WidgetId,
        property: SizeProperty,
        axis: Axis,
        value: ScreenCoord,
    ) -> TreeResult<()> {
        self.update_size_properties(id, |props| {
            props.set_enabled(property, axis, true);
            props.set(property, axis, value);
        })
    }

    /// Set and enable one preferred bound on both axes.
    pub fn set_size_property_vector(
        &mut self,
        id: WidgetId,
        property: SizeProperty,
        value: Size,
    ) -> TreeResult<()> {
        self.update_size_properties(id, |props| {
            for axis in Axis::ALL {
                props.set_enabled(property, axis, true);
                props.set(property, axis, value[axis]);
            }
        })
    }

    /// Enable or disable one preferred bound, keeping its value.
    pub fn set_size_property_enabled(
        &mut self,
        id: WidgetId,
        property: SizeProperty,
        axis: Axis,
        enabled: bool,
    ) -> TreeResult<()> {
        self.update_size_properties(id, |props| props.set_enabled(property, axis, enabled))
    }

    /// Enable or disable one preferred bound on both axes, `[x, y]`.
    pub fn set_size_property_enabled_vector(
        &mut self,
        id: WidgetId,
        property: SizeProperty,
        enabled: [bool; 2],
    ) -> TreeResult<()> {
        self.update_size_properties(id, |props| {
            for axis in Axis::ALL {
                props.set_enabled(property, axis, enabled[axis.index()]);
            }
        })
    }

    /// Set and enable one preferred bound as a fraction of the ratio basis.
    pub fn set_size_property_ratio(
        &mut self,
        id: WidgetId,
        property: SizeProperty,
        axis: Axis,
        ratio: f32,
    ) -> TreeResult<()> {
        let value = self.ratio_to_coord(ratio);
        self.set_size_property(id, property, axis, value)
    }

    /// Set and enable one preferred bound on both axes as fractions of the
    /// ratio basis, `[x, y]`.
    pub fn set_size_property_ratios(
        &mut self,
        id: WidgetId,
        property: SizeProperty,
        ratios: [f32; 2],
    ) -> TreeResult<()> {
        let value = Size::new(self.ratio_to_coord(ratios[0]), self.ratio_to_coord(ratios[1]));
        self.set_size_property_vector(id, property, value)
    }

    fn ratio_to_coord(&self, ratio: f32) -> ScreenCoord {
        (self.ratio_basis() as f32 * ratio).round() as ScreenCoord
    }

    // =========================================================================
    // Main widget
    // =========================================================================

    /// Make `child` the widget whose size `container` mirrors, or clear it.
    ///
    /// The container's bounds become the child's bounds combined with the
    /// container's preferred bounds, and the two are kept the same size.
    pub fn set_main_widget(&mut self, container: WidgetId, child: Option<WidgetId>) -> TreeResult<()> {
        let node = self
            .nodes
            .get(container)
            .ok_or_else(|| violation(TreeError::InvalidWidget(container)))?;
        let state = node
            .container
            .as_ref()
            .ok_or_else(|| violation(TreeError::NotAContainer(container)))?;
        if !matches!(node.arrangement, Arrangement::Free) {
            return Err(violation(TreeError::ArrangedContainer(container)));
        }
        if let Some(child) = child
            && !state.children.contains(&child)
        {
            return Err(violation(TreeError::NotAChild { container, child }));
        }

        if let Some(state) = self.container_mut(container) {
            state.main_widget = child;
        }
        tracing::trace!(target: targets::SIZE, ?container, ?child, "main widget set");
        self.contents_changed(container);
        Ok(())
    }

    // =========================================================================
    // Visibility and input acceptance
    // =========================================================================

    /// Hide or show a widget.
    ///
    /// Hiding drops focus and mouseover held in the widget's subtree. Either
    /// way the parent is told, so a layout reallocates the widget's space.
    pub fn set_is_hidden(&mut self, id: WidgetId, hidden: bool) -> TreeResult<()> {
        let base = self.base(id).ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        if base.is_hidden() == hidden {
            return Ok(());
        }
        if hidden {
            self.drop_focus(id);
            self.drop_mouseover(id);
        }
        if let Some(base) = self.base_mut(id) {
            base.set_hidden(hidden);
        }
        tracing::trace!(target: targets::TREE, ?id, hidden, "visibility changed");
        if let Some(parent) = self.parent(id) {
            self.child_size_properties_changed(parent, id);
        }
        Ok(())
    }

    /// Enable or disable a widget. Disabling drops focus and mouseover.
    pub fn set_is_enabled(&mut self, id: WidgetId, enabled: bool) -> TreeResult<()> {
        let base = self.base(id).ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        if base.is_enabled() == enabled {
            return Ok(());
        }
        if !enabled {
            self.drop_focus(id);
            self.drop_mouseover(id);
        }
        if let Some(base) = self.base_mut(id) {
            base.set_enabled(enabled);
        }
        tracing::trace!(target: targets::TREE, ?id, enabled, "enablement changed");
        Ok(())
    }

    /// Whether a widget may take focus. Refusing drops any focus it holds.
    pub fn set_accepts_focus(&mut self, id: WidgetId, accepts: bool) -> TreeResult<()> {
        let base = self.base_mut(id).ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        base.set_accepts_focus(accepts);
        if !accepts {
            self.drop_focus(id);
        }
        Ok(())
    }

    /// Whether a widget takes part in mouseover. Refusing drops any
    /// mouseover it holds.
    pub fn set_accepts_mouseover(&mut self, id: WidgetId, accepts: bool) -> TreeResult<()> {
        let base = self.base_mut(id).ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        base.set_accepts_mouseover(accepts);
        if !accepts {
            self.drop_mouseover(id);
        }
        Ok(())
    }

    // =========================================================================
    // Layout and cell configuration
    // =========================================================================

    fn update_grid(
        &mut self,
        id: WidgetId,
        update: impl FnOnce(&mut GridLayout),
    ) -> TreeResult<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        match &mut node.arrangement {
            Arrangement::Grid(grid) => update(grid),
            _ => return Err(violation(TreeError::NotALayout(id))),
        }
        tracing::trace!(target: targets::LAYOUT, ?id, layout = ?self.layout(id), "layout reconfigured");
        self.contents_changed(id);
        Ok(())
    }

    /// Change the direction a layout packs its cells in.
    pub fn set_layout_major_direction(&mut self, id: WidgetId, direction: MajorDirection) -> TreeResult<()> {
        self.update_grid(id, |grid| grid.set_major_direction(direction))
    }

    /// Change how many cells a layout packs per line. Zero is raised to one.
    pub fn set_layout_major_count(&mut self, id: WidgetId, count: usize) -> TreeResult<()> {
        self.update_grid(id, |grid| grid.set_major_count(count))
    }

    /// Change a layout's frame margins.
    pub fn set_layout_frame_margins(&mut self, id: WidgetId, margins: Size) -> TreeResult<()> {
        self.update_grid(id, |grid| grid.set_frame_margins(margins))
    }

    /// Change a layout's spacing margins.
    pub fn set_layout_spacing_margins(&mut self, id: WidgetId, margins: Size) -> TreeResult<()> {
        self.update_grid(id, |grid| grid.set_spacing_margins(margins))
    }

    fn update_cell(
        &mut self,
        id: WidgetId,
        update: impl FnOnce(&mut CellPadding),
    ) -> TreeResult<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        match &mut node.arrangement {
            Arrangement::Padded(cell) => update(cell),
            _ => return Err(violation(TreeError::NotACellPadding(id))),
        }
        self.contents_changed(id);
        Ok(())
    }

    /// Change where a cell-padding container aligns its child.
    pub fn set_cell_alignment(&mut self, id: WidgetId, alignment: Alignment2) -> TreeResult<()> {
        self.update_cell(id, |cell| cell.set_alignment(alignment))
    }

    /// Change a cell-padding container's padding.
    pub fn set_cell_padding(&mut self, id: WidgetId, padding: Size) -> TreeResult<()> {
        self.update_cell(id, |cell| cell.set_padding(padding))
    }
}
