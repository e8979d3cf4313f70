//! The widget arena.
//!
//! All widgets live in a [`WidgetTree`], keyed by [`WidgetId`]. Parent,
//! focus, mouseover, main-widget and modal references are handles into the
//! arena, never owners; the single detach path clears every one of them
//! before a widget can leave its parent, so a handle stored in the tree is
//! always live.
//!
//! Structural mutation (attach, detach, destroy, restacking) lives here.
//! Size negotiation, focus, mouseover, modality, routing and drawing are
//! further `impl WidgetTree` blocks in their own modules.

use slotmap::{new_key_type, SlotMap};
use trellis_core::logging::{targets, DebugTree, NodeLabel};
use trellis_core::Signal;
use trellis_render::{Point, Rect, ScreenCoord, Size};

use crate::error::{TreeError, TreeResult};

use super::base::{StackPriority, WidgetBase};
use super::context::TreeCommand;
use super::layout::{CellPadding, GridLayout};
use super::size_properties::SizeProperties;
use super::traits::Widget;

new_key_type! {
    /// A stable handle to a widget in a [`WidgetTree`].
    ///
    /// Handles become stale when the widget is destroyed; every tree
    /// operation given a stale handle returns [`TreeError::InvalidWidget`].
    pub struct WidgetId;
}

/// The capabilities a widget is inserted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A widget without children.
    Leaf,
    /// A container that leaves its children where they are put, optionally
    /// mirroring the size of a main widget.
    Container,
    /// A container arranging its children on a grid.
    Layout(GridLayout),
    /// A container holding one child inside padding.
    CellPadding(CellPadding),
}

/// How a container positions its children.
#[derive(Debug, Clone)]
pub(crate) enum Arrangement {
    Free,
    Grid(GridLayout),
    Padded(CellPadding),
}

/// Per-container structural state.
#[derive(Debug, Default)]
pub(crate) struct ContainerState {
    /// Children in draw order, grouped by stack priority band.
    pub(crate) children: Vec<WidgetId>,
    /// The child on the keyboard focus chain.
    pub(crate) focus: Option<WidgetId>,
    /// The child on the mouseover chain.
    pub(crate) mouseover_focus: Option<WidgetId>,
    /// Whether the mouse grab is held at or below `focus`.
    pub(crate) focus_has_mouse_grab: bool,
    /// The child whose size this container mirrors.
    pub(crate) main_widget: Option<WidgetId>,
    /// Modal widgets, bottom first. Only used on parentless widgets.
    pub(crate) modal_stack: Vec<WidgetId>,
    pub(crate) child_resize_blocked: u32,
    pub(crate) child_resize_was_blocked: bool,
}

pub(crate) struct Node {
    pub(crate) widget: Box<dyn Widget>,
    pub(crate) container: Option<ContainerState>,
    pub(crate) arrangement: Arrangement,
}

/// Logs a contract violation and hands the error back for returning.
pub(crate) fn violation(error: TreeError) -> TreeError {
    tracing::warn!(target: targets::TREE, %error, "contract violation");
    error
}

/// An arena of widgets forming one or more trees.
///
/// Widgets are inserted parentless and then attached. A parentless widget
/// is a *root*: it counts as focused, owns the modal stack of its tree and
/// is where routing starts. [`Screen`](crate::Screen) owns a tree whose
/// main root covers the whole screen.
///
/// # Example
///
/// ```
/// use trellis::prelude::*;
///
/// let mut tree = WidgetTree::new();
/// let root = tree.insert_container(Panel::new("root"));
/// let button = tree.add_child(root, Panel::new("button").with_accepts_focus(true), NodeKind::Leaf)?;
///
/// tree.focus(button)?;
/// assert_eq!(tree.focused_child(root), Some(button));
/// assert!(tree.is_focused(button));
/// # Ok::<(), trellis::TreeError>(())
/// ```
pub struct WidgetTree {
    pub(crate) nodes: SlotMap<WidgetId, Node>,
    pub(crate) commands: Vec<TreeCommand>,
    ratio_basis: ScreenCoord,
    quit_requested: bool,

    /// Emitted with the deepest focused widget after the focus chain changes.
    pub focus_changed: Signal<Option<WidgetId>>,

    /// Emitted with the hovered widget after the mouseover chain changes.
    pub mouseover_changed: Signal<Option<WidgetId>>,

    /// Emitted with the new depth after a modal stack changes.
    pub modal_stack_changed: Signal<usize>,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("widgets", &self.nodes.len())
            .field("pending_commands", &self.commands.len())
            .field("ratio_basis", &self.ratio_basis)
            .finish_non_exhaustive()
    }
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            commands: Vec::new(),
            ratio_basis: 0,
            quit_requested: false,
            focus_changed: Signal::new(),
            mouseover_changed: Signal::new(),
            modal_stack_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Insert a parentless widget with the given capabilities.
    pub fn insert<W: Widget>(&mut self, widget: W, kind: NodeKind) -> WidgetId {
        self.insert_boxed(Box::new(widget), kind)
    }

    /// Insert an already boxed widget.
    pub fn insert_boxed(&mut self, widget: Box<dyn Widget>, kind: NodeKind) -> WidgetId {
        let (container, arrangement) = match kind {
            NodeKind::Leaf => (None, Arrangement::Free),
            NodeKind::Container => (Some(ContainerState::default()), Arrangement::Free),
            NodeKind::Layout(grid) => (Some(ContainerState::default()), Arrangement::Grid(grid)),
            NodeKind::CellPadding(cell) => {
                (Some(ContainerState::default()), Arrangement::Padded(cell))
            }
        };
        let id = self.nodes.insert(Node {
            widget,
            container,
            arrangement,
        });

        // Arranged containers start with bounds derived from their (empty)
        // contents, e.g. a grid's frame margins.
        self.refresh_size_properties(id);
        let size = self.size(id).unwrap_or_default();
        self.resize_internal(id, size, false, true);

        tracing::trace!(
            target: targets::TREE,
            ?id,
            name = self.base(id).map(WidgetBase::name).unwrap_or_default(),
            "inserted widget"
        );
        id
    }

    /// Insert a leaf widget.
    pub fn insert_leaf<W: Widget>(&mut self, widget: W) -> WidgetId {
        self.insert(widget, NodeKind::Leaf)
    }

    /// Insert a free container.
    pub fn insert_container<W: Widget>(&mut self, widget: W) -> WidgetId {
        self.insert(widget, NodeKind::Container)
    }

    /// Insert a grid layout container.
    pub fn insert_layout<W: Widget>(&mut self, widget: W, grid: GridLayout) -> WidgetId {
        self.insert(widget, NodeKind::Layout(grid))
    }

    /// Insert a cell-padding container.
    pub fn insert_cell_padding<W: Widget>(&mut self, widget: W, cell: CellPadding) -> WidgetId {
        self.insert(widget, NodeKind::CellPadding(cell))
    }

    /// Insert a widget and attach it to `parent` in one step.
    ///
    /// If the attach fails the widget is dropped again.
    pub fn add_child<W: Widget>(
        &mut self,
        parent: WidgetId,
        widget: W,
        kind: NodeKind,
    ) -> TreeResult<WidgetId> {
        if !self.nodes.contains_key(parent) {
            return Err(violation(TreeError::InvalidWidget(parent)));
        }
        let id = self.insert(widget, kind);
        if let Err(error) = self.attach_child(parent, id) {
            self.nodes.remove(id);
            return Err(error);
        }
        Ok(id)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Attach a parentless widget to `container`.
    ///
    /// The child is placed last within its stack priority band, so it draws
    /// above same-band siblings. Its position is taken as relative to the
    /// container and its subtree is translated accordingly.
    pub fn attach_child(&mut self, container: WidgetId, child: WidgetId) -> TreeResult<()> {
        let child_base = self.base(child).ok_or_else(|| violation(TreeError::InvalidWidget(child)))?;
        if let Some(parent) = child_base.parent() {
            return Err(violation(TreeError::AlreadyParented { child, parent }));
        }
        let priority = child_base.stack_priority();

        let node = self
            .nodes
            .get(container)
            .ok_or_else(|| violation(TreeError::InvalidWidget(container)))?;
        let state = node
            .container
            .as_ref()
            .ok_or_else(|| violation(TreeError::NotAContainer(container)))?;
        if child == container || self.is_ancestor(child, container) {
            return Err(violation(TreeError::CircularParentage { container, child }));
        }
        if matches!(node.arrangement, Arrangement::Padded(_)) && !state.children.is_empty() {
            return Err(violation(TreeError::CellOccupied(container)));
        }
        let origin = node.widget.widget_base().position();

        let position = state
            .children
            .iter()
            .position(|&c| self.stack_priority(c) > priority)
            .unwrap_or(state.children.len());
        if let Some(state) = self.container_mut(container) {
            state.children.insert(position, child);
        }
        if let Some(base) = self.base_mut(child) {
            base.set_parent(Some(container));
        }
        self.translate_subtree(child, origin);

        // A subtree that was its own root brings its modal widgets along.
        let orphaned_modals = self
            .container_mut(child)
            .map(|state| std::mem::take(&mut state.modal_stack))
            .unwrap_or_default();
        if !orphaned_modals.is_empty() {
            let root = self.root_of(container);
            if let Some(state) = self.container_mut(root) {
                for modal in orphaned_modals {
                    if !state.modal_stack.contains(&modal) {
                        state.modal_stack.push(modal);
                    }
                }
            }
            let depth = self.modal_stack(root).len();
            self.modal_stack_changed.emit(depth);
        }

        tracing::trace!(target: targets::TREE, ?container, ?child, index = position, "attached child");
        self.child_size_properties_changed(container, child);
        Ok(())
    }

    /// Detach `child` from `container`, keeping it alive as a parentless
    /// widget.
    ///
    /// Focus, mouseover and main-widget references to the child are cleared
    /// first, and any modal widgets in its subtree leave the modal stack.
    /// The child's position becomes relative to its former container.
    pub fn detach_child(&mut self, container: WidgetId, child: WidgetId) -> TreeResult<()> {
        if !self.nodes.contains_key(container) {
            return Err(violation(TreeError::InvalidWidget(container)));
        }
        let parent = self.parent(child).ok_or_else(|| {
            if self.nodes.contains_key(child) {
                violation(TreeError::NotAChild { container, child })
            } else {
                violation(TreeError::InvalidWidget(child))
            }
        })?;
        if parent != container {
            return Err(violation(TreeError::NotAChild { container, child }));
        }

        if self.focused_child(container) == Some(child) {
            self.unfocus_subtree(child);
            self.emit_focus_changed(container);
        }
        if self.mouseover_child(container) == Some(child) {
            let root = self.root_of(container);
            self.clear_mouseover(root);
        }
        let arranged = self.arranges(container, child);
        if let Some(state) = self.container_mut(container) {
            if state.main_widget == Some(child) {
                state.main_widget = None;
            }
        }
        self.remove_subtree_modals(container, child);

        if let Some(state) = self.container_mut(container) {
            state.children.retain(|&c| c != child);
        }
        if let Some(base) = self.base_mut(child) {
            base.set_parent(None);
        }
        let origin = self.base(container).map(WidgetBase::position).unwrap_or_default();
        self.translate_subtree(child, Point::ZERO - origin);

        tracing::trace!(target: targets::TREE, ?container, ?child, "detached child");
        if arranged {
            self.contents_changed(container);
        }
        Ok(())
    }

    /// Detach a widget from whatever parent it has.
    pub fn detach(&mut self, child: WidgetId) -> TreeResult<()> {
        let base = self.base(child).ok_or_else(|| violation(TreeError::InvalidWidget(child)))?;
        let parent = base
            .parent()
            .ok_or_else(|| violation(TreeError::Detached(child)))?;
        self.detach_child(parent, child)
    }

    /// Destroy a widget and its whole subtree.
    ///
    /// The widget is detached first; descendants are removed before their
    /// ancestors. Pending commands aimed at removed widgets are discarded.
    pub fn destroy(&mut self, id: WidgetId) -> TreeResult<()> {
        let base = self.base(id).ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        if let Some(parent) = base.parent() {
            self.detach_child(parent, id)?;
        }

        let mut doomed = self.subtree(id);
        doomed.reverse();
        for &widget in &doomed {
            self.nodes.remove(widget);
        }
        self.commands
            .retain(|command| command.target().is_none_or(|t| self.nodes.contains_key(t)));

        tracing::trace!(target: targets::TREE, ?id, removed = doomed.len(), "destroyed widget");
        Ok(())
    }

    /// Drop modal entries for widgets in `child`'s subtree from the modal
    /// stack of `container`'s root.
    fn remove_subtree_modals(&mut self, container: WidgetId, child: WidgetId) {
        let root = self.root_of(container);
        let Some(stack) = self.container(root).map(|s| s.modal_stack.clone()) else {
            return;
        };
        let removed: Vec<WidgetId> = stack
            .iter()
            .copied()
            .filter(|&m| m == child || self.is_ancestor(child, m))
            .collect();
        if removed.is_empty() {
            return;
        }

        if let Some(state) = self.container_mut(root) {
            state.modal_stack.retain(|m| !removed.contains(m));
        }
        for modal in removed {
            if let Some(node) = self.nodes.get_mut(modal) {
                node.widget.widget_base_mut().set_modal(false);
                node.widget.handle_modal_change(false);
            }
            tracing::trace!(target: targets::MODAL, ?modal, "modal widget left with detached subtree");
        }
        let depth = self.modal_stack(root).len();
        self.modal_stack_changed.emit(depth);
    }

    // =========================================================================
    // Stacking
    // =========================================================================

    fn sibling_index(&self, child: WidgetId) -> TreeResult<(WidgetId, usize)> {
        let base = self.base(child).ok_or_else(|| violation(TreeError::InvalidWidget(child)))?;
        let parent = base
            .parent()
            .ok_or_else(|| violation(TreeError::Detached(child)))?;
        let index = self
            .children(parent)
            .iter()
            .position(|&c| c == child)
            .ok_or_else(|| violation(TreeError::NotAChild { container: parent, child }))?;
        Ok((parent, index))
    }

    fn stack_priority(&self, id: WidgetId) -> StackPriority {
        self.base(id).map(WidgetBase::stack_priority).unwrap_or_default()
    }

    /// Index range of the band `priority` within `parent`'s children.
    fn band(&self, parent: WidgetId, priority: StackPriority) -> std::ops::Range<usize> {
        let children = self.children(parent);
        let start = children
            .iter()
            .position(|&c| self.stack_priority(c) >= priority)
            .unwrap_or(children.len());
        let end = children
            .iter()
            .position(|&c| self.stack_priority(c) > priority)
            .unwrap_or(children.len());
        start..end
    }

    fn move_within_band(&mut self, child: WidgetId, target: impl FnOnce(std::ops::Range<usize>, usize) -> usize) -> TreeResult<()> {
        let (parent, index) = self.sibling_index(child)?;
        let band = self.band(parent, self.stack_priority(child));
        let to = target(band, index);
        if to != index {
            if let Some(state) = self.container_mut(parent) {
                let moved = state.children.remove(index);
                state.children.insert(to, moved);
            }
            tracing::trace!(target: targets::TREE, ?child, from = index, to, "restacked child");
        }
        Ok(())
    }

    /// Move a child one step up within its band.
    pub fn move_child_up(&mut self, child: WidgetId) -> TreeResult<()> {
        self.move_within_band(child, |band, index| (index + 1).min(band.end - 1))
    }

    /// Move a child one step down within its band.
    pub fn move_child_down(&mut self, child: WidgetId) -> TreeResult<()> {
        self.move_within_band(child, |band, index| index.saturating_sub(1).max(band.start))
    }

    /// Move a child to the top of its band.
    pub fn move_child_to_top(&mut self, child: WidgetId) -> TreeResult<()> {
        self.move_within_band(child, |band, _| band.end - 1)
    }

    /// Move a child to the bottom of its band.
    pub fn move_child_to_bottom(&mut self, child: WidgetId) -> TreeResult<()> {
        self.move_within_band(child, |band, _| band.start)
    }

    /// Change a widget's stack priority.
    ///
    /// An attached widget is relocated by scanning from its old position
    /// toward the new band: raised widgets land at the bottom of their new
    /// band, lowered widgets at the top.
    pub fn set_stack_priority(&mut self, id: WidgetId, priority: StackPriority) -> TreeResult<()> {
        let base = self.base_mut(id).ok_or_else(|| violation(TreeError::InvalidWidget(id)))?;
        let old = base.stack_priority();
        if old == priority {
            return Ok(());
        }
        base.set_stack_priority(priority);
        let Some(parent) = base.parent() else {
            return Ok(());
        };

        let (_, mut index) = self.sibling_index(id)?;
        let mut priorities: Vec<StackPriority> = self
            .children(parent)
            .iter()
            .map(|&c| self.stack_priority(c))
            .collect();
        let Some(state) = self.container_mut(parent) else {
            return Ok(());
        };
        if priority > old {
            while index + 1 < state.children.len() && priorities[index + 1] < priority {
                state.children.swap(index, index + 1);
                priorities.swap(index, index + 1);
                index += 1;
            }
        } else {
            while index > 0 && priorities[index - 1] > priority {
                state.children.swap(index, index - 1);
                priorities.swap(index, index - 1);
                index -= 1;
            }
        }
        tracing::trace!(target: targets::TREE, ?id, ?priority, index, "stack priority changed");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether `id` names a live widget.
    #[inline]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live widgets.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no widgets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The widget base of `id`.
    pub fn base(&self, id: WidgetId) -> Option<&WidgetBase> {
        self.nodes.get(id).map(|n| n.widget.widget_base())
    }

    /// Mutable access to the widget base of `id`.
    ///
    /// Structural state on the base is read-only from outside the tree;
    /// this exposes the name, color mask and background.
    pub fn base_mut(&mut self, id: WidgetId) -> Option<&mut WidgetBase> {
        self.nodes.get_mut(id).map(|n| n.widget.widget_base_mut())
    }

    /// The widget of `id` as a concrete type.
    pub fn widget<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.nodes.get(id)?.widget.downcast_ref::<T>()
    }

    /// The widget of `id` as a mutable concrete type.
    pub fn widget_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.nodes.get_mut(id)?.widget.downcast_mut::<T>()
    }

    /// The widget of `id` as a trait object.
    pub fn widget_dyn(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.nodes.get(id).map(|n| &*n.widget)
    }

    pub(crate) fn container(&self, id: WidgetId) -> Option<&ContainerState> {
        self.nodes.get(id)?.container.as_ref()
    }

    pub(crate) fn container_mut(&mut self, id: WidgetId) -> Option<&mut ContainerState> {
        self.nodes.get_mut(id)?.container.as_mut()
    }

    /// Whether `id` can hold children.
    pub fn is_container(&self, id: WidgetId) -> bool {
        self.container(id).is_some()
    }

    /// The parent of `id`.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.base(id)?.parent()
    }

    /// Children of `id` in draw order; empty for leaves and stale handles.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.container(id).map_or(&[], |s| s.children.as_slice())
    }

    /// The absolute rectangle of `id`.
    pub fn rect(&self, id: WidgetId) -> Option<Rect> {
        self.base(id).map(WidgetBase::screen_rect)
    }

    /// The size of `id`.
    pub fn size(&self, id: WidgetId) -> Option<Size> {
        self.base(id).map(WidgetBase::size)
    }

    /// The effective size properties of `id`.
    pub fn size_properties(&self, id: WidgetId) -> Option<SizeProperties> {
        self.base(id).map(|b| *b.size_properties())
    }

    /// The preferred size properties of `id`.
    pub fn preferred_size_properties(&self, id: WidgetId) -> Option<SizeProperties> {
        self.base(id).map(|b| *b.preferred_size_properties())
    }

    /// The child of `container` on the focus chain.
    pub fn focused_child(&self, container: WidgetId) -> Option<WidgetId> {
        self.container(container)?.focus
    }

    /// The child of `container` on the mouseover chain.
    pub fn mouseover_child(&self, container: WidgetId) -> Option<WidgetId> {
        self.container(container)?.mouseover_focus
    }

    /// Whether the mouse grab is held at or below `container`'s focused child.
    pub fn focus_has_mouse_grab(&self, container: WidgetId) -> bool {
        self.container(container)
            .is_some_and(|s| s.focus_has_mouse_grab)
    }

    /// The child whose size `container` mirrors.
    pub fn main_widget(&self, container: WidgetId) -> Option<WidgetId> {
        self.container(container)?.main_widget
    }

    /// The grid layout of `id`, if it is a layout container.
    pub fn layout(&self, id: WidgetId) -> Option<&GridLayout> {
        match &self.nodes.get(id)?.arrangement {
            Arrangement::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    /// The cell padding of `id`, if it is a cell-padding container.
    pub fn cell_padding(&self, id: WidgetId) -> Option<&CellPadding> {
        match &self.nodes.get(id)?.arrangement {
            Arrangement::Padded(cell) => Some(cell),
            _ => None,
        }
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            out.push(ancestor);
            current = self.parent(ancestor);
        }
        out
    }

    /// Whether `ancestor` is a proper ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = self.parent(id);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// The parentless widget at the top of `id`'s tree.
    pub fn root_of(&self, id: WidgetId) -> WidgetId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// All parentless widgets.
    pub fn roots(&self) -> Vec<WidgetId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.widget.widget_base().parent().is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// `id` and all its descendants, parents before children.
    pub fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Whether `id` and every ancestor are visible.
    pub fn is_visible_in_tree(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(widget) = current {
            match self.base(widget) {
                Some(base) if base.is_visible() => current = base.parent(),
                _ => return false,
            }
        }
        true
    }

    // =========================================================================
    // Deferred commands
    // =========================================================================

    /// Queue a command for the next [`flush_commands`](Self::flush_commands).
    pub fn queue(&mut self, command: TreeCommand) {
        self.commands.push(command);
    }

    /// Number of queued commands.
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Apply queued commands in the order they were queued.
    ///
    /// Commands that fail (a stale handle, say) are logged and skipped.
    pub fn flush_commands(&mut self) {
        while !self.commands.is_empty() {
            let batch = std::mem::take(&mut self.commands);
            for command in batch {
                tracing::trace!(target: targets::TREE, ?command, "applying deferred command");
                let result = match command {
                    TreeCommand::Destroy(id) => self.destroy(id),
                    TreeCommand::Detach(id) => self.detach(id),
                    TreeCommand::Focus(id) => self.focus(id).map(drop),
                    TreeCommand::Unfocus(id) => self.unfocus(id),
                    TreeCommand::GrabMouse(id) => self.grab_mouse(id).map(drop),
                    TreeCommand::ReleaseMouse(id) => self.release_mouse(id).map(drop),
                    TreeCommand::SetHidden(id, hidden) => self.set_is_hidden(id, hidden),
                    TreeCommand::SetModal(id, modal) => self.set_is_modal(id, modal),
                    TreeCommand::Resize(id, size) => self.resize(id, size).map(drop),
                    TreeCommand::RequestQuit => {
                        self.quit_requested = true;
                        Ok(())
                    }
                };
                if let Err(error) = result {
                    tracing::debug!(target: targets::TREE, ?command, %error, "deferred command failed");
                }
            }
        }
    }

    /// Take and clear the quit request raised by a hook.
    pub fn take_quit_request(&mut self) -> bool {
        std::mem::take(&mut self.quit_requested)
    }

    // =========================================================================
    // Ratio basis
    // =========================================================================

    /// The length ratio-based size properties are multiplied by.
    #[inline]
    pub fn ratio_basis(&self) -> ScreenCoord {
        self.ratio_basis
    }

    /// Set the ratio basis. Existing properties are not recomputed.
    pub fn set_ratio_basis(&mut self, basis: ScreenCoord) {
        self.ratio_basis = basis.max(0);
    }
}

impl DebugTree for WidgetTree {
    type Id = WidgetId;

    fn debug_roots(&self) -> Vec<WidgetId> {
        self.roots()
    }

    fn debug_label(&self, id: WidgetId) -> Option<NodeLabel> {
        let node = self.nodes.get(id)?;
        let base = node.widget.widget_base();
        let rect = base.screen_rect();

        let mut details = vec![format!(
            "{}x{}@{},{}",
            rect.width(),
            rect.height(),
            rect.left(),
            rect.top()
        )];
        match &node.arrangement {
            Arrangement::Grid(grid) => details.push(format!(
                "grid {:?}x{}",
                grid.major_direction(),
                grid.major_count()
            )),
            Arrangement::Padded(cell) => {
                details.push(format!("padded {}x{}", cell.padding().width, cell.padding().height))
            }
            Arrangement::Free => {}
        }
        if base.parent().is_some() && self.is_focused(id) {
            details.push("focused".into());
        }
        if self.is_mouse_grabbed(id) {
            details.push("grab".into());
        }
        if base.is_mouseover() {
            details.push("mouseover".into());
        }
        if base.is_hidden() {
            details.push("hidden".into());
        }
        if !base.is_enabled() {
            details.push("disabled".into());
        }
        if base.is_modal() {
            details.push("modal".into());
        }
        if base.stack_priority() != StackPriority::Neutral {
            details.push(format!("{:?}", base.stack_priority()).to_lowercase());
        }

        Some(NodeLabel {
            name: base.name().to_owned(),
            type_name: node.widget.type_name(),
            details,
        })
    }

    fn debug_children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.children(id).to_vec()
    }
}

static_assertions::assert_impl_all!(WidgetTree: Send, Sync);
static_assertions::assert_impl_all!(WidgetId: Send, Sync, Copy);
