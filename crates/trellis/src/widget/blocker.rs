//! Batched relayout while populating a container.
//!
//! Attaching, detaching or resizing children normally makes their
//! container recompute its bounds and rearrange immediately. Filling a
//! container with `n` children that way arranges it `n` times. Blocking
//! child resizes on the container defers all of that into a single
//! recompute when the last block is lifted, with the same end result.

use std::ops::{Deref, DerefMut};

use trellis_core::logging::targets;

use crate::error::{TreeError, TreeResult};

use super::tree::{violation, WidgetId, WidgetTree};

impl WidgetTree {
    /// Start deferring relayout of `container` caused by its children.
    ///
    /// Blocks nest. Prefer [`ChildResizeBlocker`], which cannot forget to
    /// unblock.
    pub fn block_child_resize(&mut self, container: WidgetId) -> TreeResult<()> {
        if !self.contains(container) {
            return Err(violation(TreeError::InvalidWidget(container)));
        }
        let state = self
            .container_mut(container)
            .ok_or_else(|| violation(TreeError::NotAContainer(container)))?;
        state.child_resize_blocked += 1;
        let depth = state.child_resize_blocked;
        tracing::trace!(target: targets::SIZE, ?container, depth, "blocked child resize");
        Ok(())
    }

    /// Lift one block. When the last block goes and something was deferred,
    /// the container is recomputed once.
    pub fn unblock_child_resize(&mut self, container: WidgetId) -> TreeResult<()> {
        if !self.contains(container) {
            return Err(violation(TreeError::InvalidWidget(container)));
        }
        let state = self
            .container_mut(container)
            .ok_or_else(|| violation(TreeError::NotAContainer(container)))?;
        if state.child_resize_blocked == 0 {
            tracing::warn!(target: targets::SIZE, ?container, "unblocking child resize that was not blocked");
            return Ok(());
        }
        state.child_resize_blocked -= 1;
        if state.child_resize_blocked > 0 || !state.child_resize_was_blocked {
            return Ok(());
        }
        state.child_resize_was_blocked = false;

        tracing::trace!(target: targets::SIZE, ?container, "applying deferred child resize");
        self.contents_changed(container);
        Ok(())
    }

    /// Whether child resizes of `container` are currently deferred.
    pub fn is_child_resize_blocked(&self, container: WidgetId) -> bool {
        self.container(container)
            .is_some_and(|s| s.child_resize_blocked > 0)
    }

    /// Run `f` with child resizes of `container` blocked.
    pub fn with_child_resize_blocked<R>(
        &mut self,
        container: WidgetId,
        f: impl FnOnce(&mut WidgetTree) -> R,
    ) -> TreeResult<R> {
        let mut blocker = ChildResizeBlocker::new(self, container)?;
        Ok(f(&mut blocker))
    }
}

/// Blocks child resizes of a container for as long as it lives.
///
/// The guard dereferences to the tree, so the container can be filled
/// through it. Dropping it, including on early return or unwinding, lifts
/// the block and applies the deferred relayout.
///
/// # Example
///
/// ```
/// use trellis::prelude::*;
///
/// let mut tree = WidgetTree::new();
/// let grid = tree.insert_layout(Panel::new("grid"), GridLayout::rows(2));
/// {
///     let mut blocker = ChildResizeBlocker::new(&mut tree, grid)?;
///     for i in 0..4 {
///         blocker.add_child(grid, Panel::new(format!("cell{i}")), NodeKind::Leaf)?;
///     }
///     assert!(blocker.is_child_resize_blocked(grid));
/// }
/// assert!(!tree.is_child_resize_blocked(grid));
/// assert_eq!(tree.children(grid).len(), 4);
/// # Ok::<(), trellis::TreeError>(())
/// ```
pub struct ChildResizeBlocker<'a> {
    tree: &'a mut WidgetTree,
    container: WidgetId,
}

impl<'a> ChildResizeBlocker<'a> {
    /// Block child resizes of `container` until the guard drops.
    pub fn new(tree: &'a mut WidgetTree, container: WidgetId) -> TreeResult<Self> {
        tree.block_child_resize(container)?;
        Ok(Self { tree, container })
    }

    /// The blocked container.
    #[inline]
    pub fn container(&self) -> WidgetId {
        self.container
    }
}

impl Deref for ChildResizeBlocker<'_> {
    type Target = WidgetTree;

    fn deref(&self) -> &WidgetTree {
        self.tree
    }
}

impl DerefMut for ChildResizeBlocker<'_> {
    fn deref_mut(&mut self) -> &mut WidgetTree {
        self.tree
    }
}

impl Drop for ChildResizeBlocker<'_> {
    fn drop(&mut self) {
        if let Err(error) = self.tree.unblock_child_resize(self.container) {
            tracing::warn!(target: targets::SIZE, %error, "container vanished while blocked");
        }
    }
}
