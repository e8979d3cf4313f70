//! Error types for the widget tree and screen.
//!
//! Almost everything that can go wrong in the tree is a contract violation:
//! a caller handed over a stale id, attached a widget that already has a
//! parent, or removed a modal widget that was never pushed. These come back
//! as [`TreeError`] so the caller decides whether to `expect` them. Requests
//! that are merely out of range (a resize below a minimum, a min above a max)
//! are never errors; they are clamped.

use thiserror::Error;
use trellis_render::Size;

use crate::widget::WidgetId;

/// Contract violations reported by [`WidgetTree`](crate::widget::WidgetTree).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not name a live widget.
    #[error("widget {0:?} does not exist")]
    InvalidWidget(WidgetId),

    /// The operation needs a container but the widget is a leaf.
    #[error("widget {0:?} is not a container")]
    NotAContainer(WidgetId),

    /// The operation needs a grid layout but the widget is not one.
    #[error("widget {0:?} is not a layout")]
    NotALayout(WidgetId),

    /// The operation needs a cell-padding widget but the widget is not one.
    #[error("widget {0:?} is not a cell-padding widget")]
    NotACellPadding(WidgetId),

    /// A widget being attached already has a parent.
    #[error("widget {child:?} is already attached to {parent:?}")]
    AlreadyParented { child: WidgetId, parent: WidgetId },

    /// The widget is not a child of the given container.
    #[error("widget {child:?} is not a child of {container:?}")]
    NotAChild { container: WidgetId, child: WidgetId },

    /// The widget has no parent, but the operation requires one.
    #[error("widget {0:?} is not attached to a parent")]
    Detached(WidgetId),

    /// Attaching would make a widget its own ancestor.
    #[error("attaching {child:?} to {container:?} would create a cycle")]
    CircularParentage { container: WidgetId, child: WidgetId },

    /// A cell-padding widget already holds its single child.
    #[error("cell-padding widget {0:?} already has a child")]
    CellOccupied(WidgetId),

    /// The container arranges its children itself and cannot take a main widget.
    #[error("container {0:?} arranges its own children and cannot delegate to a main widget")]
    ArrangedContainer(WidgetId),

    /// The widget is not on its root's modal stack.
    #[error("widget {0:?} is not on the modal stack")]
    ModalNotPresent(WidgetId),
}

/// A specialized Result type for widget tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Errors that can occur while creating or resizing a [`Screen`](crate::Screen).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// Screen dimensions must both be positive.
    #[error("invalid screen size {0:?}: both dimensions must be positive")]
    InvalidSize(Size),

    /// The pixel depth is not one the host surfaces support.
    #[error("unsupported pixel depth {0} (expected 8, 15, 16, 24 or 32)")]
    UnsupportedPixelDepth(u32),
}
