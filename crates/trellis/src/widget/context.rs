//! Deferred tree mutation from inside widget hooks.
//!
//! Hooks run while the tree is mid-traversal, so they cannot mutate its
//! structure directly. Instead they queue [`TreeCommand`]s through an
//! [`EventContext`]; the tree applies them in order once the traversal
//! that produced them has finished.

use trellis_render::{Rect, Size};

use super::tree::WidgetId;

/// A structural change requested during a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeCommand {
    /// Destroy the widget and its subtree.
    Destroy(WidgetId),
    /// Detach the widget from its parent, keeping it alive.
    Detach(WidgetId),
    /// Give the widget keyboard focus.
    Focus(WidgetId),
    /// Remove focus from the widget and its subtree.
    Unfocus(WidgetId),
    /// Grab the mouse for the widget.
    GrabMouse(WidgetId),
    /// Release a mouse grab held by the widget.
    ReleaseMouse(WidgetId),
    /// Hide or show the widget.
    SetHidden(WidgetId, bool),
    /// Make the widget modal or non-modal.
    SetModal(WidgetId, bool),
    /// Request a new size.
    Resize(WidgetId, Size),
    /// Ask the screen to quit.
    RequestQuit,
}

impl TreeCommand {
    /// The widget the command targets, if any.
    pub fn target(&self) -> Option<WidgetId> {
        match *self {
            TreeCommand::Destroy(id)
            | TreeCommand::Detach(id)
            | TreeCommand::Focus(id)
            | TreeCommand::Unfocus(id)
            | TreeCommand::GrabMouse(id)
            | TreeCommand::ReleaseMouse(id)
            | TreeCommand::SetHidden(id, _)
            | TreeCommand::SetModal(id, _)
            | TreeCommand::Resize(id, _) => Some(id),
            TreeCommand::RequestQuit => None,
        }
    }
}

/// Context handed to event and frame hooks.
///
/// Carries the handle and rectangle of the widget being called and a queue
/// for deferred tree commands.
pub struct EventContext<'a> {
    widget: WidgetId,
    rect: Rect,
    commands: &'a mut Vec<TreeCommand>,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(widget: WidgetId, rect: Rect, commands: &'a mut Vec<TreeCommand>) -> Self {
        Self {
            widget,
            rect,
            commands,
        }
    }

    /// The handle of the widget being called.
    #[inline]
    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// The widget's rectangle in screen coordinates.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Queue an arbitrary command.
    pub fn push(&mut self, command: TreeCommand) {
        self.commands.push(command);
    }

    /// Focus this widget after the traversal.
    pub fn focus(&mut self) {
        self.push(TreeCommand::Focus(self.widget));
    }

    /// Unfocus this widget after the traversal.
    pub fn unfocus(&mut self) {
        self.push(TreeCommand::Unfocus(self.widget));
    }

    /// Grab the mouse for this widget after the traversal.
    pub fn grab_mouse(&mut self) {
        self.push(TreeCommand::GrabMouse(self.widget));
    }

    /// Release this widget's mouse grab after the traversal.
    pub fn release_mouse(&mut self) {
        self.push(TreeCommand::ReleaseMouse(self.widget));
    }

    /// Destroy another widget after the traversal.
    pub fn destroy(&mut self, id: WidgetId) {
        self.push(TreeCommand::Destroy(id));
    }

    /// Destroy this widget after the traversal.
    pub fn destroy_self(&mut self) {
        self.push(TreeCommand::Destroy(self.widget));
    }

    /// Detach a widget from its parent after the traversal.
    pub fn detach(&mut self, id: WidgetId) {
        self.push(TreeCommand::Detach(id));
    }

    /// Hide or show a widget after the traversal.
    pub fn set_hidden(&mut self, id: WidgetId, hidden: bool) {
        self.push(TreeCommand::SetHidden(id, hidden));
    }

    /// Make a widget modal or non-modal after the traversal.
    pub fn set_modal(&mut self, id: WidgetId, modal: bool) {
        self.push(TreeCommand::SetModal(id, modal));
    }

    /// Resize a widget after the traversal.
    pub fn resize(&mut self, id: WidgetId, size: Size) {
        self.push(TreeCommand::Resize(id, size));
    }

    /// Ask the screen to quit.
    pub fn request_quit(&mut self) {
        self.push(TreeCommand::RequestQuit);
    }
}
