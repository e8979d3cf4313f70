//! Core widget trait definitions.
//!
//! # Key Types
//!
//! - [`Widget`] - The override points concrete widgets implement
//! - [`DrawContext`] - Rendering context passed to [`Widget::draw`]
//!
//! # Related Types
//!
//! - [`super::WidgetBase`] - State every widget carries
//! - [`super::EventContext`] - Deferred commands from event and frame hooks
//! - [`super::WidgetTree`] - Owns widgets and drives the hooks

use std::any::Any;

use trellis_render::{Background, Color, Point, Rect, Renderer, Size, TextureId};

use super::base::WidgetBase;
use super::context::EventContext;
use super::events::{Event, FrameTime};

/// Context provided while a widget draws.
///
/// Wraps the renderer together with the widget's rectangle and the color
/// mask accumulated from its ancestors. The renderer is already clipped to
/// the widget's rectangle.
pub struct DrawContext<'a> {
    renderer: &'a mut dyn Renderer,
    rect: Rect,
    color_mask: Color,
}

impl<'a> DrawContext<'a> {
    /// Create a draw context.
    pub fn new(renderer: &'a mut dyn Renderer, rect: Rect, color_mask: Color) -> Self {
        Self {
            renderer,
            rect,
            color_mask,
        }
    }

    /// The widget's rectangle in screen coordinates.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The accumulated color mask.
    #[inline]
    pub fn color_mask(&self) -> Color {
        self.color_mask
    }

    /// Direct access to the renderer. Colors drawn this way are not masked.
    #[inline]
    pub fn renderer(&mut self) -> &mut dyn Renderer {
        &mut *self.renderer
    }

    /// Fill `rect` with `color` modulated by the color mask.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.renderer.fill_rect(rect, color.modulate(self.color_mask));
    }

    /// Draw a texture over `rect`, tinted and masked.
    pub fn draw_texture(&mut self, texture: TextureId, rect: Rect, tint: Color) {
        self.renderer
            .draw_texture(texture, rect, tint.modulate(self.color_mask));
    }

    /// Draw a background over the whole widget rectangle.
    pub fn draw_background(&mut self, background: &Background) {
        background.draw(&mut *self.renderer, self.rect, self.color_mask);
    }
}

/// The base trait for all widgets.
///
/// A widget is a rectangular node in the tree. Its structural state
/// (parent, children, focus) is owned by the [`WidgetTree`](super::WidgetTree);
/// the trait provides access to the per-widget [`WidgetBase`] and the hooks
/// the tree calls while routing events, ticking frames and drawing.
///
/// Every hook has a default. A widget that only needs a background can
/// implement the two required accessors and nothing else.
///
/// # Implementing Widget
///
/// ```
/// use trellis::prelude::*;
///
/// struct Clicker {
///     base: WidgetBase,
///     clicks: u32,
/// }
///
/// impl Widget for Clicker {
///     fn widget_base(&self) -> &WidgetBase { &self.base }
///     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
///
///     fn handle_event(&mut self, event: &Event, _ctx: &mut EventContext<'_>) -> bool {
///         if let Event::MouseButtonDown(_) = event {
///             self.clicks += 1;
///             return true;
///         }
///         false
///     }
/// }
/// ```
pub trait Widget: Any + Send + Sync {
    /// Get a reference to the widget base.
    fn widget_base(&self) -> &WidgetBase;

    /// Get a mutable reference to the widget base.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    /// A short type name for debug output.
    fn type_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Draw the widget. Children are drawn afterwards by the tree.
    ///
    /// The default draws the widget's background, if it has one.
    fn draw(&self, ctx: &mut DrawContext<'_>) {
        if let Some(background) = self.widget_base().background() {
            ctx.draw_background(background);
        }
    }

    /// Handle an input event. Return `true` if the event was consumed.
    fn handle_event(&mut self, _event: &Event, _ctx: &mut EventContext<'_>) -> bool {
        false
    }

    /// Per-frame tick.
    fn handle_frame(&mut self, _time: FrameTime, _ctx: &mut EventContext<'_>) {}

    /// Called after the widget's size changed.
    fn handle_resize(&mut self, _old: Size, _new: Size) {}

    /// Called after the widget's absolute position changed.
    fn handle_reposition(&mut self, _old: Point, _new: Point) {}

    /// Called when the widget joins the focus chain.
    fn handle_focus(&mut self) {}

    /// Called when the widget leaves the focus chain.
    fn handle_unfocus(&mut self) {}

    /// Called when the widget becomes the hovered widget.
    ///
    /// Only the deepest widget under the pointer is hovered. Containers on
    /// the path to it have their mouseover child updated, parent first,
    /// but their own hooks are not called; query
    /// [`WidgetTree::mouseover_child`](super::WidgetTree::mouseover_child)
    /// to see which child is hovered.
    fn handle_mouseover_on(&mut self) {}

    /// Called when the widget stops being the hovered widget.
    ///
    /// Fired before the new hover path is set, so the old path is still
    /// in place while this runs.
    fn handle_mouseover_off(&mut self) {}

    /// Called when the widget starts holding the mouse grab.
    fn handle_mouse_grab_on(&mut self) {}

    /// Called when the widget stops holding the mouse grab.
    fn handle_mouse_grab_off(&mut self) {}

    /// Called when the widget is pushed to or removed from the modal stack.
    fn handle_modal_change(&mut self, _modal: bool) {}
}

impl dyn Widget {
    /// Downcast to a concrete widget type.
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Mutably downcast to a concrete widget type.
    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}
