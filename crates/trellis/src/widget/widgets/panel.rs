//! Panel widget implementation.
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//!
//! let panel = Panel::new("sidebar")
//!     .with_background(Background::Solid(Color::GRAY))
//!     .with_border(Color::WHITE, 1)
//!     .with_size_properties(SizeProperties::new().with_min(Size::new(120, 0)));
//! assert_eq!(panel.widget_base().name(), "sidebar");
//! assert_eq!(panel.border(), Some((Color::WHITE, 1)));
//! ```

use trellis_render::{Background, Color, Rect, ScreenCoord, Size};

use crate::widget::{DrawContext, SizeProperties, StackPriority, Widget, WidgetBase};

/// A plain rectangle with an optional background and border.
///
/// Panels are the general-purpose widget of the tree. Inserted as a
/// container, layout or cell they group other widgets; as a leaf they are
/// a spacer or a colored block.
pub struct Panel {
    base: WidgetBase,

    /// Border color and width in pixels.
    border: Option<(Color, ScreenCoord)>,
}

impl Panel {
    /// Create a panel with no background and no border.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(name),
            border: None,
        }
    }

    /// Builder: preferred size properties.
    pub fn with_size_properties(mut self, properties: SizeProperties) -> Self {
        self.base = self.base.with_size_properties(properties);
        self
    }

    /// Builder: initial size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.base = self.base.with_size(size);
        self
    }

    /// Builder: whether the panel takes keyboard focus.
    pub fn with_accepts_focus(mut self, accepts: bool) -> Self {
        self.base = self.base.with_accepts_focus(accepts);
        self
    }

    /// Builder: whether the panel takes part in mouseover.
    pub fn with_accepts_mouseover(mut self, accepts: bool) -> Self {
        self.base = self.base.with_accepts_mouseover(accepts);
        self
    }

    /// Builder: the stacking band.
    pub fn with_stack_priority(mut self, priority: StackPriority) -> Self {
        self.base = self.base.with_stack_priority(priority);
        self
    }

    /// Builder: the background.
    pub fn with_background(mut self, background: Background) -> Self {
        self.base = self.base.with_background(background);
        self
    }

    /// Builder: the color mask for the panel and its subtree.
    pub fn with_color_mask(mut self, mask: Color) -> Self {
        self.base = self.base.with_color_mask(mask);
        self
    }

    /// Builder: a border of `width` pixels drawn inside the rectangle.
    pub fn with_border(mut self, color: Color, width: ScreenCoord) -> Self {
        self.set_border(Some((color, width)));
        self
    }

    /// Border color and width.
    pub fn border(&self) -> Option<(Color, ScreenCoord)> {
        self.border
    }

    /// Set or clear the border. Non-positive widths clear it.
    pub fn set_border(&mut self, border: Option<(Color, ScreenCoord)>) {
        self.border = border.filter(|&(_, width)| width > 0);
    }

    fn draw_border(ctx: &mut DrawContext<'_>, color: Color, width: ScreenCoord) {
        let r = ctx.rect();
        let w = width.min(r.width() / 2).min(r.height() / 2).max(0);
        if w == 0 {
            return;
        }
        ctx.fill_rect(Rect::new(r.left(), r.top(), r.width(), w), color);
        ctx.fill_rect(Rect::new(r.left(), r.bottom() - w, r.width(), w), color);
        ctx.fill_rect(Rect::new(r.left(), r.top() + w, w, r.height() - 2 * w), color);
        ctx.fill_rect(Rect::new(r.right() - w, r.top() + w, w, r.height() - 2 * w), color);
    }
}

impl Widget for Panel {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        if let Some(background) = self.base.background() {
            ctx.draw_background(background);
        }
        if let Some((color, width)) = self.border {
            Self::draw_border(ctx, color, width);
        }
    }
}

static_assertions::assert_impl_all!(Panel: Send, Sync);
