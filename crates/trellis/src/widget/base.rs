//! Widget base implementation.
//!
//! `WidgetBase` holds the per-widget state every node in the tree carries:
//! geometry, size properties, visibility, enablement, input acceptance,
//! stacking band and background. Structural state (parent, children, focus
//! pointers) lives in the tree, not here.

use std::sync::Arc;

use trellis_core::Signal;
use trellis_render::{Background, Color, Point, Rect, Size};

use super::size_properties::SizeProperties;
use super::tree::WidgetId;

/// The rendering band a widget belongs to among its siblings.
///
/// Siblings are always ordered `Bottom`, then `Neutral`, then `Top`, so a
/// widget never draws above a higher band or below a lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StackPriority {
    /// Drawn beneath all other siblings.
    Bottom,
    /// The default band.
    #[default]
    Neutral,
    /// Drawn above all other siblings.
    Top,
}

/// The base state shared by all widgets.
///
/// Widget implementations include this as a field and return it from
/// [`Widget::widget_base`](super::Widget::widget_base).
///
/// # Example
///
/// ```
/// use trellis::widget::{StackPriority, Widget, WidgetBase};
///
/// struct Badge {
///     base: WidgetBase,
/// }
///
/// impl Widget for Badge {
///     fn widget_base(&self) -> &WidgetBase { &self.base }
///     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
/// }
///
/// let badge = Badge {
///     base: WidgetBase::new("badge").with_stack_priority(StackPriority::Top),
/// };
/// assert_eq!(badge.widget_base().name(), "badge");
/// ```
pub struct WidgetBase {
    name: String,
    parent: Option<WidgetId>,

    /// Absolute rectangle in screen coordinates.
    screen_rect: Rect,

    /// Effective bounds, derived from the preferred bounds and contents.
    size_properties: SizeProperties,

    /// Bounds exactly as requested by the owner of the widget.
    preferred_size_properties: SizeProperties,

    accepts_focus: bool,
    accepts_mouseover: bool,
    enabled: bool,
    hidden: bool,
    modal: bool,

    /// Set only on the widget at the end of the mouseover chain.
    mouseover: bool,

    stack_priority: StackPriority,
    color_mask: Color,
    background: Option<Arc<Background>>,

    /// Signal emitted with the new rectangle when the geometry changes.
    pub geometry_changed: Signal<Rect>,

    /// Signal emitted with the new visibility when it changes.
    pub visibility_changed: Signal<bool>,
}

impl std::fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBase")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("screen_rect", &self.screen_rect)
            .field("size_properties", &self.size_properties)
            .field("enabled", &self.enabled)
            .field("hidden", &self.hidden)
            .field("modal", &self.modal)
            .field("stack_priority", &self.stack_priority)
            .finish_non_exhaustive()
    }
}

impl WidgetBase {
    /// Create a widget base with default state.
    ///
    /// A new widget is visible, enabled, accepts mouseover but not focus,
    /// sits in the `Neutral` band and has no size constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            screen_rect: Rect::ZERO,
            size_properties: SizeProperties::new(),
            preferred_size_properties: SizeProperties::new(),
            accepts_focus: false,
            accepts_mouseover: true,
            enabled: true,
            hidden: false,
            modal: false,
            mouseover: false,
            stack_priority: StackPriority::Neutral,
            color_mask: Color::WHITE,
            background: None,
            geometry_changed: Signal::new(),
            visibility_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Builder: whether the widget can take keyboard focus.
    pub fn with_accepts_focus(mut self, accepts: bool) -> Self {
        self.accepts_focus = accepts;
        self
    }

    /// Builder: whether the widget participates in mouseover.
    pub fn with_accepts_mouseover(mut self, accepts: bool) -> Self {
        self.accepts_mouseover = accepts;
        self
    }

    /// Builder: the initial stacking band.
    pub fn with_stack_priority(mut self, priority: StackPriority) -> Self {
        self.stack_priority = priority;
        self
    }

    /// Builder: the background drawn by the default `draw`.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(Arc::new(background));
        self
    }

    /// Builder: the color mask applied to this widget and its subtree.
    pub fn with_color_mask(mut self, mask: Color) -> Self {
        self.color_mask = mask;
        self
    }

    /// Builder: initial preferred size properties.
    pub fn with_size_properties(mut self, properties: SizeProperties) -> Self {
        self.preferred_size_properties = properties;
        self.size_properties = properties;
        self.screen_rect.size = properties.clamp(self.screen_rect.size);
        self
    }

    /// Builder: initial size, clamped to the size properties.
    pub fn with_size(mut self, size: Size) -> Self {
        self.screen_rect.size = self.size_properties.clamp(size);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The widget's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the widget.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The parent handle, if attached.
    #[inline]
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// The absolute rectangle in screen coordinates.
    #[inline]
    pub fn screen_rect(&self) -> Rect {
        self.screen_rect
    }

    /// The absolute top-left corner.
    #[inline]
    pub fn position(&self) -> Point {
        self.screen_rect.origin
    }

    /// The current size.
    #[inline]
    pub fn size(&self) -> Size {
        self.screen_rect.size
    }

    /// The effective size properties.
    #[inline]
    pub fn size_properties(&self) -> &SizeProperties {
        &self.size_properties
    }

    /// The size properties as requested, before contents are combined in.
    #[inline]
    pub fn preferred_size_properties(&self) -> &SizeProperties {
        &self.preferred_size_properties
    }

    /// Whether the widget can take keyboard focus.
    #[inline]
    pub fn accepts_focus(&self) -> bool {
        self.accepts_focus
    }

    /// Whether the widget participates in mouseover.
    #[inline]
    pub fn accepts_mouseover(&self) -> bool {
        self.accepts_mouseover
    }

    /// Whether the widget is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the widget is hidden.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the widget is visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// Whether the widget is on its root's modal stack.
    #[inline]
    pub fn is_modal(&self) -> bool {
        self.modal
    }

    /// Whether this widget is the one currently under the pointer.
    #[inline]
    pub fn is_mouseover(&self) -> bool {
        self.mouseover
    }

    /// The stacking band.
    #[inline]
    pub fn stack_priority(&self) -> StackPriority {
        self.stack_priority
    }

    /// The color mask.
    #[inline]
    pub fn color_mask(&self) -> Color {
        self.color_mask
    }

    /// Set the color mask. Takes effect on the next draw.
    pub fn set_color_mask(&mut self, mask: Color) {
        self.color_mask = mask;
    }

    /// The background, if any.
    pub fn background(&self) -> Option<&Arc<Background>> {
        self.background.as_ref()
    }

    /// Set or clear the background. Backgrounds are shared, not owned.
    pub fn set_background(&mut self, background: Option<Arc<Background>>) {
        self.background = background;
    }

    /// Whether `point` lies within the widget's rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.screen_rect.contains(point)
    }

    // =========================================================================
    // Tree-managed state
    // =========================================================================

    pub(crate) fn set_parent(&mut self, parent: Option<WidgetId>) {
        self.parent = parent;
    }

    pub(crate) fn set_screen_rect(&mut self, rect: Rect) {
        if self.screen_rect != rect {
            self.screen_rect = rect;
            self.geometry_changed.emit(rect);
        }
    }

    pub(crate) fn set_size_properties(&mut self, properties: SizeProperties) {
        self.size_properties = properties;
    }

    pub(crate) fn preferred_size_properties_mut(&mut self) -> &mut SizeProperties {
        &mut self.preferred_size_properties
    }

    pub(crate) fn set_accepts_focus(&mut self, accepts: bool) {
        self.accepts_focus = accepts;
    }

    pub(crate) fn set_accepts_mouseover(&mut self, accepts: bool) {
        self.accepts_mouseover = accepts;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        if self.hidden != hidden {
            self.hidden = hidden;
            self.visibility_changed.emit(!hidden);
        }
    }

    pub(crate) fn set_modal(&mut self, modal: bool) {
        self.modal = modal;
    }

    pub(crate) fn set_mouseover(&mut self, mouseover: bool) {
        self.mouseover = mouseover;
    }

    pub(crate) fn set_stack_priority(&mut self, priority: StackPriority) {
        self.stack_priority = priority;
    }
}

static_assertions::assert_impl_all!(WidgetBase: Send, Sync);
