//! The screen: the root of the widget tree and the host's entry point.
//!
//! A host drives the screen once per loop iteration:
//!
//! 1. [`Screen::process_event`] for each pending input event
//! 2. [`Screen::process_frame`] with the current time
//! 3. [`Screen::draw`] with the host's renderer
//!
//! Commands queued by widget hooks are applied before `process_event` and
//! `process_frame` return, so the tree is structurally settled whenever the
//! host gets control back.

use std::time::Duration;

use trellis_core::logging::{span_names, targets, PerfSpan, TreeFormatOptions, TreeFormatter};
use trellis_render::{FrameStats, Point, Renderer, Size};

use crate::config::{validate_size, ScreenConfig};
use crate::error::ScreenError;
use crate::widget::{Event, FrameTime, NodeKind, Panel, SizeProperties, WidgetId, WidgetTree};

/// The root container covering the whole screen.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use trellis::prelude::*;
///
/// let mut screen = Screen::create(Size::new(320, 240), 32)?;
/// let root = screen.root();
/// let button = screen.tree_mut().add_child(
///     root,
///     Panel::new("button").with_accepts_focus(true).with_size(Size::new(50, 20)),
///     NodeKind::Leaf,
/// )?;
///
/// let click = MouseButtonEvent::new(MouseButton::Left, Point::new(10, 10));
/// screen.process_event(&Event::MouseButtonDown(click));
/// assert!(screen.tree().is_focused(button));
///
/// screen.process_frame(Duration::from_millis(16));
/// assert_eq!(screen.tree().mouseover_widget(root), Some(button));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Screen {
    tree: WidgetTree,
    root: WidgetId,
    config: ScreenConfig,
    pointer: Option<Point>,
    last_frame: Option<Duration>,
    quit_requested: bool,
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("pointer", &self.pointer)
            .field("quit_requested", &self.quit_requested)
            .finish_non_exhaustive()
    }
}

impl Screen {
    /// Create a screen of `size` for a host surface of `pixel_depth` bits.
    pub fn create(size: Size, pixel_depth: u32) -> Result<Self, ScreenError> {
        Self::with_config(ScreenConfig::new(size).with_pixel_depth(pixel_depth))
    }

    /// Create a screen from a full configuration.
    pub fn with_config(config: ScreenConfig) -> Result<Self, ScreenError> {
        config.validate()?;

        let mut tree = WidgetTree::new();
        tree.set_ratio_basis(config.ratio_basis.resolve(config.size));
        let root = tree.insert(
            Panel::new("screen")
                .with_accepts_mouseover(false)
                .with_size_properties(SizeProperties::fixed(config.size)),
            NodeKind::Container,
        );

        tracing::debug!(
            target: targets::SCREEN,
            size = ?config.size,
            pixel_depth = config.pixel_depth,
            "created screen"
        );
        Ok(Self {
            tree,
            root,
            config,
            pointer: None,
            last_frame: None,
            quit_requested: false,
        })
    }

    /// The root container.
    #[inline]
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// The widget tree.
    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// The widget tree, for building and mutating the hierarchy.
    #[inline]
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The screen size.
    #[inline]
    pub fn size(&self) -> Size {
        self.config.size
    }

    /// The configuration the screen runs with.
    #[inline]
    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// The last known pointer position.
    #[inline]
    pub fn pointer_position(&self) -> Option<Point> {
        self.pointer
    }

    /// Resize the screen after a host window change.
    ///
    /// The ratio basis follows the new size; bounds already derived from
    /// ratios are not recomputed.
    pub fn resize(&mut self, size: Size) -> Result<(), ScreenError> {
        validate_size(size)?;
        if size == self.config.size {
            return Ok(());
        }
        self.config.size = size;
        self.tree
            .set_ratio_basis(self.config.ratio_basis.resolve(size));
        // The root always exists; failure here would mean a broken tree.
        if let Err(error) = self
            .tree
            .update_size_properties(self.root, |props| *props = SizeProperties::fixed(size))
        {
            tracing::error!(target: targets::SCREEN, %error, "screen root missing");
        }
        tracing::debug!(target: targets::SCREEN, ?size, "resized screen");
        self.refresh_mouseover();
        Ok(())
    }

    /// Ask the host loop to stop.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Whether a quit was requested by the host, an `Event::Quit` or a
    /// widget.
    #[inline]
    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Deliver one input event. Returns whether a widget consumed it.
    ///
    /// A mouse button press first offers focus to whatever lies under the
    /// pointer, unless the mouse is grabbed. Pointer motion updates
    /// mouseover after the event has been routed.
    pub fn process_event(&mut self, event: &Event) -> bool {
        if let Event::Quit = event {
            tracing::debug!(target: targets::SCREEN, "quit requested by host");
            self.quit_requested = true;
            return true;
        }
        let _perf = PerfSpan::new(span_names::EVENT);

        if let Some(point) = event.position() {
            self.pointer = Some(point);
        }
        if let Event::MouseButtonDown(press) = event
            && !self.tree.focus_has_mouse_grab(self.root)
        {
            self.tree.route_focus(self.root, press.position);
        }

        let handled = self.tree.dispatch_event(self.root, event);
        self.settle();

        if let Event::MouseMotion(_) = event {
            self.refresh_mouseover();
        }
        handled
    }

    /// Run the frame tick over the whole tree.
    ///
    /// `time` is the host's clock; hooks receive it along with the time
    /// since the previous call.
    pub fn process_frame(&mut self, time: Duration) {
        let _perf = PerfSpan::new(span_names::FRAME);
        let delta = self
            .last_frame
            .map(|last| time.saturating_sub(last))
            .unwrap_or_default();
        self.last_frame = Some(time);

        self.tree.process_frame(self.root, FrameTime { time, delta });
        self.settle();
        self.refresh_mouseover();
    }

    /// Draw the tree through `renderer`.
    pub fn draw(&self, renderer: &mut dyn Renderer) -> FrameStats {
        let _perf = PerfSpan::new(span_names::DRAW);
        renderer.begin_frame(self.config.clear_color, self.config.size);
        self.tree.draw(self.root, renderer);
        let stats = renderer.end_frame();
        tracing::trace!(
            target: targets::SCREEN,
            draw_calls = stats.draw_calls,
            culled = stats.culled,
            "drew frame"
        );
        stats
    }

    /// The tree rendered as text, with per-widget state.
    pub fn debug_tree(&self) -> String {
        TreeFormatter::with_options(TreeFormatOptions::detailed()).format_subtree(&self.tree, self.root)
    }

    fn settle(&mut self) {
        self.tree.flush_commands();
        if self.tree.take_quit_request() {
            tracing::debug!(target: targets::SCREEN, "quit requested by widget");
            self.quit_requested = true;
        }
    }

    fn refresh_mouseover(&mut self) {
        if let Err(error) = self.tree.update_mouseover(self.root, self.pointer) {
            tracing::error!(target: targets::SCREEN, %error, "screen root missing");
        }
    }
}

static_assertions::assert_impl_all!(Screen: Send, Sync);
