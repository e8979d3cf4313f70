//! The draw-dispatch contract.
//!
//! [`Renderer`] is the only surface the widget tree draws through. It is
//! object safe so the tree can hold it as `&mut dyn Renderer` while walking
//! widgets of unrelated concrete types.

use crate::background::TextureId;
use crate::types::{Color, Rect, Size};

/// Statistics from a frame render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Number of draw calls submitted.
    pub draw_calls: u32,
    /// Number of draw calls discarded because they fell outside the clip.
    pub culled: u32,
}

/// The 2D rendering interface the widget tree draws through.
///
/// # Frame Lifecycle
///
/// ```ignore
/// renderer.begin_frame(clear_color, viewport_size);
///
/// renderer.save();
/// renderer.clip_rect(widget_rect);
/// renderer.fill_rect(widget_rect, Color::RED);
/// renderer.restore();
///
/// let stats = renderer.end_frame();
/// ```
///
/// # State Stack
///
/// The renderer maintains a state stack of clip regions that can be saved
/// and restored; [`RenderStateStack`] is a reusable implementation.
pub trait Renderer {
    /// Begin a new frame, cleared to `clear_color`.
    fn begin_frame(&mut self, clear_color: Color, viewport_size: Size);

    /// End the current frame and present it.
    fn end_frame(&mut self) -> FrameStats;

    /// Save the current state (clip).
    fn save(&mut self);

    /// Restore the most recently saved state.
    fn restore(&mut self);

    /// Intersect the current clip with `rect`.
    fn clip_rect(&mut self, rect: Rect);

    /// The current clip bounds, or `None` when unclipped.
    fn clip_bounds(&self) -> Option<Rect>;

    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a texture stretched over `rect`, multiplied by `color`.
    fn draw_texture(&mut self, texture: TextureId, rect: Rect, color: Color);
}

/// Saved renderer state for save/restore operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    /// Clip rect at this state. `Some(Rect::ZERO)` clips everything.
    pub clip: Option<Rect>,
}

/// Common state management for renderers.
///
/// Provides the save/restore and clip bookkeeping that renderer
/// implementations share.
#[derive(Debug, Clone, Default)]
pub struct RenderStateStack {
    stack: Vec<RenderState>,
    current: RenderState,
}

impl RenderStateStack {
    /// Create a new state stack with default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state.
    #[inline]
    pub fn current(&self) -> &RenderState {
        &self.current
    }

    /// Save the current state.
    pub fn save(&mut self) {
        self.stack.push(self.current);
    }

    /// Restore the previously saved state.
    pub fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.current = state,
            None => tracing::warn!(target: "trellis::render", "restore without matching save"),
        }
    }

    /// Reset to default state and clear the stack.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.current = RenderState::default();
    }

    /// Intersect the clip with `rect`.
    pub fn clip_rect(&mut self, rect: Rect) {
        self.current.clip = match self.current.clip {
            Some(existing) => Some(existing.intersect(&rect).unwrap_or(Rect::ZERO)),
            None => Some(rect),
        };
    }

    /// Get the current clip bounds.
    #[inline]
    pub fn clip_bounds(&self) -> Option<Rect> {
        self.current.clip
    }

    /// Clip `rect` against the current clip, or `None` if nothing remains.
    pub fn visible_part(&self, rect: Rect) -> Option<Rect> {
        match self.current.clip {
            Some(clip) => clip.intersect(&rect),
            None if rect.is_empty() => None,
            None => Some(rect),
        }
    }

    /// Get the stack depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
