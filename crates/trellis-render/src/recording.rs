//! A headless renderer that records draw calls.
//!
//! Used by tests and by hosts that want to inspect what a frame would draw
//! without a graphics device.

use crate::background::TextureId;
use crate::renderer::{FrameStats, RenderStateStack, Renderer};
use crate::types::{Color, Rect, Size};

/// One recorded draw call, already clipped.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Frame clear.
    Clear { color: Color, viewport: Size },
    /// Solid rectangle.
    FillRect { rect: Rect, color: Color },
    /// Textured rectangle.
    Texture {
        texture: TextureId,
        rect: Rect,
        color: Color,
    },
}

impl DrawCommand {
    /// The clipped rectangle this command covers, if any.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            DrawCommand::Clear { .. } => None,
            DrawCommand::FillRect { rect, .. } | DrawCommand::Texture { rect, .. } => Some(*rect),
        }
    }
}

/// Records every draw call of the current frame.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    state: RenderStateStack,
    commands: Vec<DrawCommand>,
    stats: FrameStats,
    in_frame: bool,
}

impl RecordingRenderer {
    /// Create an idle recording renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last `begin_frame`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Rectangles of the recorded fill commands, in draw order.
    pub fn filled_rects(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, rect: Rect, make: impl FnOnce(Rect) -> DrawCommand) {
        if !self.in_frame {
            tracing::warn!(target: "trellis::render", "draw call outside begin_frame/end_frame");
        }
        match self.state.visible_part(rect) {
            Some(visible) => {
                self.commands.push(make(visible));
                self.stats.draw_calls += 1;
            }
            None => self.stats.culled += 1,
        }
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, clear_color: Color, viewport_size: Size) {
        self.commands.clear();
        self.stats = FrameStats::default();
        self.state.reset();
        self.in_frame = true;
        self.commands.push(DrawCommand::Clear {
            color: clear_color,
            viewport: viewport_size,
        });
    }

    fn end_frame(&mut self) -> FrameStats {
        if self.state.depth() != 0 {
            tracing::warn!(
                target: "trellis::render",
                depth = self.state.depth(),
                "frame ended with unbalanced save/restore"
            );
        }
        self.in_frame = false;
        self.stats
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.state.clip_rect(rect);
    }

    fn clip_bounds(&self) -> Option<Rect> {
        self.state.clip_bounds()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(rect, |rect| DrawCommand::FillRect { rect, color });
    }

    fn draw_texture(&mut self, texture: TextureId, rect: Rect, color: Color) {
        self.record(rect, |rect| DrawCommand::Texture {
            texture,
            rect,
            color,
        });
    }
}
