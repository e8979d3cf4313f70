//! Screen geometry and the draw-dispatch contract for Trellis.
//!
//! The widget tree never rasterizes anything itself. It walks the visible
//! widgets and hands each one a [`Renderer`] to draw through; the host
//! application supplies the implementation (GPU, software, or the headless
//! [`RecordingRenderer`] used in tests).
//!
//! # Example
//!
//! ```
//! use trellis_render::{Color, Rect, RecordingRenderer, Renderer, Size};
//!
//! let mut renderer = RecordingRenderer::new();
//! renderer.begin_frame(Color::BLACK, Size::new(320, 240));
//! renderer.fill_rect(Rect::new(10, 10, 50, 20), Color::RED);
//! let stats = renderer.end_frame();
//! assert_eq!(stats.draw_calls, 1);
//! ```

mod background;
mod recording;
mod renderer;
mod types;

pub use background::{Background, TextureId};
pub use recording::{DrawCommand, RecordingRenderer};
pub use renderer::{FrameStats, RenderState, RenderStateStack, Renderer};
pub use types::{Axis, Color, Point, Rect, ScreenCoord, Size};
