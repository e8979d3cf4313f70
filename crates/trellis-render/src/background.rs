//! Widget backgrounds.
//!
//! A background is a shared, immutable description of what fills a widget's
//! rectangle before the widget draws its own content. Widgets hold it behind
//! an `Arc` so one skin can back many widgets.

use crate::renderer::Renderer;
use crate::types::{Color, Rect};

/// Opaque handle to a texture owned by the host's resource system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// What fills a widget's rectangle.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// A flat color.
    Solid(Color),
    /// A texture stretched over the rectangle, multiplied by `tint`.
    Texture {
        /// The texture to draw.
        texture: TextureId,
        /// Tint applied before the widget color mask.
        tint: Color,
    },
}

impl Background {
    /// Draw this background over `rect` with `mask` applied.
    pub fn draw(&self, renderer: &mut dyn Renderer, rect: Rect, mask: Color) {
        match self {
            Background::Solid(color) => renderer.fill_rect(rect, color.modulate(mask)),
            Background::Texture { texture, tint } => {
                renderer.draw_texture(*texture, rect, tint.modulate(mask));
            }
        }
    }
}
