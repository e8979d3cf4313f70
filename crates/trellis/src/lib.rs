//! Trellis - a retained-mode widget tree for games and tools.
//!
//! Trellis is the structural core of a UI: a tree of rectangular widgets
//! that negotiate their sizes with each other, route input top-down and
//! bottom-up, and track focus, hover, mouse capture and modal overlays.
//! Concrete widgets (labels, buttons, game HUD elements) plug in through
//! the [`Widget`](widget::Widget) trait; the host application drives a
//! [`Screen`] once per loop iteration.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use trellis::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut screen = Screen::create(Size::new(640, 480), 32)?;
//!     let root = screen.root();
//!
//!     let tree = screen.tree_mut();
//!     let grid = tree.insert_layout(Panel::new("grid"), GridLayout::rows(3));
//!     tree.attach_child(root, grid)?;
//!     for i in 0..6 {
//!         let cell = tree.insert_leaf(
//!             Panel::new(format!("cell{i}"))
//!                 .with_size_properties(SizeProperties::new().with_min(Size::new(10, 10))),
//!         );
//!         tree.attach_child(grid, cell)?;
//!     }
//!     tree.resize(grid, Size::new(300, 200))?;
//!
//!     // One host loop iteration: events, frame tick, draw.
//!     screen.process_event(&Event::MouseMotion(MouseMotionEvent::new(Point::new(5, 5))));
//!     screen.process_frame(Duration::from_millis(16));
//!     let mut renderer = RecordingRenderer::new();
//!     screen.draw(&mut renderer);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod prelude;
mod screen;
pub mod widget;

pub use config::{RatioBasis, ScreenConfig};
pub use error::{ScreenError, TreeError, TreeResult};
pub use screen::Screen;

pub use trellis_core::{logging, signal, ConnectionGuard, ConnectionId, Signal};

/// Geometry and the draw-dispatch contract.
pub mod render {
    pub use trellis_render::*;
}
