//! The widget system.
//!
//! This module provides the widget tree and everything that runs over it:
//!
//! - [`Widget`] trait: the override points of a concrete widget
//! - [`WidgetBase`]: state every widget carries
//! - [`WidgetTree`]: the arena that owns widgets and their relations
//! - [`SizeProperties`]: min/max bounds driving size negotiation
//! - [`layout`]: grid allocation and padded cells
//!
//! # Overview
//!
//! Every widget lives in a [`WidgetTree`] and is addressed by a
//! [`WidgetId`]. The tree owns parent/child structure, keyboard focus,
//! mouseover, the mouse grab and the modal stack; widgets only see their
//! own [`WidgetBase`] and the hooks the tree calls on them.
//!
//! # Creating a Widget
//!
//! 1. Define a struct with a `WidgetBase` field
//! 2. Implement the two required [`Widget`] accessors
//! 3. Override whichever hooks the widget needs
//!
//! ```
//! use trellis::prelude::*;
//!
//! struct Swatch {
//!     base: WidgetBase,
//!     color: Color,
//! }
//!
//! impl Widget for Swatch {
//!     fn widget_base(&self) -> &WidgetBase { &self.base }
//!     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
//!
//!     fn draw(&self, ctx: &mut DrawContext<'_>) {
//!         let rect = ctx.rect();
//!         let color = if self.base.is_mouseover() { Color::WHITE } else { self.color };
//!         ctx.fill_rect(rect, color);
//!     }
//! }
//!
//! let mut tree = WidgetTree::new();
//! let swatch = tree.insert_leaf(Swatch { base: WidgetBase::new("swatch"), color: Color::RED });
//! assert_eq!(tree.widget::<Swatch>(swatch).map(|s| s.color), Some(Color::RED));
//! ```
//!
//! # Size Negotiation
//!
//! A widget's effective [`SizeProperties`] combine its own preferred bounds
//! with the bounds its contents impose. Resizes are clamped to those
//! bounds. When a child's bounds or size change, its container recomputes
//! its own and re-arranges, and the change propagates up until nothing
//! moves. [`ChildResizeBlocker`] batches that work while a container is
//! being filled.
//!
//! # Coordinates
//!
//! Rectangles are absolute screen coordinates. A widget attached to a
//! container is taken to be positioned relative to it and is translated
//! accordingly; detaching translates it back.

mod base;
mod blocker;
mod context;
mod dispatch;
mod draw;
mod events;
mod focus;
pub mod layout;
mod modal;
mod mouseover;
mod size_properties;
mod sizing;
mod traits;
mod tree;
pub mod widgets;

#[cfg(test)]
mod tests;

pub use base::{StackPriority, WidgetBase};
pub use blocker::ChildResizeBlocker;
pub use context::{EventContext, TreeCommand};
pub use events::{
    Event, FrameTime, Key, KeyEvent, KeyboardModifiers, MouseButton, MouseButtonEvent,
    MouseMotionEvent, MouseWheelEvent,
};
pub use layout::{
    distribute, Alignment, Alignment2, CellInfo, CellPadding, GridLayout, LineBounds,
    MajorDirection,
};
pub use size_properties::{SizeProperties, SizeProperty};
pub use traits::{DrawContext, Widget};
pub use tree::{NodeKind, WidgetId, WidgetTree};
pub use widgets::Panel;
