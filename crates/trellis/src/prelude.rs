//! Prelude module for Trellis.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```
//! use trellis::prelude::*;
//! ```
//!
//! This provides access to:
//! - The screen and its configuration (`Screen`, `ScreenConfig`)
//! - The widget tree (`WidgetTree`, `WidgetId`, `NodeKind`)
//! - Widget foundation (`Widget`, `WidgetBase`, `DrawContext`, `EventContext`)
//! - Layout (`GridLayout`, `CellPadding`, `SizeProperties`)
//! - Events and geometry (`Event`, `Point`, `Size`, `Rect`, `Color`)

// ============================================================================
// Screen
// ============================================================================

pub use crate::{Screen, ScreenConfig, ScreenError, TreeError, TreeResult};

// ============================================================================
// Signals
// ============================================================================

pub use trellis_core::{ConnectionId, Signal};

// ============================================================================
// Widget Foundation
// ============================================================================

pub use crate::widget::{
    ChildResizeBlocker, DrawContext, EventContext, NodeKind, Panel, StackPriority, TreeCommand,
    Widget, WidgetBase, WidgetId, WidgetTree,
};

// ============================================================================
// Size Negotiation and Layout
// ============================================================================

pub use crate::widget::{
    Alignment, Alignment2, CellPadding, GridLayout, MajorDirection, SizeProperties, SizeProperty,
};

// ============================================================================
// Events
// ============================================================================

pub use crate::widget::{
    Event, FrameTime, Key, KeyEvent, KeyboardModifiers, MouseButton, MouseButtonEvent,
    MouseMotionEvent, MouseWheelEvent,
};

// ============================================================================
// Geometry and Rendering
// ============================================================================

pub use trellis_render::{
    Axis, Background, Color, FrameStats, Point, RecordingRenderer, Rect, Renderer, ScreenCoord,
    Size,
};
