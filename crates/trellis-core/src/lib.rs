//! Core infrastructure for Trellis.
//!
//! This crate holds the pieces of the framework that do not depend on the
//! widget tree itself:
//!
//! - **Logging**: `tracing` targets and [`PerfSpan`] guards
//! - **Tree debugging**: [`TreeFormatter`] renders any [`DebugTree`] as text
//! - **Signals**: [`Signal<Args>`] for synchronous change notification
//!
//! # Signal Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let resized = Signal::<(i32, i32)>::new();
//! let id = resized.connect(|(w, h)| {
//!     println!("resized to {w}x{h}");
//! });
//!
//! resized.emit((640, 480));
//! resized.disconnect(id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::{DebugTree, NodeLabel, PerfSpan, TreeFormatOptions, TreeFormatter, TreeStyle};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
