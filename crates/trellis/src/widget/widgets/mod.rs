//! Stock widgets.
//!
//! The tree itself is agnostic to what widgets draw or how they react to
//! input. [`Panel`] is the one stock widget: a plain rectangle that can act
//! as a leaf, a container, a grid layout or a padded cell depending on the
//! [`NodeKind`](super::NodeKind) it is inserted with.

mod panel;

pub use panel::Panel;
