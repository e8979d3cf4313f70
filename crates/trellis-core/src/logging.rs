//! Logging and debugging facilities for Trellis.
//!
//! This module provides:
//! - `tracing` targets and span names used across the workspace
//! - [`PerfSpan`] guards for timing frame and draw passes
//! - [`TreeFormatter`], a text renderer for any hierarchy implementing [`DebugTree`]
//!
//! # Tracing Integration
//!
//! Trellis logs through the `tracing` crate. To see logs, install a
//! subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis::focus=trace,trellis::layout=debug")
//!     .init();
//! ```

use std::fmt::{self, Write as FmtWrite};

/// Span names used throughout Trellis for tracing.
pub mod span_names {
    /// Per-frame tick over the widget tree.
    pub const FRAME: &str = "trellis::frame";
    /// Draw pass over the widget tree.
    pub const DRAW: &str = "trellis::draw";
    /// Single event dispatch.
    pub const EVENT: &str = "trellis::event";
    /// Layout allocation pass.
    pub const LAYOUT: &str = "trellis::layout";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core infrastructure target.
    pub const CORE: &str = "trellis_core";
    /// Signal emission target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Tree structure (attach, detach, destroy, restacking).
    pub const TREE: &str = "trellis::tree";
    /// Size negotiation (resize, size properties, main widget).
    pub const SIZE: &str = "trellis::size";
    /// Focus and mouse grab.
    pub const FOCUS: &str = "trellis::focus";
    /// Mouseover tracking.
    pub const MOUSEOVER: &str = "trellis::mouseover";
    /// Modal stack.
    pub const MODAL: &str = "trellis::modal";
    /// Grid layout allocation.
    pub const LAYOUT: &str = "trellis::layout";
    /// Event routing.
    pub const EVENT: &str = "trellis::event";
    /// Screen and host loop.
    pub const SCREEN: &str = "trellis::screen";
    /// Performance spans.
    pub const PERF: &str = "trellis::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indentation only.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node ids.
    pub show_ids: bool,
    /// Whether to show type names.
    pub show_types: bool,
    /// Whether to show the per-node detail strings.
    pub show_details: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_types: true,
            show_details: false,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_details: true,
            ..Default::default()
        }
    }

    /// Options for minimal output: names only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_types: false,
            show_details: false,
            ..Default::default()
        }
    }
}

/// What a [`DebugTree`] reports about one node.
#[derive(Debug, Clone, Default)]
pub struct NodeLabel {
    /// Display name of the node (may be empty).
    pub name: String,
    /// Short type name of the node's behavior.
    pub type_name: &'static str,
    /// Free-form annotations, printed after the name when details are on.
    pub details: Vec<String>,
}

/// A hierarchy that [`TreeFormatter`] can print.
pub trait DebugTree {
    /// Node handle type.
    type Id: Copy + fmt::Debug;

    /// Nodes with no parent, in a stable order.
    fn debug_roots(&self) -> Vec<Self::Id>;

    /// Label for a node, or `None` if the handle is stale.
    fn debug_label(&self, id: Self::Id) -> Option<NodeLabel>;

    /// Children of a node in draw order.
    fn debug_children(&self, id: Self::Id) -> Vec<Self::Id>;
}

/// Renders a [`DebugTree`] as indented text.
#[derive(Debug, Clone, Default)]
pub struct TreeFormatter {
    options: TreeFormatOptions,
}

impl TreeFormatter {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every root of the tree.
    pub fn format_all<T: DebugTree>(&self, tree: &T) -> String {
        let roots = tree.debug_roots();
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(output, "Widget Tree ({} roots):", roots.len());
        if roots.is_empty() {
            let _ = writeln!(output, "  (empty)");
        }
        for root in roots {
            let _ = self.write_subtree(tree, root, &mut Vec::new(), &mut output);
        }
        output
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree<T: DebugTree>(&self, tree: &T, root: T::Id) -> String {
        let mut output = String::new();
        let _ = self.write_subtree(tree, root, &mut Vec::new(), &mut output);
        output
    }

    /// `lasts` holds, for each ancestor level, whether that ancestor was the
    /// last of its siblings.
    fn write_subtree<T: DebugTree>(
        &self,
        tree: &T,
        id: T::Id,
        lasts: &mut Vec<bool>,
        out: &mut String,
    ) -> fmt::Result {
        let depth = lasts.len();
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }
        let Some(label) = tree.debug_label(id) else {
            return writeln!(out, "{}(stale {:?})", self.prefix(lasts), id);
        };

        out.push_str(&self.prefix(lasts));
        out.push_str(if label.name.is_empty() { "(unnamed)" } else { &label.name });
        if self.options.show_ids {
            write!(out, " [{:?}]", id)?;
        }
        if self.options.show_types {
            write!(out, " ({})", label.type_name)?;
        }
        if self.options.show_details && !label.details.is_empty() {
            write!(out, " {{{}}}", label.details.join(", "))?;
        }
        out.push('\n');

        let children = tree.debug_children(id);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            lasts.push(i + 1 == count);
            self.write_subtree(tree, child, lasts, out)?;
            lasts.pop();
        }
        Ok(())
    }

    fn prefix(&self, lasts: &[bool]) -> String {
        let Some((&is_last, ancestors)) = lasts.split_last() else {
            return String::new();
        };
        let (pipe, tee, corner, blank) = match self.options.style {
            TreeStyle::Ascii => ("|   ", "+-- ", "`-- ", "    "),
            TreeStyle::Unicode => ("\u{2502}   ", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} ", "    "),
            TreeStyle::Compact => ("  ", "- ", "- ", "  "),
        };

        let mut prefix = String::new();
        for &ancestor_last in ancestors {
            prefix.push_str(if ancestor_last { blank } else { pipe });
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for measuring the duration of frame and draw passes.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span named `name`.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A fixed hierarchy: 0 -> (1 -> (3), 2).
    struct Fixture;

    impl DebugTree for Fixture {
        type Id = usize;

        fn debug_roots(&self) -> Vec<usize> {
            vec![0]
        }

        fn debug_label(&self, id: usize) -> Option<NodeLabel> {
            let name = ["window", "panel", "button", "label"].get(id)?;
            Some(NodeLabel {
                name: name.to_string(),
                type_name: "Fixture",
                details: vec![format!("depth={}", usize::from(id > 0) + usize::from(id == 3))],
            })
        }

        fn debug_children(&self, id: usize) -> Vec<usize> {
            match id {
                0 => vec![1, 2],
                1 => vec![3],
                _ => Vec::new(),
            }
        }
    }

    #[test]
    fn test_tree_format_hierarchy() {
        let output = TreeFormatter::new().format_subtree(&Fixture, 0);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("window [0] (Fixture)"));
        assert!(lines[1].starts_with("\u{251c}\u{2500}\u{2500} panel"));
        assert!(lines[2].starts_with("\u{2502}   \u{2514}\u{2500}\u{2500} label"));
        assert!(lines[3].starts_with("\u{2514}\u{2500}\u{2500} button"));
    }

    #[test]
    fn test_tree_format_minimal() {
        let formatter = TreeFormatter::with_options(TreeFormatOptions::minimal());
        let output = formatter.format_subtree(&Fixture, 0);

        assert!(output.contains("window"));
        assert!(!output.contains("Fixture"));
        assert!(!output.contains('['));
    }

    #[test]
    fn test_tree_format_details_and_depth() {
        let formatter = TreeFormatter::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            max_depth: Some(1),
            ..TreeFormatOptions::detailed()
        });
        let output = formatter.format_all(&Fixture);

        assert!(output.starts_with("Widget Tree (1 roots):"));
        assert!(output.contains("+-- panel [1] (Fixture) {depth=1}"));
        assert!(!output.contains("label"));
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }
}
