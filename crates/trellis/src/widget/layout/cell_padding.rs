//! Single-child padded cells.

use trellis_render::{Axis, Point, Rect, ScreenCoord, Size};

use crate::widget::size_properties::SizeProperties;

/// Where a child sits along one axis when it is smaller than its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Flush with the left or top edge.
    Start,
    /// Centered.
    #[default]
    Center,
    /// Flush with the right or bottom edge.
    End,
}

impl Alignment {
    /// Offset of an item within `free` leftover space.
    pub fn offset(self, free: ScreenCoord) -> ScreenCoord {
        let free = free.max(0);
        match self {
            Alignment::Start => 0,
            Alignment::Center => free / 2,
            Alignment::End => free,
        }
    }
}

/// Alignment on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Alignment2 {
    /// Horizontal alignment.
    pub x: Alignment,
    /// Vertical alignment.
    pub y: Alignment,
}

impl Alignment2 {
    /// The same alignment on both axes.
    pub const fn splat(alignment: Alignment) -> Self {
        Self {
            x: alignment,
            y: alignment,
        }
    }

    /// Alignment on `axis`.
    pub fn get(self, axis: Axis) -> Alignment {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Positions a single child inside padding.
///
/// The cell is never smaller than its child's minimum plus the padding on
/// both sides, nor larger than the child's maximum plus the padding. The
/// child is resized to the area inside the padding and then aligned there,
/// which matters when its own maximum keeps it smaller than that area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellPadding {
    alignment: Alignment2,
    padding: Size,
}

impl CellPadding {
    /// A cell with `padding` on each side and centered content.
    pub fn new(padding: Size) -> Self {
        Self {
            alignment: Alignment2::default(),
            padding: Size::new(padding.width.max(0), padding.height.max(0)),
        }
    }

    /// Builder: the child alignment.
    pub fn with_alignment(mut self, alignment: Alignment2) -> Self {
        self.alignment = alignment;
        self
    }

    /// Padding on each side, per axis.
    #[inline]
    pub fn padding(&self) -> Size {
        self.padding
    }

    /// Child alignment.
    #[inline]
    pub fn alignment(&self) -> Alignment2 {
        self.alignment
    }

    pub(crate) fn set_padding(&mut self, padding: Size) {
        self.padding = Size::new(padding.width.max(0), padding.height.max(0));
    }

    pub(crate) fn set_alignment(&mut self, alignment: Alignment2) {
        self.alignment = alignment;
    }

    /// The bounds the child imposes on the cell, or the padding alone when
    /// the cell is empty or its child hidden.
    pub fn content_size_properties(&self, child: Option<&SizeProperties>) -> SizeProperties {
        match child {
            Some(props) => props.padded(self.padding),
            None => SizeProperties::new().padded(self.padding),
        }
    }

    /// The area inside the padding for a cell occupying `rect`.
    pub fn inner_rect(&self, rect: Rect) -> Rect {
        rect.deflate(self.padding)
    }

    /// Where a child of `child_size` goes inside `inner`.
    pub fn align(&self, inner: Rect, child_size: Size) -> Point {
        let mut origin = inner.origin;
        for axis in Axis::ALL {
            let offset = self.alignment.get(axis).offset(inner.size[axis] - child_size[axis]);
            origin.set(axis, inner.origin.get(axis) + offset);
        }
        origin
    }
}
