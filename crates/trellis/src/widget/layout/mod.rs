//! Child arrangement strategies.
//!
//! A container arranges its children in one of three ways:
//!
//! - freely, where children keep whatever position and size they are given,
//! - on a grid, through [`GridLayout`], or
//! - inside a padded cell, through [`CellPadding`].
//!
//! Grid and cell-padding state is plain data. The tree folds children's
//! size properties through it to obtain the container's own bounds, and
//! asks it for target rectangles whenever the container is resized.
//!
//! # Grid lines
//!
//! A grid packs its children into *lines* of `major_count` cells along the
//! major direction: rows for [`MajorDirection::Row`], columns for
//! [`MajorDirection::Column`]. Space across lines is distributed with
//! [`distribute`]; inside each line the cells share the line's extent the
//! same way. A short last line therefore spans the full extent.

mod cell_padding;
mod distribute;

pub use cell_padding::{Alignment, Alignment2, CellPadding};
pub use distribute::{distribute, LineBounds};

use trellis_core::logging::targets;
use trellis_render::{Axis, Point, Rect, ScreenCoord, Size};

use super::size_properties::{SizeProperties, SizeProperty};

/// The direction cells are packed in before wrapping to a new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MajorDirection {
    /// Fill rows left to right, then wrap downward.
    #[default]
    Row,
    /// Fill columns top to bottom, then wrap rightward.
    Column,
}

impl MajorDirection {
    /// The axis cells advance along inside a line.
    #[inline]
    pub fn major_axis(self) -> Axis {
        match self {
            MajorDirection::Row => Axis::X,
            MajorDirection::Column => Axis::Y,
        }
    }

    /// The axis lines advance along.
    #[inline]
    pub fn minor_axis(self) -> Axis {
        self.major_axis().cross()
    }
}

/// What the grid needs to know about one child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellInfo {
    /// The child's effective size properties.
    pub size_properties: SizeProperties,
    /// Whether the child is hidden.
    pub hidden: bool,
}

/// Cached aggregate of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineInfo {
    /// Child indices of the line's cells, in order.
    start: usize,
    end: usize,
    /// `true` when no cell in the line is visible.
    hidden: bool,
    minor: LineBounds,
    major: LineBounds,
}

/// A row- or column-major grid arrangement.
///
/// # Example
///
/// ```
/// use trellis::widget::layout::{CellInfo, GridLayout};
/// use trellis::widget::SizeProperties;
/// use trellis::render::{Rect, Size};
///
/// let cell = CellInfo {
///     size_properties: SizeProperties::new().with_min(Size::new(10, 10)),
///     hidden: false,
/// };
/// let mut grid = GridLayout::rows(3);
/// let rects = grid.allocate(Rect::new(0, 0, 100, 20), &[cell; 4]);
///
/// // First row splits 100 into 34/33/33, the short second row spans it all.
/// assert_eq!(rects[0], Some(Rect::new(0, 0, 34, 10)));
/// assert_eq!(rects[3], Some(Rect::new(0, 10, 100, 10)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    major_direction: MajorDirection,
    major_count: usize,
    frame_margins: Size,
    spacing_margins: Size,

    dirty: bool,
    lines: Vec<LineInfo>,
    line_allocations: Vec<ScreenCoord>,
    allocation_passes: u64,
}

impl GridLayout {
    /// Create a grid packing `major_count` cells per line along `direction`.
    ///
    /// A zero count is raised to one.
    pub fn new(direction: MajorDirection, major_count: usize) -> Self {
        Self {
            major_direction: direction,
            major_count: major_count.max(1),
            frame_margins: Size::ZERO,
            spacing_margins: Size::ZERO,
            dirty: true,
            lines: Vec::new(),
            line_allocations: Vec::new(),
            allocation_passes: 0,
        }
    }

    /// A row-major grid with `count` cells per row.
    pub fn rows(count: usize) -> Self {
        Self::new(MajorDirection::Row, count)
    }

    /// A column-major grid with `count` cells per column.
    pub fn columns(count: usize) -> Self {
        Self::new(MajorDirection::Column, count)
    }

    /// Builder: margins between the grid edge and its outermost cells,
    /// applied on both sides of each axis.
    pub fn with_frame_margins(mut self, margins: Size) -> Self {
        self.set_frame_margins(margins);
        self
    }

    /// Builder: gaps between adjacent cells and lines.
    pub fn with_spacing_margins(mut self, margins: Size) -> Self {
        self.set_spacing_margins(margins);
        self
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// The packing direction.
    #[inline]
    pub fn major_direction(&self) -> MajorDirection {
        self.major_direction
    }

    /// Cells per line.
    #[inline]
    pub fn major_count(&self) -> usize {
        self.major_count
    }

    /// Frame margins per axis.
    #[inline]
    pub fn frame_margins(&self) -> Size {
        self.frame_margins
    }

    /// Spacing margins per axis.
    #[inline]
    pub fn spacing_margins(&self) -> Size {
        self.spacing_margins
    }

    pub(crate) fn set_major_direction(&mut self, direction: MajorDirection) {
        self.major_direction = direction;
        self.invalidate();
    }

    pub(crate) fn set_major_count(&mut self, count: usize) {
        self.major_count = count.max(1);
        self.invalidate();
    }

    pub(crate) fn set_frame_margins(&mut self, margins: Size) {
        self.frame_margins = Size::new(margins.width.max(0), margins.height.max(0));
        self.invalidate();
    }

    pub(crate) fn set_spacing_margins(&mut self, margins: Size) {
        self.spacing_margins = Size::new(margins.width.max(0), margins.height.max(0));
        self.invalidate();
    }

    // =========================================================================
    // Cache
    // =========================================================================

    /// Mark the cached line properties stale.
    ///
    /// They are recomputed on the next query or allocation pass.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether the cached line properties are stale.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of allocation passes run so far.
    #[inline]
    pub fn allocation_passes(&self) -> u64 {
        self.allocation_passes
    }

    /// Extents given to each line along the minor axis by the last
    /// allocation pass. Hidden lines get zero.
    pub fn line_allocations(&self) -> &[ScreenCoord] {
        &self.line_allocations
    }

    /// Number of lines for `cell_count` cells.
    pub fn line_count(&self, cell_count: usize) -> usize {
        cell_count.div_ceil(self.major_count)
    }

    /// The (line, position-in-line) slot of the child at `index`.
    pub fn slot_of(&self, index: usize) -> (usize, usize) {
        (index / self.major_count, index % self.major_count)
    }

    fn refresh(&mut self, cells: &[CellInfo]) {
        if !self.dirty && self.lines.last().map_or(cells.is_empty(), |l| l.end == cells.len()) {
            return;
        }
        let major = self.major_direction.major_axis();
        let minor = self.major_direction.minor_axis();
        let spacing = self.spacing_margins[major];

        self.lines.clear();
        let mut start = 0;
        while start < cells.len() {
            let end = (start + self.major_count).min(cells.len());
            let visible: Vec<&SizeProperties> = cells[start..end]
                .iter()
                .filter(|c| !c.hidden)
                .map(|c| &c.size_properties)
                .collect();

            let minor_min = visible.iter().map(|p| p.adjusted_min(minor)).max().unwrap_or(0);
            let minor_max = visible
                .iter()
                .map(|p| p.bounded_max(minor))
                .try_fold(ScreenCoord::MAX, |acc, max| max.map(|m| acc.min(m)))
                .map(|max| max.max(minor_min));

            let gaps = gap_total(visible.len(), spacing);
            let major_min = visible
                .iter()
                .fold(gaps, |acc, p| acc.saturating_add(p.adjusted_min(major)));
            let major_max = visible
                .iter()
                .map(|p| p.bounded_max(major))
                .try_fold(gaps, |acc: ScreenCoord, max| max.map(|m| acc.saturating_add(m)))
                .map(|max| max.max(major_min));

            self.lines.push(LineInfo {
                start,
                end,
                hidden: visible.is_empty(),
                minor: LineBounds {
                    min: minor_min,
                    max: minor_max,
                },
                major: LineBounds {
                    min: major_min,
                    max: major_max,
                },
            });
            start = end;
        }
        self.dirty = false;

        tracing::trace!(
            target: targets::LAYOUT,
            lines = self.lines.len(),
            cells = cells.len(),
            "recomputed line properties"
        );
    }

    // =========================================================================
    // Negotiation
    // =========================================================================

    /// The bounds the grid's contents impose on the container.
    ///
    /// Along the minor axis the lines stack, so their bounds add up. Along
    /// the major axis the widest line decides the minimum, and the grid is
    /// only bounded when every line is.
    pub fn content_size_properties(&mut self, cells: &[CellInfo]) -> SizeProperties {
        self.refresh(cells);
        let major = self.major_direction.major_axis();
        let minor = self.major_direction.minor_axis();
        let frame = self.frame_margins;

        let mut props = SizeProperties::new();
        props.set_enabled(SizeProperty::Min, Axis::X, true);
        props.set_enabled(SizeProperty::Min, Axis::Y, true);

        let visible: Vec<&LineInfo> = self.lines.iter().filter(|l| !l.hidden).collect();
        if visible.is_empty() {
            for axis in Axis::ALL {
                props.set(SizeProperty::Min, axis, frame[axis].saturating_mul(2));
            }
            return props;
        }

        let gaps = gap_total(visible.len(), self.spacing_margins[minor]);
        let minor_min = visible.iter().fold(gaps, |acc, l| acc.saturating_add(l.minor.min));
        let minor_max = visible
            .iter()
            .try_fold(gaps, |acc: ScreenCoord, l| l.minor.max.map(|m| acc.saturating_add(m)));
        let major_min = visible.iter().map(|l| l.major.min).max().unwrap_or(0);
        let major_max = visible
            .iter()
            .try_fold(0, |acc: ScreenCoord, l| l.major.max.map(|m| acc.max(m)));

        let framed = |value: ScreenCoord, axis: Axis| value.saturating_add(frame[axis].saturating_mul(2));
        props.set(SizeProperty::Min, minor, framed(minor_min, minor));
        props.set(SizeProperty::Min, major, framed(major_min, major));
        if let Some(max) = minor_max {
            props.set_enabled(SizeProperty::Max, minor, true);
            props.set(SizeProperty::Max, minor, framed(max, minor));
        }
        if let Some(max) = major_max {
            props.set_enabled(SizeProperty::Max, major, true);
            props.set(SizeProperty::Max, major, framed(max, major));
        }
        props
    }

    /// Run an allocation pass for a grid occupying `rect`.
    ///
    /// Returns a target rectangle for every cell, or `None` for hidden
    /// cells, which keep their slot but receive no space. Targets are the
    /// space offered; a cell may end up smaller after clamping to its own
    /// bounds.
    pub fn allocate(&mut self, rect: Rect, cells: &[CellInfo]) -> Vec<Option<Rect>> {
        self.refresh(cells);
        self.allocation_passes += 1;

        let major = self.major_direction.major_axis();
        let minor = self.major_direction.minor_axis();
        let frame = self.frame_margins;
        let spacing = self.spacing_margins;

        let visible_lines: Vec<usize> = (0..self.lines.len()).filter(|&i| !self.lines[i].hidden).collect();
        let line_gaps = gap_total(visible_lines.len(), spacing[minor]);
        let minor_available = inner_extent(rect.size[minor], frame[minor], line_gaps);
        let minor_bounds: Vec<LineBounds> = visible_lines.iter().map(|&i| self.lines[i].minor).collect();
        let minor_extents = distribute(minor_available, &minor_bounds);

        let mut targets = vec![None; cells.len()];
        self.line_allocations = vec![0; self.lines.len()];

        let mut minor_cursor = rect.origin.get(minor).saturating_add(frame[minor]);
        for (&line_index, &line_extent) in visible_lines.iter().zip(&minor_extents) {
            self.line_allocations[line_index] = line_extent;
            let line = &self.lines[line_index];

            let visible_cells: Vec<usize> = (line.start..line.end).filter(|&i| !cells[i].hidden).collect();
            let cell_gaps = gap_total(visible_cells.len(), spacing[major]);
            let major_available = inner_extent(rect.size[major], frame[major], cell_gaps);
            let cell_bounds: Vec<LineBounds> = visible_cells
                .iter()
                .map(|&i| {
                    let props = &cells[i].size_properties;
                    LineBounds {
                        min: props.adjusted_min(major),
                        max: props.bounded_max(major),
                    }
                })
                .collect();
            let cell_extents = distribute(major_available, &cell_bounds);

            let mut major_cursor = rect.origin.get(major).saturating_add(frame[major]);
            for (&cell_index, &cell_extent) in visible_cells.iter().zip(&cell_extents) {
                let mut origin = Point::ZERO;
                origin.set(major, major_cursor);
                origin.set(minor, minor_cursor);
                let mut size = Size::ZERO;
                size[major] = cell_extent;
                size[minor] = line_extent;
                targets[cell_index] = Some(Rect::from_origin_size(origin, size));
                major_cursor = major_cursor.saturating_add(cell_extent).saturating_add(spacing[major]);
            }
            minor_cursor = minor_cursor.saturating_add(line_extent).saturating_add(spacing[minor]);
        }

        tracing::trace!(
            target: targets::LAYOUT,
            pass = self.allocation_passes,
            ?rect,
            lines = visible_lines.len(),
            "allocated grid"
        );
        targets
    }
}

/// Total spacing between `count` adjacent entries.
fn gap_total(count: usize, spacing: ScreenCoord) -> ScreenCoord {
    let gaps = ScreenCoord::try_from(count.saturating_sub(1)).unwrap_or(ScreenCoord::MAX);
    gaps.saturating_mul(spacing)
}

/// Space left along an axis after the frame on both sides and the gaps.
fn inner_extent(extent: ScreenCoord, frame: ScreenCoord, gaps: ScreenCoord) -> ScreenCoord {
    extent
        .saturating_sub(frame.saturating_mul(2))
        .saturating_sub(gaps)
        .max(0)
}
