//! Size properties: per-axis minimum and maximum size bounds.
//!
//! Every widget carries two sets of [`SizeProperties`]:
//!
//! - the *preferred* set, which is exactly what was requested through the
//!   `set_size_property*` family, and
//! - the *effective* set, which the tree derives from the preferred set and,
//!   for containers, from their contents (main widget, layout cells, padded
//!   child). `resize` clamps against the effective set.

use trellis_render::{Axis, ScreenCoord, Size};

/// Which bound a size-property operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeProperty {
    /// The minimum size.
    Min,
    /// The maximum size.
    Max,
}

/// Minimum/maximum size bounds with per-axis enable flags.
///
/// A disabled bound does not constrain its axis. Whenever both bounds of an
/// axis are enabled, `min <= max` holds: assignments that would break this
/// are clamped, with the value being assigned taking precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeProperties {
    min_enabled: [bool; 2],
    min: Size,
    max_enabled: [bool; 2],
    max: Size,
}

impl Default for SizeProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeProperties {
    /// Minimum reported for an axis whose minimum is disabled.
    pub const DEFAULT_MIN_SIZE_COMPONENT: ScreenCoord = 0;
    /// Maximum reported for an axis whose maximum is disabled.
    ///
    /// Kept well below `ScreenCoord::MAX` so sums of bounds cannot overflow.
    pub const DEFAULT_MAX_SIZE_COMPONENT: ScreenCoord = ScreenCoord::MAX / 4;

    /// Unconstrained properties: every bound disabled.
    pub const fn new() -> Self {
        Self {
            min_enabled: [false; 2],
            min: Size::splat(Self::DEFAULT_MIN_SIZE_COMPONENT),
            max_enabled: [false; 2],
            max: Size::splat(Self::DEFAULT_MAX_SIZE_COMPONENT),
        }
    }

    /// Properties pinning both axes to exactly `size`.
    pub fn fixed(size: Size) -> Self {
        Self::new().with_min(size).with_max(size)
    }

    /// Builder: enable and set the minimum on both axes.
    pub fn with_min(mut self, min: Size) -> Self {
        for axis in Axis::ALL {
            self.set_enabled(SizeProperty::Min, axis, true);
            self.set(SizeProperty::Min, axis, min[axis]);
        }
        self
    }

    /// Builder: enable and set the maximum on both axes.
    pub fn with_max(mut self, max: Size) -> Self {
        for axis in Axis::ALL {
            self.set_enabled(SizeProperty::Max, axis, true);
            self.set(SizeProperty::Max, axis, max[axis]);
        }
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Stored value of a bound, whether or not it is enabled.
    #[inline]
    pub fn value(&self, property: SizeProperty, axis: Axis) -> ScreenCoord {
        match property {
            SizeProperty::Min => self.min[axis],
            SizeProperty::Max => self.max[axis],
        }
    }

    /// Whether a bound is enabled.
    #[inline]
    pub fn is_enabled(&self, property: SizeProperty, axis: Axis) -> bool {
        match property {
            SizeProperty::Min => self.min_enabled[axis.index()],
            SizeProperty::Max => self.max_enabled[axis.index()],
        }
    }

    /// Stored minimum size.
    #[inline]
    pub fn min_size(&self) -> Size {
        self.min
    }

    /// Stored maximum size.
    #[inline]
    pub fn max_size(&self) -> Size {
        self.max
    }

    /// Per-axis minimum enable flags, `[x, y]`.
    #[inline]
    pub fn min_enabled(&self) -> [bool; 2] {
        self.min_enabled
    }

    /// Per-axis maximum enable flags, `[x, y]`.
    #[inline]
    pub fn max_enabled(&self) -> [bool; 2] {
        self.max_enabled
    }

    /// The minimum on `axis`, or the library default when disabled.
    pub fn adjusted_min(&self, axis: Axis) -> ScreenCoord {
        if self.min_enabled[axis.index()] {
            self.min[axis]
        } else {
            Self::DEFAULT_MIN_SIZE_COMPONENT
        }
    }

    /// The maximum on `axis`, or the library default when disabled.
    pub fn adjusted_max(&self, axis: Axis) -> ScreenCoord {
        if self.max_enabled[axis.index()] {
            self.max[axis]
        } else {
            Self::DEFAULT_MAX_SIZE_COMPONENT
        }
    }

    /// The maximum on `axis`, or `None` when the axis is unbounded.
    pub fn bounded_max(&self, axis: Axis) -> Option<ScreenCoord> {
        self.max_enabled[axis.index()].then_some(self.max[axis])
    }

    /// Check that `min <= max` on every axis where both are enabled.
    pub fn is_consistent(&self) -> bool {
        Axis::ALL.iter().all(|&axis| {
            !(self.min_enabled[axis.index()] && self.max_enabled[axis.index()])
                || self.min[axis] <= self.max[axis]
        })
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Assign a bound's value. Values are kept within zero and
    /// [`DEFAULT_MAX_SIZE_COMPONENT`](Self::DEFAULT_MAX_SIZE_COMPONENT).
    ///
    /// If the opposite bound is enabled and now conflicts, it is moved to
    /// the assigned value.
    pub fn set(&mut self, property: SizeProperty, axis: Axis, value: ScreenCoord) {
        let value = value.clamp(0, Self::DEFAULT_MAX_SIZE_COMPONENT);
        match property {
            SizeProperty::Min => self.min[axis] = value,
            SizeProperty::Max => self.max[axis] = value,
        }
        self.resolve_conflict(property, axis);
    }

    /// Enable or disable a bound.
    ///
    /// Enabling a bound that conflicts with the opposite one moves the
    /// opposite bound.
    pub fn set_enabled(&mut self, property: SizeProperty, axis: Axis, enabled: bool) {
        match property {
            SizeProperty::Min => self.min_enabled[axis.index()] = enabled,
            SizeProperty::Max => self.max_enabled[axis.index()] = enabled,
        }
        if enabled {
            self.resolve_conflict(property, axis);
        }
    }

    fn resolve_conflict(&mut self, winner: SizeProperty, axis: Axis) {
        let i = axis.index();
        if !(self.min_enabled[i] && self.max_enabled[i]) || self.min[axis] <= self.max[axis] {
            return;
        }
        match winner {
            SizeProperty::Min => self.max[axis] = self.min[axis],
            SizeProperty::Max => self.min[axis] = self.max[axis],
        }
    }

    // =========================================================================
    // Adjustment
    // =========================================================================

    /// Clamp `size` into these bounds: first raised to the minimum, then
    /// lowered to the maximum. Negative components become zero.
    pub fn clamp(&self, size: Size) -> Size {
        Size::from_fn(|axis| {
            let mut value = size[axis].max(0);
            if self.min_enabled[axis.index()] {
                value = value.max(self.min[axis]);
            }
            if self.max_enabled[axis.index()] {
                value = value.min(self.max[axis]);
            }
            value
        })
    }

    /// Combine content-derived bounds with an explicitly preferred set.
    ///
    /// Per axis, the minimum is the larger of the enabled minimums and the
    /// maximum the smaller of the enabled maximums. A bound enabled in
    /// neither source stays disabled at the library default. If the result
    /// would have `min > max`, the minimum wins.
    pub fn combined(content: &SizeProperties, preferred: &SizeProperties) -> SizeProperties {
        let mut out = SizeProperties::new();
        for axis in Axis::ALL {
            let i = axis.index();
            let (min_enabled, min) = match (content.min_enabled[i], preferred.min_enabled[i]) {
                (true, true) => (true, content.min[axis].max(preferred.min[axis])),
                (true, false) => (true, content.min[axis]),
                (false, true) => (true, preferred.min[axis]),
                (false, false) => (false, Self::DEFAULT_MIN_SIZE_COMPONENT),
            };
            let (max_enabled, max) = match (content.max_enabled[i], preferred.max_enabled[i]) {
                (true, true) => (true, content.max[axis].min(preferred.max[axis])),
                (true, false) => (true, content.max[axis]),
                (false, true) => (true, preferred.max[axis]),
                (false, false) => (false, Self::DEFAULT_MAX_SIZE_COMPONENT),
            };
            out.min_enabled[i] = min_enabled;
            out.min[axis] = min;
            out.max_enabled[i] = max_enabled;
            out.max[axis] = max;
            out.resolve_conflict(SizeProperty::Min, axis);
        }
        out
    }

    /// These bounds grown by `padding` on both sides of each axis.
    ///
    /// The minimum is always enabled, so an empty padded area still reserves
    /// its padding.
    pub fn padded(&self, padding: Size) -> SizeProperties {
        let mut out = *self;
        for axis in Axis::ALL {
            let extra = padding[axis].max(0).saturating_mul(2);
            let grow = |value: ScreenCoord| value.saturating_add(extra).min(Self::DEFAULT_MAX_SIZE_COMPONENT);
            out.min_enabled[axis.index()] = true;
            out.min[axis] = grow(self.adjusted_min(axis));
            if self.max_enabled[axis.index()] {
                out.max[axis] = grow(self.max[axis]);
            }
        }
        out
    }
}
