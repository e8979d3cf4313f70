//! Basic geometry and color types.
//!
//! Widget geometry is integral: every rectangle is measured in whole screen
//! pixels, so size negotiation never accumulates rounding drift.

use std::ops::{Add, Index, IndexMut, Sub};

use bytemuck::{Pod, Zeroable};

/// A screen-space coordinate or extent, in pixels.
pub type ScreenCoord = i32;

/// One of the two screen axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal (width, x).
    X,
    /// Vertical (height, y).
    Y,
}

impl Axis {
    /// Both axes, in `[X, Y]` order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// The other axis.
    #[inline]
    pub fn cross(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Index of this axis into a `[T; 2]`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// A point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Point {
    pub x: ScreenCoord,
    pub y: ScreenCoord,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: ScreenCoord, y: ScreenCoord) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Component along `axis`.
    #[inline]
    pub fn get(self, axis: Axis) -> ScreenCoord {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Set the component along `axis`.
    #[inline]
    pub fn set(&mut self, axis: Axis, value: ScreenCoord) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(ScreenCoord, ScreenCoord)> for Point {
    fn from((x, y): (ScreenCoord, ScreenCoord)) -> Self {
        Self::new(x, y)
    }
}

/// A width/height pair in pixels.
///
/// Also used for per-axis quantities such as margins and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Size {
    pub width: ScreenCoord,
    pub height: ScreenCoord,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: ScreenCoord, height: ScreenCoord) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Same value on both axes.
    #[inline]
    pub const fn splat(value: ScreenCoord) -> Self {
        Self::new(value, value)
    }

    /// Check if the size has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Component along `axis`.
    #[inline]
    pub fn get(self, axis: Axis) -> ScreenCoord {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Set the component along `axis`.
    #[inline]
    pub fn set(&mut self, axis: Axis, value: ScreenCoord) {
        match axis {
            Axis::X => self.width = value,
            Axis::Y => self.height = value,
        }
    }

    /// Build a size from a per-axis function.
    #[inline]
    pub fn from_fn(mut f: impl FnMut(Axis) -> ScreenCoord) -> Self {
        Self::new(f(Axis::X), f(Axis::Y))
    }

    /// The smaller of the two components.
    #[inline]
    pub fn min_component(self) -> ScreenCoord {
        self.width.min(self.height)
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// The size as a point offset.
    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(self.width, self.height)
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for Size {
    type Output = Size;

    fn sub(self, rhs: Size) -> Size {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

impl Index<Axis> for Size {
    type Output = ScreenCoord;

    fn index(&self, axis: Axis) -> &ScreenCoord {
        match axis {
            Axis::X => &self.width,
            Axis::Y => &self.height,
        }
    }
}

impl IndexMut<Axis> for Size {
    fn index_mut(&mut self, axis: Axis) -> &mut ScreenCoord {
        match axis {
            Axis::X => &mut self.width,
            Axis::Y => &mut self.height,
        }
    }
}

impl From<(ScreenCoord, ScreenCoord)> for Size {
    fn from((width, height): (ScreenCoord, ScreenCoord)) -> Self {
        Self::new(width, height)
    }
}

/// An axis-aligned rectangle in screen space.
///
/// The origin is the top-left corner; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: ScreenCoord, y: ScreenCoord, width: ScreenCoord, height: ScreenCoord) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Empty rectangle at the origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Get the left edge x coordinate.
    #[inline]
    pub fn left(&self) -> ScreenCoord {
        self.origin.x
    }

    /// Get the top edge y coordinate.
    #[inline]
    pub fn top(&self) -> ScreenCoord {
        self.origin.y
    }

    /// Get the right edge x coordinate (exclusive).
    #[inline]
    pub fn right(&self) -> ScreenCoord {
        self.origin.x + self.size.width
    }

    /// Get the bottom edge y coordinate (exclusive).
    #[inline]
    pub fn bottom(&self) -> ScreenCoord {
        self.origin.y + self.size.height
    }

    /// Get the width.
    #[inline]
    pub fn width(&self) -> ScreenCoord {
        self.size.width
    }

    /// Get the height.
    #[inline]
    pub fn height(&self) -> ScreenCoord {
        self.size.height
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Check if a point is inside the rectangle (right/bottom edges exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Compute the union (bounding box) of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Translate the rectangle.
    #[inline]
    pub fn offset(&self, delta: Point) -> Rect {
        Rect::from_origin_size(self.origin + delta, self.size)
    }

    /// Shrink the rectangle by `margins` on every side.
    pub fn deflate(&self, margins: Size) -> Rect {
        Rect::new(
            self.origin.x + margins.width,
            self.origin.y + margins.height,
            (self.size.width - 2 * margins.width).max(0),
            (self.size.height - 2 * margins.height).max(0),
        )
    }
}

/// An RGBA color with premultiplied alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from premultiplied RGBA components (0.0-1.0 range).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from non-premultiplied RGBA components.
    #[inline]
    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r * a,
            g: g * a,
            b: b * a,
            a,
        }
    }

    /// Create a color from 8-bit RGBA components (0-255 range).
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Create an opaque color from RGB components.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from a hex string (e.g., "#FF0000" or "#FF0000FF").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let len = hex.len();

        if len != 6 && len != 8 {
            return None;
        }

        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        let a = if len == 8 {
            u8::from_str_radix(hex.get(6..8)?, 16).ok()?
        } else {
            255
        };

        Some(Self::from_rgba8(r, g, b, a))
    }

    /// Component-wise product, used to apply a widget color mask.
    #[inline]
    pub fn modulate(self, mask: Color) -> Self {
        Self {
            r: self.r * mask.r,
            g: self.g * mask.g,
            b: self.b * mask.b,
            a: self.a * mask.a,
        }
    }

    /// Convert to an array [r, g, b, a].
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::from_rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::from_rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::from_rgb(0.0, 0.0, 1.0);
    pub const GRAY: Self = Self::from_rgb(0.5, 0.5, 0.5);
}

static_assertions::assert_impl_all!(Rect: Send, Sync, Copy);
static_assertions::assert_impl_all!(Color: Send, Sync, Copy);
