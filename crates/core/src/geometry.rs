//! Axis-aligned rectangle primitive and distance math.
//!
//! Coordinates are in room meters with the origin at the top-left corner of
//! the room: `x` grows to the right and `y` grows downward, so a rectangle's
//! `top` edge is `y` and its `bottom` edge is `y + height`.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance used for containment and grid-bound comparisons.
pub const EPSILON: f64 = 1e-9;

/// An axis-aligned rectangle `{x, y, width, height}`.
///
/// Immutable once constructed. [`Rect::new`] enforces positive, finite
/// extents; every derived rectangle (shrink, expand, translate) is produced
/// through checked constructors as well.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// Creates a rectangle, rejecting non-positive or non-finite extents.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(Error::InvalidGeometry(format!(
                "non-finite rectangle ({x}, {y}, {width}, {height})"
            )));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "rectangle extents must be positive, got {width} x {height}"
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Creates a rectangle from its min/max corners.
    pub fn from_bounds(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        Self::new(x_min, y_min, x_max - x_min, y_max - y_min)
    }

    /// Left edge (`x`).
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Top edge (`y`).
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area in square meters.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center point.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Mean of width and height, used by the adaptive spacing policy.
    pub fn mean_extent(&self) -> f64 {
        (self.width + self.height) / 2.0
    }

    /// Returns the rectangle shrunk by `margin` on every side, or `None` if
    /// nothing of positive size is left.
    pub fn shrink(&self, margin: f64) -> Option<Rect> {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
        .ok()
    }

    /// Returns the rectangle grown by `margin` on every side.
    ///
    /// Negative margins shrink; if the result would be degenerate the
    /// original rectangle is returned unchanged.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
        .unwrap_or(*self)
    }

    /// Returns the same rectangle moved so its top-left corner sits at `(x, y)`.
    pub fn at(&self, x: f64, y: f64) -> Rect {
        Rect {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// True if the interiors intersect. Shared edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() <= other.left()
            || other.right() <= self.left()
            || self.bottom() <= other.top()
            || other.bottom() <= self.top())
    }

    /// True if `other` lies entirely inside this rectangle (edges inclusive,
    /// with [`EPSILON`] tolerance).
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left() - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.top() >= self.top() - EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    /// Axis-aligned gaps `(dx, dy)` between two rectangles.
    ///
    /// Each component is zero when the projections on that axis overlap.
    pub fn axis_gaps(&self, other: &Rect) -> (f64, f64) {
        let dx = (other.left() - self.right())
            .max(self.left() - other.right())
            .max(0.0);
        let dy = (other.top() - self.bottom())
            .max(self.top() - other.bottom())
            .max(0.0);
        (dx, dy)
    }

    /// Edge-to-edge gap along the dominant separating axis.
    ///
    /// Zero when the rectangles touch or overlap.
    pub fn dominant_gap(&self, other: &Rect) -> f64 {
        let (dx, dy) = self.axis_gaps(other);
        dx.max(dy)
    }

    /// Euclidean distance between the closest points of two rectangles.
    pub fn edge_distance(&self, other: &Rect) -> f64 {
        let (dx, dy) = self.axis_gaps(other);
        dx.hypot(dy)
    }

    /// Euclidean distance between the two centers.
    pub fn center_distance(&self, other: &Rect) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        (ax - bx).hypot(ay - by)
    }

    /// Euclidean distance between the two top-left corners.
    pub fn corner_distance(&self, other: &Rect) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}, {:.2} x {:.2}]",
            self.x, self.y, self.width, self.height
        )
    }
}
