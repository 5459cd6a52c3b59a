//! Located rectangles.

/// A rectangle with an origin and a size.
///
/// The origin may be negative; width and height are unsigned. The far edges
/// returned by [`right`](Self::right) and [`bottom`](Self::bottom) are
/// exclusive and computed in `i64` so they never overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Geometry {
    #[inline]
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    #[inline]
    pub const fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Whether the point lies inside the rectangle.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x as i64 && x < self.right() && y >= self.y as i64 && y < self.bottom()
    }

    /// Smallest rectangle enclosing both.
    ///
    /// Empty rectangles contribute nothing. If both are empty the result is
    /// `self`. A union whose extent does not fit `u32` is clamped to
    /// `u32::MAX`.
    pub fn union(&self, other: &Geometry) -> Geometry {
        match (self.is_empty(), other.is_empty()) {
            (_, true) => *self,
            (true, false) => *other,
            (false, false) => {
                let x = self.x.min(other.x);
                let y = self.y.min(other.y);
                let right = self.right().max(other.right());
                let bottom = self.bottom().max(other.bottom());

                Geometry {
                    x,
                    y,
                    w: u32::try_from(right - x as i64).unwrap_or(u32::MAX),
                    h: u32::try_from(bottom - y as i64).unwrap_or(u32::MAX),
                }
            }
        }
    }
}
