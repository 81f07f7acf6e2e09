// MIT/Apache2 License

mod region;

pub use region::*;

/// A point in two-dimensional space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A rectangle, inclusive of `(x1, y1)` and exclusive of `(x2, y2)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Rectangle {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rectangle {
    #[inline]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a rectangle from its origin and size.
    #[inline]
    pub const fn from_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width as i32,
            y2: y + height as i32,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        (self.x2 - self.x1).max(0) as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        (self.y2 - self.y1).max(0) as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// Move the rectangle by the given amount.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Get the area covered by both rectangles, if any.
    #[inline]
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let r = Rectangle::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        );
        if r.is_empty() {
            None
        } else {
            Some(r)
        }
    }

    /// Get the smallest rectangle covering both rectangles. Empty rectangles are ignored.
    #[inline]
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rectangle::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Does this rectangle fully cover `other`?
    #[inline]
    pub fn contains(&self, other: &Rectangle) -> bool {
        other.is_empty()
            || (self.x1 <= other.x1
                && self.y1 <= other.y1
                && self.x2 >= other.x2
                && self.y2 >= other.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(5, 5, 15, 15);
        assert_eq!(a.intersection(&b), Some(Rectangle::new(5, 5, 10, 10)));

        let c = Rectangle::new(10, 0, 20, 10);
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn test_union_skips_empty() {
        let a = Rectangle::new(2, 2, 4, 4);
        assert_eq!(a.union(&Rectangle::default()), a);
        assert_eq!(
            a.union(&Rectangle::new(0, 3, 1, 8)),
            Rectangle::new(0, 2, 4, 8)
        );
    }
}
