// MIT/Apache2 License

use super::Rectangle;
use tinyvec::TinyVec;

/// The set of destination pixels touched by one or more blits.
///
/// Callers use this for repaint bookkeeping, so it only has to be a superset of the touched
/// area. Rectangles fully covered by an earlier one are folded away, and once more than
/// [`MAX_RECTS`](Self::MAX_RECTS) are held the region collapses into its bounding box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirtyRegion {
    rects: TinyVec<[Rectangle; 4]>,
}

impl DirtyRegion {
    /// The most rectangles a region keeps apart.
    pub const MAX_RECTS: usize = 16;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region covering a single rectangle.
    #[inline]
    pub fn from_rect(rect: Rectangle) -> Self {
        let mut region = Self::new();
        region.add(rect);
        region
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    #[inline]
    pub fn rects(&self) -> &[Rectangle] {
        &self.rects
    }

    /// Add a rectangle to the region.
    pub fn add(&mut self, rect: Rectangle) {
        if rect.is_empty() || self.rects.iter().any(|r| r.contains(&rect)) {
            return;
        }

        self.rects.retain(|r| !rect.contains(r));
        self.rects.push(rect);

        if self.rects.len() > Self::MAX_RECTS {
            let bounds = self.bounds();
            self.rects.clear();
            self.rects.push(bounds);
        }
    }

    /// Union another region into this one.
    #[inline]
    pub fn union(&mut self, other: &DirtyRegion) {
        other.rects.iter().copied().for_each(|r| self.add(r));
    }

    /// Get the bounding box of the region.
    #[inline]
    pub fn bounds(&self) -> Rectangle {
        self.rects
            .iter()
            .fold(Rectangle::default(), |acc, r| acc.union(r))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_folds_covered() {
        let mut region = DirtyRegion::new();
        region.add(Rectangle::new(2, 2, 3, 3));
        region.add(Rectangle::new(0, 0, 4, 4));
        region.add(Rectangle::new(1, 1, 2, 2));
        assert_eq!(region.rects(), &[Rectangle::new(0, 0, 4, 4)]);

        region.add(Rectangle::new(10, 10, 12, 11));
        assert_eq!(region.rects().len(), 2);
        assert_eq!(region.bounds(), Rectangle::new(0, 0, 12, 11));
    }

    #[test]
    fn test_many_rects_collapse_to_bounds() {
        let mut region = DirtyRegion::new();
        for i in 0..DirtyRegion::MAX_RECTS as i32 {
            region.add(Rectangle::new(i * 2, 0, i * 2 + 1, 1));
        }
        assert_eq!(region.rects().len(), DirtyRegion::MAX_RECTS);

        region.add(Rectangle::new(0, 10, 1, 11));
        let last = DirtyRegion::MAX_RECTS as i32 * 2 - 1;
        assert_eq!(region.rects(), &[Rectangle::new(0, 0, last, 11)]);

        // later rectangles keep growing the one box
        region.add(Rectangle::new(50, 50, 51, 51));
        assert_eq!(region.rects().len(), 2);
    }

    #[test]
    fn test_empty_rects_ignored() {
        let mut region = DirtyRegion::new();
        region.add(Rectangle::new(5, 5, 5, 9));
        assert!(region.is_empty());
    }
}
