//! Half-open byte ranges.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: u32,
    pub end: u32,
}

impl SourceRange {
    /// Create a new range. `end` is clamped so it is never before `start`.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// Empty range at `offset`.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if the offset lies inside `[start, end)`.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Check if the offset lies inside `[start, end]`.
    ///
    /// Cursor positions sit *between* characters, so an IDE cursor placed
    /// right after the last character still belongs to the range.
    #[inline]
    pub const fn contains_inclusive(&self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// Check if `other` lies completely inside this range.
    #[inline]
    pub const fn contains_range(&self, other: &SourceRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Check if the two ranges share at least one byte.
    #[inline]
    pub const fn intersects(&self, other: &SourceRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection of both ranges, if any.
    #[inline]
    pub fn intersection(&self, other: &SourceRange) -> Option<SourceRange> {
        if !self.intersects(other) {
            return None;
        }
        Some(SourceRange::new(
            self.start.max(other.start),
            self.end.min(other.end),
        ))
    }

    /// Move the range by `delta` bytes.
    #[inline]
    pub const fn shift(&self, delta: u32) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Move the range back by `delta` bytes, saturating at zero.
    #[inline]
    pub const fn unshift(&self, delta: u32) -> Self {
        Self {
            start: self.start.saturating_sub(delta),
            end: self.end.saturating_sub(delta),
        }
    }

    /// Slice `text` with this range, if it is in bounds.
    #[inline]
    pub fn slice<'s>(&self, text: &'s str) -> Option<&'s str> {
        text.get(self.start as usize..self.end as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let range = SourceRange::new(2, 5);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert!(range.contains_inclusive(5));
    }

    #[test]
    fn test_intersection() {
        let a = SourceRange::new(0, 10);
        let b = SourceRange::new(8, 12);
        assert_eq!(a.intersection(&b), Some(SourceRange::new(8, 10)));
        assert_eq!(a.intersection(&SourceRange::new(10, 12)), None);
    }

    #[test]
    fn test_new_clamps_end() {
        let range = SourceRange::new(5, 3);
        assert!(range.is_empty());
        assert_eq!(range.start, 5);
    }

    #[test]
    fn test_shift_roundtrip() {
        let range = SourceRange::new(3, 7);
        assert_eq!(range.shift(10).unshift(10), range);
    }
}
