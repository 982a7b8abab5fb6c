//! Horizontal and vertical extents of a chart pane.

use std::ops::Range;

/// Half-open window of bar indices currently scrolled into view.
///
/// `start == end` is the degenerate "nothing to draw" window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    /// Creates a range, swapping the bounds if given in reverse.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    #[must_use]
    pub fn with_length(start: usize, length: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(length),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Indices in this window that are also `>= from` and `< limit`.
    ///
    /// Always a valid slice range for a slice of length `limit`.
    pub fn clipped(&self, from: usize, limit: usize) -> Range<usize> {
        let start = self.start.max(from).min(limit);
        let end = self.end.min(limit);
        start..end.max(start)
    }
}

/// Vertical scale of a pane. `min == max` means "do not draw".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const EMPTY: ValueRange = ValueRange { min: 0.0, max: 0.0 };

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn union(self, other: ValueRange) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Min/max over `values`, or `EMPTY` when there are none.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .fold(None, |acc: Option<ValueRange>, v| match acc {
                Some(r) => Some(ValueRange::new(r.min.min(v), r.max.max(v))),
                None => Some(ValueRange::new(v, v)),
            })
            .unwrap_or(Self::EMPTY)
    }
}
