//! Spans already claimed by longer terms.

use std::ops::Range;

/// Sorted, merged byte spans. Terms are scanned longest first, and every kept
/// occurrence claims its span so shorter terms cannot match inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    spans: Vec<Range<usize>>,
}

impl Coverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `range` intersects a claimed span.
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        let index = self.spans.partition_point(|s| s.end <= range.start);
        self.spans
            .get(index)
            .is_some_and(|span| span.start < range.end)
    }

    /// Claim `range`, merging it with every span it touches.
    pub fn claim(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let first = self.spans.partition_point(|s| s.end < range.start);
        let last = self.spans.partition_point(|s| s.start <= range.end);
        if first == last {
            self.spans.insert(first, range);
            return;
        }
        let start = range.start.min(self.spans[first].start);
        let end = range.end.max(self.spans[last - 1].end);
        self.spans.splice(first..last, std::iter::once(start..end));
    }

    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_merge_touching_spans() {
        let mut coverage = Coverage::new();
        coverage.claim(10..15);
        coverage.claim(0..3);
        coverage.claim(20..25);
        assert_eq!(coverage.spans(), &[0..3, 10..15, 20..25]);

        coverage.claim(14..21);
        assert_eq!(coverage.spans(), &[0..3, 10..25]);

        coverage.claim(3..4);
        assert_eq!(coverage.spans(), &[0..4, 10..25]);
    }

    #[test]
    fn overlap_is_strict() {
        let mut coverage = Coverage::new();
        coverage.claim(5..10);
        assert!(!coverage.overlaps(&(0..5)));
        assert!(!coverage.overlaps(&(10..12)));
        assert!(coverage.overlaps(&(9..12)));
        assert!(coverage.overlaps(&(6..7)));
        assert!(coverage.overlaps(&(0..20)));
    }

    #[test]
    fn empty_ranges_are_ignored() {
        let mut coverage = Coverage::new();
        coverage.claim(4..4);
        assert!(coverage.is_empty());
    }
}
