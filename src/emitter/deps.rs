use std::ops::RangeInclusive;

use crate::range::GeneratedRange;

/// Contiguous `areuniq` units written so far, in ascending order.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    starts: Vec<u64>,
    end: u64,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the next unit. Units must arrive in order without gaps.
    pub fn push(&mut self, unit: GeneratedRange) {
        debug_assert!(
            self.starts.is_empty() || unit.start == self.end + 1,
            "unit {unit} doesn't follow {}",
            self.end
        );
        self.starts.push(unit.start);
        self.end = unit.end;
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Last `n` covered, if any unit was recorded.
    pub fn end(&self) -> Option<u64> {
        (!self.is_empty()).then_some(self.end)
    }

    pub fn unit(&self, i: usize) -> GeneratedRange {
        let end = self.starts.get(i + 1).map_or(self.end, |next| next - 1);
        GeneratedRange::new(self.starts[i], end)
    }

    /// Indices of the units intersecting `[lo, hi]`, or `None` if there are none.
    pub fn covering(&self, lo: u64, hi: u64) -> Option<RangeInclusive<usize>> {
        let first = *self.starts.first()?;
        if lo > hi || hi < first || lo > self.end {
            return None;
        }
        let from = self.starts.partition_point(|&s| s <= lo).saturating_sub(1);
        let to = self.starts.partition_point(|&s| s <= hi.min(self.end)) - 1;
        Some(from..=to)
    }
}
