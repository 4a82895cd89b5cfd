use std::io::Write;

use tracing::{debug, info, warn};

use super::{GenerationWarning, GenerationSummary, IncludeGuard, Selection, UnitReport};
use crate::codegen::{CodeGenerator, Family};
use crate::error::GenerateError;
use crate::ident;
use crate::range::{GeneratedRange, Range};
use crate::writer::{measure, CodeWriter, SinkWriter};

/// Writes every selected macro into one stream: all `areuniq` sizes first,
/// then all `uniqenum` sizes, inside one include guard.
pub struct FlatEmitter<'a> {
    gen: &'a CodeGenerator,
    guard: IncludeGuard,
    selection: Selection,
    budget: Option<usize>,
    areuniq_from: Option<u64>,
}

impl<'a> FlatEmitter<'a> {
    pub fn new(gen: &'a CodeGenerator, guard: IncludeGuard, selection: Selection, budget: Option<usize>) -> Self {
        Self { gen, guard, selection, budget, areuniq_from: None }
    }

    /// Emits `areuniq` from `n` even when the requested range starts later,
    /// so the smaller sizes its macros call are defined too.
    pub fn areuniq_from(mut self, n: u64) -> Self {
        self.areuniq_from = Some(n);
        self
    }

    /// Emits `range` into `out`. `path` only labels the report.
    ///
    /// With a budget, an unbounded range ends at the last `n` that keeps the
    /// whole output within it; a bounded range is written in full and an
    /// overflow is reported as a warning. Without a budget the range must be
    /// bounded.
    pub fn emit<W: Write>(
        &self,
        range: Range,
        out: W,
        path: Option<std::path::PathBuf>,
    ) -> Result<GenerationSummary, GenerateError> {
        let mut summary = GenerationSummary::default();
        let end = match (range.end, self.budget) {
            (Some(end), None) => Some(end),
            (Some(end), Some(budget)) => {
                let size = self.total_size(range.start, end);
                if size > budget {
                    warn!("Flat output is {size} bytes, over the {budget}-byte budget");
                    summary.warnings.push(GenerationWarning::FlatOverflow { size, budget });
                }
                Some(end)
            }
            (None, Some(budget)) => self.last_fitting(range.start, budget, &mut summary),
            (None, None) => return Err(GenerateError::UnboundedOutput { target: "stream" }),
        };

        let slug = ident::encode(end.unwrap_or(range.start));
        let mut w = SinkWriter::new(out);
        self.guard.write_start(&mut w, &slug);
        if let Some(end) = end {
            for family in self.selection.families() {
                let Some(span) = self.span(family, range.start, end) else {
                    continue;
                };
                info!("Emitting {family} {span}");
                for n in span.start..=span.end {
                    debug!("Writing {family}{n}");
                    self.gen.emit(family, &mut w, n);
                }
                summary.set_range(family, Some(span));
            }
        }
        w.str(self.guard.end());
        let bytes = w.finish().map_err(|source| match &path {
            Some(path) => GenerateError::Write { path: path.clone(), source },
            None => GenerateError::Io(source),
        })?;

        let first = [summary.areuniq, summary.uniqenum]
            .into_iter()
            .flatten()
            .map(|span| span.start)
            .min()
            .unwrap_or(range.start);
        summary.units.push(UnitReport {
            families: self.selection.families().collect(),
            path,
            range: GeneratedRange::new(first, end.unwrap_or(first).max(first)),
            bytes,
        });
        Ok(summary)
    }

    fn span(&self, family: Family, start: u64, end: u64) -> Option<GeneratedRange> {
        let start = match (family, self.areuniq_from) {
            (Family::Areuniq, Some(from)) => start.min(from),
            _ => start,
        }
        .max(family.min_n());
        (start <= end).then(|| GeneratedRange::new(start, end))
    }

    fn frame_size(&self, end: u64) -> usize {
        measure(|w| {
            self.guard.write_start(w, &ident::encode(end));
            w.str(self.guard.end());
        })
    }

    fn macros_size(&self, n: u64) -> usize {
        self.selection
            .families()
            .filter(|f| n >= f.min_n())
            .map(|f| self.gen.size(f, n))
            .sum()
    }

    fn total_size(&self, start: u64, end: u64) -> usize {
        self.frame_size(end) + self.leading_size(start) + (start..=end).map(|n| self.macros_size(n)).sum::<usize>()
    }

    /// Bytes of the `areuniq` macros written below `start`.
    fn leading_size(&self, start: u64) -> usize {
        match self.areuniq_from {
            Some(from) if self.selection.areuniq => (from.max(Family::Areuniq.min_n())..start)
                .map(|n| self.gen.size(Family::Areuniq, n))
                .sum(),
            _ => 0,
        }
    }

    /// Largest `end` such that `start..=end` fits in `budget`.
    fn last_fitting(&self, start: u64, budget: usize, summary: &mut GenerationSummary) -> Option<u64> {
        let mut body = self.leading_size(start);
        let mut n = start;
        loop {
            body += self.macros_size(n);
            let size = self.frame_size(n) + body;
            if size > budget {
                warn!("Stopping flat output before n = {n}: {size} bytes, over the {budget}-byte budget");
                summary.warnings.push(GenerationWarning::Stopped { family: None, n, size, budget });
                return n.checked_sub(1).filter(|&end| end >= start);
            }
            n += 1;
        }
    }
}
