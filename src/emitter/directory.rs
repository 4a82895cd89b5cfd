use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{
    dependency_span, file_name, write_file_name, GenerationWarning, DependencyIndex, GenerationSummary,
    IncludeGuard, UnitReport,
};
use crate::codegen::{CodeGenerator, Family};
use crate::error::GenerateError;
use crate::ident;
use crate::range::{GeneratedRange, Range};
use crate::writer::{measure, CodeWriter, SinkWriter};

/// Where each unit's file lives under the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    pub root: PathBuf,
    /// Digits per subdirectory level; `0` keeps every family in one directory.
    pub prefix_length: usize,
}

impl DirectoryLayout {
    pub fn new(root: impl Into<PathBuf>, prefix_length: usize) -> Self {
        Self { root: root.into(), prefix_length }
    }

    /// Directory components below the root: the family, then the decimal
    /// prefix shared by every `n` in the unit, split into
    /// `prefix_length`-digit chunks. A trailing partial chunk is dropped.
    pub fn segments(&self, family: Family, unit: GeneratedRange) -> Vec<String> {
        let start = unit.start.to_string();
        let end = unit.end.to_string();
        let shared = if unit.is_single() {
            start.len() - 1
        } else {
            start
                .bytes()
                .zip(end.bytes())
                .take_while(|(a, b)| a == b)
                .count()
        };
        let mut segments = vec![family.as_str().to_owned()];
        if self.prefix_length > 0 {
            segments.extend(
                start[..shared]
                    .as_bytes()
                    .chunks_exact(self.prefix_length)
                    .map(|chunk| chunk.iter().map(|&b| char::from(b)).collect::<String>()),
            );
        }
        segments
    }

    pub fn dir_of(&self, family: Family, unit: GeneratedRange) -> PathBuf {
        let mut dir = self.root.clone();
        dir.extend(self.segments(family, unit));
        dir
    }

    pub fn path_of(&self, family: Family, unit: GeneratedRange) -> PathBuf {
        self.dir_of(family, unit).join(file_name(family, unit))
    }
}

/// Components leading from directory `from` to directory `to`, both given
/// as segments below the same root.
pub fn relative_dirs<'a>(from: &[String], to: &'a [String]) -> Vec<&'a str> {
    let shared = from.iter().zip(to).take_while(|(a, b)| a == b).count();
    std::iter::repeat("..")
        .take(from.len() - shared)
        .chain(to[shared..].iter().map(String::as_str))
        .collect()
}

/// Writes each family as a run of files no larger than the byte budget,
/// each including the `areuniq` files its macros call.
pub struct DirectoryEmitter<'a> {
    gen: &'a CodeGenerator,
    guard: IncludeGuard,
    layout: DirectoryLayout,
    budget: usize,
    index: DependencyIndex,
    next_file: u64,
    created: HashSet<PathBuf>,
    summary: GenerationSummary,
}

impl<'a> DirectoryEmitter<'a> {
    pub fn new(gen: &'a CodeGenerator, guard: IncludeGuard, layout: DirectoryLayout, budget: usize) -> Self {
        Self {
            gen,
            guard,
            layout,
            budget,
            index: DependencyIndex::new(),
            next_file: 0,
            created: HashSet::new(),
            summary: GenerationSummary::default(),
        }
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    /// Emits `family` over `range`, returning the span actually written.
    ///
    /// An unbounded range stops at the first `n` whose macro can't fit a
    /// file on its own; a bounded one writes such macros alone and warns.
    pub fn emit_family(&mut self, family: Family, range: Range) -> Result<Option<GeneratedRange>, GenerateError> {
        self.emit_family_within(family, range, None)
    }

    /// Like [`DirectoryEmitter::emit_family`], but never past `limit`.
    ///
    /// The overflow rule follows `range`: an unbounded request still stops
    /// at an oversized macro even though `limit` makes the run finite.
    pub fn emit_family_within(
        &mut self,
        family: Family,
        range: Range,
        limit: Option<u64>,
    ) -> Result<Option<GeneratedRange>, GenerateError> {
        let stop_on_overflow = range.is_unbounded();
        let end = match (range.end, limit) {
            (Some(end), Some(limit)) => Some(end.min(limit)),
            (end, limit) => end.or(limit),
        };
        let Some(range) = (Range { start: range.start, end }).clamp_start(family.min_n()) else {
            self.summary.set_range(family, None);
            return Ok(None);
        };
        info!("Emitting {family} {range} into {}", self.layout.root.display());
        let mut next = range.start;
        let mut last = None;
        while range.contains(next) {
            let unit = match self.fit(family, next, range.end) {
                Ok(end) => GeneratedRange::new(next, end),
                Err(size) if !stop_on_overflow => {
                    warn!("{family}{next} needs {size} bytes, over the {}-byte budget", self.budget);
                    self.summary.warnings.push(GenerationWarning::Oversized {
                        family,
                        n: next,
                        size,
                        budget: self.budget,
                    });
                    GeneratedRange::single(next)
                }
                Err(size) => {
                    warn!("Stopping {family} before {next}: needs {size} bytes, over the {}-byte budget", self.budget);
                    self.summary.warnings.push(GenerationWarning::Stopped {
                        family: Some(family),
                        n: next,
                        size,
                        budget: self.budget,
                    });
                    break;
                }
            };
            self.write_unit(family, unit, range)?;
            last = Some(unit.end);
            next = match unit.end.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }
        let written = last.map(|end| GeneratedRange::new(range.start, end));
        self.summary.set_range(family, written);
        Ok(written)
    }

    pub fn finish(self) -> GenerationSummary {
        self.summary
    }

    /// Last `n` of the largest unit starting at `start` that fits the budget,
    /// or the predicted size of `start` alone when even that doesn't fit.
    fn fit(&self, family: Family, start: u64, end: Option<u64>) -> Result<u64, usize> {
        let mut body = 0;
        let mut n = start;
        while end.map_or(true, |end| n <= end) {
            let next = self.gen.size(family, n);
            let frame = self.frame_size(family, GeneratedRange::new(start, n));
            let predicted = frame + body + next;
            if predicted > self.budget {
                if n == start {
                    return Err(predicted);
                }
                break;
            }
            body += next;
            n += 1;
        }
        Ok(n - 1)
    }

    /// Guard and include lines for `unit`, everything but the macros.
    fn frame_size(&self, family: Family, unit: GeneratedRange) -> usize {
        measure(|w| {
            self.guard.write_start(w, &ident::encode(self.next_file));
            self.write_includes(w, family, unit);
            w.str(self.guard.end());
        })
    }

    fn write_includes(&self, w: &mut dyn CodeWriter, family: Family, unit: GeneratedRange) {
        let Some((lo, hi)) = dependency_span(family, unit) else {
            return;
        };
        let Some(deps) = self.index.covering(lo, hi) else {
            return;
        };
        let from = self.layout.segments(family, unit);
        for i in deps {
            let dep = self.index.unit(i);
            let to = self.layout.segments(Family::Areuniq, dep);
            w.str("#include \"");
            for dir in relative_dirs(&from, &to) {
                w.str(dir).str("/");
            }
            write_file_name(w, Family::Areuniq, dep);
            w.str("\"\n");
        }
    }

    fn write_unit(&mut self, family: Family, unit: GeneratedRange, range: Range) -> Result<(), GenerateError> {
        let dir = self.layout.dir_of(family, unit);
        if !self.created.contains(&dir) {
            fs::create_dir_all(&dir).map_err(|source| GenerateError::Write { path: dir.clone(), source })?;
            self.created.insert(dir.clone());
        }
        let path = dir.join(file_name(family, unit));
        let file = File::create(&path).map_err(|source| write_error(&path, source))?;
        let mut w = SinkWriter::new(file);
        self.guard.write_start(&mut w, &ident::encode(self.next_file));
        self.write_includes(&mut w, family, unit);
        for n in unit.start..=unit.end {
            match range.end {
                Some(end) => debug!(
                    "Writing {family}{n} ({:.2}%)",
                    (n - range.start + 1) as f64 * 100.0 / (end - range.start + 1) as f64
                ),
                None => debug!("Writing {family}{n}"),
            }
            self.gen.emit(family, &mut w, n);
        }
        w.str(self.guard.end());
        let bytes = w.finish().map_err(|source| write_error(&path, source))?;
        self.next_file += 1;

        if family == Family::Areuniq {
            self.index.push(unit);
        }
        info!("Wrote {} ({bytes} bytes)", path.display());
        self.summary.units.push(UnitReport {
            families: vec![family],
            path: Some(path),
            range: unit,
            bytes,
        });
        Ok(())
    }
}

fn write_error(path: &Path, source: std::io::Error) -> GenerateError {
    GenerateError::Write { path: path.to_path_buf(), source }
}
