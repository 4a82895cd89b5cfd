//! Turns generated macros into header files.
//!
//! Two layouts exist: [`flat`] writes every selected macro into one stream
//! behind a single include guard, and [`directory`] shards each family into
//! size-bounded files that `#include` the `areuniq` shards they call.

pub mod deps;
pub mod directory;
pub mod flat;


use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::codegen::Family;
use crate::range::GeneratedRange;
use crate::writer::{render, CodeWriter};
pub use deps::DependencyIndex;
pub use directory::{DirectoryEmitter, DirectoryLayout};
pub use flat::FlatEmitter;

/// Subdirectory name length used by default when sharding by decimal prefix.
pub const DEFAULT_PREFIX_LENGTH: usize = 2;

/// Default byte budget per file in directory output.
pub const DEFAULT_DIRECTORY_BUDGET: usize = 256 * 1024;

/// Prefix shared by every classic include guard macro.
pub const GUARD_PREFIX: &str = "UNIQ_";

/// How a header protects itself against double inclusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IncludeGuard {
    /// `#ifndef`/`#define`/`#endif` around the file.
    #[default]
    Classic,
    /// `#pragma once` at the top.
    PragmaOnce,
    Omit,
}

impl IncludeGuard {
    /// Writes the opening of a guarded file. `slug` must be unique per file.
    pub fn write_start(self, w: &mut dyn CodeWriter, slug: &str) {
        match self {
            IncludeGuard::Classic => {
                w.str("#ifndef ")
                    .str(GUARD_PREFIX)
                    .str(slug)
                    .str("_H\n#define ")
                    .str(GUARD_PREFIX)
                    .str(slug)
                    .str("_H\n");
            }
            IncludeGuard::PragmaOnce => {
                w.str("#pragma once\n");
            }
            IncludeGuard::Omit => {}
        }
    }

    pub fn end(self) -> &'static str {
        match self {
            IncludeGuard::Classic => "#endif\n",
            IncludeGuard::PragmaOnce | IncludeGuard::Omit => "",
        }
    }
}

/// Which families to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub areuniq: bool,
    pub uniqenum: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self { areuniq: true, uniqenum: true }
    }
}

impl Selection {
    pub fn only(family: Family) -> Self {
        Self {
            areuniq: family == Family::Areuniq,
            uniqenum: family == Family::Uniqenum,
        }
    }

    pub fn contains(&self, family: Family) -> bool {
        match family {
            Family::Areuniq => self.areuniq,
            Family::Uniqenum => self.uniqenum,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.areuniq && !self.uniqenum
    }

    /// Selected families, `areuniq` first.
    pub fn families(self) -> impl Iterator<Item = Family> {
        Family::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Family> for Selection {
    fn from_iter<I: IntoIterator<Item = Family>>(iter: I) -> Self {
        let mut sel = Selection { areuniq: false, uniqenum: false };
        for family in iter {
            match family {
                Family::Areuniq => sel.areuniq = true,
                Family::Uniqenum => sel.uniqenum = true,
            }
        }
        sel
    }
}

/// Writes `<family><n>.h` or `<family><start>-<end>.h`.
pub fn write_file_name(w: &mut dyn CodeWriter, family: Family, unit: GeneratedRange) {
    w.str(family.as_str()).int(unit.start);
    if !unit.is_single() {
        w.str("-").int(unit.end);
    }
    w.str(".h");
}

pub fn file_name(family: Family, unit: GeneratedRange) -> String {
    render(|w| write_file_name(w, family, unit))
}

/// Range of `areuniq` sizes the macros of `unit` call, if any.
///
/// `areuniq(k)` for `k >= pivot` calls sizes in `[floor(2k/3), ceil(2k/3)]`,
/// below the pivot it calls nothing; the span covers both cases.
/// `uniqenum(k)` calls `areuniq(k)` for every `k >= 2`.
pub fn dependency_span(family: Family, unit: GeneratedRange) -> Option<(u64, u64)> {
    match family {
        Family::Areuniq => Some((
            (2 * unit.start / 3).max(2),
            (2 * unit.end).div_ceil(3).max(2),
        )),
        Family::Uniqenum if unit.end < 2 => None,
        Family::Uniqenum => Some((unit.start.max(2), unit.end)),
    }
}

/// One file written by an emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub families: Vec<Family>,
    /// `None` for standard output.
    pub path: Option<PathBuf>,
    pub range: GeneratedRange,
    pub bytes: usize,
}

/// Problems found while emitting. None of these abort generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationWarning {
    /// A single macro didn't fit a file on its own and was written anyway.
    Oversized { family: Family, n: u64, size: usize, budget: usize },
    /// An unbounded run ended because the next macro can't fit any file.
    Stopped { family: Option<Family>, n: u64, size: usize, budget: usize },
    /// Flat output over budget for an explicit range; everything was written.
    FlatOverflow { size: usize, budget: usize },
    /// `areuniq` was emitted from `start` with dependencies omitted, so the
    /// smaller sizes its macros call are not defined by this output.
    OmittedDependencies { start: u64 },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationWarning::Oversized { family, n, size, budget } => write!(
                f,
                "{family}{n} needs {size} bytes, over the {budget}-byte budget; written to its own file"
            ),
            GenerationWarning::Stopped { family: Some(family), n, size, budget } => write!(
                f,
                "stopped before {family}{n}: it needs {size} bytes, over the {budget}-byte budget"
            ),
            GenerationWarning::Stopped { family: None, n, size, budget } => write!(
                f,
                "stopped before n = {n}: output would reach {size} bytes, over the {budget}-byte budget"
            ),
            GenerationWarning::FlatOverflow { size, budget } => write!(
                f,
                "output is {size} bytes, over the {budget}-byte budget"
            ),
            GenerationWarning::OmittedDependencies { start } => write!(
                f,
                "areuniq starts at {start} with dependencies omitted; smaller areuniq sizes it calls must come from elsewhere"
            ),
        }
    }
}

/// What a generation run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub areuniq: Option<GeneratedRange>,
    pub uniqenum: Option<GeneratedRange>,
    pub units: Vec<UnitReport>,
    pub warnings: Vec<GenerationWarning>,
}

impl GenerationSummary {
    pub fn range(&self, family: Family) -> Option<GeneratedRange> {
        match family {
            Family::Areuniq => self.areuniq,
            Family::Uniqenum => self.uniqenum,
        }
    }

    pub(crate) fn set_range(&mut self, family: Family, range: Option<GeneratedRange>) {
        match family {
            Family::Areuniq => self.areuniq = range,
            Family::Uniqenum => self.uniqenum = range,
        }
    }

    pub fn total_bytes(&self) -> usize {
        self.units.iter().map(|u| u.bytes).sum()
    }
}
