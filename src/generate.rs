//! Entry point tying configuration, the macro generator and the emitters together.

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::codegen::{CodeGenerator, Family, GeneratorConfig};
use crate::emitter::{
    DirectoryEmitter, DirectoryLayout, FlatEmitter, GenerationSummary, GenerationWarning, IncludeGuard, Selection,
    DEFAULT_DIRECTORY_BUDGET, DEFAULT_PREFIX_LENGTH,
};
use crate::error::GenerateError;
use crate::range::Range;

/// Whether requesting `uniqenum` pulls in the `areuniq` macros it calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyPolicy {
    #[default]
    Include,
    Omit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Stdout,
    File(PathBuf),
    Directory(PathBuf),
}

impl OutputTarget {
    fn describe(&self) -> &'static str {
        match self {
            OutputTarget::Stdout => "stdout",
            OutputTarget::File(_) => "file",
            OutputTarget::Directory(_) => "directory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub range: Range,
    pub families: Selection,
    pub dependencies: DependencyPolicy,
    pub output: OutputTarget,
    /// Byte budget per output file. Directories fall back to
    /// [`DEFAULT_DIRECTORY_BUDGET`]; flat output has no limit by default.
    pub max_size: Option<usize>,
    pub include_guard: IncludeGuard,
    pub generator: GeneratorConfig,
    /// Decimal digits per subdirectory level in directory output.
    pub prefix_length: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            range: Range::new(1, 64),
            families: Selection::default(),
            dependencies: DependencyPolicy::default(),
            output: OutputTarget::default(),
            max_size: None,
            include_guard: IncludeGuard::default(),
            generator: GeneratorConfig::default(),
            prefix_length: DEFAULT_PREFIX_LENGTH,
        }
    }
}

impl GenerateOptions {
    /// Families to emit once dependencies are accounted for.
    pub fn selection(&self) -> Selection {
        let mut selection = self.families;
        if selection.uniqenum && self.dependencies == DependencyPolicy::Include {
            selection.areuniq = true;
        }
        selection
    }

    pub fn budget(&self) -> Option<usize> {
        match self.output {
            OutputTarget::Directory(_) => Some(self.max_size.unwrap_or(DEFAULT_DIRECTORY_BUDGET)),
            _ => self.max_size,
        }
    }

    /// First `areuniq` size to emit. Included dependencies reach down to the
    /// smallest size, since clique-form macros call ever smaller ones.
    pub fn areuniq_start(&self) -> u64 {
        match self.dependencies {
            DependencyPolicy::Include => self.range.start.min(Family::Areuniq.min_n()),
            DependencyPolicy::Omit => self.range.start,
        }
    }

    /// Rejects configurations that can't produce output, before anything is written.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.families.is_empty() {
            return Err(GenerateError::NoFamilySelected);
        }
        self.range.validate()?;
        self.generator.validate()?;
        let names = &self.generator.names;
        if names.areuniq.source() == names.uniqenum.source() {
            return Err(GenerateError::InvalidConfig(format!(
                "areuniq and uniqenum name templates are both {:?}",
                names.areuniq.source()
            )));
        }
        if self.range.is_unbounded() && self.budget().is_none() {
            return Err(GenerateError::UnboundedOutput { target: self.output.describe() });
        }
        Ok(())
    }
}

/// Generates the configured macros and returns what was written.
pub fn generate(opts: &GenerateOptions) -> Result<GenerationSummary, GenerateError> {
    opts.validate()?;
    let gen = CodeGenerator::new(opts.generator.clone());
    let selection = opts.selection();
    info!("Generating {} into {}", opts.range, opts.output.describe());

    let mut summary = match &opts.output {
        OutputTarget::Stdout => flat_emitter(&gen, opts).emit(opts.range, io::stdout().lock(), None)?,
        OutputTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|source| GenerateError::Write { path: parent.to_path_buf(), source })?;
            }
            let file = File::create(path).map_err(|source| GenerateError::Write { path: path.clone(), source })?;
            flat_emitter(&gen, opts).emit(opts.range, file, Some(path.clone()))?
        }
        OutputTarget::Directory(root) => {
            let layout = DirectoryLayout::new(root, opts.prefix_length);
            let budget = opts.budget().unwrap_or(DEFAULT_DIRECTORY_BUDGET);
            let mut emitter = DirectoryEmitter::new(&gen, opts.include_guard, layout, budget);

            let mut areuniq = None;
            if selection.areuniq {
                let range = Range {
                    start: opts.areuniq_start(),
                    end: opts.range.end,
                };
                areuniq = emitter.emit_family(Family::Areuniq, range)?;
            }
            if selection.uniqenum {
                emitter.emit_family_within(Family::Uniqenum, opts.range, areuniq.map(|written| written.end))?;
            }
            emitter.finish()
        }
    };

    if let Some(written) = summary.areuniq {
        if written.start > Family::Areuniq.min_n() && opts.dependencies == DependencyPolicy::Omit {
            warn!("areuniq starts at {} with dependencies omitted", written.start);
            summary
                .warnings
                .push(GenerationWarning::OmittedDependencies { start: written.start });
        }
    }
    Ok(summary)
}

fn flat_emitter<'a>(gen: &'a CodeGenerator, opts: &GenerateOptions) -> FlatEmitter<'a> {
    let flat = FlatEmitter::new(gen, opts.include_guard, opts.selection(), opts.max_size);
    match opts.dependencies {
        DependencyPolicy::Include => flat.areuniq_from(Family::Areuniq.min_n()),
        DependencyPolicy::Omit => flat,
    }
}
