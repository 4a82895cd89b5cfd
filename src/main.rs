use std::path::PathBuf;

use clap::Parser;
use uniqenum::cli;
use uniqenum::codegen::{AssertWhen, Assertion, Family};
use uniqenum::emitter::{IncludeGuard, Selection};
use uniqenum::format::Template;
use uniqenum::generate::{DependencyPolicy, GenerateOptions, OutputTarget};
use uniqenum::range::Range;

#[derive(Parser)]
#[command(name = "uniqenum")]
#[command(about = "Generates C macros that declare enums and prove their values are pairwise distinct")]
#[command(version)]
struct Cli {
    /// Sizes to generate: N, A-B, A- or A-inf
    range: Option<Range>,

    /// Macro family to generate (repeatable; defaults to both)
    #[arg(long = "family", value_enum)]
    families: Vec<Family>,

    /// Don't pull in areuniq macros when only uniqenum is selected
    #[arg(long)]
    no_deps: bool,

    /// Write everything into one file
    #[arg(short, long, conflicts_with = "dir")]
    output: Option<PathBuf>,

    /// Shard output into size-bounded files under this directory
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Byte budget per file
    #[arg(long)]
    max_size: Option<usize>,

    #[arg(long, value_enum)]
    guard: Option<IncludeGuard>,

    /// Name template for areuniq macros, must contain {n}
    #[arg(long)]
    areuniq_name: Option<String>,

    /// Name template for uniqenum macros, must contain {n}
    #[arg(long)]
    uniqenum_name: Option<String>,

    /// Assert distinctness once per enum or once per pair
    #[arg(long = "assert", value_enum)]
    assert_when: Option<AssertWhen>,

    /// Assertion message template
    #[arg(long)]
    assert_message: Option<String>,

    /// Digits per subdirectory level in directory output
    #[arg(long)]
    prefix_length: Option<usize>,

    /// Load options from a JSON file; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the default JSON configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Print a JSON summary of what was written
    #[arg(long)]
    json: bool,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(self, opts: &mut GenerateOptions) {
        if let Some(range) = self.range {
            opts.range = range;
        }
        if !self.families.is_empty() {
            opts.families = self.families.into_iter().collect::<Selection>();
        }
        if self.no_deps {
            opts.dependencies = DependencyPolicy::Omit;
        }
        if let Some(path) = self.output {
            opts.output = OutputTarget::File(path);
        }
        if let Some(path) = self.dir {
            opts.output = OutputTarget::Directory(path);
        }
        if self.max_size.is_some() {
            opts.max_size = self.max_size;
        }
        if let Some(guard) = self.guard {
            opts.include_guard = guard;
        }
        if let Some(name) = self.areuniq_name {
            opts.generator.names.areuniq = Template::parse(&name);
        }
        if let Some(name) = self.uniqenum_name {
            opts.generator.names.uniqenum = Template::parse(&name);
        }
        if let Some(when) = self.assert_when {
            opts.generator.assertion = Assertion::new(when);
        }
        if let Some(message) = self.assert_message {
            opts.generator.assertion.message = Template::parse(&message);
        }
        if let Some(len) = self.prefix_length {
            opts.prefix_length = len;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    cli::init_logging(args.verbose);

    if args.print_config {
        return cli::default_config();
    }

    let mut opts = cli::load_options(args.config.as_deref())?;
    let json = args.json;
    args.apply(&mut opts);
    cli::run(opts, json)
}
