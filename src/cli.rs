use std::path::Path;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use crate::codegen::Family;
use crate::emitter::GenerationSummary;
use crate::generate::{generate, GenerateOptions, OutputTarget};

/// Logs go to stderr so generated C can own stdout.
pub fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Options from a JSON file, or the defaults.
pub fn load_options(config: Option<&Path>) -> anyhow::Result<GenerateOptions> {
    let Some(path) = config else {
        return Ok(GenerateOptions::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn default_config() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&GenerateOptions::default())?);
    Ok(())
}

pub fn run(opts: GenerateOptions, json: bool) -> anyhow::Result<()> {
    if json && opts.output == OutputTarget::Stdout {
        bail!("--json needs -o or -d; standard output already carries the generated C");
    }
    let summary = generate(&opts)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        report(&summary);
    }
    Ok(())
}

fn report(summary: &GenerationSummary) {
    for family in Family::ALL {
        match summary.range(family) {
            Some(range) => eprintln!("{family}: generated {range}"),
            None => eprintln!("{family}: nothing generated"),
        }
    }
    eprintln!("{} file(s), {} bytes", summary.units.len(), summary.total_bytes());
}
