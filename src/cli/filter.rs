use std::path::PathBuf;

use clap::Args;

use crate::cli::{run_stream, write_summary, OutputFormat, StreamArgs};
use crate::pairing::driver::Mode;
use crate::pairing::filter::{FilterConfig, FilterEngine};

#[derive(Args)]
pub struct FilterArgs {
    #[command(flatten)]
    pub stream: StreamArgs,

    /// Write the filter summary here instead of stderr
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Minimum insert size for inward-facing cis pairs
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub min_inward: Option<u64>,

    /// Minimum insert size for outward-facing cis pairs
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub min_outward: Option<u64>,

    /// Maximum ditag length
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_ditag: Option<u64>,

    /// Minimum ditag length
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub min_ditag: Option<u64>,
}

impl FilterArgs {
    #[must_use]
    pub fn config(&self) -> FilterConfig {
        FilterConfig {
            min_inward: self.min_inward,
            min_outward: self.min_outward,
            max_ditag: self.max_ditag,
            min_ditag: self.min_ditag,
        }
    }
}

/// Execute filter subcommand
///
/// # Errors
///
/// Returns an error if no threshold is set, the inputs can't be read, or the
/// stream is malformed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FilterArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    // Refuse before touching any input
    let engine = FilterEngine::new(args.config())?;

    if verbose {
        eprintln!("Filter settings: {}", serde_json::to_string(engine.config())?);
    }

    let summary = run_stream(&args.stream, &Mode::Filter(engine))?;
    write_summary(&summary, args.summary.as_deref(), format)
}
