use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use noodles::fasta;

use crate::cli::OutputFormat;
use crate::digest::builder::{write_digest, RestrictionSite};
use crate::utils::io::{open_input, open_output};

#[derive(Args)]
pub struct DigestArgs {
    /// Reference FASTA (optionally gzipped). Use '-' for stdin
    #[arg(required = true)]
    pub fasta: PathBuf,

    /// Restriction site with '^' marking the cut, e.g. A^AGCTT for HindIII
    #[arg(short = 'r', long)]
    pub site: RestrictionSite,

    /// Output path (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute digest subcommand
///
/// # Errors
///
/// Returns an error if the FASTA can't be read or the digest can't be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DigestArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let input = open_input(&args.fasta)
        .with_context(|| format!("Failed to open {}", args.fasta.display()))?;
    let mut reader = fasta::io::Reader::new(input);
    let mut output = open_output(args.output.as_deref()).context("Failed to open output")?;

    let fragments = write_digest(&mut reader, &mut output, &args.site)
        .with_context(|| format!("Failed to digest {}", args.fasta.display()))?;

    if verbose {
        match format {
            OutputFormat::Json => eprintln!(
                "{}",
                serde_json::json!({ "site": args.site.to_string(), "fragments": fragments })
            ),
            OutputFormat::Text | OutputFormat::Tsv => {
                eprintln!("Wrote {fragments} fragments for site {}", args.site);
            }
        }
    }
    Ok(())
}
