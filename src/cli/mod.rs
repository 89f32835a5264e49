//! Command-line interface for hic-tools.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **digest**: Build a restriction digest from a reference FASTA
//! - **annotate**: Tag every valid read pair with its Hi-C metrics
//! - **filter**: Keep only read pairs passing the Hi-C filter rules
//! - **extract**: Tabulate Hi-C metrics per read pair
//!
//! ## Usage
//!
//! ```text
//! # Digest a reference with HindIII
//! hic-tools digest genome.fa -r A^AGCTT -o genome.digest
//!
//! # Annotate a name-sorted SAM stream
//! samtools view -h -n sample.bam | hic-tools annotate - -d genome.digest
//!
//! # Tabulate an already annotated stream
//! hic-tools extract sample.annotated.sam -n sample1
//!
//! # Filter, writing the summary as JSON
//! hic-tools filter sample.sam -d genome.digest --min-inward 1000 --max-ditag 1000 \
//!     --summary sample.summary.json --format json
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::diagnostics::TracingDiagnostics;
use crate::digest::index::DigestIndex;
use crate::pairing::driver::{Driver, DriverError, Mode};
use crate::pairing::summary::Summary;
use crate::utils::io::{open_input, open_output};

pub mod annotate;
pub mod digest;
pub mod extract;
pub mod filter;

#[derive(Parser)]
#[command(name = "hic-tools")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Annotate and filter Hi-C read pairs against a restriction digest")]
#[command(
    long_about = "hic-tools classifies name-sorted Hi-C read pairs by the restriction fragments their reads fall on.\n\nFor each pair it derives:\n- Orientation (Inward, Outward, Same-forward, Same-reverse)\n- Interaction type (cis or trans)\n- Ditag length, insert size and fragment separation\n\nand writes them as SAM tags, filters on them, or tabulates them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for summaries
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a restriction digest from a reference FASTA
    Digest(digest::DigestArgs),

    /// Tag read pairs with Hi-C metrics
    Annotate(annotate::AnnotateArgs),

    /// Filter read pairs on Hi-C metrics
    Filter(filter::FilterArgs),

    /// Write Hi-C metrics per read pair as a table
    Extract(extract::ExtractArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Arguments shared by the commands that read a SAM stream
#[derive(clap::Args)]
pub struct StreamArgs {
    /// Name-sorted SAM input (optionally gzipped). Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Restriction digest produced by `hic-tools digest`. Required except
    /// for `extract` on input that `annotate` has already tagged
    #[arg(short, long)]
    pub digest: Option<PathBuf>,

    /// Output path (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sample name for the summary (defaults to the input path)
    #[arg(short = 'n', long)]
    pub sample: Option<String>,
}

impl StreamArgs {
    #[must_use]
    pub fn sample_name(&self) -> String {
        self.sample
            .clone()
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

/// Load the digest and run the SAM stream through the driver
///
/// # Errors
///
/// Returns an error if any file can't be opened, the digest is malformed, or
/// the stream hits a fatal error.
pub(crate) fn run_stream(args: &StreamArgs, mode: &Mode) -> anyhow::Result<Summary> {
    let index = match &args.digest {
        Some(path) => Some(
            DigestIndex::from_path(path)
                .with_context(|| format!("Failed to load digest {}", path.display()))?,
        ),
        None if matches!(mode, Mode::Extract) => None,
        None => return Err(DriverError::MissingDigest(mode.name()).into()),
    };
    let input = open_input(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let mut output = open_output(args.output.as_deref()).context("Failed to open output")?;

    let diagnostics = TracingDiagnostics;
    let driver = Driver::new(index.as_ref(), &diagnostics, args.sample_name());
    let summary = driver
        .run(input, &mut output, mode)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;
    Ok(summary)
}

/// Write a summary to `path`, or stderr if `None`
///
/// # Errors
///
/// Returns an error if the summary can't be written.
pub(crate) fn write_summary(
    summary: &Summary,
    path: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(p) => Box::new(
            File::create(p).with_context(|| format!("Failed to create {}", p.display()))?,
        ),
        None => Box::new(io::stderr().lock()),
    };

    match format {
        OutputFormat::Text | OutputFormat::Tsv => summary.write_tsv(&mut writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, summary)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}
