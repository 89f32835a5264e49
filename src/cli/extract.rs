use clap::Args;

use crate::cli::{run_stream, OutputFormat, StreamArgs};
use crate::pairing::driver::Mode;

#[derive(Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub stream: StreamArgs,
}

/// Execute extract subcommand
///
/// # Errors
///
/// Returns an error if the inputs can't be read or the stream is malformed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExtractArgs, _format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let summary = run_stream(&args.stream, &Mode::Extract)?;

    if verbose {
        eprintln!(
            "Extracted {} read pairs ({} invalid skipped)",
            summary.counts.retained, summary.counts.invalid
        );
    }
    Ok(())
}
