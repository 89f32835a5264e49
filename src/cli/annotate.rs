use clap::Args;

use crate::cli::{run_stream, OutputFormat, StreamArgs};
use crate::pairing::driver::Mode;

#[derive(Args)]
pub struct AnnotateArgs {
    #[command(flatten)]
    pub stream: StreamArgs,
}

/// Execute annotate subcommand
///
/// # Errors
///
/// Returns an error if the inputs can't be read or the stream is malformed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AnnotateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let summary = run_stream(&args.stream, &Mode::Annotate)?;

    if verbose {
        let counts = &summary.counts;
        match format {
            OutputFormat::Json => eprintln!("{}", serde_json::to_string(counts)?),
            OutputFormat::Text | OutputFormat::Tsv => eprintln!(
                "Annotated {} of {} read pairs ({} invalid)",
                counts.retained, counts.total, counts.invalid
            ),
        }
    }
    Ok(())
}
