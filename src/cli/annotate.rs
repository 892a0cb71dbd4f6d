use std::path::PathBuf;

use clap::Args;

use crate::cli::{report_outcome, OutputFormat};
use crate::config::Settings;
use crate::core::context::RunContext;
use crate::core::types::DuplicatePolicy;
use crate::workflow::Annotator;

#[derive(Args)]
pub struct AnnotateArgs {
    /// CIF model (e.g. ModelAngelo output), plain or gzipped
    #[arg(required = true)]
    pub cif: PathBuf,

    /// FASTA file with the reference sequences
    #[arg(required = true)]
    pub fasta: PathBuf,

    /// Output FASTA file (default annotated_sequence.fasta)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How to treat repeated FASTA headers (overrides the config file)
    #[arg(long, value_enum)]
    pub duplicates: Option<DuplicatePolicy>,
}

/// Execute annotate subcommand
///
/// # Errors
///
/// Returns an error if an input is missing or unparsable or the output cannot
/// be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: AnnotateArgs,
    settings: Settings,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let duplicates = args
        .duplicates
        .unwrap_or(settings.parsing.duplicate_headers);
    if verbose {
        eprintln!(
            "Annotating {} with {}",
            args.cif.display(),
            args.fasta.display()
        );
    }

    let annotator = Annotator::new(duplicates).with_context(RunContext::new("annotate"));
    let outcome = annotator.create_annotated_sequence(&args.cif, &args.fasta, args.output.as_deref());
    report_outcome(&outcome, format)
}
