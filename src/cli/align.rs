use std::path::PathBuf;

use clap::Args;

use crate::cli::{report_outcome, OutputFormat};
use crate::config::Settings;
use crate::core::context::RunContext;
use crate::core::types::DuplicatePolicy;
use crate::matching::{AlignmentResult, MatchingConfig, ScoringWeights, SequenceMatcher};
use crate::matching::scoring::{COVERAGE_WEIGHT, IDENTITY_WEIGHT};
use crate::output::report::NO_MATCH;
use crate::workflow::Annotator;

#[derive(Args)]
pub struct AlignArgs {
    /// CIF model, plain or gzipped
    #[arg(required = true)]
    pub cif: PathBuf,

    /// FASTA file with the reference sequences
    #[arg(required = true)]
    pub fasta: PathBuf,

    /// Output CSV file (default alignment_report.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the alignments instead of writing a CSV
    #[arg(long, conflicts_with = "output")]
    pub print: bool,

    /// How to treat repeated FASTA headers (overrides the config file)
    #[arg(long, value_enum)]
    pub duplicates: Option<DuplicatePolicy>,

    /// Weight for positional identity
    #[arg(long, default_value_t = IDENTITY_WEIGHT, value_parser = parse_weight)]
    pub weight_identity: f64,

    /// Weight for longest-common-substring coverage
    #[arg(long, default_value_t = COVERAGE_WEIGHT, value_parser = parse_weight)]
    pub weight_coverage: f64,
}

fn parse_weight(value: &str) -> Result<f64, String> {
    let weight: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err("must be a non-negative number".to_string())
    }
}

/// Execute align subcommand
///
/// # Errors
///
/// Returns an error if an input is missing or unparsable or the report cannot
/// be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: AlignArgs,
    settings: Settings,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let duplicates = args
        .duplicates
        .unwrap_or(settings.parsing.duplicate_headers);
    let scoring_weights = ScoringWeights {
        identity: args.weight_identity,
        coverage: args.weight_coverage,
    };
    if verbose {
        let norm = scoring_weights.normalized();
        eprintln!(
            "Scoring weights: {:.0}% identity, {:.0}% coverage",
            norm.identity * 100.0,
            norm.coverage * 100.0
        );
    }

    let annotator = Annotator::new(duplicates)
        .with_matcher(SequenceMatcher::with_config(MatchingConfig { scoring_weights }))
        .with_context(RunContext::new("align"));

    if args.print {
        let results = match annotator.align(&args.cif, &args.fasta) {
            Ok(results) => results,
            Err(outcome) => return report_outcome(&outcome, format),
        };
        print_results(&results, format)?;
        return Ok(());
    }

    let outcome = annotator.create_alignment_report(&args.cif, &args.fasta, args.output.as_deref());
    report_outcome(&outcome, format)
}

fn print_results(results: &[AlignmentResult], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for result in results {
                println!(
                    "Chain {}: {} ({:.1}%)",
                    result.chain_id,
                    result.header.as_deref().unwrap_or(NO_MATCH),
                    result.similarity * 100.0
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::Tsv => {
            println!("cif_chain\tfasta_sequence\tsequence_similarity");
            for result in results {
                println!(
                    "{}\t{}\t{:.4}",
                    result.chain_id,
                    result.header.as_deref().unwrap_or(NO_MATCH),
                    result.similarity
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_flags_reject_negatives() {
        assert_eq!(parse_weight("0.7"), Ok(0.7));
        assert_eq!(parse_weight("0"), Ok(0.0));
        assert!(parse_weight("-1").is_err());
        assert!(parse_weight("NaN").is_err());
        assert!(parse_weight("heavy").is_err());
    }
}
