use std::path::PathBuf;

use clap::Args;

use crate::cli::{report_outcome, OutputFormat};
use crate::config::{Settings, MAX_RETRY_DELAY_SECS};
use crate::core::context::RunContext;
use crate::workflow::FastaBuilder;

/// Network options that override the config file
#[derive(Args, Debug, Default)]
pub struct FetchOptions {
    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Attempts per request
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Seconds to wait between attempts
    #[arg(long, value_parser = parse_retry_delay)]
    pub retry_delay: Option<f64>,
}

fn parse_retry_delay(value: &str) -> Result<f64, String> {
    let delay: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=MAX_RETRY_DELAY_SECS).contains(&delay) {
        Ok(delay)
    } else {
        Err(format!("must be between 0 and {MAX_RETRY_DELAY_SECS} seconds"))
    }
}

impl FetchOptions {
    /// Apply command-line overrides on top of `settings`
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(timeout) = self.timeout {
            settings.fetch.timeout_secs = timeout;
        }
        if let Some(max_retries) = self.max_retries {
            settings.fetch.max_retries = max_retries;
        }
        if let Some(delay) = self.retry_delay {
            settings.fetch.retry_delay_secs = if delay.is_finite() {
                delay.clamp(0.0, MAX_RETRY_DELAY_SECS)
            } else {
                0.0
            };
        }
    }
}

#[derive(Args)]
pub struct FetchArgs {
    /// PDB IDs (2BG9) and/or UniProt IDs (Q8N3Y1, P53_HUMAN)
    #[arg(required = true)]
    pub identifiers: Vec<String>,

    /// Output FASTA file (default {ID}_protein.fasta, or
    /// combined_protein.fasta for several identifiers)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a combined file even for a single identifier
    #[arg(long)]
    pub multiple: bool,

    #[command(flatten)]
    pub network: FetchOptions,
}

#[derive(Args)]
pub struct EntityArgs {
    /// Polymer entity IDs such as 4HHB_1
    #[arg(required = true)]
    pub entities: Vec<String>,

    /// Output FASTA file (default entity_sequences.fasta)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub network: FetchOptions,
}

/// Execute fetch subcommand
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created or nothing could be
/// fetched and written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: FetchArgs,
    mut settings: Settings,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    args.network.apply(&mut settings);
    if verbose {
        eprintln!(
            "Fetching {} identifier(s): timeout {}s, {} attempts, {}s delay",
            args.identifiers.len(),
            settings.fetch.timeout_secs,
            settings.fetch.retry_policy().attempts(),
            settings.fetch.retry_delay_secs
        );
    }

    let builder = FastaBuilder::new(&settings)?.with_context(RunContext::new("fetch"));
    let outcome = if args.multiple || args.identifiers.len() > 1 {
        builder.build_from_identifiers(&args.identifiers, args.output.as_deref())
    } else {
        builder.build_from_identifier(&args.identifiers[0], args.output.as_deref())
    };
    report_outcome(&outcome, format)
}

/// Execute entity subcommand
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created or no entity could be
/// fetched and written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_entities(
    args: EntityArgs,
    mut settings: Settings,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    args.network.apply(&mut settings);
    if verbose {
        eprintln!("Fetching {} entities", args.entities.len());
    }

    let builder = FastaBuilder::new(&settings)?.with_context(RunContext::new("entity"));
    let outcome = builder.build_from_entities(&args.entities, args.output.as_deref());
    report_outcome(&outcome, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_override_settings() {
        let mut settings = Settings::default();
        let options = FetchOptions {
            timeout: Some(5),
            max_retries: Some(1),
            retry_delay: Some(-2.0),
        };
        options.apply(&mut settings);
        assert_eq!(settings.fetch.timeout_secs, 5);
        assert_eq!(settings.fetch.max_retries, 1);
        assert!(settings.fetch.retry_delay_secs.abs() < f64::EPSILON);
    }

    #[test]
    fn test_retry_delay_flag_range() {
        assert_eq!(parse_retry_delay("0.5"), Ok(0.5));
        assert!(parse_retry_delay("-1").is_err());
        assert!(parse_retry_delay("1e30").is_err());
        assert!(parse_retry_delay("inf").is_err());
        assert!(parse_retry_delay("soon").is_err());
    }

    #[test]
    fn test_no_options_keep_settings() {
        let mut settings = Settings::default();
        FetchOptions::default().apply(&mut settings);
        assert_eq!(settings, Settings::default());
    }
}
