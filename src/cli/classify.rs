use clap::Args;

use crate::cli::OutputFormat;
use crate::core::types::{IdKind, Identifier};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Identifiers to classify
    #[arg(required = true)]
    pub identifiers: Vec<String>,
}

/// Execute classify subcommand
///
/// # Errors
///
/// Returns an error if any identifier is neither a PDB nor a UniProt ID.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ClassifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let identifiers: Vec<Identifier> = args
        .identifiers
        .iter()
        .map(|token| Identifier::classify(token.trim()))
        .collect();

    match format {
        OutputFormat::Text => {
            for id in &identifiers {
                println!("{}: {}", id.token(), id.kind());
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = identifiers
                .iter()
                .map(|id| {
                    serde_json::json!({
                        "identifier": id.token(),
                        "kind": id.kind(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("identifier\tkind");
            for id in &identifiers {
                println!("{}\t{}", id.token(), id.kind());
            }
        }
    }

    let unknown = identifiers
        .iter()
        .filter(|id| id.kind() == IdKind::Unknown)
        .count();
    if verbose {
        eprintln!(
            "Classified {} identifiers ({unknown} unknown)",
            identifiers.len()
        );
    }
    if unknown > 0 {
        anyhow::bail!("{unknown} identifier(s) are not valid PDB or UniProt IDs");
    }
    Ok(())
}
