use std::path::PathBuf;

use clap::Args;

use crate::cli::fetch::FetchOptions;
use crate::cli::{report_outcome, OutputFormat};
use crate::config::Settings;
use crate::core::context::RunContext;
use crate::fetch::search::{ReturnType, SearchRequest, DEFAULT_SEARCH_ROWS};
use crate::workflow::FastaBuilder;

#[derive(Args)]
pub struct SearchArgs {
    /// Free text, or a UniProt accession with --uniprot
    #[arg(required = true)]
    pub query: String,

    /// Find polymer entities mapped to this UniProt accession
    #[arg(long)]
    pub uniprot: bool,

    /// Return polymer entity IDs (4HHB_1) instead of entry IDs
    #[arg(long)]
    pub entities: bool,

    /// Maximum number of hits
    #[arg(short = 'n', long, default_value_t = DEFAULT_SEARCH_ROWS)]
    pub rows: usize,

    /// Download the hits as FASTA
    #[arg(long)]
    pub fetch: bool,

    /// Output FASTA file for --fetch
    #[arg(short, long, requires = "fetch")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub network: FetchOptions,
}

impl SearchArgs {
    fn request(&self) -> SearchRequest {
        let request = if self.uniprot {
            SearchRequest::uniprot_accession(self.query.trim())
        } else {
            SearchRequest::full_text(self.query.trim())
        };
        let request = if self.entities {
            request.with_return_type(ReturnType::PolymerEntity)
        } else {
            request
        };
        request.with_rows(self.rows)
    }
}

/// Execute search subcommand
///
/// # Errors
///
/// Returns an error if the search service cannot be reached, or with
/// `--fetch`, if none of the hits could be downloaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: SearchArgs,
    mut settings: Settings,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    args.network.apply(&mut settings);
    let request = args.request();
    let builder = FastaBuilder::new(&settings)?.with_context(RunContext::new("search"));

    let response = builder.search(&request)?;
    let hits = response.identifiers();
    if verbose {
        eprintln!(
            "{} hits (total {})",
            hits.len(),
            response.total_count.unwrap_or(hits.len() as u64)
        );
    }

    if args.fetch {
        if hits.is_empty() {
            anyhow::bail!("No search hits to fetch for '{}'", args.query);
        }
        let outcome = match request.return_type {
            ReturnType::Entry => builder.build_from_identifiers(&hits, args.output.as_deref()),
            ReturnType::PolymerEntity => builder.build_from_entities(&hits, args.output.as_deref()),
        };
        return report_outcome(&outcome, format);
    }

    match format {
        OutputFormat::Text => {
            if hits.is_empty() {
                eprintln!("No hits for '{}'", args.query);
            }
            for hit in &hits {
                println!("{hit}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Tsv => {
            println!("identifier\tscore");
            for hit in &response.result_set {
                let score = hit.score.map(|s| format!("{s:.4}")).unwrap_or_default();
                println!("{}\t{score}", hit.identifier);
            }
        }
    }
    Ok(())
}
