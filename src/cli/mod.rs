//! Command-line interface for cryo-fasta.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **classify**: Tell PDB IDs and UniProt IDs apart
//! - **fetch**: Download FASTA for PDB/UniProt identifiers
//! - **entity**: Download single polymer entities (`4HHB_1`)
//! - **search**: Query the RCSB search service
//! - **annotate**: Title the polymer entities of a CIF model from a FASTA file
//! - **align**: Report the best FASTA record for every CIF chain
//!
//! ## Usage
//!
//! ```text
//! # One entry, default output 2BG9_protein.fasta
//! cryo-fasta fetch 2BG9
//!
//! # Several entries into one file
//! cryo-fasta fetch 2BG9 Q8N3Y1 -o combined.fasta
//!
//! # Annotate a ModelAngelo model
//! cryo-fasta annotate model.cif sequences.fasta -o annotated.fasta
//!
//! # Alignment report as CSV, summary as JSON
//! cryo-fasta --format json align model.cif sequences.fasta -o report.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::workflow::Outcome;

pub mod align;
pub mod annotate;
pub mod classify;
pub mod fetch;
pub mod search;

#[derive(Parser)]
#[command(name = "cryo-fasta")]
#[command(version)]
#[command(about = "Fetch reference sequences and annotate cryo-EM model chains")]
#[command(
    long_about = "cryo-fasta builds FASTA files for cryo-EM model building.\n\nIt can:\n- Download sequences for PDB and UniProt identifiers, with retry\n- Search the RCSB and download individual polymer entities\n- Match the chains of a CIF model against a FASTA file and write an annotated FASTA or a CSV report"
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

    /// JSON settings file (timeouts, retries, endpoints, duplicate handling)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify identifiers as PDB, UniProt or unknown
    Classify(classify::ClassifyArgs),

    /// Download FASTA for PDB and UniProt identifiers
    Fetch(fetch::FetchArgs),

    /// Download polymer entities from the RCSB Data API
    Entity(fetch::EntityArgs),

    /// Search the RCSB
    Search(search::SearchArgs),

    /// Write an annotated FASTA from a CIF model and a FASTA file
    Annotate(annotate::AnnotateArgs),

    /// Write a CSV of best matches between CIF chains and FASTA records
    Align(align::AlignArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Settings from `--config`, or defaults
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// Print a workflow outcome and fail the command if it failed
///
/// # Errors
///
/// Returns an error carrying the outcome message when `success` is false.
pub fn report_outcome(outcome: &Outcome, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if outcome.success {
                println!("{}", outcome.message);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Tsv => {
            println!("success\tmessage");
            println!("{}\t{}", outcome.success, outcome.message);
        }
    }

    if !outcome.success {
        anyhow::bail!("{}", outcome.message);
    }
    Ok(())
}
