//! Crate-level error type.
//!
//! Each layer has its own error enum ([`ParseError`], [`WriteError`],
//! [`TransportError`], [`ConfigError`]); this type
//! collects the failures a workflow can report.

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::transport::TransportError;
use crate::output::WriteError;
use crate::parsing::ParseError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid identifier format: {0} (not a valid PDB ID or UniProt ID)")]
    InvalidIdentifier(String),

    #[error("Invalid entity identifier: {0} (expected ENTRY_ENTITY, e.g. 4HHB_1)")]
    InvalidEntityId(String),

    #[error("Failed to fetch {subject} after {attempts} attempts")]
    FetchFailed { subject: String, attempts: u32 },

    #[error("Unexpected response for {subject}: {reason}")]
    UnexpectedResponse { subject: String, reason: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, Error>;
