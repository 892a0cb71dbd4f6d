use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Database an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    Pdb,
    Uniprot,
    Unknown,
}

impl IdKind {
    /// Short label used in batch summaries (`PDB:2BG9`, `UniProt:Q8N3Y1`)
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdb => "PDB",
            Self::Uniprot => "UniProt",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdb => write!(f, "pdb"),
            Self::Uniprot => write!(f, "uniprot"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A classified accession token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    token: String,
    kind: IdKind,
}

impl Identifier {
    /// Classify a token. Unknown tokens are kept with `IdKind::Unknown`.
    pub fn classify(token: impl Into<String>) -> Self {
        let token = token.into();
        let kind = classify(&token);
        Self { token, kind }
    }

    /// Classify a token, rejecting anything that is neither PDB nor UniProt.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidIdentifier` if the token matches no known format.
    pub fn parse(token: &str) -> Result<Self, Error> {
        let id = Self::classify(token);
        if id.kind == IdKind::Unknown {
            return Err(Error::InvalidIdentifier(token.to_string()));
        }
        Ok(id)
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn kind(&self) -> IdKind {
        self.kind
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.label(), self.token)
    }
}

/// Classify a token as a PDB ID, a UniProt ID, or unknown.
///
/// PDB is checked first, so a token valid under both rules is `Pdb`.
///
/// # Examples
///
/// ```
/// use cryo_fasta::core::types::{classify, IdKind};
///
/// assert_eq!(classify("2BG9"), IdKind::Pdb);
/// assert_eq!(classify("Q8N3Y1"), IdKind::Uniprot);
/// assert_eq!(classify("INVALID"), IdKind::Unknown);
/// ```
#[must_use]
pub fn classify(token: &str) -> IdKind {
    if is_valid_pdb_id(token) {
        IdKind::Pdb
    } else if is_valid_uniprot_id(token) {
        IdKind::Uniprot
    } else {
        IdKind::Unknown
    }
}

/// PDB IDs are exactly 4 alphanumeric characters
#[must_use]
pub fn is_valid_pdb_id(token: &str) -> bool {
    token.len() == 4 && token.chars().all(|c| c.is_ascii_alphanumeric())
}

/// UniProt accession (6 or 10 characters) or entry name (`P53_HUMAN`)
#[must_use]
pub fn is_valid_uniprot_id(token: &str) -> bool {
    is_uniprot_accession(token) || is_uniprot_entry_name(token)
}

/// Six-character accessions, plus the ten-character form for the A-N/R-Z prefix
static ACCESSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9](?:[A-Z][A-Z0-9]{2}[0-9]){1,2})$")
        .expect("accession pattern compiles")
});

/// `MNEMONIC_SPECIES`, one underscore between two uppercase alphanumeric parts
static ENTRY_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]+_[A-Z0-9]+$").expect("entry name pattern compiles"));

fn is_uniprot_accession(token: &str) -> bool {
    ACCESSION_PATTERN.is_match(token)
}

/// Maximum length of a UniProt entry name accepted here
pub const MAX_ENTRY_NAME_LENGTH: usize = 11;

fn is_uniprot_entry_name(token: &str) -> bool {
    token.len() <= MAX_ENTRY_NAME_LENGTH && ENTRY_NAME_PATTERN.is_match(token)
}

/// How to treat a FASTA header that appears more than once in one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first record, warn about later ones
    #[default]
    KeepFirst,
    /// Later records replace earlier ones
    KeepLast,
    /// Fail the parse
    Reject,
}
