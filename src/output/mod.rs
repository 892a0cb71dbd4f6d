//! File writers for FASTA output and CSV alignment reports.
//!
//! Every writer creates or truncates its target and finishes the file within
//! the call. Failures carry the path; nothing is retried.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod fasta;
pub mod report;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl WriteError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Csv { path, .. } => path,
        }
    }
}
