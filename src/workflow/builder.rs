use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::Settings;
use crate::core::context::RunContext;
use crate::core::record::SequenceRecord;
use crate::core::types::{DuplicatePolicy, IdKind, Identifier};
use crate::error::Error;
use crate::fetch::search::{EntityId, EntityMetadata, SearchRequest, SearchResponse};
use crate::fetch::{HttpTransport, RetryingFetcher, SourceUrls, Transport};
use crate::output::fasta::write_fasta_file;
use crate::parsing::fasta::parse_fasta_text;
use crate::workflow::{BatchReport, Outcome};

/// Output of a multi-identifier fetch when none is given
pub const DEFAULT_COMBINED_OUTPUT: &str = "combined_protein.fasta";

/// Output of an entity fetch when none is given
pub const DEFAULT_ENTITY_OUTPUT: &str = "entity_sequences.fasta";

/// Output of a single-identifier fetch when none is given
#[must_use]
pub fn default_output(identifier: &str) -> PathBuf {
    PathBuf::from(format!("{identifier}_protein.fasta"))
}

/// Fetches reference sequences and writes them as FASTA files
pub struct FastaBuilder<T> {
    fetcher: RetryingFetcher<T>,
    urls: SourceUrls,
    duplicates: DuplicatePolicy,
    ctx: RunContext,
}

impl FastaBuilder<HttpTransport> {
    /// Builder over HTTP using `settings`
    ///
    /// # Errors
    ///
    /// Returns `Error::Client` if the HTTP client cannot be created.
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        let transport = HttpTransport::new(settings.fetch.timeout())?;
        Ok(Self::with_transport(transport, settings))
    }
}

impl<T: Transport> FastaBuilder<T> {
    pub fn with_transport(transport: T, settings: &Settings) -> Self {
        Self {
            fetcher: RetryingFetcher::new(transport, settings.fetch.retry_policy()),
            urls: settings.fetch.urls.clone(),
            duplicates: settings.parsing.duplicate_headers,
            ctx: RunContext::detached(),
        }
    }

    /// Log this builder's runs under `ctx`
    #[must_use]
    pub fn with_context(mut self, ctx: RunContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Fetch the FASTA records of one classified identifier
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidIdentifier` for unknown tokens (no request is
    /// made), `Error::FetchFailed` once every attempt failed, and
    /// `Error::UnexpectedResponse` if the body holds no FASTA records.
    pub fn fetch_records(&self, identifier: &Identifier) -> Result<Vec<SequenceRecord>, Error> {
        let Some(endpoint) = self.urls.fasta_endpoint(identifier) else {
            return Err(Error::InvalidIdentifier(identifier.token().to_string()));
        };
        let subject = identifier.to_string();

        let text = self
            .fetcher
            .fetch_text(&self.ctx, &endpoint, &subject)
            .ok_or_else(|| Error::FetchFailed {
                subject: subject.clone(),
                attempts: self.fetcher.policy().attempts(),
            })?;

        let records = parse_fasta_text(&text, self.duplicates)?;
        if records.is_empty() {
            return Err(Error::UnexpectedResponse {
                subject,
                reason: "no FASTA records in response".to_string(),
            });
        }
        Ok(records.into_vec())
    }

    /// Fetch one PDB or UniProt entry into `output`
    /// (default `{identifier}_protein.fasta`)
    pub fn build_from_identifier(&self, identifier: &str, output: Option<&Path>) -> Outcome {
        let _guard = self.ctx.enter();
        let identifier = Identifier::classify(identifier.trim());
        if identifier.kind() == IdKind::Unknown {
            let err = Error::InvalidIdentifier(identifier.token().to_string());
            error!("{err}");
            return Outcome::failure(err.to_string());
        }

        let output = output.map_or_else(|| default_output(identifier.token()), Path::to_path_buf);
        let records = match self.fetch_records(&identifier) {
            Ok(records) => records,
            Err(e) => {
                error!("{e}");
                return Outcome::failure(format!(
                    "Failed to fetch FASTA sequence for {} ID: {}",
                    identifier.kind().label(),
                    identifier.token()
                ));
            }
        };

        match write_fasta_file(&output, &records) {
            Ok(()) => {
                info!("Wrote {} records to {}", records.len(), output.display());
                Outcome::success(format!(
                    "Successfully created FASTA file: {}",
                    output.display()
                ))
            }
            Err(e) => {
                error!("{e}");
                Outcome::failure(format!("Error writing FASTA file: {e}"))
            }
        }
    }

    /// Fetch several identifiers into one file (default
    /// `combined_protein.fasta`).
    ///
    /// Identifiers are handled one at a time in input order; an invalid or
    /// unreachable identifier is reported and the rest still run. Succeeds if
    /// at least one identifier was written.
    pub fn build_from_identifiers(&self, identifiers: &[String], output: Option<&Path>) -> Outcome {
        let _guard = self.ctx.enter();
        if identifiers.is_empty() {
            return Outcome::failure("No identifiers provided");
        }
        let output = output.map_or_else(|| PathBuf::from(DEFAULT_COMBINED_OUTPUT), Path::to_path_buf);

        let mut report = BatchReport::default();
        let mut records = Vec::new();
        for token in identifiers {
            let identifier = Identifier::classify(token.trim());
            if identifier.kind() == IdKind::Unknown {
                error!("{}", Error::InvalidIdentifier(token.clone()));
                report.failed.push(format!("{token} (invalid identifier)"));
                continue;
            }

            info!("Processing {identifier}");
            match self.fetch_records(&identifier) {
                Ok(fetched) => {
                    records.extend(fetched);
                    report.succeeded.push(identifier.to_string());
                }
                Err(e) => {
                    error!("{e}");
                    let reason = match e {
                        Error::FetchFailed { .. } => "failed to fetch",
                        _ => "unexpected response",
                    };
                    report.failed.push(format!("{identifier} ({reason})"));
                }
            }
        }

        self.finish_batch(report, &output, &records)
    }

    /// Run a search and return its hits
    ///
    /// # Errors
    ///
    /// Returns `Error::FetchFailed` if the search service cannot be reached and
    /// `Error::UnexpectedResponse` if its answer is not a search result.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse, Error> {
        let _guard = self.ctx.enter();
        let subject = "search".to_string();
        let endpoint = self.urls.search_endpoint(request.to_body());
        let body = self
            .fetcher
            .fetch_text(&self.ctx, &endpoint, &subject)
            .ok_or_else(|| Error::FetchFailed {
                subject,
                attempts: self.fetcher.policy().attempts(),
            })?;
        let response = SearchResponse::from_body(&body)?;
        info!("Search returned {} hits", response.result_set.len());
        Ok(response)
    }

    /// Fetch one polymer entity from the Data API
    ///
    /// # Errors
    ///
    /// Returns `Error::FetchFailed` once every attempt failed and
    /// `Error::UnexpectedResponse` if the document has no sequence.
    pub fn fetch_entity(&self, id: &EntityId) -> Result<EntityMetadata, Error> {
        let subject = id.to_string();
        let endpoint = self.urls.entity_endpoint(&id.entry, &id.entity);
        let value = self
            .fetcher
            .fetch_json(&self.ctx, &endpoint, &subject)
            .ok_or_else(|| Error::FetchFailed {
                subject,
                attempts: self.fetcher.policy().attempts(),
            })?;
        EntityMetadata::from_json(id, value)
    }

    /// Fetch polymer entities (`4HHB_1`) into one file with headers
    /// `4HHB_1 | polymer_entity | {description}` (default
    /// `entity_sequences.fasta`)
    pub fn build_from_entities(&self, entity_ids: &[String], output: Option<&Path>) -> Outcome {
        let _guard = self.ctx.enter();
        if entity_ids.is_empty() {
            return Outcome::failure("No entity identifiers provided");
        }
        let output = output.map_or_else(|| PathBuf::from(DEFAULT_ENTITY_OUTPUT), Path::to_path_buf);

        let mut report = BatchReport::default();
        let mut records = Vec::new();
        for token in entity_ids {
            let id = match EntityId::parse(token) {
                Ok(id) => id,
                Err(e) => {
                    error!("{e}");
                    report.failed.push(format!("{token} (invalid entity identifier)"));
                    continue;
                }
            };

            info!("Processing entity {id}");
            match self.fetch_entity(&id) {
                Ok(entity) => {
                    records.push(SequenceRecord::new(entity.header(), entity.sequence));
                    report.succeeded.push(id.to_string());
                }
                Err(e) => {
                    error!("{e}");
                    let reason = match e {
                        Error::FetchFailed { .. } => "failed to fetch",
                        _ => "unexpected response",
                    };
                    report.failed.push(format!("{id} ({reason})"));
                }
            }
        }

        self.finish_batch(report, &output, &records)
    }

    fn finish_batch(&self, report: BatchReport, output: &Path, records: &[SequenceRecord]) -> Outcome {
        if report.succeeded.is_empty() {
            return report.into_outcome(None);
        }
        match write_fasta_file(output, records) {
            Ok(()) => {
                info!("Wrote {} records to {}", records.len(), output.display());
                let shown = output.display().to_string();
                report.into_outcome(Some(shown.as_str()))
            }
            Err(e) => {
                error!("{e}");
                Outcome::failure(format!("Error writing combined FASTA file: {e}"))
            }
        }
    }
}
