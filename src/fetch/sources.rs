//! Endpoints of the sequence databases.

use serde::{Deserialize, Serialize};

use crate::core::types::{IdKind, Identifier};
use crate::fetch::retry::Endpoint;

/// RCSB FASTA download, one entry per request
pub const RCSB_FASTA_URL: &str = "https://www.rcsb.org/fasta/entry";

/// UniProtKB REST API
pub const UNIPROT_URL: &str = "https://rest.uniprot.org/uniprotkb";

/// RCSB full-text and attribute search
pub const RCSB_SEARCH_URL: &str = "https://search.rcsb.org/rcsbsearch/v2/query";

/// RCSB Data API, core schema
pub const RCSB_DATA_URL: &str = "https://data.rcsb.org/rest/v1/core";

/// Base URLs for every remote source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceUrls {
    pub rcsb_fasta: String,
    pub uniprot: String,
    pub rcsb_search: String,
    pub rcsb_data: String,
}

impl Default for SourceUrls {
    fn default() -> Self {
        Self {
            rcsb_fasta: RCSB_FASTA_URL.to_string(),
            uniprot: UNIPROT_URL.to_string(),
            rcsb_search: RCSB_SEARCH_URL.to_string(),
            rcsb_data: RCSB_DATA_URL.to_string(),
        }
    }
}

impl SourceUrls {
    /// Point every source at one host; used against local mock servers
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            rcsb_fasta: format!("{base}/fasta/entry"),
            uniprot: format!("{base}/uniprotkb"),
            rcsb_search: format!("{base}/rcsbsearch/v2/query"),
            rcsb_data: format!("{base}/rest/v1/core"),
        }
    }

    /// FASTA download for a classified identifier, `None` for unknown tokens
    #[must_use]
    pub fn fasta_endpoint(&self, identifier: &Identifier) -> Option<Endpoint> {
        let token = identifier.token();
        match identifier.kind() {
            IdKind::Pdb => Some(Endpoint::get(format!(
                "{}/{token}",
                self.rcsb_fasta.trim_end_matches('/')
            ))),
            IdKind::Uniprot => Some(Endpoint::get(format!(
                "{}/{token}.fasta",
                self.uniprot.trim_end_matches('/')
            ))),
            IdKind::Unknown => None,
        }
    }

    /// Polymer entity record, e.g. entry `4HHB` entity `1`
    #[must_use]
    pub fn entity_endpoint(&self, entry: &str, entity: &str) -> Endpoint {
        Endpoint::get(format!(
            "{}/polymer_entity/{entry}/{entity}",
            self.rcsb_data.trim_end_matches('/')
        ))
    }

    #[must_use]
    pub fn search_endpoint(&self, body: serde_json::Value) -> Endpoint {
        Endpoint::post_json(self.rcsb_search.clone(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fasta_endpoints() {
        let urls = SourceUrls::default();
        assert_eq!(
            urls.fasta_endpoint(&Identifier::classify("2BG9")),
            Some(Endpoint::get("https://www.rcsb.org/fasta/entry/2BG9"))
        );
        assert_eq!(
            urls.fasta_endpoint(&Identifier::classify("Q8N3Y1")),
            Some(Endpoint::get("https://rest.uniprot.org/uniprotkb/Q8N3Y1.fasta"))
        );
        assert_eq!(urls.fasta_endpoint(&Identifier::classify("INVALID")), None);
    }

    #[test]
    fn test_entity_endpoint() {
        let urls = SourceUrls::default();
        assert_eq!(
            urls.entity_endpoint("4HHB", "1").url(),
            "https://data.rcsb.org/rest/v1/core/polymer_entity/4HHB/1"
        );
    }

    #[test]
    fn test_with_base_trims_slash() {
        let urls = SourceUrls::with_base("http://127.0.0.1:8080/");
        assert_eq!(urls.rcsb_fasta, "http://127.0.0.1:8080/fasta/entry");
        assert_eq!(
            urls.search_endpoint(serde_json::Value::Null).url(),
            "http://127.0.0.1:8080/rcsbsearch/v2/query"
        );
    }
}
