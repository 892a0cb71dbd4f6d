//! RCSB search queries and Data API entity records.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Attribute holding the UniProt accessions mapped to a polymer entity
const UNIPROT_ACCESSION_ATTRIBUTE: &str =
    "rcsb_polymer_entity_container_identifiers.reference_sequence_identifiers.database_accession";

/// Rows requested when the caller gives no limit
pub const DEFAULT_SEARCH_ROWS: usize = 25;

/// Granularity of search hits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// Hits are entry IDs such as `4HHB`
    #[default]
    Entry,
    /// Hits are entity IDs such as `4HHB_1`
    PolymerEntity,
}

/// What to search for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Free text over titles, descriptions and annotations
    FullText(String),
    /// Entities mapped to a UniProt accession
    UniprotAccession(String),
}

/// A search against the RCSB search service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub term: SearchTerm,
    pub return_type: ReturnType,
    pub rows: usize,
}

impl SearchRequest {
    pub fn full_text(text: impl Into<String>) -> Self {
        Self {
            term: SearchTerm::FullText(text.into()),
            return_type: ReturnType::Entry,
            rows: DEFAULT_SEARCH_ROWS,
        }
    }

    /// Polymer entities whose reference sequence is `accession`
    pub fn uniprot_accession(accession: impl Into<String>) -> Self {
        Self {
            term: SearchTerm::UniprotAccession(accession.into()),
            return_type: ReturnType::PolymerEntity,
            rows: DEFAULT_SEARCH_ROWS,
        }
    }

    #[must_use]
    pub fn with_return_type(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }

    #[must_use]
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows.max(1);
        self
    }

    /// JSON body for the search POST
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        let (service, parameters) = match &self.term {
            SearchTerm::FullText(value) => (
                "full_text",
                QueryParameters {
                    attribute: None,
                    operator: None,
                    value,
                },
            ),
            SearchTerm::UniprotAccession(value) => (
                "text",
                QueryParameters {
                    attribute: Some(UNIPROT_ACCESSION_ATTRIBUTE),
                    operator: Some("exact_match"),
                    value,
                },
            ),
        };

        let body = QueryBody {
            query: Query {
                kind: "terminal",
                service,
                parameters,
            },
            return_type: self.return_type,
            request_options: RequestOptions {
                paginate: Paginate {
                    start: 0,
                    rows: self.rows,
                },
            },
        };
        serde_json::to_value(body).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Serialize)]
struct QueryBody<'a> {
    query: Query<'a>,
    return_type: ReturnType,
    request_options: RequestOptions,
}

#[derive(Serialize)]
struct Query<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    service: &'static str,
    parameters: QueryParameters<'a>,
}

#[derive(Serialize)]
struct QueryParameters<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operator: Option<&'static str>,
    value: &'a str,
}

#[derive(Serialize)]
struct RequestOptions {
    paginate: Paginate,
}

#[derive(Serialize)]
struct Paginate {
    start: usize,
    rows: usize,
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub identifier: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Search service response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub result_set: Vec<SearchHit>,
}

impl SearchResponse {
    /// Decode a response body. The service answers a query with no hits with
    /// an empty body.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedResponse` if a non-empty body is not a
    /// search result.
    pub fn from_body(body: &str) -> Result<Self, Error> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(body).map_err(|e| Error::UnexpectedResponse {
            subject: "search".to_string(),
            reason: e.to_string(),
        })
    }

    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.result_set.iter().map(|h| h.identifier.clone()).collect()
    }
}

/// Entity identifier of the form `ENTRY_ENTITY`, e.g. `4HHB_1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityId {
    pub entry: String,
    pub entity: String,
}

impl EntityId {
    /// Parse `4HHB_1` (also accepts `4HHB.1`)
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidEntityId` unless the entry part is a PDB ID
    /// and the entity part is a positive integer.
    pub fn parse(token: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidEntityId(token.to_string());
        let (entry, entity) = token
            .trim()
            .split_once(['_', '.'])
            .ok_or_else(invalid)?;
        if !crate::core::types::is_valid_pdb_id(entry)
            || entity.is_empty()
            || !entity.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        Ok(Self {
            entry: entry.to_uppercase(),
            entity: entity.to_string(),
        })
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.entry, self.entity)
    }
}

/// Sequence and description of one polymer entity from the Data API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMetadata {
    /// `ENTRY_ENTITY`
    pub id: String,
    pub polymer_type: Option<String>,
    pub description: Option<String>,
    pub sequence: String,
}

#[derive(Deserialize)]
struct EntityDocument {
    entity_poly: Option<EntityPoly>,
    rcsb_polymer_entity: Option<RcsbPolymerEntity>,
}

#[derive(Deserialize)]
struct EntityPoly {
    pdbx_seq_one_letter_code_can: Option<String>,
    #[serde(rename = "type")]
    poly_type: Option<String>,
}

#[derive(Deserialize)]
struct RcsbPolymerEntity {
    pdbx_description: Option<String>,
}

impl EntityMetadata {
    /// Read a polymer entity document.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedResponse` when the document has no canonical
    /// sequence.
    pub fn from_json(id: &EntityId, value: serde_json::Value) -> Result<Self, Error> {
        let unexpected = |reason: String| Error::UnexpectedResponse {
            subject: id.to_string(),
            reason,
        };
        let doc: EntityDocument = serde_json::from_value(value).map_err(|e| unexpected(e.to_string()))?;

        let poly = doc
            .entity_poly
            .ok_or_else(|| unexpected("missing entity_poly".to_string()))?;
        // The canonical code is wrapped at 80 columns in the API response
        let sequence: String = poly
            .pdbx_seq_one_letter_code_can
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if sequence.is_empty() {
            return Err(unexpected("missing canonical sequence".to_string()));
        }

        Ok(Self {
            id: id.to_string(),
            polymer_type: poly.poly_type,
            description: doc.rcsb_polymer_entity.and_then(|e| e.pdbx_description),
            sequence,
        })
    }

    /// FASTA header `4HHB_1 | polymer_entity | Hemoglobin subunit alpha`
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "{} | polymer_entity | {}",
            self.id,
            self.description.as_deref().unwrap_or("Unknown")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_text_body() {
        let body = SearchRequest::full_text("acetylcholine receptor")
            .with_rows(5)
            .to_body();
        assert_eq!(
            body,
            json!({
                "query": {
                    "type": "terminal",
                    "service": "full_text",
                    "parameters": {"value": "acetylcholine receptor"}
                },
                "return_type": "entry",
                "request_options": {"paginate": {"start": 0, "rows": 5}}
            })
        );
    }

    #[test]
    fn test_accession_body() {
        let body = SearchRequest::uniprot_accession("P69905").to_body();
        assert_eq!(body["return_type"], "polymer_entity");
        assert_eq!(body["query"]["service"], "text");
        assert_eq!(body["query"]["parameters"]["operator"], "exact_match");
        assert_eq!(body["query"]["parameters"]["value"], "P69905");
        assert_eq!(
            body["query"]["parameters"]["attribute"],
            UNIPROT_ACCESSION_ATTRIBUTE
        );
    }

    #[test]
    fn test_search_response() {
        let response = SearchResponse::from_body(
            r#"{"query_id":"x","result_type":"entry","total_count":2,
                "result_set":[{"identifier":"2BG9","score":1.0},{"identifier":"4HHB","score":0.5}]}"#,
        )
        .unwrap();
        assert_eq!(response.total_count, Some(2));
        assert_eq!(response.identifiers(), vec!["2BG9", "4HHB"]);

        assert!(SearchResponse::from_body("").unwrap().result_set.is_empty());
        assert!(SearchResponse::from_body("not json").is_err());
    }

    #[test]
    fn test_entity_id_parse() {
        let id = EntityId::parse("4hhb_1").unwrap();
        assert_eq!(id.entry, "4HHB");
        assert_eq!(id.entity, "1");
        assert_eq!(id.to_string(), "4HHB_1");
        assert_eq!(EntityId::parse("2BG9.3").unwrap().to_string(), "2BG9_3");

        assert!(EntityId::parse("4HHB").is_err());
        assert!(EntityId::parse("4HHB_").is_err());
        assert!(EntityId::parse("4HHB_A").is_err());
        assert!(EntityId::parse("TOOLONG_1").is_err());
    }

    #[test]
    fn test_entity_metadata_from_json() {
        let id = EntityId::parse("4HHB_1").unwrap();
        let doc = json!({
            "entity_poly": {
                "pdbx_seq_one_letter_code_can": "VLSPADKTNV\nKAAWGKVGAH",
                "type": "polypeptide(L)"
            },
            "rcsb_polymer_entity": {"pdbx_description": "Hemoglobin subunit alpha"}
        });
        let entity = EntityMetadata::from_json(&id, doc).unwrap();
        assert_eq!(entity.sequence, "VLSPADKTNVKAAWGKVGAH");
        assert_eq!(entity.polymer_type.as_deref(), Some("polypeptide(L)"));
        assert_eq!(
            entity.header(),
            "4HHB_1 | polymer_entity | Hemoglobin subunit alpha"
        );
    }

    #[test]
    fn test_entity_metadata_without_sequence() {
        let id = EntityId::parse("4HHB_1").unwrap();
        assert!(EntityMetadata::from_json(&id, json!({"rcsb_polymer_entity": {}})).is_err());

        let entity = EntityMetadata::from_json(
            &id,
            json!({"entity_poly": {"pdbx_seq_one_letter_code_can": "MKV"}}),
        )
        .unwrap();
        assert_eq!(entity.header(), "4HHB_1 | polymer_entity | Unknown");
    }
}
