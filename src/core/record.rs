use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single FASTA record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Header text after `>`
    pub header: String,

    /// One-letter residue (or nucleotide) codes
    pub sequence: String,
}

impl SequenceRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Records from one FASTA source, in file order, with unique headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastaRecords {
    records: Vec<SequenceRecord>,
    index: HashMap<String, usize>,
}

impl FastaRecords {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. An existing record with the same header is replaced in
    /// place and returned.
    pub fn insert(&mut self, record: SequenceRecord) -> Option<SequenceRecord> {
        if let Some(&i) = self.index.get(&record.header) {
            return Some(std::mem::replace(&mut self.records[i], record));
        }
        self.index.insert(record.header.clone(), self.records.len());
        self.records.push(record);
        None
    }

    #[must_use]
    pub fn contains(&self, header: &str) -> bool {
        self.index.contains_key(header)
    }

    #[must_use]
    pub fn get(&self, header: &str) -> Option<&SequenceRecord> {
        self.index.get(header).map(|&i| &self.records[i])
    }

    /// Sequence stored under `header`
    #[must_use]
    pub fn sequence(&self, header: &str) -> Option<&str> {
        self.get(header).map(|r| r.sequence.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequenceRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SequenceRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<SequenceRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a FastaRecords {
    type Item = &'a SequenceRecord;
    type IntoIter = std::slice::Iter<'a, SequenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<SequenceRecord> for FastaRecords {
    fn from_iter<I: IntoIterator<Item = SequenceRecord>>(iter: I) -> Self {
        let mut records = Self::new();
        for record in iter {
            records.insert(record);
        }
        records
    }
}
