use serde::{Deserialize, Serialize};

use crate::core::residue::one_letter_code;

/// Entity types treated as polymers when annotating
pub const POLYMER_ENTITY_TYPES: [&str; 4] = [
    "polymer",
    "polypeptide(L)",
    "polyribonucleotide",
    "polydeoxyribonucleotide",
];

/// A residue at a sequence position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidueSite {
    /// Position as written in the file (usually an integer)
    pub position: String,

    /// One-letter residue code
    pub code: char,
}

impl ResidueSite {
    /// Integer position, if the position field is numeric
    #[must_use]
    pub fn numeric_position(&self) -> Option<i64> {
        self.position.trim().parse().ok()
    }
}

/// Residues of one chain or entity, keyed by the CIF identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolymerSequence {
    pub id: String,
    pub residues: Vec<ResidueSite>,
}

impl PolymerSequence {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            residues: Vec::new(),
        }
    }

    /// Append a residue by its three-letter name
    pub fn push(&mut self, position: impl Into<String>, residue_name: &str) {
        self.residues.push(ResidueSite {
            position: position.into(),
            code: one_letter_code(residue_name),
        });
    }

    /// Sort residues by numeric position. Non-numeric positions go last and
    /// keep their relative order.
    pub fn sort_residues(&mut self) {
        self.residues
            .sort_by_key(|r| r.numeric_position().map_or((1, 0), |n| (0, n)));
    }

    /// One-letter sequence in position order
    #[must_use]
    pub fn sequence(&self) -> String {
        let mut sorted = self.residues.clone();
        sorted.sort_by_key(|r| r.numeric_position().map_or((1, 0), |n| (0, n)));
        sorted.iter().map(|r| r.code).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Metadata from an `_entity` row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub id: String,

    /// `_entity.type`, e.g. `polymer`, `non-polymer`, `water`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// `_entity.pdbx_description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntityInfo {
    #[must_use]
    pub fn is_polymer(&self) -> bool {
        self.entity_type
            .as_deref()
            .is_some_and(|t| POLYMER_ENTITY_TYPES.contains(&t))
    }
}

/// Everything recovered from one CIF file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CifModel {
    /// `_entity` rows in file order
    pub entities: Vec<EntityInfo>,

    /// `_entity_poly_seq` sequences in first-appearance order
    pub entity_sequences: Vec<PolymerSequence>,

    /// `_atom_site` chains in first-appearance order
    pub chains: Vec<PolymerSequence>,
}

impl CifModel {
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&EntityInfo> {
        self.entities.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn entity_sequence(&self, id: &str) -> Option<&PolymerSequence> {
        self.entity_sequences.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn chain(&self, id: &str) -> Option<&PolymerSequence> {
        self.chains.iter().find(|s| s.id == id)
    }

    /// Per-chain sequences from `_atom_site`, or per-entity sequences when
    /// the file has no atom records
    #[must_use]
    pub fn chain_sequences(&self) -> &[PolymerSequence] {
        if self.chains.is_empty() {
            &self.entity_sequences
        } else {
            &self.chains
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty() && self.entity_sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_sorted_by_numeric_position() {
        let mut chain = PolymerSequence::new("A");
        chain.push("3", "SER");
        chain.push("1", "ALA");
        chain.push("10", "TRP");
        chain.push("2", "GLY");
        assert_eq!(chain.sequence(), "AGSW");
    }

    #[test]
    fn test_non_numeric_positions_sort_last_in_order() {
        let mut chain = PolymerSequence::new("A");
        chain.push("x2", "MET");
        chain.push("2", "GLY");
        chain.push("x1", "LYS");
        chain.push("1", "ALA");
        assert_eq!(chain.sequence(), "AGMK");

        chain.sort_residues();
        let positions: Vec<&str> = chain.residues.iter().map(|r| r.position.as_str()).collect();
        assert_eq!(positions, vec!["1", "2", "x2", "x1"]);
    }

    #[test]
    fn test_negative_positions_sort_first() {
        let mut chain = PolymerSequence::new("A");
        chain.push("1", "ALA");
        chain.push("-1", "MET");
        chain.push("0", "GLY");
        assert_eq!(chain.sequence(), "MGA");
    }

    #[test]
    fn test_entity_is_polymer() {
        let mut entity = EntityInfo {
            id: "1".to_string(),
            entity_type: Some("polymer".to_string()),
            description: None,
        };
        assert!(entity.is_polymer());
        entity.entity_type = Some("water".to_string());
        assert!(!entity.is_polymer());
        entity.entity_type = None;
        assert!(!entity.is_polymer());
    }

    #[test]
    fn test_chain_sequences_falls_back_to_entities() {
        let mut model = CifModel::default();
        let mut entity = PolymerSequence::new("1");
        entity.push("1", "ALA");
        model.entity_sequences.push(entity);
        assert_eq!(model.chain_sequences()[0].id, "1");

        let mut chain = PolymerSequence::new("B");
        chain.push("1", "GLY");
        model.chains.push(chain);
        assert_eq!(model.chain_sequences().len(), 1);
        assert_eq!(model.chain_sequences()[0].id, "B");
    }
}
