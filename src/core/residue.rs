//! Residue name lookup.

/// One-letter code for residues missing from [`RESIDUE_CODES`]
pub const UNKNOWN_RESIDUE: char = 'X';

/// The 20 standard amino acids plus selenocysteine and pyrrolysine
pub const RESIDUE_CODES: [(&str, char); 22] = [
    ("ALA", 'A'),
    ("ARG", 'R'),
    ("ASN", 'N'),
    ("ASP", 'D'),
    ("CYS", 'C'),
    ("GLN", 'Q'),
    ("GLU", 'E'),
    ("GLY", 'G'),
    ("HIS", 'H'),
    ("ILE", 'I'),
    ("LEU", 'L'),
    ("LYS", 'K'),
    ("MET", 'M'),
    ("PHE", 'F'),
    ("PRO", 'P'),
    ("SER", 'S'),
    ("THR", 'T'),
    ("TRP", 'W'),
    ("TYR", 'Y'),
    ("VAL", 'V'),
    ("SEC", 'U'),
    ("PYL", 'O'),
];

/// Map a three-letter residue name to its one-letter code.
///
/// Lookup is exact (CIF component IDs are upper case); anything not in the
/// table becomes `X`.
#[must_use]
pub fn one_letter_code(name: &str) -> char {
    RESIDUE_CODES
        .iter()
        .find(|(three, _)| *three == name)
        .map_or(UNKNOWN_RESIDUE, |&(_, one)| one)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_letter_code() {
        assert_eq!(one_letter_code("ALA"), 'A');
        assert_eq!(one_letter_code("TRP"), 'W');
        assert_eq!(one_letter_code("SEC"), 'U');
        assert_eq!(one_letter_code("PYL"), 'O');
        assert_eq!(one_letter_code("HOH"), 'X');
        assert_eq!(one_letter_code("ala"), 'X');
        assert_eq!(one_letter_code(""), 'X');
    }

    #[test]
    fn test_table_codes_are_unique() {
        let mut codes: Vec<char> = RESIDUE_CODES.iter().map(|&(_, c)| c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), RESIDUE_CODES.len());
    }
}
