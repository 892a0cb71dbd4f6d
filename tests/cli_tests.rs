//! Command-line tests
//!
//! These run the `cryo-fasta` binary against local CIF and FASTA files. None
//! of them touch the network.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MODEL_CIF: &str = "data_model
#
loop_
_entity.id
_entity.type
_entity.pdbx_description
1 polymer 'Acetylcholine receptor alpha'
2 water water
#
loop_
_entity_poly_seq.entity_id
_entity_poly_seq.num
_entity_poly_seq.mon_id
1 1 MET
1 2 LYS
1 3 VAL
1 4 LEU
#
loop_
_atom_site.group_PDB
_atom_site.id
_atom_site.label_atom_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.label_seq_id
_atom_site.auth_asym_id
ATOM 1 N MET A 1 A
ATOM 2 CA MET A 1 A
ATOM 3 N LYS A 2 A
ATOM 4 N VAL A 3 A
ATOM 5 N LEU A 4 A
ATOM 6 N GLY B 1 B
ATOM 7 N SER B 2 B
HETATM 8 O HOH C . C
#
";

const REFERENCE_FASTA: &str = ">sp|P02710|ACHA_TETCF Acetylcholine receptor subunit alpha
MKVLLAGS
>decoy
WWWWWW
";

fn cmd() -> Command {
    Command::cargo_bin("cryo-fasta").unwrap()
}

fn write_inputs(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let cif = dir.path().join("model.cif");
    let fasta = dir.path().join("reference.fasta");
    fs::write(&cif, MODEL_CIF).unwrap();
    fs::write(&fasta, REFERENCE_FASTA).unwrap();
    (cif, fasta)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_classify_known_identifiers() {
    cmd()
        .args(["classify", "2BG9", "Q8N3Y1", "FBXW8_HUMAN"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2BG9: pdb"))
        .stdout(predicate::str::contains("Q8N3Y1: uniprot"))
        .stdout(predicate::str::contains("FBXW8_HUMAN: uniprot"));
}

#[test]
fn test_classify_unknown_identifier_fails() {
    cmd()
        .args(["classify", "2BG9", "INVALID"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("INVALID: unknown"));
}

#[test]
fn test_classify_json() {
    let output = cmd()
        .args(["--format", "json", "classify", "1abc"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["identifier"], "1abc");
    assert_eq!(parsed[0]["kind"], "pdb");
}

#[test]
fn test_align_writes_report() {
    let dir = TempDir::new().unwrap();
    let (cif, fasta) = write_inputs(&dir);
    let report = dir.path().join("report.csv");

    cmd()
        .arg("align")
        .arg(&cif)
        .arg(&fasta)
        .arg("--output")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully created alignment report"));

    let text = read(&report);
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("cif_chain,fasta_sequence,sequence_similarity")
    );
    let chain_a = lines.next().unwrap();
    assert!(chain_a.starts_with("A,sp|P02710|ACHA_TETCF"), "{chain_a}");
    let chain_b = lines.next().unwrap();
    assert!(chain_b.starts_with("B,"), "{chain_b}");
    assert_eq!(lines.next(), None);
}

#[test]
fn test_align_print_tsv() {
    let dir = TempDir::new().unwrap();
    let (cif, fasta) = write_inputs(&dir);

    cmd()
        .args(["--format", "tsv", "align", "--print"])
        .arg(&cif)
        .arg(&fasta)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "cif_chain\tfasta_sequence\tsequence_similarity",
        ))
        .stdout(predicate::str::contains("A\tsp|P02710|ACHA_TETCF"));
}

#[test]
fn test_annotate_writes_fasta() {
    let dir = TempDir::new().unwrap();
    let (cif, fasta) = write_inputs(&dir);
    let output = dir.path().join("annotated.fasta");

    cmd()
        .arg("annotate")
        .arg(&cif)
        .arg(&fasta)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully created annotated sequence file",
        ));

    let text = read(&output);
    assert!(text.starts_with(">Entity_1 | polymer | Acetylcholine receptor alpha\n"));
    assert!(text.contains("MKVLLAGS\n"));
    assert!(!text.contains("water"));
}

#[test]
fn test_annotate_missing_cif_fails() {
    let dir = TempDir::new().unwrap();
    let (_, fasta) = write_inputs(&dir);
    let missing = dir.path().join("missing.cif");

    cmd()
        .arg("annotate")
        .arg(&missing)
        .arg(&fasta)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CIF file not found"));
}

#[test]
fn test_annotate_json_outcome() {
    let dir = TempDir::new().unwrap();
    let (cif, fasta) = write_inputs(&dir);
    let output = dir.path().join("annotated.fasta");

    let result = cmd()
        .args(["-f", "json", "annotate"])
        .arg(&cif)
        .arg(&fasta)
        .arg("-o")
        .arg(&output)
        .output()
        .unwrap();
    assert!(result.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(outcome["success"], true);
    assert!(outcome["message"]
        .as_str()
        .unwrap()
        .ends_with("annotated.fasta"));
}

#[test]
fn test_duplicate_headers_rejected_by_config() {
    let dir = TempDir::new().unwrap();
    let (cif, _) = write_inputs(&dir);
    let fasta = dir.path().join("dupes.fasta");
    fs::write(&fasta, ">a\nMKV\n>a\nLLA\n").unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"parsing": {"duplicate_headers": "reject"}}"#).unwrap();

    cmd()
        .arg("--config")
        .arg(&config)
        .arg("annotate")
        .arg(&cif)
        .arg(&fasta)
        .arg("-o")
        .arg(dir.path().join("out.fasta"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse FASTA file"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"fetch": {"retry_delay_secs": -1.0}}"#).unwrap();

    cmd()
        .arg("--config")
        .arg(&config)
        .args(["classify", "2BG9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_entity_rejects_malformed_ids_without_network() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("entities.fasta");

    cmd()
        .args(["entity", "not-an-entity"])
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid entity identifier"));

    assert!(!output.exists());
}

#[test]
fn test_align_rejects_negative_weight() {
    let dir = TempDir::new().unwrap();
    let (cif, fasta) = write_inputs(&dir);

    cmd()
        .args(["align", "--print", "--weight-identity=-1"])
        .arg(&cif)
        .arg(&fasta)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a non-negative number"));
}
