//! Reader for the sequence-bearing subset of mmCIF.
//!
//! Only three categories are interpreted:
//!
//! | Category            | Columns used                                   |
//! |---------------------|------------------------------------------------|
//! | `_entity`           | `id`, `type`, `pdbx_description`               |
//! | `_entity_poly_seq`  | `entity_id`, `num`, `mon_id`                   |
//! | `_atom_site`        | `label_asym_id`/`auth_asym_id`, `label_seq_id`/`auth_seq_id`, `label_comp_id`/`auth_comp_id` |
//!
//! Values are mapped to fields by their tag name, never by position in the
//! block, so reordered columns read correctly. Columns that are not needed are
//! carried through and ignored. Loop rows may wrap across lines; a row left
//! incomplete when its block ends is skipped.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::core::structure::{CifModel, EntityInfo, PolymerSequence};
use crate::parsing::{read_text, ParseError};
use crate::utils::validation::{check_record_limit, MAX_CIF_SEQUENCES};

/// Residues that never belong to a polymer chain
const SOLVENT_RESIDUES: [&str; 2] = ["HOH", "DOD"];

/// Check if the path has a CIF extension
pub fn is_cif_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    let stem = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".bgz"))
        .unwrap_or(&path_str);
    stem.ends_with(".cif") || stem.ends_with(".mmcif")
}

/// Parse a CIF file (plain or gzip-compressed).
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_cif_text`].
pub fn parse_cif_file(path: &Path) -> Result<CifModel, ParseError> {
    let text = read_text(path)?;
    parse_cif_text(&text)
}

/// Parse CIF text into entities, entity sequences and chain sequences.
///
/// # Errors
///
/// Returns `ParseError::Empty` if neither `_entity_poly_seq` nor `_atom_site`
/// yields a residue, or `ParseError::TooManyRecords` if the chain limit is
/// exceeded.
pub fn parse_cif_text(text: &str) -> Result<CifModel, ParseError> {
    let mut parser = CifParser::default();
    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim_end();
        i += 1;

        // Multi-line text field: ';' at column 0 up to the next ';' line
        if let Some(first) = line.strip_prefix(';') {
            let mut value = first.trim().to_string();
            while i < lines.len() {
                let next = lines[i].trim_end();
                i += 1;
                if next.starts_with(';') {
                    break;
                }
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(next.trim());
            }
            parser.value_tokens(vec![value])?;
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('#') || trimmed.starts_with("data_") {
            parser.close_block()?;
            continue;
        }

        if trimmed == "loop_" {
            parser.close_block()?;
            parser.block = Some(Block::new_loop());
            continue;
        }

        let tokens = tokenize_line(trimmed);
        if tokens.is_empty() {
            continue;
        }

        if tokens[0].starts_with('_') {
            parser.tag_line(tokens)?;
        } else {
            parser.value_tokens(tokens)?;
        }
    }

    parser.close_block()?;
    parser.finish()
}

/// Categories this reader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Entity,
    EntityPolySeq,
    AtomSite,
    Other,
}

impl Category {
    /// Split a tag such as `_atom_site.label_seq_id` into category and column
    fn split_tag(tag: &str) -> (Self, &str) {
        let Some((category, column)) = tag.split_once('.') else {
            return (Self::Other, tag);
        };
        let category = match category {
            "_entity" => Self::Entity,
            "_entity_poly_seq" => Self::EntityPolySeq,
            "_atom_site" => Self::AtomSite,
            _ => Self::Other,
        };
        (category, column)
    }
}

/// A `loop_` table or a run of single `_tag value` items of one category
#[derive(Debug)]
struct Block {
    is_loop: bool,
    category: Option<Category>,
    columns: Vec<String>,

    /// Loop: tokens of a row still being assembled across lines.
    /// Single items: values in column order.
    values: Vec<String>,

    /// Loop has started its data rows; a tag now starts a new block
    in_rows: bool,

    /// Single item whose value is on a following line
    awaiting_value: bool,
}

impl Block {
    fn new_loop() -> Self {
        Self {
            is_loop: true,
            category: None,
            columns: Vec::new(),
            values: Vec::new(),
            in_rows: false,
            awaiting_value: false,
        }
    }

    fn new_items(category: Category) -> Self {
        Self {
            is_loop: false,
            category: Some(category),
            columns: Vec::new(),
            values: Vec::new(),
            in_rows: false,
            awaiting_value: false,
        }
    }
}

/// Column positions for one block, resolved by name
struct Columns<'a> {
    names: &'a [String],
}

impl Columns<'_> {
    fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|c| c == name)
    }

    /// First of `names` present in the block
    fn find_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.find(n))
    }
}

#[derive(Default)]
struct CifParser {
    model: CifModel,
    block: Option<Block>,
    entity_index: HashMap<String, usize>,
    entity_seq_index: HashMap<String, usize>,
    chain_index: HashMap<String, usize>,
    seen_entity_sites: HashSet<(String, String)>,
    seen_chain_sites: HashSet<(String, String)>,
    skipped_rows: usize,
}

impl CifParser {
    fn tag_line(&mut self, tokens: Vec<String>) -> Result<(), ParseError> {
        let (category, column) = Category::split_tag(&tokens[0]);
        let column = column.to_string();

        // Loop header: collect columns until the first data row
        if let Some(block) = self.block.as_mut() {
            if block.is_loop && !block.in_rows {
                match block.category {
                    None => block.category = Some(category),
                    Some(c) if c != category => block.category = Some(Category::Other),
                    Some(_) => {}
                }
                block.columns.push(column);
                return Ok(());
            }
        }

        let same_items_block = self
            .block
            .as_ref()
            .is_some_and(|b| !b.is_loop && b.category == Some(category));
        if !same_items_block {
            self.close_block()?;
            self.block = Some(Block::new_items(category));
        }

        if let Some(block) = self.block.as_mut() {
            // A previous item never received its value
            if block.awaiting_value {
                block.columns.pop();
            }
            block.columns.push(column);
            match tokens.into_iter().nth(1) {
                Some(value) => {
                    block.values.push(value);
                    block.awaiting_value = false;
                }
                None => block.awaiting_value = true,
            }
        }
        Ok(())
    }

    fn value_tokens(&mut self, tokens: Vec<String>) -> Result<(), ParseError> {
        let Some(block) = self.block.as_mut() else {
            return Ok(());
        };

        if !block.is_loop {
            if block.awaiting_value {
                let value = if tokens.len() == 1 {
                    tokens.into_iter().next().unwrap_or_default()
                } else {
                    tokens.join(" ")
                };
                block.values.push(value);
                block.awaiting_value = false;
            }
            return Ok(());
        }

        if block.columns.is_empty() {
            return Ok(());
        }
        block.in_rows = true;
        block.values.extend(tokens);

        // A row may wrap onto later lines, and one line may hold several rows
        let width = block.columns.len();
        if block.values.len() < width {
            return Ok(());
        }
        let category = block.category.unwrap_or(Category::Other);
        let columns = std::mem::take(&mut block.columns);
        let mut values = std::mem::take(&mut block.values);

        let complete = values.len() - values.len() % width;
        let rest = values.split_off(complete);
        for row in values.chunks_exact(width) {
            self.apply_row(category, &columns, row)?;
        }

        if let Some(block) = self.block.as_mut() {
            block.columns = columns;
            block.values = rest;
        }
        Ok(())
    }

    fn close_block(&mut self) -> Result<(), ParseError> {
        let Some(mut block) = self.block.take() else {
            return Ok(());
        };

        if block.is_loop {
            if !block.values.is_empty() {
                self.skipped_rows += 1;
            }
            return Ok(());
        }

        if block.awaiting_value {
            block.columns.pop();
        }
        if block.values.is_empty() {
            return Ok(());
        }
        let category = block.category.unwrap_or(Category::Other);
        self.apply_row(category, &block.columns, &block.values)
    }

    fn apply_row(
        &mut self,
        category: Category,
        columns: &[String],
        row: &[String],
    ) -> Result<(), ParseError> {
        let cols = Columns { names: columns };
        match category {
            Category::Entity => {
                self.apply_entity_row(&cols, row);
                Ok(())
            }
            Category::EntityPolySeq => self.apply_entity_poly_seq_row(&cols, row),
            Category::AtomSite => self.apply_atom_site_row(&cols, row),
            Category::Other => Ok(()),
        }
    }

    fn apply_entity_row(&mut self, cols: &Columns<'_>, row: &[String]) {
        let Some(id) = cols.find("id").and_then(|i| value_at(row, i)) else {
            self.skipped_rows += 1;
            return;
        };

        let index = match self.entity_index.get(id) {
            Some(&index) => index,
            None => {
                self.model.entities.push(EntityInfo {
                    id: id.to_string(),
                    ..EntityInfo::default()
                });
                let index = self.model.entities.len() - 1;
                self.entity_index.insert(id.to_string(), index);
                index
            }
        };

        let entity = &mut self.model.entities[index];
        if let Some(t) = cols.find("type").and_then(|i| value_at(row, i)) {
            entity.entity_type = Some(t.to_string());
        }
        if let Some(d) = cols.find("pdbx_description").and_then(|i| value_at(row, i)) {
            entity.description = Some(d.to_string());
        }
    }

    fn apply_entity_poly_seq_row(
        &mut self,
        cols: &Columns<'_>,
        row: &[String],
    ) -> Result<(), ParseError> {
        let fields = (
            cols.find("entity_id").and_then(|i| value_at(row, i)),
            cols.find("num").and_then(|i| value_at(row, i)),
            cols.find("mon_id").and_then(|i| value_at(row, i)),
        );
        let (Some(entity_id), Some(num), Some(mon_id)) = fields else {
            self.skipped_rows += 1;
            return Ok(());
        };

        // Microheterogeneity lists alternatives at one position; keep the first
        if !self
            .seen_entity_sites
            .insert((entity_id.to_string(), num.to_string()))
        {
            return Ok(());
        }

        let index = sequence_index(
            &mut self.model.entity_sequences,
            &mut self.entity_seq_index,
            entity_id,
        )?;
        self.model.entity_sequences[index].push(num, mon_id);
        Ok(())
    }

    fn apply_atom_site_row(&mut self, cols: &Columns<'_>, row: &[String]) -> Result<(), ParseError> {
        let fields = (
            cols.find_any(&["label_asym_id", "auth_asym_id"])
                .and_then(|i| value_at(row, i)),
            cols.find_any(&["label_seq_id", "auth_seq_id"])
                .and_then(|i| value_at(row, i)),
            cols.find_any(&["label_comp_id", "auth_comp_id"])
                .and_then(|i| value_at(row, i)),
        );
        let (Some(chain_id), Some(position), Some(residue)) = fields else {
            self.skipped_rows += 1;
            return Ok(());
        };

        if SOLVENT_RESIDUES.contains(&residue) {
            return Ok(());
        }

        // Every atom of a residue repeats the same site
        if !self
            .seen_chain_sites
            .insert((chain_id.to_string(), position.to_string()))
        {
            return Ok(());
        }

        let index = sequence_index(&mut self.model.chains, &mut self.chain_index, chain_id)?;
        self.model.chains[index].push(position, residue);
        Ok(())
    }

    fn finish(mut self) -> Result<CifModel, ParseError> {
        if self.skipped_rows > 0 {
            debug!("Skipped {} malformed CIF rows", self.skipped_rows);
        }

        self.model.entity_sequences.retain(|s| !s.is_empty());
        self.model.chains.retain(|s| !s.is_empty());
        if self.model.is_empty() {
            return Err(ParseError::Empty("chains or entity sequences in CIF file"));
        }

        for sequence in self
            .model
            .entity_sequences
            .iter_mut()
            .chain(self.model.chains.iter_mut())
        {
            sequence.sort_residues();
        }

        debug!(
            "Parsed CIF: {} entities, {} entity sequences, {} chains",
            self.model.entities.len(),
            self.model.entity_sequences.len(),
            self.model.chains.len()
        );
        Ok(self.model)
    }
}

/// Non-null value of a row field. CIF uses `.` and `?` for inapplicable and
/// unknown values.
fn value_at(row: &[String], index: usize) -> Option<&str> {
    row.get(index)
        .map(String::as_str)
        .filter(|v| !v.is_empty() && *v != "." && *v != "?")
}

fn sequence_index(
    list: &mut Vec<PolymerSequence>,
    index: &mut HashMap<String, usize>,
    id: &str,
) -> Result<usize, ParseError> {
    if let Some(&i) = index.get(id) {
        return Ok(i);
    }
    check_record_limit(list.len(), MAX_CIF_SEQUENCES)?;
    list.push(PolymerSequence::new(id));
    index.insert(id.to_string(), list.len() - 1);
    Ok(list.len() - 1)
}

/// Split a CIF line on whitespace, honouring single and double quotes.
///
/// A quote only closes a value when followed by whitespace or end of line, so
/// atom names such as `"O5'"` survive.
fn tokenize_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match in_quote {
            Some(q) => {
                let at_boundary = chars.peek().map_or(true, |n| n.is_whitespace());
                if c == q && at_boundary {
                    tokens.push(std::mem::take(&mut current));
                    in_quote = None;
                } else {
                    current.push(c);
                }
            }
            None => {
                if c.is_whitespace() {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                } else if (c == '\'' || c == '"') && current.is_empty() {
                    in_quote = Some(c);
                } else {
                    current.push(c);
                }
            }
        }
    }
    if !current.is_empty() || in_quote.is_some() {
        tokens.push(current);
    }
    tokens
}
