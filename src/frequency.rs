// Per-character tally over a decoded text buffer

use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};

/// Table header row, tab separated
pub const TABLE_HEADER: &str = "Char\tCount\tUnicode";

/// Occurrence counts ordered most frequent first.
///
/// Characters with equal counts keep the order in which they first appeared
/// in the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(char, u64)>,
}

/// One output row: display form, count and decimal code point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyRow {
    #[serde(rename = "char")]
    pub ch: char,
    pub display: String,
    pub count: u64,
    pub code_point: u32,
}

impl FrequencyTable {
    /// Count every character of `text` in a single pass.
    pub fn from_text(text: &str) -> Self {
        let mut slots: HashMap<char, usize> = HashMap::new();
        let mut entries: Vec<(char, u64)> = Vec::new();

        for ch in text.chars() {
            let slot = *slots.entry(ch).or_insert_with(|| {
                entries.push((ch, 0));
                entries.len() - 1
            });
            entries[slot].1 += 1;
        }

        // sort_by is stable, so first-seen order survives among equal counts
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    pub fn entries(&self) -> &[(char, u64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, equal to the number of characters counted
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, count)| count).sum()
    }

    pub fn rows(&self) -> Vec<FrequencyRow> {
        self.entries
            .iter()
            .map(|&(ch, count)| FrequencyRow {
                ch,
                display: display_char(ch),
                count,
                code_point: ch as u32,
            })
            .collect()
    }

    /// Write the header followed by one tab-separated line per character.
    pub fn write_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{TABLE_HEADER}")?;
        for row in self.rows() {
            writeln!(out, "{}\t{}\t{}", row.display, row.count, row.code_point)?;
        }
        Ok(())
    }
}

/// Readable label for the whitespace characters that would otherwise be
/// invisible in a tab-separated table. Everything else is shown as is.
pub fn display_char(ch: char) -> String {
    match ch {
        ' ' => "SPACE".to_string(),
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        _ => ch.to_string(),
    }
}
