use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One `word, romanization` pair. File order is frequency order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordRow {
    pub word: String,
    pub romanization: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Tsv,
    Json,
}

impl Format {
    /// `.json` files are JSON arrays, everything else is TSV.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Format::Json,
            _ => Format::Tsv,
        }
    }
}

/// Toned Jyutping: syllables of lowercase letters, each with a tone 1-6,
/// separated by single spaces.
const ROMANIZATION: &str = r"^[a-z]+[1-6]( [a-z]+[1-6])*$";

pub fn read<P: AsRef<Path>>(path: P, format: Format) -> Result<Vec<WordRow>> {
    let path = path.as_ref();
    let rows = match format {
        Format::Json => {
            let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("parsing {}", path.display()))?
        }
        Format::Tsv => {
            let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            parse_tsv(BufReader::new(f))?
        }
    };
    validate(rows)
}

/// `word<TAB>romanization` per line; blank lines and `#` comments are skipped.
pub fn parse_tsv<R: BufRead>(reader: R) -> Result<Vec<WordRow>> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((word, romanization)) = line.split_once('\t') else {
            bail!("line {}: expected word<TAB>romanization", idx + 1);
        };
        rows.push(WordRow {
            word: word.trim().to_string(),
            romanization: romanization.trim().to_string(),
        });
    }
    Ok(rows)
}

/// Normalise spacing and reject rows whose romanization is not toned Jyutping.
fn validate(rows: Vec<WordRow>) -> Result<Vec<WordRow>> {
    let pattern = Regex::new(ROMANIZATION)?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let romanization = row
            .romanization
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        if row.word.is_empty() || !pattern.is_match(&romanization) {
            bail!("invalid row: {:?} / {:?}", row.word, row.romanization);
        }
        out.push(WordRow {
            word: row.word,
            romanization,
        });
    }
    Ok(out)
}
