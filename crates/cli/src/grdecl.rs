//! Reader for the grdecl `FAULTS` keyword.
//!
//! Records look like `'NAME'  I1 I2  J1 J2  K1 K2  'FACE' /` with 1-based
//! indices; a lone `/` closes the keyword. `--` starts a comment.

use anyhow::{bail, Context, Result};
use faults::api::{Face, FaultCollection, FaultRecord, Grid};
use std::fs;
use std::path::Path;

/// One parsed record, converted to 0-based indices.
#[derive(Clone, Debug, PartialEq)]
pub struct FaultEntry {
    pub name: String,
    pub record: FaultRecord,
    /// 1-based line number in the source text.
    pub line: usize,
}

fn strip_comment(line: &str) -> &str {
    match line.find("--") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Whitespace tokens with `'quoted strings'` kept whole; `None` on an
/// unbalanced quote.
fn tokenize(body: &str) -> Option<Vec<String>> {
    let parts: Vec<&str> = body.split('\'').collect();
    if parts.len() % 2 == 0 {
        return None;
    }
    let mut tokens = Vec::new();
    for (index, part) in parts.iter().enumerate() {
        if index % 2 == 1 {
            tokens.push(part.to_string());
        } else {
            tokens.extend(part.split_whitespace().map(str::to_string));
        }
    }
    Some(tokens)
}

/// Parse one record line (without comment) into name and 0-based record.
pub fn split_line(line: &str) -> Result<(String, FaultRecord)> {
    let Some(body) = line.trim_end().strip_suffix('/') else {
        bail!("record is not terminated by '/'");
    };
    let Some(tokens) = tokenize(body) else {
        bail!("unbalanced quotes");
    };
    if tokens.len() != 8 {
        bail!("expected 8 items, found {}", tokens.len());
    }
    let mut idx = [0i64; 6];
    for (slot, token) in idx.iter_mut().zip(&tokens[1..7]) {
        let value: i64 = token
            .parse()
            .with_context(|| format!("not an integer: {token:?}"))?;
        *slot = value - 1;
    }
    let face: Face = tokens[7].parse()?;
    let [i1, i2, j1, j2, k1, k2] = idx;
    Ok((
        tokens[0].clone(),
        FaultRecord::new(i1, i2, j1, j2, k1, k2, face),
    ))
}

/// All records of every `FAULTS` keyword in `text`.
pub fn parse_faults(text: &str) -> Result<Vec<FaultEntry>> {
    let mut entries = Vec::new();
    let mut in_faults = false;
    for (index, raw) in text.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        if !in_faults {
            in_faults = line == "FAULTS";
            continue;
        }
        if line == "/" {
            in_faults = false;
            continue;
        }
        let (name, record) = split_line(line)
            .with_context(|| format!("line {}", index + 1))?;
        entries.push(FaultEntry {
            name,
            record,
            line: index + 1,
        });
    }
    if in_faults {
        tracing::warn!("FAULTS keyword not closed by '/'");
    }
    Ok(entries)
}

pub fn read_faults(path: &Path) -> Result<Vec<FaultEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_faults(&text)
        .with_context(|| format!("parsing {}", path.display()))
}

/// Group entries into faults on `grid`; the first invalid record aborts.
pub fn load_collection<'g>(
    grid: &'g dyn Grid,
    entries: &[FaultEntry],
) -> Result<FaultCollection<'g>> {
    let mut faults = FaultCollection::new();
    for entry in entries {
        faults
            .add_record(grid, &entry.name, &entry.record)
            .with_context(|| format!("fault {} (line {})", entry.name, entry.line))?;
    }
    tracing::debug!(
        records = entries.len(),
        faults = faults.len(),
        "fault collection loaded"
    );
    Ok(faults)
}
