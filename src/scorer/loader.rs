use crate::error::{BoardError, BoardResult};
use crate::schema::CoreField;
use crate::scorer::types::Rule;
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Player table as produced by the loader, before any processing.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    pub rows: Vec<Value>,
    pub headers: Vec<String>,
    pub last_modified: Option<SystemTime>,
}

pub fn load_player_rows<P: AsRef<Path>>(path: P) -> BoardResult<LoadedTable> {
    let path = path.as_ref();
    info!("📂 Loading player data from: {}", path.display());
    let file = File::open(path)?;
    let last_modified = file.metadata().and_then(|m| m.modified()).ok();

    let mut table = read_player_rows(file)?;
    table.last_modified = last_modified;

    if table.rows.is_empty() {
        return Err(BoardError::Validation(format!(
            "Player data '{}' is empty",
            path.display()
        )));
    }
    Ok(table)
}

/// Parses a headered CSV with dynamic typing: numeric cells become numbers,
/// `true`/`false` become booleans, blank cells become null.
pub fn read_player_rows<R: Read>(reader: R) -> BoardResult<LoadedTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    let mut skipped_count = 0;
    let mut row_idx = 0;

    for result in rdr.records() {
        row_idx += 1;
        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                warn!("   ⚠️  [Row {}] CSV Parse Error: {}", row_idx, e);
                skipped_count += 1;
                continue;
            }
        };

        let mut obj = Map::new();
        for (header, cell) in headers.iter().zip(rec.iter()) {
            if header.is_empty() {
                continue;
            }
            let value = if header == CoreField::Player.column() {
                text_cell(cell)
            } else {
                parse_cell(cell)
            };
            obj.insert(header.clone(), value);
        }

        // Rows with nothing but blanks are noise from trailing newlines or
        // spreadsheet exports
        if obj.values().all(Value::is_null) {
            skipped_count += 1;
            continue;
        }
        rows.push(Value::Object(obj));
    }

    if skipped_count > 0 {
        debug!("   Skipped {} empty or unreadable player rows.", skipped_count);
    }
    info!(
        "   -> Parsed {} player rows with {} columns.",
        rows.len(),
        headers.len()
    );

    Ok(LoadedTable {
        rows,
        headers,
        last_modified: None,
    })
}

pub fn load_rules<P: AsRef<Path>>(path: P) -> BoardResult<Vec<Rule>> {
    let path = path.as_ref();
    info!("⚖️  Loading score rules from: {}", path.display());
    let rules = read_rules(File::open(path)?)?;
    if rules.is_empty() {
        warn!("Score rules are empty. Proceeding without rules.");
    }
    Ok(rules)
}

pub fn read_rules<R: Read>(reader: R) -> BoardResult<Vec<Rule>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rules = Vec::new();
    for (idx, result) in rdr.deserialize::<Rule>().enumerate() {
        match result {
            Ok(rule) if !rule.category.is_empty() && rule.score_per_unit.is_finite() => {
                rules.push(rule)
            }
            Ok(rule) => warn!("   ⚠️  [Rule {}] Ignoring unusable rule: {:?}", idx + 1, rule),
            Err(e) => warn!("   ⚠️  [Rule {}] CSV Parse Error: {}", idx + 1, e),
        }
    }
    debug!("   -> Loaded {} score rules.", rules.len());
    Ok(rules)
}

/// Player names stay text even when they look like numbers or booleans.
fn text_cell(cell: &str) -> Value {
    let t = cell.trim();
    if t.is_empty() {
        Value::Null
    } else {
        Value::String(t.to_string())
    }
}

fn parse_cell(cell: &str) -> Value {
    let t = cell.trim();
    if t.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = t.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = t.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    match t {
        "true" | "TRUE" => Value::Bool(true),
        "false" | "FALSE" => Value::Bool(false),
        _ => Value::String(t.to_string()),
    }
}
