use crate::consts::GROUP_COLUMN;
use crate::error::{TeamForgeError, TfResult};
use crate::partition::PartitionState;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// A header row plus string cells, as read from CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> TfResult<usize> {
        self.column_index(name).ok_or_else(|| {
            TeamForgeError::Configuration(format!(
                "column '{}' not found (available: {})",
                name,
                self.headers.join(", ")
            ))
        })
    }

    pub fn cell(&self, row: usize, col: usize) -> TfResult<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .ok_or_else(|| {
                TeamForgeError::Validation(format!("row {} has no cell in column {}", row + 1, col))
            })
    }
}

pub fn load_table<P: AsRef<Path>>(path: P) -> TfResult<RawTable> {
    let path = path.as_ref();
    info!("📂 Loading population from: {}", path.display());
    let file = File::open(path)?;
    load_table_from_reader(file)
}

pub fn load_table_from_reader<R: Read>(reader: R) -> TfResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        rows.push(rec.iter().map(str::to_string).collect());
    }

    debug!("   -> Read {} rows", rows.len());
    Ok(RawTable { headers, rows })
}

pub fn write_table<W: Write>(table: &RawTable, writer: W) -> TfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Copies `table` with a trailing `group` column taken from `state`,
/// keeping the table's original row order. Rows are matched to entities by
/// the identifier column. An existing `group` column is replaced.
pub fn with_assignment(table: &RawTable, state: &PartitionState) -> TfResult<RawTable> {
    let id_col = table.require_column(state.population().identifier())?;
    let existing = table.column_index(GROUP_COLUMN);

    let mut headers: Vec<String> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != existing)
        .map(|(_, h)| h.clone())
        .collect();
    headers.push(GROUP_COLUMN.to_string());

    let mut rows = Vec::with_capacity(table.rows.len());
    for (row_idx, row) in table.rows.iter().enumerate() {
        let id = table.cell(row_idx, id_col)?.trim();
        let group = state.group_of(id)?;
        let mut out: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != existing)
            .map(|(_, c)| c.clone())
            .collect();
        out.push(group.to_string());
        rows.push(out);
    }

    Ok(RawTable { headers, rows })
}

/// Writes `identifier,group` for every entity in current table order.
pub fn assignment_table(state: &PartitionState) -> TfResult<RawTable> {
    let pop = state.population();
    let mut rows = Vec::with_capacity(pop.len());
    for e in pop.entities() {
        rows.push(vec![e.id.clone(), state.group_of(&e.id)?.to_string()]);
    }
    Ok(RawTable {
        headers: vec![pop.identifier().to_string(), GROUP_COLUMN.to_string()],
        rows,
    })
}

pub fn save_table<P: AsRef<Path>>(table: &RawTable, path: P) -> TfResult<()> {
    let path = path.as_ref();
    info!("💾 Writing {} rows to: {}", table.rows.len(), path.display());
    let file = File::create(path)?;
    write_table(table, file)
}

/// Reads a group column back into per-row indices, in table order.
pub fn parse_group_column(table: &RawTable, name: &str) -> TfResult<Vec<usize>> {
    let col = table.require_column(name)?;
    (0..table.rows.len())
        .map(|row| {
            let raw = table.cell(row, col)?.trim();
            // Spreadsheet exports often store group indices as floats.
            let parsed = raw
                .parse::<usize>()
                .ok()
                .or_else(|| {
                    raw.parse::<f64>()
                        .ok()
                        .filter(|v| *v >= 0.0 && *v < usize::MAX as f64 && v.fract() == 0.0)
                        .map(|v| v as usize)
                });
            parsed.ok_or_else(|| {
                TeamForgeError::Validation(format!(
                    "row {}: '{}' is not a group index in column '{}'",
                    row + 1,
                    raw,
                    name
                ))
            })
        })
        .collect()
}

pub fn parse_flag(raw: &str, row: usize, column: &str) -> TfResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "t" | "yes" | "y" => Ok(true),
        "" | "0" | "0.0" | "false" | "f" | "no" | "n" => Ok(false),
        other => Err(TeamForgeError::Validation(format!(
            "row {}: '{}' is not a boolean in column '{}'",
            row + 1,
            other,
            column
        ))),
    }
}

pub fn parse_real(raw: &str, row: usize, column: &str) -> TfResult<f64> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TeamForgeError::Validation(format!(
            "row {}: '{}' is not a finite number in column '{}'",
            row + 1,
            trimmed,
            column
        ))),
    }
}
