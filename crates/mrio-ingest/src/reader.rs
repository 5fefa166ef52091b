//! Delimited text readers.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use polars::prelude::*;

use mrio_model::{Axis, LabeledTable, ModelError, UnitTable, UNIT_COLUMN};

use crate::error::{IngestError, Result};

/// Reads a bridge table with every column as text.
///
/// Tab separated when the file ends in `.tsv` or `.txt` or its header line
/// contains a tab, comma separated otherwise. Empty cells read as null.
pub fn read_bridge_table(path: &Path) -> Result<DataFrame> {
    let df = read_delimited(path)?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded bridge table"
    );
    Ok(df)
}

/// Reads a long-format account: one column per row and column level plus a
/// value column.
pub fn read_long_table(
    path: &Path,
    row_levels: &[&str],
    column_levels: &[&str],
    value_column: &str,
) -> Result<LabeledTable> {
    let df = read_delimited(path)?;
    let table = LabeledTable::from_long(&df, row_levels, column_levels, value_column)
        .map_err(|e| model_error(path, e))?;
    tracing::debug!(
        path = %path.display(),
        rows = table.rows().len(),
        columns = table.columns().len(),
        "loaded long table"
    );
    Ok(table)
}

/// Reads a unit table: the `index_levels` columns key each row, the `unit`
/// column holds its unit. Other columns are ignored.
pub fn read_unit_table(path: &Path, index_levels: &[&str]) -> Result<UnitTable> {
    let separator = detect_separator(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(separator)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, &e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, &e))?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').to_string())
        .collect();
    let position = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| IngestError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            })
    };
    let level_positions = index_levels
        .iter()
        .map(|&level| position(level))
        .collect::<Result<Vec<_>>>()?;
    let unit_position = position(UNIT_COLUMN)?;

    let mut entries = Vec::new();
    let mut units = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, &e))?;
        let field = |pos: usize| record.get(pos).unwrap_or_default().to_string();
        entries.push(level_positions.iter().map(|&pos| field(pos)).collect());
        units.push(field(unit_position));
    }

    let names = index_levels.iter().map(|l| (*l).to_string()).collect();
    let rows = Axis::new(names, entries).map_err(|e| model_error(path, e))?;
    let table = UnitTable::new(rows, units).map_err(|e| model_error(path, e))?;
    tracing::debug!(path = %path.display(), rows = table.len(), "loaded unit table");
    Ok(table)
}

/// Reads `path` into a DataFrame of string columns.
fn read_delimited(path: &Path) -> Result<DataFrame> {
    let separator = detect_separator(path)?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Tab for `.tsv`/`.txt` files or a tab in the header line, comma otherwise.
pub fn detect_separator(path: &Path) -> Result<u8> {
    let header = read_header_line(path)?;
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv") || e.eq_ignore_ascii_case("txt"));
    if by_extension || header.contains('\t') {
        Ok(b'\t')
    } else {
        Ok(b',')
    }
}

fn read_header_line(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    let line = line.strip_prefix('\u{feff}').unwrap_or(&line).trim_end().to_string();
    if line.is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(line)
}

fn csv_error(path: &Path, err: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn model_error(path: &Path, err: ModelError) -> IngestError {
    match err {
        ModelError::MissingColumn { column } => IngestError::MissingColumn {
            column,
            path: path.to_path_buf(),
        },
        source => IngestError::Model {
            path: path.to_path_buf(),
            source,
        },
    }
}
