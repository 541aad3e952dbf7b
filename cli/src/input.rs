//! JSON table documents

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use numeric_annotation_core::models::{Metadata, Value};
use numeric_annotation_core::Table;

/// A table as stored on disk
///
/// Cells are plain JSON scalars (numbers, strings, null) or values in their
/// typed form, e.g. `{"Unit": {"figure": 3.5, "unit": "km"}}`. Exactly one of
/// `rows` and `columns` must be present.
#[derive(Debug, Deserialize)]
pub struct TableDocument {
    /// Source file or table name
    #[serde(default)]
    pub source: Option<String>,

    /// Column headers
    pub headers: Vec<String>,

    /// Row-major cells
    #[serde(default)]
    pub rows: Option<Vec<Vec<serde_json::Value>>>,

    /// Column-major cells
    #[serde(default)]
    pub columns: Option<Vec<Vec<serde_json::Value>>>,

    /// Declared and collected properties and classes
    #[serde(default)]
    pub metadata: Metadata,
}

impl TableDocument {
    /// Read a document from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Convert into a typed table
    pub fn into_table(self, fallback_source: Option<String>) -> Result<Table> {
        let source = self.source.or(fallback_source);

        let table = match (self.rows, self.columns) {
            (Some(rows), None) => Table::from_rows(source, self.headers, cells(rows)?, self.metadata)?,
            (None, Some(columns)) => Table::new(source, self.headers, cells(columns)?, self.metadata)?,
            (Some(_), Some(_)) => bail!("a table document holds either rows or columns, not both"),
            (None, None) => bail!("a table document needs rows or columns"),
        };
        Ok(table)
    }
}

/// Load a table from a JSON document, naming it after the file when it has no source
pub fn load_table(path: &Path) -> Result<Table> {
    let fallback = path.file_name().map(|name| name.to_string_lossy().into_owned());
    TableDocument::from_file(path)?
        .into_table(fallback)
        .with_context(|| format!("Invalid table in {}", path.display()))
}

fn cells(lines: Vec<Vec<serde_json::Value>>) -> Result<Vec<Vec<Value>>> {
    lines
        .into_iter()
        .map(|line| line.into_iter().map(cell).collect())
        .collect()
}

fn cell(json: serde_json::Value) -> Result<Value> {
    match json {
        serde_json::Value::Null => Ok(Value::Empty),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Value::Numeric)
            .ok_or_else(|| anyhow!("number {} is out of range", n)),
        serde_json::Value::String(s) => Ok(Value::from(s.as_str())),
        serde_json::Value::Bool(b) => Ok(Value::Text(b.to_string())),
        typed @ serde_json::Value::Object(_) => {
            serde_json::from_value(typed).context("Invalid typed value")
        }
        serde_json::Value::Array(_) => bail!("nested arrays are not table cells"),
    }
}
