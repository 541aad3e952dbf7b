//! Typed table representation
//!
//! A table is a set of equally long columns of typed values, one label per
//! column, and table-level metadata describing what the columns mean.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use serde::{Serialize, Deserialize};

use crate::error::{CoreError, Result};
use super::label::{DeclaredEntity, Label, Provenance};
use super::value::Value;

/// Number of values and rows copied into a label's provenance
const SAMPLE_SIZE: usize = 5;

/// Table-level knowledge about the columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Table author
    pub author: Option<String>,

    /// Table title
    pub title: Option<String>,

    /// Properties declared by the table's creator (column index -> property)
    pub declared_properties: BTreeMap<usize, DeclaredEntity>,

    /// Classes declared by the table's creator (column index -> class)
    pub declared_classes: BTreeMap<usize, DeclaredEntity>,

    /// Properties found by entity linking (column index -> property)
    pub collected_properties: BTreeMap<usize, DeclaredEntity>,

    /// Classes found by entity linking (column index -> class)
    pub collected_classes: BTreeMap<usize, DeclaredEntity>,
}

impl Metadata {
    /// Column properties; declared entries win over collected ones
    pub fn properties(&self, include_collected: bool) -> BTreeMap<usize, DeclaredEntity> {
        Self::merge(&self.declared_properties, &self.collected_properties, include_collected)
    }

    /// Column classes; declared entries win over collected ones
    pub fn classes(&self, include_collected: bool) -> BTreeMap<usize, DeclaredEntity> {
        Self::merge(&self.declared_classes, &self.collected_classes, include_collected)
    }

    fn merge(
        declared: &BTreeMap<usize, DeclaredEntity>,
        collected: &BTreeMap<usize, DeclaredEntity>,
        include_collected: bool,
    ) -> BTreeMap<usize, DeclaredEntity> {
        let mut merged = declared.clone();
        if include_collected {
            for (index, entity) in collected {
                merged.entry(*index).or_insert_with(|| entity.clone());
            }
        }
        merged
    }
}

/// One column of a table
#[derive(Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column identity
    pub label: Label,

    /// Values, one per row
    pub values: Vec<Value>,
}

impl Debug for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Column")
            .field("label", &self.label.text())
            .field("len", &self.values.len())
            .finish()
    }
}

impl Column {
    /// At least one numeric-like value and nothing but numeric-like or empty values
    pub fn is_numeric(&self) -> bool {
        let mut any_figure = false;
        for value in &self.values {
            if value.is_numeric_like() {
                any_figure = true;
            } else if !value.is_empty() {
                return false;
            }
        }
        any_figure
    }

    /// Not numeric, with at least one non-empty value
    pub fn is_context(&self) -> bool {
        !self.is_numeric() && self.values.iter().any(|v| !v.is_empty())
    }
}

/// A typed table
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "TableColumns")]
pub struct Table {
    /// Source file or table name
    source: Option<String>,

    /// Columns, all of the same height
    columns: Vec<Column>,

    /// Table-level metadata
    metadata: Metadata,
}

#[derive(Deserialize)]
struct TableColumns {
    source: Option<String>,
    columns: Vec<Column>,
    metadata: Metadata,
}

impl TryFrom<TableColumns> for Table {
    type Error = CoreError;

    fn try_from(parts: TableColumns) -> Result<Self> {
        let height = parts.columns.first().map_or(0, |c| c.values.len());
        if let Some(position) = parts.columns.iter().position(|c| c.values.len() != height) {
            return Err(CoreError::InvalidArgument(format!(
                "column {} has {} values, expected {}",
                position,
                parts.columns[position].values.len(),
                height
            )));
        }

        Ok(Table {
            source: parts.source,
            columns: parts.columns,
            metadata: parts.metadata,
        })
    }
}

impl Debug for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Table")
            .field("source", &self.source)
            .field("columns", &self.columns)
            .field("height", &self.height())
            .finish()
    }
}

impl Table {
    /// Create a table from column-major values
    ///
    /// Fails when the header count differs from the column count or when the
    /// columns differ in height.
    pub fn new(
        source: Option<String>,
        headers: Vec<String>,
        columns: Vec<Vec<Value>>,
        metadata: Metadata,
    ) -> Result<Self> {
        if headers.len() != columns.len() {
            return Err(CoreError::InvalidArgument(format!(
                "{} headers for {} columns",
                headers.len(),
                columns.len()
            )));
        }

        let height = columns.first().map_or(0, Vec::len);
        if let Some(position) = columns.iter().position(|c| c.len() != height) {
            return Err(CoreError::InvalidArgument(format!(
                "column {} has {} values, expected {}",
                position,
                columns[position].len(),
                height
            )));
        }

        let sample_rows: Vec<Vec<String>> = (0..height.min(SAMPLE_SIZE))
            .map(|row| columns.iter().map(|c| Self::display(&c[row])).collect())
            .collect();

        let columns = headers
            .iter()
            .zip(columns)
            .enumerate()
            .map(|(index, (header, values))| {
                let provenance = Provenance {
                    file: source.clone(),
                    column: index,
                    sample_values: values.iter().take(SAMPLE_SIZE).map(Self::display).collect(),
                    sample_headers: headers.clone(),
                    sample_rows: sample_rows.clone(),
                };
                Column {
                    label: Label::new(header.clone(), provenance),
                    values,
                }
            })
            .collect();

        Ok(Table {
            source,
            columns,
            metadata,
        })
    }

    /// Create a table from row-major values
    pub fn from_rows(
        source: Option<String>,
        headers: Vec<String>,
        rows: Vec<Vec<Value>>,
        metadata: Metadata,
    ) -> Result<Self> {
        let width = headers.len();
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); width];

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(CoreError::InvalidArgument(format!(
                    "row {} has {} values, expected {}",
                    index,
                    row.len(),
                    width
                )));
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Self::new(source, headers, columns, metadata)
    }

    fn display(value: &Value) -> String {
        match value.figure() {
            Some(figure) => figure.to_string(),
            None => value.context_key().unwrap_or_default(),
        }
    }

    /// Source file or table name
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// All columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column by index
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Header texts
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.text().to_string()).collect()
    }

    /// Table-level metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Value at a row and column
    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.columns.get(column)?.values.get(row)
    }

    /// Indices of the numeric columns
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_numeric())
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of the columns usable as context
    pub fn context_columns(&self) -> BTreeSet<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_context())
            .map(|(i, _)| i)
            .collect()
    }
}
