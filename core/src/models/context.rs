//! Per-column context snapshot

use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize, Deserialize};

use super::label::DeclaredEntity;
use super::table::Table;

/// What was known about a column and its neighbours when its tree was built
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Every header of the source table
    pub headers: Vec<String>,

    /// Table author
    pub author: Option<String>,

    /// Table title
    pub title: Option<String>,

    /// Property declared for this column
    pub property: Option<DeclaredEntity>,

    /// Properties of the other columns (column index -> property)
    pub context_properties: BTreeMap<usize, DeclaredEntity>,

    /// Classes of the other columns (column index -> class)
    pub context_classes: BTreeMap<usize, DeclaredEntity>,

    /// Index of this column
    pub column: usize,

    /// Columns usable as context
    pub context_columns: BTreeSet<usize>,
}

impl Context {
    /// Snapshot the context of `column` from the table and the given declarations
    pub fn capture(
        table: &Table,
        column: usize,
        properties: &BTreeMap<usize, DeclaredEntity>,
        classes: &BTreeMap<usize, DeclaredEntity>,
    ) -> Self {
        let others = |entities: &BTreeMap<usize, DeclaredEntity>| {
            entities
                .iter()
                .filter(|(index, _)| **index != column)
                .map(|(index, entity)| (*index, entity.clone()))
                .collect::<BTreeMap<_, _>>()
        };

        let mut context_columns = table.context_columns();
        context_columns.remove(&column);

        Context {
            headers: table.headers(),
            author: table.metadata().author.clone(),
            title: table.metadata().title.clone(),
            property: properties.get(&column).cloned(),
            context_properties: others(properties),
            context_classes: others(classes),
            column,
            context_columns,
        }
    }

    /// URI of the property declared for this column
    pub fn property_uri(&self) -> Option<&str> {
        self.property.as_ref()?.uri.as_deref()
    }

    /// URIs of the other columns' properties
    pub fn property_uris(&self) -> BTreeSet<String> {
        Self::uris(&self.context_properties)
    }

    /// URIs of the other columns' classes
    pub fn class_uris(&self) -> BTreeSet<String> {
        Self::uris(&self.context_classes)
    }

    fn uris(entities: &BTreeMap<usize, DeclaredEntity>) -> BTreeSet<String> {
        entities.values().filter_map(|e| e.uri.clone()).collect()
    }
}
