use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

///
/// Declared type of one schema column.
///
/// The source type system is wider than what the output can represent;
/// column selection keeps only the supported subset.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Record,
    Date,
    Timestamp,
    Bytes,
}

impl FieldType {
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            FieldType::String
                | FieldType::Integer
                | FieldType::Float
                | FieldType::Boolean
                | FieldType::Record
        )
    }
}

///
/// One named, typed field of the source schema, possibly nested.
///
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub fields: Vec<ColumnSpec>,
}

///
/// The ordered top-level fields of the source table.
///
#[derive(Debug, Clone, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<ColumnSpec>,
}

impl TableSchema {
    ///
    /// Read a schema descriptor from a json file.
    ///
    /// # Arguments:
    /// - path: path to the schema descriptor on disk
    ///
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Couldn't open schema file: {:?}", path))?;

        let schema: TableSchema = serde_json::from_reader(file)
            .with_context(|| format!("Couldn't parse schema file: {:?}", path))?;

        Ok(schema)
    }
}
