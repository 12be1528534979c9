use std::collections::HashMap;

use vartab_core::errors::ExportError;
use vartab_core::models::schema::{FieldType, TableSchema};

use crate::consts::ALTERNATE_BASES_COLUMN;

/// Mapping from annotation group name to its ordered sub-field names.
pub type AnnotationFieldMap = HashMap<String, Vec<String>>;

///
/// Select the top-level columns worth extracting from the source table.
///
/// Only columns with a representable declared type are kept; anything
/// else (dates, timestamps, raw bytes) is silently dropped, preserving
/// the schema's column order.
///
pub fn select_query_columns(schema: &TableSchema) -> Vec<String> {
    schema
        .fields
        .iter()
        .filter(|field| field.field_type.is_supported())
        .map(|field| field.name.clone())
        .collect()
}

///
/// Map each annotation group nested under the alternate-bases column to
/// the ordered list of its own sub-field names.
///
/// Any record-typed sub-field of alternate bases is an annotation group;
/// the sub-field order is what lets an encoded annotation string like
/// `A|upstream_gene_variant|MODIFIER|PSMF1` be reconstructed faithfully.
/// A group with no sub-fields cannot be reconstructed: that is fatal
/// under `strict`, otherwise the group is dropped with a warning.
///
/// A schema without an alternate-bases column yields an empty map.
///
pub fn extract_annotation_names(
    schema: &TableSchema,
    strict: bool,
) -> Result<AnnotationFieldMap, ExportError> {
    let mut annotation_names = AnnotationFieldMap::new();

    for field in &schema.fields {
        if field.name != ALTERNATE_BASES_COLUMN {
            continue;
        }
        for sub_field in &field.fields {
            if sub_field.field_type != FieldType::Record {
                continue;
            }
            if sub_field.fields.is_empty() {
                if strict {
                    return Err(ExportError::Schema(format!(
                        "annotation group {:?} has no sub-fields",
                        sub_field.name
                    )));
                }
                eprintln!(
                    "Warning: dropping annotation group {:?}: it has no sub-fields",
                    sub_field.name
                );
                continue;
            }
            annotation_names.insert(
                sub_field.name.clone(),
                sub_field.fields.iter().map(|f| f.name.clone()).collect(),
            );
        }
    }

    Ok(annotation_names)
}
