use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use vartab_core::models::schema::{FieldType, TableSchema};
use vartab_core::utils::get_dynamic_reader;

use crate::consts::{
    ALTERNATE_BASES_COLUMN, CALL_COLUMN, END_POSITION_COLUMN, FILE_FORMAT_LINE, FILTER_COLUMN,
    FIXED_COLUMNS, META_LINE_PREFIX, NAMES_COLUMN, QUALITY_COLUMN, REFERENCE_BASES_COLUMN,
    REFERENCE_NAME_COLUMN, START_POSITION_COLUMN,
};
use crate::schema_select::AnnotationFieldMap;

///
/// Write the output's header artifact.
///
/// Every meta-information line of the representative header is copied
/// unchanged and in order, followed by exactly one column-header line:
/// the fixed columns, then the final sample names, tab-separated. Any
/// non-meta line in the representative file (such as its own column
/// header) is not carried over.
///
pub fn compose_header(
    representative: &Path,
    sample_names: &[String],
    out: &Path,
) -> Result<()> {
    let reader = get_dynamic_reader(representative)
        .with_context(|| format!("Missing representative header artifact: {:?}", representative))?;

    let file = File::create(out)
        .with_context(|| format!("There was an error creating the header artifact: {:?}", out))?;
    let mut writer = BufWriter::new(file);

    for line in reader.lines() {
        let line = line?;
        if line.starts_with(META_LINE_PREFIX) {
            writeln!(writer, "{line}")?;
        }
    }

    let mut columns: Vec<&str> = FIXED_COLUMNS.to_vec();
    columns.extend(sample_names.iter().map(String::as_str));
    writeln!(writer, "{}", columns.join("\t"))?;

    writer.flush()?;

    Ok(())
}

fn vcf_type_of(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Integer => "Integer",
        FieldType::Float => "Float",
        FieldType::Boolean => "Flag",
        _ => "String",
    }
}

///
/// Generate meta-information lines from the table schema.
///
/// Used when no representative header artifact is supplied: supported
/// non-fixed top-level columns become `##INFO` lines, sub-fields of the
/// per-sample call column become `##FORMAT` lines, and each annotation
/// group gets an `##INFO` line whose description lists the group's
/// sub-fields in their schema order.
///
pub fn write_meta_info_from_schema(
    schema: &TableSchema,
    annotations: &AnnotationFieldMap,
    out: &Path,
) -> Result<()> {
    let fixed_columns = [
        REFERENCE_NAME_COLUMN,
        START_POSITION_COLUMN,
        END_POSITION_COLUMN,
        NAMES_COLUMN,
        REFERENCE_BASES_COLUMN,
        ALTERNATE_BASES_COLUMN,
        QUALITY_COLUMN,
        FILTER_COLUMN,
        CALL_COLUMN,
    ];

    let file = File::create(out)
        .with_context(|| format!("There was an error creating the meta info artifact: {:?}", out))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{FILE_FORMAT_LINE}")?;

    for field in &schema.fields {
        if fixed_columns.contains(&field.name.as_str()) || !field.field_type.is_supported() {
            continue;
        }
        writeln!(
            writer,
            "##INFO=<ID={},Number=1,Type={},Description=\"{}\">",
            field.name,
            vcf_type_of(field.field_type),
            field.name
        )?;
    }

    for field in &schema.fields {
        if field.name != ALTERNATE_BASES_COLUMN {
            continue;
        }
        for sub_field in &field.fields {
            if let Some(names) = annotations.get(&sub_field.name) {
                writeln!(
                    writer,
                    "##INFO=<ID={},Number=.,Type=String,Description=\"Annotations. Format: {}\">",
                    sub_field.name,
                    names.join("|")
                )?;
            }
        }
    }

    for field in &schema.fields {
        if field.name != CALL_COLUMN {
            continue;
        }
        for sub_field in &field.fields {
            if sub_field.name == NAMES_COLUMN || !sub_field.field_type.is_supported() {
                continue;
            }
            writeln!(
                writer,
                "##FORMAT=<ID={},Number=1,Type={},Description=\"{}\">",
                sub_field.name,
                vcf_type_of(sub_field.field_type),
                sub_field.name
            )?;
        }
    }

    writer.flush()?;

    Ok(())
}
