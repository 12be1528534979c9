use std::collections::HashSet;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use vartab_core::models::schema::TableSchema;
use vartab_core::models::{SampleMap, VariantRecord};
use vartab_core::utils::get_dynamic_reader;

use crate::compose::{compose_shards, LocalStore};
use crate::header::{compose_header, write_meta_info_from_schema};
use crate::regions::RegionFilter;
use crate::samples::resolve_final_sample_names;
use crate::schema_select::{extract_annotation_names, AnnotationFieldMap};
use crate::shard::{group_by_shard_key, write_shards, ShardWidth};

///
/// One export run, start to finish.
///
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Extracted record stream (tsv, optionally gzipped).
    pub input: PathBuf,
    /// Sample identity table (tsv: id, name, source path).
    pub sample_table: PathBuf,
    /// Final composed output artifact.
    pub output: PathBuf,
    /// Source schema descriptor (json); enables column selection and
    /// schema-generated meta lines.
    pub schema: Option<PathBuf>,
    /// Representative header supplying the meta-information lines. When
    /// absent, meta lines are generated from the schema.
    pub representative_header: Option<PathBuf>,
    /// Region requests of the form `reference:start-end`; empty selects
    /// everything.
    pub regions: Vec<String>,
    pub shard_width: ShardWidth,
    /// Explicit output sample name order; empty derives names from the
    /// records.
    pub sample_names: Vec<String>,
    /// Keep derived sample names in first-observed order instead of
    /// sorting them.
    pub preserve_sample_order: bool,
    /// Fail on unparseable annotation structure instead of dropping it.
    pub strict_schema: bool,
    /// Directory that holds the per-run scratch folder.
    pub temp_dir: PathBuf,
}

///
/// What one finished run produced.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub records: u64,
    pub shards: usize,
    pub samples: usize,
}

///
/// Read the extracted record stream, keeping records the region filter
/// selects. No ordering is assumed on the stream.
///
pub fn read_records(input: &Path, filter: &RegionFilter) -> Result<Vec<VariantRecord>> {
    let reader = get_dynamic_reader(input)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg} ({per_sec})")?
            .tick_strings(&["-", "\\", "|", "/"]),
    );
    spinner.set_message("Reading variant records...");

    let mut records = Vec::new();
    let mut processed: u64 = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line
            .with_context(|| format!("There was an error reading line {}", index + 1))?;
        if line.is_empty() {
            continue;
        }

        let record: VariantRecord = line
            .parse()
            .with_context(|| format!("Failed to parse record at line {}", index + 1))?;
        if filter.matches(&record) {
            records.push(record);
        }

        processed += 1;
        if processed % 10_000 == 0 {
            spinner.set_message(format!("Read {} records", processed));
        }
        spinner.inc(1);
    }

    spinner.finish_with_message(format!("Read {} records", processed));

    Ok(records)
}

///
/// Sample ids observed across the records, in first-seen order.
///
/// Ids within one record are visited in ascending order so the result
/// does not depend on call-map iteration order.
///
pub fn observed_sample_ids(records: &[VariantRecord]) -> Vec<u64> {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut observed: Vec<u64> = Vec::new();

    for record in records {
        let mut ids: Vec<u64> = record.calls.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            if seen.insert(id) {
                observed.push(id);
            }
        }
    }

    observed
}

fn scratch_dir_for(config: &ExportConfig) -> PathBuf {
    // wall-clock suffix keeps scratch folders of back-to-back runs apart
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    config
        .temp_dir
        .join(format!("vartab_{}_{}", std::process::id(), nanos))
}

///
/// Run the full export: filter, shard, sort, and compose one
/// coordinate-sorted output artifact.
///
/// Fails fast on malformed regions before any extraction work, writes
/// every shard before composing, and cleans up its scratch directory
/// only after the output artifact is published. Any failure along the
/// way aborts the run with no partial output left in place.
///
pub fn run_export(config: &ExportConfig) -> Result<ExportSummary> {
    let filter = RegionFilter::new(&config.regions)?;

    let schema = config
        .schema
        .as_deref()
        .map(TableSchema::from_json_file)
        .transpose()?;
    let annotations = match &schema {
        Some(schema) => extract_annotation_names(schema, config.strict_schema)?,
        None => AnnotationFieldMap::new(),
    };

    let sample_map = SampleMap::from_file(&config.sample_table)?;

    let records = read_records(&config.input, &filter)?;
    let record_count = records.len() as u64;

    let observed = observed_sample_ids(&records);
    let (sample_names, sample_ids) = resolve_final_sample_names(
        &config.sample_names,
        &observed,
        &sample_map,
        config.preserve_sample_order,
    )?;

    let scratch = scratch_dir_for(config);
    let shard_dir = scratch.join("data");

    let groups = group_by_shard_key(records, config.shard_width);
    let shard_paths = write_shards(groups, &shard_dir, &sample_ids)?;

    // header meta lines come from the representative artifact, or are
    // generated from the schema when none was supplied
    let generated_meta = scratch.join("meta_info.vcf");
    let representative = match &config.representative_header {
        Some(path) => path.clone(),
        None => {
            let empty = TableSchema { fields: Vec::new() };
            write_meta_info_from_schema(
                schema.as_ref().unwrap_or(&empty),
                &annotations,
                &generated_meta,
            )?;
            generated_meta
        }
    };

    let header_artifact = scratch.join("header.vcf");
    compose_header(&representative, &sample_names, &header_artifact)?;

    compose_shards(&LocalStore, &header_artifact, &shard_dir, &config.output)?;

    fs::remove_dir_all(&scratch).with_context(|| {
        format!("There was an error removing the scratch directory: {:?}", scratch)
    })?;

    Ok(ExportSummary {
        records: record_count,
        shards: shard_paths.len(),
        samples: sample_names.len(),
    })
}
